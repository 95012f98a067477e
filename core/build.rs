use std::collections::HashSet;
use std::env;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    fallback_image: String,
    projects: Vec<ProjectEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectEntry {
    title: String,
    category: String,
    description: String,
    image: String,
    client: Option<String>,
    location: Option<String>,
    year: Option<u16>,
}

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("missing CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir.parent().unwrap_or(&manifest_dir);
    let env_path = workspace_root.join(".env");
    let env_local_path = workspace_root.join(".env.local");

    let _ = dotenvy::from_filename(&env_local_path);
    let _ = dotenvy::from_filename(&env_path);

    println!("cargo:rerun-if-env-changed=PROJECT_CATALOG_PATH");
    println!("cargo:rerun-if-changed={}", env_path.display());
    println!("cargo:rerun-if-changed={}", env_local_path.display());

    let catalog_path = resolve_catalog_path(workspace_root);
    println!("cargo:rerun-if-changed={}", catalog_path.display());

    let contents = fs::read_to_string(&catalog_path).unwrap_or_else(|err| {
        panic!(
            "failed to read project catalog at {}: {err}",
            catalog_path.display()
        )
    });

    let catalog: CatalogFile = toml::from_str(&contents).unwrap_or_else(|err| {
        panic!(
            "failed to parse project catalog at {}: {err}",
            catalog_path.display()
        )
    });

    if catalog.projects.is_empty() {
        panic!("project catalog {} has no entries", catalog_path.display());
    }
    if catalog.fallback_image.trim().is_empty() {
        panic!(
            "project catalog {} must set fallback_image",
            catalog_path.display()
        );
    }

    validate_entries(&catalog.projects, &catalog_path);

    let mut output = String::new();
    writeln!(
        &mut output,
        "pub const FALLBACK_PROJECT_IMAGE: &str = {};",
        rust_string(catalog.fallback_image.trim())
    )
    .unwrap();
    writeln!(&mut output).unwrap();
    writeln!(&mut output, "pub const PROJECT_CATALOG: &[ProjectEntry] = &[").unwrap();

    for entry in &catalog.projects {
        writeln!(&mut output, "    ProjectEntry {{").unwrap();
        writeln!(&mut output, "        title: {},", rust_string(entry.title.trim())).unwrap();
        writeln!(
            &mut output,
            "        category: {},",
            rust_string(&entry.category.trim().to_ascii_lowercase())
        )
        .unwrap();
        writeln!(
            &mut output,
            "        description: {},",
            rust_string(entry.description.trim())
        )
        .unwrap();
        writeln!(&mut output, "        image: {},", rust_string(entry.image.trim())).unwrap();
        writeln!(&mut output, "        client: {},", rust_option(entry.client.as_deref())).unwrap();
        writeln!(
            &mut output,
            "        location: {},",
            rust_option(entry.location.as_deref())
        )
        .unwrap();
        match entry.year {
            Some(year) => writeln!(&mut output, "        year: Some({year}),").unwrap(),
            None => writeln!(&mut output, "        year: None,").unwrap(),
        }
        writeln!(&mut output, "    }},").unwrap();
    }

    writeln!(&mut output, "];").unwrap();

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("missing OUT_DIR"));
    let out_path = out_dir.join("project_catalog.rs");
    fs::write(&out_path, output).unwrap_or_else(|err| {
        panic!("failed to write {}: {err}", out_path.display())
    });
}

fn resolve_catalog_path(workspace_root: &Path) -> PathBuf {
    let env_value = env::var("PROJECT_CATALOG_PATH").ok();
    let raw_path = match env_value {
        Some(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => workspace_root.join("site/projects.toml"),
    };
    if raw_path.is_relative() {
        workspace_root.join(raw_path)
    } else {
        raw_path
    }
}

fn rust_string(value: &str) -> String {
    format!("{:?}", value)
}

fn rust_option(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => format!("Some({})", rust_string(value)),
        None => "None".to_string(),
    }
}

fn validate_entries(entries: &[ProjectEntry], catalog_path: &Path) {
    let mut titles = HashSet::new();

    for entry in entries {
        if entry.title.trim().is_empty() {
            panic!("project title cannot be empty in {}", catalog_path.display());
        }
        if entry.image.trim().is_empty() {
            panic!(
                "project '{}' image cannot be empty in {}",
                entry.title,
                catalog_path.display()
            );
        }
        if entry.image.starts_with("data:") {
            panic!(
                "project '{}' image cannot be a data URL in {}",
                entry.title,
                catalog_path.display()
            );
        }
        let category = entry.category.trim();
        if category.is_empty() || category.eq_ignore_ascii_case("all") {
            panic!(
                "project '{}' needs a category other than 'all' in {}",
                entry.title,
                catalog_path.display()
            );
        }
        if category.chars().any(char::is_whitespace) {
            panic!(
                "project '{}' category '{}' cannot contain whitespace in {}",
                entry.title,
                category,
                catalog_path.display()
            );
        }
        if let Some(year) = entry.year {
            if !(1900..=2100).contains(&year) {
                panic!(
                    "project '{}' has implausible year {} in {}",
                    entry.title,
                    year,
                    catalog_path.display()
                );
            }
        }
        if !titles.insert(entry.title.trim().to_ascii_lowercase()) {
            panic!(
                "duplicate project title '{}' in {}",
                entry.title,
                catalog_path.display()
            );
        }
    }
}
