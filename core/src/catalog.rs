#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectEntry {
    pub title: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub image: &'static str,
    pub client: Option<&'static str>,
    pub location: Option<&'static str>,
    pub year: Option<u16>,
}

include!(concat!(env!("OUT_DIR"), "/project_catalog.rs"));
