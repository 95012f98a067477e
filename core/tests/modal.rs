use milanzi_site_core::{
    ImageLoad, ImageStage, ModalClick, ModalState, ProjectEntry, BODY_OVERFLOW_LOCKED,
    BODY_OVERFLOW_UNLOCKED, FALLBACK_PROJECT_IMAGE, PROJECT_CATALOG,
};

const CATALOG: &[ProjectEntry] = &[
    ProjectEntry {
        title: "Lakeside Residence",
        category: "residential",
        description: "Family home",
        image: "images/lakeside.jpg",
        client: Some("Private client"),
        location: None,
        year: Some(2023),
    },
    ProjectEntry {
        title: "Capital Law Chambers",
        category: "commercial",
        description: "Offices",
        image: "images/capital.jpg",
        client: None,
        location: Some("Lilongwe"),
        year: None,
    },
];

#[test]
fn open_locks_body_scroll() {
    let mut modal = ModalState::new();
    assert_eq!(modal.body_overflow(), BODY_OVERFLOW_UNLOCKED);

    let content = modal.open(0, CATALOG, "images/placeholder.jpg").unwrap();
    assert_eq!(content.title, "Lakeside Residence");
    assert_eq!(content.category, "Residential");
    assert_eq!(content.year, "2023");
    assert_eq!(content.location, "");
    assert_eq!(modal.body_overflow(), BODY_OVERFLOW_LOCKED);
}

#[test]
fn close_control_and_backdrop_restore_scroll() {
    for click in [ModalClick::CloseControl, ModalClick::Backdrop] {
        let mut modal = ModalState::new();
        modal.open(1, CATALOG, "images/placeholder.jpg");
        assert!(modal.handle_click(click));
        assert!(!modal.is_open());
        assert_eq!(modal.body_overflow(), "auto");
    }
}

#[test]
fn click_inside_content_keeps_modal_open() {
    let mut modal = ModalState::new();
    modal.open(1, CATALOG, "images/placeholder.jpg");
    assert!(!modal.handle_click(ModalClick::Content));
    assert!(modal.is_open());
    assert_eq!(modal.body_overflow(), "hidden");
}

#[test]
fn click_past_catalog_end_is_ignored() {
    let mut modal = ModalState::new();
    assert!(modal.open(CATALOG.len(), CATALOG, "images/placeholder.jpg").is_none());
    assert!(!modal.is_open());
    assert!(!modal.close());
}

#[test]
fn image_falls_back_then_gives_up() {
    let mut image = ImageLoad::new("images/capital.jpg", "images/placeholder.jpg");
    assert_eq!(image.current_src(), Some("images/capital.jpg"));
    assert_eq!(image.on_error(), Some("images/placeholder.jpg"));
    assert_eq!(image.stage(), ImageStage::Fallback);
    assert_eq!(image.on_error(), None);
    assert_eq!(image.stage(), ImageStage::Failed);
}

#[test]
fn image_equal_to_fallback_does_not_retry() {
    let mut image = ImageLoad::new("images/placeholder.jpg", "images/placeholder.jpg");
    assert_eq!(image.on_error(), None);
}

#[test]
fn generated_catalog_is_usable() {
    assert!(!PROJECT_CATALOG.is_empty());
    assert!(!FALLBACK_PROJECT_IMAGE.is_empty());
    for entry in PROJECT_CATALOG {
        assert!(!entry.title.is_empty());
        assert_ne!(entry.category, "all");
        assert_eq!(entry.category, entry.category.to_ascii_lowercase());
    }
}
