use crate::catalog::ProjectEntry;

pub const BODY_OVERFLOW_LOCKED: &str = "hidden";
pub const BODY_OVERFLOW_UNLOCKED: &str = "auto";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalClick {
    Backdrop,
    Content,
    CloseControl,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalContent {
    pub title: String,
    pub category: String,
    pub description: String,
    pub client: String,
    pub location: String,
    pub year: String,
    pub image: ImageLoad,
}

impl ModalContent {
    pub fn from_entry(entry: &ProjectEntry, fallback_image: &str) -> Self {
        Self {
            title: entry.title.to_string(),
            category: title_case(entry.category),
            description: entry.description.to_string(),
            client: entry.client.unwrap_or("").to_string(),
            location: entry.location.unwrap_or("").to_string(),
            year: entry.year.map(|year| year.to_string()).unwrap_or_default(),
            image: ImageLoad::new(entry.image, fallback_image),
        }
    }
}

fn title_case(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageStage {
    Primary,
    Fallback,
    Failed,
}

/// Primary image first, then the fallback, then give up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageLoad {
    primary: String,
    fallback: String,
    stage: ImageStage,
}

impl ImageLoad {
    pub fn new(primary: &str, fallback: &str) -> Self {
        let primary = primary.trim();
        let stage = if primary.is_empty() {
            ImageStage::Fallback
        } else {
            ImageStage::Primary
        };
        Self {
            primary: primary.to_string(),
            fallback: fallback.trim().to_string(),
            stage,
        }
    }

    pub fn stage(&self) -> ImageStage {
        self.stage
    }

    pub fn current_src(&self) -> Option<&str> {
        match self.stage {
            ImageStage::Primary => Some(&self.primary),
            ImageStage::Fallback if !self.fallback.is_empty() => Some(&self.fallback),
            _ => None,
        }
    }

    /// Advances past a failed load and returns the next source to try.
    pub fn on_error(&mut self) -> Option<&str> {
        self.stage = match self.stage {
            ImageStage::Primary if !self.fallback.is_empty() && self.fallback != self.primary => {
                ImageStage::Fallback
            }
            _ => ImageStage::Failed,
        };
        self.current_src()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ModalState {
    open: Option<usize>,
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn current(&self) -> Option<usize> {
        self.open
    }

    /// Opens the project at `index`; out-of-range clicks leave the modal untouched.
    pub fn open(
        &mut self,
        index: usize,
        catalog: &[ProjectEntry],
        fallback_image: &str,
    ) -> Option<ModalContent> {
        let entry = catalog.get(index)?;
        self.open = Some(index);
        Some(ModalContent::from_entry(entry, fallback_image))
    }

    pub fn close(&mut self) -> bool {
        self.open.take().is_some()
    }

    /// Returns true when the click closed the modal.
    pub fn handle_click(&mut self, click: ModalClick) -> bool {
        match click {
            ModalClick::Backdrop | ModalClick::CloseControl => self.close(),
            ModalClick::Content => false,
        }
    }

    pub fn body_overflow(&self) -> &'static str {
        if self.is_open() {
            BODY_OVERFLOW_LOCKED
        } else {
            BODY_OVERFLOW_UNLOCKED
        }
    }
}
