pub const FILTER_ALL: &str = "all";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    All,
    Category(String),
}

impl Filter {
    pub fn parse(raw: &str) -> Self {
        let key = raw.trim().to_ascii_lowercase();
        if key.is_empty() || key == FILTER_ALL {
            Filter::All
        } else {
            Filter::Category(key)
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Filter::All => FILTER_ALL,
            Filter::Category(key) => key,
        }
    }

    /// `categories` is the card's raw tag list, space or comma separated.
    pub fn matches(&self, categories: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Category(key) => split_categories(categories).any(|tag| tag.eq_ignore_ascii_case(key)),
        }
    }
}

pub fn split_categories(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|ch: char| ch.is_whitespace() || ch == ',')
        .filter(|tag| !tag.is_empty())
}

/// Visibility for each card, in card order.
pub fn partition<'a, I>(filter: &Filter, cards: I) -> Vec<bool>
where
    I: IntoIterator<Item = &'a str>,
{
    cards.into_iter().map(|categories| filter.matches(categories)).collect()
}

/// The row of filter controls; exactly one is active at a time.
#[derive(Clone, Debug)]
pub struct FilterBar {
    filters: Vec<Filter>,
    active: usize,
}

impl FilterBar {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filters: Vec<Filter> = keys.into_iter().map(|key| Filter::parse(key.as_ref())).collect();
        let active = filters
            .iter()
            .position(|filter| *filter == Filter::All)
            .unwrap_or(0);
        Self { filters, active }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.active)
        }
    }

    pub fn active(&self) -> Filter {
        self.filters.get(self.active).cloned().unwrap_or(Filter::All)
    }

    pub fn select(&mut self, index: usize) -> Option<&Filter> {
        if index >= self.filters.len() {
            return None;
        }
        self.active = index;
        self.filters.get(index)
    }

    pub fn select_key(&mut self, key: &str) -> Option<&Filter> {
        let wanted = Filter::parse(key);
        let index = self.filters.iter().position(|filter| *filter == wanted)?;
        self.select(index)
    }
}
