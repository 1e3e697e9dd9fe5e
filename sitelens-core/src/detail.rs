// Detail view state and the two chart projections it displays

use sitelens_client::CrawlItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingBar {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSlice {
    pub name: &'static str,
    pub value: u32,
}

/// Heading counts as `H1..H6` bars. Empty when the backend sent no counts.
pub fn heading_chart(item: &CrawlItem) -> Vec<HeadingBar> {
    item.heading_counts
        .map(|counts| {
            counts
                .levels()
                .iter()
                .map(|(name, count)| HeadingBar {
                    name: name.to_uppercase(),
                    count: *count,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Link categories with a non-zero count.
pub fn link_chart(item: &CrawlItem) -> Vec<LinkSlice> {
    [
        ("Internal Links", item.internal_link_count),
        ("External Links", item.external_link_count),
        ("Inaccessible Links", item.inaccessible_link_count),
    ]
    .into_iter()
    .filter(|(_, value)| *value > 0)
    .map(|(name, value)| LinkSlice { name, value })
    .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailView {
    current_item: Option<CrawlItem>,
    is_open: bool,
    heading_chart: Vec<HeadingBar>,
    link_chart: Vec<LinkSlice>,
}

impl DetailView {
    pub fn open(&mut self, item: CrawlItem) {
        self.heading_chart = heading_chart(&item);
        self.link_chart = link_chart(&item);
        self.current_item = Some(item);
        self.is_open = true;
    }

    /// Projections are left in place; nothing reads them while closed.
    pub fn clear(&mut self) {
        self.current_item = None;
        self.is_open = false;
    }

    pub fn set_open(&mut self, open: bool) {
        self.is_open = open && self.current_item.is_some();
    }

    pub fn current_item(&self) -> Option<&CrawlItem> {
        self.current_item.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn heading_chart(&self) -> &[HeadingBar] {
        &self.heading_chart
    }

    pub fn link_chart(&self) -> &[LinkSlice] {
        &self.link_chart
    }
}
