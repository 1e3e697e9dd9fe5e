use sitelens_client::CrawlItem;

/// Checked rows of the current page, in the order they were checked.
///
/// The set only ever holds ids that are present in the page it was last
/// reconciled against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<i64>,
    page_len: usize,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection. Unknown and duplicate ids are dropped.
    pub fn set(&mut self, ids: &[i64], loaded: &[CrawlItem]) {
        let mut next: Vec<i64> = Vec::with_capacity(ids.len());
        for id in ids {
            if !next.contains(id) && loaded.iter().any(|item| item.id == *id) {
                next.push(*id);
            }
        }
        self.ids = next;
        self.recompute(loaded);
    }

    pub fn toggle(&mut self, id: i64, checked: bool, loaded: &[CrawlItem]) {
        let mut ids = self.ids.clone();
        if checked {
            if !ids.contains(&id) {
                ids.push(id);
            }
        } else {
            ids.retain(|existing| *existing != id);
        }
        self.set(&ids, loaded);
    }

    pub fn select_all(&mut self, loaded: &[CrawlItem]) {
        let ids: Vec<i64> = loaded.iter().map(|item| item.id).collect();
        self.set(&ids, loaded);
    }

    /// Drop ids that are no longer on the page.
    pub fn prune(&mut self, loaded: &[CrawlItem]) {
        let ids = self.ids.clone();
        self.set(&ids, loaded);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// True when every row of the last reconciled page is checked.
    pub fn is_all_checked(&self) -> bool {
        self.page_len > 0 && self.ids.len() == self.page_len
    }

    pub fn show_delete_button(&self) -> bool {
        !self.ids.is_empty()
    }

    fn recompute(&mut self, loaded: &[CrawlItem]) {
        self.page_len = loaded.len();
    }
}
