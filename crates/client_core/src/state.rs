//! Displayed list snapshot and the values derived from it.

use serde::de::DeserializeOwned;
use shared::{
    domain::{CategoryId, ItemId},
    protocol::{Category, CategoryRef, Question, PAGE_SIZE},
};

use crate::{error::ListError, ListController};

/// A record the list controller can display.
pub trait ListItem: DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> ItemId;
    fn category(&self) -> Option<CategoryId>;
}

impl ListItem for Question {
    fn id(&self) -> ItemId {
        self.id
    }

    fn category(&self) -> Option<CategoryId> {
        self.category
    }
}

/// Everything currently on screen. Replaced as a whole after every
/// successful remote call, never patched field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u64,
    pub total_count: u64,
    pub active_category: Option<CategoryRef>,
    pub search_term: Option<String>,
    pub categories: Vec<Category>,
    /// Number of successful replacements; zero until the first fetch lands.
    pub revision: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_size: PAGE_SIZE,
            total_count: 0,
            active_category: None,
            search_term: None,
            categories: Vec::new(),
            revision: 0,
        }
    }
}

impl<T> ListState<T> {
    pub fn page_count(&self) -> u32 {
        let pages = self.total_count.div_ceil(self.page_size.max(1));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Highest page that may be requested; page 1 is always allowed.
    pub fn last_page(&self) -> u32 {
        self.page_count().max(1)
    }

    pub fn has_loaded(&self) -> bool {
        self.revision > 0
    }

    /// No category filter or search term narrows `total_count`.
    pub fn is_unfiltered(&self) -> bool {
        self.active_category.is_none() && self.search_term.is_none()
    }

    pub fn pagination_labels(&self) -> impl Iterator<Item = PageLabel> {
        let current = self.page;
        (1..=self.page_count()).map(move |number| PageLabel {
            number,
            active: number == current,
        })
    }

    pub fn category_label(&self, id: CategoryId) -> Result<&str, ListError> {
        self.categories
            .iter()
            .find(|category| category.id == id)
            .map(|category| category.label.as_str())
            .ok_or(ListError::CategoryNotFound(id))
    }
}

/// One entry of the pagination menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLabel {
    pub number: u32,
    pub active: bool,
}

impl PageLabel {
    pub async fn activate<T: ListItem>(self, controller: &ListController<T>) -> Result<(), ListError> {
        controller.load_page(self.number).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_total(total_count: u64, page: u32) -> ListState<Question> {
        ListState {
            total_count,
            page,
            revision: 1,
            ..ListState::default()
        }
    }

    #[test]
    fn twenty_three_items_make_three_pages() {
        let state = state_with_total(23, 2);
        let labels: Vec<PageLabel> = state.pagination_labels().collect();
        assert_eq!(
            labels.iter().map(|label| label.number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        let active: Vec<u32> = labels
            .iter()
            .filter(|label| label.active)
            .map(|label| label.number)
            .collect();
        assert_eq!(active, vec![2]);
    }

    #[test]
    fn empty_total_has_no_labels() {
        let state = state_with_total(0, 1);
        assert_eq!(state.pagination_labels().count(), 0);
        assert_eq!(state.last_page(), 1);
    }

    #[test]
    fn exact_multiple_does_not_add_a_page() {
        assert_eq!(state_with_total(20, 1).page_count(), 2);
        assert_eq!(state_with_total(21, 1).page_count(), 3);
    }

    #[test]
    fn default_state_is_empty_and_unloaded() {
        let state = ListState::<Question>::default();
        assert!(state.items.is_empty());
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 10);
        assert!(!state.has_loaded());
    }

    #[test]
    fn missing_category_is_reported() {
        let mut state = state_with_total(3, 1);
        state.categories = vec![Category {
            id: CategoryId(1),
            label: "Science".into(),
        }];
        assert_eq!(state.category_label(CategoryId(1)).expect("label"), "Science");
        let err = state.category_label(CategoryId(99)).expect_err("absent");
        assert!(matches!(err, ListError::CategoryNotFound(CategoryId(99))));
    }
}
