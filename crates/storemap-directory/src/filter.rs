//! Name and category filtering for the presented store list.

use std::collections::BTreeSet;

use storemap_core::ResolvedStore;

/// A user's list filter. Empty or absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreFilter {
    pub name_query: Option<String>,
    pub category: Option<String>,
}

impl StoreFilter {
    #[must_use]
    pub fn new(name_query: Option<String>, category: Option<String>) -> Self {
        Self {
            name_query,
            category,
        }
    }

    /// Case-insensitive substring match on the name, and exact match on the
    /// category when one is selected. The query is used as typed, surrounding
    /// spaces included.
    #[must_use]
    pub fn matches(&self, store: &ResolvedStore) -> bool {
        let name_ok = match self.name_query.as_deref() {
            None | Some("") => true,
            Some(query) => store
                .name()
                .to_lowercase()
                .contains(&query.to_lowercase()),
        };
        let category_ok = match self.category.as_deref() {
            None | Some("") => true,
            Some(category) => store.category() == category,
        };
        name_ok && category_ok
    }

    /// Keeps matching stores, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, stores: &'a [ResolvedStore]) -> Vec<&'a ResolvedStore> {
        stores.iter().filter(|store| self.matches(store)).collect()
    }
}

/// Distinct non-empty categories in ascending order, for a category picker.
#[must_use]
pub fn category_options<'a, I>(categories: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    categories
        .into_iter()
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
