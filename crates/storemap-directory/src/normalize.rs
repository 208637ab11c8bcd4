//! Normalization of raw data-source items into [`StoreRecord`]s.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;
use serde_json::Value;
use storemap_core::StoreRecord;

const NAME_FIELD: &str = "aflt_nm";
const ADDRESS_FIELD: &str = "addr";
const CATEGORY_FIELD: &str = "fld";

/// Turns raw items into records ready for geocoding.
///
/// Items without a usable address are dropped; the rest are sorted by name
/// with [`NameOrder::korean`]. The sort is stable, so equal names keep source
/// order.
#[must_use]
pub fn normalize_items(items: &[Value]) -> Vec<StoreRecord> {
    let mut records: Vec<StoreRecord> = items
        .iter()
        .map(extract_record)
        .filter(|record| !record.address.is_empty())
        .collect();
    let order = NameOrder::korean();
    records.sort_by(|a, b| order.compare(&a.name, &b.name));
    records
}

/// Extracts one record. Absent or null fields become empty strings.
#[must_use]
pub fn extract_record(item: &Value) -> StoreRecord {
    StoreRecord {
        name: field_text(item, NAME_FIELD),
        address: field_text(item, ADDRESS_FIELD),
        category: field_text(item, CATEGORY_FIELD),
    }
}

/// Locale-aware ordering for store names.
///
/// Backed by the ICU collator for Korean. If the collator cannot be built,
/// names fall back to a case-insensitive code-point comparison.
pub struct NameOrder {
    collator: Option<Collator>,
}

impl NameOrder {
    #[must_use]
    pub fn korean() -> Self {
        let collator = match Collator::try_new(&locale!("ko").into(), CollatorOptions::new()) {
            Ok(collator) => Some(collator),
            Err(error) => {
                tracing::warn!(error = %error, "collator unavailable; sorting by code point");
                None
            }
        };
        Self { collator }
    }

    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => code_point_order(a, b),
        }
    }
}

impl std::fmt::Debug for NameOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameOrder")
            .field("collator", &self.collator.is_some())
            .finish()
    }
}

/// Lowercase form first; names differing only by case put lowercase first.
fn code_point_order(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

fn field_text(item: &Value, key: &str) -> String {
    match item.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
