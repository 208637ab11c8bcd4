//! Store records as they flow through normalization and geocoding.

use serde::{Deserialize, Serialize};

use crate::geo::GeoCoordinate;

/// A normalized affiliated-store record.
///
/// `address` is always trimmed and non-empty; records that fail this are
/// dropped during normalization and never constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub name: String,
    pub address: String,
    pub category: String,
}

/// A [`StoreRecord`] whose address resolved to a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStore {
    #[serde(flatten)]
    pub record: StoreRecord,
    #[serde(flatten)]
    pub coordinate: GeoCoordinate,
}

impl ResolvedStore {
    #[must_use]
    pub fn new(record: StoreRecord, coordinate: GeoCoordinate) -> Self {
        Self { record, coordinate }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.record.address
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.record.category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_store_serializes_flat() {
        let store = ResolvedStore::new(
            StoreRecord {
                name: "용인상회".to_owned(),
                address: "경기도 용인시 처인구 중부대로 1199".to_owned(),
                category: "음식점".to_owned(),
            },
            GeoCoordinate::new(37.2415, 127.1775),
        );
        let value = serde_json::to_value(&store).unwrap();
        assert_eq!(value["name"], "용인상회");
        assert_eq!(value["category"], "음식점");
        assert_eq!(value["lat"], 37.2415);
        assert_eq!(value["lng"], 127.1775);
    }
}
