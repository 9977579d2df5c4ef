//! Data models for ownership aggregation.
//!
//! This module contains the records produced per document, the per-owner
//! aggregates, and the serialized shape of the report files.

use serde::{Deserialize, Serialize};

/// One scanned document and the owner extracted from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Sequence id taken from the filename, e.g. `#17`.
    pub id: String,
    /// Owner address, `None` when absent or unparsable.
    pub address: Option<String>,
}

impl ItemRecord {
    pub fn new(id: impl Into<String>, address: Option<String>) -> Self {
        Self {
            id: id.into(),
            address,
        }
    }
}

/// A document that failed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub file: String,
    pub error: String,
}

impl ErrorRecord {
    pub fn new(file: impl Into<String>, error: impl ToString) -> Self {
        Self {
            file: file.into(),
            error: error.to_string(),
        }
    }
}

/// Everything owned by a single address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerAggregate {
    pub address: String,
    pub count: usize,
    /// Ids in scan order.
    pub owned_ids: Vec<String>,
}

impl OwnerAggregate {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            count: 0,
            owned_ids: Vec::new(),
        }
    }

    /// Records one more owned item.
    pub fn push(&mut self, id: &str) {
        self.count += 1;
        self.owned_ids.push(id.to_string());
    }
}

/// Owners bucketed by how many items they hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipDistribution {
    #[serde(rename = "singleOwners")]
    pub single: usize,
    #[serde(rename = "2-5")]
    pub two_to_five: usize,
    #[serde(rename = "6-10")]
    pub six_to_ten: usize,
    #[serde(rename = "11-20")]
    pub eleven_to_twenty: usize,
    #[serde(rename = "21+")]
    pub over_twenty: usize,
}

impl OwnershipDistribution {
    /// Buckets every owner with a count of at least one.
    pub fn from_owners(owners: &[OwnerAggregate]) -> Self {
        let mut dist = Self::default();

        for owner in owners {
            match owner.count {
                0 => {}
                1 => dist.single += 1,
                2..=5 => dist.two_to_five += 1,
                6..=10 => dist.six_to_ten += 1,
                11..=20 => dist.eleven_to_twenty += 1,
                _ => dist.over_twenty += 1,
            }
        }

        dist
    }

    /// Sum over all buckets.
    pub fn total(&self) -> usize {
        self.single + self.two_to_five + self.six_to_ten + self.eleven_to_twenty + self.over_twenty
    }

    /// Bucket labels and counts in display order.
    pub fn buckets(&self) -> [(&'static str, usize); 5] {
        [
            ("singleOwners", self.single),
            ("2-5", self.two_to_five),
            ("6-10", self.six_to_ten),
            ("11-20", self.eleven_to_twenty),
            ("21+", self.over_twenty),
        ]
    }
}

/// Derived statistics over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_doginals: usize,
    pub unique_owners: usize,
    pub top_owners: Vec<OwnerAggregate>,
    pub ownership_distribution: OwnershipDistribution,
}

/// Contents of the full detail report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnersReport<'a> {
    pub total_processed: usize,
    pub errors: &'a [ErrorRecord],
    pub owners: &'a [ItemRecord],
}

/// Contents of the statistics report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport<'a> {
    pub summary: &'a Summary,
    pub ownership_stats: &'a [OwnerAggregate],
}

/// Result of processing one directory.
#[derive(Debug, Clone, Default)]
pub struct Ownership {
    /// One record per document, in scan order.
    pub items: Vec<ItemRecord>,
    /// Documents and filenames that failed.
    pub errors: Vec<ErrorRecord>,
    /// Owners sorted by count, descending, ties in first-seen order.
    pub owners: Vec<OwnerAggregate>,
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(address: &str, count: usize) -> OwnerAggregate {
        OwnerAggregate {
            address: address.to_string(),
            count,
            owned_ids: (1..=count).map(|i| format!("#{}", i)).collect(),
        }
    }

    #[test]
    fn test_distribution_bucket_edges() {
        let owners = vec![
            owner("a", 1),
            owner("b", 2),
            owner("c", 5),
            owner("d", 6),
            owner("e", 10),
            owner("f", 11),
            owner("g", 20),
            owner("h", 21),
        ];

        let dist = OwnershipDistribution::from_owners(&owners);

        assert_eq!(dist.single, 1);
        assert_eq!(dist.two_to_five, 2);
        assert_eq!(dist.six_to_ten, 2);
        assert_eq!(dist.eleven_to_twenty, 2);
        assert_eq!(dist.over_twenty, 1);
        assert_eq!(dist.total(), owners.len());
    }

    #[test]
    fn test_distribution_serialized_keys() {
        let dist = OwnershipDistribution::from_owners(&[owner("a", 1), owner("b", 3)]);
        let json = serde_json::to_value(dist).unwrap();

        assert_eq!(json["singleOwners"], 1);
        assert_eq!(json["2-5"], 1);
        assert_eq!(json["21+"], 0);
    }

    #[test]
    fn test_item_record_keeps_null_address() {
        let item = ItemRecord::new("#3", None);
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r##"{"id":"#3","address":null}"##);
    }

    #[test]
    fn test_owner_aggregate_push() {
        let mut agg = OwnerAggregate::new("DAddr");
        agg.push("#1");
        agg.push("#4");

        assert_eq!(agg.count, 2);
        assert_eq!(agg.owned_ids, vec!["#1", "#4"]);

        let json = serde_json::to_value(&agg).unwrap();
        assert!(json.get("ownedIds").is_some());
    }
}
