//! Ownership aggregation and statistics.
//!
//! This module folds item records into per-owner aggregates and
//! computes the summary block of the statistics report.

use crate::models::{ItemRecord, OwnerAggregate, OwnershipDistribution, Summary};
use std::collections::HashMap;

/// Fold items into owner aggregates, sorted by count (highest first).
///
/// Items without an address are skipped. Owners with equal counts keep
/// the order in which they were first seen.
pub fn calculate_ownership_stats(items: &[ItemRecord]) -> Vec<OwnerAggregate> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut owners: Vec<OwnerAggregate> = Vec::new();

    for item in items {
        let Some(address) = item.address.as_deref() else {
            continue;
        };

        let slot = *index.entry(address).or_insert_with(|| {
            owners.push(OwnerAggregate::new(address));
            owners.len() - 1
        });
        owners[slot].push(&item.id);
    }

    sort_owners_by_count(&mut owners);
    owners
}

/// Sort owners by count, descending. `sort_by` is stable.
pub fn sort_owners_by_count(owners: &mut [OwnerAggregate]) {
    owners.sort_by(|a, b| b.count.cmp(&a.count));
}

/// Get the first N owners of an already sorted list.
pub fn top_owners(owners: &[OwnerAggregate], n: usize) -> Vec<OwnerAggregate> {
    owners.iter().take(n).cloned().collect()
}

/// Build the summary block.
pub fn summarize(total_items: usize, owners: &[OwnerAggregate], top_n: usize) -> Summary {
    Summary {
        total_doginals: total_items,
        unique_owners: owners.len(),
        top_owners: top_owners(owners, top_n),
        ownership_distribution: OwnershipDistribution::from_owners(owners),
    }
}

/// Number of items carrying an address.
pub fn owned_item_count(items: &[ItemRecord]) -> usize {
    items.iter().filter(|i| i.address.is_some()).count()
}
