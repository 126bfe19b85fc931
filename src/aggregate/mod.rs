//! Stateless aggregations over a filtered set of deliveries.
//!
//! Functions are grouped by the view that consumes them. Every aggregator
//! takes the filtered rows as `&[&DeliveryRecord]`, ignores row order, and
//! returns an empty collection or `None` when there is nothing to summarise.

pub mod company;
pub mod courier;
pub mod restaurant;

use std::collections::BTreeMap;

use crate::models::DeliveryRecord;

/// Collects `value` per `key`, skipping rows where either is absent. Keys
/// with no values are not created.
pub(crate) fn group_values<K, FK, FV>(rows: &[&DeliveryRecord], key: FK, value: FV) -> BTreeMap<K, Vec<f64>>
where
    K: Ord,
    FK: Fn(&DeliveryRecord) -> Option<K>,
    FV: Fn(&DeliveryRecord) -> Option<f64>,
{
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for &row in rows {
        if let (Some(k), Some(v)) = (key(row), value(row)) {
            groups.entry(k).or_default().push(v);
        }
    }
    groups
}

/// Row count per `key`.
pub(crate) fn count_by<K, FK>(rows: &[&DeliveryRecord], key: FK) -> BTreeMap<K, usize>
where
    K: Ord,
    FK: Fn(&DeliveryRecord) -> Option<K>,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for &row in rows {
        if let Some(k) = key(row) {
            *counts.entry(k).or_default() += 1;
        }
    }
    counts
}
