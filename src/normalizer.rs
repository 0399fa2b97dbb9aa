use crate::model::{GeoRecord, OrderRecord};
use std::collections::HashSet;

/// Orders rows by approval timestamp; rows without one go last, input order kept on ties.
pub fn sort_by_approval(orders: &mut [OrderRecord]) {
    orders.sort_by_key(|o| (o.approved_at.is_none(), o.approved_at));
}

/// Keeps the first row per `customer_unique_id`, preserving source order.
pub fn dedup_customers(locations: Vec<GeoRecord>) -> Vec<GeoRecord> {
    let mut seen = HashSet::new();
    locations
        .into_iter()
        .filter(|loc| seen.insert(loc.customer_unique_id.clone()))
        .collect()
}
