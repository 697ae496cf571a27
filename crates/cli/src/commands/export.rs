//! Inventory export command.

use atribot_core::inventory::{InventoryFilter, export_csv, sample_inventory};
use atribot_core::{KeyStatus, LevelId};

/// CSV of the seeded inventory, filtered like the admin license page.
pub fn csv(query: Option<String>, level: Option<LevelId>, status: Option<KeyStatus>) -> String {
    let filter = InventoryFilter {
        search: query.unwrap_or_default(),
        level,
        status,
    };
    let records = sample_inventory();
    export_csv(filter.apply(&records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use atribot_core::inventory::CSV_HEADER;

    #[test]
    fn test_unfiltered_export() {
        let out = csv(None, None, None);
        assert_eq!(out.lines().count(), 6);
        assert!(out.starts_with(CSV_HEADER));
    }

    #[test]
    fn test_status_filter() {
        let out = csv(None, None, Some(KeyStatus::Used));
        assert_eq!(out.lines().count(), 3);
        assert!(out.lines().skip(1).all(|l| l.contains(",Used,")));
    }

    #[test]
    fn test_no_matches_is_header_only() {
        assert_eq!(csv(Some("nope".to_string()), None, None), CSV_HEADER);
    }
}
