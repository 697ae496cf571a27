//! Admin-side license key inventory.
//!
//! Records here describe printed kit cards for the back office. They are not
//! consulted by admission, and the `used` flag is informational only.

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::types::{KeyStatus, LevelId, LicenseKey};

/// Largest batch the generator accepts.
pub const MAX_BATCH: u32 = 100;

/// Most records a back-office inventory may hold.
pub const MAX_INVENTORY: usize = 1_000;

/// CSV header row.
pub const CSV_HEADER: &str = "Key,Level,Status,Assigned To,Created At";

/// Suggested download name for the export.
pub const CSV_FILENAME: &str = "atribot-license-keys.csv";

/// Inventory errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("batch size must be between 1 and {MAX_BATCH}, got {0}")]
    BatchSize(u32),
    #[error("inventory is full: at most {MAX_INVENTORY} keys")]
    Full,
}

/// Check that `incoming` more records fit beside `current` ones.
///
/// # Errors
///
/// Returns [`InventoryError::Full`] if the total would exceed
/// [`MAX_INVENTORY`].
pub const fn check_capacity(current: usize, incoming: usize) -> Result<(), InventoryError> {
    if current.saturating_add(incoming) > MAX_INVENTORY {
        return Err(InventoryError::Full);
    }
    Ok(())
}

/// One license key known to the back office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseRecord {
    pub id: Uuid,
    /// Stored verbatim; not necessarily canonical.
    pub key: String,
    pub level: LevelId,
    pub used: bool,
    pub assigned_to: Option<String>,
    pub created_at: NaiveDate,
}

impl LicenseRecord {
    /// A fresh, unassigned record.
    #[must_use]
    pub fn new(key: impl Into<String>, level: LevelId, created_at: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            level,
            used: false,
            assigned_to: None,
            created_at,
        }
    }

    #[must_use]
    pub const fn status(&self) -> KeyStatus {
        KeyStatus::from_used(self.used)
    }
}

/// Filters for the admin license table and export.
#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    /// Case-insensitive substring of the key.
    pub search: String,
    pub level: Option<LevelId>,
    pub status: Option<KeyStatus>,
}

impl InventoryFilter {
    #[must_use]
    pub fn matches(&self, record: &LicenseRecord) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty() || record.key.to_lowercase().contains(&needle);
        let level_ok = self.level.is_none_or(|level| record.level == level);
        let status_ok = self.status.is_none_or(|status| record.status() == status);
        search_ok && level_ok && status_ok
    }

    /// Records that pass the filter, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [LicenseRecord]) -> Vec<&'a LicenseRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Records seeded into a fresh back office.
#[must_use]
pub fn sample_inventory() -> Vec<LicenseRecord> {
    let seed = [
        (1, "AB12-CD34-EF56-GH01", LevelId::Level1, Some("user123"), 15),
        (2, "AB12-CD34-EF56-GH02", LevelId::Level2, None, 16),
        (3, "XY98-ZW76-VU54-TS32", LevelId::Level3, None, 17),
        (4, "MN43-OP21-QR09-ST87", LevelId::Level4, Some("user456"), 18),
        (5, "IJ65-KL43-MN21-OP09", LevelId::Level5, None, 19),
    ];

    seed.into_iter()
        .map(|(id, key, level, assigned, day)| LicenseRecord {
            id: Uuid::from_u128(id),
            key: key.to_owned(),
            level,
            used: assigned.is_some(),
            assigned_to: assigned.map(str::to_owned),
            created_at: NaiveDate::from_ymd_opt(2024, 1, day).unwrap_or_default(),
        })
        .collect()
}

/// Generate `count` new unassigned keys for `level`.
///
/// # Errors
///
/// Returns [`InventoryError::BatchSize`] unless `1 <= count <= 100`.
pub fn generate_records<R: Rng>(
    level: LevelId,
    count: u32,
    today: NaiveDate,
    rng: &mut R,
) -> Result<Vec<LicenseRecord>, InventoryError> {
    if !(1..=MAX_BATCH).contains(&count) {
        return Err(InventoryError::BatchSize(count));
    }

    Ok((0..count)
        .map(|_| LicenseRecord::new(LicenseKey::generate(&mut *rng), level, today))
        .collect())
}

/// Render records as CSV.
///
/// Lines are joined with `\n` and there is no trailing newline. Fields are not
/// quoted, so a value containing a comma shifts the columns of its row.
#[must_use]
pub fn export_csv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a LicenseRecord>,
{
    std::iter::once(CSV_HEADER.to_owned())
        .chain(records.into_iter().map(|r| {
            format!(
                "{},{},{},{},{}",
                r.key,
                r.level.name(),
                r.status().label(),
                r.assigned_to.as_deref().unwrap_or(""),
                r.created_at.format("%Y-%m-%d"),
            )
        }))
        .collect::<Vec<_>>()
        .join("\n")
}
