//! Command implementations. Each returns the text to print.

pub mod catalog;
pub mod export;
pub mod key;

use atribot_core::admission::AdmissionError;
use atribot_core::inventory::InventoryError;
use atribot_core::qr::QrError;
use thiserror::Error;

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Admission(#[from] AdmissionError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Qr(#[from] QrError),

    #[error("Invalid license key: {0}")]
    Key(#[from] atribot_core::LicenseKeyError),
}
