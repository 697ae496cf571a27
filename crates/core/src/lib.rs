//! Atribot Core - Domain library for the Atribot learning site.
//!
//! This crate is shared by:
//! - `web` - The learner site and admin back office
//! - `cli` - Command-line tools for keys and the catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no sessions. Latency, persistence and request handling live in `web`.
//!
//! # Modules
//!
//! - [`types`] - Levels, license keys, ids and statuses
//! - [`admission`] - Demo key table and the admission check
//! - [`gate`] - Level gating for courses and lessons
//! - [`catalog`] - Sample courses and lessons
//! - [`activation`] - Kit-activation state machine
//! - [`inventory`] - Admin license records and CSV export
//! - [`progress`] - Completed lessons and learner stats
//! - [`qr`] - QR card payloads and SVG codes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod activation;
pub mod admission;
pub mod catalog;
pub mod gate;
pub mod inventory;
pub mod progress;
pub mod qr;
pub mod types;

pub use types::*;
