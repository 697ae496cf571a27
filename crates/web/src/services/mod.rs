//! Service layer.
//!
//! - [`license`] - License-key admission behind the [`LicenseAuthority`] trait
//! - [`accounts`] - Login and signup behind the [`AccountGateway`] trait
//! - [`admin_store`] - In-memory key inventory and course shelf

pub mod accounts;
pub mod admin_store;
pub mod license;

pub use accounts::{AccountError, AccountGateway, DemoAccountGateway, LoginRequest, SignupRequest};
pub use admin_store::{CourseDraft, CourseShelf, KeyInventory, ShelfCourse, ShelfError};
pub use license::{DemoLicenseAuthority, LicenseAuthority};
