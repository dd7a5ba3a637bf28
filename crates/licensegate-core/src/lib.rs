//! # licensegate-core
//!
//! Core crate for LicenseGate. Contains configuration schemas, typed
//! identifiers, the timestamp source, and the unified error system.
//!
//! This crate has **no** internal dependencies on other LicenseGate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
