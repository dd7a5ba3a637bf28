//! # licensegate-database
//!
//! The ledger store: SQLite connection management, migrations, and the
//! [`LedgerStore`] seam with SQL and in-memory implementations.

pub mod connection;
pub mod ledger;
pub mod manager;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;


pub use connection::DatabasePool;
pub use ledger::SqlLedgerStore;
pub use manager::LedgerManager;
pub use memory::MemoryLedgerStore;
pub use migration::run_migrations;
pub use store::{LedgerStore, UsageCommit};
