//! # lotledger Testkit
//!
//! Testing utilities for the stock ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: ledgers over memory, in-memory SQLite and file-backed SQLite
//! - **Generators**: Proptest strategies for item keys and movement plans
//!
//! The property and concurrency suites under `tests/` are built on both.
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use lotledger_testkit::generators::movement_plan;
//!
//! proptest! {
//!     #[test]
//!     fn net_is_bounded(plan in movement_plan(10)) {
//!         prop_assert!(plan.low_water_mark() <= plan.net().min(0));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use lotledger::LedgerConfig;
//! use lotledger_testkit::fixtures::TestFixture;
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let fixture = TestFixture::memory(LedgerConfig::default());
//!     let records = fixture.seed().await;
//!     assert_eq!(records.len(), 4);
//! });
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{init_tracing, sample_items, TestFixture};
pub use generators::{item_key, movement_plan, MovementPlan};
