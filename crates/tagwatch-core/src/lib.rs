//! # tagwatch-core: Foundational Types
//!
//! This crate defines the types every other tagwatch crate speaks in: the
//! [`ResourceRecord`] loaded from an inventory export, the ordered
//! [`RequiredTags`] policy a dataset is measured against, the grouping
//! [`Dimension`]s used for cost breakdowns, and the [`TagwatchError`]
//! taxonomy surfaced to callers.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for identifiers and policies.** `ResourceId` and
//!    `RequiredTags` have validated constructors. A `RequiredTags` value is
//!    never empty and never contains a duplicate key.
//!
//! 2. **Exact money.** Monthly cost is a `rust_decimal::Decimal`, so cost
//!    sums are exact and group totals always add up to the dataset total.
//!
//! 3. **Single `Dimension` enum.** One definition of the grouping axes,
//!    exhaustive `match` everywhere.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tagwatch-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod dimension;
pub mod error;
pub mod identity;
pub mod record;
pub mod tags;

// Re-export primary types for ergonomic imports.
pub use dimension::{Dimension, UNKNOWN_VALUE};
pub use error::{TagwatchError, ValidationError};
pub use identity::ResourceId;
pub use record::{check_cost, ResourceRecord, MAX_MONTHLY_COST};
pub use rust_decimal::Decimal;
pub use tags::RequiredTags;
