//! Book catalog store.
//!
//! A [`Catalog`] owns an ordered collection of [`Book`] records and mirrors it
//! to a single storage slot after every mutation. Front ends drive it either
//! through its methods or through typed [`Command`]s, answer confirmation
//! [`Prompt`]s with their own [`Confirm`] implementation, and re-render when
//! the revision from [`Catalog::subscribe`] changes.

mod catalog;
pub mod clock;
pub mod command;
pub mod error;
pub mod models;
pub mod query;
pub mod snapshot;
mod sweep;

pub use crate::catalog::{Catalog, CatalogOptions, DEFAULT_LOAN_PERIOD};
pub use crate::clock::{Clock, ClockHandle, FixedClock, SystemClock};
pub use crate::command::{AutoConfirm, Change, Command, Confirm, Outcome, Prompt};
pub use crate::models::{Book, BookId, Draft, Status, StatusFilter};
pub use crate::query::ScanReport;
pub use crate::sweep::{SWEEP_INTERVAL, spawn_sweeper};
