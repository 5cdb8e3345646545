//! Durable storage for result rows.
//!
//! A [`ResultStore`] accumulates rows across runs. Each run loads what is
//! there, appends its batch and writes the merged table back in one atomic
//! replace.
//!
//! ```
//! use trial_grid::store::ResultStore;
//! use trial_grid::trial::{ResultRow, TrialSpec};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = ResultStore::open(dir.path().join("results.csv"));
//!
//! let row = ResultRow::from_spec(&TrialSpec::new(100, 2), 12);
//! assert_eq!(store.append(&[row.clone()]).unwrap(), 1);
//! assert_eq!(store.append(&[row]).unwrap(), 2);
//! ```
pub mod codec;
mod error;
mod result_store;

pub use error::{Result, StoreError};
pub use result_store::ResultStore;
