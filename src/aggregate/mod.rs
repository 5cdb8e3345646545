//! Grouped statistics over stored results.
//!
//! Records are recomputed from the rows every time; nothing here is cached
//! or persisted.
//!
//! ```
//! use trial_grid::aggregate::{AggregateTable, GroupField, aggregate};
//! use trial_grid::trial::{ResultRow, TrialSpec};
//!
//! let spec = TrialSpec::new(1000, 2);
//! let rows = vec![ResultRow::from_spec(&spec, 12), ResultRow::from_spec(&spec, 3)];
//!
//! let records = aggregate(&rows, &[GroupField::Agent], 12);
//! assert_eq!(records[0].win_rate, 0.5);
//! assert_eq!(records[0].count, 2);
//!
//! let table = AggregateTable::new(vec![GroupField::Agent], records);
//! println!("{}", table.to_markdown());
//! ```
mod group;
mod record;
mod table;

pub use group::{FieldValue, GroupField, GroupKey};
pub use record::{AggregateRecord, aggregate, sort_for_report};
pub use table::{AggregateTable, ColumnMaxima};
