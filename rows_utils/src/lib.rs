//! Helpers for reading rows of a database query result into typed values.
//!
//! The cursor interface that database clients provide is described in [api] module.
//!
//! Capabilities:
//! - **Collect**: convert each row into a value and collect them into a [Vec], with [collect_rows] and [append_rows].
//! - **Iterate**: call a function for each row, with [for_each_row].
//! - **Restricted rows**: row functions receive a [api::CollectableRow], which cannot advance or close the cursor.
//! - **Arrow**: [BatchRows] is a cursor over a stream of [arrow::record_batch::RecordBatch]es.
//!
//! Rows are always closed once iteration is done, regardless of whether it succeeded.
//!
//! Example:
//! ```
//! use std::sync::Arc;
//!
//! use rows_utils::arrow::array::{ArrayRef, Int64Array, StringArray};
//! use rows_utils::arrow::record_batch::RecordBatch;
//! use rows_utils::{BatchRows, RowsError};
//!
//! # fn main() -> Result<(), RowsError> {
//! let batch = RecordBatch::try_from_iter([
//!     ("id", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
//!     ("name", Arc::new(StringArray::from(vec!["a", "b"])) as ArrayRef),
//! ])?;
//! let rows = BatchRows::new(batch.schema(), [Ok(batch)]);
//!
//! let names: Vec<(i64, String)> = rows_utils::collect_rows(rows, |row| {
//!     let (mut id, mut name) = (0_i64, String::new());
//!     row.scan(&mut [&mut id, &mut name])?;
//!     Ok::<_, RowsError>((id, name))
//! })?;
//!
//! assert_eq!(names, vec![(1, "a".to_string()), (2, "b".to_string())]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Transitive dependency on arrow
//!
//! If you depend on `rows_utils`, it is recommended not to depend on `arrow`
//! directly, but use re-export from this crate instead.
//!
//! ```
//! use rows_utils::arrow;
//! ```

pub mod api;
mod batch_rows;
mod collect;
mod errors;
pub mod types;
pub mod util;

pub use arrow;
pub use batch_rows::BatchRows;
pub use collect::{append_rows, collect_rows, for_each_row};
pub use errors::*;
