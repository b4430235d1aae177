use std::ops::{Deref, DerefMut};

use crate::api::{CollectableRow, Rows};

/// Iterates through rows, calling `f` for each row.
///
/// Stops at the first error returned by `f`. When rows run out, returns the
/// error reported by [Rows::err], if any. Rows are always closed before returning.
///
/// `f` cannot advance or close the rows:
/// ```compile_fail
/// # use rows_utils::{for_each_row, BatchRows, RowsError};
/// # use rows_utils::arrow::{datatypes::Schema, error::ArrowError, record_batch::RecordBatch};
/// # let rows = BatchRows::new(
/// #     std::sync::Arc::new(Schema::empty()),
/// #     Vec::<Result<RecordBatch, ArrowError>>::new(),
/// # );
/// for_each_row(rows, |row| {
///     row.close()?;
///     Ok::<_, RowsError>(())
/// })
/// .unwrap();
/// ```
pub fn for_each_row<R, E, F>(rows: R, mut f: F) -> Result<(), E>
where
    R: Rows,
    E: From<R::Error>,
    F: FnMut(&dyn CollectableRow<Error = R::Error>) -> Result<(), E>,
{
    log::debug!("reading rows");

    let mut rows = CloseOnDrop { rows };
    let mut row_count = 0;

    while rows.next() {
        log::trace!("reading row {row_count}");

        let row: &dyn CollectableRow<Error = R::Error> = &*rows;
        f(row)?;
        row_count += 1;
    }

    log::debug!("read {row_count} rows");

    rows.err()?;
    Ok(())
}

/// Iterates through rows, calling `f` for each row, and collecting the results into a [Vec].
pub fn collect_rows<T, R, E, F>(rows: R, f: F) -> Result<Vec<T>, E>
where
    R: Rows,
    E: From<R::Error>,
    F: FnMut(&dyn CollectableRow<Error = R::Error>) -> Result<T, E>,
{
    append_rows(Vec::new(), rows, f)
}

/// Iterates through rows, calling `f` for each row, and appending the results to `slice`.
///
/// On error, values collected so far are discarded, together with `slice`.
pub fn append_rows<T, R, E, F>(mut slice: Vec<T>, rows: R, mut f: F) -> Result<Vec<T>, E>
where
    R: Rows,
    E: From<R::Error>,
    F: FnMut(&dyn CollectableRow<Error = R::Error>) -> Result<T, E>,
{
    let res: Result<(), E> = for_each_row(rows, |row| {
        let value = f(row)?;

        slice.push(value);

        Ok(())
    });
    res?;

    Ok(slice)
}

/// Closes the rows when dropped, ignoring any error.
struct CloseOnDrop<R: Rows> {
    rows: R,
}

impl<R: Rows> Deref for CloseOnDrop<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.rows
    }
}

impl<R: Rows> DerefMut for CloseOnDrop<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.rows
    }
}

impl<R: Rows> Drop for CloseOnDrop<R> {
    fn drop(&mut self) {
        log::debug!("closing rows");

        if let Err(e) = self.rows.close() {
            log::debug!("ignoring error while closing rows: {e:?}");
        }
    }
}
