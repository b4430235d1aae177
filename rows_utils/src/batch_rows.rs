use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchReader};

use crate::api::{CollectableRow, ColumnType, Rows, ScanStruct};
use crate::errors::RowsError;
use crate::types::ScanDest;
use crate::util::ArrayCellRef;

/// [Rows] over a stream of arrow record batches.
///
/// Batches are pulled from the stream lazily, one at a time.
/// An error in the stream ends the iteration and is reported by [Rows::err].
pub struct BatchRows<I> {
    schema: SchemaRef,
    batches: Option<I>,

    current: Option<RecordBatch>,
    row_number: usize,

    totals: Option<RecordBatch>,
    error: Option<RowsError>,
}

impl<I> BatchRows<I>
where
    I: Iterator<Item = Result<RecordBatch, ArrowError>>,
{
    pub fn new<B>(schema: SchemaRef, batches: B) -> Self
    where
        B: IntoIterator<IntoIter = I>,
    {
        BatchRows {
            schema,
            batches: Some(batches.into_iter()),
            current: None,
            row_number: 0,
            totals: None,
            error: None,
        }
    }

    /// Attach a totals row: the first row of `totals`, which must have the same schema.
    pub fn with_totals(mut self, totals: RecordBatch) -> Result<Self, RowsError> {
        if totals.schema().fields() != self.schema.fields() {
            return Err(RowsError::DataSchemaMismatch(
                "totals batch has a different schema".into(),
            ));
        }
        if totals.num_rows() == 0 {
            return Err(RowsError::NoTotals);
        }
        self.totals = Some(totals);
        Ok(self)
    }

    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    fn next_batch(&mut self) -> Option<RecordBatch> {
        let batches = self.batches.as_mut()?;

        loop {
            let batch = match Iterator::next(batches) {
                Some(Ok(batch)) => batch,
                Some(Err(e)) => {
                    log::debug!("batch stream failed: {e}");
                    self.error = Some(e.into());
                    break;
                }
                None => break,
            };

            if batch.schema().fields() != self.schema.fields() {
                log::debug!("batch schema mismatch");
                self.error = Some(RowsError::DataSchemaMismatch(format!(
                    "expected {:?}, got {:?}",
                    self.schema,
                    batch.schema()
                )));
                break;
            }

            log::debug!("read batch of {} rows", batch.num_rows());
            if batch.num_rows() > 0 {
                return Some(batch);
            }
        }

        // stream is done, release it
        self.batches = None;
        None
    }

    fn scan_row(
        &self,
        batch: &RecordBatch,
        row_number: usize,
        dest: &mut [&mut dyn ScanDest],
    ) -> Result<(), RowsError> {
        if dest.len() != batch.num_columns() {
            return Err(RowsError::ColumnCount {
                expected: batch.num_columns(),
                got: dest.len(),
            });
        }

        let cells = ArrayCellRef::vec_from_batch(&self.schema, batch, row_number);
        for (cell, dest) in cells.iter().zip(dest.iter_mut()) {
            cell.transport(&mut **dest)?;
        }
        Ok(())
    }
}

impl<R: RecordBatchReader> BatchRows<R> {
    pub fn from_reader(reader: R) -> Self {
        let schema = reader.schema();
        BatchRows::new(schema, reader)
    }
}

impl<I> CollectableRow for BatchRows<I>
where
    I: Iterator<Item = Result<RecordBatch, ArrowError>>,
{
    type Error = RowsError;

    fn scan(&self, dest: &mut [&mut dyn ScanDest]) -> Result<(), RowsError> {
        let batch = self.current.as_ref().ok_or(RowsError::NoCurrentRow)?;
        self.scan_row(batch, self.row_number, dest)
    }

    fn scan_struct(&self, dest: &mut dyn ScanStruct) -> Result<(), RowsError> {
        let batch = self.current.as_ref().ok_or(RowsError::NoCurrentRow)?;

        for cell in ArrayCellRef::vec_from_batch(&self.schema, batch, self.row_number) {
            let column = cell.field.name();
            let field_dest = dest
                .dest_for(column)
                .ok_or_else(|| RowsError::MissingDestination {
                    column: column.clone(),
                })?;
            cell.transport(field_dest)?;
        }
        Ok(())
    }

    fn column_types(&self) -> Vec<ColumnType> {
        self.schema
            .fields()
            .iter()
            .map(|f| ColumnType::from(f.as_ref()))
            .collect()
    }

    fn totals(&self, dest: &mut [&mut dyn ScanDest]) -> Result<(), RowsError> {
        let totals = self.totals.as_ref().ok_or(RowsError::NoTotals)?;
        self.scan_row(totals, 0, dest)
    }

    fn columns(&self) -> Vec<String> {
        self.schema.fields().iter().map(|f| f.name().clone()).collect()
    }
}

impl<I> Rows for BatchRows<I>
where
    I: Iterator<Item = Result<RecordBatch, ArrowError>>,
{
    fn next(&mut self) -> bool {
        if let Some(batch) = &self.current {
            if self.row_number + 1 < batch.num_rows() {
                self.row_number += 1;
                return true;
            }
        }

        self.current = self.next_batch();
        self.row_number = 0;
        self.current.is_some()
    }

    fn err(&mut self) -> Result<(), RowsError> {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn close(&mut self) -> Result<(), RowsError> {
        self.batches = None;
        self.current = None;
        Ok(())
    }
}
