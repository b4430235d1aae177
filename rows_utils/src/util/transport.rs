use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::*;
use arrow::record_batch::RecordBatch;

use crate::errors::RowsError;
use crate::types::{ScanDest, Value};

/// Reference to a single cell of an arrow array.
pub struct ArrayCellRef<'a> {
    pub array: &'a ArrayRef,
    pub field: &'a Field,
    pub row_number: usize,
}

impl<'a> ArrayCellRef<'a> {
    /// References cells of the given row, one for each column of the batch.
    /// The batch must have the given schema.
    pub fn vec_from_batch(
        schema: &'a Schema,
        batch: &'a RecordBatch,
        row_number: usize,
    ) -> Vec<Self> {
        itertools::zip_eq(batch.columns(), schema.fields().iter())
            .map(|(array, field)| ArrayCellRef {
                array,
                field: field.as_ref(),
                row_number,
            })
            .collect()
    }

    /// Decode the value of this cell.
    pub fn produce(&self) -> Result<Value, RowsError> {
        let array: &dyn Array = self.array.as_ref();
        let row = self.row_number;

        if array.is_null(row) {
            return Ok(Value::Null);
        }

        use DataType::*;
        Ok(match array.data_type() {
            Null => Value::Null,
            Boolean => Value::Boolean(array.as_boolean().value(row)),
            Int8 => Value::Int8(array.as_primitive::<Int8Type>().value(row)),
            Int16 => Value::Int16(array.as_primitive::<Int16Type>().value(row)),
            Int32 => Value::Int32(array.as_primitive::<Int32Type>().value(row)),
            Int64 => Value::Int64(array.as_primitive::<Int64Type>().value(row)),
            UInt8 => Value::UInt8(array.as_primitive::<UInt8Type>().value(row)),
            UInt16 => Value::UInt16(array.as_primitive::<UInt16Type>().value(row)),
            UInt32 => Value::UInt32(array.as_primitive::<UInt32Type>().value(row)),
            UInt64 => Value::UInt64(array.as_primitive::<UInt64Type>().value(row)),
            Float32 => Value::Float32(array.as_primitive::<Float32Type>().value(row)),
            Float64 => Value::Float64(array.as_primitive::<Float64Type>().value(row)),
            Binary => Value::Binary(array.as_binary::<i32>().value(row).to_vec()),
            LargeBinary => Value::Binary(array.as_binary::<i64>().value(row).to_vec()),
            Utf8 => Value::Utf8(array.as_string::<i32>().value(row).to_string()),
            LargeUtf8 => Value::Utf8(array.as_string::<i64>().value(row).to_string()),
            ty => return Err(RowsError::UnsupportedType(ty.clone())),
        })
    }

    /// Decode the value of this cell and write it into `dest`.
    pub fn transport(&self, dest: &mut dyn ScanDest) -> Result<(), RowsError> {
        log::trace!("transporting value of type {:?}", self.field.data_type());

        let value = self.produce()?;
        dest.scan_value(value).map_err(|source| RowsError::Scan {
            column: self.field.name().clone(),
            source,
        })
    }
}
