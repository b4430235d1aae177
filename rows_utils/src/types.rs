//! Values of a single cell and destinations they can be scanned into.

use crate::errors::ScanError;

/// A single decoded cell of a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Binary(Vec<u8>),
    Utf8(String),
}

impl Value {
    /// Name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Boolean(_) => "Boolean",
            Value::Int8(_) => "Int8",
            Value::Int16(_) => "Int16",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Int64",
            Value::UInt8(_) => "UInt8",
            Value::UInt16(_) => "UInt16",
            Value::UInt32(_) => "UInt32",
            Value::UInt64(_) => "UInt64",
            Value::Float32(_) => "Float32",
            Value::Float64(_) => "Float64",
            Value::Binary(_) => "Binary",
            Value::Utf8(_) => "Utf8",
        }
    }
}

/// A place that a cursor can write a decoded cell into.
///
/// Cursors pass these to [crate::api::CollectableRow::scan] as a slice of
/// trait objects, one per column:
/// ```
/// # use rows_utils::types::{ScanDest, Value};
/// let mut id = 0_i64;
/// let mut name: Option<String> = None;
/// let mut dest: [&mut dyn ScanDest; 2] = [&mut id, &mut name];
/// dest[0].scan_value(Value::Int64(7)).unwrap();
/// dest[1].scan_value(Value::Null).unwrap();
/// assert_eq!(id, 7);
/// assert_eq!(name, None);
/// ```
pub trait ScanDest {
    fn scan_value(&mut self, value: Value) -> Result<(), ScanError>;
}

macro_rules! impl_scan_dest {
    ($($native: ty => $variant: ident,)+) => {
        $(
            impl ScanDest for $native {
                fn scan_value(&mut self, value: Value) -> Result<(), ScanError> {
                    match value {
                        Value::$variant(v) => {
                            *self = v;
                            Ok(())
                        }
                        Value::Null => Err(ScanError::UnexpectedNull {
                            target: std::any::type_name::<$native>(),
                        }),
                        other => Err(ScanError::TypeMismatch {
                            value: other.kind(),
                            target: std::any::type_name::<$native>(),
                        }),
                    }
                }
            }
        )+
    };
}

impl_scan_dest!(
    bool => Boolean,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    Vec<u8> => Binary,
    String => Utf8,
);

impl ScanDest for Value {
    fn scan_value(&mut self, value: Value) -> Result<(), ScanError> {
        *self = value;
        Ok(())
    }
}

impl<D: ScanDest + Default> ScanDest for Option<D> {
    fn scan_value(&mut self, value: Value) -> Result<(), ScanError> {
        if let Value::Null = value {
            *self = None;
            return Ok(());
        }

        let mut inner = D::default();
        inner.scan_value(value)?;
        *self = Some(inner);
        Ok(())
    }
}
