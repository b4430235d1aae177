//! Row cursor interface, as exposed by database clients.
//!
//! The important traits are:
//! - [Rows], a forward-only cursor over the result of a query,
//! - [CollectableRow], the subset of [Rows] that may be used while processing a single row,
//! - [ScanStruct], for records that can be filled by column name.

use arrow::datatypes::{DataType, Field};

use crate::types::ScanDest;

/// The subset of [Rows] methods that a row transform is allowed to call.
///
/// It cannot advance or close the cursor.
pub trait CollectableRow {
    type Error: std::fmt::Debug;

    /// Decode the current row into `dest`, one destination per column.
    fn scan(&self, dest: &mut [&mut dyn ScanDest]) -> Result<(), Self::Error>;

    /// Decode the current row into a record, matching columns by name.
    fn scan_struct(&self, dest: &mut dyn ScanStruct) -> Result<(), Self::Error>;

    fn column_types(&self) -> Vec<ColumnType>;

    /// Decode the totals row of the result into `dest`, one destination per column.
    fn totals(&self, dest: &mut [&mut dyn ScanDest]) -> Result<(), Self::Error>;

    fn columns(&self) -> Vec<String>;
}

/// A forward-only, single-pass cursor over the rows of a query result.
pub trait Rows: CollectableRow {
    /// Advance to the next row. Returns false when there are no more rows.
    fn next(&mut self) -> bool;

    /// Error that has ended the iteration, if it did not end because rows ran out.
    /// Should be checked after [Rows::next] returns false.
    fn err(&mut self) -> Result<(), Self::Error>;

    /// Release resources held by the cursor.
    fn close(&mut self) -> Result<(), Self::Error>;
}

/// A record that exposes a destination for each of the columns it can be filled from.
///
/// Usually implemented with [crate::impl_scan_struct].
pub trait ScanStruct {
    fn dest_for(&mut self, column: &str) -> Option<&mut dyn ScanDest>;
}

/// Describes a column of the result.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnType {
    pub name: String,
    pub database_type_name: String,
    pub nullable: bool,

    /// Type that values of this column are scanned as.
    pub data_type: DataType,
}

impl From<&Field> for ColumnType {
    fn from(field: &Field) -> Self {
        ColumnType {
            name: field.name().clone(),
            database_type_name: field.data_type().to_string(),
            nullable: field.is_nullable(),
            data_type: field.data_type().clone(),
        }
    }
}

impl<R: CollectableRow + ?Sized> CollectableRow for &mut R {
    type Error = R::Error;

    fn scan(&self, dest: &mut [&mut dyn ScanDest]) -> Result<(), Self::Error> {
        (**self).scan(dest)
    }
    fn scan_struct(&self, dest: &mut dyn ScanStruct) -> Result<(), Self::Error> {
        (**self).scan_struct(dest)
    }
    fn column_types(&self) -> Vec<ColumnType> {
        (**self).column_types()
    }
    fn totals(&self, dest: &mut [&mut dyn ScanDest]) -> Result<(), Self::Error> {
        (**self).totals(dest)
    }
    fn columns(&self) -> Vec<String> {
        (**self).columns()
    }
}

impl<R: Rows + ?Sized> Rows for &mut R {
    fn next(&mut self) -> bool {
        (**self).next()
    }
    fn err(&mut self) -> Result<(), Self::Error> {
        (**self).err()
    }
    fn close(&mut self) -> Result<(), Self::Error> {
        (**self).close()
    }
}

impl<R: CollectableRow + ?Sized> CollectableRow for Box<R> {
    type Error = R::Error;

    fn scan(&self, dest: &mut [&mut dyn ScanDest]) -> Result<(), Self::Error> {
        (**self).scan(dest)
    }
    fn scan_struct(&self, dest: &mut dyn ScanStruct) -> Result<(), Self::Error> {
        (**self).scan_struct(dest)
    }
    fn column_types(&self) -> Vec<ColumnType> {
        (**self).column_types()
    }
    fn totals(&self, dest: &mut [&mut dyn ScanDest]) -> Result<(), Self::Error> {
        (**self).totals(dest)
    }
    fn columns(&self) -> Vec<String> {
        (**self).columns()
    }
}

impl<R: Rows + ?Sized> Rows for Box<R> {
    fn next(&mut self) -> bool {
        (**self).next()
    }
    fn err(&mut self) -> Result<(), Self::Error> {
        (**self).err()
    }
    fn close(&mut self) -> Result<(), Self::Error> {
        (**self).close()
    }
}

/// Implements [ScanStruct] for a struct, by listing its fields and the columns they are filled from.
///
/// ```
/// # use rows_utils::impl_scan_struct;
/// #[derive(Default)]
/// struct User {
///     id: u64,
///     name: Option<String>,
/// }
///
/// impl_scan_struct!(User {
///     id => "id",
///     name => "user_name",
/// });
/// ```
#[macro_export]
macro_rules! impl_scan_struct {
    ($ty: ty { $($field: ident => $column: literal),+ $(,)? }) => {
        impl $crate::api::ScanStruct for $ty {
            fn dest_for(&mut self, column: &str) -> Option<&mut dyn $crate::types::ScanDest> {
                match column {
                    $($column => Some(&mut self.$field as &mut dyn $crate::types::ScanDest),)+
                    _ => None,
                }
            }
        }
    };
}
