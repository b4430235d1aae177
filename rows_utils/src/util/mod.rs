//! Utilities for reading values out of Apache Arrow arrays.
//! Used by cursor implementations.

pub mod transport;

pub use transport::ArrayCellRef;
