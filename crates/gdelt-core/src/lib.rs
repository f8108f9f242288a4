//! GDELT Core Library
//!
//! Typed row schema for the GDELT event feed, the value sanitizer, and the
//! row-to-graph-entities mapper. This crate is pure data transformation:
//! no store, no network, no I/O beyond what `csv` readers hand it.

pub mod error;
pub mod mapper;
pub mod row;
pub mod sanitize;

pub use error::{MapError, MapResult};
pub use mapper::{map_row, Document, Edge, RowEntities};
pub use row::EventRow;
pub use sanitize::{sanitize, CellValue, Sanitized};
