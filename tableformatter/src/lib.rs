//! Table formatter - schema driven rendering of command output
//!
//! Commands describe their output as a [`Table`]: an ordered list of
//! [`Column`]s and rows of loosely typed [`Value`]s. A table can be sorted by
//! column labels and rendered as an aligned text grid, JSON or CSV.

pub mod error;
pub mod render;
pub mod schema;
pub mod table;

pub use error::{Result, TableError};
pub use render::OutputFormat;
pub use schema::{Column, ColumnType, Value};
pub use table::{Row, Table};
