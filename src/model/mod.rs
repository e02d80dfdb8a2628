//! Table model types (nouns)
//!
//! Records, columns and tables consumed and produced by the join and
//! concatenation engines.

mod column;
mod error;
mod formula;
mod record;
mod table;
mod types;

pub use column::{Column, FieldColumn};
pub use error::ColumnError;
pub use formula::{ComputedColumn, FormulaArg, FormulaNode};
pub use record::{Record, RecordRef};
pub use table::{ColumnKind, Table, TableBuilder, TableColumn, TableId};
pub use types::{ConversionError, DataType, ParseDataTypeError, Value};

/// A table of shared records, as loaded by the parser
pub type SourceTable = Table<RecordRef>;
