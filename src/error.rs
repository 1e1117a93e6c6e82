use snafu::prelude::*;

use crate::dtype::DataType;
use crate::IStr;

/// Construction-time precondition violations in the schema / command layer.
///
/// Every variant is raised synchronously at object-build or command-build
/// time; serialization itself is total over validly constructed objects.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SchemaError {
    #[snafu(display("invalid range: {msg}"))]
    InvalidRange { msg: String },

    #[snafu(display("data type mismatch: declared {declared}, supplied {supplied}"))]
    TypeMismatch {
        declared: DataType,
        supplied: DataType,
    },

    #[snafu(display("'{name}' must have at least one column"))]
    InvalidColumnCount { name: IStr },

    #[snafu(display(
        "malformed argument list for {operator}: {count} arguments cannot be grouped by {group}"
    ))]
    MalformedArguments {
        operator: &'static str,
        count: usize,
        group: usize,
    },

    #[snafu(display("{operator} requires at least one argument"))]
    EmptyArguments { operator: &'static str },
}

/// Error type for the result-converter engine.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConvertError {
    #[snafu(display("unknown converter target: '{target}'"))]
    UnknownTarget { target: String },

    #[snafu(display("at least one dimension column is required"))]
    NoDimensions,

    #[snafu(display("dimension column '{name}' not found in frame"))]
    MissingDimensionColumn { name: IStr },

    #[snafu(display("duplicate variable name: '{name}'"))]
    DuplicateName { name: IStr },

    #[snafu(display("'{name}' has {rows} rows, expected {expected}"))]
    LengthMismatch {
        name: IStr,
        rows: usize,
        expected: usize,
    },

    #[snafu(display("dimension array '{name}' must have exactly one column"))]
    DimensionRank { name: IStr },

    #[snafu(display("array length {len} is not a multiple of the column count {num_columns}"))]
    RaggedArray { len: usize, num_columns: usize },

    #[snafu(display("cannot concatenate an empty sequence of blocks"))]
    EmptyBlockSequence,

    #[snafu(display(
        "blocks must carry the same {kind} names in the same order ('{left}' vs '{right}')"
    ))]
    NameSetMismatch {
        kind: &'static str,
        left: String,
        right: String,
    },

    #[snafu(display("dtype mismatch for '{name}': {left} != {right}"))]
    DtypeMismatch {
        name: IStr,
        left: DataType,
        right: DataType,
    },

    #[snafu(display("column count mismatch for '{name}': {left} != {right}"))]
    ColumnCountMismatch {
        name: IStr,
        left: usize,
        right: usize,
    },

    #[snafu(display("column '{name}' contains null values"))]
    NullValues { name: IStr },

    #[snafu(display("unsupported column dtype for '{name}': {dtype}"))]
    UnsupportedDtype { name: IStr, dtype: String },

    #[snafu(display("dense shape {shape:?} overflows the addressable cell count"))]
    LabeledTooLarge { shape: Vec<usize> },

    #[snafu(context(false))]
    Polars { source: polars::error::PolarsError },
}
