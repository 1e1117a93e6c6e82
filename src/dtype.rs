//! Primitive data types supported by the engine and their mappings.

use std::fmt;

use polars::prelude::DataType as PlDataType;

/// A primitive data type understood by the SAVIME engine.
///
/// The `query_str` identifiers are the exact spellings used in the textual
/// command grammar (`CREATE_DATASET("name:int32:1", ...)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
}

impl DataType {
    pub fn query_str(&self) -> &'static str {
        match self {
            DataType::Char => "char",
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::UInt8 => "uint8",
            DataType::UInt16 => "uint16",
            DataType::UInt32 => "uint32",
            DataType::UInt64 => "uint64",
            DataType::Float => "float",
            DataType::Double => "double",
        }
    }

    /// Engine type for a numeric polars dtype, `None` for anything the block
    /// model cannot carry.
    pub fn from_polars(dtype: &PlDataType) -> Option<DataType> {
        match dtype {
            PlDataType::Int8 => Some(DataType::Int8),
            PlDataType::Int16 => Some(DataType::Int16),
            PlDataType::Int32 => Some(DataType::Int32),
            PlDataType::Int64 => Some(DataType::Int64),
            PlDataType::UInt8 => Some(DataType::UInt8),
            PlDataType::UInt16 => Some(DataType::UInt16),
            PlDataType::UInt32 => Some(DataType::UInt32),
            PlDataType::UInt64 => Some(DataType::UInt64),
            PlDataType::Float32 => Some(DataType::Float),
            PlDataType::Float64 => Some(DataType::Double),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_identifiers() {
        assert_eq!(DataType::Int32.query_str(), "int32");
        assert_eq!(DataType::Double.query_str(), "double");
        assert_eq!(DataType::Char.to_string(), "char");
    }

    #[test]
    fn polars_dtype_mapping() {
        assert_eq!(
            DataType::from_polars(&PlDataType::Int32),
            Some(DataType::Int32)
        );
        assert_eq!(
            DataType::from_polars(&PlDataType::Float32),
            Some(DataType::Float)
        );
        assert_eq!(
            DataType::from_polars(&PlDataType::Float64),
            Some(DataType::Double)
        );
        assert_eq!(DataType::from_polars(&PlDataType::String), None);
        assert_eq!(DataType::from_polars(&PlDataType::Boolean), None);
    }
}
