//! Result-converter engine: turns [`DataVariableBlock`]s into analysis-ready
//! structures.
//!
//! Two converters are registered: a tabular one producing a tidy polars
//! `DataFrame` and a dense one producing labeled multidimensional arrays
//! with a presence mask. Dispatch is by the enumerated [`TargetFormat`] tag;
//! parsing an unrecognized tag fails naming it.

mod frame;
mod labeled;

pub use frame::{block_to_dataframe, dataframe_to_block};
pub use labeled::{block_to_labeled, LabeledArray, LabeledArraySet, COLUMN_AXIS};

use std::str::FromStr;

use polars::prelude::DataFrame;

use crate::block::DataVariableBlock;
use crate::error::{ConvertError, UnknownTargetSnafu};

/// Which output structure a conversion should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    /// Tidy tabular frame: dimension columns followed by attribute columns.
    DataFrame,
    /// Dense labeled arrays indexed by distinct sorted coordinate values.
    Labeled,
}

impl FromStr for TargetFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dataframe" => Ok(TargetFormat::DataFrame),
            "labeled" => Ok(TargetFormat::Labeled),
            other => UnknownTargetSnafu { target: other }.fail(),
        }
    }
}

/// Output of [`convert`], one variant per target format.
#[derive(Debug, Clone)]
pub enum ConverterOutput {
    DataFrame(DataFrame),
    Labeled(LabeledArraySet),
}

/// Run the converter registered for `target` over one block.
pub fn convert(
    block: &DataVariableBlock,
    target: TargetFormat,
) -> Result<ConverterOutput, ConvertError> {
    match target {
        TargetFormat::DataFrame => Ok(ConverterOutput::DataFrame(block_to_dataframe(block)?)),
        TargetFormat::Labeled => Ok(ConverterOutput::Labeled(block_to_labeled(block)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{ColumnData, DataVariable, NumericArray};

    fn sample_block() -> DataVariableBlock {
        DataVariableBlock::from_variables([
            DataVariable::dimension("x", ColumnData::I64(vec![0, 1])),
            DataVariable::attribute("v", NumericArray::vector(ColumnData::F64(vec![1.0, 2.0]))),
        ])
        .unwrap()
    }

    #[test]
    fn target_format_parses_known_tags() {
        assert_eq!("dataframe".parse::<TargetFormat>().unwrap(), TargetFormat::DataFrame);
        assert_eq!("labeled".parse::<TargetFormat>().unwrap(), TargetFormat::Labeled);
    }

    #[test]
    fn unknown_tag_fails_naming_it() {
        let err = "parquet".parse::<TargetFormat>().unwrap_err();
        assert!(matches!(err, ConvertError::UnknownTarget { ref target } if target == "parquet"));
    }

    #[test]
    fn dispatch_returns_matching_variant() {
        let block = sample_block();
        assert!(matches!(
            convert(&block, TargetFormat::DataFrame).unwrap(),
            ConverterOutput::DataFrame(_)
        ));
        assert!(matches!(
            convert(&block, TargetFormat::Labeled).unwrap(),
            ConverterOutput::Labeled(_)
        ));
    }
}
