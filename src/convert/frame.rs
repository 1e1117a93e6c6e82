//! Tabular converter: blocks to tidy polars frames and back.
//!
//! A block maps onto a tidy frame as dimension columns (in block order)
//! followed by attribute columns. A multi-column attribute `a` with C
//! columns is flattened into frame columns `a[0] .. a[C-1]`; the inverse
//! converter regroups them.

use polars::prelude::{Column, DataFrame, IntoColumn};
use snafu::{ensure, OptionExt};
use tracing::debug;

use crate::block::{ColumnData, DataVariableBlock, NumericArray};
use crate::error::{ConvertError, MissingDimensionColumnSnafu, NoDimensionsSnafu};
use crate::{IStr, IntoIStr};

/// Convert one block into a tidy `DataFrame`.
///
/// Row order is exactly the input array order; nothing is sorted or
/// deduplicated.
pub fn block_to_dataframe(block: &DataVariableBlock) -> Result<DataFrame, ConvertError> {
    debug!(
        dims = block.dims().len(),
        attrs = block.attrs().len(),
        rows = block.num_rows(),
        "converting block to dataframe"
    );
    let mut columns: Vec<Column> = Vec::new();
    for (name, array) in block.dims() {
        columns.push(array.data().to_series(name).into_column());
    }
    for (name, array) in block.attrs() {
        if array.num_columns() == 1 {
            columns.push(array.data().to_series(name).into_column());
        } else {
            for col in 0..array.num_columns() {
                let column_name = indexed_name(name, col);
                columns.push(array.column(col).to_series(&column_name).into_column());
            }
        }
    }
    Ok(DataFrame::new(columns)?)
}

/// Convert a tidy `DataFrame` back into a block.
///
/// `dim_columns` names the columns holding coordinate data — the frame
/// itself cannot tell them apart from attributes. An empty list or a name
/// absent from the frame is a precondition failure. Columns named `a[i]`
/// are regrouped into one multi-column attribute `a`.
pub fn dataframe_to_block(
    frame: &DataFrame,
    dim_columns: &[IStr],
) -> Result<DataVariableBlock, ConvertError> {
    ensure!(!dim_columns.is_empty(), NoDimensionsSnafu);

    let mut dims: Vec<(IStr, NumericArray)> = Vec::with_capacity(dim_columns.len());
    for name in dim_columns {
        let column = frame
            .column(name)
            .ok()
            .context(MissingDimensionColumnSnafu { name: name.clone() })?;
        let data = ColumnData::from_series(column.as_materialized_series())?;
        dims.push((name.clone(), NumericArray::vector(data)));
    }

    let mut attrs: Vec<(IStr, NumericArray)> = Vec::new();
    let mut grouped: Vec<IStr> = Vec::new();
    for column in frame.get_columns() {
        let full_name = column.name().as_str();
        if dim_columns.iter().any(|d| d.as_ref() == full_name) {
            continue;
        }
        match split_indexed_name(full_name) {
            None => {
                let data = ColumnData::from_series(column.as_materialized_series())?;
                attrs.push((full_name.istr(), NumericArray::vector(data)));
            }
            Some((base, _)) => {
                if grouped.iter().any(|g| g.as_ref() == base) {
                    continue;
                }
                let array = regroup_columns(frame, base)?;
                grouped.push(base.istr());
                attrs.push((base.istr(), array));
            }
        }
    }

    DataVariableBlock::new(dims, attrs)
}

fn indexed_name(base: &str, index: usize) -> String {
    format!("{base}[{index}]")
}

/// Parse `a[3]` into `("a", 3)`; anything else is an unindexed name.
fn split_indexed_name(name: &str) -> Option<(&str, usize)> {
    let open = name.rfind('[')?;
    let inner = name.strip_suffix(']')?.get(open + 1..)?;
    let index: usize = inner.parse().ok()?;
    Some((&name[..open], index))
}

/// Gather every `base[i]` column of the frame into one row-major
/// multi-column array.
fn regroup_columns(frame: &DataFrame, base: &str) -> Result<NumericArray, ConvertError> {
    let mut parts: Vec<(usize, ColumnData)> = Vec::new();
    for column in frame.get_columns() {
        if let Some((b, index)) = split_indexed_name(column.name().as_str()) {
            if b == base {
                let data = ColumnData::from_series(column.as_materialized_series())?;
                parts.push((index, data));
            }
        }
    }
    parts.sort_by_key(|(index, _)| *index);

    let num_columns = parts.len();
    let rows = parts.first().map(|(_, data)| data.len()).unwrap_or(0);
    let name: IStr = base.istr();

    // Column-major concatenation followed by a row-major gather.
    let mut parts = parts.into_iter();
    let Some((_, mut column_major)) = parts.next() else {
        return NumericArray::new(ColumnData::F64(Vec::new()), 1);
    };
    for (_, data) in parts {
        column_major = column_major.concat(&data, &name)?;
    }

    let mut indices = Vec::with_capacity(rows * num_columns);
    for row in 0..rows {
        for col in 0..num_columns {
            indices.push(col * rows + row);
        }
    }
    NumericArray::new(column_major.take_indices(&indices), num_columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::DataVariable;
    use polars::df;

    fn sample_block() -> DataVariableBlock {
        DataVariableBlock::from_variables([
            DataVariable::dimension("x", ColumnData::I64(vec![0, 0, 1, 1])),
            DataVariable::dimension("y", ColumnData::I64(vec![0, 1, 0, 1])),
            DataVariable::attribute(
                "v",
                NumericArray::vector(ColumnData::F64(vec![10.0, 20.0, 30.0, 40.0])),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn dims_come_first_in_input_order() {
        let df = block_to_dataframe(&sample_block()).unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["x", "y", "v"]);
        assert_eq!(df.height(), 4);
    }

    #[test]
    fn row_order_is_preserved() {
        let df = block_to_dataframe(&sample_block()).unwrap();
        let v = ColumnData::from_series(df.column("v").unwrap().as_materialized_series()).unwrap();
        assert_eq!(v, ColumnData::F64(vec![10.0, 20.0, 30.0, 40.0]));
    }

    #[test]
    fn matrix_attribute_is_flattened_into_indexed_columns() {
        let block = DataVariableBlock::from_variables([
            DataVariable::dimension("t", ColumnData::I64(vec![0, 1])),
            DataVariable::attribute(
                "vel",
                NumericArray::new(ColumnData::F32(vec![1.0, 2.0, 3.0, 4.0]), 2).unwrap(),
            ),
        ])
        .unwrap();
        let df = block_to_dataframe(&block).unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["t", "vel[0]", "vel[1]"]);
        let col1 =
            ColumnData::from_series(df.column("vel[1]").unwrap().as_materialized_series()).unwrap();
        assert_eq!(col1, ColumnData::F32(vec![2.0, 4.0]));
    }

    #[test]
    fn round_trip_preserves_block() {
        let block = sample_block();
        let df = block_to_dataframe(&block).unwrap();
        let back = dataframe_to_block(&df, &["x".istr(), "y".istr()]).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn round_trip_regroups_matrix_attributes() {
        let block = DataVariableBlock::from_variables([
            DataVariable::dimension("t", ColumnData::I64(vec![0, 1])),
            DataVariable::attribute(
                "vel",
                NumericArray::new(ColumnData::F32(vec![1.0, 2.0, 3.0, 4.0]), 2).unwrap(),
            ),
        ])
        .unwrap();
        let df = block_to_dataframe(&block).unwrap();
        let back = dataframe_to_block(&df, &["t".istr()]).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn missing_dimension_column_is_an_error() {
        let df = df! { "x" => [0i64], "v" => [1.0f64] }.unwrap();
        let err = dataframe_to_block(&df, &["z".istr()]).unwrap_err();
        assert!(matches!(err, ConvertError::MissingDimensionColumn { .. }));
    }

    #[test]
    fn empty_dimension_list_is_an_error() {
        let df = df! { "x" => [0i64] }.unwrap();
        let err = dataframe_to_block(&df, &[]).unwrap_err();
        assert!(matches!(err, ConvertError::NoDimensions));
    }

    #[test]
    fn split_indexed_name_parses() {
        assert_eq!(split_indexed_name("a[0]"), Some(("a", 0)));
        assert_eq!(split_indexed_name("a[12]"), Some(("a", 12)));
        assert_eq!(split_indexed_name("a"), None);
        assert_eq!(split_indexed_name("a[x]"), None);
    }
}
