//! Value model for raw query results: named array variables grouped into
//! blocks, one block per result batch returned by the connector.

mod column_data;

pub use column_data::ColumnData;

use snafu::{ensure, OptionExt};

use crate::error::{
    ColumnCountMismatchSnafu, ConvertError, DimensionRankSnafu, DuplicateNameSnafu,
    EmptyBlockSequenceSnafu, LengthMismatchSnafu, NameSetMismatchSnafu, RaggedArraySnafu,
};
use crate::{IStr, IntoIStr};

/// A rank-<=2 numeric array stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    data: ColumnData,
    num_columns: usize,
}

impl NumericArray {
    pub fn new(data: ColumnData, num_columns: usize) -> Result<Self, ConvertError> {
        ensure!(
            num_columns >= 1 && data.len() % num_columns == 0,
            RaggedArraySnafu {
                len: data.len(),
                num_columns,
            }
        );
        Ok(NumericArray { data, num_columns })
    }

    /// A single-column (rank-1) array.
    pub fn vector(data: ColumnData) -> Self {
        NumericArray {
            data,
            num_columns: 1,
        }
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn num_rows(&self) -> usize {
        self.data.len() / self.num_columns
    }

    /// One column of a rank-2 array as a rank-1 array.
    pub fn column(&self, col: usize) -> ColumnData {
        let indices: Vec<usize> = (0..self.num_rows())
            .map(|row| row * self.num_columns + col)
            .collect();
        self.data.take_indices(&indices)
    }
}

/// One named array variable from a result block, tagged as carrying either
/// dimension (coordinate) data or attribute (value) data.
#[derive(Debug, Clone, PartialEq)]
pub struct DataVariable {
    pub name: IStr,
    pub array: NumericArray,
    pub is_dimension: bool,
}

impl DataVariable {
    pub fn dimension(name: impl IntoIStr, data: ColumnData) -> Self {
        DataVariable {
            name: name.istr(),
            array: NumericArray::vector(data),
            is_dimension: true,
        }
    }

    pub fn attribute(name: impl IntoIStr, array: NumericArray) -> Self {
        DataVariable {
            name: name.istr(),
            array,
            is_dimension: false,
        }
    }
}

/// An ordered set of dimension arrays plus an ordered set of attribute
/// arrays, all describing the same rows.
///
/// Invariants (checked at construction): names are unique within each
/// mapping, dimension arrays are single-column, and row counts agree within
/// each mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct DataVariableBlock {
    dims: Vec<(IStr, NumericArray)>,
    attrs: Vec<(IStr, NumericArray)>,
}

impl DataVariableBlock {
    pub fn new(
        dims: Vec<(IStr, NumericArray)>,
        attrs: Vec<(IStr, NumericArray)>,
    ) -> Result<Self, ConvertError> {
        check_unique_names(dims.iter().map(|(n, _)| n))?;
        check_unique_names(attrs.iter().map(|(n, _)| n))?;
        for (name, array) in &dims {
            ensure!(array.num_columns() == 1, DimensionRankSnafu { name: name.clone() });
        }
        check_equal_rows(&dims)?;
        check_equal_rows(&attrs)?;
        Ok(DataVariableBlock { dims, attrs })
    }

    /// Build a block from a flat variable sequence, splitting on
    /// `is_dimension` while preserving order. All variables must share one
    /// row count and names must be unique across the whole sequence.
    pub fn from_variables(
        variables: impl IntoIterator<Item = DataVariable>,
    ) -> Result<Self, ConvertError> {
        let mut dims = Vec::new();
        let mut attrs = Vec::new();
        let mut rows: Option<usize> = None;
        for variable in variables {
            let expected = *rows.get_or_insert(variable.array.num_rows());
            ensure!(
                variable.array.num_rows() == expected,
                LengthMismatchSnafu {
                    name: variable.name.clone(),
                    rows: variable.array.num_rows(),
                    expected,
                }
            );
            if variable.is_dimension {
                ensure!(
                    variable.array.num_columns() == 1,
                    DimensionRankSnafu { name: variable.name.clone() }
                );
                dims.push((variable.name, variable.array));
            } else {
                attrs.push((variable.name, variable.array));
            }
        }
        check_unique_names(dims.iter().map(|(n, _)| n).chain(attrs.iter().map(|(n, _)| n)))?;
        Ok(DataVariableBlock { dims, attrs })
    }

    pub fn dims(&self) -> &[(IStr, NumericArray)] {
        &self.dims
    }

    pub fn attrs(&self) -> &[(IStr, NumericArray)] {
        &self.attrs
    }

    /// Row count, taken from the attribute arrays (dimension arrays agree
    /// whenever the block describes actual cells).
    pub fn num_rows(&self) -> usize {
        self.attrs
            .first()
            .map(|(_, a)| a.num_rows())
            .or_else(|| self.dims.first().map(|(_, d)| d.num_rows()))
            .unwrap_or(0)
    }

    /// Row-wise concatenation of blocks sharing the same dimension and
    /// attribute name sequences (and per-name dtype and column count), in
    /// input-block order.
    pub fn concatenate(blocks: &[DataVariableBlock]) -> Result<DataVariableBlock, ConvertError> {
        let first = blocks.first().context(EmptyBlockSequenceSnafu)?;
        for block in &blocks[1..] {
            check_same_names("dimension", first.dims(), block.dims())?;
            check_same_names("attribute", first.attrs(), block.attrs())?;
        }
        let dims = concat_arrays(blocks, |b| b.dims())?;
        let attrs = concat_arrays(blocks, |b| b.attrs())?;
        DataVariableBlock::new(dims, attrs)
    }
}

fn check_unique_names<'a>(names: impl Iterator<Item = &'a IStr>) -> Result<(), ConvertError> {
    let mut seen: Vec<&IStr> = Vec::new();
    for name in names {
        ensure!(
            !seen.contains(&name),
            DuplicateNameSnafu { name: name.clone() }
        );
        seen.push(name);
    }
    Ok(())
}

fn check_equal_rows(arrays: &[(IStr, NumericArray)]) -> Result<(), ConvertError> {
    let Some((_, first)) = arrays.first() else {
        return Ok(());
    };
    for (name, array) in arrays {
        ensure!(
            array.num_rows() == first.num_rows(),
            LengthMismatchSnafu {
                name: name.clone(),
                rows: array.num_rows(),
                expected: first.num_rows(),
            }
        );
    }
    Ok(())
}

fn check_same_names(
    kind: &'static str,
    left: &[(IStr, NumericArray)],
    right: &[(IStr, NumericArray)],
) -> Result<(), ConvertError> {
    let names = |arrays: &[(IStr, NumericArray)]| {
        arrays
            .iter()
            .map(|(n, _)| n.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let same = left.len() == right.len()
        && left
            .iter()
            .zip(right.iter())
            .all(|((ln, _), (rn, _))| ln == rn);
    ensure!(
        same,
        NameSetMismatchSnafu {
            kind,
            left: names(left),
            right: names(right),
        }
    );
    Ok(())
}

fn concat_arrays(
    blocks: &[DataVariableBlock],
    select: impl Fn(&DataVariableBlock) -> &[(IStr, NumericArray)],
) -> Result<Vec<(IStr, NumericArray)>, ConvertError> {
    let first = select(&blocks[0]);
    let mut out: Vec<(IStr, NumericArray)> = Vec::with_capacity(first.len());
    for (key, (name, array)) in first.iter().enumerate() {
        let mut data = array.data().clone();
        for block in &blocks[1..] {
            let (_, other) = &select(block)[key];
            ensure!(
                other.num_columns() == array.num_columns(),
                ColumnCountMismatchSnafu {
                    name: name.clone(),
                    left: array.num_columns(),
                    right: other.num_columns(),
                }
            );
            data = data.concat(other.data(), name)?;
        }
        out.push((name.clone(), NumericArray::new(data, array.num_columns())?));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(x: Vec<i64>, v: Vec<f64>) -> DataVariableBlock {
        DataVariableBlock::from_variables([
            DataVariable::dimension("x", ColumnData::I64(x)),
            DataVariable::attribute("v", NumericArray::vector(ColumnData::F64(v))),
        ])
        .unwrap()
    }

    #[test]
    fn from_variables_splits_on_dimension_flag() {
        let b = block(vec![0, 1], vec![1.0, 2.0]);
        assert_eq!(b.dims().len(), 1);
        assert_eq!(b.attrs().len(), 1);
        assert_eq!(b.num_rows(), 2);
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = DataVariableBlock::from_variables([
            DataVariable::dimension("x", ColumnData::I64(vec![0])),
            DataVariable::attribute("x", NumericArray::vector(ColumnData::F64(vec![1.0]))),
        ])
        .unwrap_err();
        assert!(matches!(err, ConvertError::DuplicateName { .. }));
    }

    #[test]
    fn row_count_mismatch_rejected() {
        let err = DataVariableBlock::from_variables([
            DataVariable::dimension("x", ColumnData::I64(vec![0, 1])),
            DataVariable::attribute("v", NumericArray::vector(ColumnData::F64(vec![1.0]))),
        ])
        .unwrap_err();
        assert!(matches!(err, ConvertError::LengthMismatch { .. }));
    }

    #[test]
    fn multi_column_dimension_rejected() {
        let wide = NumericArray::new(ColumnData::I64(vec![0, 1, 2, 3]), 2).unwrap();
        let err = DataVariableBlock::new(vec![("x".into(), wide)], vec![]).unwrap_err();
        assert!(matches!(err, ConvertError::DimensionRank { .. }));
    }

    #[test]
    fn ragged_array_rejected() {
        assert!(NumericArray::new(ColumnData::I64(vec![0, 1, 2]), 2).is_err());
    }

    #[test]
    fn column_extraction_is_row_major() {
        let m = NumericArray::new(ColumnData::I32(vec![1, 2, 3, 4, 5, 6]), 2).unwrap();
        assert_eq!(m.column(0), ColumnData::I32(vec![1, 3, 5]));
        assert_eq!(m.column(1), ColumnData::I32(vec![2, 4, 6]));
    }

    #[test]
    fn concatenate_sums_rows_per_key() {
        let a = block(vec![0, 1], vec![1.0, 2.0]);
        let b = block(vec![2], vec![3.0]);
        let c = DataVariableBlock::concatenate(&[a, b]).unwrap();
        assert_eq!(c.num_rows(), 3);
        assert_eq!(c.dims()[0].1.data(), &ColumnData::I64(vec![0, 1, 2]));
        assert_eq!(c.attrs()[0].1.data(), &ColumnData::F64(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn concatenate_rejects_differing_dimension_names() {
        let a = block(vec![0], vec![1.0]);
        let b = DataVariableBlock::from_variables([
            DataVariable::dimension("y", ColumnData::I64(vec![0])),
            DataVariable::attribute("v", NumericArray::vector(ColumnData::F64(vec![1.0]))),
        ])
        .unwrap();
        let err = DataVariableBlock::concatenate(&[a, b]).unwrap_err();
        assert!(matches!(err, ConvertError::NameSetMismatch { kind: "dimension", .. }));
    }

    #[test]
    fn concatenate_rejects_dtype_mismatch() {
        let a = block(vec![0], vec![1.0]);
        let b = DataVariableBlock::from_variables([
            DataVariable::dimension("x", ColumnData::I64(vec![0])),
            DataVariable::attribute("v", NumericArray::vector(ColumnData::F32(vec![1.0]))),
        ])
        .unwrap();
        let err = DataVariableBlock::concatenate(&[a, b]).unwrap_err();
        assert!(matches!(err, ConvertError::DtypeMismatch { .. }));
    }

    #[test]
    fn concatenate_rejects_empty_input() {
        let err = DataVariableBlock::concatenate(&[]).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyBlockSequence));
    }
}
