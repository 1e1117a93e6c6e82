//! Dense converter: sparse coordinate/value rows to labeled dense arrays.
//!
//! Each block row carries one coordinate tuple plus attribute values. The
//! converter maps every dimension onto the sorted set of its distinct
//! coordinate values and scatters the attribute values into a dense array
//! shaped by those label counts. Cells no input row landed on keep the
//! zero fill and are distinguishable from real zeros only through the
//! presence mask.

use smallvec::SmallVec;
use snafu::ensure;
use tracing::debug;

use crate::block::{ColumnData, DataVariableBlock};
use crate::error::{ConvertError, LabeledTooLargeSnafu, LengthMismatchSnafu};
use crate::{IStr, IntoIStr};

/// Name of the synthetic trailing axis added for multi-column attributes.
pub const COLUMN_AXIS: &str = "_0_";

/// One attribute as a dense labeled array.
#[derive(Debug, Clone)]
pub struct LabeledArray {
    pub name: IStr,
    /// Axis names, in dimension order (plus [`COLUMN_AXIS`] last for
    /// multi-column attributes).
    pub dims: Vec<IStr>,
    /// Per-axis labels: the sorted distinct coordinate values.
    pub coords: Vec<ColumnData>,
    pub shape: SmallVec<[usize; 4]>,
    /// Dense cell values, row-major over `shape`.
    pub values: ColumnData,
    /// Presence mask parallel to `values`; `false` marks a cell no input
    /// row wrote to.
    pub mask: Vec<bool>,
}

impl LabeledArray {
    /// Row-major flat offset of a cell, `None` when out of bounds.
    pub fn flat_index(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0usize;
        for (&i, &extent) in index.iter().zip(self.shape.iter()) {
            if i >= extent {
                return None;
            }
            flat = flat * extent + i;
        }
        Some(flat)
    }

    pub fn is_present(&self, index: &[usize]) -> bool {
        self.flat_index(index)
            .map(|flat| self.mask[flat])
            .unwrap_or(false)
    }
}

/// All attributes of one block, densified; input attribute order preserved.
#[derive(Debug, Clone)]
pub struct LabeledArraySet {
    arrays: Vec<LabeledArray>,
}

impl LabeledArraySet {
    pub fn arrays(&self) -> &[LabeledArray] {
        &self.arrays
    }

    pub fn get(&self, name: &str) -> Option<&LabeledArray> {
        self.arrays.iter().find(|a| a.name.as_ref() == name)
    }
}

/// Row-major strides for a dense shape.
fn compute_strides(shape: &[usize]) -> SmallVec<[usize; 4]> {
    let mut strides: SmallVec<[usize; 4]> = SmallVec::from_elem(1, shape.len());
    for i in (0..shape.len()).rev() {
        if i + 1 < shape.len() {
            strides[i] = strides[i + 1] * shape[i + 1];
        }
    }
    strides
}

/// Dense cell count, refusing shapes whose product overflows.
fn checked_dense_len(shape: &[usize]) -> Result<usize, ConvertError> {
    let mut acc: usize = 1;
    for &extent in shape {
        acc = match acc.checked_mul(extent) {
            Some(acc) => acc,
            None => {
                return LabeledTooLargeSnafu {
                    shape: shape.to_vec(),
                }
                .fail()
            }
        };
    }
    Ok(acc)
}

/// Convert one block into dense labeled arrays, one per attribute.
///
/// Duplicate coordinate tuples are not an error: the later input row wins.
pub fn block_to_labeled(block: &DataVariableBlock) -> Result<LabeledArraySet, ConvertError> {
    let rows = block.num_rows();
    debug!(
        dims = block.dims().len(),
        attrs = block.attrs().len(),
        rows,
        "converting block to labeled arrays"
    );

    let dim_names: Vec<IStr> = block.dims().iter().map(|(n, _)| n.clone()).collect();
    let mut dim_coords: Vec<ColumnData> = Vec::with_capacity(dim_names.len());
    let mut dim_codes: Vec<Vec<usize>> = Vec::with_capacity(dim_names.len());
    for (name, array) in block.dims() {
        ensure!(
            array.num_rows() == rows,
            LengthMismatchSnafu {
                name: name.clone(),
                rows: array.num_rows(),
                expected: rows,
            }
        );
        let (labels, codes) = array.data().unique_sorted_codes();
        dim_coords.push(labels);
        dim_codes.push(codes);
    }
    let base_shape: SmallVec<[usize; 4]> = dim_coords.iter().map(|c| c.len()).collect();

    let mut arrays = Vec::with_capacity(block.attrs().len());
    for (attr_name, attr_array) in block.attrs() {
        let num_columns = attr_array.num_columns();

        let mut dims = dim_names.clone();
        let mut coords = dim_coords.clone();
        let mut shape = base_shape.clone();
        if num_columns > 1 {
            // The column axis becomes one more (synthetic) dimension with
            // labels 0..C-1.
            dims.push(COLUMN_AXIS.istr());
            coords.push(ColumnData::I64((0..num_columns as i64).collect()));
            shape.push(num_columns);
        }

        let total = checked_dense_len(&shape)?;
        let strides = compute_strides(&shape);

        // One dense position per flat source entry, in source (row-major)
        // order so later rows overwrite earlier ones at duplicate cells.
        let mut positions = Vec::with_capacity(rows * num_columns);
        for row in 0..rows {
            let cell_base: usize = dim_codes
                .iter()
                .zip(strides.iter())
                .map(|(codes, stride)| codes[row] * stride)
                .sum();
            for col in 0..num_columns {
                let offset = if num_columns > 1 {
                    col * strides[strides.len() - 1]
                } else {
                    0
                };
                positions.push(cell_base + offset);
            }
        }

        let values = attr_array.data().scatter(&positions, total);
        let mut mask = vec![false; total];
        for &position in &positions {
            mask[position] = true;
        }

        arrays.push(LabeledArray {
            name: attr_name.clone(),
            dims,
            coords,
            shape,
            values,
            mask,
        });
    }

    Ok(LabeledArraySet { arrays })
}
