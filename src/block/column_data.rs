//! Typed storage for one engine array variable.
//!
//! A `ColumnData` is a flat, densely packed vector in one of the engine's
//! numeric types. Rank-2 arrays are stored row-major with the column count
//! kept alongside in [`NumericArray`](super::NumericArray).

use std::cmp::Ordering;

use polars::prelude::{NamedFrom, Series};

use crate::dtype::DataType;
use crate::error::{ConvertError, DtypeMismatchSnafu, NullValuesSnafu, UnsupportedDtypeSnafu};
use crate::{IStr, IntoIStr};

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

fn sorted_unique_codes<T: Copy>(
    values: &[T],
    cmp: impl Fn(&T, &T) -> Ordering,
) -> (Vec<T>, Vec<usize>) {
    let mut labels = values.to_vec();
    labels.sort_by(&cmp);
    labels.dedup_by(|a, b| cmp(a, b) == Ordering::Equal);
    let codes = values
        .iter()
        // Every value is present in its own distinct set, so the search
        // always lands on Ok.
        .map(|v| {
            labels
                .binary_search_by(|probe| cmp(probe, v))
                .unwrap_or_else(|i| i)
        })
        .collect();
    (labels, codes)
}

fn take<T: Copy>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i]).collect()
}

fn scatter_values<T: Copy + Default>(
    values: &[T],
    positions: &[usize],
    out_len: usize,
) -> Vec<T> {
    let mut out = vec![T::default(); out_len];
    for (v, &p) in values.iter().zip(positions) {
        out[p] = *v;
    }
    out
}

impl ColumnData {
    pub fn dtype(&self) -> DataType {
        match self {
            ColumnData::I8(_) => DataType::Int8,
            ColumnData::I16(_) => DataType::Int16,
            ColumnData::I32(_) => DataType::Int32,
            ColumnData::I64(_) => DataType::Int64,
            ColumnData::U8(_) => DataType::UInt8,
            ColumnData::U16(_) => DataType::UInt16,
            ColumnData::U32(_) => DataType::UInt32,
            ColumnData::U64(_) => DataType::UInt64,
            ColumnData::F32(_) => DataType::Float,
            ColumnData::F64(_) => DataType::Double,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::I8(v) => v.len(),
            ColumnData::I16(v) => v.len(),
            ColumnData::I32(v) => v.len(),
            ColumnData::I64(v) => v.len(),
            ColumnData::U8(v) => v.len(),
            ColumnData::U16(v) => v.len(),
            ColumnData::U32(v) => v.len(),
            ColumnData::U64(v) => v.len(),
            ColumnData::F32(v) => v.len(),
            ColumnData::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-wise concatenation. Unlike a plain `extend` this refuses to mix
    /// dtypes, naming the mismatch.
    pub fn concat(self, other: &ColumnData, name: &IStr) -> Result<ColumnData, ConvertError> {
        if self.dtype() != other.dtype() {
            return DtypeMismatchSnafu {
                name: name.clone(),
                left: self.dtype(),
                right: other.dtype(),
            }
            .fail();
        }
        Ok(match (self, other) {
            (ColumnData::I8(mut a), ColumnData::I8(b)) => {
                a.extend_from_slice(b);
                ColumnData::I8(a)
            }
            (ColumnData::I16(mut a), ColumnData::I16(b)) => {
                a.extend_from_slice(b);
                ColumnData::I16(a)
            }
            (ColumnData::I32(mut a), ColumnData::I32(b)) => {
                a.extend_from_slice(b);
                ColumnData::I32(a)
            }
            (ColumnData::I64(mut a), ColumnData::I64(b)) => {
                a.extend_from_slice(b);
                ColumnData::I64(a)
            }
            (ColumnData::U8(mut a), ColumnData::U8(b)) => {
                a.extend_from_slice(b);
                ColumnData::U8(a)
            }
            (ColumnData::U16(mut a), ColumnData::U16(b)) => {
                a.extend_from_slice(b);
                ColumnData::U16(a)
            }
            (ColumnData::U32(mut a), ColumnData::U32(b)) => {
                a.extend_from_slice(b);
                ColumnData::U32(a)
            }
            (ColumnData::U64(mut a), ColumnData::U64(b)) => {
                a.extend_from_slice(b);
                ColumnData::U64(a)
            }
            (ColumnData::F32(mut a), ColumnData::F32(b)) => {
                a.extend_from_slice(b);
                ColumnData::F32(a)
            }
            (ColumnData::F64(mut a), ColumnData::F64(b)) => {
                a.extend_from_slice(b);
                ColumnData::F64(a)
            }
            // Dtype equality was checked above.
            _ => unreachable!("dtype equality checked before concatenation"),
        })
    }

    /// Gather elements by flat index, in the given order.
    pub fn take_indices(&self, indices: &[usize]) -> ColumnData {
        match self {
            ColumnData::I8(v) => ColumnData::I8(take(v, indices)),
            ColumnData::I16(v) => ColumnData::I16(take(v, indices)),
            ColumnData::I32(v) => ColumnData::I32(take(v, indices)),
            ColumnData::I64(v) => ColumnData::I64(take(v, indices)),
            ColumnData::U8(v) => ColumnData::U8(take(v, indices)),
            ColumnData::U16(v) => ColumnData::U16(take(v, indices)),
            ColumnData::U32(v) => ColumnData::U32(take(v, indices)),
            ColumnData::U64(v) => ColumnData::U64(take(v, indices)),
            ColumnData::F32(v) => ColumnData::F32(take(v, indices)),
            ColumnData::F64(v) => ColumnData::F64(take(v, indices)),
        }
    }

    /// Sorted distinct values plus per-element rank codes (each element's
    /// 0-based position in the distinct set). Float ordering uses
    /// `total_cmp`.
    pub fn unique_sorted_codes(&self) -> (ColumnData, Vec<usize>) {
        match self {
            ColumnData::I8(v) => {
                let (l, c) = sorted_unique_codes(v, Ord::cmp);
                (ColumnData::I8(l), c)
            }
            ColumnData::I16(v) => {
                let (l, c) = sorted_unique_codes(v, Ord::cmp);
                (ColumnData::I16(l), c)
            }
            ColumnData::I32(v) => {
                let (l, c) = sorted_unique_codes(v, Ord::cmp);
                (ColumnData::I32(l), c)
            }
            ColumnData::I64(v) => {
                let (l, c) = sorted_unique_codes(v, Ord::cmp);
                (ColumnData::I64(l), c)
            }
            ColumnData::U8(v) => {
                let (l, c) = sorted_unique_codes(v, Ord::cmp);
                (ColumnData::U8(l), c)
            }
            ColumnData::U16(v) => {
                let (l, c) = sorted_unique_codes(v, Ord::cmp);
                (ColumnData::U16(l), c)
            }
            ColumnData::U32(v) => {
                let (l, c) = sorted_unique_codes(v, Ord::cmp);
                (ColumnData::U32(l), c)
            }
            ColumnData::U64(v) => {
                let (l, c) = sorted_unique_codes(v, Ord::cmp);
                (ColumnData::U64(l), c)
            }
            ColumnData::F32(v) => {
                let (l, c) = sorted_unique_codes(v, f32::total_cmp);
                (ColumnData::F32(l), c)
            }
            ColumnData::F64(v) => {
                let (l, c) = sorted_unique_codes(v, f64::total_cmp);
                (ColumnData::F64(l), c)
            }
        }
    }

    /// Dense scatter: allocate `out_len` zero-initialized cells and write
    /// `self[i]` into `positions[i]`. Later writes overwrite earlier ones,
    /// so duplicate positions resolve to the last source element.
    pub fn scatter(&self, positions: &[usize], out_len: usize) -> ColumnData {
        match self {
            ColumnData::I8(v) => ColumnData::I8(scatter_values(v, positions, out_len)),
            ColumnData::I16(v) => ColumnData::I16(scatter_values(v, positions, out_len)),
            ColumnData::I32(v) => ColumnData::I32(scatter_values(v, positions, out_len)),
            ColumnData::I64(v) => ColumnData::I64(scatter_values(v, positions, out_len)),
            ColumnData::U8(v) => ColumnData::U8(scatter_values(v, positions, out_len)),
            ColumnData::U16(v) => ColumnData::U16(scatter_values(v, positions, out_len)),
            ColumnData::U32(v) => ColumnData::U32(scatter_values(v, positions, out_len)),
            ColumnData::U64(v) => ColumnData::U64(scatter_values(v, positions, out_len)),
            ColumnData::F32(v) => ColumnData::F32(scatter_values(v, positions, out_len)),
            ColumnData::F64(v) => ColumnData::F64(scatter_values(v, positions, out_len)),
        }
    }

    pub fn to_series(&self, name: &str) -> Series {
        match self {
            ColumnData::I8(v) => Series::new(name.into(), v),
            ColumnData::I16(v) => Series::new(name.into(), v),
            ColumnData::I32(v) => Series::new(name.into(), v),
            ColumnData::I64(v) => Series::new(name.into(), v),
            ColumnData::U8(v) => Series::new(name.into(), v),
            ColumnData::U16(v) => Series::new(name.into(), v),
            ColumnData::U32(v) => Series::new(name.into(), v),
            ColumnData::U64(v) => Series::new(name.into(), v),
            ColumnData::F32(v) => Series::new(name.into(), v),
            ColumnData::F64(v) => Series::new(name.into(), v),
        }
    }

    /// Extract a polars series into owned storage. Nulls and non-numeric
    /// dtypes are rejected — the block model has no missing-value notion.
    pub fn from_series(series: &Series) -> Result<ColumnData, ConvertError> {
        let name: IStr = series.name().as_str().istr();
        if series.null_count() > 0 {
            return NullValuesSnafu { name }.fail();
        }
        let Some(dtype) = DataType::from_polars(series.dtype()) else {
            return UnsupportedDtypeSnafu {
                name,
                dtype: series.dtype().to_string(),
            }
            .fail();
        };
        Ok(match dtype {
            DataType::Int8 => ColumnData::I8(series.i8()?.into_no_null_iter().collect()),
            DataType::Int16 => ColumnData::I16(series.i16()?.into_no_null_iter().collect()),
            DataType::Int32 => ColumnData::I32(series.i32()?.into_no_null_iter().collect()),
            DataType::Int64 => ColumnData::I64(series.i64()?.into_no_null_iter().collect()),
            DataType::UInt8 => ColumnData::U8(series.u8()?.into_no_null_iter().collect()),
            DataType::UInt16 => ColumnData::U16(series.u16()?.into_no_null_iter().collect()),
            DataType::UInt32 => ColumnData::U32(series.u32()?.into_no_null_iter().collect()),
            DataType::UInt64 => ColumnData::U64(series.u64()?.into_no_null_iter().collect()),
            DataType::Float => ColumnData::F32(series.f32()?.into_no_null_iter().collect()),
            DataType::Double => ColumnData::F64(series.f64()?.into_no_null_iter().collect()),
            // `from_polars` never maps onto character data.
            DataType::Char => {
                return UnsupportedDtypeSnafu {
                    name,
                    dtype: series.dtype().to_string(),
                }
                .fail()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IntoIStr;

    #[test]
    fn unique_sorted_codes_ranks_against_distinct_set() {
        let col = ColumnData::I64(vec![5, 2, 5, 9, 2]);
        let (labels, codes) = col.unique_sorted_codes();
        assert_eq!(labels, ColumnData::I64(vec![2, 5, 9]));
        assert_eq!(codes, vec![1, 0, 1, 2, 0]);
    }

    #[test]
    fn unique_sorted_codes_orders_floats_totally() {
        let col = ColumnData::F64(vec![0.5, -1.0, 0.5]);
        let (labels, codes) = col.unique_sorted_codes();
        assert_eq!(labels, ColumnData::F64(vec![-1.0, 0.5]));
        assert_eq!(codes, vec![1, 0, 1]);
    }

    #[test]
    fn scatter_last_write_wins() {
        let col = ColumnData::I32(vec![1, 2]);
        let dense = col.scatter(&[0, 0], 1);
        assert_eq!(dense, ColumnData::I32(vec![2]));
    }

    #[test]
    fn scatter_leaves_unwritten_cells_at_fill() {
        let col = ColumnData::F64(vec![3.5]);
        let dense = col.scatter(&[2], 4);
        assert_eq!(dense, ColumnData::F64(vec![0.0, 0.0, 3.5, 0.0]));
    }

    #[test]
    fn concat_rejects_dtype_mismatch() {
        let a = ColumnData::I32(vec![1]);
        let b = ColumnData::F64(vec![1.0]);
        let err = a.concat(&b, &"v".istr()).unwrap_err();
        assert!(matches!(err, ConvertError::DtypeMismatch { .. }));
    }

    #[test]
    fn concat_appends_rows() {
        let a = ColumnData::I32(vec![1, 2]);
        let b = ColumnData::I32(vec![3]);
        assert_eq!(
            a.concat(&b, &"v".istr()).unwrap(),
            ColumnData::I32(vec![1, 2, 3])
        );
    }

    #[test]
    fn take_indices_gathers_in_order() {
        let col = ColumnData::U16(vec![10, 20, 30, 40]);
        assert_eq!(
            col.take_indices(&[3, 0, 3]),
            ColumnData::U16(vec![40, 10, 40])
        );
    }

    #[test]
    fn series_round_trip() {
        let col = ColumnData::F32(vec![1.0, 2.5]);
        let series = col.to_series("v");
        assert_eq!(ColumnData::from_series(&series).unwrap(), col);
    }

    #[test]
    fn from_series_rejects_non_numeric_dtypes() {
        let series = Series::new("s".into(), &["a", "b"]);
        let err = ColumnData::from_series(&series).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedDtype { .. }));
    }

    #[test]
    fn from_series_rejects_nulls() {
        let series = Series::new("v".into(), &[Some(1.0f64), None]);
        let err = ColumnData::from_series(&series).unwrap_err();
        assert!(matches!(err, ConvertError::NullValues { .. }));
    }
}
