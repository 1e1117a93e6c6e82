//! Primitive value specifications: literals, ranges, intervals.

use snafu::ensure;

use crate::dtype::DataType;
use crate::error::{InvalidRangeSnafu, SchemaError, TypeMismatchSnafu};
use crate::schema::{QueryFragment, Scalar};

/// An ordered sequence of scalar values with a primitive type tag.
///
/// Values are comma-joined in serialization and double-quoted iff the
/// declared type is [`DataType::Char`].
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    values: Vec<Scalar>,
    data_type: DataType,
}

impl Literal {
    pub fn new(
        values: impl IntoIterator<Item = impl Into<Scalar>>,
        data_type: DataType,
    ) -> Result<Self, SchemaError> {
        let values: Vec<Scalar> = values.into_iter().map(Into::into).collect();
        for value in &values {
            let supplied = scalar_type(value);
            let representable = match data_type {
                DataType::Char => value.is_textual(),
                DataType::Float | DataType::Double => !value.is_textual(),
                // Integer-typed literals reject textual and fractional
                // values, and anything outside the declared width.
                _ => fits_integer(data_type, value),
            };
            ensure!(
                representable,
                TypeMismatchSnafu {
                    declared: data_type,
                    supplied,
                }
            );
        }
        Ok(Literal { values, data_type })
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }
}

/// Whether an integer scalar fits the value range of a declared integer
/// type. Textual and fractional scalars never do.
fn fits_integer(data_type: DataType, value: &Scalar) -> bool {
    let v: i128 = match value {
        Scalar::Int(v) => *v as i128,
        Scalar::UInt(v) => *v as i128,
        Scalar::Float(_) | Scalar::Str(_) => return false,
    };
    let (min, max): (i128, i128) = match data_type {
        DataType::Int8 => (i8::MIN as i128, i8::MAX as i128),
        DataType::Int16 => (i16::MIN as i128, i16::MAX as i128),
        DataType::Int32 => (i32::MIN as i128, i32::MAX as i128),
        DataType::Int64 => (i64::MIN as i128, i64::MAX as i128),
        DataType::UInt8 => (0, u8::MAX as i128),
        DataType::UInt16 => (0, u16::MAX as i128),
        DataType::UInt32 => (0, u32::MAX as i128),
        DataType::UInt64 => (0, u64::MAX as i128),
        DataType::Char | DataType::Float | DataType::Double => return false,
    };
    (min..=max).contains(&v)
}

fn scalar_type(value: &Scalar) -> DataType {
    match value {
        Scalar::Int(_) => DataType::Int64,
        Scalar::UInt(_) => DataType::UInt64,
        Scalar::Float(_) => DataType::Double,
        Scalar::Str(_) => DataType::Char,
    }
}

impl QueryFragment for Literal {
    fn query_fragment(&self) -> String {
        let quote = self.data_type == DataType::Char;
        let values = self
            .values
            .iter()
            .map(|v| {
                if quote {
                    format!("\"{v}\"")
                } else {
                    v.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(",");
        format!("literal({values})")
    }
}

/// An increasing arithmetic progression, optionally repeated.
///
/// Serializes as the quoted payload `"start:step:stop:repetitions"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    start: i64,
    stop: i64,
    step: i64,
    num_repetitions: u64,
}

impl Range {
    pub fn new(start: i64, stop: i64, step: i64, num_repetitions: u64) -> Result<Self, SchemaError> {
        ensure!(
            0 <= start && start < stop,
            InvalidRangeSnafu {
                msg: format!("start must satisfy 0 <= start < stop, got start={start}, stop={stop}"),
            }
        );
        ensure!(
            num_repetitions > 0,
            InvalidRangeSnafu {
                msg: "the number of repetitions must be greater than 0".to_string(),
            }
        );
        Ok(Range {
            start,
            stop,
            step,
            num_repetitions,
        })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn stop(&self) -> i64 {
        self.stop
    }
}

impl QueryFragment for Range {
    fn query_fragment(&self) -> String {
        format!(
            "\"{}:{}:{}:{}\"",
            self.start, self.step, self.stop, self.num_repetitions
        )
    }
}

/// Value domain of an implicit dimension: start, stop, and step.
///
/// Unlike [`Range`] this enforces no ordering or positivity on its fields;
/// implicit dimensions may be declared over descending or irregular
/// intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalRange {
    pub start: Scalar,
    pub stop: Scalar,
    pub step: Scalar,
}

impl IntervalRange {
    pub fn new(start: impl Into<Scalar>, stop: impl Into<Scalar>, step: impl Into<Scalar>) -> Self {
        IntervalRange {
            start: start.into(),
            stop: stop.into(),
            step: step.into(),
        }
    }
}

/// Boundaries of a contiguous index interval for a subtar slice.
///
/// `is_physical` distinguishes index-space addressing (memory position) from
/// value-space addressing (logical dimension value). Logical bounds carry a
/// `#` prefix in serialization; the two modes are never mixed within one
/// range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub start: i64,
    pub stop: i64,
    pub is_physical: bool,
}

impl IndexRange {
    pub fn new(start: i64, stop: i64, is_physical: bool) -> Self {
        IndexRange {
            start,
            stop,
            is_physical,
        }
    }

    pub(crate) fn prefix(&self) -> &'static str {
        if self.is_physical {
            ""
        } else {
            "#"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_numeric_fragment() {
        let lit = Literal::new([1i64, 2, 3], DataType::Int32).unwrap();
        assert_eq!(lit.query_fragment(), "literal(1,2,3)");
    }

    #[test]
    fn literal_char_values_are_quoted() {
        let lit = Literal::new(["a", "b"], DataType::Char).unwrap();
        assert_eq!(lit.query_fragment(), "literal(\"a\",\"b\")");
    }

    #[test]
    fn literal_rejects_unrepresentable_values() {
        assert!(Literal::new([1.5f64], DataType::Int32).is_err());
        assert!(Literal::new(["x"], DataType::Double).is_err());
        assert!(Literal::new([1i64], DataType::Char).is_err());
        assert!(Literal::new([1.5f64], DataType::Float).is_ok());
    }

    #[test]
    fn literal_unsigned_rejects_negative_values() {
        assert!(Literal::new([-5i64], DataType::UInt8).is_err());
        assert!(Literal::new([-1i64], DataType::UInt64).is_err());
        assert!(Literal::new([0i64, 255], DataType::UInt8).is_ok());
    }

    #[test]
    fn literal_rejects_values_outside_declared_width() {
        assert!(Literal::new([300i64], DataType::Int8).is_err());
        assert!(Literal::new([70000i64], DataType::Int16).is_err());
        assert!(Literal::new([256i64], DataType::UInt8).is_err());
        assert!(Literal::new([u64::MAX], DataType::Int64).is_err());
        assert!(Literal::new([-128i64, 127], DataType::Int8).is_ok());
    }

    #[test]
    fn range_fragment_field_order() {
        let range = Range::new(1, 5, 2, 2).unwrap();
        assert_eq!(range.query_fragment(), "\"1:2:5:2\"");
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        assert!(Range::new(5, 3, 1, 1).is_err());
        assert!(Range::new(-1, 3, 1, 1).is_err());
        assert!(Range::new(3, 3, 1, 1).is_err());
    }

    #[test]
    fn range_rejects_zero_repetitions() {
        assert!(Range::new(0, 5, 1, 0).is_err());
    }

    #[test]
    fn interval_range_allows_descending() {
        // No invariant on step or ordering; this must construct.
        let ir = IntervalRange::new(9, 1, -2);
        assert_eq!(ir.start, Scalar::Int(9));
    }

    #[test]
    fn index_range_prefix() {
        assert_eq!(IndexRange::new(0, 9, true).prefix(), "");
        assert_eq!(IndexRange::new(0, 9, false).prefix(), "#");
    }
}
