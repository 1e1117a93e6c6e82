//! Dataset handles: named, typed, rank-<=2 arrays backing the engine.

use snafu::ensure;

use crate::dtype::DataType;
use crate::error::{InvalidColumnCountSnafu, SchemaError, TypeMismatchSnafu};
use crate::schema::values::{Literal, Range};
use crate::schema::{Creatable, Droppable, Named, QueryFragment};
use crate::IStr;

/// Where a dataset's payload comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    /// An array stored in a file. When the file is not already inside the
    /// engine-managed storage area, the path is marked with a leading `@`
    /// and the engine copies it in on creation.
    File {
        path: String,
        in_engine_storage: bool,
    },
    /// Values embedded directly in the command text.
    Literal(Literal),
    /// An arithmetic progression generated by the engine.
    Range(Range),
}

/// A named, typed array handle registered with the engine.
///
/// Constructed client-side, never mutated; after `create_command` is
/// executed the server-side object's lifetime is entirely engine-managed.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: IStr,
    data_type: DataType,
    num_columns: usize,
    source: DatasetSource,
}

impl Dataset {
    pub fn file(
        name: &(impl Named + ?Sized),
        data_type: DataType,
        num_columns: usize,
        path: impl Into<String>,
        in_engine_storage: bool,
    ) -> Result<Self, SchemaError> {
        Self::build(
            name,
            data_type,
            num_columns,
            DatasetSource::File {
                path: path.into(),
                in_engine_storage,
            },
        )
    }

    /// Fails with a type-mismatch error when the declared type disagrees
    /// with the literal's type; a mismatch here is a caller mistake, never
    /// coerced.
    pub fn literal(
        name: &(impl Named + ?Sized),
        data_type: DataType,
        literal: Literal,
        num_columns: usize,
    ) -> Result<Self, SchemaError> {
        ensure!(
            data_type == literal.data_type(),
            TypeMismatchSnafu {
                declared: data_type,
                supplied: literal.data_type(),
            }
        );
        Self::build(name, data_type, num_columns, DatasetSource::Literal(literal))
    }

    pub fn range(
        name: &(impl Named + ?Sized),
        data_type: DataType,
        range: Range,
    ) -> Result<Self, SchemaError> {
        Self::build(name, data_type, 1, DatasetSource::Range(range))
    }

    fn build(
        name: &(impl Named + ?Sized),
        data_type: DataType,
        num_columns: usize,
        source: DatasetSource,
    ) -> Result<Self, SchemaError> {
        let name = name.resolved_name();
        ensure!(num_columns >= 1, InvalidColumnCountSnafu { name: name.clone() });
        Ok(Dataset {
            name,
            data_type,
            num_columns,
            source,
        })
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    fn payload(&self) -> String {
        match &self.source {
            DatasetSource::File {
                path,
                in_engine_storage,
            } => {
                let marker = if *in_engine_storage { "" } else { "@" };
                format!("\"{marker}{path}\"")
            }
            DatasetSource::Literal(literal) => literal.query_fragment(),
            DatasetSource::Range(range) => range.query_fragment(),
        }
    }
}

impl Named for Dataset {
    fn name(&self) -> &str {
        &self.name
    }
}

impl QueryFragment for Dataset {
    fn query_fragment(&self) -> String {
        format!(
            "\"{}:{}:{}\", {}",
            self.name,
            self.data_type.query_str(),
            self.num_columns,
            self.payload()
        )
    }
}

impl Creatable for Dataset {
    fn create_command(&self) -> String {
        format!("CREATE_DATASET({});", self.query_fragment())
    }
}

impl Droppable for Dataset {
    fn drop_command(&self) -> String {
        format!("DROP_DATASET(\"{}\");", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_dataset_outside_storage_gets_marker() {
        let ds = Dataset::file("d", DataType::Int32, 2, "/tmp/array", false).unwrap();
        assert_eq!(
            ds.create_command(),
            "CREATE_DATASET(\"d:int32:2\", \"@/tmp/array\");"
        );
    }

    #[test]
    fn file_dataset_inside_storage_is_unmarked() {
        let ds = Dataset::file("d", DataType::Double, 1, "/savime/array", true).unwrap();
        assert_eq!(
            ds.create_command(),
            "CREATE_DATASET(\"d:double:1\", \"/savime/array\");"
        );
    }

    #[test]
    fn literal_dataset_command() {
        let lit = Literal::new([1i64, 2, 3], DataType::Int32).unwrap();
        let ds = Dataset::literal("d", DataType::Int32, lit, 1).unwrap();
        assert_eq!(
            ds.create_command(),
            "CREATE_DATASET(\"d:int32:1\", literal(1,2,3));"
        );
    }

    #[test]
    fn literal_dataset_type_mismatch_is_rejected() {
        let lit = Literal::new([1.5f64], DataType::Float).unwrap();
        let err = Dataset::literal("d", DataType::Int32, lit, 1).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { .. }));
    }

    #[test]
    fn range_dataset_command() {
        let range = Range::new(1, 5, 1, 2).unwrap();
        let ds = Dataset::range("d", DataType::UInt32, range).unwrap();
        assert_eq!(
            ds.create_command(),
            "CREATE_DATASET(\"d:uint32:1\", \"1:1:5:2\");"
        );
    }

    #[test]
    fn drop_command() {
        let ds = Dataset::file("d", DataType::Int32, 1, "/tmp/a", true).unwrap();
        assert_eq!(ds.drop_command(), "DROP_DATASET(\"d\");");
    }

    #[test]
    fn zero_columns_rejected() {
        assert!(Dataset::file("d", DataType::Int32, 0, "/tmp/a", true).is_err());
    }
}
