//! Client-side object model for the SAVIME array database.
//!
//! This crate covers three things:
//!
//! - a schema object model (datasets, tars, subtars) that serializes itself
//!   into the engine's textual command grammar,
//! - command-builder functions for the relational/array operators
//!   (`SELECT`, `SUBSET`, `AGGREGATE`, ...),
//! - a result-conversion engine that turns raw array-variable blocks returned
//!   by the engine into polars `DataFrame`s or dense labeled arrays with a
//!   presence mask.
//!
//! The network connector that actually talks to the engine is out of scope;
//! it is consumed through the narrow [`Connector`] trait.

use std::sync::Arc;

pub mod block;
pub mod client;
pub mod command;
pub mod convert;
pub mod dtype;
pub mod error;
pub mod schema;

/// Cheaply clonable interned string, used for dimension/attribute/entity names.
pub type IStr = Arc<str>;

pub trait IntoIStr {
    fn istr(&self) -> IStr;
}

impl IntoIStr for str {
    fn istr(&self) -> IStr {
        Arc::from(self)
    }
}

impl IntoIStr for String {
    fn istr(&self) -> IStr {
        Arc::from(self.as_str())
    }
}

impl IntoIStr for IStr {
    fn istr(&self) -> IStr {
        self.clone()
    }
}

impl<T: IntoIStr + ?Sized> IntoIStr for &T {
    fn istr(&self) -> IStr {
        (**self).istr()
    }
}

pub use block::{ColumnData, DataVariable, DataVariableBlock, NumericArray};
pub use client::{CommandRunner, Connector};
pub use convert::{
    block_to_dataframe, block_to_labeled, dataframe_to_block, convert, ConverterOutput,
    LabeledArray, LabeledArraySet, TargetFormat,
};
pub use dtype::DataType;
pub use error::{ConvertError, SchemaError};
pub use schema::{
    Creatable, Droppable, Loadable, Named, QueryFragment, Scalar,
    dataset::{Dataset, DatasetSource},
    subtar::{SubTar, SubTarAttribute, SubTarDimension},
    tar::{Tar, TarAttribute, TarDimension, TarMetaType, TarMetaTypeBinding},
    values::{IndexRange, IntervalRange, Literal, Range},
};
