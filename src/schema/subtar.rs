//! SubTar load model: one physical data shard binding datasets into a slice
//! of a tar's declared coordinate space.
//!
//! The engine, not this client, enforces that the subtars loaded into a tar
//! are disjoint and together cover its coordinate space.

use crate::schema::values::IndexRange;
use crate::schema::{Loadable, Named, QueryFragment};
use crate::IStr;

/// Binds one target dimension of a tar to an index slice.
///
/// `Ordered` means contiguous implicit indices; `Partial` and `Total` take
/// their index values from a backing dataset, covering part of or the entire
/// declared range respectively.
#[derive(Debug, Clone, PartialEq)]
pub enum SubTarDimension {
    Ordered {
        dimension: IStr,
        range: IndexRange,
    },
    Partial {
        dimension: IStr,
        range: IndexRange,
        dataset: IStr,
    },
    Total {
        dimension: IStr,
        range: IndexRange,
        dataset: IStr,
    },
}

impl SubTarDimension {
    pub fn ordered(dimension: &(impl Named + ?Sized), range: IndexRange) -> Self {
        SubTarDimension::Ordered {
            dimension: dimension.resolved_name(),
            range,
        }
    }

    pub fn partial(
        dimension: &(impl Named + ?Sized),
        range: IndexRange,
        dataset: &(impl Named + ?Sized),
    ) -> Self {
        SubTarDimension::Partial {
            dimension: dimension.resolved_name(),
            range,
            dataset: dataset.resolved_name(),
        }
    }

    pub fn total(
        dimension: &(impl Named + ?Sized),
        range: IndexRange,
        dataset: &(impl Named + ?Sized),
    ) -> Self {
        SubTarDimension::Total {
            dimension: dimension.resolved_name(),
            range,
            dataset: dataset.resolved_name(),
        }
    }
}

impl QueryFragment for SubTarDimension {
    fn query_fragment(&self) -> String {
        match self {
            SubTarDimension::Ordered { dimension, range } => {
                let p = range.prefix();
                format!(
                    "ordered, {}, {}{}, {}{}",
                    dimension, p, range.start, p, range.stop
                )
            }
            SubTarDimension::Partial {
                dimension,
                range,
                dataset,
            } => {
                let p = range.prefix();
                format!(
                    "partial, {}, {}{}, {}{}, {}",
                    dimension, p, range.start, p, range.stop, dataset
                )
            }
            SubTarDimension::Total {
                dimension,
                range,
                dataset,
            } => {
                let p = range.prefix();
                format!(
                    "total, {}, {}{}, {}{}, {}",
                    dimension, p, range.start, p, range.stop, dataset
                )
            }
        }
    }
}

/// Binds a tar attribute to the dataset supplying its values for one subtar.
#[derive(Debug, Clone, PartialEq)]
pub struct SubTarAttribute {
    attribute: IStr,
    dataset: IStr,
}

impl SubTarAttribute {
    pub fn new(attribute: &(impl Named + ?Sized), dataset: &(impl Named + ?Sized)) -> Self {
        SubTarAttribute {
            attribute: attribute.resolved_name(),
            dataset: dataset.resolved_name(),
        }
    }
}

impl QueryFragment for SubTarAttribute {
    fn query_fragment(&self) -> String {
        format!("{}, {}", self.attribute, self.dataset)
    }
}

/// One physical chunk of data loading into a tar.
#[derive(Debug, Clone, PartialEq)]
pub struct SubTar {
    tar: IStr,
    dimensions: Vec<SubTarDimension>,
    attributes: Vec<SubTarAttribute>,
}

impl SubTar {
    pub fn new(
        tar: &(impl Named + ?Sized),
        dimensions: Vec<SubTarDimension>,
        attributes: Vec<SubTarAttribute>,
    ) -> Self {
        SubTar {
            tar: tar.resolved_name(),
            dimensions,
            attributes,
        }
    }
}

impl QueryFragment for SubTar {
    fn query_fragment(&self) -> String {
        let dims = self
            .dimensions
            .iter()
            .map(|d| d.query_fragment())
            .collect::<Vec<_>>()
            .join(" | ");
        let attrs = self
            .attributes
            .iter()
            .map(|a| a.query_fragment())
            .collect::<Vec<_>>()
            .join(" | ");
        format!("\"{}\", \"{}\", \"{}\"", self.tar, dims, attrs)
    }
}

impl Loadable for SubTar {
    fn load_command(&self) -> String {
        format!("LOAD_SUBTAR({});", self.query_fragment())
    }
}
