//! Tar schema model: a named multidimensional coordinate space plus its
//! typed attributes. A tar declares shape only; it holds no data.

use snafu::ensure;

use crate::dtype::DataType;
use crate::error::{InvalidColumnCountSnafu, SchemaError};
use crate::schema::values::IntervalRange;
use crate::schema::{Creatable, Droppable, Named, QueryFragment};
use crate::{IStr, IntoIStr};

/// A named semantic shape (dimension/attribute role names) that multiple
/// tars can share. Purely descriptive.
#[derive(Debug, Clone, PartialEq)]
pub struct TarMetaType {
    name: IStr,
    dimension_names: Vec<IStr>,
    attribute_names: Vec<IStr>,
}

impl TarMetaType {
    pub fn new(
        name: &(impl Named + ?Sized),
        dimension_names: impl IntoIterator<Item = impl IntoIStr>,
        attribute_names: impl IntoIterator<Item = impl IntoIStr>,
    ) -> Self {
        TarMetaType {
            name: name.resolved_name(),
            dimension_names: dimension_names.into_iter().map(|n| n.istr()).collect(),
            attribute_names: attribute_names.into_iter().map(|n| n.istr()).collect(),
        }
    }
}

impl Named for TarMetaType {
    fn name(&self) -> &str {
        &self.name
    }
}

impl QueryFragment for TarMetaType {
    fn query_fragment(&self) -> String {
        let names = self
            .dimension_names
            .iter()
            .chain(self.attribute_names.iter())
            .map(|n| n.as_ref())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.name, names)
    }
}

impl Creatable for TarMetaType {
    fn create_command(&self) -> String {
        format!("CREATE_TYPE(\"{}\");", self.query_fragment())
    }
}

impl Droppable for TarMetaType {
    fn drop_command(&self) -> String {
        format!("DROP_TYPE(\"{}\");", self.name)
    }
}

/// One typed attribute living on a tar's coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub struct TarAttribute {
    name: IStr,
    data_type: DataType,
    num_columns: usize,
}

impl TarAttribute {
    pub fn new(
        name: &(impl Named + ?Sized),
        data_type: DataType,
        num_columns: usize,
    ) -> Result<Self, SchemaError> {
        let name = name.resolved_name();
        ensure!(num_columns >= 1, InvalidColumnCountSnafu { name: name.clone() });
        Ok(TarAttribute {
            name,
            data_type,
            num_columns,
        })
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }
}

impl Named for TarAttribute {
    fn name(&self) -> &str {
        &self.name
    }
}

impl QueryFragment for TarAttribute {
    fn query_fragment(&self) -> String {
        format!(
            "{}, {}: {}",
            self.name,
            self.data_type.query_str(),
            self.num_columns
        )
    }
}

/// A tar dimension, either synthesized by the engine from an interval
/// (implicit) or taking its values verbatim from a dataset (explicit).
#[derive(Debug, Clone, PartialEq)]
pub enum TarDimension {
    Implicit {
        name: IStr,
        data_type: DataType,
        interval: IntervalRange,
    },
    Explicit { name: IStr, dataset: IStr },
}

impl TarDimension {
    pub fn implicit(
        name: &(impl Named + ?Sized),
        data_type: DataType,
        interval: IntervalRange,
    ) -> Self {
        TarDimension::Implicit {
            name: name.resolved_name(),
            data_type,
            interval,
        }
    }

    pub fn explicit(name: &(impl Named + ?Sized), dataset: &(impl Named + ?Sized)) -> Self {
        TarDimension::Explicit {
            name: name.resolved_name(),
            dataset: dataset.resolved_name(),
        }
    }
}

impl Named for TarDimension {
    fn name(&self) -> &str {
        match self {
            TarDimension::Implicit { name, .. } => name,
            TarDimension::Explicit { name, .. } => name,
        }
    }
}

impl QueryFragment for TarDimension {
    fn query_fragment(&self) -> String {
        match self {
            TarDimension::Implicit {
                name,
                data_type,
                interval,
            } => format!(
                "implicit, {}, {}, {}, {}, {}",
                name,
                data_type.query_str(),
                interval.start,
                interval.stop,
                interval.step
            ),
            TarDimension::Explicit { name, dataset } => {
                format!("explicit, {name}, {dataset}")
            }
        }
    }
}

/// A meta-type reference together with the (entity name, role name) mapping.
///
/// Carrying both in one struct makes the "meta-type without mapping" state
/// unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub struct TarMetaTypeBinding {
    pub meta_type: IStr,
    pub mapping: Vec<(IStr, IStr)>,
}

impl TarMetaTypeBinding {
    pub fn new(
        meta_type: &(impl Named + ?Sized),
        mapping: impl IntoIterator<Item = (impl IntoIStr, impl IntoIStr)>,
    ) -> Self {
        TarMetaTypeBinding {
            meta_type: meta_type.resolved_name(),
            mapping: mapping
                .into_iter()
                .map(|(k, v)| (k.istr(), v.istr()))
                .collect(),
        }
    }
}

/// A tar: ordered dimension specifications, ordered attribute
/// specifications, and an optional meta-type binding.
///
/// Dimension and attribute order is positionally significant to the engine
/// and is serialized exactly as supplied, never reordered or deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct Tar {
    name: IStr,
    dimensions: Vec<TarDimension>,
    attributes: Vec<TarAttribute>,
    meta_type: Option<TarMetaTypeBinding>,
}

impl Tar {
    pub fn new(
        name: &(impl Named + ?Sized),
        dimensions: Vec<TarDimension>,
        attributes: Vec<TarAttribute>,
    ) -> Self {
        Tar {
            name: name.resolved_name(),
            dimensions,
            attributes,
            meta_type: None,
        }
    }

    pub fn with_meta_type(
        name: &(impl Named + ?Sized),
        dimensions: Vec<TarDimension>,
        attributes: Vec<TarAttribute>,
        binding: TarMetaTypeBinding,
    ) -> Self {
        Tar {
            name: name.resolved_name(),
            dimensions,
            attributes,
            meta_type: Some(binding),
        }
    }

    pub fn dimensions(&self) -> &[TarDimension] {
        &self.dimensions
    }

    pub fn attributes(&self) -> &[TarAttribute] {
        &self.attributes
    }

    fn meta_type_str(&self) -> &str {
        match &self.meta_type {
            Some(binding) => &binding.meta_type,
            None => "*",
        }
    }

    fn mapping_str(&self) -> Option<String> {
        self.meta_type.as_ref().map(|binding| {
            binding
                .mapping
                .iter()
                .map(|(k, v)| format!("{k}, {v}"))
                .collect::<Vec<_>>()
                .join(", ")
        })
    }
}

impl Named for Tar {
    fn name(&self) -> &str {
        &self.name
    }
}

impl QueryFragment for Tar {
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
        let mut q = format!(
            "\"{}\", \"{}\", \"{}\", \"{}\"",
            self.name,
            self.meta_type_str(),
            dims,
            attrs
        );
        if let Some(mapping) = self.mapping_str() {
            q.push_str(&format!(", \"{mapping}\""));
        }
        q
    }
}

impl Creatable for Tar {
    fn create_command(&self) -> String {
        format!("CREATE_TAR({});", self.query_fragment())
    }
}

impl Droppable for Tar {
    fn drop_command(&self) -> String {
        format!("DROP_TAR(\"{}\");", self.name)
    }
}
