//! Schema object model and its textual-protocol serialization.
//!
//! Every schema entity serializes itself into a fragment of the engine's
//! command grammar; the capability traits below say which full commands an
//! entity can produce. Serialization is pure and total over validly
//! constructed objects — all validation happens at construction time.

use std::fmt;

use crate::{IStr, IntoIStr};

pub mod dataset;
pub mod subtar;
pub mod tar;
pub mod values;

/// A grammar-conformant query snippet for this element. Not necessarily a
/// runnable command on its own.
pub trait QueryFragment {
    fn query_fragment(&self) -> String;
}

/// Elements the engine can create: datasets, tars, meta-types.
pub trait Creatable: QueryFragment {
    fn create_command(&self) -> String;
}

/// Elements the engine can drop: datasets, tars, meta-types.
pub trait Droppable {
    fn drop_command(&self) -> String;
}

/// Elements the engine can load: subtars.
pub trait Loadable: QueryFragment {
    fn load_command(&self) -> String;
}

/// Anything that can stand in for a named engine entity in a command.
///
/// Command builders and cross-entity references accept either a schema object
/// or a bare name; resolution happens once, at construction time.
pub trait Named {
    fn name(&self) -> &str;

    fn resolved_name(&self) -> IStr {
        self.name().istr()
    }
}

impl Named for str {
    fn name(&self) -> &str {
        self
    }
}

impl Named for &str {
    fn name(&self) -> &str {
        self
    }
}

impl Named for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

impl Named for IStr {
    fn name(&self) -> &str {
        self
    }
}

/// A scalar value in the engine's textual grammar.
///
/// `Display` produces the exact spelling sent to the engine; quoting for
/// character data is the responsibility of the surrounding fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::UInt(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Str(v) => f.write_str(v),
        }
    }
}

impl Scalar {
    pub fn is_textual(&self) -> bool {
        matches!(self, Scalar::Str(_))
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar::UInt(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_display() {
        assert_eq!(Scalar::Int(-3).to_string(), "-3");
        assert_eq!(Scalar::Float(1.5).to_string(), "1.5");
        assert_eq!(Scalar::Float(2.0).to_string(), "2");
        assert_eq!(Scalar::Str("abc".into()).to_string(), "abc");
    }

    #[test]
    fn named_resolution() {
        let name: IStr = "tar_a".istr();
        assert_eq!(Named::name(&name), "tar_a");
        assert_eq!("raw".name(), "raw");
        assert_eq!("raw".resolved_name().as_ref(), "raw");
    }
}
