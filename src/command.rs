//! Command builders for the engine's relational/array operators.
//!
//! Pure string composition over the schema model. Operator builders
//! (`select`, `subset`, ...) return unterminated expressions so they can be
//! nested as subqueries; lifecycle commands (`create`, `drop`, `load`,
//! `register_model`, `predict`) are terminated with `;`.

use snafu::ensure;

use crate::error::{EmptyArgumentsSnafu, MalformedArgumentsSnafu, SchemaError};
use crate::schema::{Creatable, Droppable, Loadable, Named};

pub fn create(element: &impl Creatable) -> String {
    element.create_command()
}

pub fn load(element: &impl Loadable) -> String {
    element.load_command()
}

pub fn drop(element: &impl Droppable) -> String {
    element.drop_command()
}

/// `SELECT(tar, e1, e2, ...)`
///
/// At least one data element is required.
pub fn select(tar: &(impl Named + ?Sized), data_elements: &[&str]) -> Result<String, SchemaError> {
    ensure!(
        !data_elements.is_empty(),
        EmptyArgumentsSnafu { operator: "SELECT" }
    );
    Ok(format!(
        "SELECT({}, {})",
        tar.name(),
        data_elements.join(", ")
    ))
}

/// `WHERE(tar, <logical predicate>)`
pub fn where_(tar: &(impl Named + ?Sized), logical_predicate: &str) -> String {
    format!("WHERE({}, {})", tar.name(), logical_predicate)
}

/// `SUBSET(tar, dim, lower, upper, ...)`
///
/// `args` is a flat list grouped into (dimension, lower, upper) triplets;
/// a count not divisible by three is a precondition failure, never a
/// silent truncation.
pub fn subset(tar: &(impl Named + ?Sized), args: &[&str]) -> Result<String, SchemaError> {
    ensure!(!args.is_empty(), EmptyArgumentsSnafu { operator: "SUBSET" });
    ensure!(
        args.len() % 3 == 0,
        MalformedArgumentsSnafu {
            operator: "SUBSET",
            count: args.len(),
            group: 3usize,
        }
    );
    Ok(format!("SUBSET({}, {})", tar.name(), args.join(", ")))
}

/// `DERIVE(tar, new_attribute, <arithmetic expression>)`
pub fn derive(
    tar: &(impl Named + ?Sized),
    new_attribute: &(impl Named + ?Sized),
    expression: &str,
) -> String {
    format!(
        "DERIVE({}, {}, {})",
        tar.name(),
        new_attribute.name(),
        expression
    )
}

/// `CROSS(left, right)`
pub fn cross(left: &(impl Named + ?Sized), right: &(impl Named + ?Sized)) -> String {
    format!("CROSS({}, {})", left.name(), right.name())
}

/// `DIMJOIN(left, right, left_dim, right_dim, ...)`
///
/// Trailing args are grouped into (left dimension, right dimension) pairs.
pub fn dim_join(
    left: &(impl Named + ?Sized),
    right: &(impl Named + ?Sized),
    dims: &[&str],
) -> Result<String, SchemaError> {
    ensure!(!dims.is_empty(), EmptyArgumentsSnafu { operator: "DIMJOIN" });
    ensure!(
        dims.len() % 2 == 0,
        MalformedArgumentsSnafu {
            operator: "DIMJOIN",
            count: dims.len(),
            group: 2usize,
        }
    );
    Ok(format!(
        "DIMJOIN({}, {}, {})",
        left.name(),
        right.name(),
        dims.join(", ")
    ))
}

/// `AGGREGATE(tar, attr, fn, alias, ..., group_dim, ...)`
///
/// Argument grouping has two intentional branches. When the count is a
/// multiple of four, the first `count / 4 * 3` args form (attribute,
/// function, alias) triplets and the remainder are group-by dimensions.
/// Otherwise every arg belongs to a triplet and there is no group-by; a
/// count not divisible by three is then a precondition failure. There is no
/// explicit arity marker in the grammar to disambiguate the two readings.
pub fn aggregate(tar: &(impl Named + ?Sized), args: &[&str]) -> Result<String, SchemaError> {
    ensure!(
        !args.is_empty(),
        EmptyArgumentsSnafu { operator: "AGGREGATE" }
    );
    let split = if args.len() % 4 == 0 {
        args.len() / 4 * 3
    } else {
        ensure!(
            args.len() % 3 == 0,
            MalformedArgumentsSnafu {
                operator: "AGGREGATE",
                count: args.len(),
                group: 3usize,
            }
        );
        args.len()
    };
    let (triplets, group_by) = args.split_at(split);
    let mut q = format!("AGGREGATE({}, {}", tar.name(), triplets.join(", "));
    if !group_by.is_empty() {
        q.push_str(", ");
        q.push_str(&group_by.join(", "));
    }
    q.push(')');
    Ok(q)
}

/// `STORE(<query>, "new_tar_name")`
pub fn store(query: &str, new_tar_name: &(impl Named + ?Sized)) -> String {
    format!("STORE({}, \"{}\")", query, new_tar_name.name())
}

/// `REGISTER_MODEL(model, tar, attribute, "dim-size|dim-size|...");`
pub fn register_model(
    model: &(impl Named + ?Sized),
    tar: &(impl Named + ?Sized),
    input_attribute: &(impl Named + ?Sized),
    dim_specification: &[(&str, u64)],
) -> String {
    let dims = dim_specification
        .iter()
        .map(|(name, size)| format!("{name}-{size}"))
        .collect::<Vec<_>>()
        .join("|");
    format!(
        "REGISTER_MODEL({}, {}, {}, \"{}\");",
        model.name(),
        tar.name(),
        input_attribute.name(),
        dims
    )
}

/// `PREDICT(tar, model, attribute);`
pub fn predict(
    tar: &(impl Named + ?Sized),
    model: &(impl Named + ?Sized),
    input_attribute: &(impl Named + ?Sized),
) -> String {
    format!(
        "PREDICT({}, {}, {});",
        tar.name(),
        model.name(),
        input_attribute.name()
    )
}
