//! A standard library of commonly useful functions for weft graphs.

use weft_core::Registry;

pub mod list;
pub mod log;
pub mod ops;
pub mod string;

/// The full standard registry, for handing to function-node construction.
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    let specs = ops::specs()
        .into_iter()
        .chain(list::specs())
        .chain(string::specs())
        .chain(log::specs());
    for spec in specs {
        registry.insert(spec);
    }
    registry
}
