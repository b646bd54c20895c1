//! Generic type-parameter resolution.
//!
//! [`GenericResolver`] walks a type's super-class and super-interface edges
//! and records, for every ancestor, which signature each of its type
//! parameters is bound to. [`substitute`] applies such a binding map to a
//! signature declared inside that ancestor.

mod bindings;
mod cache;
mod resolver;
mod substitute;

pub use bindings::{GenericBindingMap, HierarchyResolution};
pub use cache::ResolutionCache;
pub use resolver::GenericResolver;
pub use substitute::substitute;
