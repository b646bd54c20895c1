//! Read-only type model consumed by the resolver and the synthesizer.
//!
//! The model is supplied from outside (a compiler front end, a class file
//! reader, a JSON snapshot). The engine never mutates it.

mod annotation;
mod descriptor;
mod flags;
mod memory;
mod provider;
mod render;

pub use annotation::{Annotation, AnnotationValue, EnumConstant, FromAnnotationValue, Value, ValueKind};
pub use descriptor::{FieldDescriptor, MethodDescriptor, Parameter, TypeDescriptor, TypeParameter};
pub use flags::Flags;
pub use memory::MemoryModel;
pub use provider::{ModelProvider, NameResolver, TypeModel};
pub use render::{source_name, AnnotationGenerator, ValueGenerator};

pub use mirror_signature::Signature;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to decode model snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("type {0} is declared more than once")]
    DuplicateType(String),
    #[error("annotation array mixes {expected:?} and {found:?} values")]
    MixedArray { expected: ValueKind, found: ValueKind },
}

pub type Result<T> = std::result::Result<T, Error>;
