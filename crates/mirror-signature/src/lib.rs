//! Structural type signatures.
//!
//! A [`Signature`] is one type reference (primitive, class with optional type
//! arguments, array, wildcard, type variable or vararg). Signatures are plain
//! values: they never refer back into a type model, so they can be compared,
//! hashed and substituted without any context.
//!
//! The textual encoding follows the JDT signature alphabet (`Ljava.lang.String;`,
//! `QList<TT;>;`, `[I`, `+Ljava.lang.Number;`, `|Ljava.lang.Object;`).

#![forbid(unsafe_code)]

mod error;
mod parse;
mod signature;

pub use crate::error::{Error, Result};
pub use crate::signature::{
    getter_prefix, ClassType, PrimitiveType, Signature, SignatureKind, WildcardBound,
    OBJECT_NAME,
};
