//! Freshly generated annotation values.
//!
//! Generators are independent of any source text: they hold signatures, not
//! spelled-out names, so an emitter can decide how to qualify each reference.
//! The `Display` forms use simple names.

use std::fmt;

use mirror_signature::{Signature, WildcardBound};

#[derive(Debug, Clone, PartialEq)]
pub enum ValueGenerator {
    Int(i64),
    /// Rendered as a `long` literal (`1L`).
    Long(i64),
    Str(String),
    EnumConstant { ty: Signature, name: String },
    TypeRef(Signature),
    Annotation(AnnotationGenerator),
    Array(Vec<ValueGenerator>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationGenerator {
    pub ty: Signature,
    pub elements: Vec<(String, ValueGenerator)>,
}

impl AnnotationGenerator {
    pub fn new(ty: Signature) -> Self {
        Self {
            ty,
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, name: impl Into<String>, value: ValueGenerator) -> Self {
        self.elements.push((name.into(), value));
        self
    }

    pub fn name(&self) -> &str {
        self.ty.qualified_name().unwrap_or_default()
    }

    pub fn element(&self, name: &str) -> Option<&ValueGenerator> {
        self.elements
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// Source form of `sig` using simple class names (`List<String>[]`).
pub fn source_name(sig: &Signature) -> String {
    match sig {
        Signature::Class(_) => {
            let mut out = sig.simple_name().unwrap_or_default().to_string();
            let args = sig.type_arguments();
            if !args.is_empty() {
                out.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&source_name(arg));
                }
                out.push('>');
            }
            out
        }
        Signature::Array { depth, element } => {
            let mut out = source_name(element);
            for _ in 0..*depth {
                out.push_str("[]");
            }
            out
        }
        Signature::Vararg(element) => format!("{}...", source_name(element)),
        Signature::Wildcard(Some(WildcardBound::Extends(bound))) => {
            format!("? extends {}", source_name(bound))
        }
        Signature::Wildcard(Some(WildcardBound::Super(bound))) => {
            format!("? super {}", source_name(bound))
        }
        other => other.to_string(),
    }
}

fn write_string_literal(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for ValueGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueGenerator::Int(v) => write!(f, "{v}"),
            ValueGenerator::Long(v) => write!(f, "{v}L"),
            ValueGenerator::Str(s) => write_string_literal(f, s),
            ValueGenerator::EnumConstant { ty, name } => write!(f, "{}.{name}", source_name(ty)),
            ValueGenerator::TypeRef(sig) => write!(f, "{}.class", source_name(sig)),
            ValueGenerator::Annotation(a) => write!(f, "{a}"),
            ValueGenerator::Array(elements) => {
                f.write_str("{")?;
                for (i, e) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{e}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl fmt::Display for AnnotationGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", source_name(&self.ty))?;
        match self.elements.as_slice() {
            [] => Ok(()),
            [(name, value)] if name == "value" => write!(f, "({value})"),
            elements => {
                f.write_str("(")?;
                for (i, (name, value)) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name} = {value}")?;
                }
                f.write_str(")")
            }
        }
    }
}
