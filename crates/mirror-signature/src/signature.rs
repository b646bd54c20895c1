use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parse::parse_signature;

pub const OBJECT_NAME: &str = "java.lang.Object";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    pub fn from_code(code: char) -> Option<Self> {
        Some(match code {
            'Z' => PrimitiveType::Boolean,
            'B' => PrimitiveType::Byte,
            'C' => PrimitiveType::Char,
            'S' => PrimitiveType::Short,
            'I' => PrimitiveType::Int,
            'J' => PrimitiveType::Long,
            'F' => PrimitiveType::Float,
            'D' => PrimitiveType::Double,
            'V' => PrimitiveType::Void,
            _ => return None,
        })
    }

    pub fn code(self) -> char {
        match self {
            PrimitiveType::Boolean => 'Z',
            PrimitiveType::Byte => 'B',
            PrimitiveType::Char => 'C',
            PrimitiveType::Short => 'S',
            PrimitiveType::Int => 'I',
            PrimitiveType::Long => 'J',
            PrimitiveType::Float => 'F',
            PrimitiveType::Double => 'D',
            PrimitiveType::Void => 'V',
        }
    }

    pub fn java_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }

    /// Qualified name of the wrapper class.
    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
            PrimitiveType::Void => "java.lang.Void",
        }
    }

    /// Inverse of [`PrimitiveType::boxed_name`].
    pub fn from_boxed_name(name: &str) -> Option<Self> {
        Some(match name {
            "java.lang.Boolean" => PrimitiveType::Boolean,
            "java.lang.Byte" => PrimitiveType::Byte,
            "java.lang.Character" => PrimitiveType::Char,
            "java.lang.Short" => PrimitiveType::Short,
            "java.lang.Integer" => PrimitiveType::Int,
            "java.lang.Long" => PrimitiveType::Long,
            "java.lang.Float" => PrimitiveType::Float,
            "java.lang.Double" => PrimitiveType::Double,
            "java.lang.Void" => PrimitiveType::Void,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    Extends(Box<Signature>),
    Super(Box<Signature>),
}

impl WildcardBound {
    pub fn signature(&self) -> &Signature {
        match self {
            WildcardBound::Extends(sig) | WildcardBound::Super(sig) => sig,
        }
    }
}

/// A class or interface reference.
///
/// `resolved` is false for references whose name has not been qualified yet
/// (the `Q` encoding); such names are looked up through a name resolver.
#[derive(Debug, Clone, Eq)]
pub struct ClassType {
    pub name: String,
    pub args: Vec<Signature>,
    pub resolved: bool,
}

impl PartialEq for ClassType {
    fn eq(&self, other: &Self) -> bool {
        self.resolved == other.resolved
            && names_equal(&self.name, &other.name)
            && self.args == other.args
    }
}

impl Hash for ClassType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resolved.hash(state);
        hash_name(&self.name, state);
        self.args.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    Primitive,
    Class,
    Array,
    Wildcard,
    TypeVariable,
    Vararg,
}

#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Signature {
    Primitive(PrimitiveType),
    Class(ClassType),
    /// Never nests directly: `Array { element: Array { .. } }` is folded into
    /// one level by [`Signature::array`].
    Array {
        depth: usize,
        element: Box<Signature>,
    },
    Wildcard(Option<WildcardBound>),
    TypeVar(String),
    Vararg(Box<Signature>),
}

impl Signature {
    pub fn parse(input: &str) -> Result<Self> {
        parse_signature(input)
    }

    pub fn primitive(p: PrimitiveType) -> Self {
        Signature::Primitive(p)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::generic(name, Vec::new())
    }

    pub fn generic(name: impl Into<String>, args: Vec<Signature>) -> Self {
        Signature::Class(ClassType {
            name: name.into(),
            args,
            resolved: true,
        })
    }

    pub fn unresolved(name: impl Into<String>) -> Self {
        Signature::Class(ClassType {
            name: name.into(),
            args: Vec::new(),
            resolved: false,
        })
    }

    pub fn type_var(name: impl Into<String>) -> Self {
        Signature::TypeVar(name.into())
    }

    pub fn array(element: Signature, depth: usize) -> Self {
        if depth == 0 {
            return element;
        }
        match element {
            Signature::Array {
                depth: inner,
                element,
            } => Signature::Array {
                depth: depth + inner,
                element,
            },
            element => Signature::Array {
                depth,
                element: Box::new(element),
            },
        }
    }

    pub fn vararg(element: Signature) -> Self {
        Signature::Vararg(Box::new(element))
    }

    pub fn wildcard_unbounded() -> Self {
        Signature::Wildcard(None)
    }

    pub fn wildcard_extends(bound: Signature) -> Self {
        Signature::Wildcard(Some(WildcardBound::Extends(Box::new(bound))))
    }

    pub fn wildcard_super(bound: Signature) -> Self {
        Signature::Wildcard(Some(WildcardBound::Super(Box::new(bound))))
    }

    pub fn object() -> Self {
        Self::class(OBJECT_NAME)
    }

    pub fn kind(&self) -> SignatureKind {
        match self {
            Signature::Primitive(_) => SignatureKind::Primitive,
            Signature::Class(_) => SignatureKind::Class,
            Signature::Array { .. } => SignatureKind::Array,
            Signature::Wildcard(_) => SignatureKind::Wildcard,
            Signature::TypeVar(_) => SignatureKind::TypeVariable,
            Signature::Vararg(_) => SignatureKind::Vararg,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Signature::Primitive(PrimitiveType::Void))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Signature::Class(c) if c.args.is_empty() && names_equal(&c.name, OBJECT_NAME))
    }

    /// True if the signature (or its array/vararg element) carries type arguments.
    pub fn is_generic(&self) -> bool {
        match self.element_type() {
            Signature::Class(c) => !c.args.is_empty(),
            _ => false,
        }
    }

    pub fn type_arguments(&self) -> &[Signature] {
        match self {
            Signature::Class(c) => &c.args,
            _ => &[],
        }
    }

    /// The array or vararg component, or `self` for every other kind.
    pub fn element_type(&self) -> &Signature {
        match self {
            Signature::Array { element, .. } | Signature::Vararg(element) => element,
            other => other,
        }
    }

    /// Drops all type arguments. Wildcards erase to their upper bound.
    pub fn erasure(&self) -> Signature {
        match self {
            Signature::Primitive(_) | Signature::TypeVar(_) => self.clone(),
            Signature::Class(c) => Signature::Class(ClassType {
                name: c.name.clone(),
                args: Vec::new(),
                resolved: c.resolved,
            }),
            Signature::Array { depth, element } => Signature::array(element.erasure(), *depth),
            Signature::Vararg(element) => Signature::vararg(element.erasure()),
            Signature::Wildcard(Some(WildcardBound::Extends(bound))) => bound.erasure(),
            Signature::Wildcard(_) => Signature::object(),
        }
    }

    /// Name of the referenced class or type variable, looking through arrays and varargs.
    pub fn qualified_name(&self) -> Option<&str> {
        match self.element_type() {
            Signature::Class(c) => Some(&c.name),
            Signature::TypeVar(name) => Some(name),
            _ => None,
        }
    }

    pub fn simple_name(&self) -> Option<&str> {
        self.qualified_name().map(simple_name_of)
    }

    /// Package or enclosing type part of the name, if it has one.
    pub fn qualifier(&self) -> Option<&str> {
        let name = self.qualified_name()?;
        name.rfind(['.', '$']).map(|idx| &name[..idx])
    }

    /// Primitives become their wrapper class; all other kinds are returned unchanged.
    pub fn box_primitive(&self) -> Signature {
        match self {
            Signature::Primitive(p) => Signature::class(p.boxed_name()),
            other => other.clone(),
        }
    }

    /// The primitive a wrapper class stands for, if `self` is one.
    pub fn unboxed(&self) -> Option<PrimitiveType> {
        match self {
            Signature::Primitive(p) => Some(*p),
            Signature::Class(c) if c.args.is_empty() => {
                PrimitiveType::from_boxed_name(&c.name.replace('$', "."))
            }
            _ => None,
        }
    }

    pub fn encode(&self) -> String {
        let mut out = String::new();
        self.encode_into(&mut out);
        out
    }

    fn encode_into(&self, out: &mut String) {
        match self {
            Signature::Primitive(p) => out.push(p.code()),
            Signature::Class(c) => {
                out.push(if c.resolved { 'L' } else { 'Q' });
                out.push_str(&c.name);
                if !c.args.is_empty() {
                    out.push('<');
                    for arg in &c.args {
                        arg.encode_into(out);
                    }
                    out.push('>');
                }
                out.push(';');
            }
            Signature::Array { depth, element } => {
                for _ in 0..*depth {
                    out.push('[');
                }
                element.encode_into(out);
            }
            Signature::Wildcard(None) => out.push('*'),
            Signature::Wildcard(Some(WildcardBound::Extends(bound))) => {
                out.push('+');
                bound.encode_into(out);
            }
            Signature::Wildcard(Some(WildcardBound::Super(bound))) => {
                out.push('-');
                bound.encode_into(out);
            }
            Signature::TypeVar(name) => {
                out.push('T');
                out.push_str(name);
                out.push(';');
            }
            Signature::Vararg(element) => {
                out.push('|');
                element.encode_into(out);
            }
        }
    }
}

/// `is` for primitive booleans, `get` for everything else (including `java.lang.Boolean`).
pub fn getter_prefix(sig: &Signature) -> &'static str {
    match sig {
        Signature::Primitive(PrimitiveType::Boolean) => "is",
        _ => "get",
    }
}

fn simple_name_of(name: &str) -> &str {
    match name.rfind(['.', '$']) {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

fn normalize(c: char) -> char {
    if c == '$' {
        '.'
    } else {
        c
    }
}

fn names_equal(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.chars().map(normalize).eq(b.chars().map(normalize))
}

fn hash_name<H: Hasher>(name: &str, state: &mut H) {
    for c in name.chars() {
        normalize(c).hash(state);
    }
    name.len().hash(state);
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Signature::Primitive(a), Signature::Primitive(b)) => a == b,
            (Signature::Class(a), Signature::Class(b)) => a == b,
            (
                Signature::Array {
                    depth: da,
                    element: ea,
                },
                Signature::Array {
                    depth: db,
                    element: eb,
                },
            ) => da == db && ea == eb,
            (Signature::Wildcard(a), Signature::Wildcard(b)) => a == b,
            (Signature::TypeVar(a), Signature::TypeVar(b)) => a == b,
            (Signature::Vararg(a), Signature::Vararg(b)) => a == b,
            _ => false,
        }
    }
}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Signature::Primitive(p) => p.hash(state),
            Signature::Class(c) => c.hash(state),
            Signature::Array { depth, element } => {
                depth.hash(state);
                element.hash(state);
            }
            Signature::Wildcard(bound) => bound.hash(state),
            Signature::TypeVar(name) => name.hash(state),
            Signature::Vararg(element) => element.hash(state),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signature::Primitive(p) => f.write_str(p.java_name()),
            Signature::Class(c) => {
                f.write_str(&c.name.replace('$', "."))?;
                if !c.args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in c.args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Signature::Array { depth, element } => {
                write!(f, "{element}")?;
                for _ in 0..*depth {
                    f.write_str("[]")?;
                }
                Ok(())
            }
            Signature::Wildcard(None) => f.write_str("?"),
            Signature::Wildcard(Some(WildcardBound::Extends(bound))) => {
                write!(f, "? extends {bound}")
            }
            Signature::Wildcard(Some(WildcardBound::Super(bound))) => write!(f, "? super {bound}"),
            Signature::TypeVar(name) => f.write_str(name),
            Signature::Vararg(element) => write!(f, "{element}..."),
        }
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Signature::parse(s)
    }
}

impl TryFrom<String> for Signature {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Signature::parse(&value)
    }
}

impl From<Signature> for String {
    fn from(sig: Signature) -> Self {
        sig.encode()
    }
}
