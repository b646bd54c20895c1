//! Annotation instances and their element values.

use indexmap::IndexMap;
use mirror_signature::Signature;
use serde::{Deserialize, Serialize};

use crate::render::{AnnotationGenerator, ValueGenerator};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Qualified name of the annotation type.
    pub name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub elements: IndexMap<String, AnnotationValue>,
    /// Verbatim source text of the whole annotation, when read from source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: IndexMap::new(),
            source: None,
        }
    }

    pub fn with_element(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.elements.insert(name.into(), value);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Matches `name` against the annotation type, accepting `$` for `.`.
    pub fn is(&self, name: &str) -> bool {
        self.name.len() == name.len()
            && self
                .name
                .chars()
                .zip(name.chars())
                .all(|(a, b)| a == b || matches!((a, b), ('$', '.') | ('.', '$')))
    }

    pub fn element(&self, name: &str) -> Option<&AnnotationValue> {
        self.elements.get(name)
    }

    pub fn render(&self) -> AnnotationGenerator {
        let mut generator = AnnotationGenerator::new(Signature::class(self.name.clone()));
        for (name, value) in &self.elements {
            generator = generator.with_element(name.clone(), value.render());
        }
        generator
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumConstant {
    /// Qualified name of the enum type.
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
}

impl EnumConstant {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Int(i64),
    Str(String),
    EnumConstant(EnumConstant),
    TypeRef(Signature),
    Nested(Annotation),
    Array(Vec<AnnotationValue>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Str,
    EnumConstant,
    TypeRef,
    Nested,
    Array,
}

/// One annotation element value.
///
/// `source_expression` is the verbatim expression text and is only present
/// for values read from editable source. Array elements share one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValue")]
pub struct AnnotationValue {
    #[serde(flatten)]
    value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_expression: Option<String>,
}

#[derive(Deserialize)]
struct RawValue {
    #[serde(flatten)]
    value: Value,
    #[serde(default)]
    source_expression: Option<String>,
}

impl TryFrom<RawValue> for AnnotationValue {
    type Error = Error;

    fn try_from(raw: RawValue) -> Result<Self> {
        let value = match raw.value {
            Value::Array(elements) => AnnotationValue::array(elements)?.value,
            other => other,
        };
        Ok(AnnotationValue {
            value,
            source_expression: raw.source_expression,
        })
    }
}

impl AnnotationValue {
    fn binary(value: Value) -> Self {
        Self {
            value,
            source_expression: None,
        }
    }

    pub fn int(value: i64) -> Self {
        Self::binary(Value::Int(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::binary(Value::Str(value.into()))
    }

    pub fn enum_constant(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self::binary(Value::EnumConstant(EnumConstant::new(ty, name)))
    }

    pub fn type_ref(sig: Signature) -> Self {
        Self::binary(Value::TypeRef(sig))
    }

    pub fn nested(annotation: Annotation) -> Self {
        Self::binary(Value::Nested(annotation))
    }

    pub fn array(elements: Vec<AnnotationValue>) -> Result<Self> {
        if let Some(first) = elements.first() {
            let kind = first.kind();
            if let Some(other) = elements.iter().find(|e| e.kind() != kind) {
                return Err(Error::MixedArray {
                    expected: kind,
                    found: other.kind(),
                });
            }
        }
        Ok(Self::binary(Value::Array(elements)))
    }

    /// Marks the value as read from source with the given expression text.
    pub fn with_source(mut self, expression: impl Into<String>) -> Self {
        self.source_expression = Some(expression.into());
        self
    }

    pub fn kind(&self) -> ValueKind {
        match &self.value {
            Value::Int(_) => ValueKind::Int,
            Value::Str(_) => ValueKind::Str,
            Value::EnumConstant(_) => ValueKind::EnumConstant,
            Value::TypeRef(_) => ValueKind::TypeRef,
            Value::Nested(_) => ValueKind::Nested,
            Value::Array(_) => ValueKind::Array,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn source_expression(&self) -> Option<&str> {
        self.source_expression.as_deref()
    }

    /// Array elements; a non-array value is its own single element.
    pub fn elements(&self) -> &[AnnotationValue] {
        match &self.value {
            Value::Array(elements) => elements,
            _ => std::slice::from_ref(self),
        }
    }

    /// Kind shared by the array elements (`None` for an empty array).
    pub fn element_kind(&self) -> Option<ValueKind> {
        self.elements().first().map(AnnotationValue::kind)
    }

    /// Named element of a nested annotation value.
    pub fn element(&self, name: &str) -> Option<&AnnotationValue> {
        match &self.value {
            Value::Nested(annotation) => annotation.element(name),
            _ => None,
        }
    }

    pub fn try_as<'a, T: FromAnnotationValue<'a>>(&'a self) -> Option<T> {
        T::project(&self.value)
    }

    /// Projection that treats a kind mismatch as a caller bug.
    ///
    /// # Panics
    ///
    /// Panics if the value is not of kind `T::KIND`.
    pub fn as_type<'a, T: FromAnnotationValue<'a>>(&'a self) -> T {
        match T::project(&self.value) {
            Some(v) => v,
            None => panic!(
                "annotation value of kind {:?} projected as {:?}",
                self.kind(),
                T::KIND
            ),
        }
    }

    pub fn render(&self) -> ValueGenerator {
        match &self.value {
            Value::Int(v) => ValueGenerator::Int(*v),
            Value::Str(s) => ValueGenerator::Str(s.clone()),
            Value::EnumConstant(c) => ValueGenerator::EnumConstant {
                ty: Signature::class(c.ty.clone()),
                name: c.name.clone(),
            },
            Value::TypeRef(sig) => ValueGenerator::TypeRef(sig.clone()),
            Value::Nested(annotation) => ValueGenerator::Annotation(annotation.render()),
            Value::Array(elements) => {
                ValueGenerator::Array(elements.iter().map(AnnotationValue::render).collect())
            }
        }
    }
}

/// Typed projection out of an [`AnnotationValue`].
pub trait FromAnnotationValue<'a>: Sized {
    const KIND: ValueKind;

    fn project(value: &'a Value) -> Option<Self>;
}

impl<'a> FromAnnotationValue<'a> for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn project(value: &'a Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl<'a> FromAnnotationValue<'a> for &'a str {
    const KIND: ValueKind = ValueKind::Str;

    fn project(value: &'a Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl<'a> FromAnnotationValue<'a> for &'a EnumConstant {
    const KIND: ValueKind = ValueKind::EnumConstant;

    fn project(value: &'a Value) -> Option<Self> {
        match value {
            Value::EnumConstant(c) => Some(c),
            _ => None,
        }
    }
}

impl<'a> FromAnnotationValue<'a> for &'a Signature {
    const KIND: ValueKind = ValueKind::TypeRef;

    fn project(value: &'a Value) -> Option<Self> {
        match value {
            Value::TypeRef(sig) => Some(sig),
            _ => None,
        }
    }
}

impl<'a> FromAnnotationValue<'a> for &'a Annotation {
    const KIND: ValueKind = ValueKind::Nested;

    fn project(value: &'a Value) -> Option<Self> {
        match value {
            Value::Nested(a) => Some(a),
            _ => None,
        }
    }
}

impl<'a> FromAnnotationValue<'a> for &'a [AnnotationValue] {
    const KIND: ValueKind = ValueKind::Array;

    fn project(value: &'a Value) -> Option<Self> {
        match value {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }
}
