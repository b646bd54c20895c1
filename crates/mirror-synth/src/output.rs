//! The synthesized type tree.
//!
//! Members are kept sorted by [`SortKey`] as they are inserted, so the
//! member order does not depend on the order the model was traversed in.

use mirror_model::{AnnotationGenerator, Flags, ValueGenerator};
use mirror_signature::Signature;

use crate::body::MethodBody;

/// Member categories, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberCategory {
    Constructor,
    SerialVersionUid,
    ColumnConstant,
    MemberField,
    PropertyMethod,
    RowAccessor,
    OverrideMethod,
    DataType,
    RowDataType,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SortKey {
    pub category: MemberCategory,
    pub name: String,
    /// Separates overloads (the parameter list in source form).
    pub disambiguator: String,
}

impl SortKey {
    pub fn new(category: MemberCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            disambiguator: String::new(),
        }
    }

    pub fn with_disambiguator(mut self, disambiguator: impl Into<String>) -> Self {
        self.disambiguator = disambiguator.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedField {
    pub name: String,
    pub flags: Flags,
    pub signature: Signature,
    pub initializer: Option<ValueGenerator>,
    pub key: SortKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedParameter {
    pub name: String,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedMethod {
    pub name: String,
    pub flags: Flags,
    /// `None` for constructors.
    pub return_type: Option<Signature>,
    pub parameters: Vec<SynthesizedParameter>,
    pub annotations: Vec<AnnotationGenerator>,
    /// `None` for abstract methods.
    pub body: Option<MethodBody>,
    pub comment: Option<String>,
    pub key: SortKey,
}

impl SynthesizedMethod {
    pub(crate) fn new(
        category: MemberCategory,
        name: impl Into<String>,
        flags: Flags,
        return_type: Option<Signature>,
    ) -> Self {
        let name = name.into();
        Self {
            key: SortKey::new(category, name.clone()),
            name,
            flags,
            return_type,
            parameters: Vec::new(),
            annotations: Vec::new(),
            body: None,
            comment: None,
        }
    }

    pub(crate) fn with_parameter(mut self, name: impl Into<String>, signature: Signature) -> Self {
        self.parameters.push(SynthesizedParameter {
            name: name.into(),
            signature,
        });
        let disambiguator = self
            .parameters
            .iter()
            .map(|p| p.signature.encode())
            .collect::<Vec<_>>()
            .join(",");
        self.key.disambiguator = disambiguator;
        self
    }

    pub(crate) fn with_annotation(mut self, annotation: AnnotationGenerator) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub(crate) fn with_body(mut self, body: MethodBody) -> Self {
        self.body = Some(body);
        self
    }

    pub(crate) fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    pub fn is_abstract(&self) -> bool {
        self.flags.is_abstract()
    }
}

/// Member counts, as compared by fixture assertions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub fields: usize,
    pub methods: usize,
    pub types: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedType {
    pub name: String,
    pub qualified_name: String,
    pub flags: Flags,
    pub super_type: Option<Signature>,
    pub interfaces: Vec<Signature>,
    pub annotations: Vec<AnnotationGenerator>,
    pub comment: Option<String>,
    fields: Vec<SynthesizedField>,
    methods: Vec<SynthesizedMethod>,
    types: Vec<SynthesizedType>,
    key: SortKey,
}

fn sorted_insert<T>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> &SortKey) {
    let at = items.partition_point(|existing| key(existing) <= key(&item));
    items.insert(at, item);
}

impl SynthesizedType {
    pub(crate) fn new(
        category: MemberCategory,
        name: impl Into<String>,
        qualified_name: impl Into<String>,
        flags: Flags,
    ) -> Self {
        let name = name.into();
        Self {
            key: SortKey::new(category, name.clone()),
            name,
            qualified_name: qualified_name.into(),
            flags,
            super_type: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            comment: None,
            fields: Vec::new(),
            methods: Vec::new(),
            types: Vec::new(),
        }
    }

    /// Signature referencing this type.
    pub fn signature(&self) -> Signature {
        Signature::class(self.qualified_name.clone())
    }

    pub fn fields(&self) -> &[SynthesizedField] {
        &self.fields
    }

    pub fn methods(&self) -> &[SynthesizedMethod] {
        &self.methods
    }

    pub fn types(&self) -> &[SynthesizedType] {
        &self.types
    }

    pub fn sort_key(&self) -> &SortKey {
        &self.key
    }

    pub fn is_abstract(&self) -> bool {
        self.flags.is_abstract()
    }

    pub fn field(&self, name: &str) -> Option<&SynthesizedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// First method named `name`, in output order.
    pub fn method(&self, name: &str) -> Option<&SynthesizedMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SynthesizedMethod> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// Direct nested type by simple name.
    pub fn find_type(&self, name: &str) -> Option<&SynthesizedType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn counts(&self) -> Counts {
        Counts {
            fields: self.fields.len(),
            methods: self.methods.len(),
            types: self.types.len(),
        }
    }

    /// `self` followed by every nested type, depth first.
    pub fn walk(&self) -> Vec<&SynthesizedType> {
        let mut out = vec![self];
        for child in &self.types {
            out.extend(child.walk());
        }
        out
    }

    pub(crate) fn add_field(&mut self, field: SynthesizedField) {
        sorted_insert(&mut self.fields, field, |f| &f.key);
    }

    pub(crate) fn add_method(&mut self, method: SynthesizedMethod) {
        sorted_insert(&mut self.methods, method, |m| &m.key);
    }

    pub(crate) fn add_type(&mut self, ty: SynthesizedType) {
        sorted_insert(&mut self.types, ty, |t| &t.key);
    }
}
