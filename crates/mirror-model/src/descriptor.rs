use mirror_signature::Signature;
use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;
use crate::flags::Flags;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bounds: Vec<Signature>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn bounded(name: impl Into<String>, bound: Signature) -> Self {
        Self {
            name: name.into(),
            bounds: vec![bound],
        }
    }

    pub fn first_bound(&self) -> Option<&Signature> {
        self.bounds.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(default)]
    pub flags: Flags,
    pub signature: Signature,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, flags: Flags, signature: Signature) -> Self {
        Self {
            name: name.into(),
            flags,
            signature,
            annotations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// A trailing vararg parameter uses [`Signature::Vararg`].
    pub signature: Signature,
}

impl Parameter {
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    pub return_type: Signature,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, flags: Flags, return_type: Signature) -> Self {
        Self {
            name: name.into(),
            flags,
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type,
            annotations: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, signature: Signature) -> Self {
        self.parameters.push(Parameter::new(name, signature));
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.is(name))
    }
}

/// Read-only view of one class or interface declaration.
///
/// Nested declarations are owned by their enclosing descriptor and carry
/// `$`-joined qualified names (`a.b.Form$MainBox`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_class: Option<Signature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Signature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring_type: Option<String>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, flags: Flags) -> Self {
        Self {
            name: name.into(),
            flags,
            type_parameters: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            types: Vec::new(),
            annotations: Vec::new(),
            declaring_type: None,
        }
    }

    pub fn with_type_parameter(mut self, param: TypeParameter) -> Self {
        self.type_parameters.push(param);
        self
    }

    pub fn with_super_class(mut self, sig: Signature) -> Self {
        self.super_class = Some(sig);
        self
    }

    pub fn with_interface(mut self, sig: Signature) -> Self {
        self.interfaces.push(sig);
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Adds a nested declaration, re-qualifying it (and its own nested
    /// declarations) under this type's name.
    pub fn with_type(mut self, mut nested: TypeDescriptor) -> Self {
        nested.reparent(&self.name);
        self.types.push(nested);
        self
    }

    pub(crate) fn reparent(&mut self, parent: &str) {
        let simple = self.simple_name().to_string();
        self.name = format!("{parent}${simple}");
        self.declaring_type = Some(parent.to_string());
        let name = self.name.clone();
        for child in &mut self.types {
            child.reparent(&name);
        }
    }

    pub fn simple_name(&self) -> &str {
        match self.name.rfind(['.', '$']) {
            Some(idx) => &self.name[idx + 1..],
            None => &self.name,
        }
    }

    /// Package of the outermost declaration; empty for the default package.
    pub fn package(&self) -> &str {
        let top = self.name.split('$').next().unwrap_or(&self.name);
        match top.rfind('.') {
            Some(idx) => &top[..idx],
            None => "",
        }
    }

    pub fn top_level_name(&self) -> &str {
        self.name.split('$').next().unwrap_or(&self.name)
    }

    pub fn is_abstract(&self) -> bool {
        self.flags.is_abstract()
    }

    pub fn is_interface(&self) -> bool {
        self.flags.is_interface()
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.is(name))
    }

    pub fn type_parameter(&self, name: &str) -> Option<&TypeParameter> {
        self.type_parameters.iter().find(|p| p.name == name)
    }

    pub fn nested(&self, simple_name: &str) -> Option<&TypeDescriptor> {
        self.types.iter().find(|t| t.simple_name() == simple_name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// `self` followed by every nested declaration, depth first.
    pub fn walk(&self) -> Vec<&TypeDescriptor> {
        let mut out = vec![self];
        for child in &self.types {
            out.extend(child.walk());
        }
        out
    }
}
