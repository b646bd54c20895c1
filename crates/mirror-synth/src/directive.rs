//! Per-member inclusion directives.
//!
//! A directive decides whether a model member gets a derived counterpart.
//! [`AnnotationDirectives`] reads directives from the configured directive
//! annotations; other front ends can plug in their own [`DirectiveSource`].

use mirror_config::AnnotationsConfig;
use mirror_model::{Annotation, AnnotationValue, MethodDescriptor, TypeDescriptor, Value};
use mirror_signature::Signature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InclusionPolicy {
    /// Produce a new derived type.
    Create,
    /// The derived type already exists; reference it by name.
    UseExisting,
    /// Skip the member and everything nested in it.
    Ignore,
    /// No directive of its own. Nothing is produced for the member, but
    /// nested members are still visited.
    Default,
}

impl InclusionPolicy {
    /// Parses a command constant name (`CREATE`, `USE`, `IGNORE`, `DEFAULT`).
    pub fn from_command(name: &str) -> Option<Self> {
        Some(match name {
            "CREATE" => InclusionPolicy::Create,
            "USE" => InclusionPolicy::UseExisting,
            "IGNORE" => InclusionPolicy::Ignore,
            "DEFAULT" => InclusionPolicy::Default,
            _ => return None,
        })
    }
}

/// Where the configured super type of a derived type came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperTypeDirective {
    pub signature: Signature,
    /// Model type whose directive named the super type; unqualified names and
    /// the generic ordinal are interpreted in its scope.
    pub declared_by: String,
    /// Type-parameter ordinal of `declared_by` whose resolved value becomes
    /// the single type argument of the super type.
    pub generic_ordinal: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InclusionDirective {
    pub policy: InclusionPolicy,
    /// Qualified name of the derived type, overriding the naming convention.
    pub derived_type: Option<String>,
    pub super_type: Option<SuperTypeDirective>,
    pub interfaces: Vec<Signature>,
}

impl InclusionDirective {
    pub fn new(policy: InclusionPolicy) -> Self {
        Self {
            policy,
            derived_type: None,
            super_type: None,
            interfaces: Vec::new(),
        }
    }

    pub fn create(derived_type: impl Into<String>) -> Self {
        Self::new(InclusionPolicy::Create).with_derived_type(derived_type)
    }

    pub fn ignore() -> Self {
        Self::new(InclusionPolicy::Ignore)
    }

    pub fn with_derived_type(mut self, name: impl Into<String>) -> Self {
        self.derived_type = Some(name.into());
        self
    }

    pub fn with_super_type(mut self, signature: Signature, declared_by: impl Into<String>) -> Self {
        self.super_type = Some(SuperTypeDirective {
            signature,
            declared_by: declared_by.into(),
            generic_ordinal: None,
        });
        self
    }

    /// Sets the generic ordinal of the super type; no-op without a super type.
    pub fn with_generic_ordinal(mut self, ordinal: usize) -> Self {
        if let Some(super_type) = &mut self.super_type {
            super_type.generic_ordinal = Some(ordinal);
        }
        self
    }

    pub fn with_interface(mut self, sig: Signature) -> Self {
        self.interfaces.push(sig);
        self
    }

    pub fn is_create(&self) -> bool {
        self.policy == InclusionPolicy::Create
    }
}

/// Supplies inclusion directives for model members.
///
/// `chain` is the member followed by its super classes, nearest first, as
/// far as the model reaches.
pub trait DirectiveSource: Send + Sync {
    fn type_directive(&self, chain: &[&TypeDescriptor]) -> InclusionDirective;

    /// Directive of one property accessor.
    fn method_directive(&self, method: &MethodDescriptor) -> InclusionPolicy;

    /// `Create` or `Ignore` for one table column.
    fn column_directive(&self, chain: &[&TypeDescriptor]) -> InclusionPolicy;
}

/// Reads directives from the annotations named in [`AnnotationsConfig`].
#[derive(Debug, Clone)]
pub struct AnnotationDirectives {
    annotations: AnnotationsConfig,
}

impl AnnotationDirectives {
    pub fn new(annotations: AnnotationsConfig) -> Self {
        Self { annotations }
    }

    fn command(&self, annotation: &Annotation, element: &str) -> Option<InclusionPolicy> {
        let value = annotation.element(element)?;
        let name = match value.value() {
            Value::EnumConstant(constant) => constant.name.as_str(),
            Value::Str(name) => name.as_str(),
            _ => {
                tracing::warn!(
                    target: "mirror.synth",
                    annotation = %annotation.name,
                    element,
                    kind = ?value.kind(),
                    "directive command is not a constant"
                );
                return None;
            }
        };
        let policy = InclusionPolicy::from_command(name);
        if policy.is_none() {
            tracing::warn!(
                target: "mirror.synth",
                annotation = %annotation.name,
                command = name,
                "unknown directive command"
            );
        }
        policy
    }

    fn directive_annotation<'t>(&self, ty: &'t TypeDescriptor) -> Option<&'t Annotation> {
        ty.annotation(&self.annotations.form_data)
    }
}

fn type_reference(value: &AnnotationValue) -> Option<Signature> {
    match value.value() {
        Value::TypeRef(sig) => Some(sig.clone()),
        Value::Str(name) if !name.is_empty() => Some(Signature::class(name.clone())),
        _ => None,
    }
}

impl DirectiveSource for AnnotationDirectives {
    fn type_directive(&self, chain: &[&TypeDescriptor]) -> InclusionDirective {
        let elements = &self.annotations.elements;
        let Some((member, supers)) = chain.split_first() else {
            return InclusionDirective::new(InclusionPolicy::Default);
        };
        let own = self.directive_annotation(member);

        let policy = own
            .and_then(|a| self.command(a, &elements.command))
            .filter(|p| *p != InclusionPolicy::Default)
            .or_else(|| {
                supers
                    .iter()
                    .filter_map(|t| self.directive_annotation(t))
                    .find_map(|a| self.command(a, &elements.default_subtype_command))
                    .filter(|p| *p != InclusionPolicy::Default)
            })
            .unwrap_or(InclusionPolicy::Default);

        let mut directive = InclusionDirective::new(policy);
        directive.derived_type = own
            .and_then(|a| a.element(&elements.value))
            .and_then(type_reference)
            .and_then(|sig| sig.qualified_name().map(str::to_owned));

        directive.super_type = supers.iter().find_map(|ty| {
            let annotation = self.directive_annotation(ty)?;
            let signature = annotation.element(&elements.value).and_then(type_reference)?;
            let generic_ordinal = annotation
                .element(&elements.generic_ordinal)
                .and_then(|v| v.try_as::<i64>())
                .and_then(|ordinal| usize::try_from(ordinal).ok());
            Some(SuperTypeDirective {
                signature,
                declared_by: ty.name.clone(),
                generic_ordinal,
            })
        });

        directive.interfaces = chain
            .iter()
            .filter_map(|t| self.directive_annotation(t))
            .find_map(|a| a.element(&elements.interfaces))
            .map(|v| v.elements().iter().filter_map(type_reference).collect())
            .unwrap_or_default();

        directive
    }

    fn method_directive(&self, method: &MethodDescriptor) -> InclusionPolicy {
        match method.annotation(&self.annotations.form_data) {
            None => InclusionPolicy::Default,
            Some(annotation) => self
                .command(annotation, &self.annotations.elements.command)
                .filter(|p| *p != InclusionPolicy::Default)
                .unwrap_or(InclusionPolicy::Create),
        }
    }

    fn column_directive(&self, chain: &[&TypeDescriptor]) -> InclusionPolicy {
        chain
            .iter()
            .find_map(|t| t.annotation(&self.annotations.column_data))
            .and_then(|a| self.command(a, &self.annotations.elements.value))
            .filter(|p| *p == InclusionPolicy::Ignore)
            .unwrap_or(InclusionPolicy::Create)
    }
}
