use std::collections::BTreeMap;

use mirror_config::MirrorConfig;
use mirror_model::{
    Annotation, AnnotationGenerator, Flags, ModelProvider, NameResolver, TypeDescriptor,
    TypeModel, ValueGenerator,
};
use mirror_resolve::{GenericBindingMap, GenericResolver};
use mirror_signature::{getter_prefix, PrimitiveType, Signature};

use crate::body::MethodBody;
use crate::capability::{
    is_composite, nested_kind, Capability, CapabilitySet, Content, KindInput, NestedKind,
};
use crate::directive::{AnnotationDirectives, DirectiveSource, InclusionDirective, InclusionPolicy};
use crate::error::{Result, SynthError};
use crate::naming::{capitalize, decapitalize, escape_keyword, form_data_name, simple_name};
use crate::output::{MemberCategory, SortKey, SynthesizedField, SynthesizedMethod, SynthesizedType};

/// Comment attached to every top-level derived type.
pub const GENERATED_COMMENT: &str =
    "NOTE: This class is auto generated, no manual modifications recommended.";

const GENERATED_COMMENTS_ELEMENT: &str =
    "This class is auto generated. No manual modifications recommended.";

/// Builds derived types from model types.
///
/// A synthesizer only reads the model. It can be shared between threads to
/// synthesize independent top-level types in parallel (see
/// [`synthesize_batch`](crate::synthesize_batch)).
pub struct Synthesizer<'m, M: ?Sized> {
    pub(crate) resolver: GenericResolver<'m, M>,
    pub(crate) config: MirrorConfig,
    directives: Box<dyn DirectiveSource>,
}

impl<'m, M: TypeModel + ?Sized> Synthesizer<'m, M> {
    pub fn new(model: &'m M, config: &MirrorConfig) -> Self {
        Self {
            resolver: GenericResolver::new(model),
            config: config.clone(),
            directives: Box::new(AnnotationDirectives::new(config.annotations.clone())),
        }
    }

    /// Replaces the annotation-driven directives.
    pub fn with_directives(mut self, directives: impl DirectiveSource + 'static) -> Self {
        self.directives = Box::new(directives);
        self
    }

    pub fn resolver(&self) -> &GenericResolver<'m, M> {
        &self.resolver
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    pub(crate) fn model(&self) -> &'m M {
        self.resolver.model()
    }

    /// `ty` followed by its super classes.
    pub(crate) fn chain<'a>(&'a self, ty: &'a TypeDescriptor) -> Vec<&'a TypeDescriptor> {
        let mut chain = vec![ty];
        chain.extend(self.resolver.super_classes(ty));
        chain
    }

    pub fn directive_for(&self, ty: &TypeDescriptor) -> InclusionDirective {
        self.directives.type_directive(&self.chain(ty))
    }

    pub(crate) fn column_policy(&self, column: &TypeDescriptor) -> InclusionPolicy {
        self.directives.column_directive(&self.chain(column))
    }

    pub fn capabilities_of(&self, ty: &TypeDescriptor) -> CapabilitySet {
        Capability::ALL
            .into_iter()
            .filter(|c| self.resolver.is_instance_of(ty, c.marker(&self.config.api)))
            .collect()
    }

    /// Synthesizes the derived type of the top-level model type `model`.
    pub fn synthesize(
        &self,
        model: &TypeDescriptor,
        directive: &InclusionDirective,
    ) -> Result<SynthesizedType> {
        if directive.policy != InclusionPolicy::Create {
            return Err(SynthError::NotCreate {
                ty: model.name.clone(),
                policy: directive.policy,
            });
        }
        let qualified = directive
            .derived_type
            .clone()
            .ok_or_else(|| SynthError::MissingDerivedType {
                ty: model.name.clone(),
            })?;
        let name = simple_name(&qualified).to_owned();
        tracing::debug!(target: "mirror.synth", model = %model.name, derived = %qualified, "synthesizing");

        let (mut unit, _) = self.build_unit(model, directive, name, qualified, true);
        unit.annotations.insert(
            0,
            AnnotationGenerator::new(Signature::class(self.config.annotations.generated.clone()))
                .with_element("value", ValueGenerator::Str(model.name.clone()))
                .with_element(
                    "comments",
                    ValueGenerator::Str(GENERATED_COMMENTS_ELEMENT.to_owned()),
                ),
        );
        unit.comment = Some(GENERATED_COMMENT.to_owned());
        Ok(unit)
    }

    /// Qualified name of the derived type `ty` has (or would have), if any.
    pub fn derived_type_of(&self, ty: &TypeDescriptor) -> Option<String> {
        let directive = self.directive_for(ty);
        match directive.policy {
            InclusionPolicy::UseExisting => directive.derived_type,
            InclusionPolicy::Create if ty.declaring_type.is_none() => directive.derived_type,
            InclusionPolicy::Create => {
                let owner = self.enclosing_unit_name(ty)?;
                let name = directive
                    .derived_type
                    .as_deref()
                    .map(simple_name)
                    .unwrap_or_else(|| form_data_name(ty.simple_name()));
                Some(format!("{owner}${name}"))
            }
            InclusionPolicy::Ignore | InclusionPolicy::Default => None,
        }
    }

    /// Derived type that holds the counterpart of the nested member `ty`.
    fn enclosing_unit_name(&self, ty: &TypeDescriptor) -> Option<String> {
        let mut current = self.declaring_type_of(ty);
        while let Some(outer) = current {
            if outer.declaring_type.is_none() {
                return self.derived_type_of(outer);
            }
            let directive = self.directive_for(outer);
            match directive.policy {
                InclusionPolicy::Ignore => return None,
                InclusionPolicy::Create => {
                    let configured = self.configured_super_type(outer, &directive);
                    if self.kind_of(outer, &configured, false) == NestedKind::Composite {
                        return self.derived_type_of(outer);
                    }
                }
                InclusionPolicy::UseExisting | InclusionPolicy::Default => {}
            }
            current = self.declaring_type_of(outer);
        }
        None
    }

    pub(crate) fn declaring_type_of(&self, ty: &TypeDescriptor) -> Option<&'m TypeDescriptor> {
        ty.declaring_type
            .as_deref()
            .and_then(|name| self.model().type_by_name(name))
    }

    fn kind_of(&self, model: &TypeDescriptor, configured_super: &Signature, top_level: bool) -> NestedKind {
        nested_kind(&KindInput {
            capabilities: self.capabilities_of(model),
            top_level,
            table_data: self.is_table_data(configured_super),
        })
    }

    fn is_table_data(&self, sig: &Signature) -> bool {
        let Some(name) = sig.qualified_name() else {
            return false;
        };
        let bases = &self.config.data.table_data_bases;
        if bases.iter().any(|base| names_equal(base, name)) {
            return true;
        }
        self.model()
            .type_by_name(name)
            .is_some_and(|ty| bases.iter().any(|base| self.resolver.is_instance_of(ty, base)))
    }

    /// Super type named by the directive, resolved in `model`'s hierarchy.
    fn configured_super_type(&self, model: &TypeDescriptor, directive: &InclusionDirective) -> Signature {
        let Some(super_type) = &directive.super_type else {
            return Signature::class(self.config.data.object.clone());
        };
        let owner = &super_type.declared_by;
        let bindings = self.resolver.resolve_for(model, &[], owner);
        let sig = self.resolver.substitute(&super_type.signature, &bindings, owner);
        let Some(ordinal) = super_type.generic_ordinal else {
            return sig;
        };
        match (sig.qualified_name(), bindings.get_index(ordinal)) {
            (Some(name), Some(arg)) => Signature::generic(name, vec![arg.box_primitive()]),
            _ => {
                tracing::warn!(
                    target: "mirror.synth",
                    model = %model.name,
                    owner = %owner,
                    ordinal,
                    "generic ordinal does not name a type parameter"
                );
                sig
            }
        }
    }

    /// Qualifies every class reference in `sig`, type arguments included, as seen from `scope`.
    fn qualify(&self, sig: &Signature, scope: &TypeDescriptor) -> Signature {
        self.resolver
            .substitute(sig, &GenericBindingMap::new(scope.name.clone()), &scope.name)
    }

    /// Builds one derived type. Returns the kind the model member was synthesized as.
    pub(crate) fn build_unit(
        &self,
        model: &TypeDescriptor,
        directive: &InclusionDirective,
        name: String,
        qualified: String,
        top_level: bool,
    ) -> (SynthesizedType, NestedKind) {
        let mut flags = Flags::PUBLIC;
        if model.is_abstract() {
            flags |= Flags::ABSTRACT;
        }
        if !top_level {
            flags |= Flags::STATIC;
        }
        let mut unit = SynthesizedType::new(MemberCategory::DataType, name, qualified, flags);

        let configured = self.configured_super_type(model, directive);
        let kind = self.kind_of(model, &configured, top_level);
        unit.super_type = Some(configured);
        unit.interfaces = directive
            .interfaces
            .iter()
            .map(|sig| self.qualify(sig, model))
            .collect();
        self.apply_replace(&mut unit, model);
        add_serialization_members(&mut unit);
        unit.annotations
            .extend(self.copied_annotations(&model.annotations, &model.name));

        tracing::trace!(
            target: "mirror.synth",
            model = %model.name,
            unit = %unit.qualified_name,
            kind = ?kind,
            "building unit"
        );
        for content in kind.content() {
            match content {
                Content::Properties => self.add_properties(&mut unit, model),
                Content::Children => self.visit_composite(&mut unit, model),
                Content::Rows => self.add_rows(&mut unit, model),
            }
        }
        (unit, kind)
    }

    fn apply_replace(&self, unit: &mut SynthesizedType, model: &TypeDescriptor) {
        let replace = &self.config.annotations.replace;
        if model.annotation(replace).is_none() {
            return;
        }
        match self
            .resolver
            .super_class_of(model)
            .and_then(|replaced| self.derived_type_of(replaced))
        {
            Some(replaced) => unit.super_type = Some(Signature::class(replaced)),
            None => tracing::debug!(
                target: "mirror.synth",
                model = %model.name,
                "replaced member has no derived type; keeping configured super type"
            ),
        }
        unit.annotations
            .push(AnnotationGenerator::new(Signature::class(replace.clone())));
    }

    /// Those of `source` whose declaration opts in to being copied. Names are
    /// qualified as seen from the type `scope`.
    fn copied_annotations(&self, source: &[Annotation], scope: &str) -> Vec<AnnotationGenerator> {
        let annotations = &self.config.annotations;
        source
            .iter()
            .filter(|a| !annotations.is_generation_marker(&a.name) && !a.is(&annotations.replace))
            .filter_map(|a| {
                let declaration = self.model().type_by_name(&a.name).or_else(|| {
                    self.model()
                        .resolve_simple_name(scope, &a.name)
                        .and_then(|name| self.model().type_by_name(&name))
                })?;
                if declaration.annotation(&annotations.dto_relevant).is_none() {
                    return None;
                }
                let mut generator = a.render();
                generator.ty = Signature::class(declaration.name.clone());
                Some(generator)
            })
            .collect()
    }

    /// Nested field-like members of a composite, flattened into `unit`
    /// unless they get a unit of their own.
    fn visit_composite(&self, unit: &mut SynthesizedType, composite: &TypeDescriptor) {
        let children: Vec<(&TypeDescriptor, CapabilitySet)> = composite
            .types
            .iter()
            .filter(|t| t.flags.is_public())
            .map(|t| (t, self.capabilities_of(t)))
            .collect();

        for (child, capabilities) in &children {
            if capabilities.contains(Capability::FormField) {
                self.visit_form_field(unit, child, *capabilities);
            }
        }
        for (child, capabilities) in &children {
            if capabilities.contains(Capability::FormFieldMenu)
                || capabilities.contains(Capability::CompositeFieldExtension)
            {
                self.visit_composite(unit, child);
            }
        }

        let mut extensions = Vec::new();
        self.collect_table_extensions(composite, &mut extensions);
        for extension in extensions {
            self.add_table_extension(unit, extension);
        }
    }

    fn collect_table_extensions<'a>(&self, ty: &'a TypeDescriptor, out: &mut Vec<&'a TypeDescriptor>) {
        for child in ty.types.iter().filter(|t| t.flags.is_public()) {
            if self
                .resolver
                .is_instance_of(child, &self.config.api.table_extension)
            {
                out.push(child);
            } else if self.directive_for(child).policy != InclusionPolicy::Ignore {
                self.collect_table_extensions(child, out);
            }
        }
    }

    fn visit_form_field(
        &self,
        unit: &mut SynthesizedType,
        field: &TypeDescriptor,
        capabilities: CapabilitySet,
    ) {
        let directive = self.directive_for(field);
        let flatten = match directive.policy {
            InclusionPolicy::Ignore => {
                tracing::debug!(target: "mirror.synth", field = %field.name, "ignored");
                return;
            }
            InclusionPolicy::Create => {
                let kind = self.add_field_data(unit, field, &directive);
                kind != NestedKind::Composite
            }
            InclusionPolicy::UseExisting => {
                let name = form_data_name(field.simple_name());
                let existing = directive
                    .derived_type
                    .clone()
                    .unwrap_or_else(|| format!("{}${name}", unit.qualified_name));
                let getter_name = format!("get{}", capitalize(simple_name(&existing)));
                let sig = Signature::class(existing);
                unit.add_method(
                    SynthesizedMethod::new(
                        MemberCategory::PropertyMethod,
                        getter_name,
                        Flags::PUBLIC,
                        Some(sig.clone()),
                    )
                    .with_body(MethodBody::FieldByClass(sig)),
                );
                true
            }
            InclusionPolicy::Default => true,
        };
        if flatten && is_composite(capabilities) {
            self.visit_composite(unit, field);
        }
    }

    /// Adds the nested derived type of a created form field and its getter.
    fn add_field_data(
        &self,
        unit: &mut SynthesizedType,
        field: &TypeDescriptor,
        directive: &InclusionDirective,
    ) -> NestedKind {
        let name = directive
            .derived_type
            .as_deref()
            .map(simple_name)
            .unwrap_or_else(|| form_data_name(field.simple_name()))
            .to_owned();
        let qualified = format!("{}${name}", unit.qualified_name);
        let (mut data, kind) = self.build_unit(field, directive, name.clone(), qualified, false);

        let collides = unit.find_type(&name).is_some()
            || (kind == NestedKind::Plain
                && unit.methods().iter().any(|m| {
                    m.return_type
                        .as_ref()
                        .is_some_and(|ret| m.name == format!("{}{name}", getter_prefix(ret)))
                }));
        if collides {
            tracing::warn!(
                target: "mirror.synth",
                field = %field.name,
                name = %name,
                "derived name collides with an existing member"
            );
            data.comment = Some(format!(
                "TODO [everyone] Duplicate names '{name}'. Rename property or form field."
            ));
        }

        let sig = data.signature();
        unit.add_type(data);
        unit.add_method(
            SynthesizedMethod::new(
                MemberCategory::PropertyMethod,
                format!("get{}", capitalize(&name)),
                Flags::PUBLIC,
                Some(sig.clone()),
            )
            .with_body(MethodBody::FieldByClass(sig)),
        );
        kind
    }

    /// Promotes accessor pairs of `model` whose getter and setter are both
    /// marked for creation.
    fn add_properties(&self, unit: &mut SynthesizedType, model: &TypeDescriptor) {
        let mut properties = BTreeMap::new();
        for getter in &model.methods {
            if !getter.parameters.is_empty() {
                continue;
            }
            let name = match getter.name.strip_prefix("get") {
                Some(name) => name,
                None => match getter.name.strip_prefix("is") {
                    Some(name) if getter.return_type == Signature::primitive(PrimitiveType::Boolean) => name,
                    _ => continue,
                },
            };
            if !name.starts_with(|c: char| c.is_uppercase()) || getter.return_type.is_void() {
                continue;
            }
            let setter_name = format!("set{name}");
            let Some(setter) = model
                .methods
                .iter()
                .find(|m| m.name == setter_name && m.parameters.len() == 1)
            else {
                continue;
            };
            if self.directives.method_directive(getter) != InclusionPolicy::Create
                || self.directives.method_directive(setter) != InclusionPolicy::Create
            {
                continue;
            }
            let sig = self
                .resolver
                .resolved_signature(&getter.return_type, &model.name, model);
            let source = if getter.annotations.is_empty() {
                &setter.annotations
            } else {
                &getter.annotations
            };
            let annotations = self.copied_annotations(source, &model.name);
            properties.insert(name.to_owned(), (sig, annotations));
        }

        for (name, (sig, annotations)) in properties {
            self.add_property(unit, &name, &sig, annotations);
        }
    }

    fn add_property(
        &self,
        unit: &mut SynthesizedType,
        name: &str,
        sig: &Signature,
        annotations: Vec<AnnotationGenerator>,
    ) {
        let holder_name = format!("{name}Property");
        let mut holder = SynthesizedType::new(
            MemberCategory::DataType,
            holder_name.clone(),
            format!("{}${holder_name}", unit.qualified_name),
            Flags::PUBLIC | Flags::STATIC,
        );
        holder.super_type = Some(Signature::generic(
            self.config.data.property_data.clone(),
            vec![sig.box_primitive()],
        ));
        holder.annotations = annotations;
        add_serialization_members(&mut holder);
        let holder_sig = holder.signature();
        unit.add_type(holder);

        let accessor = format!("get{name}Property");
        unit.add_method(
            SynthesizedMethod::new(
                MemberCategory::PropertyMethod,
                accessor.clone(),
                Flags::PUBLIC,
                Some(holder_sig.clone()),
            )
            .with_body(MethodBody::PropertyByClass(holder_sig)),
        );

        let comment = format!("access method for property {name}.");
        let default = match sig {
            Signature::Primitive(p) => default_literal(*p),
            _ => None,
        };
        unit.add_method(
            SynthesizedMethod::new(
                MemberCategory::PropertyMethod,
                format!("{}{name}", getter_prefix(sig)),
                Flags::PUBLIC,
                Some(sig.clone()),
            )
            .with_body(MethodBody::PropertyValue {
                accessor: accessor.clone(),
                default,
            })
            .with_comment(comment.clone()),
        );

        let argument = escape_keyword(&decapitalize(name));
        unit.add_method(
            SynthesizedMethod::new(
                MemberCategory::PropertyMethod,
                format!("set{name}"),
                Flags::PUBLIC,
                Some(Signature::primitive(PrimitiveType::Void)),
            )
            .with_parameter(argument.clone(), sig.clone())
            .with_body(MethodBody::SetPropertyValue { accessor, argument })
            .with_comment(comment),
        );
    }
}

/// Null substitute for primitive-typed properties.
pub fn default_literal(primitive: PrimitiveType) -> Option<&'static str> {
    match primitive {
        PrimitiveType::Boolean => Some("false"),
        PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Int => Some("0"),
        PrimitiveType::Long => Some("0L"),
        PrimitiveType::Float => Some("0.0f"),
        PrimitiveType::Double => Some("0.0"),
        PrimitiveType::Char => Some("'\\0'"),
        PrimitiveType::Void => None,
    }
}

/// Public constructor and `serialVersionUID`.
pub(crate) fn add_serialization_members(unit: &mut SynthesizedType) {
    unit.add_method(
        SynthesizedMethod::new(
            MemberCategory::Constructor,
            unit.name.clone(),
            Flags::PUBLIC,
            None,
        )
        .with_body(MethodBody::Empty),
    );
    unit.add_field(SynthesizedField {
        name: "serialVersionUID".to_owned(),
        flags: Flags::PRIVATE | Flags::STATIC | Flags::FINAL,
        signature: Signature::primitive(PrimitiveType::Long),
        initializer: Some(ValueGenerator::Long(1)),
        key: SortKey::new(MemberCategory::SerialVersionUid, "serialVersionUID"),
    });
}

pub(crate) fn names_equal(a: &str, b: &str) -> bool {
    a.replace('$', ".") == b.replace('$', ".")
}
