use std::collections::HashSet;
use std::sync::Arc;

use mirror_model::{MethodDescriptor, TypeDescriptor, TypeModel};
use mirror_signature::Signature;

use crate::bindings::{normalize, GenericBindingMap, HierarchyResolution};
use crate::cache::ResolutionCache;
use crate::substitute::substitute;

/// Resolves generic type parameters through a type hierarchy.
///
/// Resolutions are memoized in an owned [`ResolutionCache`]; the resolver
/// must not outlive the model snapshot it was created for unless
/// [`GenericResolver::invalidate`] is called after the model changes.
pub struct GenericResolver<'m, M: ?Sized> {
    model: &'m M,
    cache: ResolutionCache,
}

impl<'m, M: TypeModel + ?Sized> GenericResolver<'m, M> {
    pub fn new(model: &'m M) -> Self {
        Self {
            model,
            cache: ResolutionCache::new(),
        }
    }

    pub fn model(&self) -> &'m M {
        self.model
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    /// Binding maps for `start` and every ancestor reachable from it.
    ///
    /// The walk is pre-order: the super class before the interfaces, and the
    /// interfaces in declaration order. `args` binds `start`'s own parameters.
    pub fn resolve_hierarchy(
        &self,
        start: &TypeDescriptor,
        args: &[Signature],
    ) -> Arc<HierarchyResolution> {
        if let Some(cached) = self.cache.get(&start.name, args) {
            return cached;
        }
        let mut out = HierarchyResolution::default();
        self.walk(start, args, &mut out);
        tracing::trace!(
            target: "mirror.resolve",
            start = %start.name,
            ancestors = out.len(),
            "resolved hierarchy"
        );
        self.cache.insert(&start.name, args, out)
    }

    /// Binding map of one ancestor of `start`, or an empty map when `target`
    /// is not reachable.
    pub fn resolve_for(
        &self,
        start: &TypeDescriptor,
        args: &[Signature],
        target: &str,
    ) -> GenericBindingMap {
        self.resolve_hierarchy(start, args)
            .get(target)
            .cloned()
            .unwrap_or_else(|| GenericBindingMap::new(target))
    }

    pub fn substitute(
        &self,
        sig: &Signature,
        bindings: &GenericBindingMap,
        declaring_type: &str,
    ) -> Signature {
        substitute(sig, bindings, &self.model, declaring_type)
    }

    /// Resolves `sig`, declared in `owner`, as seen from the subtype `context`.
    pub fn resolved_signature(
        &self,
        sig: &Signature,
        owner: &str,
        context: &TypeDescriptor,
    ) -> Signature {
        let bindings = self.resolve_for(context, &[], owner);
        self.substitute(sig, &bindings, owner)
    }

    pub fn method_parameter_signatures(
        &self,
        method: &MethodDescriptor,
        owner: &str,
        context: &TypeDescriptor,
    ) -> Vec<Signature> {
        let bindings = self.resolve_for(context, &[], owner);
        method
            .parameters
            .iter()
            .map(|p| self.substitute(&p.signature, &bindings, owner))
            .collect()
    }

    pub fn return_type(
        &self,
        method: &MethodDescriptor,
        owner: &str,
        context: &TypeDescriptor,
    ) -> Signature {
        self.resolved_signature(&method.return_type, owner, context)
    }

    /// Value of `owner`'s type parameter `name` as seen from `context`.
    pub fn resolve_type_parameter(
        &self,
        context: &TypeDescriptor,
        owner: &str,
        name: &str,
    ) -> Option<Signature> {
        self.resolve_hierarchy(context, &[])
            .get(owner)
            .and_then(|bindings| bindings.get(name))
            .cloned()
    }

    /// True if `ty` is `target` or has it among its ancestors.
    ///
    /// Ancestors the model does not contain still count, so marker types do
    /// not need to be part of the model.
    pub fn is_instance_of(&self, ty: &TypeDescriptor, target: &str) -> bool {
        if normalize(&ty.name) == normalize(target) {
            return true;
        }
        let hierarchy = self.resolve_hierarchy(ty, &[]);
        hierarchy.contains(target)
            || hierarchy
                .missing()
                .iter()
                .any(|m| normalize(m) == normalize(target))
    }

    /// The super-class chain of `ty`, nearest first, as far as the model reaches.
    pub fn super_classes(&self, ty: &TypeDescriptor) -> Vec<&'m TypeDescriptor> {
        let mut out: Vec<&'m TypeDescriptor> = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(normalize(&ty.name));
        let mut current = self.super_class_of(ty);
        while let Some(sup) = current {
            if !seen.insert(normalize(&sup.name)) {
                break;
            }
            out.push(sup);
            current = self.super_class_of(sup);
        }
        out
    }

    pub fn super_class_of(&self, ty: &TypeDescriptor) -> Option<&'m TypeDescriptor> {
        let sig = ty.super_class.as_ref()?;
        let name = self.qualified_super_name(ty, sig)?;
        self.model.type_by_name(&name)
    }

    fn qualified_super_name(&self, ty: &TypeDescriptor, sig: &Signature) -> Option<String> {
        match sig {
            Signature::Class(class) if class.resolved => Some(class.name.clone()),
            Signature::Class(class) => self.model.resolve_simple_name(&ty.name, &class.name),
            _ => None,
        }
    }

    fn bind_parameters(&self, ty: &TypeDescriptor, args: &[Signature]) -> GenericBindingMap {
        let mut bindings = GenericBindingMap::new(ty.name.clone());
        for (i, param) in ty.type_parameters.iter().enumerate() {
            let value = match args.get(i) {
                Some(arg) => arg.clone(),
                None => match param.first_bound() {
                    Some(bound) => self.substitute(bound, &bindings, &ty.name),
                    None => Signature::object(),
                },
            };
            bindings.insert(param.name.clone(), value);
        }
        bindings
    }

    fn walk(&self, ty: &TypeDescriptor, args: &[Signature], out: &mut HierarchyResolution) {
        let bindings = self.bind_parameters(ty, args);
        if !out.record(bindings.clone()) {
            // Already reached along an earlier path, together with all of its ancestors.
            return;
        }

        let supers = (!ty.is_interface())
            .then_some(ty.super_class.as_ref())
            .flatten()
            .into_iter()
            .chain(ty.interfaces.iter());
        for sig in supers {
            let resolved = self.substitute(sig, &bindings, &ty.name);
            let Signature::Class(class) = &resolved else {
                tracing::warn!(
                    target: "mirror.resolve",
                    ty = %ty.name,
                    super_type = %resolved,
                    "super type is not a class reference"
                );
                continue;
            };
            match self.model.type_by_name(&class.name) {
                Some(super_ty) => self.walk(super_ty, &class.args, out),
                None if resolved.is_object() => out.record_missing(&class.name),
                None => {
                    tracing::warn!(
                        target: "mirror.resolve",
                        ty = %ty.name,
                        super_type = %class.name,
                        "super type not found in model; hierarchy truncated"
                    );
                    out.record_missing(&class.name);
                }
            }
        }
    }
}
