use mirror_model::NameResolver;
use mirror_signature::{ClassType, Signature, WildcardBound};

use crate::bindings::GenericBindingMap;

/// Replaces type variables in `sig` by their bindings and qualifies
/// unresolved class names as seen from `declaring_type`.
///
/// Never fails: a name the resolver does not know stays as written and a
/// type variable without a binding stays a type variable.
pub fn substitute(
    sig: &Signature,
    bindings: &GenericBindingMap,
    resolver: &dyn NameResolver,
    declaring_type: &str,
) -> Signature {
    match sig {
        Signature::Primitive(_) => sig.clone(),
        Signature::Array { depth, element } => Signature::array(
            substitute(element, bindings, resolver, declaring_type),
            *depth,
        ),
        Signature::Vararg(element) => {
            Signature::vararg(substitute(element, bindings, resolver, declaring_type))
        }
        Signature::Wildcard(None) => sig.clone(),
        Signature::Wildcard(Some(WildcardBound::Extends(bound))) => {
            Signature::wildcard_extends(substitute(bound, bindings, resolver, declaring_type))
        }
        Signature::Wildcard(Some(WildcardBound::Super(bound))) => {
            Signature::wildcard_super(substitute(bound, bindings, resolver, declaring_type))
        }
        Signature::TypeVar(name) => match bindings.get(name) {
            Some(bound) => qualify(bound, resolver, declaring_type),
            None => {
                tracing::warn!(
                    target: "mirror.resolve",
                    type_var = %name,
                    owner = bindings.owner(),
                    declaring_type,
                    "type variable has no binding; leaving it unresolved"
                );
                sig.clone()
            }
        },
        Signature::Class(class) => {
            let name = qualify_name(class, resolver, declaring_type);
            let args = class
                .args
                .iter()
                .map(|arg| substitute(arg, bindings, resolver, declaring_type))
                .collect();
            Signature::Class(ClassType {
                resolved: class.resolved || name.is_some(),
                name: name.unwrap_or_else(|| class.name.clone()),
                args,
            })
        }
    }
}

/// Qualifies the unresolved class references inside an already bound value.
fn qualify(sig: &Signature, resolver: &dyn NameResolver, declaring_type: &str) -> Signature {
    match sig {
        Signature::Class(class) => {
            let name = qualify_name(class, resolver, declaring_type);
            Signature::Class(ClassType {
                resolved: class.resolved || name.is_some(),
                name: name.unwrap_or_else(|| class.name.clone()),
                args: class
                    .args
                    .iter()
                    .map(|arg| qualify(arg, resolver, declaring_type))
                    .collect(),
            })
        }
        Signature::Array { depth, element } => {
            Signature::array(qualify(element, resolver, declaring_type), *depth)
        }
        Signature::Vararg(element) => Signature::vararg(qualify(element, resolver, declaring_type)),
        Signature::Wildcard(Some(WildcardBound::Extends(bound))) => {
            Signature::wildcard_extends(qualify(bound, resolver, declaring_type))
        }
        Signature::Wildcard(Some(WildcardBound::Super(bound))) => {
            Signature::wildcard_super(qualify(bound, resolver, declaring_type))
        }
        other => other.clone(),
    }
}

fn qualify_name(
    class: &ClassType,
    resolver: &dyn NameResolver,
    declaring_type: &str,
) -> Option<String> {
    if class.resolved {
        return None;
    }
    let resolved = resolver.resolve_simple_name(declaring_type, &class.name);
    if resolved.is_none() {
        tracing::warn!(
            target: "mirror.resolve",
            name = %class.name,
            declaring_type,
            "cannot qualify type reference"
        );
    }
    resolved
}
