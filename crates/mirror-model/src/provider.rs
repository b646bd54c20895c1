use crate::descriptor::TypeDescriptor;

/// Source of type declarations.
///
/// Lookups accept both `$` and `.` as the member-type separator.
pub trait ModelProvider {
    fn type_by_name(&self, name: &str) -> Option<&TypeDescriptor>;
}

/// Qualifies simple (or partially qualified) type names as seen from inside
/// a declaring type.
pub trait NameResolver {
    fn resolve_simple_name(&self, declaring_type: &str, simple_name: &str) -> Option<String>;
}

/// A model that can both look up declarations and qualify names.
pub trait TypeModel: ModelProvider + NameResolver {}

impl<T: ModelProvider + NameResolver + ?Sized> TypeModel for T {}

impl<T: ModelProvider + ?Sized> ModelProvider for &T {
    fn type_by_name(&self, name: &str) -> Option<&TypeDescriptor> {
        (**self).type_by_name(name)
    }
}

impl<T: NameResolver + ?Sized> NameResolver for &T {
    fn resolve_simple_name(&self, declaring_type: &str, simple_name: &str) -> Option<String> {
        (**self).resolve_simple_name(declaring_type, simple_name)
    }
}
