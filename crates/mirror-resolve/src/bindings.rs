use indexmap::IndexMap;
use mirror_signature::Signature;

/// Type-parameter bindings of one ancestor.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericBindingMap {
    owner: String,
    params: IndexMap<String, Signature>,
}

impl GenericBindingMap {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            params: IndexMap::new(),
        }
    }

    /// Qualified name of the type whose parameters are bound.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn get(&self, name: &str) -> Option<&Signature> {
        self.params.get(name)
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Signature) {
        self.params.insert(name.into(), value);
    }

    /// Bindings in parameter declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Signature)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Bound values in parameter declaration order.
    pub fn values(&self) -> impl Iterator<Item = &Signature> {
        self.params.values()
    }

    pub fn get_index(&self, index: usize) -> Option<&Signature> {
        self.params.get_index(index).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Binding maps for every ancestor reached from one start type, in discovery order.
///
/// When an ancestor is reachable along several paths only the first
/// discovered binding is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HierarchyResolution {
    ancestors: IndexMap<String, GenericBindingMap>,
    missing: Vec<String>,
}

pub(crate) fn normalize(name: &str) -> String {
    name.replace('$', ".")
}

impl HierarchyResolution {
    pub fn get(&self, name: &str) -> Option<&GenericBindingMap> {
        self.ancestors.get(&normalize(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ancestors.contains_key(&normalize(name))
    }

    /// Records `bindings` unless its owner was already discovered.
    pub(crate) fn record(&mut self, bindings: GenericBindingMap) -> bool {
        let key = normalize(bindings.owner());
        if self.ancestors.contains_key(&key) {
            return false;
        }
        self.ancestors.insert(key, bindings);
        true
    }

    pub(crate) fn record_missing(&mut self, name: &str) {
        if !self.missing.iter().any(|m| normalize(m) == normalize(name)) {
            self.missing.push(name.to_string());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenericBindingMap> {
        self.ancestors.values()
    }

    /// Qualified names of the ancestors, start type first.
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        self.ancestors.values().map(GenericBindingMap::owner)
    }

    /// Referenced ancestors that the model could not provide.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn len(&self) -> usize {
        self.ancestors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty()
    }
}
