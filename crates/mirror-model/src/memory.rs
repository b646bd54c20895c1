use std::collections::HashMap;

use serde::Deserialize;

use crate::descriptor::TypeDescriptor;
use crate::provider::{ModelProvider, NameResolver};
use crate::{Error, Result};

/// `java.lang` types that resolve without being part of the model.
const JAVA_LANG: &[&str] = &[
    "Boolean",
    "Byte",
    "Character",
    "Class",
    "Deprecated",
    "Double",
    "Enum",
    "Float",
    "Integer",
    "Iterable",
    "Long",
    "Number",
    "Object",
    "Override",
    "Short",
    "String",
    "SuppressWarnings",
    "Void",
];

/// Simple in-memory model for tests and snapshot-driven runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryModel {
    /// Every declaration, nested ones included, keyed by normalized name.
    types: HashMap<String, TypeDescriptor>,
    /// Explicit imports per top-level type.
    imports: HashMap<String, Vec<String>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Snapshot {
    #[serde(default)]
    types: Vec<TypeDescriptor>,
    #[serde(default)]
    imports: HashMap<String, Vec<String>>,
}

fn key(name: &str) -> String {
    name.replace('$', ".")
}

impl MemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON snapshot of the form `{"types": [...], "imports": {"a.Form": ["b.Data"]}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        let mut model = MemoryModel::new();
        for ty in snapshot.types {
            model.add_type(ty)?;
        }
        for (top_level, imports) in snapshot.imports {
            for import in imports {
                model.add_import(&top_level, import);
            }
        }
        tracing::debug!(
            target: "mirror.model",
            types = model.types.len(),
            "loaded model snapshot"
        );
        Ok(model)
    }

    /// Registers a top-level declaration and everything nested inside it.
    pub fn add_type(&mut self, mut ty: TypeDescriptor) -> Result<()> {
        let name = ty.name.clone();
        for child in &mut ty.types {
            child.reparent(&name);
        }
        let all: Vec<TypeDescriptor> = ty.walk().into_iter().cloned().collect();
        if let Some(dup) = all.iter().find(|t| self.types.contains_key(&key(&t.name))) {
            return Err(Error::DuplicateType(dup.name.clone()));
        }
        for t in all {
            self.types.insert(key(&t.name), t);
        }
        Ok(())
    }

    pub fn add_import(&mut self, top_level: &str, qualified: impl Into<String>) {
        self.imports
            .entry(key(top_level))
            .or_default()
            .push(qualified.into());
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn resolve_single(&self, declaring_type: &str, simple: &str) -> Option<String> {
        // Member types of the declaring type and of every enclosing type.
        let mut scope = self.type_by_name(declaring_type);
        while let Some(ty) = scope {
            if let Some(nested) = ty.nested(simple) {
                return Some(nested.name.clone());
            }
            scope = ty
                .declaring_type
                .as_deref()
                .and_then(|outer| self.type_by_name(outer));
        }

        let top_level = declaring_type.split('$').next().unwrap_or(declaring_type);
        if let Some(imports) = self.imports.get(&key(top_level)) {
            let suffix = format!(".{simple}");
            if let Some(import) = imports
                .iter()
                .find(|i| i.ends_with(&suffix) || i.as_str() == simple)
            {
                return Some(import.clone());
            }
        }

        let package = match top_level.rfind('.') {
            Some(idx) => &top_level[..idx],
            None => "",
        };
        let candidate = if package.is_empty() {
            simple.to_string()
        } else {
            format!("{package}.{simple}")
        };
        if self.types.contains_key(&key(&candidate)) {
            return Some(candidate);
        }

        let java_lang = format!("java.lang.{simple}");
        if JAVA_LANG.contains(&simple) || self.types.contains_key(&java_lang) {
            return Some(java_lang);
        }
        None
    }
}

impl ModelProvider for MemoryModel {
    fn type_by_name(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(&key(name))
    }
}

impl NameResolver for MemoryModel {
    fn resolve_simple_name(&self, declaring_type: &str, simple_name: &str) -> Option<String> {
        if simple_name.contains(['.', '$']) {
            if let Some(ty) = self.type_by_name(simple_name) {
                return Some(ty.name.clone());
            }
            // `Outer.Inner` relative to the declaring type: qualify the head only.
            let (head, tail) = simple_name
                .split_once(['.', '$'])
                .unwrap_or((simple_name, ""));
            let head = self.resolve_single(declaring_type, head)?;
            let joined = format!("{head}${tail}");
            return Some(
                self.type_by_name(&joined)
                    .map(|t| t.name.clone())
                    .unwrap_or(joined),
            );
        }
        let resolved = self.resolve_single(declaring_type, simple_name);
        if resolved.is_none() {
            tracing::trace!(
                target: "mirror.model",
                declaring_type,
                simple_name,
                "simple name not visible"
            );
        }
        resolved
    }
}
