//! Configuration of the derived-type synthesizer.
//!
//! The synthesizer itself knows nothing about concrete marker types: the
//! qualified names of the model-side API markers, the data-side base types
//! and the driving annotations all come from a [`MirrorConfig`], loaded from
//! TOML:
//!
//! ```toml
//! [api]
//! form_field = "ui.api.IFormField"
//! table = "ui.api.ITable"
//!
//! [data]
//! table_row_data = "ui.data.AbstractTableRowData"
//!
//! [annotations]
//! form_data = "ui.dto.FormData"
//!
//! [logging]
//! level = "debug"
//! ```

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod logging;
mod schema;

pub use logging::{init_tracing, LoggingConfig};
pub use schema::json_schema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MirrorConfig {
    /// Marker types of the model (UI) side.
    #[serde(default)]
    pub api: ApiConfig,

    /// Base types of the generated data side.
    #[serde(default)]
    pub data: DataConfig,

    /// Annotations that drive generation.
    #[serde(default)]
    pub annotations: AnnotationsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub form_field: String,
    pub composite_field: String,
    pub value_field: String,
    pub form_field_menu: String,
    pub composite_field_extension: String,
    pub table: String,
    pub column: String,
    pub table_extension: String,

    /// Ordinal of the column marker's type parameter that carries the cell value type.
    pub column_value_ordinal: usize,

    /// Ordinal of the table-extension marker's type parameter naming the extended table.
    pub table_extension_owner_ordinal: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            form_field: "ui.api.IFormField".to_owned(),
            composite_field: "ui.api.ICompositeField".to_owned(),
            value_field: "ui.api.IValueField".to_owned(),
            form_field_menu: "ui.api.IFormFieldMenu".to_owned(),
            composite_field_extension: "ui.api.ICompositeFieldExtension".to_owned(),
            table: "ui.api.ITable".to_owned(),
            column: "ui.api.IColumn".to_owned(),
            table_extension: "ui.api.ITableExtension".to_owned(),
            column_value_ordinal: 0,
            table_extension_owner_ordinal: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Data types whose subtypes hold table rows.
    pub table_data_bases: Vec<String>,
    pub table_row_data: String,
    pub property_data: String,
    pub object: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            table_data_bases: vec![
                "ui.data.AbstractTableFieldBeanData".to_owned(),
                "ui.data.AbstractTablePageData".to_owned(),
            ],
            table_row_data: "ui.data.AbstractTableRowData".to_owned(),
            property_data: "ui.data.AbstractPropertyData".to_owned(),
            object: "java.lang.Object".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotationsConfig {
    /// Directive annotation on types and accessor methods.
    pub form_data: String,
    /// Directive annotation on table columns.
    pub column_data: String,
    pub page_data: String,
    pub order: String,
    pub generated: String,
    /// Meta-annotation that makes an annotation type eligible for copying.
    pub dto_relevant: String,
    pub replace: String,
    pub extends: String,
    #[serde(rename = "override")]
    pub override_: String,
    pub elements: DirectiveElements,
}

impl Default for AnnotationsConfig {
    fn default() -> Self {
        Self {
            form_data: "ui.dto.FormData".to_owned(),
            column_data: "ui.dto.ColumnData".to_owned(),
            page_data: "ui.dto.PageData".to_owned(),
            order: "ui.api.Order".to_owned(),
            generated: "javax.annotation.Generated".to_owned(),
            dto_relevant: "ui.dto.DtoRelevant".to_owned(),
            replace: "ui.api.Replace".to_owned(),
            extends: "ui.api.Extends".to_owned(),
            override_: "java.lang.Override".to_owned(),
            elements: DirectiveElements::default(),
        }
    }
}

impl AnnotationsConfig {
    /// Annotations that drive generation and are never copied to generated code.
    pub fn is_generation_marker(&self, name: &str) -> bool {
        let name = name.replace('$', ".");
        [
            &self.form_data,
            &self.column_data,
            &self.page_data,
            &self.order,
            &self.generated,
        ]
        .iter()
        .any(|marker| marker.replace('$', ".") == name)
    }
}

/// Element names read from the directive annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct DirectiveElements {
    pub value: String,
    pub command: String,
    pub default_subtype_command: String,
    pub generic_ordinal: String,
    pub interfaces: String,
}

impl Default for DirectiveElements {
    fn default() -> Self {
        Self {
            value: "value".to_owned(),
            command: "sdkCommand".to_owned(),
            default_subtype_command: "defaultSubtypeSdkCommand".to_owned(),
            generic_ordinal: "genericOrdinal".to_owned(),
            interfaces: "interfaces".to_owned(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Toml(err.message().to_owned())
    }
}

impl MirrorConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}
