use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::MirrorConfig;

/// JSON schema of the TOML config file, for editor tooling and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(MirrorConfig)
}
