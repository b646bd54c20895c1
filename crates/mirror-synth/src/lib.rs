//! Derived-type synthesizer.
//!
//! Given a model type and an [`InclusionDirective`], the [`Synthesizer`]
//! builds the derived ("data") counterpart of the type: one nested unit per
//! created field, promoted properties, table row data and the typed row
//! accessors. The output is a [`SynthesizedType`] tree whose member order is
//! fixed by [`SortKey`], so repeated runs on an unchanged model give
//! identical trees.
//!
//! ```no_run
//! use mirror_config::MirrorConfig;
//! use mirror_model::{MemoryModel, ModelProvider};
//! use mirror_synth::Synthesizer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = MemoryModel::from_json(&std::fs::read_to_string("model.json")?)?;
//! let config = MirrorConfig::default();
//! let synth = Synthesizer::new(&model, &config);
//! let form = model.type_by_name("app.PersonForm").ok_or("missing form")?;
//! let data = synth.synthesize(form, &synth.directive_for(form))?;
//! println!("{} methods", data.counts().methods);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod batch;
mod body;
mod capability;
mod directive;
mod error;
mod naming;
mod output;
mod synth;
mod table;

pub use batch::{synthesize_batch, synthesize_batch_with_threads, BatchUnit, UnitOutcome};
pub use body::MethodBody;
pub use capability::{nested_kind, Capability, CapabilitySet, Content, KindInput, NestedKind};
pub use directive::{
    AnnotationDirectives, DirectiveSource, InclusionDirective, InclusionPolicy, SuperTypeDirective,
};
pub use error::{Result, SynthError};
pub use naming::{escape_keyword, form_data_name, row_data_name};
pub use output::{
    Counts, MemberCategory, SortKey, SynthesizedField, SynthesizedMethod, SynthesizedParameter,
    SynthesizedType,
};
pub use synth::{default_literal, Synthesizer, GENERATED_COMMENT};

pub use tokio_util::sync::CancellationToken;
