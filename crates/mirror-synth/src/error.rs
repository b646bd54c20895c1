use crate::directive::InclusionPolicy;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthError {
    #[error("{ty} is not marked for creation (policy {policy:?})")]
    NotCreate { ty: String, policy: InclusionPolicy },
    #[error("no derived type name for {ty}")]
    MissingDerivedType { ty: String },
}

pub type Result<T, E = SynthError> = std::result::Result<T, E>;
