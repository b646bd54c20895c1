use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// A signature encoding that could not be decoded.
///
/// Every variant carries the offending fragment so callers can report it
/// without re-slicing the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("empty signature")]
    Empty,
    #[error("unexpected end of signature: {0}")]
    UnexpectedEnd(String),
    #[error("unknown signature kind '{kind}' in {fragment}")]
    UnknownKind { kind: char, fragment: String },
    #[error("unterminated type argument list in {0}")]
    Unterminated(String),
    #[error("void is not a valid component type in {0}")]
    MisplacedVoid(String),
    #[error("trailing input '{rest}' after signature {signature}")]
    Trailing { signature: String, rest: String },
}
