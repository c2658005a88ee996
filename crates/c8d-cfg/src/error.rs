use thiserror::Error;

/// Analysis errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("ROM is {size} bytes, at most {max} fit above the load address")]
    RomTooLarge { size: usize, max: usize },
    #[error("analysis incomplete: {pending} addresses still pending")]
    Incomplete { pending: usize },
}
