use c8d_cfg::AnalysisError;
use thiserror::Error;

/// Decompiler errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ROM is {size} bytes, at most {max} fit above the load address")]
    RomTooLarge { size: usize, max: usize },
    #[error("analysis incomplete: {pending} addresses still pending")]
    AnalysisIncomplete { pending: usize },
    #[error("analysis already finalized")]
    AlreadyFinalized,
    #[error("analysis not finalized: call finalize before {0}")]
    NotFinalized(&'static str),
}

impl From<AnalysisError> for Error {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::RomTooLarge { size, max } => Self::RomTooLarge { size, max },
            AnalysisError::Incomplete { pending } => Self::AnalysisIncomplete { pending },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
