#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("form store is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, Error>;
