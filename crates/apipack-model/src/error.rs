use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown lifecycle phase '{0}'")]
    UnknownPhase(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
