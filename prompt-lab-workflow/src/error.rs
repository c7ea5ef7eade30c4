use prompt_lab_client::ClientError;
use prompt_lab_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Stage failed: {0}")]
    Stage(String),
}

pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;
