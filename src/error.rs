use thiserror::Error;

#[derive(Error, Debug)]
pub enum LotusError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Input Error: {0}")]
    Input(String),

    #[error("Evaluation Failure: {0}")]
    Evaluation(String),
}

pub type LcResult<T> = Result<T, LotusError>;
