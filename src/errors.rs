// errors.rs
use crate::mailer::MailerError;
use crate::scraper::ScraperError;
use thiserror::Error;

/// Errors surfaced to the CLI, either from the pipeline itself
/// (config, files, rendering) or from downstream layers (DB, scraper).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database Error: {0}")]
    DbError(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scraper Error: {0}")]
    Scraper(#[from] ScraperError),

    #[error("Mail Error: {0}")]
    Mail(#[from] MailerError),

    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML Error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::DbError(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        AppError::XlsxError(e.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(e: url::ParseError) -> Self {
        AppError::Scraper(ScraperError::Url(e))
    }
}

pub type AppResult<T> = Result<T, AppError>;
