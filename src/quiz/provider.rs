//! Question providers

use std::path::{Path, PathBuf};

use super::question::QuestionRecord;
use crate::error::ProviderError;

/// External source of quiz content
pub trait QuestionProvider {
    /// Ordered question records. May fail; records are not yet validated.
    fn fetch_questions(&mut self) -> Result<Vec<QuestionRecord>, ProviderError>;
}

/// Parse the provider's JSON array format
pub fn parse_questions(json: &str) -> Result<Vec<QuestionRecord>, ProviderError> {
    let records: Vec<QuestionRecord> = serde_json::from_str(json)?;
    if records.is_empty() {
        return Err(ProviderError::Empty);
    }
    Ok(records)
}

/// Reads a JSON array of questions from disk on every fetch
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl QuestionProvider for JsonFileProvider {
    fn fetch_questions(&mut self) -> Result<Vec<QuestionRecord>, ProviderError> {
        let json = std::fs::read_to_string(&self.path).map_err(|source| ProviderError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_questions(&json)
    }
}

/// Fixed in-memory records
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    records: Vec<QuestionRecord>,
}

impl StaticProvider {
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self { records }
    }
}

impl QuestionProvider for StaticProvider {
    fn fetch_questions(&mut self) -> Result<Vec<QuestionRecord>, ProviderError> {
        if self.records.is_empty() {
            return Err(ProviderError::Empty);
        }
        Ok(self.records.clone())
    }
}
