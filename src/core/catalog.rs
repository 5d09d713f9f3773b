use std::fs;
use std::path::Path;

use super::error::CoreError;
use super::types::LearningModule;

const BUILTIN_CATALOG: &str = include_str!("../../data/learning_modules.json");

pub fn builtin_catalog() -> Result<Vec<LearningModule>, CoreError> {
    parse_catalog(BUILTIN_CATALOG)
}

pub fn parse_catalog(json: &str) -> Result<Vec<LearningModule>, CoreError> {
    serde_json::from_str(json).map_err(CoreError::InvalidCatalog)
}

pub fn load_catalog(path: &Path) -> Result<Vec<LearningModule>, CoreError> {
    let raw = fs::read_to_string(path)?;
    parse_catalog(&raw)
}
