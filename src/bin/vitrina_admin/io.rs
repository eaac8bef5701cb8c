#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::io::{self, BufRead};

use serde_json::{Map, Value};
use vitrina::application::admin::uploads::ImageFile;

use crate::args::DraftInput;
use crate::client::CliError;

/// Draft fields and image read from disk before any panel is touched.
#[derive(Debug, Default)]
pub struct PreparedInput {
    pub fields: Map<String, Value>,
    pub image: Option<ImageFile>,
}

pub async fn prepare(input: &DraftInput) -> Result<PreparedInput, CliError> {
    let fields = read_fields(input)?;
    let image = match &input.image {
        Some(path) => Some(ImageFile::read(path).await?),
        None => None,
    };
    Ok(PreparedInput { fields, image })
}

/// `--data-file` wins over `--data`; neither means no field changes.
pub fn read_fields(input: &DraftInput) -> Result<Map<String, Value>, CliError> {
    let raw = if let Some(path) = &input.data_file {
        fs::read_to_string(path).map_err(|source| CliError::InputFile {
            path: path.display().to_string(),
            source,
        })?
    } else if let Some(data) = &input.data {
        data.clone()
    } else {
        return Ok(Map::new());
    };
    match serde_json::from_str(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CliError::InvalidInput(
            "draft fields must be a JSON object".into(),
        )),
        Err(e) => Err(CliError::InvalidInput(e.to_string())),
    }
}

/// First non-blank line of `reader`, trimmed.
pub fn read_key(reader: impl BufRead) -> Result<String, CliError> {
    for line in reader.lines() {
        let line = line.map_err(|e| CliError::InvalidInput(e.to_string()))?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }
    Err(CliError::MissingKey)
}

pub fn read_key_from_stdin() -> Result<String, CliError> {
    read_key(io::stdin().lock())
}
