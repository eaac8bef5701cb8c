#![deny(clippy::all, clippy::pedantic)]

use std::path::Path;

use serde_json::json;
use vitrina::application::admin::AdminConsole;
use vitrina::application::admin::uploads::ImageFile;

use crate::client::{CliError, settle};
use crate::print::print_json;

pub async fn handle(console: &mut AdminConsole, file: &Path, folder: &str) -> Result<(), CliError> {
    let image = ImageFile::read(file).await?;
    let uploader = &console.panels().ok_or(CliError::NotLoggedIn)?.uploader;
    let result = uploader
        .try_upload(&image, folder)
        .await
        .map_err(CliError::from);
    let url = settle(console, result).await?;
    print_json(&json!({ "url": url, "folder": folder }))
}
