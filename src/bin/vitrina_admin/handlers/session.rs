#![deny(clippy::all, clippy::pedantic)]

use serde_json::json;

use crate::client::{CliError, Ctx, env_key};
use crate::io::read_key_from_stdin;
use crate::print::print_json;

pub async fn login(ctx: &Ctx) -> Result<(), CliError> {
    let key = match env_key() {
        Some(key) => key,
        None => read_key_from_stdin()?,
    };
    let mut console = ctx.console()?;
    console.login(&key).await?;
    let categories = console
        .panels()
        .map_or(0, |panels| panels.categories.records().len());
    print_json(&json!({
        "state": console.session().state().as_str(),
        "categories": categories,
        "key_file": ctx.settings.session.key_file.display().to_string(),
    }))
}

pub async fn logout(ctx: &Ctx) -> Result<(), CliError> {
    let mut console = ctx.console()?;
    console.logout().await?;
    print_json(&json!({ "state": console.session().state().as_str() }))
}

/// Re-verify the stored key without prompting.
pub async fn status(ctx: &Ctx) -> Result<(), CliError> {
    let mut console = ctx.console()?;
    console.restore().await?;
    print_json(&json!({ "state": console.session().state().as_str() }))
}
