#![deny(clippy::all, clippy::pedantic)]

use serde_json::{Value, json};
use vitrina::application::admin::AdminConsole;
use vitrina::application::admin::contacts::{CONTACT_GROUPS, ContactsPanel};

use crate::args::ContactsCmd;
use crate::client::{CliError, settle};
use crate::print::print_json;

pub async fn handle(console: &mut AdminConsole, cmd: &ContactsCmd) -> Result<(), CliError> {
    let panels = console.panels_mut().ok_or(CliError::NotLoggedIn)?;
    let result = run(&mut panels.contacts, cmd).await;
    let output = settle(console, result).await?;
    print_json(&output)
}

async fn run(panel: &mut ContactsPanel, cmd: &ContactsCmd) -> Result<Value, CliError> {
    panel.load().await?;
    if let ContactsCmd::Set { key, value } = cmd {
        panel.set(key, value.as_str())?;
        panel.save().await?;
    }
    Ok(grouped(panel))
}

/// Settings in form order, unknown stored keys omitted.
fn grouped(panel: &ContactsPanel) -> Value {
    let groups: Vec<Value> = CONTACT_GROUPS
        .iter()
        .map(|group| {
            let fields: Vec<Value> = group
                .fields
                .iter()
                .map(|field| {
                    json!({
                        "key": field.key,
                        "label": field.label,
                        "value": panel.get(field.key),
                    })
                })
                .collect();
            json!({ "title": group.title, "fields": fields })
        })
        .collect();
    Value::Array(groups)
}
