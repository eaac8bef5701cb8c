#![deny(clippy::all, clippy::pedantic)]

use serde::Serialize;
use serde_json::{Map, Value, json};
use vitrina::application::admin::articles::ArticleKind;
use vitrina::application::admin::banners::BannerKind;
use vitrina::application::admin::categories::CategoryKind;
use vitrina::application::admin::products::ProductKind;
use vitrina::application::admin::promotions::PromotionKind;
use vitrina::application::admin::uploads::ImageUploader;
use vitrina::application::admin::{
    AdminConsole, AdminPanels, Deletable, ResourceKind, ResourcePanel, SaveOutcome,
};
use vitrina_api_types::{RecordId, ToggleField};

use crate::args::{DeletableCmd, RecordCmd};
use crate::client::{CliError, settle};
use crate::io::{PreparedInput, prepare};
use crate::print::{print_json, to_value};

/// Picks one panel out of the console together with the shared uploader.
pub type Select<K> = fn(&mut AdminPanels) -> (&mut ResourcePanel<K>, &ImageUploader);

pub fn categories(panels: &mut AdminPanels) -> (&mut ResourcePanel<CategoryKind>, &ImageUploader) {
    (&mut panels.categories, &panels.uploader)
}

pub fn products(panels: &mut AdminPanels) -> (&mut ResourcePanel<ProductKind>, &ImageUploader) {
    (&mut panels.products, &panels.uploader)
}

pub fn articles(panels: &mut AdminPanels) -> (&mut ResourcePanel<ArticleKind>, &ImageUploader) {
    (&mut panels.articles, &panels.uploader)
}

pub fn banners(panels: &mut AdminPanels) -> (&mut ResourcePanel<BannerKind>, &ImageUploader) {
    (&mut panels.banners, &panels.uploader)
}

pub fn promotions(
    panels: &mut AdminPanels,
) -> (&mut ResourcePanel<PromotionKind>, &ImageUploader) {
    (&mut panels.promotions, &panels.uploader)
}

pub async fn handle<K>(
    console: &mut AdminConsole,
    select: Select<K>,
    default_flag: ToggleField,
    cmd: &RecordCmd,
) -> Result<(), CliError>
where
    K: ResourceKind,
    K::Record: Serialize,
{
    let input = match cmd {
        RecordCmd::Create { input } | RecordCmd::Update { input, .. } => prepare(input).await?,
        RecordCmd::List | RecordCmd::Toggle { .. } => PreparedInput::default(),
    };
    let panels = console.panels_mut().ok_or(CliError::NotLoggedIn)?;
    let (panel, uploader) = select(panels);
    let result = run(panel, uploader, default_flag, cmd, &input).await;
    let output = settle(console, result).await?;
    print_json(&output)
}

pub async fn handle_deletable<K>(
    console: &mut AdminConsole,
    select: Select<K>,
    default_flag: ToggleField,
    cmd: &DeletableCmd,
) -> Result<(), CliError>
where
    K: Deletable,
    K::Record: Serialize,
{
    match cmd {
        DeletableCmd::Record(cmd) => handle(console, select, default_flag, cmd).await,
        DeletableCmd::Delete { id, .. } => {
            let panels = console.panels_mut().ok_or(CliError::NotLoggedIn)?;
            let (panel, _) = select(panels);
            let result = delete(panel, *id).await;
            let output = settle(console, result).await?;
            print_json(&output)
        }
    }
}

async fn run<K>(
    panel: &mut ResourcePanel<K>,
    uploader: &ImageUploader,
    default_flag: ToggleField,
    cmd: &RecordCmd,
    input: &PreparedInput,
) -> Result<Value, CliError>
where
    K: ResourceKind,
    K::Record: Serialize,
{
    match cmd {
        RecordCmd::List => {
            let records = panel.reload().await?;
            to_value(records)
        }
        RecordCmd::Create { .. } => {
            panel.start_create();
            stage(panel, uploader, input).await?;
            let outcome = panel.save().await?;
            saved(panel, outcome)
        }
        RecordCmd::Update { id, .. } => {
            panel.reload().await?;
            panel.start_edit(*id)?;
            stage(panel, uploader, input).await?;
            let outcome = panel.save().await?;
            saved(panel, outcome)
        }
        RecordCmd::Toggle { id, field } => {
            let field = field.map_or(default_flag, ToggleField::from);
            panel.reload().await?;
            let value = panel.toggle(*id, field).await?;
            Ok(json!({ "id": id, "field": field.as_str(), "value": value }))
        }
    }
}

async fn stage<K: ResourceKind>(
    panel: &mut ResourcePanel<K>,
    uploader: &ImageUploader,
    input: &PreparedInput,
) -> Result<(), CliError> {
    panel.apply_fields(&input.fields)?;
    let Some(image) = &input.image else {
        return Ok(());
    };
    panel.attach_image(uploader, image).await?;
    Ok(())
}

fn saved<K>(panel: &ResourcePanel<K>, outcome: SaveOutcome) -> Result<Value, CliError>
where
    K: ResourceKind,
    K::Record: Serialize,
{
    let outcome = match outcome {
        SaveOutcome::Created => "created",
        SaveOutcome::Updated => "updated",
    };
    with_records(panel, "outcome", json!(outcome))
}

async fn delete<K>(panel: &mut ResourcePanel<K>, id: RecordId) -> Result<Value, CliError>
where
    K: Deletable,
    K::Record: Serialize,
{
    panel.reload().await?;
    panel.delete(id).await?;
    with_records(panel, "deleted", json!(id))
}

/// `{key: value, <resource>: [reloaded records]}`.
fn with_records<K>(panel: &ResourcePanel<K>, key: &str, value: Value) -> Result<Value, CliError>
where
    K: ResourceKind,
    K::Record: Serialize,
{
    let mut out = Map::new();
    out.insert(key.to_string(), value);
    out.insert(K::RESOURCE.as_str().to_string(), to_value(panel.records())?);
    Ok(Value::Object(out))
}
