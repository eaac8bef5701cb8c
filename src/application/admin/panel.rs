//! The generic create/edit/list/toggle/delete controller.
//!
//! One [`ResourcePanel`] drives every admin collection. What differs per
//! collection (record shape, defaults, required fields, response keys) is
//! supplied by a [`ResourceKind`] descriptor. The panel never patches its
//! list locally: every mutation is followed by a reload, and the reloaded
//! list is the only thing callers get to see.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use vitrina_api_types::{DELETED_KEY, ERROR_KEY, RecordId, Resource, ToggleField};

use crate::application::admin::uploads::{ImageFile, ImageUploader};
use crate::application::error::PanelError;
use crate::application::transport::Gateway;
use crate::application::ui::{AdminUi, Toast};
use crate::domain::error::ValidationError;

/// Static description of one admin collection.
pub trait ResourceKind: Send + Sync + 'static {
    type Record: DeserializeOwned + Clone + Send + Sync;
    /// Editable staging copy. `Default` is the create-mode form.
    type Draft: Serialize + DeserializeOwned + Clone + Default + PartialEq + Send + Sync;
    type Payload: Serialize;

    const RESOURCE: Resource;
    /// Human label used in toasts and prompts.
    const LABEL: &'static str;
    /// Upload folder for the record's image, if it has one.
    const UPLOAD_FOLDER: Option<&'static str> = None;

    fn id(record: &Self::Record) -> RecordId;

    fn title(record: &Self::Record) -> &str;

    fn draft_from(record: &Self::Record) -> Self::Draft;

    /// Validate the draft and coerce it into the wire shape.
    fn payload(draft: &Self::Draft) -> Result<Self::Payload, ValidationError>;

    /// Current value of a toggleable flag, `None` if the kind lacks it.
    fn flag(record: &Self::Record, field: ToggleField) -> Option<bool>;

    fn image_slot(_draft: &mut Self::Draft) -> Option<&mut String> {
        None
    }

    /// Apply a title edit. Kinds that derive other fields from the title
    /// only do so while `creating`.
    fn retitle(draft: &mut Self::Draft, title: &str, creating: bool);
}

/// Kinds whose records may be removed outright. The rest are deactivated
/// instead because other records depend on them.
pub trait Deletable: ResourceKind {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

pub struct ResourcePanel<K: ResourceKind> {
    gateway: Gateway,
    ui: Arc<dyn AdminUi>,
    records: Vec<K::Record>,
    draft: K::Draft,
    editing: Option<RecordId>,
}

impl<K: ResourceKind> ResourcePanel<K> {
    pub fn new(gateway: Gateway, ui: Arc<dyn AdminUi>) -> Self {
        Self::with_records(gateway, ui, Vec::new())
    }

    /// Build a panel over a list the caller already fetched.
    pub fn with_records(gateway: Gateway, ui: Arc<dyn AdminUi>, records: Vec<K::Record>) -> Self {
        Self {
            gateway,
            ui,
            records,
            draft: K::Draft::default(),
            editing: None,
        }
    }

    pub fn records(&self) -> &[K::Record] {
        &self.records
    }

    pub fn record(&self, id: RecordId) -> Option<&K::Record> {
        self.records.iter().find(|record| K::id(record) == id)
    }

    pub fn draft(&self) -> &K::Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut K::Draft {
        &mut self.draft
    }

    /// Id of the record being edited; `None` means create mode.
    pub fn editing(&self) -> Option<RecordId> {
        self.editing
    }

    pub fn start_create(&mut self) {
        self.editing = None;
        self.draft = K::Draft::default();
    }

    pub fn start_edit(&mut self, id: RecordId) -> Result<(), PanelError> {
        let record = self.record(id).ok_or(PanelError::UnknownRecord {
            resource: K::RESOURCE,
            id,
        })?;
        self.draft = K::draft_from(record);
        self.editing = Some(id);
        self.ui.focus_editor();
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.start_create();
    }

    pub fn set_title(&mut self, title: &str) {
        K::retitle(&mut self.draft, title, self.editing.is_none());
    }

    /// Overlay named draft fields from a JSON object.
    ///
    /// A `title` key goes through [`set_title`](Self::set_title) first so
    /// derived fields follow it; explicit values for those fields still win.
    pub fn apply_fields(&mut self, fields: &Map<String, Value>) -> Result<(), PanelError> {
        match fields.get("title") {
            None => {}
            Some(Value::String(title)) => self.set_title(title),
            Some(_) => return Err(ValidationError::new("title", "title must be a string").into()),
        }
        let mut current = match serde_json::to_value(&self.draft) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(err) => return Err(PanelError::Malformed(err.to_string())),
        };
        for (key, value) in fields {
            if key == "title" {
                continue;
            }
            if !current.contains_key(key) {
                return Err(ValidationError::new("fields", format!("unknown field `{key}`")).into());
            }
            current.insert(key.clone(), value.clone());
        }
        self.draft = serde_json::from_value(Value::Object(current))
            .map_err(|err| ValidationError::new("fields", err.to_string()))?;
        Ok(())
    }

    /// Replace the list with the server's current view.
    pub async fn reload(&mut self) -> Result<&[K::Record], PanelError> {
        let fetched = self.fetch().await;
        match fetched {
            Ok(records) => {
                self.records = records;
                Ok(&self.records)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    async fn fetch(&self) -> Result<Vec<K::Record>, PanelError> {
        let response = self
            .gateway
            .call(Method::GET, K::RESOURCE, None, None)
            .await?;
        decode_list::<K::Record>(&response, K::RESOURCE)
    }

    pub async fn save(&mut self) -> Result<SaveOutcome, PanelError> {
        let payload = match K::payload(&self.draft) {
            Ok(payload) => payload,
            Err(err) => {
                debug!(resource = %K::RESOURCE, field = err.field, "draft rejected locally");
                return Err(self.report(err.into()));
            }
        };
        let body = serde_json::to_value(&payload)
            .map_err(|err| self.report(PanelError::Malformed(err.to_string())))?;
        let (method, outcome) = match self.editing {
            Some(_) => (Method::PUT, SaveOutcome::Updated),
            None => (Method::POST, SaveOutcome::Created),
        };

        let response = match self
            .gateway
            .call(method, K::RESOURCE, Some(body), self.editing)
            .await
        {
            Ok(response) => response,
            Err(err) => return Err(self.report(err.into())),
        };
        if let Err(err) = expect_key(&response, K::RESOURCE.singular()) {
            return Err(self.report(err));
        }

        info!(resource = %K::RESOURCE, id = ?self.editing, ?outcome, "record saved");
        let verb = match outcome {
            SaveOutcome::Created => "created",
            SaveOutcome::Updated => "updated",
        };
        self.ui.toast(Toast::success(format!("{} {verb}", K::LABEL)));
        self.start_create();
        self.reload().await?;
        Ok(outcome)
    }

    /// Flip one boolean flag server-side and return its reloaded value.
    pub async fn toggle(
        &mut self,
        id: RecordId,
        field: ToggleField,
    ) -> Result<Option<bool>, PanelError> {
        let current = match self.record(id) {
            None => {
                return Err(self.report(PanelError::UnknownRecord {
                    resource: K::RESOURCE,
                    id,
                }));
            }
            Some(record) => K::flag(record, field),
        };
        let Some(current) = current else {
            return Err(self.report(PanelError::UnsupportedToggle {
                resource: K::RESOURCE,
                field,
            }));
        };

        let mut body = Map::new();
        body.insert(field.as_str().to_string(), Value::Bool(!current));
        let response = match self
            .gateway
            .call(Method::PATCH, K::RESOURCE, Some(Value::Object(body)), Some(id))
            .await
        {
            Ok(response) => response,
            Err(err) => return Err(self.report(err.into())),
        };

        let rejection = rejection(&response);
        self.reload().await?;
        if let Some(message) = rejection {
            warn!(resource = %K::RESOURCE, id, field = field.as_str(), "toggle rejected");
            return Err(self.report(PanelError::Rejected(message)));
        }
        Ok(self.record(id).and_then(|record| K::flag(record, field)))
    }

    /// Upload an image and place its hosted URL into the draft.
    ///
    /// A refused key comes back as [`PanelError::Unauthorized`] so the
    /// session can be closed; the draft is untouched on any failure.
    pub async fn attach_image(
        &mut self,
        uploader: &ImageUploader,
        file: &ImageFile,
    ) -> Result<String, PanelError> {
        let Some(folder) = K::UPLOAD_FOLDER else {
            return Err(self.report(PanelError::NoImage {
                resource: K::RESOURCE,
            }));
        };
        let url = match uploader.try_upload(file, folder).await {
            Ok(url) => url,
            Err(err) => {
                warn!(resource = %K::RESOURCE, file = %file.file_name, error = %err, "image not attached");
                return Err(self.report(err.into()));
            }
        };
        if let Some(slot) = K::image_slot(&mut self.draft) {
            *slot = url.clone();
        }
        Ok(url)
    }

    fn report(&self, err: PanelError) -> PanelError {
        if let Some(message) = err.toast_message() {
            self.ui.toast(Toast::error(message));
        }
        err
    }
}

impl<K: Deletable> ResourcePanel<K> {
    pub async fn delete(&mut self, id: RecordId) -> Result<(), PanelError> {
        let Some(record) = self.record(id) else {
            return Err(self.report(PanelError::UnknownRecord {
                resource: K::RESOURCE,
                id,
            }));
        };
        let prompt = format!("Delete {} \"{}\"?", K::LABEL.to_lowercase(), K::title(record));
        if !self.ui.confirm(&prompt) {
            debug!(resource = %K::RESOURCE, id, "delete declined");
            return Err(PanelError::Declined);
        }

        let response = match self
            .gateway
            .call(Method::DELETE, K::RESOURCE, None, Some(id))
            .await
        {
            Ok(response) => response,
            Err(err) => return Err(self.report(err.into())),
        };
        if let Err(err) = expect_key(&response, DELETED_KEY) {
            return Err(self.report(err));
        }

        info!(resource = %K::RESOURCE, id, "record deleted");
        self.ui.toast(Toast::success(format!("{} deleted", K::LABEL)));
        if self.editing == Some(id) {
            self.start_create();
        }
        self.reload().await?;
        Ok(())
    }
}

/// Blank optional text goes over the wire as `null`.
pub(crate) fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The server's `error` message, if the body carries one.
pub(crate) fn rejection(response: &Value) -> Option<String> {
    match response.get(ERROR_KEY)? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

/// Succeed when `key` is present and truthy; otherwise classify the body.
pub(crate) fn expect_key(response: &Value, key: &str) -> Result<(), PanelError> {
    match response.get(key) {
        Some(Value::Null) | Some(Value::Bool(false)) | None => {}
        Some(_) => return Ok(()),
    }
    match rejection(response) {
        Some(message) => Err(PanelError::Rejected(message)),
        None => Err(PanelError::Malformed(format!("response lacks `{key}`"))),
    }
}

pub(crate) fn decode_list<T: DeserializeOwned>(
    response: &Value,
    resource: Resource,
) -> Result<Vec<T>, PanelError> {
    if let Some(message) = rejection(response) {
        return Err(PanelError::Rejected(message));
    }
    let items = response
        .get(resource.as_str())
        .ok_or_else(|| PanelError::Malformed(format!("response lacks `{resource}`")))?;
    serde_json::from_value(items.clone()).map_err(|err| PanelError::Malformed(err.to_string()))
}
