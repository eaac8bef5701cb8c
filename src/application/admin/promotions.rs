use serde::{Deserialize, Serialize};
use vitrina_api_types::{Promotion, PromotionPayload, RecordId, Resource, ToggleField};

use crate::application::admin::panel::{Deletable, ResourceKind, optional_text};
use crate::domain::error::ValidationError;

/// Badge captions offered by the promotion form.
pub const BADGE_PRESETS: [&str; 6] = ["СКИДКА", "ПОДАРОК", "АКЦИЯ", "НОВИНКА", "ХИТ", "РАСПРОДАЖА"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromotionDraft {
    pub title: String,
    pub description: String,
    pub badge: String,
    pub badge_value: String,
    pub button_text: String,
    pub button_url: String,
    pub expires_at: String,
    pub is_active: bool,
    pub sort_order: i32,
}

impl Default for PromotionDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            badge: BADGE_PRESETS[0].to_string(),
            badge_value: String::new(),
            button_text: "Смотреть товары".to_string(),
            button_url: "/catalog".to_string(),
            expires_at: String::new(),
            is_active: true,
            sort_order: 0,
        }
    }
}

pub struct PromotionKind;

impl ResourceKind for PromotionKind {
    type Record = Promotion;
    type Draft = PromotionDraft;
    type Payload = PromotionPayload;

    const RESOURCE: Resource = Resource::Promotions;
    const LABEL: &'static str = "Promotion";

    fn id(record: &Promotion) -> RecordId {
        record.id
    }

    fn title(record: &Promotion) -> &str {
        &record.title
    }

    fn draft_from(record: &Promotion) -> PromotionDraft {
        PromotionDraft {
            title: record.title.clone(),
            description: record.description.clone().unwrap_or_default(),
            badge: record.badge.clone(),
            badge_value: record.badge_value.clone(),
            button_text: record.button_text.clone(),
            button_url: record.button_url.clone(),
            expires_at: record.expires_at.clone(),
            is_active: record.is_active,
            sort_order: record.sort_order,
        }
    }

    fn payload(draft: &PromotionDraft) -> Result<PromotionPayload, ValidationError> {
        if draft.title.trim().is_empty() {
            return Err(ValidationError::new("title", "Enter a title"));
        }
        Ok(PromotionPayload {
            title: draft.title.trim().to_string(),
            description: optional_text(&draft.description),
            badge: draft.badge.clone(),
            badge_value: draft.badge_value.clone(),
            button_text: draft.button_text.clone(),
            button_url: draft.button_url.clone(),
            expires_at: draft.expires_at.clone(),
            is_active: draft.is_active,
            sort_order: draft.sort_order,
        })
    }

    fn flag(record: &Promotion, field: ToggleField) -> Option<bool> {
        match field {
            ToggleField::Active => Some(record.is_active),
            _ => None,
        }
    }

    fn retitle(draft: &mut PromotionDraft, title: &str, _creating: bool) {
        draft.title = title.to_string();
    }
}

impl Deletable for PromotionKind {}
