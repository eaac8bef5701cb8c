use serde::{Deserialize, Serialize};
use vitrina_api_types::{Banner, BannerGradient, BannerPayload, RecordId, Resource, ToggleField};

use crate::application::admin::panel::{Deletable, ResourceKind, optional_text};
use crate::domain::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerDraft {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub badge: String,
    pub button_text: String,
    pub button_url: String,
    pub gradient: BannerGradient,
    pub is_active: bool,
    pub sort_order: i32,
}

impl Default for BannerDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            image_url: String::new(),
            badge: "Новость".to_string(),
            button_text: "Подробнее".to_string(),
            button_url: "/catalog".to_string(),
            gradient: BannerGradient::Gray,
            is_active: true,
            sort_order: 0,
        }
    }
}

pub struct BannerKind;

impl ResourceKind for BannerKind {
    type Record = Banner;
    type Draft = BannerDraft;
    type Payload = BannerPayload;

    const RESOURCE: Resource = Resource::Banners;
    const LABEL: &'static str = "Banner";
    const UPLOAD_FOLDER: Option<&'static str> = Some("banners");

    fn id(record: &Banner) -> RecordId {
        record.id
    }

    fn title(record: &Banner) -> &str {
        &record.title
    }

    fn draft_from(record: &Banner) -> BannerDraft {
        BannerDraft {
            title: record.title.clone(),
            description: record.description.clone().unwrap_or_default(),
            image_url: record.image_url.clone().unwrap_or_default(),
            badge: record.badge.clone(),
            button_text: record.button_text.clone(),
            button_url: record.button_url.clone(),
            gradient: BannerGradient::from_token(&record.gradient),
            is_active: record.is_active,
            sort_order: record.sort_order,
        }
    }

    fn payload(draft: &BannerDraft) -> Result<BannerPayload, ValidationError> {
        if draft.title.trim().is_empty() {
            return Err(ValidationError::new("title", "Enter a title"));
        }
        Ok(BannerPayload {
            title: draft.title.trim().to_string(),
            description: optional_text(&draft.description),
            image_url: optional_text(&draft.image_url),
            badge: draft.badge.clone(),
            button_text: draft.button_text.clone(),
            button_url: draft.button_url.clone(),
            gradient: draft.gradient,
            is_active: draft.is_active,
            sort_order: draft.sort_order,
        })
    }

    fn flag(record: &Banner, field: ToggleField) -> Option<bool> {
        match field {
            ToggleField::Active => Some(record.is_active),
            _ => None,
        }
    }

    fn image_slot(draft: &mut BannerDraft) -> Option<&mut String> {
        Some(&mut draft.image_url)
    }

    fn retitle(draft: &mut BannerDraft, title: &str, _creating: bool) {
        draft.title = title.to_string();
    }
}

impl Deletable for BannerKind {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_theme_loads_as_gray() {
        let banner: Banner = serde_json::from_value(json!({
            "id": 1, "title": "Осень", "gradient": "from-lime-500 to-lime-300"
        }))
        .expect("banner");
        assert_eq!(BannerKind::draft_from(&banner).gradient, BannerGradient::Gray);
    }

    #[test]
    fn payload_carries_the_theme_token() {
        let draft = BannerDraft {
            title: "Новая коллекция".into(),
            gradient: BannerGradient::Purple,
            ..BannerDraft::default()
        };
        let value = serde_json::to_value(BannerKind::payload(&draft).expect("payload"))
            .expect("serialize");
        assert_eq!(value["gradient"], "from-purple-700/90 to-purple-500/70");
        assert_eq!(value["badge"], "Новость");
        assert!(value["description"].is_null());
    }
}
