use serde::{Deserialize, Serialize};
use vitrina_api_types::{Category, CategoryPayload, RecordId, Resource, ToggleField};

use crate::application::admin::panel::{ResourceKind, optional_text};
use crate::domain::error::ValidationError;

pub const DEFAULT_ICON: &str = "Package";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryDraft {
    pub slug: String,
    pub name: String,
    pub icon: String,
    pub image_url: String,
    pub sort_order: i32,
    pub is_active: bool,
}

impl Default for CategoryDraft {
    fn default() -> Self {
        Self {
            slug: String::new(),
            name: String::new(),
            icon: DEFAULT_ICON.to_string(),
            image_url: String::new(),
            sort_order: 0,
            is_active: true,
        }
    }
}

/// Categories are referenced by products through their slug, so they are
/// deactivated rather than deleted and the slug is always typed by hand.
pub struct CategoryKind;

impl ResourceKind for CategoryKind {
    type Record = Category;
    type Draft = CategoryDraft;
    type Payload = CategoryPayload;

    const RESOURCE: Resource = Resource::Categories;
    const LABEL: &'static str = "Category";
    const UPLOAD_FOLDER: Option<&'static str> = Some("categories");

    fn id(record: &Category) -> RecordId {
        record.id
    }

    fn title(record: &Category) -> &str {
        &record.name
    }

    fn draft_from(record: &Category) -> CategoryDraft {
        CategoryDraft {
            slug: record.slug.clone(),
            name: record.name.clone(),
            icon: record.icon.clone().unwrap_or_default(),
            image_url: record.image_url.clone().unwrap_or_default(),
            sort_order: record.sort_order,
            is_active: record.is_active,
        }
    }

    fn payload(draft: &CategoryDraft) -> Result<CategoryPayload, ValidationError> {
        if draft.slug.trim().is_empty() || draft.name.trim().is_empty() {
            return Err(ValidationError::new("slug", "Fill in the slug and the name"));
        }
        let icon = match draft.icon.trim() {
            "" => DEFAULT_ICON.to_string(),
            icon => icon.to_string(),
        };
        Ok(CategoryPayload {
            slug: draft.slug.trim().to_string(),
            name: draft.name.trim().to_string(),
            icon,
            image_url: optional_text(&draft.image_url),
            sort_order: draft.sort_order,
            is_active: draft.is_active,
        })
    }

    fn flag(record: &Category, field: ToggleField) -> Option<bool> {
        match field {
            ToggleField::Active => Some(record.is_active),
            _ => None,
        }
    }

    fn image_slot(draft: &mut CategoryDraft) -> Option<&mut String> {
        Some(&mut draft.image_url)
    }

    fn retitle(draft: &mut CategoryDraft, title: &str, _creating: bool) {
        draft.name = title.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_required() {
        let draft = CategoryDraft {
            name: "Пряжа".into(),
            ..CategoryDraft::default()
        };
        let err = CategoryKind::payload(&draft).unwrap_err();
        assert_eq!(err.message, "Fill in the slug and the name");
    }

    #[test]
    fn renaming_never_touches_the_slug() {
        let mut draft = CategoryDraft {
            slug: "yarn".into(),
            ..CategoryDraft::default()
        };
        CategoryKind::retitle(&mut draft, "Пряжа для вязания", true);
        assert_eq!(draft.slug, "yarn");
        assert_eq!(draft.name, "Пряжа для вязания");
    }

    #[test]
    fn product_count_is_never_sent() {
        let record: Category = serde_json::from_value(serde_json::json!({
            "id": 2, "slug": "yarn", "name": "Пряжа", "product_count": 14
        }))
        .expect("category");
        let draft = CategoryKind::draft_from(&record);
        let payload = serde_json::to_value(CategoryKind::payload(&draft).expect("payload"))
            .expect("serialize");
        assert!(payload.get("product_count").is_none());
        assert_eq!(payload["icon"], "Package");
        assert!(payload["image_url"].is_null());
    }
}
