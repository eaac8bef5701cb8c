use serde::{Deserialize, Serialize};
use vitrina_api_types::{Article, ArticlePayload, RecordId, Resource, ToggleField};

use crate::application::admin::panel::{Deletable, ResourceKind, optional_text};
use crate::domain::error::ValidationError;
use crate::domain::slug::slug_candidate;

pub const DEFAULT_CATEGORY: &str = "Статья";
pub const DEFAULT_READ_TIME: &str = "5 мин";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleDraft {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub image_url: String,
    /// Free-text label, unrelated to catalog categories.
    pub category: String,
    pub read_time: String,
    pub is_published: bool,
    pub sort_order: i32,
}

impl Default for ArticleDraft {
    fn default() -> Self {
        Self {
            slug: String::new(),
            title: String::new(),
            excerpt: String::new(),
            content: String::new(),
            image_url: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            read_time: DEFAULT_READ_TIME.to_string(),
            is_published: true,
            sort_order: 0,
        }
    }
}

pub struct ArticleKind;

impl ResourceKind for ArticleKind {
    type Record = Article;
    type Draft = ArticleDraft;
    type Payload = ArticlePayload;

    const RESOURCE: Resource = Resource::Articles;
    const LABEL: &'static str = "Article";
    const UPLOAD_FOLDER: Option<&'static str> = Some("blog");

    fn id(record: &Article) -> RecordId {
        record.id
    }

    fn title(record: &Article) -> &str {
        &record.title
    }

    fn draft_from(record: &Article) -> ArticleDraft {
        ArticleDraft {
            slug: record.slug.clone(),
            title: record.title.clone(),
            excerpt: record.excerpt.clone().unwrap_or_default(),
            content: record.content.clone().unwrap_or_default(),
            image_url: record.image_url.clone().unwrap_or_default(),
            category: record.category.clone(),
            read_time: record.read_time.clone(),
            is_published: record.is_published,
            sort_order: record.sort_order,
        }
    }

    fn payload(draft: &ArticleDraft) -> Result<ArticlePayload, ValidationError> {
        if draft.title.trim().is_empty() {
            return Err(ValidationError::new("title", "Enter a title"));
        }
        if draft.slug.trim().is_empty() {
            return Err(ValidationError::new("slug", "Enter a slug"));
        }
        Ok(ArticlePayload {
            slug: draft.slug.trim().to_string(),
            title: draft.title.trim().to_string(),
            excerpt: optional_text(&draft.excerpt),
            content: optional_text(&draft.content),
            image_url: optional_text(&draft.image_url),
            category: draft.category.trim().to_string(),
            read_time: draft.read_time.trim().to_string(),
            is_published: draft.is_published,
            sort_order: draft.sort_order,
        })
    }

    fn flag(record: &Article, field: ToggleField) -> Option<bool> {
        match field {
            ToggleField::Published => Some(record.is_published),
            _ => None,
        }
    }

    fn image_slot(draft: &mut ArticleDraft) -> Option<&mut String> {
        Some(&mut draft.image_url)
    }

    /// The slug follows the title only for new articles; published links
    /// must survive a corrected title.
    fn retitle(draft: &mut ArticleDraft, title: &str, creating: bool) {
        draft.title = title.to_string();
        if creating {
            draft.slug = slug_candidate(title);
        }
    }
}

impl Deletable for ArticleKind {}
