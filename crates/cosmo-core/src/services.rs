//! Display-ready service records.
//!
//! These are built fresh from CMS records on every render and never
//! persisted. Missing CMS fields are replaced by the defaults below rather
//! than reported as errors.

use serde::{Deserialize, Serialize};

use crate::media::MediaAsset;
use crate::rich_text::{blocks_plain_text, RichTextBlock};

/// Title shown for services the CMS has no title for.
pub const UNTITLED: &str = "Без названия";

/// Summary text for services whose description is structured rich text.
pub const DETAILS_PLACEHOLDER: &str = "Подробности смотрите на странице услуги.";

/// Maximum number of characters kept in a summary description.
pub const SUMMARY_DESCRIPTION_LIMIT: usize = 100;

/// CMS record identifier. Numeric in current CMS versions, textual in some
/// document-based setups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceId {
    Int(i64),
    Text(String),
}

impl Default for ServiceId {
    fn default() -> Self {
        ServiceId::Int(0)
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceId::Int(id) => write!(f, "{id}"),
            ServiceId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ServiceId {
    fn from(id: i64) -> Self {
        ServiceId::Int(id)
    }
}

/// Card/catalog view of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub id: ServiceId,
    /// Never empty; [`UNTITLED`] when the CMS has no title.
    pub title: String,
    pub description: String,
    pub slug: String,
    pub image: Vec<MediaAsset>,
}

/// A service description: either plain text or rich-text blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Blocks(Vec<RichTextBlock>),
}

impl Default for Description {
    fn default() -> Self {
        Description::Text(String::new())
    }
}

impl Description {
    #[must_use]
    pub fn plain_text(&self) -> String {
        match self {
            Description::Text(text) => text.clone(),
            Description::Blocks(blocks) => blocks_plain_text(blocks),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Description::Text(text) => Some(text),
            Description::Blocks(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListItem {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureDetails {
    pub duration_summary: Option<String>,
    pub frequency: Option<String>,
    pub preparations_used: Option<String>,
    pub anesthesia_info: Option<String>,
    pub course_recommendation: Option<String>,
    pub effect_summary: Option<String>,
}

impl ProcedureDetails {
    /// Labelled fields that carry a value, in display order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("Длительность", &self.duration_summary),
            ("Периодичность", &self.frequency),
            ("Препараты", &self.preparations_used),
            ("Обезболивание", &self.anesthesia_info),
            ("Рекомендуемый курс", &self.course_recommendation),
            ("Эффект", &self.effect_summary),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (label, v))
        })
        .collect()
    }
}

/// Detail-page view of a service with the untruncated description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDetail {
    pub id: ServiceId,
    pub title: String,
    pub description: Description,
    pub slug: String,
    pub image: Vec<MediaAsset>,
    pub indications: Option<Vec<RichTextBlock>>,
    pub effect_description: Option<Vec<RichTextBlock>>,
    pub contraindications: Option<Vec<RichTextBlock>>,
    pub procedure_details: Option<ProcedureDetails>,
    pub price_list: Option<Vec<PriceListItem>>,
    pub note: Option<String>,
}

/// Keeps the first [`SUMMARY_DESCRIPTION_LIMIT`] characters of `text`,
/// appending `"..."` only when something was cut.
#[must_use]
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(SUMMARY_DESCRIPTION_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}
