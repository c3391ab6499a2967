//! Normalization from raw CMS records to the display view-models in
//! [`cosmo_core`].
//!
//! Nothing here fails: missing or malformed fields are replaced by the
//! defaults the pages expect (placeholder title, derived slug, empty image
//! URL), so one bad record never takes a page down.

use serde_json::Value;

use cosmo_core::{
    truncate_description, Description, MediaAsset, MediaFormats, PriceListItem, ProcedureDetails,
    Rendition, RichTextBlock, ServiceDetail, ServiceId, ServiceSummary, Work, DETAILS_PLACEHOLDER,
    UNTITLED,
};

use crate::types::{RawMedia, RawPriceListItem, RawProcedureDetails, RawService, RawWork};

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn record_id(id: Option<&ServiceId>) -> ServiceId {
    id.cloned().unwrap_or_default()
}

fn title_or_placeholder(title: Option<&str>) -> String {
    non_empty(title).unwrap_or(UNTITLED).to_owned()
}

fn slug_or_derived(slug: Option<&str>, id: &ServiceId) -> String {
    non_empty(slug).map_or_else(|| format!("service-{id}"), str::to_owned)
}

/// Converts one raw upload into a [`MediaAsset`].
///
/// An entry without a string `url` keeps its position with an empty URL.
/// Only the four known renditions are carried over, and only those that
/// have a URL.
#[must_use]
pub fn normalize_media(raw: &RawMedia) -> MediaAsset {
    let mut formats = MediaFormats::default();
    if let Some(raw_formats) = &raw.formats {
        let slots = [
            (Rendition::Thumbnail, &raw_formats.thumbnail),
            (Rendition::Small, &raw_formats.small),
            (Rendition::Medium, &raw_formats.medium),
            (Rendition::Large, &raw_formats.large),
        ];
        for (rendition, slot) in slots {
            if let Some(url) = slot.as_ref().and_then(|f| f.url.as_deref()) {
                formats.set(rendition, url);
            }
        }
    }

    MediaAsset {
        url: raw.url.clone().unwrap_or_default(),
        formats,
        mime: raw.mime.clone(),
        alternative_text: raw.alternative_text.clone(),
    }
}

/// Service cards only carry `{url, formats}` per image.
fn service_images(raw: Option<&[RawMedia]>) -> Vec<MediaAsset> {
    raw.unwrap_or_default()
        .iter()
        .map(|media| MediaAsset {
            mime: None,
            alternative_text: None,
            ..normalize_media(media)
        })
        .collect()
}

/// Card text: absent descriptions stay empty, strings are cut, anything
/// else points to the detail page.
fn card_description(description: Option<&Value>) -> String {
    match description {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => truncate_description(text),
        Some(_) => DETAILS_PLACEHOLDER.to_owned(),
    }
}

/// Search text: the whole string, or the detail-page pointer for anything
/// that is not a string (absent included).
fn search_description(description: Option<&Value>) -> String {
    match description {
        Some(Value::String(text)) => text.clone(),
        _ => DETAILS_PLACEHOLDER.to_owned(),
    }
}

fn build_summary(raw: &RawService, describe: fn(Option<&Value>) -> String) -> ServiceSummary {
    let id = record_id(raw.id.as_ref());
    ServiceSummary {
        title: title_or_placeholder(raw.title.as_deref()),
        description: describe(raw.description.as_ref()),
        slug: slug_or_derived(raw.slug.as_deref(), &id),
        image: service_images(raw.image.as_deref()),
        id,
    }
}

/// Builds the card/catalog view of a service.
///
/// String descriptions are cut to 100 characters plus `"..."`; rich-text
/// descriptions are replaced by a pointer to the detail page.
#[must_use]
pub fn to_summary(raw: &RawService) -> ServiceSummary {
    build_summary(raw, card_description)
}

/// Like [`to_summary`] but with the full string description, so search
/// matches text past the card cut-off. Records without a string
/// description get the detail-page pointer.
#[must_use]
pub fn to_search_entry(raw: &RawService) -> ServiceSummary {
    build_summary(raw, search_description)
}

/// Parses a rich-text block array. Blocks that are not objects are dropped;
/// anything other than an array is treated as absent.
fn rich_text(value: Option<&Value>) -> Option<Vec<RichTextBlock>> {
    let Value::Array(items) = value? else {
        return None;
    };
    Some(
        items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
    )
}

fn detail_description(value: Option<&Value>) -> Description {
    match value {
        Some(Value::String(text)) => Description::Text(text.clone()),
        Some(Value::Array(_)) => Description::Blocks(rich_text(value).unwrap_or_default()),
        _ => Description::default(),
    }
}

fn price_item(raw: &RawPriceListItem) -> PriceListItem {
    PriceListItem {
        id: raw.id,
        name: raw.name.clone(),
        description: raw.description.clone(),
        unit: raw.unit.clone(),
        duration: raw.duration.clone(),
    }
}

fn procedure_details(raw: &RawProcedureDetails) -> ProcedureDetails {
    ProcedureDetails {
        duration_summary: raw.duration_summary.clone(),
        frequency: raw.frequency.clone(),
        preparations_used: raw.preparations_used.clone(),
        anesthesia_info: raw.anesthesia_info.clone(),
        course_recommendation: raw.course_recommendation.clone(),
        effect_summary: raw.effect_summary.clone(),
    }
}

/// Builds the detail-page view of a service with the untruncated
/// description.
#[must_use]
pub fn to_detail(raw: &RawService) -> ServiceDetail {
    let id = record_id(raw.id.as_ref());
    ServiceDetail {
        title: title_or_placeholder(raw.title.as_deref()),
        description: detail_description(raw.description.as_ref()),
        slug: slug_or_derived(raw.slug.as_deref(), &id),
        image: service_images(raw.image.as_deref()),
        indications: rich_text(raw.indications.as_ref()),
        effect_description: rich_text(raw.effect_description.as_ref()),
        contraindications: rich_text(raw.contraindications.as_ref()),
        procedure_details: raw.procedure_details.as_ref().map(procedure_details),
        price_list: raw
            .price_list
            .as_ref()
            .map(|items| items.iter().map(price_item).collect()),
        note: raw
            .primechanie
            .clone()
            .filter(|note| !note.trim().is_empty()),
        id,
    }
}

/// Builds a portfolio entry. Photos keep their mime type and alternative
/// text, which decide how the entry is displayed.
#[must_use]
pub fn to_work(raw: &RawWork) -> Work {
    Work {
        id: record_id(raw.id.as_ref()),
        title: title_or_placeholder(raw.title.as_deref()),
        before_after: raw.before_after.unwrap_or(false),
        description: raw.description.clone().unwrap_or_default(),
        additional_description: raw
            .additional_description
            .clone()
            .filter(|text| !text.trim().is_empty()),
        photos: raw
            .photos
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(normalize_media)
            .collect(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
