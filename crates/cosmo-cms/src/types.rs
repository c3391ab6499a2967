//! Wire types for the headless CMS REST API.
//!
//! ## Envelope
//! Every collection endpoint answers `{"data": [...], "meta": {...}}`. Only
//! `data` is required; a body without a `data` array is a malformed
//! response.
//!
//! ## Record shape
//! Older CMS versions nest the fields of each record under an `attributes`
//! object next to the `id`; newer ones return the fields flat. [`CmsRecord`]
//! accepts both and [`CmsRecord::into_flat`] hands out the flat shape so
//! nothing downstream depends on the CMS version.
//!
//! ## Leniency
//! Field values of the wrong JSON type (a numeric `title`, a string
//! `before_after`) are treated as absent instead of failing the whole
//! response; the view-model builder replaces absent fields with defaults.
//! Media lists accept a bare array, a single object, or the older
//! `{"data": [...]}` relation wrapper.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use cosmo_core::ServiceId;

use crate::error::CmsError;

/// Deserializes `T`, or `None` when the value is null or has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserializes an array element by element; unreadable elements become
/// `T::default()` so positions are preserved. Non-arrays become `None`.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        )),
        _ => Ok(None),
    }
}

fn lenient_media<'de, D>(deserializer: D) -> Result<Option<Vec<RawMedia>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(media_from_value(Value::deserialize(deserializer)?))
}

fn media_from_value(value: Value) -> Option<Vec<RawMedia>> {
    match value {
        Value::Array(items) => Some(items.into_iter().map(media_item).collect()),
        Value::Object(mut map) => match map.remove("data") {
            Some(inner) => media_from_value(inner),
            None => Some(vec![media_item(Value::Object(map))]),
        },
        _ => None,
    }
}

fn media_item(value: Value) -> RawMedia {
    let record: CmsRecord<RawMedia> =
        serde_json::from_value(value).unwrap_or_else(|_| CmsRecord::Flat(RawMedia::default()));
    record.into_flat()
}

/// Attribute sets that carry their own record id in the flat shape.
pub trait CmsAttributes {
    /// Takes the id from the legacy wrapper when the attributes lack one.
    fn adopt_id(&mut self, id: Option<ServiceId>);
}

/// A record in either the legacy wrapped shape or the flat shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CmsRecord<T> {
    Legacy {
        #[serde(default, deserialize_with = "lenient")]
        id: Option<ServiceId>,
        attributes: T,
    },
    Flat(T),
}

impl<T: CmsAttributes> CmsRecord<T> {
    pub fn into_flat(self) -> T {
        match self {
            CmsRecord::Legacy { id, mut attributes } => {
                attributes.adopt_id(id);
                attributes
            }
            CmsRecord::Flat(attributes) => attributes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default, rename = "pageSize")]
    pub page_size: u32,
    #[serde(default, rename = "pageCount")]
    pub page_count: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default, deserialize_with = "lenient")]
    pub pagination: Option<Pagination>,
}

/// A parsed collection response with every record in the flat shape.
#[derive(Debug)]
pub struct Envelope<T> {
    pub data: Vec<T>,
    pub meta: Option<Meta>,
}

impl<T> Envelope<T>
where
    T: DeserializeOwned + Default + CmsAttributes,
{
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// - [`CmsError::Deserialize`] if `body` is not JSON.
    /// - [`CmsError::MalformedEnvelope`] if there is no `data` array.
    pub fn parse(body: &str, context: &str) -> Result<Self, CmsError> {
        let value: Value = serde_json::from_str(body).map_err(|e| CmsError::Deserialize {
            context: context.to_owned(),
            source: e,
        })?;
        Self::from_value(value, context)
    }

    /// # Errors
    ///
    /// Returns [`CmsError::MalformedEnvelope`] if there is no `data` array.
    pub fn from_value(value: Value, context: &str) -> Result<Self, CmsError> {
        let Value::Object(mut body) = value else {
            return Err(CmsError::MalformedEnvelope {
                context: context.to_owned(),
            });
        };
        let Some(Value::Array(items)) = body.remove("data") else {
            return Err(CmsError::MalformedEnvelope {
                context: context.to_owned(),
            });
        };

        let data = items
            .into_iter()
            .map(|item| {
                serde_json::from_value::<CmsRecord<T>>(item)
                    .map_or_else(|_| T::default(), CmsRecord::into_flat)
            })
            .collect();
        let meta = body
            .remove("meta")
            .and_then(|m| serde_json::from_value(m).ok());

        Ok(Self { data, meta })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

/// Renditions the CMS generated for an image. Other keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormats {
    #[serde(default, deserialize_with = "lenient")]
    pub thumbnail: Option<RawFormat>,
    #[serde(default, deserialize_with = "lenient")]
    pub small: Option<RawFormat>,
    #[serde(default, deserialize_with = "lenient")]
    pub medium: Option<RawFormat>,
    #[serde(default, deserialize_with = "lenient")]
    pub large: Option<RawFormat>,
}

/// An uploaded file. The CMS sends many more fields (hash, size, width,
/// provider, timestamps); only those used for display are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMedia {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub mime: Option<String>,
    #[serde(default, rename = "alternativeText", deserialize_with = "lenient")]
    pub alternative_text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub formats: Option<RawFormats>,
}

impl CmsAttributes for RawMedia {
    fn adopt_id(&mut self, id: Option<ServiceId>) {
        if self.id.is_none() {
            if let Some(ServiceId::Int(id)) = id {
                self.id = Some(id);
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPriceListItem {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProcedureDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub duration_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub preparations_used: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub anesthesia_info: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub course_recommendation: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub effect_summary: Option<String>,
}

/// A record of the services collection.
///
/// `description` stays a raw JSON value: it is a plain string on older
/// records and a rich-text block array on newer ones. The rich-text fields
/// (`indications`, `effect_description`, `contraindications`) are block
/// arrays or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawService {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<ServiceId>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_media")]
    pub image: Option<Vec<RawMedia>>,
    #[serde(default)]
    pub indications: Option<Value>,
    #[serde(default)]
    pub effect_description: Option<Value>,
    #[serde(default)]
    pub contraindications: Option<Value>,
    /// Free-text note ("примечание").
    #[serde(default, deserialize_with = "lenient")]
    pub primechanie: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub price_list: Option<Vec<RawPriceListItem>>,
    #[serde(default, deserialize_with = "lenient")]
    pub procedure_details: Option<RawProcedureDetails>,
}

impl CmsAttributes for RawService {
    fn adopt_id(&mut self, id: Option<ServiceId>) {
        if self.id.is_none() {
            self.id = id;
        }
    }
}

/// A record of the works (portfolio) collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWork {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<ServiceId>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub before_after: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub additional_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_media")]
    pub photos: Option<Vec<RawMedia>>,
}

impl CmsAttributes for RawWork {
    fn adopt_id(&mut self, id: Option<ServiceId>) {
        if self.id.is_none() {
            self.id = id;
        }
    }
}
