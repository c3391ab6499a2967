//! CMS media assets and display-URL resolution.
//!
//! Every page that shows a picture goes through [`ImageResolver`]: it picks
//! the first asset of a sequence, prefers the requested rendition when the
//! CMS generated one, and turns relative upload paths into absolute URLs
//! against the CMS origin.

use serde::{Deserialize, Serialize};

/// A pre-generated resized variant of an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rendition {
    Thumbnail,
    Small,
    Medium,
    Large,
}

impl Rendition {
    pub const ALL: [Rendition; 4] = [
        Rendition::Thumbnail,
        Rendition::Small,
        Rendition::Medium,
        Rendition::Large,
    ];

    /// Key used for this rendition in the CMS `formats` object.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Rendition::Thumbnail => "thumbnail",
            Rendition::Small => "small",
            Rendition::Medium => "medium",
            Rendition::Large => "large",
        }
    }

    /// Parses a rendition name. Anything else (including `"original"`)
    /// yields `None`, which resolves to the asset's own URL.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

impl std::fmt::Display for Rendition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatUrl {
    pub url: String,
}

/// The subset of CMS renditions this site knows about. Renditions the CMS
/// did not generate stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFormats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<FormatUrl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<FormatUrl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<FormatUrl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<FormatUrl>,
}

impl MediaFormats {
    #[must_use]
    pub fn get(&self, rendition: Rendition) -> Option<&FormatUrl> {
        match rendition {
            Rendition::Thumbnail => self.thumbnail.as_ref(),
            Rendition::Small => self.small.as_ref(),
            Rendition::Medium => self.medium.as_ref(),
            Rendition::Large => self.large.as_ref(),
        }
    }

    pub fn set(&mut self, rendition: Rendition, url: impl Into<String>) {
        let slot = match rendition {
            Rendition::Thumbnail => &mut self.thumbnail,
            Rendition::Small => &mut self.small,
            Rendition::Medium => &mut self.medium,
            Rendition::Large => &mut self.large,
        };
        *slot = Some(FormatUrl { url: url.into() });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        Rendition::ALL.into_iter().all(|r| self.get(r).is_none())
    }
}

/// An uploaded file as exposed by the CMS. `url` is empty when the CMS
/// record had no usable URL; the entry is kept so positions stay aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub url: String,
    #[serde(default)]
    pub formats: MediaFormats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_text: Option<String>,
}

impl MediaAsset {
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.mime.as_deref().is_some_and(|m| m.starts_with("video/"))
    }
}

/// Resolves display URLs for CMS media against a configured origin.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    base_url: String,
}

impl ImageResolver {
    /// `base_url` is prepended verbatim to relative paths, so it should not
    /// end with a slash (config loading already strips it).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves the display URL of the first asset in `assets`.
    ///
    /// Returns `None` when the sequence is absent or empty, or when the first
    /// asset has neither the preferred rendition nor a URL of its own.
    #[must_use]
    pub fn resolve(
        &self,
        assets: Option<&[MediaAsset]>,
        preferred: Option<Rendition>,
    ) -> Option<String> {
        let asset = assets?.first()?;
        self.resolve_asset(asset, preferred)
    }

    /// Same rules as [`Self::resolve`] for a single asset.
    #[must_use]
    pub fn resolve_asset(&self, asset: &MediaAsset, preferred: Option<Rendition>) -> Option<String> {
        let rendition_url = preferred
            .and_then(|r| asset.formats.get(r))
            .map(|f| f.url.as_str())
            .filter(|url| !url.is_empty());
        let url = rendition_url.or_else(|| Some(asset.url.as_str()).filter(|u| !u.is_empty()))?;
        Some(self.absolutize(url))
    }

    /// The asset's own URL, ignoring renditions. Used for video sources.
    #[must_use]
    pub fn media_url(&self, asset: &MediaAsset) -> Option<String> {
        self.resolve_asset(asset, None)
    }

    /// Thumbnail rendition only, used as a video poster frame.
    #[must_use]
    pub fn poster_url(&self, asset: &MediaAsset) -> Option<String> {
        asset
            .formats
            .get(Rendition::Thumbnail)
            .map(|f| f.url.as_str())
            .filter(|url| !url.is_empty())
            .map(|url| self.absolutize(url))
    }

    /// Returns `url` unchanged when it already carries an `http://` or
    /// `https://` scheme, otherwise `base_url + url`.
    #[must_use]
    pub fn absolutize(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_owned()
        } else {
            format!("{}{url}", self.base_url)
        }
    }
}
