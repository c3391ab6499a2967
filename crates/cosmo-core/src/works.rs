//! Portfolio ("works") entries and how each one is presented.

use serde::{Deserialize, Serialize};

use crate::media::{ImageResolver, MediaAsset, Rendition};
use crate::services::ServiceId;

/// A portfolio entry from the CMS `works` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    pub id: ServiceId,
    pub title: String,
    /// When set, the first two photos are a before/after pair.
    pub before_after: bool,
    pub description: String,
    pub additional_description: Option<String>,
    pub photos: Vec<MediaAsset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub is_video: bool,
    pub url: Option<String>,
    pub poster: Option<String>,
    pub alt: String,
}

/// How a work is shown on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkDisplay {
    BeforeAfterImages {
        before: String,
        after: String,
    },
    BeforeAfterVideos {
        before: String,
        after: String,
        before_poster: Option<String>,
        after_poster: Option<String>,
    },
    Gallery {
        items: Vec<GalleryItem>,
    },
    SingleVideo {
        url: String,
        poster: Option<String>,
    },
    SingleImage {
        url: String,
    },
    Placeholder {
        url: String,
    },
}

/// Image URL for a non-video asset, medium rendition preferred.
fn still_url(resolver: &ImageResolver, asset: Option<&MediaAsset>) -> Option<String> {
    asset
        .filter(|a| !a.is_video())
        .and_then(|a| resolver.resolve_asset(a, Some(Rendition::Medium)))
}

fn video_url(resolver: &ImageResolver, asset: Option<&MediaAsset>) -> Option<String> {
    asset
        .filter(|a| a.is_video())
        .and_then(|a| resolver.media_url(a))
}

impl WorkDisplay {
    /// Picks the presentation for `work`.
    ///
    /// The first photo is "before" and the second "after" (the first again
    /// when there is only one). A before/after work needs both sides of the
    /// same kind; anything else falls through to a gallery, a single video,
    /// a single image, and finally a static placeholder.
    #[must_use]
    pub fn for_work(work: &Work, resolver: &ImageResolver) -> Self {
        let before = work.photos.first();
        let after = work.photos.get(1).or(before);

        let before_image = still_url(resolver, before);
        let after_image = still_url(resolver, after);
        let before_video = video_url(resolver, before);
        let after_video = video_url(resolver, after);
        let before_poster = before.and_then(|a| resolver.poster_url(a));

        if work.before_after {
            if let (Some(before), Some(after)) = (&before_image, &after_image) {
                return WorkDisplay::BeforeAfterImages {
                    before: before.clone(),
                    after: after.clone(),
                };
            }
            if let (Some(before_url), Some(after_url)) = (&before_video, &after_video) {
                return WorkDisplay::BeforeAfterVideos {
                    before: before_url.clone(),
                    after: after_url.clone(),
                    before_poster,
                    after_poster: after.and_then(|a| resolver.poster_url(a)),
                };
            }
        } else if !work.photos.is_empty() {
            return WorkDisplay::Gallery {
                items: work
                    .photos
                    .iter()
                    .map(|asset| gallery_item(resolver, asset, &work.title))
                    .collect(),
            };
        }

        if let Some(url) = before_video.or(after_video) {
            return WorkDisplay::SingleVideo {
                url,
                poster: before_poster,
            };
        }
        if let Some(url) = before_image {
            return WorkDisplay::SingleImage { url };
        }
        WorkDisplay::Placeholder {
            url: format!("/images/work-{}-after.jpg", work.id),
        }
    }
}

fn gallery_item(resolver: &ImageResolver, asset: &MediaAsset, title: &str) -> GalleryItem {
    let is_video = asset.is_video();
    let url = if is_video {
        resolver.media_url(asset)
    } else {
        resolver.resolve_asset(asset, Some(Rendition::Medium))
    };
    let alt = asset
        .alternative_text
        .clone()
        .filter(|alt| !alt.trim().is_empty())
        .unwrap_or_else(|| title.to_owned());
    GalleryItem {
        is_video,
        url,
        poster: resolver.poster_url(asset),
        alt,
    }
}
