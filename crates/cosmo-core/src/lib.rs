pub mod app_config;
pub mod catalog;
pub mod config;
pub mod media;
pub mod rich_text;
pub mod search;
pub mod services;
pub mod works;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{group_by_first_letter, CatalogGroup, OTHER_BUCKET};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_CMS_BASE_URL};
pub use media::{FormatUrl, ImageResolver, MediaAsset, MediaFormats, Rendition};
pub use rich_text::{blocks_plain_text, RichTextBlock, RichTextNode};
pub use search::{SearchIndex, SearchState};
pub use services::{
    truncate_description, Description, PriceListItem, ProcedureDetails, ServiceDetail, ServiceId,
    ServiceSummary, DETAILS_PLACEHOLDER, SUMMARY_DESCRIPTION_LIMIT, UNTITLED,
};
pub use works::{GalleryItem, Work, WorkDisplay};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
