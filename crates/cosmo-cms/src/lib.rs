pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::CmsClient;
pub use error::CmsError;
pub use normalize::{normalize_media, to_detail, to_search_entry, to_summary, to_work};
pub use types::{CmsAttributes, CmsRecord, Envelope, RawMedia, RawService, RawWork};
