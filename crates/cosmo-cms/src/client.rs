//! HTTP client for the headless CMS REST API.
//!
//! Every call is a single GET against `{base}/api/{collection}` returning the
//! `{data, meta}` envelope. There are no retries: a failed request surfaces
//! as a [`CmsError`] and the page shows its localized message instead.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};

use cosmo_core::AppConfig;

use crate::error::CmsError;
use crate::types::{CmsAttributes, Envelope, RawService, RawWork};

const DEFAULT_SERVICES_COLLECTION: &str = "uslugas";
const DEFAULT_WORKS_COLLECTION: &str = "works";

/// Client for the CMS content API.
///
/// Use [`CmsClient::new`] with the loaded [`AppConfig`], or
/// [`CmsClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct CmsClient {
    client: Client,
    base_url: Url,
    services_collection: String,
    works_collection: String,
}

impl CmsClient {
    /// Creates a client from the application config.
    ///
    /// # Errors
    ///
    /// Same as [`Self::with_base_url`].
    pub fn new(config: &AppConfig) -> Result<Self, CmsError> {
        Ok(Self::with_base_url(
            &config.cms_base_url,
            config.cms_api_token.as_deref(),
            config.cms_request_timeout_secs,
            &config.cms_user_agent,
        )?
        .with_collections(&config.cms_services_collection, &config.cms_works_collection))
    }

    /// Creates a client against `base_url` with the default collection
    /// names.
    ///
    /// When `api_token` is set every request carries
    /// `Authorization: Bearer <token>`.
    ///
    /// # Errors
    ///
    /// - [`CmsError::InvalidBaseUrl`] if `base_url` does not parse or the
    ///   token is not a valid header value.
    /// - [`CmsError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn with_base_url(
        base_url: &str,
        api_token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CmsError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                CmsError::InvalidBaseUrl {
                    base_url: base_url.to_owned(),
                    reason: format!("API token is not a valid header value: {e}"),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        // A trailing slash keeps a path prefix (e.g. `/cms/`) when the
        // collection path is appended.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| CmsError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
            services_collection: DEFAULT_SERVICES_COLLECTION.to_owned(),
            works_collection: DEFAULT_WORKS_COLLECTION.to_owned(),
        })
    }

    #[must_use]
    pub fn with_collections(mut self, services: &str, works: &str) -> Self {
        services.clone_into(&mut self.services_collection);
        works.clone_into(&mut self.works_collection);
        self
    }

    /// All services with their relations populated.
    ///
    /// # Errors
    ///
    /// - [`CmsError::Http`] on network failure or timeout.
    /// - [`CmsError::NotFound`] / [`CmsError::UnexpectedStatus`] on a
    ///   non-2xx status.
    /// - [`CmsError::Deserialize`] / [`CmsError::MalformedEnvelope`] if the
    ///   body is not a `{data: [...]}` envelope.
    pub async fn list_services(&self) -> Result<Vec<RawService>, CmsError> {
        let url = self.build_url(&self.services_collection, &[("populate", "*")]);
        let envelope: Envelope<RawService> = self.fetch(&url).await?;
        Ok(envelope.data)
    }

    /// The service with the given slug, or `None` when the CMS has no such
    /// record.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_services`], except that a 404 is `Ok(None)`.
    pub async fn service_by_slug(&self, slug: &str) -> Result<Option<RawService>, CmsError> {
        let url = self.build_url(
            &self.services_collection,
            &[("filters[slug][$eq]", slug), ("populate", "*")],
        );
        match self.fetch::<RawService>(&url).await {
            Ok(envelope) => Ok(envelope.data.into_iter().next()),
            Err(CmsError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Slugs of all services, for pre-rendering and sitemaps. Records
    /// without a slug are skipped.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_services`].
    pub async fn list_service_slugs(&self) -> Result<Vec<String>, CmsError> {
        let url = self.build_url(&self.services_collection, &[("fields[0]", "slug")]);
        let envelope: Envelope<RawService> = self.fetch(&url).await?;
        Ok(envelope
            .data
            .into_iter()
            .filter_map(|record| record.slug.filter(|slug| !slug.is_empty()))
            .collect())
    }

    /// All portfolio works with their photos populated.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_services`].
    pub async fn list_works(&self) -> Result<Vec<RawWork>, CmsError> {
        let url = self.build_url(&self.works_collection, &[("populate", "*")]);
        let envelope: Envelope<RawWork> = self.fetch(&url).await?;
        Ok(envelope.data)
    }

    /// Builds `{base}/api/{collection}?{params}` with percent-encoded
    /// query parameters.
    fn build_url(&self, collection: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}api/{collection}", url.path());
        url.set_path(&path);
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request, maps non-2xx statuses to errors, and parses the
    /// body as an envelope of `T`.
    async fn fetch<T>(&self, url: &Url) -> Result<Envelope<T>, CmsError>
    where
        T: serde::de::DeserializeOwned + Default + CmsAttributes,
    {
        tracing::debug!(url = %url, "fetching CMS collection");
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "CMS request failed");
            CmsError::from(e)
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(url = %url, "CMS returned 404");
            return Err(CmsError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "CMS returned error status");
            return Err(CmsError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Envelope::parse(&body, url.as_str()).inspect_err(|e| {
            tracing::warn!(url = %url, error = %e, "CMS response has unexpected shape");
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
