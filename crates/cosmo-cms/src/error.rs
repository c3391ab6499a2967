use thiserror::Error;

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {context} has no `data` array")]
    MalformedEnvelope { context: String },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid CMS base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl CmsError {
    /// One localized line to show in place of the content that failed to
    /// load. `subject` is the genitive noun for what was being loaded
    /// (`"услуг"`, `"работ"`, `"услуги"`).
    #[must_use]
    pub fn user_message(&self, subject: &str) -> String {
        match self {
            CmsError::NotFound { .. } => {
                format!("Не удалось загрузить {subject} (Статус: 404)")
            }
            CmsError::UnexpectedStatus { status, .. } => {
                format!("Не удалось загрузить {subject} (Статус: {status})")
            }
            CmsError::Deserialize { .. } | CmsError::MalformedEnvelope { .. } => {
                "Некорректный формат ответа от API".to_owned()
            }
            CmsError::Http(_) | CmsError::InvalidBaseUrl { .. } => {
                format!("Произошла ошибка при загрузке {subject}: {self}")
            }
        }
    }

    /// HTTP status reported by the CMS, if the request got that far.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            CmsError::NotFound { .. } => Some(404),
            CmsError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_mention_the_code() {
        let err = CmsError::UnexpectedStatus {
            status: 503,
            url: "https://cms.example.com/api/uslugas".to_owned(),
        };
        assert_eq!(
            err.user_message("услуг"),
            "Не удалось загрузить услуг (Статус: 503)"
        );
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn malformed_envelope_has_fixed_message() {
        let err = CmsError::MalformedEnvelope {
            context: "uslugas".to_owned(),
        };
        assert_eq!(err.user_message("услуг"), "Некорректный формат ответа от API");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn deserialize_error_shares_the_malformed_message() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CmsError::Deserialize {
            context: "works".to_owned(),
            source,
        };
        assert_eq!(err.user_message("работ"), "Некорректный формат ответа от API");
    }
}
