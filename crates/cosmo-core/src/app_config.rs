use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Origin of the headless CMS, without a trailing slash
    /// (e.g. `"https://admin.spb-cosmetologist.ru"`).
    pub cms_base_url: String,
    pub cms_api_token: Option<String>,
    /// CMS collection that holds the service records.
    pub cms_services_collection: String,
    pub cms_works_collection: String,
    pub cms_request_timeout_secs: u64,
    pub cms_user_agent: String,
    pub revalidate_services_secs: u64,
    pub revalidate_detail_secs: u64,
    pub revalidate_works_secs: u64,
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("cms_base_url", &self.cms_base_url)
            .field(
                "cms_api_token",
                &self.cms_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("cms_services_collection", &self.cms_services_collection)
            .field("cms_works_collection", &self.cms_works_collection)
            .field("cms_request_timeout_secs", &self.cms_request_timeout_secs)
            .field("cms_user_agent", &self.cms_user_agent)
            .field("revalidate_services_secs", &self.revalidate_services_secs)
            .field("revalidate_detail_secs", &self.revalidate_detail_secs)
            .field("revalidate_works_secs", &self.revalidate_works_secs)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
