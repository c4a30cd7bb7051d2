use std::convert::TryFrom;
use std::sync::LazyLock;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, Url};

use crate::azdo::config::AzdoConfig;

static VGDIFF_USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    let version = env!("CARGO_PKG_VERSION");
    format!("vgdiff/{version}")
});

/// Base HTTP client for the Azure DevOps REST API.
/// Handles authentication and builds project-scoped request URLs.
#[derive(Debug, Clone)]
pub struct BaseClient {
    pub client: reqwest::Client,
    pub config: AzdoConfig,
}

impl BaseClient {
    pub fn new(config: AzdoConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&VGDIFF_USER_AGENT)?);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    /// Builds `{endpoint}/{org}/{project}/_apis/{area...}?{query}`.
    pub fn project_url(&self, area: &[&str], query: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.endpoint)
            .with_context(|| format!("Invalid endpoint: {}", self.config.endpoint))?;
        url.path_segments_mut()
            .map_err(|()| anyhow!("Endpoint cannot be a base URL: {}", self.config.endpoint))?
            .pop_if_empty()
            .push(&self.config.organization)
            .push(&self.config.project)
            .push("_apis")
            .extend(area);
        url.set_query(Some(query));
        Ok(url)
    }

    /// Build a request authenticated with the personal access token.
    /// Azure DevOps expects it as the password of a Basic credential with an empty user.
    pub fn base_api(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        debug!("🔗 Request URL: {url}");
        info!(
            "🔑 PAT Auth for {}/{}",
            self.config.organization, self.config.project
        );
        self.client
            .request(method, url)
            .basic_auth("", Some(&self.config.pat))
    }
}

impl TryFrom<&AzdoConfig> for BaseClient {
    type Error = anyhow::Error;

    fn try_from(config: &AzdoConfig) -> Result<Self, Self::Error> {
        Self::new(config.clone())
    }
}
