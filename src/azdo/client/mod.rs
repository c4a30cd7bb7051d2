pub mod base;
pub mod model;

mod variable_group;

use anyhow::Result;
use reqwest::Method;

use base::BaseClient;
use crate::azdo::config::AzdoConfig;

/// Client for the distributed task (pipelines library) API.
#[derive(Debug, Clone)]
pub struct AzdoClient {
    base: BaseClient,
}

impl AzdoClient {
    const API_VERSION: &'static str = "6.0-preview.2";

    pub fn new(base: BaseClient) -> Self {
        Self { base }
    }

    fn base_api(
        &self,
        method: Method,
        area: &[&str],
        query: &str,
    ) -> Result<reqwest::RequestBuilder> {
        let query = format!("{query}&api-version={}", Self::API_VERSION);
        let url = self.base.project_url(area, &query)?;
        Ok(self.base.base_api(method, url))
    }
}

impl TryFrom<AzdoConfig> for AzdoClient {
    type Error = anyhow::Error;

    fn try_from(config: AzdoConfig) -> Result<Self, Self::Error> {
        Ok(Self::new(BaseClient::new(config)?))
    }
}
