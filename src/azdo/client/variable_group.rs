use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Method, StatusCode};

use crate::azdo::config::GroupPair;
use crate::azdo::model::VariableGroup;
use crate::azdo::traits::VariableGroupOperations;
use crate::error::FetchError;

use super::model::variable_group::VariableGroupCollectionResponse;
use super::AzdoClient;

const BODY_PREVIEW_CHARS: usize = 500;

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[async_trait]
impl VariableGroupOperations for AzdoClient {
    async fn list_variable_groups(&self, pair: GroupPair) -> Result<Vec<VariableGroup>> {
        debug!("list_variable_groups called for ids {}", pair.query_value());

        let response = self
            .base_api(
                Method::GET,
                &["distributedtask", "variablegroups"],
                &format!("groupIds={}", pair.query_value()),
            )?
            .send()
            .await
            .context("Failed to send variable group request to Azure DevOps")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read variable group response body")?;

        // A rejected PAT yields a 203 with an HTML sign-in page rather than a 401.
        if status == StatusCode::NON_AUTHORITATIVE_INFORMATION
            || status == StatusCode::UNAUTHORIZED
        {
            return Err(FetchError::AuthenticationRejected {
                status: status.as_u16(),
            }
            .into());
        }
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                body: preview(&response_text),
            }
            .into());
        }

        let collection: VariableGroupCollectionResponse =
            match serde_json::from_str(&response_text) {
                Ok(collection) => collection,
                Err(e) => {
                    log::error!("Failed to decode variable group response. Error: {}", e);
                    log::error!(
                        "Response body (first {} chars): {}",
                        BODY_PREVIEW_CHARS,
                        preview(&response_text)
                    );
                    return Err(anyhow::anyhow!(
                        "Failed to decode variable group response: {}",
                        e
                    ));
                }
            };

        debug!(
            "Fetched {} variable groups (count field: {})",
            collection.value.len(),
            collection.count
        );
        for group in &collection.value {
            debug!(
                "Group '{}' id={:?} type={:?} description={:?} variables={}",
                group.name,
                group.id,
                group.group_type,
                group.description,
                group.variables.as_ref().map_or(0, HashMap::len)
            );
        }

        Ok(collection.value.into_iter().map(Into::into).collect())
    }
}
