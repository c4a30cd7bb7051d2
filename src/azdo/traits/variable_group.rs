use anyhow::Result;
use async_trait::async_trait;

use crate::azdo::config::GroupPair;
use crate::azdo::model::{select_pair, VariableGroup};

#[async_trait]
pub trait VariableGroupOperations: Send + Sync {
    async fn list_variable_groups(&self, pair: GroupPair) -> Result<Vec<VariableGroup>>;

    /// Fetches both groups and returns them in request order.
    async fn get_variable_group_pair(
        &self,
        pair: GroupPair,
    ) -> Result<(VariableGroup, VariableGroup)> {
        let groups = self.list_variable_groups(pair).await?;
        Ok(select_pair(groups, pair)?)
    }
}
