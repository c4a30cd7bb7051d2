use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::azdo::model::{Variable, VariableGroup};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub is_secret: bool,
}

impl From<VariableResponse> for Variable {
    fn from(v: VariableResponse) -> Self {
        Variable {
            value: v.value,
            is_secret: v.is_secret,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableGroupResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub group_type: Option<String>,
    #[serde(default)]
    pub variables: Option<HashMap<String, VariableResponse>>,
}

impl From<VariableGroupResponse> for VariableGroup {
    fn from(g: VariableGroupResponse) -> Self {
        VariableGroup {
            id: g.id,
            name: g.name,
            variables: g
                .variables
                .unwrap_or_default()
                .into_iter()
                .map(|(name, v)| (name, v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableGroupCollectionResponse {
    #[serde(default)]
    pub count: usize,
    pub value: Vec<VariableGroupResponse>,
}
