use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::azdo::config::GroupPair;
use crate::diff::KeySet;
use crate::error::FetchError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub is_secret: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableGroup {
    pub id: Option<u32>,
    pub name: String,
    pub variables: BTreeMap<String, Variable>,
}

impl VariableGroup {
    pub fn key_set(&self) -> KeySet<'_> {
        KeySet::new(&self.name, self.variables.keys().map(String::as_str))
    }

    pub fn secret_count(&self) -> usize {
        self.variables.values().filter(|v| v.is_secret).count()
    }
}

/// Picks the two requested groups out of an API response.
///
/// Groups are matched on their `id` when every returned group carries one.
/// Otherwise the response order is trusted: first element for the first id,
/// second element for the second.
pub fn select_pair(
    groups: Vec<VariableGroup>,
    pair: GroupPair,
) -> Result<(VariableGroup, VariableGroup), FetchError> {
    if groups.len() < 2 {
        return Err(FetchError::InsufficientGroups {
            returned: groups.len(),
        });
    }

    if groups.iter().all(|g| g.id.is_some()) {
        let mut groups = groups;
        let first = take_by_id(&mut groups, pair.first)?;
        let second = take_by_id(&mut groups, pair.second)?;
        return Ok((first, second));
    }

    warn!(
        "Not every returned group carries an id; assuming response order matches the requested order ({})",
        pair.query_value()
    );
    let mut iter = groups.into_iter();
    match (iter.next(), iter.next()) {
        (Some(first), Some(second)) => Ok((first, second)),
        _ => Err(FetchError::InsufficientGroups { returned: 0 }),
    }
}

fn take_by_id(groups: &mut Vec<VariableGroup>, id: u32) -> Result<VariableGroup, FetchError> {
    let index = groups
        .iter()
        .position(|g| g.id == Some(id))
        .ok_or(FetchError::GroupNotReturned { id })?;
    Ok(groups.swap_remove(index))
}
