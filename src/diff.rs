//! Set comparison of variable names between two groups.
//!
//! Only the presence of a name matters. Values are never compared.

use std::collections::BTreeSet;

use serde::Serialize;

/// A labelled set of variable names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySet<'a> {
    label: &'a str,
    names: BTreeSet<&'a str>,
}

impl<'a> KeySet<'a> {
    pub fn new<I>(label: &'a str, names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            label,
            names: names.into_iter().collect(),
        }
    }

    pub fn label(&self) -> &'a str {
        self.label
    }

    pub fn names(&self) -> &BTreeSet<&'a str> {
        &self.names
    }

    /// Names in `self` that `other` lacks, in lexicographic order.
    pub fn missing_from(&self, other: &KeySet<'_>) -> Vec<String> {
        self.names
            .difference(&other.names)
            .map(|name| (*name).to_string())
            .collect()
    }
}

/// Names present in `source` but absent from `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionalDiff {
    pub source: String,
    pub target: String,
    pub missing: Vec<String>,
}

impl DirectionalDiff {
    fn between(source: &KeySet<'_>, target: &KeySet<'_>) -> Self {
        Self {
            source: source.label().to_string(),
            target: target.label().to_string(),
            missing: source.missing_from(target),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Both directions of a comparison, kept apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupDiff {
    pub first_only: DirectionalDiff,
    pub second_only: DirectionalDiff,
}

impl GroupDiff {
    pub fn compare(first: &KeySet<'_>, second: &KeySet<'_>) -> Self {
        Self {
            first_only: DirectionalDiff::between(first, second),
            second_only: DirectionalDiff::between(second, first),
        }
    }

    pub fn is_identical(&self) -> bool {
        self.first_only.is_empty() && self.second_only.is_empty()
    }
}
