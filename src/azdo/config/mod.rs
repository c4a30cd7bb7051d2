use std::fmt;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "https://dev.azure.com";
pub const ENDPOINT_ENV: &str = "AZDO_ENDPOINT";

/// One of the inputs resolved from a flag with an environment fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Pat,
    Organization,
    Project,
    FirstGroup,
    SecondGroup,
}

impl Setting {
    pub fn name(self) -> &'static str {
        match self {
            Setting::Pat => "Personal Access Token",
            Setting::Organization => "organization",
            Setting::Project => "project",
            Setting::FirstGroup => "first variable group id",
            Setting::SecondGroup => "second variable group id",
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            Setting::Pat => "--pat",
            Setting::Organization => "--org",
            Setting::Project => "--project",
            Setting::FirstGroup => "--lib1",
            Setting::SecondGroup => "--lib2",
        }
    }

    pub fn env(self) -> &'static str {
        match self {
            Setting::Pat => "AZDO_PAT",
            Setting::Organization => "AZDO_ORG",
            Setting::Project => "AZDO_PROJECT",
            Setting::FirstGroup => "AZDO_LIB1",
            Setting::SecondGroup => "AZDO_LIB2",
        }
    }

    fn missing(self) -> ConfigError {
        ConfigError::MissingSetting {
            name: self.name(),
            flag: self.flag(),
            env: self.env(),
        }
    }
}

/// Reads an environment variable, treating unset, empty and whitespace-only values alike.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// A non-empty flag value wins, otherwise the setting's environment variable is used.
pub fn resolve_setting<F>(
    flag_value: Option<&str>,
    setting: Setting,
    lookup: F,
) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = flag_value.map(str::trim).filter(|v| !v.is_empty()) {
        return Ok(value.to_string());
    }
    lookup(setting.env())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| setting.missing())
}

/// Same precedence as `resolve_setting`; the chosen value must be a positive integer.
pub fn resolve_group_id<F>(
    flag_value: Option<&str>,
    setting: Setting,
    lookup: F,
) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let (raw, origin) = match flag_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => (value.to_string(), setting.flag()),
        None => {
            let value = lookup(setting.env())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| setting.missing())?;
            (value, setting.env())
        }
    };
    match raw.parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ConfigError::InvalidGroupId { origin, value: raw }),
    }
}

/// API root: non-empty flag, then non-empty `AZDO_ENDPOINT`, then `DEFAULT_ENDPOINT`.
pub fn resolve_endpoint<F>(flag_value: Option<&str>, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    flag_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| {
            lookup(ENDPOINT_ENV)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}

/// Connection settings for one Azure DevOps project.
#[derive(Clone, PartialEq, Eq)]
pub struct AzdoConfig {
    pub endpoint: String,
    pub organization: String,
    pub project: String,
    pub pat: String,
}

impl fmt::Debug for AzdoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzdoConfig")
            .field("endpoint", &self.endpoint)
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("pat", &"***redacted***")
            .finish()
    }
}

/// The two variable groups to compare, in request order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPair {
    pub first: u32,
    pub second: u32,
}

impl GroupPair {
    pub fn new(first: u32, second: u32) -> Result<Self, ConfigError> {
        if first == second {
            return Err(ConfigError::DuplicateGroupId { id: first });
        }
        Ok(Self { first, second })
    }

    /// Comma-joined ids as the `groupIds` query parameter expects them.
    pub fn query_value(&self) -> String {
        format!("{},{}", self.first, self.second)
    }
}
