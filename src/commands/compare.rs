use std::io::Write;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use crate::azdo::client::AzdoClient;
use crate::azdo::config::{
    env_lookup, resolve_endpoint, resolve_group_id, resolve_setting, AzdoConfig, GroupPair,
    Setting,
};
use crate::azdo::traits::VariableGroupOperations;
use crate::diff::GroupDiff;
use crate::error::ConfigError;
use crate::report::{write_report, OutputFormat};

const LOG_LEVEL_ENV: &str = "VGDIFF_LOG";

const LONG_FLAGS: &[&str] = &[
    "lib1",
    "lib2",
    "pat",
    "org",
    "project",
    "endpoint",
    "output",
    "log-level",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Report the variables that exist in one Azure DevOps variable group but not in the other.
#[derive(Parser)]
#[clap(name = "vgdiff", bin_name = "vgdiff", version, about)]
pub struct CompareCommand {
    /// First variable group id [env: AZDO_LIB1]
    #[clap(long)]
    pub lib1: Option<String>,

    /// Second variable group id [env: AZDO_LIB2]
    #[clap(long)]
    pub lib2: Option<String>,

    /// Personal Access Token [env: AZDO_PAT]
    #[clap(long)]
    pub pat: Option<String>,

    /// Organization name [env: AZDO_ORG]
    #[clap(long)]
    pub org: Option<String>,

    /// Project name [env: AZDO_PROJECT]
    #[clap(long)]
    pub project: Option<String>,

    /// API root, defaults to https://dev.azure.com [env: AZDO_ENDPOINT]
    #[clap(long)]
    pub endpoint: Option<String>,

    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Log verbosity on stderr, defaults to warn [env: VGDIFF_LOG]
    #[clap(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

impl CompareCommand {
    pub async fn run(&self) -> Result<()> {
        setup_logging(self.resolve_log_level(env_lookup)?)?;

        let mut stdout = std::io::stdout().lock();
        self.execute(env_lookup, &mut stdout).await?;
        Ok(())
    }

    /// Resolves every setting, then fetches and reports. Nothing is sent if resolution fails.
    pub async fn execute<F, W>(&self, lookup: F, out: &mut W) -> Result<GroupDiff>
    where
        F: Fn(&str) -> Option<String>,
        W: Write,
    {
        let (config, pair) = self.resolve(lookup)?;
        info!(
            "Comparing variable groups {} in {}/{}",
            pair.query_value(),
            config.organization,
            config.project
        );

        let client = AzdoClient::try_from(config)?;
        run_comparison(&client, pair, self.output, out).await
    }

    /// Resolves every setting before any request is made.
    pub fn resolve<F>(&self, lookup: F) -> Result<(AzdoConfig, GroupPair), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pat = resolve_setting(self.pat.as_deref(), Setting::Pat, &lookup)?;
        let organization = resolve_setting(self.org.as_deref(), Setting::Organization, &lookup)?;
        let project = resolve_setting(self.project.as_deref(), Setting::Project, &lookup)?;
        let first = resolve_group_id(self.lib1.as_deref(), Setting::FirstGroup, &lookup)?;
        let second = resolve_group_id(self.lib2.as_deref(), Setting::SecondGroup, &lookup)?;

        let config = AzdoConfig {
            endpoint: resolve_endpoint(self.endpoint.as_deref(), &lookup),
            organization,
            project,
            pat,
        };
        Ok((config, GroupPair::new(first, second)?))
    }

    /// `--log-level` wins, then a non-empty `VGDIFF_LOG`, then `warn`.
    pub fn resolve_log_level<F>(&self, lookup: F) -> Result<LogLevel, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = self.log_level {
            return Ok(level);
        }
        match lookup(LOG_LEVEL_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            Some(raw) => LogLevel::from_str(&raw, true)
                .map_err(|_| ConfigError::InvalidLogLevel { value: raw }),
            None => Ok(LogLevel::default()),
        }
    }
}

/// Fetches both groups, compares their variable names and writes the report.
pub async fn run_comparison<C, W>(
    client: &C,
    pair: GroupPair,
    format: OutputFormat,
    out: &mut W,
) -> Result<GroupDiff>
where
    C: VariableGroupOperations + ?Sized,
    W: Write,
{
    let (first, second) = client.get_variable_group_pair(pair).await?;
    info!(
        "'{}' has {} variables ({} secret), '{}' has {} variables ({} secret)",
        first.name,
        first.variables.len(),
        first.secret_count(),
        second.name,
        second.variables.len(),
        second.secret_count()
    );

    let diff = GroupDiff::compare(&first.key_set(), &second.key_set());
    write_report(out, &diff, format)?;
    Ok(diff)
}

/// Rewrites single-dash long flags (`-lib1 5`, `-pat=x`) to their double-dash form.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut after_separator = false;
    args.into_iter()
        .map(|arg| {
            if after_separator {
                return arg;
            }
            if arg == "--" {
                after_separator = true;
                return arg;
            }
            match arg.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split('=').next().unwrap_or(rest);
                    if LONG_FLAGS.contains(&name) {
                        format!("-{arg}")
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

fn setup_logging(log_level: LogLevel) -> Result<()> {
    TermLogger::init(
        log_level.into(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azdo::config::DEFAULT_ENDPOINT;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_normalize_legacy_flags() {
        let normalized = normalize_legacy_flags(args(&[
            "vgdiff", "-lib1", "5", "-lib2=6", "-pat", "-x", "--org", "o", "-h",
        ]));
        assert_eq!(
            normalized,
            args(&["vgdiff", "--lib1", "5", "--lib2=6", "--pat", "-x", "--org", "o", "-h"])
        );
    }

    #[test]
    fn test_normalize_stops_at_separator() {
        let normalized = normalize_legacy_flags(args(&["vgdiff", "--", "-pat"]));
        assert_eq!(normalized, args(&["vgdiff", "--", "-pat"]));
    }

    #[test]
    fn test_parse_go_style_flags() {
        let command = CompareCommand::try_parse_from(normalize_legacy_flags(args(&[
            "vgdiff", "-lib1", "12", "-lib2", "34", "-pat", "token", "-org", "contoso",
            "-project", "web",
        ])))
        .unwrap();
        let (config, pair) = command.resolve(env_from(&[])).unwrap();
        assert_eq!(pair, GroupPair::new(12, 34).unwrap());
        assert_eq!(config.organization, "contoso");
        assert_eq!(config.project, "web");
        assert_eq!(config.pat, "token");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(command.output, OutputFormat::Text);
    }

    #[test]
    fn test_zero_group_id_is_rejected_on_resolve() {
        let command = CompareCommand::try_parse_from(args(&[
            "vgdiff", "--lib1", "0", "--lib2", "2", "--pat", "p", "--org", "o", "--project", "x",
        ]))
        .unwrap();
        let err = command.resolve(env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGroupId { origin: "--lib1", .. }));
    }

    #[test]
    fn test_empty_group_id_flag_uses_env() {
        let command = CompareCommand::try_parse_from(args(&[
            "vgdiff", "--lib1", "", "--lib2", "2", "--pat", "p", "--org", "o", "--project", "x",
        ]))
        .unwrap();
        let (_, pair) = command.resolve(env_from(&[("AZDO_LIB1", "7")])).unwrap();
        assert_eq!(pair, GroupPair::new(7, 2).unwrap());
    }

    #[test]
    fn test_endpoint_flag_env_and_default() {
        let base = ["vgdiff", "--lib1", "1", "--lib2", "2", "--pat", "p", "--org", "o", "--project", "x"];

        let command = CompareCommand::try_parse_from(args(&base)).unwrap();
        let (config, _) = command.resolve(env_from(&[("AZDO_ENDPOINT", "")])).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);

        let (config, _) = command
            .resolve(env_from(&[("AZDO_ENDPOINT", "https://tfs.local/")]))
            .unwrap();
        assert_eq!(config.endpoint, "https://tfs.local/");

        let mut with_flag = base.to_vec();
        with_flag.extend(["--endpoint", "https://flag.local"]);
        let command = CompareCommand::try_parse_from(args(&with_flag)).unwrap();
        let (config, _) = command
            .resolve(env_from(&[("AZDO_ENDPOINT", "https://tfs.local/")]))
            .unwrap();
        assert_eq!(config.endpoint, "https://flag.local");
    }

    #[test]
    fn test_log_level_resolution() {
        let command = CompareCommand::try_parse_from(args(&["vgdiff"])).unwrap();
        assert_eq!(command.resolve_log_level(env_from(&[])).unwrap(), LogLevel::Warn);
        assert_eq!(
            command.resolve_log_level(env_from(&[("VGDIFF_LOG", "")])).unwrap(),
            LogLevel::Warn
        );
        assert_eq!(
            command.resolve_log_level(env_from(&[("VGDIFF_LOG", "DEBUG")])).unwrap(),
            LogLevel::Debug
        );
        let err = command
            .resolve_log_level(env_from(&[("VGDIFF_LOG", "verbose")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel { ref value } if value == "verbose"));

        let command =
            CompareCommand::try_parse_from(args(&["vgdiff", "--log-level", "trace"])).unwrap();
        assert_eq!(
            command.resolve_log_level(env_from(&[("VGDIFF_LOG", "verbose")])).unwrap(),
            LogLevel::Trace
        );
    }

    #[test]
    fn test_unknown_log_level_flag_is_rejected_by_parser() {
        let result = CompareCommand::try_parse_from(args(&["vgdiff", "--log-level", "verbose"]));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_missing_setting_sends_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let command = CompareCommand::try_parse_from(args(&[
            "vgdiff", "--lib1", "1", "--lib2", "2", "--org", "o", "--project", "x",
        ]))
        .unwrap();
        let endpoint = server.url();
        let mut out = Vec::new();
        let err = command
            .execute(
                |key| (key == "AZDO_ENDPOINT").then(|| endpoint.clone()),
                &mut out,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingSetting { env: "AZDO_PAT", .. })
        ));
        assert!(out.is_empty());
        mock.assert_async().await;
    }

    #[test]
    fn test_resolve_from_environment() {
        let command = CompareCommand::try_parse_from(args(&["vgdiff", "--output", "json"])).unwrap();
        let lookup = env_from(&[
            ("AZDO_PAT", "env-pat"),
            ("AZDO_ORG", "env-org"),
            ("AZDO_PROJECT", "env-project"),
            ("AZDO_LIB1", "1"),
            ("AZDO_LIB2", "2"),
        ]);
        let (config, pair) = command.resolve(lookup).unwrap();
        assert_eq!(config.pat, "env-pat");
        assert_eq!(config.organization, "env-org");
        assert_eq!(pair.query_value(), "1,2");
        assert_eq!(command.output, OutputFormat::Json);
    }

    #[test]
    fn test_resolve_reports_first_missing_setting() {
        let command =
            CompareCommand::try_parse_from(args(&["vgdiff", "--lib1", "1", "--lib2", "2"]))
                .unwrap();
        let err = command.resolve(env_from(&[("AZDO_PAT", "p")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingSetting {
                env: "AZDO_ORG",
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_rejects_same_group_twice() {
        let command = CompareCommand::try_parse_from(args(&[
            "vgdiff", "--lib1", "3", "--lib2", "3", "--pat", "p", "--org", "o", "--project",
            "x",
        ]))
        .unwrap();
        let err = command.resolve(env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateGroupId { id: 3 }));
    }
}
