//! Command-line arguments and their translation into connector settings.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use puppetdb::{
    ConnectionTarget, Endpoint, ExtractSpec, PuppetDbConfig, QueryExpression, QueryOptions,
    QuerySource, QueryVersion,
};
use transport::{HttpSettings, DEFAULT_CONFIG_PATH};

/// Output format for log events written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Query a PuppetDB service and print the JSON result.
#[derive(Debug, Parser)]
#[command(name = "pdbquery", version)]
pub struct Cli {
    /// Endpoint to query (e.g. nodes, facts, resources).
    pub endpoint: String,

    /// Query expression as JSON, e.g. '["=", "certname", "web01"]'.
    pub query: Option<String>,

    /// PuppetDB host. Defaults to the first `server_urls` entry of the config
    /// file, then to `puppetdb`.
    #[arg(long)]
    pub host: Option<String>,

    /// PuppetDB port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Use plain HTTP instead of HTTPS.
    #[arg(long)]
    pub no_ssl: bool,

    /// Query API version.
    #[arg(long, default_value = QueryVersion::V4)]
    pub api_version: String,

    /// Fields to extract (repeatable or comma separated).
    #[arg(long, value_delimiter = ',')]
    pub extract: Vec<String>,

    /// Request source; `function` form-encodes the query parameter.
    #[arg(long, default_value = "face")]
    pub source: QuerySource,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// PEM bundle of CA certificates to trust.
    #[arg(long, value_name = "PATH")]
    pub ca_cert: Option<PathBuf>,

    /// PEM file with client certificate and private key.
    #[arg(long, value_name = "PATH")]
    pub identity: Option<PathBuf>,

    /// Path to `puppetdb.conf`.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log debug diagnostics (request URI and query).
    #[arg(short, long)]
    pub verbose: bool,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Pretty-print the result.
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    /// Picks the service to query.
    ///
    /// An explicit `--host` wins; otherwise the config file's primary target is
    /// used, then the built-in default. `--port` and `--no-ssl` override
    /// whichever was chosen.
    pub fn target(&self, config: Option<&PuppetDbConfig>) -> ConnectionTarget {
        let base = match &self.host {
            Some(host) => ConnectionTarget::new(host.clone(), ConnectionTarget::DEFAULT_PORT, true),
            None => config
                .and_then(PuppetDbConfig::primary_target)
                .unwrap_or_default(),
        };

        ConnectionTarget::new(
            base.host(),
            self.port.unwrap_or(base.port()),
            base.use_ssl() && !self.no_ssl,
        )
    }

    /// Returns the positional endpoint as a path segment.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.endpoint.clone())
    }

    /// Returns the `--api-version` path segment.
    pub fn version(&self) -> QueryVersion {
        QueryVersion::new(self.api_version.clone())
    }

    /// Parses the positional query, if one was given.
    pub fn query_expression(&self) -> Result<Option<QueryExpression>, serde_json::Error> {
        self.query.as_deref().map(str::parse::<QueryExpression>).transpose()
    }

    /// Builds per-call options from `--source` and `--extract`.
    pub fn options(&self) -> QueryOptions {
        let options = QueryOptions::default().with_source(self.source);
        if self.extract.is_empty() {
            options
        } else {
            options.with_extract(ExtractSpec::new(self.extract.iter().cloned()))
        }
    }

    /// Collects the timeout and TLS flags for the transport factory.
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: self.timeout.map(Duration::from_secs),
            ca_cert: self.ca_cert.clone(),
            identity: self.identity.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pdbquery").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_follow_the_connector_defaults() {
        let cli = parse(&["nodes"]);

        assert_eq!(cli.target(None), ConnectionTarget::default());
        assert_eq!(cli.version(), QueryVersion::default());
        assert_eq!(cli.endpoint(), Endpoint::nodes());
        assert_eq!(cli.query_expression().unwrap(), None);

        let options = cli.options();
        assert_eq!(options.source(), QuerySource::Face);
        assert!(options.extract.is_none());
    }

    #[test]
    fn explicit_host_overrides_config() {
        let config = PuppetDbConfig::parse("[main]\nserver_urls = https://db:8081\n").unwrap();
        let cli = parse(&["facts", "--host", "localhost", "--port", "8080", "--no-ssl"]);

        assert_eq!(
            cli.target(Some(&config)),
            ConnectionTarget::new("localhost", 8080, false)
        );
    }

    #[test]
    fn config_supplies_target_when_host_is_absent() {
        let config = PuppetDbConfig::parse("[main]\nserver_urls = https://db:8081\n").unwrap();
        let cli = parse(&["facts"]);

        assert_eq!(
            cli.target(Some(&config)),
            ConnectionTarget::new("db", 8081, true)
        );
    }

    #[test]
    fn extract_and_source_flags_build_options() {
        let cli = parse(&[
            "nodes",
            r#"["=", "certname", "x"]"#,
            "--extract",
            "certname,deactivated",
            "--source",
            "function",
        ]);

        let options = cli.options();
        assert_eq!(options.source(), QuerySource::Function);
        assert_eq!(
            options.extract,
            Some(ExtractSpec::new(["certname", "deactivated"]))
        );
        assert_eq!(
            cli.query_expression().unwrap(),
            Some(QueryExpression::new(json!(["=", "certname", "x"])))
        );
    }

    #[test]
    fn unknown_source_is_rejected() {
        let result = Cli::try_parse_from(["pdbquery", "nodes", "--source", "catalog"]);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_query_json_is_reported() {
        let cli = parse(&["nodes", "[\"=\", "]);
        assert!(cli.query_expression().is_err());
    }

    #[test]
    fn timeout_becomes_http_setting() {
        let cli = parse(&["nodes", "--timeout", "30", "--ca-cert", "/etc/ca.pem"]);
        let settings = cli.http_settings();

        assert_eq!(settings.timeout, Some(Duration::from_secs(30)));
        assert_eq!(settings.ca_cert, Some(PathBuf::from("/etc/ca.pem")));
        assert_eq!(settings.identity, None);
    }
}
