//! PuppetDB query CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse arguments**: see [`cli::Cli`].
//! 2. **Wire observability**: configure `tracing-subscriber` on stderr with
//!    an `EnvFilter` (`RUST_LOG`, default `warn`, `--verbose` forces `debug`)
//!    and a text or JSON formatter.
//! 3. **Probe compatibility**: read `puppetdb.conf` once and run
//!    [`puppetdb::check_version`] over the loaded contents.
//! 4. **Construct infrastructure**: build the `reqwest` transport factory and
//!    inject it, with the `tracing` logger, into a [`puppetdb::QueryConnection`].
//! 5. **Run the query**: print the decoded JSON result on stdout.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use puppetdb::{
    check_version, ConfigError, PuppetDbConfigLoader, QueryConnection, TracingQueryLogger,
};
use tracing_subscriber::EnvFilter;
use transport::{FileConfigLoader, ReqwestTransportFactory};

use crate::cli::{Cli, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    let logger = Arc::new(TracingQueryLogger::new());
    let config = match FileConfigLoader::new(&cli.config).load() {
        Ok(config) => Some(config),
        Err(ConfigError::Unavailable) => None,
        Err(e) => return Err(e).context("failed to load PuppetDB configuration"),
    };
    check_version(&config, logger.as_ref()).context("PuppetDB compatibility check failed")?;

    let transports = ReqwestTransportFactory::new(&cli.http_settings())
        .context("failed to set up the HTTP transport")?;
    let connection =
        QueryConnection::new(cli.target(config.as_ref()), Arc::new(transports), logger);

    let query = cli.query_expression().context("query is not valid JSON")?;

    tracing::info!(
        service = %connection.target(),
        endpoint = %cli.endpoint,
        "Querying PuppetDB"
    );
    let result = connection
        .query_version(&cli.endpoint(), query.as_ref(), cli.options(), &cli.version())
        .await?;

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");
    Ok(())
}

fn init_tracing(verbose: bool, format: LogFormat) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
