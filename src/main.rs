#![feature(error_generic_member_access)]

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use config::Config;
use dotenvy::dotenv;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use std::time::Duration;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

mod cli;
mod client;
mod commands;
mod config;
mod context;
mod map;
mod model;
mod services;
#[cfg(test)]
mod test_support;
mod utils;
mod view;

const SERVICE_NAME: &str = "lizardtrip_tracker";

/// Keeps the log writer and the span exporter alive until the end of `main`
struct Telemetry {
    _appender_guard: WorkerGuard,
    provider: Option<SdkTracerProvider>,
}

impl Drop for Telemetry {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("couldn't flush spans: {e}");
            }
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    _ = dotenv();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    config.apply_overrides(&cli)?;
    if let Command::Watch {
        interval_secs: Some(secs),
        ..
    } = cli.command
    {
        config.refresh_interval = Duration::from_secs(secs);
    }

    let _telemetry = init_tracing(&config)?;
    info!(
        backend = %config.backend_url,
        routing = %config.routing_url,
        "starting {SERVICE_NAME}"
    );

    let res = commands::run(cli.command, config).await;
    if let Err(e) = &res {
        error!("{e:?}");
    }

    res
}

// stdout belongs to the panels, so events only go to the log files and the collector
fn init_tracing(config: &Config) -> Result<Telemetry> {
    let provider = match &config.otlp_endpoint {
        Some(endpoint) => {
            let exporter = SpanExporter::builder()
                .with_tonic()
                .with_timeout(Duration::from_millis(1000))
                .with_endpoint(endpoint)
                .build()?;

            Some(
                SdkTracerProvider::builder()
                    .with_batch_exporter(exporter)
                    .with_resource(Resource::builder().with_service_name(SERVICE_NAME).build())
                    .build(),
            )
        }
        None => None,
    };

    let telemetry_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(SERVICE_NAME)));

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let appender = tracing_appender::rolling::daily(&config.log_dir, "lizardtrip_tracker.log");
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(appender);

    // A layer that logs events to rolling files.
    let file_log = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_appender)
        .with_ansi(false)
        .pretty();

    Registry::default()
        .with(telemetry_layer)
        .with(file_log)
        .with(env_filter)
        .init();

    Ok(Telemetry {
        _appender_guard: guard,
        provider,
    })
}
