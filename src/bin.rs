//! Command-line entry point for `tldr-bot`.

use clap::Parser;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tldr_bot::base::{config::Config, types::Void};
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Slack bot that replies with SMMRY summaries of shared links.
///
/// DM it a link or a `#channel`, or mention it in a channel. Settings are read
/// from `TLDR_BOT_*` environment variables and an optional TOML file.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// TOML settings file; `.hidden/config.toml` is used when present.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Log at DEBUG (`-v`) or TRACE (`-vv`) instead of INFO.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs stdout logging plus OTLP span export.
fn init_tracing(verbose: u8) -> Void {
    let stdout = tracing_subscriber::fmt::layer()
        .with_ansi(true)
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE);

    let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build();
    let otel = tracing_opentelemetry::layer().with_tracer(provider.tracer("tldr-bot"));

    tracing_subscriber::registry()
        .with(otel)
        .with(LevelFilter::from_level(log_level(verbose)))
        .with(stdout)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    init_tracing(args.verbose)?;

    let config = Config::load(args.config.as_deref())?;

    tldr_bot::start(config).await
}

// Tests.
