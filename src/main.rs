use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dam_fal_migration::{config::Config, migration::Severity, report::ConsoleReporter, MigrationContext};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    match log_format.to_lowercase().as_str() {
        "gcp" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_stackdriver::layer())
                .init();
        }
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_list(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    info!(version = env!("CARGO_PKG_VERSION"), "dam-fal-migration starting");

    let config = Config::load()?;
    let context = MigrationContext::open(config)?;
    info!(
        data_dir = %context.config.data_dir,
        extensions = ?context.extensions.keys().collect::<Vec<_>>(),
        "Loaded configuration"
    );

    let mut reporter = ConsoleReporter::new(std::io::stdout());
    let outcome = context.run(&mut reporter)?;

    let message = outcome.result_message(&context.catalog);
    let label = match message.severity {
        Severity::Ok => "OK",
        Severity::Info => "INFO",
    };
    println!("[{label}] {}: {}", message.title, message.body);

    Ok(())
}
