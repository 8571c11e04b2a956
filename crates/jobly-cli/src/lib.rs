mod cli;
mod companies;
mod config;
mod jobs;

use jobly::{JoblyError, TracingClient};
use tracing_subscriber::EnvFilter;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Run(args) => execute(args).await,
    }
}

/// `RUST_LOG` takes precedence over the configured filter. Logs go to stderr so
/// stdout stays valid JSON.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn execute(args: cli::RunArgs) -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let settings = config::Settings::resolve(&args.global)?;
    init_tracing(&settings.log_filter);

    let pool = jobly::create_pool_with_config(&settings.database_url, settings.max_connections)?;
    let client = TracingClient::new(pool.get().await.map_err(JoblyError::from)?);
    tracing::debug!(max_connections = settings.max_connections, "connected");

    let out = match args.resource {
        cli::Resource::Companies(cmd) => companies::run(&client, cmd).await?,
        cli::Resource::Jobs(cmd) => jobs::run(&client, cmd).await?,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
