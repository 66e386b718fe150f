use clap::{Parser, Subcommand};
use harness::{ConfigOverrides, HarnessConfig, HarnessResult, Suite};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "harness")]
#[command(about = "Run the Amatino binding test suite against a live backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run test cases and print a report for each
    Run {
        /// Only run the named case (repeatable)
        #[arg(long)]
        only: Vec<String>,
        /// TOML file with API settings (base_url, timeout_secs, user_agent)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the API base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// List available test cases
    List,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            only,
            config,
            base_url,
            timeout_secs,
        } => {
            let overrides = ConfigOverrides {
                file: config,
                base_url,
                timeout: timeout_secs.map(Duration::from_secs),
            };
            let config = load_config(&overrides)?;
            let all_passed = run_suite(&config, &only).await?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::List => {
            list_cases()?;
        }
    }

    Ok(())
}

/// Read credentials and API settings, failing before any test case exists.
fn load_config(overrides: &ConfigOverrides) -> HarnessResult<HarnessConfig> {
    let config = HarnessConfig::from_env()
        .and_then(|config| config.with_overrides(overrides))
        .inspect_err(|e| {
            error!("Cannot load configuration: {}", e);
        })?;

    info!(
        "Testing against {} as user {}",
        config.api.base_url, config.credentials.user_id
    );
    Ok(config)
}

async fn run_suite(
    config: &HarnessConfig,
    only: &[String],
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut suite = Suite::with_default_cases(config)?;
    if !only.is_empty() {
        suite.retain(only)?;
    }

    let report = suite.run().await?;
    println!("{}", report);

    Ok(report.all_passed())
}

fn list_cases() -> Result<(), Box<dyn std::error::Error>> {
    // Listing needs no live credentials; the placeholder config is never used
    // to reach the network.
    let placeholder = HarnessConfig::new(
        harness::Credentials {
            user_id: 0,
            email: String::new(),
            secret: String::new(),
        },
        amatino::ApiConfig::default(),
    );
    let suite = Suite::with_default_cases(&placeholder)?;

    println!("Available test cases:");
    for name in suite.list_cases() {
        println!("  - {}", name);
    }

    Ok(())
}
