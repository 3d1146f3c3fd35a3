use chrome_pdf::{setup_logging, Cli, CliRunner, Config};
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    setup_logging(args.verbose)?;

    info!("Starting chrome-pdf v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args).await?;
    let runner = CliRunner::new(config, &args);

    if let Err(e) = runner.run(args.command).await {
        error!("Render failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn load_config(args: &Cli) -> anyhow::Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        let config_content = tokio::fs::read_to_string(config_path).await?;
        serde_json::from_str(&config_content)?
    } else {
        Config::default()
    };

    // Environment overrides the file; CLI flags override both (in CliRunner)
    config.apply_env();

    validate_config(&config)?;

    info!("Chrome binary: {}", config.chrome_binary);
    info!("Navigation timeout: {}s", config.timeout_secs);

    Ok(config)
}

fn validate_config(config: &Config) -> anyhow::Result<()> {
    if config.chrome_binary.is_empty() {
        anyhow::bail!("Chrome binary path must not be empty");
    }

    if config.timeout_secs == 0 {
        anyhow::bail!("Timeout must be greater than 0");
    }

    Ok(())
}
