use clap::Parser;
use site_insight::AnalysisConfig;

#[derive(Parser, Debug)]
#[command(name = "site-insight")]
#[command(about = "Submit a website for analysis and print its scored report")]
#[command(version)]
pub struct Args {
    /// Website URL to analyze
    pub url: String,

    /// Base URL of the analysis API
    #[arg(long)]
    pub api: Option<String>,

    /// User identifier the analysis is saved under
    #[arg(long, default_value = "local")]
    pub user: String,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Maximum number of status polls before giving up
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Milliseconds between status polls
    #[arg(long)]
    pub poll_interval: Option<u64>,
}

/// Build the effective configuration: file settings (if any) with CLI
/// flags layered on top
pub fn build_config(args: &Args) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(api) = &args.api {
        config.api_base_url = api.clone();
    }
    if let Some(max_attempts) = args.max_attempts {
        config.max_polling_attempts = max_attempts;
    }
    if let Some(poll_interval) = args.poll_interval {
        config.polling_interval_ms = poll_interval;
    }

    Ok(config)
}
