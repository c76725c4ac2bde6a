use clap::Parser;
use site_insight::results::{AnalysisResult, ScoreBand};
use site_insight::{HttpAnalysisApi, MemoryStore, Orchestrator, SessionHandle};

mod args;
use args::{Args, build_config};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let api = match HttpAnalysisApi::new(&config) {
        Ok(api) => api,
        Err(e) => {
            ::log::error!("Failed to create API client: {}", e);
            std::process::exit(1);
        }
    };

    let store = MemoryStore::new();
    let mut orchestrator = Orchestrator::new(api, store, config);

    // Report estimated progress while the analysis runs
    let progress = tokio::spawn(watch_progress(orchestrator.session()));

    ::log::info!("Starting analysis for: {}", args.url);
    let outcome = orchestrator.start_analysis(&args.url, &args.user).await;
    progress.abort();

    match outcome {
        Ok(result) => print_report(&result),
        Err(e) => {
            ::log::error!("Analysis did not complete: {}", e);
            if let Some(url_error) = orchestrator.session().snapshot().await.url_error {
                eprintln!("{}", url_error);
            }
            std::process::exit(1);
        }
    }
}

/// Print the session's progress estimate until it reaches a terminal
/// phase
async fn watch_progress(session: SessionHandle) {
    let mut last_reported = 0;
    loop {
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        let state = session.snapshot().await;
        if state.phase.is_terminal() {
            break;
        }
        if state.is_analyzing && state.progress != last_reported {
            last_reported = state.progress;
            println!("Analyzing... {}%", state.progress);
        }
    }
}

fn print_report(result: &AnalysisResult) {
    println!("\nAnalysis of {}", result.url);
    println!("Task: {}", result.task_id);

    if let Some(analytics) = &result.analytics {
        println!("\nScores:");
        for (name, score) in [
            ("SEO", analytics.seo_score),
            ("Performance", analytics.performance_score),
            ("Accessibility", analytics.accessibility_score),
            ("Best practices", analytics.best_practices_score),
        ] {
            println!(
                "  {:<15} {:>3}  ({})",
                name,
                score,
                ScoreBand::from_score(score).label()
            );
        }
    }

    if !result.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &result.recommendations {
            println!(
                "  {}. {} [{:?} impact, {:?} effort]",
                rec.priority, rec.title, rec.impact, rec.effort
            );
        }
    }

    if let Some(summary) = &result.summary {
        println!("\nSummary:\n{}", summary);
    }
}
