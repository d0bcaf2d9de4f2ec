use clap::Parser;
use crawl_frontier::{CrawlConfig, CrawlSummary, Scheduler};
use std::process::ExitCode;
use std::sync::Arc;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let base = match &args.config {
        Some(path) => match CrawlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::from(2);
            }
        },
        None => CrawlConfig::default(),
    };
    let config = args.apply_to(base);

    if config.seed_urls.is_empty() {
        ::log::error!("No seed URLs given");
        return ExitCode::from(2);
    }

    let (fetcher, processor) = match crawl_frontier::web_collaborators(&config) {
        Ok(collaborators) => collaborators,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            return ExitCode::from(2);
        }
    };
    let scheduler = match Scheduler::new(config) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            return ExitCode::from(2);
        }
    };

    println!("Note: Web crawling requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );

    // Stop cleanly on Ctrl-C
    let cancel = scheduler.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ::log::info!("Interrupted, stopping workers");
            cancel.cancel();
        }
    });

    let fetcher = Arc::new(fetcher);
    ::log::info!("Starting crawl from {:?}", scheduler.config().seed_urls);
    let summary = scheduler.run(Arc::clone(&fetcher), processor).await;
    fetcher.close().await;

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                ::log::error!("Failed to serialize summary: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_summary(&summary);
    }

    ExitCode::SUCCESS
}

fn print_summary(summary: &CrawlSummary) {
    println!(
        "Crawling complete - fetched {} pages in {:.2} seconds",
        summary.fetched,
        summary.elapsed_ms as f64 / 1000.0
    );
    println!("  Fetch failures:   {}", summary.fetch_failures);
    println!("  Process failures: {}", summary.process_failures);
    println!(
        "  Links discovered: {} ({} new)",
        summary.discovered, summary.admitted
    );
    if summary.cancelled {
        println!("  Stopped early, {} URLs left pending", summary.pending);
    }
}
