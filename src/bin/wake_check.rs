use std::time::{Duration, Instant};

use async_trait::async_trait;
use studytrack::config::TrackerConfig;
use studytrack::sync::api::RestClient;
use studytrack::sync::bootstrap::{Sleeper, TokioSleeper};
use studytrack::sync::{BootstrapOutcome, SyncStore};

/// Prints each backoff as it happens so a cold start is visible.
struct AnnouncingSleeper;

#[async_trait]
impl Sleeper for AnnouncingSleeper {
    async fn sleep(&self, duration: Duration) {
        println!(
            "  {}  no valid response, retrying in {:?}",
            chrono::Local::now().format("%H:%M:%S"),
            duration
        );
        TokioSleeper.sleep(duration).await;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    systemd_journal_logger::JournalLog::new()?
        .with_syslog_identifier("studytrack-wake-check".to_string())
        .install()?;
    log::set_max_level(log::LevelFilter::Info);

    let config = TrackerConfig::load()?;
    println!("=== Backend: {} ===", config.api_url);
    println!(
        "  Policy: {} retries, {} ms backoff",
        config.bootstrap_retries, config.retry_backoff_ms
    );

    let api = RestClient::new(&config.api_url)?;
    let mut store = SyncStore::new();
    let started = Instant::now();

    println!("  {}  first request", chrono::Local::now().format("%H:%M:%S"));
    let outcome = store
        .bootstrap(&api, &AnnouncingSleeper, config.retry_policy())
        .await;
    let elapsed = started.elapsed();

    match outcome {
        BootstrapOutcome::Loaded { sections, attempts } => {
            println!(
                "\n  Awake after {} attempt(s), {:.1}s: {} section(s)",
                attempts,
                elapsed.as_secs_f64(),
                sections
            );
        }
        BootstrapOutcome::Degraded { attempts } => {
            println!(
                "\n  Backend not responding after {} attempt(s), {:.1}s",
                attempts,
                elapsed.as_secs_f64()
            );
            std::process::exit(1);
        }
        BootstrapOutcome::AlreadyRan => {}
    }

    for section in store.sections() {
        let (done, total) = section.completion_ratio();
        let status = if section.is_complete() { "  done" } else { "" };
        println!("    {} — {}/{}{}", section.title, done, total, status);
    }

    println!("\n=== Done ===");
    Ok(())
}
