use std::io::Read;

use studytrack::config::TrackerConfig;
use studytrack::render::render_store;
use studytrack::sync::api::RestClient;
use studytrack::sync::bootstrap::TokioSleeper;
use studytrack::sync::{BootstrapOutcome, SyncStore};

const USAGE: &str = "\
usage: studytrack [--debug] <command>

commands:
  list                              show all sections
  open <section-id>                 expand a section (or collapse it if open)
  add-section <title...>            create a section
  add-items <section-id> [text]     add one item per line (text or stdin)
  toggle <section-id> <item-id>     flip an item's completed flag
  delete <section-id> <item-id>     remove an item";

enum Command {
    List,
    Open(String),
    AddSection(String),
    AddItems(String, Option<String>),
    Toggle(String, String),
    Delete(String, String),
}

fn parse_command(args: &[String]) -> Option<Command> {
    let (name, rest) = args.split_first()?;
    let cmd = match (name.as_str(), rest) {
        ("list", []) => Command::List,
        ("open", [sid]) => Command::Open(sid.clone()),
        ("add-section", words) if !words.is_empty() => Command::AddSection(words.join(" ")),
        ("add-items", [sid]) => Command::AddItems(sid.clone(), None),
        ("add-items", [sid, text]) => Command::AddItems(sid.clone(), Some(text.clone())),
        ("toggle", [sid, iid]) => Command::Toggle(sid.clone(), iid.clone()),
        ("delete", [sid, iid]) => Command::Delete(sid.clone(), iid.clone()),
        _ => return None,
    };
    Some(cmd)
}

fn init_logging(config: &TrackerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to the systemd user journal (`journalctl --user -t studytrack -f`).
    // studytrack targets at info/debug (per config), everything else at warn.
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("studytrack") {
                let max = if studytrack::debug_logging() {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    let journal = systemd_journal_logger::JournalLog::new()?
        .with_syslog_identifier("studytrack".to_string());

    studytrack::set_debug_logging(config.debug_logging || studytrack::debug_logging());

    log::set_boxed_logger(Box::new(FilteredJournal { inner: journal }))?;
    // Global max must be Debug so studytrack debug logs can pass through when toggled
    log::set_max_level(log::LevelFilter::Debug);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(pos) = args.iter().position(|a| a == "--debug") {
        args.remove(pos);
        studytrack::set_debug_logging(true);
    }
    let Some(command) = parse_command(&args) else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    let config = TrackerConfig::load()?;
    init_logging(&config)?;
    if let Err(e) = TrackerConfig::ensure_file_at(&TrackerConfig::default_path()) {
        log::warn!("Could not write default config: {}", e);
    }

    let api = RestClient::new(&config.api_url)?;
    let mut store = SyncStore::new();

    eprintln!("Waking up server...");
    match store
        .bootstrap(&api, &TokioSleeper, config.retry_policy())
        .await
    {
        BootstrapOutcome::Degraded { attempts } => {
            eprintln!("Backend not responding after {} attempt(s)", attempts);
        }
        BootstrapOutcome::Loaded { .. } | BootstrapOutcome::AlreadyRan => {}
    }

    match command {
        Command::List => {}
        Command::Open(sid) => store.toggle_open(&sid),
        Command::AddSection(title) => {
            store.set_title_input(title);
            store.submit_title(&api).await?;
        }
        Command::AddItems(sid, text) => {
            let text = match text {
                Some(t) => t,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            store.set_draft(sid.clone(), text);
            if store.add_items(&api, &sid).await?.is_none() {
                eprintln!("Nothing to add");
            }
            if !store.is_open(&sid) {
                store.toggle_open(&sid);
            }
        }
        Command::Toggle(sid, iid) => {
            store.toggle_item(&api, &sid, &iid).await?;
        }
        Command::Delete(sid, iid) => {
            store.delete_item(&api, &sid, &iid).await?;
        }
    }

    print!("{}", render_store(&store));
    Ok(())
}
