//! Quotebook - terminal front end for the quote sync client.
//!
//! Reads commands from stdin and forwards them to the sync loop.

use quotebook_client::presenter::TerminalPresenter;
use quotebook_client::runtime::{self, Command};
use quotebook_client::{
    Config, FileStore, HttpRemote, RemoteStore, StorageRemote, SyncController, SystemClock,
};
use quotebook_engine::Resolution;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
Commands:
  random                   show a random quote
  add <category> <text>    add a quote
  filter <category|all>    filter quotes by category
  import <path>            import quotes from a JSON file
  export <path>            export quotes to a JSON file
  sync                     sync now
  accept                   resolve conflicts with the server's categories
  keep                     resolve conflicts keeping local categories
  help                     show this help
  quit                     exit";

/// One parsed line of user input.
enum Input {
    Send(Command),
    Import(PathBuf),
    Export(PathBuf),
    Help,
    Quit,
}

fn parse_line(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let input = match word {
        "random" => Input::Send(Command::RandomQuote),
        "add" => {
            let (category, text) = rest
                .split_once(' ')
                .ok_or("usage: add <category> <text>")?;
            Input::Send(Command::AddQuote {
                text: text.trim().to_string(),
                category: category.to_string(),
            })
        }
        "filter" if !rest.is_empty() => Input::Send(Command::SetFilter(rest.to_string())),
        "import" if !rest.is_empty() => Input::Import(PathBuf::from(rest)),
        "export" if !rest.is_empty() => Input::Export(PathBuf::from(rest)),
        "sync" => Input::Send(Command::SyncNow),
        "accept" => Input::Send(Command::Resolve(Resolution::AcceptRemote)),
        "keep" => Input::Send(Command::Resolve(Resolution::KeepLocal)),
        "help" | "" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(format!("unknown command `{other}`, try `help`")),
    };
    Ok(input)
}

async fn read_commands(tx: mpsc::Sender<Command>) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    while let Some(line) = lines.next_line().await? {
        let input = match parse_line(&line) {
            Ok(input) => input,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        match input {
            Input::Send(command) => tx.send(command).await?,
            Input::Import(path) => match tokio::fs::read_to_string(&path).await {
                Ok(json) => tx.send(Command::Import(json)).await?,
                Err(e) => eprintln!("cannot read {}: {e}", path.display()),
            },
            Input::Export(path) => {
                let (reply_tx, reply_rx) = oneshot::channel();
                tx.send(Command::Export(reply_tx)).await?;
                match reply_rx.await? {
                    Ok(json) => {
                        tokio::fs::write(&path, json).await?;
                        println!("Exported quotes to {}", path.display());
                    }
                    Err(e) => eprintln!("export failed: {e}"),
                }
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
        }
    }

    tx.send(Command::Shutdown).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotebook_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let storage = Arc::new(FileStore::open(&config.storage_path)?);
    tracing::info!(path = %config.storage_path.display(), "Using local storage");

    let remote: Box<dyn RemoteStore> = match &config.remote_url {
        Some(url) => {
            tracing::info!(url = %url, "Syncing with HTTP remote");
            Box::new(HttpRemote::new(url))
        }
        None => {
            tracing::info!("Syncing with storage mock remote");
            Box::new(StorageRemote::new(Arc::clone(&storage), config.mock_latency))
        }
    };

    let mut controller = SyncController::load(
        storage,
        remote,
        TerminalPresenter,
        Arc::new(SystemClock),
        config.sync_options(),
    );
    controller.random_quote();

    let (tx, rx) = runtime::channel();
    let sync_loop = tokio::spawn(runtime::run(controller, rx));

    read_commands(tx).await?;
    sync_loop.await?;

    Ok(())
}
