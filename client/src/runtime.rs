//! Event loop driving a [`SyncController`].
//!
//! One task owns the controller and waits on whichever comes first: the sync
//! timer's deadline or the next [`Command`]. A cycle is awaited to completion
//! before the loop looks at the channel again, so commands sent during a sync
//! queue up behind it.

use crate::controller::{SyncController, SyncOutcome};
use crate::error::Result;
use crate::presenter::Presenter;
use crate::remote::RemoteStore;
use crate::storage::KeyValueStore;
use quotebook_engine::Resolution;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Requests from the presentation surface.
#[derive(Debug)]
pub enum Command {
    RandomQuote,
    AddQuote { text: String, category: String },
    SetFilter(String),
    Resolve(Resolution),
    /// Import quotes from JSON text
    Import(String),
    /// Export the collection as pretty JSON through the reply channel
    Export(oneshot::Sender<Result<String>>),
    /// Run a cycle now instead of waiting for the timer
    SyncNow,
    Shutdown,
}

/// Create the command channel.
pub fn channel() -> (mpsc::Sender<Command>, mpsc::Receiver<Command>) {
    mpsc::channel(32)
}

/// Run the controller until [`Command::Shutdown`] arrives or every sender is
/// dropped, then hand it back.
pub async fn run<S, R, P>(
    mut controller: SyncController<S, R, P>,
    mut commands: mpsc::Receiver<Command>,
) -> SyncController<S, R, P>
where
    S: KeyValueStore,
    R: RemoteStore,
    P: Presenter,
{
    tracing::info!("Sync loop started");

    loop {
        let wait = controller.next_sync_in();

        tokio::select! {
            _ = sleep_for(wait) => {
                if let Some(result) = controller.on_tick().await {
                    log_outcome(&result);
                }
            }
            command = commands.recv() => match command {
                None | Some(Command::Shutdown) => break,
                Some(command) => handle(&mut controller, command).await,
            },
        }
    }

    tracing::info!("Sync loop stopped");
    controller
}

async fn sleep_for(wait: Option<Duration>) {
    match wait {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

async fn handle<S, R, P>(controller: &mut SyncController<S, R, P>, command: Command)
where
    S: KeyValueStore,
    R: RemoteStore,
    P: Presenter,
{
    let result = match command {
        Command::RandomQuote => {
            controller.random_quote();
            Ok(())
        }
        Command::AddQuote { text, category } => controller.add_quote(&text, &category).await,
        Command::SetFilter(category) => controller.set_category_filter(&category),
        Command::Resolve(resolution) => controller.resolve(resolution).await,
        Command::Import(json) => controller.import_json(&json).await.map(|_| ()),
        Command::Export(reply) => {
            // Receiver may have given up waiting
            let _ = reply.send(controller.export_json());
            Ok(())
        }
        Command::SyncNow => {
            let result = controller.sync_now().await;
            log_outcome(&result);
            Ok(())
        }
        Command::Shutdown => Ok(()),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Command rejected");
    }
}

fn log_outcome(result: &Result<SyncOutcome>) {
    match result {
        Ok(outcome) => tracing::debug!(?outcome, "Sync cycle finished"),
        Err(e) => tracing::debug!(error = %e, "Sync cycle did not complete"),
    }
}
