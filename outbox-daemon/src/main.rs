//! Outbox relay daemon
//!
//! Wires the core pipeline together from command-line arguments: opens the
//! history store, authenticates the FTP client, runs the dispatcher, and
//! watches the configured directory until Ctrl-C. Per-transfer outcomes are
//! printed as they happen; `outboxd history` queries the audit log.

mod args;
mod constants;

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tokio::sync::broadcast::error::RecvError;

use outbox_core::{
    DirectoryWatcher, DispatcherHandle, FtpClient, HistoryFilter, HistoryStore, RemoteClient,
    TransferDispatcher, TransferStatus,
};

use args::{Args, Command};
use constants::{APP_DIR_NAME, DB_FILENAME, MSG_BANNER, PASSWORD_ENV_VAR};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match args.command {
        Command::Watch {
            directory,
            host,
            user,
            password,
            database,
            debug,
        } => run_watch(directory, host, user, password, database, debug).await,
        Command::History {
            status,
            from,
            to,
            limit,
            database,
        } => run_history(status, from, to, limit, database).await,
    }
}

// =============================================================================
// Watch Mode
// =============================================================================

async fn run_watch(
    directory: PathBuf,
    host: String,
    user: String,
    password: Option<String>,
    database: Option<PathBuf>,
    debug: bool,
) {
    println!("{}{}", MSG_BANNER, env!("CARGO_PKG_VERSION"));

    let store = setup_store(database).await;
    let password = resolve_password(password);

    // A failed connection is reported but does not stop the pipeline:
    // subsequent files are recorded as failures until credentials work.
    let mut client: Box<dyn RemoteClient> = Box::new(FtpClient::new());
    match client.configure(&host, &user, &password).await {
        Ok(()) => println!("Connected to {} as {}", host, user),
        Err(e) => eprintln!("FTP connection failed ({}); transfers will be recorded as failures", e),
    }

    let (dispatcher, handle) = TransferDispatcher::new(client, store);
    tokio::spawn(dispatcher.run());
    tokio::spawn(print_outcomes(handle.clone(), debug));

    let mut watcher = DirectoryWatcher::new(handle.event_sender());
    if let Err(e) = watcher.start_watch(&directory) {
        eprintln!("Cannot watch {}: {}", directory.display(), e);
        std::process::exit(1);
    }
    println!("Watching {}", directory.display());

    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("Failed to listen for shutdown signal: {}", e);
    }

    watcher.stop_watch();
    println!("Shutting down");
}

/// Print one line per completed upload attempt
async fn print_outcomes(handle: DispatcherHandle, debug: bool) {
    let mut outcomes = handle.subscribe();
    loop {
        match outcomes.recv().await {
            Ok(outcome) if outcome.success => println!("Uploaded {}", outcome.file_name),
            Ok(outcome) => eprintln!("Upload failed: {}", outcome.file_name),
            Err(RecvError::Lagged(missed)) => {
                if debug {
                    eprintln!("Outcome printer lagged, {} notification(s) missed", missed);
                }
            }
            Err(RecvError::Closed) => break,
        }
    }
}

// =============================================================================
// History Mode
// =============================================================================

async fn run_history(
    status: Option<TransferStatus>,
    from: Option<String>,
    to: Option<String>,
    limit: Option<u32>,
    database: Option<PathBuf>,
) {
    let store = setup_store(database).await;

    let filter = HistoryFilter {
        start_date: from,
        end_date: to,
        status,
        limit,
    };

    let records = match store.query(&filter).await {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Failed to query history: {}", e);
            std::process::exit(1);
        }
    };

    if records.is_empty() {
        println!("No transfers recorded");
        return;
    }

    for record in records {
        println!(
            "{:>6}  {}  {:<7}  {}",
            record.id,
            record.transfer_date,
            record.status.as_str(),
            record.file_name
        );
    }
}

// =============================================================================
// Setup Helpers
// =============================================================================

/// Open the history store at the given or platform-default path
async fn setup_store(database: Option<PathBuf>) -> HistoryStore {
    let db_path = database.unwrap_or_else(|| match default_database_path() {
        Some(path) => path,
        None => {
            eprintln!("Cannot determine platform data directory; use --database");
            std::process::exit(1);
        }
    });

    if let Some(parent) = db_path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        eprintln!("Failed to create {}: {}", parent.display(), e);
        std::process::exit(1);
    }

    match HistoryStore::open(&db_path).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open history database {}: {}", db_path.display(), e);
            std::process::exit(1);
        }
    }
}

/// Platform default database location
fn default_database_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME).join(DB_FILENAME))
}

/// Resolve the FTP password from the argument or the environment
fn resolve_password(password: Option<String>) -> String {
    if let Some(password) = password {
        return password;
    }
    match std::env::var(PASSWORD_ENV_VAR) {
        Ok(password) => password,
        Err(_) => {
            eprintln!("No FTP password: pass --password or set {}", PASSWORD_ENV_VAR);
            std::process::exit(1);
        }
    }
}
