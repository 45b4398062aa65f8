mod api;
mod commands;
mod config;
mod format;
mod model;
mod monitor;
mod session;
mod surface;
mod tasks;
#[cfg(test)]
mod teststub;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::api::Client;
use crate::commands::{AddOutcome, Dispatcher};
use crate::config::Settings;
use crate::monitor::Monitor;
use crate::surface::TermSurface;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let settings = Settings::new().expect("Failed to load configuration");

    tracing_subscriber::fmt()
        .with_env_filter(&settings.log_level)
        .init();

    info!("Starting medown-monitor...");

    let client = Client::new(&settings.server_url).expect("Failed to build HTTP client");

    if let Err(e) = session::authenticate(&client, settings.password.as_deref()).await {
        error!("authentication failed: {e}");
        eprintln!("not authenticated against {}; set MEDOWN_PASSWORD and retry", settings.server_url);
        std::process::exit(1);
    }
    info!("authenticated against {}", settings.server_url);

    match client.dir_info().await {
        Ok(info) => println!("downloading into {} ({} free)", info.path, info.free_space),
        Err(e) => error!("failed to fetch dir info: {e}"),
    }

    let (ctrl_tx, ctrl_rx) = mpsc::channel(16);
    let shutdown = CancellationToken::new();
    let monitor = Monitor::new(TermSurface::new());
    let poll = tokio::spawn(tasks::run_poll_loop(
        client.clone(),
        monitor,
        ctrl_rx,
        shutdown.clone(),
    ));

    let dispatcher = Dispatcher::new(client.clone(), ctrl_tx);
    run_command_line(&client, &dispatcher).await;

    // The original web client leaves its poll timer running after logout;
    // here the recurring poll is cancelled explicitly.
    if let Err(e) = client.logout().await {
        warn!("logout failed: {e}");
    }
    shutdown.cancel();
    let _ = poll.await;
    info!("bye");
}

/// Stand-in for the web UI's buttons and add-download form: one command
/// per stdin line until EOF or `quit`.
async fn run_command_line(client: &Client, dispatcher: &Dispatcher) {
    println!("commands: add <url> [dir] [filename] | toggle <id> | delete <id> | info | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("toggle") => match parts.next().and_then(|s| s.parse().ok()) {
                Some(id) => dispatcher.toggle(id).await,
                None => println!("usage: toggle <id>"),
            },
            Some("delete") => match parts.next().and_then(|s| s.parse().ok()) {
                Some(id) => dispatcher.delete(id).await,
                None => println!("usage: delete <id>"),
            },
            Some("add") => {
                let url = parts.next().unwrap_or("");
                let dir = parts.next().unwrap_or("");
                let filename = parts.next().unwrap_or("");
                match dispatcher.add(url, dir, filename).await {
                    AddOutcome::Started(filename) => println!("started downloading {filename}"),
                    AddOutcome::Rejected(message) => println!("{message}"),
                    AddOutcome::Failed => {}
                }
            }
            Some("info") => match client.dir_info().await {
                Ok(info) => println!("downloading into {} ({} free)", info.path, info.free_space),
                Err(e) => error!("failed to fetch dir info: {e}"),
            },
            Some("quit") | Some("exit") => break,
            Some(other) => println!("unknown command: {other}"),
            None => {}
        }
    }
}
