//! polychat demo - three participants in three locales
//!
//! Registers a Mexican, a Spanish and a British participant with a hub,
//! lets each send one message, unregisters them, then prints the hub log
//! and every participant's history.
//!
//! # Usage
//!
//! ```bash
//! # Write each participant's display to <name>.txt in the current directory
//! polychat-demo
//!
//! # Write displays somewhere else
//! polychat-demo --out-dir /tmp/chat
//!
//! # Send every display to the console instead of files
//! polychat-demo --stdout
//!
//! # Extra locales / limits from a config file
//! POLYCHAT_CONFIG=polychat.toml polychat-demo
//!
//! # Enable debug logging
//! RUST_LOG=polychat_hub=debug polychat-demo
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use polychat_core::{Locale, Participant, Sink, WriterSink};
use polychat_hub::{spawn_broadcaster, HubConfig};

/// polychat demo - multilingual chat in one process
#[derive(Parser, Debug)]
#[command(name = "polychat-demo", version, about)]
struct Args {
    /// Path to a TOML configuration file (overrides POLYCHAT_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the per-participant display files
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Write every participant's display to stdout instead of files
    #[arg(long)]
    stdout: bool,

    /// Print the log and histories as JSON
    #[arg(long)]
    json: bool,
}

/// Log filter directives applied on top of `RUST_LOG`.
const DEFAULT_LOG_DIRECTIVES: &[&str] = &[
    "polychat_demo=info",
    "polychat_hub=info",
    "polychat_core=warn",
];

/// Sample participants: display name, locale tag, first message.
const SAMPLE_USERS: &[(&str, &str, &str)] = &[
    ("Juan", "es-MX", "Hola, raza."),
    ("Raul", "es-ES", "Hola, tíos."),
    ("John", "en-GB", "Heyy, guys."),
];

/// Opens `<dir>/<name>.txt`, falling back to stdout if it can't be created.
fn open_display(dir: &Path, name: &str, force_stdout: bool) -> Box<dyn Sink> {
    if force_stdout {
        return Box::new(WriterSink::stdout());
    }

    let path = dir.join(format!("{name}.txt"));
    match WriterSink::create(&path) {
        Ok(sink) => Box::new(sink),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Cannot create display file, using stdout"
            );
            Box::new(WriterSink::stdout())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<HubConfig> {
    match path {
        Some(path) => HubConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => HubConfig::from_env().context("Failed to load config from POLYCHAT_CONFIG"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never mix with displays on stdout
    let mut filter = EnvFilter::from_default_env();
    for directive in DEFAULT_LOG_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(args.config.as_deref())?;
    info!(
        max_members = ?config.max_members,
        extra_locales = config.locales.len(),
        "polychat demo starting"
    );

    let hub = spawn_broadcaster(&config);

    let mut users: Vec<(Arc<Participant>, &str)> = Vec::with_capacity(SAMPLE_USERS.len());
    for (name, tag, message) in SAMPLE_USERS {
        let locale: Locale = config
            .locale(tag)
            .with_context(|| format!("No locale for {name}"))?;
        let sink = open_display(&args.out_dir, name, args.stdout);
        users.push((Participant::new(*name, locale, sink), *message));
    }

    for (user, _) in &users {
        hub.register(user.clone()).await?;
    }
    for (user, message) in &users {
        hub.send_message(user, *message).await?;
    }
    for (user, _) in &users {
        hub.unregister(user).await?;
    }

    let log = hub.get_log().await?;

    if args.json {
        let histories: serde_json::Map<_, _> = users
            .iter()
            .map(|(user, _)| (user.identity().to_string(), json!(user.history())))
            .collect();
        let report = json!({ "log": log, "histories": histories });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Chat history: ");
        for line in &log {
            println!("{line}");
        }
        println!();

        for (user, _) in &users {
            println!("{} saw:", user.identity());
            for line in user.history() {
                println!("{line}");
            }
            println!();
        }
    }

    info!(log_entries = log.len(), "polychat demo finished");
    Ok(())
}
