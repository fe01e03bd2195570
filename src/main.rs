#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod domain;
mod infrastructure;

use std::env;
use std::process;

use anyhow::Error;
use anyhow::Result;
use domain::models::doc_sections;
use domain::models::Action;
use domain::models::Event;
use domain::models::Persona;
use domain::services::clipboard::ClipboardService;
use domain::services::Gallery;
use domain::services::SessionManager;
use domain::services::SessionService;
use domain::services::SettingsStore;
use domain::services::TranscriptStore;
use infrastructure::backends::BackendManager;
use owo_colors::OwoColorize;
use tokio::sync::mpsc;
use tokio::task;

use crate::application::cli;
use crate::application::ui;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        format!(
            "Oh no! mrdep has failed with the following app version and error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        )
        .red()
    );

    process::exit(1);
}

async fn run() -> Result<()> {
    let options = match cli::parse().await? {
        Some(options) => options,
        None => {
            process::exit(0);
        }
    };

    let mut settings = SettingsStore::load(options.settings_path).await;
    for field in options.overrides {
        settings.replace_field(field).await?;
    }
    let transcript = TranscriptStore::load(options.transcript_path).await;

    let persona = Persona::load()?;
    let docs = doc_sections()?;
    let gallery = Gallery::new(options.images_dir).list().await?;
    let backend = BackendManager::get("gemini")?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let manager = SessionManager::new(settings, transcript, backend, persona.clone(), event_tx);

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        return SessionService::start(manager, &mut action_rx).await;
    });

    if let Err(clipboard_err) = ClipboardService::healthcheck() {
        tracing::warn!(err = ?clipboard_err, "Clipboard service is unable to start");
    } else {
        background_futures.spawn(async move {
            return ClipboardService::start().await;
        });
    }

    let ui_future = ui::start(action_tx, event_rx, persona.name, gallery, docs);

    let res = tokio::select!(
        res = background_futures.join_next() => res.unwrap()?,
        res = ui_future => res,
    );

    return res;
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let debug_log_dir = env::var("MRDEP_LOG_DIR").unwrap_or_else(|_| {
        return dirs::cache_dir()
            .unwrap()
            .join("mrdep")
            .to_string_lossy()
            .to_string();
    });

    let file_appender = tracing_appender::rolling::never(debug_log_dir, "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("mrdep")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    let res = run().await;
    if res.is_err() {
        ui::destruct_terminal_for_panic();
        handle_error(res.unwrap_err());
    }

    process::exit(0);
}
