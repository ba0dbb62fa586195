mod bootstrap;

use std::sync::Arc;

use anyhow::Result;
use devdash_core::backend::Renderer;
use devdash_core::color::Color;
use devdash_core::layout::Layout;
use devdash_core::settings::Settings;
use devdash_data::HttpProviderFactory;
use devdash_runtime::RefreshLoop;
use devdash_ui::TermSession;
use tokio::sync::mpsc;

use crate::bootstrap::Startup;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    if settings.term {
        let (width, height) = crossterm::terminal::size()?;
        println!("Width: {width}, Height: {height}");
        return Ok(());
    }

    let log_path = settings.log_path();
    bootstrap::ensure_directories(&log_path)?;
    let _log_guard = bootstrap::setup_logging(&settings.log_level, &log_path)?;

    tracing::info!("devdash v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(config = %settings.config.display(), "loading configuration");

    let startup = bootstrap::load_config(&settings.config);
    let mut session = TermSession::crossterm()?;

    match startup {
        Startup::Missing => {
            tracing::warn!(config = %settings.config.display(), "no configuration file");
            let message = format!(
                "No configuration file found at {}.\nCreate one to describe your projects, or pass --config <path>.\nPress Ctrl+C to quit.",
                settings.config.display()
            );
            session.load(Layout::message_panel("devdash", message, Color::Default));
            session.run(idle_channel()).await?;
        }
        Startup::Invalid(err) => {
            tracing::error!(error = %err, "configuration rejected");
            session.load(Layout::error_panel(err.to_string()));
            session.run(idle_channel()).await?;
        }
        Startup::Ready(config) => {
            if let Err(err) = session.set_quit_key(&config.general.keys.quit) {
                tracing::error!(error = %err, "invalid quit key");
                session.load(Layout::error_panel(err.to_string()));
                session.run(idle_channel()).await?;
                session.close()?;
                return Ok(());
            }

            let factory = Arc::new(HttpProviderFactory::new()?);
            let (rx, handle) = RefreshLoop::new(factory, config).start();

            // The UI loop exits on the quit key; Ctrl+C delivered as a signal
            // (outside raw mode) ends it as well.
            tokio::select! {
                result = session.run(rx) => {
                    handle.abort();
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down refresh task");
                    handle.abort();
                }
            }
            tracing::info!(
                passes = handle.stats().passes(),
                skipped_ticks = handle.stats().skipped_ticks(),
                "refresh loop stopped"
            );
        }
    }

    session.close()?;
    Ok(())
}

/// A receiver with no sender: the session keeps its panel until quit.
fn idle_channel() -> mpsc::Receiver<Layout> {
    let (_tx, rx) = mpsc::channel(1);
    rx
}
