//! Meal Explorer - Recipe browser for TheMealDB
//!
//! Main entry point for the desktop application.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use anyhow::Result;

fn main() -> Result<()> {
    // Initialize logging and panic hook first
    let _log_guard = app_log::init()?;

    // Clean up old logs (7 days)
    if let Err(e) = app_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("Meal Explorer starting...");

    // Load configuration; the first run writes the defaults out
    let config = match app_core::AppConfig::load_or_init() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            app_core::AppConfig::default()
        }
    };

    // Run the application
    app::run(config)
}
