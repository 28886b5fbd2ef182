//! AppState construction extracted from `main.rs`.
//!
//! Shared by `serve` and `ask` so both boot the same runtime.

use std::sync::Arc;

use anyhow::Context;

use la_domain::config::{Config, ConfigSeverity};

use crate::state::AppState;

/// Validate config, construct every client and return a fully-wired
/// [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    // ── Assistants client ────────────────────────────────────────────
    let assistants =
        la_assistants::create_client(&config.assistants).context("creating assistants client")?;

    // ── Store + identity ─────────────────────────────────────────────
    let backend = la_store::create_backend(&config.store).context("creating store backend")?;
    tracing::info!(
        transport = ?config.store.transport,
        log_messages = config.store.log_messages,
        "store backend ready"
    );

    let state = AppState::new(config.clone(), assistants, backend.store, backend.identity);
    tracing::info!(
        poll_interval_ms = config.runs.poll_interval_ms,
        max_polls = config.runs.max_polls,
        timeout_ms = config.runs.timeout_ms,
        "chat runtime ready"
    );
    Ok(state)
}

/// Spawn housekeeping loops that run for the lifetime of the server.
pub fn spawn_background_tasks(state: &AppState) {
    let user_locks = state.user_locks.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        interval.tick().await;
        loop {
            interval.tick().await;
            user_locks.prune_idle();
            tracing::debug!(users = user_locks.user_count(), "pruned idle user locks");
        }
    });
}
