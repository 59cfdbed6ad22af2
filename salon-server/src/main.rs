use std::path::PathBuf;

use salon_server::{
    BackgroundTasks, Config, ServerState, TaskKind, cleanup_old_logs, setup_environment,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env, working directory, logging
    dotenv::dotenv().ok();
    let config = Config::from_env();
    setup_environment(&config)?;

    tracing::info!(
        environment = %config.environment,
        database = %config.database_path,
        "Salon server starting..."
    );

    // 2. Database and services
    let state = ServerState::initialize(&config).await?;

    // 3. Background tasks
    let mut tasks = BackgroundTasks::new();
    if let Some(log_dir) = config.log_dir.clone() {
        tasks.spawn("log_cleanup", TaskKind::Warmup, async move {
            match cleanup_old_logs(&PathBuf::from(log_dir)) {
                Ok(deleted) => tracing::debug!(deleted, "Log cleanup finished"),
                Err(e) => tracing::warn!(error = %e, "Log cleanup failed"),
            }
        });
    }
    let scheduler = state.reminder_scheduler();
    let shutdown = tasks.shutdown_token();
    tasks.spawn("reminder_scheduler", TaskKind::Periodic, scheduler.run(shutdown));
    tracing::info!(tasks = tasks.len(), "Background tasks registered");

    // 4. Run until Ctrl+C
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    tasks.shutdown().await;
    state.db.pool.close().await;

    Ok(())
}
