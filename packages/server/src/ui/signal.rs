//! Shutdown signal handling.

/// Ctrl+C を待つ。ハンドラを登録できなければシグナルによる停止は行わない。
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
