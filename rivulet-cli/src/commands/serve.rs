//! Serve command - run the Rivulet API server.

use anyhow::{Context, Result};
use rivulet_executor::api::{API_PREFIX, ApiServer, ServerConfig};
use rivulet_executor::engine::Engine;
use rivulet_executor::loader::ConfigLoader;
use std::path::Path;
use std::sync::Arc;

/// Run the serve command.
pub async fn run(
    host: &str,
    port: u16,
    config_file: Option<&Path>,
    max_connections: usize,
) -> Result<()> {
    tracing::info!(host = %host, port = %port, "Starting Rivulet API server");

    let engine = Arc::new(Engine::new());
    if let Some(path) = config_file {
        let definition = ConfigLoader::load_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        let report = engine
            .activate(definition)
            .with_context(|| format!("Failed to activate {}", path.display()))?;
        println!(
            "Loaded {} agent(s) on {} topic(s) from {}",
            report.agents.len(),
            report.topics,
            path.display()
        );
        for failure in &report.failures {
            println!(
                "  skipped {} at line {}: {}",
                failure.agent_type, failure.line, failure.error
            );
        }
    }

    let config = ServerConfig::new(host, port).with_max_connections(max_connections);
    let server = ApiServer::new(config, Arc::clone(&engine));
    let listener = server.bind().await?;
    let shutdown = server.shutdown_handle();

    let base = format!("http://{}:{}{}", host, port, API_PREFIX);
    println!("Starting Rivulet API server...");
    println!();
    println!("Server: {}", base);
    println!();
    println!("Endpoints:");
    println!("  GET  {}/health          - Health check", base);
    println!("  GET  {}/status          - System status", base);
    println!("  POST {}/config          - Load configuration (text body)", base);
    println!("  GET  {}/topics          - List topics", base);
    println!("  POST {}/topics/{{name}}   - Publish a message", base);
    println!("  GET  {}/publish?topic=&message=", base);
    println!("  GET  {}/graph           - Topology snapshot", base);
    println!("  GET  {}/graph/cycles    - Cycle check", base);
    println!("  POST {}/reset           - Reset all agents", base);
    println!();
    println!("Press Ctrl+C to stop.");
    println!();

    let mut server_task = tokio::spawn(async move { server.serve(listener).await });

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Shutdown signal received");
            println!();
            println!("Shutting down...");
            shutdown.shutdown();
            server_task.await??;
        }
        result = &mut server_task => {
            result??;
        }
    }

    let report = engine.shutdown();
    if !report.is_clean() {
        for failure in &report.failures {
            tracing::warn!(error = %failure, "Cleanup failure during shutdown");
        }
    }
    Ok(())
}
