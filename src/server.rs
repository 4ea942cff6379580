//! MCP server initialization for stdio and HTTP transports.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that wire the
//! storage provider, repositories, services, and MCP tool handler into a
//! running server. The whole dependency graph is constructed here, once, at
//! process start.

use crate::config::EngramConfig;
use crate::graph::types::{Entity, Observation, Project, Relation};
use crate::graph::ProjectMemory;
use crate::repo::Document;
use crate::storage::{FileStorageProvider, StorageProvider};
use crate::tools::EngramTools;
use anyhow::Result;
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

/// Every collection the server manages.
pub const COLLECTIONS: [&str; 4] = [
    Project::COLLECTION,
    Entity::COLLECTION,
    Observation::COLLECTION,
    Relation::COLLECTION,
];

/// Shared setup: build the storage provider under the configured root,
/// ensure all collections exist, and wire the facade.
fn setup_shared_state(
    config: EngramConfig,
) -> Result<(Arc<Mutex<ProjectMemory>>, Arc<EngramConfig>)> {
    let root = config.resolved_root_path();
    let storage: Arc<dyn StorageProvider> = Arc::new(FileStorageProvider::new(&root));

    for collection in COLLECTIONS {
        storage.create_collection(collection)?;
    }
    tracing::info!(root = %root.display(), "storage ready");

    let app = Arc::new(Mutex::new(ProjectMemory::with_storage(storage)));
    let config = Arc::new(config);

    Ok((app, config))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: EngramConfig) -> Result<()> {
    tracing::info!("starting Engram MCP server on stdio");

    let (app, config) = setup_shared_state(config)?;

    let tools = EngramTools::new(app, config);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running — waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP transport.
pub async fn serve_http(config: EngramConfig) -> Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let bind_addr = format!("{host}:{port}");

    tracing::info!(addr = %bind_addr, "starting Engram MCP server on HTTP");

    let (app, config) = setup_shared_state(config)?;

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(EngramTools::new(app.clone(), config.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl-c");
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
