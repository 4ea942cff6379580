pub mod add_observations;
pub mod copy_memory;
pub mod create_entities;
pub mod create_project;
pub mod create_relations;
pub mod delete_entities;
pub mod list_projects;
pub mod read_graph;
pub mod search_nodes;

use add_observations::{AddObservationsParams, AddedObservations};
use copy_memory::CopyMemoryParams;
use create_entities::CreateEntitiesParams;
use create_project::CreateProjectParams;
use create_relations::CreateRelationsParams;
use delete_entities::{DeleteEntitiesParams, DeleteEntitiesResult};
use list_projects::ListProjectsParams;
use read_graph::ReadGraphParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use search_nodes::SearchNodesParams;
use std::sync::{Arc, Mutex};

use crate::config::EngramConfig;
use crate::graph::ProjectMemory;
use crate::repo::QueryOptions;

/// The Engram MCP tool handler. Holds the shared application facade and
/// config, and exposes all MCP tools via the `#[tool_router]` macro.
///
/// The facade does blocking file I/O, so every tool takes the lock inside
/// `spawn_blocking`; the mutex also serializes tool calls, one request at a
/// time.
#[derive(Clone)]
pub struct EngramTools {
    tool_router: ToolRouter<Self>,
    app: Arc<Mutex<ProjectMemory>>,
    config: Arc<EngramConfig>,
}

#[tool_router]
impl EngramTools {
    pub fn new(app: Arc<Mutex<ProjectMemory>>, config: Arc<EngramConfig>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            app,
            config,
        }
    }

    /// List all projects with stored memory.
    #[tool(description = "List all projects with stored memory.")]
    async fn list_projects(
        &self,
        Parameters(_params): Parameters<ListProjectsParams>,
    ) -> Result<String, String> {
        tracing::info!("list_projects called");

        let app = Arc::clone(&self.app);
        run_blocking("list_projects", move || {
            let app = lock(&app)?;
            let projects = app.projects.list(QueryOptions::default())?;
            Ok(serde_json::to_string_pretty(&projects)?)
        })
        .await
    }

    /// Create a new project, optionally seeded with entities.
    #[tool(
        description = "Create a new project memory namespace, optionally seeded with initial entities."
    )]
    async fn create_project(
        &self,
        Parameters(params): Parameters<CreateProjectParams>,
    ) -> Result<String, String> {
        tracing::info!(name = %params.name, "create_project called");

        let app = Arc::clone(&self.app);
        run_blocking("create_project", move || {
            let app = lock(&app)?;
            let entities = params
                .entities
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect();
            let result =
                app.create_project_with_entities(params.name, params.description, entities)?;
            Ok(serde_json::to_string_pretty(&result)?)
        })
        .await
    }

    /// Create multiple new entities in the project knowledge graph.
    #[tool(description = "Create multiple new entities in the project knowledge graph.")]
    async fn create_entities(
        &self,
        Parameters(params): Parameters<CreateEntitiesParams>,
    ) -> Result<String, String> {
        tracing::info!(
            project_id = %params.project_id,
            count = params.entities.len(),
            "create_entities called"
        );

        let app = Arc::clone(&self.app);
        run_blocking("create_entities", move || {
            let app = lock(&app)?;
            let entities = params.entities.into_iter().map(Into::into).collect();
            let created = app.entities.create_many(&params.project_id, entities)?;
            Ok(serde_json::to_string_pretty(&created)?)
        })
        .await
    }

    /// Create multiple new relations between entities.
    #[tool(
        description = "Create multiple new relations between entities in the project knowledge graph. Endpoints are addressed by entity name; both must already exist."
    )]
    async fn create_relations(
        &self,
        Parameters(params): Parameters<CreateRelationsParams>,
    ) -> Result<String, String> {
        tracing::info!(
            project_id = %params.project_id,
            count = params.relations.len(),
            "create_relations called"
        );

        let app = Arc::clone(&self.app);
        run_blocking("create_relations", move || {
            let app = lock(&app)?;
            let mut results = Vec::with_capacity(params.relations.len());
            for spec in params.relations {
                results.push(app.relations.create_relation(&params.project_id, spec.into())?);
            }
            Ok(serde_json::to_string_pretty(&results)?)
        })
        .await
    }

    /// Search for nodes in a project's knowledge graph.
    #[tool(
        description = "Search a project's knowledge graph by a pattern matched against entity names and types. Returns the matching entities with their observations and relations, paginated."
    )]
    async fn search_nodes(
        &self,
        Parameters(params): Parameters<SearchNodesParams>,
    ) -> Result<String, String> {
        let limit = params
            .limit
            .unwrap_or(self.config.query.default_limit)
            .min(self.config.query.max_limit)
            .max(1);
        let page = params.page.unwrap_or(1).max(1);

        tracing::info!(
            project_id = %params.project_id,
            query = %params.query,
            page,
            limit,
            "search_nodes called"
        );

        let app = Arc::clone(&self.app);
        run_blocking("search_nodes", move || {
            let app = lock(&app)?;
            let options = QueryOptions {
                limit: Some(limit),
                skip: Some((page - 1) * limit),
                sort: None,
            };
            let result =
                app.search_project_knowledge(&params.project_id, &params.query, options)?;
            Ok(serde_json::to_string_pretty(&result)?)
        })
        .await
    }

    /// Read the entire knowledge graph for a project.
    #[tool(description = "Read the entire knowledge graph for a specific project.")]
    async fn read_graph(
        &self,
        Parameters(params): Parameters<ReadGraphParams>,
    ) -> Result<String, String> {
        tracing::info!(project_id = %params.project_id, "read_graph called");

        let app = Arc::clone(&self.app);
        run_blocking("read_graph", move || {
            let app = lock(&app)?;
            let graph = app.read_graph(&params.project_id)?;
            Ok(serde_json::to_string_pretty(&graph)?)
        })
        .await
    }

    /// Add new observations to existing entities.
    #[tool(
        description = "Add new observations to existing entities. Re-adding content an entity already has is a no-op; the result lists only what was newly stored."
    )]
    async fn add_observations(
        &self,
        Parameters(params): Parameters<AddObservationsParams>,
    ) -> Result<String, String> {
        tracing::info!(count = params.observations.len(), "add_observations called");

        let app = Arc::clone(&self.app);
        run_blocking("add_observations", move || {
            let app = lock(&app)?;
            let mut results = Vec::with_capacity(params.observations.len());
            for spec in params.observations {
                let added = app
                    .observations
                    .add_observations(&spec.entity_id, &spec.contents)?;
                results.push(AddedObservations {
                    entity_id: spec.entity_id,
                    added_observations: added.into_iter().map(|o| o.content).collect(),
                });
            }
            Ok(serde_json::to_string_pretty(&results)?)
        })
        .await
    }

    /// Delete entities by name, cascading to their observations and relations.
    #[tool(
        description = "Delete entities by name from a project, cascading to their observations and relations."
    )]
    async fn delete_entities(
        &self,
        Parameters(params): Parameters<DeleteEntitiesParams>,
    ) -> Result<String, String> {
        tracing::info!(
            project_id = %params.project_id,
            count = params.entity_names.len(),
            "delete_entities called"
        );

        let app = Arc::clone(&self.app);
        run_blocking("delete_entities", move || {
            let app = lock(&app)?;
            let mut deleted_count = 0;
            for name in &params.entity_names {
                if let Some(entity) = app.entities.find_by_name(&params.project_id, name)? {
                    if app.entities.delete(&entity.meta.id)? {
                        deleted_count += 1;
                    }
                }
            }
            Ok(serde_json::to_string_pretty(&DeleteEntitiesResult {
                deleted_count,
            })?)
        })
        .await
    }

    /// Copy entities (with observations and relations) between projects.
    #[tool(
        description = "Copy entities and their observations and relations from one project to another, merging into entities that already exist by name."
    )]
    async fn copy_memory(
        &self,
        Parameters(params): Parameters<CopyMemoryParams>,
    ) -> Result<String, String> {
        tracing::info!(
            source = %params.source_project_id,
            target = %params.target_project_id,
            count = params.entity_names.len(),
            "copy_memory called"
        );

        let app = Arc::clone(&self.app);
        run_blocking("copy_memory", move || {
            let app = lock(&app)?;
            let summary = app.copy_memory(
                &params.source_project_id,
                &params.target_project_id,
                params.entity_names,
            )?;
            Ok(serde_json::to_string_pretty(&summary)?)
        })
        .await
    }
}

/// Run blocking facade work on the blocking pool and flatten errors into the
/// tool-result string convention.
async fn run_blocking<F>(tool: &'static str, f: F) -> Result<String, String>
where
    F: FnOnce() -> anyhow::Result<String> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| format!("{tool} task failed: {e}"))?
        .map_err(|e| format!("{tool} failed: {e}"))
}

fn lock(
    app: &Arc<Mutex<ProjectMemory>>,
) -> anyhow::Result<std::sync::MutexGuard<'_, ProjectMemory>> {
    app.lock()
        .map_err(|e| anyhow::anyhow!("app lock poisoned: {e}"))
}

#[tool_handler]
impl ServerHandler for EngramTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Engram stores per-project knowledge graphs. Use create_project to open a \
                 namespace, create_entities/create_relations/add_observations to build the \
                 graph, search_nodes or read_graph to retrieve it, and copy_memory to share \
                 entities between projects."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
