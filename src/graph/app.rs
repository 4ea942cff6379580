//! The application facade.
//!
//! [`ProjectMemory`] composes the four domain services into the cross-cutting
//! operations the tool surface needs: project bootstrap with seed entities,
//! paginated knowledge search, whole-graph reads, and cross-project copy.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::repo::{Pagination, QueryOptions, Repository};
use crate::storage::StorageProvider;

use super::entities::EntityService;
use super::observations::ObservationService;
use super::projects::ProjectService;
use super::relations::RelationService;
use super::types::{Entity, NewEntity, NewRelation, Observation, Project, Relation};
use super::GraphError;

/// A freshly created project with its seed entities.
#[derive(Debug, Serialize)]
pub struct ProjectWithEntities {
    pub project: Project,
    pub entities: Vec<Entity>,
}

/// One page of matching entities, hydrated with every observation and
/// relation touching them. Pagination describes the entity page only.
#[derive(Debug, Serialize)]
pub struct ProjectKnowledge {
    pub entities: Vec<Entity>,
    pub observations: Vec<Observation>,
    pub relations: Vec<Relation>,
    pub pagination: Pagination,
}

/// A project's full graph.
#[derive(Debug, Serialize)]
pub struct ProjectGraph {
    pub entities: Vec<Entity>,
    pub observations: Vec<Observation>,
    pub relations: Vec<Relation>,
}

/// What a cross-project copy did.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopySummary {
    /// Entities created fresh in the target project.
    pub entities_created: usize,
    /// Entities that already existed by name and had observations merged in.
    pub entities_merged: usize,
    /// Observations newly stored in the target (post-dedup).
    pub observations_copied: usize,
    /// Relations newly stored in the target (post-dedup).
    pub relations_copied: usize,
}

/// Facade over the knowledge-graph services.
pub struct ProjectMemory {
    pub projects: ProjectService,
    pub entities: EntityService,
    pub observations: ObservationService,
    pub relations: RelationService,
}

impl ProjectMemory {
    pub fn new(
        projects: ProjectService,
        entities: EntityService,
        observations: ObservationService,
        relations: RelationService,
    ) -> Self {
        Self {
            projects,
            entities,
            observations,
            relations,
        }
    }

    /// Wire repositories and services over one storage provider. This is the
    /// whole dependency graph, resolved once.
    pub fn with_storage(storage: Arc<dyn StorageProvider>) -> Self {
        let project_repo: Repository<Project> = Repository::new(Arc::clone(&storage));
        let entity_repo: Repository<Entity> = Repository::new(Arc::clone(&storage));
        let observation_repo: Repository<Observation> = Repository::new(Arc::clone(&storage));
        let relation_repo: Repository<Relation> = Repository::new(storage);

        let entities = EntityService::new(
            entity_repo.clone(),
            observation_repo.clone(),
            relation_repo.clone(),
        );
        let observations = ObservationService::new(observation_repo, entity_repo.clone());
        let relations = RelationService::new(relation_repo, entity_repo);
        let projects = ProjectService::new(project_repo, entities.clone());

        Self::new(projects, entities, observations, relations)
    }

    /// Create a project, then its seed entities. There is no transactional
    /// boundary: if an entity fails mid-way, the project and earlier entities
    /// remain.
    pub fn create_project_with_entities(
        &self,
        name: impl Into<String>,
        description: Option<String>,
        entities: Vec<NewEntity>,
    ) -> Result<ProjectWithEntities, GraphError> {
        let project = self.projects.create(name, description)?;
        let entities = self.entities.create_many(&project.meta.id, entities)?;
        Ok(ProjectWithEntities { project, entities })
    }

    /// Search a project's entities by name/type pattern, then hydrate the
    /// matching page with all of its observations and relations.
    pub fn search_project_knowledge(
        &self,
        project_id: &str,
        query: &str,
        options: QueryOptions,
    ) -> Result<ProjectKnowledge, GraphError> {
        let page = self.entities.search(project_id, query, options)?;
        let entity_ids: Vec<String> = page.data.iter().map(|e| e.meta.id.clone()).collect();

        let observations = self.observations.find_by_entities(entity_ids.clone())?;
        let relations = self.relations.find_by_entities(entity_ids)?;

        Ok(ProjectKnowledge {
            entities: page.data,
            observations,
            relations,
            pagination: page.pagination,
        })
    }

    /// The entire graph of one project.
    pub fn read_graph(&self, project_id: &str) -> Result<ProjectGraph, GraphError> {
        let entities = self.entities.all_in_project(project_id)?;
        let entity_ids: Vec<String> = entities.iter().map(|e| e.meta.id.clone()).collect();

        let observations = self.observations.find_by_entities(entity_ids.clone())?;
        let relations = self.relations.find_by_entities(entity_ids)?;

        Ok(ProjectGraph {
            entities,
            observations,
            relations,
        })
    }

    /// Copy named entities from one project into another, merging rather
    /// than duplicating.
    ///
    /// Entities absent from the target are created fresh (new identity,
    /// target project id) with their observations. Entities already present
    /// by name merge observations without duplicates. Relations between
    /// copied names are recreated in the target with triple dedup.
    pub fn copy_memory(
        &self,
        source_project_id: &str,
        target_project_id: &str,
        entity_names: Vec<String>,
    ) -> Result<CopySummary, GraphError> {
        let source_entities = self
            .entities
            .find_named(source_project_id, entity_names)?;

        let mut summary = CopySummary::default();
        let mut name_of: HashMap<String, String> = HashMap::new();

        for entity in &source_entities {
            name_of.insert(entity.meta.id.clone(), entity.name.clone());

            let contents: Vec<String> = self
                .observations
                .find_by_entity(&entity.meta.id)?
                .into_iter()
                .map(|o| o.content)
                .collect();

            let target = match self
                .entities
                .find_by_name(target_project_id, &entity.name)?
            {
                Some(existing) => {
                    summary.entities_merged += 1;
                    existing
                }
                None => {
                    summary.entities_created += 1;
                    self.entities.create(
                        target_project_id,
                        NewEntity {
                            name: entity.name.clone(),
                            entity_type: entity.entity_type.clone(),
                            observations: Vec::new(),
                        },
                    )?
                }
            };

            let added = self.observations.add_observations(&target.meta.id, &contents)?;
            summary.observations_copied += added.len();
        }

        // Relations are copied only when both endpoints were in the copied set.
        for relation in self.relations.find_by_project(source_project_id)? {
            let (Some(from_name), Some(to_name)) = (
                name_of.get(&relation.from_entity_id),
                name_of.get(&relation.to_entity_id),
            ) else {
                continue;
            };

            let result = self.relations.create_relation(
                target_project_id,
                NewRelation {
                    from_entity_name: from_name.clone(),
                    to_entity_name: to_name.clone(),
                    relation_type: relation.relation_type.clone(),
                },
            )?;
            if !result.deduplicated {
                summary.relations_copied += 1;
            }
        }

        tracing::info!(
            source = source_project_id,
            target = target_project_id,
            created = summary.entities_created,
            merged = summary.entities_merged,
            "copy_memory completed"
        );
        Ok(summary)
    }
}
