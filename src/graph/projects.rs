//! Project service — namespace roots.
//!
//! Deleting a project takes its whole subgraph with it: every entity goes
//! through the entity cascade (observations, relations, entity), then the
//! project document itself is removed. The steps are individually idempotent,
//! so a retry after a partial failure converges.

use crate::repo::{Filter, PaginatedResult, QueryOptions, Repository};

use super::entities::EntityService;
use super::types::{Project, ProjectPatch};
use super::GraphError;

#[derive(Clone)]
pub struct ProjectService {
    projects: Repository<Project>,
    entities: EntityService,
}

impl ProjectService {
    pub fn new(projects: Repository<Project>, entities: EntityService) -> Self {
        Self { projects, entities }
    }

    pub fn create(
        &self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<Project, GraphError> {
        Ok(self.projects.create(Project::new(name, description))?)
    }

    pub fn find(&self, id: &str) -> Result<Option<Project>, GraphError> {
        Ok(self.projects.find_by_id(id)?)
    }

    pub fn list(&self, options: QueryOptions) -> Result<PaginatedResult<Project>, GraphError> {
        Ok(self.projects.find_many(&Filter::all(), options)?)
    }

    pub fn update(&self, id: &str, patch: ProjectPatch) -> Result<Option<Project>, GraphError> {
        Ok(self.projects.update(id, |project| {
            if let Some(name) = patch.name {
                project.name = name;
            }
            if let Some(description) = patch.description {
                project.description = Some(description);
            }
        })?)
    }

    /// Delete a project and its entire subgraph. Returns whether the project
    /// document existed.
    pub fn delete(&self, id: &str) -> Result<bool, GraphError> {
        for entity in self.entities.all_in_project(id)? {
            self.entities.delete(&entity.meta.id)?;
        }
        let deleted = self.projects.delete(id)?;
        if deleted {
            tracing::info!(project_id = id, "project deleted with subgraph");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{Entity, NewEntity, Observation, Relation};
    use crate::repo::Filter;
    use crate::storage::{FileStorageProvider, StorageProvider};
    use std::sync::Arc;

    struct Fixture {
        _dir: tempfile::TempDir,
        service: ProjectService,
        entities: EntityService,
        observations: Repository<Observation>,
        relations: Repository<Relation>,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn StorageProvider> = Arc::new(FileStorageProvider::new(dir.path()));
        let observations: Repository<Observation> = Repository::new(Arc::clone(&storage));
        let relations: Repository<Relation> = Repository::new(Arc::clone(&storage));
        let entity_repo: Repository<Entity> = Repository::new(Arc::clone(&storage));
        let entities =
            EntityService::new(entity_repo, observations.clone(), relations.clone());
        let service = ProjectService::new(Repository::new(storage), entities.clone());
        Fixture {
            _dir: dir,
            service,
            entities,
            observations,
            relations,
        }
    }

    #[test]
    fn test_create_and_find() {
        let f = fixture();
        let project = f
            .service
            .create("demo", Some("a test project".into()))
            .unwrap();

        let found = f.service.find(&project.meta.id).unwrap().unwrap();
        assert_eq!(found.name, "demo");
        assert_eq!(found.description.as_deref(), Some("a test project"));
    }

    #[test]
    fn test_list_paginates() {
        let f = fixture();
        for i in 0..3 {
            f.service.create(format!("project-{i}"), None).unwrap();
        }

        let page = f.service.list(QueryOptions::with_limit(2)).unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 2);
    }

    #[test]
    fn test_update_patches_fields() {
        let f = fixture();
        let project = f.service.create("demo", None).unwrap();

        let updated = f
            .service
            .update(
                &project.meta.id,
                ProjectPatch {
                    description: Some("now described".into()),
                    ..ProjectPatch::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "demo");
        assert_eq!(updated.description.as_deref(), Some("now described"));
    }

    #[test]
    fn test_update_missing_is_none() {
        let f = fixture();
        assert!(f
            .service
            .update("missing", ProjectPatch::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_delete_cascades_to_subgraph() {
        let f = fixture();
        let project = f.service.create("demo", None).unwrap();
        let pid = project.meta.id.clone();

        f.entities
            .create_many(
                &pid,
                vec![
                    NewEntity {
                        name: "A".into(),
                        entity_type: "t".into(),
                        observations: vec!["x".into()],
                    },
                    NewEntity {
                        name: "B".into(),
                        entity_type: "t".into(),
                        observations: vec![],
                    },
                ],
            )
            .unwrap();
        let a = f.entities.find_by_name(&pid, "A").unwrap().unwrap();
        let b = f.entities.find_by_name(&pid, "B").unwrap().unwrap();
        f.relations
            .create(Relation::new(&pid, &a.meta.id, &b.meta.id, "uses"))
            .unwrap();

        assert!(f.service.delete(&pid).unwrap());

        assert!(f.service.find(&pid).unwrap().is_none());
        assert!(f.entities.all_in_project(&pid).unwrap().is_empty());
        assert!(f.observations.find_all(&Filter::all()).unwrap().is_empty());
        assert!(f.relations.find_all(&Filter::all()).unwrap().is_empty());
    }
}
