//! Entity service — node lifecycle and cascade deletion.
//!
//! Deleting an entity walks its dependents explicitly: observations first,
//! then relations touching either endpoint, then the entity itself. There is
//! no storage-level foreign key doing this for us; the order guarantees a
//! crash mid-cascade never leaves a relation pointing at an entity whose
//! observations are gone.

use crate::repo::{PaginatedResult, QueryOptions, Repository};

use super::types::{Entity, EntityPatch, NewEntity, Observation, Relation};
use super::GraphError;

#[derive(Clone)]
pub struct EntityService {
    entities: Repository<Entity>,
    observations: Repository<Observation>,
    relations: Repository<Relation>,
}

impl EntityService {
    pub fn new(
        entities: Repository<Entity>,
        observations: Repository<Observation>,
        relations: Repository<Relation>,
    ) -> Self {
        Self {
            entities,
            observations,
            relations,
        }
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Entity>, GraphError> {
        Ok(self.entities.find_by_id(id)?)
    }

    /// One page of a project's entities.
    pub fn find_by_project(
        &self,
        project_id: &str,
        options: QueryOptions,
    ) -> Result<PaginatedResult<Entity>, GraphError> {
        Ok(self
            .entities
            .find_many(&Entity::in_project(project_id), options)?)
    }

    /// Every entity in a project, unpaginated.
    pub fn all_in_project(&self, project_id: &str) -> Result<Vec<Entity>, GraphError> {
        Ok(self.entities.find_all(&Entity::in_project(project_id))?)
    }

    /// Entities in a project whose name is in `names`, unpaginated.
    pub fn find_named(
        &self,
        project_id: &str,
        names: Vec<String>,
    ) -> Result<Vec<Entity>, GraphError> {
        Ok(self
            .entities
            .find_all(&Entity::named_any(project_id, names))?)
    }

    /// Paginated search over a project: entities whose name or type matches
    /// the query pattern.
    pub fn search(
        &self,
        project_id: &str,
        query: &str,
        options: QueryOptions,
    ) -> Result<PaginatedResult<Entity>, GraphError> {
        let filter = Entity::matching(project_id, query)?;
        Ok(self.entities.find_many(&filter, options)?)
    }

    /// Exact-name lookup within a project.
    pub fn find_by_name(&self, project_id: &str, name: &str) -> Result<Option<Entity>, GraphError> {
        let result = self
            .entities
            .find_many(&Entity::named(project_id, name), QueryOptions::with_limit(1))?;
        Ok(result.data.into_iter().next())
    }

    /// Create an entity and seed its initial observations. Each seed content
    /// goes through the per-entity dedup check, so duplicate strings in the
    /// input collapse to one stored observation.
    pub fn create(&self, project_id: &str, new: NewEntity) -> Result<Entity, GraphError> {
        let entity = self
            .entities
            .create(Entity::new(project_id, new.name, new.entity_type))?;

        for content in &new.observations {
            if self
                .observations
                .exists(&Observation::with_content(&entity.meta.id, content))?
            {
                continue;
            }
            self.observations
                .create(Observation::new(&entity.meta.id, content))?;
        }

        Ok(entity)
    }

    /// Create several entities under one project, in order.
    pub fn create_many(
        &self,
        project_id: &str,
        entities: Vec<NewEntity>,
    ) -> Result<Vec<Entity>, GraphError> {
        let mut created = Vec::with_capacity(entities.len());
        for new in entities {
            created.push(self.create(project_id, new)?);
        }
        Ok(created)
    }

    pub fn update(&self, id: &str, patch: EntityPatch) -> Result<Option<Entity>, GraphError> {
        Ok(self.entities.update(id, |entity| {
            if let Some(name) = patch.name {
                entity.name = name;
            }
            if let Some(entity_type) = patch.entity_type {
                entity.entity_type = entity_type;
            }
        })?)
    }

    /// Cascade delete: observations, then relations where the entity is
    /// either endpoint, then the entity. Returns whether the entity existed.
    pub fn delete(&self, id: &str) -> Result<bool, GraphError> {
        for observation in self.observations.find_all(&Observation::of_entity(id))? {
            self.observations.delete(&observation.meta.id)?;
        }

        for relation in self.relations.find_all(&Relation::touching(id))? {
            self.relations.delete(&relation.meta.id)?;
        }

        let deleted = self.entities.delete(id)?;
        if deleted {
            tracing::debug!(entity_id = id, "entity deleted with cascade");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::Filter;
    use crate::storage::{FileStorageProvider, StorageProvider};
    use std::sync::Arc;

    struct Fixture {
        _dir: tempfile::TempDir,
        service: EntityService,
        observations: Repository<Observation>,
        relations: Repository<Relation>,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn StorageProvider> = Arc::new(FileStorageProvider::new(dir.path()));
        let observations: Repository<Observation> = Repository::new(Arc::clone(&storage));
        let relations: Repository<Relation> = Repository::new(Arc::clone(&storage));
        let service = EntityService::new(
            Repository::new(storage),
            observations.clone(),
            relations.clone(),
        );
        Fixture {
            _dir: dir,
            service,
            observations,
            relations,
        }
    }

    fn new_entity(name: &str, entity_type: &str, observations: &[&str]) -> NewEntity {
        NewEntity {
            name: name.into(),
            entity_type: entity_type.into(),
            observations: observations.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_create_seeds_observations() {
        let f = fixture();
        let entity = f
            .service
            .create("p1", new_entity("A", "t", &["x", "y"]))
            .unwrap();

        let stored = f
            .observations
            .find_all(&Observation::of_entity(&entity.meta.id))
            .unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn test_create_collapses_duplicate_seed_observations() {
        let f = fixture();
        let entity = f
            .service
            .create("p1", new_entity("A", "t", &["x", "x"]))
            .unwrap();

        let stored = f
            .observations
            .find_all(&Observation::of_entity(&entity.meta.id))
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn test_find_by_name_is_project_scoped() {
        let f = fixture();
        f.service.create("p1", new_entity("A", "t", &[])).unwrap();
        f.service.create("p2", new_entity("A", "t", &[])).unwrap();

        let found = f.service.find_by_name("p1", "A").unwrap().unwrap();
        assert_eq!(found.project_id, "p1");
        assert!(f.service.find_by_name("p3", "A").unwrap().is_none());
    }

    #[test]
    fn test_search_matches_name_or_type() {
        let f = fixture();
        f.service
            .create("p1", new_entity("api-gateway", "service", &[]))
            .unwrap();
        f.service
            .create("p1", new_entity("Alice", "person", &[]))
            .unwrap();
        f.service
            .create("p1", new_entity("db", "service", &[]))
            .unwrap();

        let result = f
            .service
            .search("p1", "service", QueryOptions::default())
            .unwrap();
        assert_eq!(result.data.len(), 2);
        assert_eq!(result.pagination.total, 2);
    }

    #[test]
    fn test_search_rejects_invalid_pattern() {
        let f = fixture();
        let result = f.service.search("p1", "(oops", QueryOptions::default());
        assert!(matches!(result, Err(GraphError::InvalidPattern(_))));
    }

    #[test]
    fn test_delete_cascades_observations_and_relations() {
        let f = fixture();
        let a = f.service.create("p1", new_entity("A", "t", &["x"])).unwrap();
        let b = f.service.create("p1", new_entity("B", "t", &[])).unwrap();

        f.relations
            .create(Relation::new("p1", &a.meta.id, &b.meta.id, "uses"))
            .unwrap();
        f.relations
            .create(Relation::new("p1", &b.meta.id, &a.meta.id, "depends_on"))
            .unwrap();

        assert!(f.service.delete(&a.meta.id).unwrap());

        assert!(f.service.find_by_id(&a.meta.id).unwrap().is_none());
        assert!(f
            .observations
            .find_all(&Observation::of_entity(&a.meta.id))
            .unwrap()
            .is_empty());
        assert!(f.relations.find_all(&Filter::all()).unwrap().is_empty());
        // B survives
        assert!(f.service.find_by_id(&b.meta.id).unwrap().is_some());
    }

    #[test]
    fn test_delete_missing_entity_is_false() {
        let f = fixture();
        assert!(!f.service.delete("missing").unwrap());
    }

    #[test]
    fn test_cascade_covers_more_than_one_page_of_dependents() {
        let f = fixture();
        let entity = f.service.create("p1", new_entity("A", "t", &[])).unwrap();
        for i in 0..60 {
            f.observations
                .create(Observation::new(&entity.meta.id, format!("obs {i}")))
                .unwrap();
        }

        f.service.delete(&entity.meta.id).unwrap();

        assert!(f
            .observations
            .find_all(&Observation::of_entity(&entity.meta.id))
            .unwrap()
            .is_empty());
    }
}
