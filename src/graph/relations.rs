//! Relation service — name-addressed, deduplicated graph edges.
//!
//! Callers address endpoints by entity name within a project; the service
//! resolves names to ids and refuses to create an edge with a missing
//! endpoint. Storing the same (from, to, type) triple twice is idempotent
//! and hands back the existing relation.

use serde::Serialize;

use crate::repo::{QueryOptions, Repository};

use super::types::{Entity, NewRelation, Relation};
use super::GraphError;

/// Outcome of a create_relation call.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRelationResult {
    #[serde(flatten)]
    pub relation: Relation,
    /// `true` if the exact (from, to, type) triple already existed.
    pub deduplicated: bool,
}

#[derive(Clone)]
pub struct RelationService {
    relations: Repository<Relation>,
    entities: Repository<Entity>,
}

impl RelationService {
    pub fn new(relations: Repository<Relation>, entities: Repository<Entity>) -> Self {
        Self {
            relations,
            entities,
        }
    }

    /// Create a relation between two named entities in a project.
    ///
    /// Both names must resolve to existing entities; nothing is auto-created.
    /// An identical triple already present in the project is returned as-is.
    pub fn create_relation(
        &self,
        project_id: &str,
        new: NewRelation,
    ) -> Result<CreateRelationResult, GraphError> {
        let from = self.resolve(project_id, &new.from_entity_name)?;
        let to = self.resolve(project_id, &new.to_entity_name)?;

        let (Some(from), Some(to)) = (from, to) else {
            return Err(GraphError::RelationEndpoints {
                from: new.from_entity_name,
                to: new.to_entity_name,
            });
        };

        let existing = self.relations.find_all(&Relation::triple(
            project_id,
            &from.meta.id,
            &to.meta.id,
            &new.relation_type,
        ))?;
        if let Some(relation) = existing.into_iter().next() {
            return Ok(CreateRelationResult {
                relation,
                deduplicated: true,
            });
        }

        let relation = self.relations.create(Relation::new(
            project_id,
            from.meta.id,
            to.meta.id,
            new.relation_type,
        ))?;
        Ok(CreateRelationResult {
            relation,
            deduplicated: false,
        })
    }

    /// Every relation in a project.
    pub fn find_by_project(&self, project_id: &str) -> Result<Vec<Relation>, GraphError> {
        Ok(self.relations.find_all(&Relation::in_project(project_id))?)
    }

    /// Every relation where the entity is either endpoint.
    pub fn find_by_entity(&self, entity_id: &str) -> Result<Vec<Relation>, GraphError> {
        Ok(self.relations.find_all(&Relation::touching(entity_id))?)
    }

    /// Every relation touching any of the given entities.
    pub fn find_by_entities(&self, entity_ids: Vec<String>) -> Result<Vec<Relation>, GraphError> {
        if entity_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .relations
            .find_all(&Relation::touching_any(entity_ids))?)
    }

    /// Remove one relation by id. Returns whether it existed.
    pub fn delete_relation(&self, id: &str) -> Result<bool, GraphError> {
        Ok(self.relations.delete(id)?)
    }

    /// Remove every relation where the entity is an endpoint.
    pub fn delete_by_entity(&self, entity_id: &str) -> Result<bool, GraphError> {
        let mut success = true;
        for relation in self.find_by_entity(entity_id)? {
            if !self.relations.delete(&relation.meta.id)? {
                success = false;
            }
        }
        Ok(success)
    }

    fn resolve(&self, project_id: &str, name: &str) -> Result<Option<Entity>, GraphError> {
        let result = self
            .entities
            .find_many(&Entity::named(project_id, name), QueryOptions::with_limit(1))?;
        Ok(result.data.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorageProvider, StorageProvider};
    use std::sync::Arc;

    fn service() -> (tempfile::TempDir, RelationService, Repository<Entity>) {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn StorageProvider> = Arc::new(FileStorageProvider::new(dir.path()));
        let entities: Repository<Entity> = Repository::new(Arc::clone(&storage));
        let service = RelationService::new(Repository::new(storage), entities.clone());
        (dir, service, entities)
    }

    fn relation(from: &str, to: &str, relation_type: &str) -> NewRelation {
        NewRelation {
            from_entity_name: from.into(),
            to_entity_name: to.into(),
            relation_type: relation_type.into(),
        }
    }

    #[test]
    fn test_create_relation_resolves_names() {
        let (_dir, service, entities) = service();
        let a = entities.create(Entity::new("p1", "A", "t")).unwrap();
        let b = entities.create(Entity::new("p1", "B", "t")).unwrap();

        let result = service
            .create_relation("p1", relation("A", "B", "uses"))
            .unwrap();
        assert!(!result.deduplicated);
        assert_eq!(result.relation.from_entity_id, a.meta.id);
        assert_eq!(result.relation.to_entity_id, b.meta.id);
        assert_eq!(result.relation.relation_type, "uses");
        assert_eq!(result.relation.project_id, "p1");
    }

    #[test]
    fn test_create_relation_missing_endpoint_fails() {
        let (_dir, service, entities) = service();
        entities.create(Entity::new("p1", "A", "t")).unwrap();

        let result = service.create_relation("p1", relation("A", "Ghost", "uses"));
        assert!(matches!(
            result,
            Err(GraphError::RelationEndpoints { .. })
        ));
    }

    #[test]
    fn test_create_relation_is_project_scoped() {
        let (_dir, service, entities) = service();
        entities.create(Entity::new("p1", "A", "t")).unwrap();
        entities.create(Entity::new("p2", "B", "t")).unwrap();

        // B exists, but in another project
        let result = service.create_relation("p1", relation("A", "B", "uses"));
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_triple_is_idempotent() {
        let (_dir, service, entities) = service();
        entities.create(Entity::new("p1", "A", "t")).unwrap();
        entities.create(Entity::new("p1", "B", "t")).unwrap();

        let first = service
            .create_relation("p1", relation("A", "B", "uses"))
            .unwrap();
        assert!(!first.deduplicated);

        let second = service
            .create_relation("p1", relation("A", "B", "uses"))
            .unwrap();
        assert!(second.deduplicated);

        assert_eq!(first.relation.meta.id, second.relation.meta.id);
        assert_eq!(service.find_by_project("p1").unwrap().len(), 1);
    }

    #[test]
    fn test_distinct_type_is_a_new_relation() {
        let (_dir, service, entities) = service();
        entities.create(Entity::new("p1", "A", "t")).unwrap();
        entities.create(Entity::new("p1", "B", "t")).unwrap();

        service
            .create_relation("p1", relation("A", "B", "uses"))
            .unwrap();
        service
            .create_relation("p1", relation("A", "B", "tests"))
            .unwrap();

        assert_eq!(service.find_by_project("p1").unwrap().len(), 2);
    }

    #[test]
    fn test_delete_by_entity_covers_both_directions() {
        let (_dir, service, entities) = service();
        let a = entities.create(Entity::new("p1", "A", "t")).unwrap();
        entities.create(Entity::new("p1", "B", "t")).unwrap();
        entities.create(Entity::new("p1", "C", "t")).unwrap();

        service
            .create_relation("p1", relation("A", "B", "uses"))
            .unwrap();
        service
            .create_relation("p1", relation("C", "A", "uses"))
            .unwrap();
        service
            .create_relation("p1", relation("B", "C", "uses"))
            .unwrap();

        assert!(service.delete_by_entity(&a.meta.id).unwrap());

        let left = service.find_by_project("p1").unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].relation_type, "uses");
        assert!(service.find_by_entity(&a.meta.id).unwrap().is_empty());
    }

    #[test]
    fn test_find_by_entities_empty_input() {
        let (_dir, service, _entities) = service();
        assert!(service.find_by_entities(Vec::new()).unwrap().is_empty());
    }
}
