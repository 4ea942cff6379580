#![allow(dead_code)]

use std::sync::Arc;

use engram::graph::types::{NewEntity, NewRelation};
use engram::graph::ProjectMemory;
use engram::storage::FileStorageProvider;

/// A facade wired over a throwaway storage root. The tempdir is dropped
/// (and deleted) together with the fixture.
pub struct TestApp {
    pub app: ProjectMemory,
    pub root: tempfile::TempDir,
}

/// Build a fresh application over a temporary storage root.
pub fn test_app() -> TestApp {
    let root = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorageProvider::new(root.path()));
    let app = ProjectMemory::with_storage(storage);
    TestApp { app, root }
}

/// Shorthand for a NewEntity with seed observations.
pub fn entity(name: &str, entity_type: &str, observations: &[&str]) -> NewEntity {
    NewEntity {
        name: name.to_string(),
        entity_type: entity_type.to_string(),
        observations: observations.iter().map(|s| s.to_string()).collect(),
    }
}

/// Shorthand for a NewRelation between named entities.
pub fn relation(from: &str, to: &str, relation_type: &str) -> NewRelation {
    NewRelation {
        from_entity_name: from.to_string(),
        to_entity_name: to.to_string(),
        relation_type: relation_type.to_string(),
    }
}
