//! Observation service — deduplicated facts on entities.
//!
//! Adding observation content that an entity already carries is a silent
//! no-op, so re-adding a batch converges to the same stored set and the
//! "added" result names only what was new.

use crate::repo::Repository;

use super::types::{Entity, Observation};
use super::GraphError;

#[derive(Clone)]
pub struct ObservationService {
    observations: Repository<Observation>,
    entities: Repository<Entity>,
}

impl ObservationService {
    pub fn new(observations: Repository<Observation>, entities: Repository<Entity>) -> Self {
        Self {
            observations,
            entities,
        }
    }

    /// Attach observation contents to an entity, skipping any content the
    /// entity already has. Returns only the newly created observations.
    ///
    /// Fails if the entity does not exist — observations never dangle at
    /// creation time.
    pub fn add_observations(
        &self,
        entity_id: &str,
        contents: &[String],
    ) -> Result<Vec<Observation>, GraphError> {
        if self.entities.find_by_id(entity_id)?.is_none() {
            return Err(GraphError::EntityNotFound(entity_id.to_string()));
        }

        let mut added = Vec::new();
        for content in contents {
            if self
                .observations
                .exists(&Observation::with_content(entity_id, content))?
            {
                continue;
            }
            added.push(
                self.observations
                    .create(Observation::new(entity_id, content))?,
            );
        }
        Ok(added)
    }

    /// All observations owned by one entity.
    pub fn find_by_entity(&self, entity_id: &str) -> Result<Vec<Observation>, GraphError> {
        Ok(self.observations.find_all(&Observation::of_entity(entity_id))?)
    }

    /// All observations owned by any of the given entities.
    pub fn find_by_entities(&self, entity_ids: Vec<String>) -> Result<Vec<Observation>, GraphError> {
        if entity_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .observations
            .find_all(&Observation::of_entities(entity_ids))?)
    }

    /// Remove observations by exact content match. Reports `true` only if
    /// every requested content was found and deleted.
    pub fn remove_observations(
        &self,
        entity_id: &str,
        contents: &[String],
    ) -> Result<bool, GraphError> {
        let mut success = true;
        for content in contents {
            let matches = self
                .observations
                .find_all(&Observation::with_content(entity_id, content))?;
            match matches.first() {
                Some(observation) => {
                    if !self.observations.delete(&observation.meta.id)? {
                        success = false;
                    }
                }
                None => success = false,
            }
        }
        Ok(success)
    }

    /// Remove every observation owned by an entity.
    pub fn remove_by_entity(&self, entity_id: &str) -> Result<bool, GraphError> {
        let mut success = true;
        for observation in self.find_by_entity(entity_id)? {
            if !self.observations.delete(&observation.meta.id)? {
                success = false;
            }
        }
        Ok(success)
    }
}
