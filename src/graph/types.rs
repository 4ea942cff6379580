//! Knowledge-graph document types.
//!
//! Four collections make up a project's graph: the [`Project`] root, named
//! [`Entity`] nodes, free-text [`Observation`]s attached to entities, and
//! directed [`Relation`] edges between entities. Wire field names keep the
//! original camelCase document format (`projectId`, `entityType`, ...), so a
//! stored graph is portable across implementations.
//!
//! Each type carries its filter constructors; which fields a collection can
//! be queried by is part of the collection's contract, not the caller's
//! guesswork.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::repo::{Document, DocumentMeta, Filter};

// ── Project ───────────────────────────────────────────────────────────────────

/// Root of a memory namespace. Every other document references a project by
/// its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(flatten)]
    pub meta: DocumentMeta,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Project {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            meta: DocumentMeta::default(),
            name: name.into(),
            description,
        }
    }

    /// Projects whose name matches `pattern`.
    pub fn name_matches(pattern: &str) -> Result<Filter, regex::Error> {
        Filter::all().regex("name", pattern)
    }
}

impl Document for Project {
    const COLLECTION: &'static str = "projects";

    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut DocumentMeta {
        &mut self.meta
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "name" => Some(Cow::Borrowed(&self.name)),
            "description" => self.description.as_deref().map(Cow::Borrowed),
            _ => self.meta.field(name),
        }
    }
}

/// Partial update for a project.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

// ── Entity ────────────────────────────────────────────────────────────────────

/// A named, typed graph node scoped to one project.
///
/// Names are unique within a project at the service layer; the repository
/// itself does not enforce the constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    #[serde(flatten)]
    pub meta: DocumentMeta,
    #[serde(rename = "projectId")]
    pub project_id: String,
    pub name: String,
    #[serde(rename = "entityType")]
    pub entity_type: String,
}

impl Entity {
    pub fn new(
        project_id: impl Into<String>,
        name: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self {
            meta: DocumentMeta::default(),
            project_id: project_id.into(),
            name: name.into(),
            entity_type: entity_type.into(),
        }
    }

    /// Every entity in a project.
    pub fn in_project(project_id: &str) -> Filter {
        Filter::all().eq("projectId", project_id)
    }

    /// The entity with an exact name in a project.
    pub fn named(project_id: &str, name: &str) -> Filter {
        Filter::all().eq("projectId", project_id).eq("name", name)
    }

    /// Entities in a project whose name is in `names`.
    pub fn named_any(project_id: &str, names: Vec<String>) -> Filter {
        Filter::all().eq("projectId", project_id).is_in("name", names)
    }

    /// Entities in a project whose name or type matches `query`.
    pub fn matching(project_id: &str, query: &str) -> Result<Filter, regex::Error> {
        Ok(Filter::all().eq("projectId", project_id).any_of(vec![
            Filter::all().regex("name", query)?,
            Filter::all().regex("entityType", query)?,
        ]))
    }
}

impl Document for Entity {
    const COLLECTION: &'static str = "entities";

    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut DocumentMeta {
        &mut self.meta
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "projectId" => Some(Cow::Borrowed(&self.project_id)),
            "name" => Some(Cow::Borrowed(&self.name)),
            "entityType" => Some(Cow::Borrowed(&self.entity_type)),
            _ => self.meta.field(name),
        }
    }
}

/// A new entity to create, with optional seed observations.
#[derive(Debug, Clone)]
pub struct NewEntity {
    pub name: String,
    pub entity_type: String,
    pub observations: Vec<String>,
}

/// Partial update for an entity.
#[derive(Debug, Clone, Default)]
pub struct EntityPatch {
    pub name: Option<String>,
    pub entity_type: Option<String>,
}

// ── Observation ───────────────────────────────────────────────────────────────

/// A free-text fact attached to one entity. Content is deduplicated per
/// entity at the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    #[serde(flatten)]
    pub meta: DocumentMeta,
    #[serde(rename = "entityId")]
    pub entity_id: String,
    pub content: String,
}

impl Observation {
    pub fn new(entity_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            meta: DocumentMeta::default(),
            entity_id: entity_id.into(),
            content: content.into(),
        }
    }

    /// Every observation owned by one entity.
    pub fn of_entity(entity_id: &str) -> Filter {
        Filter::all().eq("entityId", entity_id)
    }

    /// Every observation owned by any of `entity_ids`.
    pub fn of_entities(entity_ids: Vec<String>) -> Filter {
        Filter::all().is_in("entityId", entity_ids)
    }

    /// The observation on an entity with exact content.
    pub fn with_content(entity_id: &str, content: &str) -> Filter {
        Filter::all().eq("entityId", entity_id).eq("content", content)
    }

    /// Observations on an entity whose content matches `pattern`.
    pub fn content_matches(entity_id: &str, pattern: &str) -> Result<Filter, regex::Error> {
        Filter::all().eq("entityId", entity_id).regex("content", pattern)
    }
}

impl Document for Observation {
    const COLLECTION: &'static str = "observations";

    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut DocumentMeta {
        &mut self.meta
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "entityId" => Some(Cow::Borrowed(&self.entity_id)),
            "content" => Some(Cow::Borrowed(&self.content)),
            _ => self.meta.field(name),
        }
    }
}

// ── Relation ──────────────────────────────────────────────────────────────────

/// A typed, directed edge between two entities in the same project.
/// Deduplicated on the (from, to, relationType) triple at the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relation {
    #[serde(flatten)]
    pub meta: DocumentMeta,
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "fromEntityId")]
    pub from_entity_id: String,
    #[serde(rename = "toEntityId")]
    pub to_entity_id: String,
    #[serde(rename = "relationType")]
    pub relation_type: String,
}

impl Relation {
    pub fn new(
        project_id: impl Into<String>,
        from_entity_id: impl Into<String>,
        to_entity_id: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            meta: DocumentMeta::default(),
            project_id: project_id.into(),
            from_entity_id: from_entity_id.into(),
            to_entity_id: to_entity_id.into(),
            relation_type: relation_type.into(),
        }
    }

    /// Every relation in a project.
    pub fn in_project(project_id: &str) -> Filter {
        Filter::all().eq("projectId", project_id)
    }

    /// Relations where the entity is either endpoint.
    pub fn touching(entity_id: &str) -> Filter {
        Filter::all().any_of(vec![
            Filter::all().eq("fromEntityId", entity_id),
            Filter::all().eq("toEntityId", entity_id),
        ])
    }

    /// Relations where either endpoint is one of `entity_ids`.
    pub fn touching_any(entity_ids: Vec<String>) -> Filter {
        Filter::all().any_of(vec![
            Filter::all().is_in("fromEntityId", entity_ids.clone()),
            Filter::all().is_in("toEntityId", entity_ids),
        ])
    }

    /// The exact (from, to, type) triple within a project.
    pub fn triple(
        project_id: &str,
        from_entity_id: &str,
        to_entity_id: &str,
        relation_type: &str,
    ) -> Filter {
        Filter::all()
            .eq("projectId", project_id)
            .eq("fromEntityId", from_entity_id)
            .eq("toEntityId", to_entity_id)
            .eq("relationType", relation_type)
    }
}

impl Document for Relation {
    const COLLECTION: &'static str = "relations";

    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut DocumentMeta {
        &mut self.meta
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "projectId" => Some(Cow::Borrowed(&self.project_id)),
            "fromEntityId" => Some(Cow::Borrowed(&self.from_entity_id)),
            "toEntityId" => Some(Cow::Borrowed(&self.to_entity_id)),
            "relationType" => Some(Cow::Borrowed(&self.relation_type)),
            _ => self.meta.field(name),
        }
    }
}

/// A new relation, addressed by entity names within a project.
#[derive(Debug, Clone)]
pub struct NewRelation {
    pub from_entity_name: String,
    pub to_entity_name: String,
    pub relation_type: String,
}
