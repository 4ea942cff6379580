//! Per-project knowledge-graph memory for AI agents, served over MCP.
//!
//! Engram persists a knowledge graph per project — named entities, free-text
//! observations attached to them, and typed relations between them — as flat
//! file-backed collections: one pretty-printed JSON file per document under
//! `<root>/<collection>/documents/`. There is no database; the store is a
//! directory tree you can read with `cat`.
//!
//! # Architecture
//!
//! Layered, leaf-first:
//!
//! - **Storage** ([`storage`]): byte-level document persistence behind the
//!   [`StorageProvider`](storage::StorageProvider) trait
//! - **Repository** ([`repo`]): typed CRUD, the filter mini-language,
//!   in-memory sorting and pagination
//! - **Graph** ([`graph`]): domain services enforcing cascade deletion,
//!   deduplication, and name resolution, plus the
//!   [`ProjectMemory`](graph::ProjectMemory) facade
//! - **Tools** ([`tools`]): the MCP tool surface over stdio
//!   or Streamable HTTP ([`server`])
//!
//! Writes are whole-file and per-document; multi-step operations (cascades,
//! project bootstrap, cross-project copy) are sequences of idempotent steps,
//! not transactions.

pub mod config;
pub mod graph;
pub mod repo;
pub mod server;
pub mod storage;
pub mod tools;
