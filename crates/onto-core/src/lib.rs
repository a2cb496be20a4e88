//! Core types and storage for ontograph.
//!
//! Provides the domain graph ([`model::Ontology`]) built from an ontology
//! document: instance types with their hierarchy, value and relation types,
//! instances and typed relations, plus configuration and JSON persistence.

pub mod config;
pub mod model;
pub mod schema;
pub mod storage;
