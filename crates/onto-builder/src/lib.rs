//! Ontology interpretation pipeline.
//!
//! Turns a parsed ontology document into an [`onto_core::model::Ontology`]:
//! namespace resolution, instance types and their hierarchy, value and
//! relation types, instances (built in parallel) and typed relations.
//! Each stage is a free function over explicit maps; [`pipeline`] runs them
//! in their fixed order.

pub mod instances;
pub mod pipeline;
pub mod prefix;
pub mod properties;
pub mod relations;
pub mod types;

pub use pipeline::{BuildError, BuildOptions, BuildOutput, BuildState, OntologyBuilder};
pub use prefix::{FirstCandidate, MISSING_PREFIX_WARNING, UriSelector};
