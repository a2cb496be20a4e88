//! Source model for ontograph: reads an RDF/XML ontology document into an
//! indexed triple model.
//!
//! The [`source::SourceModel`] trait is the only surface the builder sees:
//! named classes, direct super/subclasses, class membership, property values
//! and namespace declarations. [`rdfxml::RdfXmlSource`] implements it on top
//! of `oxrdfxml`.

pub mod error;
pub mod namespaces;
pub mod rdfxml;
pub mod source;
pub mod vocab;

pub use error::SourceError;
pub use rdfxml::RdfXmlSource;
pub use source::{NodeValue, SourceModel, local_name};
