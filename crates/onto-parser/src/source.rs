//! The queryable model the ontology builder consumes.

use std::collections::BTreeSet;

/// Object of a property assertion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeValue {
    /// A named resource (IRI).
    Resource(String),
    /// An anonymous resource, by blank node id.
    Blank(String),
    /// A literal, by lexical form.
    Literal(String),
}

impl NodeValue {
    pub fn as_resource(&self) -> Option<&str> {
        match self {
            Self::Resource(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(lexical) => Some(lexical),
            _ => None,
        }
    }
}

/// A parsed ontology document.
///
/// All listings are returned in IRI order so that consumers iterating them
/// produce deterministic output.
pub trait SourceModel: Send + Sync {
    /// Named (IRI) classes declared in the document, built-in vocabularies excluded.
    fn named_classes(&self) -> Vec<&str>;

    /// Direct named superclasses of a class (no transitive closure).
    fn direct_superclasses(&self, class: &str) -> Vec<&str>;

    /// Direct named subclasses of a class.
    fn direct_subclasses(&self, class: &str) -> Vec<&str>;

    /// Named individuals asserted to be members of a class.
    fn individuals_of(&self, class: &str) -> Vec<&str>;

    /// Classes an individual is asserted to belong to.
    fn classes_of(&self, individual: &str) -> Vec<&str>;

    fn datatype_properties(&self) -> Vec<&str>;

    fn object_properties(&self) -> Vec<&str>;

    /// Values of one property on one subject.
    fn property_values(&self, subject: &str, property: &str) -> &[NodeValue];

    /// URI bound to the empty (default) prefix, if declared.
    fn default_namespace(&self) -> Option<&str>;

    /// Every distinct namespace URI declared anywhere in the document.
    fn namespace_uris(&self) -> BTreeSet<&str>;

    /// `rdfs:label` of the `owl:Ontology` header, if present.
    fn ontology_label(&self) -> Option<&str>;
}

/// Local part of an IRI: the text after the last `#`, `/` or `:`.
/// Returns the whole IRI when that part would be empty.
pub fn local_name(iri: &str) -> &str {
    let cut = iri.rfind(['#', '/', ':']).map_or(0, |i| i + 1);
    let name = &iri[cut..];
    if name.is_empty() { iri } else { name }
}
