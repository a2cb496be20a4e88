//! RDF/XML documents as an indexed [`SourceModel`].

use crate::error::SourceError;
use crate::namespaces::Namespaces;
use crate::source::{NodeValue, SourceModel};
use crate::vocab;
use oxrdf::{Subject, Term, Triple};
use oxrdfxml::RdfXmlParser;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// An RDF/XML ontology document, parsed and indexed by subject.
#[derive(Debug, Clone, Default)]
pub struct RdfXmlSource {
    namespaces: Namespaces,
    /// subject → predicate → distinct objects, in document order.
    statements: BTreeMap<String, BTreeMap<String, Vec<NodeValue>>>,
    classes: BTreeSet<String>,
    superclasses: BTreeMap<String, BTreeSet<String>>,
    subclasses: BTreeMap<String, BTreeSet<String>>,
    /// class → asserted members.
    members: BTreeMap<String, BTreeSet<String>>,
    /// individual → asserted classes.
    memberships: BTreeMap<String, BTreeSet<String>>,
    datatype_properties: BTreeSet<String>,
    object_properties: BTreeSet<String>,
    label: Option<String>,
    triple_count: usize,
}

impl RdfXmlSource {
    /// Read and parse an RDF/XML file. Relative IRIs resolve against the
    /// file's `file://` URL unless the document sets `xml:base`.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        if !path.is_file() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let origin = path.display().to_string();
        let document =
            String::from_utf8(bytes).map_err(|e| SourceError::invalid(origin.as_str(), e))?;

        let base = std::path::absolute(path)
            .ok()
            .map(|abs| format!("file://{}", abs.to_string_lossy().replace('\\', "/")));
        Self::parse(&document, base.as_deref(), &origin)
    }

    /// Parse an in-memory RDF/XML document.
    pub fn parse_str(document: &str, base_iri: Option<&str>) -> Result<Self, SourceError> {
        Self::parse(document, base_iri, "<memory>")
    }

    fn parse(document: &str, base_iri: Option<&str>, origin: &str) -> Result<Self, SourceError> {
        let mut parser = RdfXmlParser::new();
        if let Some(base) = base_iri {
            parser = parser
                .with_base_iri(base)
                .map_err(|e| SourceError::invalid(origin, e))?;
        }

        let mut source = Self {
            namespaces: Namespaces::scan(document),
            ..Self::default()
        };
        for triple in parser.for_reader(document.as_bytes()) {
            let triple = triple.map_err(|e| SourceError::invalid(origin, e))?;
            source.ingest(&triple);
        }
        if source.triple_count == 0 && !document.contains("RDF") {
            return Err(SourceError::invalid(origin, "no RDF content found"));
        }
        source.index();

        tracing::debug!(
            "parsed {}: {} triples, {} classes, {} datatype / {} object properties",
            origin,
            source.triple_count,
            source.classes.len(),
            source.datatype_properties.len(),
            source.object_properties.len()
        );
        Ok(source)
    }

    fn ingest(&mut self, triple: &Triple) {
        self.triple_count += 1;
        // Anonymous subjects (restrictions, unions) carry no named entities.
        let Subject::NamedNode(subject) = &triple.subject else {
            return;
        };
        let value = if let Term::NamedNode(n) = &triple.object {
            NodeValue::Resource(n.as_str().to_string())
        } else if let Term::Literal(l) = &triple.object {
            NodeValue::Literal(l.value().to_string())
        } else if let Term::BlankNode(b) = &triple.object {
            NodeValue::Blank(b.as_str().to_string())
        } else {
            return;
        };

        let objects = self
            .statements
            .entry(subject.as_str().to_string())
            .or_default()
            .entry(triple.predicate.as_str().to_string())
            .or_default();
        if !objects.contains(&value) {
            objects.push(value);
        }
    }

    /// Derive class, membership and property indexes from the statements.
    fn index(&mut self) {
        let mut ontology_headers = Vec::new();

        for (subject, predicates) in &self.statements {
            let types = predicates
                .get(vocab::RDF_TYPE)
                .into_iter()
                .flatten()
                .filter_map(NodeValue::as_resource);
            for ty in types {
                match ty {
                    vocab::OWL_CLASS | vocab::RDFS_CLASS => {
                        if !vocab::is_builtin(subject) {
                            self.classes.insert(subject.clone());
                        }
                    }
                    vocab::OWL_DATATYPE_PROPERTY => {
                        self.datatype_properties.insert(subject.clone());
                    }
                    vocab::OWL_OBJECT_PROPERTY => {
                        self.object_properties.insert(subject.clone());
                    }
                    vocab::OWL_ONTOLOGY => ontology_headers.push(subject.clone()),
                    other if !vocab::is_builtin(other) => {
                        self.members
                            .entry(other.to_string())
                            .or_default()
                            .insert(subject.clone());
                        self.memberships
                            .entry(subject.clone())
                            .or_default()
                            .insert(other.to_string());
                    }
                    _ => {}
                }
            }

            let supers = predicates
                .get(vocab::RDFS_SUBCLASS_OF)
                .into_iter()
                .flatten()
                .filter_map(NodeValue::as_resource);
            for sup in supers {
                self.superclasses
                    .entry(subject.clone())
                    .or_default()
                    .insert(sup.to_string());
                self.subclasses
                    .entry(sup.to_string())
                    .or_default()
                    .insert(subject.clone());
            }
        }

        self.label = ontology_headers.iter().find_map(|header| {
            self.property_values(header, vocab::RDFS_LABEL)
                .iter()
                .find_map(NodeValue::as_literal)
                .map(str::to_string)
        });
    }

    /// Number of triples read from the document.
    pub fn triple_count(&self) -> usize {
        self.triple_count
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }
}

fn listed<'a>(index: &'a BTreeMap<String, BTreeSet<String>>, key: &str) -> Vec<&'a str> {
    index
        .get(key)
        .map(|set| set.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

impl SourceModel for RdfXmlSource {
    fn named_classes(&self) -> Vec<&str> {
        self.classes.iter().map(String::as_str).collect()
    }

    fn direct_superclasses(&self, class: &str) -> Vec<&str> {
        listed(&self.superclasses, class)
    }

    fn direct_subclasses(&self, class: &str) -> Vec<&str> {
        listed(&self.subclasses, class)
    }

    fn individuals_of(&self, class: &str) -> Vec<&str> {
        listed(&self.members, class)
    }

    fn classes_of(&self, individual: &str) -> Vec<&str> {
        listed(&self.memberships, individual)
    }

    fn datatype_properties(&self) -> Vec<&str> {
        self.datatype_properties.iter().map(String::as_str).collect()
    }

    fn object_properties(&self) -> Vec<&str> {
        self.object_properties.iter().map(String::as_str).collect()
    }

    fn property_values(&self, subject: &str, property: &str) -> &[NodeValue] {
        self.statements
            .get(subject)
            .and_then(|p| p.get(property))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn default_namespace(&self) -> Option<&str> {
        self.namespaces.default_namespace()
    }

    fn namespace_uris(&self) -> BTreeSet<&str> {
        self.namespaces.uris.iter().map(String::as_str).collect()
    }

    fn ontology_label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
