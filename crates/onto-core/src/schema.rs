//! JSON encoding of saved ontologies, with version and reference checks on load.

use crate::model::{Ontology, SCHEMA_VERSION};
use anyhow::{Context, Result};

/// Validate an ontology's schema version.
pub fn validate_version(ontology: &Ontology) -> Result<()> {
    if ontology.version != SCHEMA_VERSION {
        anyhow::bail!(
            "ontology schema version mismatch: expected {}, found {}",
            SCHEMA_VERSION,
            ontology.version
        );
    }
    Ok(())
}

/// Check that every IRI stored as a reference resolves inside the ontology:
/// instance types and values, relation endpoints and types, and the
/// back-references kept on instances and relation types.
pub fn validate_references(ontology: &Ontology) -> Result<()> {
    let mut dangling = Vec::new();

    for instance in ontology.instances.values() {
        for t in &instance.types {
            if !ontology.instance_types.contains_key(t) {
                dangling.push(format!("instance {} has unknown type {}", instance.iri, t));
            }
        }
        for value in &instance.values {
            if !ontology.value_types.contains_key(&value.value_type) {
                dangling.push(format!(
                    "instance {} has a value of unknown type {}",
                    instance.iri, value.value_type
                ));
            }
        }
        for r in instance.outgoing.iter().chain(&instance.incoming) {
            if !ontology.relations.contains_key(r) {
                dangling.push(format!("instance {} lists unknown relation {}", instance.iri, r));
            }
        }
    }

    for relation in ontology.relations.values() {
        if !ontology.relation_types.contains_key(&relation.relation_type) {
            dangling.push(format!(
                "relation {} has unknown type {}",
                relation.iri, relation.relation_type
            ));
        }
        for end in [&relation.origin, &relation.destination] {
            if !ontology.instances.contains_key(end) {
                dangling.push(format!("relation {} points at unknown instance {}", relation.iri, end));
            }
        }
    }

    for rt in ontology.relation_types.values() {
        for r in &rt.relations {
            if !ontology.relations.contains_key(r) {
                dangling.push(format!("relation type {} lists unknown relation {}", rt.iri, r));
            }
        }
    }

    if let Some(first) = dangling.first() {
        anyhow::bail!(
            "ontology has {} dangling reference(s), first: {}",
            dangling.len(),
            first
        );
    }
    Ok(())
}

/// Serialize an ontology to JSON.
pub fn to_json(ontology: &Ontology, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(ontology)
    } else {
        serde_json::to_string(ontology)
    };
    json.context("failed to serialize ontology to JSON")
}

/// Deserialize an ontology from a JSON string and check it before use.
pub fn from_json(json: &str) -> Result<Ontology> {
    let ontology: Ontology =
        serde_json::from_str(json).context("failed to deserialize ontology from JSON")?;
    validate_version(&ontology)?;
    validate_references(&ontology)?;
    Ok(ontology)
}
