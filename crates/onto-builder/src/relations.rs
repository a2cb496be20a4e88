//! Typed relations between built instances.

use onto_core::model::{Instance, Relation, RelationType};
use onto_parser::{NodeValue, SourceModel};
use std::collections::BTreeMap;

/// Relation IRI: `property:origin->destination`, with the namespace prefix
/// removed from the origin/destination segment.
pub fn relation_iri(property: &str, origin: &str, destination: &str, prefix: &str) -> String {
    let ends = format!("{}->{}", origin, destination);
    let ends = if prefix.is_empty() {
        ends
    } else {
        ends.replace(prefix, "")
    };
    format!("{}:{}", property, ends)
}

/// Build every relation asserted between built instances.
///
/// Runs sequentially over instances and relation types in IRI order.
/// Values that are literals, blank nodes or individuals without an instance
/// are skipped.
pub fn build_relations(
    source: &dyn SourceModel,
    instances: &BTreeMap<String, Instance>,
    relation_types: &BTreeMap<String, RelationType>,
    prefix: &str,
) -> Vec<Relation> {
    let mut relations: BTreeMap<String, Relation> = BTreeMap::new();
    let mut skipped = 0usize;

    for origin in instances.keys() {
        for property in relation_types.keys() {
            for value in source.property_values(origin, property) {
                let NodeValue::Resource(destination) = value else {
                    tracing::debug!("skipping non-resource value of {} on {}", property, origin);
                    skipped += 1;
                    continue;
                };
                if !instances.contains_key(destination) {
                    tracing::debug!(
                        "skipping {} -> {}: target has no instance",
                        origin,
                        destination
                    );
                    skipped += 1;
                    continue;
                }

                let iri = relation_iri(property, origin, destination, prefix);
                relations.entry(iri.clone()).or_insert_with(|| Relation {
                    iri,
                    relation_type: property.clone(),
                    origin: origin.clone(),
                    destination: destination.clone(),
                });
            }
        }
    }

    tracing::info!(
        "built {} relations ({} assertions skipped)",
        relations.len(),
        skipped
    );
    relations.into_values().collect()
}
