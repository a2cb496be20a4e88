//! Value and relation type registration.
//!
//! Both are plain 1:1 mappings from declared properties; nothing is derived.

use onto_core::model::{RelationType, ValueType};
use onto_parser::{SourceModel, local_name};
use std::collections::BTreeMap;

/// One value type per datatype property, keyed by property IRI.
pub fn register_value_types(source: &dyn SourceModel) -> BTreeMap<String, ValueType> {
    let value_types: BTreeMap<String, ValueType> = source
        .datatype_properties()
        .into_iter()
        .map(|iri| (iri.to_string(), ValueType::new(local_name(iri), iri)))
        .collect();
    tracing::info!("registered {} value types", value_types.len());
    value_types
}

/// One relation type per object property, keyed by property IRI.
pub fn register_relation_types(source: &dyn SourceModel) -> BTreeMap<String, RelationType> {
    let relation_types: BTreeMap<String, RelationType> = source
        .object_properties()
        .into_iter()
        .map(|iri| (iri.to_string(), RelationType::new(local_name(iri), iri)))
        .collect();
    tracing::info!("registered {} relation types", relation_types.len());
    relation_types
}
