//! Domain graph produced by interpreting a single ontology document.
//!
//! All cross-references (super/sub-types, instance types, relation ends) are
//! IRI keys into the maps owned by [`Ontology`]. Ordered maps and sets keep two
//! builds of the same source structurally equal and hash-equal.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Schema version written into every ontology.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Display name of the synthetic universal root type.
pub const ROOT_TYPE_NAME: &str = "owl:Thing";

/// IRI of the synthetic root type for a resolved namespace prefix.
pub fn root_type_iri(prefix: &str) -> String {
    format!("{}#{}", prefix, ROOT_TYPE_NAME)
}

/// The complete domain graph of one ontology document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ontology {
    pub version: String,
    /// Resolved default namespace prefix.
    pub prefix: String,
    pub name: String,
    /// IRI of the universal root type.
    pub root: String,
    pub instance_types: BTreeMap<String, InstanceType>,
    pub value_types: BTreeMap<String, ValueType>,
    pub relation_types: BTreeMap<String, RelationType>,
    pub instances: BTreeMap<String, Instance>,
    pub relations: BTreeMap<String, Relation>,
}

/// Domain representation of an ontology class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceType {
    pub name: String,
    pub iri: String,
    pub supertypes: BTreeSet<String>,
    pub subtypes: BTreeSet<String>,
}

impl InstanceType {
    pub fn new(name: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iri: iri.into(),
            supertypes: BTreeSet::new(),
            subtypes: BTreeSet::new(),
        }
    }
}

/// Domain representation of a datatype property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueType {
    pub name: String,
    pub iri: String,
}

impl ValueType {
    pub fn new(name: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iri: iri.into(),
        }
    }
}

/// Domain representation of an object property, with the relations of that type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationType {
    pub name: String,
    pub iri: String,
    pub relations: BTreeSet<String>,
}

impl RelationType {
    pub fn new(name: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iri: iri.into(),
            relations: BTreeSet::new(),
        }
    }
}

/// A literal value carried by an instance for one value type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyValue {
    pub value_type: String,
    pub literal: String,
}

impl PropertyValue {
    pub fn new(value_type: impl Into<String>, literal: impl Into<String>) -> Self {
        Self {
            value_type: value_type.into(),
            literal: literal.into(),
        }
    }
}

/// Domain representation of a concrete individual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    pub iri: String,
    pub types: BTreeSet<String>,
    pub values: BTreeSet<PropertyValue>,
    pub outgoing: BTreeSet<String>,
    pub incoming: BTreeSet<String>,
}

impl Instance {
    pub fn new(
        name: impl Into<String>,
        iri: impl Into<String>,
        types: BTreeSet<String>,
        values: BTreeSet<PropertyValue>,
    ) -> Self {
        Self {
            name: name.into(),
            iri: iri.into(),
            types,
            values,
            outgoing: BTreeSet::new(),
            incoming: BTreeSet::new(),
        }
    }

    /// Literals recorded for one value type, in order.
    pub fn values_of<'a>(&'a self, value_type: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.values
            .iter()
            .filter(move |v| v.value_type == value_type)
            .map(|v| v.literal.as_str())
    }
}

/// A typed, directed edge between two instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub iri: String,
    pub relation_type: String,
    pub origin: String,
    pub destination: String,
}

/// Entity counts for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyStats {
    pub instance_types: usize,
    pub value_types: usize,
    pub relation_types: usize,
    pub instances: usize,
    pub relations: usize,
    /// Length of the longest subtype chain below the root.
    pub hierarchy_depth: usize,
}

impl Ontology {
    /// Create an empty ontology shell for a resolved prefix.
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            version: SCHEMA_VERSION.to_string(),
            root: root_type_iri(&prefix),
            prefix,
            name: name.into(),
            instance_types: BTreeMap::new(),
            value_types: BTreeMap::new(),
            relation_types: BTreeMap::new(),
            instances: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }

    pub fn instance_type(&self, iri: &str) -> Option<&InstanceType> {
        self.instance_types.get(iri)
    }

    pub fn root_type(&self) -> Option<&InstanceType> {
        self.instance_types.get(&self.root)
    }

    pub fn instance(&self, iri: &str) -> Option<&Instance> {
        self.instances.get(iri)
    }

    pub fn relation(&self, iri: &str) -> Option<&Relation> {
        self.relations.get(iri)
    }

    /// Find an instance type by display name. Names are not unique, so the
    /// first match in IRI order wins.
    pub fn instance_type_named(&self, name: &str) -> Option<&InstanceType> {
        self.instance_types.values().find(|t| t.name == name)
    }

    pub fn instance_named(&self, name: &str) -> Option<&Instance> {
        self.instances.values().find(|i| i.name == name)
    }

    /// Register a relation and its back-references on the relation type and
    /// both instances. Unknown endpoints are left untouched.
    pub fn insert_relation(&mut self, relation: Relation) {
        if let Some(rt) = self.relation_types.get_mut(&relation.relation_type) {
            rt.relations.insert(relation.iri.clone());
        }
        if let Some(origin) = self.instances.get_mut(&relation.origin) {
            origin.outgoing.insert(relation.iri.clone());
        }
        if let Some(dest) = self.instances.get_mut(&relation.destination) {
            dest.incoming.insert(relation.iri.clone());
        }
        self.relations.insert(relation.iri.clone(), relation);
    }

    pub fn relations_of_type(&self, relation_type: &str) -> Vec<&Relation> {
        self.relation_types
            .get(relation_type)
            .map(|rt| {
                rt.relations
                    .iter()
                    .filter_map(|iri| self.relations.get(iri))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn outgoing(&self, instance: &str) -> Vec<&Relation> {
        self.instances
            .get(instance)
            .map(|i| {
                i.outgoing
                    .iter()
                    .filter_map(|iri| self.relations.get(iri))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn incoming(&self, instance: &str) -> Vec<&Relation> {
        self.instances
            .get(instance)
            .map(|i| {
                i.incoming
                    .iter()
                    .filter_map(|iri| self.relations.get(iri))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Direct subtypes of a type, in IRI order.
    pub fn children_of(&self, iri: &str) -> Vec<&InstanceType> {
        self.instance_types
            .get(iri)
            .map(|t| {
                t.subtypes
                    .iter()
                    .filter_map(|s| self.instance_types.get(s))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn stats(&self) -> OntologyStats {
        OntologyStats {
            instance_types: self.instance_types.len(),
            value_types: self.value_types.len(),
            relation_types: self.relation_types.len(),
            instances: self.instances.len(),
            relations: self.relations.len(),
            hierarchy_depth: self.hierarchy_depth(),
        }
    }

    /// Longest path (in edges) from the root down the subtype links.
    fn hierarchy_depth(&self) -> usize {
        let mut depth: BTreeMap<&str, usize> = BTreeMap::new();
        let mut queue = VecDeque::new();
        if self.instance_types.contains_key(&self.root) {
            depth.insert(self.root.as_str(), 0);
            queue.push_back(self.root.as_str());
        }
        // Longest-path relaxation; bounded by the type count since the graph is a DAG.
        let limit = self.instance_types.len();
        while let Some(iri) = queue.pop_front() {
            let d = depth[iri];
            if d >= limit {
                continue;
            }
            for sub in self.children_of(iri) {
                let entry = depth.entry(sub.iri.as_str()).or_insert(0);
                if *entry < d + 1 {
                    *entry = d + 1;
                    queue.push_back(sub.iri.as_str());
                }
            }
        }
        depth.values().copied().max().unwrap_or(0)
    }

    /// Check the hierarchy invariants: a single root without supertypes,
    /// every other type with at least one supertype, symmetric edges, and
    /// every type reachable from the root. Returns one message per violation.
    pub fn validate_hierarchy(&self) -> Vec<String> {
        let mut issues = Vec::new();

        match self.root_type() {
            None => issues.push(format!("root type {} is missing", self.root)),
            Some(root) if !root.supertypes.is_empty() => {
                issues.push(format!("root type {} has supertypes", root.iri));
            }
            Some(_) => {}
        }

        for t in self.instance_types.values() {
            if t.iri != self.root && t.supertypes.is_empty() {
                issues.push(format!("type {} has no supertype", t.iri));
            }
            for sup in &t.supertypes {
                match self.instance_types.get(sup) {
                    Some(s) if s.subtypes.contains(&t.iri) => {}
                    Some(_) => issues.push(format!(
                        "edge {} -> {} has no matching subtype link",
                        t.iri, sup
                    )),
                    None => issues.push(format!("type {} references unknown supertype {}", t.iri, sup)),
                }
            }
            for sub in &t.subtypes {
                match self.instance_types.get(sub) {
                    Some(s) if s.supertypes.contains(&t.iri) => {}
                    Some(_) => issues.push(format!(
                        "edge {} -> {} has no matching supertype link",
                        t.iri, sub
                    )),
                    None => issues.push(format!("type {} references unknown subtype {}", t.iri, sub)),
                }
            }
        }

        if self.root_type().is_some() {
            let mut seen: BTreeSet<&str> = BTreeSet::new();
            let mut queue = VecDeque::from([self.root.as_str()]);
            while let Some(iri) = queue.pop_front() {
                if !seen.insert(iri) {
                    continue;
                }
                for sub in self.children_of(iri) {
                    queue.push_back(sub.iri.as_str());
                }
            }
            for iri in self.instance_types.keys() {
                if !seen.contains(iri.as_str()) {
                    issues.push(format!("type {} is not reachable from the root", iri));
                }
            }
        }

        issues
    }
}
