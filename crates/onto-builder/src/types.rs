//! Instance type registration and hierarchy derivation.

use onto_core::model::{InstanceType, ROOT_TYPE_NAME, root_type_iri};
use onto_parser::{SourceModel, local_name};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Instance types keyed by class IRI, including the synthetic root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    root: String,
    types: BTreeMap<String, InstanceType>,
}

impl TypeRegistry {
    /// A registry holding only the universal root for `prefix`.
    pub fn with_root(prefix: &str) -> Self {
        let root = root_type_iri(prefix);
        let mut types = BTreeMap::new();
        types.insert(root.clone(), InstanceType::new(ROOT_TYPE_NAME, root.clone()));
        Self { root, types }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn get(&self, iri: &str) -> Option<&InstanceType> {
        self.types.get(iri)
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.types.contains_key(iri)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered source classes, root excluded, in IRI order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.types
            .keys()
            .filter(|iri| **iri != self.root)
            .map(String::as_str)
    }

    pub fn into_types(self) -> BTreeMap<String, InstanceType> {
        self.types
    }

    fn insert(&mut self, name: &str, iri: &str) {
        self.types
            .entry(iri.to_string())
            .or_insert_with(|| InstanceType::new(name, iri));
    }

    /// Add a bidirectional super/sub edge between two registered types.
    fn link(&mut self, sub: &str, sup: &str) {
        if let Some(t) = self.types.get_mut(sub) {
            t.supertypes.insert(sup.to_string());
        }
        if let Some(s) = self.types.get_mut(sup) {
            s.subtypes.insert(sub.to_string());
        }
    }

    /// Every registered type reachable upwards from `iri`, excluding `iri`
    /// itself and the root.
    pub fn ancestors(&self, iri: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([iri]);
        while let Some(current) = queue.pop_front() {
            let Some(t) = self.types.get(current) else {
                continue;
            };
            for sup in &t.supertypes {
                if *sup != self.root && sup != iri && found.insert(sup.clone()) {
                    queue.push_back(sup);
                }
            }
        }
        found
    }

    /// Every type reachable downwards from the root, root included.
    pub fn reachable_from_root(&self) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([self.root.as_str()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.to_string()) {
                continue;
            }
            if let Some(t) = self.types.get(current) {
                queue.extend(t.subtypes.iter().map(String::as_str));
            }
        }
        seen
    }
}

/// Create one instance type per named class plus the universal root.
pub fn register_types(source: &dyn SourceModel, prefix: &str) -> TypeRegistry {
    let mut registry = TypeRegistry::with_root(prefix);
    for class in source.named_classes() {
        registry.insert(local_name(class), class);
    }
    tracing::info!("registered {} instance types", registry.len());
    registry
}

/// Link every type to its direct registered superclasses, then attach the
/// types left without a supertype under the root.
///
/// Classes that only subclass each other (`A ⊑ B`, `B ⊑ A`) keep their
/// supertypes but stay disconnected from the root. One member of each such
/// cycle is attached under the root as well, so every type is reachable.
pub fn derive_hierarchy(source: &dyn SourceModel, registry: &mut TypeRegistry) {
    let classes: Vec<String> = registry.classes().map(str::to_string).collect();

    let mut edges = 0usize;
    for class in &classes {
        for sup in source.direct_superclasses(class) {
            if sup != class.as_str() && registry.contains(sup) {
                registry.link(class, sup);
                edges += 1;
            }
        }
    }

    let root = registry.root.clone();
    let orphans: Vec<String> = classes
        .into_iter()
        .filter(|c| registry.get(c).is_some_and(|t| t.supertypes.is_empty()))
        .collect();
    for orphan in &orphans {
        registry.link(orphan, &root);
    }

    let cycles = attach_cycles(registry);

    tracing::info!(
        "derived hierarchy: {} subclass edges, {} types under root, {} cycles attached",
        edges,
        orphans.len(),
        cycles
    );
}

/// Attach one member of every supertype cycle that the root cannot reach.
///
/// Picks, in IRI order, an unreachable type whose every ancestor is also one
/// of its descendants (a type at the top of its cycle), links it under the
/// root and repeats until every type is reachable.
fn attach_cycles(registry: &mut TypeRegistry) -> usize {
    let mut attached = 0usize;
    loop {
        let reachable = registry.reachable_from_root();
        let top = registry
            .classes()
            .filter(|c| !reachable.contains(*c))
            .find(|c| {
                registry
                    .ancestors(c)
                    .iter()
                    .all(|a| registry.ancestors(a).contains(*c))
            })
            .map(str::to_string);
        let Some(top) = top else {
            break;
        };
        tracing::debug!("attaching supertype cycle at {} under the root", top);
        let root = registry.root.clone();
        registry.link(&top, &root);
        attached += 1;
    }
    attached
}
