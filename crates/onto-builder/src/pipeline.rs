//! Build orchestration: the fixed stage order from source document to
//! completed [`Ontology`].
//!
//! read source → resolve prefix → ontology shell → instance types → value
//! types → relation types → hierarchy → instances (parallel) → relations.

use crate::instances::{self, InstanceError};
use crate::prefix::{PrefixError, PrefixResolver, UriSelector};
use crate::properties;
use crate::relations;
use crate::types;
use chrono::{DateTime, Utc};
use onto_core::config::BuildConfig;
use onto_core::model::Ontology;
use onto_parser::{RdfXmlSource, SourceError, SourceModel};
use std::path::Path;

/// Progress of a single build. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildState {
    Unstarted,
    TypesRegistered,
    HierarchyDerived,
    InstancesBuilt,
    Complete,
    Failed,
}

/// Errors that abort a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Prefix(#[from] PrefixError),
    #[error(transparent)]
    Instance(#[from] InstanceError),
    #[error("build already ran (state: {0:?})")]
    AlreadyRun(BuildState),
}

/// Worker sizing for the instance stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Fixed worker count; `None` derives it from the host.
    pub workers: Option<usize>,
    /// Cores left free when deriving the worker count.
    pub reserved_cores: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::from(&BuildConfig::default())
    }
}

impl From<&BuildConfig> for BuildOptions {
    fn from(config: &BuildConfig) -> Self {
        Self {
            workers: config.fixed_workers(),
            reserved_cores: config.reserved_cores,
        }
    }
}

impl BuildOptions {
    pub fn worker_count(&self) -> usize {
        self.workers
            .map_or_else(|| instances::default_worker_count(self.reserved_cores), |w| w.max(1))
    }
}

/// Result of a completed build.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub ontology: Ontology,
    /// Recoverable problems, in the order they were met.
    pub warnings: Vec<String>,
    pub built_at: DateTime<Utc>,
}

/// Single-use driver for one build.
pub struct OntologyBuilder<'a> {
    selector: &'a dyn UriSelector,
    options: BuildOptions,
    state: BuildState,
}

impl<'a> OntologyBuilder<'a> {
    pub fn new(selector: &'a dyn UriSelector) -> Self {
        Self {
            selector,
            options: BuildOptions::default(),
            state: BuildState::Unstarted,
        }
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Read an RDF/XML document and build its ontology.
    ///
    /// A missing or unparseable file fails before any type is created.
    pub fn build_file(&mut self, path: &Path) -> Result<BuildOutput, BuildError> {
        self.start()?;
        let source = match RdfXmlSource::open(path) {
            Ok(source) => source,
            Err(e) => {
                self.state = BuildState::Failed;
                return Err(e.into());
            }
        };
        tracing::info!(
            "read {} ({} triples)",
            path.display(),
            source.triple_count()
        );

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("ontology")
            .to_string();
        self.finish(&source, &name)
    }

    /// Build from an already-loaded source model. `name` is used as the
    /// display name when the document carries no ontology label.
    pub fn build_source(
        &mut self,
        source: &dyn SourceModel,
        name: &str,
    ) -> Result<BuildOutput, BuildError> {
        self.start()?;
        self.finish(source, name)
    }

    fn start(&self) -> Result<(), BuildError> {
        if self.state == BuildState::Unstarted {
            Ok(())
        } else {
            Err(BuildError::AlreadyRun(self.state))
        }
    }

    fn finish(&mut self, source: &dyn SourceModel, name: &str) -> Result<BuildOutput, BuildError> {
        let result = self.run_stages(source, name);
        if result.is_err() {
            self.state = BuildState::Failed;
        }
        result
    }

    fn advance(&mut self, next: BuildState) {
        debug_assert!(next > self.state, "{:?} -> {:?}", self.state, next);
        tracing::debug!("build state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn run_stages(
        &mut self,
        source: &dyn SourceModel,
        name: &str,
    ) -> Result<BuildOutput, BuildError> {
        let mut warnings = Vec::new();
        let mut resolver = PrefixResolver::new(self.selector);
        let prefix = resolver.resolve(source, &mut warnings)?.to_string();

        let display_name = source.ontology_label().unwrap_or(name);
        let mut ontology = Ontology::new(prefix.as_str(), display_name);

        let mut type_registry = types::register_types(source, &prefix);
        let value_types = properties::register_value_types(source);
        let relation_types = properties::register_relation_types(source);
        self.advance(BuildState::TypesRegistered);

        types::derive_hierarchy(source, &mut type_registry);
        self.advance(BuildState::HierarchyDerived);

        let individuals = instances::qualifying_individuals(source, &type_registry);
        let built = instances::build_instances(
            source,
            &individuals,
            &type_registry,
            &value_types,
            self.options.worker_count(),
        )?;
        self.advance(BuildState::InstancesBuilt);

        ontology.instance_types = type_registry.into_types();
        ontology.value_types = value_types;
        ontology.relation_types = relation_types;
        ontology.instances = built
            .into_iter()
            .map(|instance| (instance.iri.clone(), instance))
            .collect();

        let relations = relations::build_relations(
            source,
            &ontology.instances,
            &ontology.relation_types,
            &prefix,
        );
        for relation in relations {
            ontology.insert_relation(relation);
        }
        self.advance(BuildState::Complete);

        let stats = ontology.stats();
        tracing::info!(
            "built ontology {}: {} types, {} instances, {} relations",
            ontology.name,
            stats.instance_types,
            stats.instances,
            stats.relations
        );

        Ok(BuildOutput {
            ontology,
            warnings,
            built_at: Utc::now(),
        })
    }
}
