//! Concurrent instance materialization.
//!
//! Individuals are split into contiguous chunks, one per worker of a pool
//! created for this stage only. Each worker fills its own buffer; buffers
//! are concatenated in chunk order once every worker has finished, so the
//! result does not depend on the worker count.

use crate::types::TypeRegistry;
use onto_core::model::{Instance, PropertyValue, ValueType};
use onto_parser::{NodeValue, SourceModel, local_name};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Errors from the instance stage. The first one in chunk order aborts the build.
#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("value of datatype property {property} on {individual} is not a literal")]
    NonLiteralValue {
        individual: String,
        property: String,
    },
    #[error("failed to start instance workers: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Worker count for a host: all but `reserved` cores, never less than one.
pub fn worker_count(available: usize, reserved: usize) -> usize {
    available.saturating_sub(reserved).max(1)
}

/// [`worker_count`] for the current machine.
pub fn default_worker_count(reserved: usize) -> usize {
    let available = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    worker_count(available, reserved)
}

/// Individuals that belong to at least one registered class, in IRI order.
pub fn qualifying_individuals(source: &dyn SourceModel, types: &TypeRegistry) -> Vec<String> {
    let individuals: BTreeSet<&str> = types
        .classes()
        .flat_map(|class| source.individuals_of(class))
        .collect();
    individuals.into_iter().map(str::to_string).collect()
}

/// Build one instance per individual on `workers` threads.
///
/// The chunk size is `ceil(n / workers)`. An empty input returns without
/// creating a pool.
pub fn build_instances(
    source: &dyn SourceModel,
    individuals: &[String],
    types: &TypeRegistry,
    value_types: &BTreeMap<String, ValueType>,
    workers: usize,
) -> Result<Vec<Instance>, InstanceError> {
    if individuals.is_empty() {
        tracing::info!("no individuals to build");
        return Ok(Vec::new());
    }

    let workers = workers.max(1);
    let chunk_size = individuals.len().div_ceil(workers);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("onto-instances-{}", i))
        .build()?;

    // Wait-all barrier: `install` returns once every chunk is collected.
    let buffers: Vec<Result<Vec<Instance>, InstanceError>> = pool.install(|| {
        individuals
            .par_chunks(chunk_size)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|iri| build_instance(source, iri, types, value_types))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    });

    let mut instances = Vec::with_capacity(individuals.len());
    for buffer in buffers {
        instances.extend(buffer?);
    }

    tracing::info!(
        "built {} instances on {} workers (chunk size {})",
        instances.len(),
        workers,
        chunk_size
    );
    Ok(instances)
}

/// Materialize a single individual.
///
/// The type set holds every registered class the individual is asserted to
/// belong to, plus their registered ancestors. The synthetic root is left out.
pub fn build_instance(
    source: &dyn SourceModel,
    individual: &str,
    types: &TypeRegistry,
    value_types: &BTreeMap<String, ValueType>,
) -> Result<Instance, InstanceError> {
    let mut type_set = BTreeSet::new();
    for class in source.classes_of(individual) {
        if types.contains(class) && class != types.root() {
            type_set.extend(types.ancestors(class));
            type_set.insert(class.to_string());
        }
    }

    let mut values = BTreeSet::new();
    for property in value_types.keys() {
        for value in source.property_values(individual, property) {
            match value {
                NodeValue::Literal(literal) => {
                    values.insert(PropertyValue::new(property.as_str(), literal.as_str()));
                }
                NodeValue::Resource(_) | NodeValue::Blank(_) => {
                    return Err(InstanceError::NonLiteralValue {
                        individual: individual.to_string(),
                        property: property.clone(),
                    });
                }
            }
        }
    }

    Ok(Instance::new(
        local_name(individual),
        individual,
        type_set,
        values,
    ))
}
