//! CLI binary for ontograph: build and inspect ontology domain graphs.

mod select;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use onto_builder::{BuildOptions, OntologyBuilder};
use onto_core::config::OntoConfig;
use onto_core::model::Ontology;
use select::PromptSelector;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ontograph", about = "OWL ontology to domain graph builder")]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a domain graph from an RDF/XML ontology file
    Build {
        /// Path to the .owl / .rdf document
        file: PathBuf,

        /// Namespace URI to use when the document declares no default one
        #[arg(long)]
        prefix: Option<String>,

        /// Fixed number of instance workers (overrides config)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Print the result without writing .ontograph/ontology.json
        #[arg(long)]
        no_save: bool,
    },

    /// Show statistics of the saved ontology
    Info,

    /// Print the saved type hierarchy from the root
    Tree,
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;

    match cli.command {
        Commands::Build {
            file,
            prefix,
            workers,
            no_save,
        } => cmd_build(&project_root, &file, prefix, workers, no_save),
        Commands::Info => cmd_info(&project_root),
        Commands::Tree => cmd_tree(&project_root),
    }
}

fn cmd_build(
    project_root: &Path,
    file: &Path,
    prefix: Option<String>,
    workers: Option<usize>,
    no_save: bool,
) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let config = OntoConfig::load(project_root)?;

    let mut options = BuildOptions::from(&config.build);
    if let Some(w) = workers {
        options.workers = Some(w.max(1));
    }
    let selector = PromptSelector::new(prefix.or_else(|| config.prefix.preferred.clone()));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!(
        "Building {} on {} workers...",
        file.display(),
        options.worker_count()
    ));

    let result = OntologyBuilder::new(&selector)
        .with_options(options)
        .build_file(file);
    spinner.finish_and_clear();
    let output = result.with_context(|| format!("failed to build {}", file.display()))?;

    for warning in &output.warnings {
        eprintln!("warning: {}", warning);
    }

    let ontology = &output.ontology;
    print_stats(ontology);
    println!("Built at: {}", output.built_at.format("%Y-%m-%d %H:%M:%S UTC"));

    let issues = ontology.validate_hierarchy();
    for issue in &issues {
        eprintln!("WARN: {}", issue);
    }

    if no_save {
        eprintln!("Not saved (--no-save).");
    } else {
        onto_core::storage::save(project_root, ontology, &config.storage)?;
        eprintln!(
            "Saved to {}",
            onto_core::storage::onto_file(project_root).display()
        );
    }
    Ok(())
}

fn cmd_info(project_root: &Path) -> Result<()> {
    if !onto_core::storage::onto_exists(project_root) {
        eprintln!("No ontology found. Run `ontograph build <file>` first.");
        return Ok(());
    }
    let ontology = onto_core::storage::load(project_root)?;
    println!("Ontology v{}", ontology.version);
    print_stats(&ontology);
    Ok(())
}

fn cmd_tree(project_root: &Path) -> Result<()> {
    if !onto_core::storage::onto_exists(project_root) {
        anyhow::bail!("No ontology found. Run `ontograph build <file>` first.");
    }
    let ontology = onto_core::storage::load(project_root)?;
    print!("{}", render_tree(&ontology));
    Ok(())
}

fn print_stats(ontology: &Ontology) {
    let stats = ontology.stats();
    println!("Name: {}", ontology.name);
    println!("Prefix: {}", ontology.prefix);
    println!();
    println!("Instance types: {}", stats.instance_types);
    println!("Value types: {}", stats.value_types);
    println!("Relation types: {}", stats.relation_types);
    println!("Instances: {}", stats.instances);
    println!("Relations: {}", stats.relations);
    println!("Hierarchy depth: {}", stats.hierarchy_depth);
}

/// Indented type hierarchy with direct instance counts. Types with several
/// supertypes appear under each of them. A subtype already on the current
/// path is not expanded again, which keeps supertype cycles finite.
fn render_tree(ontology: &Ontology) -> String {
    let mut out = String::new();
    if let Some(root) = ontology.root_type() {
        let mut path = BTreeSet::new();
        render_type(ontology, &root.iri, 0, &mut path, &mut out);
    }
    out
}

fn render_type<'a>(
    ontology: &'a Ontology,
    iri: &'a str,
    depth: usize,
    path: &mut BTreeSet<&'a str>,
    out: &mut String,
) {
    let Some(t) = ontology.instance_type(iri) else {
        return;
    };
    let direct = ontology
        .instances
        .values()
        .filter(|i| i.types.contains(iri))
        .filter(|i| !t.subtypes.iter().any(|sub| i.types.contains(sub)))
        .count();
    let _ = write!(out, "{}{}", "  ".repeat(depth), t.name);
    if direct > 0 {
        let _ = write!(out, " ({} instances)", direct);
    }
    out.push('\n');

    path.insert(iri);
    for child in ontology.children_of(iri) {
        if path.contains(child.iri.as_str()) {
            let _ = writeln!(out, "{}{} (cycle)", "  ".repeat(depth + 1), child.name);
            continue;
        }
        render_type(ontology, &child.iri, depth + 1, path, out);
    }
    path.remove(iri);
}

#[cfg(test)]
mod tests {
    use super::*;
    use onto_core::model::{Instance, InstanceType};

    fn sample() -> Ontology {
        let mut o = Ontology::new("http://ex.org/z#", "zoo");
        let root = o.root.clone();
        let mut root_type = InstanceType::new("owl:Thing", root.clone());
        root_type.subtypes.insert("http://ex.org/z#Animal".to_string());
        let mut animal = InstanceType::new("Animal", "http://ex.org/z#Animal");
        animal.supertypes.insert(root.clone());
        animal.subtypes.insert("http://ex.org/z#Cat".to_string());
        let mut cat = InstanceType::new("Cat", "http://ex.org/z#Cat");
        cat.supertypes.insert("http://ex.org/z#Animal".to_string());
        for t in [root_type, animal, cat] {
            o.instance_types.insert(t.iri.clone(), t);
        }
        let tibbles = Instance::new(
            "tibbles",
            "http://ex.org/z#tibbles",
            BTreeSet::from([
                "http://ex.org/z#Animal".to_string(),
                "http://ex.org/z#Cat".to_string(),
            ]),
            BTreeSet::new(),
        );
        o.instances.insert(tibbles.iri.clone(), tibbles);
        o
    }

    #[test]
    fn test_render_tree_counts_direct_instances() {
        let tree = render_tree(&sample());
        assert_eq!(tree, "owl:Thing\n  Animal\n    Cat (1 instances)\n");
    }

    #[test]
    fn test_render_tree_empty_without_root() {
        let o = Ontology::new("http://ex.org/z#", "empty");
        assert!(render_tree(&o).is_empty());
    }

    #[test]
    fn test_render_tree_stops_at_supertype_cycles() {
        let mut o = Ontology::new("http://ex.org/c#", "cyclic");
        let root = o.root.clone();
        let a = "http://ex.org/c#A".to_string();
        let b = "http://ex.org/c#B".to_string();
        let d = "http://ex.org/c#D".to_string();

        let mut root_type = InstanceType::new("owl:Thing", root.clone());
        root_type.subtypes.insert(d.clone());
        let mut dt = InstanceType::new("D", d.clone());
        dt.supertypes.insert(root);
        dt.subtypes.insert(a.clone());
        let mut at = InstanceType::new("A", a.clone());
        at.supertypes.extend([b.clone(), d]);
        at.subtypes.insert(b.clone());
        let mut bt = InstanceType::new("B", b);
        bt.supertypes.insert(a.clone());
        bt.subtypes.insert(a);
        for t in [root_type, dt, at, bt] {
            o.instance_types.insert(t.iri.clone(), t);
        }

        let tree = render_tree(&o);
        assert_eq!(tree, "owl:Thing\n  D\n    A\n      B\n        A (cycle)\n");
    }
}
