//! Integration tests: build ontologies from the RDF/XML fixtures.

use onto_builder::instances::InstanceError;
use onto_builder::{
    BuildError, BuildOptions, BuildState, FirstCandidate, MISSING_PREFIX_WARNING, OntologyBuilder,
    UriSelector,
};
use onto_core::model::{Ontology, PropertyValue};
use onto_parser::{RdfXmlSource, SourceError, SourceModel};
use std::collections::BTreeSet;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests/fixtures")
        .join(name)
}

fn build(name: &str) -> onto_builder::BuildOutput {
    OntologyBuilder::new(&FirstCandidate)
        .build_file(&fixture(name))
        .unwrap()
}

fn hash_of(ontology: &Ontology) -> u64 {
    let mut hasher = DefaultHasher::new();
    ontology.hash(&mut hasher);
    hasher.finish()
}

struct CountingSelector {
    calls: AtomicUsize,
    answer: &'static str,
}

impl UriSelector for CountingSelector {
    fn select_uri(&self, candidates: &BTreeSet<String>) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(candidates.contains(self.answer));
        self.answer.to_string()
    }
}

const SCENARIO: &str = "http://example.org/scenario#";

#[test]
fn test_scenario_types_and_hierarchy() {
    let out = build("scenario.owl");
    let o = &out.ontology;
    assert!(out.warnings.is_empty());
    assert_eq!(o.prefix, SCENARIO);
    assert_eq!(o.name, "Scenario");

    let names: BTreeSet<&str> = o.instance_types.values().map(|t| t.name.as_str()).collect();
    assert_eq!(names, BTreeSet::from(["A", "B", "owl:Thing"]));

    let a = o.instance_type_named("A").unwrap();
    let b = o.instance_type_named("B").unwrap();
    let root = o.root_type().unwrap();
    assert_eq!(b.supertypes, BTreeSet::from([a.iri.clone()]));
    assert_eq!(a.supertypes, BTreeSet::from([root.iri.clone()]));
    assert!(root.supertypes.is_empty());
    assert_eq!(root.iri, "http://example.org/scenario##owl:Thing");
    assert!(o.validate_hierarchy().is_empty());
}

#[test]
fn test_scenario_instances_and_relation() {
    let o = build("scenario.owl").ontology;
    assert_eq!(o.instances.len(), 2, "stray individual must be excluded");

    let i1 = o.instance_named("i1").unwrap();
    let i2 = o.instance_named("i2").unwrap();
    assert!(i1.types.contains(&format!("{}B", SCENARIO)));
    assert!(i1.types.contains(&format!("{}A", SCENARIO)));
    assert_eq!(
        i1.values,
        BTreeSet::from([PropertyValue::new(format!("{}age", SCENARIO), "5")])
    );
    assert!(i2.values.is_empty());

    assert_eq!(o.relations.len(), 1);
    let lives_in = format!("{}livesIn", SCENARIO);
    let relations = o.relations_of_type(&lives_in);
    assert_eq!(relations.len(), 1);
    let r = relations[0];
    assert_eq!(r.iri, "http://example.org/scenario#livesIn:i1->i2");
    assert_eq!(r.origin, i1.iri);
    assert_eq!(r.destination, i2.iri);
    assert!(i1.outgoing.contains(&r.iri));
    assert!(i2.incoming.contains(&r.iri));
}

#[test]
fn test_completeness() {
    let path = fixture("schema_only.owl");
    let source = RdfXmlSource::open(&path).unwrap();
    let o = build("schema_only.owl").ontology;

    assert_eq!(o.instance_types.len(), source.named_classes().len() + 1);
    assert_eq!(o.value_types.len(), source.datatype_properties().len());
    assert_eq!(o.relation_types.len(), source.object_properties().len());
}

#[test]
fn test_hierarchy_totality_with_diamond() {
    let o = build("schema_only.owl").ontology;
    assert!(o.validate_hierarchy().is_empty());

    let pickup = o.instance_type_named("Pickup").unwrap();
    assert_eq!(pickup.supertypes.len(), 2);
    let engine = o.instance_type_named("Engine").unwrap();
    assert_eq!(engine.supertypes, BTreeSet::from([o.root.clone()]));
    for t in o.instance_types.values() {
        if t.iri == o.root {
            assert!(t.supertypes.is_empty());
        } else {
            assert!(!t.supertypes.is_empty(), "{} has no supertype", t.name);
        }
    }
    assert_eq!(o.stats().hierarchy_depth, 3);
}

#[test]
fn test_empty_individuals() {
    let out = build("schema_only.owl");
    assert!(out.ontology.instances.is_empty());
    assert!(out.ontology.relations.is_empty());
    assert!(out.warnings.is_empty());
}

#[test]
fn test_determinism() {
    let first = build("scenario.owl").ontology;
    let second = build("scenario.owl").ontology;
    assert_eq!(first, second);
    assert_eq!(hash_of(&first), hash_of(&second));
}

#[test]
fn test_missing_prefix_selects_once_and_warns_once() {
    let selector = CountingSelector {
        calls: AtomicUsize::new(0),
        answer: "http://example.org/pets#",
    };
    let out = OntologyBuilder::new(&selector)
        .build_file(&fixture("no_prefix.owl"))
        .unwrap();

    assert_eq!(selector.calls.load(Ordering::SeqCst), 1);
    assert_eq!(out.warnings, vec![MISSING_PREFIX_WARNING.to_string()]);

    let o = &out.ontology;
    assert_eq!(o.prefix, "http://example.org/pets#");
    assert_eq!(o.name, "no_prefix");
    assert!(o.relation("http://example.org/pets#friendOf:rex->tom").is_some());

    let tom = o.instance_named("tom").unwrap();
    let names: Vec<&str> = tom.values_of("http://example.org/pets#name").collect();
    assert_eq!(names, vec!["Thomas", "Tom"]);
    let rex = o.instance_named("rex").unwrap();
    assert_eq!(rex.types.len(), 2);
}

/// A generated ontology with enough individuals to fill several chunks.
fn generated_document(individuals: usize) -> String {
    let mut doc = String::from(
        r#"<rdf:RDF xmlns="http://example.org/gen#"
    xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
    xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
    xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Class rdf:about="http://example.org/gen#Node"/>
  <owl:Class rdf:about="http://example.org/gen#Leaf">
    <rdfs:subClassOf rdf:resource="http://example.org/gen#Node"/>
  </owl:Class>
  <owl:DatatypeProperty rdf:about="http://example.org/gen#weight"/>
  <owl:ObjectProperty rdf:about="http://example.org/gen#next"/>
"#,
    );
    for i in 0..individuals {
        let class = if i % 3 == 0 { "Leaf" } else { "Node" };
        doc.push_str(&format!(
            "  <{class} rdf:about=\"http://example.org/gen#n{i}\">\n    <weight>{w}</weight>\n    <next rdf:resource=\"http://example.org/gen#n{n}\"/>\n  </{class}>\n",
            class = class,
            i = i,
            w = i % 7,
            n = (i + 1) % individuals,
        ));
    }
    doc.push_str("</rdf:RDF>\n");
    doc
}

#[test]
fn test_parallel_and_sequential_builds_match() {
    let source = RdfXmlSource::parse_str(&generated_document(250), None).unwrap();

    let sequential = OntologyBuilder::new(&FirstCandidate)
        .with_options(BuildOptions {
            workers: Some(1),
            reserved_cores: 0,
        })
        .build_source(&source, "gen")
        .unwrap()
        .ontology;
    let parallel = OntologyBuilder::new(&FirstCandidate)
        .with_options(BuildOptions {
            workers: Some(8),
            reserved_cores: 0,
        })
        .build_source(&source, "gen")
        .unwrap()
        .ontology;

    assert_eq!(sequential.instances.len(), 250);
    assert_eq!(sequential.instances, parallel.instances);
    assert_eq!(sequential, parallel);
    assert_eq!(parallel.relations.len(), 250);
}

#[test]
fn test_more_workers_than_individuals() {
    let source = RdfXmlSource::parse_str(&generated_document(3), None).unwrap();
    let out = OntologyBuilder::new(&FirstCandidate)
        .with_options(BuildOptions {
            workers: Some(16),
            reserved_cores: 0,
        })
        .build_source(&source, "gen")
        .unwrap();
    assert_eq!(out.ontology.instances.len(), 3);
}

#[test]
fn test_relation_iris_are_injective() {
    let source = RdfXmlSource::parse_str(&generated_document(40), None).unwrap();
    let o = OntologyBuilder::new(&FirstCandidate)
        .build_source(&source, "gen")
        .unwrap()
        .ontology;
    let triples: BTreeSet<(&str, &str, &str)> = o
        .relations
        .values()
        .map(|r| (r.relation_type.as_str(), r.origin.as_str(), r.destination.as_str()))
        .collect();
    assert_eq!(triples.len(), o.relations.len());
}

#[test]
fn test_missing_file_is_not_found() {
    let mut builder = OntologyBuilder::new(&FirstCandidate);
    let err = builder
        .build_file(&fixture("does_not_exist.owl"))
        .unwrap_err();
    assert!(matches!(err, BuildError::Source(SourceError::NotFound(_))));
    assert_eq!(builder.state(), BuildState::Failed);
}

#[test]
fn test_broken_file_is_invalid_format() {
    let err = OntologyBuilder::new(&FirstCandidate)
        .build_file(&fixture("broken.owl"))
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::Source(SourceError::InvalidFormat { .. })
    ));
}

#[test]
fn test_builder_is_single_use() {
    let mut builder = OntologyBuilder::new(&FirstCandidate);
    assert_eq!(builder.state(), BuildState::Unstarted);
    builder.build_file(&fixture("scenario.owl")).unwrap();
    assert_eq!(builder.state(), BuildState::Complete);

    let err = builder.build_file(&fixture("scenario.owl")).unwrap_err();
    assert!(matches!(err, BuildError::AlreadyRun(BuildState::Complete)));
}

#[test]
fn test_resource_in_datatype_property_fails_build() {
    let doc = r#"<rdf:RDF xmlns="http://example.org/bad#"
        xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
        xmlns:owl="http://www.w3.org/2002/07/owl#">
      <owl:Class rdf:about="http://example.org/bad#Thing"/>
      <owl:DatatypeProperty rdf:about="http://example.org/bad#size"/>
      <Thing rdf:about="http://example.org/bad#x">
        <size rdf:resource="http://example.org/bad#big"/>
      </Thing>
    </rdf:RDF>"#;
    let source = RdfXmlSource::parse_str(doc, None).unwrap();
    let mut builder = OntologyBuilder::new(&FirstCandidate);
    let err = builder.build_source(&source, "bad").unwrap_err();
    assert!(matches!(
        err,
        BuildError::Instance(InstanceError::NonLiteralValue { .. })
    ));
    assert_eq!(builder.state(), BuildState::Failed);
}

fn build_document(doc: &str) -> Ontology {
    let source = RdfXmlSource::parse_str(doc, None).unwrap();
    OntologyBuilder::new(&FirstCandidate)
        .build_source(&source, "inline")
        .unwrap()
        .ontology
}

#[test]
fn test_cyclic_and_self_referencing_hierarchy_stays_connected() {
    let o = build_document(
        r##"<rdf:RDF xmlns="http://example.org/loop#"
            xml:base="http://example.org/loop"
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
            xmlns:owl="http://www.w3.org/2002/07/owl#">
          <owl:Class rdf:about="#A"><rdfs:subClassOf rdf:resource="#B"/></owl:Class>
          <owl:Class rdf:about="#B"><rdfs:subClassOf rdf:resource="#A"/></owl:Class>
          <owl:Class rdf:about="#Self"><rdfs:subClassOf rdf:resource="#Self"/></owl:Class>
          <B rdf:about="#b1"/>
        </rdf:RDF>"##,
    );

    assert!(o.validate_hierarchy().is_empty(), "{:?}", o.validate_hierarchy());
    let root = o.root_type().unwrap();
    assert_eq!(
        root.subtypes,
        BTreeSet::from([
            "http://example.org/loop#A".to_string(),
            "http://example.org/loop#Self".to_string(),
        ])
    );
    let selfish = o.instance_type_named("Self").unwrap();
    assert_eq!(selfish.supertypes, BTreeSet::from([o.root.clone()]));

    let b1 = o.instance_named("b1").unwrap();
    assert_eq!(
        b1.types,
        BTreeSet::from([
            "http://example.org/loop#A".to_string(),
            "http://example.org/loop#B".to_string(),
        ])
    );
}

#[test]
fn test_builtin_thing_superclass_maps_to_root() {
    let o = build_document(
        r##"<rdf:RDF xmlns="http://example.org/top#"
            xml:base="http://example.org/top"
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
            xmlns:owl="http://www.w3.org/2002/07/owl#">
          <owl:Class rdf:about="http://www.w3.org/2002/07/owl#Thing"/>
          <owl:Class rdf:about="#Agent">
            <rdfs:subClassOf rdf:resource="http://www.w3.org/2002/07/owl#Thing"/>
          </owl:Class>
        </rdf:RDF>"##,
    );

    assert!(o.validate_hierarchy().is_empty());
    assert_eq!(o.instance_types.len(), 2);
    let agent = o.instance_type_named("Agent").unwrap();
    assert_eq!(agent.supertypes, BTreeSet::from([o.root.clone()]));
    assert_eq!(o.root, "http://example.org/top##owl:Thing");
}
