//! Namespace declarations of an XML document.
//!
//! RDF/XML triple parsers consume `xmlns` attributes without reporting them,
//! so declarations are collected from the start tags in a separate pass.
//! Text, comments and CDATA are never read as declarations.

use quick_xml::events::Event;
use quick_xml::name::PrefixDeclaration;
use quick_xml::reader::Reader;
use std::collections::{BTreeMap, BTreeSet};

/// Prefix bindings and the full set of declared namespace URIs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces {
    /// Prefix → URI. The default namespace is stored under `""`.
    /// The first declaration of a prefix wins.
    pub prefixes: BTreeMap<String, String>,
    /// Every distinct non-empty URI declared anywhere, including rebindings.
    pub uris: BTreeSet<String>,
}

impl Namespaces {
    /// Collect every `xmlns` / `xmlns:prefix` attribute on the document's
    /// elements. Scanning stops at the first XML error; the triple parser
    /// reports malformed documents.
    pub fn scan(document: &str) -> Self {
        let mut ns = Self::default();
        let mut reader = Reader::from_str(document);

        loop {
            match reader.read_event() {
                Ok(Event::Start(tag) | Event::Empty(tag)) => {
                    let mut attributes = tag.attributes();
                    attributes.with_checks(false);
                    for attr in attributes.flatten() {
                        let Some(binding) = attr.key.as_namespace_binding() else {
                            continue;
                        };
                        let prefix = match binding {
                            PrefixDeclaration::Default => "",
                            PrefixDeclaration::Named(name) => match std::str::from_utf8(name) {
                                Ok(name) => name,
                                Err(_) => continue,
                            },
                        };
                        let Ok(uri) = attr.decode_and_unescape_value(reader.decoder()) else {
                            continue;
                        };
                        ns.declare(prefix, &uri);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(
                        "namespace scan stopped at byte {}: {}",
                        reader.buffer_position(),
                        e
                    );
                    break;
                }
            }
        }
        ns
    }

    fn declare(&mut self, prefix: &str, uri: &str) {
        // xmlns="" undeclares the default namespace.
        if uri.is_empty() {
            return;
        }
        self.prefixes
            .entry(prefix.to_string())
            .or_insert_with(|| uri.to_string());
        self.uris.insert(uri.to_string());
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.prefixes.get("").map(String::as_str)
    }
}
