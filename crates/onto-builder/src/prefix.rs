//! Default namespace resolution.
//!
//! Documents usually bind their own namespace to the empty prefix. When they
//! don't, the choice is handed to a [`UriSelector`] (typically the user) and a
//! warning is recorded for the build report.

use onto_parser::SourceModel;
use std::collections::BTreeSet;

/// Warning recorded when a document has no default namespace.
pub const MISSING_PREFIX_WARNING: &str = "no default URI prefix declared";

/// Chooses the default namespace among the URIs a document declares.
pub trait UriSelector: Send + Sync {
    /// Return exactly one of `candidates`. Blocks until an answer is available.
    fn select_uri(&self, candidates: &BTreeSet<String>) -> String;
}

/// Non-interactive selector: the first candidate in lexical order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl UriSelector for FirstCandidate {
    fn select_uri(&self, candidates: &BTreeSet<String>) -> String {
        candidates.first().cloned().unwrap_or_default()
    }
}

/// Errors from prefix resolution.
#[derive(Debug, thiserror::Error)]
pub enum PrefixError {
    #[error("selected URI {selected:?} is not a namespace declared by the document")]
    InvalidSelection { selected: String },
}

/// Resolves the namespace prefix once per build and memoizes the answer.
pub struct PrefixResolver<'a> {
    selector: &'a dyn UriSelector,
    resolved: Option<String>,
}

impl<'a> PrefixResolver<'a> {
    pub fn new(selector: &'a dyn UriSelector) -> Self {
        Self {
            selector,
            resolved: None,
        }
    }

    /// The memoized prefix, if [`resolve`](Self::resolve) already ran.
    pub fn resolved(&self) -> Option<&str> {
        self.resolved.as_deref()
    }

    /// Resolve the document's default namespace.
    ///
    /// Uses the declared default prefix when present. Otherwise records
    /// [`MISSING_PREFIX_WARNING`] and asks the selector to pick one of the
    /// declared namespace URIs. With no declarations at all the selector is
    /// not consulted and the prefix is empty. Later calls return the cached
    /// value without warning or selecting again.
    pub fn resolve(
        &mut self,
        source: &dyn SourceModel,
        warnings: &mut Vec<String>,
    ) -> Result<&str, PrefixError> {
        if self.resolved.is_none() {
            let prefix = match source.default_namespace() {
                Some(ns) => ns.to_string(),
                None => {
                    tracing::warn!("{}", MISSING_PREFIX_WARNING);
                    warnings.push(MISSING_PREFIX_WARNING.to_string());

                    let candidates: BTreeSet<String> = source
                        .namespace_uris()
                        .into_iter()
                        .map(str::to_string)
                        .collect();
                    if candidates.is_empty() {
                        String::new()
                    } else {
                        let selected = self.selector.select_uri(&candidates);
                        if !candidates.contains(&selected) {
                            return Err(PrefixError::InvalidSelection { selected });
                        }
                        selected
                    }
                }
            };
            tracing::info!("namespace prefix: {}", prefix);
            self.resolved = Some(prefix);
        }
        Ok(self.resolved.as_deref().unwrap_or_default())
    }
}
