//! Terminal URI selection for documents without a default namespace.

use onto_builder::UriSelector;
use std::collections::BTreeSet;
use std::io::{BufRead, IsTerminal, Write};

/// Asks on the terminal which declared namespace is the ontology's own.
///
/// A preferred URI (from `--prefix` or `[prefix] preferred`) answers without
/// prompting when it is one of the candidates. Without a terminal, or on
/// unreadable input, the first candidate is taken.
#[derive(Debug, Clone, Default)]
pub struct PromptSelector {
    preferred: Option<String>,
}

impl PromptSelector {
    pub fn new(preferred: Option<String>) -> Self {
        Self { preferred }
    }

    fn prompt(candidates: &[&String]) -> Option<String> {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            return None;
        }

        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "No default namespace declared. Choose the ontology URI:");
        for (i, uri) in candidates.iter().enumerate() {
            let _ = writeln!(stderr, "  [{}] {}", i + 1, uri);
        }
        let _ = write!(stderr, "Selection [1]: ");
        let _ = stderr.flush();

        let mut line = String::new();
        stdin.lock().read_line(&mut line).ok()?;
        Some(line)
    }
}

/// Map a typed answer to a candidate: a 1-based index, a URI from the list,
/// or empty input for the first entry.
pub fn parse_answer(answer: &str, candidates: &[&String]) -> Option<String> {
    let answer = answer.trim();
    if answer.is_empty() {
        return candidates.first().map(|c| (*c).clone());
    }
    if let Ok(index) = answer.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| candidates.get(i))
            .map(|c| (*c).clone());
    }
    candidates
        .iter()
        .find(|c| c.as_str() == answer)
        .map(|c| (*c).clone())
}

impl UriSelector for PromptSelector {
    fn select_uri(&self, candidates: &BTreeSet<String>) -> String {
        if let Some(preferred) = &self.preferred
            && candidates.contains(preferred)
        {
            tracing::info!("using preferred prefix {}", preferred);
            return preferred.clone();
        }

        let listed: Vec<&String> = candidates.iter().collect();
        let first = listed.first().map(|c| (*c).clone()).unwrap_or_default();
        match Self::prompt(&listed) {
            Some(answer) => parse_answer(&answer, &listed).unwrap_or_else(|| {
                tracing::warn!("invalid selection {:?}, using {}", answer.trim(), first);
                first
            }),
            None => {
                tracing::warn!("no terminal for URI selection, using {}", first);
                first
            }
        }
    }
}
