//! Lazily compiled highlight query
//!
//! Compiling a query is expensive, so it happens once per grammar on the
//! first `prepare()`. Every install and every reset bumps the generation;
//! cached tokens stamped with an older generation are stale.

use tree_sitter::Query;

use super::highlights::QueryGeneration;
use super::parser::Grammar;

enum QueryState {
    /// Never prepared, or reset since
    Unprepared,
    Ready(Query),
    /// Compilation failed; not retried until `reset()`
    Failed,
}

pub struct QueryManager {
    state: QueryState,
    generation: QueryGeneration,
}

impl QueryManager {
    pub fn new() -> Self {
        Self {
            state: QueryState::Unprepared,
            generation: QueryGeneration::default(),
        }
    }

    /// Compile the grammar's highlight query unless one is installed.
    ///
    /// Without a grammar nothing happens and nothing is remembered, so a later
    /// call can succeed once a parser is configured.
    pub fn prepare(&mut self, grammar: Option<&Grammar>) {
        match self.state {
            QueryState::Ready(_) => return,
            QueryState::Failed => {
                tracing::debug!("Highlight query failed earlier, waiting for reset");
                return;
            }
            QueryState::Unprepared => {}
        }

        let Some(grammar) = grammar else {
            tracing::debug!("No grammar available, highlight query not compiled");
            return;
        };

        match Query::new(grammar.language(), grammar.highlights_query()) {
            Ok(query) => {
                self.generation.bump();
                tracing::debug!(
                    "Compiled highlight query for {:?} ({} captures, generation {})",
                    grammar.id(),
                    query.capture_names().len(),
                    self.generation.get()
                );
                self.state = QueryState::Ready(query);
            }
            Err(e) => {
                tracing::error!(
                    "Failed to compile highlight query for {:?} at row {}, column {}: {}",
                    grammar.id(),
                    e.row,
                    e.column,
                    e.message
                );
                self.state = QueryState::Failed;
            }
        }
    }

    /// Discard the query. The caller must clear its token cache as well.
    pub fn reset(&mut self) {
        self.state = QueryState::Unprepared;
        self.generation.bump();
        tracing::debug!("Highlight query reset (generation {})", self.generation.get());
    }

    pub fn query(&self) -> Option<&Query> {
        match &self.state {
            QueryState::Ready(query) => Some(query),
            _ => None,
        }
    }

    pub fn generation(&self) -> QueryGeneration {
        self.generation
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, QueryState::Ready(_))
    }

    pub fn has_failed(&self) -> bool {
        matches!(self.state, QueryState::Failed)
    }
}

impl Default for QueryManager {
    fn default() -> Self {
        Self::new()
    }
}
