use std::sync::Arc;

use crate::scoring::hard_match::KeywordMatcher;
use crate::scoring::semantic::SemanticAnalyzer;
use crate::store::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: JobStore,
    pub matcher: Arc<KeywordMatcher>,
    /// Pluggable semantic analyzer. Default: `LlmSemanticAnalyzer`.
    pub analyzer: Arc<dyn SemanticAnalyzer>,
}
