use std::collections::HashSet;
use std::sync::Arc;

use quiz_api::QuizApi;
use quiz_core::model::{QuizResultRecord, QuizSummary};

use crate::error::ResultsError;

/// Number of quizzes suggested on the dashboard.
pub const DEFAULT_RECOMMENDATIONS: usize = 6;

/// Browses the public quiz catalog.
#[derive(Clone)]
pub struct CatalogService {
    api: Arc<dyn QuizApi>,
}

impl CatalogService {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `ResultsError::Network` if the catalog cannot be fetched.
    pub async fn list_public_quizzes(&self) -> Result<Vec<QuizSummary>, ResultsError> {
        let quizzes = self.api.list_public_quizzes().await?;
        tracing::debug!(count = quizzes.len(), "loaded public quizzes");
        Ok(quizzes)
    }
}

/// Quizzes the user has not taken yet, in catalog order, at most `limit`.
#[must_use]
pub fn recommended<'a>(
    quizzes: &'a [QuizSummary],
    results: &[QuizResultRecord],
    limit: usize,
) -> Vec<&'a QuizSummary> {
    let taken: HashSet<_> = results.iter().map(|r| r.quiz.id).collect();
    quizzes
        .iter()
        .filter(|q| !taken.contains(&q.id))
        .take(limit)
        .collect()
}
