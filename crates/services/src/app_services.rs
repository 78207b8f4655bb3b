use std::sync::Arc;

use quiz_api::{ApiConfig, HttpQuizApi, QuizApi};

use crate::Clock;
use crate::catalog_service::CatalogService;
use crate::error::AppServicesError;
use crate::results_service::ResultsService;
use crate::sessions::{SessionController, SessionStore};

/// Assembles app-facing services around one quiz backend and one session store.
#[derive(Clone)]
pub struct AppServices {
    store: SessionStore,
    controller: Arc<SessionController>,
    results: Arc<ResultsService>,
    catalog: Arc<CatalogService>,
}

impl AppServices {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn QuizApi>) -> Self {
        let store = SessionStore::new();
        let controller = Arc::new(SessionController::new(
            clock,
            Arc::clone(&api),
            store.clone(),
        ));
        let results = Arc::new(ResultsService::new(clock, Arc::clone(&api)));
        let catalog = Arc::new(CatalogService::new(api));

        Self {
            store,
            controller,
            results,
            catalog,
        }
    }

    /// Build services backed by the REST backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Api` if the HTTP client cannot be built.
    pub fn new_http(config: ApiConfig, clock: Clock) -> Result<Self, AppServicesError> {
        tracing::info!(base_url = %config.base_url, "using quiz backend");
        let api = HttpQuizApi::new(config)?;
        Ok(Self::new(clock, Arc::new(api)))
    }

    #[must_use]
    pub fn store(&self) -> SessionStore {
        self.store.clone()
    }

    #[must_use]
    pub fn controller(&self) -> Arc<SessionController> {
        Arc::clone(&self.controller)
    }

    #[must_use]
    pub fn results(&self) -> Arc<ResultsService> {
        Arc::clone(&self.results)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_api::{InMemoryQuizApi, QuizFixture};
    use quiz_core::model::{OptionId, Question, QuestionId, Quiz, QuizId, QuizOption};
    use quiz_core::time::fixed_clock;

    #[tokio::test]
    async fn controller_and_readers_share_the_store() {
        let api = InMemoryQuizApi::new(fixed_clock());
        let question = Question::new(
            QuestionId::new(1),
            "Only",
            vec![QuizOption::new(OptionId::new(1), "yes")],
        )
        .unwrap();
        let quiz = Quiz::new(QuizId::new(1), "Shared", vec![question]).unwrap();
        api.insert_quiz(QuizFixture::new(quiz)).unwrap();

        let services = AppServices::new(fixed_clock(), Arc::new(api));
        let reader = services.store();
        services
            .controller()
            .start_session(QuizId::new(1))
            .await
            .unwrap();

        assert_eq!(
            reader.read(|s| s.session().map(|s| s.title().to_owned())),
            Some("Shared".to_owned())
        );
    }

    #[test]
    fn http_services_build_from_config() {
        let services = AppServices::new_http(ApiConfig::default(), fixed_clock()).unwrap();
        assert!(services.store().snapshot().session().is_none());
    }
}
