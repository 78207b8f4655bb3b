use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use quiz_core::model::{
    AnswerOutcome, OptionId, QuestionId, Quiz, QuizId, QuizResult, QuizResultRecord, QuizSummary,
};

use crate::client::QuizApi;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::wire::{
    AnswerData, AnswerRequest, Envelope, ErrorBody, QuizSummaryDto, ResultData, ResultRecordDto,
    StartQuizData,
};

/// `QuizApi` over the backend's REST endpoints.
#[derive(Clone)]
pub struct HttpQuizApi {
    client: Client,
    config: ApiConfig,
}

impl HttpQuizApi {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.config.endpoint(path));
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await.inspect_err(|err| {
            tracing::debug!(%method, path, error = %err, "quiz api transport failure");
        })?;
        let status = response.status();
        tracing::debug!(%method, path, status = status.as_u16(), "quiz api response");

        if !status.is_success() {
            let message = error_message(response).await;
            return Err(ApiError::from_status(status, message));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|err| ApiError::InvalidPayload(err.to_string()))?;
        if !envelope.success {
            let message = envelope
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| "request was not successful".to_owned());
            return Err(ApiError::Status { status, message });
        }
        envelope
            .data
            .ok_or_else(|| ApiError::InvalidPayload("response has no data".to_owned()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::GET, path, self.request(Method::GET, path))
            .await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::POST, path, self.request(Method::POST, path))
            .await
    }
}

async fn error_message(response: Response) -> Option<String> {
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn list_public_quizzes(&self) -> Result<Vec<QuizSummary>, ApiError> {
        let quizzes: Vec<QuizSummaryDto> = self.get("quizzes/public").await?;
        Ok(quizzes.into_iter().map(QuizSummary::from).collect())
    }

    async fn start_quiz(&self, quiz_id: QuizId) -> Result<Quiz, ApiError> {
        let data: StartQuizData = self.post(&format!("quizzes/{quiz_id}/start")).await?;
        data.quiz.try_into()
    }

    async fn submit_answer(
        &self,
        question_id: QuestionId,
        option_id: OptionId,
    ) -> Result<AnswerOutcome, ApiError> {
        let path = format!("quizzes/questions/{question_id}/answer");
        let builder = self
            .request(Method::POST, &path)
            .json(&AnswerRequest { option_id });
        let data: AnswerData = self.send(Method::POST, &path, builder).await?;
        Ok(data.into())
    }

    async fn finish_quiz(&self, quiz_id: QuizId) -> Result<QuizResult, ApiError> {
        let data: ResultData = self.post(&format!("quizzes/{quiz_id}/finish")).await?;
        data.try_into()
    }

    async fn list_results(&self) -> Result<Vec<QuizResultRecord>, ApiError> {
        let records: Vec<ResultRecordDto> = self.get("quizzes/results/me").await?;
        records.into_iter().map(TryInto::try_into).collect()
    }
}
