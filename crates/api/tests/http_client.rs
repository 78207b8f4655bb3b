use axum::extract::{Json, Path};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{Value, json};

use quiz_api::{ApiConfig, ApiError, HttpQuizApi, QuizApi};
use quiz_core::model::{OptionId, QuestionId, QuizId, ResultId};
use quiz_core::time::fixed_now;

fn ok(data: Value) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "ok", "data": data })),
    )
}

fn fail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "success": false, "message": message })))
}

async fn public_quizzes() -> (StatusCode, Json<Value>) {
    ok(json!([
        { "id": 1, "title": "Rust", "category": { "name": "Programming" }, "_count": { "questions": 2 } },
        { "id": 5, "title": "Geo", "description": "Capitals" }
    ]))
}

async fn start(Path(id): Path<u64>) -> (StatusCode, Json<Value>) {
    match id {
        1 => ok(json!({ "quiz": {
            "id": 1, "title": "Rust",
            "questions": [
                { "id": 10, "text": "Ownership?", "options": [
                    { "id": 100, "text": "move" }, { "id": 101, "text": "copy" } ] },
                { "id": 11, "text": "Borrowing?", "options": [
                    { "id": 110, "text": "&" }, { "id": 111, "text": "*" } ] }
            ]
        }})),
        3 => fail(StatusCode::FORBIDDEN, "Quiz is not published"),
        _ => fail(StatusCode::NOT_FOUND, "Quiz not found"),
    }
}

async fn answer(
    Path(question_id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer secret") {
        return fail(StatusCode::UNAUTHORIZED, "Missing token");
    }
    if question_id == 11 {
        return fail(StatusCode::CONFLICT, "Question already answered");
    }
    let correct = body["option_id"] == json!(100);
    ok(json!({ "is_correct": correct, "submitted_at": "2023-11-14T22:13:20Z" }))
}

async fn finish(Path(id): Path<u64>) -> (StatusCode, Json<Value>) {
    match id {
        7 => return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
        8 => return (StatusCode::OK, Json(json!({ "success": false, "message": "Attempt expired" }))),
        9 => return (StatusCode::OK, Json(json!({ "success": true }))),
        _ => {}
    }
    ok(json!({
        "score": 50, "correct_answers": 1, "total_questions": 2,
        "started_at": "2023-11-14T22:13:20Z", "finished_at": "2023-11-14T22:15:20Z"
    }))
}

async fn results() -> (StatusCode, Json<Value>) {
    ok(json!([{
        "id": 9, "score": 100, "correct_answers": 2, "total_questions": 2,
        "started_at": "2023-11-14T22:13:20Z", "finished_at": "2023-11-14T22:14:20Z",
        "quiz": { "id": 1, "title": "Rust" }
    }]))
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/quizzes/public", get(public_quizzes))
        .route("/api/quizzes/results/me", get(results))
        .route("/api/quizzes/{id}/start", post(start))
        .route("/api/quizzes/{id}/finish", post(finish))
        .route("/api/quizzes/questions/{id}/answer", post(answer));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

async fn client(token: Option<&str>) -> HttpQuizApi {
    let base = spawn_backend().await;
    let config = ApiConfig::default()
        .with_base_url(base)
        .with_token(token.map(str::to_owned));
    HttpQuizApi::new(config).unwrap()
}

#[tokio::test]
async fn start_decodes_question_set() {
    let api = client(None).await;
    let quiz = api.start_quiz(QuizId::new(1)).await.unwrap();

    assert_eq!(quiz.title(), "Rust");
    assert_eq!(quiz.questions().len(), 2);
    assert_eq!(quiz.questions()[1].id(), QuestionId::new(11));
}

#[tokio::test]
async fn start_maps_missing_and_unpublished() {
    let api = client(None).await;

    let missing = api.start_quiz(QuizId::new(2)).await.unwrap_err();
    assert!(matches!(missing, ApiError::NotFound(msg) if msg == "Quiz not found"));

    let hidden = api.start_quiz(QuizId::new(3)).await.unwrap_err();
    assert!(matches!(hidden, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn answer_sends_bearer_token_and_option() {
    let api = client(Some("secret")).await;
    let outcome = api
        .submit_answer(QuestionId::new(10), OptionId::new(100))
        .await
        .unwrap();

    assert!(outcome.is_correct);
    assert_eq!(outcome.submitted_at, fixed_now());

    let conflict = api
        .submit_answer(QuestionId::new(11), OptionId::new(110))
        .await
        .unwrap_err();
    assert!(matches!(conflict, ApiError::Conflict(_)));
}

#[tokio::test]
async fn answer_without_token_is_unauthorized() {
    let api = client(None).await;
    let err = api
        .submit_answer(QuestionId::new(10), OptionId::new(100))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn finish_and_history() {
    let api = client(None).await;

    let result = api.finish_quiz(QuizId::new(1)).await.unwrap();
    assert_eq!(result.score(), 50);
    assert_eq!(result.duration(), chrono::Duration::minutes(2));

    let server_error = api.finish_quiz(QuizId::new(7)).await.unwrap_err();
    assert!(matches!(
        server_error,
        ApiError::Status { status, .. } if status.as_u16() == 500
    ));

    let refused = api.finish_quiz(QuizId::new(8)).await.unwrap_err();
    assert!(matches!(
        refused,
        ApiError::Status { status, message } if status.as_u16() == 200 && message == "Attempt expired"
    ));

    let empty = api.finish_quiz(QuizId::new(9)).await.unwrap_err();
    assert!(matches!(empty, ApiError::InvalidPayload(_)));

    let history = api.list_results().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, ResultId::new(9));
}

#[tokio::test]
async fn public_listing() {
    let api = client(None).await;
    let quizzes = api.list_public_quizzes().await.unwrap();

    assert_eq!(quizzes.len(), 2);
    assert_eq!(quizzes[0].category.as_deref(), Some("Programming"));
    assert_eq!(quizzes[0].question_count, 2);
    assert_eq!(quizzes[1].description.as_deref(), Some("Capitals"));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let config = ApiConfig::default().with_base_url("http://127.0.0.1:1/api");
    let api = HttpQuizApi::new(config).unwrap();
    let err = api.list_results().await.unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
}
