use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::routing::post;
use serde_json::{Value, json};
use vocab_quiz::grading::{GradeError, Grader, OllamaGrader};

/// Serve `reply` from a local stand-in for Ollama's generate endpoint.
async fn mock_ollama(reply: Value) -> String {
    let app = Router::new().route(
        "/api/generate",
        post(move |Json(request): Json<Value>| {
            let reply = reply.clone();
            async move {
                assert_eq!(request["model"], "test-model");
                assert_eq!(request["stream"], false);
                assert!(request["prompt"].as_str().unwrap().contains("\"كتاب\""));
                Json(reply)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/generate")
}

fn grader(endpoint: String) -> OllamaGrader {
    OllamaGrader::new(endpoint, "test-model", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_model_says_correct() {
    let reply = json!({"model": "test-model", "response": "Correct.", "done": true});
    let endpoint = mock_ollama(reply).await;
    let correct = grader(endpoint).grade("كتاب", "book", "volume").await.unwrap();
    assert!(correct);
}

#[tokio::test]
async fn test_model_says_incorrect() {
    let endpoint = mock_ollama(json!({"response": " Incorrect\nThe answer is book."})).await;
    let correct = grader(endpoint).grade("كتاب", "book", "pen").await.unwrap();
    assert!(!correct);
}

#[tokio::test]
async fn test_missing_response_field() {
    let endpoint = mock_ollama(json!({"error": "model not found"})).await;
    let err = grader(endpoint).grade("كتاب", "book", "pen").await.unwrap_err();
    assert!(matches!(err, GradeError::MalformedResponse));
}

#[tokio::test]
async fn test_rambling_reply_is_rejected() {
    let endpoint = mock_ollama(json!({"response": "I think the answer could be right"})).await;
    let err = grader(endpoint).grade("كتاب", "book", "pen").await.unwrap_err();
    assert!(matches!(err, GradeError::UnrecognizedVerdict(_)));
}

#[tokio::test]
async fn test_unreachable_service() {
    // Grab a free port, then close it again
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = grader(format!("http://{addr}/api/generate"))
        .grade("كتاب", "book", "pen")
        .await
        .unwrap_err();
    assert!(matches!(err, GradeError::Request(_)));
}
