use ragcore_llm::{ChatRequest, HttpTransport, LlmClient, ModelInvoker};
use ragcore_protocol::{scope, CallContext};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "model": "gpt-4o-mini",
        "choices": [{"message": {"role": "assistant", "content": content}}],
        "usage": {"prompt_tokens": 7, "completion_tokens": 3, "total_tokens": 10}
    })
}

async fn mock_backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("an answer")))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn boundary_call_reaches_the_wire_with_true() {
    let server = mock_backend().await;
    let client = LlmClient::new(
        ModelInvoker::new(HttpTransport::new(server.uri(), None)),
        16,
    );
    let request = ChatRequest::new("gpt-4o-mini", "What is AI?");

    let completion = scope(CallContext::user_query(), async {
        client.complete(&request).await.unwrap()
    })
    .await;
    assert_eq!(completion.content, "an answer");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let origin = requests[0].headers.get("x-user-query").unwrap();
    assert_eq!(origin.to_str().unwrap(), "true");
}

#[tokio::test]
async fn unmarked_call_reaches_the_wire_with_false() {
    let server = mock_backend().await;
    let client = LlmClient::new(
        ModelInvoker::new(HttpTransport::new(server.uri(), None)),
        16,
    );
    let request = ChatRequest::new("qwen-local", "extract entities");

    client.complete(&request).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let origin = requests[0].headers.get("x-user-query").unwrap();
    assert_eq!(origin.to_str().unwrap(), "false");
}

#[tokio::test]
async fn second_identical_call_never_reaches_the_wire() {
    let server = mock_backend().await;
    let client = LlmClient::new(
        ModelInvoker::new(HttpTransport::new(server.uri(), None)),
        16,
    );
    let request = ChatRequest::new("qwen-local", "summarize passage 42");

    client.complete(&request).await.unwrap();
    client.complete(&request).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "cache hit must emit no network call");
}

#[tokio::test]
async fn bearer_token_and_origin_travel_together() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(header("x-user-query", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = LlmClient::new(
        ModelInvoker::new(HttpTransport::new(
            server.uri(),
            Some("sk-test".to_string()),
        )),
        16,
    );
    let request = ChatRequest::new("gpt-4o-mini", "hello");
    scope(CallContext::user_query(), async {
        client.complete(&request).await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn backend_error_status_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&server)
        .await;

    let client = LlmClient::new(
        ModelInvoker::new(HttpTransport::new(server.uri(), None)),
        16,
    );
    let request = ChatRequest::new("gpt-4o-mini", "hello");

    let err = client.complete(&request).await.unwrap_err();
    assert!(matches!(
        err,
        ragcore_llm::LlmError::Backend { status: 400, .. }
    ));
}
