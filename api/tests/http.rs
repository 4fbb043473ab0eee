use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ai_llm_service::error_handler::{HttpError, Provider, ProviderError, ProviderErrorKind};
use ai_llm_service::{BoxFuture, LlmServiceProfiles, LlmSettings, TextEmbedder, TextGenerator};
use api::core::app_state::AppState;
use api::router;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use llm_cache::CacheMode;
use qna_chain::{
    ChainConfig, DirectQa, PromptTemplate, QnaPipelines, QnaRuntime, RetrievalQa,
};
use rag_store::{RetrievedDocument, VectorStore, rank_hits};
use serde_json::{Value, json};
use tower::ServiceExt;

const MANAGER_Q: &str = "What are the key characteristics of a manager?";

struct FixedEmbedder;

impl TextEmbedder for FixedEmbedder {
    fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, ai_llm_service::Result<Vec<f32>>> {
        Box::pin(async { Ok(vec![1.0, 0.0]) })
    }
}

struct TwoDocs;

impl VectorStore for TwoDocs {
    fn index_name(&self) -> &str {
        "ai.training.openai"
    }

    fn endpoint(&self) -> &str {
        "http://localhost:6334"
    }

    fn check_index(&self) -> BoxFuture<'_, rag_store::Result<()>> {
        Box::pin(async { Ok(()) })
    }

    fn retrieve(
        &self,
        _query: Vec<f32>,
        k: usize,
        floor: Option<f32>,
    ) -> BoxFuture<'_, rag_store::Result<Vec<RetrievedDocument>>> {
        let docs = rank_hits(
            vec![
                RetrievedDocument::new("D1: Managers set direction.", 0.9),
                RetrievedDocument::new("D2: Managers coach people.", 0.75),
            ],
            k,
            floor,
        );
        Box::pin(async move { Ok(docs) })
    }
}

/// Answers with a fixed text, or fails with a 429, and counts calls.
struct ScriptedGenerator {
    reply: &'static str,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl TextGenerator for ScriptedGenerator {
    fn llm_string(&self) -> String {
        "mock:scripted".into()
    }

    fn generate<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, ai_llm_service::Result<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fail = self.fail;
        let reply = self.reply;
        Box::pin(async move {
            if fail {
                Err(ProviderError::new(
                    Provider::OpenAI,
                    ProviderErrorKind::HttpStatus(HttpError {
                        status: StatusCode::TOO_MANY_REQUESTS,
                        url: "https://api.openai.com/v1/chat/completions".into(),
                        snippet: "rate limited".into(),
                    }),
                )
                .into())
            } else {
                Ok(reply.to_string())
            }
        })
    }
}

async fn state(fail: bool) -> (Arc<AppState>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let informed = Arc::new(ScriptedGenerator {
        reply: "Managers lead, plan and coach.",
        fail: false,
        calls: calls.clone(),
    });
    let baseline = Arc::new(ScriptedGenerator {
        reply: "A manager manages.",
        fail,
        calls: calls.clone(),
    });

    let store: Arc<dyn VectorStore> = Arc::new(TwoDocs);
    let retrieval = RetrievalQa::connect(
        Arc::new(FixedEmbedder),
        store.clone(),
        informed,
        PromptTemplate::qa(),
        ChainConfig::default(),
    )
    .await
    .unwrap();
    let direct = DirectQa::new(baseline, PromptTemplate::direct());

    let settings = LlmSettings::from_lookup(|k| (k == "LLM_KIND").then(|| "local".to_string()))
        .unwrap();
    let runtime = QnaRuntime {
        pipelines: Arc::new(QnaPipelines::new(retrieval, direct)),
        llm: Arc::new(LlmServiceProfiles::new(&settings, Some(1)).unwrap()),
        store,
        cache_mode: CacheMode::Disabled,
    };

    (Arc::new(AppState::new(runtime)), calls)
}

async fn app(fail: bool) -> (Router, Arc<AtomicUsize>) {
    let (state, calls) = state(fail).await;
    (router(state), calls)
}

fn ask(question: &str, cookie: Option<&str>) -> Request<Body> {
    let mut req = Request::post("/api/ask").header(header::CONTENT_TYPE, "application/json");
    if let Some(c) = cookie {
        req = req.header(header::COOKIE, c);
    }
    req.body(Body::from(json!({ "question": question }).to_string()))
        .unwrap()
}

fn cookie_of(res: &Response<Body>) -> String {
    let raw = res.headers()[header::SET_COOKIE].to_str().unwrap();
    raw.split(';').next().unwrap().to_string()
}

async fn json_body(res: Response<Body>) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(res: Response<Body>) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn same_question_twice_runs_pipelines_once() {
    let (app, calls) = app(false).await;

    let res = app.clone().oneshot(ask(MANAGER_Q, None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = cookie_of(&res);
    let body = json_body(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["submission"], "answered");
    assert_eq!(body["data"]["session"]["phase"], "displaying");
    assert_eq!(
        body["data"]["session"]["answer"],
        "Managers lead, plan and coach."
    );
    assert_eq!(body["data"]["session"]["baseline_answer"], "A manager manages.");
    assert_eq!(
        body["data"]["session"]["context"],
        json!(["D1: Managers set direction.", "D2: Managers coach people."])
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let again = app
        .clone()
        .oneshot(ask(&format!("  {MANAGER_Q} "), Some(&cookie)))
        .await
        .unwrap();
    let body = json_body(again).await;
    assert_eq!(body["data"]["submission"], "unchanged");
    assert_eq!(body["data"]["session"]["question"], MANAGER_Q);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn new_question_replaces_previous_answer() {
    let (app, calls) = app(false).await;

    let first = app.clone().oneshot(ask(MANAGER_Q, None)).await.unwrap();
    let cookie = cookie_of(&first);

    let res = app
        .clone()
        .oneshot(ask("How do I run a one-on-one?", Some(&cookie)))
        .await
        .unwrap();
    let body = json_body(res).await;

    assert_eq!(body["data"]["submission"], "answered");
    assert_eq!(body["data"]["session"]["question"], "How do I run a one-on-one?");
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn empty_question_is_a_no_op() {
    let (app, calls) = app(false).await;

    let res = app.clone().oneshot(ask("   ", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;

    assert_eq!(body["data"]["submission"], "ignored");
    assert_eq!(body["data"]["session"]["phase"], "idle");
    assert_eq!(body["data"]["session"]["question"], Value::Null);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn pipeline_failure_is_displayed_not_raised() {
    let (app, _) = app(true).await;

    let res = app.clone().oneshot(ask(MANAGER_Q, None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = cookie_of(&res);
    let body = json_body(res).await;

    assert_eq!(body["data"]["submission"], "failed");
    assert_eq!(body["data"]["session"]["phase"], "idle");
    assert_eq!(body["data"]["session"]["answer"], Value::Null);
    let error = body["data"]["session"]["error"].as_str().unwrap();
    assert!(error.starts_with("The language model failed"), "{error}");

    let page = app
        .oneshot(
            Request::get("/")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let html = text_body(page).await;
    assert!(html.contains("class=\"error\""));
    assert!(!html.contains("<h3>Informed Response</h3>"));
}

#[tokio::test]
async fn form_post_redirects_and_page_shows_answers() {
    let (app, _) = app(false).await;

    let res = app
        .clone()
        .oneshot(
            Request::post("/ask")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("question=What+are+the+key+characteristics+of+a+manager%3F"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/");
    let cookie = cookie_of(&res);

    let page = app
        .oneshot(
            Request::get("/")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let html = text_body(page).await;

    assert!(html.contains("<h3>Informed Response</h3>"));
    assert!(html.contains("Managers lead, plan and coach."));
    assert!(html.contains("D1: Managers set direction.\nD2: Managers coach people."));
    assert!(html.contains("<h3>Default Response</h3>"));
    assert!(html.contains("A manager manages."));
}

#[tokio::test]
async fn session_endpoint_reports_idle_for_new_client() {
    let (state, _) = state(false).await;

    let res = router(state.clone())
        .oneshot(Request::get("/api/session").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(!res.headers().contains_key(header::SET_COOKIE));

    let body = json_body(res).await;
    assert_eq!(body["data"]["phase"], "idle");
    assert_eq!(body["data"]["context"], json!([]));
    assert_eq!(state.sessions.len().await, 0);
}

#[tokio::test]
async fn cookieless_page_views_do_not_create_sessions() {
    let (state, _) = state(false).await;
    let app = router(state.clone());

    for _ in 0..500 {
        let res = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(!res.headers().contains_key(header::SET_COOKIE));
    }
    assert_eq!(state.sessions.len().await, 0);

    let res = app.oneshot(ask(MANAGER_Q, None)).await.unwrap();
    assert!(cookie_of(&res).starts_with("qna_session="));
    assert_eq!(state.sessions.len().await, 1);
}

#[tokio::test]
async fn malformed_body_is_wrapped_in_envelope() {
    let (app, calls) = app(false).await;

    let res = app
        .oneshot(
            Request::post("/api/ask")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"query":"hi"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.headers().contains_key("X-Request-Id"));
    let body = json_body(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
    assert_eq!(body["error"]["details"][0]["path"], "question");
    assert!(
        body["error"]["details"][0]["hint"]
            .as_str()
            .unwrap()
            .starts_with("Send a body like { \"question\"")
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
