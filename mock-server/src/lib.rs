//! In-memory stand-in for a subset of the SlimSurveys API.
//!
//! Every route lives under `/api` and requires `X-API-KEY: test-key`.
//! The store starts with survey 42 (uid `abc`) and one account,
//! `ada@example.com` / `secret`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, RawQuery, Request, State},
    http::{HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{any, get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_KEY: &str = "test-key";
pub const API_KEY_HEADER: &str = "x-api-key";
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Survey {
    pub id: u64,
    pub uid: String,
    pub title: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: u64,
    pub survey_id: u64,
    pub title: String,
}

#[derive(Clone, Debug)]
struct Account {
    password: String,
    notifications: bool,
}

#[derive(Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct Signup {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub notifications: bool,
}

#[derive(Deserialize)]
pub struct SurveyQuery {
    pub survey_uid: String,
}

#[derive(Deserialize)]
pub struct NewQuestion {
    pub title: String,
}

#[derive(Debug)]
pub struct Store {
    surveys: HashMap<u64, Survey>,
    questions: HashMap<u64, Question>,
    accounts: HashMap<String, Account>,
    /// token -> account email
    sessions: HashMap<String, String>,
    next_question_id: u64,
}

impl Default for Store {
    fn default() -> Self {
        let mut surveys = HashMap::new();
        surveys.insert(
            42,
            Survey {
                id: 42,
                uid: "abc".to_string(),
                title: "Lunch options".to_string(),
            },
        );
        let mut accounts = HashMap::new();
        accounts.insert(
            "ada@example.com".to_string(),
            Account {
                password: "secret".to_string(),
                notifications: false,
            },
        );
        Self {
            surveys,
            questions: HashMap::new(),
            accounts,
            sessions: HashMap::new(),
            next_question_id: 1,
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn api_error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/auth/token", post(auth_token))
        .route("/users/me", get(me))
        .route("/users/signup", post(signup))
        .route("/surveys/survey", get(survey_by_uid))
        .route("/surveys/survey/{id}", get(survey_by_id))
        .route("/surveys/embed/{id}", get(embed_survey))
        .route("/questions/create/{survey_id}", post(create_question))
        .route("/questions/question/{id}", get(get_question).delete(delete_question))
        .route("/images/create/{question_id}", post(upload_image))
        .route("/debug/echo", any(echo))
        .route("/debug/redirect", get(redirect_to_survey))
        .layer(middleware::from_fn(require_api_key));
    Router::new().nest("/api", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_api_key(request: Request, next: Next) -> Response {
    match request.headers().get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        Some(API_KEY) => next.run(request).await,
        _ => api_error(StatusCode::UNAUTHORIZED, "invalid API key").into_response(),
    }
}

async fn auth_token(State(db): State<Db>, Form(login): Form<Login>) -> ApiResult {
    let mut store = db.write().await;
    let valid = store
        .accounts
        .get(&login.email)
        .is_some_and(|account| account.password == login.password);
    if !valid {
        return Err(api_error(StatusCode::UNAUTHORIZED, "invalid credentials"));
    }
    let token = Uuid::new_v4().simple().to_string();
    store.sessions.insert(token.clone(), login.email);
    Ok(Json(json!({ "token": token })))
}

async fn me(State(db): State<Db>, headers: HeaderMap) -> ApiResult {
    let store = db.read().await;
    let email = headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|token| store.sessions.get(token))
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "authentication required"))?;
    let account = &store.accounts[email];
    Ok(Json(json!({ "email": email, "notifications": account.notifications })))
}

async fn signup(
    State(db): State<Db>,
    Form(input): Form<Signup>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    if store.accounts.contains_key(&input.email) {
        return Err(api_error(StatusCode::CONFLICT, "email already registered"));
    }
    store.accounts.insert(
        input.email.clone(),
        Account {
            password: input.password,
            notifications: input.notifications,
        },
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({ "email": input.email, "notifications": input.notifications })),
    ))
}

async fn survey_by_id(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult {
    let store = db.read().await;
    store
        .surveys
        .get(&id)
        .map(|survey| Json(json!(survey)))
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "survey not found"))
}

async fn survey_by_uid(State(db): State<Db>, Query(query): Query<SurveyQuery>) -> ApiResult {
    let store = db.read().await;
    store
        .surveys
        .values()
        .find(|survey| survey.uid == query.survey_uid)
        .map(|survey| Json(json!(survey)))
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "survey not found"))
}

async fn embed_survey(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Html<String>, (StatusCode, Json<Value>)> {
    let store = db.read().await;
    let survey = store
        .surveys
        .get(&id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "survey not found"))?;
    Ok(Html(format!(
        "<iframe src=\"https://slimsurveys.com/s/{}\" title=\"{}\"></iframe>",
        survey.uid, survey.title
    )))
}

/// Temporary redirect to the seeded survey.
async fn redirect_to_survey() -> Redirect {
    Redirect::temporary("/api/surveys/survey/42")
}

async fn create_question(
    State(db): State<Db>,
    Path(survey_id): Path<u64>,
    Form(input): Form<NewQuestion>,
) -> Result<(StatusCode, Json<Question>), (StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    if !store.surveys.contains_key(&survey_id) {
        return Err(api_error(StatusCode::NOT_FOUND, "survey not found"));
    }
    let question = Question {
        id: store.next_question_id,
        survey_id,
        title: input.title,
    };
    store.next_question_id += 1;
    store.questions.insert(question.id, question.clone());
    Ok((StatusCode::CREATED, Json(question)))
}

async fn get_question(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Question>, (StatusCode, Json<Value>)> {
    let store = db.read().await;
    store
        .questions
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "question not found"))
}

async fn delete_question(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult {
    let mut store = db.write().await;
    store
        .questions
        .remove(&id)
        .map(|question| Json(json!({ "deleted": question.id })))
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "question not found"))
}

async fn upload_image(Path(question_id): Path<u64>, mut multipart: Multipart) -> ApiResult {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, &e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, &e.to_string()))?;
        return Ok(Json(json!({
            "question_id": question_id,
            "filename": filename,
            "content_type": content_type,
            "size": bytes.len(),
        })));
    }
    Err(api_error(StatusCode::UNPROCESSABLE_ENTITY, "missing image field"))
}

/// Reflect the request back so clients can check what went on the wire.
async fn echo(method: Method, RawQuery(query): RawQuery, headers: HeaderMap, body: String) -> Json<Value> {
    let headers: serde_json::Map<String, Value> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), Value::from(value)))
        })
        .collect();
    Json(json!({
        "method": method.as_str(),
        "query": query,
        "headers": headers,
        "body": body,
    }))
}
