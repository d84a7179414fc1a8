//! In-memory stand-in for the marketing API, used by integration tests.
//!
//! Resources are stored as JSON objects in insertion order, one collection
//! per URL prefix (`/campaigns`, `/lists/{id}/webhooks`, ...). Every route
//! sits under `/3.0` behind a basic-auth check. Failures answer with the
//! service's problem-detail document.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const API_PREFIX: &str = "/3.0";
pub const ERROR_DOCS: &str = "https://mailchimp.com/developer/marketing/docs/errors/";
pub const HEALTH_STATUS: &str = "Everything's Chimpy!";

const CAMPAIGNS: &str = "/campaigns";
const CONTENT: &str = "/campaigns/content";
const FOLDERS: &str = "/campaign-folders";
const LISTS: &str = "/lists";
const AUTOMATIONS: &str = "/automations";
const STORES: &str = "/ecommerce/stores";

pub type Collection = Vec<Value>;

#[derive(Clone)]
pub struct AppState {
    db: Arc<RwLock<HashMap<String, Collection>>>,
    api_key: Arc<str>,
}

impl AppState {
    pub fn new(api_key: &str) -> Self {
        Self { db: Arc::default(), api_key: Arc::from(api_key) }
    }

    /// Insert `item` into `collection` directly, bypassing validation.
    /// Returns the id it was stored under.
    pub async fn seed(&self, collection: &str, item: Value) -> String {
        let mut item = into_object(item);
        let id = match item.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => new_id(),
        };
        item.insert("id".to_string(), Value::String(id.clone()));
        self.db.write().await.entry(collection.to_string()).or_default().push(Value::Object(item));
        id
    }

    pub async fn get(&self, collection: &str, id: &str) -> Option<Value> {
        let db = self.db.read().await;
        db.get(collection)?.iter().find(|item| item_id(item) == id).cloned()
    }

    async fn list(&self, collection: &str, envelope: &str, filter: &ListFilter) -> Value {
        let db = self.db.read().await;
        let items: Vec<&Value> = db
            .get(collection)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| match &filter.status {
                        Some(status) => item.get("status").and_then(Value::as_str) == Some(status.as_str()),
                        None => true,
                    })
                    .collect()
            })
            .unwrap_or_default();
        let total = items.len();
        let page: Vec<Value> = items
            .into_iter()
            .skip(filter.offset.unwrap_or(0))
            .take(filter.count.unwrap_or(10))
            .cloned()
            .collect();
        let mut listing = json!({ "total_items": total, "_links": [] });
        listing[envelope] = Value::Array(page);
        listing
    }

    async fn fetch(&self, collection: &str, id: &str, kind: &str) -> Result<Value, Response> {
        self.get(collection, id).await.ok_or_else(|| not_found_problem(kind))
    }

    async fn create(&self, collection: &str, defaults: Value, body: Value) -> Result<Value, Response> {
        let mut item = into_object(defaults);
        item.extend(into_object(body));
        let id = match item.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => new_id(),
        };
        item.insert("id".to_string(), Value::String(id.clone()));

        let mut db = self.db.write().await;
        let items = db.entry(collection.to_string()).or_default();
        if items.iter().any(|existing| item_id(existing) == id) {
            return Err(problem(
                StatusCode::BAD_REQUEST,
                "Invalid Resource",
                format!("A resource with id {id} already exists."),
                Vec::new(),
            ));
        }
        let item = Value::Object(item);
        items.push(item.clone());
        Ok(item)
    }

    /// Merge the top-level keys of `body` into an existing item. The id
    /// never changes.
    async fn patch(&self, collection: &str, id: &str, kind: &str, body: Value) -> Result<Value, Response> {
        let mut db = self.db.write().await;
        let item = db
            .get_mut(collection)
            .and_then(|items| items.iter_mut().find(|item| item_id(item) == id))
            .ok_or_else(|| not_found_problem(kind))?;
        if let Value::Object(target) = item {
            for (key, value) in into_object(body) {
                if key != "id" {
                    target.insert(key, value);
                }
            }
        }
        Ok(item.clone())
    }

    async fn remove(&self, collection: &str, id: &str, kind: &str) -> Result<StatusCode, Response> {
        let mut db = self.db.write().await;
        let items = db.get_mut(collection).ok_or_else(|| not_found_problem(kind))?;
        let index = items
            .iter()
            .position(|item| item_id(item) == id)
            .ok_or_else(|| not_found_problem(kind))?;
        items.remove(index);
        Ok(StatusCode::NO_CONTENT)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListFilter {
    pub count: Option<usize>,
    pub offset: Option<usize>,
    pub status: Option<String>,
}

fn item_id(item: &Value) -> &str {
    item.get("id").and_then(Value::as_str).unwrap_or_default()
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()[..10].to_string()
}

pub fn problem(status: StatusCode, title: &str, detail: impl Into<String>, errors: Vec<Value>) -> Response {
    let mut body = json!({
        "type": ERROR_DOCS,
        "title": title,
        "status": status.as_u16(),
        "detail": detail.into(),
        "instance": Uuid::new_v4().to_string(),
    });
    if !errors.is_empty() {
        body["errors"] = Value::Array(errors);
    }
    (status, [(header::CONTENT_TYPE, "application/problem+json")], body.to_string()).into_response()
}

fn not_found_problem(kind: &str) -> Response {
    problem(
        StatusCode::NOT_FOUND,
        "Resource Not Found",
        format!("The requested {kind} could not be found."),
        Vec::new(),
    )
}

fn invalid(field: &str) -> Response {
    problem(
        StatusCode::BAD_REQUEST,
        "Invalid Resource",
        "The resource submitted could not be validated. For field-specific details, see the 'errors' array.",
        vec![json!({ "field": field, "message": "This value should not be blank." })],
    )
}

fn require_field(body: &Value, field: &str) -> Result<(), Response> {
    match body.get(field).and_then(Value::as_str) {
        Some(value) if !value.is_empty() => Ok(()),
        _ => Err(invalid(field)),
    }
}

fn reply(result: Result<Value, Response>) -> Response {
    match result {
        Ok(value) => Json(value).into_response(),
        Err(response) => response,
    }
}

fn reply_status(result: Result<StatusCode, Response>) -> Response {
    match result {
        Ok(status) => status.into_response(),
        Err(response) => response,
    }
}

/// The service ignores the username and treats the password as the key.
fn authorized(headers: &HeaderMap, api_key: &str) -> bool {
    let Some(value) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let Some(encoded) = value.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = STANDARD.decode(encoded) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return false;
    };
    decoded.split_once(':').is_some_and(|(_, key)| key == api_key)
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if authorized(request.headers(), &state.api_key) {
        return next.run(request).await;
    }
    tracing::debug!(uri = %request.uri(), "rejected request without a valid api key");
    problem(
        StatusCode::UNAUTHORIZED,
        "API Key Invalid",
        "Your API key may be invalid, or you've attempted to access the wrong datacenter.",
        Vec::new(),
    )
}

pub fn app(api_key: &str) -> Router {
    app_with_state(AppState::new(api_key))
}

pub fn app_with_state(state: AppState) -> Router {
    let api = Router::new()
        .route("/ping", get(ping))
        .route("/campaigns", get(list_campaigns).post(create_campaign))
        .route(
            "/campaigns/{id}",
            get(get_campaign).patch(update_campaign).delete(delete_campaign),
        )
        .route("/campaigns/{id}/actions/send", post(send_campaign))
        .route("/campaigns/{id}/actions/test", post(test_campaign))
        .route("/campaigns/{id}/content", get(get_content).put(set_content))
        .route("/campaign-folders", get(list_folders).post(create_folder))
        .route(
            "/campaign-folders/{id}",
            get(get_folder).patch(update_folder).delete(delete_folder),
        )
        .route("/lists", get(list_lists).post(create_list))
        .route("/lists/{id}", get(get_list).patch(update_list).delete(delete_list))
        .route("/lists/{id}/webhooks", get(list_webhooks).post(create_webhook))
        .route(
            "/lists/{id}/webhooks/{hook_id}",
            get(get_webhook).patch(update_webhook).delete(delete_webhook),
        )
        .route("/automations", get(list_automations))
        .route("/automations/{id}", get(get_automation))
        .route("/automations/{id}/actions/pause-all-emails", post(pause_automation))
        .route("/automations/{id}/actions/start-all-emails", post(start_automation))
        .route("/ecommerce/stores", get(list_stores).post(create_store))
        .route(
            "/ecommerce/stores/{id}",
            get(get_store).patch(update_store).delete(delete_store),
        )
        .route("/ecommerce/stores/{id}/products", get(list_products).post(create_product))
        .route(
            "/ecommerce/stores/{id}/products/{product_id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route(
            "/ecommerce/stores/{id}/products/{product_id}/variants",
            get(list_variants).post(create_variant),
        )
        .route(
            "/ecommerce/stores/{id}/products/{product_id}/variants/{variant_id}",
            get(get_variant).patch(update_variant).delete(delete_variant),
        )
        .fallback(unknown_route)
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state);

    Router::new().nest(API_PREFIX, api).layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

async fn unknown_route() -> Response {
    not_found_problem("resource")
}

async fn ping() -> Json<Value> {
    Json(json!({ "health_status": HEALTH_STATUS }))
}

// --- campaigns ---

async fn list_campaigns(State(state): State<AppState>, Query(filter): Query<ListFilter>) -> Json<Value> {
    Json(state.list(CAMPAIGNS, "campaigns", &filter).await)
}

async fn create_campaign(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    if let Err(response) = require_field(&body, "type") {
        return response;
    }
    let defaults = json!({ "status": "save", "emails_sent": 0, "content_type": "template" });
    reply(state.create(CAMPAIGNS, defaults, body).await)
}

async fn get_campaign(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    reply(state.fetch(CAMPAIGNS, &id, "campaign").await)
}

async fn update_campaign(State(state): State<AppState>, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    reply(state.patch(CAMPAIGNS, &id, "campaign", body).await)
}

async fn delete_campaign(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    reply_status(state.remove(CAMPAIGNS, &id, "campaign").await)
}

async fn send_campaign(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let campaign = match state.fetch(CAMPAIGNS, &id, "campaign").await {
        Ok(campaign) => campaign,
        Err(response) => return response,
    };
    if campaign.get("status").and_then(Value::as_str) == Some("sent") {
        return problem(
            StatusCode::BAD_REQUEST,
            "Bad Request",
            "This campaign has already been sent.",
            Vec::new(),
        );
    }
    let sent = state
        .patch(CAMPAIGNS, &id, "campaign", json!({ "status": "sent", "emails_sent": 1 }))
        .await;
    reply_status(sent.map(|_| StatusCode::NO_CONTENT))
}

async fn test_campaign(State(state): State<AppState>, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    if let Err(response) = state.fetch(CAMPAIGNS, &id, "campaign").await {
        return response;
    }
    let has_recipients = body
        .get("test_emails")
        .and_then(Value::as_array)
        .is_some_and(|emails| !emails.is_empty());
    if !has_recipients {
        return invalid("test_emails");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn get_content(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if let Err(response) = state.fetch(CAMPAIGNS, &id, "campaign").await {
        return response;
    }
    let content = state
        .get(CONTENT, &id)
        .await
        .unwrap_or_else(|| json!({ "plain_text": "", "html": "", "archive_html": "" }));
    Json(content).into_response()
}

async fn set_content(State(state): State<AppState>, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    if let Err(response) = state.fetch(CAMPAIGNS, &id, "campaign").await {
        return response;
    }
    if state.get(CONTENT, &id).await.is_none() {
        state.seed(CONTENT, json!({ "id": id, "plain_text": "", "html": "", "archive_html": "" })).await;
    }
    let mut content = into_object(body);
    if let Some(html) = content.get("html").cloned() {
        content.insert("archive_html".to_string(), html);
    }
    reply(state.patch(CONTENT, &id, "campaign content", Value::Object(content)).await)
}

// --- campaign folders ---

async fn list_folders(State(state): State<AppState>, Query(filter): Query<ListFilter>) -> Json<Value> {
    Json(state.list(FOLDERS, "folders", &filter).await)
}

async fn create_folder(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    if let Err(response) = require_field(&body, "name") {
        return response;
    }
    reply(state.create(FOLDERS, json!({ "count": 0 }), body).await)
}

async fn get_folder(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    reply(state.fetch(FOLDERS, &id, "campaign folder").await)
}

async fn update_folder(State(state): State<AppState>, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    reply(state.patch(FOLDERS, &id, "campaign folder", body).await)
}

async fn delete_folder(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    reply_status(state.remove(FOLDERS, &id, "campaign folder").await)
}

// --- lists and webhooks ---

fn webhooks_of(list_id: &str) -> String {
    format!("{LISTS}/{list_id}/webhooks")
}

async fn list_lists(State(state): State<AppState>, Query(filter): Query<ListFilter>) -> Json<Value> {
    Json(state.list(LISTS, "lists", &filter).await)
}

async fn create_list(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    if let Err(response) = require_field(&body, "name") {
        return response;
    }
    let defaults = json!({ "stats": { "member_count": 0 }, "visibility": "pub" });
    reply(state.create(LISTS, defaults, body).await)
}

async fn get_list(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    reply(state.fetch(LISTS, &id, "list").await)
}

async fn update_list(State(state): State<AppState>, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    reply(state.patch(LISTS, &id, "list", body).await)
}

async fn delete_list(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    reply_status(state.remove(LISTS, &id, "list").await)
}

async fn list_webhooks(State(state): State<AppState>, Path(list_id): Path<String>) -> Response {
    if let Err(response) = state.fetch(LISTS, &list_id, "list").await {
        return response;
    }
    let mut listing = state.list(&webhooks_of(&list_id), "webhooks", &ListFilter::default()).await;
    listing["list_id"] = Value::String(list_id);
    Json(listing).into_response()
}

async fn create_webhook(State(state): State<AppState>, Path(list_id): Path<String>, Json(body): Json<Value>) -> Response {
    if let Err(response) = state.fetch(LISTS, &list_id, "list").await {
        return response;
    }
    if let Err(response) = require_field(&body, "url") {
        return response;
    }
    let defaults = json!({ "list_id": list_id });
    reply(state.create(&webhooks_of(&list_id), defaults, body).await)
}

async fn get_webhook(State(state): State<AppState>, Path((list_id, id)): Path<(String, String)>) -> Response {
    reply(state.fetch(&webhooks_of(&list_id), &id, "webhook").await)
}

async fn update_webhook(
    State(state): State<AppState>,
    Path((list_id, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    reply(state.patch(&webhooks_of(&list_id), &id, "webhook", body).await)
}

async fn delete_webhook(State(state): State<AppState>, Path((list_id, id)): Path<(String, String)>) -> Response {
    reply_status(state.remove(&webhooks_of(&list_id), &id, "webhook").await)
}

// --- automations ---

async fn list_automations(State(state): State<AppState>, Query(filter): Query<ListFilter>) -> Json<Value> {
    Json(state.list(AUTOMATIONS, "automations", &filter).await)
}

async fn get_automation(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    reply(state.fetch(AUTOMATIONS, &id, "automation").await)
}

async fn pause_automation(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let paused = state.patch(AUTOMATIONS, &id, "automation", json!({ "status": "paused" })).await;
    reply_status(paused.map(|_| StatusCode::NO_CONTENT))
}

async fn start_automation(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let started = state.patch(AUTOMATIONS, &id, "automation", json!({ "status": "sending" })).await;
    reply_status(started.map(|_| StatusCode::NO_CONTENT))
}

// --- ecommerce ---

fn products_of(store_id: &str) -> String {
    format!("{STORES}/{store_id}/products")
}

fn variants_of(store_id: &str, product_id: &str) -> String {
    format!("{STORES}/{store_id}/products/{product_id}/variants")
}

async fn list_stores(State(state): State<AppState>, Query(filter): Query<ListFilter>) -> Json<Value> {
    Json(state.list(STORES, "stores", &filter).await)
}

async fn create_store(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    for field in ["id", "list_id", "name", "currency_code"] {
        if let Err(response) = require_field(&body, field) {
            return response;
        }
    }
    reply(state.create(STORES, json!({}), body).await)
}

async fn get_store(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    reply(state.fetch(STORES, &id, "store").await)
}

async fn update_store(State(state): State<AppState>, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    reply(state.patch(STORES, &id, "store", body).await)
}

async fn delete_store(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    reply_status(state.remove(STORES, &id, "store").await)
}

async fn list_products(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Query(filter): Query<ListFilter>,
) -> Response {
    if let Err(response) = state.fetch(STORES, &store_id, "store").await {
        return response;
    }
    let mut listing = state.list(&products_of(&store_id), "products", &filter).await;
    listing["store_id"] = Value::String(store_id);
    Json(listing).into_response()
}

async fn create_product(State(state): State<AppState>, Path(store_id): Path<String>, Json(body): Json<Value>) -> Response {
    if let Err(response) = state.fetch(STORES, &store_id, "store").await {
        return response;
    }
    for field in ["id", "title"] {
        if let Err(response) = require_field(&body, field) {
            return response;
        }
    }
    reply(state.create(&products_of(&store_id), json!({ "variants": [] }), body).await)
}

async fn get_product(State(state): State<AppState>, Path((store_id, id)): Path<(String, String)>) -> Response {
    reply(state.fetch(&products_of(&store_id), &id, "product").await)
}

async fn update_product(
    State(state): State<AppState>,
    Path((store_id, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    reply(state.patch(&products_of(&store_id), &id, "product", body).await)
}

async fn delete_product(State(state): State<AppState>, Path((store_id, id)): Path<(String, String)>) -> Response {
    reply_status(state.remove(&products_of(&store_id), &id, "product").await)
}

async fn list_variants(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(String, String)>,
    Query(filter): Query<ListFilter>,
) -> Response {
    if let Err(response) = state.fetch(&products_of(&store_id), &product_id, "product").await {
        return response;
    }
    let mut listing = state.list(&variants_of(&store_id, &product_id), "variants", &filter).await;
    listing["store_id"] = Value::String(store_id);
    listing["product_id"] = Value::String(product_id);
    Json(listing).into_response()
}

async fn create_variant(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = state.fetch(&products_of(&store_id), &product_id, "product").await {
        return response;
    }
    for field in ["id", "title"] {
        if let Err(response) = require_field(&body, field) {
            return response;
        }
    }
    reply(state.create(&variants_of(&store_id, &product_id), json!({}), body).await)
}

async fn get_variant(
    State(state): State<AppState>,
    Path((store_id, product_id, id)): Path<(String, String, String)>,
) -> Response {
    reply(state.fetch(&variants_of(&store_id, &product_id), &id, "variant").await)
}

async fn update_variant(
    State(state): State<AppState>,
    Path((store_id, product_id, id)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    reply(state.patch(&variants_of(&store_id, &product_id), &id, "variant", body).await)
}

async fn delete_variant(
    State(state): State<AppState>,
    Path((store_id, product_id, id)): Path<(String, String, String)>,
) -> Response {
    reply_status(state.remove(&variants_of(&store_id, &product_id), &id, "variant").await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(user: &str, key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = format!("Basic {}", STANDARD.encode(format!("{user}:{key}")));
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn any_username_with_the_right_key_is_authorized() {
        assert!(authorized(&basic("chimp", "key-us1"), "key-us1"));
        assert!(authorized(&basic("anyone", "key-us1"), "key-us1"));
    }

    #[test]
    fn wrong_or_malformed_credentials_are_rejected() {
        assert!(!authorized(&basic("chimp", "other"), "key-us1"));
        assert!(!authorized(&HeaderMap::new(), "key-us1"));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer key-us1".parse().unwrap());
        assert!(!authorized(&headers, "key-us1"));

        headers.insert(header::AUTHORIZATION, "Basic !!!".parse().unwrap());
        assert!(!authorized(&headers, "key-us1"));
    }

    #[test]
    fn generated_ids_are_short_hex() {
        let id = new_id();
        assert_eq!(id.len(), 10);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn seeded_items_keep_their_id() {
        let state = AppState::new("key");
        let id = state.seed(AUTOMATIONS, json!({ "id": "wf1", "status": "save" })).await;
        assert_eq!(id, "wf1");
        assert_eq!(state.get(AUTOMATIONS, "wf1").await.unwrap()["status"], "save");
    }

    #[tokio::test]
    async fn patch_never_changes_the_id() {
        let state = AppState::new("key");
        state.seed(LISTS, json!({ "id": "L1", "name": "a" })).await;
        let patched = state.patch(LISTS, "L1", "list", json!({ "id": "L2", "name": "b" })).await.unwrap();
        assert_eq!(patched["id"], "L1");
        assert_eq!(patched["name"], "b");
    }

    #[tokio::test]
    async fn listing_pages_and_filters_by_status() {
        let state = AppState::new("key");
        for (id, status) in [("c1", "save"), ("c2", "sent"), ("c3", "save")] {
            state.seed(CAMPAIGNS, json!({ "id": id, "status": status })).await;
        }
        let filter = ListFilter { status: Some("save".to_string()), offset: Some(1), ..Default::default() };
        let listing = state.list(CAMPAIGNS, "campaigns", &filter).await;
        assert_eq!(listing["total_items"], 2);
        assert_eq!(listing["campaigns"][0]["id"], "c3");
    }
}
