use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::Service;

use server::routes::{self, auth};
use service::token::TokenService;
use store::{Document, DocumentStore, MemoryDocumentStore, BOOKINGS, SERVICES};

const SECRET: &str = "test-secret";

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

fn build_app() -> (Router, Arc<dyn DocumentStore>) {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let state = auth::ServerState {
        store: Arc::clone(&store),
        tokens: TokenService::new(SECRET),
    };
    (routes::build_router(cors(), state), store)
}

fn doc(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}

async fn call(app: &Router, req: Request<Body>) -> Response {
    app.clone().call(req).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    call(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn send_json(app: &Router, method: &str, uri: &str, body: &Value) -> Response {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    call(app, req).await
}

async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// POST /jwt and pull the `token=...` pair out of the set-cookie header.
async fn login_cookie(app: &Router, email: &str) -> String {
    let resp = send_json(app, "POST", "/jwt", &json!({ "email": email })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set a cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("HttpOnly"));
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn liveness_and_health() {
    let (app, _) = build_app();

    let resp = get(&app, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Car Doctor server running");

    let resp = get(&app, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "ok");
}

#[tokio::test]
async fn services_listing_and_lookup() {
    let (app, store) = build_app();
    let inserted = store
        .insert_one(SERVICES, doc(json!({"title": "Full Engine Repair", "price": "250.00"})))
        .await
        .unwrap();
    store
        .insert_one(SERVICES, doc(json!({"title": "Wheel Alignment", "price": "40.00"})))
        .await
        .unwrap();

    let resp = get(&app, "/services").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 2);

    let resp = get(&app, &format!("/service/{}", inserted.inserted_id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["title"], "Full Engine Repair");
    assert_eq!(body["_id"], inserted.inserted_id.to_string());

    // absent id is a 200 with a null body, not a 404
    let resp = get(&app, &format!("/service/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, Value::Null);

    // malformed id is a 400, not a fault
    let resp = get(&app, "/service/not-an-id").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checkout_projection_hides_internal_fields() {
    let (app, store) = build_app();
    let inserted = store
        .insert_one(
            SERVICES,
            doc(json!({
                "title": "Engine Oil Change",
                "price": "20.00",
                "service_id": "05",
                "img": "https://example.com/oil.jpg",
                "description": "supplier cost 8.00",
                "facility": ["lift"]
            })),
        )
        .await
        .unwrap();

    let resp = get(&app, &format!("/checkout/{}", inserted.inserted_id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let mut fields: Vec<&str> = body.as_object().unwrap().keys().map(|k| k.as_str()).collect();
    fields.sort_unstable();
    assert_eq!(fields, ["img", "price", "service_id", "title"]);
}

#[tokio::test]
async fn bookings_listing_requires_a_credential() {
    let (app, _) = build_app();
    let resp = get(&app, "/bookings?email=a@b.com").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_credential_is_unauthorized() {
    let (app, _) = build_app();
    let stale = TokenService::with_ttl(SECRET, chrono::Duration::hours(-2));
    let token = stale
        .issue(json!({"email": "a@b.com"}).as_object().cloned().unwrap())
        .unwrap();

    let req = Request::builder()
        .uri("/bookings?email=a@b.com")
        .header(header::COOKIE, format!("token={token}"))
        .body(Body::empty())
        .unwrap();
    let resp = call(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bookings_listing_enforces_ownership() {
    let (app, store) = build_app();
    for (email, status) in [("a@b.com", "pending"), ("a@b.com", "confirmed"), ("x@y.com", "pending")] {
        store
            .insert_one(BOOKINGS, doc(json!({"customer_email": email, "status": status})))
            .await
            .unwrap();
    }

    let cookie = login_cookie(&app, "a@b.com").await;

    // someone else's bookings: forbidden
    let req = Request::builder()
        .uri("/bookings?email=x@y.com")
        .header(header::COOKIE, cookie.clone())
        .body(Body::empty())
        .unwrap();
    assert_eq!(call(&app, req).await.status(), StatusCode::FORBIDDEN);

    // no owner requested: forbidden as well, the route is always scoped
    let req = Request::builder()
        .uri("/bookings")
        .header(header::COOKIE, cookie.clone())
        .body(Body::empty())
        .unwrap();
    assert_eq!(call(&app, req).await.status(), StatusCode::FORBIDDEN);

    // own bookings only
    let req = Request::builder()
        .uri("/bookings?email=a@b.com")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let resp = call(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|b| b["customer_email"] == "a@b.com"));
}

#[tokio::test]
async fn booking_create_update_delete_flow() {
    let (app, store) = build_app();

    // create
    let resp = send_json(
        &app,
        "POST",
        "/bookings",
        &json!({"customer_email": "a@b.com", "status": "pending", "date": "2026-09-01"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["acknowledged"], true);
    let id = body["inserted_id"].as_str().unwrap().to_string();

    // update status only
    let resp = send_json(&app, "PATCH", &format!("/booking/{id}"), &json!({"status": "confirmed"})).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["matched_count"], 1);
    assert_eq!(body["modified_count"], 1);

    let stored = store
        .find_one(BOOKINGS, store::DocumentId::parse(&id).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.get("status").and_then(|v| v.as_str()), Some("confirmed"));
    assert_eq!(stored.get("date").and_then(|v| v.as_str()), Some("2026-09-01"));

    // repeating the same update modifies nothing
    let resp = send_json(&app, "PATCH", &format!("/booking/{id}"), &json!({"status": "confirmed"})).await;
    let body = body_json(resp).await;
    assert_eq!(body["matched_count"], 1);
    assert_eq!(body["modified_count"], 0);

    // delete twice: second is a zero-count success
    let resp = call(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/booking/{id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(body_json(resp).await["deleted_count"], 1);

    let resp = call(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/booking/{id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["deleted_count"], 0);
}

#[tokio::test]
async fn booking_update_validation() {
    let (app, _) = build_app();

    // payload without a status field
    let id = uuid::Uuid::new_v4();
    let resp = send_json(&app, "PATCH", &format!("/booking/{id}"), &json!({"state": "confirmed"})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // malformed id
    let resp = send_json(&app, "PATCH", "/booking/oops", &json!({"status": "confirmed"})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // unknown id matches nothing, silently
    let resp = send_json(&app, "PATCH", &format!("/booking/{id}"), &json!({"status": "confirmed"})).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["matched_count"], 0);

    // non-object booking payload
    let resp = send_json(&app, "POST", "/bookings", &json!("nope")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
