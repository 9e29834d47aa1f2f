use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use lodge_api::{app, middleware::issue_token, AppState, AuthConfig};
use lodge_core::address::{CepAddress, StaticAddressLookup};
use lodge_core::memory::InMemoryStore;
use lodge_core::models::{Room, TicketStatus};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "integration-secret";

fn auth() -> AuthConfig {
    AuthConfig {
        secret: SECRET.to_string(),
        expiration: 3600,
    }
}

fn router(store: &Arc<InMemoryStore>) -> Router {
    let lookup = StaticAddressLookup::new().with(
        "01001000",
        CepAddress {
            logradouro: "Praça da Sé".to_string(),
            complemento: "lado ímpar".to_string(),
            bairro: "Sé".to_string(),
            localidade: "São Paulo".to_string(),
            uf: "SP".to_string(),
        },
    );
    app(AppState::new(store.repositories(), Arc::new(lookup), auth()))
}

fn token(user_id: i32) -> String {
    issue_token(&auth(), user_id).unwrap()
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

struct World {
    store: Arc<InMemoryStore>,
    app: Router,
    hotel_id: i32,
    room: Room,
    other_room: Room,
    full_room: Room,
}

async fn world() -> World {
    let store = InMemoryStore::new();
    let hotel = store.add_hotel("Driven Resort", "https://img/resort.png").await;
    let room = store.add_room(hotel.id, "101", 3).await;
    let other_room = store.add_room(hotel.id, "102", 2).await;
    let full_room = store.add_room(hotel.id, "103", 0).await;

    World {
        app: router(&store),
        store,
        hotel_id: hotel.id,
        room,
        other_room,
        full_room,
    }
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let w = world().await;
    let response = w
        .app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_routes_require_valid_token() {
    let w = world().await;

    for uri in ["/booking", "/hotels", "/hotels/1", "/enrollments"] {
        let (status, _) = send(&w.app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);

        let (status, _) = send(&w.app, Method::GET, uri, Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let forged = issue_token(&AuthConfig { secret: "other".to_string(), expiration: 3600 }, 1).unwrap();
    let (status, body) = send(&w.app, Method::POST, "/booking", Some(&forged), Some(json!({ "roomId": 1 }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_book_view_and_move_room() {
    let w = world().await;
    let user = w.store.add_ticket_holder("ana@example.com", TicketStatus::Paid, false, true).await;
    let t = token(user.id);

    let (status, _) = send(&w.app, Method::GET, "/booking", Some(&t), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&w.app, Method::POST, "/booking", Some(&t), Some(json!({ "roomId": w.room.id }))).await;
    assert_eq!(status, StatusCode::OK);
    let booking_id = body["bookingId"].as_i64().unwrap();

    let (status, body) = send(&w.app, Method::GET, "/booking", Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_i64().unwrap(), booking_id);
    assert_eq!(body["Room"]["id"], json!(w.room.id));
    assert_eq!(body["Room"]["name"], json!("101"));
    assert_eq!(body["Room"]["capacity"], json!(3));
    assert_eq!(body["Room"]["hotelId"], json!(w.hotel_id));

    let uri = format!("/booking/{}", booking_id);
    let (status, body) = send(&w.app, Method::PUT, &uri, Some(&t), Some(json!({ "roomId": w.other_room.id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "bookingId": booking_id }));

    let (_, body) = send(&w.app, Method::GET, "/booking", Some(&t), None).await;
    assert_eq!(body["id"].as_i64().unwrap(), booking_id);
    assert_eq!(body["Room"]["id"], json!(w.other_room.id));
}

#[tokio::test]
async fn test_create_booking_errors() {
    let w = world().await;
    let paid = w.store.add_ticket_holder("paid@example.com", TicketStatus::Paid, false, true).await;
    let remote = w.store.add_ticket_holder("remote@example.com", TicketStatus::Paid, true, false).await;
    let unpaid = w.store.add_ticket_holder("unpaid@example.com", TicketStatus::Reserved, false, true).await;

    let (status, _) = send(&w.app, Method::POST, "/booking", Some(&token(paid.id)), Some(json!({ "roomId": 9999 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for user_id in [paid.id, remote.id, unpaid.id] {
        let (status, _) = send(&w.app, Method::POST, "/booking", Some(&token(user_id)), Some(json!({ "roomId": w.full_room.id }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    for user_id in [remote.id, unpaid.id] {
        for _ in 0..2 {
            let (status, body) = send(&w.app, Method::POST, "/booking", Some(&token(user_id)), Some(json!({ "roomId": w.room.id }))).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body["error"], json!("An in-person, paid ticket is required to book a room"));
        }
    }

    assert_eq!(w.store.booking_count().await, 0);
}

#[tokio::test]
async fn test_update_booking_errors() {
    let w = world().await;
    let ana = w.store.add_ticket_holder("ana@example.com", TicketStatus::Paid, false, true).await;
    let bia = w.store.add_ticket_holder("bia@example.com", TicketStatus::Paid, false, true).await;
    let ana_token = token(ana.id);

    // No booking yet.
    let (status, _) = send(&w.app, Method::PUT, "/booking/1", Some(&ana_token), Some(json!({ "roomId": w.room.id }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = send(&w.app, Method::POST, "/booking", Some(&ana_token), Some(json!({ "roomId": w.room.id }))).await;
    let ana_booking = body["bookingId"].as_i64().unwrap();
    let (_, body) = send(&w.app, Method::POST, "/booking", Some(&token(bia.id)), Some(json!({ "roomId": w.room.id }))).await;
    let bia_booking = body["bookingId"].as_i64().unwrap();

    let (status, _) = send(&w.app, Method::PUT, &format!("/booking/{}", ana_booking), Some(&ana_token), Some(json!({ "roomId": 9999 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&w.app, Method::PUT, &format!("/booking/{}", ana_booking), Some(&ana_token), Some(json!({ "roomId": w.full_room.id }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&w.app, Method::PUT, &format!("/booking/{}", bia_booking), Some(&ana_token), Some(json!({ "roomId": w.other_room.id }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], json!("Booking not found for this user"));
    assert_eq!(w.store.booking(bia_booking as i32).await.unwrap().room_id, w.room.id);

    let (status, body) = send(&w.app, Method::PUT, "/booking/abc", Some(&ana_token), Some(json!({ "roomId": w.room.id }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_requests_answer_json_errors() {
    let w = world().await;
    let user = w.store.add_ticket_holder("ana@example.com", TicketStatus::Paid, false, true).await;
    let t = token(user.id);

    let (status, body) = send(&w.app, Method::GET, "/hotels/abc", Some(&t), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&w.app, Method::POST, "/booking", Some(&t), Some(json!({ "room": 1 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    let (status, body) = send(&w.app, Method::GET, "/enrollments/cep", Some(&t), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    assert_eq!(w.store.booking_count().await, 0);
}

#[tokio::test]
async fn test_hotel_listing() {
    let w = world().await;
    let user = w.store.add_ticket_holder("ana@example.com", TicketStatus::Paid, false, true).await;
    let t = token(user.id);

    let (status, first) = send(&w.app, Method::GET, "/hotels", Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first[0]["id"], json!(w.hotel_id));
    assert_eq!(first[0]["name"], json!("Driven Resort"));
    assert_eq!(first[0]["image"], json!("https://img/resort.png"));
    assert!(first[0]["createdAt"].is_string());

    let (_, second) = send(&w.app, Method::GET, "/hotels", Some(&t), None).await;
    assert_eq!(first, second);

    let (status, body) = send(&w.app, Method::GET, &format!("/hotels/{}", w.hotel_id), Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("Driven Resort"));
    assert_eq!(body["Rooms"].as_array().unwrap().len(), 3);
    assert_eq!(body["Rooms"][0]["id"], json!(w.room.id));

    let (status, _) = send(&w.app, Method::GET, "/hotels/9999", Some(&t), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_hotel_listing_eligibility() {
    let w = world().await;
    let bare = w.store.add_user("bare@example.com").await;
    let (status, _) = send(&w.app, Method::GET, "/hotels", Some(&token(bare.id)), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let kinds = [
        ("unpaid@example.com", TicketStatus::Reserved, false, true),
        ("remote@example.com", TicketStatus::Paid, true, true),
        ("no-hotel@example.com", TicketStatus::Paid, false, false),
    ];
    for (email, status, is_remote, includes_hotel) in kinds {
        let user = w.store.add_ticket_holder(email, status, is_remote, includes_hotel).await;
        let t = token(user.id);

        let (code, _) = send(&w.app, Method::GET, "/hotels", Some(&t), None).await;
        assert_eq!(code, StatusCode::PAYMENT_REQUIRED, "{}", email);
        let (code, _) = send(&w.app, Method::GET, &format!("/hotels/{}", w.hotel_id), Some(&t), None).await;
        assert_eq!(code, StatusCode::PAYMENT_REQUIRED, "{}", email);
    }
}

#[tokio::test]
async fn test_enrollment_flow() {
    let w = world().await;
    let user = w.store.add_user("ana@example.com").await;
    let t = token(user.id);

    let (status, _) = send(&w.app, Method::GET, "/enrollments", Some(&t), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&w.app, Method::GET, "/enrollments/cep?cep=01001000", Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["localidade"], json!("São Paulo"));

    let (status, _) = send(&w.app, Method::GET, "/enrollments/cep?cep=00000000", Some(&t), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let mut payload = json!({
        "name": "Ana",
        "cpf": "12345678909",
        "birthday": "1995-03-10T00:00:00Z",
        "phone": "(11) 99999-9999",
        "address": {
            "cep": "00000000",
            "street": "Praça da Sé",
            "city": "São Paulo",
            "number": "1",
            "state": "SP",
            "neighborhood": "Sé"
        }
    });
    let (status, _) = send(&w.app, Method::POST, "/enrollments", Some(&t), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    payload["address"]["cep"] = json!("01001000");
    let (status, _) = send(&w.app, Method::POST, "/enrollments", Some(&t), Some(payload)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&w.app, Method::GET, "/enrollments", Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("Ana"));
    assert_eq!(body["cpf"], json!("12345678909"));
    assert_eq!(body["address"]["cep"], json!("01001000"));
    assert!(body.get("userId").is_none());
}
