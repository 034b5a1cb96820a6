//! In-process stand-in for the users REST API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use openagri_users::config::ApiConfig;
use openagri_users::domain::UserId;
use openagri_users::models::{CreateUserInput, UpdateUserInput, User};
use openagri_users::repositories::HttpUserRepository;

/// Ids that make the backend fail with a 500.
pub const BROKEN_ID: i64 = 500;

#[derive(Clone, Default)]
pub struct Backend {
    users: Arc<Mutex<Vec<User>>>,
    requests: Arc<Mutex<Vec<String>>>,
    headers: Arc<Mutex<Vec<HeaderMap>>>,
    next_id: Arc<Mutex<i64>>,
    vanish_on_read: Arc<Mutex<Option<i64>>>,
}

impl Backend {
    pub fn seed(&self, username: &str) -> User {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let now = Utc::now();
        let user = User {
            id: UserId::new(*next_id),
            email: format!("{username}@openagri.test"),
            username: username.to_string(),
            full_name: None,
            is_active: true,
            is_superuser: false,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    /// The next read of `id` succeeds, after which the record is gone.
    pub fn vanish_after_read(&self, id: i64) {
        *self.vanish_on_read.lock().unwrap() = Some(id);
    }

    /// `METHOD /path?query` of every request received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Headers of every request received so far, in arrival order.
    pub fn request_headers(&self) -> Vec<HeaderMap> {
        self.headers.lock().unwrap().clone()
    }

    fn log(&self, method: &str, uri: &Uri, headers: &HeaderMap) {
        self.requests.lock().unwrap().push(format!("{method} {uri}"));
        self.headers.lock().unwrap().push(headers.clone());
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .position(|u| u.id.value() == id)
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "detail": "User not found" })),
    )
        .into_response()
}

fn broken() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response()
}

async fn list_users(
    State(backend): State<Backend>,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    backend.log("GET", &uri, &headers);
    let skip: usize = params.get("skip").and_then(|s| s.parse().ok()).unwrap_or(0);
    let limit: usize = params.get("limit").and_then(|s| s.parse().ok()).unwrap_or(100);
    let users: Vec<User> = backend
        .users
        .lock()
        .unwrap()
        .iter()
        .skip(skip)
        .take(limit)
        .cloned()
        .collect();
    Json(users).into_response()
}

async fn get_user(
    State(backend): State<Backend>,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    backend.log("GET", &uri, &headers);
    if id == BROKEN_ID {
        return broken();
    }

    let Some(index) = backend.position(id) else {
        return not_found();
    };

    let vanish = backend.vanish_on_read.lock().unwrap().take_if(|v| *v == id);
    let mut users = backend.users.lock().unwrap();
    let user = if vanish.is_some() {
        users.remove(index)
    } else {
        users[index].clone()
    };
    Json(user).into_response()
}

async fn create_user(
    State(backend): State<Backend>,
    uri: Uri,
    headers: HeaderMap,
    Json(input): Json<CreateUserInput>,
) -> Response {
    backend.log("POST", &uri, &headers);
    let mut user = backend.seed(&input.username);
    user.email = input.email;
    user.full_name = input.full_name;
    let mut users = backend.users.lock().unwrap();
    if let Some(stored) = users.iter_mut().find(|u| u.id == user.id) {
        *stored = user.clone();
    }
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn update_user(
    State(backend): State<Backend>,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<UpdateUserInput>,
) -> Response {
    backend.log("PUT", &uri, &headers);
    let Some(index) = backend.position(id) else {
        return not_found();
    };

    let mut users = backend.users.lock().unwrap();
    let user = &mut users[index];
    if let Some(email) = input.email {
        user.email = email;
    }
    if let Some(username) = input.username {
        user.username = username;
    }
    if input.full_name.is_some() {
        user.full_name = input.full_name;
    }
    if let Some(active) = input.is_active {
        user.is_active = active;
    }
    user.updated_at = Utc::now();
    Json(user.clone()).into_response()
}

async fn delete_user(
    State(backend): State<Backend>,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    backend.log("DELETE", &uri, &headers);
    let Some(index) = backend.position(id) else {
        return not_found();
    };
    backend.users.lock().unwrap().remove(index);
    StatusCode::NO_CONTENT.into_response()
}

pub async fn spawn_backend() -> (Backend, SocketAddr) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/v1/users", get(list_users).post(create_user))
        .route(
            "/api/v1/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock backend crashed");
    });

    (backend, addr)
}

pub fn api_config_for(addr: SocketAddr) -> ApiConfig {
    ApiConfig {
        base_url: format!("http://{addr}/api/v1"),
        ..ApiConfig::default()
    }
}

pub fn repository_for(addr: SocketAddr) -> HttpUserRepository {
    HttpUserRepository::new(&api_config_for(addr)).expect("Failed to build repository")
}
