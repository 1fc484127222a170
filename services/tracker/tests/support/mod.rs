//! Shared fixtures for the tracker integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use api::{ApiRequest, ApiResponse, ClientError, ClientResult, Method, Transport};
use async_trait::async_trait;
use common::MemoryStore;
use serde_json::{Value, json};
use tracker::AppState;

pub const TOKEN: &str = "token-123";
pub const USER_ID: i64 = 42;

/// Canned reply for one backend route
pub enum MockReply {
    Json(u16, Value),
    Raw(u16, String),
    NetworkFailure,
}

type Handler = Box<dyn Fn(&ApiRequest) -> MockReply + Send + Sync>;

/// Transport that records every request and answers from a route table
///
/// Unrouted requests get a 404 with a `detail` body.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), Handler>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on<F>(&self, method: Method, path: &str, handler: F)
    where
        F: Fn(&ApiRequest) -> MockReply + Send + Sync + 'static,
    {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Box::new(handler));
    }

    pub fn on_json(&self, method: Method, path: &str, status: u16, body: Value) {
        self.on(method, path, move |_| MockReply::Json(status, body.clone()));
    }

    pub fn fail(&self, method: Method, path: &str) {
        self.on(method, path, |_| MockReply::NetworkFailure);
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<ApiRequest> {
        self.calls()
            .into_iter()
            .filter(|call| call.path() == path)
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        self.calls.lock().unwrap().push(request.clone());

        let reply = match self
            .routes
            .lock()
            .unwrap()
            .get(&(request.method.clone(), request.path()))
        {
            Some(handler) => handler(&request),
            None => MockReply::Json(404, json!({ "detail": "Not found" })),
        };

        match reply {
            MockReply::Json(status, body) => Ok(ApiResponse {
                status,
                body: body.to_string(),
            }),
            MockReply::Raw(status, body) => Ok(ApiResponse { status, body }),
            MockReply::NetworkFailure => {
                Err(ClientError::Transport("connection refused".to_string()))
            }
        }
    }
}

/// Backend expense record
pub fn expense_json(id: i64, description: &str, amount: f64, category: &str) -> Value {
    json!({
        "id": id,
        "descripcion": description,
        "monto": amount,
        "categoria": category,
        "usuario_id": USER_ID,
        "fecha": "2025-07-11T14:30:00",
        "dia_semana": "Friday",
        "hora": 14,
        "es_fin_semana": false,
        "es_recurrente": false,
        "confianza_categoria": 0.92
    })
}

/// Backend answer to the category check
pub fn suggestion_json(original: &str, suggested: &str) -> Value {
    json!({
        "recomendacion": {
            "categoria_original": original,
            "categoria_sugerida": suggested,
            "coincide": original == suggested,
            "mensaje": format!("Suggested category: {}", suggested)
        }
    })
}

/// Decision endpoint that echoes the category the backend would keep
pub fn echo_decision(transport: &MockTransport, id: i64) {
    transport.on(Method::POST, "/gastos/crear-con-decision", move |request| {
        let body = request.body.clone().unwrap_or_default();
        let category = if body["acepta_sugerencia"].as_bool().unwrap_or(false) {
            body["categoria_sugerida"].clone()
        } else {
            body["categoria_original"].clone()
        };
        MockReply::Json(
            201,
            json!({
                "id": id,
                "descripcion": body["descripcion"],
                "monto": body["monto"],
                "categoria": category,
                "usuario_id": USER_ID
            }),
        )
    });
}

pub struct Harness {
    pub state: AppState,
    pub transport: Arc<MockTransport>,
    pub session_store: MemoryStore,
    pub notification_store: MemoryStore,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_stores(MemoryStore::new(), MemoryStore::new()).await
    }

    pub async fn with_stores(session_store: MemoryStore, notification_store: MemoryStore) -> Self {
        let transport = MockTransport::new();
        let state = AppState::new(
            Arc::new(session_store.clone()),
            Arc::new(notification_store.clone()),
            transport.clone(),
        )
        .await;

        Self {
            state,
            transport,
            session_store,
            notification_store,
        }
    }

    pub async fn authenticated() -> Self {
        let harness = Self::new().await;
        harness
            .state
            .session
            .save(TOKEN, USER_ID, None)
            .await
            .unwrap();
        harness
    }
}
