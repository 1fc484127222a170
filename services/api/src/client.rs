//! Typed backend client
//!
//! One method per backend endpoint. Every call is a single request: no
//! retry and no timeout beyond the transport default. Failures surface
//! immediately as a `ClientError`.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::{ClientError, ClientResult};
use crate::models::{
    CategoryCheckRequest, CategoryCheckResponse, DecisionExpenseRequest, DeleteExpenseResponse,
    Expense, ExpenseRequest, LoginRequest, LoginResponse, ProfileUpdate, RegisterRequest,
    UserProfile,
};
use crate::transport::{ApiRequest, Transport};

/// Default page size of the per-user category listing
pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// Parsed response body together with the raw text it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub data: T,
    pub raw: String,
}

/// HTTP verb used for the profile update endpoint
///
/// The backend exposes the same update under both verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileMethod {
    Put,
    #[default]
    Post,
}

impl ProfileMethod {
    fn method(self) -> Method {
        match self {
            ProfileMethod::Put => Method::PUT,
            ProfileMethod::Post => Method::POST,
        }
    }
}

/// Typed client over a `Transport`
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Create a new client
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send a request and decode a 2xx JSON body
    async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<Reply<T>> {
        let method = request.method.clone();
        let path = request.path();
        let response = self.transport.execute(request).await.map_err(|e| {
            warn!("{} {} failed: {}", method, path, e);
            e
        })?;

        if !response.is_success() {
            warn!("{} {} returned HTTP {}", method, path, response.status);
            return Err(ClientError::Http {
                status: response.status,
                body: response.body,
            });
        }

        if response.body.trim().is_empty() {
            return Err(ClientError::EmptyResponseBody {
                status: response.status,
                body: response.body,
            });
        }

        let data = match serde_json::from_str(&response.body) {
            Ok(data) => data,
            Err(e) => {
                warn!("{} {} returned an unreadable body: {}", method, path, e);
                return Err(ClientError::EmptyResponseBody {
                    status: response.status,
                    body: response.body,
                });
            }
        };

        Ok(Reply {
            data,
            raw: response.body,
        })
    }

    /// POST /auth/login-json
    pub async fn login(&self, credentials: &LoginRequest) -> ClientResult<Reply<LoginResponse>> {
        info!("Logging in user: {}", credentials.email);
        let request = ApiRequest::new(Method::POST, ["auth", "login-json"]).json(credentials)?;
        self.send(request).await
    }

    /// POST /auth/register
    pub async fn register(&self, payload: &RegisterRequest) -> ClientResult<Reply<UserProfile>> {
        info!("Registering user: {}", payload.email);
        let request = ApiRequest::new(Method::POST, ["auth", "register"]).json(payload)?;
        self.send(request).await
    }

    /// POST /gastos
    pub async fn create_expense(
        &self,
        token: &str,
        payload: &ExpenseRequest,
    ) -> ClientResult<Reply<Expense>> {
        let request = ApiRequest::new(Method::POST, ["gastos"])
            .bearer(token)
            .json(payload)?;
        self.send(request).await
    }

    /// GET /gastos/usuario/{user_id}/categoria/{category}?limite=N
    pub async fn expenses_by_user_category(
        &self,
        token: &str,
        user_id: i64,
        category: &str,
        limit: u32,
    ) -> ClientResult<Reply<Vec<Expense>>> {
        let request = ApiRequest::new(
            Method::GET,
            [
                "gastos".to_string(),
                "usuario".to_string(),
                user_id.to_string(),
                "categoria".to_string(),
                category.to_string(),
            ],
        )
        .query("limite", limit)
        .bearer(token);
        self.send(request).await
    }

    /// GET /gastos/usuario for the authenticated user
    pub async fn expenses_for_current_user(
        &self,
        token: &str,
    ) -> ClientResult<Reply<Vec<Expense>>> {
        let request = ApiRequest::new(Method::GET, ["gastos", "usuario"]).bearer(token);
        self.send(request).await
    }

    /// GET /gastos/usuario/categoria/{category} for the authenticated user
    pub async fn expenses_by_category(
        &self,
        token: &str,
        category: &str,
    ) -> ClientResult<Reply<Vec<Expense>>> {
        let request = ApiRequest::new(Method::GET, ["gastos", "usuario", "categoria", category])
            .bearer(token);
        self.send(request).await
    }

    /// PUT /gastos/{id}?usuario_id=N
    pub async fn update_expense(
        &self,
        token: &str,
        expense_id: i64,
        user_id: i64,
        payload: &ExpenseRequest,
    ) -> ClientResult<Reply<Expense>> {
        let request = ApiRequest::new(Method::PUT, ["gastos".to_string(), expense_id.to_string()])
            .query("usuario_id", user_id)
            .bearer(token)
            .json(payload)?;
        self.send(request).await
    }

    /// DELETE /gastos/{id}?usuario_id=N
    pub async fn delete_expense(
        &self,
        token: &str,
        expense_id: i64,
        user_id: i64,
    ) -> ClientResult<Reply<DeleteExpenseResponse>> {
        let request =
            ApiRequest::new(Method::DELETE, ["gastos".to_string(), expense_id.to_string()])
                .query("usuario_id", user_id)
                .bearer(token);
        self.send(request).await
    }

    /// POST /ml/verificar-categoria
    pub async fn verify_category(
        &self,
        token: &str,
        payload: &CategoryCheckRequest,
    ) -> ClientResult<Reply<CategoryCheckResponse>> {
        let request = ApiRequest::new(Method::POST, ["ml", "verificar-categoria"])
            .bearer(token)
            .json(payload)?;
        self.send(request).await
    }

    /// POST /gastos/crear-con-decision
    pub async fn create_expense_with_decision(
        &self,
        token: &str,
        payload: &DecisionExpenseRequest,
    ) -> ClientResult<Reply<Expense>> {
        let request = ApiRequest::new(Method::POST, ["gastos", "crear-con-decision"])
            .bearer(token)
            .json(payload)?;
        self.send(request).await
    }

    /// PUT or POST /perfil
    pub async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
        method: ProfileMethod,
    ) -> ClientResult<Reply<UserProfile>> {
        let request = ApiRequest::new(method.method(), ["perfil"])
            .bearer(token)
            .json(update)?;
        self.send(request).await
    }
}
