//! Authentication payloads

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::profile::BudgetPeriod;

/// User login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for user login
///
/// A 2xx answer without `access_token` is a rejected login; `detail`
/// then carries the reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Request for user registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
    #[serde(
        rename = "presupuesto",
        skip_serializing_if = "Option::is_none",
        default,
        with = "rust_decimal::serde::float_option"
    )]
    pub budget: Option<Decimal>,
    #[serde(
        rename = "periodo_presupuesto",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub budget_period: Option<BudgetPeriod>,
}
