//! Expense models

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Expense record as returned by the backend
///
/// The analytics fields are computed server-side; the client only shows them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: i64,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "monto")]
    pub amount: Decimal,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "usuario_id", default)]
    pub user_id: Option<i64>,
    #[serde(rename = "fecha", default, with = "super::timestamp")]
    pub occurred_at: Option<NaiveDateTime>,
    #[serde(rename = "dia_semana", default)]
    pub day_of_week: Option<String>,
    #[serde(rename = "hora", default)]
    pub hour: Option<u32>,
    #[serde(rename = "es_fin_semana", default)]
    pub is_weekend: Option<bool>,
    #[serde(rename = "es_recurrente", default)]
    pub is_recurring: Option<bool>,
    #[serde(rename = "confianza_categoria", default)]
    pub category_confidence: Option<f64>,
    #[serde(default, with = "super::timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "super::timestamp")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Payload for the simple create endpoint and for edits
///
/// The backend expects the amount and user id as strings here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseRequest {
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "monto")]
    pub amount: Decimal,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "usuario_id")]
    pub user_id: String,
}

/// Payload for creating an expense together with the ML decision
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionExpenseRequest {
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "monto", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "categoria_original")]
    pub original_category: String,
    #[serde(rename = "categoria_sugerida")]
    pub suggested_category: String,
    #[serde(rename = "acepta_sugerencia")]
    pub accepted_suggestion: bool,
}

/// Response for expense deletion
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeleteExpenseResponse {
    #[serde(rename = "mensaje", alias = "message", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
}
