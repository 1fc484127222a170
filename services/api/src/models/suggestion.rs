//! ML category verification payloads

use serde::{Deserialize, Serialize};

/// Request for the category verification endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCheckRequest {
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "categoria_usuario")]
    pub user_category: String,
}

/// Response envelope of the category verification endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCheckResponse {
    #[serde(rename = "recomendacion")]
    pub recommendation: CategorySuggestion,
}

/// Category suggested by the backend model for one description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySuggestion {
    #[serde(rename = "categoria_sugerida")]
    pub suggested_category: String,
    #[serde(rename = "categoria_original")]
    pub original_category: String,
    #[serde(rename = "coincide")]
    pub matches: bool,
    #[serde(rename = "mensaje", default)]
    pub message: String,
}
