//! User profile model and related functionality

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Period a budget amount applies to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetPeriod {
    #[serde(rename = "diario", alias = "DIARIO", alias = "daily")]
    Daily,
    #[serde(rename = "semanal", alias = "SEMANAL", alias = "weekly")]
    Weekly,
    #[serde(rename = "mensual", alias = "MENSUAL", alias = "monthly")]
    Monthly,
}

impl BudgetPeriod {
    /// Wire name of the period
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Daily => "diario",
            BudgetPeriod::Weekly => "semanal",
            BudgetPeriod::Monthly => "mensual",
        }
    }

    /// Number of days the budget covers
    pub fn days(&self) -> u32 {
        match self {
            BudgetPeriod::Daily => 1,
            BudgetPeriod::Weekly => 7,
            BudgetPeriod::Monthly => 30,
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "diario" | "daily" => Ok(BudgetPeriod::Daily),
            "semanal" | "weekly" => Ok(BudgetPeriod::Weekly),
            "mensual" | "monthly" => Ok(BudgetPeriod::Monthly),
            other => Err(format!("Unknown budget period: {}", other)),
        }
    }
}

/// User profile snapshot, replaced wholesale on every fetch or update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(
        rename = "presupuesto",
        default,
        with = "rust_decimal::serde::float_option"
    )]
    pub budget: Option<Decimal>,
    #[serde(rename = "periodo_presupuesto", default)]
    pub budget_period: Option<BudgetPeriod>,
}

/// Profile update payload; absent fields are left untouched by the backend
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
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
