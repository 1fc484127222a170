//! Input validation utilities

use std::str::FromStr;
use std::sync::OnceLock;

use api::models::BudgetPeriod;
use regex::Regex;
use rust_decimal::Decimal;

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a password entered at login
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    Ok(())
}

/// Validate the password chosen at registration
pub fn validate_new_password(password: &str) -> Result<(), String> {
    validate_password(password)?;

    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.chars().count() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate display name
pub fn validate_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if name.chars().count() < 2 {
        return Err("Name must be at least 2 characters long".to_string());
    }

    Ok(())
}

/// Validate an optional phone number; blank means "not provided"
pub fn validate_phone(phone: &str) -> Result<Option<String>, String> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Ok(None);
    }

    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex =
        PHONE_REGEX.get_or_init(|| Regex::new(r"^\d{10}$").expect("Failed to compile phone regex"));

    if !regex.is_match(phone) {
        return Err("Phone number must have exactly 10 digits".to_string());
    }

    Ok(Some(phone.to_string()))
}

/// Parse an optional budget; blank means "not provided"
pub fn parse_budget(budget: &str) -> Result<Option<Decimal>, String> {
    let budget = budget.trim();
    if budget.is_empty() {
        return Ok(None);
    }

    match Decimal::from_str(budget) {
        Ok(value) if !value.is_sign_negative() => Ok(Some(value)),
        _ => Err("Budget must be a positive number or zero".to_string()),
    }
}

/// Parse a budget period
pub fn parse_budget_period(period: &str) -> Result<BudgetPeriod, String> {
    period
        .parse()
        .map_err(|_| "Budget period must be daily, weekly or monthly".to_string())
}

/// Parse an expense amount
pub fn parse_amount(amount: &str) -> Result<Decimal, String> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err("Amount is required".to_string());
    }

    match Decimal::from_str(amount) {
        Ok(value) if value > Decimal::ZERO => Ok(value),
        Ok(_) => Err("Amount must be greater than zero".to_string()),
        Err(_) => Err("Amount must be a number".to_string()),
    }
}
