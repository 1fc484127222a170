//! Expense workflow service
//!
//! Sequences backend calls for every user action, records each outcome in
//! the notification log and returns a typed result. The ML-checked
//! submission is a two-phase operation: `submit` either creates the
//! expense or hands back a `PendingSuggestion`, which the caller resolves
//! with `resume`. Dropping the pending value abandons the submission.

use std::future::Future;

use api::models::{
    CategoryCheckRequest, CategorySuggestion, DecisionExpenseRequest, DeleteExpenseResponse,
    Expense, ExpenseRequest, LoginRequest, ProfileUpdate, RegisterRequest, UserProfile,
};
use api::{ApiClient, ClientError, ClientResult, ProfileMethod, Reply};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::notifications::{NotificationKind, NotificationLog};
use crate::session::SessionStore;
use crate::validation;

/// Description stored when the user leaves it blank
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// User's answer to a category suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Ignore,
}

/// Submission waiting for the user to accept or ignore a suggestion
///
/// Consumed by `resume`; each handle creates at most one expense.
#[derive(Debug, PartialEq)]
pub struct PendingSuggestion {
    description: String,
    amount: Decimal,
    suggestion: CategorySuggestion,
}

impl PendingSuggestion {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn suggestion(&self) -> &CategorySuggestion {
        &self.suggestion
    }

    pub fn original_category(&self) -> &str {
        &self.suggestion.original_category
    }

    pub fn suggested_category(&self) -> &str {
        &self.suggestion.suggested_category
    }
}

/// Outcome of the first phase of an ML-checked submission
#[derive(Debug, PartialEq)]
pub enum Submission {
    Created(Expense),
    PendingDecision(PendingSuggestion),
}

/// Raw profile form input
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub phone: String,
    pub budget: String,
    pub budget_period: String,
}

/// Raw registration form input
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub budget: String,
    pub budget_period: String,
}

fn normalize_description(description: &str) -> String {
    let description = description.trim();
    if description.is_empty() {
        DEFAULT_DESCRIPTION.to_string()
    } else {
        description.to_string()
    }
}

fn require_category(category: &str) -> ServiceResult<String> {
    let category = category.trim();
    if category.is_empty() {
        return Err(ServiceError::Validation("Category is required".to_string()));
    }
    Ok(category.to_string())
}

/// Expense workflow service
#[derive(Clone)]
pub struct ExpenseService {
    api: ApiClient,
    session: SessionStore,
    notifications: NotificationLog,
}

impl ExpenseService {
    /// Create a new expense service
    pub fn new(api: ApiClient, session: SessionStore, notifications: NotificationLog) -> Self {
        Self {
            api,
            session,
            notifications,
        }
    }

    /// The log this service records into
    pub fn notifications(&self) -> &NotificationLog {
        &self.notifications
    }

    async fn token(&self) -> ServiceResult<String> {
        self.session
            .access_token()
            .await?
            .ok_or(ServiceError::AuthenticationRequired)
    }

    async fn credentials(&self) -> ServiceResult<(String, i64)> {
        let token = self.token().await?;
        let user_id = self
            .session
            .user_id()
            .await?
            .ok_or(ServiceError::AuthenticationRequired)?;
        Ok((token, user_id))
    }

    /// Log a failed backend call and convert it for the caller
    async fn record_failure(&self, title: &str, error: ClientError) -> ServiceError {
        error!("{}: {}", title, error);

        let message = match &error {
            ClientError::Http { status, body } => {
                let detail = error.detail().unwrap_or_else(|| body.trim().to_string());
                if detail.is_empty() {
                    format!("Error {}", status)
                } else {
                    format!("Error {}: {}", status, detail)
                }
            }
            other => other.to_string(),
        };
        let raw = error
            .body()
            .filter(|body| !body.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());

        self.notifications
            .append(NotificationKind::Error, title, message, raw)
            .await;

        error.into()
    }

    async fn call<T>(
        &self,
        failure_title: &str,
        request: impl Future<Output = ClientResult<Reply<T>>>,
    ) -> ServiceResult<Reply<T>> {
        match request.await {
            Ok(reply) => Ok(reply),
            Err(error) => Err(self.record_failure(failure_title, error).await),
        }
    }

    /// Create an expense after checking its category with the backend model
    ///
    /// A matching suggestion creates the expense immediately. A differing
    /// one is returned as `Submission::PendingDecision`. If the check itself
    /// fails, the expense is created with the category as entered.
    pub async fn submit(
        &self,
        description: &str,
        amount: &str,
        category: &str,
    ) -> ServiceResult<Submission> {
        let token = self.token().await?;
        let amount = validation::parse_amount(amount).map_err(ServiceError::Validation)?;
        let category = require_category(category)?;
        let description = normalize_description(description);

        info!("Verifying category {} for new expense", category);
        let check = CategoryCheckRequest {
            description: description.clone(),
            user_category: category.clone(),
        };

        match self.api.verify_category(&token, &check).await {
            Ok(reply) => {
                let suggestion = reply.data.recommendation;
                self.notifications
                    .append(
                        NotificationKind::CategoryVerification,
                        format!("ML verification - {}", suggestion.original_category),
                        suggestion.message.clone(),
                        reply.raw,
                    )
                    .await;

                if suggestion.matches {
                    let request = DecisionExpenseRequest {
                        description,
                        amount,
                        original_category: category,
                        suggested_category: suggestion.suggested_category,
                        accepted_suggestion: true,
                    };
                    let expense = self.create_with_decision(&token, request).await?;
                    return Ok(Submission::Created(expense));
                }

                info!(
                    "Suggested category {} differs from {}, awaiting decision",
                    suggestion.suggested_category, suggestion.original_category
                );
                Ok(Submission::PendingDecision(PendingSuggestion {
                    description,
                    amount,
                    suggestion,
                }))
            }
            Err(error) => {
                warn!("Category verification failed, keeping chosen category");
                self.record_failure("Error in ML verification", error).await;

                let request = DecisionExpenseRequest {
                    description,
                    amount,
                    original_category: category.clone(),
                    suggested_category: category,
                    accepted_suggestion: false,
                };
                let expense = self.create_with_decision(&token, request).await?;
                Ok(Submission::Created(expense))
            }
        }
    }

    /// Resolve a pending suggestion with the user's decision
    pub async fn resume(
        &self,
        pending: PendingSuggestion,
        decision: Decision,
    ) -> ServiceResult<Expense> {
        let token = self.token().await?;
        info!("Resuming submission with decision {:?}", decision);

        let request = DecisionExpenseRequest {
            description: pending.description,
            amount: pending.amount,
            original_category: pending.suggestion.original_category,
            suggested_category: pending.suggestion.suggested_category,
            accepted_suggestion: decision == Decision::Accept,
        };
        self.create_with_decision(&token, request).await
    }

    async fn create_with_decision(
        &self,
        token: &str,
        request: DecisionExpenseRequest,
    ) -> ServiceResult<Expense> {
        let reply = self
            .call(
                "Error creating expense",
                self.api.create_expense_with_decision(token, &request),
            )
            .await?;
        let expense = reply.data;

        let outcome = if request.accepted_suggestion {
            "Accepted ML suggestion"
        } else {
            "Kept chosen category"
        };
        self.notifications
            .append(
                NotificationKind::ExpenseCreatedWithDecision,
                format!("Expense created with ML #{}", expense.id),
                format!("{}: {} - ${:.2}", outcome, expense.category, expense.amount),
                reply.raw,
            )
            .await;

        info!("Created expense {} in {}", expense.id, expense.category);
        Ok(expense)
    }

    /// Create an expense without the ML check
    pub async fn register_expense(
        &self,
        description: &str,
        amount: &str,
        category: &str,
    ) -> ServiceResult<Expense> {
        let (token, user_id) = self.credentials().await?;
        let request = ExpenseRequest {
            description: normalize_description(description),
            amount: validation::parse_amount(amount).map_err(ServiceError::Validation)?,
            category: require_category(category)?,
            user_id: user_id.to_string(),
        };

        let reply = self
            .call(
                "Error registering expense",
                self.api.create_expense(&token, &request),
            )
            .await?;
        let expense = reply.data;

        self.notifications
            .append(
                NotificationKind::ExpenseCreated,
                format!("Expense registered #{}", expense.id),
                format!("{} - ${:.2}", expense.category, expense.amount),
                reply.raw,
            )
            .await;

        Ok(expense)
    }

    /// Edit an existing expense
    pub async fn edit_expense(
        &self,
        expense_id: i64,
        description: &str,
        amount: &str,
        category: &str,
    ) -> ServiceResult<Expense> {
        let (token, user_id) = self.credentials().await?;
        let request = ExpenseRequest {
            description: normalize_description(description),
            amount: validation::parse_amount(amount).map_err(ServiceError::Validation)?,
            category: require_category(category)?,
            user_id: user_id.to_string(),
        };

        info!("Editing expense {}", expense_id);
        let reply = self
            .call(
                "Error editing expense",
                self.api.update_expense(&token, expense_id, user_id, &request),
            )
            .await?;
        let expense = reply.data;

        self.notifications
            .append(
                NotificationKind::ExpenseEdited,
                format!("Expense updated #{}", expense.id),
                format!("{} - ${:.2}", expense.category, expense.amount),
                reply.raw,
            )
            .await;

        Ok(expense)
    }

    /// Delete an expense
    pub async fn delete_expense(&self, expense_id: i64) -> ServiceResult<DeleteExpenseResponse> {
        let (token, user_id) = self.credentials().await?;

        info!("Deleting expense {}", expense_id);
        let reply = self
            .call(
                "Error deleting expense",
                self.api.delete_expense(&token, expense_id, user_id),
            )
            .await?;

        let message = reply
            .data
            .message
            .clone()
            .unwrap_or_else(|| "Expense removed".to_string());
        self.notifications
            .append(
                NotificationKind::ExpenseDeleted,
                format!("Expense deleted #{}", expense_id),
                message,
                reply.raw,
            )
            .await;

        Ok(reply.data)
    }

    async fn record_listing(&self, title: String, reply: Reply<Vec<Expense>>) -> Vec<Expense> {
        self.notifications
            .append(
                NotificationKind::Success,
                title,
                format!("{} expenses loaded", reply.data.len()),
                reply.raw,
            )
            .await;
        reply.data
    }

    /// Every expense of the authenticated user
    pub async fn list_all_expenses(&self) -> ServiceResult<Vec<Expense>> {
        let token = self.token().await?;
        let reply = self
            .call(
                "Error loading expenses",
                self.api.expenses_for_current_user(&token),
            )
            .await?;
        Ok(self.record_listing("Expenses loaded".to_string(), reply).await)
    }

    /// Expenses of the authenticated user in one category
    pub async fn list_expenses_by_category(&self, category: &str) -> ServiceResult<Vec<Expense>> {
        let token = self.token().await?;
        let category = require_category(category)?;
        let reply = self
            .call(
                "Error filtering expenses",
                self.api.expenses_by_category(&token, &category),
            )
            .await?;
        Ok(self
            .record_listing(format!("Expenses in {}", category), reply)
            .await)
    }

    /// Expenses in one category addressed by the stored user id
    pub async fn list_expenses_by_user_category(
        &self,
        category: &str,
        limit: u32,
    ) -> ServiceResult<Vec<Expense>> {
        let (token, user_id) = self.credentials().await?;
        let category = require_category(category)?;
        let reply = self
            .call(
                "Error loading expenses",
                self.api
                    .expenses_by_user_category(&token, user_id, &category, limit),
            )
            .await?;
        Ok(self
            .record_listing(format!("Expenses in {}", category), reply)
            .await)
    }

    /// Validate and send a profile update, then cache the new snapshot
    pub async fn update_profile(
        &self,
        form: &ProfileForm,
        method: ProfileMethod,
    ) -> ServiceResult<UserProfile> {
        let token = self.token().await?;

        validation::validate_name(&form.name).map_err(ServiceError::Validation)?;
        let update = ProfileUpdate {
            name: Some(form.name.trim().to_string()),
            phone: validation::validate_phone(&form.phone).map_err(ServiceError::Validation)?,
            budget: validation::parse_budget(&form.budget).map_err(ServiceError::Validation)?,
            budget_period: Some(
                validation::parse_budget_period(&form.budget_period)
                    .map_err(ServiceError::Validation)?,
            ),
        };

        info!("Updating profile");
        let reply = self
            .call(
                "Error updating profile",
                self.api.update_profile(&token, &update, method),
            )
            .await?;
        let profile = reply.data;
        self.session.save_profile(&profile).await?;

        self.notifications
            .append(
                NotificationKind::Success,
                "Profile updated",
                format!("Profile of {} saved", profile.name),
                reply.raw,
            )
            .await;

        Ok(profile)
    }

    /// Cached profile of the logged-in user
    pub async fn current_profile(&self) -> ServiceResult<Option<UserProfile>> {
        Ok(self.session.user_profile().await?)
    }

    /// Log in and persist the session; returns the user id
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<i64> {
        let email = email.trim();
        validation::validate_email(email).map_err(ServiceError::Validation)?;
        validation::validate_password(password).map_err(ServiceError::Validation)?;

        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let reply = self.api.login(&credentials).await.map_err(|e| {
            warn!("Login failed for {}: {}", email, e);
            ServiceError::from(e)
        })?;
        let response = reply.data;

        let Some(token) = response.access_token else {
            let detail = response
                .detail
                .unwrap_or_else(|| "Incorrect email or password".to_string());
            warn!("Login rejected for {}: {}", email, detail);
            return Err(ServiceError::Validation(detail));
        };
        let user_id = response.user_id.ok_or(ServiceError::EmptyResponseBody)?;

        self.session.save(&token, user_id, None).await?;
        info!("Logged in user {}", user_id);
        Ok(user_id)
    }

    /// Create an account; does not log in
    pub async fn register(&self, form: &RegisterForm) -> ServiceResult<UserProfile> {
        validation::validate_name(&form.name).map_err(ServiceError::Validation)?;
        validation::validate_email(form.email.trim()).map_err(ServiceError::Validation)?;
        validation::validate_new_password(&form.password).map_err(ServiceError::Validation)?;

        let budget_period = if form.budget_period.trim().is_empty() {
            None
        } else {
            Some(
                validation::parse_budget_period(&form.budget_period)
                    .map_err(ServiceError::Validation)?,
            )
        };
        let payload = RegisterRequest {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            phone: validation::validate_phone(&form.phone).map_err(ServiceError::Validation)?,
            budget: validation::parse_budget(&form.budget).map_err(ServiceError::Validation)?,
            budget_period,
        };

        let reply = self.api.register(&payload).await.map_err(|e| {
            warn!("Registration failed for {}: {}", payload.email, e);
            ServiceError::from(e)
        })?;
        info!("Registered user {}", reply.data.id);
        Ok(reply.data)
    }

    /// Forget the stored session
    pub async fn logout(&self) -> ServiceResult<()> {
        self.session.clear().await?;
        Ok(())
    }
}
