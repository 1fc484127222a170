//! Dashboard statistics over fetched expenses

use std::collections::HashMap;

use api::models::{Expense, UserProfile};
use rust_decimal::Decimal;

/// Share of the daily budget above which spending is flagged
const WARNING_THRESHOLD_PERCENT: i64 = 80;

/// Budget available per day for a profile
///
/// Weekly budgets are spread over 7 days and monthly ones over 30. A
/// profile without budget or period has no daily budget.
pub fn daily_budget(profile: &UserProfile) -> Decimal {
    match (profile.budget, profile.budget_period) {
        (Some(budget), Some(period)) => budget / Decimal::from(period.days()),
        _ => Decimal::ZERO,
    }
}

/// Total spent in one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// Aggregate view of a list of expenses
///
/// Sums saturate at `Decimal::MAX`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSummary {
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
    /// Sorted by descending total, then by category name
    pub by_category: Vec<CategoryTotal>,
}

impl ExpenseSummary {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let total = expenses
            .iter()
            .fold(Decimal::ZERO, |total, e| total.saturating_add(e.amount));
        let count = expenses.len();
        let average = if count == 0 {
            Decimal::ZERO
        } else {
            total / Decimal::from(count as u64)
        };

        let mut totals: HashMap<&str, Decimal> = HashMap::new();
        for expense in expenses {
            let total = totals.entry(expense.category.as_str()).or_default();
            *total = total.saturating_add(expense.amount);
        }

        let mut by_category: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(category, total)| CategoryTotal {
                category: category.to_string(),
                total,
            })
            .collect();
        by_category.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });

        Self {
            total,
            count,
            average,
            by_category,
        }
    }
}

/// Spending compared to the daily budget
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetStatus {
    /// No daily budget configured
    NoBudget,
    Exceeded { over: Decimal },
    NearLimit { percent_used: Decimal },
    WithinBudget { remaining: Decimal },
}

impl BudgetStatus {
    pub fn evaluate(total: Decimal, daily_budget: Decimal) -> Self {
        if daily_budget <= Decimal::ZERO {
            return BudgetStatus::NoBudget;
        }

        if total > daily_budget {
            return BudgetStatus::Exceeded {
                over: total.saturating_sub(daily_budget),
            };
        }

        // total <= daily_budget here, so the ratio is at most one
        let percent_used = (total / daily_budget).saturating_mul(Decimal::ONE_HUNDRED);
        if percent_used > Decimal::from(WARNING_THRESHOLD_PERCENT) {
            BudgetStatus::NearLimit {
                percent_used: percent_used.trunc(),
            }
        } else {
            BudgetStatus::WithinBudget {
                remaining: daily_budget - total,
            }
        }
    }
}
