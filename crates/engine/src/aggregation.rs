//! Budget roll-ups used by the chart, the summary cards and the report.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{Expense, Money};

/// Label of the synthetic slice holding income not yet assigned to expenses.
pub const UNALLOCATED_LABEL: &str = "Unallocated";

/// One slice of the spending chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub name: String,
    pub value: Money,
    /// Share of the whole chart (expenses plus unallocated income), 0..=100.
    pub percentage: f64,
    pub unallocated: bool,
}

/// Spending breakdown of a profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    /// Slices sorted by value, largest first.
    pub slices: Vec<Slice>,
    /// Sum of all slices.
    pub total_value: Money,
    /// Sum of expenses only.
    pub total_spent: Money,
}

impl Breakdown {
    /// `true` when there is nothing to chart: no expenses and no income.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Sum expenses per category (exact label match), first-seen order.
pub fn totals_by_category(expenses: &[Expense]) -> Vec<(String, Money)> {
    let mut totals: Vec<(String, Money)> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|(name, _)| *name == expense.category) {
            Some((_, total)) => *total += expense.amount,
            None => totals.push((expense.category.clone(), expense.amount)),
        }
    }
    totals
}

/// Build the chart data for `income` and `expenses`.
///
/// Adds an [`UNALLOCATED_LABEL`] slice when income exceeds total spending.
/// When spending exceeds income no slice is added; see [`Summary`] for the
/// over-budget amount.
pub fn breakdown(income: Money, expenses: &[Expense]) -> Breakdown {
    let mut slices: Vec<Slice> = totals_by_category(expenses)
        .into_iter()
        .map(|(name, value)| Slice {
            name,
            value,
            percentage: 0.0,
            unallocated: false,
        })
        .collect();

    let total_spent: Money = expenses.iter().map(|expense| expense.amount).sum();
    let unallocated = income - total_spent;
    if unallocated.is_positive() {
        slices.push(Slice {
            name: UNALLOCATED_LABEL.to_string(),
            value: unallocated,
            percentage: 0.0,
            unallocated: true,
        });
    }

    // Stable: equal values keep first-seen order.
    slices.sort_by(|a, b| b.value.cmp(&a.value));

    let total_value: Money = slices.iter().map(|slice| slice.value).sum();
    for slice in &mut slices {
        slice.percentage = slice.value.percent_of(total_value);
    }

    Breakdown {
        slices,
        total_value,
        total_spent,
    }
}

/// Headline figures of a month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: Money,
    pub total_expenses: Money,
    /// Income minus expenses. Negative when over budget.
    pub left_to_spend: Money,
    /// Expenses as a share of income; 0 when income is 0.
    pub percent_spent: f64,
    pub over_budget: bool,
}

pub fn summary(income: Money, expenses: &[Expense]) -> Summary {
    let total_expenses: Money = expenses.iter().map(|expense| expense.amount).sum();
    let left_to_spend = income - total_expenses;
    Summary {
        total_income: income,
        total_expenses,
        left_to_spend,
        percent_spent: if income.is_positive() {
            total_expenses.percent_of(income)
        } else {
            0.0
        },
        over_budget: left_to_spend.is_negative(),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    #[default]
    Amount,
    Category,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filter/search/sort options of the expense list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseQuery {
    /// Keep only expenses with exactly this category.
    pub category: Option<String>,
    /// Case-insensitive substring match on name or category.
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

impl ExpenseQuery {
    pub fn apply(&self, expenses: &[Expense]) -> Vec<Expense> {
        let category = self.category.as_deref().filter(|c| !c.is_empty());
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut result: Vec<Expense> = expenses
            .iter()
            .filter(|expense| category.is_none_or(|c| expense.category == c))
            .filter(|expense| {
                search.as_deref().is_none_or(|needle| {
                    expense.name.to_lowercase().contains(needle)
                        || expense.category.to_lowercase().contains(needle)
                })
            })
            .cloned()
            .collect();

        result.sort_by(|a, b| {
            let cmp = match self.sort {
                SortKey::Amount => a.amount.cmp(&b.amount),
                SortKey::Name => compare_text(&a.name, &b.name),
                SortKey::Category => compare_text(&a.category, &b.category),
            };
            match self.order {
                SortOrder::Asc => cmp,
                SortOrder::Desc => cmp.reverse(),
            }
        });
        result
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Distinct category labels used by `expenses`, sorted.
pub fn unique_categories(expenses: &[Expense]) -> Vec<String> {
    let mut categories: Vec<String> = expenses.iter().map(|e| e.category.clone()).collect();
    categories.sort();
    categories.dedup();
    categories
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn expense(name: &str, cents: i64, category: &str) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            name: name.to_string(),
            amount: Money::new(cents),
            category: category.to_string(),
            user_id: Uuid::nil(),
        }
    }

    #[test]
    fn breakdown_groups_and_adds_unallocated() {
        let expenses = vec![
            expense("Rent", 100_000, "Housing"),
            expense("Groceries", 30_000, "Food"),
            expense("Takeaway", 10_000, "Food"),
        ];

        let chart = breakdown(Money::new(200_000), &expenses);

        let names: Vec<_> = chart.slices.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Housing", "Unallocated", "Food"]);
        assert_eq!(chart.slices[1].value, Money::new(60_000));
        assert!(chart.slices[1].unallocated);
        assert_eq!(chart.slices[2].value, Money::new(40_000));
        assert_eq!(chart.total_value, Money::new(200_000));
        assert_eq!(chart.total_spent, Money::new(140_000));
        assert_eq!(chart.slices[0].percentage, 50.0);
    }

    #[test]
    fn breakdown_over_budget_has_no_unallocated_slice() {
        let expenses = vec![expense("Rent", 150_000, "Housing")];
        let chart = breakdown(Money::new(100_000), &expenses);
        assert_eq!(chart.slices.len(), 1);
        assert!(!chart.slices[0].unallocated);
        assert_eq!(chart.slices[0].percentage, 100.0);
    }

    #[test]
    fn breakdown_is_empty_without_income_or_expenses() {
        assert!(breakdown(Money::ZERO, &[]).is_empty());
        let only_income = breakdown(Money::new(500), &[]);
        assert_eq!(only_income.slices.len(), 1);
        assert_eq!(only_income.total_spent, Money::ZERO);
    }

    #[test]
    fn summary_reports_over_budget() {
        let expenses = vec![expense("Rent", 120_000, "Housing")];
        let s = summary(Money::new(100_000), &expenses);
        assert_eq!(s.left_to_spend, Money::new(-20_000));
        assert!(s.over_budget);
        assert_eq!(s.percent_spent, 120.0);

        let s = summary(Money::ZERO, &expenses);
        assert_eq!(s.percent_spent, 0.0);
    }

    #[test]
    fn query_filters_searches_and_sorts() {
        let expenses = vec![
            expense("Rent", 100_000, "Housing"),
            expense("groceries", 30_000, "Food"),
            expense("Takeaway", 10_000, "Food"),
            expense("Bus pass", 5_000, "Transportation"),
        ];

        let food = ExpenseQuery {
            category: Some("Food".to_string()),
            sort: SortKey::Amount,
            order: SortOrder::Asc,
            ..Default::default()
        }
        .apply(&expenses);
        let names: Vec<_> = food.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Takeaway", "groceries"]);

        let search = ExpenseQuery {
            search: Some("OUS".to_string()),
            ..Default::default()
        }
        .apply(&expenses);
        assert_eq!(search.len(), 1);
        assert_eq!(search[0].name, "Rent");

        let by_name = ExpenseQuery {
            sort: SortKey::Name,
            order: SortOrder::Asc,
            ..Default::default()
        }
        .apply(&expenses);
        let names: Vec<_> = by_name.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Bus pass", "groceries", "Rent", "Takeaway"]);
    }

    #[test]
    fn unique_categories_are_sorted_and_distinct() {
        let expenses = vec![
            expense("a", 1, "Food"),
            expense("b", 1, "Housing"),
            expense("c", 1, "Food"),
        ];
        assert_eq!(unique_categories(&expenses), vec!["Food", "Housing"]);
    }
}
