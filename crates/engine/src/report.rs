//! Printable monthly report.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::{
    Expense, User,
    aggregation::{summary, totals_by_category},
};

const RULE_WIDTH: usize = 60;

/// Render the monthly report of `user` as plain text.
///
/// `expenses` are listed in the given order; callers usually pass them
/// sorted by amount, largest first.
pub fn render_report(user: &User, expenses: &[Expense], date: NaiveDate) -> String {
    let currency = &user.currency;
    let totals = summary(user.income, expenses);
    let mut out = String::new();

    let _ = writeln!(out, "{:^RULE_WIDTH$}", "Monthly Budget Report");
    let _ = writeln!(out, "{:^RULE_WIDTH$}", user.name);
    let _ = writeln!(out, "{:^RULE_WIDTH$}", date.format("%Y-%m-%d").to_string());
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    let _ = writeln!(
        out,
        "{:<20}{:>40}",
        "Total Income",
        totals.total_income.format(currency)
    );
    let _ = writeln!(
        out,
        "{:<20}{:>40}",
        "Total Expenses",
        totals.total_expenses.format(currency)
    );
    let _ = writeln!(
        out,
        "{:<20}{:>40}",
        "Left to Spend",
        totals.left_to_spend.format(currency)
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Spending Breakdown");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    if expenses.is_empty() {
        let _ = writeln!(out, "No expenses recorded.");
    } else {
        for (category, value) in totals_by_category(expenses) {
            let share = value.percent_of(totals.total_expenses);
            let _ = writeln!(
                out,
                "{:<36}{:>5.0}%{:>19}",
                category,
                share,
                value.format(currency)
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Expense Details");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(out, "{:<20}{:<22}{:>18}", "Category", "Item", "Amount");
    for expense in expenses {
        let _ = writeln!(
            out,
            "{:<20}{:<22}{:>18}",
            expense.category,
            expense.name,
            expense.amount.format(currency)
        );
    }

    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "{:^RULE_WIDTH$}", "Generated by easyMoney");
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::{CurrencyCode, Money, NewUser, Theme};

    fn user(income: i64) -> User {
        let mut user = User::new(
            NewUser {
                name: "Alice".to_string(),
                currency: CurrencyCode::try_from("EUR").unwrap(),
                theme: Theme::System,
            },
            Utc::now(),
        );
        user.income = Money::new(income);
        user
    }

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
    fn report_contains_summary_breakdown_and_details() {
        let expenses = vec![
            expense("Rent", 75_000, "Housing"),
            expense("Groceries", 25_000, "Food"),
        ];
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        let report = render_report(&user(200_000), &expenses, date);

        assert!(report.contains("Monthly Budget Report"));
        assert!(report.contains("Alice"));
        assert!(report.contains("2026-03-01"));
        assert!(report.contains("2000.00 EUR"));
        assert!(report.contains("1000.00 EUR"));
        assert!(report.contains("Left to Spend"));
        assert!(report.contains("75%"));
        assert!(report.contains("25%"));
        assert!(report.contains("Rent"));
        assert!(report.contains("Groceries"));
    }

    #[test]
    fn report_shows_negative_left_to_spend_when_over_budget() {
        let expenses = vec![expense("Rent", 150_000, "Housing")];
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let report = render_report(&user(100_000), &expenses, date);
        let line = report
            .lines()
            .find(|line| line.starts_with("Left to Spend"))
            .unwrap();
        assert!(line.ends_with("-500.00 EUR"));
        assert!(!report.contains("Over Budget"));
    }
}
