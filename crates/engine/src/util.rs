//! Internal helpers for input validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so both storage backends see the same normalized values.

use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Longest accepted profile name, in characters.
pub(crate) const MAX_USER_NAME_LEN: usize = 50;

/// Largest single income or expense amount: 100 billion major units.
pub(crate) const MAX_AMOUNT: Money = Money::new(10_000_000_000_000);

/// Trim and collapse inner whitespace runs; `None` when nothing is left.
pub(crate) fn normalize_display(input: &str) -> Option<String> {
    let mut out = String::new();
    for token in input.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    if out.is_empty() { None } else { Some(out) }
}

/// Key used for case-insensitive name comparisons (category uniqueness).
pub(crate) fn normalize_key(input: &str) -> String {
    normalize_display(input)
        .unwrap_or_default()
        .nfkc()
        .flat_map(char::to_lowercase)
        .collect()
}

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    normalize_display(value)
        .ok_or_else(|| EngineError::InvalidName(format!("{label} name must not be empty")))
}

pub(crate) fn normalize_user_name(value: &str) -> ResultEngine<String> {
    let name = normalize_display(value)
        .ok_or_else(|| EngineError::InvalidName("Name is required".to_string()))?;
    if name.chars().count() > MAX_USER_NAME_LEN {
        return Err(EngineError::InvalidName(format!(
            "Name must be {MAX_USER_NAME_LEN} characters or less"
        )));
    }
    Ok(name)
}

pub(crate) fn validate_expense_amount(amount: Money) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(
            "expense amount must be > 0".to_string(),
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(EngineError::InvalidAmount(format!(
            "expense amount must be <= {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_income(income: Money) -> ResultEngine<()> {
    if income.is_negative() {
        return Err(EngineError::InvalidAmount(
            "income must be >= 0".to_string(),
        ));
    }
    if income > MAX_AMOUNT {
        return Err(EngineError::InvalidAmount(format!(
            "income must be <= {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

/// Fail when the expenses of a profile plus `added` no longer fit in cents.
pub(crate) fn validate_total(
    expenses: impl IntoIterator<Item = Money>,
    added: Money,
) -> ResultEngine<Money> {
    Money::checked_sum(expenses.into_iter().chain(std::iter::once(added))).ok_or_else(|| {
        EngineError::InvalidAmount("total expenses are too large".to_string())
    })
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_collapses_whitespace() {
        assert_eq!(
            normalize_display("  Eating   out "),
            Some("Eating out".to_string())
        );
        assert_eq!(normalize_display("   "), None);
    }

    #[test]
    fn key_is_case_insensitive() {
        assert_eq!(normalize_key("Groceries"), normalize_key(" GROCERIES "));
        assert_ne!(normalize_key("Café"), normalize_key("Cafe"));
    }

    #[test]
    fn user_name_length_is_bounded() {
        assert!(normalize_user_name(&"x".repeat(50)).is_ok());
        assert!(normalize_user_name(&"x".repeat(51)).is_err());
        assert!(normalize_user_name("  ").is_err());
    }

    #[test]
    fn amounts_are_capped() {
        assert!(validate_expense_amount(MAX_AMOUNT).is_ok());
        assert!(validate_expense_amount(Money::new(MAX_AMOUNT.cents() + 1)).is_err());
        assert!(validate_expense_amount(Money::new(i64::MAX)).is_err());
        assert!(validate_income(MAX_AMOUNT).is_ok());
        assert!(validate_income(Money::new(i64::MAX)).is_err());
    }

    #[test]
    fn total_overflow_is_rejected() {
        assert_eq!(
            validate_total([Money::new(100)], Money::new(50)).unwrap(),
            Money::new(150)
        );
        assert!(matches!(
            validate_total([Money::new(i64::MAX)], Money::new(1)),
            Err(EngineError::InvalidAmount(_))
        ));
    }
}
