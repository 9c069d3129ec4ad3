//! # Validation Module
//!
//! Input validation utilities for fiscal documents.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP façade                                                   │
//! │  └── Type validation (deserialization, no floats for money)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Field rules (lengths, contact shape)                               │
//! │  └── Runs before any device call                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Fiscal register                                               │
//! │  └── Format-level checks by the firmware (FFD tag limits)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kkt_core::validation::{validate_cashier_name, validate_phone};
//!
//! validate_cashier_name("Иванов И.И.").unwrap();
//! assert!(validate_phone("123").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Operator name limit (tag 1021).
pub const MAX_CASHIER_NAME_CHARS: usize = 64;

/// Commodity name limit (tag 1030).
pub const MAX_ITEM_NAME_CHARS: usize = 128;

/// Buyer contact limit (tag 1008).
pub const MAX_CONTACT_CHARS: usize = 64;

/// Minimum digits in a buyer phone number.
pub const MIN_PHONE_DIGITS: usize = 10;

// =============================================================================
// String Validators
// =============================================================================

/// Validates the operator name printed on every document.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
pub fn validate_cashier_name(name: &str) -> ValidationResult<()> {
    validate_text("cashier", name, MAX_CASHIER_NAME_CHARS)
}

/// Validates a commodity name or correction description.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_ITEM_NAME_CHARS)
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    // Limits are in characters, Cyrillic is two bytes in UTF-8.
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a buyer e-mail address.
///
/// ## Rules
/// - `local@domain` with a dot inside the domain
/// - No whitespace
///
/// ```rust
/// use kkt_core::validation::validate_email;
///
/// assert!(validate_email("buyer@example.com").is_ok());
/// assert!(validate_email("buyer@localhost").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().count() > MAX_CONTACT_CHARS {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_CONTACT_CHARS,
        });
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("must contain '@'"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@domain.tld"));
    }
    let dot_inside = domain
        .find('.')
        .map(|i| i > 0 && i < domain.len() - 1)
        .unwrap_or(false);
    if !dot_inside || domain.ends_with('.') {
        return Err(invalid("domain must contain a dot"));
    }

    Ok(())
}

/// Validates a buyer phone number.
///
/// ## Rules
/// - Digits plus `+ - ( )` and spaces
/// - At least 10 digits
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if phone.chars().count() > MAX_CONTACT_CHARS {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: MAX_CONTACT_CHARS,
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '))
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "may contain only digits, spaces and + - ( )".to_string(),
        });
    }

    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < MIN_PHONE_DIGITS {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: format!("needs at least {} digits, got {}", MIN_PHONE_DIGITS, digits),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cash-in / cash-out amount.
pub fn validate_positive_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cashier_name() {
        assert!(validate_cashier_name("Кассир").is_ok());
        assert!(validate_cashier_name("").is_err());
        assert!(validate_cashier_name("   ").is_err());
        // 64 Cyrillic chars is 128 bytes but still within the limit
        assert!(validate_cashier_name(&"Я".repeat(64)).is_ok());
        assert!(validate_cashier_name(&"Я".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Молоко 3.2%").is_ok());
        assert!(validate_item_name(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.ru").is_ok());
        assert!(validate_email("@b.ru").is_err());
        assert!(validate_email("a@.ru").is_err());
        assert!(validate_email("a@b.").is_err());
        assert!(validate_email("a b@c.ru").is_err());
        assert!(validate_email("a@b@c.ru").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+79123456789").is_ok());
        assert!(validate_phone("8 (912) 345-67-89").is_ok());
        assert!(validate_phone("912-34").is_err());
        assert!(validate_phone("+7912345678x").is_err());
    }

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount("amount", Money::from_kopecks(1)).is_ok());
        assert!(validate_positive_amount("amount", Money::zero()).is_err());
        assert!(validate_positive_amount("amount", Money::from_kopecks(-100)).is_err());
    }
}
