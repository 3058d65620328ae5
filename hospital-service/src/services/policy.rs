//! Password policy engine.
//!
//! Pure validation, no I/O. Every path that can set a password (initial
//! issuance, self-service change, reset consumption) must go through
//! [`PasswordPolicy::check`]; the credential service is the single place
//! that writes hashes, so the invocation lives there.

use serde::Serialize;

use crate::services::ServiceError;

/// The special characters accepted by the policy, matching what staff are
/// told in the UI.
pub const SPECIAL_CHARACTERS: &str = "@$!%*?&#";

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A single policy rule a candidate password can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyRule {
    MinLength,
    Lowercase,
    Uppercase,
    Digit,
    SpecialCharacter,
}

impl PolicyRule {
    pub fn description(&self) -> &'static str {
        match self {
            PolicyRule::MinLength => "Password must be at least 8 characters",
            PolicyRule::Lowercase => "Password must contain at least 1 lowercase letter",
            PolicyRule::Uppercase => "Password must contain at least 1 uppercase letter",
            PolicyRule::Digit => "Password must contain at least 1 number",
            PolicyRule::SpecialCharacter => {
                "Password must contain at least 1 special character (@$!%*?&#)"
            }
        }
    }
}

pub struct PasswordPolicy;

impl PasswordPolicy {
    /// Return every rule the candidate fails, in a stable order. Empty iff
    /// the password is acceptable. Rules are independent: failing one never
    /// masks another.
    pub fn validate(candidate: &str) -> Vec<PolicyRule> {
        let mut unmet = Vec::new();

        if candidate.chars().count() < MIN_PASSWORD_LENGTH {
            unmet.push(PolicyRule::MinLength);
        }
        if !candidate.chars().any(|c| c.is_ascii_lowercase()) {
            unmet.push(PolicyRule::Lowercase);
        }
        if !candidate.chars().any(|c| c.is_ascii_uppercase()) {
            unmet.push(PolicyRule::Uppercase);
        }
        if !candidate.chars().any(|c| c.is_ascii_digit()) {
            unmet.push(PolicyRule::Digit);
        }
        if !candidate.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
            unmet.push(PolicyRule::SpecialCharacter);
        }

        unmet
    }

    /// [`Self::validate`] lifted into the service error type.
    pub fn check(candidate: &str) -> Result<(), ServiceError> {
        let unmet = Self::validate(candidate);
        if unmet.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::WeakPassword(unmet))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_passes() {
        assert!(PasswordPolicy::validate("Abcdef1!").is_empty());
        assert!(PasswordPolicy::validate("Ghijkl2@").is_empty());
    }

    #[test]
    fn each_rule_reported_independently() {
        assert_eq!(
            PasswordPolicy::validate("Abcdefg1"),
            vec![PolicyRule::SpecialCharacter]
        );
        assert_eq!(
            PasswordPolicy::validate("abcdefg!"),
            vec![PolicyRule::Uppercase, PolicyRule::Digit]
        );
        assert_eq!(PasswordPolicy::validate("ABCDEFG1@"), vec![PolicyRule::Lowercase]);
        assert_eq!(
            PasswordPolicy::validate("Ab1!"),
            vec![PolicyRule::MinLength]
        );
    }

    #[test]
    fn adding_a_violation_never_clears_another() {
        // "ab1!" fails length + uppercase; removing the digit adds the
        // digit rule while both prior failures remain.
        let fewer = PasswordPolicy::validate("ab1!");
        let more = PasswordPolicy::validate("ab!!");
        for rule in &fewer {
            if *rule != PolicyRule::Digit {
                assert!(more.contains(rule));
            }
        }
        assert!(more.contains(&PolicyRule::Digit));
    }

    #[test]
    fn everything_wrong_reports_all_five() {
        assert_eq!(PasswordPolicy::validate("").len(), 5);
    }

    #[test]
    fn check_maps_to_weak_password() {
        match PasswordPolicy::check("short") {
            Err(ServiceError::WeakPassword(rules)) => assert!(!rules.is_empty()),
            other => panic!("expected WeakPassword, got {:?}", other),
        }
    }
}
