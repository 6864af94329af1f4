use validator::{ValidationError, ValidationErrors};

pub fn validate_required(value: &String) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("is_required");
        error.message = Some(std::borrow::Cow::from("This field is required"));
        Err(error)
    } else {
        Ok(())
    }
}

pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Default password policy for local accounts. Returns every rule the
/// password breaks, empty when it is acceptable.
pub fn password_policy_violations(password: &str) -> Vec<String> {
    let mut violations = Vec::new();

    if password.chars().count() < PASSWORD_MIN_LENGTH {
        violations.push(format!("Password must be at least {PASSWORD_MIN_LENGTH} characters"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push("Password must contain at least one digit".to_string());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        violations.push("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        violations.push("Password must contain at least one uppercase letter".to_string());
    }
    if password.chars().all(|c| c.is_alphanumeric()) {
        violations
            .push("Password must contain at least one non-alphanumeric character".to_string());
    }

    violations
}

/// Flattens `validator` output into `field: message` lines, sorted for stable output.
pub fn flatten_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{field}: {message}")
            })
        })
        .collect();
    messages.sort();
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_password_satisfies_policy() {
        assert!(password_policy_violations("Password1$").is_empty());
    }

    #[test]
    fn weak_password_reports_every_broken_rule() {
        let violations = password_policy_violations("abc");
        assert_eq!(violations.len(), 4);
        assert!(violations.iter().any(|v| v.contains("at least 6")));
        assert!(violations.iter().any(|v| v.contains("digit")));
        assert!(violations.iter().any(|v| v.contains("uppercase")));
        assert!(violations.iter().any(|v| v.contains("non-alphanumeric")));
    }

    #[test]
    fn blank_value_is_required() {
        assert!(validate_required(&"   ".to_string()).is_err());
        assert!(validate_required(&"Admin".to_string()).is_ok());
    }
}
