use validator::Validate;

/// An account that has not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct NewAccount {
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    pub name: String,

    pub user_name: String,
    pub normalized_user_name: String,
    pub normalized_email: String,
    pub email_confirmed: bool,

    pub phone_number: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

/// Identity lookups are case-insensitive; store and compare the upper-cased form.
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}
