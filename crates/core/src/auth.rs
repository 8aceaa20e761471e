#![forbid(unsafe_code)]

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Ok,
    WrongPassword,
    NoUser,
    InvalidInput,
}

impl LoginOutcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::Ok => "logged in",
            Self::WrongPassword => "Invalid password.",
            Self::NoUser => "User not found.",
            Self::InvalidInput => "Please enter both login and password.",
        }
    }
}

pub const PASSWORD_RULES: &str =
    "Password must be at least 6 characters long and contain at least one letter and one number.";

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= 6
        && password.chars().any(char::is_alphabetic)
        && password.chars().any(char::is_numeric)
}

/// Credential checks consumed by the login and signup screens.
pub trait Authenticator {
    type Error;

    fn validate(&self, name: &str, password: &str) -> Result<LoginOutcome, Self::Error>;

    /// Returns `false` when the name is already taken.
    fn create_user(&self, name: &str, password: &str) -> Result<bool, Self::Error>;

    fn is_valid_password(&self, password: &str) -> bool {
        is_valid_password(password)
    }
}
