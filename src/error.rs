pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("An account with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors the user caused and can fix by retrying with other input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::DuplicateEmail(_) | Error::InvalidCredentials | Error::MissingField(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_flagged() {
        assert!(Error::InvalidCredentials.is_validation());
        assert!(Error::DuplicateEmail("a@x.com".into()).is_validation());
        assert!(Error::MissingField("email").is_validation());
        assert!(!Error::NotLoggedIn.is_validation());
        assert!(!Error::Import("bad".into()).is_validation());
    }

    #[test]
    fn duplicate_email_mentions_address() {
        let err = Error::DuplicateEmail("a@x.com".into());
        assert_eq!(
            err.to_string(),
            "An account with email 'a@x.com' already exists"
        );
    }
}
