use sea_orm::SqlErr;
use thiserror::Error;

const UNKNOWN_SERVER_ERROR: &str = "An unknown server error occurred";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")] Database(#[from] sea_orm::DbErr),

    #[error("User not found")]
    UserNotFound,

    #[error("Wallet data API error: {0}")] Upstream(String),

    #[error("HTTP error: {0}")] Http(#[from] reqwest::Error),

    #[error("Decode error: {0}")] Decode(#[from] serde_json::Error),

    #[error("Token not found after scanning {pages} holdings pages")] HoldingsExhausted {
        pages: usize,
    },

    #[error("Telegram error: {0}")] Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Internal error: {0}")] Internal(String),
}

impl AppError {
    /// Text safe to show to a chat user.
    ///
    /// Constraint violations carry a meaningful message and are passed through;
    /// every other database failure is logged and collapsed into a generic notice.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Database(e) =>
                match e.sql_err() {
                    | Some(SqlErr::UniqueConstraintViolation(msg))
                    | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => msg,
                    _ => {
                        tracing::error!("Database error: {}", e);
                        UNKNOWN_SERVER_ERROR.to_string()
                    }
                }
            AppError::UserNotFound => "User not found".to_string(),
            AppError::Upstream(_) | AppError::Http(_) | AppError::Decode(_) =>
                "Wallet data API error. Try again".to_string(),
            AppError::HoldingsExhausted { pages } =>
                format!("Token not found in the first {} pages of holdings", pages),
            _ => UNKNOWN_SERVER_ERROR.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_database_error_is_hidden() {
        let err = AppError::Database(sea_orm::DbErr::Custom("connection reset".to_string()));
        assert_eq!(err.user_message(), UNKNOWN_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_errors_share_notice() {
        let err = AppError::Upstream("Forbidden".to_string());
        assert_eq!(err.user_message(), "Wallet data API error. Try again");

        let err: AppError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert_eq!(err.user_message(), "Wallet data API error. Try again");
    }

    #[test]
    fn test_exhausted_mentions_pages() {
        let err = AppError::HoldingsExhausted { pages: 20 };
        assert!(err.user_message().contains("20"));
    }
}
