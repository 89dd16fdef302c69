use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch page: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // Specific HTTP status code errors
    #[error("Page not found (404): {url}")]
    PageNotFound { url: String },

    #[error("Server error ({status}): {message} (URL: {url})")]
    ServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("Client error ({status}): {message} (URL: {url})")]
    ClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("Rate limit exceeded (429): {message} (URL: {url})")]
    RateLimit { message: String, url: String },

    // Network-specific errors
    #[error("Network timeout while fetching: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    #[error("Page returned an empty body: {url}")]
    EmptyPage { url: String },

    // Game log table errors
    #[error("No table with id '{table_id}' found for player {player_id}")]
    NoTable { player_id: String, table_id: String },

    #[error("Required column '{column}' missing in {file}")]
    MissingColumn { column: String, file: String },

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Player mapping error: {0}")]
    PlayerMapping(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),

    #[error("Background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create a player mapping error with context
    pub fn player_mapping_error(msg: impl Into<String>) -> Self {
        Self::PlayerMapping(msg.into())
    }

    pub fn page_not_found(url: impl Into<String>) -> Self {
        Self::PageNotFound { url: url.into() }
    }

    /// Create a server error (5xx status codes)
    pub fn server_error(status: u16, message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a client error (4xx status codes except 404 and 429)
    pub fn client_error(status: u16, message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    pub fn rate_limit(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::RateLimit {
            message: message.into(),
            url: url.into(),
        }
    }

    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn empty_page(url: impl Into<String>) -> Self {
        Self::EmptyPage { url: url.into() }
    }

    /// Create a "no game log table" error for a player
    pub fn no_table(player_id: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self::NoTable {
            player_id: player_id.into(),
            table_id: table_id.into(),
        }
    }

    pub fn missing_column(column: impl Into<String>, file: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            file: file.into(),
        }
    }

    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Check if error is transient (network issues, server errors, rate limits, blank pages)
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
                | AppError::ServerError { .. }
                | AppError::RateLimit { .. }
                | AppError::EmptyPage { .. }
        )
    }

    /// Check if error means "no data" rather than a technical failure
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::PageNotFound { .. } | AppError::NoTable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_helper() {
        let error = AppError::config_error("Invalid configuration");
        assert!(matches!(error, AppError::Config(_)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration"
        );
    }

    #[test]
    fn test_log_setup_error_helper() {
        let error = AppError::log_setup_error("Failed to initialize logger");
        assert!(matches!(error, AppError::LogSetup(_)));
        assert_eq!(
            error.to_string(),
            "Log setup error: Failed to initialize logger"
        );
    }

    #[test]
    fn test_server_error_helper() {
        let error = AppError::server_error(500, "Internal Server Error", "https://example.com");
        assert!(matches!(error, AppError::ServerError { .. }));
        assert_eq!(
            error.to_string(),
            "Server error (500): Internal Server Error (URL: https://example.com)"
        );
    }

    #[test]
    fn test_no_table_helper() {
        let error = AppError::no_table("jamesle01", "pgl_basic");
        assert!(matches!(error, AppError::NoTable { .. }));
        assert_eq!(
            error.to_string(),
            "No table with id 'pgl_basic' found for player jamesle01"
        );
    }

    #[test]
    fn test_missing_column_helper() {
        let error = AppError::missing_column("Rk", "dataset/csv/jamesle01.csv");
        assert_eq!(
            error.to_string(),
            "Required column 'Rk' missing in dataset/csv/jamesle01.csv"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(AppError::network_timeout("url").is_retryable());
        assert!(AppError::network_connection("url", "message").is_retryable());
        assert!(AppError::server_error(500, "message", "url").is_retryable());
        assert!(AppError::rate_limit("message", "url").is_retryable());
        assert!(AppError::empty_page("url").is_retryable());

        assert!(!AppError::page_not_found("url").is_retryable());
        assert!(!AppError::client_error(400, "message", "url").is_retryable());
        assert!(!AppError::config_error("message").is_retryable());
        assert!(!AppError::no_table("id", "pgl_basic").is_retryable());
    }

    #[test]
    fn test_is_not_found() {
        assert!(AppError::page_not_found("url").is_not_found());
        assert!(AppError::no_table("id", "pgl_basic").is_not_found());

        assert!(!AppError::server_error(500, "message", "url").is_not_found());
        assert!(!AppError::network_timeout("url").is_not_found());
    }

    #[test]
    fn test_error_from_reqwest() {
        let client = reqwest::Client::new();
        let request_result = client.get("not a valid url").build();

        match request_result {
            Err(reqwest_error) => {
                let app_error: AppError = reqwest_error.into();
                assert!(matches!(app_error, AppError::Fetch(_)));
            }
            Ok(_) => panic!("Expected an error from invalid URL"),
        }
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_error: AppError = json_error.into();
        assert!(matches!(app_error, AppError::Json(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
    }

    #[test]
    fn test_error_from_toml_deserialize() {
        let invalid_toml = "invalid = [toml";
        let toml_error = toml::from_str::<serde_json::Value>(invalid_toml).unwrap_err();
        let app_error: AppError = toml_error.into();
        assert!(matches!(app_error, AppError::TomlDeserialize(_)));
    }
}
