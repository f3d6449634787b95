use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl SwapError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SwapError::NotFound(_))
    }
}
