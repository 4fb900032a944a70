use thiserror::Error;

#[derive(Debug, Error)]
pub enum RolodexError {
    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("{field} must be a finite number")]
    NonFinite { field: String },

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Unsupported import format: {name}")]
    UnsupportedFormat { name: String },

    #[error("Invalid configuration: {message}")]
    ConfigValidation { message: String },

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    #[error("Failed to write configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("DMR lookup failed: {0}")]
    Lookup(String),

    #[error("{0}")]
    Other(String),
}

impl From<figment::Error> for RolodexError {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

pub type RolodexResult<T> = Result<T, RolodexError>;
