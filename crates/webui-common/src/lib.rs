pub mod errors;
pub mod types;

pub use errors::{ConfigError, WebUiError};
pub use types::{BorderMode, Color, Content, Size, PLACEHOLDER_PAGE};

pub type Result<T> = std::result::Result<T, WebUiError>;
