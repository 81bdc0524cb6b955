//! Shared HTTP building blocks

mod api_response;
mod validated_json;

pub use api_response::{ApiError, ApiResponse};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
