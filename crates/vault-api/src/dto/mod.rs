//! Request and response data transfer objects.

pub mod request;
pub mod response;

use validator::Validate;

use vault_core::error::AppError;

/// Run derive-based validation and convert failures to a `Validation` error.
pub fn validate_request<T: Validate>(request: &T) -> Result<(), AppError> {
    request
        .validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}
