/**
 * Error Conversion
 *
 * This module is the single catch-all error handler of the server: every
 * `BackendError` returned from a handler or middleware passes through here.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "success": false,
 *   "error": "InvalidTokenError",
 *   "message": "Invalid refresh token"
 * }
 * ```
 *
 * Server errors are logged with full detail at `error`; the body only ever
 * carries a generic message for them.
 */

use axum::{
    response::{IntoResponse, Json, Response},
};

use crate::backend::error::types::BackendError;
use crate::shared::ErrorBody;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = ErrorBody {
            success: false,
            error: self.kind().to_string(),
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}
