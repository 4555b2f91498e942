//! Conversions from external infrastructure errors into domain errors.

use linesdk_common::CommonError;
use linesdk_domain::LineSdkError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub LineSdkError);

impl From<InfraError> for LineSdkError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<LineSdkError> for InfraError {
    fn from(value: LineSdkError) -> Self {
        InfraError(value)
    }
}

trait IntoLineSdkError {
    fn into_line_sdk(self) -> LineSdkError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → LineSdkError */
/* -------------------------------------------------------------------------- */

impl IntoLineSdkError for HttpError {
    fn into_line_sdk(self) -> LineSdkError {
        if self.is_timeout() {
            return LineSdkError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return LineSdkError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return LineSdkError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        LineSdkError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_line_sdk())
    }
}

/* -------------------------------------------------------------------------- */
/* CommonError → LineSdkError */
/* -------------------------------------------------------------------------- */

impl IntoLineSdkError for CommonError {
    fn into_line_sdk(self) -> LineSdkError {
        match &self {
            CommonError::Crypto { .. } => LineSdkError::Security(self.to_string()),
            CommonError::Validation { .. } => LineSdkError::InvalidInput(self.to_string()),
        }
    }
}

impl From<CommonError> for InfraError {
    fn from(value: CommonError) -> Self {
        InfraError(value.into_line_sdk())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → LineSdkError */
/* -------------------------------------------------------------------------- */

impl IntoLineSdkError for std::io::Error {
    fn into_line_sdk(self) -> LineSdkError {
        match self.kind() {
            std::io::ErrorKind::NotFound => LineSdkError::NotFound(self.to_string()),
            std::io::ErrorKind::PermissionDenied => LineSdkError::Security(self.to_string()),
            _ => LineSdkError::Internal(format!("I/O failure: {self}")),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_line_sdk())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
