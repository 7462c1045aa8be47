//! Crate-level error types shared by the token store, hooks, and session client.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-medium failure (quota exceeded, medium unavailable, I/O).
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Token does not follow the header/claims/signature layout or its claims do not decode.
	#[error(transparent)]
	MalformedToken(#[from] crate::auth::MalformedTokenError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] crate::config::SessionConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Endpoint path could not be joined onto the API origin.
	#[error("Endpoint `{path}` cannot be resolved against the API origin.")]
	InvalidEndpoint {
		/// Path that failed to resolve.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The authentication server refused the request.
	#[error("Server rejected the request with status {status}: {message}.")]
	Rejected {
		/// HTTP status code returned by the server.
		status: u16,
		/// Server-supplied message, or a generic description when absent.
		message: String,
	},
	/// A successful response body did not match the expected shape.
	#[error("Server returned a malformed response body.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for Error {
	fn from(e: ReqwestError) -> Self {
		Self::Transport(e.into())
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::{auth::MalformedTokenError, store::StoreError};

	#[test]
	fn store_error_converts_into_crate_error_with_source() {
		let store_error = StoreError::QuotaExceeded { required: 64, quota: 16 };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("64"));

		let source = StdError::source(&error)
			.expect("Crate error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn malformed_token_is_transparent() {
		let error: Error = MalformedTokenError::MissingClaimsSegment.into();

		assert_eq!(error.to_string(), MalformedTokenError::MissingClaimsSegment.to_string());
	}

	#[test]
	fn rejected_error_mentions_status_and_message() {
		let error = Error::Rejected { status: 401, message: "Invalid credentials".into() };

		assert_eq!(
			error.to_string(),
			"Server rejected the request with status 401: Invalid credentials."
		);
	}
}
