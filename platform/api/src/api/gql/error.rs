use std::panic::Location;
use std::sync::Arc;

use async_graphql::ErrorExtensions;

use crate::database::DatabaseError;

pub type Result<T, E = GqlErrorInterface> = std::result::Result<T, E>;

#[derive(Clone)]
pub struct GqlErrorInterface {
	error: GqlError,
	span: tracing::Span,
	location: &'static Location<'static>,
}

impl GqlErrorInterface {
	fn with_location(self, location: &'static Location<'static>) -> Self {
		Self { location, ..self }
	}
}

#[derive(Clone, Debug, thiserror::Error)]
pub enum GqlError {
	/// A database error occurred.
	#[error("database error: {0}")]
	Database(Arc<DatabaseError>),
	/// Not Found
	#[error("{0} not found")]
	NotFound(&'static str),
}

impl From<DatabaseError> for GqlError {
	fn from(err: DatabaseError) -> Self {
		Self::Database(Arc::new(err))
	}
}

impl From<Arc<DatabaseError>> for GqlError {
	fn from(err: Arc<DatabaseError>) -> Self {
		Self::Database(err)
	}
}

impl GqlError {
	pub fn kind(&self) -> &'static str {
		match self {
			GqlError::Database(_) => "Database",
			GqlError::NotFound(_) => "NotFound",
		}
	}

	pub fn message(&self) -> String {
		match self {
			// Storage details stay in the logs.
			GqlError::Database(_) => "database error".to_string(),
			GqlError::NotFound(_) => self.to_string(),
		}
	}
}

impl ErrorExtensions for GqlErrorInterface {
	fn extend(&self) -> async_graphql::Error {
		let err = async_graphql::Error::new(self.error.message()).extend_with(|_, e| {
			e.set("kind", self.error.kind());
			e.set("reason", self.error.message());
		});

		self.span.in_scope(|| match self.error {
			GqlError::Database(_) => {
				tracing::error!(
					error = %self.error,
					location = %self.location,
					"gql error: {}",
					self.error
				);
			}
			GqlError::NotFound(_) => {
				tracing::debug!(
					error = %self.error,
					location = %self.location,
					"gql error: {}",
					self.error
				);
			}
		});

		err
	}
}

impl<T> From<T> for GqlErrorInterface
where
	GqlError: From<T>,
{
	#[track_caller]
	fn from(value: T) -> Self {
		Self {
			error: GqlError::from(value),
			span: tracing::Span::current(),
			location: Location::caller(),
		}
	}
}

impl From<GqlErrorInterface> for async_graphql::Error {
	fn from(err: GqlErrorInterface) -> Self {
		err.extend()
	}
}

pub trait OptionExt<T>: Sized {
	/// Turns a missing value into the error described by `ctx`.
	fn map_err_gql<C>(self, ctx: C) -> Result<T>
	where
		GqlErrorInterface: From<C>;
}

impl<T> OptionExt<T> for std::option::Option<T> {
	#[track_caller]
	fn map_err_gql<C>(self, ctx: C) -> Result<T>
	where
		GqlErrorInterface: From<C>,
	{
		match self {
			Some(v) => Ok(v),
			None => Err(GqlErrorInterface::from(ctx).with_location(Location::caller())),
		}
	}
}
