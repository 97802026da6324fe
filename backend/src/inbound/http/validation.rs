//! Query-string validation for the listing endpoint.
//!
//! Raw parameters arrive as text so that malformed numbers, out-of-range
//! pages and unknown sort values all surface as `invalid_request` envelopes
//! with `details.field` and `details.code`, before any query runs.

use actix_web::{HttpRequest, error::QueryPayloadError, web};
use pagination::{PageRequest, PaginationError};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::{Error, SnapshotQuery, SortKey, SortOrder, UnknownSortValue};

/// Validation error codes for query parameter failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    UnknownSortKey,
    UnknownSortOrder,
    MalformedQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnknownSortKey => "unknown_sort_key",
            ErrorCode::UnknownSortOrder => "unknown_sort_order",
            ErrorCode::MalformedQuery => "malformed_query",
        }
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code,
        }))
    }

    fn with_value(self, code: &str, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code,
        }))
    }
}

/// Raw query parameters accepted by `GET /wiki_history/`.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSnapshotsParams {
    /// Number of records to skip.
    #[param(value_type = Option<i64>, minimum = 0, default = 0)]
    pub skip: Option<String>,
    /// Maximum number of records to return.
    #[param(value_type = Option<i64>, minimum = 0, maximum = 5, default = 5)]
    pub limit: Option<String>,
    /// Case-insensitive substring matched against the title.
    pub title: Option<String>,
    /// Column to order by.
    #[param(value_type = Option<SortKey>)]
    pub sort_by: Option<String>,
    /// Sort direction.
    #[param(value_type = Option<SortOrder>)]
    pub order: Option<String>,
}

pub(crate) fn pagination_error(err: &PaginationError) -> Error {
    let field = err.field();
    let value = match err {
        PaginationError::NotAnInteger { value, .. } => value.clone(),
        PaginationError::NegativeSkip { value } | PaginationError::LimitOutOfRange { value, .. } => {
            value.to_string()
        }
    };
    ValidationError::new(field, err.to_string()).with_value(err.code(), value)
}

pub(crate) fn unknown_sort_error(err: UnknownSortValue) -> Error {
    let code = if err.field == "order" {
        ErrorCode::UnknownSortOrder
    } else {
        ErrorCode::UnknownSortKey
    };
    let message = err.to_string();
    ValidationError::new(err.field, message).with_value(code.as_str(), err.value)
}

impl TryFrom<ListSnapshotsParams> for SnapshotQuery {
    type Error = Error;

    fn try_from(params: ListSnapshotsParams) -> Result<Self, Self::Error> {
        let page = PageRequest::parse(params.skip.as_deref(), params.limit.as_deref())
            .map_err(|err| pagination_error(&err))?;
        let sort_by = params
            .sort_by
            .as_deref()
            .map(str::parse::<SortKey>)
            .transpose()
            .map_err(unknown_sort_error)?
            .unwrap_or_default();
        let order = params
            .order
            .as_deref()
            .map(str::parse::<SortOrder>)
            .transpose()
            .map_err(unknown_sort_error)?
            .unwrap_or_default();
        Ok(SnapshotQuery::with_page(page)
            .title_contains(params.title)
            .sorted(sort_by, order))
    }
}

/// Extractor configuration turning query deserialisation failures into the
/// standard error envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ValidationError::new("query", err.to_string())
        .with_code(ErrorCode::MalformedQuery.as_str())
        .into()
}
