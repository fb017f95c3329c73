use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use snafu::Snafu;
use std::num::ParseIntError;

pub type ElevesResult<T> = Result<T, ElevesError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ElevesError {
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse upload size limit"))]
    ParseUploadLimit { source: ParseIntError },
    #[snafu(display("Backend URL {:?} must start with http:// or https://", provided))]
    InvalidBackendUrl { provided: String },
    #[snafu(display("Unable to build HTTP client"))]
    BuildHttpClient { source: reqwest::Error },
    #[snafu(display("Invalid timezone {:?}", tz))]
    InvalidTimezone { source: jiff::Error, tz: String },
    #[snafu(display("Invalid locale {:?}", provided))]
    InvalidLocale {
        source: icu::locale::ParseError,
        provided: String,
    },
    #[snafu(display("Unable to create date formatter"))]
    BadDateTimeFormatter {
        source: icu::datetime::DateTimeFormatterLoadError,
    },
    #[snafu(display("Unable to place date {:?} in the configured timezone", original))]
    ZoneDate {
        source: jiff::Error,
        original: String,
    },
    #[snafu(display("Unable to reach the backend at {}", endpoint))]
    BackendUnreachable {
        source: reqwest::Error,
        endpoint: String,
    },
    #[snafu(display("Backend refused {} with {}: {:?}", endpoint, status, message))]
    BackendRejected {
        endpoint: String,
        status: StatusCode,
        message: Option<String>,
    },
    #[snafu(display("Unable to decode backend response from {}", endpoint))]
    BackendBody {
        source: reqwest::Error,
        endpoint: String,
    },
    #[snafu(display("Invalid content type {:?} for the uploaded file", content_type))]
    BadContentType {
        source: reqwest::Error,
        content_type: String,
    },
    #[snafu(display("Unable to find student with ID: {}", id))]
    MissingStudent { id: String },
    #[snafu(display("Student ID {:?} can't be sent as a URL path segment", id))]
    UnaddressableId { id: String },
    #[snafu(display("Error with multipart form input"))]
    Multipart {
        source: axum::extract::multipart::MultipartError,
    },
    #[snafu(display("Error decoding Base64"))]
    B64 { source: base64::DecodeError },
}

impl ElevesError {
    /// Whether the backend answered at all.
    ///
    /// A response that could not be decoded counts as a transport failure, same as no response.
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::BackendUnreachable { .. } | Self::BackendBody { .. }
        )
    }
}

impl IntoResponse for ElevesError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //backend broke

        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"Erreur "}
                    span {(desc)}
                }
            }
        };

        let status_code = match &self {
            Self::BadEnvVar { .. } | Self::ParseUploadLimit { .. } => ISE,
            Self::InvalidBackendUrl { .. } | Self::BuildHttpClient { .. } => ISE,
            Self::InvalidTimezone { .. } | Self::InvalidLocale { .. } => ISE,
            Self::BadDateTimeFormatter { .. } => ISE,
            Self::ZoneDate { .. } => ISE,
            Self::BackendUnreachable { .. } | Self::BackendBody { .. } => BG,
            Self::BackendRejected { status, .. } => *status,
            Self::BadContentType { .. } => BI,
            Self::MissingStudent { .. } => NF,
            Self::UnaddressableId { .. } => BI,
            Self::Multipart { source } => source.status(),
            Self::B64 { .. } => ISE,
        };

        error!(?self, "Error!");
        (status_code, Html(basic_error(self.to_string()).into_string())).into_response()
    }
}
