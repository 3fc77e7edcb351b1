use std::error::Error;
use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, info};

use crate::chart::ChartType;
use crate::prompt::ChartPrompt;
use crate::upstream;
use crate::AppState;

use super::models::{ChartEnvelope, GenerateChartRequest};

const GENERATION_FAILED: &str = "Error generating chart code.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField,
    InvalidChartType(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField => f.write_str("Topic and chart type are required."),
            Self::InvalidChartType(_) => {
                f.write_str("Invalid chart type. Please specify either 'gantt' or 'pert'.")
            }
        }
    }
}

impl Error for ValidationError {}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ChartEnvelope::failure(self.to_string())),
        )
            .into_response()
    }
}

/// A request that passed validation. `requested` keeps the chart type as
/// the client spelled it, which is what the model is told.
#[derive(Debug)]
struct ValidRequest<'a> {
    topic: &'a str,
    requested: &'a str,
    chart_type: ChartType,
}

fn validate(payload: &GenerateChartRequest) -> Result<ValidRequest<'_>, ValidationError> {
    let topic = payload.topic.as_deref().map(str::trim).unwrap_or_default();
    let requested = payload.chart_type.as_deref().unwrap_or_default();
    if topic.is_empty() || requested.is_empty() {
        return Err(ValidationError::MissingField);
    }

    let chart_type = requested
        .parse::<ChartType>()
        .map_err(|_| ValidationError::InvalidChartType(requested.to_string()))?;

    Ok(ValidRequest {
        topic,
        requested,
        chart_type,
    })
}

pub async fn generate_chart(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateChartRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            debug!(%rejection, "unreadable generate-chart body");
            return ValidationError::MissingField.into_response();
        }
    };

    let request = match validate(&payload) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };

    info!(chart_type = %request.chart_type, "generating chart");
    let prompt = ChartPrompt::new(request.topic, request.requested);

    match upstream::complete(&state.http, &state.upstream, &prompt).await {
        Ok(code) => (StatusCode::OK, Json(ChartEnvelope::generated(code))).into_response(),
        Err(err) => {
            error!(error = %err, "chart generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChartEnvelope::failure(GENERATION_FAILED)),
            )
                .into_response()
        }
    }
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ChartEnvelope::failure("Not found")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(topic: Option<&str>, chart_type: Option<&str>) -> GenerateChartRequest {
        GenerateChartRequest {
            topic: topic.map(str::to_string),
            chart_type: chart_type.map(str::to_string),
        }
    }

    #[test]
    fn missing_fields_are_rejected() {
        for payload in [
            request(None, Some("gantt")),
            request(Some("Launch"), None),
            request(Some("   "), Some("gantt")),
            request(Some("Launch"), Some("")),
        ] {
            assert_eq!(validate(&payload).unwrap_err(), ValidationError::MissingField);
        }
    }

    #[test]
    fn unknown_chart_type_is_rejected() {
        let payload = request(Some("Launch"), Some("pie"));

        assert_eq!(
            validate(&payload).unwrap_err(),
            ValidationError::InvalidChartType("pie".to_string())
        );
    }

    #[test]
    fn chart_type_is_case_insensitive_and_kept_verbatim() {
        let payload = request(Some("  Launch  "), Some("PERT"));

        let valid = validate(&payload).unwrap();

        assert_eq!(valid.topic, "Launch");
        assert_eq!(valid.requested, "PERT");
        assert_eq!(valid.chart_type, ChartType::Pert);
    }
}
