use std::error::Error;
use std::fmt;

use serde::Serialize;
use tracing::{debug, error};

use crate::chart::ChartType;
use crate::diagram::{normalize, NormalizeError};

/// File name used when a rendered chart is exported as PNG.
pub const PNG_FILENAME: &str = "mermaid_chart.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    pub topic: String,
    pub chart_type: ChartType,
}

/// Failures a caller of the relay can hit. `Display` gives the banner shown
/// to the user.
#[derive(Debug)]
pub enum ClientError {
    InvalidTopic,
    Transport(reqwest::Error),
    Normalize(NormalizeError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTopic => f.write_str("Please enter a valid topic."),
            Self::Transport(_) => f.write_str("An error occurred while generating the chart."),
            Self::Normalize(_) => f.write_str("Error processing the generated chart code."),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTopic => None,
            Self::Transport(err) => Some(err),
            Self::Normalize(err) => Some(err),
        }
    }
}

/// Calls a running relay and prepares its answer for rendering.
#[derive(Debug, Clone)]
pub struct ChartClient {
    endpoint: String,
    http: reqwest::Client,
}

impl ChartClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            endpoint: format!("{}/generate-chart", base_url.trim_end_matches('/')),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn generate(&self, request: &ChartRequest) -> Result<String, ClientError> {
        if request.topic.trim().is_empty() {
            return Err(ClientError::InvalidTopic);
        }

        // error statuses still carry an envelope, so the body is read either way
        let body = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(ClientError::Transport)?
            .text()
            .await
            .map_err(ClientError::Transport)?;
        debug!(bytes = body.len(), "relay responded");

        normalize(&body, request.chart_type).map_err(|err| {
            error!(error = %err, "could not prepare chart");
            ClientError::Normalize(err)
        })
    }
}
