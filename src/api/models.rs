use serde::{Deserialize, Serialize};

/// Body of `POST /generate-chart`. Fields are optional so that a missing
/// field is reported with the service's own message instead of a
/// deserialization rejection.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateChartRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub chart_type: Option<String>,
}

/// Success/failure wrapper shared by every response of the relay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mermaid_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ChartEnvelope {
    pub fn generated(code: impl Into<String>) -> Self {
        Self {
            success: true,
            mermaid_code: Some(code.into()),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            mermaid_code: None,
            message: Some(message.into()),
        }
    }
}
