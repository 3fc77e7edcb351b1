use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of chart the model is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Gantt,
    Pert,
}

impl ChartType {
    /// Leading Mermaid keyword for this chart type.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Gantt => "gantt",
            Self::Pert => "pert",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChartType(pub String);

impl fmt::Display for UnknownChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown chart type: {:?}", self.0)
    }
}

impl std::error::Error for UnknownChartType {}

impl FromStr for ChartType {
    type Err = UnknownChartType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gantt" => Ok(Self::Gantt),
            "pert" => Ok(Self::Pert),
            _ => Err(UnknownChartType(s.to_string())),
        }
    }
}
