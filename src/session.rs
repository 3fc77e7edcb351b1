//! UI-side state for one chart form: Idle -> Loading -> Rendered | Failed.

use std::error::Error;
use std::fmt;

use crate::chart::ChartType;
use crate::client::{ChartRequest, ClientError};

pub const RENDER_FAILED: &str = "Error rendering the chart. Please check the Mermaid syntax.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Rendered(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A request is already outstanding.
    Busy,
    InvalidTopic,
    NotLoading,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => f.write_str("a chart is already being generated"),
            Self::InvalidTopic => f.write_str("Please enter a valid topic."),
            Self::NotLoading => f.write_str("no chart generation is in progress"),
        }
    }
}

impl Error for SessionError {}

#[derive(Debug, Clone, Default)]
pub struct ChartSession {
    topic: String,
    chart_type: ChartType,
    phase: Phase,
}

impl ChartSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Diagram text ready for the renderer and for PNG export.
    pub fn diagram(&self) -> Option<&str> {
        match &self.phase {
            Phase::Rendered(diagram) => Some(diagram),
            _ => None,
        }
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
    }

    pub fn set_chart_type(&mut self, chart_type: ChartType) {
        self.chart_type = chart_type;
    }

    /// Start a generation and hand back the request to send.
    pub fn submit(&mut self) -> Result<ChartRequest, SessionError> {
        if self.is_loading() {
            return Err(SessionError::Busy);
        }
        if self.topic.trim().is_empty() {
            return Err(SessionError::InvalidTopic);
        }

        self.phase = Phase::Loading;
        Ok(ChartRequest {
            topic: self.topic.clone(),
            chart_type: self.chart_type,
        })
    }

    pub fn succeed(&mut self, diagram: impl Into<String>) -> Result<(), SessionError> {
        if !self.is_loading() {
            return Err(SessionError::NotLoading);
        }
        self.phase = Phase::Rendered(diagram.into());
        Ok(())
    }

    /// Record a failure. Accepted while loading, or after rendering when the
    /// renderer rejects the diagram.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), SessionError> {
        match self.phase {
            Phase::Loading | Phase::Rendered(_) => {
                self.phase = Phase::Failed(message.into());
                Ok(())
            }
            _ => Err(SessionError::NotLoading),
        }
    }

    pub fn render_failed(&mut self) -> Result<(), SessionError> {
        self.fail(RENDER_FAILED)
    }

    /// Fold the outcome of [`ChartClient::generate`](crate::client::ChartClient::generate).
    pub fn finish(&mut self, outcome: Result<String, ClientError>) -> Result<(), SessionError> {
        match outcome {
            Ok(diagram) => self.succeed(diagram),
            Err(err) => self.fail(err.to_string()),
        }
    }

    /// Back to Idle. Refused while a request is outstanding, so a late
    /// answer can never be taken for a newer request's.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.is_loading() {
            return Err(SessionError::Busy);
        }
        self.phase = Phase::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loading_session() -> ChartSession {
        let mut session = ChartSession::new();
        session.set_topic("Product launch");
        session.submit().unwrap();
        session
    }

    #[test]
    fn starts_idle_with_gantt() {
        let session = ChartSession::new();

        assert_eq!(session.phase(), &Phase::Idle);
        assert_eq!(session.chart_type(), ChartType::Gantt);
    }

    #[test]
    fn submit_moves_to_loading() {
        let mut session = ChartSession::new();
        session.set_topic("Product launch");
        session.set_chart_type(ChartType::Pert);

        let request = session.submit().unwrap();

        assert!(session.is_loading());
        assert_eq!(request.topic, "Product launch");
        assert_eq!(request.chart_type, ChartType::Pert);
    }

    #[test]
    fn blank_topic_is_rejected_without_state_change() {
        let mut session = ChartSession::new();
        session.set_topic("   ");

        assert_eq!(session.submit(), Err(SessionError::InvalidTopic));
        assert_eq!(session.phase(), &Phase::Idle);
    }

    #[test]
    fn second_submit_while_loading_is_rejected() {
        let mut session = loading_session();

        assert_eq!(session.submit(), Err(SessionError::Busy));
        assert!(session.is_loading());
    }

    #[test]
    fn success_renders_diagram() {
        let mut session = loading_session();

        session.succeed("gantt\n  title Launch").unwrap();

        assert_eq!(session.diagram(), Some("gantt\n  title Launch"));
        assert!(session.submit().is_ok());
    }

    #[test]
    fn client_error_becomes_banner() {
        let mut session = loading_session();

        session.finish(Err(ClientError::InvalidTopic)).unwrap();

        assert_eq!(
            session.phase(),
            &Phase::Failed("Please enter a valid topic.".to_string())
        );
    }

    #[test]
    fn renderer_can_reject_a_rendered_diagram() {
        let mut session = loading_session();
        session.succeed("pert\ngraph LR\n").unwrap();

        session.render_failed().unwrap();

        assert_eq!(session.phase(), &Phase::Failed(RENDER_FAILED.to_string()));
        assert_eq!(session.diagram(), None);
    }

    #[test]
    fn outcomes_need_a_pending_request() {
        let mut session = ChartSession::new();

        assert_eq!(session.succeed("gantt"), Err(SessionError::NotLoading));
        assert_eq!(session.fail("boom"), Err(SessionError::NotLoading));
    }

    #[test]
    fn reset_returns_to_idle_and_keeps_inputs() {
        let mut session = loading_session();
        session.fail("boom").unwrap();

        session.reset().unwrap();

        assert_eq!(session.phase(), &Phase::Idle);
        assert_eq!(session.topic(), "Product launch");
    }

    #[test]
    fn reset_is_refused_while_loading() {
        let mut session = loading_session();

        assert_eq!(session.reset(), Err(SessionError::Busy));
        assert!(session.is_loading());
        assert_eq!(session.submit(), Err(SessionError::Busy));
    }
}
