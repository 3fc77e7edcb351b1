/// System and user instructions for one chart generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPrompt {
    pub system: String,
    pub user: String,
}

impl ChartPrompt {
    pub fn new(topic: &str, chart_type: &str) -> Self {
        Self {
            system: system_prompt(chart_type),
            user: user_message(topic, chart_type),
        }
    }
}

pub fn system_prompt(chart_type: &str) -> String {
    format!(
        "You are a code-generating assistant. Provide only the code, specifically in Mermaid \
         syntax, for a {chart_type} chart. Do not include any explanations or comments."
    )
}

pub fn user_message(topic: &str, chart_type: &str) -> String {
    format!(
        "Generate Mermaid code for the {chart_type} chart on the topic: {topic}. \
         Return only the code."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_chart_type_and_topic() {
        let prompt = ChartPrompt::new("Office move", "pert");

        assert!(prompt.system.contains("for a pert chart."));
        assert!(prompt.system.contains("Do not include any explanations"));
        assert_eq!(
            prompt.user,
            "Generate Mermaid code for the pert chart on the topic: Office move. Return only the code."
        );
    }
}
