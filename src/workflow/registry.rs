use std::collections::HashSet;

use serde_json::json;

use crate::workflow::error::ConfigError;
use crate::workflow::workflow_model::{ExportSpec, FieldKind, FieldSpec, RegionIds, WorkflowConfig};

pub const STUDY_GUIDE: &str = "study_guide";
pub const PRACTICE_QUESTIONS: &str = "practice_questions";
pub const EXPLAIN_TOPIC: &str = "explain_topic";
pub const SUMMARIZE: &str = "summarize";

/// The four workflows served by the study assistant backend.
pub fn builtin_workflows() -> Vec<WorkflowConfig> {
    vec![study_guide(), practice_questions(), explain_topic(), summarize()]
}

fn study_guide() -> WorkflowConfig {
    WorkflowConfig {
        name: STUDY_GUIDE.into(),
        endpoint: "/create_guide".into(),
        fields: vec![
            FieldSpec::required("guideTopic", "topic"),
            FieldSpec::optional("guideLevel", "level", FieldKind::Text, json!("intermediate")),
            FieldSpec::optional("guideFocus", "focus_areas", FieldKind::Text, json!("")),
        ],
        regions: RegionIds::new("guideLoading", "guideResult", "guideError"),
        content_field: Some("guide".into()),
        export: Some(ExportSpec {
            staging_region: "pdfContent".into(),
            triggers: vec!["downloadPdfBtn".into(), "downloadPdfBtnBottom".into()],
            topic_control: "guideTopic".into(),
            fallback_title: "StudyGuide".into(),
        }),
    }
}

fn practice_questions() -> WorkflowConfig {
    WorkflowConfig {
        name: PRACTICE_QUESTIONS.into(),
        endpoint: "/generate_questions".into(),
        fields: vec![
            FieldSpec::required("questionTopic", "topic"),
            FieldSpec::optional("questionCount", "num_questions", FieldKind::Integer, json!(5)),
            FieldSpec::optional(
                "questionTypes",
                "question_types",
                FieldKind::List,
                json!(["multiple_choice", "true_false", "short_answer"]),
            ),
        ],
        regions: RegionIds::new("questionsLoading", "questionsResult", "questionsError"),
        content_field: Some("questions".into()),
        export: None,
    }
}

fn explain_topic() -> WorkflowConfig {
    WorkflowConfig {
        name: EXPLAIN_TOPIC.into(),
        endpoint: "/explain_topic".into(),
        fields: vec![
            FieldSpec::required("explainTopic", "topic"),
            FieldSpec::optional("explainLevel", "difficulty_level", FieldKind::Text, json!("beginner")),
        ],
        regions: RegionIds::new("explainLoading", "explainResult", "explainError"),
        content_field: Some("explanation".into()),
        export: None,
    }
}

fn summarize() -> WorkflowConfig {
    WorkflowConfig {
        name: SUMMARIZE.into(),
        endpoint: "/summarize_text".into(),
        fields: vec![
            FieldSpec::required("summarizeText", "text"),
            FieldSpec::optional("summaryType", "summary_type", FieldKind::Text, json!("paragraph")),
        ],
        regions: RegionIds::new("summarizeLoading", "summarizeResult", "summarizeError"),
        content_field: Some("summary".into()),
        export: None,
    }
}

/// Validate every entry and reject duplicate names.
pub fn validate_table(workflows: &[WorkflowConfig]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for wf in workflows {
        wf.validate()?;
        if !seen.insert(wf.name.as_str()) {
            return Err(ConfigError::Duplicate(wf.name.clone()));
        }
    }
    Ok(())
}

/// Look up a workflow by name.
pub fn find<'a>(workflows: &'a [WorkflowConfig], name: &str) -> Option<&'a WorkflowConfig> {
    workflows.iter().find(|wf| wf.name == name)
}
