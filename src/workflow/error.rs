use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Workflow table entry is inconsistent
    #[error("invalid workflow '{workflow}': {reason}")]
    Invalid { workflow: String, reason: String },

    /// Two table entries share a name
    #[error("duplicate workflow name '{0}'")]
    Duplicate(String),

    /// A region or control named by a workflow is not on the page
    #[error("workflow '{workflow}' references missing {kind} '{id}'")]
    MissingElement {
        workflow: String,
        kind: &'static str,
        id: String,
    },
}
