use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::workflow::error::ConfigError;

// ============================================================================
// Form inputs, read fresh from the page at submission time
// ============================================================================

/// Current value of one input control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    /// Text input, textarea, number input or single select.
    Text(String),

    /// Multi-select: the values of the selected options, in order.
    Many(Vec<String>),
}

impl InputValue {
    pub fn text(value: impl Into<String>) -> Self {
        InputValue::Text(value.into())
    }

    pub fn many<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InputValue::Many(values.into_iter().map(Into::into).collect())
    }

    /// An empty string or an empty selection counts as unset.
    pub fn is_empty(&self) -> bool {
        match self {
            InputValue::Text(s) => s.is_empty(),
            InputValue::Many(v) => v.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            InputValue::Text(s) => Some(s),
            InputValue::Many(_) => None,
        }
    }
}

/// Snapshot of a form's controls, keyed by control id.
pub type FormInputs = HashMap<String, InputValue>;

// ============================================================================
// Workflow configuration
// ============================================================================

/// How a control's value is encoded into the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Integer,
    List,
}

/// Maps one input control to one payload field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Id of the input control on the page
    pub control: String,

    /// Key in the JSON request body
    pub payload_field: String,

    #[serde(default)]
    pub kind: FieldKind,

    /// Required fields have no default; they are sent as read
    #[serde(default)]
    pub required: bool,

    /// Substituted when the control is absent or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn required(control: &str, payload_field: &str) -> Self {
        Self {
            control: control.to_string(),
            payload_field: payload_field.to_string(),
            kind: FieldKind::Text,
            required: true,
            default: None,
        }
    }

    pub fn optional(control: &str, payload_field: &str, kind: FieldKind, default: Value) -> Self {
        Self {
            control: control.to_string(),
            payload_field: payload_field.to_string(),
            kind,
            required: false,
            default: Some(default),
        }
    }
}

/// The three mutually exclusive regions of one workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionIds {
    pub loading: String,
    pub result: String,
    pub error: String,
}

impl RegionIds {
    pub fn new(loading: &str, result: &str, error: &str) -> Self {
        Self {
            loading: loading.to_string(),
            result: result.to_string(),
            error: error.to_string(),
        }
    }

    pub fn all(&self) -> [&str; 3] {
        [self.loading.as_str(), self.result.as_str(), self.error.as_str()]
    }
}

/// Export add-on attached to a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSpec {
    /// Region that receives a copy of the successful content
    pub staging_region: String,

    /// Controls revealed and bound to the export action after success
    pub triggers: Vec<String>,

    /// Control whose current value becomes the document title
    pub topic_control: String,

    #[serde(default = "default_fallback_title")]
    pub fallback_title: String,
}

fn default_fallback_title() -> String {
    "StudyGuide".to_string()
}

/// One form-to-endpoint request flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Stable name, used on the command line and in logs
    pub name: String,

    /// Server path, e.g. `/create_guide`
    pub endpoint: String,

    pub fields: Vec<FieldSpec>,

    pub regions: RegionIds,

    /// Response key holding the content to render
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportSpec>,
}

impl WorkflowConfig {
    /// Check the configuration is self-consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                workflow: self.endpoint.clone(),
                reason: "workflow name is empty".into(),
            });
        }
        if !self.endpoint.starts_with('/') {
            return Err(ConfigError::Invalid {
                workflow: self.name.clone(),
                reason: format!("endpoint '{}' must start with '/'", self.endpoint),
            });
        }
        if self.regions.all().iter().any(|id| id.is_empty()) {
            return Err(ConfigError::Invalid {
                workflow: self.name.clone(),
                reason: "region ids must not be empty".into(),
            });
        }
        for field in &self.fields {
            if !field.required && field.default.is_none() {
                return Err(ConfigError::Invalid {
                    workflow: self.name.clone(),
                    reason: format!("optional field '{}' has no default", field.payload_field),
                });
            }
        }
        if let Some(export) = &self.export {
            if export.triggers.is_empty() {
                return Err(ConfigError::Invalid {
                    workflow: self.name.clone(),
                    reason: "export needs at least one trigger control".into(),
                });
            }
        }
        Ok(())
    }

    /// Control ids read at submission time.
    pub fn controls(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.control.as_str())
    }
}
