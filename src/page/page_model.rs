use std::collections::HashMap;

use serde::Serialize;

use crate::workflow::workflow_model::{FormInputs, InputValue, WorkflowConfig};

// ============================================================================
// Regions
// ============================================================================

/// What a region currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RegionContent {
    Empty,

    /// Markup injected as-is
    Html(String),

    /// Plain text, never interpreted as markup
    Text(String),
}

impl RegionContent {
    pub fn as_str(&self) -> &str {
        match self {
            RegionContent::Empty => "",
            RegionContent::Html(s) | RegionContent::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub visible: bool,
    pub content: RegionContent,
}

impl Region {
    fn hidden() -> Self {
        Region {
            visible: false,
            content: RegionContent::Empty,
        }
    }
}

// ============================================================================
// Trigger controls
// ============================================================================

/// Action a trigger control runs when activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TriggerAction {
    /// Export the staged content of the named workflow
    ExportDocument { workflow: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trigger {
    pub visible: bool,
    pub action: Option<TriggerAction>,
}

// ============================================================================
// Page
// ============================================================================

/// In-memory model of the page the workflows drive.
///
/// Regions are display areas (loading indicator, result, error, staging),
/// controls are form inputs, triggers are buttons that run an action.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Page {
    regions: HashMap<String, Region>,
    controls: HashMap<String, InputValue>,
    triggers: HashMap<String, Trigger>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create every region and trigger the given workflows name, all hidden.
    ///
    /// Controls are not created: an unset control reads as absent, which is
    /// what lets optional fields fall back to their defaults.
    pub fn for_workflows(workflows: &[WorkflowConfig]) -> Self {
        let mut page = Page::new();
        for wf in workflows {
            for id in wf.regions.all() {
                page.add_region(id);
            }
            if let Some(export) = &wf.export {
                page.add_region(&export.staging_region);
                for trigger in &export.triggers {
                    page.add_trigger(trigger);
                }
            }
        }
        page
    }

    pub fn add_region(&mut self, id: &str) {
        self.regions.entry(id.to_string()).or_insert_with(Region::hidden);
    }

    pub fn remove_region(&mut self, id: &str) -> Option<Region> {
        self.regions.remove(id)
    }

    pub fn add_trigger(&mut self, id: &str) {
        self.triggers.entry(id.to_string()).or_insert(Trigger {
            visible: false,
            action: None,
        });
    }

    pub fn has_region(&self, id: &str) -> bool {
        self.regions.contains_key(id)
    }

    pub fn has_trigger(&self, id: &str) -> bool {
        self.triggers.contains_key(id)
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Whether a region exists and is shown.
    pub fn is_visible(&self, id: &str) -> bool {
        self.regions.get(id).is_some_and(|r| r.visible)
    }

    /// Current content of a region as a string; empty when absent.
    pub fn content(&self, id: &str) -> &str {
        self.regions.get(id).map(|r| r.content.as_str()).unwrap_or("")
    }

    /// Show or hide a region. Absent regions are ignored.
    pub fn set_visible(&mut self, id: &str, visible: bool) {
        if let Some(region) = self.regions.get_mut(id) {
            region.visible = visible;
        }
    }

    /// Replace a region's content with markup. Returns false if absent.
    pub fn set_html(&mut self, id: &str, html: &str) -> bool {
        self.set_content(id, RegionContent::Html(html.to_string()))
    }

    /// Replace a region's content with plain text. Returns false if absent.
    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        self.set_content(id, RegionContent::Text(text.to_string()))
    }

    fn set_content(&mut self, id: &str, content: RegionContent) -> bool {
        match self.regions.get_mut(id) {
            Some(region) => {
                region.content = content;
                true
            }
            None => false,
        }
    }

    // ---- controls ----

    pub fn set_control(&mut self, id: &str, value: InputValue) {
        self.controls.insert(id.to_string(), value);
    }

    pub fn clear_control(&mut self, id: &str) {
        self.controls.remove(id);
    }

    pub fn control(&self, id: &str) -> Option<&InputValue> {
        self.controls.get(id)
    }

    /// Read the current values of a workflow's controls.
    pub fn read_inputs(&self, workflow: &WorkflowConfig) -> FormInputs {
        workflow
            .controls()
            .filter_map(|id| self.controls.get(id).map(|v| (id.to_string(), v.clone())))
            .collect()
    }

    // ---- triggers ----

    pub fn trigger(&self, id: &str) -> Option<&Trigger> {
        self.triggers.get(id)
    }

    pub fn set_trigger_visible(&mut self, id: &str, visible: bool) {
        if let Some(trigger) = self.triggers.get_mut(id) {
            trigger.visible = visible;
        }
    }

    /// Bind an action to a trigger, replacing any previous one.
    ///
    /// A trigger runs at most one action.
    pub fn bind_trigger(&mut self, id: &str, action: TriggerAction) -> bool {
        match self.triggers.get_mut(id) {
            Some(trigger) => {
                trigger.action = Some(action);
                true
            }
            None => false,
        }
    }
}
