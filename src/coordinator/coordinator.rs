use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::coordinator::error::{CoordinatorError, SubmitError};
use crate::coordinator::response::interpret;
use crate::export::exporter::{EXPORT_FAILED_MESSAGE, ExportError, ExportSettings, export_to_dir};
use crate::page::page_model::{Page, TriggerAction};
use crate::page::visibility::{clear_loading, show_error, show_loading, show_result};
use crate::transport::http::{HttpResponse, Transport, TransportError};
use crate::workflow::error::ConfigError;
use crate::workflow::payload::build_payload;
use crate::workflow::registry::{find, validate_table};
use crate::workflow::workflow_model::{ExportSpec, WorkflowConfig};

/// Identifies one submission of one workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub workflow: String,
    pub generation: u64,
}

/// A submission that has started but not settled.
#[derive(Debug, Clone)]
pub struct Submission {
    pub ticket: Ticket,
    pub endpoint: String,
    pub payload: Value,
}

/// What a settled submission did to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Content was rendered into the result region
    Rendered(String),

    /// Message was written into the error region
    Failed(String),

    /// A newer submission of the same workflow started; the page was left alone
    Stale,
}

/// What activating an export trigger produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    Failed(String),
}

/// Drives the submit → request → render-or-report cycle for a table of workflows.
pub struct FormCoordinator<T: Transport> {
    transport: T,
    workflows: Vec<WorkflowConfig>,
    generations: HashMap<String, u64>,
    export_settings: ExportSettings,
}

impl<T: Transport> FormCoordinator<T> {
    /// Initialise once per page.
    ///
    /// Fails if the table is invalid or names a region or trigger the page
    /// does not have. Every workflow must have its error region.
    pub fn init(page: &Page, workflows: Vec<WorkflowConfig>, transport: T) -> Result<Self, CoordinatorError> {
        validate_table(&workflows)?;

        for wf in &workflows {
            for (kind, id) in [
                ("loading region", &wf.regions.loading),
                ("result region", &wf.regions.result),
                ("error region", &wf.regions.error),
            ] {
                if !page.has_region(id) {
                    return Err(missing(wf, kind, id));
                }
            }
            if let Some(export) = &wf.export {
                if !page.has_region(&export.staging_region) {
                    return Err(missing(wf, "staging region", &export.staging_region));
                }
                if let Some(t) = export.triggers.iter().find(|t| !page.has_trigger(t)) {
                    return Err(missing(wf, "trigger", t));
                }
            }
        }

        info!(workflows = workflows.len(), "form coordinator initialised");
        Ok(Self {
            transport,
            workflows,
            generations: HashMap::new(),
            export_settings: ExportSettings::default(),
        })
    }

    pub fn with_export_settings(mut self, settings: ExportSettings) -> Self {
        self.export_settings = settings;
        self
    }

    pub fn workflows(&self) -> &[WorkflowConfig] {
        &self.workflows
    }

    pub fn workflow(&self, name: &str) -> Option<&WorkflowConfig> {
        find(&self.workflows, name)
    }

    fn require(&self, name: &str) -> Result<&WorkflowConfig, CoordinatorError> {
        self.workflow(name)
            .ok_or_else(|| CoordinatorError::UnknownWorkflow(name.to_string()))
    }

    /// Run one full submission: begin, one request, settle.
    pub fn submit(&mut self, page: &mut Page, workflow: &str) -> Result<Outcome, CoordinatorError> {
        let submission = self.begin(page, workflow)?;
        let result = self
            .transport
            .post_json(&submission.endpoint, &submission.payload);
        self.settle(page, &submission.ticket, result)
    }

    /// Read inputs, build the payload and switch the workflow to loading.
    ///
    /// Starting a submission makes every earlier one of the same workflow stale.
    pub fn begin(&mut self, page: &mut Page, workflow: &str) -> Result<Submission, CoordinatorError> {
        let config = self.require(workflow)?;
        let inputs = page.read_inputs(config);
        let payload = Value::Object(build_payload(config, &inputs));
        let endpoint = config.endpoint.clone();
        let regions = config.regions.clone();

        let generation = self.generations.entry(workflow.to_string()).or_insert(0);
        *generation += 1;
        let ticket = Ticket {
            workflow: workflow.to_string(),
            generation: *generation,
        };

        show_loading(page, &regions);
        debug!(workflow, generation = ticket.generation, %endpoint, %payload, "submission started");

        Ok(Submission {
            ticket,
            endpoint,
            payload,
        })
    }

    /// Apply the outcome of a request to the page.
    ///
    /// A stale ticket changes nothing. Otherwise exactly one of result or
    /// error is shown, then loading is cleared.
    pub fn settle(
        &self,
        page: &mut Page,
        ticket: &Ticket,
        result: Result<HttpResponse, TransportError>,
    ) -> Result<Outcome, CoordinatorError> {
        let current = self.generations.get(&ticket.workflow).copied().unwrap_or(0);
        if ticket.generation != current {
            debug!(
                workflow = %ticket.workflow,
                generation = ticket.generation,
                current,
                "dropping stale response"
            );
            return Ok(Outcome::Stale);
        }

        let config = self.require(&ticket.workflow)?;

        let rendered = result
            .map_err(SubmitError::from)
            .and_then(|response| interpret(&response, config.content_field.as_deref()));

        let outcome = match rendered {
            Ok(content) => {
                page.set_html(&config.regions.result, &content);
                show_result(page, &config.regions);
                if let Some(export) = &config.export {
                    stage_export(page, &config.name, export, &content);
                }
                info!(workflow = %config.name, bytes = content.len(), "result rendered");
                Outcome::Rendered(content)
            }
            Err(e) => {
                error!(workflow = %config.name, error = %e, "submission failed");
                let message = e.user_message();
                report_error(page, config, &message);
                Outcome::Failed(message)
            }
        };

        clear_loading(page, &config.regions);
        Ok(outcome)
    }

    /// Run the action bound to a trigger control.
    pub fn activate(
        &self,
        page: &mut Page,
        trigger: &str,
        today: NaiveDate,
    ) -> Result<ExportOutcome, CoordinatorError> {
        let action = page
            .trigger(trigger)
            .ok_or_else(|| CoordinatorError::UnknownTrigger(trigger.to_string()))?
            .action
            .clone()
            .ok_or_else(|| CoordinatorError::UnboundTrigger(trigger.to_string()))?;

        match action {
            TriggerAction::ExportDocument { workflow } => {
                let config = self.require(&workflow)?;
                let Some(export) = &config.export else {
                    return Err(CoordinatorError::UnboundTrigger(trigger.to_string()));
                };

                match self.export(page, export, today) {
                    Ok(path) => Ok(ExportOutcome::Saved(path)),
                    Err(e) => {
                        error!(workflow = %config.name, error = %e, "Error generating PDF");
                        report_error(page, config, EXPORT_FAILED_MESSAGE);
                        Ok(ExportOutcome::Failed(e.to_string()))
                    }
                }
            }
        }
    }

    fn export(&self, page: &Page, export: &ExportSpec, today: NaiveDate) -> Result<PathBuf, ExportError> {
        let region = page
            .region(&export.staging_region)
            .ok_or_else(|| ExportError::MissingStaging(export.staging_region.clone()))?;
        let staged = region.content.as_str();
        if staged.trim().is_empty() {
            return Err(ExportError::EmptyStaging(export.staging_region.clone()));
        }

        let title = page
            .control(&export.topic_control)
            .and_then(|v| v.as_text())
            .filter(|t| !t.is_empty())
            .unwrap_or(export.fallback_title.as_str());

        export_to_dir(title, staged, today, &self.export_settings)
    }
}

fn missing(wf: &WorkflowConfig, kind: &'static str, id: &str) -> CoordinatorError {
    CoordinatorError::Config(ConfigError::MissingElement {
        workflow: wf.name.clone(),
        kind,
        id: id.to_string(),
    })
}

/// Copy successful content into the staging region and arm the export triggers.
fn stage_export(page: &mut Page, workflow: &str, export: &ExportSpec, content: &str) {
    page.set_html(&export.staging_region, content);
    for trigger in &export.triggers {
        page.set_trigger_visible(trigger, true);
        page.bind_trigger(
            trigger,
            TriggerAction::ExportDocument {
                workflow: workflow.to_string(),
            },
        );
    }
}

/// Write a message into the workflow's error region as plain text.
fn report_error(page: &mut Page, config: &WorkflowConfig, message: &str) {
    if !page.set_text(&config.regions.error, message) {
        warn!(workflow = %config.name, region = %config.regions.error, "error region missing, message dropped");
        return;
    }
    show_error(page, &config.regions);
}
