use chrono::Utc;
use tracing::{info, warn};

use crate::cli::config::Settings;
use crate::coordinator::coordinator::{ExportOutcome, FormCoordinator, Outcome};
use crate::page::page_model::Page;
use crate::render::html::generate_html_page;
use crate::transport::http::{HttpTransport, Transport};
use crate::workflow::registry::{EXPLAIN_TOPIC, PRACTICE_QUESTIONS, STUDY_GUIDE, SUMMARIZE, find};
use crate::workflow::workflow_model::{InputValue, WorkflowConfig};

/// Values for one submission, one slot per workflow field in declared order.
///
/// `None` leaves the field's control unset so its default applies.
pub type FieldValues = Vec<Option<InputValue>>;

const MAX_HEADING_CHARS: usize = 80;

// ============================================================================
// Per-workflow subcommands
// ============================================================================

pub fn cmd_guide(
    settings: &Settings,
    topic: &str,
    level: Option<&str>,
    focus: Option<&str>,
    export: bool,
    output_dir: Option<&str>,
    output: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let values: FieldValues = vec![
        Some(InputValue::text(topic)),
        text_opt(level),
        text_opt(focus),
    ];

    let mut settings = settings.clone();
    if let Some(dir) = output_dir {
        settings.export.output_dir = dir.into();
    }

    let transport = build_transport(&settings)?;
    run_workflow(&settings, transport, STUDY_GUIDE, &values, output, export)
}

pub fn cmd_questions(
    settings: &Settings,
    topic: &str,
    count: Option<&str>,
    types: &[String],
    output: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let types = (!types.is_empty()).then(|| InputValue::many(types.iter().cloned()));
    let values: FieldValues = vec![Some(InputValue::text(topic)), text_opt(count), types];

    let transport = build_transport(settings)?;
    run_workflow(settings, transport, PRACTICE_QUESTIONS, &values, output, false)
}

pub fn cmd_explain(
    settings: &Settings,
    topic: &str,
    level: Option<&str>,
    output: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let values: FieldValues = vec![Some(InputValue::text(topic)), text_opt(level)];

    let transport = build_transport(settings)?;
    run_workflow(settings, transport, EXPLAIN_TOPIC, &values, output, false)
}

pub fn cmd_summarize(
    settings: &Settings,
    text: Option<&str>,
    file: Option<&str>,
    summary_type: Option<&str>,
    output: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let text = match (text, file) {
        (Some(t), _) => t.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Err("either --text or --file is required".into()),
    };

    let values: FieldValues = vec![Some(InputValue::text(text)), text_opt(summary_type)];

    let transport = build_transport(settings)?;
    run_workflow(settings, transport, SUMMARIZE, &values, output, false)
}

// ============================================================================
// workflows subcommand
// ============================================================================

/// Describe the configured workflow table, one block per workflow.
pub fn format_workflows(workflows: &[WorkflowConfig]) -> String {
    let mut out = String::new();
    for wf in workflows {
        out.push_str(&format!("{}  POST {}\n", wf.name, wf.endpoint));
        for field in &wf.fields {
            let default = match (&field.default, field.required) {
                (_, true) => "required".to_string(),
                (Some(v), false) => format!("default {}", v),
                (None, false) => "optional".to_string(),
            };
            out.push_str(&format!(
                "  {:<16} <- #{:<16} {:?}, {}\n",
                field.payload_field, field.control, field.kind, default
            ));
        }
        if let Some(export) = &wf.export {
            out.push_str(&format!(
                "  export via #{} -> {}\n",
                export.staging_region,
                export.triggers.join(", ")
            ));
        }
    }
    out
}

pub fn cmd_workflows(settings: &Settings) {
    print!("{}", format_workflows(&settings.workflows));
}

// ============================================================================
// Shared driver
// ============================================================================

/// Populate a page, submit one workflow and report what the page shows.
///
/// `values` bind to the workflow's fields in declared order, so a table
/// loaded from config may rename controls and payload fields freely.
/// Returns whether the result (and the export, when requested) succeeded.
pub fn run_workflow<T: Transport>(
    settings: &Settings,
    transport: T,
    workflow: &str,
    values: &[Option<InputValue>],
    output: Option<&str>,
    export: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let config = find(&settings.workflows, workflow)
        .ok_or_else(|| format!("workflow '{}' is not configured", workflow))?
        .clone();

    let mut page = Page::for_workflows(&settings.workflows);
    fill_controls(&mut page, &config, values)?;

    let mut coordinator = FormCoordinator::init(&page, settings.workflows.clone(), transport)?
        .with_export_settings(settings.export.clone());

    info!(workflow, base_url = %settings.base_url, endpoint = %config.endpoint, "submitting");

    let mut success = match coordinator.submit(&mut page, workflow)? {
        Outcome::Rendered(content) => {
            println!("{}", content);
            true
        }
        Outcome::Failed(message) => {
            eprintln!("Error: {}", message);
            false
        }
        Outcome::Stale => false,
    };

    if success && export {
        success = run_export(&coordinator, &mut page, &config)?;
    }

    if let Some(path) = output {
        let html = generate_html_page(&page, &config, &heading_for(&config, values));
        std::fs::write(path, html)?;
        info!(path, "wrote page");
    }

    Ok(success)
}

fn run_export<T: Transport>(
    coordinator: &FormCoordinator<T>,
    page: &mut Page,
    config: &WorkflowConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let Some(trigger) = config.export.as_ref().and_then(|e| e.triggers.first()) else {
        warn!(workflow = %config.name, "workflow has no export action");
        return Ok(false);
    };

    match coordinator.activate(page, trigger, Utc::now().date_naive())? {
        ExportOutcome::Saved(path) => {
            println!("Saved {}", path.display());
            Ok(true)
        }
        ExportOutcome::Failed(reason) => {
            eprintln!("Error: {} ({})", page.content(&config.regions.error), reason);
            Ok(false)
        }
    }
}

/// Set each value on the control of the field in the same position.
///
/// A value with no field to receive it is an error rather than silently dropped.
fn fill_controls(
    page: &mut Page,
    config: &WorkflowConfig,
    values: &[Option<InputValue>],
) -> Result<(), Box<dyn std::error::Error>> {
    for (i, value) in values.iter().enumerate() {
        let Some(value) = value else { continue };
        let spec = config.fields.get(i).ok_or_else(|| {
            format!(
                "workflow '{}' has {} field(s), no field receives argument {}",
                config.name,
                config.fields.len(),
                i + 1
            )
        })?;
        page.set_control(&spec.control, value.clone());
    }
    Ok(())
}

/// A short first argument (usually the topic) titles the page.
fn heading_for(config: &WorkflowConfig, values: &[Option<InputValue>]) -> String {
    values
        .first()
        .and_then(|v| v.as_ref())
        .and_then(InputValue::as_text)
        .filter(|t| !t.is_empty() && t.chars().count() <= MAX_HEADING_CHARS)
        .map(str::to_string)
        .unwrap_or_else(|| config.name.replace('_', " "))
}

fn text_opt(value: Option<&str>) -> Option<InputValue> {
    value.map(InputValue::text)
}

fn build_transport(settings: &Settings) -> Result<HttpTransport, Box<dyn std::error::Error>> {
    Ok(HttpTransport::new(&settings.base_url, settings.timeout)?)
}
