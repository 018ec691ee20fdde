use crate::page::page_model::Page;
use crate::workflow::workflow_model::WorkflowConfig;

// ============================================================================
// Standalone HTML page: what the workflow's regions show after a run
// ============================================================================

/// Render a workflow's visible region as a self-contained HTML page.
///
/// The result region is injected as markup, the error region is escaped
/// text, matching how the page itself treats them. Inline CSS only.
pub fn generate_html_page(page: &Page, workflow: &WorkflowConfig, heading: &str) -> String {
    let regions = &workflow.regions;

    let (accent, body) = if page.is_visible(&regions.error) {
        (
            "#f44336",
            format!(
                "<div class=\"error\">{}</div>",
                escape_html(page.content(&regions.error))
            ),
        )
    } else if page.is_visible(&regions.result) {
        (
            "#4CAF50",
            format!("<div class=\"result\">{}</div>", page.content(&regions.result)),
        )
    } else {
        ("#9e9e9e", "<p class=\"empty\">Nothing to show.</p>".to_string())
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{heading}</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 0; background: #f5f5f5; }}
.header {{ background: {accent}; color: white; padding: 20px 30px; }}
.header h1 {{ margin: 0 0 8px 0; font-size: 24px; }}
.header p {{ margin: 0; font-size: 16px; opacity: 0.9; }}
.content {{ max-width: 900px; margin: 20px auto; padding: 16px 20px; background: white; border-radius: 6px; }}
.error {{ color: #c62828; font-weight: bold; }}
.empty {{ color: #666; }}
</style>
</head>
<body>
<div class="header">
<h1>{heading}</h1>
<p>{workflow} &middot; {endpoint}</p>
</div>
<div class="content">
{body}
</div>
</body>
</html>"##,
        heading = escape_html(heading),
        accent = accent,
        workflow = escape_html(&workflow.name),
        endpoint = escape_html(&workflow.endpoint),
        body = body,
    )
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
