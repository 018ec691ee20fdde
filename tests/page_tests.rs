use study_assistant_client::page::page_model::{Page, RegionContent, TriggerAction};
use study_assistant_client::page::visibility::{
    Visibility, clear_loading, show_error, show_loading, show_result,
};
use study_assistant_client::render::html::{escape_html, generate_html_page};
use study_assistant_client::workflow::registry::{EXPLAIN_TOPIC, builtin_workflows, find};
use study_assistant_client::workflow::workflow_model::{InputValue, WorkflowConfig};

fn explain() -> WorkflowConfig {
    find(&builtin_workflows(), EXPLAIN_TOPIC).unwrap().clone()
}

// =========================================================================
// Page construction
// =========================================================================

#[test]
fn page_for_builtin_workflows_has_every_region_hidden() {
    let table = builtin_workflows();
    let page = Page::for_workflows(&table);

    for wf in &table {
        for id in wf.regions.all() {
            assert!(page.has_region(id), "missing {}", id);
            assert!(!page.is_visible(id));
            assert_eq!(page.content(id), "");
        }
    }
    assert!(page.has_region("pdfContent"));
    assert!(page.has_trigger("downloadPdfBtn"));
    assert!(page.has_trigger("downloadPdfBtnBottom"));
    assert!(page.trigger("downloadPdfBtn").unwrap().action.is_none());
}

#[test]
fn read_inputs_only_sees_the_workflow_controls() {
    let mut page = Page::new();
    page.set_control("explainTopic", InputValue::text("Entropy"));
    page.set_control("guideTopic", InputValue::text("Unrelated"));

    let inputs = page.read_inputs(&explain());
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs["explainTopic"], InputValue::text("Entropy"));
}

#[test]
fn writes_to_absent_regions_are_reported() {
    let mut page = Page::new();
    assert!(!page.set_html("nowhere", "<p>x</p>"));
    assert!(!page.set_text("nowhere", "x"));
    page.set_visible("nowhere", true);
    assert!(!page.is_visible("nowhere"));
}

#[test]
fn html_and_text_content_are_kept_apart() {
    let mut page = Page::new();
    page.add_region("out");
    page.set_html("out", "<b>bold</b>");
    assert_eq!(
        page.region("out").unwrap().content,
        RegionContent::Html("<b>bold</b>".into())
    );
    page.set_text("out", "<b>bold</b>");
    assert_eq!(
        page.region("out").unwrap().content,
        RegionContent::Text("<b>bold</b>".into())
    );
}

#[test]
fn rebinding_a_trigger_replaces_its_action() {
    let mut page = Page::new();
    page.add_trigger("btn");
    let action = TriggerAction::ExportDocument {
        workflow: "study_guide".into(),
    };
    assert!(page.bind_trigger("btn", action.clone()));
    assert!(page.bind_trigger("btn", action.clone()));
    assert_eq!(page.trigger("btn").unwrap().action, Some(action.clone()));
    assert!(!page.bind_trigger("missing", action));
}

// =========================================================================
// Visibility transitions
// =========================================================================

#[test]
fn loading_then_result() {
    let wf = explain();
    let mut page = Page::for_workflows(std::slice::from_ref(&wf));
    assert_eq!(Visibility::observe(&page, &wf.regions), Visibility::Idle);

    show_loading(&mut page, &wf.regions);
    assert_eq!(Visibility::observe(&page, &wf.regions), Visibility::Loading);

    show_result(&mut page, &wf.regions);
    clear_loading(&mut page, &wf.regions);
    assert_eq!(Visibility::observe(&page, &wf.regions), Visibility::ResultShown);
    assert!(!page.is_visible(&wf.regions.error));
}

#[test]
fn error_hides_result_and_new_submission_hides_both() {
    let wf = explain();
    let mut page = Page::for_workflows(std::slice::from_ref(&wf));

    show_result(&mut page, &wf.regions);
    show_error(&mut page, &wf.regions);
    assert_eq!(Visibility::observe(&page, &wf.regions), Visibility::ErrorShown);
    assert!(!page.is_visible(&wf.regions.result));

    show_loading(&mut page, &wf.regions);
    assert!(!page.is_visible(&wf.regions.result));
    assert!(!page.is_visible(&wf.regions.error));
}

// =========================================================================
// HTML page rendering
// =========================================================================

#[test]
fn escape_html_special_chars() {
    assert_eq!(
        escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
    );
}

#[test]
fn result_page_injects_markup() {
    let wf = explain();
    let mut page = Page::for_workflows(std::slice::from_ref(&wf));
    page.set_html(&wf.regions.result, "<h3>Entropy</h3>");
    show_result(&mut page, &wf.regions);

    let html = generate_html_page(&page, &wf, "Entropy & Order");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Entropy &amp; Order</title>"));
    assert!(html.contains("<div class=\"result\"><h3>Entropy</h3></div>"));
    assert!(html.contains("/explain_topic"));
}

#[test]
fn error_page_escapes_message() {
    let wf = explain();
    let mut page = Page::for_workflows(std::slice::from_ref(&wf));
    page.set_text(&wf.regions.error, "<script>alert(1)</script>");
    show_error(&mut page, &wf.regions);

    let html = generate_html_page(&page, &wf, "Entropy");
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>"));
}

#[test]
fn idle_page_shows_placeholder() {
    let wf = explain();
    let page = Page::for_workflows(std::slice::from_ref(&wf));
    let html = generate_html_page(&page, &wf, "Entropy");
    assert!(html.contains("Nothing to show."));
}
