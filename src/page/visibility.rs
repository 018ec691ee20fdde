use crate::page::page_model::Page;
use crate::workflow::workflow_model::RegionIds;

/// Observable display state of one workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Idle,
    Loading,
    ResultShown,
    ErrorShown,
}

impl Visibility {
    /// Read the state back from the page.
    ///
    /// Loading wins over the other two since it is cleared last on settle.
    pub fn observe(page: &Page, regions: &RegionIds) -> Self {
        if page.is_visible(&regions.loading) {
            Visibility::Loading
        } else if page.is_visible(&regions.error) {
            Visibility::ErrorShown
        } else if page.is_visible(&regions.result) {
            Visibility::ResultShown
        } else {
            Visibility::Idle
        }
    }
}

/// Hide result and error, show the loading indicator.
pub fn show_loading(page: &mut Page, regions: &RegionIds) {
    page.set_visible(&regions.result, false);
    page.set_visible(&regions.error, false);
    page.set_visible(&regions.loading, true);
}

pub fn show_result(page: &mut Page, regions: &RegionIds) {
    page.set_visible(&regions.error, false);
    page.set_visible(&regions.result, true);
}

pub fn show_error(page: &mut Page, regions: &RegionIds) {
    page.set_visible(&regions.result, false);
    page.set_visible(&regions.error, true);
}

pub fn clear_loading(page: &mut Page, regions: &RegionIds) {
    page.set_visible(&regions.loading, false);
}
