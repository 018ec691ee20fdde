//! Client for the study assistant backend.
//!
//! A table of workflows maps form controls to JSON payloads for fixed
//! endpoints. [`coordinator::coordinator::FormCoordinator`] runs the
//! submit → request → render-or-report cycle against an in-memory
//! [`page::page_model::Page`], and the study guide's result can be exported
//! as a paginated PDF.

pub mod cli;
pub mod coordinator;
pub mod export;
pub mod page;
pub mod render;
pub mod transport;
pub mod workflow;
