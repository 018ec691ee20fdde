pub mod error;
pub mod payload;
pub mod registry;
pub mod workflow_model;
