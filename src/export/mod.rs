pub mod exporter;
pub mod layout;
pub mod pdf;
