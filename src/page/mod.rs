pub mod page_model;
pub mod visibility;
