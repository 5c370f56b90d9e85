pub mod crm_metrics;
pub mod data_layer;
pub mod diagnostics;
pub mod expansion;
pub mod guards;
pub mod maintenance;

pub use data_layer::NotionDataLayer;
