pub mod aggregator;
pub mod results_service;
pub mod subject_store;
