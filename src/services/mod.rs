pub mod attempt_store;
pub mod choice_service;
pub mod generator_service;
pub mod history_service;
pub mod param_service;
pub mod render_service;
pub mod submission_service;
pub mod template_catalog;
pub mod template_store;
pub mod uniqueness_service;
