pub mod question_attempt;
pub mod question_instance;
pub mod question_template;
