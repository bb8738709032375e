pub mod history_dto;
pub mod question_dto;
