pub mod attempt_repository;
pub mod pool;
