pub mod course_recommender;
pub mod password_service;
pub mod receipt_store;
pub mod token_service;
