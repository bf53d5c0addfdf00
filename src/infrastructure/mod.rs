pub mod argon2_password_hasher;
pub mod configured_receipt_store;
pub mod credential_repository;
pub mod database;
pub mod entity;
pub mod gemini_course_recommender;
pub mod jwt_token_generator;
pub mod local_receipt_store;
pub mod registration_repository;
pub mod supabase_receipt_store;
