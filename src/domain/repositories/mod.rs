pub mod credential_repository;
pub mod registration_repository;
