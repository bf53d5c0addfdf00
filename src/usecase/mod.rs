pub mod delete_registration_usecase;
pub mod list_registrations_usecase;
pub mod login_usecase;
pub mod provision_admin_usecase;
pub mod recommend_course_usecase;
pub mod register_student_usecase;
