pub mod admins;
pub mod registrations;
