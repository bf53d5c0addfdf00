use std::str::FromStr;

use crate::domain::models::registration::{Course, Registration, UnknownCourse};

const ALL: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CourseFilter {
    #[default]
    All,
    Only(Course),
}

impl FromStr for CourseFilter {
    type Err = UnknownCourse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == ALL {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Admin listing filters. All three must pass for a registration to be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationFilter {
    pub course: CourseFilter,
    /// Case-insensitive substring of the department; empty or "all" disables it
    pub department: String,
    /// Case-insensitive substring of full name, matric number or email
    pub search: String,
}

impl RegistrationFilter {
    pub fn matches(&self, registration: &Registration) -> bool {
        self.matches_course(registration)
            && self.matches_department(registration)
            && self.matches_search(registration)
    }

    /// Keep matching registrations, preserving order
    pub fn apply(&self, registrations: Vec<Registration>) -> Vec<Registration> {
        registrations
            .into_iter()
            .filter(|registration| self.matches(registration))
            .collect()
    }

    fn matches_course(&self, registration: &Registration) -> bool {
        match self.course {
            CourseFilter::All => true,
            CourseFilter::Only(course) => registration.course() == course,
        }
    }

    fn matches_department(&self, registration: &Registration) -> bool {
        let needle = self.department.trim();
        if needle.is_empty() || needle == ALL {
            return true;
        }
        contains_ignore_case(registration.department(), needle)
    }

    fn matches_search(&self, registration: &Registration) -> bool {
        let needle = self.search.trim();
        contains_ignore_case(registration.full_name(), needle)
            || contains_ignore_case(registration.matric_number(), needle)
            || contains_ignore_case(registration.email(), needle)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Department filter options: "all" followed by each distinct department in
/// first-seen order
pub fn department_options(registrations: &[Registration]) -> Vec<String> {
    let mut options = vec![ALL.to_string()];
    for registration in registrations {
        let department = registration.department();
        if !options.iter().skip(1).any(|seen| seen == department) {
            options.push(department.to_string());
        }
    }
    options
}
