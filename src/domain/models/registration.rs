use std::{
    fmt,
    str::FromStr,
    sync::{Mutex, PoisonError},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationId(Uuid);

impl RegistrationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RegistrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown course: {0}")]
pub struct UnknownCourse(pub String);

/// Courses offered by the program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Data Science")]
    DataScience,
    Cybersecurity,
    #[serde(rename = "Cloud Computing")]
    CloudComputing,
    #[serde(rename = "UI/UX")]
    UiUx,
    #[serde(rename = "AI/ML")]
    AiMl,
}

impl Course {
    pub const ALL: [Course; 6] = [
        Course::WebDevelopment,
        Course::DataScience,
        Course::Cybersecurity,
        Course::CloudComputing,
        Course::UiUx,
        Course::AiMl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Course::WebDevelopment => "Web Development",
            Course::DataScience => "Data Science",
            Course::Cybersecurity => "Cybersecurity",
            Course::CloudComputing => "Cloud Computing",
            Course::UiUx => "UI/UX",
            Course::AiMl => "AI/ML",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Course {
    type Err = UnknownCourse;

    /// Exact match against the display label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Course::ALL
            .into_iter()
            .find(|course| course.as_str() == s)
            .ok_or_else(|| UnknownCourse(s.to_string()))
    }
}

/// Creation time as a (seconds, nanoseconds) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanoseconds: i32,
}

impl Timestamp {
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self {
            seconds: datetime.timestamp(),
            nanoseconds: datetime.timestamp_subsec_nanos() as i32,
        }
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, u32::try_from(self.nanoseconds).ok()?)
    }

    /// The smallest timestamp after this one
    fn next(self) -> Self {
        if self.nanoseconds >= 999_999_999 {
            Self { seconds: self.seconds + 1, nanoseconds: 0 }
        } else {
            Self { seconds: self.seconds, nanoseconds: self.nanoseconds + 1 }
        }
    }
}

/// Hands out strictly increasing creation timestamps, even if the wall clock
/// steps backwards or two inserts land on the same tick.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Mutex<Option<Timestamp>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Timestamp {
        let current = Timestamp::from_datetime(Utc::now());
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let next = match *last {
            Some(previous) if previous >= current => previous.next(),
            _ => current,
        };
        *last = Some(next);
        next
    }
}

/// Validated registration record, before the store assigns id and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub full_name: String,
    pub department: String,
    pub matric_number: String,
    pub email: String,
    pub whatsapp_number: String,
    pub course: Course,
}

/// Stored registration. Immutable once created; the only other lifecycle
/// step is deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    id: RegistrationId,
    details: NewRegistration,
    receipt_url: String,
    timestamp: Timestamp,
}

impl Registration {
    pub fn new(
        id: RegistrationId,
        details: NewRegistration,
        receipt_url: String,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            details,
            receipt_url,
            timestamp,
        }
    }

    pub fn id(&self) -> RegistrationId {
        self.id
    }
    pub fn full_name(&self) -> &str {
        &self.details.full_name
    }
    pub fn department(&self) -> &str {
        &self.details.department
    }
    pub fn matric_number(&self) -> &str {
        &self.details.matric_number
    }
    pub fn email(&self) -> &str {
        &self.details.email
    }
    pub fn whatsapp_number(&self) -> &str {
        &self.details.whatsapp_number
    }
    pub fn course(&self) -> Course {
        self.details.course
    }
    pub fn receipt_url(&self) -> &str {
        &self.receipt_url
    }
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_labels_parse_back() {
        for course in Course::ALL {
            assert_eq!(course.as_str().parse::<Course>(), Ok(course));
        }
    }

    #[test]
    fn course_parse_is_exact() {
        assert!("ai/ml".parse::<Course>().is_err());
        assert!(" AI/ML".parse::<Course>().is_err());
        assert!("Blockchain".parse::<Course>().is_err());
    }

    #[test]
    fn course_serializes_as_label() {
        let json = serde_json::to_string(&Course::UiUx).unwrap();
        assert_eq!(json, "\"UI/UX\"");
    }

    #[test]
    fn timestamp_orders_by_seconds_then_nanos() {
        let a = Timestamp { seconds: 10, nanoseconds: 999 };
        let b = Timestamp { seconds: 11, nanoseconds: 0 };
        let c = Timestamp { seconds: 11, nanoseconds: 1 };
        assert!(a < b && b < c);
    }

    #[test]
    fn next_carries_into_seconds() {
        let edge = Timestamp { seconds: 1, nanoseconds: 999_999_999 };
        assert_eq!(edge.next(), Timestamp { seconds: 2, nanoseconds: 0 });
    }

    #[test]
    fn timestamp_converts_to_datetime() {
        let now = Utc::now();
        let timestamp = Timestamp::from_datetime(now);
        assert_eq!(timestamp.to_datetime(), Some(now));
    }

    #[test]
    fn clock_is_strictly_increasing() {
        let clock = MonotonicClock::new();
        let mut previous = clock.now();
        for _ in 0..100 {
            let next = clock.now();
            assert!(next > previous);
            previous = next;
        }
    }
}
