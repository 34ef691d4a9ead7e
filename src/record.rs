use std::borrow::Cow;

use serde::{Serialize, Serializer};

/// Label used for timetables whose semester could not be determined.
pub const UNKNOWN_SEMESTER: &str = "Ohne Semester";
/// Label used for elective offerings ("Wahlpflichtfächer").
pub const ELECTIVE_SEMESTER: &str = "WPF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semester {
    Numbered(u8),
    Elective,
    Unknown,
}

impl Semester {
    pub fn number(self) -> Option<u8> {
        match self {
            Semester::Numbered(n) => Some(n),
            _ => None,
        }
    }

    /// String form used as sort key, so numbers and sentinels interleave
    /// deterministically.
    pub fn sort_key(self) -> Cow<'static, str> {
        match self {
            Semester::Numbered(n) => Cow::Owned(n.to_string()),
            Semester::Elective => Cow::Borrowed(ELECTIVE_SEMESTER),
            Semester::Unknown => Cow::Borrowed(UNKNOWN_SEMESTER),
        }
    }
}

impl Serialize for Semester {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Semester::Numbered(n) => serializer.serialize_u8(*n),
            Semester::Elective => serializer.serialize_str(ELECTIVE_SEMESTER),
            Semester::Unknown => serializer.serialize_str(UNKNOWN_SEMESTER),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Degree {
    Bachelor,
    Master,
}

impl Degree {
    pub fn as_str(self) -> &'static str {
        match self {
            Degree::Bachelor => "Bachelor",
            Degree::Master => "Master",
        }
    }
}

/// One timetable as written to the output JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableRecord {
    #[serde(rename = "skedPath")]
    pub path: String,
    pub label: String,
    pub faculty: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub graphical: bool,
    pub id: String,
    pub semester: Semester,
    pub degree: Degree,
}

impl TimetableRecord {
    /// Composite ordering key: faculty, degree, semester (as string), label, id.
    pub fn sort_key(&self) -> (&str, &str, Cow<'static, str>, &str, &str) {
        (
            &self.faculty,
            self.degree.as_str(),
            self.semester.sort_key(),
            &self.label,
            &self.id,
        )
    }
}

// ── Tests ──
