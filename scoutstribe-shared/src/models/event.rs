/// Event and attendance models
///
/// Events are either tribe-wide (`global`) or scoped to one grade. Attendance
/// for an event is replaced wholesale every time it is recorded.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::grade;

/// Grade used by leadership staff; such members are eligible for every grade event
pub const OPERATIONS_GRADE: &str = "operations";

/// Event scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// Open to every member
    Global,

    /// Limited to one grade
    Grade,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Global => "global",
            EventType::Grade => "grade",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(EventType::Global),
            "grade" => Ok(EventType::Grade),
            other => Err(format!("Event type must be 'global' or 'grade', got '{}'", other)),
        }
    }
}

/// A scheduled tribe event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: u64,
    pub name: String,
    pub date: NaiveDate,

    #[serde(rename = "type")]
    pub event_type: EventType,

    /// Target grade for grade events, `None` for global events
    pub grade: Option<String>,

    /// ID of the creating user
    pub created_by: u64,
}

impl Event {
    /// Checks whether a member of `member_grade` may attend
    ///
    /// Global events admit everyone. Grade events admit members of an
    /// equivalent grade (see [`grade::equivalent`]) and operations staff.
    pub fn admits(&self, member_grade: &str) -> bool {
        match (self.event_type, &self.grade) {
            (EventType::Global, _) => true,
            (EventType::Grade, Some(event_grade)) => {
                grade::equivalent(member_grade, event_grade)
                    || grade::equivalent(member_grade, OPERATIONS_GRADE)
            }
            (EventType::Grade, None) => false,
        }
    }
}

/// Input for creating an event
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub date: NaiveDate,
    pub event_type: EventType,
    pub grade: Option<String>,
    pub created_by: u64,
}

/// One member's attendance at one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub event_id: u64,
    pub member_id: u64,
    pub attended: bool,

    /// Member's grade when attendance was recorded
    pub grade: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(event_type: EventType, grade: Option<&str>) -> Event {
        Event {
            id: 1,
            name: "Campfire".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            event_type,
            grade: grade.map(str::to_string),
            created_by: 1,
        }
    }

    #[test]
    fn test_event_type_parse() {
        assert_eq!("global".parse::<EventType>(), Ok(EventType::Global));
        assert_eq!("grade".parse::<EventType>(), Ok(EventType::Grade));
        assert!("tribe".parse::<EventType>().is_err());
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(event(EventType::Grade, Some("7"))).unwrap();
        assert_eq!(json["type"], "grade");
        assert_eq!(json["date"], "2026-05-01");
        assert_eq!(json["createdBy"], 1);
    }

    #[test]
    fn test_admits() {
        let global = event(EventType::Global, None);
        assert!(global.admits("3"));
        assert!(global.admits("shachbag"));

        let seventh = event(EventType::Grade, Some("7"));
        assert!(seventh.admits("7"));
        assert!(seventh.admits(OPERATIONS_GRADE));
        assert!(!seventh.admits("8"));

        let labelled = event(EventType::Grade, Some("Grade 8"));
        assert!(labelled.admits("8"));
        assert!(labelled.admits("8th"));
        assert!(!labelled.admits("9"));

        let shachbag = event(EventType::Grade, Some("shachbag"));
        assert!(shachbag.admits("shachbag"));
        assert!(shachbag.admits(OPERATIONS_GRADE));
        assert!(!shachbag.admits("7"));
    }
}
