/// Member (scout) roster model
///
/// `initial_grade` and `registration_year` anchor yearly advancement: the
/// current grade is recomputed from them rather than incremented in place.

use serde::{Deserialize, Serialize};

/// A scout on the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,

    /// Current grade
    pub grade: String,

    /// Year the member was registered at `initial_grade`
    pub registration_year: String,

    /// Grade the member held in `registration_year`
    pub initial_grade: String,
}

impl Member {
    /// Full display name
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Input for registering a member
#[derive(Debug, Clone)]
pub struct NewMember {
    pub first_name: String,
    pub last_name: String,
    pub grade: String,
    pub registration_year: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_json_is_camel_case() {
        let member = Member {
            id: 1,
            first_name: "Noa".to_string(),
            last_name: String::new(),
            grade: "7".to_string(),
            registration_year: "2025".to_string(),
            initial_grade: "7".to_string(),
        };

        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["firstName"], "Noa");
        assert_eq!(json["registrationYear"], "2025");
        assert_eq!(json["initialGrade"], "7");
        assert_eq!(member.full_name(), "Noa");
    }
}
