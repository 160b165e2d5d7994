/// Grade normalization and advancement
///
/// Grades arrive as free-form strings: `"7"`, `"7th"`, `"Grade 7"`, or a
/// named track such as `"operations"` or `"shachbag"`. Every comparison in the
/// access rules goes through [`normalize`], which keeps only the digits.
///
/// # Named tracks
///
/// Non-numeric grades all normalize to the empty string, so `"operations"`
/// and `"shachbag"` compare equal to each other. This is current behavior and
/// is intentionally left untouched until product owners decide how named
/// tracks should be keyed.
///
/// # Example
///
/// ```
/// use scoutstribe_shared::grade::{normalize, same_grade};
///
/// assert_eq!(normalize("Grade 7"), "7");
/// assert!(same_grade("7th", "7"));
/// assert!(!same_grade("8", "9"));
/// ```

/// Highest numeric grade a member can hold before graduating
pub const MAX_GRADE: u8 = 12;

/// Error type for grade advancement
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradeError {
    /// Initial grade has no numeric component
    #[error("grade '{0}' is not numeric")]
    NotNumeric(String),

    /// Registration year is not a four digit year
    #[error("registration year '{0}' is not a valid year")]
    InvalidYear(String),

    /// Registration year lies after the year being advanced to
    #[error("registration year {registered} is after {current}")]
    FutureRegistration { registered: i32, current: i32 },

    /// Advanced grade would pass the last grade
    #[error("member has graduated (would be grade {0})")]
    Graduated(u32),
}

/// Canonicalizes a grade string into its comparable key
///
/// Strips every non-digit character and trims the result.
pub fn normalize(grade: &str) -> String {
    grade
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Returns true if both grades normalize to the same key
pub fn same_grade(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Returns true if `user_grade` is assigned and matches `target`
///
/// A user without an assigned grade matches nothing, not even named tracks
/// that normalize to the empty key.
pub fn matches_assigned(user_grade: Option<&str>, target: &str) -> bool {
    match user_grade {
        Some(grade) => same_grade(grade, target),
        None => false,
    }
}

/// Parses the numeric part of a grade
///
/// Returns `None` for named tracks or digit runs that overflow a `u8`.
pub fn numeric(grade: &str) -> Option<u8> {
    normalize(grade).parse().ok()
}

/// Returns true if two grade labels name the same roster grade
///
/// Labels match when they are equal ignoring case and surrounding
/// whitespace, or when both carry the same numeric grade. Unlike
/// [`same_grade`], two different named tracks never match.
pub fn equivalent(a: &str, b: &str) -> bool {
    if a.trim().eq_ignore_ascii_case(b.trim()) {
        return true;
    }

    match (numeric(a), numeric(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Computes a member's grade for `current_year`
///
/// A member registered in `registration_year` at `initial_grade` moves up one
/// grade per elapsed year.
///
/// # Errors
///
/// - [`GradeError::NotNumeric`] for named tracks
/// - [`GradeError::InvalidYear`] if the registration year does not parse
/// - [`GradeError::FutureRegistration`] if registration is after `current_year`
/// - [`GradeError::Graduated`] if the result passes [`MAX_GRADE`]
///
/// # Example
///
/// ```
/// use scoutstribe_shared::grade::advanced_grade;
///
/// assert_eq!(advanced_grade("7", "2024", 2026).unwrap(), "9");
/// ```
pub fn advanced_grade(
    initial_grade: &str,
    registration_year: &str,
    current_year: i32,
) -> Result<String, GradeError> {
    let initial =
        numeric(initial_grade).ok_or_else(|| GradeError::NotNumeric(initial_grade.to_string()))?;

    let registered: i32 = registration_year
        .trim()
        .parse()
        .ok()
        .filter(|year| (1000..=9999).contains(year))
        .ok_or_else(|| GradeError::InvalidYear(registration_year.to_string()))?;

    if registered > current_year {
        return Err(GradeError::FutureRegistration {
            registered,
            current: current_year,
        });
    }

    let advanced = u32::from(initial) + (current_year - registered) as u32;
    if advanced > u32::from(MAX_GRADE) {
        return Err(GradeError::Graduated(advanced));
    }

    Ok(advanced.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_equivalent_forms() {
        assert_eq!(normalize("7th"), "7");
        assert_eq!(normalize("Grade 7"), "7");
        assert_eq!(normalize("7"), "7");
        assert_eq!(normalize(" 10th grade "), "10");
    }

    #[test]
    fn test_normalize_named_tracks_collide() {
        assert_eq!(normalize("operations"), "");
        assert_eq!(normalize("shachbag"), "");
        assert!(same_grade("operations", "shachbag"));
    }

    #[test]
    fn test_same_grade() {
        assert!(same_grade("Grade 8", "8th"));
        assert!(!same_grade("8", "9"));
        assert!(!same_grade("1", "11"));
    }

    #[test]
    fn test_matches_assigned_requires_grade() {
        assert!(matches_assigned(Some("8"), "Grade 8"));
        assert!(!matches_assigned(Some("8"), "9"));
        assert!(!matches_assigned(None, "operations"));
        assert!(!matches_assigned(None, "8"));
    }

    #[test]
    fn test_numeric() {
        assert_eq!(numeric("Grade 12"), Some(12));
        assert_eq!(numeric("operations"), None);
        assert_eq!(numeric("99999"), None);
    }

    #[test]
    fn test_equivalent() {
        assert!(equivalent("Grade 8", "8"));
        assert!(equivalent("8th", "8"));
        assert!(equivalent(" Shachbag ", "shachbag"));
        assert!(!equivalent("operations", "shachbag"));
        assert!(!equivalent("8", "9"));
        assert!(!equivalent("operations", "8"));
    }

    #[test]
    fn test_advanced_grade_two_years() {
        assert_eq!(advanced_grade("7", "2024", 2026).unwrap(), "9");
        assert_eq!(advanced_grade("Grade 3", "2026", 2026).unwrap(), "3");
    }

    #[test]
    fn test_advanced_grade_errors() {
        assert_eq!(
            advanced_grade("operations", "2024", 2026),
            Err(GradeError::NotNumeric("operations".to_string()))
        );
        assert_eq!(
            advanced_grade("7", "next year", 2026),
            Err(GradeError::InvalidYear("next year".to_string()))
        );
        assert_eq!(
            advanced_grade("7", "2030", 2026),
            Err(GradeError::FutureRegistration {
                registered: 2030,
                current: 2026
            })
        );
        assert_eq!(
            advanced_grade("11", "2024", 2026),
            Err(GradeError::Graduated(13))
        );
    }
}
