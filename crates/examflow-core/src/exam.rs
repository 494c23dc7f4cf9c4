//! Exam schedule types.
//!
//! The schedule is the payload a host pushes to the agent: the list of
//! upcoming exams plus the display language and theme palette chosen in
//! the app. Unknown fields are ignored so older agents keep working when
//! the app grows its payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::notify::Lang;

/// A single dated exam event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    /// Display title, e.g. "Midterm".
    pub title: String,
    /// Subject name substituted into reminder messages, e.g. "Math".
    pub subject: String,
    /// First day of the exam as a calendar date.
    pub start: NaiveDate,
}

/// The full dataset pushed by a host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSchedule {
    #[serde(default)]
    pub exams: Vec<Exam>,
    /// Language tag for reminder messages ("ko", "en", "jp", "cn", "es").
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Theme palette carried along for hosts that render notifications.
    #[serde(default)]
    pub palette: Vec<String>,
}

fn default_lang() -> String {
    "ko".to_string()
}

impl Default for ExamSchedule {
    fn default() -> Self {
        Self {
            exams: Vec::new(),
            lang: default_lang(),
            palette: Vec::new(),
        }
    }
}

impl ExamSchedule {
    /// Resolve the language tag, falling back to Korean for anything
    /// unrecognized.
    pub fn lang(&self) -> Lang {
        Lang::from_tag(&self.lang)
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_payload() {
        let json = r##"{
            "exams": [
                {"title": "Midterm", "subject": "Math", "start": "2024-03-17"}
            ],
            "lang": "en",
            "palette": ["#112233", "#445566"]
        }"##;
        let schedule: ExamSchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.exams.len(), 1);
        assert_eq!(schedule.exams[0].subject, "Math");
        assert_eq!(
            schedule.exams[0].start,
            NaiveDate::from_ymd_opt(2024, 3, 17).unwrap()
        );
        assert_eq!(schedule.lang(), Lang::En);
        assert_eq!(schedule.palette.len(), 2);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let schedule: ExamSchedule = serde_json::from_str("{}").unwrap();
        assert!(schedule.is_empty());
        assert_eq!(schedule.lang, "ko");
        assert!(schedule.palette.is_empty());
    }

    #[test]
    fn unknown_lang_resolves_to_korean() {
        let schedule: ExamSchedule =
            serde_json::from_str(r#"{"lang": "fr"}"#).unwrap();
        assert_eq!(schedule.lang(), Lang::Ko);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{"exams": [], "lang": "jp", "theme": "dark"}"#;
        let schedule: ExamSchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.lang(), Lang::Jp);
    }
}
