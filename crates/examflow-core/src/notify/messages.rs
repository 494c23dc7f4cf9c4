//! Localized reminder message templates.
//!
//! Body text matches the ExamFlow app for every supported language.
//! Korean is the product default and the fallback for unknown tags.

use serde::{Deserialize, Serialize};

/// Supported reminder languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Ko,
    En,
    Jp,
    Cn,
    Es,
}

impl Lang {
    /// Resolve a language tag, falling back to Korean.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "en" => Lang::En,
            "jp" => Lang::Jp,
            "cn" => Lang::Cn,
            "es" => Lang::Es,
            _ => Lang::Ko,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Lang::Ko => "ko",
            Lang::En => "en",
            Lang::Jp => "jp",
            Lang::Cn => "cn",
            Lang::Es => "es",
        }
    }
}

/// Body for an exam whose first day is today.
pub fn due_today_body(lang: Lang, subject: &str) -> String {
    match lang {
        Lang::Ko => format!("{subject} 시험이 오늘이다! 박살내버려!"),
        Lang::En => format!("{subject} exam is today! Crush it!"),
        Lang::Jp => format!("{subject}試験が今日です！粉砕しろ！"),
        Lang::Cn => format!("{subject}考试就是今天！摧毁它！"),
        Lang::Es => format!("¡El examen de {subject} es hoy! ¡Aplástalo!"),
    }
}

/// Body for an exam `days` days away (days > 0).
pub fn upcoming_body(lang: Lang, subject: &str, days: i64) -> String {
    match lang {
        Lang::Ko => format!("{subject} 시험 D-{days} 남았다! 긴장의 끈을 놓지 마!"),
        Lang::En => format!("{subject} exam in D-{days} days! Don't let your guard down!"),
        Lang::Jp => format!("{subject}試験D-{days}日残っています！気を抜くな！"),
        Lang::Cn => format!("{subject}考试还有D-{days}天！不要放松警惕！"),
        Lang::Es => {
            format!("¡Faltan D-{days} días para el examen de {subject}! ¡No bajes la guardia!")
        }
    }
}

/// Body for a reminder, dispatching on whether the exam is due today.
pub fn reminder_body(lang: Lang, subject: &str, days_left: i64) -> String {
    if days_left == 0 {
        due_today_body(lang, subject)
    } else {
        upcoming_body(lang, subject, days_left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn korean_is_the_fallback() {
        assert_eq!(Lang::from_tag("ko"), Lang::Ko);
        assert_eq!(Lang::from_tag("de"), Lang::Ko);
        assert_eq!(Lang::from_tag(""), Lang::Ko);
    }

    #[test]
    fn tag_roundtrip() {
        for lang in [Lang::Ko, Lang::En, Lang::Jp, Lang::Cn, Lang::Es] {
            assert_eq!(Lang::from_tag(lang.tag()), lang);
        }
    }

    #[test]
    fn due_today_uses_the_day_zero_template() {
        assert_eq!(
            reminder_body(Lang::En, "Math", 0),
            "Math exam is today! Crush it!"
        );
        assert_eq!(
            reminder_body(Lang::Ko, "수학", 0),
            "수학 시험이 오늘이다! 박살내버려!"
        );
    }

    #[test]
    fn upcoming_interpolates_days_left() {
        assert_eq!(
            reminder_body(Lang::En, "Math", 7),
            "Math exam in D-7 days! Don't let your guard down!"
        );
        assert_eq!(
            reminder_body(Lang::Es, "Historia", 3),
            "¡Faltan D-3 días para el examen de Historia! ¡No bajes la guardia!"
        );
    }

    #[test]
    fn every_language_has_both_templates() {
        for lang in [Lang::Ko, Lang::En, Lang::Jp, Lang::Cn, Lang::Es] {
            assert!(!due_today_body(lang, "X").is_empty());
            assert!(upcoming_body(lang, "X", 5).contains("D-5"));
        }
    }
}
