//! The reminder evaluator.
//!
//! One evaluation pass walks the pushed schedule, fires every reminder
//! that is due today and not yet in the sent ledger, and persists the
//! ledger after each firing so a crash mid-pass loses at most one mark.
//! Evaluation never fails: storage and delivery problems are logged and
//! the pass carries on, so a bad exam entry or a flaky webhook cannot
//! take the agent down.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ledger::{LedgerStore, SentLedger};
use super::threshold::{days_until, is_reminder_day, reminder_tag};
use crate::exam::ExamSchedule;
use crate::notify::{Notifier, Permission, ReminderNotice};
use crate::storage::Database;

/// What one evaluation pass did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// The day the pass evaluated against.
    pub date: NaiveDate,
    /// Exams examined.
    pub examined: usize,
    /// Tags fired this pass, in schedule order.
    pub fired: Vec<String>,
    /// Reminders skipped because their tag was already in the ledger.
    pub suppressed: usize,
    /// True when the pass stopped at the permission gate.
    pub permission_blocked: bool,
}

impl EvaluationReport {
    fn new(date: NaiveDate, examined: usize) -> Self {
        Self {
            date,
            examined,
            fired: Vec::new(),
            suppressed: 0,
            permission_blocked: false,
        }
    }

    pub fn fired_count(&self) -> usize {
        self.fired.len()
    }
}

/// A reminder that would fire on the next pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingReminder {
    pub title: String,
    pub subject: String,
    pub days_left: i64,
    pub tag: String,
}

/// Evaluates a schedule against a day and the sent ledger.
pub struct ReminderEngine<'a> {
    db: &'a Database,
    notifier: &'a dyn Notifier,
}

impl<'a> ReminderEngine<'a> {
    pub fn new(db: &'a Database, notifier: &'a dyn Notifier) -> Self {
        Self { db, notifier }
    }

    /// Run one evaluation pass for `today`.
    ///
    /// With permission denied nothing is marked, so the same reminders
    /// stay eligible once permission returns. A failed delivery still
    /// counts as sent for the day.
    pub async fn evaluate(&self, today: NaiveDate, schedule: &ExamSchedule) -> EvaluationReport {
        let mut report = EvaluationReport::new(today, schedule.exams.len());

        if self.notifier.permission() == Permission::Denied {
            log::debug!("notifications not permitted; skipping pass");
            report.permission_blocked = true;
            return report;
        }

        let store = LedgerStore::new(self.db);
        let mut ledger = store.load(today);
        if ledger.date != today {
            log::info!("ledger rolled over from {} to {today}", ledger.date);
            ledger = SentLedger::for_date(today);
        }

        let lang = schedule.lang();
        for exam in &schedule.exams {
            let days_left = days_until(today, exam.start);
            if !is_reminder_day(days_left) {
                continue;
            }
            let tag = reminder_tag(&exam.title, exam.start, days_left);
            if ledger.contains(&tag) {
                report.suppressed += 1;
                continue;
            }

            let notice =
                ReminderNotice::compose(lang, &exam.title, &exam.subject, days_left, tag.clone());
            if let Err(e) = self.notifier.notify(&notice).await {
                log::warn!("delivery of {tag} via {} failed: {e}", self.notifier.name());
            }
            ledger.mark(&tag);
            if let Err(e) = store.save(&ledger) {
                log::error!("failed to persist sent ledger: {e}");
            }
            report.fired.push(tag);
        }

        if report.fired_count() > 0 {
            log::info!(
                "fired {} reminder(s), suppressed {}",
                report.fired_count(),
                report.suppressed
            );
        }
        report
    }

    /// Reminders that would fire on the next pass, without delivering.
    pub fn pending(&self, today: NaiveDate, schedule: &ExamSchedule) -> Vec<PendingReminder> {
        let store = LedgerStore::new(self.db);
        let mut ledger = store.load(today);
        if ledger.date != today {
            ledger = SentLedger::for_date(today);
        }

        schedule
            .exams
            .iter()
            .filter_map(|exam| {
                let days_left = days_until(today, exam.start);
                if !is_reminder_day(days_left) {
                    return None;
                }
                let tag = reminder_tag(&exam.title, exam.start, days_left);
                if ledger.contains(&tag) {
                    return None;
                }
                Some(PendingReminder {
                    title: exam.title.clone(),
                    subject: exam.subject.clone(),
                    days_left,
                    tag,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exam::Exam;
    use crate::notify::test_support::{DeniedNotifier, FailingNotifier, RecordingNotifier};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn schedule_one(title: &str, subject: &str, start: NaiveDate) -> ExamSchedule {
        ExamSchedule {
            exams: vec![Exam {
                title: title.into(),
                subject: subject.into(),
                start,
            }],
            lang: "en".into(),
            palette: Vec::new(),
        }
    }

    #[tokio::test]
    async fn fires_seven_days_out() {
        let db = Database::open_memory().unwrap();
        let notifier = RecordingNotifier::new();
        let engine = ReminderEngine::new(&db, &notifier);
        let schedule = schedule_one("Midterm", "Math", d(2024, 3, 17));

        let report = engine.evaluate(d(2024, 3, 10), &schedule).await;

        assert_eq!(report.fired, vec!["Midterm-2024-03-17-D7".to_string()]);
        assert_eq!(report.suppressed, 0);
        let sent = notifier.taken();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "Midterm");
        assert_eq!(sent[0].body, "Math exam in D-7 days! Don't let your guard down!");
    }

    #[tokio::test]
    async fn second_pass_same_day_is_suppressed() {
        let db = Database::open_memory().unwrap();
        let notifier = RecordingNotifier::new();
        let engine = ReminderEngine::new(&db, &notifier);
        let schedule = schedule_one("Midterm", "Math", d(2024, 3, 17));

        engine.evaluate(d(2024, 3, 10), &schedule).await;
        let second = engine.evaluate(d(2024, 3, 10), &schedule).await;

        assert_eq!(second.fired_count(), 0);
        assert_eq!(second.suppressed, 1);
        assert_eq!(notifier.taken().len(), 1);
    }

    #[tokio::test]
    async fn exam_day_uses_due_today_template_and_fresh_tag() {
        let db = Database::open_memory().unwrap();
        let notifier = RecordingNotifier::new();
        let engine = ReminderEngine::new(&db, &notifier);
        let schedule = schedule_one("Midterm", "Math", d(2024, 3, 17));

        let report = engine.evaluate(d(2024, 3, 17), &schedule).await;

        assert_eq!(report.fired, vec!["Midterm-2024-03-17-D0".to_string()]);
        let sent = notifier.taken();
        assert_eq!(sent[0].body, "Math exam is today! Crush it!");
        assert_eq!(sent[0].days_left, 0);
    }

    #[tokio::test]
    async fn off_threshold_days_fire_nothing() {
        let db = Database::open_memory().unwrap();
        let notifier = RecordingNotifier::new();
        let engine = ReminderEngine::new(&db, &notifier);
        let schedule = schedule_one("Midterm", "Math", d(2024, 3, 17));

        // 6 days out is not a reminder day.
        let report = engine.evaluate(d(2024, 3, 11), &schedule).await;
        assert_eq!(report.fired_count(), 0);
        assert_eq!(report.suppressed, 0);
        assert!(notifier.taken().is_empty());
    }

    #[tokio::test]
    async fn past_exams_are_ignored() {
        let db = Database::open_memory().unwrap();
        let notifier = RecordingNotifier::new();
        let engine = ReminderEngine::new(&db, &notifier);
        let schedule = schedule_one("Midterm", "Math", d(2024, 3, 17));

        let report = engine.evaluate(d(2024, 3, 18), &schedule).await;
        assert_eq!(report.fired_count(), 0);
        assert!(notifier.taken().is_empty());
    }

    #[tokio::test]
    async fn new_day_resets_suppression() {
        let db = Database::open_memory().unwrap();
        let notifier = RecordingNotifier::new();
        let engine = ReminderEngine::new(&db, &notifier);
        let schedule = schedule_one("Midterm", "Math", d(2024, 3, 17));

        let day1 = engine.evaluate(d(2024, 3, 16), &schedule).await;
        assert_eq!(day1.fired, vec!["Midterm-2024-03-17-D1".to_string()]);

        let day0 = engine.evaluate(d(2024, 3, 17), &schedule).await;
        assert_eq!(day0.fired, vec!["Midterm-2024-03-17-D0".to_string()]);

        // Yesterday's mark was discarded with the rollover.
        let ledger = LedgerStore::new(&db).load(d(2024, 3, 17));
        assert_eq!(ledger.date, d(2024, 3, 17));
        assert_eq!(ledger.sent_count(), 1);
    }

    #[tokio::test]
    async fn denied_permission_marks_nothing() {
        let db = Database::open_memory().unwrap();
        let schedule = schedule_one("Midterm", "Math", d(2024, 3, 17));

        let denied = DeniedNotifier;
        let report = ReminderEngine::new(&db, &denied)
            .evaluate(d(2024, 3, 10), &schedule)
            .await;
        assert!(report.permission_blocked);
        assert_eq!(report.fired_count(), 0);
        assert!(db.kv_get(super::super::SENT_LEDGER_KEY).unwrap().is_none());

        // Once permission returns, the same reminder is still eligible.
        let notifier = RecordingNotifier::new();
        let report = ReminderEngine::new(&db, &notifier)
            .evaluate(d(2024, 3, 10), &schedule)
            .await;
        assert_eq!(report.fired_count(), 1);
    }

    #[tokio::test]
    async fn failed_delivery_still_counts_as_sent() {
        let db = Database::open_memory().unwrap();
        let failing = FailingNotifier;
        let engine = ReminderEngine::new(&db, &failing);
        let schedule = schedule_one("Midterm", "Math", d(2024, 3, 17));

        let first = engine.evaluate(d(2024, 3, 10), &schedule).await;
        assert_eq!(first.fired_count(), 1);

        let second = engine.evaluate(d(2024, 3, 10), &schedule).await;
        assert_eq!(second.fired_count(), 0);
        assert_eq!(second.suppressed, 1);
    }

    #[tokio::test]
    async fn broken_ledger_storage_does_not_block_delivery() {
        let db = Database::open_memory().unwrap();
        db.conn().execute_batch("DROP TABLE kv").unwrap();

        let notifier = RecordingNotifier::new();
        let engine = ReminderEngine::new(&db, &notifier);
        let schedule = schedule_one("Midterm", "Math", d(2024, 3, 17));

        // Loading and saving the ledger both fail; the reminder is still
        // delivered and the pass completes.
        let report = engine.evaluate(d(2024, 3, 10), &schedule).await;
        assert_eq!(report.fired_count(), 1);
        assert_eq!(notifier.taken().len(), 1);
    }

    #[tokio::test]
    async fn several_exams_fire_in_schedule_order() {
        let db = Database::open_memory().unwrap();
        let notifier = RecordingNotifier::new();
        let engine = ReminderEngine::new(&db, &notifier);
        let schedule = ExamSchedule {
            exams: vec![
                Exam {
                    title: "Midterm".into(),
                    subject: "Math".into(),
                    start: d(2024, 3, 17),
                },
                Exam {
                    title: "Quiz".into(),
                    subject: "History".into(),
                    start: d(2024, 3, 13),
                },
                Exam {
                    title: "Final".into(),
                    subject: "Physics".into(),
                    start: d(2024, 4, 20),
                },
            ],
            lang: "ko".into(),
            palette: Vec::new(),
        };

        // 2024-03-10: Midterm is 7 out, Quiz is 3 out, Final is 41 out.
        let report = engine.evaluate(d(2024, 3, 10), &schedule).await;
        assert_eq!(
            report.fired,
            vec![
                "Midterm-2024-03-17-D7".to_string(),
                "Quiz-2024-03-13-D3".to_string(),
            ]
        );
        assert_eq!(report.examined, 3);
    }

    #[tokio::test]
    async fn pending_lists_without_delivering() {
        let db = Database::open_memory().unwrap();
        let notifier = RecordingNotifier::new();
        let engine = ReminderEngine::new(&db, &notifier);
        let schedule = schedule_one("Midterm", "Math", d(2024, 3, 17));

        let pending = engine.pending(d(2024, 3, 10), &schedule);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].tag, "Midterm-2024-03-17-D7");
        assert_eq!(pending[0].days_left, 7);
        assert!(notifier.taken().is_empty());

        engine.evaluate(d(2024, 3, 10), &schedule).await;
        assert!(engine.pending(d(2024, 3, 10), &schedule).is_empty());
    }
}
