//! The stateful study-data core.

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::storage::codec;
use crate::storage::KeyValueStore;
use crate::study::ident;
use crate::study::models::{Exam, ExamStatus, StudyData, StudyStats, Subject, Topic};
use crate::study::streak;

/// Owns the canonical study-data snapshot.
///
/// Every mutation reads the current snapshot, applies its change, and
/// persists the full result through the injected key-value store.
/// Mutations on missing subjects/topics/exams are silent no-ops and
/// nothing is saved. Persistence failures are logged and swallowed; the
/// in-memory snapshot stays authoritative for the rest of the session.
pub struct StudyStore {
    data: StudyData,
    storage: Box<dyn KeyValueStore>,
}

impl StudyStore {
    /// Load the persisted snapshot (or a fresh default) from `storage`.
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        let data = codec::load_snapshot(storage.as_ref());
        Self { data, storage }
    }

    /// Read-only view of the current snapshot.
    pub fn data(&self) -> &StudyData {
        &self.data
    }

    /// Derived statistics, recomputed fresh on every call.
    pub fn stats(&self) -> StudyStats {
        let total_topics: usize = self.data.subjects.iter().map(|s| s.topics.len()).sum();
        let completed_topics: usize = self
            .data
            .subjects
            .iter()
            .map(|s| s.topics.iter().filter(|t| t.done).count())
            .sum();
        let progress = if total_topics > 0 {
            ((completed_topics as f64 / total_topics as f64) * 100.0).round() as u32
        } else {
            0
        };
        let xp = completed_topics as u32 * 10;
        StudyStats {
            total_topics,
            completed_topics,
            progress,
            xp,
            level: xp / 100,
            streak: self.data.streak,
        }
    }

    /// Rename the current exam cycle. Empty names are allowed.
    pub fn set_exam_name(&mut self, name: &str) {
        self.data.exam_name = name.to_string();
        self.persist();
    }

    /// Clear all subjects and reset the streak. The exam timetable and
    /// exam name survive a reset on purpose: wiping study progress must
    /// not destroy the schedule.
    pub fn reset_all(&mut self) {
        self.data.subjects.clear();
        self.data.streak = 0;
        self.data.last_study_date = None;
        self.persist();
    }

    /// Append a subject with an empty topic list. Names need not be unique.
    pub fn add_subject(&mut self, name: &str) {
        self.data.subjects.push(Subject {
            id: ident::create_id(),
            name: name.to_string(),
            topics: Vec::new(),
        });
        self.persist();
    }

    /// Remove a subject and all its topics. Unknown ids are a no-op.
    pub fn delete_subject(&mut self, subject_id: &str) {
        let before = self.data.subjects.len();
        self.data.subjects.retain(|s| s.id != subject_id);
        if self.data.subjects.len() != before {
            self.persist();
        }
    }

    /// Append a topic to a subject. Unknown subject ids are a no-op.
    pub fn add_topic(&mut self, subject_id: &str, title: &str) {
        if let Some(subject) = self.data.subjects.iter_mut().find(|s| s.id == subject_id) {
            subject.topics.push(Topic {
                id: ident::create_id(),
                title: title.to_string(),
                done: false,
                completed_at: None,
            });
            self.persist();
        }
    }

    /// Flip a topic's completion flag.
    ///
    /// Any toggle counts as a study event, in either direction:
    /// un-completing a topic still advances `lastStudyDate` and the
    /// streak exactly like completing one does. This matches the app's
    /// long-standing behavior and is pinned by tests. Unknown
    /// subject/topic ids leave everything untouched, streak included.
    pub fn toggle_topic(&mut self, subject_id: &str, topic_id: &str) {
        self.toggle_topic_at(subject_id, topic_id, Utc::now());
    }

    /// [`Self::toggle_topic`] with an injected clock.
    pub fn toggle_topic_at(&mut self, subject_id: &str, topic_id: &str, now: DateTime<Utc>) {
        let mut found = false;
        if let Some(subject) = self.data.subjects.iter_mut().find(|s| s.id == subject_id) {
            if let Some(topic) = subject.topics.iter_mut().find(|t| t.id == topic_id) {
                topic.done = !topic.done;
                topic.completed_at = if topic.done { Some(now) } else { None };
                found = true;
            }
        }
        if !found {
            return;
        }

        let today = now.date_naive();
        let last_day = self.data.last_study_date.map(|d| d.date_naive());
        self.data.streak = streak::next_streak(self.data.streak, last_day, today);
        self.data.last_study_date = Some(now);
        self.persist();
    }

    /// Remove a topic from a subject. Unknown ids are a no-op.
    pub fn delete_topic(&mut self, subject_id: &str, topic_id: &str) {
        if let Some(subject) = self.data.subjects.iter_mut().find(|s| s.id == subject_id) {
            let before = subject.topics.len();
            subject.topics.retain(|t| t.id != topic_id);
            if subject.topics.len() != before {
                self.persist();
            }
        }
    }

    /// Schedule an exam. The timetable is kept sorted ascending by
    /// scheduled date and time; equal slots keep insertion order.
    pub fn add_exam(&mut self, subject: &str, exam_date: NaiveDate, exam_time: &str) {
        self.data.exams.push(Exam {
            id: ident::create_id(),
            subject: subject.to_string(),
            exam_date,
            exam_time: exam_time.to_string(),
            status: ExamStatus::Pending,
            completed_at: None,
        });
        // Zero-padded 24-hour HH:MM strings order lexicographically;
        // sort_by is stable so equal slots keep insertion order
        self.data
            .exams
            .sort_by(|a, b| (a.exam_date, &a.exam_time).cmp(&(b.exam_date, &b.exam_time)));
        self.persist();
    }

    /// Remove an exam. Unknown ids are a no-op.
    pub fn delete_exam(&mut self, exam_id: &str) {
        let before = self.data.exams.len();
        self.data.exams.retain(|e| e.id != exam_id);
        if self.data.exams.len() != before {
            self.persist();
        }
    }

    /// Transition every overdue pending exam to completed, in one pass.
    /// Nothing is persisted when no exam is due.
    pub fn auto_complete_exams(&mut self) {
        self.auto_complete_exams_at(Local::now());
    }

    /// [`Self::auto_complete_exams`] with an injected clock.
    pub fn auto_complete_exams_at(&mut self, now: DateTime<Local>) {
        let cutoff = now.naive_local();
        let completed_at = now.with_timezone(&Utc);
        let mut changed = false;
        for exam in &mut self.data.exams {
            if exam.status != ExamStatus::Pending {
                continue;
            }
            // An unparseable time string means the exam is never due
            if let Some(scheduled) = exam.scheduled_at() {
                if scheduled <= cutoff {
                    log::info!("Auto-completing exam {} ({})", exam.id, exam.subject);
                    exam.status = ExamStatus::Completed;
                    exam.completed_at = Some(completed_at);
                    changed = true;
                }
            }
        }
        if changed {
            self.persist();
        }
    }

    fn persist(&mut self) {
        if let Err(e) = codec::save_snapshot(self.storage.as_mut(), &self.data) {
            log::warn!("Failed to persist study data: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn test_store() -> StudyStore {
        StudyStore::new(Box::new(MemoryStorage::new()))
    }

    fn subject_id(store: &StudyStore, index: usize) -> String {
        store.data().subjects[index].id.clone()
    }

    fn topic_id(store: &StudyStore, subject: usize, topic: usize) -> String {
        store.data().subjects[subject].topics[topic].id.clone()
    }

    #[test]
    fn test_add_and_delete_subject() {
        let mut store = test_store();

        store.add_subject("Math");
        assert_eq!(store.data().subjects.len(), 1);
        assert_eq!(store.data().subjects[0].name, "Math");

        let id = subject_id(&store, 0);
        store.delete_subject(&id);
        assert!(store.data().subjects.is_empty());

        // Deleting again is a silent no-op
        store.delete_subject(&id);
        assert!(store.data().subjects.is_empty());
    }

    #[test]
    fn test_topic_counts_track_add_and_delete() {
        let mut store = test_store();
        store.add_subject("Math");
        store.add_subject("Physics");
        let math = subject_id(&store, 0);
        let physics = subject_id(&store, 1);

        store.add_topic(&math, "Algebra");
        store.add_topic(&math, "Calculus");
        store.add_topic(&physics, "Optics");
        assert_eq!(store.stats().total_topics, 3);

        let algebra = topic_id(&store, 0, 0);
        store.delete_topic(&math, &algebra);
        assert_eq!(store.stats().total_topics, 2);

        // Unknown subject is a no-op
        store.add_topic("nope", "Ghost");
        assert_eq!(store.stats().total_topics, 2);
    }

    #[test]
    fn test_progress_xp_and_level() {
        let mut store = test_store();
        store.add_subject("Math");
        let math = subject_id(&store, 0);
        for i in 0..10 {
            store.add_topic(&math, &format!("Topic {}", i));
        }

        let stats = store.stats();
        assert_eq!(stats.progress, 0);
        assert_eq!(stats.xp, 0);
        assert_eq!(stats.level, 0);

        for i in 0..10 {
            let tid = topic_id(&store, 0, i);
            store.toggle_topic(&math, &tid);
        }

        let stats = store.stats();
        assert_eq!(stats.completed_topics, 10);
        assert_eq!(stats.progress, 100);
        assert_eq!(stats.xp, 100);
        assert_eq!(stats.level, 1);
    }

    #[test]
    fn test_progress_rounds_and_zero_topics_is_zero() {
        let mut store = test_store();
        assert_eq!(store.stats().progress, 0);

        store.add_subject("Math");
        let math = subject_id(&store, 0);
        store.add_topic(&math, "a");
        store.add_topic(&math, "b");
        store.add_topic(&math, "c");
        let first = topic_id(&store, 0, 0);
        store.toggle_topic(&math, &first);

        // 1 of 3 rounds to 33
        assert_eq!(store.stats().progress, 33);
    }

    #[test]
    fn test_toggle_sets_and_clears_completed_at() {
        let mut store = test_store();
        store.add_subject("Math");
        let math = subject_id(&store, 0);
        store.add_topic(&math, "Algebra");
        let tid = topic_id(&store, 0, 0);

        store.toggle_topic(&math, &tid);
        assert!(store.data().subjects[0].topics[0].done);
        assert!(store.data().subjects[0].topics[0].completed_at.is_some());

        store.toggle_topic(&math, &tid);
        assert!(!store.data().subjects[0].topics[0].done);
        assert!(store.data().subjects[0].topics[0].completed_at.is_none());
    }

    #[test]
    fn test_streak_scenario() {
        let mut store = test_store();
        store.add_subject("Math");
        let math = subject_id(&store, 0);
        store.add_topic(&math, "a");
        store.add_topic(&math, "b");
        let a = topic_id(&store, 0, 0);
        let b = topic_id(&store, 0, 1);

        let day1 = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        store.toggle_topic_at(&math, &a, day1);
        assert_eq!(store.stats().streak, 1);

        // Second toggle the same calendar day
        let day1_later = Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap();
        store.toggle_topic_at(&math, &b, day1_later);
        assert_eq!(store.stats().streak, 1);

        // Next calendar day extends
        let day2 = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        store.toggle_topic_at(&math, &a, day2);
        assert_eq!(store.stats().streak, 2);

        // Two-day gap resets
        let day5 = Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap();
        store.toggle_topic_at(&math, &b, day5);
        assert_eq!(store.stats().streak, 1);
    }

    #[test]
    fn test_uncompleting_still_counts_for_the_streak() {
        let mut store = test_store();
        store.add_subject("Math");
        let math = subject_id(&store, 0);
        store.add_topic(&math, "a");
        let a = topic_id(&store, 0, 0);

        let day1 = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        store.toggle_topic_at(&math, &a, day1);
        let day2 = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        // This un-completes the topic, yet the streak still extends
        store.toggle_topic_at(&math, &a, day2);

        assert!(!store.data().subjects[0].topics[0].done);
        assert_eq!(store.stats().streak, 2);
    }

    #[test]
    fn test_toggle_on_missing_topic_leaves_streak_alone() {
        let mut store = test_store();
        store.add_subject("Math");
        let math = subject_id(&store, 0);

        store.toggle_topic(&math, "no-such-topic");
        store.toggle_topic("no-such-subject", "no-such-topic");

        assert_eq!(store.stats().streak, 0);
        assert!(store.data().last_study_date.is_none());
    }

    #[test]
    fn test_exams_stay_sorted_after_every_add() {
        let mut store = test_store();
        store.add_exam("History", "2026-06-03".parse().unwrap(), "09:00");
        store.add_exam("Math", "2026-06-01".parse().unwrap(), "14:00");
        store.add_exam("Physics", "2026-06-01".parse().unwrap(), "09:00");
        store.add_exam("Biology", "2026-06-02".parse().unwrap(), "09:00");

        let subjects: Vec<&str> = store
            .data()
            .exams
            .iter()
            .map(|e| e.subject.as_str())
            .collect();
        assert_eq!(subjects, vec!["Physics", "Math", "Biology", "History"]);
    }

    #[test]
    fn test_equal_exam_slots_keep_insertion_order() {
        let mut store = test_store();
        store.add_exam("First", "2026-06-01".parse().unwrap(), "09:00");
        store.add_exam("Second", "2026-06-01".parse().unwrap(), "09:00");

        assert_eq!(store.data().exams[0].subject, "First");
        assert_eq!(store.data().exams[1].subject, "Second");
    }

    #[test]
    fn test_delete_exam() {
        let mut store = test_store();
        store.add_exam("Math", "2026-06-01".parse().unwrap(), "09:00");
        let id = store.data().exams[0].id.clone();

        store.delete_exam(&id);
        assert!(store.data().exams.is_empty());

        store.delete_exam(&id);
        assert!(store.data().exams.is_empty());
    }

    #[test]
    fn test_sweep_completes_overdue_exams_once() {
        let mut store = test_store();
        store.add_exam("Math", "2026-01-10".parse().unwrap(), "09:00");
        store.add_exam("Physics", "2026-01-20".parse().unwrap(), "09:00");

        let now = Local.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        store.auto_complete_exams_at(now);

        let math = &store.data().exams[0];
        assert_eq!(math.status, ExamStatus::Completed);
        let first_completed_at = math.completed_at.unwrap();

        let physics = &store.data().exams[1];
        assert_eq!(physics.status, ExamStatus::Pending);
        assert!(physics.completed_at.is_none());

        // A second sweep leaves the completed exam untouched
        let later = Local.with_ymd_and_hms(2026, 1, 16, 12, 0, 0).unwrap();
        store.auto_complete_exams_at(later);
        assert_eq!(store.data().exams[0].completed_at.unwrap(), first_completed_at);
        assert_eq!(store.data().exams[1].status, ExamStatus::Pending);
    }

    #[test]
    fn test_sweep_skips_unparseable_times() {
        let mut store = test_store();
        store.add_exam("Math", "2026-01-10".parse().unwrap(), "morning");

        let now = Local.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        store.auto_complete_exams_at(now);

        assert_eq!(store.data().exams[0].status, ExamStatus::Pending);
    }

    #[test]
    fn test_reset_all_preserves_exams_and_name() {
        let mut store = test_store();
        store.set_exam_name("Finals");
        store.add_subject("Math");
        let math = subject_id(&store, 0);
        store.add_topic(&math, "Algebra");
        let tid = topic_id(&store, 0, 0);
        store.toggle_topic(&math, &tid);
        store.add_exam("Math", "2026-06-01".parse().unwrap(), "09:00");

        store.reset_all();

        assert!(store.data().subjects.is_empty());
        assert_eq!(store.data().streak, 0);
        assert!(store.data().last_study_date.is_none());
        assert_eq!(store.data().exam_name, "Finals");
        assert_eq!(store.data().exams.len(), 1);
    }

    #[test]
    fn test_snapshot_survives_store_restarts() {
        let temp_dir = TempDir::new().unwrap();

        {
            let storage = FileStorage::new(temp_dir.path().to_path_buf()).unwrap();
            let mut store = StudyStore::new(Box::new(storage));
            store.set_exam_name("Finals");
            store.add_subject("Math");
            let math = subject_id(&store, 0);
            store.add_topic(&math, "Algebra");
            let tid = topic_id(&store, 0, 0);
            store.toggle_topic(&math, &tid);
        }

        let storage = FileStorage::new(temp_dir.path().to_path_buf()).unwrap();
        let store = StudyStore::new(Box::new(storage));
        assert_eq!(store.data().exam_name, "Finals");
        assert_eq!(store.data().subjects[0].topics[0].title, "Algebra");
        assert!(store.data().subjects[0].topics[0].done);
        assert_eq!(store.stats().xp, 10);
        assert_eq!(store.stats().streak, 1);
    }
}
