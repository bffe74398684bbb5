//! Study tracking data models

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of study content within a subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Unique within the owning subject
    pub id: String,
    pub title: String,
    /// Completion flag, flipped by toggle
    pub done: bool,
    /// Set when `done` flips to true, cleared when it flips back
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A named grouping of topics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Unique across the snapshot
    pub id: String,
    pub name: String,
    /// Insertion order is display order
    pub topics: Vec<Topic>,
}

/// Exam completion status. Only the auto-completion sweep writes
/// `Completed`; there is no manual mark-complete path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExamStatus {
    Pending,
    Completed,
}

/// A scheduled exam. The subject is a free-text label, not a reference
/// to a [`Subject`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: String,
    pub subject: String,
    /// Scheduled date (YYYY-MM-DD)
    pub exam_date: NaiveDate,
    /// Scheduled time of day (HH:MM, 24-hour)
    pub exam_time: String,
    pub status: ExamStatus,
    /// Set by the auto-completion sweep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Exam {
    /// Scheduled moment as a local naive datetime, `None` if the stored
    /// time string does not parse as HH:MM.
    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        NaiveTime::parse_from_str(&self.exam_time, "%H:%M")
            .ok()
            .map(|t| self.exam_date.and_time(t))
    }

    /// Display classification relative to the current local time.
    ///
    /// Presentation-only: an exam can show as `Today` while its
    /// authoritative `status` stays `Pending` until the scheduled
    /// instant passes and the next sweep runs.
    pub fn urgency(&self, now: DateTime<Local>) -> ExamUrgency {
        if self.status == ExamStatus::Completed {
            return ExamUrgency::Completed;
        }
        let today = now.date_naive();
        if self.exam_date == today {
            return ExamUrgency::Today;
        }
        if self.exam_date < today {
            return ExamUrgency::Past;
        }
        let scheduled = self
            .scheduled_at()
            .unwrap_or_else(|| self.exam_date.and_time(NaiveTime::MIN));
        let diff = scheduled.signed_duration_since(now.naive_local());
        // Ceiling of the remaining time in whole days
        let days = (diff.num_seconds() + 86_399) / 86_400;
        if days <= 1 {
            ExamUrgency::Tomorrow
        } else {
            ExamUrgency::DaysLeft(days)
        }
    }
}

/// How urgent a pending exam is, for display purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamUrgency {
    Completed,
    Today,
    Past,
    Tomorrow,
    DaysLeft(i64),
}

impl std::fmt::Display for ExamUrgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExamUrgency::Completed => write!(f, "Completed"),
            ExamUrgency::Today => write!(f, "Today"),
            ExamUrgency::Past => write!(f, "Past"),
            ExamUrgency::Tomorrow => write!(f, "Tomorrow"),
            ExamUrgency::DaysLeft(days) => write!(f, "{}d left", days),
        }
    }
}

/// The root snapshot: everything the app persists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyData {
    /// Free-text label for the current exam cycle
    pub exam_name: String,
    pub subjects: Vec<Subject>,
    /// Added after the first release; older snapshots lack the field
    #[serde(default)]
    pub exams: Vec<Exam>,
    /// Set once at first creation, never mutated
    pub created_at: DateTime<Utc>,
    /// Most recent topic toggle, drives streak computation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_study_date: Option<DateTime<Utc>>,
    /// Consecutive-day study count
    pub streak: u32,
}

impl StudyData {
    /// Fresh default snapshot
    pub fn new() -> Self {
        Self {
            exam_name: String::new(),
            subjects: Vec::new(),
            exams: Vec::new(),
            created_at: Utc::now(),
            last_study_date: None,
            streak: 0,
        }
    }
}

impl Default for StudyData {
    fn default() -> Self {
        Self::new()
    }
}

/// Derived statistics, recomputed on every read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    pub total_topics: usize,
    pub completed_topics: usize,
    /// Rounded percentage in 0..=100, 0 when there are no topics
    pub progress: u32,
    pub xp: u32,
    pub level: u32,
    pub streak: u32,
}
