//! studyxp — personal study tracking core.
//!
//! Owns the canonical study data (subjects, topics, exams), persists it
//! as a JSON snapshot through a pluggable key-value store, derives the
//! gamified statistics (progress, XP, level, streak, badges), and runs
//! the periodic sweep that completes overdue exams.
//!
//! The rendering layer calls mutation operations on [`StudyStore`] and
//! re-reads [`StudyStore::data`] and [`StudyStore::stats`] after each
//! one; it never constructs or mutates a snapshot directly.

pub mod gamification;
pub mod storage;
pub mod study;

pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};
pub use study::{ExamSweepScheduler, StudyData, StudyStats, StudyStore};
