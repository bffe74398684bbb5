//! Study data core: canonical state, derived statistics, exam sweep.

pub mod ident;
pub mod models;
pub mod scheduler;
pub mod store;
pub mod streak;

pub use models::*;
pub use scheduler::ExamSweepScheduler;
pub use store::StudyStore;
