//! Gamification lookup tables: badges, motivational messages, level titles.
//!
//! Pure functions over already-derived numbers; total, no failure paths.

use serde::Serialize;

/// A streak badge shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub name: &'static str,
    pub emoji: &'static str,
}

/// Badge for the current streak, `None` below the first threshold
pub fn badge_for_streak(streak: u32) -> Option<Badge> {
    if streak >= 7 {
        return Some(Badge { name: "Legendary", emoji: "👑" });
    }
    if streak >= 5 {
        return Some(Badge { name: "Beast Mode", emoji: "🔥" });
    }
    if streak >= 3 {
        return Some(Badge { name: "Focused", emoji: "💪" });
    }
    if streak >= 1 {
        return Some(Badge { name: "Warm Up", emoji: "⭐" });
    }
    None
}

/// Motivational message for a progress percentage in 0..=100.
/// Seven bands; 0 and 100 are singled out.
pub fn motivational_message(progress: u32) -> &'static str {
    if progress == 0 {
        return "Every journey starts with a single step. Let's begin!";
    }
    if progress < 20 {
        return "Slow start but warriors don't quit. Keep pushing!";
    }
    if progress < 40 {
        return "Building momentum! You're on the right track.";
    }
    if progress < 60 {
        return "Momentum activated! You're doing amazing.";
    }
    if progress < 80 {
        return "Outstanding progress! Victory is within reach.";
    }
    if progress < 100 {
        return "YOU ARE UNSTOPPABLE! Almost there!";
    }
    "CHAMPION! You've conquered it all!"
}

/// Title for a level
pub fn level_title(level: u32) -> &'static str {
    if level == 0 {
        return "Beginner";
    }
    if level < 3 {
        return "Learner";
    }
    if level < 5 {
        return "Scholar";
    }
    if level < 8 {
        return "Expert";
    }
    if level < 12 {
        return "Master";
    }
    "Grand Master"
}
