//! Simulated grading used when the vision oracle cannot answer.
//!
//! The student always gets a score and encouraging feedback. Scores are drawn
//! uniformly from `[60, 100]` and every result is marked `fallbackUsed` so
//! simulated grades can be told apart from real ones downstream.

use rand::Rng;

use super::analysis::{Evaluation, EvaluationDetails, TaskKind};

pub const MIN_SIMULATED_SCORE: u8 = 60;
pub const MAX_SIMULATED_SCORE: u8 = 100;

/// Produce a simulated grade for `task`. `vision_error` explains why the
/// oracle was skipped and is echoed back in the details.
pub fn simulate<R: Rng + ?Sized>(rng: &mut R, task: TaskKind, vision_error: Option<String>) -> Evaluation {
    let score = rng.random_range(MIN_SIMULATED_SCORE..=MAX_SIMULATED_SCORE);
    let mut details = EvaluationDetails::empty(task);
    details.fallback_used = true;
    details.vision_error = vision_error;
    Evaluation { score, feedback: feedback_for(task, score), details }
}

fn feedback_for(task: TaskKind, score: u8) -> String {
    let praise = if score >= 90 { "Excellent work!" } else if score >= 75 { "Good job!" } else { "Nice try!" };
    let hint = match task {
        TaskKind::Circling => "Make sure each circle goes all the way around the right picture.",
        TaskKind::Matching => "Check that every line starts and ends on a picture.",
        TaskKind::General => "Keep practicing and your drawings will get even clearer.",
    };
    format!("{praise} {hint}")
}

#[cfg(test)]
#[path = "fallback_test.rs"]
mod tests;
