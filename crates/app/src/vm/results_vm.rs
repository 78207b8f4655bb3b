use std::fmt::Write as _;

use quiz_core::model::{QuizResult, QuizResultRecord};
use services::ResultStats;

use super::time_fmt::{format_datetime, format_elapsed};

/// Result screen shown right after finishing.
#[must_use]
pub fn render_result(title: &str, result: &QuizResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}: {}% ({})", result.score(), result.band().label());
    let _ = writeln!(
        out,
        "{} of {} correct in {}",
        result.correct_answers(),
        result.total_questions(),
        format_elapsed(result.duration())
    );
    let unanswered_hint = result.correct_answers() < result.total_questions();
    if unanswered_hint {
        let _ = write!(out, "Unanswered questions count as incorrect.");
    }
    out.trim_end().to_owned()
}

/// History screen: aggregate statistics, achievements and one line per result.
#[must_use]
pub fn render_history(records: &[QuizResultRecord], stats: &ResultStats) -> String {
    if records.is_empty() {
        return "No results yet.".to_owned();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} quizzes  |  average {:.1}%  |  best {}%  |  {}m spent",
        stats.total_quizzes,
        stats.average_score,
        stats.best_score,
        stats.total_minutes.round()
    );
    if stats.improvement.abs() > f64::EPSILON {
        let _ = writeln!(out, "Trend: {:+.1}% (last 3 vs first 3)", stats.improvement);
    }
    let achievements: Vec<&str> = stats.achievements().iter().map(|a| a.label()).collect();
    if !achievements.is_empty() {
        let _ = writeln!(out, "Achievements: {}", achievements.join(", "));
    }
    let _ = writeln!(out);

    for record in records {
        let _ = writeln!(
            out,
            "{}  {:<30} {:>3}%  {:>2}/{:<2} {}",
            format_datetime(record.result.finished_at()),
            record.quiz.title,
            record.result.score(),
            record.result.correct_answers(),
            record.result.total_questions(),
            record.result.band().label()
        );
    }
    out.trim_end().to_owned()
}
