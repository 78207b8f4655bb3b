use std::fmt::Write as _;

use quiz_core::model::{QuizResultRecord, QuizSummary};

use super::time_fmt::format_datetime;

fn summary_line(quiz: &QuizSummary) -> String {
    let mut line = format!(
        "#{:<4} {}  ({} questions, ~{} min)",
        quiz.id,
        quiz.title,
        quiz.question_count,
        quiz.estimated_minutes()
    );
    if let Some(category) = &quiz.category {
        let _ = write!(line, "  [{category}]");
    }
    line
}

#[must_use]
pub fn render_catalog(quizzes: &[QuizSummary]) -> String {
    if quizzes.is_empty() {
        return "No quizzes published yet.".to_owned();
    }
    let mut out = String::new();
    for quiz in quizzes {
        let _ = writeln!(out, "{}", summary_line(quiz));
        if let Some(description) = &quiz.description {
            let _ = writeln!(out, "      {description}");
        }
    }
    out.trim_end().to_owned()
}

/// Dashboard: the latest results and quizzes not taken yet.
#[must_use]
pub fn render_dashboard(recent: &[QuizResultRecord], recommended: &[&QuizSummary]) -> String {
    let mut out = String::from("Recent results\n");
    if recent.is_empty() {
        out.push_str("  none yet\n");
    }
    for record in recent {
        let _ = writeln!(
            out,
            "  {}  {}  {}%",
            format_datetime(record.result.finished_at()),
            record.quiz.title,
            record.result.score()
        );
    }

    out.push_str("\nRecommended\n");
    if recommended.is_empty() {
        out.push_str("  you have taken every public quiz\n");
    }
    for quiz in recommended {
        let _ = writeln!(out, "  {}", summary_line(quiz));
    }
    out.trim_end().to_owned()
}
