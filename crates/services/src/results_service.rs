use chrono::{DateTime, Duration, Months, Utc};
use std::sync::Arc;

use quiz_api::QuizApi;
use quiz_core::model::{QuizId, QuizResultRecord};

use crate::Clock;
use crate::error::ResultsError;

/// Window of history shown on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultPeriod {
    #[default]
    All,
    /// The last 7 days.
    LastWeek,
    /// The last calendar month.
    LastMonth,
}

impl ResultPeriod {
    /// Oldest `finished_at` that still falls inside the window.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::All => None,
            Self::LastWeek => Some(now - Duration::days(7)),
            Self::LastMonth => Some(now.checked_sub_months(Months::new(1)).unwrap_or(now)),
        }
    }

    #[must_use]
    pub fn contains(self, now: DateTime<Utc>, finished_at: DateTime<Utc>) -> bool {
        self.cutoff(now).is_none_or(|cutoff| finished_at >= cutoff)
    }
}

/// Badge earned from the statistics of a result window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Achievement {
    /// Five or more quizzes completed.
    QuizMaster,
    /// A best score of at least 90.
    HighAchiever,
    /// An average score of at least 75.
    ConsistentPerformer,
}

impl Achievement {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::QuizMaster => "Quiz Master",
            Self::HighAchiever => "High Achiever",
            Self::ConsistentPerformer => "Consistent Performer",
        }
    }
}

/// Aggregates over a set of results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultStats {
    pub total_quizzes: usize,
    pub average_score: f64,
    pub best_score: u32,
    pub total_minutes: f64,
    /// Mean of the three newest scores minus mean of the three oldest; `0.0` below
    /// six results.
    pub improvement: f64,
}

const IMPROVEMENT_WINDOW: usize = 3;

impl ResultStats {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_records(records: &[QuizResultRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let mut ordered: Vec<&QuizResultRecord> = records.iter().collect();
        ordered.sort_by_key(|r| std::cmp::Reverse(r.result.finished_at()));

        let scores: Vec<u32> = ordered.iter().map(|r| r.result.score()).collect();
        let mean = |slice: &[u32]| {
            slice.iter().map(|s| f64::from(*s)).sum::<f64>() / slice.len() as f64
        };
        let total_minutes = ordered
            .iter()
            .map(|r| r.result.duration().num_seconds() as f64 / 60.0)
            .sum();
        let improvement = if scores.len() >= IMPROVEMENT_WINDOW * 2 {
            mean(&scores[..IMPROVEMENT_WINDOW]) - mean(&scores[scores.len() - IMPROVEMENT_WINDOW..])
        } else {
            0.0
        };

        Self {
            total_quizzes: scores.len(),
            average_score: mean(&scores),
            best_score: scores.iter().copied().max().unwrap_or(0),
            total_minutes,
            improvement,
        }
    }

    #[must_use]
    pub fn achievements(&self) -> Vec<Achievement> {
        let mut earned = Vec::new();
        if self.total_quizzes >= 5 {
            earned.push(Achievement::QuizMaster);
        }
        if self.total_quizzes > 0 && self.best_score >= 90 {
            earned.push(Achievement::HighAchiever);
        }
        if self.total_quizzes > 0 && self.average_score >= 75.0 {
            earned.push(Achievement::ConsistentPerformer);
        }
        earned
    }
}

/// The `n` most recently finished results, newest first.
#[must_use]
pub fn recent(records: &[QuizResultRecord], n: usize) -> Vec<QuizResultRecord> {
    let mut ordered = records.to_vec();
    ordered.sort_by_key(|r| std::cmp::Reverse(r.result.finished_at()));
    ordered.truncate(n);
    ordered
}

/// Newest result recorded for `quiz_id`.
#[must_use]
pub fn latest_for_quiz(records: &[QuizResultRecord], quiz_id: QuizId) -> Option<&QuizResultRecord> {
    records
        .iter()
        .filter(|r| r.quiz.id == quiz_id)
        .max_by_key(|r| r.result.finished_at())
}

/// Reads the signed-in user's result history.
#[derive(Clone)]
pub struct ResultsService {
    clock: Clock,
    api: Arc<dyn QuizApi>,
}

impl ResultsService {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn QuizApi>) -> Self {
        Self { clock, api }
    }

    /// Results inside `period`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Network` if the history cannot be fetched.
    pub async fn list_results(
        &self,
        period: ResultPeriod,
    ) -> Result<Vec<QuizResultRecord>, ResultsError> {
        let now = self.clock.now();
        let mut records: Vec<QuizResultRecord> = self
            .api
            .list_results()
            .await?
            .into_iter()
            .filter(|r| period.contains(now, r.result.finished_at()))
            .collect();
        records.sort_by_key(|r| std::cmp::Reverse(r.result.finished_at()));
        tracing::debug!(?period, count = records.len(), "loaded quiz results");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuizRef, QuizResult, ResultId};
    use quiz_core::time::fixed_now;

    fn record(id: u64, quiz: u64, score: u32, days_ago: i64, minutes: i64) -> QuizResultRecord {
        let finished_at = fixed_now() - Duration::days(days_ago);
        QuizResultRecord {
            id: ResultId::new(id),
            quiz: QuizRef {
                id: QuizId::new(quiz),
                title: format!("Quiz {quiz}"),
            },
            result: QuizResult::new(
                score,
                0,
                10,
                finished_at - Duration::minutes(minutes),
                finished_at,
            )
            .unwrap(),
        }
    }

    #[test]
    fn empty_history_has_zero_stats() {
        let stats = ResultStats::from_records(&[]);
        assert_eq!(stats, ResultStats::default());
        assert!(stats.achievements().is_empty());
    }

    #[test]
    fn stats_aggregate_scores_and_time() {
        let records = vec![
            record(1, 1, 60, 3, 4),
            record(2, 2, 90, 1, 6),
            record(3, 3, 75, 2, 5),
        ];
        let stats = ResultStats::from_records(&records);

        assert_eq!(stats.total_quizzes, 3);
        assert!((stats.average_score - 75.0).abs() < 1e-9);
        assert_eq!(stats.best_score, 90);
        assert!((stats.total_minutes - 15.0).abs() < 1e-9);
        assert!(stats.improvement.abs() < f64::EPSILON);
        assert_eq!(
            stats.achievements(),
            vec![Achievement::HighAchiever, Achievement::ConsistentPerformer]
        );
    }

    #[test]
    fn improvement_compares_newest_and_oldest_three() {
        // Newest three average 80, oldest three average 50.
        let records: Vec<_> = [80, 70, 90, 40, 50, 60]
            .into_iter()
            .enumerate()
            .map(|(i, score)| {
                let n = u64::try_from(i).unwrap();
                record(n, n, score, i64::try_from(i).unwrap(), 1)
            })
            .collect();
        let stats = ResultStats::from_records(&records);

        assert!((stats.improvement - 30.0).abs() < 1e-9);
        assert!(stats.achievements().contains(&Achievement::QuizMaster));
    }

    #[test]
    fn periods_cut_by_finish_time() {
        let now = fixed_now();
        assert!(ResultPeriod::All.contains(now, now - Duration::days(400)));
        assert!(ResultPeriod::LastWeek.contains(now, now - Duration::days(7)));
        assert!(!ResultPeriod::LastWeek.contains(now, now - Duration::days(8)));
        assert!(ResultPeriod::LastMonth.contains(now, now - Duration::days(20)));
        assert!(!ResultPeriod::LastMonth.contains(now, now - Duration::days(40)));
    }

    #[test]
    fn recent_and_latest_pick_newest() {
        let records = vec![
            record(1, 1, 10, 5, 1),
            record(2, 2, 20, 1, 1),
            record(3, 1, 30, 2, 1),
        ];

        let newest: Vec<_> = recent(&records, 2).into_iter().map(|r| r.id).collect();
        assert_eq!(newest, vec![ResultId::new(2), ResultId::new(3)]);

        let latest = latest_for_quiz(&records, QuizId::new(1)).unwrap();
        assert_eq!(latest.id, ResultId::new(3));
        assert!(latest_for_quiz(&records, QuizId::new(9)).is_none());
    }
}
