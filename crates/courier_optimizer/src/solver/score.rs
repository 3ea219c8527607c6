use std::{
    cmp::Ordering,
    iter,
    ops::{Add, AddAssign},
};

use fxhash::FxHashMap;
use schemars::JsonSchema;
use serde::Serialize;

/// Lexicographic objective: hard constraint violations first, then the soft
/// cost. Lower is better.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Score {
    pub hard_score: f64,
    pub soft_score: f64,
}

impl Score {
    pub const ZERO: Score = Score {
        hard_score: 0.0,
        soft_score: 0.0,
    };

    pub fn hard(hard_score: f64) -> Self {
        Score {
            hard_score,
            soft_score: 0.0,
        }
    }

    pub fn soft(soft_score: f64) -> Self {
        Score {
            hard_score: 0.0,
            soft_score,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.hard_score > 0.0
    }
}

impl Eq for Score {}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hard_score
            .total_cmp(&other.hard_score)
            .then_with(|| self.soft_score.total_cmp(&other.soft_score))
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl iter::Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Score::ZERO, |acc, score| acc + score)
    }
}

impl Add<Score> for Score {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Score {
            hard_score: self.hard_score + other.hard_score,
            soft_score: self.soft_score + other.soft_score,
        }
    }
}

impl AddAssign<Score> for Score {
    fn add_assign(&mut self, other: Score) {
        self.hard_score += other.hard_score;
        self.soft_score += other.soft_score;
    }
}

pub const TRANSPORT_COST: &str = "transport_cost";
pub const LATENESS: &str = "lateness";
pub const SPAN_COST: &str = "span_cost";
pub const CAPACITY: &str = "capacity";
pub const TIME_HORIZON: &str = "time_horizon";
pub const UNASSIGNED_JOBS: &str = "unassigned_jobs";

/// Score broken down by objective term.
#[derive(Default, Clone, Debug, Serialize, JsonSchema)]
pub struct ScoreAnalysis {
    pub scores: FxHashMap<&'static str, Score>,
}

impl ScoreAnalysis {
    pub fn add(&mut self, name: &'static str, score: Score) {
        *self.scores.entry(name).or_insert(Score::ZERO) += score;
    }

    pub fn score(&self, name: &str) -> Score {
        self.scores.get(name).copied().unwrap_or(Score::ZERO)
    }

    pub fn total_score(&self) -> Score {
        self.scores.values().copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_sum() {
        let scores = vec![Score::hard(1.0), Score::soft(5.0), Score::soft(2.5)];
        let total: Score = scores.into_iter().sum();
        assert_eq!(total.hard_score, 1.0);
        assert_eq!(total.soft_score, 7.5);
        assert!(total.is_failure());
    }

    #[test]
    fn test_hard_score_dominates() {
        assert!(Score::hard(1.0) > Score::soft(1_000_000.0));
        assert!(Score::soft(10.0) < Score::soft(10.5));
        assert_eq!(Score::ZERO.cmp(&Score::soft(0.0)), Ordering::Equal);
    }

    #[test]
    fn test_analysis_total() {
        let mut analysis = ScoreAnalysis::default();
        analysis.add(TRANSPORT_COST, Score::soft(120.0));
        analysis.add(LATENESS, Score::soft(800.0));
        analysis.add(TRANSPORT_COST, Score::soft(30.0));

        assert_eq!(analysis.score(TRANSPORT_COST), Score::soft(150.0));
        assert_eq!(analysis.total_score(), Score::soft(950.0));
        assert_eq!(analysis.score(SPAN_COST), Score::ZERO);
    }
}
