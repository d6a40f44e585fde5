use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use validator::Validate;

/// Story points are clamped to this value before division
pub const MIN_STORY_POINTS: f64 = 1.0;

/// Backlog-wide RICE inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RiceParams {
    /// Reach (1-100)
    #[validate(range(min = 1, max = 100))]
    pub reach: u32,

    /// Impact (1-10)
    #[validate(range(min = 1, max = 10))]
    pub impact: u32,

    /// Confidence percentage (1-100)
    #[validate(range(min = 1, max = 100))]
    pub confidence: u32,
}

impl Default for RiceParams {
    fn default() -> Self {
        Self {
            reach: 50,
            impact: 5,
            confidence: 80,
        }
    }
}

/// Computes `reach * impact * (confidence / 100) / max(story_points, 1)`
#[derive(Debug, Clone, Copy)]
pub struct PriorityScorer {
    params: RiceParams,
}

impl PriorityScorer {
    pub fn new(params: RiceParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RiceParams {
        &self.params
    }

    /// Score one issue. Missing story points count as 1.
    pub fn score(&self, story_points: Option<f64>) -> f64 {
        let effort = story_points
            .filter(|p| p.is_finite())
            .unwrap_or(MIN_STORY_POINTS)
            .max(MIN_STORY_POINTS);

        self.numerator() / effort
    }

    fn numerator(&self) -> f64 {
        self.params.reach as f64 * self.params.impact as f64 * (self.params.confidence as f64 / 100.0)
    }
}

/// Indices ordered by descending score; equal scores keep input order
pub fn rank_by_score(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Render a score for CSV output: shortest round-trip form, always with a decimal point
pub fn format_score(score: f64) -> String {
    let text = score.to_string();
    if score.is_finite() && !text.contains(&['.', 'e', 'E'][..]) {
        format!("{}.0", text)
    } else {
        text
    }
}
