//! RICE prioritization scoring

mod rice;

pub use rice::{format_score, rank_by_score, PriorityScorer, RiceParams, MIN_STORY_POINTS};
