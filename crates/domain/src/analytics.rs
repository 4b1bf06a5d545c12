//! Client-side analytics over fetched dashboard data
//!
//! Pure functions feeding the overview, projects and feedback screens. They
//! produce numbers only; presentation is the caller's concern.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{Feedback, Project};

const POSITIVE_KEYWORDS: [&str; 9] = [
    "good",
    "excellent",
    "great",
    "awesome",
    "wonderful",
    "satisfied",
    "happy",
    "thanks",
    "appreciate",
];

const NEGATIVE_KEYWORDS: [&str; 9] =
    ["bad", "poor", "terrible", "awful", "worse", "dissatisfied", "angry", "disappointed", "hate"];

/// Overall sentiment band derived from the sentiment score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentLabel {
    HighlyPositive,
    Positive,
    Neutral,
    Negative,
    HighlyNegative,
}

impl SentimentLabel {
    fn from_score(score: f64) -> Self {
        if score > 30.0 {
            Self::HighlyPositive
        } else if score > 10.0 {
            Self::Positive
        } else if score > -10.0 {
            Self::Neutral
        } else if score > -30.0 {
            Self::Negative
        } else {
            Self::HighlyNegative
        }
    }

    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighlyPositive => "Highly Positive",
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
            Self::HighlyNegative => "Highly Negative",
        }
    }
}

/// Aggregates shown on the feedback screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackSummary {
    pub total: usize,
    /// Mean rating rounded to one decimal, 0 when there is no feedback
    pub average_rating: f64,
    pub rating_distribution: BTreeMap<u8, usize>,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    /// Rounded percentages of `total`; the keyword pass can push a band
    /// past 100.
    pub positive_pct: u32,
    pub neutral_pct: u32,
    pub negative_pct: u32,
    pub score: f64,
    pub label: SentimentLabel,
}

impl FeedbackSummary {
    /// Summarize a feedback list; empty input gives an all-zero Neutral summary.
    pub fn from_feedback(feedback: &[Feedback]) -> Self {
        let total = feedback.len();
        let mut rating_distribution = BTreeMap::new();
        let (mut positive, mut neutral, mut negative) = (0usize, 0usize, 0usize);
        let mut rating_sum = 0u64;

        for item in feedback {
            rating_sum += u64::from(item.rating);
            *rating_distribution.entry(item.rating).or_insert(0) += 1;

            match item.rating {
                r if r >= 4 => positive += 1,
                3 => neutral += 1,
                _ => negative += 1,
            }

            // Keywords add to the rating vote, they never replace it.
            let comment = item.comment.to_lowercase();
            let has_positive = POSITIVE_KEYWORDS.iter().any(|k| comment.contains(k));
            let has_negative = NEGATIVE_KEYWORDS.iter().any(|k| comment.contains(k));
            match (has_positive, has_negative) {
                (true, false) => positive += 1,
                (false, true) => negative += 1,
                _ => {}
            }
        }

        if total == 0 {
            return Self {
                total,
                average_rating: 0.0,
                rating_distribution,
                positive,
                neutral,
                negative,
                positive_pct: 0,
                neutral_pct: 0,
                negative_pct: 0,
                score: 0.0,
                label: SentimentLabel::Neutral,
            };
        }

        let denominator = total as f64;
        let pct = |count: usize| ((count as f64 / denominator) * 100.0).round() as u32;
        let score = ((positive as f64 - negative as f64) / denominator) * 100.0;

        Self {
            total,
            average_rating: ((rating_sum as f64 / denominator) * 10.0).round() / 10.0,
            rating_distribution,
            positive,
            neutral,
            negative,
            positive_pct: pct(positive),
            neutral_pct: pct(neutral),
            negative_pct: pct(negative),
            score,
            label: SentimentLabel::from_score(score),
        }
    }
}

/// Budget progress of one project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectProgress {
    pub project_code: String,
    /// `used / allocated` as a rounded percentage
    pub progress_pct: i64,
    pub budget: f64,
}

/// Budget progress for the first `limit` projects.
pub fn project_progress(projects: &[Project], limit: usize) -> Vec<ProjectProgress> {
    projects
        .iter()
        .take(limit)
        .map(|project| {
            let allocated = project.budget_allocated_amount().unwrap_or(0.0);
            let used = project.budget_used_amount().unwrap_or(0.0);
            let progress = if allocated > 0.0 { (used / allocated) * 100.0 } else { 0.0 };
            ProjectProgress {
                project_code: project.project_code.clone(),
                progress_pct: progress.round() as i64,
                budget: allocated,
            }
        })
        .collect()
}

/// Number of projects per `status_en`.
pub fn status_distribution(projects: &[Project]) -> BTreeMap<String, usize> {
    projects.iter().fold(BTreeMap::new(), |mut acc, project| {
        *acc.entry(project.status_en.clone()).or_insert(0) += 1;
        acc
    })
}

/// Turn a `by_status_en` / `by_category_en` map into labelled rows:
/// underscores become spaces and labels are uppercased.
pub fn stat_entries(counts: &BTreeMap<String, u64>) -> Vec<(String, u64)> {
    counts.iter().map(|(key, count)| (key.replace('_', " ").to_uppercase(), *count)).collect()
}
