//! Feedback aggregation and statistics.
//!
//! All functions here are pure and total over their inputs: empty or
//! degenerate data yields a sentinel (`0.0` / `None` / empty vec) instead
//! of an error, so callers can render an explicit empty state.

use crate::models::{is_rating, Category, Feedback, Session};
use std::collections::HashMap;

/// Per-category average scores across a set of feedback records.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAverages {
    pub material: f64,
    pub presenter: f64,
    pub engagement: f64,
    pub outcomes: f64,
    pub logistics: f64,
    pub overall: f64,
}

impl CategoryAverages {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Material => self.material,
            Category::Presenter => self.presenter,
            Category::Engagement => self.engagement,
            Category::Outcomes => self.outcomes,
            Category::Logistics => self.logistics,
            Category::Overall => self.overall,
        }
    }
}

/// One presenter's averaged overall score.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerScore {
    pub name: String,
    pub score: f64,
}

/// Mean rating a single feedback record gives to one category.
///
/// Choice answers (material index 3, overall index 1) carry option
/// indexes, not ratings, and are excluded. Returns 0.0 when no rating
/// entries remain.
pub fn category_average(feedback: &Feedback, category: Category) -> f64 {
    let ratings: Vec<f64> = feedback
        .answers
        .iter()
        .filter(|a| a.category == category && is_rating(category, a.question))
        .map(|a| a.score as f64)
        .collect();

    if ratings.is_empty() {
        return 0.0;
    }

    ratings.iter().sum::<f64>() / ratings.len() as f64
}

/// Average of `category_average` across all records, per category.
///
/// Returns `None` on an empty list so callers can distinguish "no data"
/// from a zero score.
pub fn overall_stats(feedback: &[Feedback]) -> Option<CategoryAverages> {
    if feedback.is_empty() {
        return None;
    }

    let mean = |category: Category| {
        feedback
            .iter()
            .map(|f| category_average(f, category))
            .sum::<f64>()
            / feedback.len() as f64
    };

    Some(CategoryAverages {
        material: mean(Category::Material),
        presenter: mean(Category::Presenter),
        engagement: mean(Category::Engagement),
        outcomes: mean(Category::Outcomes),
        logistics: mean(Category::Logistics),
        overall: mean(Category::Overall),
    })
}

/// Sessions held on the given date.
pub fn sessions_on_date(sessions: &[Session], date: chrono::NaiveDate) -> Vec<Session> {
    sessions.iter().filter(|s| s.date == date).cloned().collect()
}

/// Sessions led by the given presenter.
pub fn sessions_by_presenter(sessions: &[Session], presenter: &str) -> Vec<Session> {
    sessions
        .iter()
        .filter(|s| s.presenter_name == presenter)
        .cloned()
        .collect()
}

/// Feedback for sessions held on the given date.
pub fn filter_by_date(
    feedback: &[Feedback],
    sessions: &[Session],
    date: chrono::NaiveDate,
) -> Vec<Feedback> {
    feedback_for_sessions(feedback, &sessions_on_date(sessions, date))
}

/// Feedback for sessions led by the given presenter.
pub fn filter_by_presenter(
    feedback: &[Feedback],
    sessions: &[Session],
    presenter: &str,
) -> Vec<Feedback> {
    feedback_for_sessions(feedback, &sessions_by_presenter(sessions, presenter))
}

fn feedback_for_sessions(feedback: &[Feedback], sessions: &[Session]) -> Vec<Feedback> {
    let session_ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    feedback
        .iter()
        .filter(|f| session_ids.contains(&f.session_id.as_str()))
        .cloned()
        .collect()
}

/// Bucket counts for the primary overall rating question (index 0).
///
/// `result[i]` counts ratings of `i + 1`; scores outside 1-5 are dropped.
pub fn rating_distribution(feedback: &[Feedback]) -> [usize; 5] {
    let mut buckets = [0usize; 5];

    for f in feedback {
        let score = f
            .answers
            .iter()
            .find(|a| a.category == Category::Overall && a.question == 0)
            .map(|a| a.score)
            .unwrap_or(0);

        if (1..=5).contains(&score) {
            buckets[score as usize - 1] += 1;
        }
    }

    buckets
}

/// Average overall score per presenter, sorted best first.
///
/// Groups by presenter name string equality, so two sessions from the
/// same presenter merge into one entry. Feedback whose session cannot be
/// resolved (deleted session) is excluded.
pub fn speaker_comparison(feedback: &[Feedback], sessions: &[Session]) -> Vec<SpeakerScore> {
    let mut groups: HashMap<String, (f64, usize)> = HashMap::new();

    for f in feedback {
        if let Some(session) = sessions.iter().find(|s| s.id == f.session_id) {
            let score = category_average(f, Category::Overall);
            let entry = groups.entry(session.presenter_name.clone()).or_insert((0.0, 0));
            entry.0 += score;
            entry.1 += 1;
        }
    }

    let mut scores: Vec<SpeakerScore> = groups
        .into_iter()
        .map(|(name, (total, count))| SpeakerScore {
            name,
            score: total / count as f64,
        })
        .collect();

    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scores
}

/// Distinct session dates, sorted ascending.
pub fn unique_dates(sessions: &[Session]) -> Vec<chrono::NaiveDate> {
    let mut dates: Vec<chrono::NaiveDate> = sessions.iter().map(|s| s.date).collect();
    dates.sort();
    dates.dedup();
    dates
}

/// Distinct presenter names, sorted.
pub fn unique_presenters(sessions: &[Session]) -> Vec<String> {
    let mut names: Vec<String> = sessions.iter().map(|s| s.presenter_name.clone()).collect();
    names.sort();
    names.dedup();
    names
}
