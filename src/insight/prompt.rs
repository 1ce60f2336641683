//! Prompt construction for the session analysis request.

use crate::models::{Category, Feedback, Session};

/// Raw per-category means embedded in the analysis prompt.
///
/// These are simple means over every answer tagged with a category,
/// choice answers included. The dashboard's `category_average` excludes
/// the two choice questions; this path does not.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptAverages {
    pub material: f64,
    pub presenter: f64,
    pub engagement: f64,
    pub outcomes: f64,
    pub logistics: f64,
    pub overall: f64,
}

impl PromptAverages {
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

/// Compute the prompt averages for a set of feedback records.
pub fn prompt_averages(feedback: &[Feedback]) -> PromptAverages {
    let mean = |category: Category| {
        let scores: Vec<f64> = feedback
            .iter()
            .flat_map(|f| f.answers.iter())
            .filter(|a| a.category == category)
            .map(|a| a.score as f64)
            .collect();

        if scores.is_empty() {
            return 0.0;
        }
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    PromptAverages {
        material: mean(Category::Material),
        presenter: mean(Category::Presenter),
        engagement: mean(Category::Engagement),
        outcomes: mean(Category::Outcomes),
        logistics: mean(Category::Logistics),
        overall: mean(Category::Overall),
    }
}

/// Quote and concatenate participant comments, one per line.
///
/// Comments of five characters or fewer are dropped as noise.
pub fn collect_comments(feedback: &[Feedback]) -> String {
    feedback
        .iter()
        .filter(|f| f.comments.len() > 5)
        .map(|f| format!("\"{}\"", f.comments))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the deterministic analysis prompt for one session.
pub fn build_prompt(session: &Session, averages: &PromptAverages, comments: &str) -> String {
    format!(
        r#"Conduct a comprehensive training session analysis for: "{title}" led by {presenter} at {location}.

QUANTITATIVE DATA (Average scores 1-5 across metrics):
- Material Quality (Structure, Relevance, Depth): {material:.2}
- Presenter Competence (Clarity, Interaction, Time Mgmt): {presenter_score:.2}
- Engagement Index (Methods, Pace): {engagement:.2}
- Learning Outcomes (Application, Knowledge Gain): {outcomes:.2}
- Logistics (Timing, Environment): {logistics:.2}
- Overall Rating: {overall:.2}

QUALITATIVE FEEDBACK (Participant Comments):
{comments}

REQUIRED OUTPUT:
For EACH of the 6 categories (Material, Presenter, Engagement, Outcomes, Logistics, Overall), provide:
1. A specific analysis based on the scores and comments.
2. A detailed recommendation to improve that specific area.

Also provide:
- Top 3 General Strengths.
- Top 3 General Weaknesses.
- An executive summary.
- Future improvement plans for Material, Delivery, and Engagement.
"#,
        title = session.title,
        presenter = session.presenter_name,
        location = session.location,
        material = averages.material,
        presenter_score = averages.presenter,
        engagement = averages.engagement,
        outcomes = averages.outcomes,
        logistics = averages.logistics,
        overall = averages.overall,
        comments = comments,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{feedback, session};

    #[test]
    fn prompt_averages_include_choice_answers() {
        // All ratings 5, material choice answer stores index 1: the
        // unscoped material mean is (3 * 5 + 1) / 4 = 4.0, not 5.0.
        let fb = feedback("f1", "s1", 5);
        let averages = prompt_averages(&[fb]);
        assert_eq!(averages.material, 4.0);
        assert_eq!(averages.presenter, 5.0);
        assert_eq!(averages.overall, 3.0); // (5 + 1) / 2
    }

    #[test]
    fn prompt_averages_empty_category_is_zero() {
        let averages = prompt_averages(&[]);
        for category in Category::ALL {
            assert_eq!(averages.get(category), 0.0);
        }
    }

    #[test]
    fn short_comments_are_dropped() {
        let mut noisy = feedback("f1", "s1", 5);
        noisy.comments = "ok".to_string();
        let mut useful = feedback("f2", "s1", 4);
        useful.comments = "Excellent pacing and clear examples.".to_string();

        let block = collect_comments(&[noisy, useful]);
        assert_eq!(block, "\"Excellent pacing and clear examples.\"");
    }

    #[test]
    fn prompt_embeds_session_and_scores() {
        let s = session("s1", "Dr. Sarah Miller");
        let mut fb = feedback("f1", "s1", 5);
        fb.comments = "Very clear vision throughout.".to_string();

        let averages = prompt_averages(std::slice::from_ref(&fb));
        let comments = collect_comments(std::slice::from_ref(&fb));
        let prompt = build_prompt(&s, &averages, &comments);

        assert!(prompt.contains("Session s1"));
        assert!(prompt.contains("Dr. Sarah Miller"));
        assert!(prompt.contains("Overall Rating: 3.00"));
        assert!(prompt.contains("\"Very clear vision throughout.\""));
        assert!(prompt.contains("Top 3 General Strengths"));
    }
}
