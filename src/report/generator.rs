//! Markdown rendering for session reports and the text dashboard.

use crate::analysis::{
    rating_distribution, speaker_comparison, CategoryAverages, SpeakerScore,
};
use crate::models::{Category, Feedback, Session, SessionInsight, Tier};
use anyhow::Result;

/// Generate a complete Markdown report for one session insight.
///
/// `averages` must come from the aggregation layer (`overall_stats` over
/// the session's feedback): the status tiers are defined over rating
/// answers only, so choice-question option indexes must not feed them.
pub fn generate_markdown_report(
    session: &Session,
    insight: &SessionInsight,
    averages: &CategoryAverages,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Session Report: {}\n\n", session.title));
    output.push_str(&generate_session_section(session));
    output.push_str(&generate_scores_section(averages));
    output.push_str(&generate_summary_section(&insight.overall_summary));
    output.push_str(&generate_category_section(insight));
    output.push_str(&generate_lists_section(insight));
    output.push_str(&generate_improvements_section(insight));
    output.push_str(&generate_footer());

    output
}

fn generate_session_section(session: &Session) -> String {
    let mut section = String::new();

    section.push_str("## Session\n\n");
    section.push_str(&format!("- **Date:** {}\n", session.date));
    section.push_str(&format!(
        "- **Time:** {} - {}\n",
        session.start_time.format("%H:%M"),
        session.end_time.format("%H:%M")
    ));
    section.push_str(&format!("- **Presenter:** {}\n", session.presenter_name));
    section.push_str(&format!("- **Location:** {}\n", session.location));
    section.push('\n');

    section
}

fn generate_scores_section(averages: &CategoryAverages) -> String {
    let mut section = String::new();

    section.push_str("## Scores\n\n");
    section.push_str("| Category | Average | Status |\n");
    section.push_str("|:---|:---:|:---|\n");
    for category in Category::ALL {
        let score = averages.get(category);
        section.push_str(&format!(
            "| {} | {:.2} | {} |\n",
            category,
            score,
            Tier::from_score(score)
        ));
    }
    section.push('\n');

    section
}

fn generate_summary_section(summary: &str) -> String {
    if summary.is_empty() {
        return String::new();
    }
    format!("## Executive Summary\n\n> {}\n\n", summary)
}

fn generate_category_section(insight: &SessionInsight) -> String {
    if insight.category_analysis.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Category Analysis\n\n");

    for entry in &insight.category_analysis {
        section.push_str(&format!(
            "### {} - {}/5.0\n\n",
            entry.category, entry.score
        ));
        section.push_str(&format!("**Findings:** {}\n\n", entry.analysis));
        section.push_str(&format!(
            "> 💡 **Recommendation:** {}\n\n",
            entry.detailed_recommendation
        ));
    }

    section
}

fn generate_lists_section(insight: &SessionInsight) -> String {
    let mut section = String::new();

    if !insight.strengths.is_empty() {
        section.push_str("## Strengths\n\n");
        for item in &insight.strengths {
            section.push_str(&format!("- {}\n", item));
        }
        section.push('\n');
    }

    if !insight.weaknesses.is_empty() {
        section.push_str("## Weaknesses\n\n");
        for item in &insight.weaknesses {
            section.push_str(&format!("- {}\n", item));
        }
        section.push('\n');
    }

    if !insight.recommendations.is_empty() {
        section.push_str("## Recommendations\n\n");
        for (i, item) in insight.recommendations.iter().enumerate() {
            section.push_str(&format!("{}. {}\n", i + 1, item));
        }
        section.push('\n');
    }

    section
}

fn generate_improvements_section(insight: &SessionInsight) -> String {
    let plan = &insight.future_improvements;
    let mut section = String::new();

    section.push_str("## Future Improvement Plan\n\n");
    section.push_str(&format!("- **Material:** {}\n", plan.material));
    section.push_str(&format!("- **Delivery:** {}\n", plan.delivery));
    section.push_str(&format!("- **Engagement:** {}\n", plan.engagement));
    section.push('\n');

    section
}

fn generate_footer() -> String {
    "---\n\n*Report generated by evalpulse*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(insight: &SessionInsight) -> Result<String> {
    serde_json::to_string_pretty(insight).map_err(Into::into)
}

/// Render the text dashboard for a (possibly filtered) feedback set.
///
/// `sessions` must be scoped to the same filter as `feedback`, so the
/// tracked-session count matches the view. `stats` is `None` when there
/// is no feedback, in which case an explicit empty state is rendered
/// instead of zero scores. The speaker ranking only belongs in the
/// unfiltered overall view; filtered views pass `include_ranking: false`.
pub fn render_dashboard(
    event_title: &str,
    stats: Option<&CategoryAverages>,
    feedback: &[Feedback],
    sessions: &[Session],
    include_ranking: bool,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", event_title));

    let stats = match stats {
        Some(stats) => stats,
        None => {
            output.push_str("Awaiting evaluation input: no feedback recorded yet.\n");
            return output;
        }
    };

    output.push_str("## Dimension Analysis\n\n");
    output.push_str("| Category | Average | Status |\n");
    output.push_str("|:---|:---:|:---|\n");
    for category in Category::ALL {
        let score = stats.get(category);
        output.push_str(&format!(
            "| {} | {:.2} | {} |\n",
            category,
            score,
            Tier::from_score(score)
        ));
    }
    output.push('\n');

    output.push_str("## Rating Spread\n\n");
    let distribution = rating_distribution(feedback);
    for (i, count) in distribution.iter().enumerate() {
        output.push_str(&format!("- {}-Star: {}\n", i + 1, count));
    }
    output.push('\n');

    if include_ranking {
        let ranking = speaker_comparison(feedback, sessions);
        if !ranking.is_empty() {
            output.push_str(&generate_speaker_section(&ranking));
        }
    }

    output.push_str(&format!(
        "Feedback volume: {} | Sessions tracked: {}\n",
        feedback.len(),
        sessions.len()
    ));

    output
}

fn generate_speaker_section(ranking: &[SpeakerScore]) -> String {
    let mut section = String::new();

    section.push_str("## Speaker Performance Benchmark\n\n");
    for entry in ranking {
        section.push_str(&format!("- {}: {:.2}\n", entry.name, entry.score));
    }
    section.push('\n');

    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::overall_stats;
    use crate::models::test_support::{feedback, session};
    use crate::models::{CategoryInsight, FutureImprovements};

    fn sample_insight() -> SessionInsight {
        SessionInsight {
            session_id: "s1".to_string(),
            strengths: vec!["Clear vision".to_string()],
            weaknesses: vec!["Pace a bit fast".to_string()],
            recommendations: vec!["Add breaks".to_string()],
            overall_summary: "A strong opening session.".to_string(),
            category_analysis: vec![CategoryInsight {
                category: "Material".to_string(),
                score: "4.50".to_string(),
                analysis: "Well structured.".to_string(),
                detailed_recommendation: "Add more case studies.".to_string(),
            }],
            future_improvements: FutureImprovements {
                material: "Refresh slides.".to_string(),
                delivery: "Slow down.".to_string(),
                engagement: "More Q&A.".to_string(),
            },
        }
    }

    fn sample_averages() -> CategoryAverages {
        CategoryAverages {
            material: 4.5,
            presenter: 4.8,
            engagement: 4.0,
            outcomes: 3.2,
            logistics: 4.1,
            overall: 4.3,
        }
    }

    #[test]
    fn markdown_report_contains_all_sections() {
        let markdown =
            generate_markdown_report(&session("s1", "Ada"), &sample_insight(), &sample_averages());

        assert!(markdown.contains("# Session Report: Session s1"));
        assert!(markdown.contains("## Scores"));
        assert!(markdown.contains("| Overall | 4.30 | Excellent |"));
        assert!(markdown.contains("| Outcomes | 3.20 | Critical |"));
        assert!(markdown.contains("A strong opening session."));
        assert!(markdown.contains("### Material - 4.50/5.0"));
        assert!(markdown.contains("- Clear vision"));
        assert!(markdown.contains("**Delivery:** Slow down."));
    }

    #[test]
    fn scores_table_ignores_choice_option_indexes() {
        // An all-5s form still stores low option indexes for the two
        // choice questions; the status column must not absorb them.
        let feedbacks = vec![feedback("f1", "s1", 5)];
        let averages = overall_stats(&feedbacks).unwrap();

        let markdown =
            generate_markdown_report(&session("s1", "Ada"), &sample_insight(), &averages);
        assert!(markdown.contains("| Material | 5.00 | Excellent |"));
        assert!(markdown.contains("| Overall | 5.00 | Excellent |"));
        assert!(!markdown.contains("Critical"));
    }

    #[test]
    fn json_report_round_trips() {
        let json = generate_json_report(&sample_insight()).unwrap();
        let back: SessionInsight = serde_json::from_str(&json).unwrap();
        assert_eq!(back.session_id, "s1");
    }

    #[test]
    fn dashboard_empty_state() {
        let output = render_dashboard("Forum 2024", None, &[], &[], true);
        assert!(output.contains("Awaiting evaluation input"));
        assert!(!output.contains("Dimension Analysis"));
    }

    #[test]
    fn dashboard_renders_stats_and_ranking() {
        let sessions = vec![session("s1", "Ada")];
        let feedbacks = vec![feedback("f1", "s1", 5)];
        let stats = overall_stats(&feedbacks);

        let output = render_dashboard("Forum 2024", stats.as_ref(), &feedbacks, &sessions, true);
        assert!(output.contains("# Forum 2024"));
        assert!(output.contains("| Overall | 5.00 | Excellent |"));
        assert!(output.contains("- 5-Star: 1"));
        assert!(output.contains("- Ada: 5.00"));
        assert!(output.contains("Feedback volume: 1"));
        assert!(output.contains("Sessions tracked: 1"));
    }

    #[test]
    fn filtered_dashboard_omits_ranking() {
        let sessions = vec![session("s1", "Ada")];
        let feedbacks = vec![feedback("f1", "s1", 5)];
        let stats = overall_stats(&feedbacks);

        let output = render_dashboard("Forum 2024", stats.as_ref(), &feedbacks, &sessions, false);
        assert!(!output.contains("Speaker Performance Benchmark"));
        assert!(output.contains("Sessions tracked: 1"));
    }
}
