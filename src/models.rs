//! Data models for the feedback tracker.
//!
//! This module contains the core data structures: sessions, participants,
//! submitted feedback, the fixed questionnaire, and the AI-generated
//! session insight.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six fixed evaluation dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Material,
    Presenter,
    Engagement,
    Outcomes,
    Logistics,
    Overall,
}

impl Category {
    /// All categories in questionnaire order.
    pub const ALL: [Category; 6] = [
        Category::Material,
        Category::Presenter,
        Category::Engagement,
        Category::Outcomes,
        Category::Logistics,
        Category::Overall,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Material => "Material",
            Category::Presenter => "Presenter",
            Category::Engagement => "Engagement",
            Category::Outcomes => "Outcomes",
            Category::Logistics => "Logistics",
            Category::Overall => "Overall",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How a question is answered.
///
/// `Choice` questions store the selected index in the score field; they
/// never participate in numeric averaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// 1-5 integer rating.
    Rating,
    /// Multiple choice; score is an index into the option labels.
    Choice(&'static [&'static str]),
}

/// A single questionnaire entry.
#[derive(Debug, Clone, Copy)]
pub struct Question {
    pub category: Category,
    pub index: usize,
    pub text: &'static str,
    pub kind: QuestionKind,
}

/// The fixed evaluation questionnaire: 4 + 4 + 3 + 3 + 2 + 2 = 18 questions.
pub static QUESTIONNAIRE: [Question; 18] = [
    Question {
        category: Category::Material,
        index: 0,
        text: "The training material was well-structured and organized.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Material,
        index: 1,
        text: "The content was relevant to my job / role.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Material,
        index: 2,
        text: "The material matched the stated learning objectives.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Material,
        index: 3,
        text: "The technical depth of the material was appropriate.",
        kind: QuestionKind::Choice(&["Basic", "Appropriate", "Advanced"]),
    },
    Question {
        category: Category::Presenter,
        index: 0,
        text: "The resource person demonstrated strong subject knowledge.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Presenter,
        index: 1,
        text: "Concepts were explained clearly and effectively.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Presenter,
        index: 2,
        text: "The presenter encouraged interaction and questions.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Presenter,
        index: 3,
        text: "Time was managed effectively during the session.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Engagement,
        index: 0,
        text: "The session was engaging and maintained my interest.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Engagement,
        index: 1,
        text: "Teaching methods (examples, discussion, activities) were effective.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Engagement,
        index: 2,
        text: "The pace of the session was appropriate.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Outcomes,
        index: 0,
        text: "I gained new knowledge or skills from this session.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Outcomes,
        index: 1,
        text: "I can apply what I learned in my work.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Outcomes,
        index: 2,
        text: "The session met my expectations.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Logistics,
        index: 0,
        text: "Session timing and duration were appropriate.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Logistics,
        index: 1,
        text: "Technical and organizational arrangements were satisfactory.",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Overall,
        index: 0,
        text: "Overall rating of this session",
        kind: QuestionKind::Rating,
    },
    Question {
        category: Category::Overall,
        index: 1,
        text: "Would you recommend this session to others?",
        kind: QuestionKind::Choice(&["Yes", "No", "Maybe"]),
    },
];

/// Look up a question by category and index.
pub fn find_question(category: Category, index: usize) -> Option<&'static Question> {
    QUESTIONNAIRE
        .iter()
        .find(|q| q.category == category && q.index == index)
}

/// Whether an answer to (category, index) carries a numeric 1-5 rating.
///
/// Unknown indexes count as ratings; only the two declared choice
/// questions are excluded from averaging.
pub fn is_rating(category: Category, index: usize) -> bool {
    !matches!(
        find_question(category, index).map(|q| q.kind),
        Some(QuestionKind::Choice(_))
    )
}

/// Questions belonging to one category, in index order.
pub fn questions_in(category: Category) -> impl Iterator<Item = &'static Question> {
    QUESTIONNAIRE.iter().filter(move |q| q.category == category)
}

/// A training session on the event program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    /// Calendar day of the session.
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub presenter_name: String,
    pub presenter_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presenter_phone: Option<String>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_url: Option<String>,
}

/// A registered participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A single answer within a feedback record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionFeedback {
    pub category: Category,
    pub question: usize,
    /// Rating 1-5, or the selected option index for choice questions.
    pub score: u8,
    /// Option label for choice answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_value: Option<String>,
}

/// One submitted evaluation form. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    pub session_id: String,
    pub participant_id: String,
    pub answers: Vec<QuestionFeedback>,
    pub comments: String,
    pub submitted_at: DateTime<Utc>,
}

impl Feedback {
    /// A record is complete when it carries exactly one answer for every
    /// questionnaire entry.
    pub fn is_complete(&self) -> bool {
        self.answers.len() == QUESTIONNAIRE.len()
            && QUESTIONNAIRE.iter().all(|q| {
                self.answers
                    .iter()
                    .any(|a| a.category == q.category && a.question == q.index)
            })
    }
}

/// Generate a fresh opaque identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Per-category finding inside a session insight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInsight {
    pub category: String,
    pub score: String,
    pub analysis: String,
    pub detailed_recommendation: String,
}

/// Three-part forward plan inside a session insight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FutureImprovements {
    pub material: String,
    pub delivery: String,
    pub engagement: String,
}

/// AI-generated narrative report for one session.
///
/// Produced fresh on each analysis request; never cached or persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInsight {
    pub session_id: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub overall_summary: String,
    pub category_analysis: Vec<CategoryInsight>,
    pub future_improvements: FutureImprovements,
}

/// Status tier for an average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Excellent,
    Satisfactory,
    Critical,
}

impl Tier {
    /// Fixed business thresholds; each tier includes its lower bound.
    pub fn from_score(score: f64) -> Self {
        if score >= 4.2 {
            Tier::Excellent
        } else if score >= 3.5 {
            Tier::Satisfactory
        } else {
            Tier::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent",
            Tier::Satisfactory => "Satisfactory",
            Tier::Critical => "Critical",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a complete answer set with every rating set to `val`.
    pub fn full_answers(val: u8) -> Vec<QuestionFeedback> {
        QUESTIONNAIRE
            .iter()
            .map(|q| match q.kind {
                QuestionKind::Rating => QuestionFeedback {
                    category: q.category,
                    question: q.index,
                    score: val,
                    text_value: None,
                },
                QuestionKind::Choice(options) => QuestionFeedback {
                    category: q.category,
                    question: q.index,
                    score: 1,
                    text_value: Some(options[1].to_string()),
                },
            })
            .collect()
    }

    /// A complete feedback record with every rating set to `val`.
    pub fn feedback(id: &str, session_id: &str, val: u8) -> Feedback {
        Feedback {
            id: id.to_string(),
            session_id: session_id.to_string(),
            participant_id: "p1".to_string(),
            answers: full_answers(val),
            comments: String::new(),
            submitted_at: Utc::now(),
        }
    }

    /// A session owned by the given presenter.
    pub fn session(id: &str, presenter: &str) -> Session {
        Session {
            id: id.to_string(),
            title: format!("Session {}", id),
            date: NaiveDate::from_ymd_opt(2024, 11, 12).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            presenter_name: presenter.to_string(),
            presenter_email: format!("{}@train.io", id),
            presenter_phone: None,
            location: "Room 1".to_string(),
            material_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::full_answers;
    use super::*;

    #[test]
    fn questionnaire_shape() {
        assert_eq!(QUESTIONNAIRE.len(), 18);
        let counts: Vec<usize> = Category::ALL
            .iter()
            .map(|c| questions_in(*c).count())
            .collect();
        assert_eq!(counts, vec![4, 4, 3, 3, 2, 2]);
    }

    #[test]
    fn choice_questions_are_not_ratings() {
        assert!(!is_rating(Category::Material, 3));
        assert!(!is_rating(Category::Overall, 1));
        assert!(is_rating(Category::Material, 0));
        assert!(is_rating(Category::Overall, 0));
        // Unknown indexes count as ratings.
        assert!(is_rating(Category::Logistics, 9));
    }

    #[test]
    fn choice_option_labels() {
        match find_question(Category::Material, 3).unwrap().kind {
            QuestionKind::Choice(options) => {
                assert_eq!(options, &["Basic", "Appropriate", "Advanced"])
            }
            _ => panic!("expected choice question"),
        }
        match find_question(Category::Overall, 1).unwrap().kind {
            QuestionKind::Choice(options) => assert_eq!(options, &["Yes", "No", "Maybe"]),
            _ => panic!("expected choice question"),
        }
    }

    #[test]
    fn feedback_completeness() {
        let mut fb = Feedback {
            id: "f1".to_string(),
            session_id: "s1".to_string(),
            participant_id: "p1".to_string(),
            answers: full_answers(4),
            comments: String::new(),
            submitted_at: Utc::now(),
        };
        assert!(fb.is_complete());

        fb.answers.pop();
        assert!(!fb.is_complete());
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(Tier::from_score(4.2), Tier::Excellent);
        assert_eq!(Tier::from_score(4.1999), Tier::Satisfactory);
        assert_eq!(Tier::from_score(3.5), Tier::Satisfactory);
        assert_eq!(Tier::from_score(3.4999), Tier::Critical);
        assert_eq!(Tier::from_score(5.0), Tier::Excellent);
        assert_eq!(Tier::from_score(0.0), Tier::Critical);
    }

    #[test]
    fn category_serde_names() {
        let json = serde_json::to_string(&Category::Outcomes).unwrap();
        assert_eq!(json, "\"outcomes\"");
        let back: Category = serde_json::from_str("\"material\"").unwrap();
        assert_eq!(back, Category::Material);
    }

    #[test]
    fn insight_serde_field_names() {
        let insight = SessionInsight {
            session_id: "s1".to_string(),
            strengths: vec!["a".to_string()],
            weaknesses: vec![],
            recommendations: vec![],
            overall_summary: "ok".to_string(),
            category_analysis: vec![CategoryInsight {
                category: "Material".to_string(),
                score: "4.50".to_string(),
                analysis: "fine".to_string(),
                detailed_recommendation: "keep".to_string(),
            }],
            future_improvements: FutureImprovements {
                material: "m".to_string(),
                delivery: "d".to_string(),
                engagement: "e".to_string(),
            },
        };
        let json = serde_json::to_string(&insight).unwrap();
        assert!(json.contains("\"sessionId\""));
        assert!(json.contains("\"overallSummary\""));
        assert!(json.contains("\"categoryAnalysis\""));
        assert!(json.contains("\"detailedRecommendation\""));
        assert!(json.contains("\"futureImprovements\""));
    }
}
