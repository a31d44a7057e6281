//! Quiz session state: score, badges, and detection history.
//!
//! The state is an explicit value passed through pure update functions
//! rather than ambient mutable globals: each update consumes the old state
//! and returns the new one, alongside a description of what changed. User
//! answers affect only the session; they are never fed back into the model.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::corpus::TrainingExample;
use crate::ml::classifier::Label;

/// Points awarded for a correct challenge answer.
pub const POINTS_PER_CORRECT: u32 = 10;

/// Maximum number of characters kept in a history preview.
const PREVIEW_CHARS: usize = 50;

/// Badges awarded as the session score grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Badge {
    /// Awarded at 50 points.
    NoviceDetector,
    /// Awarded at 100 points.
    ExpertDetector,
}

impl Badge {
    /// All badges, in ascending threshold order.
    pub const ALL: [Badge; 2] = [Badge::NoviceDetector, Badge::ExpertDetector];

    /// Score required to earn this badge.
    pub fn threshold(self) -> u32 {
        match self {
            Badge::NoviceDetector => 50,
            Badge::ExpertDetector => 100,
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Badge::NoviceDetector => write!(f, "Novice Detector"),
            Badge::ExpertDetector => write!(f, "Expert Detector"),
        }
    }
}

/// One entry in the detection history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Truncated preview of the analyzed or quizzed text.
    pub content: String,
    /// The classifier's verdict, or the challenge's true label.
    pub verdict: Label,
    /// Whether the user answered correctly; `None` for plain analyses.
    pub correct: Option<bool>,
    /// Points earned by this entry.
    pub points: u32,
    /// When the entry was recorded.
    pub at: DateTime<Utc>,
}

/// A quiz round: a sentence and its true label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// The text shown to the user.
    pub text: String,
    /// The correct answer.
    pub answer: Label,
}

impl Challenge {
    /// Draw a random challenge from a labeled corpus.
    ///
    /// Returns `None` for an empty corpus.
    pub fn draw<R: Rng + ?Sized>(corpus: &[TrainingExample], rng: &mut R) -> Option<Challenge> {
        corpus.choose(rng).map(|example| Challenge {
            text: example.text.clone(),
            answer: example.label,
        })
    }
}

/// What a single answer changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// Whether the answer matched the challenge's true label.
    pub correct: bool,
    /// Points awarded for this answer.
    pub points_awarded: u32,
    /// Badges newly earned by this answer.
    pub new_badges: Vec<Badge>,
}

/// Session-scoped quiz state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Total points earned this session.
    pub score: u32,
    /// Badges earned so far, in the order they were earned.
    pub badges: Vec<Badge>,
    /// Detection history, oldest first.
    pub history: Vec<DetectionRecord>,
}

impl SessionState {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a plain analysis (no quiz answer, no points).
    pub fn record_analysis(mut self, text: &str, verdict: Label) -> SessionState {
        self.history.push(DetectionRecord {
            content: preview(text),
            verdict,
            correct: None,
            points: 0,
            at: Utc::now(),
        });
        self
    }

    /// Apply a challenge answer, returning the new state and the outcome.
    ///
    /// A correct answer earns [`POINTS_PER_CORRECT`] points; badges whose
    /// threshold the new score reaches are awarded exactly once.
    pub fn apply_answer(
        mut self,
        challenge: &Challenge,
        answer: Label,
    ) -> (SessionState, AnswerOutcome) {
        let correct = answer == challenge.answer;
        let points_awarded = if correct { POINTS_PER_CORRECT } else { 0 };
        self.score += points_awarded;

        let mut new_badges = Vec::new();
        for badge in Badge::ALL {
            if self.score >= badge.threshold() && !self.badges.contains(&badge) {
                self.badges.push(badge);
                new_badges.push(badge);
            }
        }

        self.history.push(DetectionRecord {
            content: preview(&challenge.text),
            verdict: challenge.answer,
            correct: Some(correct),
            points: points_awarded,
            at: Utc::now(),
        });

        (
            self,
            AnswerOutcome {
                correct,
                points_awarded,
                new_badges,
            },
        )
    }

    /// The next badge still to be earned and how many points remain.
    pub fn next_badge(&self) -> Option<(Badge, u32)> {
        Badge::ALL
            .into_iter()
            .find(|badge| !self.badges.contains(badge))
            .map(|badge| (badge, badge.threshold().saturating_sub(self.score)))
    }
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn challenge(answer: Label) -> Challenge {
        Challenge {
            text: "Your order #12345 has been shipped and will arrive on Friday.".to_string(),
            answer,
        }
    }

    #[test]
    fn test_correct_answer_scores_points() {
        let state = SessionState::new();
        let (state, outcome) =
            state.apply_answer(&challenge(Label::Legitimate), Label::Legitimate);

        assert!(outcome.correct);
        assert_eq!(outcome.points_awarded, POINTS_PER_CORRECT);
        assert_eq!(state.score, 10);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].correct, Some(true));
    }

    #[test]
    fn test_wrong_answer_scores_nothing() {
        let state = SessionState::new();
        let (state, outcome) =
            state.apply_answer(&challenge(Label::Phishing), Label::Legitimate);

        assert!(!outcome.correct);
        assert_eq!(outcome.points_awarded, 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.history[0].correct, Some(false));
    }

    #[test]
    fn test_badges_awarded_once_at_thresholds() {
        let mut state = SessionState::new();
        let mut novice_awards = 0;

        for round in 1..=10 {
            let (next, outcome) =
                state.apply_answer(&challenge(Label::Phishing), Label::Phishing);
            state = next;
            novice_awards += outcome
                .new_badges
                .iter()
                .filter(|b| **b == Badge::NoviceDetector)
                .count();

            if round == 5 {
                assert_eq!(outcome.new_badges, vec![Badge::NoviceDetector]);
            }
            if round == 10 {
                assert_eq!(outcome.new_badges, vec![Badge::ExpertDetector]);
            }
        }

        assert_eq!(novice_awards, 1);
        assert_eq!(state.score, 100);
        assert_eq!(
            state.badges,
            vec![Badge::NoviceDetector, Badge::ExpertDetector]
        );
    }

    #[test]
    fn test_next_badge_countdown() {
        let state = SessionState::new();
        assert_eq!(state.next_badge(), Some((Badge::NoviceDetector, 50)));

        let (state, _) = state.apply_answer(&challenge(Label::Phishing), Label::Phishing);
        assert_eq!(state.next_badge(), Some((Badge::NoviceDetector, 40)));
    }

    #[test]
    fn test_record_analysis_truncates_preview() {
        let long_text = "a".repeat(80);
        let state = SessionState::new().record_analysis(&long_text, Label::Legitimate);

        assert_eq!(state.history[0].content.len(), 53);
        assert!(state.history[0].content.ends_with("..."));
        assert_eq!(state.history[0].points, 0);
        assert_eq!(state.history[0].correct, None);
    }

    #[test]
    fn test_challenge_draw_from_corpus() {
        let corpus = crate::corpus::bootstrap_corpus();
        let mut rng = StdRng::seed_from_u64(7);

        let drawn = Challenge::draw(&corpus, &mut rng).unwrap();
        assert!(corpus.iter().any(|e| e.text == drawn.text && e.label == drawn.answer));

        assert!(Challenge::draw(&[], &mut rng).is_none());
    }
}
