//! Static keyword tables for whiteboard intent.
//!
//! Every phrase is lowercase and matched by plain substring containment.
//! Table order is observable: the first matching category wins.

use super::intent::{BoardType, DrawingType};

/// Ordered mapping from a category to its trigger phrases
#[derive(Debug, Clone, Copy)]
pub struct KeywordTable<C: 'static> {
    entries: &'static [(C, &'static [&'static str])],
}

impl<C: Copy + PartialEq> KeywordTable<C> {
    /// Wrap a static table
    pub const fn new(entries: &'static [(C, &'static [&'static str])]) -> Self {
        Self { entries }
    }

    /// Trigger phrases for a category, empty if the category is absent
    pub fn triggers(&self, category: &C) -> &'static [&'static str] {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, triggers)| *triggers)
            .unwrap_or(&[])
    }

    /// Number of trigger phrases of `category` contained in `text`
    pub fn count_matches(&self, category: &C, text: &str) -> usize {
        self.triggers(category)
            .iter()
            .filter(|phrase| text.contains(*phrase))
            .count()
    }

    /// First category, in table order, with any phrase contained in `text`
    pub fn first_match(&self, text: &str) -> Option<C> {
        self.entries
            .iter()
            .find(|(_, triggers)| contains_any(text, triggers))
            .map(|(category, _)| *category)
    }

    /// Categories in table order
    pub fn categories(&self) -> impl Iterator<Item = C> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }
}

/// True if any phrase is a substring of `text`
pub fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase))
}

/// Phrases signalling a demonstration vs. a practice request
pub const BOARD_TRIGGERS: KeywordTable<BoardType> = KeywordTable::new(&[
    (
        BoardType::Teacher,
        &[
            "show me",
            "explain",
            "demonstrate",
            "teach me",
            "how does",
            "what is",
            "example",
            "illustrate",
            "walk me through",
            "can you draw",
        ],
    ),
    (
        BoardType::Student,
        &[
            "let me",
            "i want to try",
            "i'll try",
            "my turn",
            "practice",
            "i think",
            "my answer",
            "check my",
            "on my own",
            "exercise",
        ],
    ),
]);

/// Tie-break words, checked before [`STUDENT_LEANING`]
pub const TEACHER_LEANING: &[&str] = &["show", "explain", "teach", "draw", "demonstrate"];

/// Tie-break words for the student board
pub const STUDENT_LEANING: &[&str] = &["try", "practice", "solve", "attempt", "myself"];

/// Diagram triggers in priority order
pub const DRAWING_TRIGGERS: KeywordTable<DrawingType> = KeywordTable::new(&[
    (
        DrawingType::ProbabilityScale,
        &[
            "probability scale",
            "likelihood scale",
            "how likely",
            "even chance",
            "0 to 1",
            "zero to one",
        ],
    ),
    (
        DrawingType::Distribution,
        &[
            "distribution",
            "histogram",
            "frequency table",
            "bar chart",
        ],
    ),
    (
        DrawingType::NormalCurve,
        &[
            "normal curve",
            "bell curve",
            "bell-shaped",
            "gaussian",
            "standard deviation",
            "z-score",
        ],
    ),
    (
        DrawingType::TreeDiagram,
        &[
            "tree diagram",
            "probability tree",
            "conditional probability",
            "independent events",
            "coin toss",
            "coin flip",
            "two dice",
        ],
    ),
]);

/// Looser generic terms, scanned only when no trigger matched.
/// Order differs from [`DRAWING_TRIGGERS`] and is observable.
pub const DRAWING_FALLBACKS: KeywordTable<DrawingType> = KeywordTable::new(&[
    (DrawingType::ProbabilityScale, &["scale", "impossible", "certain"]),
    (DrawingType::NormalCurve, &["normal", "bell", "curve", "gaussian"]),
    (DrawingType::TreeDiagram, &["tree", "conditional", "branch"]),
    (DrawingType::Distribution, &["distribution", "histogram", "frequency"]),
]);

#[cfg(test)]
mod tests {
    use super::*;

    fn all_phrases() -> Vec<&'static str> {
        let mut phrases = Vec::new();
        for board in BOARD_TRIGGERS.categories() {
            phrases.extend_from_slice(BOARD_TRIGGERS.triggers(&board));
        }
        for drawing in DRAWING_TRIGGERS.categories() {
            phrases.extend_from_slice(DRAWING_TRIGGERS.triggers(&drawing));
            phrases.extend_from_slice(DRAWING_FALLBACKS.triggers(&drawing));
        }
        phrases.extend_from_slice(TEACHER_LEANING);
        phrases.extend_from_slice(STUDENT_LEANING);
        phrases
    }

    #[test]
    fn test_tables_are_lowercase() {
        for phrase in all_phrases() {
            assert_eq!(phrase, phrase.to_lowercase(), "'{}' is not lowercase", phrase);
            assert!(!phrase.is_empty());
        }
    }

    #[test]
    fn test_drawing_priority_order() {
        let order: Vec<DrawingType> = DRAWING_TRIGGERS.categories().collect();
        assert_eq!(
            order,
            vec![
                DrawingType::ProbabilityScale,
                DrawingType::Distribution,
                DrawingType::NormalCurve,
                DrawingType::TreeDiagram,
            ]
        );

        let fallback: Vec<DrawingType> = DRAWING_FALLBACKS.categories().collect();
        assert_eq!(
            fallback,
            vec![
                DrawingType::ProbabilityScale,
                DrawingType::NormalCurve,
                DrawingType::TreeDiagram,
                DrawingType::Distribution,
            ]
        );
    }

    #[test]
    fn test_count_matches_is_substring_based() {
        // "exercise" hides inside "exercises", "practice" inside "practiced"
        let text = "i practiced the exercises";
        assert_eq!(BOARD_TRIGGERS.count_matches(&BoardType::Student, text), 2);
        assert_eq!(BOARD_TRIGGERS.count_matches(&BoardType::Teacher, text), 0);
    }

    #[test]
    fn test_first_match() {
        assert_eq!(
            DRAWING_TRIGGERS.first_match("draw a histogram of a coin toss"),
            Some(DrawingType::Distribution)
        );
        assert_eq!(
            DRAWING_TRIGGERS.first_match("a normal distribution"),
            Some(DrawingType::Distribution)
        );
        assert_eq!(DRAWING_TRIGGERS.first_match("nothing here"), None);
        assert!(contains_any("uncertain outcome", DRAWING_FALLBACKS.triggers(&DrawingType::ProbabilityScale)));
    }
}
