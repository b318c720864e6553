//! Whiteboard intent classification.
//!
//! Decides which whiteboard (teacher demonstration or student practice) a
//! tutoring reply should reference, and which diagram, if any, to suggest.
//! Pure keyword scoring over the static tables in [`super::keywords`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::keywords::{
    contains_any, KeywordTable, BOARD_TRIGGERS, DRAWING_FALLBACKS, DRAWING_TRIGGERS,
    STUDENT_LEANING, TEACHER_LEANING,
};

/// Which of the two whiteboards a response should reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardType {
    /// Teacher-demonstration board
    Teacher,
    /// Student-practice board
    Student,
}

impl BoardType {
    /// Lowercase label, as echoed into prompts and JSON
    pub fn label(&self) -> &'static str {
        match self {
            BoardType::Teacher => "teacher",
            BoardType::Student => "student",
        }
    }

    /// Uppercase label used by the directive tag
    pub fn tag_label(&self) -> &'static str {
        match self {
            BoardType::Teacher => "TEACHER",
            BoardType::Student => "STUDENT",
        }
    }
}

impl fmt::Display for BoardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Diagram categories a whiteboard can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawingType {
    ProbabilityScale,
    Distribution,
    NormalCurve,
    TreeDiagram,
}

impl DrawingType {
    /// Wire name of the diagram (`normal_curve`, ...)
    pub fn label(&self) -> &'static str {
        match self {
            DrawingType::ProbabilityScale => "probability_scale",
            DrawingType::Distribution => "distribution",
            DrawingType::NormalCurve => "normal_curve",
            DrawingType::TreeDiagram => "tree_diagram",
        }
    }
}

impl fmt::Display for DrawingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of whiteboard intent analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentAnalysis {
    /// True iff a drawing type was selected
    pub needs_whiteboard: bool,
    /// Always populated, defaults to the teacher board
    pub board_type: BoardType,
    /// Suggested diagram
    pub drawing_type: Option<DrawingType>,
}

impl IntentAnalysis {
    /// Analysis for a message that needs no diagram
    pub fn without_drawing(board_type: BoardType) -> Self {
        Self {
            needs_whiteboard: false,
            board_type,
            drawing_type: None,
        }
    }

    /// Analysis for a message with a selected diagram
    pub fn with_drawing(board_type: BoardType, drawing_type: DrawingType) -> Self {
        Self {
            needs_whiteboard: true,
            board_type,
            drawing_type: Some(drawing_type),
        }
    }
}

/// Raw board scores, exposed for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardScores {
    pub teacher: usize,
    pub student: usize,
}

/// Keyword-scoring whiteboard classifier
pub struct WhiteboardClassifier {
    boards: KeywordTable<BoardType>,
    drawings: KeywordTable<DrawingType>,
    fallbacks: KeywordTable<DrawingType>,
}

impl Default for WhiteboardClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl WhiteboardClassifier {
    /// Create a classifier over the built-in keyword tables
    pub fn new() -> Self {
        Self {
            boards: BOARD_TRIGGERS,
            drawings: DRAWING_TRIGGERS,
            fallbacks: DRAWING_FALLBACKS,
        }
    }

    /// Count trigger hits for each board. Expects lowercase text.
    pub fn board_scores(&self, lowered: &str) -> BoardScores {
        BoardScores {
            teacher: self.boards.count_matches(&BoardType::Teacher, lowered),
            student: self.boards.count_matches(&BoardType::Student, lowered),
        }
    }

    fn decide_board(&self, lowered: &str) -> BoardType {
        let scores = self.board_scores(lowered);

        if scores.teacher > scores.student {
            return BoardType::Teacher;
        }
        if scores.student > scores.teacher {
            return BoardType::Student;
        }

        // Tie: lean on single words, teacher first
        if contains_any(lowered, TEACHER_LEANING) {
            BoardType::Teacher
        } else if contains_any(lowered, STUDENT_LEANING) {
            BoardType::Student
        } else {
            BoardType::Teacher
        }
    }

    fn decide_drawing(&self, lowered: &str) -> Option<DrawingType> {
        self.drawings
            .first_match(lowered)
            .or_else(|| self.fallbacks.first_match(lowered))
    }

    /// Analyze a message
    pub fn analyze(&self, message: &str) -> IntentAnalysis {
        let lowered = message.to_lowercase();

        let board_type = self.decide_board(&lowered);
        let drawing_type = self.decide_drawing(&lowered);

        debug!(
            board = %board_type,
            drawing = ?drawing_type,
            "Whiteboard intent analyzed"
        );

        IntentAnalysis {
            needs_whiteboard: drawing_type.is_some(),
            board_type,
            drawing_type,
        }
    }
}
