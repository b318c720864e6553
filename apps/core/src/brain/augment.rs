//! Response augmentation.
//!
//! Appends a board-specific sentence and the directive tag to a model reply
//! whenever the analysis selected a diagram.

use super::directive::DirectiveTag;
use super::intent::{BoardType, DrawingType, IntentAnalysis};

/// Sentence pointing the student at the right board.
/// `None` covers an analysis that asks for a whiteboard without naming a diagram.
pub fn board_sentence(board: BoardType, drawing: Option<DrawingType>) -> &'static str {
    match (board, drawing) {
        (BoardType::Teacher, Some(DrawingType::ProbabilityScale)) => {
            "Let me draw a probability scale on the teacher whiteboard so you can see where this event sits between impossible and certain."
        }
        (BoardType::Teacher, Some(DrawingType::Distribution)) => {
            "I'll sketch the distribution on the teacher whiteboard so you can compare the outcomes side by side."
        }
        (BoardType::Teacher, Some(DrawingType::NormalCurve)) => {
            "Watch the teacher whiteboard while I draw the normal curve and mark the mean and standard deviations."
        }
        (BoardType::Teacher, Some(DrawingType::TreeDiagram)) => {
            "I'll build a tree diagram on the teacher whiteboard so we can follow each branch of outcomes."
        }
        (BoardType::Teacher, None) => "Take a look at the teacher whiteboard for a diagram of this idea.",
        (BoardType::Student, Some(DrawingType::ProbabilityScale)) => {
            "Now it's your turn: place this event on the probability scale on your student whiteboard."
        }
        (BoardType::Student, Some(DrawingType::Distribution)) => {
            "Try drawing the distribution yourself on the student whiteboard, then we'll check it together."
        }
        (BoardType::Student, Some(DrawingType::NormalCurve)) => {
            "Use the student whiteboard to sketch the normal curve and label where the mean sits."
        }
        (BoardType::Student, Some(DrawingType::TreeDiagram)) => {
            "Have a go at completing the tree diagram on the student whiteboard, one branch at a time."
        }
        (BoardType::Student, None) => "Use the student whiteboard to try drawing this yourself.",
    }
}

/// Augment a model reply according to `analysis`.
///
/// Returns `text` unchanged when no whiteboard is needed.
pub fn augment_response(text: &str, analysis: &IntentAnalysis) -> String {
    if !analysis.needs_whiteboard {
        return text.to_string();
    }

    let sentence = board_sentence(analysis.board_type, analysis.drawing_type);
    match analysis.drawing_type {
        Some(drawing) => {
            let tag = DirectiveTag::new(analysis.board_type, drawing);
            format!("{}\n\n{} {}", text, sentence, tag)
        }
        None => format!("{}\n\n{}", text, sentence),
    }
}
