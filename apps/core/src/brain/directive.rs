//! Directive tags: `[TEACHER_BOARD: normal_curve]`.
//!
//! The bracketed token is read by the whiteboard renderer on the client, so
//! the syntax and the uppercase board label must stay exactly as rendered here.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::intent::{BoardType, DrawingType};

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(TEACHER|STUDENT)_BOARD:\s*([^\]]*)\]").expect("Invalid regex: directive tag")
});

/// A board/diagram instruction embedded in a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveTag {
    pub board: BoardType,
    pub drawing: DrawingType,
}

impl fmt::Display for DirectiveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}_BOARD: {}]", self.board.tag_label(), self.drawing.label())
    }
}

impl DirectiveTag {
    pub fn new(board: BoardType, drawing: DrawingType) -> Self {
        Self { board, drawing }
    }

    /// Remove every tag-shaped token, well-formed or not
    pub fn strip_all(text: &str) -> String {
        TAG_PATTERN.replace_all(text, "").into_owned()
    }

    /// True if `text` holds anything tag-shaped
    pub fn is_present(text: &str) -> bool {
        TAG_PATTERN.is_match(text)
    }
}
