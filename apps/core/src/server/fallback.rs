//! Filler replies for generations that came back empty.
//!
//! These checks are intentionally separate from the classifier tables in
//! `brain::keywords`; they only pick a topical sentence.

/// Replies shorter than this (ignoring whitespace) are replaced.
pub const MIN_REPLY_CHARS: usize = 3;

const DICE_FILLER: &str = "Let's think about the dice together. A fair die has six equally likely outcomes, so each face comes up with probability 1/6.";
const COIN_FILLER: &str = "Let's look at the coin. A fair coin has two equally likely outcomes, so heads and tails each have probability 1/2.";
const CARD_FILLER: &str = "Let's work through the cards. A standard deck has 52 cards, so count the cards you want and divide by 52.";
const PROBABILITY_FILLER: &str = "Probability measures how likely something is, from 0 (impossible) to 1 (certain). Count the favourable outcomes and divide by all possible outcomes.";
const DEFAULT_FILLER: &str = "Good question! Let's break it down step by step. What do you already know about the problem?";

/// Picks a filler sentence from plain substring checks on the user's message.
pub fn filler_for(message: &str) -> &'static str {
    let lowered = message.to_lowercase();

    if lowered.contains("dice") || lowered.contains("die") {
        DICE_FILLER
    } else if lowered.contains("coin") {
        COIN_FILLER
    } else if lowered.contains("card") {
        CARD_FILLER
    } else if lowered.contains("probability") {
        PROBABILITY_FILLER
    } else {
        DEFAULT_FILLER
    }
}

fn is_too_short(text: &str) -> bool {
    text.chars().filter(|c| !c.is_whitespace()).count() < MIN_REPLY_CHARS
}

/// Trims the generated text, substituting a filler when too little is left.
pub fn ensure_reply(generated: &str, message: &str) -> String {
    let trimmed = generated.trim();
    if is_too_short(trimmed) {
        filler_for(message).to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filler_topics() {
        assert_eq!(filler_for("I rolled two DICE"), DICE_FILLER);
        assert_eq!(filler_for("flip a coin"), COIN_FILLER);
        assert_eq!(filler_for("draw a card"), CARD_FILLER);
        assert_eq!(filler_for("what is probability"), PROBABILITY_FILLER);
        assert_eq!(filler_for("hello"), DEFAULT_FILLER);
    }

    #[test]
    fn test_ensure_reply() {
        assert_eq!(ensure_reply("  The answer is 1/2.  ", "coin"), "The answer is 1/2.");
        assert_eq!(ensure_reply(" a \n", "coin"), COIN_FILLER);
        assert_eq!(ensure_reply("", "hi"), DEFAULT_FILLER);
        assert_eq!(ensure_reply("1/6", "dice"), "1/6");
    }
}
