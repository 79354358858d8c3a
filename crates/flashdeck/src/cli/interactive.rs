//! Parsing of interactive review input.

use crate::flashcard::NewFlashcard;
use crate::review::CategoryFilter;

/// One line of input during a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewInput {
    /// Go to the next card.
    Next,
    /// Go to the previous card.
    Previous,
    /// Flip the current card.
    Flip,
    /// Delete the current card (after confirmation).
    Delete,
    /// Change the category filter.
    Category(CategoryFilter),
    /// Create a card: `a <front> | <back> [| <category>]`.
    Add(NewFlashcard),
    /// List the category choices.
    ListCategories,
    /// Fetch the cards again.
    Reload,
    /// Show key help.
    Help,
    /// Leave the review.
    Quit,
    /// Anything else.
    Unknown(String),
}

impl ReviewInput {
    /// Parse one line of input.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command.to_ascii_lowercase().as_str() {
            "" | "f" | "flip" => Self::Flip,
            "n" | "next" => Self::Next,
            "p" | "prev" | "previous" => Self::Previous,
            "d" | "delete" => Self::Delete,
            "c" | "category" => {
                if argument.is_empty() {
                    Self::Category(CategoryFilter::All)
                } else {
                    Self::Category(CategoryFilter::from_label(argument))
                }
            }
            "a" | "add" => match parse_new_card(argument) {
                Some(new) => Self::Add(new),
                None => Self::Unknown(line.to_string()),
            },
            "l" | "categories" => Self::ListCategories,
            "r" | "reload" => Self::Reload,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

fn parse_new_card(argument: &str) -> Option<NewFlashcard> {
    let parts: Vec<&str> = argument.split('|').map(str::trim).collect();
    match parts.as_slice() {
        [front, back] => Some(NewFlashcard::new(*front, *back, None)),
        [front, back, category] => Some(NewFlashcard::new(
            *front,
            *back,
            Some((*category).to_string()),
        )),
        _ => None,
    }
}

/// Whether a confirmation answer means yes.
#[must_use]
pub fn is_confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation() {
        assert_eq!(ReviewInput::parse("n"), ReviewInput::Next);
        assert_eq!(ReviewInput::parse("NEXT"), ReviewInput::Next);
        assert_eq!(ReviewInput::parse(" p "), ReviewInput::Previous);
        assert_eq!(ReviewInput::parse("prev"), ReviewInput::Previous);
    }

    #[test]
    fn test_enter_flips() {
        assert_eq!(ReviewInput::parse(""), ReviewInput::Flip);
        assert_eq!(ReviewInput::parse("\n"), ReviewInput::Flip);
        assert_eq!(ReviewInput::parse("f"), ReviewInput::Flip);
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(
            ReviewInput::parse("c Math"),
            ReviewInput::Category(CategoryFilter::Named("Math".to_string()))
        );
        assert_eq!(
            ReviewInput::parse("category  World History "),
            ReviewInput::Category(CategoryFilter::Named("World History".to_string()))
        );
        assert_eq!(
            ReviewInput::parse("c"),
            ReviewInput::Category(CategoryFilter::All)
        );
        assert_eq!(
            ReviewInput::parse("c All"),
            ReviewInput::Category(CategoryFilter::All)
        );
    }

    #[test]
    fn test_parse_other_commands() {
        assert_eq!(ReviewInput::parse("d"), ReviewInput::Delete);
        assert_eq!(ReviewInput::parse("l"), ReviewInput::ListCategories);
        assert_eq!(ReviewInput::parse("r"), ReviewInput::Reload);
        assert_eq!(ReviewInput::parse("?"), ReviewInput::Help);
        assert_eq!(ReviewInput::parse("quit"), ReviewInput::Quit);
        assert_eq!(
            ReviewInput::parse("jump 3"),
            ReviewInput::Unknown("jump 3".to_string())
        );
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            ReviewInput::parse("a 2+2? | 4"),
            ReviewInput::Add(NewFlashcard::new("2+2?", "4", None))
        );
        assert_eq!(
            ReviewInput::parse("add Capital of France? | Paris | Geography"),
            ReviewInput::Add(NewFlashcard::new(
                "Capital of France?",
                "Paris",
                Some("Geography".to_string())
            ))
        );
    }

    #[test]
    fn test_parse_add_needs_both_sides() {
        assert_eq!(
            ReviewInput::parse("a only a front"),
            ReviewInput::Unknown("a only a front".to_string())
        );
        assert_eq!(
            ReviewInput::parse("a"),
            ReviewInput::Unknown("a".to_string())
        );
        assert_eq!(
            ReviewInput::parse("a q | a | c | extra"),
            ReviewInput::Unknown("a q | a | c | extra".to_string())
        );
    }

    #[test]
    fn test_confirmation() {
        assert!(is_confirmed("y"));
        assert!(is_confirmed("Yes\n"));
        assert!(!is_confirmed(""));
        assert!(!is_confirmed("n"));
    }
}
