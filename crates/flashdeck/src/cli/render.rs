//! Terminal rendering.
//!
//! Every function returns a `String` so output can be checked in tests; the
//! binary only prints.

use std::fmt::Write;

use crate::flashcard::CategoryCount;
use crate::review::{CardView, Notification, NotificationKind, View};

/// Shown by the category grid when there are no cards.
pub const EMPTY_GRID: &str = "No flashcards yet. Create your first flashcard!";

/// Shown by a review session whose filter matches no cards.
pub const EMPTY_REVIEW: &str = "No flashcards found. Create some flashcards to start reviewing!";

const GRID_COLUMNS: usize = 3;
const CELL_WIDTH: usize = 24;
const CARD_WIDTH: usize = 48;
const PROGRESS_WIDTH: usize = 30;

/// Render category counts as a grid of cells.
#[must_use]
pub fn category_grid(counts: &[CategoryCount]) -> String {
    if counts.is_empty() {
        return format!("{EMPTY_GRID}\n");
    }

    let mut out = String::new();
    for row in counts.chunks(GRID_COLUMNS) {
        let mut names = String::new();
        let mut totals = String::new();
        for cell in row {
            let name = truncate(&cell.category, CELL_WIDTH - 2);
            let total = format!("{} cards", cell.count);
            let _ = write!(names, "{name:<CELL_WIDTH$}");
            let _ = write!(totals, "{total:<CELL_WIDTH$}");
        }
        let _ = writeln!(out, "{}", names.trim_end());
        let _ = writeln!(out, "{}", totals.trim_end());
        out.push('\n');
    }
    out
}

/// Render whatever the review session currently shows.
#[must_use]
pub fn view(view: &View<'_>) -> String {
    match view {
        View::Loading => "Loading flashcards...\n".to_string(),
        View::Unavailable { message } => {
            format!("{message}\nPress r to retry or q to quit.\n")
        }
        View::Empty { filter } => format!(
            "[{filter}]\n{EMPTY_REVIEW}\nAdd one with: a <front> | <back> [| <category>]\n"
        ),
        View::Card(card_view) => card(card_view),
    }
}

/// Render one card with its progress indicator.
#[must_use]
pub fn card(view: &CardView<'_>) -> String {
    let (badge, text, hint) = if view.flipped {
        ("Answer", view.card.back_text.as_str(), "f to flip back")
    } else {
        (view.card.category.as_str(), view.card.front_text.as_str(), "f to flip")
    };

    let border = format!("+{}+", "-".repeat(CARD_WIDTH - 2));
    let mut out = String::new();
    let _ = writeln!(out, "{}", progress_bar(view.position, view.total, PROGRESS_WIDTH));
    let _ = writeln!(out, "{} of {}", view.position, view.total);
    out.push('\n');
    let _ = writeln!(out, "{border}");
    let _ = writeln!(out, "{}", boxed(&format!("[{}]", truncate(badge, CARD_WIDTH - 6))));
    let _ = writeln!(out, "{}", boxed(""));
    for line in wrap(text, CARD_WIDTH - 4) {
        let _ = writeln!(out, "{}", boxed(&line));
    }
    let _ = writeln!(out, "{}", boxed(""));
    let _ = writeln!(out, "{border}");
    let _ = writeln!(out, "{hint} | n next | p previous | d delete | h help");
    out
}

/// Render a filled bar for `position` out of `total`.
#[must_use]
pub fn progress_bar(position: usize, total: usize, width: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        (position.min(total) * width) / total
    };
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Render a transient message.
#[must_use]
pub fn notification(notification: &Notification) -> String {
    let title = match notification.kind {
        NotificationKind::Success => "Success",
        NotificationKind::Error => "Error",
    };
    format!("{title}: {}", notification.message)
}

/// Category choices, marking the active one.
#[must_use]
pub fn category_choices(choices: &[String], selected: &str) -> String {
    let mut out = String::new();
    for choice in choices {
        let marker = if choice == selected { '*' } else { ' ' };
        let _ = writeln!(out, "{marker} {choice}");
    }
    out
}

/// Key help for the review loop.
#[must_use]
pub fn review_help() -> &'static str {
    "\
Commands:
  n, next            next card
  p, prev            previous card
  f, flip, <Enter>   flip the card
  d, delete          delete the card
  a <front> | <back> [| <category>]
                     create a card
  c <name>           filter by category (c alone shows all)
  l, categories      list categories
  r, reload          fetch cards again
  h, help            show this help
  q, quit            leave the review
"
}

fn boxed(line: &str) -> String {
    let inner = CARD_WIDTH - 4;
    format!("| {line:<inner$} |")
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if line.is_empty() {
                word.len()
            } else {
                line.chars().count() + 1 + word.len()
            };
            if needed > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.extend(word);
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
