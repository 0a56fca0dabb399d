//! Goal sanitizer: cleans and validates raw goal text before it reaches a
//! prompt.
//!
//! Rejections are ordinary values, not faults. Their `Display` output is
//! the message shown to the user in place of a plan.

use thiserror::Error;

/// Longest cleaned goal kept verbatim; longer goals are cut and get `…`.
pub const MAX_GOAL_CHARS: usize = 280;

/// Fewest whitespace-separated tokens a goal must have.
pub const MIN_GOAL_TOKENS: usize = 2;

/// Why a raw goal was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GoalRejection {
    /// Nothing usable was submitted (absent, blank, or control characters only).
    #[error("Please enter a goal.")]
    Empty,
    /// A single word such as `"weight"`; too ambiguous to plan for.
    #[error("Please add a few more words so I understand your goal.")]
    TooShort,
}

/// A goal that passed sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    original: String,
    cleaned: String,
    truncated: bool,
}

impl Goal {
    /// The text exactly as the user submitted it.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The cleaned text used in prompts and fallback templates.
    pub fn as_str(&self) -> &str {
        &self.cleaned
    }

    /// Whether the cleaned text was cut at [`MAX_GOAL_CHARS`].
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.cleaned)
    }
}

/// Control characters removed outright (not replaced by a space).
///
/// Tab, line feed and carriage return are kept here and folded into single
/// spaces by whitespace collapsing.
fn is_stripped_control(c: char) -> bool {
    matches!(c as u32, 0..=8 | 11 | 12 | 14..=31 | 127)
}

/// Clean and validate a raw goal.
///
/// `None` models an absent form field.
pub fn sanitize(raw: Option<&str>) -> Result<Goal, GoalRejection> {
    let Some(raw) = raw else {
        return Err(GoalRejection::Empty);
    };

    let visible: String = raw.chars().filter(|c| !is_stripped_control(*c)).collect();
    match visible.split_whitespace().count() {
        0 => return Err(GoalRejection::Empty),
        n if n < MIN_GOAL_TOKENS => return Err(GoalRejection::TooShort),
        _ => {}
    }

    let mut cleaned = String::with_capacity(visible.len());
    for word in visible.split_whitespace() {
        if !cleaned.is_empty() {
            cleaned.push(' ');
        }
        cleaned.push_str(word);
    }
    let mut truncated = false;
    if cleaned.chars().count() > MAX_GOAL_CHARS {
        let cut: String = cleaned.chars().take(MAX_GOAL_CHARS).collect();
        cleaned = format!("{}…", cut.trim_end());
        truncated = true;
    }

    Ok(Goal {
        original: raw.to_string(),
        cleaned,
        truncated,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_input_asks_for_a_goal() {
        let err = sanitize(None).unwrap_err();
        assert_eq!(err, GoalRejection::Empty);
        assert_eq!(err.to_string(), "Please enter a goal.");
    }

    #[test]
    fn blank_and_control_only_inputs_are_empty() {
        for raw in ["", "   ", "\t\n\r ", "\u{0}\u{7}\u{1b}\u{7f}", " \u{b}\u{c} \u{1f}"] {
            assert_eq!(sanitize(Some(raw)), Err(GoalRejection::Empty), "input {raw:?}");
        }
    }

    #[test]
    fn single_token_is_too_short() {
        let err = sanitize(Some("weight")).unwrap_err();
        assert_eq!(err, GoalRejection::TooShort);
        assert_eq!(
            err.to_string(),
            "Please add a few more words so I understand your goal."
        );

        assert_eq!(sanitize(Some("  weight \n")), Err(GoalRejection::TooShort));
    }

    #[test]
    fn control_characters_are_removed_not_spaced() {
        let goal = sanitize(Some("lose\u{7} wei\u{0}ght")).unwrap();
        assert_eq!(goal.as_str(), "lose weight");
    }

    #[test]
    fn control_characters_can_join_tokens() {
        // Removal happens before tokenizing, so this is one word.
        assert_eq!(sanitize(Some("lose\u{1}weight")), Err(GoalRejection::TooShort));
    }

    #[test]
    fn whitespace_is_collapsed_and_trimmed() {
        let goal = sanitize(Some("  I\twant \n\n to   read\r\nmore  ")).unwrap();
        assert_eq!(goal.as_str(), "I want to read more");
        assert!(!goal.truncated());
        assert_eq!(goal.original(), "  I\twant \n\n to   read\r\nmore  ");
    }

    #[test]
    fn two_tokens_split_by_unicode_space_are_enough() {
        let goal = sanitize(Some("\u{3000}sleep\u{a0}\u{2003}better\u{3000}")).unwrap();
        assert_eq!(goal.as_str(), "sleep better");
    }

    #[test]
    fn long_goals_are_truncated_with_ellipsis() {
        let raw = "abcde ".repeat(100);
        let goal = sanitize(Some(&raw)).unwrap();
        // The 280-char cut ends mid-word ("...abcde abcd"), so nothing is trimmed.
        assert_eq!(goal.as_str().chars().count(), 281);
        assert!(goal.as_str().ends_with('…'));
        assert!(goal.truncated());
    }

    #[test]
    fn truncation_strips_a_trailing_space_before_the_ellipsis() {
        // Character 280 is a space.
        let raw = format!("{} {}", "a".repeat(279), "b".repeat(50));
        let goal = sanitize(Some(&raw)).unwrap();
        assert_eq!(goal.as_str(), format!("{}…", "a".repeat(279)));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let raw = format!("é {}", "ü".repeat(400));
        let goal = sanitize(Some(&raw)).unwrap();
        assert_eq!(goal.as_str().chars().count(), 281);
    }

    #[test]
    fn exactly_max_length_is_kept() {
        let raw = format!("{} {}", "a".repeat(139), "b".repeat(140));
        assert_eq!(raw.chars().count(), MAX_GOAL_CHARS);
        let goal = sanitize(Some(&raw)).unwrap();
        assert_eq!(goal.as_str(), raw);
        assert!(!goal.truncated());
    }

    #[test]
    fn display_is_cleaned_text() {
        let goal = sanitize(Some("read  more")).unwrap();
        assert_eq!(goal.to_string(), "read more");
    }
}
