//! Field extraction from loosely structured model output.
//!
//! The model is asked for six `Label: value` lines but may add a preamble,
//! echo the prompt, reorder fields, put everything on one line or skip
//! fields entirely. Extraction tolerates all of that:
//!
//! 1. Everything before the first `Habit:` is dropped.
//! 2. Each field's value runs from its first `Label:` to the next
//!    occurrence of any label followed by a colon, or the end of text.
//! 3. Whitespace before a newline is collapsed and values are trimmed.
//!
//! Extracted values never contain a label, so re-extracting a rendered plan
//! returns the same plan.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::plan::{Field, SmartPlan};

/// Any field label followed by a colon, case-insensitive.
///
/// Capture group `i + 1` corresponds to `Field::ALL[i]`. Multi-word labels
/// accept any run of spaces or tabs between words.
static LABELS: LazyLock<Regex> = LazyLock::new(|| {
    let groups = Field::ALL
        .iter()
        .map(|f| {
            let words: Vec<String> = f.label().split(' ').map(regex::escape).collect();
            format!("({})", words.join(r"[ \t]+"))
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{groups})[ \t]*:")).expect("label pattern is valid")
});

static SPACE_BEFORE_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\n").expect("whitespace pattern is valid"));

/// A label occurrence in the raw text.
#[derive(Debug, Clone, Copy)]
struct LabelHit {
    field: Field,
    start: usize,
    end: usize,
}

fn label_hits(text: &str) -> Vec<LabelHit> {
    LABELS
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let field = Field::ALL
                .iter()
                .enumerate()
                .find(|(i, _)| caps.get(i + 1).is_some())
                .map(|(_, f)| *f)?;
            Some(LabelHit {
                field,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Whether `text` contains `field`'s label followed by a colon, matched the
/// same way [`extract`] matches it.
pub fn has_label(text: &str, field: Field) -> bool {
    label_hits(text).iter().any(|h| h.field == field)
}

/// Byte offset of the first label in `text`, if any.
pub fn first_label_start(text: &str) -> Option<usize> {
    LABELS.find(text).map(|m| m.start())
}

fn clean_value(raw: &str) -> String {
    SPACE_BEFORE_NEWLINE
        .replace_all(raw, "\n")
        .trim()
        .to_string()
}

/// Extract the six SMART fields from raw generated text.
///
/// Never fails: text with no recognizable field yields
/// [`SmartPlan::skeleton`].
pub fn extract(raw: &str) -> SmartPlan {
    let hits = label_hits(raw);

    // Drop the preamble (and any echoed prompt) before the first Habit label.
    let first_habit = hits.iter().position(|h| h.field == Field::Habit);
    let hits = match first_habit {
        Some(i) => &hits[i..],
        None => &hits[..],
    };

    let plan = SmartPlan::from_fn(|field| {
        let Some(i) = hits.iter().position(|h| h.field == field) else {
            return String::new();
        };
        let value_start = hits[i].end;
        let value_end = hits.get(i + 1).map_or(raw.len(), |next| next.start);
        clean_value(&raw[value_start..value_end])
    });

    if plan.is_skeleton() {
        debug!(raw_len = raw.len(), "no SMART fields found in model output");
    } else {
        debug!(
            missing = ?plan.empty_fields(),
            "extracted SMART fields from model output"
        );
    }

    plan
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "Habit: Read 20 pages every night.
Why: Reading before bed builds a steady habit.
Measure: Pages logged in a notebook.
Schedule: Every night at 10 PM.
Start date: Monday.
Success criteria: Finish 2 books in a month.";

    #[test]
    fn well_formed_output_extracts_all_fields() {
        let plan = extract(WELL_FORMED);
        assert!(plan.is_complete());
        assert_eq!(plan.get(Field::Habit), "Read 20 pages every night.");
        assert_eq!(plan.get(Field::StartDate), "Monday.");
        assert_eq!(plan.get(Field::SuccessCriteria), "Finish 2 books in a month.");
        assert_eq!(plan.render(), WELL_FORMED);
    }

    #[test]
    fn preamble_before_habit_is_dropped() {
        let plan = extract("Some preamble. Habit: Walk daily\nWhy: health");
        assert_eq!(plan.get(Field::Habit), "Walk daily");
        assert_eq!(plan.get(Field::Why), "health");
        assert_eq!(
            plan.empty_fields(),
            vec![
                Field::Measure,
                Field::Schedule,
                Field::StartDate,
                Field::SuccessCriteria
            ]
        );
    }

    #[test]
    fn echoed_labels_before_habit_are_ignored() {
        let raw = "Fill in Why: and Measure: below.\nHabit: Stretch\nWhy: flexibility";
        let plan = extract(raw);
        assert_eq!(plan.get(Field::Why), "flexibility");
        assert_eq!(plan.get(Field::Measure), "");
    }

    #[test]
    fn labels_are_case_insensitive() {
        let plan = extract("HABIT: Swim\nwhy: joints\nSTART DATE: today\nsuccess criteria: 10 laps");
        assert_eq!(plan.get(Field::Habit), "Swim");
        assert_eq!(plan.get(Field::Why), "joints");
        assert_eq!(plan.get(Field::StartDate), "today");
        assert_eq!(plan.get(Field::SuccessCriteria), "10 laps");
    }

    #[test]
    fn reordered_fields_land_in_canonical_order() {
        let plan = extract("Habit: Cycle\nSchedule: weekends\nWhy: fitness\nMeasure: km");
        assert_eq!(
            plan.render(),
            "Habit: Cycle\nWhy: fitness\nMeasure: km\nSchedule: weekends\nStart date:\nSuccess criteria:"
        );
    }

    #[test]
    fn single_line_output_is_split_on_labels() {
        let plan = extract("Habit: walk daily. Why: health. Measure: steps");
        assert_eq!(plan.get(Field::Habit), "walk daily.");
        assert_eq!(plan.get(Field::Why), "health.");
        assert_eq!(plan.get(Field::Measure), "steps");
    }

    #[test]
    fn multi_line_values_keep_inner_newlines() {
        let plan = extract("Habit: Plan meals   \n  and shop on Sunday\nWhy: saves time");
        assert_eq!(plan.get(Field::Habit), "Plan meals\n  and shop on Sunday");
    }

    #[test]
    fn blank_lines_inside_values_collapse() {
        let plan = extract("Habit: one\n\n\ntwo\nWhy: x");
        assert_eq!(plan.get(Field::Habit), "one\ntwo");
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let plan = extract("Habit: Nap\r\nWhy: rest\r\n");
        assert_eq!(plan.get(Field::Habit), "Nap");
        assert_eq!(plan.get(Field::Why), "rest");
    }

    #[test]
    fn space_before_colon_and_extra_spaces_in_labels() {
        let plan = extract("Habit : Run\nStart   date: now\nSuccess\tcriteria : 5k");
        assert_eq!(plan.get(Field::Habit), "Run");
        assert_eq!(plan.get(Field::StartDate), "now");
        assert_eq!(plan.get(Field::SuccessCriteria), "5k");
    }

    #[test]
    fn label_words_inside_other_words_are_not_labels() {
        let plan = extract("Habit: Ask somewhy: daily\nWhy: curiosity");
        assert_eq!(plan.get(Field::Habit), "Ask somewhy: daily");
    }

    #[test]
    fn text_without_labels_is_a_skeleton() {
        assert!(extract("").is_skeleton());
        assert!(extract("I could not think of anything.").is_skeleton());
        assert!(extract("Habit:\nWhy:\n").is_skeleton());
    }

    #[test]
    fn first_occurrence_wins() {
        let plan = extract("Habit: A\nHabit: B\nWhy: C");
        assert_eq!(plan.get(Field::Habit), "A");
        assert_eq!(plan.get(Field::Why), "C");
    }

    #[test]
    fn label_lookup_matches_extraction_rules() {
        assert!(has_label("Habit : Walk", Field::Habit));
        assert!(has_label("ok. success\tcriteria: 5k", Field::SuccessCriteria));
        assert!(!has_label("Ask somewhy: daily", Field::Why));
        assert!(!has_label("Habit Walk", Field::Habit));
        assert_eq!(first_label_start("Walk daily\nWhy: health"), Some(11));
        assert_eq!(first_label_start("no labels here"), None);
    }

    #[test]
    fn extraction_is_idempotent() {
        let samples = [
            WELL_FORMED,
            "Some preamble. Habit: Walk daily\nWhy: health",
            "Habit: ask why: x\nWhy: y",
            "Habit: walk daily. Why: health. Measure: steps",
            "noise\nHabit: Plan meals   \n\n and shop\nSchedule: Sun\nwhy : money",
            "Habit:\nWhy: only why",
            "no labels at all",
            "",
        ];
        for raw in samples {
            let once = extract(raw);
            let twice = extract(&once.render());
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }
}
