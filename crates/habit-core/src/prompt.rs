//! Few-shot prompt construction.
//!
//! Pure string assembly: no I/O, same inputs give byte-identical output.
//! Each prompt carries one worked example in the exact six-line shape and
//! ends on the first field label so the model starts answering there.

use std::borrow::Cow;

use crate::normalize::{first_label_start, has_label};
use crate::plan::Field;
use crate::sanitize::Goal;
use crate::variant::Variant;

/// Goal used by every worked example.
const EXAMPLE_GOAL: &str = "I want to lose weight";

const V1_EXAMPLE: &str = "\
Habit: Jog 3 times a week for 30 minutes and eat 3 servings of vegetables daily.
Why: Regular exercise and increased vegetable intake promote steady, healthy weight loss.
Measure: Track weekly jog sessions and servings of vegetables eaten each day.
Schedule: Monday, Wednesday, Friday jogging; daily vegetable tracking.
Start date: March 1st.
Success criteria: 5 kg weight loss by June 1st.";

const V2_EXAMPLE: &str = "\
Habit: Walk at least 10,000 steps daily and replace sugary drinks with water.
Why: Increasing daily activity and reducing sugar intake helps create a calorie deficit.
Measure: Steps per day tracked with a pedometer or app; number of sugary drinks replaced.
Schedule: Daily step tracking and drink substitution.
Start date: March 1st.
Success criteria: 5 kg weight loss by June 1st.";

const V3_EXAMPLE: &str = "\
Habit: Join a weekly dance class and cook 4 healthy dinners each week.
Why: Fun physical activity increases consistency, and home-cooked meals allow better calorie control.
Measure: Attendance at dance classes and number of healthy dinners prepared.
Schedule: Dance every Thursday evening; cooking on Monday, Wednesday, Friday, Sunday.
Start date: March 1st.
Success criteria: 5 kg weight loss by June 1st.";

/// The text every prompt ends with.
pub const PRIMER: &str = "Habit:";

fn worked_example(variant: Variant) -> &'static str {
    match variant {
        Variant::V1 => V1_EXAMPLE,
        Variant::V2 => V2_EXAMPLE,
        Variant::V3 => V3_EXAMPLE,
    }
}

fn framing(variant: Variant) -> &'static str {
    match variant {
        Variant::V1 => "You are a habit coach helping people build habits that follow SMART principles.",
        Variant::V2 => "You are a habit coach who takes the usual plan and approaches it from a different perspective.",
        Variant::V3 => "You are a creative, flexible habit coach who offers varied ways to reach the same goal.",
    }
}

/// Build the prompt for one variant.
pub fn build_prompt(goal: &Goal, variant: Variant) -> String {
    let field_list = Field::ALL
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = String::with_capacity(1024);
    prompt.push_str(framing(variant));
    prompt.push('\n');
    prompt.push_str(
        "Rewrite the goal as one SMART habit (Specific, Measurable, Achievable, Relevant, Time-bound).\n",
    );
    prompt.push_str(&format!(
        "Answer with exactly six lines in this order: {field_list}. No introduction.\n"
    ));
    prompt.push_str(variant.profile().prompt_style);
    prompt.push_str("\n\n");

    prompt.push_str(&format!("Goal: {EXAMPLE_GOAL}\n"));
    prompt.push_str(worked_example(variant));
    prompt.push_str("\n\n");

    prompt.push_str(&format!("Goal: {}\n", goal.as_str()));
    prompt.push_str(PRIMER);
    prompt
}

/// Put the primed label back in front of a model continuation.
///
/// Models usually continue after [`PRIMER`] without repeating it. The
/// primer is only restored when the continuation carries at least one other
/// field label, so label-free text (refusals, noise) still extracts to a
/// skeleton. Text that already has a `Habit:` label is returned unchanged;
/// text that opens on another label gets an empty `Habit:` line so the
/// first value is not misattributed.
pub fn reattach_primer(generated: &str) -> Cow<'_, str> {
    if has_label(generated, Field::Habit) {
        return Cow::Borrowed(generated);
    }

    let head = generated.trim_start();
    match first_label_start(head) {
        None => Cow::Borrowed(generated),
        Some(0) => Cow::Owned(format!("{PRIMER}\n{head}")),
        Some(_) => Cow::Owned(format!("{PRIMER} {head}")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
