//! Deterministic fallback content for plans the model could not produce.
//!
//! Every field has one template per variant. The `Habit` field is chosen
//! by an ordered list of keyword rules; the last rule has no keywords and
//! always matches, so a habit is always produced.

use tracing::debug;

use crate::plan::{Field, SmartPlan};
use crate::variant::Variant;

/// Placeholder replaced by the goal text in templates.
const GOAL: &str = "{goal}";

/// A keyword rule selecting `Habit` templates.
#[derive(Debug, Clone, Copy)]
pub struct HabitRule {
    /// Rule name, for logs and tests.
    pub name: &'static str,
    /// Word prefixes that select this rule.
    pub prefixes: &'static [&'static str],
    /// Fragments that select this rule wherever they occur inside a word.
    pub fragments: &'static [&'static str],
    /// One template per variant, in [`Variant::ALL`] order.
    pub habits: [&'static str; 3],
}

impl HabitRule {
    /// Whether any word of `goal` starts with one of the rule's prefixes or
    /// contains one of its fragments. A rule with neither matches every goal.
    pub fn matches(&self, goal: &str) -> bool {
        if self.prefixes.is_empty() && self.fragments.is_empty() {
            return true;
        }
        goal.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .any(|word| {
                self.prefixes.iter().any(|p| word.starts_with(p))
                    || self.fragments.iter().any(|f| word.contains(f))
            })
    }
}

/// Habit rules in evaluation order. The last entry is the catch-all.
pub const HABIT_RULES: &[HabitRule] = &[
    HabitRule {
        name: "weight",
        prefixes: &["lose", "losing", "slim"],
        fragments: &["weight"],
        habits: [
            "Walk 10,000 steps daily and eat 3 servings of vegetables",
            "Replace sugary drinks with water and do strength training 3 times per week",
            "Join a dance class twice per week and cook healthy meals at home",
        ],
    },
    HabitRule {
        name: "reading",
        prefixes: &["read", "book"],
        fragments: &[],
        habits: [
            "Read 30 pages every day",
            "Listen to audiobooks during daily commute",
            "Join a book club and read one book per month",
        ],
    },
    HabitRule {
        name: "sleep",
        prefixes: &["sleep", "insomnia", "bedtime"],
        fragments: &[],
        habits: [
            "Turn off screens and be in bed by 10:30 PM every night",
            "Wake up at the same time every day, weekends included",
            "Build a 20-minute wind-down ritual with tea, stretching or journaling",
        ],
    },
    HabitRule {
        name: "fitness",
        prefixes: &["exercise", "fit", "workout", "gym", "run"],
        fragments: &[],
        habits: [
            "Do a 20-minute bodyweight workout every day",
            "Take the stairs and walk during every phone call",
            "Try a different activity each week, such as hiking, swimming or climbing",
        ],
    },
    HabitRule {
        name: "generic",
        prefixes: &[],
        fragments: &[],
        habits: [
            "Practice {goal} for 30 minutes daily",
            "Work on {goal} for 20 minutes every evening and note what went well",
            "Explore a new approach to {goal} each week, at least 30 minutes at a time",
        ],
    },
];

/// The first rule in [`HABIT_RULES`] matching `goal`.
pub fn habit_rule(goal: &str) -> &'static HabitRule {
    HABIT_RULES
        .iter()
        .find(|rule| rule.matches(goal))
        .unwrap_or(&HABIT_RULES[HABIT_RULES.len() - 1])
}

fn by_variant(variant: Variant, templates: [&'static str; 3]) -> &'static str {
    templates[variant.index()]
}

/// Fallback value for one field. Never empty.
pub fn fallback_field(field: Field, goal: &str, variant: Variant) -> String {
    let profile = variant.profile();
    let template = match field {
        Field::Habit => by_variant(variant, habit_rule(goal).habits),
        Field::Why => by_variant(
            variant,
            [
                "This habit helps achieve {goal} through consistent action",
                "Coming at {goal} from a new angle keeps it fresh and easier to stick with",
                "Making {goal} fun and varied means you keep showing up",
            ],
        ),
        Field::Measure => by_variant(
            variant,
            [
                "Track daily progress and record results",
                "Log each session in a journal and review it every Sunday",
                "Mark a calendar each time and celebrate every 7-day streak",
            ],
        ),
        Field::Schedule => profile.schedule,
        Field::StartDate => by_variant(variant, ["Tomorrow", "This coming Monday", "This weekend"]),
        Field::SuccessCriteria => profile.success_criteria,
    };
    template.replace(GOAL, goal)
}

/// A fully populated fallback plan.
pub fn fallback_plan(goal: &str, variant: Variant) -> SmartPlan {
    SmartPlan::from_fn(|field| fallback_field(field, goal, variant))
}

/// Fill every empty field of `plan` with fallback content, keeping
/// extracted values untouched. Returns the fields that were filled.
pub fn fill_gaps(plan: &mut SmartPlan, goal: &str, variant: Variant) -> Vec<Field> {
    let gaps = plan.empty_fields();
    for field in &gaps {
        plan.set(*field, fallback_field(*field, goal, variant));
    }
    if !gaps.is_empty() {
        debug!(%variant, filled = ?gaps, "filled missing fields from fallback");
    }
    gaps
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_rule_is_catch_all() {
        let last = HABIT_RULES.last().unwrap();
        assert!(last.prefixes.is_empty() && last.fragments.is_empty());
        assert!(last.matches(""));
        assert!(last.matches("anything at all"));
    }

    #[test]
    fn weight_goals_use_weight_templates() {
        for goal in ["I want to lose weight", "drop some WEIGHT", "start losing belly fat"] {
            assert_eq!(habit_rule(goal).name, "weight", "goal {goal:?}");
        }
        assert_eq!(
            fallback_field(Field::Habit, "I want to lose weight", Variant::V2),
            "Replace sugary drinks with water and do strength training 3 times per week"
        );
    }

    #[test]
    fn reading_goals_use_reading_templates() {
        assert_eq!(habit_rule("read more books").name, "reading");
        assert_eq!(habit_rule("I enjoy reading").name, "reading");
        assert_eq!(
            fallback_field(Field::Habit, "read more", Variant::V3),
            "Join a book club and read one book per month"
        );
    }

    #[test]
    fn weight_matches_inside_words() {
        for goal in ["I am overweight and unhappy", "start weightlifting", "stop being underweight"] {
            assert_eq!(habit_rule(goal).name, "weight", "goal {goal:?}");
        }
        assert_eq!(
            fallback_field(Field::Habit, "I am overweight and unhappy", Variant::V1),
            "Walk 10,000 steps daily and eat 3 servings of vegetables"
        );
    }

    #[test]
    fn prefix_keywords_do_not_match_inside_words() {
        // "bread" contains "read" but does not start with it.
        assert_eq!(habit_rule("bake bread at home").name, "generic");
    }

    #[test]
    fn earlier_rules_win() {
        // Both weight and fitness keywords; weight comes first.
        assert_eq!(habit_rule("run to lose weight").name, "weight");
    }

    #[test]
    fn unmatched_goals_use_generic_template() {
        let goal = "learn the guitar";
        assert_eq!(habit_rule(goal).name, "generic");
        assert_eq!(
            fallback_field(Field::Habit, goal, Variant::V1),
            "Practice learn the guitar for 30 minutes daily"
        );
    }

    #[test]
    fn goal_is_interpolated_into_why() {
        let why = fallback_field(Field::Why, "save money monthly", Variant::V1);
        assert_eq!(why, "This habit helps achieve save money monthly through consistent action");
    }

    #[test]
    fn schedule_and_success_come_from_profile() {
        for v in Variant::ALL {
            assert_eq!(fallback_field(Field::Schedule, "x y", v), v.profile().schedule);
            assert_eq!(
                fallback_field(Field::SuccessCriteria, "x y", v),
                v.profile().success_criteria
            );
        }
    }

    #[test]
    fn fallback_plan_is_total() {
        let goals = ["I want to lose weight", "read more", "sleep better", "get fit", "learn piano", "…", ""];
        for goal in goals {
            for v in Variant::ALL {
                let plan = fallback_plan(goal, v);
                assert!(plan.is_complete(), "goal {goal:?} variant {v}");
            }
        }
    }

    #[test]
    fn fallback_plan_is_deterministic() {
        for v in Variant::ALL {
            assert_eq!(fallback_plan("walk the dog", v), fallback_plan("walk the dog", v));
        }
    }

    #[test]
    fn every_field_differs_across_variants() {
        let goal = "learn piano";
        for field in Field::ALL {
            let [a, b, c] = Variant::ALL.map(|v| fallback_field(field, goal, v));
            assert!(a != b && b != c && a != c, "field {field} repeats across variants");
        }
    }

    #[test]
    fn fill_gaps_keeps_extracted_values() {
        let mut plan = SmartPlan::skeleton();
        plan.set(Field::Habit, "Walk daily");
        plan.set(Field::Why, "health");

        let filled = fill_gaps(&mut plan, "I want to lose weight", Variant::V1);

        assert_eq!(filled.len(), 4);
        assert!(plan.is_complete());
        assert_eq!(plan.get(Field::Habit), "Walk daily");
        assert_eq!(plan.get(Field::Why), "health");
        assert_eq!(plan.get(Field::StartDate), "Tomorrow");
    }

    #[test]
    fn fill_gaps_on_complete_plan_is_noop() {
        let mut plan = fallback_plan("read more", Variant::V2);
        let before = plan.clone();
        assert!(fill_gaps(&mut plan, "other goal", Variant::V3).is_empty());
        assert_eq!(plan, before);
    }
}
