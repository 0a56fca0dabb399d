//! The canonical six-field SMART plan.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One of the six SMART fields, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Habit,
    Why,
    Measure,
    Schedule,
    StartDate,
    SuccessCriteria,
}

impl Field {
    /// Every field, in canonical order.
    pub const ALL: [Field; 6] = [
        Field::Habit,
        Field::Why,
        Field::Measure,
        Field::Schedule,
        Field::StartDate,
        Field::SuccessCriteria,
    ];

    /// Label as written in plan text (without the colon).
    pub fn label(self) -> &'static str {
        match self {
            Self::Habit => "Habit",
            Self::Why => "Why",
            Self::Measure => "Measure",
            Self::Schedule => "Schedule",
            Self::StartDate => "Start date",
            Self::SuccessCriteria => "Success criteria",
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Habit => 0,
            Self::Why => 1,
            Self::Measure => 2,
            Self::Schedule => 3,
            Self::StartDate => 4,
            Self::SuccessCriteria => 5,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A SMART plan: exactly six fields in fixed order, any of which may be
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmartPlan {
    values: [String; 6],
}

impl SmartPlan {
    /// A plan with every field present and empty.
    pub fn skeleton() -> Self {
        Self::default()
    }

    /// Build a plan from a value per field.
    pub fn from_fn(mut value: impl FnMut(Field) -> String) -> Self {
        Self {
            values: Field::ALL.map(&mut value),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[field.slot()]
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.slot()] = value.into();
    }

    /// `(field, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.into_iter().map(|f| (f, self.get(f)))
    }

    /// Fields whose value is empty, in canonical order.
    pub fn empty_fields(&self) -> Vec<Field> {
        self.iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(f, _)| f)
            .collect()
    }

    /// Every field is empty.
    pub fn is_skeleton(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    /// No field is empty.
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(|v| !v.is_empty())
    }

    /// Render as six `Label: value` lines joined by `\n`.
    ///
    /// Empty values render as a bare `Label:` so no line carries trailing
    /// whitespace.
    pub fn render(&self) -> String {
        self.iter()
            .map(|(field, value)| {
                if value.is_empty() {
                    format!("{}:", field.label())
                } else {
                    format!("{}: {value}", field.label())
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for SmartPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for SmartPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::ALL.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.label(), value)?;
        }
        map.end()
    }
}
