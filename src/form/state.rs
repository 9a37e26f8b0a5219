use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Neutral,
    FriendlyConstructive,
    EmpatheticSupportive,
    ConciseDirect,
    GrowthOriented,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum Perspective {
    #[default]
    ThirdPerson,
    SecondPerson,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OutputLength {
    Short,
    #[default]
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum Trimester {
    #[default]
    #[strum(serialize = "1")]
    #[serde(rename = "1")]
    First,
    #[strum(serialize = "2")]
    #[serde(rename = "2")]
    Second,
    #[strum(serialize = "3 (End of Year)")]
    #[serde(rename = "3")]
    EndOfYear,
    #[strum(serialize = "Course")]
    #[serde(rename = "course")]
    Course,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum Salutation {
    #[default]
    Christmas,
    Easter,
    Summer,
    None,
}

/// Step-one choices that survive clearing the student form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub language: String,
    pub register: String,
    pub tone: Tone,
    pub perspective: Perspective,
    pub output_length: OutputLength,
    pub trimester: Trimester,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            language: "English".into(),
            register: "Formal".into(),
            tone: Tone::default(),
            perspective: Perspective::default(),
            output_length: OutputLength::default(),
            trimester: Trimester::default(),
        }
    }
}

/// Per-student values, keyed by the active template's rating field ids.
///
/// `traits` and `areas` hold the checked values; the serializer orders them
/// by the template vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    pub name: String,
    pub gender: String,
    pub ratings: BTreeMap<String, u8>,
    pub traits: Vec<String>,
    pub areas: Vec<String>,
    pub notes: String,
    pub salutation: Salutation,
}

impl StudentForm {
    /// Store a rating, clamped to 0-10.
    pub fn set_rating(&mut self, field_id: impl Into<String>, value: u8) {
        self.ratings.insert(field_id.into(), value.min(10));
    }

    pub fn rating(&self, field_id: &str) -> Option<u8> {
        self.ratings.get(field_id).copied()
    }

    /// Toggle a trait on or off.
    pub fn toggle_trait(&mut self, value: &str) {
        toggle(&mut self.traits, value);
    }

    pub fn toggle_area(&mut self, value: &str) {
        toggle(&mut self.areas, value);
    }
}

fn toggle(values: &mut Vec<String>, value: &str) {
    if let Some(pos) = values.iter().position(|v| v == value) {
        values.remove(pos);
    } else {
        values.push(value.to_string());
    }
}

/// The typed value object the UI layer hands to the serializer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormState {
    pub settings: ReportSettings,
    pub student: StudentForm,
}

impl FormState {
    pub fn has_student_name(&self) -> bool {
        !self.student.name.trim().is_empty()
    }

    /// Reset the student part for the next pupil, keeping the report settings.
    pub fn clear_student(&mut self) {
        self.student = StudentForm::default();
    }
}
