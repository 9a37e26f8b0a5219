use super::state::FormState;
use crate::templates::Template;
use std::fmt::Write;

/// Marker for "no data"; the prompts tell the model to skip such areas.
pub const NOT_AVAILABLE: &str = "N/A";

/// Rating emitted for a field the form has no value for.
pub const MISSING_RATING: u8 = 0;

fn or_not_available(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

/// Join the checked values in the order the template lists them.
///
/// Values the template does not offer are dropped, and each entry appears once.
fn checked_in_vocabulary_order(vocabulary: &[String], checked: &[String]) -> String {
    vocabulary
        .iter()
        .filter(|option| checked.contains(option))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the student data summary for `template`.
///
/// Section order is fixed: report settings, identity, one rating line per
/// template field in template order, then traits and areas (both in template
/// vocabulary order), notes and the salutation. The output depends only on the inputs.
pub fn serialize(template: &Template, form: &FormState) -> String {
    let settings = &form.settings;
    let student = &form.student;
    let mut out = String::new();

    let _ = writeln!(out, "Language: {}", settings.language);
    let _ = writeln!(out, "Register: {}", settings.register);
    let _ = writeln!(out, "Tone: {}", settings.tone);
    let _ = writeln!(out, "Perspective: {}", settings.perspective);
    let _ = writeln!(out, "Output Length: {}", settings.output_length);
    let _ = writeln!(out, "Trimester: {}", settings.trimester);
    let _ = writeln!(out, "Student Name: {}", student.name);
    let _ = writeln!(out, "Gender: {}", student.gender);

    for field in &template.rating_fields {
        let value = student.rating(&field.id).unwrap_or(MISSING_RATING);
        let _ = writeln!(out, "{} Rating (0-10): {value}", field.label);
    }

    let _ = writeln!(
        out,
        "Character Attributes: {}",
        or_not_available(&checked_in_vocabulary_order(
            &template.character_options,
            &student.traits
        ))
    );
    let _ = writeln!(
        out,
        "Areas to Improve: {}",
        or_not_available(&checked_in_vocabulary_order(
            &template.areas_to_improve,
            &student.areas
        ))
    );
    let _ = writeln!(out, "Other Notes: {}", or_not_available(&student.notes));
    let _ = write!(out, "Holiday Salutation Theme: {}", student.salutation);

    if let Some(instruction) = template.custom_instruction() {
        let _ = write!(out, "\nTemplate Custom Instruction: {instruction}");
    }

    out
}
