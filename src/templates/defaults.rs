//! Locked templates seeded into every store.

use super::types::{RatingField, Template};

pub const DEFAULT_TEMPLATE_ID: &str = "default-esl";

const CHARACTER_OPTIONS: &[&str] = &[
    "hard-working",
    "friendly",
    "attentive",
    "lively",
    "active",
    "quiet",
    "energetic",
    "studious",
    "sociable",
    "motivated",
    "respectful",
    "confident",
    "organised",
    "positive",
    "focused",
    "determined",
    "disinterested",
    "demotivated",
    "lazy",
    "shy",
];

pub const LANGUAGES: &[&str] = &[
    "English",
    "Spanish",
    "Catalan",
    "French",
    "German",
    "Italian",
    "Portuguese",
    "Dutch",
    "Polish",
    "Arabic",
    "Chinese (Simplified)",
    "Chinese (Traditional)",
    "Japanese",
    "Korean",
];

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn fields(pairs: &[(&str, &str)]) -> Vec<RatingField> {
    pairs
        .iter()
        .map(|(id, label)| RatingField::new(*id, *label))
        .collect()
}

fn locked(
    id: &str,
    name: &str,
    description: &str,
    rating_fields: Vec<RatingField>,
    areas_to_improve: &[&str],
    created_date: i64,
) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        is_default: id == DEFAULT_TEMPLATE_ID,
        is_locked: true,
        rating_fields,
        character_options: strings(CHARACTER_OPTIONS),
        areas_to_improve: strings(areas_to_improve),
        languages: strings(LANGUAGES),
        custom_instruction: String::new(),
        created_date,
    }
}

/// The ESL report every install starts from.
pub fn default_template(created_date: i64) -> Template {
    locked(
        DEFAULT_TEMPLATE_ID,
        "ESL Teacher Report",
        "Standard ESL student assessment with progress, behaviour, and language skills",
        fields(&[
            ("progress", "Progress"),
            ("behaviour", "Behaviour"),
            ("participation", "Participation"),
            ("english-level", "English Level"),
            ("exam-performance", "Exam Performance"),
        ]),
        &[
            "grammar",
            "vocabulary",
            "Use of English",
            "Reading",
            "Listening",
            "Writing",
            "Speaking fluency",
            "Pronunciation",
            "Spelling",
            "Participation",
            "Paying attention",
            "Sitting still",
            "Completing classwork",
            "Completing homework",
            "Speak less Spanish",
            "Motivation",
            "Focus/Concentration",
        ],
        created_date,
    )
}

/// All seeded templates, default first.
pub fn seeded_templates(created_date: i64) -> Vec<Template> {
    vec![
        default_template(created_date),
        locked(
            "general-academic",
            "General Academic Report",
            "Suitable for any subject teacher - focuses on academic performance and study skills",
            fields(&[
                ("academic-performance", "Academic Performance"),
                ("homework-quality", "Homework Quality"),
                ("class-participation", "Class Participation"),
                ("study-skills", "Study Skills"),
                ("time-management", "Time Management"),
            ]),
            &[
                "Understanding concepts",
                "Completing assignments",
                "Active participation",
                "Note-taking",
                "Test preparation",
                "Asking questions",
                "Time management",
                "Organization skills",
                "Following instructions",
                "Working independently",
                "Group work",
                "Meeting deadlines",
                "Attention to detail",
                "Critical thinking",
                "Self-assessment",
                "Seeking help when needed",
            ],
            created_date,
        ),
        locked(
            "primary-school",
            "Primary School Report",
            "Designed for elementary/primary teachers - covers developmental areas and foundational skills",
            fields(&[
                ("reading-skills", "Reading Skills"),
                ("math-skills", "Math Skills"),
                ("social-skills", "Social Skills"),
                ("physical-development", "Physical Development"),
                ("creativity", "Creativity"),
            ]),
            &[
                "Reading comprehension",
                "Phonics",
                "Writing skills",
                "Number recognition",
                "Basic math operations",
                "Sharing with others",
                "Taking turns",
                "Listening skills",
                "Following directions",
                "Fine motor skills",
                "Gross motor skills",
                "Concentration",
                "Completing tasks",
                "Speaking clearly",
                "Expressing ideas",
                "Problem solving",
                "Independence",
                "Tidying up",
            ],
            created_date,
        ),
        locked(
            "behaviour-focused",
            "Behaviour-Focused Report",
            "For homeroom teachers and counselors - emphasizes social behavior and classroom conduct",
            fields(&[
                ("classroom-behavior", "Classroom Behavior"),
                ("respect-for-others", "Respect for Others"),
                ("following-rules", "Following Rules"),
                ("self-control", "Self-Control"),
                ("cooperation", "Cooperation"),
            ]),
            &[
                "Listening to others",
                "Raising hand before speaking",
                "Staying in seat",
                "Respecting personal space",
                "Using kind words",
                "Managing frustration",
                "Accepting consequences",
                "Being honest",
                "Helping classmates",
                "Sharing materials",
                "Waiting patiently",
                "Controlling impulses",
                "Resolving conflicts peacefully",
                "Following directions first time",
                "Respecting teacher authority",
                "Taking responsibility",
                "Accepting feedback",
                "Managing emotions",
            ],
            created_date,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_templates_are_locked_and_valid() {
        let seeded = seeded_templates(0);
        assert_eq!(seeded.len(), 4);
        for template in &seeded {
            assert!(template.is_locked, "{} should be locked", template.id);
            assert!(template.is_valid(), "{} should be valid", template.id);
        }
    }

    #[test]
    fn only_the_esl_template_is_default() {
        let defaults: Vec<_> = seeded_templates(0)
            .into_iter()
            .filter(|t| t.is_default)
            .map(|t| t.id)
            .collect();
        assert_eq!(defaults, vec![DEFAULT_TEMPLATE_ID]);
    }
}
