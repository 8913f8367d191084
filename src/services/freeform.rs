//! Canned replies for freeform text outside the structured booking flow.
//! An ordered keyword table picks a topic; the session's persona picks the
//! template. No state machine involved — this is a pure lookup.

use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    Fatigue,
    BloodPressure,
    Sleep,
    ReportReading,
}

struct Rule {
    keywords: &'static [&'static str],
    topic: Topic,
}

// Evaluated top to bottom; first matching keyword wins.
const RULES: &[Rule] = &[
    Rule {
        keywords: &["tired", "fatigue", "exhausted", "no energy"],
        topic: Topic::Fatigue,
    },
    Rule {
        keywords: &["blood pressure", "hypertension"],
        topic: Topic::BloodPressure,
    },
    Rule {
        keywords: &["sleep", "insomnia"],
        topic: Topic::Sleep,
    },
    Rule {
        keywords: &["report", "test result", "lab"],
        topic: Topic::ReportReading,
    },
];

pub const DEFAULT_TEMPLATES: &[&str] = &[
    "I'm not sure I follow — could you tell me a bit more about what you're experiencing?",
    "Could you describe that in a little more detail? I want to point you in the right direction.",
    "I may not have understood. If you'd like to book a caregiver, tap one of the options above.",
];

fn template_for(topic: Topic, persona: &str) -> &'static str {
    match persona {
        "clinical-advisor" => match topic {
            Topic::Fatigue => {
                "Persistent fatigue can have many causes, from anemia to thyroid issues. If it lasts more than two weeks, arrange a blood panel with your physician."
            }
            Topic::BloodPressure => {
                "Measure at the same time each day, seated, after five minutes of rest. Readings consistently above 140/90 warrant a consultation."
            }
            Topic::Sleep => {
                "Keep a fixed wake time and avoid screens for an hour before bed. If insomnia persists beyond a month, discuss it with a doctor before using sleep aids."
            }
            Topic::ReportReading => {
                "Upload or bring the report to your next appointment — flagged values outside the reference range are the ones worth asking about."
            }
        },
        // "care-companion" and any unrecognized persona share the warmer set.
        _ => match topic {
            Topic::Fatigue => {
                "Feeling worn out is really common for caregivers and elders alike. Make sure you're resting and eating regularly, and let a doctor know if it doesn't lift."
            }
            Topic::BloodPressure => {
                "Blood pressure is easiest to track with a morning reading before breakfast. I can help you book a health worker to check in regularly if that would help."
            }
            Topic::Sleep => {
                "Gentle routines help a lot: a warm drink, dim lights, the same bedtime each night. Poor sleep that goes on for weeks is worth mentioning to a doctor."
            }
            Topic::ReportReading => {
                "I can't interpret medical reports myself, but a registered nurse from our team can walk through it with you — would you like to book one?"
            }
        },
    }
}

/// Keyword-to-template lookup. Falls back to a random default template when
/// nothing matches.
pub fn respond(text: &str, persona: &str) -> String {
    let lowered = text.to_lowercase();
    for rule in RULES {
        if rule.keywords.iter().any(|kw| lowered.contains(kw)) {
            return template_for(rule.topic, persona).to_string();
        }
    }
    DEFAULT_TEMPLATES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(DEFAULT_TEMPLATES[0])
        .to_string()
}
