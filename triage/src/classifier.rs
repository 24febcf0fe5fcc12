// triage/src/classifier.rs

use models::UrgencyTier;
use serde::Serialize;

/// Result of mapping a pre-computed score or label to an urgency tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub tier: UrgencyTier,
    pub urgent: bool,
}

/// Score labels that map straight to the Critical tier.
const CRITICAL_SCORES: &[&str] = &["red", "9", "10"];
/// Score labels that map straight to the High tier.
const HIGH_SCORES: &[&str] = &["orange", "7", "8"];

/// Maps a raw score or color label to an urgency tier. Case-insensitive;
/// anything outside the two known sets is Low.
pub fn classify_score(label: &str) -> Classification {
    let norm = label.trim().to_lowercase();
    let tier = if CRITICAL_SCORES.contains(&norm.as_str()) {
        UrgencyTier::Critical
    } else if HIGH_SCORES.contains(&norm.as_str()) {
        UrgencyTier::High
    } else {
        UrgencyTier::Low
    };
    Classification {
        tier,
        urgent: tier.is_urgent(),
    }
}

/// Deterministic assessment of free-text symptoms. This is the fallback used
/// whenever the generative triage endpoint is unavailable or returns junk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymptomAssessment {
    pub tier: UrgencyTier,
    pub urgency_score: u8,
    pub color_code: &'static str,
    pub category: &'static str,
    pub reasoning: &'static str,
    pub recommended_action: &'static str,
}

struct SymptomRule {
    keywords: &'static [&'static str],
    tier: UrgencyTier,
    urgency_score: u8,
    color_code: &'static str,
    category: &'static str,
    reasoning: &'static str,
    recommended_action: &'static str,
}

/// Ordered rule table; first matching rule wins. Matching is a
/// case-insensitive substring check with no score combination across rules.
const SYMPTOM_RULES: &[SymptomRule] = &[
    SymptomRule {
        keywords: &["chest pain", "heart", "breath", "blood", "collapse"],
        tier: UrgencyTier::Critical,
        urgency_score: 9,
        color_code: "red",
        category: "Emergency",
        reasoning: "DETECTED: Keywords indicating potential cardiac or respiratory failure. Immediate intervention required.",
        recommended_action: "Admit to Resus Area immediately. Prepare ECG.",
    },
    SymptomRule {
        keywords: &["fever", "dizzy", "vomit", "cough"],
        tier: UrgencyTier::High,
        urgency_score: 5,
        color_code: "orange",
        category: "Urgent",
        reasoning: "DETECTED: Signs of infection or dehydration. Patient stable but requires attention.",
        recommended_action: "Route to Triage Nurse for vitals check.",
    },
];

const ROUTINE_ASSESSMENT: SymptomAssessment = SymptomAssessment {
    tier: UrgencyTier::Low,
    urgency_score: 2,
    color_code: "green",
    category: "Routine",
    reasoning: "No critical keywords detected. Likely minor ailment or chronic check-up.",
    recommended_action: "Queue for General Practitioner.",
};

pub fn assess_symptoms(text: &str) -> SymptomAssessment {
    let lower = text.to_lowercase();
    for rule in SYMPTOM_RULES {
        if rule.keywords.iter().any(|k| lower.contains(k)) {
            return SymptomAssessment {
                tier: rule.tier,
                urgency_score: rule.urgency_score,
                color_code: rule.color_code,
                category: rule.category,
                reasoning: rule.reasoning,
                recommended_action: rule.recommended_action,
            };
        }
    }
    ROUTINE_ASSESSMENT
}

/// Builds the display label stored on a queue entry, e.g. "High (7/10)".
pub fn score_label(tier: UrgencyTier, score: u8) -> String {
    format!("{} ({}/10)", tier, score)
}

/// Numeric score for a classified booking: the client's value when it was
/// already a 1-10 number, otherwise the tier's canonical score.
pub fn score_from_input(input: &str, tier: UrgencyTier) -> u8 {
    if let Ok(n) = input.trim().parse::<u8>() {
        if (1..=10).contains(&n) {
            return n;
        }
    }
    match tier {
        UrgencyTier::Critical => 9,
        UrgencyTier::High => 7,
        UrgencyTier::Low => 2,
    }
}
