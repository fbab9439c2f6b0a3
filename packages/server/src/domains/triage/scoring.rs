//! Urgency scoring for triage assessments.
//!
//! Two independently-weighted rubrics exist for the same decision and are
//! deliberately kept as separate strategies: the intake rubric served by
//! `/api/triage/assess`, and the quick-form rubric used by the client-side
//! self-check. They disagree on some inputs, so merging them would change
//! observable behavior.
//!
//! Both are pure functions: no state, no I/O, safe to call concurrently.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symptom answers collected by the triage form.
///
/// Absent flags default to false; there is no failure mode.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TriageAnswers {
    #[serde(default)]
    pub bleeding: bool,
    #[serde(default)]
    pub cannot_stand: bool,
    #[serde(default)]
    pub vehicle_involved: bool,
    #[serde(default)]
    pub breathing_difficulty: bool,
    #[serde(default)]
    pub juvenile: bool,
}

/// Urgency tiers, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Critical,
    Urgent,
    Monitor,
    NonEmergency,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Urgent => "urgent",
            Self::Monitor => "monitor",
            Self::NonEmergency => "non_emergency",
        }
    }

    /// Display emoji shown next to the tier in the UI.
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Critical => "\u{1F534}",
            Self::Urgent => "\u{1F7E0}",
            Self::Monitor => "\u{1F7E1}",
            Self::NonEmergency => "\u{1F7E2}",
        }
    }

    /// Display color for the tier badge.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Critical => "#dc2626",
            Self::Urgent => "#ea580c",
            Self::Monitor => "#ca8a04",
            Self::NonEmergency => "#16a34a",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running a scoring strategy over the answers.
#[derive(Debug, Clone, Serialize)]
pub struct TriageAssessment {
    pub risk_score: u32,
    pub urgency_level: UrgencyLevel,
    pub advice: &'static str,
    pub first_aid: &'static [&'static str],
    pub contact_priority: &'static str,
}

// ============================================================================
// Intake rubric (served by /api/triage/assess)
// ============================================================================

/// Score the answers with the intake rubric.
///
/// score = 35*vehicle + 30*bleeding + 25*breathing + 20*cannot_stand
///       + 10*juvenile, so the range is [0, 120]. Tiers partition the
/// range: >=60 critical, >=40 urgent, >=20 monitor, else non-emergency.
pub fn assess_intake(answers: &TriageAnswers) -> TriageAssessment {
    let mut risk_score = 0;
    if answers.vehicle_involved {
        risk_score += 35;
    }
    if answers.bleeding {
        risk_score += 30;
    }
    if answers.breathing_difficulty {
        risk_score += 25;
    }
    if answers.cannot_stand {
        risk_score += 20;
    }
    if answers.juvenile {
        risk_score += 10;
    }

    let urgency_level = if risk_score >= 60 {
        UrgencyLevel::Critical
    } else if risk_score >= 40 {
        UrgencyLevel::Urgent
    } else if risk_score >= 20 {
        UrgencyLevel::Monitor
    } else {
        UrgencyLevel::NonEmergency
    };

    let (advice, contact_priority, first_aid) = intake_guidance(urgency_level);

    TriageAssessment {
        risk_score,
        urgency_level,
        advice,
        first_aid,
        contact_priority,
    }
}

fn intake_guidance(
    level: UrgencyLevel,
) -> (&'static str, &'static str, &'static [&'static str]) {
    match level {
        UrgencyLevel::Critical => (
            "This is a CRITICAL emergency! The animal needs immediate professional help.",
            "Call emergency vet/NGO immediately",
            &[
                "Keep the animal calm and still",
                "Do not move the animal unless absolutely necessary",
                "Apply gentle pressure to bleeding wounds with clean cloth",
                "Keep the animal warm with a blanket",
                "Do NOT give food or water if unconscious",
            ],
        ),
        UrgencyLevel::Urgent => (
            "Urgent attention needed. Contact rescue team as soon as possible.",
            "Contact NGO/rescue within 30 minutes",
            &[
                "Move animal to safe area if on road",
                "Provide shade and shelter",
                "Offer water in a shallow container if conscious",
                "Monitor breathing and behavior",
                "Keep other animals and people away",
            ],
        ),
        UrgencyLevel::Monitor => (
            "Monitor the animal closely. Seek help if condition worsens.",
            "Contact local shelter within a few hours",
            &[
                "Provide fresh water",
                "Create a quiet, safe space",
                "Offer food if the animal seems hungry",
                "Watch for signs of distress",
                "Take photos for documentation",
            ],
        ),
        UrgencyLevel::NonEmergency => (
            "No immediate emergency detected. Monitor and provide basic care.",
            "Contact animal welfare when convenient",
            &[
                "Provide food and water",
                "Create shelter from weather",
                "Monitor for any changes",
                "Consider long-term care options",
            ],
        ),
    }
}

// ============================================================================
// Quick-form rubric (client-side self check)
// ============================================================================

/// Score the answers with the quick-form rubric.
///
/// score = 4*vehicle + 3*bleeding + 3*breathing + 2*cannot_stand
///       + 1*juvenile, range [0, 13]. Compound symptoms override the
/// thresholds: vehicle+bleeding and bleeding+breathing are always
/// critical, a vehicle strike alone is always at least urgent, and
/// breathing trouble or inability to stand is always at least monitor.
pub fn assess_quick_form(answers: &TriageAnswers) -> TriageAssessment {
    let mut risk_score = 0;
    if answers.vehicle_involved {
        risk_score += 4;
    }
    if answers.bleeding {
        risk_score += 3;
    }
    if answers.breathing_difficulty {
        risk_score += 3;
    }
    if answers.cannot_stand {
        risk_score += 2;
    }
    if answers.juvenile {
        risk_score += 1;
    }

    let urgency_level = if risk_score >= 6
        || (answers.vehicle_involved && answers.bleeding)
        || (answers.bleeding && answers.breathing_difficulty)
    {
        UrgencyLevel::Critical
    } else if risk_score >= 4
        || answers.vehicle_involved
        || (answers.bleeding && !answers.breathing_difficulty)
    {
        UrgencyLevel::Urgent
    } else if risk_score >= 2 || answers.breathing_difficulty || answers.cannot_stand {
        UrgencyLevel::Monitor
    } else {
        UrgencyLevel::NonEmergency
    };

    let (advice, contact_priority, first_aid) = quick_form_guidance(urgency_level);

    TriageAssessment {
        risk_score,
        urgency_level,
        advice,
        first_aid,
        contact_priority,
    }
}

fn quick_form_guidance(
    level: UrgencyLevel,
) -> (&'static str, &'static str, &'static [&'static str]) {
    match level {
        UrgencyLevel::Critical => (
            "Critical emergency detected. Get professional help now.",
            "Call emergency vet/NGO immediately",
            &[
                "DO NOT move the animal unless in immediate danger",
                "Keep the animal calm - speak softly",
                "If bleeding: Apply gentle pressure with clean cloth",
                "Keep the animal warm with a blanket",
                "DO NOT give food or water",
            ],
        ),
        UrgencyLevel::Urgent => (
            "Urgent attention needed within 1-2 hours.",
            "Contact NGO/rescue within 30 minutes",
            &[
                "Check for visible injuries",
                "Create a safe barrier around the animal",
                "Apply gentle pressure to stop bleeding",
                "Keep in a quiet, shaded place",
                "Arrange transport to vet within 1-2 hours",
            ],
        ),
        UrgencyLevel::Monitor => (
            "Needs attention. Observe closely and escalate if it worsens.",
            "Contact local shelter within a few hours",
            &[
                "Keep the animal in a well-ventilated area",
                "Provide fresh water nearby",
                "Observe behavior for 30 minutes",
                "If condition worsens, escalate to urgent",
                "Consult a vet if not improving",
            ],
        ),
        UrgencyLevel::NonEmergency => (
            "The animal appears to be in stable condition.",
            "Contact animal welfare when convenient",
            &[
                "Provide fresh water and some shade",
                "Keep an eye on the animal for changes",
                "Consider reporting for regular care",
                "Contact local NGO for sterilization programs",
            ],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(
        bleeding: bool,
        cannot_stand: bool,
        vehicle: bool,
        breathing: bool,
        juvenile: bool,
    ) -> TriageAnswers {
        TriageAnswers {
            bleeding,
            cannot_stand,
            vehicle_involved: vehicle,
            breathing_difficulty: breathing,
            juvenile,
        }
    }

    // ------------------------------------------------------------------
    // Intake rubric
    // ------------------------------------------------------------------

    #[test]
    fn test_intake_all_flags() {
        let result = assess_intake(&answers(true, true, true, true, true));
        assert_eq!(result.risk_score, 120);
        assert_eq!(result.urgency_level, UrgencyLevel::Critical);
    }

    #[test]
    fn test_intake_no_flags() {
        let result = assess_intake(&TriageAnswers::default());
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.urgency_level, UrgencyLevel::NonEmergency);
    }

    #[test]
    fn test_intake_breathing_only_is_monitor() {
        // 25 falls in [20, 40)
        let result = assess_intake(&answers(false, false, false, true, false));
        assert_eq!(result.risk_score, 25);
        assert_eq!(result.urgency_level, UrgencyLevel::Monitor);
    }

    #[test]
    fn test_intake_boundary_60_is_critical() {
        // bleeding(30) + cannot_stand(20) + juvenile(10) = 60
        let result = assess_intake(&answers(true, true, false, false, true));
        assert_eq!(result.risk_score, 60);
        assert_eq!(result.urgency_level, UrgencyLevel::Critical);
    }

    #[test]
    fn test_intake_just_below_critical_is_urgent() {
        // bleeding(30) + cannot_stand(20) = 50
        let result = assess_intake(&answers(true, true, false, false, false));
        assert_eq!(result.risk_score, 50);
        assert_eq!(result.urgency_level, UrgencyLevel::Urgent);
    }

    #[test]
    fn test_intake_boundary_40_is_urgent() {
        // bleeding(30) + juvenile(10) = 40
        let result = assess_intake(&answers(true, false, false, false, true));
        assert_eq!(result.risk_score, 40);
        assert_eq!(result.urgency_level, UrgencyLevel::Urgent);
    }

    #[test]
    fn test_intake_just_below_urgent_is_monitor() {
        // cannot_stand(20) + juvenile(10) = 30
        let result = assess_intake(&answers(false, true, false, false, true));
        assert_eq!(result.risk_score, 30);
        assert_eq!(result.urgency_level, UrgencyLevel::Monitor);
    }

    #[test]
    fn test_intake_boundary_20_is_monitor() {
        let result = assess_intake(&answers(false, true, false, false, false));
        assert_eq!(result.risk_score, 20);
        assert_eq!(result.urgency_level, UrgencyLevel::Monitor);
    }

    #[test]
    fn test_intake_below_20_is_non_emergency() {
        let result = assess_intake(&answers(false, false, false, false, true));
        assert_eq!(result.risk_score, 10);
        assert_eq!(result.urgency_level, UrgencyLevel::NonEmergency);
    }

    #[test]
    fn test_intake_score_in_range_for_all_combinations() {
        for bits in 0u8..32 {
            let input = answers(
                bits & 1 != 0,
                bits & 2 != 0,
                bits & 4 != 0,
                bits & 8 != 0,
                bits & 16 != 0,
            );
            let result = assess_intake(&input);
            assert!(result.risk_score <= 120);
            let expected = match result.risk_score {
                s if s >= 60 => UrgencyLevel::Critical,
                s if s >= 40 => UrgencyLevel::Urgent,
                s if s >= 20 => UrgencyLevel::Monitor,
                _ => UrgencyLevel::NonEmergency,
            };
            assert_eq!(result.urgency_level, expected);
        }
    }

    #[test]
    fn test_intake_idempotent() {
        let input = answers(true, false, true, false, true);
        let first = assess_intake(&input);
        let second = assess_intake(&input);
        assert_eq!(first.risk_score, second.risk_score);
        assert_eq!(first.urgency_level, second.urgency_level);
        assert_eq!(first.advice, second.advice);
    }

    // ------------------------------------------------------------------
    // Quick-form rubric
    // ------------------------------------------------------------------

    #[test]
    fn test_quick_form_vehicle_and_bleeding_is_critical() {
        // score = 4 + 3 = 7, but the compound rule alone would decide it
        let result = assess_quick_form(&answers(true, false, true, false, false));
        assert_eq!(result.urgency_level, UrgencyLevel::Critical);
    }

    #[test]
    fn test_quick_form_bleeding_and_breathing_is_critical() {
        let result = assess_quick_form(&answers(true, false, false, true, false));
        assert_eq!(result.risk_score, 6);
        assert_eq!(result.urgency_level, UrgencyLevel::Critical);
    }

    #[test]
    fn test_quick_form_vehicle_alone_is_urgent() {
        let result = assess_quick_form(&answers(false, false, true, false, false));
        assert_eq!(result.risk_score, 4);
        assert_eq!(result.urgency_level, UrgencyLevel::Urgent);
    }

    #[test]
    fn test_quick_form_bleeding_alone_is_urgent() {
        // score 3 is below the urgent threshold; the bleeding override applies
        let result = assess_quick_form(&answers(true, false, false, false, false));
        assert_eq!(result.risk_score, 3);
        assert_eq!(result.urgency_level, UrgencyLevel::Urgent);
    }

    #[test]
    fn test_quick_form_breathing_alone_is_monitor() {
        let result = assess_quick_form(&answers(false, false, false, true, false));
        assert_eq!(result.risk_score, 3);
        assert_eq!(result.urgency_level, UrgencyLevel::Monitor);
    }

    #[test]
    fn test_quick_form_juvenile_alone_is_non_emergency() {
        let result = assess_quick_form(&answers(false, false, false, false, true));
        assert_eq!(result.risk_score, 1);
        assert_eq!(result.urgency_level, UrgencyLevel::NonEmergency);
    }

    #[test]
    fn test_quick_form_no_flags() {
        let result = assess_quick_form(&TriageAnswers::default());
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.urgency_level, UrgencyLevel::NonEmergency);
    }

    // ------------------------------------------------------------------
    // The rubrics are not equivalent
    // ------------------------------------------------------------------

    #[test]
    fn test_rubrics_diverge() {
        // Bleeding only: intake says monitor (30 < 40), quick form says
        // urgent (override). Pinned so nobody "unifies" the strategies.
        let input = answers(true, false, false, false, false);
        assert_eq!(assess_intake(&input).urgency_level, UrgencyLevel::Monitor);
        assert_eq!(
            assess_quick_form(&input).urgency_level,
            UrgencyLevel::Urgent
        );
    }

    #[test]
    fn test_urgency_level_wire_names() {
        assert_eq!(UrgencyLevel::Critical.as_str(), "critical");
        assert_eq!(UrgencyLevel::NonEmergency.as_str(), "non_emergency");
        let json = serde_json::to_string(&UrgencyLevel::NonEmergency).unwrap();
        assert_eq!(json, "\"non_emergency\"");
    }
}
