use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(UrgencyTier {
    Routine => "routine",
    Soon => "soon",
    Urgent => "urgent",
});

str_enum!(FocusArea {
    Timeline => "timeline",
    Severity => "severity",
    AssociatedSymptoms => "associated_symptoms",
    AggravatingFactors => "aggravating_factors",
    RelievingFactors => "relieving_factors",
    History => "history",
    Medications => "medications",
    RecentChanges => "recent_changes",
    FamilyHistory => "family_history",
    Clarifications => "clarifications",
});

str_enum!(ResultSource {
    Model => "model",
    Fallback => "fallback",
});

impl UrgencyTier {
    /// Lenient parse for model-supplied tags. Anything unrecognised is routine.
    pub fn from_model_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "urgent" => Self::Urgent,
            "soon" => Self::Soon,
            _ => Self::Routine,
        }
    }

    /// Care-seeking sentence shown alongside the tier.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Urgent => "Seek immediate medical attention (ER or call emergency services).",
            Self::Soon => "Schedule an appointment within 24-48 hours.",
            Self::Routine => "Schedule at your convenience and monitor symptoms.",
        }
    }
}

impl FocusArea {
    /// Focus areas in interview order, one per turn.
    pub const SEQUENCE: [FocusArea; 10] = [
        Self::Timeline,
        Self::Severity,
        Self::AssociatedSymptoms,
        Self::AggravatingFactors,
        Self::RelievingFactors,
        Self::History,
        Self::Medications,
        Self::RecentChanges,
        Self::FamilyHistory,
        Self::Clarifications,
    ];

    /// Focus for a zero-based turn. Turns past the table stay on clarifications.
    pub fn for_turn(turn_index: u32) -> Self {
        let last = Self::SEQUENCE.len() - 1;
        let idx = usize::try_from(turn_index).map_or(last, |i| i.min(last));
        Self::SEQUENCE[idx]
    }

    /// Instruction text embedded in the interview prompt.
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Timeline => "Focus on: Symptom Timeline - When exactly did symptoms start? Was onset sudden or gradual? How have symptoms changed over time?",
            Self::Severity => "Focus on: Severity & Intensity - On a scale of 1-10, how severe are symptoms? Does severity vary throughout the day?",
            Self::AssociatedSymptoms => "Focus on: Associated Symptoms - Are there ANY other symptoms present? Even minor ones? (headache, fatigue, fever, nausea, etc.)",
            Self::AggravatingFactors => "Focus on: Triggers & Aggravating Factors - What makes symptoms WORSE? (activity, food, time of day, stress, etc.)",
            Self::RelievingFactors => "Focus on: Relieving Factors - What makes symptoms BETTER? Have they tried any remedies? What was the effect?",
            Self::History => "Focus on: Medical History - Any chronic conditions? Past surgeries? Similar episodes before?",
            Self::Medications => "Focus on: Current Medications - Are they currently taking ANY medications, supplements, or vitamins? Include over-the-counter.",
            Self::RecentChanges => "Focus on: Recent Changes - Any recent travel, diet changes, new medications, stress, injuries, or exposures?",
            Self::FamilyHistory => "Focus on: Family History - Do any blood relatives have similar conditions or relevant medical conditions?",
            Self::Clarifications => "Focus on: Important Clarifications - Ask about any critical details missing from previous responses that would help narrow the diagnosis.",
        }
    }
}
