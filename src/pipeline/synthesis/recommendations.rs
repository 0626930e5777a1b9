use super::{contains_any, keyword_text};
use crate::models::Recommendation;

/// Upper bound on composed recommendations, baseline and closing included.
pub const MAX_RECOMMENDATIONS: usize = 5;

struct ConditionalRule {
    keywords: &'static [&'static str],
    title: &'static str,
    description: &'static str,
}

/// Evaluated in this order; the first three that fire are kept.
const CONDITIONAL_RULES: &[ConditionalRule] = &[
    ConditionalRule {
        keywords: &["fever", "cough", "throat", "tired", "fatigue"],
        title: "Rest and Hydration",
        description: "Ensure adequate sleep and drink plenty of fluids to support your immune system",
    },
    ConditionalRule {
        keywords: &["pain", "ache", "hurt", "sore"],
        title: "Pain Management",
        description: "Consider appropriate over-the-counter pain relief if suitable for your condition",
    },
    ConditionalRule {
        keywords: &["fever", "hot", "chills"],
        title: "Temperature Control",
        description: "Monitor temperature regularly and use appropriate fever reduction methods if needed",
    },
    ConditionalRule {
        keywords: &["cough", "breathing", "chest", "lungs"],
        title: "Respiratory Support",
        description: "Use humidifiers, steam inhalation, or other breathing support measures as appropriate",
    },
];

/// Baseline symptom log first, professional consultation last, and up to
/// three keyword-triggered entries between them.
pub fn generate_smart_recommendations(symptoms: &str) -> Vec<Recommendation> {
    let text = keyword_text(symptoms);
    let mut out = Vec::with_capacity(MAX_RECOMMENDATIONS);

    out.push(Recommendation::new(
        "Symptom Monitoring",
        "Keep a detailed log of your symptoms, including timing, severity, and triggers",
    ));

    out.extend(
        CONDITIONAL_RULES
            .iter()
            .filter(|rule| contains_any(&text, rule.keywords))
            .take(MAX_RECOMMENDATIONS - 2)
            .map(|rule| Recommendation::new(rule.title, rule.description)),
    );

    out.push(Recommendation::new(
        "Professional Consultation",
        "Schedule an appointment with your healthcare provider for proper evaluation and treatment planning",
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn no_keywords_gives_baseline_and_closing() {
        let recs = generate_smart_recommendations("itchy rash on elbow");
        assert_eq!(titles(&recs), vec!["Symptom Monitoring", "Professional Consultation"]);
    }

    #[test]
    fn fever_triggers_rest_and_temperature() {
        let recs = generate_smart_recommendations("Fever since yesterday");
        assert_eq!(
            titles(&recs),
            vec![
                "Symptom Monitoring",
                "Rest and Hydration",
                "Temperature Control",
                "Professional Consultation"
            ]
        );
    }

    #[test]
    fn all_rules_firing_keeps_closing_last() {
        let recs = generate_smart_recommendations("fever, chest pain and a cough");
        assert_eq!(recs.len(), MAX_RECOMMENDATIONS);
        assert_eq!(
            titles(&recs),
            vec![
                "Symptom Monitoring",
                "Rest and Hydration",
                "Pain Management",
                "Temperature Control",
                "Professional Consultation"
            ]
        );
    }

    #[test]
    fn respiratory_only() {
        let recs = generate_smart_recommendations("Shortness of breathing at night");
        assert_eq!(
            titles(&recs),
            vec!["Symptom Monitoring", "Respiratory Support", "Professional Consultation"]
        );
    }

    #[test]
    fn descriptions_are_fixed_text() {
        let recs = generate_smart_recommendations("");
        assert_eq!(
            recs[0].description,
            "Keep a detailed log of your symptoms, including timing, severity, and triggers"
        );
    }
}
