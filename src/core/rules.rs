//! Ordered keyword rules for the offline classifier.
//!
//! Rules are evaluated top to bottom against the lowercased text and the first
//! rule with any matching keyword wins. Keywords match as substrings, so
//! "heartburn" triggers the cardiac rule and "stroke" also covers "strokes".

use crate::domain::model::Urgency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub specialty: &'static str,
    pub urgency: Urgency,
    pub summary: &'static str,
}

impl KeywordRule {
    pub fn matches(&self, lowercased: &str) -> bool {
        self.keywords.iter().any(|keyword| lowercased.contains(keyword))
    }
}

/// Priority order matters: dental and cardiac checks run before the broader
/// categories.
pub const RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &[
            "tooth", "teeth", "dental", "dentist", "gum", "cavity", "toothache", "molar",
            "filling", "crown", "root canal",
        ],
        specialty: "Dentistry",
        urgency: Urgency::Low,
        summary: "Dental issue detected",
    },
    KeywordRule {
        keywords: &[
            "chest pain",
            "heart",
            "cardiac",
            "cardiology",
            "blood pressure",
            "palpitation",
            "cardiovascular",
            "angina",
        ],
        specialty: "Cardiology",
        urgency: Urgency::High,
        summary: "Cardiovascular symptoms detected",
    },
    KeywordRule {
        keywords: &[
            "rash", "skin", "itch", "acne", "dermatitis", "dermatology", "eczema", "psoriasis",
            "melanoma",
        ],
        specialty: "Dermatology",
        urgency: Urgency::Low,
        summary: "Skin condition detected",
    },
    KeywordRule {
        keywords: &[
            "back pain",
            "joint",
            "bone",
            "fracture",
            "orthopedic",
            "orthopedics",
            "spine",
            "arthritis",
            "ligament",
        ],
        specialty: "Orthopedics",
        urgency: Urgency::Medium,
        summary: "Musculoskeletal issue detected",
    },
    KeywordRule {
        keywords: &[
            "headache",
            "migraine",
            "seizure",
            "neurological",
            "neurology",
            "memory",
            "stroke",
            "epilepsy",
            "brain",
        ],
        specialty: "Neurology",
        urgency: Urgency::High,
        summary: "Neurological symptoms detected",
    },
    KeywordRule {
        keywords: &[
            "stomach",
            "abdominal",
            "digestive",
            "bowel",
            "nausea",
            "gastro",
            "gastroenterology",
            "intestine",
            "diarrhea",
            "constipation",
        ],
        specialty: "Gastroenterology",
        urgency: Urgency::Medium,
        summary: "Digestive system issue detected",
    },
    KeywordRule {
        keywords: &[
            "diabetes",
            "thyroid",
            "hormone",
            "endocrine",
            "endocrinology",
            "insulin",
            "glucose",
            "metabolic",
        ],
        specialty: "Endocrinology",
        urgency: Urgency::Medium,
        summary: "Endocrine condition detected",
    },
    KeywordRule {
        keywords: &[
            "breathing",
            "cough",
            "lung",
            "asthma",
            "respiratory",
            "pulmonology",
            "bronchitis",
            "pneumonia",
            "copd",
        ],
        specialty: "Pulmonology",
        urgency: Urgency::High,
        summary: "Respiratory symptoms detected",
    },
    KeywordRule {
        keywords: &[
            "eye",
            "vision",
            "sight",
            "blurry",
            "ophthalmology",
            "ophthalmologist",
            "cataract",
            "glaucoma",
            "retina",
        ],
        specialty: "Ophthalmology",
        urgency: Urgency::Medium,
        summary: "Eye/vision issue detected",
    },
    KeywordRule {
        keywords: &[
            "anxiety",
            "depression",
            "mental",
            "psychiatric",
            "psychiatry",
            "stress",
            "bipolar",
            "schizophrenia",
            "therapy",
        ],
        specialty: "Psychiatry",
        urgency: Urgency::Medium,
        summary: "Mental health concern detected",
    },
    KeywordRule {
        keywords: &[
            "urinary",
            "bladder",
            "kidney",
            "urology",
            "urologist",
            "prostate",
            "uti",
            "incontinence",
        ],
        specialty: "Urology",
        urgency: Urgency::Medium,
        summary: "Urological issue detected",
    },
    KeywordRule {
        keywords: &[
            "pregnancy",
            "menstrual",
            "gynecology",
            "gynecologist",
            "ovarian",
            "uterus",
            "pelvic",
            "cervical",
            "obstetric",
        ],
        specialty: "Gynecology",
        urgency: Urgency::Medium,
        summary: "Gynecological concern detected",
    },
];

/// First rule matching `text`, if any.
pub fn first_match(text: &str) -> Option<&'static KeywordRule> {
    let lowercased = text.to_lowercase();
    RULES.iter().find(|rule| rule.matches(&lowercased))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_order_is_fixed() {
        let order: Vec<&str> = RULES.iter().map(|r| r.specialty).collect();
        assert_eq!(
            order,
            vec![
                "Dentistry",
                "Cardiology",
                "Dermatology",
                "Orthopedics",
                "Neurology",
                "Gastroenterology",
                "Endocrinology",
                "Pulmonology",
                "Ophthalmology",
                "Psychiatry",
                "Urology",
                "Gynecology",
            ]
        );
    }

    #[test]
    fn test_each_specialty_has_one_rule() {
        let unique: HashSet<&str> = RULES.iter().map(|r| r.specialty).collect();
        assert_eq!(unique.len(), RULES.len());
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for rule in RULES {
            for keyword in rule.keywords {
                assert_eq!(*keyword, keyword.to_lowercase(), "{}", rule.specialty);
            }
        }
    }

    #[test]
    fn test_first_match_is_case_insensitive() {
        let rule = first_match("Sudden CHEST PAIN at night").unwrap();
        assert_eq!(rule.specialty, "Cardiology");
    }

    #[test]
    fn test_no_match() {
        assert!(first_match("I feel tired all the time").is_none());
    }
}
