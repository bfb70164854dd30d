//! Keyword-priority classification of budget-line descriptions.
//!
//! A description is assigned a [`ProjectType`] by first match in priority
//! order, then a [`ProjectSubtype`] by highest keyword count within that
//! type. The function is total: every input yields a complete
//! [`Classification`].

use serde::Serialize;
use tracing::trace;

pub mod rules;
pub mod taxonomy;

pub use rules::{RuleSet, SubtypeRule, TypeRule};
pub use taxonomy::{ProjectSubtype, ProjectType};

/// Normalized descriptions meaning "this line has no project".
const NO_PROJECT_SENTINELS: [&str; 3] = ["", "사업없음", "미업로드"];

/// A (type, subtype) pair. The subtype always refines the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Classification {
    project_type: ProjectType,
    project_subtype: ProjectSubtype,
}

impl Classification {
    /// The "no project" result.
    pub const NO_PROJECT: Self = Self::fallback(ProjectType::NoProject);

    /// The "no rule matched" result.
    pub const UNCLASSIFIED: Self = Self::fallback(ProjectType::Unclassified);

    const fn fallback(project_type: ProjectType) -> Self {
        Self {
            project_type,
            project_subtype: project_type.default_subtype(),
        }
    }

    /// Assigned project type.
    pub const fn project_type(&self) -> ProjectType {
        self.project_type
    }

    /// Assigned project subtype.
    pub const fn project_subtype(&self) -> ProjectSubtype {
        self.project_subtype
    }

    /// Display label of the type.
    pub const fn type_label(&self) -> &'static str {
        self.project_type.label()
    }

    /// Display label of the subtype.
    pub const fn subtype_label(&self) -> &'static str {
        self.project_subtype.label()
    }
}

/// Classifies descriptions against a rule set.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'r> {
    rules: &'r RuleSet,
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::new(RuleSet::builtin())
    }
}

impl<'r> Classifier<'r> {
    /// Creates a classifier over the given rules.
    pub const fn new(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    /// Rules in use.
    pub const fn rules(&self) -> &'r RuleSet {
        self.rules
    }

    /// Classifies one description. `None` is treated like an empty string.
    pub fn classify(&self, text: Option<&str>) -> Classification {
        let normalized = normalize(text.unwrap_or_default());
        if is_no_project(&normalized) {
            return Classification::NO_PROJECT;
        }

        let Some(type_rule) = self
            .rules
            .types
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| normalized.contains(k.as_str())))
        else {
            trace!(text = %normalized, "No type keyword matched");
            return Classification::UNCLASSIFIED;
        };

        let project_type = type_rule.project_type;
        let mut best: Option<(ProjectSubtype, usize)> = None;
        for subtype_rule in &type_rule.subtypes {
            let hits = subtype_rule
                .keywords
                .iter()
                .filter(|k| normalized.contains(k.as_str()))
                .count();
            // Strictly greater: on a tie the earlier subtype stays.
            if hits > best.map_or(0, |(_, max)| max) {
                best = Some((subtype_rule.subtype, hits));
            }
        }

        let project_subtype =
            best.map_or_else(|| project_type.default_subtype(), |(subtype, _)| subtype);
        trace!(
            text = %normalized,
            project_type = project_type.key(),
            project_subtype = project_subtype.key(),
            "Classified"
        );
        Classification {
            project_type,
            project_subtype,
        }
    }

    /// Classifies a present description.
    pub fn classify_str(&self, text: &str) -> Classification {
        self.classify(Some(text))
    }
}

/// Classifies a description with the built-in rules.
pub fn classify(text: &str) -> Classification {
    Classifier::default().classify_str(text)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn is_no_project(normalized: &str) -> bool {
    NO_PROJECT_SENTINELS.contains(&normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(c: Classification) -> (&'static str, &'static str) {
        (c.project_type().key(), c.project_subtype().key())
    }

    #[test]
    fn sentinels_map_to_no_project() {
        for text in ["", "   ", "사업없음", " 사업없음 ", "미업로드", "\t미업로드\n"] {
            assert_eq!(classify(text), Classification::NO_PROJECT, "{text:?}");
        }
        assert_eq!(
            Classifier::default().classify(None),
            Classification::NO_PROJECT
        );
    }

    #[test]
    fn sentinel_must_match_whole_text() {
        // Contains the sentinel but is not equal to it.
        let c = classify("사업없음 (추경 예정)");
        assert_eq!(c, Classification::UNCLASSIFIED);
    }

    #[test]
    fn unmatched_text_is_unclassified() {
        assert_eq!(classify("회의비 지급"), Classification::UNCLASSIFIED);
        assert_eq!(classify("hello world"), Classification::UNCLASSIFIED);
    }

    #[test]
    fn earlier_type_wins_regardless_of_hit_count() {
        // One digitalization hit against several preservation hits.
        let c = classify("보존서고 온습도 보존 전자화");
        assert_eq!(c.project_type(), ProjectType::Digitalization);
        assert_eq!(c.project_subtype(), ProjectSubtype::PaperDigitization);
    }

    #[test]
    fn higher_subtype_count_wins() {
        // SYS_OPERATION: 유지보수. SYS_ENHANCEMENT: 고도화, 업그레이드.
        let c = classify("시스템 유지보수 고도화 업그레이드");
        assert_eq!(keys(c), ("SYSTEM_MGMT", "SYS_ENHANCEMENT"));
    }

    #[test]
    fn subtype_tie_keeps_first_declared() {
        // One hit each for SYS_OPERATION (운영) and SECURITY_MGMT (백신).
        let c = classify("백신 운영");
        assert_eq!(keys(c), ("SYSTEM_MGMT", "SYS_OPERATION"));
    }

    #[test]
    fn system_keyword_does_not_count_toward_infra() {
        // One hit each for SYS_OPERATION (운영) and INFRA_ESTABLISH (서버).
        let c = classify("시스템 운영 서버");
        assert_eq!(keys(c), ("SYSTEM_MGMT", "SYS_OPERATION"));
        assert_eq!(keys(classify("시스템 서버 교체")), ("SYSTEM_MGMT", "INFRA_ESTABLISH"));
    }

    #[test]
    fn bare_type_match_uses_default_subtype() {
        assert_eq!(keys(classify("시스템")), ("SYSTEM_MGMT", "SYS_OPERATION"));
        assert_eq!(keys(classify("스캔")), ("DIGITALIZATION", "PAPER_DIGITIZATION"));
        assert_eq!(keys(classify("이관")), ("RECORDS_MGMT", "RECORDS_TRANSFER"));
        assert_eq!(keys(classify("용역")), ("SPECIAL_PROJECT", "CONSULTING"));
        assert_eq!(keys(classify("보존")), ("PRESERVATION", "STORAGE_MGMT"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(keys(classify("Anti-Virus 갱신")), ("SYSTEM_MGMT", "SECURITY_MGMT"));
        assert_eq!(keys(classify("기록물 db 전환")).0, "DIGITALIZATION");
        assert_eq!(keys(classify("ISP/ISMP 수립")), ("SPECIAL_PROJECT", "PLANNING"));
    }

    #[test]
    fn typical_budget_lines() {
        assert_eq!(
            keys(classify("시청각기록물 디지털화 사업")),
            ("DIGITALIZATION", "AV_DIGITIZATION")
        );
        assert_eq!(
            keys(classify("서고 해충 방제 및 소독")),
            ("PRESERVATION", "PEST_PREVENTION")
        );
        assert_eq!(
            keys(classify("구술 채록 면담")),
            ("SPECIAL_PROJECT", "RECORDS_COLLECTION")
        );
        assert_eq!(
            keys(classify("기록물 평가 및 폐기")),
            ("RECORDS_MGMT", "RECORDS_APPRAISAL")
        );
    }

    #[test]
    fn labels_follow_keys() {
        let c = classify("시스템");
        assert_eq!(c.type_label(), "시스템 관리");
        assert_eq!(c.subtype_label(), "시스템 운영/유지보수");
        assert_eq!(Classification::NO_PROJECT.type_label(), "사업없음");
        assert_eq!(Classification::UNCLASSIFIED.subtype_label(), "미분류");
    }

    #[test]
    fn custom_rules_are_honoured() {
        let mut rules = RuleSet::builtin().clone();
        rules.types[4].keywords.push("회의".to_string());
        let classifier = Classifier::new(&rules);
        assert_eq!(
            keys(classifier.classify_str("회의비 지급")),
            ("PRESERVATION", "STORAGE_MGMT")
        );
    }

    mod prop {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn classify_is_total_and_closed(s in ".*") {
                let c = classify(&s);
                prop_assert_eq!(c.project_subtype().parent(), c.project_type());
                prop_assert!(ProjectType::ALL.contains(&c.project_type()));
            }

            #[test]
            fn classify_is_deterministic(s in ".*") {
                prop_assert_eq!(classify(&s), classify(&s));
            }

            #[test]
            fn surrounding_whitespace_is_ignored(s in "[가-힣a-zA-Z ]{0,20}") {
                let padded = format!("  {s}\t");
                prop_assert_eq!(classify(&padded), classify(&s));
            }

            #[test]
            fn keyword_free_text_is_unclassified(s in "[0-9]{1,12}") {
                prop_assert_eq!(classify(&s), Classification::UNCLASSIFIED);
            }
        }
    }
}
