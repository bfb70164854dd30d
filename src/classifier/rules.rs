//! Keyword rule tables.
//!
//! The built-in tables are static data materialized once into a [`RuleSet`].
//! Alternative rule sets can be loaded from YAML, but they must keep the
//! built-in type priority order.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::taxonomy::{ProjectSubtype, ProjectType};
use crate::error::ClassifyError;

type TypeTable = &'static [(ProjectType, &'static [&'static str])];
type SubtypeTable = &'static [(ProjectSubtype, &'static [&'static str])];

/// Type keywords in priority order.
const TYPE_KEYWORDS: TypeTable = &[
    (
        ProjectType::Digitalization,
        &[
            "전자화", "디지털화", "스캔", "색인", "DB", "데이터베이스", "디지털 아카이브",
            "메타데이터", "기록화", "전산화", "구축", "멀티미디어", "시청각", "영상",
        ],
    ),
    (
        ProjectType::RecordsMgmt,
        &[
            "기록물", "정리", "기술", "이관", "인수", "평가", "폐기", "실태점검", "정수점검",
            "공개재분류", "접근", "전수조사",
        ],
    ),
    (
        ProjectType::SpecialProject,
        &[
            "컨설팅", "연구", "용역", "전략", "계획", "ISP", "교육", "훈련", "수집", "구술",
            "기증", "전시", "채록", "면담", "인터뷰", "리모델링", "개선",
        ],
    ),
    (
        ProjectType::SystemMgmt,
        &[
            "시스템", "유지보수", "고도화", "기능개선", "보안", "백신", "인프라", "HW", "SW",
            "하드웨어", "소프트웨어", "라이선스", "업그레이드", "서버", "장비", "virus", "anti",
            "프로그램", "이전", "S/W",
        ],
    ),
    (
        ProjectType::Preservation,
        &[
            "보존", "환경", "온습도", "공기질", "해충", "방제", "방균", "소독", "서고",
            "보존용품", "복원", "복구", "향균", "항균", "조습", "살충", "모빌", "서가",
            "이동식", "체인", "이송", "수리",
        ],
    ),
];

const DIGITALIZATION_SUBTYPES: SubtypeTable = &[
    (
        ProjectSubtype::PaperDigitization,
        &["종이기록물", "일반문서", "도면", "카드", "대장"],
    ),
    (
        ProjectSubtype::SpecialDigitization,
        &["책자", "간행물", "행정박물"],
    ),
    (
        ProjectSubtype::AvDigitization,
        &["멀티미디어", "시청각", "영상", "사진", "필름", "오디오"],
    ),
    (
        ProjectSubtype::DigitalArchive,
        &["아카이브", "기록화", "콘텐츠", "컨텐츠"],
    ),
];

const RECORDS_MGMT_SUBTYPES: SubtypeTable = &[
    (
        ProjectSubtype::RecordsArrange,
        &["정리", "기술", "전수조사", "목록", "분류", "메타데이터"],
    ),
    (ProjectSubtype::RecordsTransfer, &["이관", "인수"]),
    (ProjectSubtype::RecordsAppraisal, &["평가", "폐기"]),
    (ProjectSubtype::RecordsInspection, &["실태점검", "정수점검"]),
    (ProjectSubtype::AccessControl, &["공개재분류", "접근"]),
];

const SPECIAL_PROJECT_SUBTYPES: SubtypeTable = &[
    (ProjectSubtype::Consulting, &["컨설팅", "연구", "용역"]),
    (ProjectSubtype::Planning, &["전략", "계획", "ISP", "ISMP"]),
    (ProjectSubtype::Education, &["교육", "훈련"]),
    (
        ProjectSubtype::RecordsCollection,
        &["수집", "구술", "기증", "채록", "면담", "인터뷰"],
    ),
    (
        ProjectSubtype::Exhibition,
        &["전시", "상설", "기획", "순회", "콘텐츠"],
    ),
    (
        ProjectSubtype::FacilityImprove,
        &["시설", "공사", "리모델링", "개선"],
    ),
];

// No bare "시스템" under INFRA_ESTABLISH: an undetailed system line must
// fall back to SYS_OPERATION.
const SYSTEM_MGMT_SUBTYPES: SubtypeTable = &[
    (
        ProjectSubtype::SysOperation,
        &["운영", "유지보수", "HW", "SW", "라이선스", "백업"],
    ),
    (
        ProjectSubtype::SysEnhancement,
        &["고도화", "기능개선", "업그레이드", "이전", "설치", "전환"],
    ),
    (
        ProjectSubtype::SecurityMgmt,
        &["보안", "백신", "문서보안", "virus", "anti"],
    ),
    (
        ProjectSubtype::InfraEstablish,
        &["인프라", "구축", "신규", "장비", "서버", "교체", "노후"],
    ),
];

const PRESERVATION_SUBTYPES: SubtypeTable = &[
    (
        ProjectSubtype::EnvironmentControl,
        &["환경", "온습도", "공기질", "조습"],
    ),
    (
        ProjectSubtype::PestPrevention,
        &["해충", "방제", "방균", "소독", "방역", "향균", "항균", "살충"],
    ),
    (
        ProjectSubtype::StorageMgmt,
        &["서고", "시설", "장비", "서가", "모빌", "이동식", "체인", "이송"],
    ),
    (
        ProjectSubtype::SuppliesMgmt,
        &["보존용품", "상자", "봉투", "용품"],
    ),
    (
        ProjectSubtype::RepairRestore,
        &["복원", "복구", "처리", "수리", "교체"],
    ),
];

const fn builtin_subtypes(project_type: ProjectType) -> SubtypeTable {
    match project_type {
        ProjectType::Digitalization => DIGITALIZATION_SUBTYPES,
        ProjectType::RecordsMgmt => RECORDS_MGMT_SUBTYPES,
        ProjectType::SpecialProject => SPECIAL_PROJECT_SUBTYPES,
        ProjectType::SystemMgmt => SYSTEM_MGMT_SUBTYPES,
        ProjectType::Preservation => PRESERVATION_SUBTYPES,
        ProjectType::NoProject | ProjectType::Unclassified => &[],
    }
}

/// Keywords for one subtype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtypeRule {
    /// Subtype assigned when this rule has the most hits.
    pub subtype: ProjectSubtype,
    /// Substrings counted against the normalized description.
    pub keywords: Vec<String>,
}

/// Keywords for one project type, plus the subtype rules scoped to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRule {
    /// Type assigned when any keyword matches.
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    /// Substrings tested against the normalized description.
    pub keywords: Vec<String>,
    /// Subtype rules in declaration order.
    #[serde(default)]
    pub subtypes: Vec<SubtypeRule>,
}

/// Ordered classification rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Type rules in priority order.
    pub types: Vec<TypeRule>,
}

impl RuleSet {
    /// Returns the built-in rules, constructed on first use.
    pub fn builtin() -> &'static Self {
        static BUILTIN: OnceLock<RuleSet> = OnceLock::new();
        BUILTIN.get_or_init(Self::from_tables)
    }

    fn from_tables() -> Self {
        let types = TYPE_KEYWORDS
            .iter()
            .map(|(project_type, keywords)| TypeRule {
                project_type: *project_type,
                keywords: lowercase_all(keywords.iter().copied()),
                subtypes: builtin_subtypes(*project_type)
                    .iter()
                    .map(|(subtype, keywords)| SubtypeRule {
                        subtype: *subtype,
                        keywords: lowercase_all(keywords.iter().copied()),
                    })
                    .collect(),
            })
            .collect();
        Self { types }
    }

    /// Parses and validates a rule set from YAML.
    ///
    /// Keywords are lower-cased so that matching against normalized text
    /// is case-insensitive.
    pub fn from_yaml(yaml: &str) -> Result<Self, ClassifyError> {
        let mut rules: Self = serde_yaml::from_str(yaml)?;
        for type_rule in &mut rules.types {
            type_rule.keywords = lowercase_all(type_rule.keywords.iter().map(String::as_str));
            for subtype_rule in &mut type_rule.subtypes {
                subtype_rule.keywords =
                    lowercase_all(subtype_rule.keywords.iter().map(String::as_str));
            }
        }
        rules.validate()?;
        Ok(rules)
    }

    /// Reads a rule set from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ClassifyError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ClassifyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rules = Self::from_yaml(&content)?;
        debug!(path = %path.display(), types = rules.types.len(), "Loaded rule set");
        Ok(rules)
    }

    /// Serializes the rule set to YAML.
    pub fn to_yaml(&self) -> Result<String, ClassifyError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks the structural invariants the classifier relies on.
    pub fn validate(&self) -> Result<(), ClassifyError> {
        let order: Vec<ProjectType> = self.types.iter().map(|t| t.project_type).collect();
        if order != ProjectType::PRIORITY {
            let expected: Vec<&str> = ProjectType::PRIORITY.iter().map(|t| t.key()).collect();
            let found: Vec<&str> = order.iter().map(|t| t.key()).collect();
            return Err(ClassifyError::InvalidRules(format!(
                "type order must be [{}], found [{}]",
                expected.join(", "),
                found.join(", ")
            )));
        }

        let mut seen = HashSet::new();
        for type_rule in &self.types {
            let key = type_rule.project_type.key();
            if type_rule.keywords.is_empty() {
                return Err(ClassifyError::InvalidRules(format!("{key} has no keywords")));
            }
            check_keywords(key, &type_rule.keywords)?;

            for subtype_rule in &type_rule.subtypes {
                let subtype_key = subtype_rule.subtype.key();
                if subtype_rule.subtype.parent() != type_rule.project_type {
                    return Err(ClassifyError::InvalidRules(format!(
                        "subtype {subtype_key} does not belong to {key}"
                    )));
                }
                if !seen.insert(subtype_rule.subtype) {
                    return Err(ClassifyError::InvalidRules(format!(
                        "subtype {subtype_key} is declared more than once"
                    )));
                }
                check_keywords(subtype_key, &subtype_rule.keywords)?;
            }
        }
        Ok(())
    }

    /// Rule for a given type, if the type is keyword-driven.
    pub fn type_rule(&self, project_type: ProjectType) -> Option<&TypeRule> {
        self.types.iter().find(|t| t.project_type == project_type)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn lowercase_all<'a>(keywords: impl Iterator<Item = &'a str>) -> Vec<String> {
    keywords.map(str::to_lowercase).collect()
}

// An empty keyword is a substring of every text and would swallow all input.
fn check_keywords(owner: &str, keywords: &[String]) -> Result<(), ClassifyError> {
    if keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ClassifyError::InvalidRules(format!(
            "{owner} contains an empty keyword"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rules_are_valid() {
        RuleSet::builtin().validate().unwrap();
    }

    #[test]
    fn builtin_keywords_are_lowercase() {
        let system = RuleSet::builtin()
            .type_rule(ProjectType::SystemMgmt)
            .unwrap();
        assert!(system.keywords.contains(&"s/w".to_string()));
        assert!(!system.keywords.iter().any(|k| k.contains("HW")));
    }

    #[test]
    fn builtin_covers_every_substantive_subtype() {
        let declared: HashSet<ProjectSubtype> = RuleSet::builtin()
            .types
            .iter()
            .flat_map(|t| t.subtypes.iter().map(|s| s.subtype))
            .collect();
        for subtype in ProjectSubtype::ALL {
            assert_eq!(
                declared.contains(&subtype),
                subtype.parent().is_substantive(),
                "{subtype:?}"
            );
        }
    }

    #[test]
    fn yaml_round_trip_preserves_rules() {
        let yaml = RuleSet::builtin().to_yaml().unwrap();
        let parsed = RuleSet::from_yaml(&yaml).unwrap();
        assert_eq!(&parsed, RuleSet::builtin());
    }

    #[test]
    fn from_yaml_lowercases_keywords() {
        let yaml = r"
types:
  - type: DIGITALIZATION
    keywords: [DB]
  - type: RECORDS_MGMT
    keywords: [이관]
  - type: SPECIAL_PROJECT
    keywords: [ISP]
  - type: SYSTEM_MGMT
    keywords: [시스템]
    subtypes:
      - subtype: SECURITY_MGMT
        keywords: [Virus]
  - type: PRESERVATION
    keywords: [보존]
";
        let rules = RuleSet::from_yaml(yaml).unwrap();
        assert_eq!(rules.types[0].keywords, vec!["db"]);
        assert_eq!(rules.types[3].subtypes[0].keywords, vec!["virus"]);
    }

    #[test]
    fn rejects_reordered_types() {
        let yaml = r"
types:
  - type: PRESERVATION
    keywords: [보존]
  - type: DIGITALIZATION
    keywords: [전자화]
  - type: RECORDS_MGMT
    keywords: [이관]
  - type: SPECIAL_PROJECT
    keywords: [연구]
  - type: SYSTEM_MGMT
    keywords: [시스템]
";
        let err = RuleSet::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("type order"), "{err}");
    }

    #[test]
    fn rejects_foreign_subtype() {
        let mut rules = RuleSet::builtin().clone();
        rules.types[0].subtypes.push(SubtypeRule {
            subtype: ProjectSubtype::StorageMgmt,
            keywords: vec!["서고".to_string()],
        });
        let err = rules.validate().unwrap_err();
        assert!(err.to_string().contains("does not belong"), "{err}");
    }

    #[test]
    fn rejects_empty_keyword() {
        let mut rules = RuleSet::builtin().clone();
        rules.types[1].keywords.push("  ".to_string());
        assert!(rules.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_subtype() {
        let mut rules = RuleSet::builtin().clone();
        let duplicate = rules.types[2].subtypes[0].clone();
        rules.types[2].subtypes.push(duplicate);
        let err = rules.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"), "{err}");
    }

    #[test]
    fn rejects_unknown_type_key() {
        let yaml = "types:\n  - type: MEETINGS\n    keywords: [회의]\n";
        assert!(matches!(
            RuleSet::from_yaml(yaml),
            Err(ClassifyError::RulesParse(_))
        ));
    }
}
