//! Project type and subtype vocabularies.
//!
//! Every category has a canonical key (used in rule files and JSON output)
//! and a localized label (used in CSV output and reports). The two are joined
//! by the match tables below and nowhere else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Top-level category describing the nature of a budget line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectType {
    /// Digitization and database construction.
    Digitalization,
    /// Arrangement, transfer, appraisal and inspection of records.
    RecordsMgmt,
    /// Consulting, planning, education, collection and exhibitions.
    SpecialProject,
    /// Records system operation, enhancement and infrastructure.
    SystemMgmt,
    /// Storage environment, pest control and restoration.
    Preservation,
    /// The budget line has no associated project.
    NoProject,
    /// No rule matched the description.
    Unclassified,
}

impl ProjectType {
    /// All types, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Digitalization,
        Self::RecordsMgmt,
        Self::SpecialProject,
        Self::SystemMgmt,
        Self::Preservation,
        Self::NoProject,
        Self::Unclassified,
    ];

    /// Keyword matching priority. Changing this order changes classification
    /// outcomes for every text that hits more than one type.
    pub const PRIORITY: [Self; 5] = [
        Self::Digitalization,
        Self::RecordsMgmt,
        Self::SpecialProject,
        Self::SystemMgmt,
        Self::Preservation,
    ];

    /// Canonical key, e.g. `SYSTEM_MGMT`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Digitalization => "DIGITALIZATION",
            Self::RecordsMgmt => "RECORDS_MGMT",
            Self::SpecialProject => "SPECIAL_PROJECT",
            Self::SystemMgmt => "SYSTEM_MGMT",
            Self::Preservation => "PRESERVATION",
            Self::NoProject => "NO_PROJECT",
            Self::Unclassified => "UNCLASSIFIED",
        }
    }

    /// Localized display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Digitalization => "전자화 사업",
            Self::RecordsMgmt => "기록물관리",
            Self::SpecialProject => "특수사업",
            Self::SystemMgmt => "시스템 관리",
            Self::Preservation => "보존관리",
            Self::NoProject => "사업없음",
            Self::Unclassified => "미분류",
        }
    }

    /// Whether this type is reached through keyword rules rather than a fallback.
    pub const fn is_substantive(self) -> bool {
        !matches!(self, Self::NoProject | Self::Unclassified)
    }

    /// Subtype assigned when none of this type's subtype keywords match.
    pub const fn default_subtype(self) -> ProjectSubtype {
        match self {
            Self::Digitalization => ProjectSubtype::PaperDigitization,
            Self::RecordsMgmt => ProjectSubtype::RecordsArrange,
            Self::SpecialProject => ProjectSubtype::Consulting,
            Self::SystemMgmt => ProjectSubtype::SysOperation,
            Self::Preservation => ProjectSubtype::StorageMgmt,
            Self::NoProject => ProjectSubtype::NoProject,
            Self::Unclassified => ProjectSubtype::Unclassified,
        }
    }

    /// Subtypes owned by this type, in declaration order.
    pub fn subtypes(self) -> impl Iterator<Item = ProjectSubtype> {
        ProjectSubtype::ALL
            .into_iter()
            .filter(move |subtype| subtype.parent() == self)
    }

    /// Resolves a canonical key or a display label.
    pub fn from_key_or_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.key().eq_ignore_ascii_case(value) || t.label() == value)
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key_or_label(s).ok_or_else(|| format!("unknown project type: {s}"))
    }
}

/// Refinement of a [`ProjectType`] into a more specific activity.
///
/// Variant names mirror the canonical keys; see [`ProjectSubtype::label`].
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectSubtype {
    // Digitalization
    PaperDigitization,
    SpecialDigitization,
    AvDigitization,
    DigitalArchive,
    // Records management
    RecordsArrange,
    RecordsTransfer,
    RecordsAppraisal,
    RecordsInspection,
    AccessControl,
    // Special projects
    Consulting,
    Planning,
    Education,
    RecordsCollection,
    Exhibition,
    FacilityImprove,
    // System management
    SysOperation,
    SysEnhancement,
    SecurityMgmt,
    InfraEstablish,
    // Preservation
    EnvironmentControl,
    PestPrevention,
    StorageMgmt,
    SuppliesMgmt,
    RepairRestore,
    // Pseudo-subtypes
    NoProject,
    Unclassified,
}

impl ProjectSubtype {
    /// All subtypes, grouped by parent in priority order.
    pub const ALL: [Self; 26] = [
        Self::PaperDigitization,
        Self::SpecialDigitization,
        Self::AvDigitization,
        Self::DigitalArchive,
        Self::RecordsArrange,
        Self::RecordsTransfer,
        Self::RecordsAppraisal,
        Self::RecordsInspection,
        Self::AccessControl,
        Self::Consulting,
        Self::Planning,
        Self::Education,
        Self::RecordsCollection,
        Self::Exhibition,
        Self::FacilityImprove,
        Self::SysOperation,
        Self::SysEnhancement,
        Self::SecurityMgmt,
        Self::InfraEstablish,
        Self::EnvironmentControl,
        Self::PestPrevention,
        Self::StorageMgmt,
        Self::SuppliesMgmt,
        Self::RepairRestore,
        Self::NoProject,
        Self::Unclassified,
    ];

    /// The type this subtype refines.
    pub const fn parent(self) -> ProjectType {
        match self {
            Self::PaperDigitization
            | Self::SpecialDigitization
            | Self::AvDigitization
            | Self::DigitalArchive => ProjectType::Digitalization,
            Self::RecordsArrange
            | Self::RecordsTransfer
            | Self::RecordsAppraisal
            | Self::RecordsInspection
            | Self::AccessControl => ProjectType::RecordsMgmt,
            Self::Consulting
            | Self::Planning
            | Self::Education
            | Self::RecordsCollection
            | Self::Exhibition
            | Self::FacilityImprove => ProjectType::SpecialProject,
            Self::SysOperation
            | Self::SysEnhancement
            | Self::SecurityMgmt
            | Self::InfraEstablish => ProjectType::SystemMgmt,
            Self::EnvironmentControl
            | Self::PestPrevention
            | Self::StorageMgmt
            | Self::SuppliesMgmt
            | Self::RepairRestore => ProjectType::Preservation,
            Self::NoProject => ProjectType::NoProject,
            Self::Unclassified => ProjectType::Unclassified,
        }
    }

    /// Canonical key, e.g. `SYS_OPERATION`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::PaperDigitization => "PAPER_DIGITIZATION",
            Self::SpecialDigitization => "SPECIAL_DIGITIZATION",
            Self::AvDigitization => "AV_DIGITIZATION",
            Self::DigitalArchive => "DIGITAL_ARCHIVE",
            Self::RecordsArrange => "RECORDS_ARRANGE",
            Self::RecordsTransfer => "RECORDS_TRANSFER",
            Self::RecordsAppraisal => "RECORDS_APPRAISAL",
            Self::RecordsInspection => "RECORDS_INSPECTION",
            Self::AccessControl => "ACCESS_CONTROL",
            Self::Consulting => "CONSULTING",
            Self::Planning => "PLANNING",
            Self::Education => "EDUCATION",
            Self::RecordsCollection => "RECORDS_COLLECTION",
            Self::Exhibition => "EXHIBITION",
            Self::FacilityImprove => "FACILITY_IMPROVE",
            Self::SysOperation => "SYS_OPERATION",
            Self::SysEnhancement => "SYS_ENHANCEMENT",
            Self::SecurityMgmt => "SECURITY_MGMT",
            Self::InfraEstablish => "INFRA_ESTABLISH",
            Self::EnvironmentControl => "ENVIRONMENT_CONTROL",
            Self::PestPrevention => "PEST_PREVENTION",
            Self::StorageMgmt => "STORAGE_MGMT",
            Self::SuppliesMgmt => "SUPPLIES_MGMT",
            Self::RepairRestore => "REPAIR_RESTORE",
            Self::NoProject => "NO_PROJECT",
            Self::Unclassified => "UNCLASSIFIED",
        }
    }

    /// Localized display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::PaperDigitization => "종이기록물 전자화",
            Self::SpecialDigitization => "특수유형기록물 전자화",
            Self::AvDigitization => "시청각기록물 디지털화",
            Self::DigitalArchive => "디지털 아카이브 구축",
            Self::RecordsArrange => "기록물 정리/기술",
            Self::RecordsTransfer => "이관/인수",
            Self::RecordsAppraisal => "평가/폐기",
            Self::RecordsInspection => "실태점검/정수점검",
            Self::AccessControl => "공개재분류/접근관리",
            Self::Consulting => "컨설팅/연구용역",
            Self::Planning => "전략/계획수립",
            Self::Education => "교육/훈련",
            Self::RecordsCollection => "기록물 수집",
            Self::Exhibition => "전시사업",
            Self::FacilityImprove => "시설개선",
            Self::SysOperation => "시스템 운영/유지보수",
            Self::SysEnhancement => "시스템 고도화/개선",
            Self::SecurityMgmt => "보안관리",
            Self::InfraEstablish => "인프라 구축",
            Self::EnvironmentControl => "보존환경 관리",
            Self::PestPrevention => "해충방제/방균관리",
            Self::StorageMgmt => "서고관리",
            Self::SuppliesMgmt => "보존용품관리",
            Self::RepairRestore => "복원/복구처리",
            Self::NoProject => "사업없음",
            Self::Unclassified => "미분류",
        }
    }
}

impl fmt::Display for ProjectSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn default_subtype_belongs_to_its_type() {
        for project_type in ProjectType::ALL {
            assert_eq!(project_type.default_subtype().parent(), project_type);
        }
    }

    #[test]
    fn substantive_types_own_three_to_six_subtypes() {
        for project_type in ProjectType::PRIORITY {
            let count = project_type.subtypes().count();
            assert!((3..=6).contains(&count), "{project_type:?} has {count}");
        }
        assert_eq!(ProjectType::NoProject.subtypes().count(), 1);
        assert_eq!(ProjectType::Unclassified.subtypes().count(), 1);
    }

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<_> = ProjectSubtype::ALL.iter().map(|s| s.key()).collect();
        assert_eq!(keys.len(), ProjectSubtype::ALL.len());
    }

    #[test]
    fn serde_uses_canonical_keys() {
        let json = serde_json::to_string(&ProjectSubtype::SysEnhancement).unwrap();
        assert_eq!(json, "\"SYS_ENHANCEMENT\"");
        let parsed: ProjectType = serde_json::from_str("\"RECORDS_MGMT\"").unwrap();
        assert_eq!(parsed, ProjectType::RecordsMgmt);
        for project_type in ProjectType::ALL {
            let json = serde_json::to_string(&project_type).unwrap();
            assert_eq!(json, format!("\"{}\"", project_type.key()));
        }
    }

    #[test]
    fn from_key_or_label_accepts_both() {
        assert_eq!(
            "system_mgmt".parse::<ProjectType>(),
            Ok(ProjectType::SystemMgmt)
        );
        assert_eq!("보존관리".parse::<ProjectType>(), Ok(ProjectType::Preservation));
        assert!("회의".parse::<ProjectType>().is_err());
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(ProjectType::Digitalization.to_string(), "전자화 사업");
        assert_eq!(ProjectSubtype::StorageMgmt.to_string(), "서고관리");
    }
}
