//! Data model: sources, dates, publication numbers, records, families,
//! and the report shape.

pub mod dates;
pub mod family;
pub mod pubnum;
pub mod records;
pub mod report;
pub mod source;

pub use dates::PartialDate;
pub use family::{ConsolidatedFamily, FamilyStatistics, PatentCliffImpact};
pub use pubnum::{find_wo_number, PublicationNumber};
pub use records::{CanonicalPatentRecord, DocumentLink, RawPatentRecord, Sourced};
pub use report::{
    CliffOutlook, CliffSummary, CliffTimelineEntry, ExecutiveSummary, LegacyView, Metadata,
    PatentOverview, PatentSearchSection, SearchResult, SearchStatistics, SourceCoverage,
};
pub use source::Source;

/// FxHash-backed collections used on hot paths.
pub mod collections {
    pub use rustc_hash::{FxHashMap, FxHashSet};
}
