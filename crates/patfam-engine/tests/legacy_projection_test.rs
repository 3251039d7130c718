//! The legacy flat view must stay a faithful projection of the
//! consolidated families.

use serde_json::json;

use patfam_core::config::EngineConfig;
use patfam_core::types::{RawPatentRecord, Source};
use patfam_engine::consolidate_records;

fn fixture() -> Vec<RawPatentRecord> {
    vec![
        RawPatentRecord::from_value(
            Source::Epo,
            json!({"publication_number": "WO2015183882", "priority_date": "2015-05-27"}),
        ),
        RawPatentRecord::from_value(
            Source::Epo,
            json!({"publication_number": "WO2020111222"}),
        ),
        RawPatentRecord::from_value(
            Source::Inpi,
            json!({"patent_number": "BR112017012345", "wo_number": "WO2015183882"}),
        ),
        RawPatentRecord::from_value(
            Source::Epo,
            json!({"publication_number": "US9876543", "wo_related": "WO2015183882"}),
        ),
        RawPatentRecord::from_value(
            Source::Inpi,
            json!({"patent_number": "BR102013001111"}),
        ),
    ]
}

#[test]
fn legacy_view_reproduces_the_consolidated_sets() {
    let config = EngineConfig::default();
    let result = consolidate_records(&fixture(), &config, "darolutamide", true).unwrap();
    let legacy = result.legacy.as_ref().unwrap();

    // Real WO numbers only, ascending.
    assert_eq!(
        legacy.wo_patents,
        vec!["WO2015183882".to_string(), "WO2020111222".to_string()]
    );

    // Same (jurisdiction, number) set as the consolidated view.
    let mut from_legacy: Vec<(String, String)> = legacy
        .patents_by_country
        .iter()
        .flat_map(|(jurisdiction, records)| {
            records
                .iter()
                .map(move |r| (jurisdiction.clone(), r.canonical_number().to_string()))
        })
        .collect();
    from_legacy.sort();

    let mut from_consolidated: Vec<(String, String)> = result
        .patent_search
        .consolidated_patents
        .iter()
        .flat_map(|family| {
            family.national_patents.iter().flat_map(|(jur, records)| {
                records
                    .iter()
                    .map(move |r| (jur.clone(), r.canonical_number().to_string()))
            })
        })
        .collect();
    from_consolidated.sort();

    assert_eq!(from_legacy, from_consolidated);
    assert_eq!(from_legacy.len(), 3);
}

#[test]
fn legacy_flag_off_omits_the_view() {
    let config = EngineConfig::default();
    let result = consolidate_records(&fixture(), &config, "darolutamide", false).unwrap();
    assert!(result.legacy.is_none());
}
