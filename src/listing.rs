//! Searchable record list with per-record export.

use crate::export::RecordExporter;
use crate::models::InspectionRecord;

const ENABLE_LOGS: bool = true;
use crate::{log_info, log_warn};

/// Records whose point number, marshal name or section contains `query`,
/// ignoring case, in their original order. An empty query keeps everything.
pub fn filter_records<'a>(
    records: &'a [InspectionRecord],
    query: &str,
) -> Vec<&'a InspectionRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| matches_query(record, &needle))
        .collect()
}

fn matches_query(record: &InspectionRecord, needle: &str) -> bool {
    [
        record.point_number.as_str(),
        record.fire_marshal_name.as_str(),
        record.section.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Live search state plus the export hand-off. The records themselves stay
/// with the caller.
pub struct ReportList<E: RecordExporter> {
    query: String,
    exporter: E,
}

impl<E: RecordExporter> ReportList<E> {
    pub fn new(exporter: E) -> Self {
        Self {
            query: String::new(),
            exporter,
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn visible<'a>(&self, records: &'a [InspectionRecord]) -> Vec<&'a InspectionRecord> {
        filter_records(records, &self.query)
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    /// Fire-and-forget: the outcome is logged, never returned or retried.
    pub fn request_export(&self, record: &InspectionRecord) {
        match self.exporter.export(record) {
            Ok(location) => log_info!(
                "Exported inspection {} to {}",
                record.point_number,
                location.display()
            ),
            Err(err) => log_warn!("Export of inspection {} failed: {err:#}", record.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ExtinguisherType, HosePipeCondition, InspectionDraft, PressureReading, SafetyPinStatus,
        SealCondition,
    };
    use anyhow::{bail, Result};
    use chrono::{NaiveDate, Utc};
    use std::{cell::RefCell, path::PathBuf};

    fn record(point: &str, marshal: &str, section: &str) -> InspectionRecord {
        let draft = InspectionDraft {
            extinguisher_type: ExtinguisherType::Foam,
            point_number: point.into(),
            month: "July".into(),
            seal: SealCondition::Good,
            pressure: PressureReading::Normal,
            hose_pipe: HosePipeCondition::Good,
            safety_pin: SafetyPinStatus::Present,
            overall_condition: "Floor mounted".into(),
            supply_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 7, 1).unwrap(),
            fire_marshal_name: marshal.into(),
            staff_id: "FLOOR-9".into(),
            section: section.into(),
        };
        InspectionRecord::from_draft(draft, None, Utc::now())
    }

    fn sample() -> Vec<InspectionRecord> {
        vec![
            record("FE-101", "John Doe", "Floor 2"),
            record("FE-202", "Amina Rahman", "Warehouse"),
            record("CO-7", "Karim", "Boiler Room"),
            record("FE-303", "Jane Floorman", "Dispatch"),
        ]
    }

    fn points(found: &[&InspectionRecord]) -> Vec<String> {
        found.iter().map(|r| r.point_number.clone()).collect()
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let records = sample();
        let found = filter_records(&records, "");
        assert_eq!(found.len(), records.len());
        assert!(found.iter().zip(&records).all(|(a, b)| *a == b));
    }

    #[test]
    fn matches_any_of_the_three_fields_case_insensitively() {
        let records = sample();
        assert_eq!(points(&filter_records(&records, "floor")), vec!["FE-101", "FE-303"]);
        assert_eq!(points(&filter_records(&records, "fe-")), vec!["FE-101", "FE-202", "FE-303"]);
        assert_eq!(points(&filter_records(&records, "KARIM")), vec!["CO-7"]);
        assert_eq!(points(&filter_records(&records, "Boiler R")), vec!["CO-7"]);
    }

    #[test]
    fn other_fields_are_not_searched() {
        let records = sample();
        // Staff ids and conditions mention "floor" but are not part of the search.
        assert_eq!(points(&filter_records(&records, "mounted")), Vec::<String>::new());
        assert_eq!(points(&filter_records(&records, "floor-9")), Vec::<String>::new());
    }

    #[test]
    fn query_is_not_trimmed() {
        let records = sample();
        assert!(filter_records(&records, " floor").len() == 1);
        assert!(filter_records(&records, "floor ").len() == 1);
        assert!(filter_records(&records, "  ").is_empty());
    }

    #[test]
    fn filter_is_exactly_the_substring_subset() {
        let records = sample();
        for query in ["", "f", "FE", "o", "an", "room", "zzz", "2", "Doe"] {
            let needle = query.to_lowercase();
            let expected: Vec<&InspectionRecord> = records
                .iter()
                .filter(|r| {
                    r.point_number.to_lowercase().contains(&needle)
                        || r.fire_marshal_name.to_lowercase().contains(&needle)
                        || r.section.to_lowercase().contains(&needle)
                })
                .collect();
            assert_eq!(filter_records(&records, query), expected, "query {query:?}");
        }
    }

    #[derive(Default)]
    struct RecordingExporter {
        exported: RefCell<Vec<String>>,
        fail: bool,
    }

    impl RecordExporter for RecordingExporter {
        fn export(&self, record: &InspectionRecord) -> Result<PathBuf> {
            self.exported.borrow_mut().push(record.id.clone());
            if self.fail {
                bail!("printer on fire");
            }
            Ok(PathBuf::from(format!("{}.html", record.id)))
        }
    }

    #[test]
    fn request_export_hands_over_one_record() {
        let records = sample();
        let mut list = ReportList::new(RecordingExporter::default());
        list.set_query("warehouse");
        let visible = list.visible(&records);
        assert_eq!(visible.len(), 1);

        list.request_export(visible[0]);
        assert_eq!(*list.exporter().exported.borrow(), vec![records[1].id.clone()]);
        assert_eq!(list.query, "warehouse");
    }

    #[test]
    fn failed_export_is_swallowed() {
        let records = sample();
        let list = ReportList::new(RecordingExporter {
            fail: true,
            ..Default::default()
        });
        list.request_export(&records[0]);
        list.request_export(&records[0]);
        // No retry: exactly one attempt per request.
        assert_eq!(list.exporter().exported.borrow().len(), 2);
    }
}
