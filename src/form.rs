//! The inspection form boundary: defaults, required-field checks and the
//! hand-off from a filled form to a finished record.

use anyhow::{bail, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::models::{
    ExtinguisherType, HosePipeCondition, InspectionDraft, InspectionRecord, PressureReading,
    SafetyPinStatus, SealCondition,
};
use crate::settings::SignatureSettings;
use crate::signature::SignaturePad;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// Same day next year; 29 February rolls over to 1 March.
fn one_year_after(date: NaiveDate) -> NaiveDate {
    let year = date.year() + 1;
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(date)
}

impl InspectionDraft {
    /// A blank form as first shown: all checks passing, supplied today,
    /// expiring a year from today.
    pub fn with_defaults(today: NaiveDate) -> Self {
        Self {
            extinguisher_type: ExtinguisherType::Abc,
            point_number: String::new(),
            month: month_name(today).to_string(),
            seal: SealCondition::Good,
            pressure: PressureReading::Normal,
            hose_pipe: HosePipeCondition::Good,
            safety_pin: SafetyPinStatus::Present,
            overall_condition: String::new(),
            supply_date: today,
            expiry_date: one_year_after(today),
            fire_marshal_name: String::new(),
            staff_id: String::new(),
            section: String::new(),
        }
    }

    /// Required text fields must be non-empty and the month must be a
    /// calendar month name.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("Point Number", &self.point_number),
            ("Fire Marshal Name", &self.fire_marshal_name),
            ("Staff ID", &self.staff_id),
            ("Section", &self.section),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(label, _)| label)
        .collect();

        if !missing.is_empty() {
            bail!("Please fill in: {}", missing.join(", "));
        }

        if !MONTH_NAMES.contains(&self.month.as_str()) {
            bail!("Unknown month '{}'", self.month);
        }

        Ok(())
    }
}

/// One open form: its signature pad lives exactly as long as the form.
pub struct InspectionForm {
    pad: SignaturePad,
    opened_at: DateTime<Utc>,
}

impl InspectionForm {
    pub fn open(settings: &SignatureSettings) -> Result<Self> {
        Ok(Self {
            pad: SignaturePad::new(settings)?,
            opened_at: Utc::now(),
        })
    }

    pub fn default_draft(&self) -> InspectionDraft {
        InspectionDraft::with_defaults(self.opened_at.date_naive())
    }

    pub fn pad(&self) -> &SignaturePad {
        &self.pad
    }

    pub fn pad_mut(&mut self) -> &mut SignaturePad {
        &mut self.pad
    }

    /// Validates `draft` and stamps it with an id, `timestamp` and the drawn
    /// signature. The form stays open; the caller drops it once the record
    /// is safely stored.
    pub fn complete(
        &self,
        draft: InspectionDraft,
        timestamp: DateTime<Utc>,
    ) -> Result<InspectionRecord> {
        draft.validate()?;
        let signature = self.pad.signature_data()?;
        Ok(InspectionRecord::from_draft(draft, signature, timestamp))
    }
}
