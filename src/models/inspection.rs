//! Inspection record data models.
//!
//! `InspectionRecord` is the only persisted entity. The checklist fields are
//! closed enums so an out-of-range value fails at deserialization instead of
//! being stored as free text.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! checklist_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }
    };
}

checklist_enum! {
    ExtinguisherType {
        Abc => "ABC",
        Co2 => "CO2",
        Foam => "Foam",
    }
}

checklist_enum! {
    SealCondition {
        Good => "Good",
        Broken => "Broken",
        Missing => "Missing",
    }
}

checklist_enum! {
    PressureReading {
        Normal => "OK",
        Low => "Low",
        High => "High",
    }
}

checklist_enum! {
    HosePipeCondition {
        Good => "Good",
        Damaged => "Damaged",
        Missing => "Missing",
    }
}

checklist_enum! {
    SafetyPinStatus {
        Present => "Present",
        Missing => "Missing",
    }
}

impl ExtinguisherType {
    /// Label shown on the form and in exported documents.
    pub fn display_name(&self) -> &'static str {
        match self {
            ExtinguisherType::Abc => "ABC Powder",
            ExtinguisherType::Co2 => "CO2",
            ExtinguisherType::Foam => "Foam",
        }
    }
}

impl SealCondition {
    pub fn is_satisfactory(&self) -> bool {
        *self == SealCondition::Good
    }
}

impl PressureReading {
    pub fn is_satisfactory(&self) -> bool {
        *self == PressureReading::Normal
    }
}

impl HosePipeCondition {
    pub fn is_satisfactory(&self) -> bool {
        *self == HosePipeCondition::Good
    }
}

impl SafetyPinStatus {
    pub fn is_satisfactory(&self) -> bool {
        *self == SafetyPinStatus::Present
    }
}

/// Everything the form collects; the save path adds identity, timestamp and
/// signature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InspectionDraft {
    pub extinguisher_type: ExtinguisherType,
    pub point_number: String,
    pub month: String,
    pub seal: SealCondition,
    pub pressure: PressureReading,
    pub hose_pipe: HosePipeCondition,
    pub safety_pin: SafetyPinStatus,
    #[serde(default)]
    pub overall_condition: String,
    pub supply_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub fire_marshal_name: String,
    pub staff_id: String,
    pub section: String,
}

/// One completed inspection. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InspectionRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub extinguisher_type: ExtinguisherType,
    pub point_number: String,
    pub month: String,
    pub seal: SealCondition,
    pub pressure: PressureReading,
    pub hose_pipe: HosePipeCondition,
    pub safety_pin: SafetyPinStatus,
    #[serde(default)]
    pub overall_condition: String,
    pub supply_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub fire_marshal_name: String,
    pub staff_id: String,
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_data: Option<String>,
}

impl InspectionRecord {
    /// Completes a draft with a fresh UUID and the given creation instant.
    pub fn from_draft(
        draft: InspectionDraft,
        signature_data: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            extinguisher_type: draft.extinguisher_type,
            point_number: draft.point_number,
            month: draft.month,
            seal: draft.seal,
            pressure: draft.pressure,
            hose_pipe: draft.hose_pipe,
            safety_pin: draft.safety_pin,
            overall_condition: draft.overall_condition,
            supply_date: draft.supply_date,
            expiry_date: draft.expiry_date,
            fire_marshal_name: draft.fire_marshal_name,
            staff_id: draft.staff_id,
            section: draft.section,
            signature_data,
        }
    }

    /// True when every physical check passed.
    pub fn all_checks_passed(&self) -> bool {
        self.seal.is_satisfactory()
            && self.pressure.is_satisfactory()
            && self.hose_pipe.is_satisfactory()
            && self.safety_pin.is_satisfactory()
    }
}
