pub mod inspection;
pub mod user;

pub use inspection::{
    ExtinguisherType, HosePipeCondition, InspectionDraft, InspectionRecord, PressureReading,
    SafetyPinStatus, SealCondition,
};
pub use user::User;
