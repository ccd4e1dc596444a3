//! One function per user action. Each returns `Result<_, String>` so the
//! shell can show the message as-is.

use chrono::Utc;

use crate::{
    form::InspectionForm,
    models::{InspectionDraft, InspectionRecord, User},
    signature::{PointerInput, StrokeState, SurfaceRect},
    AppState,
};

const ENABLE_LOGS: bool = true;
use crate::log_info;

fn require_user(state: &AppState) -> Result<&User, String> {
    state
        .user
        .as_ref()
        .ok_or_else(|| "Not logged in".to_string())
}

fn open_form(state: &mut AppState) -> Result<&mut InspectionForm, String> {
    require_user(state)?;
    state
        .form
        .as_mut()
        .ok_or_else(|| "No inspection in progress".to_string())
}

pub fn login(state: &mut AppState, username: String, password: String) -> Result<User, String> {
    let user = state
        .gate
        .login(state.store.as_ref(), &username, &password)
        .map_err(|e| e.to_string())?;
    state.user = Some(user.clone());
    Ok(user)
}

/// Ends the session and discards any half-filled form and search.
pub fn logout(state: &mut AppState) -> Result<(), String> {
    state
        .gate
        .logout(state.store.as_ref())
        .map_err(|e| e.to_string())?;
    state.user = None;
    state.form = None;
    state.reports.set_query(String::new());
    Ok(())
}

pub fn current_user(state: &AppState) -> Result<Option<User>, String> {
    Ok(state.user().cloned())
}

/// Opens a fresh form with a blank signature pad, replacing any open one.
pub fn start_inspection(state: &mut AppState) -> Result<InspectionDraft, String> {
    require_user(state)?;
    let form = InspectionForm::open(&state.settings.signature()).map_err(|e| e.to_string())?;
    let draft = form.default_draft();
    state.form = Some(form);
    Ok(draft)
}

pub fn signature_pointer_down(
    state: &mut AppState,
    input: PointerInput,
    rect: SurfaceRect,
) -> Result<StrokeState, String> {
    let pad = open_form(state)?.pad_mut();
    pad.pointer_down(&input, &rect);
    Ok(pad.state())
}

pub fn signature_pointer_move(
    state: &mut AppState,
    input: PointerInput,
    rect: SurfaceRect,
) -> Result<StrokeState, String> {
    let pad = open_form(state)?.pad_mut();
    pad.pointer_move(&input, &rect);
    Ok(pad.state())
}

pub fn signature_pointer_up(state: &mut AppState) -> Result<StrokeState, String> {
    let pad = open_form(state)?.pad_mut();
    pad.pointer_up();
    Ok(pad.state())
}

pub fn clear_signature(state: &mut AppState) -> Result<(), String> {
    open_form(state)?.pad_mut().clear();
    Ok(())
}

/// What would be stored as the signature if the form were submitted now.
pub fn preview_signature(state: &mut AppState) -> Result<Option<String>, String> {
    open_form(state)?
        .pad()
        .signature_data()
        .map_err(|e| e.to_string())
}

pub fn cancel_inspection(state: &mut AppState) -> Result<(), String> {
    require_user(state)?;
    state.form = None;
    Ok(())
}

/// Completes the open form, stores the record at the head of the
/// collection and closes the form.
pub fn submit_inspection(
    state: &mut AppState,
    draft: InspectionDraft,
) -> Result<InspectionRecord, String> {
    let record = open_form(state)?
        .complete(draft, Utc::now())
        .map_err(|e| e.to_string())?;

    state
        .records
        .prepend(state.store.as_ref(), record.clone())
        .map_err(|e| e.to_string())?;
    state.form = None;

    log_info!(
        "Inspection {} recorded for point {}",
        record.id,
        record.point_number
    );
    Ok(record)
}

pub fn list_inspections(state: &AppState) -> Result<Vec<InspectionRecord>, String> {
    require_user(state)?;
    Ok(state.records.records().to_vec())
}

/// Sets the live query and returns the matching records, newest first.
pub fn search_inspections(
    state: &mut AppState,
    query: String,
) -> Result<Vec<InspectionRecord>, String> {
    require_user(state)?;
    state.reports.set_query(query);
    Ok(state
        .reports
        .visible(state.records.records())
        .into_iter()
        .cloned()
        .collect())
}

/// Hands the record to the exporter without waiting on the outcome; only an
/// unknown id is reported back.
pub fn export_inspection(state: &AppState, record_id: String) -> Result<(), String> {
    require_user(state)?;
    let record = state
        .records
        .find(&record_id)
        .ok_or_else(|| format!("No inspection with id {record_id}"))?;
    state.reports.request_export(record);
    Ok(())
}

