//! Newline-delimited JSON bridge between a UI shell and the command layer.
//!
//! Each input line is `{"command": "<name>", "args": {...}}`; each reply is a
//! single line `{"ok": true, "data": ...}` or `{"ok": false, "error": "..."}`.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    commands,
    models::InspectionDraft,
    signature::{PointerInput, SurfaceRect},
    AppState,
};

const ENABLE_LOGS: bool = true;
use crate::{log_debug, log_warn};

#[derive(Debug, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum Invocation {
    Login {
        username: String,
        password: String,
    },
    Logout,
    CurrentUser,
    StartInspection,
    SignaturePointerDown {
        input: PointerInput,
        rect: SurfaceRect,
    },
    SignaturePointerMove {
        input: PointerInput,
        rect: SurfaceRect,
    },
    SignaturePointerUp,
    ClearSignature,
    PreviewSignature,
    CancelInspection,
    SubmitInspection {
        draft: InspectionDraft,
    },
    ListInspections,
    SearchInspections {
        query: String,
    },
    ExportInspection {
        #[serde(rename = "recordId")]
        record_id: String,
    },
}

impl Invocation {
    /// Command name for logs; arguments may hold credentials.
    pub fn name(&self) -> &'static str {
        match self {
            Invocation::Login { .. } => "login",
            Invocation::Logout => "logout",
            Invocation::CurrentUser => "current_user",
            Invocation::StartInspection => "start_inspection",
            Invocation::SignaturePointerDown { .. } => "signature_pointer_down",
            Invocation::SignaturePointerMove { .. } => "signature_pointer_move",
            Invocation::SignaturePointerUp => "signature_pointer_up",
            Invocation::ClearSignature => "clear_signature",
            Invocation::PreviewSignature => "preview_signature",
            Invocation::CancelInspection => "cancel_inspection",
            Invocation::SubmitInspection { .. } => "submit_inspection",
            Invocation::ListInspections => "list_inspections",
            Invocation::SearchInspections { .. } => "search_inspections",
            Invocation::ExportInspection { .. } => "export_inspection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    fn success<T: Serialize>(data: T) -> Self {
        match serde_json::to_value(data) {
            Ok(Value::Null) => Self {
                ok: true,
                data: None,
                error: None,
            },
            Ok(value) => Self {
                ok: true,
                data: Some(value),
                error: None,
            },
            Err(err) => Self::failure(format!("failed to encode reply: {err}")),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
        }
    }

    fn from_result<T: Serialize>(result: Result<T, String>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(message) => Self::failure(message),
        }
    }
}

pub fn dispatch(state: &mut AppState, invocation: Invocation) -> Reply {
    match invocation {
        Invocation::Login { username, password } => {
            Reply::from_result(commands::login(state, username, password))
        }
        Invocation::Logout => Reply::from_result(commands::logout(state)),
        Invocation::CurrentUser => Reply::from_result(commands::current_user(state)),
        Invocation::StartInspection => Reply::from_result(commands::start_inspection(state)),
        Invocation::SignaturePointerDown { input, rect } => {
            Reply::from_result(commands::signature_pointer_down(state, input, rect))
        }
        Invocation::SignaturePointerMove { input, rect } => {
            Reply::from_result(commands::signature_pointer_move(state, input, rect))
        }
        Invocation::SignaturePointerUp => {
            Reply::from_result(commands::signature_pointer_up(state))
        }
        Invocation::ClearSignature => Reply::from_result(commands::clear_signature(state)),
        Invocation::PreviewSignature => Reply::from_result(commands::preview_signature(state)),
        Invocation::CancelInspection => Reply::from_result(commands::cancel_inspection(state)),
        Invocation::SubmitInspection { draft } => {
            Reply::from_result(commands::submit_inspection(state, draft))
        }
        Invocation::ListInspections => Reply::from_result(commands::list_inspections(state)),
        Invocation::SearchInspections { query } => {
            Reply::from_result(commands::search_inspections(state, query))
        }
        Invocation::ExportInspection { record_id } => {
            Reply::from_result(commands::export_inspection(state, record_id))
        }
    }
}

pub fn handle_line(state: &mut AppState, line: &str) -> Reply {
    match serde_json::from_str::<Invocation>(line) {
        Ok(invocation) => {
            log_debug!("invoke {}", invocation.name());
            dispatch(state, invocation)
        }
        Err(err) => {
            log_warn!("Rejected malformed invocation: {err}");
            Reply::failure(format!("invalid invocation: {err}"))
        }
    }
}

/// Serves invocations until `reader` is exhausted.
pub fn serve<R: BufRead, W: Write>(state: &mut AppState, reader: R, mut writer: W) -> Result<()> {
    for line in reader.lines() {
        let line = line.context("failed to read invocation")?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = handle_line(state, &line);
        let encoded = serde_json::to_string(&reply).context("failed to encode reply")?;
        writeln!(writer, "{encoded}").context("failed to write reply")?;
        writer.flush().context("failed to flush reply")?;
    }
    Ok(())
}
