use anyhow::{bail, Context, Result};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

const ENABLE_LOGS: bool = true;
use crate::log_warn;

const MIN_STROKE_WIDTH: f32 = 0.5;
const MAX_STROKE_WIDTH: f32 = 32.0;
const MAX_SURFACE_EDGE: u32 = 4096;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SignatureSettings {
    pub width: u32,
    pub height: u32,
    pub stroke_width: f32,
    pub ink_color: String,
}

impl Default for SignatureSettings {
    fn default() -> Self {
        Self {
            width: 600,
            height: 160,
            stroke_width: 2.0,
            ink_color: "#000000".into(),
        }
    }
}

impl SignatureSettings {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("Signature surface must have a non-zero size");
        }
        if self.width > MAX_SURFACE_EDGE || self.height > MAX_SURFACE_EDGE {
            bail!("Signature surface edges must not exceed {MAX_SURFACE_EDGE} pixels");
        }
        if !(MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH).contains(&self.stroke_width) {
            bail!(
                "Invalid stroke width. Must be between {} and {}",
                MIN_STROKE_WIDTH,
                MAX_STROKE_WIDTH
            );
        }
        parse_hex_color(&self.ink_color)?;
        Ok(())
    }

    pub fn ink(&self) -> Result<Rgba<u8>> {
        parse_hex_color(&self.ink_color)
    }
}

/// Key names used in the key-value store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageKeys {
    pub user: String,
    pub records: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            user: "pran_rfl_user".into(),
            records: "pran_rfl_records".into(),
        }
    }
}

/// The single operator account. Plain-text comparison, no hashing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CredentialSettings {
    pub username: String,
    pub password: String,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            username: "SAM-RPL3".into(),
            password: "Shamimrpl3".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub signature: SignatureSettings,
    pub storage_keys: StorageKeys,
    pub credentials: CredentialSettings,
    /// Relative paths resolve against the data directory.
    pub export_dir: Option<PathBuf>,
}

/// Settings read once from `settings.json`. A missing file means defaults;
/// an unparsable one is logged and replaced by defaults.
pub struct SettingsStore {
    data: AppSettings,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str::<AppSettings>(&contents) {
                Ok(parsed) => parsed,
                Err(err) => {
                    log_warn!(
                        "Ignoring unparsable settings at {}: {err}",
                        path.display()
                    );
                    AppSettings::default()
                }
            }
        } else {
            AppSettings::default()
        };

        if let Err(err) = data.signature.validate() {
            log_warn!("Signature settings invalid ({err}); signature surface will use defaults");
        }

        Ok(Self { data })
    }

    /// Returns the configured surface, or the defaults if the file held an
    /// unusable one.
    pub fn signature(&self) -> SignatureSettings {
        if self.data.signature.validate().is_ok() {
            self.data.signature.clone()
        } else {
            SignatureSettings::default()
        }
    }

    pub fn storage_keys(&self) -> StorageKeys {
        self.data.storage_keys.clone()
    }

    pub fn credentials(&self) -> CredentialSettings {
        self.data.credentials.clone()
    }

    pub fn export_dir(&self, data_dir: &Path) -> PathBuf {
        match &self.data.export_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => data_dir.join(dir),
            None => data_dir.join("exports"),
        }
    }
}

/// Parses `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_hex_color(color: &str) -> Result<Rgba<u8>> {
    let Some(hex_part) = color.strip_prefix('#') else {
        bail!("Invalid color format. Must be hex (#RRGGBB)");
    };

    if hex_part.len() != 6 && hex_part.len() != 8 {
        bail!("Invalid color format. Must be hex (#RRGGBB or #RRGGBBAA)");
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("Invalid color format. Must be hex (#RRGGBB)");
    }

    let channel = |index: usize| -> Result<u8> {
        u8::from_str_radix(&hex_part[index * 2..index * 2 + 2], 16)
            .with_context(|| format!("invalid color channel in {color}"))
    };

    let alpha = if hex_part.len() == 8 { channel(3)? } else { 255 };
    Ok(Rgba([channel(0)?, channel(1)?, channel(2)?, alpha]))
}
