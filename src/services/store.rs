//! Persisted configuration store.
//!
//! The pipeline's tunables (palette, processing settings, display
//! tuning) survive restarts through an opaque key-value contract:
//! load-default-on-miss, overwrite-on-save. [`JsonFileStore`] keeps one
//! JSON document per key under a config directory and replaces files
//! atomically, so a crashed save never leaves a half-written document
//! behind.

use std::fs;
use std::path::{Path, PathBuf};

use epd_raster::{DisplayTuning, Palette, ProcessingSettings};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::AppError;

pub const KEY_PALETTE: &str = "palette";
pub const KEY_PROCESSING: &str = "processing";
pub const KEY_DISPLAY: &str = "display";

/// Opaque key-value persistence contract for configuration records.
pub trait ConfigStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, AppError>;
    fn save_raw(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Load a typed record, falling back to its default when the key is
    /// missing or the stored document no longer parses.
    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, AppError> {
        match self.load_raw(key)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(value),
                Err(e) => {
                    warn!(key, error = %e, "stored record unreadable, using defaults");
                    Ok(T::default())
                }
            },
            None => {
                info!(key, "no stored record, using defaults");
                Ok(T::default())
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let raw = serde_json::to_string_pretty(value)?;
        self.save_raw(key, &raw)
    }

    fn load_palette(&self) -> Result<Palette, AppError> {
        self.load(KEY_PALETTE)
    }

    fn save_palette(&self, palette: &Palette) -> Result<(), AppError> {
        self.save(KEY_PALETTE, palette)
    }

    fn load_settings(&self) -> Result<ProcessingSettings, AppError> {
        self.load(KEY_PROCESSING)
    }

    fn save_settings(&self, settings: &ProcessingSettings) -> Result<(), AppError> {
        self.save(KEY_PROCESSING, settings)
    }

    fn load_tuning(&self) -> Result<DisplayTuning, AppError> {
        self.load(KEY_DISPLAY)
    }

    fn save_tuning(&self, tuning: &DisplayTuning) -> Result<(), AppError> {
        self.save(KEY_DISPLAY, tuning)
    }
}

/// File-backed store: one `<key>.json` document per key.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn write_atomic(path: &Path, contents: &str) -> Result<(), AppError> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl ConfigStore for JsonFileStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Store(format!("{}: {e}", path.display()))),
        }
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir)?;
        Self::write_atomic(&self.path_for(key), value)?;
        info!(key, dir = %self.dir.display(), "configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epd_raster::Rgb;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_defaults_on_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let palette = store.load_palette().unwrap();
        assert_eq!(palette, Palette::default());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let mut palette = Palette::default();
        palette.red = Rgb::new(160, 40, 30);
        store.save_palette(&palette).unwrap();

        let loaded = store.load_palette().unwrap();
        assert_eq!(loaded, palette);
    }

    #[test]
    fn test_corrupt_record_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.save_raw(KEY_PROCESSING, "{not json").unwrap();

        let settings = store.load_settings().unwrap();
        assert_eq!(settings, ProcessingSettings::default());
    }

    #[test]
    fn test_save_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let mut tuning = DisplayTuning::default();
        store.save_tuning(&tuning).unwrap();
        tuning.contrast = 0.8;
        store.save_tuning(&tuning).unwrap();

        assert_eq!(store.load_tuning().unwrap().contrast, 0.8);
    }

    #[test]
    fn test_keys_are_separate_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.save_palette(&Palette::default()).unwrap();
        store
            .save_settings(&ProcessingSettings::default())
            .unwrap();

        assert!(dir.path().join("palette.json").exists());
        assert!(dir.path().join("processing.json").exists());
        assert!(!dir.path().join("display.json").exists());
    }

    #[test]
    fn test_float_settings_persist_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let settings = ProcessingSettings {
            midpoint: 0.437_219_4,
            ..Default::default()
        };
        store.save_settings(&settings).unwrap();
        let loaded = store.load_settings().unwrap();
        assert_eq!(loaded.midpoint.to_bits(), settings.midpoint.to_bits());
    }
}
