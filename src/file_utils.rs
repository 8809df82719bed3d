use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Extensions of YAML locale files
const YAML_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Suffix appended to backup copies
const BACKUP_SUFFIX: &str = "bak";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @checks: YAML extension
    pub fn is_yaml_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy();
                YAML_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false)
    }

    /// Find YAML files below a directory, sorted by path
    pub fn find_yaml_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::is_yaml_file(path) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    // @generates: Target path for a translated locale file
    // @params: source_file, source_locale, target_locale
    // @returns: None when the path carries no source locale marker
    //
    // The file name is checked first (`en.yml`, `app.en.yml`), then the
    // closest directory named after the locale (`en/app.yml`).
    pub fn generate_output_path<P: AsRef<Path>>(
        source_file: P,
        source_locale: &str,
        target_locale: &str,
    ) -> Option<PathBuf> {
        let source_file = source_file.as_ref();
        if !Self::is_yaml_file(source_file) {
            return None;
        }

        let file_name = source_file.file_name()?.to_string_lossy().to_string();
        if let Some(renamed) = rename_locale_file(&file_name, source_locale, target_locale) {
            return Some(source_file.with_file_name(renamed));
        }

        let components: Vec<Component> = source_file.components().collect();
        let parent_count = components.len().saturating_sub(1);
        let locale_dir = components[..parent_count]
            .iter()
            .rposition(|c| matches!(c, Component::Normal(name) if name.to_str() == Some(source_locale)))?;

        let mut target = PathBuf::new();
        for (index, component) in components.iter().enumerate() {
            if index == locale_dir {
                target.push(OsString::from(target_locale));
            } else {
                target.push(component.as_os_str());
            }
        }
        Some(target)
    }

    // @checks: Path carries a source locale marker
    pub fn is_source_locale_file<P: AsRef<Path>>(path: P, source_locale: &str) -> bool {
        // The target locale is irrelevant for the check
        Self::generate_output_path(path, source_locale, source_locale).is_some()
    }

    // @checks: Target exists and was modified no earlier than the source
    pub fn is_up_to_date<P1: AsRef<Path>, P2: AsRef<Path>>(source: P1, target: P2) -> bool {
        let modified = |path: &Path| fs::metadata(path).and_then(|m| m.modified()).ok();

        match (modified(source.as_ref()), modified(target.as_ref())) {
            (Some(source_time), Some(target_time)) => target_time >= source_time,
            _ => false,
        }
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Remove a file if it exists
    pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> Result<bool> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(path).with_context(|| format!("Failed to remove file: {:?}", path))?;
        Ok(true)
    }

    /// Path of the backup copy for a file
    pub fn backup_path<P: AsRef<Path>>(path: P) -> PathBuf {
        let mut name = path.as_ref().as_os_str().to_os_string();
        name.push(".");
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Copy a file to `<file>.bak`, replacing an older backup
    pub fn backup_file<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        let backup = Self::backup_path(path);
        fs::copy(path, &backup)
            .with_context(|| format!("Failed to back up {:?} to {:?}", path, backup))?;
        Ok(backup)
    }
}

/// `en.yml` -> `fr.yml`, `app.en.yaml` -> `app.fr.yaml`
fn rename_locale_file(file_name: &str, source_locale: &str, target_locale: &str) -> Option<String> {
    let (rest, extension) = file_name.rsplit_once('.')?;

    if rest == source_locale {
        return Some(format!("{}.{}", target_locale, extension));
    }

    let (stem, locale) = rest.rsplit_once('.')?;
    if locale == source_locale && !stem.is_empty() {
        return Some(format!("{}.{}.{}", stem, target_locale, extension));
    }

    None
}
