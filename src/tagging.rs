//! File discovery and key tagging
//!
//! Finds WAV files under a directory and renames each one to carry its
//! detected key: `loop.wav` becomes `loop_Em.wav`. Files whose stem already
//! contains the key label anywhere are left alone, so tagging the same file
//! twice is a no-op.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

/// Extension (any letter case) of files picked up by [`find_audio_files`]
pub const AUDIO_EXTENSION: &str = "wav";

/// What happened to a file's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum RenameOutcome {
    /// File renamed to the contained path
    Renamed(PathBuf),
    /// Dry run: file would be renamed to the contained path
    WouldRename(PathBuf),
    /// Stem already carries the key
    AlreadyTagged,
}

/// Per-file result of [`tag_file`]
#[derive(Debug, Clone, Serialize)]
pub struct TagReport {
    /// Original path
    pub path: PathBuf,
    /// Key label ("C", "C#m", ...)
    pub key: String,
    /// Pearson correlation of the winning key template
    pub confidence: f32,
    /// Margin between the best and second-best key
    pub clarity: f32,
    /// Rename result
    pub outcome: RenameOutcome,
}

/// Recursively collect WAV files under `root`, sorted by path
///
/// A `root` that is itself a WAV file yields just that file. Subdirectories
/// or entries that cannot be read are logged and skipped.
///
/// # Errors
///
/// `IoError` if `root` itself cannot be read.
pub fn find_audio_files(root: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
    if root.is_file() {
        return Ok(if is_audio_file(root) {
            vec![root.to_path_buf()]
        } else {
            vec![]
        });
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if dir.as_path() == root => {
                return Err(AnalysisError::IoError(format!(
                    "cannot read directory {}: {}",
                    dir.display(),
                    e
                )));
            }
            Err(e) => {
                log::warn!("Skipping unreadable directory {}: {}", dir.display(), e);
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            if file_type.is_dir() {
                pending.push(path);
            } else if is_audio_file(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    log::debug!("Found {} audio files under {}", files.len(), root.display());
    Ok(files)
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(AUDIO_EXTENSION))
}

/// Whether `stem` already contains `label` anywhere
pub fn has_key_tag(stem: &str, label: &str) -> bool {
    stem.contains(label)
}

/// File name with `_<label>` appended to the stem, extension unchanged
///
/// Returns `None` if the path has no file name or is already tagged.
/// Stem and extension bytes are kept as-is, including non-UTF-8 names.
///
/// # Example
///
/// ```
/// use std::ffi::OsString;
/// use std::path::Path;
/// use keytag::tagging::tagged_file_name;
///
/// assert_eq!(
///     tagged_file_name(Path::new("loops/pad.wav"), "Em"),
///     Some(OsString::from("pad_Em.wav"))
/// );
/// assert_eq!(tagged_file_name(Path::new("loops/pad_Em.wav"), "Em"), None);
/// ```
pub fn tagged_file_name(path: &Path, label: &str) -> Option<OsString> {
    let stem = path.file_stem()?;
    // Labels are ASCII, so lossy replacement cannot create or hide a match
    if has_key_tag(&stem.to_string_lossy(), label) {
        return None;
    }

    let mut name = stem.to_os_string();
    name.push("_");
    name.push(label);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    Some(name)
}

/// Rename `path` to carry `label`, unless it already does
///
/// With `dry_run` set, nothing is touched and the would-be target is
/// reported.
///
/// # Errors
///
/// `IoError` if the target already exists or the rename fails.
pub fn rename_with_key(
    path: &Path,
    label: &str,
    dry_run: bool,
) -> Result<RenameOutcome, AnalysisError> {
    let Some(new_name) = tagged_file_name(path, label) else {
        return Ok(RenameOutcome::AlreadyTagged);
    };

    let target = path.with_file_name(new_name);
    if target.exists() {
        return Err(AnalysisError::IoError(format!(
            "refusing to overwrite existing {}",
            target.display()
        )));
    }

    if dry_run {
        return Ok(RenameOutcome::WouldRename(target));
    }

    fs::rename(path, &target).map_err(|e| {
        AnalysisError::IoError(format!(
            "cannot rename {} to {}: {}",
            path.display(),
            target.display(),
            e
        ))
    })?;

    log::debug!("Renamed {} -> {}", path.display(), target.display());
    Ok(RenameOutcome::Renamed(target))
}

/// Detect the key of one file and tag its name
pub fn tag_file(
    path: &Path,
    config: &AnalysisConfig,
    dry_run: bool,
) -> Result<TagReport, AnalysisError> {
    let result = crate::analyze_file(path, config)?;
    let key = result.key.name();
    let outcome = rename_with_key(path, &key, dry_run)?;

    Ok(TagReport {
        path: path.to_path_buf(),
        key,
        confidence: result.key_confidence,
        clarity: result.key_clarity,
        outcome,
    })
}
