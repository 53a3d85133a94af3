//! Resolution and validation of caller-supplied file paths.

use crate::PathError;
use log::debug;
use std::path::{Component, Path, PathBuf};

/// Extensions accepted for signing key files.
pub const KEY_FILE_EXTENSIONS: &[&str] = &[".p8", ".json"];
/// Extensions accepted for config files.
pub const CONFIG_FILE_EXTENSIONS: &[&str] = &[".json"];

/// Turns untrusted path strings into absolute, traversal-free paths with an
/// allowed extension.
///
/// Sanitization is purely lexical: the filesystem is never touched and
/// symlinks are not followed. Relative inputs are resolved against the
/// process working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSanitizer {
    /// Lowercase extensions, each with a leading dot.
    allowed_extensions: Vec<String>,
}

impl PathSanitizer {
    /// Create a sanitizer accepting the given extensions (case-insensitive,
    /// leading dot optional).
    pub fn new<I, S>(allowed_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref().trim().to_lowercase();
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{ext}")
                }
            })
            .collect();
        Self { allowed_extensions }
    }

    /// Sanitizer for signing key files (`.p8`, `.json`).
    pub fn key_files() -> Self {
        Self::new(KEY_FILE_EXTENSIONS)
    }

    /// Sanitizer for config files (`.json`).
    pub fn config_files() -> Self {
        Self::new(CONFIG_FILE_EXTENSIONS)
    }

    /// Allowed extensions in normalized form.
    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Resolve `raw` to an absolute normalized path, rejecting empty input,
    /// any `..` segment and extensions outside the allow list, in that order.
    pub fn sanitize(&self, raw: impl AsRef<Path>) -> Result<PathBuf, PathError> {
        let raw = raw.as_ref();
        let display = raw.to_string_lossy();
        if display.trim().is_empty() {
            return Err(PathError::Invalid("path cannot be empty".to_string()));
        }
        if display.contains('\0') {
            return Err(PathError::Invalid("path contains a NUL byte".to_string()));
        }

        let absolute = absolutize(raw)?;
        if has_parent_segment(&absolute) {
            return Err(PathError::Traversal {
                path: display.into_owned(),
            });
        }
        let normalized = normalize(&absolute);

        let extension = extension_of(&normalized);
        if !self.allowed_extensions.contains(&extension) {
            return Err(PathError::DisallowedExtension {
                path: normalized,
                extension,
            });
        }

        debug!("sanitized path: {}", normalized.display());
        Ok(normalized)
    }
}

/// Join relative paths onto the working directory.
fn absolutize(path: &Path) -> Result<PathBuf, PathError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|err| {
        PathError::Invalid(format!("failed to resolve working directory: {err}"))
    })?;
    Ok(cwd.join(path))
}

fn has_parent_segment(path: &Path) -> bool {
    path.components()
        .any(|component| matches!(component, Component::ParentDir))
}

/// Drop `.` segments. Callers reject `..` beforehand.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => (),
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Lowercase extension with a leading dot, or `""` when there is none.
fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
