//! Font resource acquisition.
//!
//! Two-step lookup: the requested font file first, otherwise the first usable
//! face found under the platform's font directories. The rest of the crate
//! only ever sees a single [`FontResource`].

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::error::{DeckstripError, DeckstripResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    Requested(PathBuf),
    SystemFallback(PathBuf),
}

#[derive(Clone)]
pub struct FontResource {
    pub bytes: Arc<Vec<u8>>,
    pub origin: FontOrigin,
}

impl std::fmt::Debug for FontResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontResource")
            .field("bytes_len", &self.bytes.len())
            .field("origin", &self.origin)
            .finish()
    }
}

/// Load the requested font, falling back to a system face if it is missing or
/// unreadable. The fallback is logged, not fatal; only the total absence of
/// any usable font is an error.
pub fn load_font(requested: Option<&Path>) -> DeckstripResult<FontResource> {
    if let Some(path) = requested {
        match std::fs::read(path) {
            Ok(bytes) => {
                return Ok(FontResource {
                    bytes: Arc::new(bytes),
                    origin: FontOrigin::Requested(path.to_path_buf()),
                });
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    %err,
                    "requested font could not be read, falling back to a system font"
                );
            }
        }
    }

    let fallback = find_fallback_font().ok_or_else(|| {
        DeckstripError::render("no usable font found in system font directories")
    })?;
    let bytes = std::fs::read(&fallback)
        .with_context(|| format!("read fallback font '{}'", fallback.display()))?;
    Ok(FontResource {
        bytes: Arc::new(bytes),
        origin: FontOrigin::SystemFallback(fallback),
    })
}

/// First font file found under the platform font directories, scanning in
/// sorted order so the choice is stable across runs.
pub fn find_fallback_font() -> Option<PathBuf> {
    font_dirs()
        .iter()
        .find_map(|dir| first_font_under(dir, 4))
}

fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("/Library/Fonts"),
    ];
    if let Ok(home) = std::env::var("HOME") {
        dirs.push(PathBuf::from(&home).join(".fonts"));
        dirs.push(PathBuf::from(&home).join(".local/share/fonts"));
        dirs.push(PathBuf::from(&home).join("Library/Fonts"));
    }
    if let Ok(windir) = std::env::var("WINDIR") {
        dirs.push(PathBuf::from(windir).join("Fonts"));
    }
    dirs
}

fn first_font_under(dir: &Path, depth: u32) -> Option<PathBuf> {
    let rd = std::fs::read_dir(dir).ok()?;
    let mut entries: Vec<PathBuf> = rd.flatten().map(|e| e.path()).collect();
    entries.sort();

    for path in &entries {
        if path.is_file() && is_font_file(path) {
            return Some(path.clone());
        }
    }
    if depth == 0 {
        return None;
    }
    for path in &entries {
        if path.is_dir()
            && let Some(hit) = first_font_under(path, depth - 1)
        {
            return Some(hit);
        }
    }
    None
}

fn is_font_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    ext == "ttf" || ext == "otf" || ext == "ttc"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_file_extension_filter() {
        assert!(is_font_file(Path::new("a/b/X Zar Bold.ttf")));
        assert!(is_font_file(Path::new("face.OTF")));
        assert!(!is_font_file(Path::new("readme.txt")));
        assert!(!is_font_file(Path::new("noext")));
    }

    #[test]
    fn missing_requested_font_falls_back() {
        let Some(_) = find_fallback_font() else {
            eprintln!("skipping: no system fonts available");
            return;
        };
        let font = load_font(Some(Path::new("/definitely/not/a/font.ttf"))).unwrap();
        assert!(matches!(font.origin, FontOrigin::SystemFallback(_)));
        assert!(!font.bytes.is_empty());
    }

    #[test]
    fn requested_font_wins_when_readable() {
        let Some(fallback) = find_fallback_font() else {
            eprintln!("skipping: no system fonts available");
            return;
        };
        let font = load_font(Some(&fallback)).unwrap();
        assert_eq!(font.origin, FontOrigin::Requested(fallback));
    }
}
