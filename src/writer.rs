//! Persisting decks to disk.
use crate::error::{Error, Result};
use crate::pptx::{self, Deck};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Serialize `deck` and write it to `path`.
///
/// Missing parent directories are created. The bytes go to a temporary file
/// next to the destination that is renamed into place once complete, so a
/// failed write never leaves a truncated file under `path`.
pub fn write(deck: &Deck, path: &Path) -> Result<()> {
    let bytes = pptx::to_bytes(deck).map_err(|e| Error::render("package", e))?;
    write_bytes(&bytes, path)?;
    info!(path = %path.display(), bytes = bytes.len(), "presentation written");
    Ok(())
}

/// Atomically replace `path` with `bytes`.
pub fn write_bytes(bytes: &[u8], path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::{Color, Slide};

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/deck.pptx");

        let mut deck = Deck::widescreen();
        deck.push_slide(Slide::new("only", Color::rgb(255, 255, 255)));
        write(&deck, &path).unwrap();

        let written = fs::read(&path).unwrap();
        assert!(written.starts_with(b"PK"));
        // Only the final file remains in the directory
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        write_bytes(b"first version", &path).unwrap();
        write_bytes(b"second", &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_unwritable_destination_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let err = write_bytes(b"data", &blocker.join("deck.pptx")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
