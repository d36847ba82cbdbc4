use crate::types::Unit;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a packaging step is expected to leave `<name>.zip`, in search order.
pub fn artifact_candidates(unit: &Unit) -> [PathBuf; 2] {
    let file_name = format!("{}.zip", unit.name);
    [
        unit.path.join("dist").join(&file_name),
        unit.path.join(&file_name),
    ]
}

pub fn find_artifact(unit: &Unit) -> Option<PathBuf> {
    artifact_candidates(unit)
        .into_iter()
        .find(|candidate| candidate.is_file())
}

/// Move `source` into `output_dir`, replacing any previous archive of the
/// same name. Falls back to copy and remove across filesystems. A `source`
/// that already is the destination is left in place.
pub fn relocate_artifact(source: &Path, output_dir: &Path) -> io::Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "artifact path has no file name")
    })?;

    fs::create_dir_all(output_dir)?;
    let destination = output_dir.join(file_name);
    if same_file(source, &destination) {
        debug!("Artifact {} already in place", destination.display());
        return Ok(destination);
    }
    if destination.exists() {
        fs::remove_file(&destination)?;
    }

    if fs::rename(source, &destination).is_err() {
        fs::copy(source, &destination)?;
        fs::remove_file(source)?;
    }

    debug!(
        "Moved artifact {} -> {}",
        source.display(),
        destination.display()
    );
    Ok(destination)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn unit_in(root: &Path) -> Unit {
        let dir = root.join("wp-gallery");
        fs::create_dir_all(dir.join("dist")).unwrap();
        Unit::new("wp-gallery", dir, "wp-").unwrap()
    }

    #[test]
    fn test_dist_is_searched_first() {
        let temp = TempDir::new().unwrap();
        let unit = unit_in(temp.path());
        fs::write(unit.path.join("wp-gallery.zip"), "root").unwrap();
        fs::write(unit.path.join("dist/wp-gallery.zip"), "dist").unwrap();

        assert_eq!(
            find_artifact(&unit),
            Some(unit.path.join("dist/wp-gallery.zip"))
        );
    }

    #[test]
    fn test_missing_artifact() {
        let temp = TempDir::new().unwrap();
        let unit = unit_in(temp.path());
        fs::write(unit.path.join("dist/other.zip"), "x").unwrap();
        assert!(find_artifact(&unit).is_none());
    }

    #[test]
    fn test_relocate_replaces_previous_archive() {
        let temp = TempDir::new().unwrap();
        let unit = unit_in(temp.path());
        let source = unit.path.join("wp-gallery.zip");
        let output = temp.path().join("build");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("wp-gallery.zip"), "old").unwrap();
        fs::write(&source, "new").unwrap();

        let moved = relocate_artifact(&source, &output).unwrap();

        assert_eq!(moved, output.join("wp-gallery.zip"));
        assert_eq!(fs::read_to_string(&moved).unwrap(), "new");
        assert!(!source.exists());
    }

    #[test]
    fn test_relocate_into_own_directory_keeps_archive() {
        let temp = TempDir::new().unwrap();
        let unit = unit_in(temp.path());
        let source = unit.path.join("dist/wp-gallery.zip");
        fs::write(&source, "zip").unwrap();

        let moved = relocate_artifact(&source, &unit.path.join("dist")).unwrap();

        assert_eq!(moved, unit.path.join("dist/wp-gallery.zip"));
        assert_eq!(fs::read_to_string(&moved).unwrap(), "zip");
    }
}
