use std::fs;
use std::path::{Path, PathBuf};

use crate::ReplayError;

/// Expands an input path into the list of data files to replay.
///
/// A directory contributes every regular file directly inside it; nested
/// directories are skipped with a warning, never an error. The order is
/// whatever the filesystem listing yields, nothing stronger.
pub fn resolve_inputs(path: &Path) -> Result<Vec<PathBuf>, ReplayError> {
    let meta = fs::metadata(path).map_err(|e| {
        ReplayError::Config(format!("cannot read input path {}: {}", path.display(), e))
    })?;

    if !meta.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path).map_err(|e| {
        ReplayError::Config(format!("cannot list directory {}: {}", path.display(), e))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            ReplayError::Config(format!("cannot list directory {}: {}", path.display(), e))
        })?;
        let child = entry.path();
        if child.is_dir() {
            log::warn!("skipping files in directory {}", child.display());
        } else {
            files.push(child);
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn single_file_is_the_sole_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let data = dir.path().join("trades.csv");
        File::create(&data).expect("create file");

        let inputs = resolve_inputs(&data).expect("resolve");
        assert_eq!(inputs, vec![data]);
    }

    #[test]
    fn directory_collects_direct_files_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in &["a.csv", "b.csv"] {
            let mut f = File::create(dir.path().join(name)).expect("create file");
            f.write_all(b"x").expect("write");
        }
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).expect("mkdir");
        File::create(nested.join("hidden.csv")).expect("create nested file");

        let mut inputs = resolve_inputs(dir.path()).expect("resolve");
        // enumeration order is deliberately unspecified, sort for the assertion
        inputs.sort();
        assert_eq!(
            inputs,
            vec![dir.path().join("a.csv"), dir.path().join("b.csv")]
        );
    }

    #[test]
    fn missing_path_is_a_configuration_error() {
        let err = resolve_inputs(Path::new("/no/such/input")).expect_err("missing path");
        assert!(matches!(err, ReplayError::Config(_)));
    }
}
