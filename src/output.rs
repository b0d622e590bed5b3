//! Writing generated examples and checking them against disk

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::GeneratedFile;

/// Path an example for `file_name` is written to
pub fn output_path(dir: &Path, file_name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", file_name, extension.trim_start_matches('.')))
}

/// Write every generated example into `dir`, creating it if needed
pub fn write_outputs(
    files: &[GeneratedFile],
    dir: &Path,
    extension: &str,
) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = output_path(dir, &file.file, extension);
        fs::write(&path, &file.contents)?;
        info!(path = %path.display(), "wrote example");
        written.push(path);
    }
    Ok(written)
}

/// Examples whose on-disk copy is missing or differs from the generated text
pub fn find_stale(files: &[GeneratedFile], dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut stale = Vec::new();
    for file in files {
        let path = output_path(dir, &file.file, extension);
        let current = match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };

        if current.as_deref() != Some(file.contents.as_str()) {
            debug!(path = %path.display(), "example out of date");
            stale.push(path);
        }
    }
    Ok(stale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn generated(name: &str, contents: &str) -> GeneratedFile {
        GeneratedFile {
            spec_path: PathBuf::from("spec.yaml"),
            file: name.to_string(),
            contents: contents.to_string(),
        }
    }

    #[test]
    fn test_output_path_appends_extension() {
        let dir = Path::new("out");
        assert_eq!(output_path(dir, "apache.yaml", "example"), PathBuf::from("out/apache.yaml.example"));
        assert_eq!(output_path(dir, "apache.yaml", ".example"), PathBuf::from("out/apache.yaml.example"));
    }

    #[test]
    fn test_write_then_check_is_clean() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("generated");
        let files = vec![generated("apache.yaml", "# timeout: 10\n")];

        let written = write_outputs(&files, &dir, "example").expect("Should write");
        assert_eq!(written, vec![dir.join("apache.yaml.example")]);
        assert!(find_stale(&files, &dir, "example").unwrap().is_empty());
    }

    #[test]
    fn test_changed_and_missing_files_are_stale() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("apache.yaml.example"), "# timeout: 5\n").unwrap();

        let files = vec![
            generated("apache.yaml", "# timeout: 10\n"),
            generated("other.yaml", "# x: 1\n"),
        ];
        let stale = find_stale(&files, dir, "example").unwrap();
        assert_eq!(
            stale,
            vec![dir.join("apache.yaml.example"), dir.join("other.yaml.example")]
        );
    }
}
