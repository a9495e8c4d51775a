//! File-based upload source.
//!
//! Reads CSV exports from files and folders on disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::DataSource;
use crate::ingest::{Encoding, Upload};

/// A source that reads monitoring exports from disk.
///
/// Each configured path is either a single file or a folder, in which case
/// every `*.csv` file directly inside it is used. A file is delivered on the
/// first poll and again whenever its modification time advances; since the
/// path is the source identifier, a changed file replaces its earlier rows.
#[derive(Debug)]
pub struct FileSource {
    paths: Vec<PathBuf>,
    description: String,
    last_error: Option<String>,
    last_modified: HashMap<PathBuf, SystemTime>,
    encoding: Option<Encoding>,
}

impl FileSource {
    /// Create a new file source for the given files or folders.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let paths: Vec<PathBuf> = paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect();
        let description = match paths.as_slice() {
            [single] => format!("file: {}", single.display()),
            many => format!("files: {} paths", many.len()),
        };
        Self {
            paths,
            description,
            last_error: None,
            last_modified: HashMap::new(),
            encoding: None,
        }
    }

    /// Declare the text encoding of every file this source reads.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Returns the configured paths.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Expand folders into their CSV files, sorted by name.
    fn expand(&mut self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for path in &self.paths {
            if !path.is_dir() {
                files.push(path.clone());
                continue;
            }
            match fs::read_dir(path) {
                Ok(entries) => {
                    let mut found: Vec<PathBuf> = entries
                        .filter_map(|e| e.ok().map(|e| e.path()))
                        .filter(|p| p.is_file() && is_csv(p))
                        .collect();
                    found.sort();
                    files.extend(found);
                }
                Err(e) => {
                    self.last_error = Some(format!("Read error: {}: {}", path.display(), e));
                }
            }
        }
        files
    }

    fn get_modified_time(path: &Path) -> Option<SystemTime> {
        fs::metadata(path).ok()?.modified().ok()
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Vec<Upload> {
        self.last_error = None;
        let mut uploads = Vec::new();

        for path in self.expand() {
            let current_modified = Self::get_modified_time(&path);

            // Check if file has been modified since last read
            let file_changed = match (self.last_modified.get(&path), &current_modified) {
                (None, _) => true,
                (Some(_), None) => false,
                (Some(last), Some(current)) => current > last,
            };
            if !file_changed {
                continue;
            }

            match fs::read(&path) {
                Ok(bytes) => {
                    if let Some(modified) = current_modified {
                        self.last_modified.insert(path.clone(), modified);
                    }
                    let upload = Upload::new(path.display().to_string(), bytes);
                    uploads.push(match self.encoding {
                        Some(encoding) => upload.with_encoding(encoding),
                        None => upload,
                    });
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot read export");
                    self.last_error = Some(format!("Read error: {}: {}", path.display(), e));
                }
            }
        }

        uploads
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn reset(&mut self) {
        self.last_modified.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn sample_csv() -> &'static str {
        "Report\nGenerated\nLegend\n,,,,,,\nHost,IP,,,Avail,Lat,Loss\nh1,10.0.0.1,,,99.5,12,0.1\n"
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new(["/tmp/test.csv"]);
        assert_eq!(source.paths(), &[PathBuf::from("/tmp/test.csv")]);
        assert_eq!(source.description(), "file: /tmp/test.csv");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", sample_csv()).unwrap();

        let mut source = FileSource::new([file.path()]);

        // First poll should return data
        let uploads = source.poll();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].bytes, sample_csv().as_bytes());
        assert_eq!(uploads[0].file_name, file.path().display().to_string());

        // Second poll without file change should return nothing
        assert!(source.poll().is_empty());

        // Reset delivers it again
        source.reset();
        assert_eq!(source.poll().len(), 1);
    }

    #[test]
    fn test_file_source_expands_folder() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), sample_csv()).unwrap();
        fs::write(dir.path().join("a.CSV"), sample_csv()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let mut source = FileSource::new([dir.path()]);
        let names: Vec<String> = source.poll().into_iter().map(|u| u.file_name).collect();

        assert_eq!(
            names,
            vec![
                dir.path().join("a.CSV").display().to_string(),
                dir.path().join("b.csv").display().to_string(),
            ]
        );
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new(["/nonexistent/path/export.csv"]);

        assert!(source.poll().is_empty());
        assert!(source.error().is_some());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_declares_encoding() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "Zürich" encoded as ISO-8859-1
        let mut bytes = b"t\nt\nt\nt\nt\nZ".to_vec();
        bytes.push(0xFC);
        bytes.extend_from_slice(b"rich,ip,,,99,1,0\n");
        fs::write(&path, &bytes).unwrap();

        let mut source = FileSource::new([&path]).with_encoding(Encoding::Latin1);
        let uploads = source.poll();
        assert_eq!(uploads[0].encoding, Some(Encoding::Latin1));

        let dataset = crate::data::SharedDataset::new();
        let report = dataset.ingest_batch(uploads);
        assert!(report.is_all_ok());
        assert_eq!(report.hosts, vec!["Zürich"]);

        // Undeclared, the same bytes are not valid utf-8
        let mut plain = FileSource::new([&path]);
        assert!(!dataset.ingest_batch(plain.poll()).is_all_ok());
    }

    #[test]
    fn test_file_source_description_for_many() {
        let source = FileSource::new(["a.csv", "b.csv"]);
        assert_eq!(source.description(), "files: 2 paths");
    }
}
