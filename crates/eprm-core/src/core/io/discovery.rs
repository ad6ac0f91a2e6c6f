use super::fasta;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Well-known project files that are never sequence input, even with a `.txt`
/// extension.
const EXCLUDED_FILE_NAMES: &[&str] = &[
    "readme.txt",
    "requirements.txt",
    "license",
    "license.txt",
    "notice.txt",
    "cmakelists.txt",
    "robots.txt",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    ProjectFile,
    NotSequenceContent,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::ProjectFile => write!(f, "well-known project file"),
            ExclusionReason::NotSequenceContent => write!(f, "content is not FASTA-like"),
        }
    }
}

/// Outcome of scanning a directory: the files to analyze, plus every `.txt`
/// candidate that was rejected, with its reason.
#[derive(Debug, Default)]
pub struct Discovery {
    pub targets: Vec<PathBuf>,
    pub excluded: Vec<(PathBuf, ExclusionReason)>,
}

/// Scans one directory (non-recursively) for sequence input.
///
/// `.fasta` files are always targets. `.txt` files are targets only when they
/// are not a well-known project file and their content sniffs as FASTA-like.
/// All other files are ignored. Results are sorted by path.
pub fn discover_sequence_files(dir: &Path) -> io::Result<Discovery> {
    let mut discovery = Discovery::default();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("fasta") => discovery.targets.push(path),
            Some("txt") => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.to_ascii_lowercase())
                    .unwrap_or_default();

                if EXCLUDED_FILE_NAMES.contains(&name.as_str()) {
                    discovery.excluded.push((path, ExclusionReason::ProjectFile));
                } else if fasta::sniff_path(&path)? {
                    discovery.targets.push(path);
                } else {
                    discovery
                        .excluded
                        .push((path, ExclusionReason::NotSequenceContent));
                }
            }
            _ => {}
        }
    }

    discovery.targets.sort();
    discovery.excluded.sort_by(|a, b| a.0.cmp(&b.0));

    debug!(
        targets = discovery.targets.len(),
        excluded = discovery.excluded.len(),
        "Directory scan finished."
    );
    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn fasta_files_are_always_targets() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.fasta"), ">seq1\nMKTAYIAKQR\n").unwrap();
        fs::write(dir.path().join("b.fasta"), "anything at all").unwrap();

        let discovery = discover_sequence_files(dir.path()).unwrap();
        assert_eq!(discovery.targets.len(), 2);
        assert!(discovery.excluded.is_empty());
    }

    #[test]
    fn txt_files_are_sniffed_for_sequence_content() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("sequences.txt"),
            ">seq1\nMKTAYIAKQRQISFVKSHFS\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("notes.txt"),
            "2024-06-01 09:00 buffer exchange\n2024-06-02 10:30 elution check\n",
        )
        .unwrap();

        let discovery = discover_sequence_files(dir.path()).unwrap();
        assert_eq!(discovery.targets.len(), 1);
        assert!(discovery.targets[0].ends_with("sequences.txt"));
        assert_eq!(
            discovery.excluded,
            vec![(
                dir.path().join("notes.txt"),
                ExclusionReason::NotSequenceContent
            )]
        );
    }

    #[test]
    fn well_known_project_files_are_excluded_without_sniffing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("README.txt"), "MKTAYIAKQRQISFVKSHFS\n").unwrap();

        let discovery = discover_sequence_files(dir.path()).unwrap();
        assert!(discovery.targets.is_empty());
        assert_eq!(discovery.excluded[0].1, ExclusionReason::ProjectFile);
    }

    #[test]
    fn unrelated_extensions_and_directories_are_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("results.json"), "{}").unwrap();
        fs::write(dir.path().join("run.log"), "log line").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let discovery = discover_sequence_files(dir.path()).unwrap();
        assert!(discovery.targets.is_empty());
        assert!(discovery.excluded.is_empty());
    }

    #[test]
    fn targets_are_sorted_by_path() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.fasta"), "").unwrap();
        fs::write(dir.path().join("a.fasta"), "").unwrap();

        let discovery = discover_sequence_files(dir.path()).unwrap();
        assert!(discovery.targets[0].ends_with("a.fasta"));
        assert!(discovery.targets[1].ends_with("b.fasta"));
    }
}
