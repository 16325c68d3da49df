//! Log file discovery and loading.
//!
//! Reads the finished log files in the store directory, then the file the
//! key logger is currently writing, and feeds every line through the parser
//! into a [`KeyStats`].

use std::io::BufRead;
use std::path::{Path, PathBuf};

use keystats_core::error::{KeystatsError, Result};
use keystats_core::settings::{ErrorPolicy, Settings};
use tracing::{debug, info, trace, warn};

use crate::aggregator::KeyStats;
use crate::parser::parse_line;

// ── Public types ──────────────────────────────────────────────────────────────

/// Where to read from and how to react to bad input.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Directory of finished log files.
    pub store_dir: PathBuf,
    /// The log file currently being written.
    pub current_file: PathBuf,
    pub policy: ErrorPolicy,
}

impl From<&Settings> for LoadOptions {
    fn from(s: &Settings) -> Self {
        LoadOptions {
            store_dir: s.store_dir.clone(),
            current_file: s.current_file.clone(),
            policy: s.on_error,
        }
    }
}

/// Counters describing one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub files_read: usize,
    pub files_skipped: usize,
    pub lines_parsed: usize,
    pub lines_skipped: usize,
}

/// Result of [`load_key_stats`].
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub stats: KeyStats,
    pub summary: LoadSummary,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// List the regular files directly inside `store_dir`, sorted by path.
///
/// Sub-directories are not descended into. An entry that cannot be
/// inspected (e.g. a dangling symlink) is still listed, so that opening it
/// later reports the failure against its own path.
pub fn find_log_files(store_dir: &Path) -> Result<Vec<PathBuf>> {
    let dir_error = |source| KeystatsError::DirectoryRead {
        path: store_dir.to_path_buf(),
        source,
    };

    std::fs::metadata(store_dir).map_err(dir_error)?;

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(store_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => {
                let entry_path = e.path().filter(|_| e.depth() > 0).map(Path::to_path_buf);
                match entry_path {
                    Some(path) => {
                        debug!("Unreadable entry {}: {}", path.display(), e);
                        files.push(path);
                    }
                    None => return Err(dir_error(e.into())),
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Load every log file named by `options` into a fresh [`KeyStats`].
///
/// Under [`ErrorPolicy::Abort`] the first unreadable file, missing store
/// directory or malformed line ends the load with an error. Under
/// [`ErrorPolicy::Skip`] they are logged and skipped. A file that fails
/// partway through contributes nothing.
pub fn load_key_stats(options: &LoadOptions) -> Result<LoadOutcome> {
    let mut stats = KeyStats::new();
    let mut summary = LoadSummary::default();

    let mut files = match find_log_files(&options.store_dir) {
        Ok(files) => files,
        Err(e) if options.policy == ErrorPolicy::Skip => {
            warn!("Skipping store directory: {}", e);
            Vec::new()
        }
        Err(e) => return Err(e),
    };
    files.push(options.current_file.clone());

    for path in &files {
        match load_file(path, options.policy) {
            Ok(file) => {
                summary.files_read += 1;
                summary.lines_parsed += file.lines_parsed;
                summary.lines_skipped += file.lines_skipped;
                stats.merge(file.stats);
            }
            Err(e @ KeystatsError::FileRead { .. }) if options.policy == ErrorPolicy::Skip => {
                warn!("Skipping file: {}", e);
                summary.files_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Loaded {} key presses from {} files ({} skipped), {} lines parsed, {} skipped",
        stats.grand_total(),
        summary.files_read,
        summary.files_skipped,
        summary.lines_parsed,
        summary.lines_skipped,
    );

    Ok(LoadOutcome { stats, summary })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

struct FileLoad {
    stats: KeyStats,
    lines_parsed: usize,
    lines_skipped: usize,
}

/// Parse a single log file into its own [`KeyStats`].
fn load_file(path: &Path, policy: ErrorPolicy) -> Result<FileLoad> {
    let read_error = |source| KeystatsError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(read_error)?;
    let reader = std::io::BufReader::new(file);

    let mut load = FileLoad {
        stats: KeyStats::new(),
        lines_parsed: 0,
        lines_skipped: 0,
    };

    for (index, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(read_error)?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Ok(record) => {
                let class = load.stats.record(&record);
                trace!("{} x{} -> {:?}", record.value, record.count, class);
                load.lines_parsed += 1;
            }
            Err(source) => {
                let err = KeystatsError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                    source,
                };
                if policy == ErrorPolicy::Abort {
                    return Err(err);
                }
                warn!("Skipping line: {}", err);
                load.lines_skipped += 1;
            }
        }
    }

    debug!(
        "File {}: {} lines parsed, {} skipped, {} key presses",
        path.display(),
        load.lines_parsed,
        load.lines_skipped,
        load.stats.grand_total(),
    );

    Ok(load)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_log(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    /// A store directory plus a current file living next to it.
    fn layout(tmp: &TempDir) -> (PathBuf, PathBuf) {
        let store = tmp.path().join("previous");
        std::fs::create_dir_all(&store).unwrap();
        (store, tmp.path().join("keys"))
    }

    fn options(store: &Path, current: &Path, policy: ErrorPolicy) -> LoadOptions {
        LoadOptions {
            store_dir: store.to_path_buf(),
            current_file: current.to_path_buf(),
            policy,
        }
    }

    // ── find_log_files ────────────────────────────────────────────────────────

    #[test]
    fn test_find_log_files_sorted() {
        let tmp = TempDir::new().unwrap();
        write_log(tmp.path(), "1700000300", &["x"]);
        write_log(tmp.path(), "1700000100", &["x"]);
        write_log(tmp.path(), "1700000200", &["x"]);

        let files = find_log_files(tmp.path()).unwrap();
        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["1700000100", "1700000200", "1700000300"]);
    }

    #[test]
    fn test_find_log_files_not_recursive() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("nested");
        std::fs::create_dir_all(&sub).unwrap();
        write_log(tmp.path(), "top", &["x"]);
        write_log(&sub, "inner", &["x"]);

        let files = find_log_files(tmp.path()).unwrap();
        assert_eq!(files, vec![tmp.path().join("top")]);
    }

    #[test]
    fn test_find_log_files_missing_dir() {
        let err = find_log_files(Path::new("/tmp/does-not-exist-keystats-test-xyz")).unwrap_err();
        assert!(matches!(err, KeystatsError::DirectoryRead { .. }));
    }

    // ── load_key_stats ────────────────────────────────────────────────────────

    #[test]
    fn test_load_reads_store_and_current_file() {
        let tmp = TempDir::new().unwrap();
        let (store, current) = layout(&tmp);
        write_log(&store, "1", &["3 a false false false false"]);
        write_log(&store, "2", &["2 a true false false false"]);
        write_log(tmp.path(), "keys", &["5 Shift true false false false"]);

        let outcome = load_key_stats(&options(&store, &current, ErrorPolicy::Abort)).unwrap();
        assert_eq!(outcome.stats.plain_keys.get("a"), 3);
        assert_eq!(outcome.stats.totals.combinations, 2);
        assert_eq!(outcome.stats.modifiers.get("Shift"), 5);
        assert_eq!(outcome.stats.grand_total(), 10);
        assert_eq!(outcome.summary.files_read, 3);
        assert_eq!(outcome.summary.lines_parsed, 3);
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let tmp = TempDir::new().unwrap();
        let (store, current) = layout(&tmp);
        write_log(
            tmp.path(),
            "keys",
            &["", "1 a false false false false", "   ", "1 b false false false false"],
        );

        let outcome = load_key_stats(&options(&store, &current, ErrorPolicy::Abort)).unwrap();
        assert_eq!(outcome.summary.lines_parsed, 2);
        assert_eq!(outcome.summary.lines_skipped, 0);
    }

    #[test]
    fn test_load_empty_store_and_empty_current() {
        let tmp = TempDir::new().unwrap();
        let (store, current) = layout(&tmp);
        write_log(tmp.path(), "keys", &[]);

        let outcome = load_key_stats(&options(&store, &current, ErrorPolicy::Abort)).unwrap();
        assert!(outcome.stats.is_empty());
        assert_eq!(outcome.summary.files_read, 1);
    }

    #[test]
    fn test_abort_on_missing_current_file() {
        let tmp = TempDir::new().unwrap();
        let (store, current) = layout(&tmp);
        write_log(&store, "1", &["3 a false false false false"]);

        let err = load_key_stats(&options(&store, &current, ErrorPolicy::Abort)).unwrap_err();
        match err {
            KeystatsError::FileRead { path, .. } => assert_eq!(path, current),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_abort_on_missing_store_dir() {
        let tmp = TempDir::new().unwrap();
        let store = tmp.path().join("absent");
        let current = write_log(tmp.path(), "keys", &["1 a false false false false"]);

        let err = load_key_stats(&options(&store, &current, ErrorPolicy::Abort)).unwrap_err();
        assert!(matches!(err, KeystatsError::DirectoryRead { .. }));
    }

    #[test]
    fn test_abort_on_malformed_line_reports_location() {
        let tmp = TempDir::new().unwrap();
        let (store, current) = layout(&tmp);
        let bad = write_log(
            &store,
            "1",
            &["1 a false false false false", "oops a false false false false"],
        );
        write_log(tmp.path(), "keys", &[]);

        let err = load_key_stats(&options(&store, &current, ErrorPolicy::Abort)).unwrap_err();
        match err {
            KeystatsError::Parse { path, line, .. } => {
                assert_eq!(path, bad);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_skip_policy_continues_past_bad_input() {
        let tmp = TempDir::new().unwrap();
        let store = tmp.path().join("absent");
        let current = write_log(
            tmp.path(),
            "keys",
            &[
                "2 a false false false false",
                "2 a false",
                "x a false false false false",
                "4 b false false false false",
            ],
        );

        let outcome = load_key_stats(&options(&store, &current, ErrorPolicy::Skip)).unwrap();
        assert_eq!(outcome.stats.grand_total(), 6);
        assert_eq!(outcome.summary.lines_parsed, 2);
        assert_eq!(outcome.summary.lines_skipped, 2);
    }

    #[test]
    fn test_skip_policy_skips_missing_current_file() {
        let tmp = TempDir::new().unwrap();
        let (store, current) = layout(&tmp);
        write_log(&store, "1", &["3 a false false false false"]);

        let outcome = load_key_stats(&options(&store, &current, ErrorPolicy::Skip)).unwrap();
        assert_eq!(outcome.stats.grand_total(), 3);
        assert_eq!(outcome.summary.files_read, 1);
        assert_eq!(outcome.summary.files_skipped, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_skip_policy_dangling_symlink_only_skips_that_entry() {
        let tmp = TempDir::new().unwrap();
        let (store, current) = layout(&tmp);
        write_log(&store, "1", &["7 a false false false false"]);
        write_log(&store, "2", &["5 b false false false false"]);
        std::os::unix::fs::symlink("/nonexistent-keystats-target", store.join("3")).unwrap();
        write_log(tmp.path(), "keys", &["1 c false false false false"]);

        let files = find_log_files(&store).unwrap();
        assert_eq!(files.len(), 3);

        let outcome = load_key_stats(&options(&store, &current, ErrorPolicy::Skip)).unwrap();
        assert_eq!(outcome.stats.grand_total(), 13);
        assert_eq!(outcome.summary.files_read, 3);
        assert_eq!(outcome.summary.files_skipped, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_abort_policy_dangling_symlink_names_the_link() {
        let tmp = TempDir::new().unwrap();
        let (store, current) = layout(&tmp);
        write_log(&store, "1", &["7 a false false false false"]);
        let link = store.join("2");
        std::os::unix::fs::symlink("/nonexistent-keystats-target", &link).unwrap();
        write_log(tmp.path(), "keys", &[]);

        let err = load_key_stats(&options(&store, &current, ErrorPolicy::Abort)).unwrap_err();
        match err {
            KeystatsError::FileRead { path, .. } => assert_eq!(path, link),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_skip_policy_discards_file_with_invalid_utf8() {
        let tmp = TempDir::new().unwrap();
        let (store, current) = layout(&tmp);
        let path = store.join("1");
        std::fs::write(&path, b"7 a false false false false\n\xff\xfe\n").unwrap();
        write_log(tmp.path(), "keys", &["1 b false false false false"]);

        let outcome = load_key_stats(&options(&store, &current, ErrorPolicy::Skip)).unwrap();
        assert_eq!(outcome.stats.plain_keys.get("a"), 0);
        assert_eq!(outcome.stats.grand_total(), 1);
        assert_eq!(outcome.summary.files_skipped, 1);
    }
}
