//! Analysis API
//!
//! Directory-level entry points. `analyze_dirs` walks the given roots
//! for Go sources, groups them by directory (one directory = one
//! package), parses and checks packages in parallel, and returns every
//! report in stable order. A package that fails to parse is skipped and
//! surfaced through [`AnalysisOutcome::failures`] rather than aborting
//! the run; only I/O problems on the roots themselves are hard errors.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::AnalyzerConfig;
use crate::errors::{LocklintError, Result};
use crate::features::checking::{run_checkers, sort_reports, Report};
use crate::features::parsing::GoParser;
use crate::features::syntax::GoFile;

/// What one run produced
#[derive(Debug)]
pub struct AnalysisOutcome {
    /// All reports, sorted by file then offset
    pub reports: Vec<Report>,
    /// Packages whose parse failed; their reports are absent
    pub failures: Vec<(PathBuf, LocklintError)>,
    pub files_checked: usize,
    pub packages_checked: usize,
}

/// Analyze every Go package found under `dirs`.
pub fn analyze_dirs(dirs: &[PathBuf], cfg: &AnalyzerConfig) -> Result<AnalysisOutcome> {
    let mut packages: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for dir in dirs {
        for path in collect_go_files(dir, cfg)? {
            let package_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            packages.entry(package_dir).or_default().push(path);
        }
    }
    for files in packages.values_mut() {
        files.sort();
    }
    debug!(packages = packages.len(), "collected packages");

    let checked: Vec<(PathBuf, std::result::Result<(usize, Vec<Report>), LocklintError>)> =
        packages
            .into_par_iter()
            .map(|(dir, paths)| {
                let result = check_package(&paths, cfg);
                (dir, result)
            })
            .collect();

    let mut outcome = AnalysisOutcome {
        reports: Vec::new(),
        failures: Vec::new(),
        files_checked: 0,
        packages_checked: 0,
    };
    for (dir, result) in checked {
        match result {
            Ok((files, mut reports)) => {
                outcome.files_checked += files;
                outcome.packages_checked += 1;
                outcome.reports.append(&mut reports);
            }
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "skipping package");
                outcome.failures.push((dir, err));
            }
        }
    }
    sort_reports(&mut outcome.reports);
    Ok(outcome)
}

/// Analyze in-memory sources as a single package. The test- and
/// benchmark-facing twin of [`analyze_dirs`].
pub fn analyze_sources(sources: &[(PathBuf, String)], cfg: &AnalyzerConfig) -> Result<Vec<Report>> {
    let mut parser = GoParser::new()?;
    let mut files = Vec::with_capacity(sources.len());
    for (path, source) in sources {
        files.push(parser.parse(source, path.clone())?);
    }
    Ok(run_checkers(&files, cfg))
}

fn check_package(paths: &[PathBuf], cfg: &AnalyzerConfig) -> Result<(usize, Vec<Report>)> {
    let mut parser = GoParser::new()?;
    let mut files: Vec<GoFile> = Vec::with_capacity(paths.len());
    for path in paths {
        let source = std::fs::read_to_string(path)?;
        files.push(parser.parse(&source, path.clone())?);
    }
    let reports = run_checkers(&files, cfg);
    Ok((files.len(), reports))
}

fn collect_go_files(dir: &Path, cfg: &AnalyzerConfig) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(dir).follow_links(false).into_iter();
    let mut out = Vec::new();
    for entry in walker.filter_entry(|e| !skipped(e)) {
        let entry = entry.map_err(|e| {
            LocklintError::analysis(format!("walking {}: {e}", dir.display()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !name.ends_with(".go") {
            continue;
        }
        if name.ends_with("_test.go") && !cfg.include_tests {
            continue;
        }
        out.push(entry.into_path());
    }
    Ok(out)
}

/// Prune hidden entries and the directories Go tooling never builds.
/// Depth 0 is the root the caller asked for; it always passes.
fn skipped(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    match entry.file_name().to_str() {
        Some(name) => name.starts_with('.') || name == "vendor" || name == "testdata",
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> AnalyzerConfig {
        AnalyzerConfig::default()
    }

    #[test]
    fn test_analyze_sources_single_package() {
        let sources = vec![(
            PathBuf::from("pkg/a.go"),
            r#"package a

var mu sync.Mutex

func f() {
	mu.Unlock()
}
"#
            .to_string(),
        )];
        let reports = analyze_sources(&sources, &cfg()).unwrap();
        assert_eq!(reports.len(), 2); // contracts + usage both fire
        assert_eq!(
            reports[0].to_string(),
            r#"cannot "unlock" mu [not locked]: pkg/a.go:6:5"#
        );
    }

    #[test]
    fn test_analyze_sources_propagates_parse_errors() {
        let sources = vec![(PathBuf::from("bad.go"), "package a\nfunc {".to_string())];
        let err = analyze_sources(&sources, &cfg()).unwrap_err();
        assert!(matches!(err, LocklintError::Parse { .. }), "{err}");
    }
}
