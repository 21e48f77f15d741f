//! Checker runner
//!
//! Runs the configured checkers over one package's parsed files and
//! returns the combined, ordered report list.

use std::time::Instant;

use tracing::debug;

use crate::config::{AnalyzerConfig, CheckerKind};
use crate::features::checking::domain::Report;
use crate::features::checking::infrastructure::{ContractChecker, UsageChecker};
use crate::features::checking::ports::Checker;
use crate::features::package_desc::{describe, TypeCatalog};
use crate::features::syntax::GoFile;

/// Check one package.
///
/// All files must belong to the same package; the description built
/// from them is what lets the checkers see types, annotations and
/// package variables declared in sibling files.
pub fn run_checkers(files: &[GoFile], cfg: &AnalyzerConfig) -> Vec<Report> {
    let desc = describe(files, &cfg.annotation_tag);
    let catalog = TypeCatalog::new(&desc, &cfg.lock_types);

    let mut reports = Vec::new();
    for kind in &cfg.checkers {
        let checker: &dyn Checker = match kind {
            CheckerKind::Contracts => &ContractChecker,
            CheckerKind::Usage => &UsageChecker,
        };
        let started = Instant::now();
        for file in files {
            reports.extend(checker.check_file(file, &catalog, cfg));
        }
        debug!(
            checker = checker.name(),
            package = %desc.name,
            elapsed_us = started.elapsed().as_micros() as u64,
            "checker finished"
        );
    }
    sort_reports(&mut reports);
    reports
}

/// Order reports by file, then byte offset. Stable, so reports at the
/// same position keep the order their checks produced them in.
pub fn sort_reports(reports: &mut [Report]) {
    reports.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then(a.span.start.offset.cmp(&b.span.start.offset))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::parse_go_source;
    use std::path::PathBuf;

    fn file(name: &str, source: &str) -> GoFile {
        parse_go_source(source, PathBuf::from(name)).unwrap()
    }

    #[test]
    fn test_package_state_is_visible_across_files() {
        let files = vec![
            file(
                "a.go",
                r#"package demo

var mu sync.Mutex

// locklint:mu.Lock
func guardedStep() {}
"#,
            ),
            file(
                "b.go",
                r#"package demo

func caller() {
	guardedStep()
}
"#,
            ),
        ];
        let cfg = AnalyzerConfig::default();
        let reports = run_checkers(&files, &cfg);
        assert_eq!(reports.len(), 1);
        assert_eq!(
            reports[0].error.to_string(),
            r#"in call to guardedStep: mutex "mu" should be locked, but now is unlocked"#
        );
        assert_eq!(reports[0].file, PathBuf::from("b.go"));
    }

    #[test]
    fn test_reports_sorted_by_file_then_offset() {
        let files = vec![
            file(
                "z.go",
                r#"package demo

func second() {
	gate.Unlock()
	gate.Unlock()
}
"#,
            ),
            file(
                "a.go",
                r#"package demo

var gate sync.Mutex

func first() {
	gate.Unlock()
}
"#,
            ),
        ];
        let cfg = AnalyzerConfig {
            checkers: vec![CheckerKind::Contracts],
            ..AnalyzerConfig::default()
        };
        let reports = run_checkers(&files, &cfg);
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].file, PathBuf::from("a.go"));
        assert_eq!(reports[1].file, PathBuf::from("z.go"));
        assert!(reports[1].span.start.offset < reports[2].span.start.offset);
    }

    #[test]
    fn test_checker_selection_restricts_findings() {
        let files = vec![file(
            "only.go",
            r#"package demo

func f() {
	var m sync.Mutex
	m.Lock()
	m.Lock()
	m.Unlock()
}
"#,
        )];
        let contracts_only = AnalyzerConfig {
            checkers: vec![CheckerKind::Contracts],
            ..AnalyzerConfig::default()
        };
        let usage_only = AnalyzerConfig {
            checkers: vec![CheckerKind::Usage],
            ..AnalyzerConfig::default()
        };
        // Both checkers see the double lock; each runs on its own.
        assert_eq!(run_checkers(&files, &contracts_only).len(), 1);
        assert_eq!(run_checkers(&files, &usage_only).len(), 1);
    }

    #[test]
    fn test_filter_skips_functions() {
        let files = vec![file(
            "filtered.go",
            r#"package demo

var mu sync.Mutex

func noisy() {
	mu.Unlock()
}

func quiet() {
	mu.Lock()
	mu.Unlock()
}
"#,
        )];
        let cfg = AnalyzerConfig {
            filter: Some("quiet".to_string()),
            ..AnalyzerConfig::default()
        };
        assert!(run_checkers(&files, &cfg).is_empty());
    }
}
