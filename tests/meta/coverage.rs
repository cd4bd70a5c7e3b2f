//! Keeps `tests/unit` in lockstep with `src`
//!
//! The unit harness is rooted at `tests/unit/mod.rs`, so a test file that is
//! not declared by its directory's `mod.rs` is never compiled. These checks
//! catch that as well as missing or orphaned counterparts.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";

    // Entry points and module organization files need no test counterpart
    fn is_exempt(relative: &str) -> bool {
        relative == "main.rs" || relative == "lib.rs" || relative.ends_with("mod.rs")
    }

    fn collect_relative_paths(dir: &Path, base: &Path) -> io::Result<BTreeSet<String>> {
        let mut paths = BTreeSet::new();
        if !dir.is_dir() {
            return Ok(paths);
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(base)
                .map_err(|_| io::Error::other("Failed to strip prefix"))?
                .to_string_lossy()
                .to_string();

            if path.is_dir() {
                paths.insert(relative);
                paths.extend(collect_relative_paths(&path, base)?);
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                paths.insert(relative);
            }
        }

        Ok(paths)
    }

    fn both_trees() -> (BTreeSet<String>, BTreeSet<String>) {
        let src = Path::new(SRC_DIR);
        let unit = Path::new(UNIT_DIR);
        let src_paths = collect_relative_paths(src, src).unwrap_or_default();
        let unit_paths = collect_relative_paths(unit, unit).unwrap_or_default();
        assert!(!src_paths.is_empty(), "No sources found under {SRC_DIR}");
        (src_paths, unit_paths)
    }

    #[test]
    fn test_all_src_files_have_unit_tests() {
        let (src_paths, unit_paths) = both_trees();

        let missing: Vec<_> = src_paths
            .iter()
            .filter(|path| !is_exempt(path) && !unit_paths.contains(*path))
            .map(|path| format!("  - src/{path} -> {UNIT_DIR}/{path}"))
            .collect();

        assert!(
            missing.is_empty(),
            "The following src files/directories are missing unit test counterparts:\n{}",
            missing.join("\n")
        );
    }

    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let (src_paths, unit_paths) = both_trees();

        let orphaned: Vec<_> = unit_paths
            .iter()
            .filter(|path| !path.ends_with("mod.rs") && !src_paths.contains(*path))
            .map(|path| format!("  - {UNIT_DIR}/{path} -> src/{path} (missing)"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "The following unit test files/directories have no corresponding src files:\n{}",
            orphaned.join("\n")
        );
    }

    #[test]
    fn test_all_unit_modules_are_declared() {
        let unit = Path::new(UNIT_DIR);
        let (_, unit_paths) = both_trees();
        let mut undeclared = Vec::new();

        for relative in unit_paths.iter().filter(|path| !path.ends_with("mod.rs")) {
            let path = unit.join(relative);
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let parent_mod = path
                .parent()
                .map(|parent| parent.join("mod.rs"))
                .unwrap_or_default();
            let declared = fs::read_to_string(&parent_mod)
                .map(|content| content.lines().any(|line| line.trim() == format!("mod {name};")))
                .unwrap_or(false);

            if !declared {
                undeclared.push(format!("  - {} (in {})", relative, parent_mod.display()));
            }
        }

        assert!(
            undeclared.is_empty(),
            "The following unit test modules are never compiled:\n{}",
            undeclared.join("\n")
        );
    }

    #[test]
    fn test_all_test_files_contain_tests() {
        let tests_dir = Path::new("tests");
        let mut files_without_tests = Vec::new();

        check_test_files(tests_dir, &mut files_without_tests)
            .unwrap_or_else(|error| unreachable!("Failed to scan tests directory: {error}"));

        assert!(
            files_without_tests.is_empty(),
            "The following test files don't contain any #[test] functions:\n{}",
            files_without_tests.join("\n")
        );
    }

    fn check_test_files(dir: &Path, files_without_tests: &mut Vec<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            if path.is_dir() {
                check_test_files(&path, files_without_tests)?;
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs")
                && path.file_name().and_then(|name| name.to_str()) != Some("mod.rs")
                && !fs::read_to_string(&path)?.contains("#[test]")
            {
                files_without_tests.push(format!("  - {}", path.display()));
            }
        }

        Ok(())
    }
}
