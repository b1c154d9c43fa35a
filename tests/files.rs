//! Integration tests for file listings.

use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use odds::files::{SortOrder, list_files, list_files_by_mtime};

fn touch(path: &Path, contents: &str, mtime: u64) {
    fs::write(path, contents).unwrap();
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(mtime))
        .unwrap();
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("b.log"), "bbbb", 2_000);
    touch(&dir.path().join("a.txt"), "a", 1_000);
    touch(&dir.path().join("c.LOG"), "cc", 3_000);
    fs::create_dir(dir.path().join("nested")).unwrap();
    touch(&dir.path().join("nested").join("d.log"), "ddd", 1_500);
    dir
}

fn names(paths: impl IntoIterator<Item = std::path::PathBuf>) -> Vec<String> {
    paths
        .into_iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn lists_only_top_level_files_without_recursion() {
    let dir = fixture();
    let mut found = names(list_files(dir.path(), false, None).into_iter().map(|r| r.path));
    found.sort();
    assert_eq!(found, vec!["a.txt", "b.log", "c.LOG"]);
}

#[test]
fn recursion_includes_nested_files() {
    let dir = fixture();
    let mut found = names(list_files(dir.path(), true, None).into_iter().map(|r| r.path));
    found.sort();
    assert_eq!(found, vec!["a.txt", "b.log", "c.LOG", "d.log"]);
}

#[test]
fn extension_filter_is_case_insensitive() {
    let dir = fixture();
    let mut found = names(
        list_files(dir.path(), true, Some(&["log"][..]))
            .into_iter()
            .map(|r| r.path),
    );
    found.sort();
    assert_eq!(found, vec!["b.log", "c.LOG", "d.log"]);
}

#[test]
fn records_carry_size_and_times() {
    let dir = fixture();
    let records = list_files(dir.path(), false, Some(&["txt"][..]));
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.size, 1);
    assert_eq!(record.modified, 1_000);
    assert_eq!(record.permissions.len(), 4);
    assert_eq!(record.permissions, format!("{:04o}", record.mode));
}

#[cfg(unix)]
#[test]
fn records_report_permission_bits() {
    use std::os::unix::fs::PermissionsExt;

    let dir = fixture();
    let path = dir.path().join("a.txt");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

    let records = list_files(dir.path(), false, Some(&["txt"][..]));
    assert_eq!(records[0].mode, 0o640);
    assert_eq!(records[0].permissions, "0640");
}

#[cfg(unix)]
#[test]
fn symlinks_are_ignored() {
    let dir = fixture();
    std::os::unix::fs::symlink(dir.path().join("a.txt"), dir.path().join("link.txt")).unwrap();

    let found = names(
        list_files(dir.path(), false, Some(&["txt"][..]))
            .into_iter()
            .map(|r| r.path),
    );
    assert_eq!(found, vec!["a.txt"]);
}

#[test]
fn missing_directory_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone");
    assert!(list_files(&missing, true, None).is_empty());
    assert!(list_files_by_mtime(&missing, true, None, SortOrder::Ascending).is_empty());
}

#[test]
fn file_path_instead_of_directory_yields_nothing() {
    let dir = fixture();
    assert!(list_files(&dir.path().join("a.txt"), false, None).is_empty());
}

#[test]
fn orders_by_modification_time() {
    let dir = fixture();

    let ascending = list_files_by_mtime(dir.path(), true, None, SortOrder::Ascending);
    assert_eq!(
        names(ascending.iter().map(|f| f.path.clone())),
        vec!["a.txt", "d.log", "b.log", "c.LOG"]
    );
    assert_eq!(
        ascending.iter().map(|f| f.modified).collect::<Vec<_>>(),
        vec![1_000, 1_500, 2_000, 3_000]
    );

    let descending = list_files_by_mtime(dir.path(), true, None, SortOrder::Descending);
    assert_eq!(
        names(descending.into_iter().map(|f| f.path)),
        vec!["c.LOG", "b.log", "d.log", "a.txt"]
    );
}

#[test]
fn equal_times_are_ordered_by_path() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("y"), "", 500);
    touch(&dir.path().join("x"), "", 500);

    let found = list_files_by_mtime(dir.path(), false, None, SortOrder::Ascending);
    assert_eq!(names(found.into_iter().map(|f| f.path)), vec!["x", "y"]);
}
