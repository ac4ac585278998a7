use super::*;
use std::fs;
use tempfile::tempdir;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "migrations: []\n").unwrap();
}

#[test]
fn test_is_migration_file() {
    assert!(is_migration_file(Path::new("a.yml")));
    assert!(is_migration_file(Path::new("dir/b.yaml")));
    assert!(!is_migration_file(Path::new("c.sql")));
    assert!(!is_migration_file(Path::new("yml")));
}

#[test]
fn test_single_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("one.yml");
    touch(&file);

    let files = discover_migration_files(&file, false).unwrap();
    assert_eq!(files, vec![file]);
}

#[test]
fn test_single_non_yaml_file_is_skipped() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("one.sql");
    touch(&file);

    assert!(discover_migration_files(&file, false).unwrap().is_empty());
}

#[test]
fn test_directory_without_recursive_runs_nothing() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("one.yml"));

    assert!(discover_migration_files(dir.path(), false)
        .unwrap()
        .is_empty());
}

#[test]
fn test_recursive_walk_is_sorted_and_filtered() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("b.yml"));
    touch(&root.join("a.yaml"));
    touch(&root.join("notes.txt"));
    touch(&root.join("sql/fix.sql"));
    touch(&root.join("nested/c.yml"));

    let files = discover_migration_files(root, true).unwrap();
    assert_eq!(
        files,
        vec![root.join("a.yaml"), root.join("b.yml"), root.join("nested/c.yml")]
    );
}

#[test]
fn test_missing_path() {
    let dir = tempdir().unwrap();
    let err = discover_migration_files(&dir.path().join("nope"), true).unwrap_err();
    assert!(matches!(err, CoreError::PathNotFound { .. }));
}
