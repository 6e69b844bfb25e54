use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Map an arbitrary user id to a safe file name like `tasks_<slug>.json`.
///
/// The slug is the lower-cased id with everything outside `[a-z0-9_-]` removed,
/// or `default` when nothing is left.
pub fn clean_filename(userid: &str) -> String {
    let slug: String = userid
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if slug.is_empty() {
        "tasks_default.json".to_string()
    } else {
        format!("tasks_{}.json", slug)
    }
}

/// Get path to a user's data file inside `data_dir`
pub fn user_file(data_dir: &Path, userid: &str) -> PathBuf {
    data_dir.join(clean_filename(userid))
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Create temp file in the same directory
    let mut temp_file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_filename() {
        assert_eq!(clean_filename("My User!! 42"), "tasks_myuser42.json");
        assert_eq!(clean_filename(""), "tasks_default.json");
        assert_eq!(clean_filename("!!! ###"), "tasks_default.json");
        assert_eq!(clean_filename("a_b-C"), "tasks_a_b-c.json");
        assert_eq!(clean_filename("../etc/passwd"), "tasks_etcpasswd.json");
    }

    #[test]
    fn test_user_file() {
        let path = user_file(Path::new("/data"), "Bob");
        assert_eq!(path, PathBuf::from("/data/tasks_bob.json"));
    }

    #[test]
    fn test_atomic_write_and_overwrite() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("test.json");

        atomic_write(&test_file, "first").unwrap();
        atomic_write(&test_file, "second").unwrap();

        let content = std::fs::read_to_string(&test_file).unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn test_atomic_write_missing_dir_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("missing").join("test.json");
        assert!(atomic_write(&test_file, "content").is_err());
    }

    proptest! {
        #[test]
        fn clean_filename_is_always_safe(id in ".*") {
            let name = clean_filename(&id);
            prop_assert!(name.starts_with("tasks_"));
            prop_assert!(name.ends_with(".json"));
            let slug = &name["tasks_".len()..name.len() - ".json".len()];
            prop_assert!(!slug.is_empty());
            prop_assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'));
        }
    }
}
