use assets::output::ManifestSink;
use assets::{AssetRecord, AssetsBuilder, AssetsError, AssetsOptions, catalog, catalog_to};
use std::fs;
use std::io;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use tempfile::tempdir;

fn run(options: &AssetsOptions) -> (String, Vec<AssetRecord>) {
    let (_, out) = catalog_to(options, Vec::<u8>::new()).unwrap();
    let text = String::from_utf8(out).unwrap();
    let records = serde_json::from_str(&text).unwrap();
    (text, records)
}

fn find<'a>(records: &'a [AssetRecord], key: &str) -> &'a AssetRecord {
    records
        .iter()
        .find(|r| r.key == key)
        .unwrap_or_else(|| panic!("no record for {}", key))
}

fn canonical_dir(path: &Path) -> String {
    format!("{}{}", fs::canonicalize(path).unwrap().display(), MAIN_SEPARATOR)
}

fn sample_tree() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.png"), vec![7u8; 500]).unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/b.txt"), "0123456789").unwrap();
    dir
}

#[test]
fn test_empty_tree_is_empty_array() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    let options = AssetsBuilder::new(dir.path()).build();
    let (text, records) = run(&options);
    assert_eq!(text, "[]");
    assert!(records.is_empty());
}

#[test]
fn test_base64_threshold_scenario() {
    let dir = sample_tree();
    let options = AssetsBuilder::new(dir.path()).base64_threshold(100).build();
    let (text, records) = run(&options);
    assert_eq!(records.len(), 2);
    assert!(!text.contains(",]"));

    let a = find(&records, "a");
    assert_eq!(a.filename, "a.png");
    assert_eq!(a.extension, "png");
    assert!(a.base64_payload.is_none());
    assert_eq!(a.directory, canonical_dir(dir.path()));
    assert_eq!(a.content_hash.len(), 32);

    let b = find(&records, "b");
    assert_eq!(b.base64_payload.as_deref(), Some("MDEyMzQ1Njc4OQ=="));
    assert_eq!(b.content_hash, "781e5e245d69b566979b86e28d23f2c7");
    assert_eq!(b.directory, canonical_dir(&dir.path().join("sub")));
}

#[test]
fn test_threshold_boundary() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("exact.bin"), vec![1u8; 64]).unwrap();
    fs::write(dir.path().join("over.bin"), vec![1u8; 65]).unwrap();
    let options = AssetsBuilder::new(dir.path()).base64_threshold(64).build();
    let (_, records) = run(&options);
    assert!(find(&records, "exact").base64_payload.is_some());
    assert!(find(&records, "over").base64_payload.is_none());
}

#[test]
fn test_cachebust_scenario() {
    let dir = sample_tree();
    let options = AssetsBuilder::new(dir.path())
        .cachebust(true)
        .base64_threshold(100)
        .build();
    let (summary, out) = catalog_to(&options, Vec::<u8>::new()).unwrap();
    let records: Vec<AssetRecord> = serde_json::from_slice(&out).unwrap();
    assert_eq!(summary.files, 2);
    assert_eq!(summary.renamed, 2);
    assert_eq!(summary.encoded, 1);

    let b = find(&records, "b");
    assert_eq!(b.filename, "b.781e5e245d69b566979b86e28d23f2c7.txt");
    assert!(!dir.path().join("sub/b.txt").exists());
    assert!(dir.path().join("sub").join(&b.filename).exists());

    let a = find(&records, "a");
    assert_eq!(a.filename, format!("a.{}.png", a.content_hash));
    assert!(!dir.path().join("a.png").exists());
    assert!(dir.path().join(&a.filename).exists());
}

/// Checks, at the moment each record is written, that the file it names is
/// already on disk under that name.
#[derive(Default)]
struct ExistenceCheckingSink {
    text: String,
    checked: usize,
}

impl ManifestSink for ExistenceCheckingSink {
    fn append(&mut self, chunk: &str) -> io::Result<()> {
        let body = chunk.trim_start_matches(',');
        if body.starts_with('{') {
            let record: AssetRecord = serde_json::from_str(body).map_err(io::Error::other)?;
            let on_disk = PathBuf::from(format!("{}{}", record.directory, record.filename));
            assert!(on_disk.exists(), "{} not renamed yet", on_disk.display());
            self.checked += 1;
        }
        self.text.push_str(chunk);
        Ok(())
    }

    fn describe(&self) -> String {
        "<checking>".into()
    }
}

#[test]
fn test_rename_happens_before_record_is_written() {
    let dir = sample_tree();
    let options = AssetsBuilder::new(dir.path()).cachebust(true).build();
    let (_, sink) = catalog_to(&options, ExistenceCheckingSink::default()).unwrap();
    assert_eq!(sink.checked, 2);
    assert!(sink.text.starts_with('[') && sink.text.ends_with(']'));
}

#[test]
fn test_ignore_list_skips_subtree() {
    let dir = sample_tree();
    fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
    fs::write(dir.path().join("node_modules/pkg/index.js"), "x").unwrap();
    fs::write(dir.path().join("testing.css"), "x").unwrap();
    let options = AssetsBuilder::new(dir.path())
        .ignore(vec!["node_modules,sub".into(), "test".into()])
        .build();
    let (_, records) = run(&options);
    let mut keys: Vec<_> = records.iter().map(|r| r.key.as_str()).collect();
    keys.sort();
    assert_eq!(keys, vec!["a", "testing"]);
}

#[test]
fn test_hidden_files_are_catalogued() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".gitignore"), "target\n").unwrap();
    let options = AssetsBuilder::new(dir.path()).build();
    let (_, records) = run(&options);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].key, ".gitignore");
    assert_eq!(records[0].extension, "");
}

#[test]
fn test_missing_root_is_fatal() {
    let dir = tempdir().unwrap();
    let options = AssetsBuilder::new(dir.path().join("nope")).build();
    let err = catalog_to(&options, Vec::<u8>::new()).unwrap_err();
    assert!(matches!(err, AssetsError::DirectoryOpen { .. }));
    assert!(err.to_string().starts_with("Could not open the following path:\n"));
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_is_skipped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("real.txt"), "x").unwrap();
    std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("broken")).unwrap();
    let options = AssetsBuilder::new(dir.path()).build();
    let (_, records) = run(&options);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].filename, "real.txt");
}

#[cfg(unix)]
#[test]
fn test_symlinked_file_is_followed() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("real.txt"), "x").unwrap();
    std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("alias.txt")).unwrap();
    let options = AssetsBuilder::new(dir.path()).build();
    let (_, records) = run(&options);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].content_hash, records[1].content_hash);
}

#[test]
fn test_output_file_is_recreated_and_excluded() {
    let dir = sample_tree();
    let manifest = dir.path().join("assets.json");
    fs::write(&manifest, "old manifest contents").unwrap();
    let options = AssetsBuilder::new(dir.path())
        .output(Some(manifest.clone()))
        .cachebust(true)
        .build();
    let summary = catalog(options).unwrap();
    assert_eq!(summary.files, 2);
    assert!(manifest.exists());

    let text = fs::read_to_string(&manifest).unwrap();
    let records: Vec<AssetRecord> = serde_json::from_str(&text).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.key != "assets"));
}

#[cfg(unix)]
#[test]
fn test_ignored_unreadable_entries_are_skipped() {
    let dir = sample_tree();
    std::os::unix::fs::symlink("loop", dir.path().join("loop")).unwrap();
    std::os::unix::fs::symlink(dir.path(), dir.path().join("sub/up")).unwrap();
    let options = AssetsBuilder::new(dir.path())
        .ignore(vec!["loop,up".into()])
        .build();
    let (_, records) = run(&options);
    let mut keys: Vec<_> = records.iter().map(|r| r.key.as_str()).collect();
    keys.sort();
    assert_eq!(keys, vec!["a", "b"]);
}

#[cfg(unix)]
#[test]
fn test_unreadable_entry_is_fatal() {
    let dir = sample_tree();
    std::os::unix::fs::symlink("self", dir.path().join("sub/self")).unwrap();
    let options = AssetsBuilder::new(dir.path()).build();
    let err = catalog_to(&options, Vec::<u8>::new()).unwrap_err();
    assert!(matches!(err, AssetsError::Metadata { .. }));
    assert!(err.is_fatal());
    let expected = fs::canonicalize(dir.path()).unwrap().join("sub/self");
    assert_eq!(
        err.to_string(),
        format!("Could not get any information on this file:\n{}", expected.display())
    );
}
