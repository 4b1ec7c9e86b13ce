//! Tests for the storage backends.

use super::*;
use crate::test_support::{doc, names};
use std::fs;
use tempfile::TempDir;

fn exercise_basic_operations(storage: &dyn Storage) {
    assert!(!storage.exists("system.site").unwrap());
    assert_eq!(storage.read("system.site").unwrap(), None);

    assert!(storage.write("system.site", &doc(&[("name", "Example")])).unwrap());
    assert!(storage.write("system.mail", &doc(&[("interface", "php")])).unwrap());
    assert!(storage.write("user.settings", &doc(&[("anonymous", "Guest")])).unwrap());

    assert!(storage.exists("system.site").unwrap());
    assert_eq!(
        storage.read("system.site").unwrap(),
        Some(doc(&[("name", "Example")]))
    );
    assert_eq!(
        storage.list_all("system.").unwrap(),
        names(&["system.mail", "system.site"])
    );

    let multiple = storage
        .read_multiple(&names(&["user.settings", "missing.name", "system.site"]))
        .unwrap();
    assert_eq!(
        multiple.keys().cloned().collect::<Vec<_>>(),
        names(&["system.site", "user.settings"])
    );

    assert!(storage.rename("system.mail", "system.mailer").unwrap());
    assert!(!storage.exists("system.mail").unwrap());
    assert!(storage.exists("system.mailer").unwrap());
    assert!(!storage.rename("system.mail", "system.other").unwrap());

    assert!(storage.delete("system.mailer").unwrap());
    assert!(!storage.delete("system.mailer").unwrap());

    assert!(storage.delete_all("system.").unwrap());
    assert_eq!(storage.list_all("").unwrap(), names(&["user.settings"]));
}

fn exercise_collections(storage: &dyn Storage) {
    storage.write("system.site", &doc(&[("name", "Example")])).unwrap();

    let german = storage.create_collection("language.de").unwrap();
    assert_eq!(german.get_collection_name(), "language.de");
    assert!(!german.exists("system.site").unwrap());

    german.write("system.site", &doc(&[("name", "Beispiel")])).unwrap();
    let french = storage.create_collection("language.fr").unwrap();
    french.write("system.site", &doc(&[("name", "Exemple")])).unwrap();

    assert_eq!(
        storage.read("system.site").unwrap(),
        Some(doc(&[("name", "Example")]))
    );
    assert_eq!(
        storage.get_all_collection_names().unwrap(),
        names(&["language.de", "language.fr"])
    );

    french.delete("system.site").unwrap();
    assert_eq!(
        storage.get_all_collection_names().unwrap(),
        names(&["language.de"])
    );
}

#[test]
fn test_memory_storage_basic_operations() {
    exercise_basic_operations(&MemoryStorage::new());
}

#[test]
fn test_memory_storage_collections() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get_collection_name(), DEFAULT_COLLECTION);
    exercise_collections(&storage);
}

#[test]
fn test_memory_collection_views_share_data() {
    let storage = MemoryStorage::new();
    let first = storage.create_collection("language.de").unwrap();
    let second = storage.create_collection("language.de").unwrap();

    first.write("system.site", &doc(&[("name", "Beispiel")])).unwrap();

    assert!(second.exists("system.site").unwrap());
}

#[test]
fn test_file_storage_basic_operations() {
    let temp_dir = TempDir::new().unwrap();
    exercise_basic_operations(&FileStorage::new(temp_dir.path()));
}

#[test]
fn test_file_storage_collections() {
    let temp_dir = TempDir::new().unwrap();
    exercise_collections(&FileStorage::new(temp_dir.path()));

    assert!(
        temp_dir
            .path()
            .join("language")
            .join("de")
            .join("system.site.yml")
            .is_file()
    );
}

#[test]
fn test_file_storage_layout_is_one_yaml_file_per_name() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileStorage::new(temp_dir.path());

    storage.write("system.site", &doc(&[("name", "Example")])).unwrap();

    let content = fs::read_to_string(temp_dir.path().join("system.site.yml")).unwrap();
    assert_eq!(content, "name: Example\n");
}

#[test]
fn test_file_storage_skips_hidden_and_foreign_files() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".system.site.yml.tmp"), "x: y\n").unwrap();
    fs::write(temp_dir.path().join("README.md"), "notes\n").unwrap();
    fs::write(temp_dir.path().join("system.site.yml"), "name: Example\n").unwrap();

    let storage = FileStorage::new(temp_dir.path());

    assert_eq!(storage.list_all("").unwrap(), names(&["system.site"]));
}

#[test]
fn test_file_storage_reports_corrupted_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("system.site.yml"), "name: [unclosed\n").unwrap();

    let err = FileStorage::new(temp_dir.path())
        .read("system.site")
        .unwrap_err();

    assert!(matches!(err, OverlayError::Serialization(_)));
    assert!(err.to_string().contains("system.site.yml"));
}

#[test]
fn test_file_storage_rejects_path_like_names() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileStorage::new(temp_dir.path());

    let err = storage
        .write("../escape", &doc(&[("name", "x")]))
        .unwrap_err();

    assert!(matches!(err, OverlayError::InvalidName(_)));
}

#[test]
fn test_file_storage_rejects_names_outside_root_for_every_operation() {
    let temp_dir = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("victim.yml"), "name: Victim\n").unwrap();
    let victim = outside.path().join("victim");
    let victim = victim.to_str().unwrap();

    let storage = FileStorage::new(temp_dir.path().join("store"));
    assert_eq!(storage.directory(), temp_dir.path().join("store"));

    for result in [
        storage.exists(victim).map(|_| ()),
        storage.read(victim).map(|_| ()),
        storage.delete(victim).map(|_| ()),
        storage.rename(victim, "system.site").map(|_| ()),
        storage.rename("system.site", victim).map(|_| ()),
    ] {
        assert!(matches!(result, Err(OverlayError::InvalidName(_))));
    }

    assert!(outside.path().join("victim.yml").is_file());
}

#[test]
fn test_file_storage_rejects_unsafe_collection_names() {
    let temp_dir = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    let storage = FileStorage::new(temp_dir.path());

    let escaping = format!("a.{}", outside.path().display());
    for collection in [escaping.as_str(), "a..b", ".a", "a.", "a.b\\c", "a b"] {
        let err = storage.create_collection(collection).err().unwrap();
        assert!(
            matches!(err, OverlayError::InvalidName(ref name) if name == collection),
            "collection {:?} should be rejected",
            collection
        );
    }

    assert_eq!(fs::read_dir(outside.path()).unwrap().count(), 0);
}

#[test]
fn test_file_storage_ignores_unaddressable_entries() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("system site.yml"), "name: x\n").unwrap();
    fs::create_dir_all(temp_dir.path().join("language code")).unwrap();
    fs::write(
        temp_dir.path().join("language code").join("system.site.yml"),
        "name: x\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("system.site.yml"), "name: Example\n").unwrap();

    let storage = FileStorage::new(temp_dir.path());

    assert_eq!(storage.list_all("").unwrap(), names(&["system.site"]));
    assert!(storage.get_all_collection_names().unwrap().is_empty());
    assert!(storage.delete_all("").unwrap());
}

#[test]
fn test_file_storage_missing_directory_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileStorage::new(temp_dir.path().join("not-yet-created"));

    assert!(storage.list_all("").unwrap().is_empty());
    assert!(storage.get_all_collection_names().unwrap().is_empty());
    assert_eq!(storage.read("system.site").unwrap(), None);
}

#[test]
fn test_read_only_storage_passes_reads_through() {
    let inner = MemoryStorage::with_documents([("system.site", doc(&[("name", "Example")]))]);
    let read_only = ReadOnlyStorage::new(Arc::new(inner));

    assert!(read_only.exists("system.site").unwrap());
    assert_eq!(
        read_only.read("system.site").unwrap(),
        Some(doc(&[("name", "Example")]))
    );
    assert_eq!(read_only.list_all("").unwrap(), names(&["system.site"]));
}

#[test]
fn test_read_only_storage_rejects_mutations() {
    let inner = Arc::new(MemoryStorage::with_documents([(
        "system.site",
        doc(&[("name", "Example")]),
    )]));
    let read_only = ReadOnlyStorage::new(inner.clone());

    assert!(matches!(
        read_only.write("system.site", &doc(&[])),
        Err(OverlayError::ReadOnly(_))
    ));
    assert!(matches!(
        read_only.delete("system.site"),
        Err(OverlayError::ReadOnly(_))
    ));
    assert!(matches!(
        read_only.rename("system.site", "system.other"),
        Err(OverlayError::ReadOnly(_))
    ));
    assert!(matches!(
        read_only.delete_all(""),
        Err(OverlayError::ReadOnly(_))
    ));

    let collection = read_only.create_collection("language.de").unwrap();
    assert!(matches!(
        collection.write("system.site", &doc(&[])),
        Err(OverlayError::ReadOnly(_))
    ));

    assert!(inner.exists("system.site").unwrap());
}

#[test]
fn test_decode_empty_input_is_empty_document() {
    assert!(decode_document("").unwrap().is_empty());
    assert!(decode_document("~\n").unwrap().is_empty());
}

#[test]
fn test_encode_is_sorted_by_key() {
    let data = doc(&[("zeta", "z"), ("alpha", "a")]);

    assert_eq!(encode_document(&data).unwrap(), "alpha: a\nzeta: z\n");
}

#[test]
fn test_validate_name() {
    assert!(validate_name("system.site").is_ok());
    assert!(validate_name("views.view.content").is_ok());
    assert!(validate_name("").is_err());
    assert!(validate_name("system:site").is_err());
    assert!(validate_name("system site").is_err());
    assert!(validate_name("a/b").is_err());
    assert!(validate_name(&"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
}
