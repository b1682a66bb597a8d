use assert_fs::TempDir;
use depot::areas::registry::PackageLookup;
use depot::areas::store::Store;
use depot::artifacts::manifest::RootNode;
use depot::artifacts::object_id::ObjectHash;
use depot::errors::StoreError;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;
use common::{contents_of, generated_payload, open_store, put_objects, store_path, store_root};

#[rstest]
fn installed_package_round_trips(store_root: TempDir) {
    let store = open_store(&store_root);
    let hashes = put_objects(&store, &[b"cold front", b"warm front"]);
    let contents = contents_of(&[("mon", &hashes[0]), ("tue", &hashes[1])]);

    let installed = store
        .install_package(None, "alice", "weather", contents.clone())
        .expect("install should succeed");

    let loaded = store
        .get_package(None, "alice", "weather")
        .expect("lookup should succeed")
        .expect("package should exist");

    assert_eq!(loaded.contents(), &contents);
    assert_eq!(loaded.instance_hash(), installed.instance_hash());
    assert_eq!(loaded.object_hashes(), installed.object_hashes());
    assert_eq!(loaded.path(), store.package_path(None, "alice", "weather"));
    assert_eq!(loaded.store().path(), store.path());
}

#[rstest]
fn object_path_is_a_pure_function_of_the_hash(store_root: TempDir) {
    let store = open_store(&store_root);
    let hash = ObjectHash::of_bytes(&generated_payload());

    let before = store.object_path(&hash);

    // mutate the store in between
    store.create_dirs().expect("create_dirs should succeed");
    store
        .install_package(None, "alice", "weather", RootNode::default())
        .expect("install should succeed");

    assert_eq!(before, store.object_path(&hash));
    assert!(before.starts_with(store.object_dir()));

    // the rest of the layout is just as deterministic
    assert_eq!(
        store.temporary_object_path("staged"),
        store.temporary_object_path("staged")
    );
    assert_eq!(store.cache_path("index"), store.cache_path("index"));
    assert_eq!(
        store.package_path(None, "alice", "weather"),
        store.package_path(Some("base"), "alice", "weather")
    );
}

#[rstest]
fn republishing_a_hash_is_idempotent(store_root: TempDir) {
    let store = open_store(&store_root);
    store.create_dirs().expect("create_dirs should succeed");
    let data = b"same bytes";

    let first = store.objects().put(data).expect("first publish");

    // publish the same bytes again through the explicit staged workflow
    let staged = store.objects().stage(data).expect("staging");
    let hash = ObjectHash::of_bytes(data);
    store.objects().publish(&staged, &hash).expect("second publish");

    assert_eq!(first, hash);
    assert_eq!(
        std::fs::read(store.object_path(&hash)).expect("object file"),
        data
    );
    assert_eq!(store.objects().load(&hash).expect("readback"), &data[..]);

    // the staging area drains: renames leave nothing behind
    let staging_dir = store.temporary_object_path("probe");
    let staged_left = std::fs::read_dir(staging_dir.parent().unwrap())
        .expect("staging dir")
        .count();
    assert_eq!(staged_left, 0);
}

#[rstest]
fn missing_package_is_none_not_an_error(store_root: TempDir) {
    let store = open_store(&store_root);

    let found = store
        .get_package(None, "alice", "nowhere")
        .expect("lookup should not fail");

    assert!(found.is_none());
}

#[rstest]
fn malformed_manifest_reads_as_absent(store_root: TempDir) {
    let store = open_store(&store_root);
    store
        .install_package(None, "alice", "weather", RootNode::default())
        .expect("install should succeed");

    // corrupt every instance file of the package
    let contents_dir = store.package_path(None, "alice", "weather").join("contents");
    for entry in std::fs::read_dir(&contents_dir).expect("contents dir") {
        let entry = entry.expect("entry");
        std::fs::write(entry.path(), b"not a manifest").expect("corrupt instance");
    }

    let found = store
        .get_package(None, "alice", "weather")
        .expect("lookup should not fail");

    assert!(found.is_none());

    // the strict lookup still tells absence and corruption apart
    let lookup = store
        .lookup_package(None, "alice", "weather")
        .expect("lookup should not fail");
    assert!(matches!(lookup, PackageLookup::Malformed(_)));

    let lookup = store
        .lookup_package(None, "alice", "nowhere")
        .expect("lookup should not fail");
    assert!(matches!(lookup, PackageLookup::Missing));
}

#[rstest]
fn invalid_names_fail_fast_without_partial_writes(store_root: TempDir) {
    let store = open_store(&store_root);

    let error = store
        .install_package(None, "al ice", "weather", RootNode::default())
        .expect_err("invalid user name must fail");

    match error.downcast_ref::<StoreError>() {
        Some(StoreError::InvalidName { name }) => assert_eq!(name, "al ice"),
        other => panic!("expected InvalidName, got {other:?}"),
    }
    // validation ran before any directory was created
    assert!(!store.pkg_dir().exists());
}

#[rstest]
fn dry_run_create_touches_nothing(store_root: TempDir) {
    let store = open_store(&store_root);

    let package = store
        .create_package(None, "alice", "weather", true)
        .expect("dry run should succeed");

    assert!(package.contents().children.is_empty());
    assert!(!store.pkg_dir().exists());
}

#[rstest]
fn create_dirs_is_idempotent(store_root: TempDir) {
    let store = open_store(&store_root);

    store.create_dirs().expect("first create_dirs");
    store.create_dirs().expect("second create_dirs");

    assert!(store.object_dir().join("00").is_dir());
    assert!(store.object_dir().join("ff").is_dir());
    assert_eq!(
        std::fs::read_to_string(store.path().join(".format")).expect("version file"),
        "1.4"
    );
}

#[rstest]
fn store_root_must_carry_the_reserved_basename(store_root: TempDir) {
    let error =
        Store::open(&store_root.path().join("elsewhere")).expect_err("wrong basename must fail");

    assert!(matches!(
        error.downcast_ref::<StoreError>(),
        Some(StoreError::UnexpectedRoot { .. })
    ));

    // and the reserved basename opens fine
    assert!(Store::open(&store_path(&store_root)).is_ok());
}
