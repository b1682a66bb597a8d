use assert_fs::TempDir;
use depot::areas::store::{PACKAGE_DIR_NAME, Store};
use depot::config::StoreConfig;
use depot::errors::StoreError;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;
use common::{contents_of, put_objects, store_root};

fn two_roots(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    (
        dir.path().join("primary").join(PACKAGE_DIR_NAME),
        dir.path().join("extra").join(PACKAGE_DIR_NAME),
    )
}

fn install_in(root: &std::path::Path, user: &str, package: &str, payload: &[u8]) {
    let store = Store::open(root).expect("open store");
    let hashes = put_objects(&store, &[payload]);
    store
        .install_package(None, user, package, contents_of(&[("data", &hashes[0])]))
        .expect("install");
}

#[rstest]
fn package_is_found_in_a_later_root(store_root: TempDir) {
    let (primary, extra) = two_roots(&store_root);
    install_in(&extra, "alice", "weather", b"extra root");
    let config = StoreConfig::new(primary, vec![extra.clone()]);

    let found = Store::locate_package(&config, None, "alice", "weather")
        .expect("lookup")
        .expect("package exists somewhere");

    assert_eq!(found.path(), extra.as_path());
}

#[rstest]
fn the_first_root_containing_the_package_wins(store_root: TempDir) {
    let (primary, extra) = two_roots(&store_root);
    install_in(&primary, "alice", "weather", b"primary copy");
    install_in(&extra, "alice", "weather", b"extra copy");
    let config = StoreConfig::new(primary.clone(), vec![extra]);

    let found = Store::locate_package(&config, None, "alice", "weather")
        .expect("lookup")
        .expect("package exists somewhere");

    assert_eq!(found.path(), primary.as_path());
}

#[rstest]
fn absent_everywhere_is_none(store_root: TempDir) {
    let (primary, extra) = two_roots(&store_root);
    let config = StoreConfig::new(primary, vec![extra]);

    let found = Store::locate_package(&config, None, "alice", "weather").expect("lookup");

    assert!(found.is_none());
}

#[rstest]
fn invalid_names_fail_before_any_root_is_consulted(store_root: TempDir) {
    let (primary, extra) = two_roots(&store_root);
    let config = StoreConfig::new(primary, vec![extra]);

    let error = Store::locate_package(&config, Some("ac me"), "alice", "weather")
        .expect_err("invalid team name must fail");

    assert!(matches!(
        error.downcast_ref::<StoreError>(),
        Some(StoreError::InvalidName { .. })
    ));
}
