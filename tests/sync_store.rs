// Folder-backed remote store: buckets, grouping, promotion, metadata.


use pathoscore::AnnotateError;
use pathoscore::sync::{Bucket, FolderStore, RemoteStore};
use test_helpers::scratch_dir;

fn seed(root: &std::path::Path, bucket: Bucket, name: &str) {
    let path = root.join(bucket.folder_name()).join(name);
    std::fs::write(path, b"contents").unwrap();
}

#[test]
fn open_creates_the_bucket_folders() {
    let root = scratch_dir("sync-open");
    FolderStore::open(&root).unwrap();

    for bucket in Bucket::ALL {
        assert!(root.join(bucket.folder_name()).is_dir());
    }
}

#[test]
fn list_returns_sorted_file_names_per_bucket() {
    let root = scratch_dir("sync-list");
    let store = FolderStore::open(&root).unwrap();
    seed(&root, Bucket::Todo, "b.csv");
    seed(&root, Bucket::Todo, "a.png");
    seed(&root, Bucket::Done, "c.png");

    assert_eq!(store.list(Bucket::Todo).unwrap(), vec!["a.png", "b.csv"]);
    assert_eq!(store.list(Bucket::Done).unwrap(), vec!["c.png"]);
    assert!(store.list(Bucket::InReview).unwrap().is_empty());
}

#[test]
fn grouped_clusters_companions_by_base_name() {
    let root = scratch_dir("sync-grouped");
    let store = FolderStore::open(&root).unwrap();
    seed(&root, Bucket::Todo, "slide_01.png");
    seed(&root, Bucket::Todo, "slide_01.csv");
    seed(&root, Bucket::Todo, "slide_02.png");

    let groups = store.grouped(Bucket::Todo).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(
        groups["slide_01"],
        vec!["slide_01.csv".to_string(), "slide_01.png".to_string()]
    );
    assert_eq!(groups["slide_02"], vec!["slide_02.png".to_string()]);
}

#[test]
fn upload_then_download_round_trips() {
    let root = scratch_dir("sync-updown");
    let store = FolderStore::open(root.join("remote")).unwrap();

    let local = root.join("slide_01.csv");
    std::fs::write(&local, "X,Y,Label\n1,2,Ausente\n").unwrap();
    store.upload(Bucket::Todo, &local).unwrap();

    let fetched = root.join("fetched").join("slide_01.csv");
    store
        .download(Bucket::Todo, "slide_01.csv", &fetched)
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&fetched).unwrap(),
        "X,Y,Label\n1,2,Ausente\n"
    );
}

#[test]
fn promote_moves_a_file_between_buckets() {
    let root = scratch_dir("sync-promote");
    let store = FolderStore::open(&root).unwrap();
    seed(&root, Bucket::Todo, "slide_01.png");

    store
        .promote("slide_01.png", Bucket::Todo, Bucket::InReview)
        .unwrap();

    assert!(store.list(Bucket::Todo).unwrap().is_empty());
    assert_eq!(
        store.list(Bucket::InReview).unwrap(),
        vec!["slide_01.png"]
    );
}

#[test]
fn missing_files_are_reported_by_name() {
    let root = scratch_dir("sync-missing");
    let store = FolderStore::open(&root).unwrap();

    let err = store
        .download(Bucket::Todo, "ghost.png", &root.join("out.png"))
        .unwrap_err();

    assert!(matches!(err, AnnotateError::RemoteFileMissing(name) if name == "ghost.png"));
}

#[test]
fn metadata_reports_the_configured_offset() {
    let root = scratch_dir("sync-meta");
    let offset = chrono::FixedOffset::east_opt(-3 * 3600).unwrap();
    let store = FolderStore::open_with_offset(&root, offset).unwrap();
    seed(&root, Bucket::Done, "slide_01.png");

    let meta = store.metadata(Bucket::Done, "slide_01.png").unwrap();

    assert_eq!(meta.last_editor, "local");
    assert_eq!(meta.modified.offset(), &offset);
}
