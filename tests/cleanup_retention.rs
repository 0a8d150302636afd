// Retention cleanup: keep the N most recent triplets plus the excepted name.


use std::thread::sleep;
use std::time::Duration;

use pathoscore::storage::DataDirs;
use test_helpers::{scratch_dir, write_gray_png};

fn seed_triplet(dirs: &DataDirs, stem: &str) {
    write_gray_png(&dirs.images, &format!("{stem}.png"), 16, 16);
    std::fs::write(dirs.annotation_path(stem), "X,Y,Label\n").unwrap();
    std::fs::write(dirs.report_path(stem), "Annotation report\n").unwrap();
}

/// Five images with distinct modification times, oldest first.
fn seed_five(dirs: &DataDirs) -> Vec<String> {
    let stems: Vec<String> = (1..=5).map(|i| format!("slide_{i:02}")).collect();
    for stem in &stems {
        seed_triplet(dirs, stem);
        // Distinct mtimes; recency ordering is what cleanup sorts on
        sleep(Duration::from_millis(30));
    }
    stems
}

#[test]
fn keeps_only_the_two_most_recent_triplets() {
    let root = scratch_dir("retention");
    let dirs = DataDirs::at(root.join("data"));
    dirs.bootstrap().unwrap();
    let stems = seed_five(&dirs);

    dirs.cleanup_previous(None, 2).unwrap();

    for stem in &stems[..3] {
        assert!(!dirs.image_path(&format!("{stem}.png")).exists(), "{stem}");
        assert!(!dirs.annotation_path(stem).exists(), "{stem}");
        assert!(!dirs.report_path(stem).exists(), "{stem}");
    }
    for stem in &stems[3..] {
        assert!(dirs.image_path(&format!("{stem}.png")).is_file(), "{stem}");
        assert!(dirs.annotation_path(stem).is_file(), "{stem}");
        assert!(dirs.report_path(stem).is_file(), "{stem}");
    }
}

#[test]
fn excepted_base_name_survives_even_when_old() {
    let root = scratch_dir("except");
    let dirs = DataDirs::at(root.join("data"));
    dirs.bootstrap().unwrap();
    let stems = seed_five(&dirs);
    let oldest = &stems[0];

    dirs.cleanup_previous(Some("slide_01.png"), 2).unwrap();

    assert!(dirs.image_path(&format!("{oldest}.png")).is_file());
    assert!(dirs.annotation_path(oldest).is_file());
    assert!(dirs.report_path(oldest).is_file());
    // The other stale ones are still gone
    assert!(!dirs.image_path("slide_02.png").exists());
    assert!(!dirs.image_path("slide_03.png").exists());
}

#[test]
fn rerunning_on_a_clean_directory_deletes_nothing() {
    let root = scratch_dir("idempotent");
    let dirs = DataDirs::at(root.join("data"));
    dirs.bootstrap().unwrap();
    seed_five(&dirs);

    let first = dirs.cleanup_previous(None, 2).unwrap();
    let second = dirs.cleanup_previous(None, 2).unwrap();

    assert!(first > 0);
    assert_eq!(second, 0);
}

#[test]
fn empty_directories_are_fine() {
    let root = scratch_dir("empty");
    let dirs = DataDirs::at(root.join("data"));
    dirs.bootstrap().unwrap();

    assert_eq!(dirs.cleanup_previous(None, 2).unwrap(), 0);
}

#[test]
fn unrelated_extensions_in_companion_dirs_are_untouched() {
    let root = scratch_dir("extensions");
    let dirs = DataDirs::at(root.join("data"));
    dirs.bootstrap().unwrap();
    seed_five(&dirs);
    // A stray non-CSV file in the annotations dir is not cleanup's business
    let stray = dirs.annotations.join("notes.md");
    std::fs::write(&stray, "keep me").unwrap();

    dirs.cleanup_previous(None, 1).unwrap();

    assert!(stray.is_file());
}
