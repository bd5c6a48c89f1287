// SPDX-License-Identifier: Apache-2.0

use bijux_labeler_model::{ConflictPolicy, ImageName, LabelName, ProjectName};
use bijux_labeler_store::{FsProjectStore, ProjectStore, UploadFile};
use proptest::prelude::*;
use proptest::test_runner::Config;
use tempfile::tempdir;

fn seed(store: &FsProjectStore, p: &ProjectName, label: &str, files: &[&str]) {
    let l = LabelName::new(label).expect("label");
    store.create_label(p, &l).expect("create label");
    let uploads = files
        .iter()
        .map(|f| UploadFile::new(ImageName::new(*f).expect("image"), b"img".to_vec()))
        .collect();
    store.upload_images(p, &l, uploads).expect("upload");
}

#[test]
fn picks_first_label_then_first_image() {
    let dir = tempdir().expect("tempdir");
    let store = FsProjectStore::open(dir.path(), ConflictPolicy::Reject).expect("open");
    let p = ProjectName::new("cats").expect("project");
    store.create_project(&p).expect("project");
    seed(&store, &p, "b", &["0.png"]);
    seed(&store, &p, "a", &["z.png", "m.png", "c.png"]);
    seed(&store, &p, "c", &["a.png"]);

    let thumb = store.select_thumbnail(&p).expect("select").expect("thumbnail");
    assert_eq!(thumb.label.as_str(), "a");
    assert_eq!(thumb.image.as_str(), "c.png");
}

#[test]
fn empty_first_label_yields_no_thumbnail() {
    let dir = tempdir().expect("tempdir");
    let store = FsProjectStore::open(dir.path(), ConflictPolicy::Reject).expect("open");
    let p = ProjectName::new("cats").expect("project");
    store.create_project(&p).expect("project");
    seed(&store, &p, "a", &[]);
    seed(&store, &p, "z", &["1.png"]);

    assert_eq!(store.select_thumbnail(&p).expect("select"), None);
}

#[test]
fn project_without_labels_has_no_thumbnail() {
    let dir = tempdir().expect("tempdir");
    let store = FsProjectStore::open(dir.path(), ConflictPolicy::Reject).expect("open");
    let p = ProjectName::new("empty").expect("project");
    store.create_project(&p).expect("project");
    assert_eq!(store.select_thumbnail(&p).expect("select"), None);
}

#[cfg(unix)]
#[test]
fn undecodable_label_names_are_skipped_like_in_listings() {
    let dir = tempdir().expect("tempdir");
    let store = FsProjectStore::open(dir.path(), ConflictPolicy::Reject).expect("open");
    let p = ProjectName::new("dogs").expect("project");
    store.create_project(&p).expect("project");
    seed(&store, &p, "pug", &["p.png"]);
    std::fs::create_dir(dir.path().join("projects/dogs/a\\b")).expect("raw label");

    let labels = store.list_labels(&p).expect("labels");
    assert_eq!(labels.len(), 1);
    let thumb = store.select_thumbnail(&p).expect("select").expect("thumbnail");
    assert_eq!(thumb.label.as_str(), "pug");
    assert_eq!(thumb.image.as_str(), "p.png");
}

proptest! {
    #![proptest_config(Config::with_cases(24))]
    #[test]
    fn thumbnail_is_minimum_label_and_minimum_image(
        labels in prop::collection::btree_set("[a-z0-9]{1,6}", 1..5),
        images in prop::collection::btree_set("[a-z0-9]{1,6}\\.png", 1..5),
    ) {
        let dir = tempdir().expect("tempdir");
        let store = FsProjectStore::open(dir.path(), ConflictPolicy::Reject).expect("open");
        let p = ProjectName::new("prop").expect("project");
        store.create_project(&p).expect("project");
        let image_refs: Vec<&str> = images.iter().map(String::as_str).collect();
        for label in labels.iter().rev() {
            seed(&store, &p, label, &image_refs);
        }
        let thumb = store.select_thumbnail(&p).expect("select").expect("thumbnail");
        prop_assert_eq!(thumb.label.as_str(), labels.iter().next().expect("min label").as_str());
        prop_assert_eq!(thumb.image.as_str(), images.iter().next().expect("min image").as_str());
    }
}
