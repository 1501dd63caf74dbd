//! Render, compress and store: the save workflow end to end.

use super::test_harness::{encode, gradient_photo, sample_context, skip, test_engine};
use image::{GenericImageView, ImageFormat};
use photomark::storage::{FsPhotoStore, PhotoStore, PhotoUpload};
use photomark::watermark::{compress_jpeg, OutputFormat, StyleCatalog};

#[tokio::test]
async fn test_rendered_photo_is_compressed_and_stored() {
    let Some(engine) = test_engine() else {
        return skip("test_rendered_photo_is_compressed_and_stored");
    };
    let input = encode(&gradient_photo(640, 480), ImageFormat::Png);
    let style = StyleCatalog::builtin().get("professional");
    let ctx = sample_context();

    let rendered = engine
        .render_bytes(&input, &ctx, &style, OutputFormat::Png, 90)
        .await
        .unwrap();
    let compressed = compress_jpeg(&rendered.encoded.data, 70).unwrap();
    assert_eq!(compressed.format, OutputFormat::Jpeg);

    let dir = tempfile::tempdir().unwrap();
    let store = FsPhotoStore::open(dir.path()).await.unwrap();
    let user_id = ctx.user_name().unwrap();
    let stored = store
        .save(PhotoUpload::new(user_id, compressed.data.clone()))
        .await
        .unwrap();
    store.close().await;

    assert_eq!(stored.size_bytes, compressed.len() as u64);
    assert_eq!(stored.metadata.user_id, "Alice");

    let path = stored
        .metadata
        .file_url
        .strip_prefix("file://")
        .unwrap()
        .to_string();
    let saved = image::load_from_memory(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!(saved.dimensions(), (640, 480));
}

#[tokio::test]
async fn test_store_reopens_with_existing_records() {
    let dir = tempfile::tempdir().unwrap();

    let store = FsPhotoStore::open(dir.path()).await.unwrap();
    store
        .save(PhotoUpload::new("alice", vec![0u8; 16]).with_image_name("a.jpg"))
        .await
        .unwrap();
    store.close().await;

    let reopened = FsPhotoStore::open(dir.path()).await.unwrap();
    let photos = reopened.list("alice").await.unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].image_name, "a.jpg");
    reopened.close().await;
}

#[tokio::test]
async fn test_concurrent_saves_all_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let store = std::sync::Arc::new(FsPhotoStore::open(dir.path()).await.unwrap());

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .save(PhotoUpload::new("crew", vec![i as u8; 8]).with_image_name(format!("{}.jpg", i)))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.list("crew").await.unwrap().len(), 8);
}
