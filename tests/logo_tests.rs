//! Logo uploads from disk.
//!
//! Run with: `cargo test --features async --test logo_tests`

#![cfg(feature = "async")]

use std::path::PathBuf;

use tabfaktura::core::logo::read_logo;
use tabfaktura::core::*;

fn png_1x1() -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR".to_vec();
    bytes.extend_from_slice(&1u32.to_be_bytes());
    bytes.extend_from_slice(&1u32.to_be_bytes());
    bytes.extend_from_slice(&[8, 2, 0, 0, 0, 0, 0, 0, 0]);
    bytes
}

async fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tabfaktura-{}-{name}", std::process::id()));
    tokio::fs::write(&path, contents).await.unwrap();
    path
}

#[tokio::test]
async fn upload_from_file() {
    let path = temp_file("logo.png", &png_1x1()).await;
    let shared = SharedSession::default();

    assert!(shared.upload_logo(&path).await.unwrap());
    let snap = shared.snapshot().unwrap();
    let logo = snap.logo().unwrap();
    assert_eq!(logo.format(), ImageFormat::Png);
    assert_eq!(logo.dimensions(), Some((1, 1)));
    assert!(logo.to_data_url().starts_with("data:image/png;base64,"));

    tokio::fs::remove_file(path).await.unwrap();
}

#[tokio::test]
async fn missing_file_keeps_session_usable() {
    let shared = SharedSession::default();
    let err = shared
        .upload_logo("/nonexistent/tabfaktura/logo.png")
        .await
        .unwrap_err();
    assert!(matches!(err, InvoiceError::Logo(_)));
    // the failed upload is resolved, so export is not blocked
    assert!(shared.snapshot().unwrap().logo().is_none());
}

#[tokio::test]
async fn non_image_file_is_rejected() {
    let path = temp_file("notes.txt", b"hello").await;
    let err = read_logo(&path).await.unwrap_err();
    assert!(err.to_string().contains("unrecognised image format"));
    tokio::fs::remove_file(path).await.unwrap();
}

#[tokio::test]
async fn concurrent_uploads_settle_on_the_newest() {
    let shared = SharedSession::default();
    let first = shared.begin_logo_upload();
    let second = shared.begin_logo_upload();

    let older = tokio::spawn({
        let shared = shared.clone();
        async move {
            let mut bytes = png_1x1();
            bytes.push(1);
            tokio::task::yield_now().await;
            shared.finish_logo_upload(first, Logo::from_bytes(bytes))
        }
    });
    assert!(shared.snapshot().is_err());
    assert!(shared
        .finish_logo_upload(second, Logo::from_bytes(png_1x1()))
        .unwrap());

    // older result arrives last and is dropped
    let applied = older.await.unwrap().unwrap();
    let snap = shared.snapshot().unwrap();
    assert!(!applied);
    assert_eq!(snap.logo().unwrap().bytes(), png_1x1().as_slice());
}
