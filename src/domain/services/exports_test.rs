use anyhow::Result;
use tempfile::tempdir;

use super::Exports;

#[tokio::test]
async fn it_saves_text_under_the_downloads_dir() -> Result<()> {
    let dir = tempdir().unwrap();
    let exports = Exports::new(dir.path().join("downloads"));

    let target = exports.save_text("mr-dep-message.txt", "Short. Done.").await?;

    assert_eq!(target, dir.path().join("downloads/mr-dep-message.txt"));
    assert_eq!(tokio::fs::read_to_string(&target).await?, "Short. Done.");

    return Ok(());
}

#[tokio::test]
async fn it_copies_files_by_name() -> Result<()> {
    let dir = tempdir().unwrap();
    let source = dir.path().join("mr-dep-1.jpg");
    tokio::fs::write(&source, b"jpeg bytes").await?;

    let exports = Exports::new(dir.path().join("downloads"));
    let target = exports.save_file(&source).await?;

    assert_eq!(target, dir.path().join("downloads/mr-dep-1.jpg"));
    assert_eq!(tokio::fs::read(&target).await?, b"jpeg bytes");

    return Ok(());
}
