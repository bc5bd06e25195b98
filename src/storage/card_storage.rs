use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use fs4::tokio::AsyncFileExt;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::debug;

use crate::card::store::CardStore;

pub const DATA_FILE_NAME: &str = "cards.json";

/// Interface for abstracting storage of cards.
pub trait CardStorage {
    /// Reads every card. Missing data means no cards yet.
    fn load(&self) -> impl Future<Output = Result<CardStore>>;

    /// Replaces the stored cards with `store`. Either everything is written or nothing is.
    fn save(&self, store: &CardStore) -> impl Future<Output = Result<()>>;

    /// Keeps cleared cards around, replacing whatever was archived before.
    fn archive(&self, removed: &CardStore) -> impl Future<Output = Result<()>>;
}

impl<T: Deref> CardStorage for T
where
    T::Target: CardStorage,
{
    fn load(&self) -> impl Future<Output = Result<CardStore>> {
        self.deref().load()
    }

    fn save(&self, store: &CardStore) -> impl Future<Output = Result<()>> {
        self.deref().save(store)
    }

    fn archive(&self, removed: &CardStore) -> impl Future<Output = Result<()>> {
        self.deref().archive(removed)
    }
}

/// The main realization of [CardStorage].
pub struct JsonCardStorage {
    path: PathBuf,
}

impl JsonCardStorage {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            path: dir.join(DATA_FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn old_path(&self) -> PathBuf {
        sibling(&self.path, "old")
    }

    fn lock_path(&self) -> PathBuf {
        sibling(&self.path, "lock")
    }

    /// Takes an exclusive lock on the card data, waiting for other invocations to finish.
    pub async fn lock(&self) -> Result<StorageLock> {
        let path = self.lock_path();
        let file = File::options()
            .write(true)
            .create(true)
            .read(true)
            .truncate(false)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open lock file {path:?}"))?;
        file.lock_exclusive()
            .with_context(|| format!("Failed to lock {path:?}"))?;
        debug!("Locked {path:?}");
        Ok(StorageLock { file })
    }
}

impl CardStorage for JsonCardStorage {
    async fn load(&self) -> Result<CardStore> {
        match tokio::fs::read(&self.path).await {
            Ok(content) => serde_json::from_slice(&content)
                .with_context(|| format!("Failed to parse card data in {:?}", self.path)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No card data at {:?}, starting empty", self.path);
                Ok(CardStore::new())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {:?}", self.path)),
        }
    }

    async fn save(&self, store: &CardStore) -> Result<()> {
        write_document(&self.path, store).await?;
        debug!("Saved {} card(s) into {:?}", store.len(), self.path);
        Ok(())
    }

    async fn archive(&self, removed: &CardStore) -> Result<()> {
        let path = self.old_path();
        write_document(&path, removed).await?;
        debug!("Archived {} card(s) into {path:?}", removed.len());
        Ok(())
    }
}

/// Held while a command works on the cards. Dropping it also releases the lock.
pub struct StorageLock {
    file: File,
}

impl StorageLock {
    pub async fn release(self) -> Result<()> {
        self.file.unlock_async().await?;
        Ok(())
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

/// Serializes `store` next to `path` and renames it into place, so readers never see half a
/// document.
async fn write_document(path: &Path, store: &CardStore) -> Result<()> {
    let content = serde_json::to_vec_pretty(store).context("Failed to serialize cards")?;
    let temp_path = sibling(path, "tmp");

    let mut file = File::create(&temp_path)
        .await
        .with_context(|| format!("Failed to create {temp_path:?}"))?;
    file.write_all(&content).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&temp_path, path)
        .await
        .with_context(|| format!("Failed to replace {path:?}"))?;
    Ok(())
}
