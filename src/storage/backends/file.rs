use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use parking_lot::Mutex;
use tracing::{debug, error, info};

use super::collection::CollectionState;
use crate::errors::{BrandtrackerError, Result};
use crate::storage::{
    Campaign, CampaignFields, CampaignId, ChangeEntry, ChangeListener, CollectionKey,
    MonotonicClock, RecordStore, SubscriberRegistry, Subscription,
};

/// One JSON file per collection under `data_dir`.
///
/// Several processes may share a data directory, so every operation re-reads
/// the collection file under an advisory lock on `<collection>.lock`: shared
/// for reads, exclusive for the read-modify-write of a mutation. A mutation is
/// applied to the freshly loaded state and written back before the lock is
/// released.
pub struct FileStore {
    data_dir: PathBuf,
    /// 进程内写入串行化
    write_lock: Mutex<()>,
    clock: MonotonicClock,
    subscribers: SubscriberRegistry,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).map_err(|e| {
                BrandtrackerError::file_operation(format!(
                    "Failed to create data directory {}: {}",
                    data_dir.display(),
                    e
                ))
            })?;
            info!("Created data directory: {}", data_dir.display());
        }

        Ok(Self {
            data_dir,
            write_lock: Mutex::new(()),
            clock: MonotonicClock::new(),
            subscribers: SubscriberRegistry::new(),
        })
    }

    fn validated_key<'a>(&self, collection: &'a CollectionKey) -> Result<&'a str> {
        let key = collection.as_str();
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(BrandtrackerError::config(format!(
                "Collection key '{}' is not usable as a file name",
                key
            )));
        }
        Ok(key)
    }

    fn path_for(&self, collection: &CollectionKey) -> Result<PathBuf> {
        let key = self.validated_key(collection)?;
        Ok(self.data_dir.join(format!("{}.json", key)))
    }

    /// Open the collection's lock file and take the advisory lock.
    ///
    /// The lock is released when the returned handle is dropped.
    fn acquire_lock(&self, collection: &CollectionKey, exclusive: bool) -> Result<File> {
        let key = self.validated_key(collection)?;
        let lock_path = self.data_dir.join(format!("{}.lock", key));
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| {
                BrandtrackerError::store(format!(
                    "Failed to open lock file {}: {}",
                    lock_path.display(),
                    e
                ))
            })?;

        let locked = if exclusive {
            FileExt::lock_exclusive(&lock_file)
        } else {
            FileExt::lock_shared(&lock_file)
        };
        locked.map_err(|e| {
            BrandtrackerError::store(format!("Failed to lock {}: {}", lock_path.display(), e))
        })?;
        Ok(lock_file)
    }

    fn load_from_file(&self, collection: &CollectionKey) -> Result<CollectionState> {
        let path = self.path_for(collection)?;
        match fs::read_to_string(&path) {
            Ok(content) => {
                let state: CollectionState = serde_json::from_str(&content).map_err(|e| {
                    error!("Failed to parse {}: {}", path.display(), e);
                    BrandtrackerError::serialization(format!(
                        "Failed to parse {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                debug!("Loaded {} campaigns from {}", state.len(), path.display());
                Ok(state)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CollectionState::default()),
            Err(e) => Err(BrandtrackerError::file_operation(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn save_to_file(&self, collection: &CollectionKey, state: &CollectionState) -> Result<()> {
        let path = self.path_for(collection)?;
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| {
                BrandtrackerError::store(format!("Failed to write {}: {}", path.display(), e))
            })
    }

    /// Current on-disk snapshot of a collection
    fn read_collection(&self, collection: &CollectionKey) -> Result<Vec<Campaign>> {
        let _lock = self.acquire_lock(collection, false)?;
        Ok(self.load_from_file(collection)?.snapshot())
    }

    /// Read-modify-write of one collection under the exclusive lock
    fn mutate<R>(
        &self,
        collection: &CollectionKey,
        f: impl FnOnce(&mut CollectionState) -> Result<R>,
    ) -> Result<R> {
        let written = {
            let _guard = self.write_lock.lock();
            let _lock = self.acquire_lock(collection, true)?;
            // 重新读取磁盘内容，合并其他进程的写入
            let mut working = self.load_from_file(collection)?;
            let result = f(&mut working)?;
            self.save_to_file(collection, &working)
                .map(|()| (result, working.snapshot()))
        };

        // 回调在锁外执行
        match written {
            Ok((result, snapshot)) => {
                self.subscribers.notify(collection, &snapshot);
                Ok(result)
            }
            Err(e) => {
                self.subscribers.notify_error(collection, &e);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn get(&self, collection: &CollectionKey, id: &CampaignId) -> Result<Option<Campaign>> {
        Ok(self
            .read_collection(collection)?
            .into_iter()
            .find(|c| &c.id == id))
    }

    async fn list(&self, collection: &CollectionKey) -> Result<Vec<Campaign>> {
        self.read_collection(collection)
    }

    async fn create(
        &self,
        collection: &CollectionKey,
        fields: &CampaignFields,
    ) -> Result<Campaign> {
        let campaign = self.mutate(collection, |state| Ok(state.insert(fields)))?;
        debug!("FileStore: created {} in {}", campaign.id, collection);
        Ok(campaign)
    }

    async fn put_fields(
        &self,
        collection: &CollectionKey,
        id: &CampaignId,
        fields: &CampaignFields,
    ) -> Result<()> {
        self.mutate(collection, |state| state.put_fields(collection, id, fields))
    }

    async fn append_to_history(
        &self,
        collection: &CollectionKey,
        id: &CampaignId,
        entry: ChangeEntry,
    ) -> Result<()> {
        let added = self.mutate(collection, |state| state.append(collection, id, entry))?;
        if !added {
            debug!("FileStore: history entry for {} already present", id);
        }
        Ok(())
    }

    async fn commit_edit(
        &self,
        collection: &CollectionKey,
        id: &CampaignId,
        entry: Option<ChangeEntry>,
        fields: &CampaignFields,
    ) -> Result<()> {
        self.mutate(collection, |state| state.commit(collection, id, entry, fields))
    }

    async fn delete(&self, collection: &CollectionKey, id: &CampaignId) -> Result<()> {
        self.mutate(collection, |state| state.remove(collection, id).map(|_| ()))
    }

    async fn set_order(&self, collection: &CollectionKey, ids: &[CampaignId]) -> Result<()> {
        self.mutate(collection, |state| state.reorder(collection, ids))?;
        debug!("FileStore: reordered {} campaign(s) in {}", ids.len(), collection);
        Ok(())
    }

    fn server_timestamp(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn subscribe(
        &self,
        collection: &CollectionKey,
        listener: Arc<dyn ChangeListener>,
    ) -> Subscription {
        let subscription = self.subscribers.register(collection, listener.clone());
        match self.read_collection(collection) {
            Ok(snapshot) => listener.on_change(collection, &snapshot),
            Err(e) => listener.on_error(collection, &e),
        }
        subscription
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
