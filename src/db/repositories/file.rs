use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::debug;

use super::user::{StoreError, UserRecord, UserRepository};

/// User records in a single pretty-printed JSON object keyed by username.
///
/// Every mutation rewrites the whole file: the new contents go to a sibling
/// temp file which is then renamed over the target, so readers never see a
/// truncated file.
pub struct FileUserRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileUserRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<BTreeMap<String, UserRecord>, StoreError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_slice(&content)?)
    }

    async fn save(&self, users: &BTreeMap<String, UserRecord>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_vec_pretty(users)?;

        let file_name = self
            .path
            .file_name()
            .map_or_else(|| "users".into(), |n| n.to_string_lossy().into_owned());
        let tmp_path = self
            .path
            .with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

        if let Err(e) = tokio::fs::write(&tmp_path, &content).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!(path = %self.path.display(), users = users.len(), "User file written");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FileUserRepository {
    async fn get(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.load().await?.remove(username))
    }

    async fn put(&self, record: UserRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load().await?;
        users.insert(record.username.clone(), record);
        self.save(&users).await
    }

    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.load().await?.into_values().collect())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.save(&BTreeMap::new()).await
    }

    fn backend_name(&self) -> &'static str {
        "local_file"
    }
}
