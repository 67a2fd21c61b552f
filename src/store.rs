//! User record storage.
//!
//! Each user is stored as a single JSON document keyed by their username,
//! either as a file in a data directory or as a row in a SQLite database.
//! Every read-modify-write of a record goes through [`UserStore::update`],
//! which serializes updates to the same username.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use chrono::Utc;

use derive_more::{Display, Error, From};

use music_clicker_model::User;

use sha2::{Digest as _, Sha256};

use sqlx::SqlitePool;

use tokio::{
    fs,
    sync::{Mutex as AsyncMutex, OwnedMutexGuard},
};

use crate::earnings::apply_earnings;

/// An error from the backing storage.
#[derive(Debug, Display, Error, From)]
pub enum StoreError {
    /// A record was requested for an empty username.
    #[display("username is empty")]
    #[from(skip)]
    EmptyUsername,
    /// Reading or writing a record file failed.
    #[display("{_0}")]
    Io(io::Error),
    /// A record could not be (de)serialized.
    #[display("{_0}")]
    Json(serde_json::Error),
    /// A database query failed.
    #[display("{_0}")]
    Database(sqlx::Error),
}

/// User record store.
///
/// Cheaply cloneable.
#[derive(Clone, Debug)]
pub struct UserStore {
    backend: Backend,
    locks: KeyLocks,
}

#[derive(Clone, Debug)]
enum Backend {
    Files(PathBuf),
    Sqlite(SqlitePool),
}

impl UserStore {
    /// Opens a store keeping one file per user in `data_dir`.
    ///
    /// The directory is created if it does not exist.
    pub async fn open_dir(data_dir: impl AsRef<Path>) -> Result<UserStore, StoreError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir).await?;

        Ok(UserStore::new(Backend::Files(data_dir.to_owned())))
    }

    /// Opens a store backed by a SQLite database, creating the user table if
    /// it is missing.
    pub async fn open_sqlite(db: SqlitePool) -> Result<UserStore, StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user (
                username TEXT PRIMARY KEY NOT NULL,
                data TEXT NOT NULL,
                inserted_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&db)
        .await?;

        Ok(UserStore::new(Backend::Sqlite(db)))
    }

    fn new(backend: Backend) -> UserStore {
        UserStore {
            backend,
            locks: Arc::default(),
        }
    }

    /// Fetches a user's record as it is stored, if it exists.
    pub async fn get(&self, username: &str) -> Result<Option<User>, StoreError> {
        let data = match &self.backend {
            Backend::Files(data_dir) => match fs::read(record_path(data_dir, username)).await {
                Ok(data) => data,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(err) => return Err(err.into()),
            },
            Backend::Sqlite(db) => {
                let row = sqlx::query_as::<_, (String,)>(
                    r#"
                    SELECT data
                    FROM user
                    WHERE username = $1
                    "#,
                )
                .bind(username)
                .fetch_optional(db)
                .await?;

                match row {
                    Some((data,)) => data.into_bytes(),
                    None => return Ok(None),
                }
            }
        };

        serde_json::from_slice(&data).map(Some).map_err(From::from)
    }

    /// Loads a user's record, creating and saving a fresh one if they do not
    /// exist yet.
    pub async fn load(&self, username: &str, now_ms: i64) -> Result<User, StoreError> {
        if username.is_empty() {
            return Err(StoreError::EmptyUsername);
        }

        match self.get(username).await? {
            Some(user) => Ok(user),
            None => {
                tracing::info!(%username, "creating new user");

                let user = User::new(username, now_ms);
                self.save(&user).await?;
                Ok(user)
            }
        }
    }

    /// Saves a user's record, overwriting what was there before.
    pub async fn save(&self, user: &User) -> Result<(), StoreError> {
        match &self.backend {
            Backend::Files(data_dir) => {
                let path = record_path(data_dir, &user.username);
                let tmp_path = path.with_extension("json.tmp");

                let data = serde_json::to_vec_pretty(user)?;

                fs::write(&tmp_path, data).await?;
                fs::rename(&tmp_path, &path).await?;
            }
            Backend::Sqlite(db) => {
                let data = serde_json::to_string_pretty(user)?;
                let now = Utc::now();

                sqlx::query(
                    r#"
                    INSERT INTO user (username, data, inserted_at, updated_at)
                    VALUES ($1, $2, $3, $3)
                    ON CONFLICT (username) DO UPDATE
                    SET
                        data = $2,
                        updated_at = $3
                    "#,
                )
                .bind(&user.username)
                .bind(data)
                .bind(now)
                .execute(db)
                .await?;
            }
        }

        Ok(())
    }

    /// Makes sure a user exists, creating them if they don't.
    ///
    /// Unlike [`UserStore::update`], no earnings are credited.
    pub async fn ensure(&self, username: &str, now_ms: i64) -> Result<User, StoreError> {
        let _guard = self.lock(username).await;

        self.load(username, now_ms).await
    }

    /// Runs a mutation on a user's record.
    ///
    /// The user is loaded (or created), credited with their pending earnings
    /// as of `now_ms`, passed to `f`, and saved. No other update to the same
    /// username can interleave with this one.
    pub async fn update<F, T>(&self, username: &str, now_ms: i64, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut User) -> T,
    {
        let _guard = self.lock(username).await;

        let mut user = self.load(username, now_ms).await?;
        apply_earnings(&mut user, now_ms);

        let output = f(&mut user);

        self.save(&user).await?;

        Ok(output)
    }

    async fn lock(&self, username: &str) -> KeyGuard {
        let mutex = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            let lock = locks.entry(username.to_owned()).or_default();
            lock.users += 1;
            lock.mutex.clone()
        };

        // registered before waiting, so a cancelled wait still releases the
        // entry
        let mut key_guard = KeyGuard {
            locks: self.locks.clone(),
            username: username.to_owned(),
            guard: None,
        };

        key_guard.guard = Some(mutex.lock_owned().await);
        key_guard
    }
}

/// A per-username lock.
#[derive(Debug, Default)]
struct KeyLock {
    mutex: Arc<AsyncMutex<()>>,
    /// How many updates are holding or waiting on the lock.
    users: usize,
}

type KeyLocks = Arc<Mutex<HashMap<String, KeyLock>>>;

/// Held for the duration of an update, including the wait for the lock.
///
/// Drops the username's lock from the map once nobody else is using it.
struct KeyGuard {
    locks: KeyLocks,
    username: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);

        let unused = match locks.get_mut(&self.username) {
            Some(lock) => {
                lock.users -= 1;
                lock.users == 0
            }
            None => false,
        };

        if unused {
            locks.remove(&self.username);
        }
    }
}

/// The file a user's record lives in.
///
/// Files are named after the hex SHA-256 of the username, so any username
/// maps to a short name that can't point outside of the data directory.
fn record_path(data_dir: &Path, username: &str) -> PathBuf {
    let digest = Sha256::digest(username.as_bytes());

    data_dir.join(format!("{}.json", base16::encode_lower(&digest)))
}
