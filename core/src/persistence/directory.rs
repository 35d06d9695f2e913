use {
    crate::{
        error::QueryError,
        persistence::{last_char_bucket, sanitize, PostingStore},
    },
    async_trait::async_trait,
    log::error,
    std::path::{Path, PathBuf},
    tokio::{
        fs::{create_dir_all, metadata, File, OpenOptions},
        io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt, ErrorKind, SeekFrom},
    },
};

const ID_WIDTH: u64 = 4;

/// Stores posting lists as flat little-endian `i32` files under `root/field/last_char/term`.
#[derive(Debug, Clone)]
pub struct FilesystemPostingStore {
    root: PathBuf,
}

impl FilesystemPostingStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    fn path_for(&self, field: &str, term: &str) -> PathBuf {
        let field = sanitize(field);
        let term = sanitize(term);
        let bucket = last_char_bucket(&term);
        self.root.join(field).join(bucket).join(term)
    }
}

#[async_trait]
impl PostingStore for FilesystemPostingStore {
    async fn load(&self, field: &str, term: &str) -> Result<Vec<i32>, QueryError> {
        let path = self.path_for(field, term);
        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                error!("failed to open posting list {}: {source}", path.display());
                return Err(QueryError::PersistenceIoFailed {
                    path,
                    source,
                });
            }
        };

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).await.map_err(|source| QueryError::PersistenceIoFailed {
            path: path.clone(),
            source,
        })?;

        // Any trailing partial word is the result of an interrupted append; it never completed,
        // so it carries no id and is discarded rather than treated as corruption.
        let whole_words = bytes.len() / ID_WIDTH as usize;
        let mut postings = Vec::with_capacity(whole_words);
        let mut previous = None;
        for (index, chunk) in bytes.chunks_exact(ID_WIDTH as usize).enumerate() {
            let id = u32::from_le_bytes(chunk.try_into().unwrap()) as i32;
            if let Some(previous) = previous {
                if id <= previous {
                    return Err(QueryError::CorruptPostingList {
                        path,
                        at: index,
                    });
                }
            }
            previous = Some(id);
            postings.push(id);
        }

        Ok(postings)
    }

    async fn append(&self, field: &str, term: &str, ids: &[i32]) -> Result<(), QueryError> {
        let path = self.path_for(field, term);
        if let Some(parent) = path.parent() {
            create_dir_all(parent).await.map_err(|source| QueryError::PersistenceIoFailed {
                path: path.clone(),
                source,
            })?;
        }

        let mut file = OpenOptions::new().create(true).read(true).write(true).open(&path).await.map_err(|source| QueryError::PersistenceIoFailed {
            path: path.clone(),
            source,
        })?;

        let len = metadata(&path).await.map_err(|source| QueryError::PersistenceIoFailed {
            path: path.clone(),
            source,
        })?.len();
        let aligned = (len / ID_WIDTH) * ID_WIDTH;
        file.seek(SeekFrom::Start(aligned)).await.map_err(|source| QueryError::PersistenceIoFailed {
            path: path.clone(),
            source,
        })?;

        for &id in ids {
            file.write_all(&(id as u32).to_le_bytes()).await.map_err(|source| QueryError::PersistenceIoFailed {
                path: path.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

/// Opens (creating if necessary) the directory a [`FilesystemPostingStore`] should be rooted at.
pub async fn open_or_create_root(path: impl AsRef<Path>) -> Result<FilesystemPostingStore, QueryError> {
    let path = path.as_ref();
    create_dir_all(path).await.map_err(|source| QueryError::PersistenceIoFailed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FilesystemPostingStore::new(path))
}
