//! Sled-backed catalog store.
//!
//! Layout (all keys big-endian so iteration order is id order):
//! - `topics`: topic_id -> Topic
//! - `topic_names`: name -> topic_id
//! - `snippets`: topic_id ++ snippet_id -> Snippet
//! - `snippet_topics`: snippet_id -> topic_id

use std::io;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use sled::transaction::{ConflictableTransactionError, TransactionError, Transactional};
use sled::{Db, Tree};
use tracing::debug;

use crate::catalog::{
    CatalogStats, FeedbackUpdate, Snippet, SnippetPage, SnippetQuery, SnippetStore, Topic,
    TopicStore,
};
use crate::error::StorageError;
use crate::types::{SnippetId, TopicId};

const TREE_TOPICS: &str = "topics";
const TREE_TOPIC_NAMES: &str = "topic_names";
const TREE_SNIPPETS: &str = "snippets";
const TREE_SNIPPET_TOPICS: &str = "snippet_topics";

type TxError = ConflictableTransactionError<StorageError>;

/// Sled-based implementation of the topic and snippet stores
#[derive(Clone)]
pub struct SledCatalogStore {
    db: Db,
    topics: Tree,
    topic_names: Tree,
    snippets: Tree,
    snippet_topics: Tree,
    /// Snippet batches hold this shared and cascade deletes hold it exclusively,
    /// so no batch can commit between a delete's key scan and its transaction.
    cascade: Arc<RwLock<()>>,
}

impl SledCatalogStore {
    /// Open (or create) a catalog database at the given directory
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path).map_err(|e| {
            StorageError::IoError(io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to open sled database: {}", e),
            ))
        })?;
        Self::from_db(db)
    }

    pub fn from_db(db: Db) -> Result<Self, StorageError> {
        let topics = db.open_tree(TREE_TOPICS).map_err(to_storage_io)?;
        let topic_names = db.open_tree(TREE_TOPIC_NAMES).map_err(to_storage_io)?;
        let snippets = db.open_tree(TREE_SNIPPETS).map_err(to_storage_io)?;
        let snippet_topics = db.open_tree(TREE_SNIPPET_TOPICS).map_err(to_storage_io)?;
        Ok(Self {
            db,
            topics,
            topic_names,
            snippets,
            snippet_topics,
            cascade: Arc::new(RwLock::new(())),
        })
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Create a topic. Names are trimmed and must be unique.
    pub fn create_topic(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Topic, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::InvalidTopic(
                "Topic name cannot be empty".to_string(),
            ));
        }

        let topic = Topic {
            topic_id: self.next_id()?,
            name: name.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            created_at: Utc::now(),
        };
        let value = bincode::serialize(&topic).map_err(to_storage_data)?;
        let topic_key = topic.topic_id.to_be_bytes();

        (&self.topics, &self.topic_names)
            .transaction(|(topics, names)| -> Result<(), TxError> {
                if names.get(topic.name.as_bytes())?.is_some() {
                    return Err(ConflictableTransactionError::Abort(
                        StorageError::DuplicateTopic(topic.name.clone()),
                    ));
                }
                names.insert(topic.name.as_bytes(), &topic_key[..])?;
                topics.insert(&topic_key[..], value.as_slice())?;
                Ok(())
            })
            .map_err(from_transaction)?;

        debug!(topic_id = topic.topic_id, name = %topic.name, "Created topic");
        Ok(topic)
    }

    /// Delete a topic together with every snippet it owns.
    ///
    /// Serialized against snippet writes made through this store and its
    /// clones. A second store opened with `from_db` on the same `Db` does not
    /// share that lock.
    pub fn delete_topic(&self, topic_id: TopicId) -> Result<Topic, StorageError> {
        let _cascade = self.cascade.write();
        let topic = self
            .get_topic(topic_id)?
            .ok_or(StorageError::TopicNotFound(topic_id))?;
        let topic_key = topic_id.to_be_bytes();

        let mut snippet_keys = Vec::new();
        for item in self.snippets.scan_prefix(topic_key) {
            let (key, _) = item.map_err(to_storage_io)?;
            snippet_keys.push(key.to_vec());
        }

        (
            &self.topics,
            &self.topic_names,
            &self.snippets,
            &self.snippet_topics,
        )
            .transaction(|(topics, names, snippets, index)| -> Result<(), TxError> {
                topics.remove(&topic_key[..])?;
                names.remove(topic.name.as_bytes())?;
                for key in &snippet_keys {
                    snippets.remove(key.as_slice())?;
                    index.remove(&key[8..])?;
                }
                Ok(())
            })
            .map_err(from_transaction)?;

        debug!(
            topic_id,
            removed_snippets = snippet_keys.len(),
            "Deleted topic"
        );
        Ok(topic)
    }

    pub fn get_snippet(&self, snippet_id: SnippetId) -> Result<Option<Snippet>, StorageError> {
        let Some(key) = self.snippet_key(snippet_id)? else {
            return Ok(None);
        };
        match self.snippets.get(key).map_err(to_storage_io)? {
            Some(raw) => Ok(Some(decode_snippet(&raw)?)),
            None => Ok(None),
        }
    }

    /// Apply a feedback update atomically and return the stored result.
    pub fn update_feedback(
        &self,
        snippet_id: SnippetId,
        update: FeedbackUpdate,
    ) -> Result<Snippet, StorageError> {
        let key = self
            .snippet_key(snippet_id)?
            .ok_or(StorageError::SnippetNotFound(snippet_id))?;

        let _cascade = self.cascade.read();
        let updated = self
            .snippets
            .transaction(|snippets| -> Result<Snippet, TxError> {
                let raw = snippets.get(&key[..])?.ok_or(ConflictableTransactionError::Abort(
                    StorageError::SnippetNotFound(snippet_id),
                ))?;
                let mut snippet = decode_snippet(&raw).map_err(ConflictableTransactionError::Abort)?;
                update.apply(&mut snippet);
                let value = bincode::serialize(&snippet)
                    .map_err(|e| ConflictableTransactionError::Abort(to_storage_data(e)))?;
                snippets.insert(&key[..], value)?;
                Ok(snippet)
            })
            .map_err(from_transaction)?;

        debug!(
            snippet_id,
            liked = updated.liked,
            disliked = updated.disliked,
            deep_dive = updated.deep_dive,
            "Updated snippet feedback"
        );
        Ok(updated)
    }

    pub fn delete_snippet(&self, snippet_id: SnippetId) -> Result<Snippet, StorageError> {
        let snippet = self
            .get_snippet(snippet_id)?
            .ok_or(StorageError::SnippetNotFound(snippet_id))?;
        let key = snippet_key(snippet.topic_id, snippet_id);

        (&self.snippets, &self.snippet_topics)
            .transaction(|(snippets, index)| -> Result<(), TxError> {
                snippets.remove(&key[..])?;
                index.remove(&snippet_id.to_be_bytes()[..])?;
                Ok(())
            })
            .map_err(from_transaction)?;
        Ok(snippet)
    }

    /// Filtered listing across topics, newest first.
    pub fn query_snippets(&self, query: &SnippetQuery) -> Result<SnippetPage, StorageError> {
        let mut matching: Vec<Snippet> = match query.topic_id {
            Some(topic_id) => self.list_snippets(topic_id)?,
            None => self.all_snippets()?,
        }
        .into_iter()
        .filter(|s| query.matches(s))
        .collect();

        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.snippet_id.cmp(&a.snippet_id))
        });

        let total_count = matching.len();
        let snippets: Vec<Snippet> = matching
            .into_iter()
            .skip(query.offset)
            .take(query.effective_limit())
            .collect();
        let consumed = query.offset + snippets.len();
        let has_more = consumed < total_count;

        Ok(SnippetPage {
            snippets,
            total_count,
            has_more,
            next_offset: has_more.then_some(consumed),
        })
    }

    pub fn stats(&self) -> Result<CatalogStats, StorageError> {
        let snippets = self.all_snippets()?;
        let liked = snippets.iter().filter(|s| s.liked).count();
        let disliked = snippets.iter().filter(|s| s.disliked).count();
        Ok(CatalogStats {
            total_topics: self.topics.len(),
            total_snippets: snippets.len(),
            liked_snippets: liked,
            disliked_snippets: disliked,
            deep_dive_snippets: snippets.iter().filter(|s| s.deep_dive).count(),
            engagement_rate: CatalogStats::engagement_rate(liked, disliked, snippets.len()),
        })
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush().map_err(to_storage_io)?;
        Ok(())
    }

    fn all_snippets(&self) -> Result<Vec<Snippet>, StorageError> {
        let mut out = Vec::new();
        for item in self.snippets.iter() {
            let (_, value) = item.map_err(to_storage_io)?;
            out.push(decode_snippet(&value)?);
        }
        Ok(out)
    }

    fn snippet_key(&self, snippet_id: SnippetId) -> Result<Option<[u8; 16]>, StorageError> {
        let Some(raw) = self
            .snippet_topics
            .get(snippet_id.to_be_bytes())
            .map_err(to_storage_io)?
        else {
            return Ok(None);
        };
        let topic_id = decode_id(&raw)?;
        Ok(Some(snippet_key(topic_id, snippet_id)))
    }

    fn next_id(&self) -> Result<u64, StorageError> {
        // sled ids start at zero; keep zero free so ids read naturally on the CLI
        Ok(self.db.generate_id().map_err(to_storage_io)? + 1)
    }
}

impl TopicStore for SledCatalogStore {
    fn list_topics(&self) -> Result<Vec<Topic>, StorageError> {
        let mut out = Vec::new();
        for item in self.topics.iter() {
            let (_, value) = item.map_err(to_storage_io)?;
            out.push(bincode::deserialize(&value).map_err(to_storage_data)?);
        }
        Ok(out)
    }

    fn get_topic(&self, topic_id: TopicId) -> Result<Option<Topic>, StorageError> {
        match self
            .topics
            .get(topic_id.to_be_bytes())
            .map_err(to_storage_io)?
        {
            Some(raw) => Ok(Some(bincode::deserialize(&raw).map_err(to_storage_data)?)),
            None => Ok(None),
        }
    }
}

impl SnippetStore for SledCatalogStore {
    fn list_snippets(&self, topic_id: TopicId) -> Result<Vec<Snippet>, StorageError> {
        let mut out = Vec::new();
        for item in self.snippets.scan_prefix(topic_id.to_be_bytes()) {
            let (_, value) = item.map_err(to_storage_io)?;
            out.push(decode_snippet(&value)?);
        }
        Ok(out)
    }

    fn create_snippet(&self, topic_id: TopicId, body: &str) -> Result<Snippet, StorageError> {
        let mut created = self.create_snippets(topic_id, &[body.to_string()])?;
        created
            .pop()
            .ok_or_else(|| StorageError::InvalidSnippet("No snippet created".to_string()))
    }

    fn create_snippets(
        &self,
        topic_id: TopicId,
        bodies: &[String],
    ) -> Result<Vec<Snippet>, StorageError> {
        let mut prepared = Vec::with_capacity(bodies.len());
        for body in bodies {
            let body = body.trim();
            if body.is_empty() {
                return Err(StorageError::InvalidSnippet(
                    "Snippet body cannot be empty".to_string(),
                ));
            }
            let snippet = Snippet {
                snippet_id: self.next_id()?,
                topic_id,
                body: body.to_string(),
                created_at: Utc::now(),
                liked: false,
                disliked: false,
                deep_dive: false,
            };
            let value = bincode::serialize(&snippet).map_err(to_storage_data)?;
            prepared.push((snippet, value));
        }

        let topic_key = topic_id.to_be_bytes();
        let _cascade = self.cascade.read();
        (&self.topics, &self.snippets, &self.snippet_topics)
            .transaction(|(topics, snippets, index)| -> Result<(), TxError> {
                if topics.get(&topic_key[..])?.is_none() {
                    return Err(ConflictableTransactionError::Abort(
                        StorageError::TopicNotFound(topic_id),
                    ));
                }
                for (snippet, value) in &prepared {
                    let key = snippet_key(topic_id, snippet.snippet_id);
                    snippets.insert(&key[..], value.as_slice())?;
                    index.insert(&snippet.snippet_id.to_be_bytes()[..], &topic_key[..])?;
                }
                Ok(())
            })
            .map_err(from_transaction)?;

        Ok(prepared.into_iter().map(|(snippet, _)| snippet).collect())
    }
}

fn snippet_key(topic_id: TopicId, snippet_id: SnippetId) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&topic_id.to_be_bytes());
    key[8..].copy_from_slice(&snippet_id.to_be_bytes());
    key
}

fn decode_id(raw: &[u8]) -> Result<u64, StorageError> {
    let bytes: [u8; 8] = raw.try_into().map_err(|_| {
        StorageError::IoError(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid id encoding ({} bytes)", raw.len()),
        ))
    })?;
    Ok(u64::from_be_bytes(bytes))
}

fn decode_snippet(raw: &[u8]) -> Result<Snippet, StorageError> {
    bincode::deserialize(raw).map_err(to_storage_data)
}

fn from_transaction(err: TransactionError<StorageError>) -> StorageError {
    match err {
        TransactionError::Abort(e) => e,
        TransactionError::Storage(e) => to_storage_io(e),
    }
}

fn to_storage_io(err: sled::Error) -> StorageError {
    StorageError::IoError(io::Error::new(io::ErrorKind::Other, err.to_string()))
}

fn to_storage_data(err: bincode::Error) -> StorageError {
    StorageError::IoError(io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
}
