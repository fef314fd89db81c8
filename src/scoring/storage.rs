//! Artifact storage
//!
//! One file per artifact under a fixed directory. Each file is an envelope
//! (kind, payload checksum, creation time, payload) written by a pluggable codec,
//! so the numeric representation can change without touching scoring code.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::errors::{Result, ScoringError};

/// Persisted artifact kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    PhishingClassifier,
    TextVectorizer,
    AnomalyModel,
    FeatureSchema,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::PhishingClassifier,
        ArtifactKind::TextVectorizer,
        ArtifactKind::AnomalyModel,
        ArtifactKind::FeatureSchema,
    ];

    /// File name inside the models directory
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::PhishingClassifier => "phishing_model.bin",
            ArtifactKind::TextVectorizer => "tfidf_vectorizer.bin",
            ArtifactKind::AnomalyModel => "anomaly_model.bin",
            ArtifactKind::FeatureSchema => "anomaly_features.bin",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Byte-level encoding of artifacts
pub trait ArtifactCodec: Send + Sync {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>>;
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
    fn name(&self) -> &'static str;
}

/// Compact binary codec (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl ArtifactCodec for BincodeCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(bincode::serialize(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(bincode::deserialize(bytes)?)
    }

    fn name(&self) -> &'static str {
        "bincode"
    }
}

/// Human-inspectable JSON codec
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ArtifactCodec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// On-disk wrapper around an artifact payload
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArtifactEnvelope {
    kind: ArtifactKind,
    checksum: String,
    created_at: DateTime<Utc>,
    payload: Vec<u8>,
}

fn checksum(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Artifact store rooted at a directory
#[derive(Debug, Clone)]
pub struct ModelStore<C: ArtifactCodec = BincodeCodec> {
    root: PathBuf,
    codec: C,
}

impl ModelStore<BincodeCodec> {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_codec(root, BincodeCodec)
    }
}

impl<C: ArtifactCodec> ModelStore<C> {
    pub fn with_codec(root: impl Into<PathBuf>, codec: C) -> Self {
        Self { root: root.into(), codec }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, kind: ArtifactKind) -> PathBuf {
        self.root.join(kind.file_name())
    }

    pub fn exists(&self, kind: ArtifactKind) -> bool {
        self.path_for(kind).is_file()
    }

    /// Serialize and write one artifact, creating the directory if needed
    pub fn save<T: Serialize>(&self, kind: ArtifactKind, value: &T) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        let payload = self.codec.encode(value)?;
        let envelope = ArtifactEnvelope {
            kind,
            checksum: checksum(&payload),
            created_at: Utc::now(),
            payload,
        };
        let bytes = self.codec.encode(&envelope)?;
        let path = self.path_for(kind);
        std::fs::write(&path, &bytes)?;
        info!("💾 Saved {} ({} bytes, {})", path.display(), bytes.len(), self.codec.name());
        Ok(path)
    }

    /// Read one artifact. `Ok(None)` when the file does not exist.
    pub fn load<T: DeserializeOwned>(&self, kind: ArtifactKind) -> Result<Option<T>> {
        let path = self.path_for(kind);
        if !path.is_file() {
            debug!("Artifact {} not found", path.display());
            return Ok(None);
        }
        let bytes = std::fs::read(&path)?;
        let envelope: ArtifactEnvelope = self.codec.decode(&bytes)?;
        if envelope.kind != kind {
            return Err(ScoringError::Storage(format!(
                "{} holds a {:?} artifact, expected {:?}",
                path.display(),
                envelope.kind,
                kind
            )));
        }
        if checksum(&envelope.payload) != envelope.checksum {
            return Err(ScoringError::Storage(format!("checksum mismatch in {}", path.display())));
        }
        let value = self.codec.decode(&envelope.payload)?;
        debug!("Loaded {} (created {})", path.display(), envelope.created_at.to_rfc3339());
        Ok(Some(value))
    }
}
