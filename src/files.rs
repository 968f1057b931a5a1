// src/files.rs
//! Local blob store with HMAC-signed download URLs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use sha2::Sha256;
use tracing::debug;

use crate::auth::token::{generate_token, FILE_TOKEN_BYTES};
use crate::errors::ServerError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
    signing_key: Vec<u8>,
    base_url: String,
    ttl_secs: i64,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, signing_key: &str, base_url: &str, ttl_secs: i64) -> Self {
        Self {
            root: root.into(),
            signing_key: signing_key.as_bytes().to_vec(),
            base_url: base_url.trim_end_matches('/').to_string(),
            ttl_secs,
        }
    }

    /// Relative, forward-slash paths only. Rejects `..`, absolute paths and empty segments.
    fn resolve(&self, rel: &str) -> Result<PathBuf, ServerError> {
        let bad = || ServerError::BadRequest(format!("invalid file path: {rel}"));

        if rel.is_empty() || rel.starts_with('/') || rel.contains('\\') {
            return Err(bad());
        }
        let path = Path::new(rel);
        for c in path.components() {
            match c {
                Component::Normal(seg) if !seg.is_empty() => {}
                _ => return Err(bad()),
            }
        }
        if rel.split('/').any(|s| s.is_empty() || s == "." || s == "..") {
            return Err(bad());
        }
        Ok(self.root.join(path))
    }

    pub fn save(&self, rel: &str, bytes: &[u8]) -> Result<(), ServerError> {
        let full = self.resolve(rel)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ServerError::StorageError(format!("mkdir {parent:?}: {e}")))?;
        }
        fs::write(&full, bytes)
            .map_err(|e| ServerError::StorageError(format!("write {full:?}: {e}")))?;
        debug!(path = rel, bytes = bytes.len(), "stored file");
        Ok(())
    }

    pub fn read(&self, rel: &str) -> Result<Vec<u8>, ServerError> {
        let full = self.resolve(rel)?;
        match fs::read(&full) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ServerError::NotFound),
            Err(e) => Err(ServerError::StorageError(format!("read {full:?}: {e}"))),
        }
    }

    fn mac(&self, rel: &str, expires: i64) -> Result<HmacSha256, ServerError> {
        let mut mac = HmacSha256::new_from_slice(&self.signing_key)
            .map_err(|e| ServerError::StorageError(format!("signing key: {e}")))?;
        mac.update(rel.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        Ok(mac)
    }

    pub fn signature(&self, rel: &str, expires: i64) -> Result<String, ServerError> {
        let sig = self.mac(rel, expires)?.finalize().into_bytes();
        Ok(URL_SAFE_NO_PAD.encode(sig))
    }

    /// Download link valid for the configured TTL from `now`.
    pub fn signed_url(&self, rel: &str, now: i64) -> Result<String, ServerError> {
        self.resolve(rel)?;
        let expires = now + self.ttl_secs;
        let sig = self.signature(rel, expires)?;
        Ok(format!(
            "{}/files/{}?expires={}&sig={}",
            self.base_url, rel, expires, sig
        ))
    }

    pub fn verify(&self, rel: &str, expires: i64, sig: &str, now: i64) -> Result<(), ServerError> {
        if expires <= now {
            return Err(ServerError::Forbidden("link expired".into()));
        }
        let expected = URL_SAFE_NO_PAD
            .decode(sig)
            .map_err(|_| ServerError::Forbidden("bad signature".into()))?;
        self.mac(rel, expires)?
            .verify_slice(&expected)
            .map_err(|_| ServerError::Forbidden("bad signature".into()))
    }

    /// Records may only point at blobs that came through the upload route.
    pub fn check_upload_path(&self, rel: &str) -> Result<(), ServerError> {
        if !rel.starts_with("uploads/") {
            return Err(ServerError::BadRequest(format!("not an uploaded file: {rel}")));
        }
        self.resolve(rel).map(|_| ())
    }

    /// Signed URLs for a list of stored paths, in order.
    pub fn signed_urls(&self, paths: &[String], now: i64) -> Result<Vec<String>, ServerError> {
        paths.iter().map(|p| self.signed_url(p, now)).collect()
    }

    /// Stores an upload under `uploads/<kind>/<random>.<ext>` and returns the relative path.
    pub fn save_upload(
        &self,
        kind: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, ServerError> {
        if kind.is_empty()
            || !kind
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ServerError::BadRequest(format!("invalid upload kind: {kind}")));
        }
        if bytes.is_empty() {
            return Err(ServerError::BadRequest("empty upload".into()));
        }
        let ext = extension_for(content_type)?;
        let name = generate_token(&mut OsRng, FILE_TOKEN_BYTES);
        let rel = format!("uploads/{kind}/{name}.{ext}");
        self.save(&rel, bytes)?;
        Ok(rel)
    }
}

/// Accepted upload types: images and PDF.
pub fn extension_for(content_type: &str) -> Result<&'static str, ServerError> {
    let m: mime::Mime = content_type
        .parse()
        .map_err(|_| ServerError::BadRequest(format!("bad content type: {content_type}")))?;

    match m.essence_str().to_ascii_lowercase().as_str() {
        "image/jpeg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/gif" => Ok("gif"),
        "image/webp" => Ok("webp"),
        "application/pdf" => Ok("pdf"),
        _ => Err(ServerError::BadRequest(format!(
            "unsupported content type: {content_type}"
        ))),
    }
}

pub fn content_type_for(rel: &str) -> String {
    let m = match rel.rsplit_once('.').map(|(_, ext)| ext) {
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        Some("png") => mime::IMAGE_PNG,
        Some("gif") => mime::IMAGE_GIF,
        Some("pdf") => mime::APPLICATION_PDF,
        Some("webp") => return "image/webp".to_string(),
        _ => mime::APPLICATION_OCTET_STREAM,
    };
    m.to_string()
}
