use std::fmt;

use uuid::Uuid;

/// Largest accepted receipt, in bytes
pub const MAX_RECEIPT_BYTES: usize = 5 * 1024 * 1024;

/// Content types a receipt may carry
pub const ALLOWED_RECEIPT_TYPES: [mime::Mime; 3] =
    [mime::APPLICATION_PDF, mime::IMAGE_JPEG, mime::IMAGE_PNG];

const KEY_PREFIX: &str = "receipts/";

/// Payment receipt as received from the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl ReceiptUpload {
    pub fn new(file_name: String, content_type: String, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
    pub fn len(&self) -> usize {
        self.bytes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Essence of the declared content type, when it is one of the allowed ones
    pub fn allowed_mime(&self) -> Option<mime::Mime> {
        let parsed: mime::Mime = self.content_type.parse().ok()?;
        ALLOWED_RECEIPT_TYPES
            .into_iter()
            .find(|allowed| allowed.essence_str() == parsed.essence_str())
    }
}

/// Receipt bytes read back from a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReceipt {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Object key of a stored receipt: `receipts/<uuid>.<ext>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiptKey(String);

impl ReceiptKey {
    /// Fresh key for an upload of the given content type.
    ///
    /// Keys are random, so two uploads of identically named files never
    /// collide.
    pub fn generate(content_type: &str) -> Self {
        let extension = extension_for(content_type);
        Self(format!("{KEY_PREFIX}{}.{extension}", Uuid::new_v4()))
    }

    /// Accept a full key such as `receipts/abc.pdf`
    pub fn parse(value: &str) -> Option<Self> {
        let name = value.strip_prefix(KEY_PREFIX)?;
        Self::from_file_name(name)
    }

    /// Accept the file part of a key, as it appears in a receipt URL
    pub fn from_file_name(name: &str) -> Option<Self> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains("..")
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        valid.then(|| Self(format!("{KEY_PREFIX}{name}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> &str {
        &self.0[KEY_PREFIX.len()..]
    }

    /// Content type implied by the key's extension
    pub fn content_type(&self) -> &'static str {
        match self.file_name().rsplit_once('.').map(|(_, ext)| ext) {
            Some("pdf") => "application/pdf",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            _ => "application/octet-stream",
        }
    }
}

impl fmt::Display for ReceiptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type.parse::<mime::Mime>() {
        Ok(m) if m.essence_str() == mime::APPLICATION_PDF.essence_str() => "pdf",
        Ok(m) if m.essence_str() == mime::IMAGE_JPEG.essence_str() => "jpg",
        Ok(m) if m.essence_str() == mime::IMAGE_PNG.essence_str() => "png",
        _ => "bin",
    }
}
