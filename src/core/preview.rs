//! Profile picture previews
//!
//! Reads a selected picture on a background task and encodes it as a
//! `data:` URI. Each read is tagged with the [`SelectionId`] it was started
//! for; starting a new read aborts the previous one.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::errors::PreviewError;
use super::form::{Effect, FormEvent};
use super::types::{Preview, ProfilePic, SelectionId};

/// Default preview size limit (5MB)
pub const DEFAULT_MAX_PREVIEW_BYTES: u64 = 5 * 1024 * 1024;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Bmp,
}

impl ImageFormat {
    /// Get the MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Bmp => "image/bmp",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// Detect format from magic bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Png => Some(ImageFormat::Png),
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            image::ImageFormat::Gif => Some(ImageFormat::Gif),
            image::ImageFormat::WebP => Some(ImageFormat::WebP),
            image::ImageFormat::Bmp => Some(ImageFormat::Bmp),
            _ => None,
        }
    }
}

/// Encode picture bytes as a preview; content sniffing wins over the extension
pub fn encode_preview(bytes: &[u8], path: &Path) -> Result<Preview, PreviewError> {
    let format = ImageFormat::from_bytes(bytes)
        .or_else(|| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .and_then(ImageFormat::from_extension)
        })
        .ok_or_else(|| PreviewError::UnsupportedFormat(path.display().to_string()))?;

    Ok(Preview::from_parts(format.mime_type(), &STANDARD.encode(bytes)))
}

/// Read a picture from disk into a preview
///
/// Only regular files are read. Both the reported size and the bytes
/// actually read are held to `max_bytes`.
pub async fn read_preview(path: &Path, max_bytes: u64) -> Result<Preview, PreviewError> {
    let metadata = tokio::fs::metadata(path).await?;
    if !metadata.is_file() {
        return Err(PreviewError::NotAFile(path.display().to_string()));
    }
    if metadata.len() > max_bytes {
        return Err(PreviewError::TooLarge {
            size: metadata.len(),
            max: max_bytes,
        });
    }

    let file = tokio::fs::File::open(path).await?;
    let bytes = read_bounded(file, max_bytes).await?;
    encode_preview(&bytes, path)
}

/// Read at most `max_bytes` from `reader`, failing if more is available
pub async fn read_bounded<R>(reader: R, max_bytes: u64) -> Result<Vec<u8>, PreviewError>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader
        .take(max_bytes.saturating_add(1))
        .read_to_end(&mut bytes)
        .await?;

    let size = bytes.len() as u64;
    if size > max_bytes {
        return Err(PreviewError::TooLarge {
            size,
            max: max_bytes,
        });
    }
    Ok(bytes)
}

/// Result of a background read
#[derive(Debug)]
pub struct PreviewReady {
    pub selection: SelectionId,
    pub result: Result<Preview, PreviewError>,
}

impl PreviewReady {
    pub fn into_event(self) -> FormEvent {
        FormEvent::PreviewLoaded {
            selection: self.selection,
            result: self.result,
        }
    }
}

/// Runs preview effects on tokio tasks and reports results over a channel
pub struct PreviewLoader {
    max_bytes: u64,
    tx: mpsc::UnboundedSender<PreviewReady>,
    in_flight: Option<(SelectionId, JoinHandle<()>)>,
}

impl PreviewLoader {
    /// Create a loader and the receiver its results arrive on
    pub fn new(max_bytes: u64) -> (Self, mpsc::UnboundedReceiver<PreviewReady>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = Self {
            max_bytes,
            tx,
            in_flight: None,
        };
        (loader, rx)
    }

    /// Run an effect returned by the form. Must be called within a tokio runtime
    /// for [`Effect::LoadPreview`].
    pub fn handle(&mut self, effect: Effect) {
        match effect {
            Effect::LoadPreview(pic) => self.start(pic),
            Effect::CancelPreview => self.cancel(),
        }
    }

    /// Selection currently being read, if any
    pub fn in_flight(&self) -> Option<SelectionId> {
        self.in_flight.as_ref().map(|(selection, _)| *selection)
    }

    fn start(&mut self, pic: ProfilePic) {
        self.cancel();

        let tx = self.tx.clone();
        let max_bytes = self.max_bytes;
        let selection = pic.selection;
        tracing::debug!("Reading preview {} from {}", selection, pic.path.display());

        let handle = tokio::spawn(async move {
            let result = read_preview(&pic.path, max_bytes).await;
            // Receiver gone means the session ended
            let _ = tx.send(PreviewReady { selection, result });
        });
        self.in_flight = Some((selection, handle));
    }

    /// Abort the in-flight read, if any
    pub fn cancel(&mut self) {
        if let Some((selection, handle)) = self.in_flight.take() {
            handle.abort();
            tracing::debug!("Cancelled preview read {}", selection);
        }
    }

    /// Acknowledge a finished read and turn it into a form event
    pub fn accept(&mut self, ready: PreviewReady) -> FormEvent {
        if self.in_flight() == Some(ready.selection) {
            self.in_flight = None;
        }
        ready.into_event()
    }
}

impl Drop for PreviewLoader {
    fn drop(&mut self) {
        self.cancel();
    }
}
