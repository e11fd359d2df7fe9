use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use image::{ImageFormat, RgbaImage};
use tracing::{debug, warn};

use crate::error::{PanelcutError, Result};

/// An uploaded image: its original encoded bytes (sent to the detection
/// service) and the decoded native-resolution pixels.
#[derive(Clone, Debug)]
pub struct SourceImage {
    name: String,
    bytes: Vec<u8>,
    pixels: RgbaImage,
}

impl SourceImage {
    /// Decode `bytes`, giving up after `timeout`.
    pub fn decode(name: impl Into<String>, bytes: Vec<u8>, timeout: Duration) -> Result<Self> {
        let name = name.into();
        let pixels = decode_with_timeout(bytes.clone(), timeout)?;
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(PanelcutError::InvalidDimensions { width, height });
        }
        debug!(name = %name, width, height, "Decoded source image");
        Ok(Self {
            name,
            bytes,
            pixels,
        })
    }

    /// Read and decode an image file. The file name becomes the source name.
    pub fn open(path: &Path, timeout: Duration) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        Self::decode(name, bytes, timeout)
    }

    /// Wrap already-decoded pixels, re-encoding them as PNG for upload.
    pub fn from_pixels(name: impl Into<String>, pixels: RgbaImage) -> Result<Self> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(PanelcutError::InvalidDimensions { width, height });
        }
        let bytes = crate::extract::encode_png(&pixels)?;
        Ok(Self {
            name: name.into(),
            bytes,
            pixels,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source name with its extension stripped.
    pub fn stem(&self) -> &str {
        file_stem(&self.name)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// MIME type of the encoded bytes, for the multipart upload.
    pub fn mime_type(&self) -> &'static str {
        image::guess_format(&self.bytes)
            .map(|f| f.to_mime_type())
            .unwrap_or(ImageFormat::Png.to_mime_type())
    }
}

/// Strip the last extension from a file name. Leading-dot names are kept.
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// Decode on a worker thread so a pathological file cannot stall the caller
/// beyond `timeout`.
fn decode_with_timeout(bytes: Vec<u8>, timeout: Duration) -> Result<RgbaImage> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("panelcut-decode".into())
        .spawn(move || {
            let decoded = image::load_from_memory(&bytes).map(|img| img.to_rgba8());
            // The receiver is gone if we already timed out; nothing to report.
            let _ = tx.send(decoded);
        })?;

    match rx.recv_timeout(timeout) {
        Ok(decoded) => Ok(decoded?),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!(?timeout, "Image decode timed out");
            Err(PanelcutError::DecodeTimeout(timeout))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(PanelcutError::Io(
            std::io::Error::other("decode worker exited without a result"),
        )),
    }
}
