use std::time::Duration;

use thiserror::Error;

use crate::region::RegionId;

#[derive(Error, Debug)]
pub enum PanelcutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Image decode timed out after {0:?}")]
    DecodeTimeout(Duration),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid crop: {0}")]
    InvalidCrop(String),

    #[error("No image loaded")]
    NoImage,

    #[error("Unknown region: {0}")]
    UnknownRegion(RegionId),

    #[error("Detection request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Detection service error: {0}")]
    Detection(String),

    #[error("Malformed detection response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Detection result belongs to a replaced image")]
    StaleDetection,

    #[error("Nothing to export")]
    EmptyExport,

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PanelcutError>;
