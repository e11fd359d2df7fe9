/// Smallest zoom factor the viewport accepts.
pub const DEFAULT_MIN_ZOOM: f64 = 0.001;

/// Largest zoom factor the viewport accepts.
pub const DEFAULT_MAX_ZOOM: f64 = 4.0;

/// Zoom increment used by the zoom-in / zoom-out buttons.
pub const DEFAULT_ZOOM_STEP: f64 = 0.05;

/// Padding (on-screen pixels) kept free around the image when fitting it
/// into its container.
pub const DEFAULT_FIT_PADDING: f64 = 40.0;

/// Zoom used before any fit has been computed.
pub const DEFAULT_INITIAL_ZOOM: f64 = 0.5;

/// Minimum on-screen width and height of a region. Anything smaller is
/// treated as a click without drag and dropped at creation time.
pub const DEFAULT_MIN_REGION_SIZE: f64 = 10.0;

/// Upper bound on decoding a single uploaded image.
pub const DEFAULT_DECODE_TIMEOUT_SECS: u64 = 10;

/// Timeout for one request to the detection service.
pub const DEFAULT_DETECTION_TIMEOUT_SECS: u64 = 60;

/// Default detection service endpoint.
pub const DEFAULT_DETECTION_ENDPOINT: &str = "http://localhost:8000/detect";

/// Default binarization threshold sent to the detection service.
pub const DEFAULT_DETECTION_THRESH: u8 = 220;

/// Default median blur kernel size sent to the detection service.
pub const DEFAULT_DETECTION_BLUR: u32 = 99;

/// Default archive file name.
pub const DEFAULT_ARCHIVE_NAME: &str = "panels.zip";

/// Radius (on-screen pixels) of the per-region delete control.
pub const DELETE_CONTROL_RADIUS: f64 = 12.0;

/// Offset of the delete control centre from the region's top-right corner.
pub const DELETE_CONTROL_OFFSET: f64 = 16.0;

/// Side length (on-screen pixels) of the resize corner handle.
pub const RESIZE_HANDLE_SIZE: f64 = 15.0;

/// Width of the border stroke drawn around crop regions on screen.
pub const REGION_STROKE_WIDTH: u32 = 4;

/// RGBA fill tint drawn over crop regions on screen.
pub const CROP_FILL_RGBA: [u8; 4] = [59, 130, 246, 77];

/// RGBA border stroke colour of crop regions on screen.
pub const CROP_STROKE_RGBA: [u8; 4] = [59, 130, 246, 255];

/// Colour painted over masked areas, on screen and in exported crops.
pub const MASK_RGBA: [u8; 4] = [255, 255, 255, 255];
