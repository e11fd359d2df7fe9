pub mod archive;
pub mod batch;
pub mod config;
pub mod consts;
pub mod detect;
pub mod drag;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod ordering;
pub mod region;
pub mod registry;
pub mod render;
pub mod session;
pub mod source;
pub mod viewport;

pub use config::EditorConfig;
pub use error::{PanelcutError, Result};
pub use session::EditorSession;
