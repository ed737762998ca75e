// Remote screen module - seams towards the remote-desktop transport.
// The transport itself (VNC client, input injection) lives outside this crate;
// matching only needs a frame source and, for clicking, a pointer.

pub mod file_source;
pub mod types;

// Re-export the main types for easy access
pub use file_source::FileFrameSource;
pub use types::{FrameSource, PointerInput};
