// Core remote screen traits
use crate::error::RemoteError;
use image::RgbImage;

/// Produces the current screen content on demand.
///
/// Every call may return a different frame. Implementations must return
/// promptly; errors are passed to the caller unchanged.
pub trait FrameSource {
    fn capture(&mut self) -> Result<RgbImage, RemoteError>;
}

impl<F> FrameSource for F
where
    F: FnMut() -> Result<RgbImage, RemoteError>,
{
    fn capture(&mut self) -> Result<RgbImage, RemoteError> {
        self()
    }
}

/// Pointer and keyboard injection on the remote screen.
///
/// [`ScreenMatch::click_single`](crate::ScreenMatch::click_single) only moves
/// and clicks. `write` is for callers that type into the remote session
/// between expectations, e.g. entering digits and then expecting the display
/// image that shows them.
pub trait PointerInput {
    fn move_to(&mut self, x: u32, y: u32) -> Result<(), RemoteError>;
    fn click(&mut self) -> Result<(), RemoteError>;
    /// Type `text` as key presses on the remote screen
    fn write(&mut self, text: &str) -> Result<(), RemoteError>;
}
