//! Frame system trait

use glyphwall_core::Result;

use crate::clock::FrameTime;

/// A system that can be ticked by the frame loop
///
/// The loop calls `frame` exactly once per display refresh while armed. The
/// surface type is chosen by the system so hosts can pass whatever drawing
/// collaborator they own.
pub trait FrameSystem {
    /// Drawing collaborator handed to every frame
    type Surface: ?Sized;

    /// Called once when the loop starts
    fn initialize(&mut self) -> Result<()>;

    /// Called once per display refresh with the host-supplied frame time
    fn frame(&mut self, time: &FrameTime, surface: &mut Self::Surface) -> Result<()>;

    /// Called when the loop is cancelled (view teardown)
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
