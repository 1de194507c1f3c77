pub mod network;
pub mod physics;

/// Seconds covered by the phase currently being dispatched.
/// Holds the fixed step while fixed update runs.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct DeltaTime(pub f32);

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCount(pub u64);
