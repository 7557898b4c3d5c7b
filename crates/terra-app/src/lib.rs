//! Globe viewer application: compositor, frame scheduling, and the window.

pub mod compositor;
pub mod frame_loop;
pub mod input;
pub mod window;

pub use compositor::{Compositor, CompositorSettings, FrameSink, SelectionCallback};
pub use frame_loop::{FrameLoop, FrameRequester};
pub use input::{PointerState, Release};
pub use window::{AppState, run};
