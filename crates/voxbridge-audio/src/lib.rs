pub mod capture;
pub mod device;
pub mod framer;

pub use capture::{CaptureHandle, CaptureNode, CaptureStatus, FRAME_QUEUE_DEPTH};
pub use device::DeviceManager;
pub use framer::FrameAssembler;
