//! 图像处理模块

pub mod frame;
pub mod resample;
pub mod rgb565;
pub mod sequence;

pub use frame::{Animation, EncodedFrame, Frame};
pub use resample::{resize_frame, target_dimensions};
pub use sequence::decode_source;
