pub mod orientation;
pub mod processor;

pub use orientation::ImageOrientation;
pub use processor::ImageProcessor;
