//! Data models for the application
//!
//! Image values flowing through the upload pipeline, the caller-owned working
//! list and notices, and the report submission wire types.

mod image;
mod notice;
mod report;
mod working_list;

pub use image::*;
pub use notice::*;
pub use report::*;
pub use working_list::*;
