//! Screenshot download and processing.

pub mod downloader;
pub mod mosaic;

pub use downloader::ScreenshotDownloader;
pub use mosaic::{apply_mosaic, blur_radius};
