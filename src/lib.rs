// Photomark library: watermark compositing for captured photos

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod storage;
pub mod watermark;
