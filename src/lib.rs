//! Plant Disease Detector
//!
//! 植物の画像を `/api/process-image` に送信し、診断結果を表示するクライアント

pub mod analyzer;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod picker;
pub mod scanner;
pub mod session;
pub mod upload;
