//! # profile 子命令 CLI 定义
//!
//! 仅做极坐标重采样，输出径向分布。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/profile.rs`

use super::rdf::{parse_center, OutputFormat};
use clap::Args;
use std::path::PathBuf;

/// profile 子命令参数
#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Diffraction pattern matrix file
    pub input: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "profile.png")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Momentum transfer per pixel (calibration)
    #[arg(long, default_value_t = 0.036)]
    pub q_per_pixel: f64,

    /// Pattern center in pixels as x,y (default: image center)
    #[arg(long, value_parser = parse_center)]
    pub center: Option<(f64, f64)>,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Title for the plot (default: input file name)
    #[arg(long)]
    pub title: Option<String>,
}
