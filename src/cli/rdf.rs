//! # rdf 子命令 CLI 定义
//!
//! 从衍射图样计算约化强度与对分布函数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/rdf.rs`
//! - `OutputFormat`, `parse_center` 也被 `cli/profile.rs` 使用

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
    /// CSV data files
    Csv,
    /// XY data file (two columns)
    Xy,
    /// JSON record with every intermediate array
    Json,
}

impl OutputFormat {
    /// 文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Csv => "csv",
            OutputFormat::Xy => "xy",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// 解析重采样中心 "x,y"（像素）
pub fn parse_center(input: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(format!("Invalid center '{}'. Use x,y (e.g., 128,130)", input));
    }
    let x = parts[0]
        .parse::<f64>()
        .map_err(|_| format!("Invalid center x '{}'", parts[0]))?;
    let y = parts[1]
        .parse::<f64>()
        .map_err(|_| format!("Invalid center y '{}'", parts[1]))?;
    Ok((x, y))
}

/// rdf 子命令参数
#[derive(Args, Debug)]
pub struct RdfArgs {
    /// Input: diffraction pattern matrix file, or directory of them
    pub input: PathBuf,

    /// Kirkland scattering-factor table (CSV); defaults to kirkland.csv
    /// next to the executable, then in the working directory
    #[arg(long, env = "STEMRDF_PARAMS")]
    pub params: Option<PathBuf>,

    /// Sample composition, e.g. "Si:60,O:40" or "14:60,8:40"
    #[arg(short, long)]
    pub composition: String,

    /// Output: file path (single mode) or directory (batch mode)
    #[arg(short, long, default_value = "rdf.png")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Momentum transfer per pixel (calibration)
    #[arg(long, default_value_t = 0.036)]
    pub q_per_pixel: f64,

    /// First radial-profile index of the fit window (inclusive)
    #[arg(long, default_value_t = 0)]
    pub start: usize,

    /// Last radial-profile index of the fit window (exclusive)
    #[arg(long, default_value_t = 100)]
    pub end: usize,

    /// Fraction of the window after which the background tail fit starts
    #[arg(long, default_value_t = 0.9)]
    pub fit_threshold: f64,

    /// Minimum real-space radius (Å)
    #[arg(long, default_value_t = 0.0)]
    pub r_min: f64,

    /// Maximum real-space radius (Å, exclusive)
    #[arg(long, default_value_t = 10.0)]
    pub r_max: f64,

    /// Pattern center in pixels as x,y (default: image center)
    #[arg(long, value_parser = parse_center)]
    pub center: Option<(f64, f64)>,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1400)]
    pub height: u32,

    /// Title for the plot (default: input file name)
    #[arg(long)]
    pub title: Option<String>,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode, e.g., "*.csv,*.txt")
    #[arg(long, default_value = "*.csv,*.tsv,*.txt,*.dat")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_center() {
        assert_eq!(parse_center("128, 130.5"), Ok((128.0, 130.5)));
        assert!(parse_center("128").is_err());
        assert!(parse_center("a,b").is_err());
    }
}
