//! # scattering 子命令 CLI 定义
//!
//! 按组成列出电子散射因子 f(s) 与 f²(s)。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/scattering.rs`

use clap::Args;
use std::path::PathBuf;

/// scattering 子命令参数
#[derive(Args, Debug)]
pub struct ScatteringArgs {
    /// Kirkland scattering-factor table (CSV); defaults to kirkland.csv
    /// next to the executable, then in the working directory
    #[arg(long, env = "STEMRDF_PARAMS")]
    pub params: Option<PathBuf>,

    /// Sample composition, e.g. "Si:60,O:40" (required unless --list)
    #[arg(short, long, required_unless_present = "list")]
    pub composition: Option<String>,

    /// s range in 1/Å (e.g., "0-2")
    #[arg(short, long, default_value = "0-2")]
    pub range: String,

    /// Number of s samples
    #[arg(long, default_value_t = 21)]
    pub points: usize,

    /// Write the table to this CSV file instead of only printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List the elements available in the parametrization table
    #[arg(long, default_value_t = false)]
    pub list: bool,
}
