//! # stemrdf - 4D-STEM 约化分布函数工具
//!
//! 从二维电子衍射图样提取约化强度 φ(s) 与对分布函数 G(r)。
//!
//! ## 子命令
//! - `rdf` - 完整流水线：极坐标重采样 → 背景拟合 → 基线扣除 → PDF
//! - `profile` - 仅输出径向分布，用于选择中心与拟合窗口
//! - `scattering` - 列出组成加权的电子散射因子
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (图像、参数表、组成解析)
//!   │     ├── rdf/       (计算流水线、绘图、导出)
//!   │     ├── batch/     (目录批量处理)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod rdf;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
