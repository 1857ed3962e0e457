//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `rdf/`, `batch/`, `utils/`
//! - 子模块: rdf, profile, scattering

pub mod profile;
pub mod rdf;
pub mod scattering;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Rdf(args) => rdf::execute(args),
        Commands::Profile(args) => profile::execute(args),
        Commands::Scattering(args) => scattering::execute(args),
    }
}
