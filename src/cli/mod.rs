//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `rdf`: 衍射图样 → 约化强度 → 对分布函数（支持批量目录）
//! - `profile`: 径向分布（方位角平均）
//! - `scattering`: 组成加权的电子散射因子表
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: rdf, profile, scattering

pub mod profile;
pub mod rdf;
pub mod scattering;

use clap::{Parser, Subcommand};

/// stemrdf - 4D-STEM 衍射图样的约化分布函数工具
#[derive(Parser)]
#[command(name = "stemrdf")]
#[command(version)]
#[command(about = "Reduced/pair distribution functions from 4D-STEM diffraction patterns", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Extract the reduced intensity and pair distribution function
    Rdf(rdf::RdfArgs),

    /// Compute the azimuthally averaged radial profile
    Profile(profile::ProfileArgs),

    /// Tabulate composition-weighted electron scattering factors
    Scattering(scattering::ScatteringArgs),
}
