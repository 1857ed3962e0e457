//! # RDF 计算模块
//!
//! 从二维衍射图样提取约化分布函数 / 对分布函数。
//!
//! ## 子模块
//! - `polar`: 极坐标重采样与方位角平均
//! - `scattering`: 组成加权的原子散射因子
//! - `background`: 独立原子背景拟合
//! - `reduced`: 约化强度 φ(s)
//! - `baseline`: 多项式基线扣除与过零截断
//! - `pdf`: 离散正弦变换
//! - `pipeline`: 参数、流水线和会话处理器
//! - `plot`: 图表生成
//! - `export`: 数据导出
//!
//! ## 依赖关系
//! - 被 `commands/rdf.rs`, `commands/profile.rs`, `commands/scattering.rs` 使用
//! - 使用 `models/` 的 DiffractionImage, Composition

pub mod background;
pub mod baseline;
pub mod export;
pub mod pdf;
pub mod pipeline;
pub mod plot;
pub mod polar;
pub mod reduced;
pub mod scattering;

pub use pipeline::{RdfConfig, RdfProcessor, RdfResult};
pub use polar::PolarImage;
pub use scattering::{ParametrizationTable, ScatteringModel};
