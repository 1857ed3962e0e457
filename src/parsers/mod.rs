//! # 解析器模块
//!
//! 提供衍射图像矩阵、散射因子参数表和组成字符串的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: matrix, kirkland, composition

pub mod composition;
pub mod kirkland;
pub mod matrix;

pub use composition::parse_composition;
pub use kirkland::load_parametrization;

use crate::error::{RdfError, Result};
use crate::models::DiffractionImage;
use std::path::Path;

/// 从文件路径推断分隔符并读取衍射图像
pub fn parse_image_file(path: &Path) -> Result<DiffractionImage> {
    if !path.is_file() {
        return Err(RdfError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => matrix::parse_delimited_file(path, b','),
        "tsv" => matrix::parse_delimited_file(path, b'\t'),
        _ => matrix::parse_whitespace_file(path),
    }
}
