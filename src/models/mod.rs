//! # 数据模型模块
//!
//! 定义衍射图像和样品组成的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`rdf/` 和 `commands/` 使用
//! - 子模块: image, composition

pub mod composition;
pub mod image;

pub use composition::{Composition, ElementWeight};
pub use image::DiffractionImage;
