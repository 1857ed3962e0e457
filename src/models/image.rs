//! # 衍射图像数据模型
//!
//! 二维衍射强度图（行优先存储），一次分析会话内不可变。
//!
//! ## 依赖关系
//! - 被 `parsers/matrix.rs` 构造
//! - 被 `rdf/polar.rs`, `rdf/pipeline.rs` 使用
//! - 无外部模块依赖

use crate::error::{RdfError, Result};

/// 二维衍射图像
///
/// 强度值均为有限非负实数，尺寸为 `height × width`。
#[derive(Debug, Clone, PartialEq)]
pub struct DiffractionImage {
    width: usize,
    height: usize,
    /// 行优先像素数据
    data: Vec<f64>,
}

impl DiffractionImage {
    /// 从行优先数据创建
    pub fn new(width: usize, height: usize, data: Vec<f64>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RdfError::InvalidImage(format!(
                "image must be two-dimensional, got {}x{}",
                height, width
            )));
        }
        if data.len() != width * height {
            return Err(RdfError::InvalidImage(format!(
                "expected {} pixels for a {}x{} image, got {}",
                width * height,
                height,
                width,
                data.len()
            )));
        }
        if let Some((i, v)) = data
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(RdfError::InvalidImage(format!(
                "pixel ({}, {}) has value {}; intensities must be finite and non-negative",
                i / width,
                i % width,
                v
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// 从行列表创建（各行长度必须一致）
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);

        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(RdfError::InvalidImage(format!(
                "ragged input: row {} has {} columns, expected {}",
                i,
                row.len(),
                width
            )));
        }

        let data = rows.into_iter().flatten().collect();
        Self::new(width, height, data)
    }

    /// 由像素函数生成图像，`f(row, col)`
    #[cfg(test)]
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self::new(width, height, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// 像素值
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.width + col]
    }

    /// 默认中心 `(x, y) = (W/2, H/2)`（整数除法）
    pub fn default_center(&self) -> (f64, f64) {
        ((self.width / 2) as f64, (self.height / 2) as f64)
    }

    /// 双线性插值采样，越界时返回 `None`
    pub fn sample_bilinear(&self, x: f64, y: f64) -> Option<f64> {
        let max_x = (self.width - 1) as f64;
        let max_y = (self.height - 1) as f64;
        // 容忍三角函数带来的微小越界
        let eps = 1e-9;
        if !(x >= -eps && y >= -eps && x <= max_x + eps && y <= max_y + eps) {
            return None;
        }
        let x = x.clamp(0.0, max_x);
        let y = y.clamp(0.0, max_y);

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = x - x0 as f64;
        let ty = y - y0 as f64;

        let top = self.get(y0, x0) * (1.0 - tx) + self.get(y0, x1) * tx;
        let bottom = self.get(y1, x0) * (1.0 - tx) + self.get(y1, x1) * tx;
        Some(top * (1.0 - ty) + bottom * ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            DiffractionImage::from_rows(rows),
            Err(RdfError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_rejects_empty_and_negative() {
        assert!(DiffractionImage::from_rows(vec![]).is_err());
        assert!(DiffractionImage::from_rows(vec![vec![0.0, -1.0]]).is_err());
        assert!(DiffractionImage::from_rows(vec![vec![f64::NAN]]).is_err());
    }

    #[test]
    fn test_bilinear_interpolation() {
        let img = DiffractionImage::from_rows(vec![vec![0.0, 1.0], vec![2.0, 3.0]]).unwrap();
        assert_eq!(img.sample_bilinear(0.0, 0.0), Some(0.0));
        assert_eq!(img.sample_bilinear(1.0, 1.0), Some(3.0));
        let mid = img.sample_bilinear(0.5, 0.5).unwrap();
        assert!((mid - 1.5).abs() < 1e-12, "got {}", mid);
        assert_eq!(img.sample_bilinear(1.5, 0.0), None);
    }

    #[test]
    fn test_default_center() {
        let img = DiffractionImage::from_fn(5, 4, |_, _| 0.0).unwrap();
        assert_eq!(img.default_center(), (2.0, 2.0));
    }
}
