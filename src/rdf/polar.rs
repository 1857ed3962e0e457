//! # 极坐标重采样
//!
//! 将笛卡尔衍射图像绕给定中心重采样为极坐标图像，并沿方位角平均得到径向分布。
//!
//! ## 算法
//! - 半径 bin 数 = 中心到图像边缘的最短距离 + 1，保证不外推
//! - 角度 bin 数固定为 [`ANGLE_BINS`]
//! - 双线性插值采样，越界样本不计入均值
//!
//! ## 依赖关系
//! - 被 `rdf/pipeline.rs` 调用
//! - 使用 `models/image.rs` 的 DiffractionImage

use crate::error::{RdfError, Result};
use crate::models::DiffractionImage;

use std::f64::consts::PI;

/// 方位角采样数（0.5° 步长）
pub const ANGLE_BINS: usize = 720;

/// 极坐标图像，行 = 半径，列 = 角度
#[derive(Debug, Clone)]
pub struct PolarImage {
    radius_bins: usize,
    angle_bins: usize,
    /// 行优先，`radius_bins × angle_bins`；越界样本为 `None`
    data: Vec<Option<f64>>,
    center: (f64, f64),
}

impl PolarImage {
    /// 以 `center = (x, y)` 为中心重采样
    pub fn from_image(image: &DiffractionImage, center: (f64, f64)) -> Result<Self> {
        let (cx, cy) = center;
        let max_x = (image.width() - 1) as f64;
        let max_y = (image.height() - 1) as f64;

        if !(cx.is_finite() && cy.is_finite()) || cx < 0.0 || cy < 0.0 || cx > max_x || cy > max_y
        {
            return Err(RdfError::InvalidImage(format!(
                "center ({:.1}, {:.1}) lies outside the {}x{} image",
                cx,
                cy,
                image.height(),
                image.width()
            )));
        }

        let edge = cx.min(cy).min(max_x - cx).min(max_y - cy);
        let radius_bins = edge.floor() as usize + 1;

        let mut data = Vec::with_capacity(radius_bins * ANGLE_BINS);
        for r in 0..radius_bins {
            let radius = r as f64;
            for a in 0..ANGLE_BINS {
                let theta = 2.0 * PI * a as f64 / ANGLE_BINS as f64;
                let x = cx + radius * theta.cos();
                let y = cy + radius * theta.sin();
                data.push(image.sample_bilinear(x, y));
            }
        }

        Ok(Self {
            radius_bins,
            angle_bins: ANGLE_BINS,
            data,
            center,
        })
    }

    pub fn radius_bins(&self) -> usize {
        self.radius_bins
    }

    pub fn angle_bins(&self) -> usize {
        self.angle_bins
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    /// 某一半径处的全部有效样本
    fn valid_samples(&self, radius: usize) -> impl Iterator<Item = f64> + '_ {
        let start = radius * self.angle_bins;
        self.data[start..start + self.angle_bins]
            .iter()
            .filter_map(|v| *v)
    }

    /// 方位角平均；无有效样本时为 0
    pub fn row_mean(&self, radius: usize) -> f64 {
        let (sum, count) = self
            .valid_samples(radius)
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    /// 方位角方差（总体方差）
    pub fn row_variance(&self, radius: usize) -> f64 {
        let mean = self.row_mean(radius);
        let (sum_sq, count) = self
            .valid_samples(radius)
            .fold((0.0, 0usize), |(s, n), v| (s + (v - mean).powi(2), n + 1));
        if count == 0 {
            0.0
        } else {
            sum_sq / count as f64
        }
    }

    /// 径向分布（每个半径的方位角平均）
    pub fn radial_profile(&self) -> Vec<f64> {
        (0..self.radius_bins).map(|r| self.row_mean(r)).collect()
    }
}
