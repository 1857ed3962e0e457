//! # 多项式基线扣除
//!
//! 对 φ(s) 做 4 阶多项式最小二乘拟合，截断到拟合曲线最后一个最接近零的位置，
//! 并扣除基线。
//!
//! ## 算法
//! 1. Vandermonde 回归（SVD 求解，横坐标按 max|s| 缩放以改善条件数）
//! 2. 从高 s 端向前扫描 |y_fit|，取全局最小值的最后出现位置 k
//! 3. 保留 [0, k]，ModifiedPhi = φ − y_fit
//!
//! ## 依赖关系
//! - 被 `rdf/pipeline.rs` 调用
//! - 使用 `nalgebra` 求解最小二乘

use crate::error::{RdfError, Result};

use nalgebra::{DMatrix, DVector};

/// 基线多项式阶数
pub const BASELINE_DEGREE: usize = 4;

/// 最小二乘多项式（缩放变量 x / scale 上的系数，高次在前）
#[derive(Debug, Clone)]
pub struct Polynomial {
    coefficients: Vec<f64>,
    scale: f64,
}

impl Polynomial {
    /// Vandermonde 最小二乘拟合
    pub fn fit(x: &[f64], y: &[f64], degree: usize) -> Result<Self> {
        if x.len() != y.len() || x.is_empty() {
            return Err(RdfError::DegenerateFit(format!(
                "cannot fit a polynomial to {} x / {} y samples",
                x.len(),
                y.len()
            )));
        }

        let max_abs = x.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let scale = if max_abs > 0.0 { max_abs } else { 1.0 };

        let cols = degree + 1;
        let vander = DMatrix::from_fn(x.len(), cols, |i, j| {
            (x[i] / scale).powi((degree - j) as i32)
        });
        let rhs = DVector::from_column_slice(y);

        let svd = vander.svd(true, true);
        let max_sv = svd.singular_values.max();
        let eps = max_sv * x.len() as f64 * f64::EPSILON;
        let solution = svd
            .solve(&rhs, eps)
            .map_err(|e| RdfError::DegenerateFit(format!("polynomial fit failed: {}", e)))?;

        Ok(Self {
            coefficients: solution.iter().copied().collect(),
            scale,
        })
    }

    /// Horner 求值
    pub fn eval(&self, x: f64) -> f64 {
        let t = x / self.scale;
        self.coefficients.iter().fold(0.0, |acc, c| acc * t + c)
    }
}

/// 基线扣除结果
#[derive(Debug, Clone)]
pub struct BaselineCorrection {
    /// 多项式在每个 s 上的取值
    pub y_fit: Vec<f64>,
    /// 截断位置 k（含）
    pub cut_index: usize,
    /// 截断后的 s
    pub ind_s: Vec<f64>,
    /// 截断后的 φ − y_fit
    pub ind_modified_phi: Vec<f64>,
}

/// 拟合 4 阶多项式并在 s 上求值
pub fn fit_polynomial(s: &[f64], phi: &[f64]) -> Result<Vec<f64>> {
    let poly = Polynomial::fit(s, phi, BASELINE_DEGREE)?;
    Ok(s.iter().map(|&x| poly.eval(x)).collect())
}

/// 最后一个最接近零的位置（反向扫描取 argmin）
pub fn cut_at_zero(y_fit: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in y_fit.iter().enumerate().rev() {
        let mag = v.abs();
        match best {
            Some((_, m)) if mag >= m => {}
            _ => best = Some((i, mag)),
        }
    }
    best.map(|(i, _)| i)
}

/// 完整基线扣除
pub fn remove_baseline(s: &[f64], phi: &[f64]) -> Result<BaselineCorrection> {
    let y_fit = fit_polynomial(s, phi)?;
    let cut_index = cut_at_zero(&y_fit)
        .ok_or_else(|| RdfError::DegenerateFit("baseline is empty".to_string()))?;

    let ind_s = s[..=cut_index].to_vec();
    let ind_modified_phi = phi[..=cut_index]
        .iter()
        .zip(&y_fit[..=cut_index])
        .map(|(p, y)| p - y)
        .collect();

    Ok(BaselineCorrection {
        y_fit,
        cut_index,
        ind_s,
        ind_modified_phi,
    })
}
