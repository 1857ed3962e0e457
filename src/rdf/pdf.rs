//! # 对分布函数变换
//!
//! PDF(r) = Σᵢ ModifiedPhi(sᵢ) · sin(2π sᵢ r)
//!
//! 直接求和（非 FFT），对任意 s 网格均成立，复杂度 O(|s|·|r|)。
//!
//! ## 依赖关系
//! - 被 `rdf/pipeline.rs` 调用

use std::f64::consts::PI;

/// 半径网格点数
pub const RADIUS_POINTS: usize = 600;

/// 生成 [r_min, r_max) 上等距的半径网格，步长 (r_max − r_min) / 600
pub fn radius_grid(r_min: f64, r_max: f64) -> Vec<f64> {
    let step = (r_max - r_min) / RADIUS_POINTS as f64;
    (0..RADIUS_POINTS).map(|i| r_min + i as f64 * step).collect()
}

/// 离散正弦变换
pub fn calculate_pdf(s: &[f64], modified_phi: &[f64], r_ranges: &[f64]) -> Vec<f64> {
    r_ranges
        .iter()
        .map(|&r| {
            s.iter()
                .zip(modified_phi)
                .map(|(s, phi)| phi * (2.0 * PI * s * r).sin())
                .sum()
        })
        .collect()
}
