//! # 约化强度
//!
//! φ(s) = (I(s) − N·f²(s)) / (N·f(s)²) · s
//!
//! 调用方需保证窗口内 f(s) 不为零。
//!
//! ## 依赖关系
//! - 被 `rdf/pipeline.rs` 调用

/// 逐点计算约化强度 φ(s)
pub fn reduced_intensity(
    s: &[f64],
    radial_mean: &[f64],
    n_fit: f64,
    scattering_factor: &[f64],
    scattering_factor_sq: &[f64],
) -> Vec<f64> {
    s.iter()
        .zip(radial_mean)
        .zip(scattering_factor.iter().zip(scattering_factor_sq))
        .map(|((s, i), (f, f_sq))| (i - n_fit * f_sq) / (n_fit * f * f) * s)
        .collect()
}
