//! # 独立原子背景拟合
//!
//! 求标量 N，使窗口尾部的径向强度与 N·f²(s) 在最小二乘意义下最接近。
//!
//! ## 算法
//! 1. `tail_start = floor(len × fit_threshold)`，只用尾部数据拟合
//! 2. 初值 N₀ = Σ I / Σ f²（整个窗口，而非尾部）
//! 3. 单参数 Levenberg–Marquardt 迭代，残差 rᵢ = Iᵢ − N·aᵢ
//!
//! 模型对 N 是线性的，收敛点即闭式解 Σ(I·a) / Σ(a²)。
//!
//! ## 依赖关系
//! - 被 `rdf/pipeline.rs` 调用
//! - 无外部模块依赖

use crate::error::{RdfError, Result};

/// 最大迭代次数
const MAX_ITERATIONS: usize = 200;
/// 相对步长收敛阈值
const STEP_TOLERANCE: f64 = 1e-12;

/// 拟合背景缩放因子 N_fit
pub fn fit_background(
    intensity: &[f64],
    scattering_factor_sq: &[f64],
    fit_threshold: f64,
) -> Result<f64> {
    if intensity.len() != scattering_factor_sq.len() {
        return Err(RdfError::DegenerateFit(format!(
            "intensity has {} samples but scattering factor has {}",
            intensity.len(),
            scattering_factor_sq.len()
        )));
    }

    let tail_start = (intensity.len() as f64 * fit_threshold).floor() as usize;
    let tail_i = &intensity[tail_start.min(intensity.len())..];
    let tail_a = &scattering_factor_sq[tail_start.min(scattering_factor_sq.len())..];

    if tail_i.is_empty() {
        return Err(RdfError::DegenerateFit(format!(
            "fit threshold {} leaves no samples in a window of {}",
            fit_threshold,
            intensity.len()
        )));
    }

    // 雅可比 J = -a，JᵀJ = Σa²
    let jtj: f64 = tail_a.iter().map(|a| a * a).sum();
    if !jtj.is_finite() || jtj <= 0.0 {
        return Err(RdfError::DegenerateFit(
            "scattering factor vanishes over the fit tail".to_string(),
        ));
    }

    let seed = intensity.iter().sum::<f64>() / scattering_factor_sq.iter().sum::<f64>();
    if !seed.is_finite() {
        return Err(RdfError::DegenerateFit(format!(
            "initial guess is not finite ({})",
            seed
        )));
    }

    let cost = |n: f64| -> f64 {
        tail_i
            .iter()
            .zip(tail_a)
            .map(|(i, a)| (i - n * a).powi(2))
            .sum()
    };

    let mut n = seed;
    let mut current_cost = cost(n);
    let mut lambda = 1e-3;
    let mut converged = false;

    for _ in 0..MAX_ITERATIONS {
        // Jᵀr = -Σ a·r，Gauss-Newton 步 = Σ a·r / (JᵀJ (1 + λ))
        let atr: f64 = tail_i
            .iter()
            .zip(tail_a)
            .map(|(i, a)| a * (i - n * a))
            .sum();
        let step = atr / (jtj * (1.0 + lambda));
        let candidate = n + step;
        let candidate_cost = cost(candidate);

        if candidate_cost <= current_cost {
            n = candidate;
            current_cost = candidate_cost;
            lambda *= 0.1;
            if step.abs() <= STEP_TOLERANCE * (n.abs() + STEP_TOLERANCE) {
                converged = true;
                break;
            }
        } else {
            lambda *= 10.0;
            if lambda > 1e12 {
                // 已无法下降，视为收敛于当前点
                converged = true;
                break;
            }
        }
    }

    if !converged {
        return Err(RdfError::DegenerateFit(format!(
            "solver did not converge within {} iterations",
            MAX_ITERATIONS
        )));
    }
    if !n.is_finite() || n <= 0.0 {
        return Err(RdfError::DegenerateFit(format!(
            "fitted background scale is {}",
            n
        )));
    }

    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_f_sq(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| {
                let s = 0.036 * i as f64 / 2f64.sqrt();
                1.0 / (1.0 + s * s).powi(2)
            })
            .collect()
    }

    #[test]
    fn test_recovers_ground_truth_scale() {
        let a = synthetic_f_sq(100);
        let n0 = 3.7;
        let intensity: Vec<f64> = a.iter().map(|v| n0 * v).collect();
        let n_fit = fit_background(&intensity, &a, 0.9).unwrap();
        assert!(
            (n_fit - n0).abs() < 1e-9,
            "expected N ≈ {}, got {}",
            n0,
            n_fit
        );
    }

    #[test]
    fn test_only_tail_is_fitted() {
        let a = synthetic_f_sq(100);
        // 头部加入大峰，尾部保持 2·a
        let intensity: Vec<f64> = a
            .iter()
            .enumerate()
            .map(|(i, v)| if i < 90 { 50.0 } else { 2.0 * v })
            .collect();
        let n_fit = fit_background(&intensity, &a, 0.9).unwrap();
        assert!((n_fit - 2.0).abs() < 1e-9, "got {}", n_fit);
    }

    #[test]
    fn test_matches_closed_form() {
        let a = synthetic_f_sq(60);
        let intensity: Vec<f64> = a
            .iter()
            .enumerate()
            .map(|(i, v)| 1.5 * v + 0.01 * ((i as f64) * 0.7).sin())
            .collect();
        let tail = (60.0 * 0.5) as usize;
        let closed: f64 = intensity[tail..]
            .iter()
            .zip(&a[tail..])
            .map(|(i, a)| i * a)
            .sum::<f64>()
            / a[tail..].iter().map(|a| a * a).sum::<f64>();
        let n_fit = fit_background(&intensity, &a, 0.5).unwrap();
        assert!((n_fit - closed).abs() < 1e-9 * closed.abs());
    }

    #[test]
    fn test_zero_scattering_factor_is_degenerate() {
        let a = vec![0.0; 20];
        let intensity = vec![1.0; 20];
        assert!(matches!(
            fit_background(&intensity, &a, 0.9),
            Err(RdfError::DegenerateFit(_))
        ));
    }

    #[test]
    fn test_negative_scale_is_degenerate() {
        let a = synthetic_f_sq(50);
        let intensity: Vec<f64> = a.iter().map(|v| -2.0 * v).collect();
        assert!(matches!(
            fit_background(&intensity, &a, 0.9),
            Err(RdfError::DegenerateFit(_))
        ));
    }

    #[test]
    fn test_empty_window_is_degenerate() {
        assert!(matches!(
            fit_background(&[], &[], 0.9),
            Err(RdfError::DegenerateFit(_))
        ));
    }
}
