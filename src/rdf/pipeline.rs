//! # RDF 流水线
//!
//! 串联各计算阶段：径向分布 → 背景拟合 → 约化强度 → 基线扣除 → PDF。
//!
//! ## 结构
//! - [`RdfConfig`]：强类型参数，在入口处统一校验
//! - [`run`]：纯函数，输入配置、径向分布和散射模型，输出全部中间数组
//! - [`RdfProcessor`]：会话对象，缓存图像的极坐标重采样和散射模型
//!
//! ## 依赖关系
//! - 被 `commands/rdf.rs` 调用
//! - 使用 `rdf/` 下各计算阶段
//! - 使用 `models/` 的 DiffractionImage, Composition

use crate::error::{RdfError, Result};
use crate::models::{Composition, DiffractionImage};
use crate::rdf::background::fit_background;
use crate::rdf::baseline::remove_baseline;
use crate::rdf::pdf::{calculate_pdf, radius_grid};
use crate::rdf::polar::PolarImage;
use crate::rdf::reduced::reduced_intensity;
use crate::rdf::scattering::{ParametrizationTable, ScatteringModel};

use serde::Serialize;
use std::sync::Arc;

/// 流水线参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RdfConfig {
    /// 每像素对应的动量传递（标定常数）
    pub q_per_pixel: f64,
    /// 拟合窗口起点（含）
    pub start_index: usize,
    /// 拟合窗口终点（不含）
    pub end_index: usize,
    /// 背景拟合尾部起点占窗口的比例，(0, 1)
    pub fit_threshold: f64,
    /// 实空间半径下限
    pub r_min: f64,
    /// 实空间半径上限（不含）
    pub r_max: f64,
}

impl Default for RdfConfig {
    fn default() -> Self {
        Self {
            q_per_pixel: 0.036,
            start_index: 0,
            end_index: 100,
            fit_threshold: 0.9,
            r_min: 0.0,
            r_max: 10.0,
        }
    }
}

impl RdfConfig {
    /// 校验与径向分布长度无关的参数
    pub fn validate(&self) -> Result<()> {
        if !self.q_per_pixel.is_finite() || self.q_per_pixel <= 0.0 {
            return Err(RdfError::InvalidArgument(format!(
                "q_per_pixel must be positive, got {}",
                self.q_per_pixel
            )));
        }
        if self.start_index >= self.end_index {
            return Err(RdfError::InvalidWindow {
                start: self.start_index,
                end: self.end_index,
                len: self.end_index.saturating_sub(self.start_index),
            });
        }
        if !(self.fit_threshold > 0.0 && self.fit_threshold < 1.0) {
            return Err(RdfError::InvalidArgument(format!(
                "fit_threshold must lie in (0, 1), got {}",
                self.fit_threshold
            )));
        }
        if !(self.r_min.is_finite() && self.r_max.is_finite()) || self.r_min >= self.r_max {
            return Err(RdfError::InvalidRange(format!(
                "{}-{} (must be finite with r_min < r_max)",
                self.r_min, self.r_max
            )));
        }
        Ok(())
    }

    /// 校验窗口是否落在径向分布内
    pub fn check_window(&self, profile_len: usize) -> Result<()> {
        if self.start_index >= self.end_index || self.end_index > profile_len {
            return Err(RdfError::InvalidWindow {
                start: self.start_index,
                end: self.end_index,
                len: profile_len,
            });
        }
        Ok(())
    }
}

/// 流水线输出；字段名与前端约定一致
#[derive(Debug, Clone, Serialize)]
pub struct RdfResult {
    pub s: Vec<f64>,
    pub radial_mean: Vec<f64>,
    pub scattering_factor: Vec<f64>,
    pub background: Vec<f64>,
    pub phi: Vec<f64>,
    pub y_fit: Vec<f64>,
    pub ind_s: Vec<f64>,
    pub ind_modified_phi: Vec<f64>,
    pub r_ranges: Vec<f64>,
    pub pdf: Vec<f64>,
    /// 背景缩放因子
    pub n_fit: f64,
    /// 截断位置（相对窗口）
    pub cut_index: usize,
}

impl RdfResult {
    /// PDF 最大值位置 (r, PDF(r))
    pub fn pdf_peak(&self) -> Option<(f64, f64)> {
        self.r_ranges
            .iter()
            .zip(&self.pdf)
            .filter(|(_, p)| p.is_finite())
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(r, p)| (*r, *p))
    }
}

/// 动量传递 s = q_per_pixel · i / √2
pub fn momentum_transfer(q_per_pixel: f64, len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| q_per_pixel * i as f64 / std::f64::consts::SQRT_2)
        .collect()
}

/// 在已有径向分布上运行完整流水线
pub fn run(config: &RdfConfig, radial_profile: &[f64], model: &ScatteringModel) -> Result<RdfResult> {
    config.validate()?;
    config.check_window(radial_profile.len())?;

    let window = config.start_index..config.end_index;
    let s = momentum_transfer(config.q_per_pixel, radial_profile.len())[window.clone()].to_vec();
    let radial_mean = radial_profile[window].to_vec();

    let (scattering_factor, scattering_factor_sq) = model.evaluate(&s);

    let n_fit = fit_background(&radial_mean, &scattering_factor_sq, config.fit_threshold)?;
    let background = scattering_factor.iter().map(|f| n_fit * f).collect();

    let phi = reduced_intensity(
        &s,
        &radial_mean,
        n_fit,
        &scattering_factor,
        &scattering_factor_sq,
    );

    let baseline = remove_baseline(&s, &phi)?;

    let r_ranges = radius_grid(config.r_min, config.r_max);
    let pdf = calculate_pdf(&baseline.ind_s, &baseline.ind_modified_phi, &r_ranges);

    Ok(RdfResult {
        s,
        radial_mean,
        scattering_factor,
        background,
        phi,
        y_fit: baseline.y_fit,
        ind_s: baseline.ind_s,
        ind_modified_phi: baseline.ind_modified_phi,
        r_ranges,
        pdf,
        n_fit,
        cut_index: baseline.cut_index,
    })
}

/// RDF 会话处理器
///
/// 每个会话独占一个实例；`set_*` 与 `process` 都会修改内部状态，不做加锁。
pub struct RdfProcessor {
    table: Arc<ParametrizationTable>,
    config: RdfConfig,
    center: Option<(f64, f64)>,
    image: Option<DiffractionImage>,
    polar: Option<PolarImage>,
    profile: Option<Vec<f64>>,
    model: Option<ScatteringModel>,
}

impl RdfProcessor {
    /// 创建处理器，注入散射因子参数表
    pub fn new(table: Arc<ParametrizationTable>) -> Self {
        Self {
            table,
            config: RdfConfig::default(),
            center: None,
            image: None,
            polar: None,
            profile: None,
            model: None,
        }
    }

    /// 设置衍射图像并立即缓存极坐标重采样结果
    pub fn set_image(&mut self, image: DiffractionImage) -> Result<()> {
        let center = self.center.unwrap_or_else(|| image.default_center());
        let polar = PolarImage::from_image(&image, center)?;
        self.profile = Some(polar.radial_profile());
        self.polar = Some(polar);
        self.image = Some(image);
        Ok(())
    }

    /// 指定重采样中心 `(x, y)`；`None` 表示使用图像中心。已有图像会被重新采样。
    pub fn set_center(&mut self, center: Option<(f64, f64)>) -> Result<()> {
        if let Some(image) = &self.image {
            let polar = PolarImage::from_image(image, center.unwrap_or(image.default_center()))?;
            self.profile = Some(polar.radial_profile());
            self.polar = Some(polar);
        }
        self.center = center;
        Ok(())
    }

    /// 设置并校验流水线参数
    pub fn set_parameters(&mut self, config: RdfConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// 设置组成并重建散射因子模型
    pub fn set_composition(&mut self, composition: Composition) -> Result<()> {
        if composition.is_empty() {
            return Err(RdfError::InvalidComposition(
                "composition lists no elements".to_string(),
            ));
        }
        self.model = Some(ScatteringModel::new(&self.table, &composition)?);
        Ok(())
    }

    pub fn image(&self) -> Option<&DiffractionImage> {
        self.image.as_ref()
    }

    pub fn polar_image(&self) -> Option<&PolarImage> {
        self.polar.as_ref()
    }

    pub fn radial_profile(&self) -> Option<&[f64]> {
        self.profile.as_deref()
    }

    pub fn config(&self) -> &RdfConfig {
        &self.config
    }

    /// 运行流水线
    pub fn process(&self) -> Result<RdfResult> {
        let profile = self
            .profile
            .as_deref()
            .ok_or_else(|| RdfError::MissingInput("image".to_string()))?;
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| RdfError::MissingInput("composition".to_string()))?;
        run(&self.config, profile, model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ElementWeight;
    use crate::rdf::scattering::tests::{heavy_params, synthetic_table};
    use crate::rdf::scattering::ElementEntry;

    fn ring_image() -> DiffractionImage {
        DiffractionImage::from_fn(256, 256, |row, col| {
            let d = ((col as f64 - 128.0).powi(2) + (row as f64 - 128.0).powi(2)).sqrt();
            0.01 + (-(d - 50.0).powi(2) / (2.0 * 2.0 * 2.0)).exp()
        })
        .unwrap()
    }

    fn processor() -> RdfProcessor {
        RdfProcessor::new(Arc::new(synthetic_table()))
    }

    fn silicon() -> Composition {
        Composition::new(vec![ElementWeight::new(14, 100.0)])
    }

    /// 由重元素合成参数构成的单元素参数表
    fn heavy_table() -> ParametrizationTable {
        let mut table = ParametrizationTable::new();
        table.insert(ElementEntry {
            atomic_number: 29,
            symbol: "Cu".to_string(),
            params: heavy_params(),
        });
        table
    }

    #[test]
    fn test_end_to_end_ring() {
        let mut proc = RdfProcessor::new(Arc::new(heavy_table()));
        proc.set_image(ring_image()).unwrap();
        proc.set_parameters(RdfConfig::default()).unwrap();
        proc.set_composition(Composition::new(vec![ElementWeight::new(29, 100.0)]))
            .unwrap();

        let profile = proc.radial_profile().unwrap();
        let (peak, _) = profile
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();
        assert!((peak as i64 - 50).abs() <= 1, "profile peak at {}", peak);

        let result = proc.process().unwrap();
        assert!(
            result.n_fit > 0.0 && result.n_fit < 0.1,
            "N_fit = {}",
            result.n_fit
        );

        let n = 100;
        for (name, v) in [
            ("s", &result.s),
            ("radial_mean", &result.radial_mean),
            ("scattering_factor", &result.scattering_factor),
            ("background", &result.background),
            ("phi", &result.phi),
            ("y_fit", &result.y_fit),
        ] {
            assert_eq!(v.len(), n, "{} length", name);
        }
        assert_eq!(result.ind_s.len(), result.cut_index + 1);
        assert_eq!(result.ind_modified_phi.len(), result.ind_s.len());
        assert_eq!(result.r_ranges.len(), 600);
        assert_eq!(result.pdf.len(), 600);
        assert!(result.pdf.iter().all(|p| p.is_finite()));

        // 截断后仍保留衍射环所在的样本
        assert!(result.cut_index >= 50, "cut at {}", result.cut_index);

        // 环对应 s₀ = q·50/√2；sin(2π s₀ r) 的正峰位于 r·s₀ ≡ 1/4 (mod 1)
        let s0 = 0.036 * 50.0 / std::f64::consts::SQRT_2;
        let (r_peak, g_peak) = result.pdf_peak().unwrap();
        assert!(g_peak > 0.0, "PDF maximum {}", g_peak);
        let phase = (r_peak * s0).fract();
        assert!((phase - 0.25).abs() < 0.06, "peak at r = {} (phase {})", r_peak, phase);

        // 主要正峰之间的间距 ≈ 1/s₀
        let pdf = &result.pdf;
        let strong: Vec<f64> = (1..pdf.len() - 1)
            .filter(|&i| pdf[i] > pdf[i - 1] && pdf[i] >= pdf[i + 1] && pdf[i] > 0.5 * g_peak)
            .map(|i| result.r_ranges[i])
            .collect();
        assert!(strong.len() >= 3, "strong maxima at {:?}", strong);
        for pair in strong.windows(2) {
            let spacing = pair[1] - pair[0];
            assert!(
                (spacing - 1.0 / s0).abs() < 0.1,
                "maxima {:?} spaced {} apart, expected {}",
                pair,
                spacing,
                1.0 / s0
            );
        }
    }

    #[test]
    fn test_s_axis_calibration() {
        let s = momentum_transfer(0.036, 3);
        assert_eq!(s[0], 0.0);
        assert!((s[2] - 0.072 / 2f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_process_requires_image_and_composition() {
        let mut proc = processor();
        assert!(matches!(proc.process(), Err(RdfError::MissingInput(_))));
        proc.set_image(ring_image()).unwrap();
        assert!(matches!(proc.process(), Err(RdfError::MissingInput(_))));
        proc.set_composition(silicon()).unwrap();
        assert!(proc.process().is_ok());
    }

    #[test]
    fn test_empty_window_is_rejected() {
        let config = RdfConfig {
            start_index: 40,
            end_index: 40,
            ..RdfConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RdfError::InvalidWindow { .. })
        ));

        let model = ScatteringModel::new(&synthetic_table(), &silicon()).unwrap();
        let profile = vec![1.0; 128];
        assert!(matches!(
            run(&config, &profile, &model),
            Err(RdfError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_window_beyond_profile_is_rejected() {
        let mut proc = processor();
        proc.set_image(ring_image()).unwrap();
        proc.set_composition(silicon()).unwrap();
        proc.set_parameters(RdfConfig {
            end_index: 500,
            ..RdfConfig::default()
        })
        .unwrap();
        assert!(matches!(
            proc.process(),
            Err(RdfError::InvalidWindow { len: 128, .. })
        ));
    }

    #[test]
    fn test_invalid_parameters() {
        let mut proc = processor();
        let bad_threshold = RdfConfig {
            fit_threshold: 1.0,
            ..RdfConfig::default()
        };
        assert!(proc.set_parameters(bad_threshold).is_err());
        let bad_range = RdfConfig {
            r_min: 5.0,
            r_max: 5.0,
            ..RdfConfig::default()
        };
        assert!(matches!(
            proc.set_parameters(bad_range),
            Err(RdfError::InvalidRange(_))
        ));
        assert_eq!(*proc.config(), RdfConfig::default());
    }

    #[test]
    fn test_composition_change_rebuilds_model() {
        let mut proc = processor();
        proc.set_image(ring_image()).unwrap();
        proc.set_composition(silicon()).unwrap();
        let si = proc.process().unwrap();

        proc.set_composition(Composition::new(vec![ElementWeight::new(8, 100.0)]))
            .unwrap();
        let o = proc.process().unwrap();
        assert!(si.scattering_factor[10] != o.scattering_factor[10]);
        assert!(proc.set_composition(Composition::default()).is_err());
    }

    #[test]
    fn test_background_is_scaled_scattering_factor() {
        let model = ScatteringModel::new(&synthetic_table(), &silicon()).unwrap();
        let s = momentum_transfer(0.036, 100);
        let profile: Vec<f64> = s.iter().map(|s| 0.3 * model.f_sq(s * s)).collect();
        let result = run(&RdfConfig::default(), &profile, &model).unwrap();
        assert!((result.n_fit - 0.3).abs() < 1e-9);
        for (b, f) in result.background.iter().zip(&result.scattering_factor) {
            assert!((b - 0.3 * f).abs() < 1e-9, "background {} vs N·f {}", b, 0.3 * f);
        }
        // 背景与强度不同：强度对应 N·f²
        assert!((result.background[10] - result.radial_mean[10]).abs() > 1e-3);
    }

    #[test]
    fn test_set_center_resamples() {
        let mut proc = processor();
        proc.set_image(ring_image()).unwrap();
        assert_eq!(proc.polar_image().unwrap().center(), (128.0, 128.0));
        proc.set_center(Some((100.0, 120.0))).unwrap();
        let polar = proc.polar_image().unwrap();
        assert_eq!(polar.center(), (100.0, 120.0));
        assert_eq!(polar.radius_bins(), 101);
        assert!(proc.set_center(Some((400.0, 0.0))).is_err());
        assert!(proc.image().is_some());
        assert_eq!(proc.polar_image().unwrap().center(), (100.0, 120.0));
    }
}
