//! # RDF 图表生成
//!
//! 使用 `plotters` 库绘制流水线结果。
//!
//! ## 功能
//! - 三联图：径向强度与背景 / φ(s) 与多项式基线 / PDF(r)
//! - 径向分布单图
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/rdf.rs`, `commands/profile.rs` 调用
//! - 使用 `rdf/pipeline.rs` 的 RdfResult
//! - 使用 `plotters` 渲染图表

use crate::error::{RdfError, Result};
use crate::rdf::RdfResult;

use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

const BLUE_LINE: RGBColor = RGBColor(0, 102, 204);
const RED_LINE: RGBColor = RGBColor(204, 51, 51);

fn plot_err<E: std::fmt::Debug>(e: E) -> RdfError {
    RdfError::Other(format!("{:?}", e))
}

/// 数据范围，上下各留 5% 余量
fn padded_range<'a>(values: impl Iterator<Item = &'a f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if (hi - lo).abs() < 1e-300 {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = 0.05 * (hi - lo);
    (lo - pad)..(hi + pad)
}

/// 生成 RDF 三联图
pub fn generate_rdf_plot(
    result: &RdfResult,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_rdf_chart(&root, result, title)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_rdf_chart(&root, result, title)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

/// 生成径向分布图
pub fn generate_profile_plot(
    s: &[f64],
    mean: &[f64],
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;
        draw_curves(&root, title, "s (1/Å)", "Intensity", &[(s, mean, BLUE_LINE, "mean")])?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;
        draw_curves(&root, title, "s (1/Å)", "Intensity", &[(s, mean, BLUE_LINE, "mean")])?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

/// 绘制三联图的核心逻辑
fn draw_rdf_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    result: &RdfResult,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let root = root
        .titled(title, ("sans-serif", 28).into_font())
        .map_err(plot_err)?;
    let panels = root.split_evenly((3, 1));

    draw_curves(
        &panels[0],
        &format!("Radial intensity (N_fit = {:.4e})", result.n_fit),
        "s (1/Å)",
        "Intensity",
        &[
            (result.s.as_slice(), result.radial_mean.as_slice(), BLUE_LINE, "radial mean"),
            (result.s.as_slice(), result.background.as_slice(), RED_LINE, "N·f"),
        ],
    )?;

    draw_curves(
        &panels[1],
        "Reduced intensity",
        "s (1/Å)",
        "φ(s)",
        &[
            (result.s.as_slice(), result.phi.as_slice(), BLUE_LINE, "φ(s)"),
            (result.s.as_slice(), result.y_fit.as_slice(), RED_LINE, "baseline"),
        ],
    )?;

    draw_curves(
        &panels[2],
        "Pair distribution function",
        "r (Å)",
        "G(r)",
        &[(result.r_ranges.as_slice(), result.pdf.as_slice(), BLUE_LINE, "PDF")],
    )?;

    Ok(())
}

/// 在一个绘图区域内绘制若干条曲线
fn draw_curves<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    curves: &[(&[f64], &[f64], RGBColor, &str)],
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let x_range = padded_range(curves.iter().flat_map(|(x, _, _, _)| x.iter()));
    let y_range = padded_range(curves.iter().flat_map(|(_, y, _, _)| y.iter()));

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 20).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_label_style(("sans-serif", 14))
        .y_label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(plot_err)?;

    for &(xs, ys, color, label) in curves {
        chart
            .draw_series(LineSeries::new(
                xs.iter()
                    .zip(ys.iter())
                    .filter(|(x, y)| x.is_finite() && y.is_finite())
                    .map(|(x, y)| (*x, *y)),
                color.stroke_width(2),
            ))
            .map_err(plot_err)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    if curves.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(plot_err)?;
    }

    Ok(())
}
