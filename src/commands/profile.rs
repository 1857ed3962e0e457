//! # profile 子命令实现
//!
//! 对衍射图样做极坐标重采样，输出方位角平均与标准差。
//! 用于在运行 `rdf` 之前检查中心和拟合窗口的选择。
//!
//! ## 依赖关系
//! - 使用 `cli/profile.rs` 定义的 ProfileArgs
//! - 使用 `rdf/polar.rs` 的 PolarImage 完成重采样

use crate::cli::profile::ProfileArgs;
use crate::cli::rdf::OutputFormat;
use crate::commands::rdf::{file_label, guess_format_from_extension};
use crate::error::{RdfError, Result};
use crate::parsers;
use crate::rdf::export::{self, ProfileData};
use crate::rdf::pipeline::momentum_transfer;
use crate::rdf::{plot, PolarImage};
use crate::utils::output;

/// 执行 profile 命令
pub fn execute(args: ProfileArgs) -> Result<()> {
    output::print_header("Radial Profile");

    if !args.q_per_pixel.is_finite() || args.q_per_pixel <= 0.0 {
        return Err(RdfError::InvalidArgument(format!(
            "q_per_pixel must be positive, got {}",
            args.q_per_pixel
        )));
    }

    let image = parsers::parse_image_file(&args.input)?;
    let center = args.center.unwrap_or_else(|| image.default_center());
    let polar = PolarImage::from_image(&image, center)?;

    output::print_info(&format!(
        "Image {}×{}, center ({:.1}, {:.1}), {} radii × {} angles",
        image.width(),
        image.height(),
        center.0,
        center.1,
        polar.radius_bins(),
        polar.angle_bins()
    ));

    let profile = profile_data(&polar, args.q_per_pixel);

    let format = args
        .format
        .unwrap_or_else(|| guess_format_from_extension(&args.output));
    let title = args
        .title
        .clone()
        .unwrap_or_else(|| file_label(&args.input));

    match format {
        OutputFormat::Png | OutputFormat::Svg => plot::generate_profile_plot(
            &profile.s,
            &profile.mean,
            &args.output,
            &title,
            args.width,
            args.height,
            format == OutputFormat::Svg,
        )?,
        OutputFormat::Csv => export::profile_to_csv(&profile, &args.output)?,
        OutputFormat::Xy => export::profile_to_xy(&profile, &title, &args.output)?,
        OutputFormat::Json => {
            return Err(RdfError::InvalidArgument(
                "JSON output is only available for the rdf command".to_string(),
            ))
        }
    }

    output::print_written("profile", &args.output.display().to_string());
    Ok(())
}

/// 极坐标图像 → 带 s 轴的径向分布
fn profile_data(polar: &PolarImage, q_per_pixel: f64) -> ProfileData {
    let n = polar.radius_bins();
    ProfileData {
        s: momentum_transfer(q_per_pixel, n),
        mean: polar.radial_profile(),
        std: (0..n).map(|r| polar.row_variance(r).sqrt()).collect(),
    }
}
