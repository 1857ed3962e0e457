//! # rdf 子命令实现
//!
//! 从衍射图样计算约化强度和对分布函数。
//!
//! ## 功能
//! - 支持单文件和批量目录处理
//! - 并行计算（rayon），各文件独立的处理器实例
//! - 输出图像 (PNG/SVG) 或数据文件 (CSV/XY/JSON)
//!
//! ## 依赖关系
//! - 使用 `cli/rdf.rs` 定义的 RdfArgs
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `rdf/` 模块进行计算
//! - 使用 `parsers/` 读取图像、参数表和组成

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::rdf::{OutputFormat, RdfArgs};
use crate::error::{RdfError, Result};
use crate::models::Composition;
use crate::parsers;
use crate::rdf::{self, ParametrizationTable, RdfConfig, RdfProcessor, RdfResult};
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 执行 rdf 命令
pub fn execute(args: RdfArgs) -> Result<()> {
    output::print_header("Reduced Distribution Function Extraction");

    let config = RdfConfig {
        q_per_pixel: args.q_per_pixel,
        start_index: args.start,
        end_index: args.end,
        fit_threshold: args.fit_threshold,
        r_min: args.r_min,
        r_max: args.r_max,
    };
    config.validate()?;

    let params = parsers::kirkland::resolve_table_path(args.params.as_deref())?;
    let table = Arc::new(parsers::load_parametrization(&params)?);
    output::print_info(&format!(
        "Loaded {} element parametrizations from '{}'",
        table.len(),
        params.display()
    ));

    let composition = parsers::parse_composition(&args.composition, &table)?;
    let total = composition.total_percentage();
    if (total - 100.0).abs() > 1e-6 {
        output::print_warning(&format!(
            "Composition sums to {:.2}%, not 100%; weights are used as given",
            total
        ));
    }

    let job = RdfJob {
        table,
        composition,
        config,
        center: args.center,
        width: args.width,
        height: args.height,
    };

    if args.input.is_file() {
        execute_single_file(&args, &job)
    } else if args.input.is_dir() {
        execute_batch(&args, job)
    } else {
        Err(RdfError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件和批量模式共享的计算配置
struct RdfJob {
    table: Arc<ParametrizationTable>,
    composition: Composition,
    config: RdfConfig,
    center: Option<(f64, f64)>,
    width: u32,
    height: u32,
}

impl RdfJob {
    /// 为一个图像文件建立独立的处理器
    fn processor(&self, input: &Path) -> Result<RdfProcessor> {
        let image = parsers::parse_image_file(input)?;

        let mut processor = RdfProcessor::new(Arc::clone(&self.table));
        processor.set_center(self.center)?;
        processor.set_parameters(self.config)?;
        processor.set_composition(self.composition.clone())?;
        processor.set_image(image)?;
        Ok(processor)
    }

    fn process_file(&self, input: &Path) -> Result<RdfResult> {
        self.processor(input)?.process()
    }
}

/// 单文件模式
fn execute_single_file(args: &RdfArgs, job: &RdfJob) -> Result<()> {
    output::print_info(&format!("Single file mode: '{}'", args.input.display()));

    let processor = job.processor(&args.input)?;
    if let (Some(image), Some(polar)) = (processor.image(), processor.polar_image()) {
        let (cx, cy) = polar.center();
        output::print_info(&format!(
            "Image {}×{} resampled about ({:.1}, {:.1}): {} radial bins",
            image.width(),
            image.height(),
            cx,
            cy,
            polar.radius_bins()
        ));
    }
    let result = processor.process()?;
    output::print_success(&format!(
        "Fitted background scale N = {:.6e}; kept {} of {} samples after the zero cut",
        result.n_fit,
        result.ind_s.len(),
        result.s.len()
    ));

    let format = args
        .format
        .unwrap_or_else(|| guess_format_from_extension(&args.output));
    let title = args
        .title
        .clone()
        .unwrap_or_else(|| file_label(&args.input));

    write_result(&result, &args.output, format, &title, job)?;
    print_summary_table(&result, processor.config());

    output::print_written("PDF", &args.output.display().to_string());
    if format == OutputFormat::Csv {
        for suffix in ["window", "cut"] {
            let path = rdf::export::sibling_path(&args.output, suffix);
            output::print_written(suffix, &path.display().to_string());
        }
    }

    Ok(())
}

/// 批量处理模式
fn execute_batch(args: &RdfArgs, job: RdfJob) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)
        .recursive(args.recursive)
        .collect()?;

    if files.is_empty() {
        return Err(RdfError::NoFilesFound {
            pattern: args.pattern.clone(),
        });
    }

    output::print_info(&format!("Found {} diffraction patterns", files.len()));

    fs::create_dir_all(&args.output).map_err(|e| RdfError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let format = args.format.unwrap_or(OutputFormat::Png);
    output::print_info(&format!("Output format: {}", format));

    let batch = Arc::new(BatchRdfConfig {
        job,
        output_dir: args.output.clone(),
        format,
        overwrite: args.overwrite,
    });

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, |file| process_batch_file(file, &batch))?;

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} success, {} skipped, {} failed",
        result.success, result.skipped, result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 批量处理配置
struct BatchRdfConfig {
    job: RdfJob,
    output_dir: PathBuf,
    format: OutputFormat,
    overwrite: bool,
}

/// 处理批量模式中的单个文件
fn process_batch_file(input: &Path, config: &BatchRdfConfig) -> ProcessResult {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pattern");
    let output_file = config
        .output_dir
        .join(format!("{}_rdf.{}", stem, config.format.extension()));

    if output_file.exists() && !config.overwrite {
        return ProcessResult::Skipped(format!(
            "Output exists, skipping: {}",
            output_file.display()
        ));
    }

    let outcome = config.job.process_file(input).and_then(|result| {
        write_result(&result, &output_file, config.format, stem, &config.job)
    });

    match outcome {
        Ok(()) => {
            ProcessResult::Success(format!("{} -> {}", input.display(), output_file.display()))
        }
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

/// 按格式写出结果
fn write_result(
    result: &RdfResult,
    output: &Path,
    format: OutputFormat,
    title: &str,
    job: &RdfJob,
) -> Result<()> {
    match format {
        OutputFormat::Png | OutputFormat::Svg => rdf::plot::generate_rdf_plot(
            result,
            output,
            title,
            job.width,
            job.height,
            format == OutputFormat::Svg,
        ),
        OutputFormat::Csv => rdf::export::to_csv(result, output),
        OutputFormat::Xy => rdf::export::to_xy(result, title, output),
        OutputFormat::Json => rdf::export::to_json(result, output),
    }
}

/// 从文件扩展名推断输出格式
pub fn guess_format_from_extension(path: &Path) -> OutputFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("svg") => OutputFormat::Svg,
        Some("csv") => OutputFormat::Csv,
        Some("json") => OutputFormat::Json,
        Some("xy") | Some("dat") | Some("txt") => OutputFormat::Xy,
        _ => OutputFormat::Png,
    }
}

/// 文件名作为图表标题
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("pattern")
        .to_string()
}

/// 打印结果摘要表
fn print_summary_table(result: &RdfResult, config: &RdfConfig) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct SummaryRow {
        #[tabled(rename = "Quantity")]
        name: &'static str,
        #[tabled(rename = "Value")]
        value: String,
    }

    let s_last = result.s.last().copied().unwrap_or(0.0);
    let cut_s = result.ind_s.last().copied().unwrap_or(0.0);

    let mut rows = vec![
        SummaryRow {
            name: "Fit window",
            value: format!(
                "[{}, {}) → s = {:.4} … {:.4} Å⁻¹",
                config.start_index,
                config.end_index,
                result.s.first().copied().unwrap_or(0.0),
                s_last
            ),
        },
        SummaryRow {
            name: "Tail fit from",
            value: format!("{:.0}% of window", config.fit_threshold * 100.0),
        },
        SummaryRow {
            name: "N_fit",
            value: format!("{:.6e}", result.n_fit),
        },
        SummaryRow {
            name: "Zero cut",
            value: format!("index {} (s = {:.4} Å⁻¹)", result.cut_index, cut_s),
        },
        SummaryRow {
            name: "r range",
            value: format!(
                "{:.3} – {:.3} Å ({} points)",
                config.r_min,
                config.r_max,
                result.r_ranges.len()
            ),
        },
    ];

    if let Some((r, g)) = result.pdf_peak() {
        rows.push(SummaryRow {
            name: "PDF maximum",
            value: format!("G = {:.4e} at r = {:.4} Å", g, r),
        });
    }

    output::print_header("RDF Summary");
    println!("{}", Table::new(&rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_format() {
        assert_eq!(guess_format_from_extension(Path::new("a.svg")), OutputFormat::Svg);
        assert_eq!(guess_format_from_extension(Path::new("a.JSON")), OutputFormat::Json);
        assert_eq!(guess_format_from_extension(Path::new("a.dat")), OutputFormat::Xy);
        assert_eq!(guess_format_from_extension(Path::new("a")), OutputFormat::Png);
    }

    #[test]
    fn test_file_label() {
        assert_eq!(file_label(Path::new("/data/scan_01.csv")), "scan_01.csv");
    }
}
