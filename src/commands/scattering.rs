//! # scattering 子命令实现
//!
//! 列出参数表中的元素，或按组成列出 f(s) 与 f²(s)。
//!
//! ## 依赖关系
//! - 使用 `cli/scattering.rs` 定义的 ScatteringArgs
//! - 使用 `rdf/scattering.rs` 的 ScatteringModel
//! - 使用 `tabled` 打印表格, `csv` 写出文件

use crate::cli::scattering::ScatteringArgs;
use crate::error::{RdfError, Result};
use crate::parsers;
use crate::rdf::{ParametrizationTable, ScatteringModel};
use crate::utils::output;

use serde::Serialize;
use std::path::Path;
use tabled::{Table, Tabled};

/// 导出行
#[derive(Debug, Serialize)]
struct FactorRow {
    s: f64,
    f: f64,
    f_sq: f64,
}

/// 执行 scattering 命令
pub fn execute(args: ScatteringArgs) -> Result<()> {
    let params = parsers::kirkland::resolve_table_path(args.params.as_deref())?;
    let table = parsers::load_parametrization(&params)?;

    if args.list {
        print_element_table(&table);
        return Ok(());
    }

    let composition_str = args
        .composition
        .as_deref()
        .ok_or_else(|| RdfError::InvalidArgument("--composition is required".to_string()))?;
    let composition = parsers::parse_composition(composition_str, &table)?;
    let total = composition.total_percentage();
    if (total - 100.0).abs() > 1e-6 {
        output::print_warning(&format!(
            "Composition sums to {:.2}%, not 100%; weights are used as given",
            total
        ));
    }

    let model = ScatteringModel::new(&table, &composition)?;
    let (s_min, s_max) = parse_range(&args.range)?;
    let s = sample_grid(s_min, s_max, args.points)?;
    let (f, f_sq) = model.evaluate(&s);

    let rows: Vec<FactorRow> = s
        .iter()
        .zip(f.iter().zip(&f_sq))
        .map(|(&s, (&f, &f_sq))| FactorRow { s, f, f_sq })
        .collect();

    output::print_header(&format!("Scattering factors: {}", composition_str));
    print_factor_table(&rows);

    if let Some(path) = &args.output {
        write_csv(&rows, path)?;
        output::print_written("scattering factors", &path.display().to_string());
    }

    Ok(())
}

/// 解析 s 范围 "min-max"
fn parse_range(range: &str) -> Result<(f64, f64)> {
    let parts: Vec<&str> = range.split('-').collect();
    if parts.len() != 2 {
        return Err(RdfError::InvalidRange(range.to_string()));
    }

    let min: f64 = parts[0]
        .trim()
        .parse()
        .map_err(|_| RdfError::InvalidRange(range.to_string()))?;
    let max: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|_| RdfError::InvalidRange(range.to_string()))?;

    if min < 0.0 || max <= min {
        return Err(RdfError::InvalidRange(format!(
            "{} (must be 0 <= min < max)",
            range
        )));
    }

    Ok((min, max))
}

/// 闭区间上的等距采样
fn sample_grid(min: f64, max: f64, points: usize) -> Result<Vec<f64>> {
    if points < 2 {
        return Err(RdfError::InvalidArgument(format!(
            "points must be at least 2, got {}",
            points
        )));
    }
    let step = (max - min) / (points - 1) as f64;
    Ok((0..points).map(|i| min + i as f64 * step).collect())
}

fn write_csv(rows: &[FactorRow], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|e| RdfError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

fn print_factor_table(rows: &[FactorRow]) {
    #[derive(Tabled)]
    struct FactorDisplay {
        #[tabled(rename = "s (1/Å)")]
        s: String,
        #[tabled(rename = "f(s)")]
        f: String,
        #[tabled(rename = "f²(s)")]
        f_sq: String,
    }

    let display: Vec<FactorDisplay> = rows
        .iter()
        .map(|r| FactorDisplay {
            s: format!("{:.4}", r.s),
            f: format!("{:.6}", r.f),
            f_sq: format!("{:.6}", r.f_sq),
        })
        .collect();

    println!("{}", Table::new(&display));
}

fn print_element_table(table: &ParametrizationTable) {
    #[derive(Tabled)]
    struct ElementRow {
        #[tabled(rename = "Z")]
        z: u32,
        #[tabled(rename = "Symbol")]
        symbol: String,
        #[tabled(rename = "f(0)")]
        f0: String,
    }

    let rows: Vec<ElementRow> = table
        .iter()
        .map(|e| ElementRow {
            z: e.atomic_number,
            symbol: e.symbol.clone(),
            f0: format!("{:.4}", e.params.calculate(0.0)),
        })
        .collect();

    output::print_header(&format!("{} parametrized elements", table.len()));
    println!("{}", Table::new(&rows));
}
