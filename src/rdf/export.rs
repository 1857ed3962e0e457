//! # RDF 数据导出
//!
//! 导出流水线结果和径向分布到 CSV、XY 和 JSON 格式。
//!
//! ## 支持格式
//! - CSV: PDF (r, pdf)；另写 `<stem>_window.csv`（窗口内全部中间量）
//!   和 `<stem>_cut.csv`（截断后的 s 与 ModifiedPhi）
//! - XY: PDF 两列文本，带 `#` 注释头
//! - JSON: 与前端约定字段名一致的完整记录
//!
//! ## 依赖关系
//! - 被 `commands/rdf.rs`, `commands/profile.rs` 调用
//! - 使用 `rdf/pipeline.rs` 的 RdfResult
//! - 使用 `csv`、`serde_json` 写文件

use crate::error::{RdfError, Result};
use crate::rdf::RdfResult;

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 窗口内中间量的一行
#[derive(Serialize)]
struct WindowRow {
    s: f64,
    radial_mean: f64,
    scattering_factor: f64,
    background: f64,
    phi: f64,
    y_fit: f64,
}

/// 径向分布的一行
#[derive(Serialize)]
struct ProfileRow {
    index: usize,
    s: f64,
    mean: f64,
    std: f64,
}

/// 径向分布（导出用）
#[derive(Debug, Clone)]
pub struct ProfileData {
    pub s: Vec<f64>,
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

/// 在输出路径旁生成 `<stem>_<suffix>.csv`
pub fn sibling_path(output_path: &Path, suffix: &str) -> PathBuf {
    let stem = output_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("rdf");
    output_path.with_file_name(format!("{}_{}.csv", stem, suffix))
}

fn write_error(path: &Path, e: std::io::Error) -> RdfError {
    RdfError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    }
}

/// 导出为 CSV（PDF + 窗口 + 截断三个文件）
pub fn to_csv(result: &RdfResult, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    wtr.write_record(["r", "pdf"])?;
    for (r, g) in result.r_ranges.iter().zip(&result.pdf) {
        wtr.write_record(&[format!("{:.6}", r), format!("{:.8e}", g)])?;
    }
    wtr.flush().map_err(|e| write_error(output_path, e))?;

    let window_path = sibling_path(output_path, "window");
    let mut wtr = csv::Writer::from_path(&window_path)?;
    for i in 0..result.s.len() {
        wtr.serialize(WindowRow {
            s: result.s[i],
            radial_mean: result.radial_mean[i],
            scattering_factor: result.scattering_factor[i],
            background: result.background[i],
            phi: result.phi[i],
            y_fit: result.y_fit[i],
        })?;
    }
    wtr.flush().map_err(|e| write_error(&window_path, e))?;

    let cut_path = sibling_path(output_path, "cut");
    let mut wtr = csv::Writer::from_path(&cut_path)?;
    wtr.write_record(["ind_s", "ind_modified_phi"])?;
    for (s, phi) in result.ind_s.iter().zip(&result.ind_modified_phi) {
        wtr.write_record(&[format!("{:.6}", s), format!("{:.8e}", phi)])?;
    }
    wtr.flush().map_err(|e| write_error(&cut_path, e))?;

    Ok(())
}

/// 导出 PDF 为 XY 格式
pub fn to_xy(result: &RdfResult, name: &str, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).map_err(|e| write_error(output_path, e))?;
    let mut w = BufWriter::new(file);

    let write_all = |w: &mut BufWriter<File>| -> std::io::Result<()> {
        writeln!(w, "# Pair distribution function: {}", name)?;
        writeln!(w, "# N_fit: {:.8e}", result.n_fit)?;
        writeln!(
            w,
            "# s window: {} samples, cut at {}",
            result.s.len(),
            result.cut_index
        )?;
        writeln!(w, "# Columns: r, PDF(r)")?;
        writeln!(w, "#")?;
        for (r, g) in result.r_ranges.iter().zip(&result.pdf) {
            writeln!(w, "{:.6}\t{:.8e}", r, g)?;
        }
        w.flush()
    };

    write_all(&mut w).map_err(|e| write_error(output_path, e))
}

/// 导出完整结果为 JSON
pub fn to_json(result: &RdfResult, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).map_err(|e| write_error(output_path, e))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, result)
        .map_err(|e| RdfError::Other(format!("JSON serialization failed: {}", e)))?;
    w.flush().map_err(|e| write_error(output_path, e))
}

/// 导出径向分布为 CSV
pub fn profile_to_csv(profile: &ProfileData, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    for i in 0..profile.mean.len() {
        wtr.serialize(ProfileRow {
            index: i,
            s: profile.s[i],
            mean: profile.mean[i],
            std: profile.std[i],
        })?;
    }
    wtr.flush().map_err(|e| write_error(output_path, e))
}

/// 导出径向分布为 XY 格式
pub fn profile_to_xy(profile: &ProfileData, name: &str, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).map_err(|e| write_error(output_path, e))?;
    let mut w = BufWriter::new(file);

    let write_all = |w: &mut BufWriter<File>| -> std::io::Result<()> {
        writeln!(w, "# Radial profile: {}", name)?;
        writeln!(w, "# Columns: s, azimuthal mean")?;
        writeln!(w, "#")?;
        for (s, m) in profile.s.iter().zip(&profile.mean) {
            writeln!(w, "{:.6}\t{:.8e}", s, m)?;
        }
        w.flush()
    };

    write_all(&mut w).map_err(|e| write_error(output_path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_result() -> RdfResult {
        RdfResult {
            s: vec![0.0, 0.1, 0.2],
            radial_mean: vec![3.0, 2.0, 1.0],
            scattering_factor: vec![2.0, 1.5, 1.0],
            background: vec![2.5, 1.8, 0.9],
            phi: vec![0.0, 0.05, 0.02],
            y_fit: vec![0.0, 0.04, 0.03],
            ind_s: vec![0.0, 0.1],
            ind_modified_phi: vec![0.0, 0.01],
            r_ranges: vec![0.0, 0.5],
            pdf: vec![0.0, 0.001],
            n_fit: 0.9,
            cut_index: 1,
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("stemrdf_export_{}", name))
    }

    #[test]
    fn test_sibling_path() {
        let p = sibling_path(Path::new("/tmp/out/pattern.csv"), "window");
        assert_eq!(p, Path::new("/tmp/out/pattern_window.csv"));
    }

    #[test]
    fn test_csv_writes_three_files() {
        let out = temp_path("three.csv");
        to_csv(&tiny_result(), &out).unwrap();

        let pdf = std::fs::read_to_string(&out).unwrap();
        assert!(pdf.starts_with("r,pdf"));
        assert_eq!(pdf.lines().count(), 3);

        let window = std::fs::read_to_string(sibling_path(&out, "window")).unwrap();
        assert!(window.starts_with("s,radial_mean,scattering_factor,background,phi,y_fit"));
        assert_eq!(window.lines().count(), 4);

        let cut = std::fs::read_to_string(sibling_path(&out, "cut")).unwrap();
        assert_eq!(cut.lines().count(), 3);

        for p in [out.clone(), sibling_path(&out, "window"), sibling_path(&out, "cut")] {
            std::fs::remove_file(p).ok();
        }
    }

    #[test]
    fn test_json_uses_client_field_names() {
        let out = temp_path("record.json");
        to_json(&tiny_result(), &out).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        for key in [
            "\"s\"",
            "\"radial_mean\"",
            "\"scattering_factor\"",
            "\"background\"",
            "\"phi\"",
            "\"y_fit\"",
            "\"ind_s\"",
            "\"ind_modified_phi\"",
            "\"r_ranges\"",
            "\"pdf\"",
        ] {
            assert!(text.contains(key), "missing {}", key);
        }
        std::fs::remove_file(&out).ok();
    }

    #[test]
    fn test_xy_header_and_rows() {
        let out = temp_path("pdf.xy");
        to_xy(&tiny_result(), "tiny", &out).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("# Pair distribution function: tiny"));
        assert_eq!(text.lines().filter(|l| !l.starts_with('#')).count(), 2);
        std::fs::remove_file(&out).ok();
    }

    #[test]
    fn test_profile_csv() {
        let out = temp_path("profile.csv");
        let data = ProfileData {
            s: vec![0.0, 0.1],
            mean: vec![1.0, 2.0],
            std: vec![0.0, 0.1],
        };
        profile_to_csv(&data, &out).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("index,s,mean,std"));
        std::fs::remove_file(&out).ok();
    }
}
