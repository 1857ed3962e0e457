//! # Kirkland 参数表解析器
//!
//! 读取电子散射因子参数表（CSV，首行为表头）。
//!
//! ## 格式
//! ```text
//! Z,symbol,a1,b1,a2,b2,a3,b3,c1,d1,c2,d2,c3,d3
//! 14,Si,<a1>,<b1>,<a2>,<b2>,<a3>,<b3>,<c1>,<d1>,<c2>,<d2>,<c3>,<d3>
//! ```
//! 列顺序与 Kirkland 书中附录 C 的排列一致。
//!
//! ## 查找顺序
//! 1. `--params` / `STEMRDF_PARAMS`
//! 2. 可执行文件所在目录下的 [`DEFAULT_TABLE_NAME`]
//! 3. 当前工作目录下的 [`DEFAULT_TABLE_NAME`]
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 构造 `rdf/scattering.rs` 的 ParametrizationTable
//! - 使用 `csv` + `serde` 反序列化

use crate::error::{RdfError, Result};
use crate::rdf::scattering::{ElementEntry, KirklandParams, ParametrizationTable};

use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

/// 随程序分发的参数表文件名
pub const DEFAULT_TABLE_NAME: &str = "kirkland.csv";

/// CSV 中的一行
#[derive(Debug, Deserialize)]
struct KirklandRow {
    #[serde(rename = "Z")]
    z: u32,
    symbol: String,
    a1: f64,
    b1: f64,
    a2: f64,
    b2: f64,
    a3: f64,
    b3: f64,
    c1: f64,
    d1: f64,
    c2: f64,
    d2: f64,
    c3: f64,
    d3: f64,
}

impl From<KirklandRow> for ElementEntry {
    fn from(row: KirklandRow) -> Self {
        ElementEntry {
            atomic_number: row.z,
            symbol: row.symbol,
            params: KirklandParams {
                a: [row.a1, row.a2, row.a3],
                b: [row.b1, row.b2, row.b3],
                c: [row.c1, row.c2, row.c3],
                d: [row.d1, row.d2, row.d3],
            },
        }
    }
}

/// 确定参数表路径：显式指定优先，否则依次查找默认位置
pub fn resolve_table_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let mut dirs = Vec::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(dir);
    }
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    find_default_table(&dirs).ok_or_else(|| RdfError::FileNotFound {
        path: format!(
            "{} (searched {}; pass --params or set STEMRDF_PARAMS)",
            DEFAULT_TABLE_NAME,
            dirs.iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    })
}

/// 在给定目录中按顺序查找默认参数表
fn find_default_table(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(DEFAULT_TABLE_NAME))
        .find(|path| path.is_file())
}

/// 从文件加载参数表（文件句柄仅在函数内持有）
pub fn load_parametrization(path: &Path) -> Result<ParametrizationTable> {
    if !path.is_file() {
        return Err(RdfError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let file = std::fs::File::open(path).map_err(|e| RdfError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_parametrization(file, &path.display().to_string())
}

/// 从任意读取器解析参数表
pub fn parse_parametrization<R: Read>(reader: R, source: &str) -> Result<ParametrizationTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut table = ParametrizationTable::new();
    for row in rdr.deserialize::<KirklandRow>() {
        let row = row?;
        if row.b1 <= 0.0 || row.b2 <= 0.0 || row.b3 <= 0.0 {
            return Err(RdfError::ParseError {
                format: "Kirkland".to_string(),
                path: source.to_string(),
                reason: format!("element Z={} has a non-positive b coefficient", row.z),
            });
        }
        table.insert(row.into());
    }

    if table.is_empty() {
        return Err(RdfError::ParseError {
            format: "Kirkland".to_string(),
            path: source.to_string(),
            reason: "no element rows found".to_string(),
        });
    }

    Ok(table)
}
