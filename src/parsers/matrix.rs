//! # 强度矩阵解析器
//!
//! 从分隔文本读取二维衍射图像（无表头，每行一个图像行）。
//!
//! ## 格式
//! - `.csv`: 逗号分隔
//! - `.tsv`: 制表符分隔
//! - 其他: 任意空白分隔，`#` 开头为注释行
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/image.rs`
//! - 使用 `csv` 读取分隔文件

use crate::error::{RdfError, Result};
use crate::models::DiffractionImage;

use std::fs;
use std::path::Path;

/// 读取 CSV/TSV 格式
pub fn parse_delimited_file(path: &Path, delimiter: u8) -> Result<DiffractionImage> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let row = record
            .iter()
            .filter(|field| !field.is_empty())
            .map(|field| parse_value(field, line, path))
            .collect::<Result<Vec<f64>>>()?;
        if !row.is_empty() {
            rows.push(row);
        }
    }

    DiffractionImage::from_rows(rows)
}

/// 读取空白分隔格式
pub fn parse_whitespace_file(path: &Path) -> Result<DiffractionImage> {
    let content = fs::read_to_string(path).map_err(|e| RdfError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_whitespace_content(&content, path)
}

/// 从字符串内容解析空白分隔矩阵
pub fn parse_whitespace_content(content: &str, path: &Path) -> Result<DiffractionImage> {
    let mut rows = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|field| parse_value(field, line_no, path))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    DiffractionImage::from_rows(rows)
}

fn parse_value(field: &str, line: usize, path: &Path) -> Result<f64> {
    field.parse::<f64>().map_err(|_| RdfError::ParseError {
        format: "matrix".to_string(),
        path: path.display().to_string(),
        reason: format!("line {}: '{}' is not a number", line + 1, field),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_whitespace_content() {
        let content = "# detector frame\n0 1 2\n3 4 5\n\n";
        let img = parse_whitespace_content(content, Path::new("frame.txt")).unwrap();
        assert_eq!(img.width(), 3);
        assert_eq!(img.height(), 2);
        assert_eq!(img.get(1, 2), 5.0);
    }

    #[test]
    fn test_parse_whitespace_rejects_garbage() {
        let result = parse_whitespace_content("1 2\n3 x\n", Path::new("bad.txt"));
        assert!(matches!(result, Err(RdfError::ParseError { .. })));
    }

    #[test]
    fn test_parse_whitespace_rejects_ragged() {
        let result = parse_whitespace_content("1 2\n3\n", Path::new("ragged.txt"));
        assert!(matches!(result, Err(RdfError::InvalidImage(_))));
    }

    #[test]
    fn test_parse_csv_file() {
        let path = std::env::temp_dir().join("stemrdf_matrix_test.csv");
        {
            let mut f = std::fs::File::create(&path).unwrap();
            writeln!(f, "0.5, 1.0").unwrap();
            writeln!(f, "1.5, 2.0").unwrap();
        }
        let img = parse_delimited_file(&path, b',').unwrap();
        assert_eq!((img.height(), img.width()), (2, 2));
        assert_eq!(img.get(1, 0), 1.5);
        std::fs::remove_file(&path).ok();
    }
}
