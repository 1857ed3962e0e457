//! # 组成字符串解析器
//!
//! 解析命令行中的元素组成，例如 `Si:60,O:40` 或 `14:60,8:40`。
//! 元素既可以写原子序数，也可以写元素符号（通过参数表查找）。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/composition.rs`
//! - 使用 `rdf/scattering.rs` 的 ParametrizationTable 解析元素符号
//! - 使用 `regex` 匹配单个条目

use crate::error::{RdfError, Result};
use crate::models::{Composition, ElementWeight};
use crate::rdf::scattering::ParametrizationTable;

use regex::Regex;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]{1,3}|\d{1,3})\s*[:=]\s*([0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)$")
        .expect("composition token regex is valid")
});

/// 解析组成字符串
pub fn parse_composition(input: &str, table: &ParametrizationTable) -> Result<Composition> {
    let mut elements = Vec::new();

    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let caps = TOKEN.captures(token).ok_or_else(|| {
            RdfError::InvalidComposition(format!(
                "'{}' is not of the form ELEMENT:PERCENT (e.g. Si:60 or 14:60)",
                token
            ))
        })?;

        let element = &caps[1];
        let atomic_number = match element.parse::<u32>() {
            Ok(z) => z,
            Err(_) => table
                .find_symbol(element)
                .map(|e| e.atomic_number)
                .ok_or_else(|| {
                    RdfError::InvalidComposition(format!(
                        "unknown element symbol '{}'",
                        element
                    ))
                })?,
        };

        let percentage: f64 = caps[2].parse().map_err(|_| {
            RdfError::InvalidComposition(format!("invalid percentage in '{}'", token))
        })?;
        if percentage > 100.0 {
            return Err(RdfError::InvalidComposition(format!(
                "percentage {} exceeds 100 in '{}'",
                percentage, token
            )));
        }

        elements.push(ElementWeight::new(atomic_number, percentage));
    }

    if elements.is_empty() {
        return Err(RdfError::InvalidComposition(
            "composition lists no elements".to_string(),
        ));
    }

    Ok(Composition::new(elements))
}
