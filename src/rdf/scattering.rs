//! # 原子散射因子模型
//!
//! 按组成加权的电子散射因子函数 f(s²) 及其平方 f²(s²)。
//!
//! ## 公式
//! 单元素（Kirkland 参数化）：
//! fᵢ(s²) = Σⱼ aⱼ / (s² + bⱼ) + cⱼ exp(-dⱼ s²)，j = 1..3
//!
//! 组合：
//! f(s²)  = Σᵢ wᵢ fᵢ(s²)
//! f²(s²) = Σᵢ wᵢ fᵢ(s²)²
//! 其中 wᵢ = 百分比 / 100（不做归一化）
//!
//! ## 数据来源
//! E. J. Kirkland, *Advanced Computing in Electron Microscopy*, Appendix C。
//! 参数表作为外部资源由 `parsers/kirkland.rs` 加载后注入。
//!
//! ## 依赖关系
//! - 被 `rdf/pipeline.rs` 调用
//! - 使用 `models/composition.rs`

use crate::error::{RdfError, Result};
use crate::models::Composition;

use std::collections::BTreeMap;

/// 单元素的 Kirkland 参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KirklandParams {
    pub a: [f64; 3],
    pub b: [f64; 3],
    pub c: [f64; 3],
    pub d: [f64; 3],
}

impl KirklandParams {
    /// 计算散射因子 f(s²)
    pub fn calculate(&self, s2: f64) -> f64 {
        let mut f = 0.0;
        for i in 0..3 {
            f += self.a[i] / (s2 + self.b[i]) + self.c[i] * (-self.d[i] * s2).exp();
        }
        f
    }
}

/// 单个元素条目
#[derive(Debug, Clone, PartialEq)]
pub struct ElementEntry {
    pub atomic_number: u32,
    pub symbol: String,
    pub params: KirklandParams,
}

/// 散射因子参数表（按原子序数索引）
#[derive(Debug, Clone, Default)]
pub struct ParametrizationTable {
    entries: BTreeMap<u32, ElementEntry>,
}

impl ParametrizationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或替换元素条目
    pub fn insert(&mut self, entry: ElementEntry) {
        self.entries.insert(entry.atomic_number, entry);
    }

    pub fn get(&self, atomic_number: u32) -> Option<&ElementEntry> {
        self.entries.get(&atomic_number)
    }

    /// 按元素符号查找（大小写不敏感）
    pub fn find_symbol(&self, symbol: &str) -> Option<&ElementEntry> {
        self.entries
            .values()
            .find(|e| e.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按原子序数升序遍历
    pub fn iter(&self) -> impl Iterator<Item = &ElementEntry> {
        self.entries.values()
    }
}

/// 组成加权的散射因子模型
#[derive(Debug, Clone)]
pub struct ScatteringModel {
    /// (参数, 权重)
    terms: Vec<(KirklandParams, f64)>,
}

impl ScatteringModel {
    /// 由参数表和组成构建
    pub fn new(table: &ParametrizationTable, composition: &Composition) -> Result<Self> {
        let terms = composition
            .elements
            .iter()
            .map(|el| {
                table
                    .get(el.atomic_number)
                    .map(|entry| (entry.params, el.weight()))
                    .ok_or(RdfError::UnknownElement(el.atomic_number))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { terms })
    }

    /// 组合散射因子 f(s²)
    pub fn f(&self, s2: f64) -> f64 {
        self.terms.iter().map(|(p, w)| p.calculate(s2) * w).sum()
    }

    /// 组合平方散射因子 f²(s²)
    pub fn f_sq(&self, s2: f64) -> f64 {
        self.terms
            .iter()
            .map(|(p, w)| p.calculate(s2).powi(2) * w)
            .sum()
    }

    /// 在一组动量传递 s 上求值，返回 (f, f²)
    pub fn evaluate(&self, s: &[f64]) -> (Vec<f64>, Vec<f64>) {
        s.iter().map(|&si| (self.f(si * si), self.f_sq(si * si))).unzip()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::ElementWeight;

    /// 测试用的合成参数
    pub(crate) fn synthetic_params() -> KirklandParams {
        KirklandParams {
            a: [0.5, 0.3, 0.2],
            b: [0.2, 1.0, 5.0],
            c: [0.1, 0.05, 0.02],
            d: [0.5, 2.0, 10.0],
        }
    }

    /// 测试用的重元素合成参数（f(0) 更大，衰减更慢）
    pub(crate) fn heavy_params() -> KirklandParams {
        KirklandParams {
            a: [2.0, 1.0, 0.5],
            b: [0.3, 1.5, 6.0],
            c: [0.5, 0.3, 0.1],
            d: [0.3, 1.2, 5.0],
        }
    }

    pub(crate) fn synthetic_table() -> ParametrizationTable {
        let mut table = ParametrizationTable::new();
        table.insert(ElementEntry {
            atomic_number: 14,
            symbol: "Si".to_string(),
            params: synthetic_params(),
        });
        table.insert(ElementEntry {
            atomic_number: 8,
            symbol: "O".to_string(),
            params: KirklandParams {
                a: [0.2, 0.4, 0.1],
                b: [0.3, 2.0, 8.0],
                c: [0.05, 0.05, 0.01],
                d: [0.4, 1.5, 6.0],
            },
        });
        table
    }

    #[test]
    fn test_kirkland_at_zero() {
        let p = synthetic_params();
        let expected = 0.5 / 0.2 + 0.3 / 1.0 + 0.2 / 5.0 + 0.1 + 0.05 + 0.02;
        assert!((p.calculate(0.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_element_weighting() {
        let table = synthetic_table();
        let comp = Composition::new(vec![ElementWeight::new(14, 100.0)]);
        let model = ScatteringModel::new(&table, &comp).unwrap();
        let f = synthetic_params().calculate(1.5);
        assert!((model.f(1.5) - f).abs() < 1e-12);
        assert!((model.f_sq(1.5) - f * f).abs() < 1e-12);
    }

    #[test]
    fn test_mixture_square_is_weighted_mean_of_squares() {
        let table = synthetic_table();
        let comp = Composition::new(vec![
            ElementWeight::new(14, 40.0),
            ElementWeight::new(8, 60.0),
        ]);
        let model = ScatteringModel::new(&table, &comp).unwrap();
        let fsi = table.get(14).unwrap().params.calculate(0.7);
        let fo = table.get(8).unwrap().params.calculate(0.7);
        assert!((model.f(0.7) - (0.4 * fsi + 0.6 * fo)).abs() < 1e-12);
        assert!((model.f_sq(0.7) - (0.4 * fsi * fsi + 0.6 * fo * fo)).abs() < 1e-12);
        // <f²> >= <f>² 对凸组合成立
        assert!(model.f_sq(0.7) >= model.f(0.7).powi(2));
    }

    #[test]
    fn test_evaluate_uses_s_squared() {
        let table = synthetic_table();
        let comp = Composition::new(vec![ElementWeight::new(14, 100.0)]);
        let model = ScatteringModel::new(&table, &comp).unwrap();
        let (f, f_sq) = model.evaluate(&[0.0, 2.0]);
        assert!((f[1] - model.f(4.0)).abs() < 1e-12);
        assert!((f_sq[0] - model.f_sq(0.0)).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_element() {
        let table = synthetic_table();
        let comp = Composition::new(vec![ElementWeight::new(79, 100.0)]);
        assert!(matches!(
            ScatteringModel::new(&table, &comp),
            Err(RdfError::UnknownElement(79))
        ));
    }

    #[test]
    fn test_find_symbol_case_insensitive() {
        let table = synthetic_table();
        assert_eq!(table.find_symbol("si").map(|e| e.atomic_number), Some(14));
        assert!(table.find_symbol("Au").is_none());
        assert_eq!(table.len(), 2);
    }
}
