//! # 元素组成数据模型
//!
//! 样品的元素组成：`{atomicNumber, percentage}` 列表，百分比取值 0–100。
//! 组成是否加和为 100 由调用方负责，这里不做归一化。
//!
//! ## 依赖关系
//! - 被 `parsers/composition.rs` 构造
//! - 被 `rdf/scattering.rs` 使用

use serde::{Deserialize, Serialize};

/// 单个元素及其原子百分比
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementWeight {
    /// 原子序数 Z
    pub atomic_number: u32,
    /// 原子百分比（0-100）
    pub percentage: f64,
}

impl ElementWeight {
    pub fn new(atomic_number: u32, percentage: f64) -> Self {
        Self {
            atomic_number,
            percentage,
        }
    }

    /// 权重（百分比 / 100）
    pub fn weight(&self) -> f64 {
        self.percentage / 100.0
    }
}

/// 样品组成
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub elements: Vec<ElementWeight>,
}

impl Composition {
    /// 创建组成；重复出现的元素以最后一次为准
    pub fn new(elements: Vec<ElementWeight>) -> Self {
        let mut deduped: Vec<ElementWeight> = Vec::with_capacity(elements.len());
        for el in elements {
            if let Some(existing) = deduped
                .iter_mut()
                .find(|e| e.atomic_number == el.atomic_number)
            {
                existing.percentage = el.percentage;
            } else {
                deduped.push(el);
            }
        }
        Self { elements: deduped }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// 百分比总和
    pub fn total_percentage(&self) -> f64 {
        self.elements.iter().map(|e| e.percentage).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_last_wins() {
        let comp = Composition::new(vec![
            ElementWeight::new(14, 50.0),
            ElementWeight::new(8, 50.0),
            ElementWeight::new(14, 30.0),
        ]);
        assert_eq!(comp.elements.len(), 2);
        assert_eq!(comp.elements[0], ElementWeight::new(14, 30.0));
        assert!((comp.total_percentage() - 80.0).abs() < 1e-12);
    }

    #[test]
    fn test_weight() {
        assert!((ElementWeight::new(6, 25.0).weight() - 0.25).abs() < 1e-12);
    }
}
