//! # 文件收集器
//!
//! 在目录中收集待处理的衍射图样文件。
//!
//! ## 功能
//! - 逗号分隔的多个 glob 模式（`glob::Pattern`）
//! - 可选递归搜索
//! - 结果按路径排序，批量输出顺序稳定
//!
//! ## 依赖关系
//! - 被 `commands/rdf.rs` 调用
//! - 使用 `walkdir` 遍历目录, `glob` 匹配文件名

use crate::error::{RdfError, Result};

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    input: PathBuf,
    /// 匹配模式列表（原始文本）
    patterns: Vec<String>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: vec!["*".to_string()],
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.patterns = pattern
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if self.patterns.is_empty() {
            self.patterns = vec!["*".to_string()];
        }
        self
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件
    ///
    /// 单文件输入直接返回自身；模式语法错误返回 `InvalidArgument`。
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if self.input.is_file() {
            return Ok(vec![self.input.clone()]);
        }

        if !self.input.is_dir() {
            return Err(RdfError::DirectoryNotFound {
                path: self.input.display().to_string(),
            });
        }

        let patterns = self.compile_patterns()?;
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|entry| Self::matches_any(&patterns, entry.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        Ok(files)
    }

    fn compile_patterns(&self) -> Result<Vec<Pattern>> {
        self.patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    RdfError::InvalidArgument(format!("Invalid file pattern '{}': {}", p, e))
                })
            })
            .collect()
    }

    /// 检查文件名是否匹配任一模式
    fn matches_any(patterns: &[Pattern], path: &Path) -> bool {
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        patterns.iter().any(|p| p.matches(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "stemrdf_collector_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("nested")).unwrap();
        dir
    }

    #[test]
    fn test_matches_any() {
        let patterns = vec![Pattern::new("*.csv").unwrap(), Pattern::new("scan?.txt").unwrap()];
        assert!(FileCollector::matches_any(&patterns, Path::new("/a/pattern_01.csv")));
        assert!(FileCollector::matches_any(&patterns, Path::new("scan1.txt")));
        assert!(!FileCollector::matches_any(&patterns, Path::new("scan12.txt")));
        assert!(!FileCollector::matches_any(&patterns, Path::new("notes.md")));
    }

    #[test]
    fn test_collect_directory() {
        let dir = scratch_dir("collect");
        fs::write(dir.join("b.csv"), "0").unwrap();
        fs::write(dir.join("a.csv"), "0").unwrap();
        fs::write(dir.join("readme.md"), "").unwrap();
        fs::write(dir.join("nested").join("c.csv"), "0").unwrap();

        let flat = FileCollector::new(dir.clone())
            .with_pattern("*.csv")
            .collect()
            .unwrap();
        let names: Vec<_> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);

        let deep = FileCollector::new(dir.clone())
            .with_pattern("*.csv")
            .recursive(true)
            .collect()
            .unwrap();
        assert_eq!(deep.len(), 3);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_collect_errors() {
        let missing = std::env::temp_dir().join("stemrdf_collector_does_not_exist");
        assert!(matches!(
            FileCollector::new(missing).collect(),
            Err(RdfError::DirectoryNotFound { .. })
        ));

        let dir = scratch_dir("badpattern");
        assert!(matches!(
            FileCollector::new(dir.clone()).with_pattern("[").collect(),
            Err(RdfError::InvalidArgument(_))
        ));
        fs::remove_dir_all(&dir).ok();
    }
}
