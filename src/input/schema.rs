//! 数据schema读取与数据集发现
//!
//! schema文件为每种逻辑角色（TRIM + 六个数据集）给出目录和文件名过滤串，
//! 各占固定行（`label: value`）。目录中文件名包含过滤串的文件按名称排序后
//! 组成该角色的文件列表。

use crate::core::dataset::DatasetRole;
use crate::error::{NdpError, NdpResult};
use crate::tools::utils;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// schema中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaRole {
    Trim,
    Dataset(DatasetRole),
}

impl fmt::Display for SchemaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trim => f.write_str("TRIM"),
            Self::Dataset(role) => role.fmt(f),
        }
    }
}

/// (角色, 目录行, 过滤串行)，0起行号
const SCHEMA_LAYOUT: [(SchemaRole, usize, usize); 7] = [
    (SchemaRole::Trim, 3, 4),
    (SchemaRole::Dataset(DatasetRole::BackgroundData), 7, 8),
    (SchemaRole::Dataset(DatasetRole::BackgroundMonitor), 9, 10),
    (SchemaRole::Dataset(DatasetRole::ReferenceData), 13, 14),
    (SchemaRole::Dataset(DatasetRole::ReferenceMonitor), 15, 16),
    (SchemaRole::Dataset(DatasetRole::SampleData), 19, 20),
    (SchemaRole::Dataset(DatasetRole::SampleMonitor), 21, 22),
];

/// 一个角色解析后的目录和文件列表
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    pub role: SchemaRole,
    pub directory: PathBuf,
    pub filter: String,
    pub files: Vec<PathBuf>,
}

/// 完整schema（已完成目录发现）
#[derive(Debug, Clone, PartialEq)]
pub struct DataSchema {
    pub entries: Vec<SchemaEntry>,
}

impl DataSchema {
    pub fn entry(&self, role: SchemaRole) -> NdpResult<&SchemaEntry> {
        self.entries
            .iter()
            .find(|e| e.role == role)
            .ok_or_else(|| NdpError::Configuration(format!("schema缺少角色 {role}")))
    }

    /// TRIM模拟文件
    pub fn trim_files(&self) -> NdpResult<&[PathBuf]> {
        Ok(&self.entry(SchemaRole::Trim)?.files)
    }

    /// 数据集文件
    pub fn dataset_files(&self, role: DatasetRole) -> NdpResult<&[PathBuf]> {
        Ok(&self.entry(SchemaRole::Dataset(role))?.files)
    }
}

/// 读取schema文件并发现所有角色的文件
///
/// 相对路径以schema文件所在目录为基准。
pub fn read_schema(path: &Path) -> NdpResult<DataSchema> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        NdpError::Configuration(format!("无法读取schema文件 {}: {e}", path.display()))
    })?;
    let base = utils::get_parent_dir(path);
    parse_schema_text(&text, base)
}

/// 解析schema文本并执行目录发现
pub fn parse_schema_text(text: &str, base: &Path) -> NdpResult<DataSchema> {
    let lines: Vec<&str> = text.lines().collect();
    let value = |index: usize, role: SchemaRole, what: &str| -> NdpResult<String> {
        lines
            .get(index)
            .and_then(|l| l.split_once(": "))
            .map(|(_, v)| v.trim().to_string())
            .ok_or_else(|| {
                NdpError::Configuration(format!("schema第{}行缺少{role}的{what}", index + 1))
            })
    };

    let mut entries = Vec::with_capacity(SCHEMA_LAYOUT.len());
    for (role, path_line, filter_line) in SCHEMA_LAYOUT {
        let directory = base.join(value(path_line, role, "目录")?);
        let filter = value(filter_line, role, "文件过滤串")?;
        let files = discover_files(&directory, &filter)
            .map_err(|e| NdpError::Discovery(format!("{role}: {e}")))?;

        tracing::debug!(role = %role, dir = %directory.display(), files = files.len(), "discovered");
        entries.push(SchemaEntry {
            role,
            directory,
            filter,
            files,
        });
    }

    Ok(DataSchema { entries })
}

/// 列出目录（不递归）中文件名包含过滤串的文件，按名称排序
pub fn discover_files(directory: &Path, filter: &str) -> NdpResult<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(NdpError::Discovery(format!(
            "目录不存在: {}",
            directory.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| NdpError::Discovery(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().contains(filter) {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(NdpError::Discovery(format!(
            "目录 {} 中没有匹配 '{filter}' 的文件",
            directory.display()
        )));
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "x").unwrap();
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "sam_002.dat");
        touch(dir.path(), "sam_001.dat");
        touch(dir.path(), "bgd_001.dat");
        fs::create_dir(dir.path().join("sam_subdir")).unwrap();

        let files = discover_files(dir.path(), "sam_").unwrap();
        let names: Vec<_> = files.iter().map(|p| utils::extract_filename_lossy(p)).collect();
        assert_eq!(names, vec!["sam_001.dat", "sam_002.dat"]);
    }

    #[test]
    fn test_empty_match_is_discovery_error() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "other.dat");
        assert!(matches!(
            discover_files(dir.path(), "sam_"),
            Err(NdpError::Discovery(_))
        ));
        assert!(matches!(
            discover_files(&dir.path().join("missing"), "x"),
            Err(NdpError::Discovery(_))
        ));
    }

    #[test]
    fn test_short_schema_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_schema_text("NDP Data Schema\n", dir.path());
        assert!(matches!(result, Err(NdpError::Configuration(_))));
    }
}
