//! 工具函数模块
//!
//! 文件路径处理和报告格式化中用到的通用函数。

use std::path::Path;

/// 提取文件名（返回String，用于日志和来源记录）
#[inline]
pub fn extract_filename_lossy(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// 获取父目录，如果不存在则返回当前目录
#[inline]
pub fn get_parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// 提取目录或文件名作为输出文件的基础名
#[inline]
pub fn extract_base_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .unwrap_or("ndp")
        .to_string()
}

/// 把文件名列表合并为一行（CSV头部使用）
pub fn join_names(names: &[String]) -> String {
    names.join(", ")
}
