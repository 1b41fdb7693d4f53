//! 统一错误处理框架
//!
//! NDP数据约化流程的错误类型定义。数值退化（零除、零计数）不属于错误，
//! 由 [`crate::processing::numeric::safe_divide`] 在阶段内部吸收。

use std::fmt;
use std::io;
use std::path::Path;

/// 数据约化相关的统一错误类型
#[derive(Debug)]
pub enum NdpError {
    /// 仪器常量或schema缺失/格式错误（在任何数值阶段前终止）
    Configuration(String),

    /// 数据集目录或文件无法解析，或目录为空
    Discovery(String),

    /// 原始计数文件或TRIM文件不符合固定布局
    MalformedRecord { file: String, reason: String },

    /// 前置阶段尚未提交结果
    StageNotReady { role: String, stage: String },

    /// 输入参数验证错误
    InvalidInput(String),

    /// 文件I/O错误
    IoError(io::Error),
}

impl fmt::Display for NdpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NdpError::Configuration(msg) => write!(f, "配置错误: {msg}"),
            NdpError::Discovery(msg) => write!(f, "数据集发现失败: {msg}"),
            NdpError::MalformedRecord { file, reason } => {
                write!(f, "记录格式错误 [{file}]: {reason}")
            }
            NdpError::StageNotReady { role, stage } => {
                write!(f, "阶段顺序错误: {role} 尚未完成 '{stage}'")
            }
            NdpError::InvalidInput(msg) => write!(f, "输入验证失败: {msg}"),
            NdpError::IoError(err) => write!(f, "文件I/O错误: {err}"),
        }
    }
}

impl std::error::Error for NdpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NdpError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for NdpError {
    fn from(err: io::Error) -> Self {
        NdpError::IoError(err)
    }
}

impl From<serde_json::Error> for NdpError {
    fn from(err: serde_json::Error) -> Self {
        NdpError::IoError(io::Error::other(err))
    }
}

impl From<csv::Error> for NdpError {
    fn from(err: csv::Error) -> Self {
        NdpError::IoError(io::Error::other(err))
    }
}

/// 数据约化操作的标准Result类型
pub type NdpResult<T> = Result<T, NdpError>;

// ==================== 错误转换Helper函数 ====================

/// 创建记录格式错误的helper函数
#[inline]
pub fn malformed<E: fmt::Display>(file: &Path, reason: E) -> NdpError {
    NdpError::MalformedRecord {
        file: file.display().to_string(),
        reason: reason.to_string(),
    }
}

/// 创建带文件路径的I/O错误
#[inline]
pub fn io_error(path: &Path, err: io::Error) -> NdpError {
    NdpError::IoError(io::Error::new(
        err.kind(),
        format!("{}: {err}", path.display()),
    ))
}

/// 创建配置错误的helper函数
#[inline]
pub fn configuration_error<E: fmt::Display>(context: &str, err: E) -> NdpError {
    NdpError::Configuration(format!("{context}: {err}"))
}

/// 创建阶段未就绪错误的helper函数
#[inline]
pub fn stage_not_ready(role: impl fmt::Display, stage: impl fmt::Display) -> NdpError {
    NdpError::StageNotReady {
        role: role.to_string(),
        stage: stage.to_string(),
    }
}

// ==================== 错误分类系统 ====================

/// 错误类别枚举（用于CLI退出码和建议）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ErrorCategory {
    /// 仪器常量/schema相关
    Configuration,
    /// 目录或文件发现相关
    Discovery,
    /// 文件内容布局相关
    Record,
    /// I/O相关错误（文件不存在、权限不足等）
    Io,
    /// 其他未分类错误（阶段顺序、参数）
    Other,
}

impl ErrorCategory {
    /// 从NdpError提取错误类别
    pub fn from_ndp_error(e: &NdpError) -> Self {
        match e {
            NdpError::Configuration(_) => Self::Configuration,
            NdpError::Discovery(_) => Self::Discovery,
            NdpError::MalformedRecord { .. } => Self::Record,
            NdpError::IoError(_) => Self::Io,
            NdpError::StageNotReady { .. } | NdpError::InvalidInput(_) => Self::Other,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Configuration => "配置错误",
            Self::Discovery => "发现错误",
            Self::Record => "记录错误",
            Self::Io => "I/O错误",
            Self::Other => "其他错误",
        }
    }
}
