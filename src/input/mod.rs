//! 输入读取模块
//!
//! 仪器参数文件、数据schema、原始计数文件和TRIM模拟文件的读取。
//! 全部为固定行布局的文本格式。

pub mod count_file;
pub mod instrument_file;
pub mod schema;
pub mod trim_file;

pub use count_file::{parse_count_text, read_count_file};
pub use instrument_file::{parse_instrument_text, read_instrument};
pub use schema::{DataSchema, SchemaEntry, SchemaRole, read_schema};
pub use trim_file::{parse_trim_text, read_trim_file};

use crate::error::{NdpError, NdpResult};

/// 取 `label: value` 行中第一个冒号之后的值；没有冒号时取整行
#[inline]
pub(crate) fn field_value(line: &str) -> &str {
    match line.split_once(':') {
        Some((_, value)) => value.trim(),
        None => line.trim(),
    }
}

/// 按行号取一行，缺失时返回给定错误
pub(crate) fn line_at<'a>(
    lines: &[&'a str],
    index: usize,
    missing: impl FnOnce() -> NdpError,
) -> NdpResult<&'a str> {
    lines.get(index).copied().ok_or_else(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value() {
        assert_eq!(field_value("Live Time:  12.5\n"), "12.5");
        assert_eq!(field_value("Start Time: Thu Mar 08 14:21:07 2018"), "Thu Mar 08 14:21:07 2018");
        assert_eq!(field_value("  1900 "), "1900");
    }
}
