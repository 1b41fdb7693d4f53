//! 数据集扫描结果展示
//!
//! schema驱动的文件发现由 [`crate::input::schema`] 完成，这里负责展示和输出路径生成。

use super::cli::AppConfig;
use super::utils;
use crate::core::dataset::DatasetRole;
use crate::input::DataSchema;
use std::path::PathBuf;

/// 显示文件发现结果
pub fn show_scan_results(config: &AppConfig, schema: &DataSchema) {
    println!("📁 数据目录: {}", config.input_path.display());

    for entry in &schema.entries {
        println!(
            "   {:<8} {} 个文件 / files  ({}/*{}*)",
            entry.role.to_string(),
            entry.files.len(),
            entry.directory.display(),
            entry.filter
        );
        if config.verbose {
            for (i, file) in entry.files.iter().enumerate() {
                println!("      {}. {}", i + 1, utils::extract_filename_lossy(file));
            }
        }
    }
    println!();
}

/// 生成CSV输出路径（未指定时以第一个样品数据文件命名，放在数据目录下）
pub fn generate_output_path(config: &AppConfig, schema: &DataSchema) -> PathBuf {
    config.output_path.clone().unwrap_or_else(|| {
        let base_name = schema
            .dataset_files(DatasetRole::SampleData)
            .ok()
            .and_then(|files| files.first())
            .map(|first| utils::extract_base_name(first))
            .unwrap_or_else(|| utils::extract_base_name(&config.input_path));

        config.input_path.join(format!("{base_name}_NDP_Profile.csv"))
    })
}
