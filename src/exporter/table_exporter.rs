// ==========================================
// 库存差异分析 - 表格导出
// ==========================================
// CSV: 逗号分隔, UTF-8, 表头取字段名（与导入格式一致, 可回读）
// JSON: 对象数组, 缩进输出
// 文件名: <dataset>_<YYYYmmdd_HHMM>.<ext>
// ==========================================

use crate::domain::inventory::WideTable;
use crate::exporter::error::{ExportError, ExportResult};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

// ==========================================
// 导出格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// 文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// 从扩展名解析（不区分大小写）
    pub fn from_extension(ext: &str) -> ExportResult<Self> {
        match ext.trim().trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::Unsupported(other.to_string())),
        }
    }

    /// 从文件路径推断格式
    pub fn from_path(path: &Path) -> ExportResult<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }
}

// ==========================================
// 导出数据集
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportDataset {
    Raw,          // 原始宽表
    Long,         // 重塑后的长表
    Deficits,     // 差异明细
    StoreSummary, // 按仓库汇总
    ItemSummary,  // 按物料汇总
}

impl ExportDataset {
    /// 默认文件名前缀
    pub fn file_stem(&self) -> &'static str {
        match self {
            ExportDataset::Raw => "raw_data",
            ExportDataset::Long => "long_data",
            ExportDataset::Deficits => "deficits",
            ExportDataset::StoreSummary => "deficits_par_magasin",
            ExportDataset::ItemSummary => "deficits_par_nomenclature",
        }
    }
}

impl fmt::Display for ExportDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_stem())
    }
}

/// 生成带时间戳的默认导出路径
///
/// # 返回
/// - `<dir>/<dataset>_<YYYYmmdd_HHMM>.<ext>`
pub fn default_export_path(dir: &Path, dataset: ExportDataset, format: ExportFormat) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M");
    dir.join(format!(
        "{}_{}.{}",
        dataset.file_stem(),
        timestamp,
        format.extension()
    ))
}

// ==========================================
// TableExporter - 表格导出器
// ==========================================
pub struct TableExporter;

impl TableExporter {
    /// 序列化记录到 writer
    pub fn write_records<T, W>(records: &[T], format: ExportFormat, writer: W) -> ExportResult<()>
    where
        T: Serialize,
        W: Write,
    {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(writer);
                for record in records {
                    wtr.serialize(record)?;
                }
                wtr.flush()?;
            }
            ExportFormat::Json => {
                let mut writer = writer;
                serde_json::to_writer_pretty(&mut writer, records)?;
                writer.flush()?;
            }
        }
        Ok(())
    }

    /// 宽表写出（保持原表头）
    ///
    /// JSON 时每行输出为 {列名: 值} 对象, 空单元格为 null
    pub fn write_wide_table<W: Write>(
        table: &WideTable,
        format: ExportFormat,
        writer: W,
    ) -> ExportResult<()> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
                wtr.write_record(&table.columns)?;
                for row_idx in 0..table.row_count() {
                    let cells: Vec<String> = (0..table.column_count())
                        .map(|col_idx| table.cell(row_idx, col_idx).to_string())
                        .collect();
                    wtr.write_record(&cells)?;
                }
                wtr.flush()?;
            }
            ExportFormat::Json => {
                let rows: Vec<serde_json::Map<String, serde_json::Value>> = (0..table.row_count())
                    .map(|row_idx| {
                        table
                            .columns
                            .iter()
                            .enumerate()
                            .map(|(col_idx, column)| {
                                serde_json::to_value(table.cell(row_idx, col_idx))
                                    .map(|value| (column.clone(), value))
                            })
                            .collect::<Result<_, serde_json::Error>>()
                    })
                    .collect::<Result<_, serde_json::Error>>()?;

                let mut writer = writer;
                serde_json::to_writer_pretty(&mut writer, &rows)?;
                writer.flush()?;
            }
        }
        Ok(())
    }

    /// 导出记录到文件（自动创建父目录）
    pub fn export_records<T: Serialize>(
        records: &[T],
        format: ExportFormat,
        path: &Path,
    ) -> ExportResult<PathBuf> {
        let writer = create_file(path)?;
        Self::write_records(records, format, writer)?;
        info!(path = %path.display(), rows = records.len(), ?format, "导出完成");
        Ok(path.to_path_buf())
    }

    /// 导出宽表到文件（自动创建父目录）
    pub fn export_wide_table(
        table: &WideTable,
        format: ExportFormat,
        path: &Path,
    ) -> ExportResult<PathBuf> {
        let writer = create_file(path)?;
        Self::write_wide_table(table, format, writer)?;
        info!(path = %path.display(), rows = table.row_count(), ?format, "导出完成");
        Ok(path.to_path_buf())
    }
}

fn create_file(path: &Path) -> ExportResult<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}
