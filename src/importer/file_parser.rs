// ==========================================
// 库存差异分析 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析 → WideTable
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::domain::inventory::{CellValue, WideTable};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::inventory_importer_trait::WideTableParser;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, info};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 源文件编码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Latin1,
}

/// 解码 CSV 字节流
///
/// 顺序: UTF-8（去 BOM）→ Latin-1（逐字节映射，不会失败）
pub fn decode_bytes(bytes: &[u8]) -> (String, SourceEncoding) {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(body) {
        Ok(text) => (text.to_string(), SourceEncoding::Utf8),
        Err(_) => (
            body.iter().map(|&b| b as char).collect(),
            SourceEncoding::Latin1,
        ),
    }
}

/// 检查文件存在
fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

/// 跳过完全空白的行
fn is_blank_row(row: &[CellValue]) -> bool {
    row.iter().all(CellValue::is_blank)
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 从已解码文本解析宽表
    pub fn parse_str(&self, content: &str) -> ImportResult<WideTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(content.as_bytes());

        // 读取表头（保持原文, 后缀规则按完整列名匹配）
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        // 读取所有行
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<CellValue> = record.iter().map(CellValue::from_text).collect();

            if is_blank_row(&row) {
                continue;
            }

            rows.push(row);
        }

        Ok(WideTable::new(columns, rows))
    }
}

impl WideTableParser for CsvParser {
    fn parse_wide_table(&self, file_path: &Path) -> ImportResult<WideTable> {
        ensure_exists(file_path)?;

        // 检查扩展名
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let bytes = std::fs::read(file_path)?;
        let (content, encoding) = decode_bytes(&bytes);
        debug!(path = %file_path.display(), ?encoding, "CSV 解码完成");

        let table = self.parse_str(&content)?;
        info!(
            path = %file_path.display(),
            ?encoding,
            rows = table.row_count(),
            columns = table.column_count(),
            "CSV 文件读取成功"
        );
        Ok(table)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// Excel 单元格 → CellValue
    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) => CellValue::from_text(s),
            other => CellValue::from_text(&other.to_string()),
        }
    }
}

impl WideTableParser for ExcelParser {
    fn parse_wide_table(&self, file_path: &Path) -> ImportResult<WideTable> {
        ensure_exists(file_path)?;

        // 检查扩展名
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 打开 Excel 文件
        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows_iter = range.rows();
        let header_row = rows_iter
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无表头行".to_string()))?;

        let columns: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string())
            .collect();

        // 读取数据行
        let mut rows = Vec::new();
        for data_row in rows_iter {
            let row: Vec<CellValue> = data_row.iter().map(Self::convert_cell).collect();

            if is_blank_row(&row) {
                continue;
            }

            rows.push(row);
        }

        info!(
            path = %file_path.display(),
            sheet = %sheet_name,
            rows = rows.len(),
            columns = columns.len(),
            "Excel 文件读取成功"
        );
        Ok(WideTable::new(columns, rows))
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl WideTableParser for UniversalFileParser {
    fn parse_wide_table(&self, file_path: &Path) -> ImportResult<WideTable> {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_wide_table(file_path),
            "xlsx" | "xls" => ExcelParser.parse_wide_table(file_path),
            _ => {
                ensure_exists(file_path)?;
                Err(ImportError::UnsupportedFormat(ext))
            }
        }
    }
}
