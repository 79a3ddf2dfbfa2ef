// ==========================================
// 库存差异分析 - 库存领域模型
// ==========================================
// 宽表: 每行一个 nomenclature, 每列一个 <magasin>-<U|C>
// 长表: (nomenclature, magasin, kind, quantite) 元组
// ==========================================

use crate::domain::types::DataKind;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CellValue - 宽表原始单元格
// ==========================================
// 来源: CSV 单元格一律为 Text, Excel 数值单元格为 Number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// 从原始文本构造（空白 → Empty）
    pub fn from_text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    /// 是否为空值（NULL / 空串 / 纯空白）
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// 按数值解析
    ///
    /// # 返回
    /// - Some(f64): 有限数值（不做正负校验）
    /// - None: 空值、非数值文本、NaN/inf
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            CellValue::Empty => return None,
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

// ==========================================
// WideTable - 宽表（外部输入）
// ==========================================
// 第一列: nomenclature 键列（列名任意）
// 其余列: 候选 <magasin>-<U|C> 列
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WideTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl WideTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    /// nomenclature 键列名（第一列）
    pub fn item_column(&self) -> Option<&str> {
        self.columns.first().map(String::as_str)
    }

    /// 符合后缀规则的仓库列（不含第一列）
    pub fn store_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .skip(1)
            .map(String::as_str)
            .filter(|c| DataKind::is_store_column(c))
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// 无列或无数据行
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }

    /// 读取单元格（行长度不足时视为 Empty）
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }
}

// ==========================================
// LongRecord - 长表记录（重塑输出）
// ==========================================
// 红线: quantite > 0, 零值/负值/非数值/空值在重塑阶段丢弃
// 列名与导出格式一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    pub nomenclature: String,       // 物料编码
    pub magasin: String,            // 仓库（去掉 -U/-C 后缀）
    pub magasin_code: String,       // 原始列名
    pub type_donnee: DataKind,      // U / C
    pub quantite: f64,              // 数量（> 0）
}

impl LongRecord {
    pub fn is_exploitation(&self) -> bool {
        self.type_donnee == DataKind::Exploitation
    }

    pub fn is_stock(&self) -> bool {
        self.type_donnee == DataKind::Stock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_from_text_blank() {
        assert_eq!(CellValue::from_text("   "), CellValue::Empty);
        assert_eq!(CellValue::from_text(" 12 "), CellValue::Text("12".to_string()));
    }

    #[test]
    fn test_cell_as_number() {
        assert_eq!(CellValue::Number(3.5).as_number(), Some(3.5));
        assert_eq!(CellValue::Text(" 7 ".to_string()).as_number(), Some(7.0));
        assert_eq!(CellValue::Text("-2".to_string()).as_number(), Some(-2.0));
        assert_eq!(CellValue::Text("1e2".to_string()).as_number(), Some(100.0));
        assert_eq!(CellValue::Text("abc".to_string()).as_number(), None);
        assert_eq!(CellValue::Text("NaN".to_string()).as_number(), None);
        assert_eq!(CellValue::Text("inf".to_string()).as_number(), None);
        assert_eq!(CellValue::Number(f64::NAN).as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
    }

    #[test]
    fn test_wide_table_store_columns() {
        let table = WideTable::new(
            vec![
                "NNO".to_string(),
                "A-U".to_string(),
                "PARIS".to_string(),
                "A-C".to_string(),
            ],
            vec![],
        );
        assert_eq!(table.item_column(), Some("NNO"));
        assert_eq!(table.store_columns(), vec!["A-U", "A-C"]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_wide_table_short_row_reads_empty() {
        let table = WideTable::new(
            vec!["NNO".to_string(), "A-U".to_string()],
            vec![vec![CellValue::Text("ITEM001".to_string())]],
        );
        assert_eq!(table.cell(0, 1), &CellValue::Empty);
        assert_eq!(table.cell(5, 0), &CellValue::Empty);
    }
}
