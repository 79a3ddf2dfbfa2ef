// ==========================================
// 库存差异分析 - 宽表重塑引擎
// ==========================================
// 输入: WideTable（第一列 nomenclature, 其余 <magasin>-<U|C>）
// 输出: Vec<LongRecord>（quantite > 0）
// ==========================================
// 清洗顺序（每步过滤不可逆）:
// 1. 展开 (nomenclature, 列名, 原始值)
// 2. 丢弃空值
// 3. 丢弃不以 -U / -C 结尾的列
// 4. 数值解析, 失败按缺失处理
// 5. 丢弃 <= 0 的数量
// 6. 拆分 magasin / type_donnee
// ==========================================

use crate::domain::inventory::{LongRecord, WideTable};
use crate::domain::types::DataKind;
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 重塑过程计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReshapeReport {
    pub candidates: usize,      // 展开后的候选三元组
    pub blank: usize,           // 空值
    pub invalid_column: usize,  // 列名不符合后缀规则
    pub non_numeric: usize,     // 非数值
    pub non_positive: usize,    // <= 0
    pub emitted: usize,         // 最终输出
}

// ==========================================
// Reshaper - 宽表重塑引擎
// ==========================================
// 红线: 无状态引擎, 不修改输入
pub struct Reshaper;

impl Default for Reshaper {
    fn default() -> Self {
        Self::new()
    }
}

impl Reshaper {
    pub fn new() -> Self {
        Self
    }

    /// 宽表 → 长表
    ///
    /// # 返回
    /// - Ok(Vec<LongRecord>): 按行序、列序输出
    /// - Err(EngineError::Transformation): 空表
    pub fn reshape(&self, table: &WideTable) -> EngineResult<Vec<LongRecord>> {
        self.reshape_with_report(table).map(|(records, _)| records)
    }

    /// 宽表 → 长表, 同时返回各清洗步骤的计数
    pub fn reshape_with_report(
        &self,
        table: &WideTable,
    ) -> EngineResult<(Vec<LongRecord>, ReshapeReport)> {
        if table.is_empty() {
            return Err(EngineError::Transformation(
                "空表无法重塑（无列或无数据行）".to_string(),
            ));
        }

        let item_column = table.item_column().unwrap_or_default();
        info!(item_column = %item_column, "识别 nomenclature 列");

        // 预解析列名: None 表示整列丢弃
        let parsed_columns: Vec<Option<(&str, DataKind)>> = table
            .columns
            .iter()
            .skip(1)
            .map(|c| DataKind::from_column_name(c))
            .collect();

        let mut report = ReshapeReport::default();
        let mut records = Vec::new();

        for (row_idx, row) in table.rows.iter().enumerate() {
            let nomenclature = table.cell(row_idx, 0).to_string();

            for (offset, parsed) in parsed_columns.iter().enumerate() {
                let col_idx = offset + 1;
                report.candidates += 1;

                let raw = match row.get(col_idx) {
                    Some(cell) if !cell.is_blank() => cell,
                    _ => {
                        report.blank += 1;
                        continue;
                    }
                };

                let Some((magasin, kind)) = parsed else {
                    report.invalid_column += 1;
                    continue;
                };

                let Some(quantite) = raw.as_number() else {
                    report.non_numeric += 1;
                    continue;
                };

                if quantite <= 0.0 {
                    report.non_positive += 1;
                    continue;
                }

                records.push(LongRecord {
                    nomenclature: nomenclature.clone(),
                    magasin: magasin.to_string(),
                    magasin_code: table.columns[col_idx].clone(),
                    type_donnee: *kind,
                    quantite,
                });
            }
        }

        report.emitted = records.len();
        debug!(
            candidates = report.candidates,
            blank = report.blank,
            invalid_column = report.invalid_column,
            non_numeric = report.non_numeric,
            non_positive = report.non_positive,
            "清洗完成"
        );
        info!(emitted = report.emitted, "重塑完成");

        Ok((records, report))
    }

    /// 按仓库过滤
    pub fn filter_by_store(&self, records: &[LongRecord], magasin: &str) -> Vec<LongRecord> {
        let result: Vec<LongRecord> = records
            .iter()
            .filter(|r| r.magasin == magasin)
            .cloned()
            .collect();
        info!(magasin = %magasin, count = result.len(), "按仓库过滤");
        result
    }

    /// 按物料过滤
    pub fn filter_by_item(&self, records: &[LongRecord], nomenclature: &str) -> Vec<LongRecord> {
        let result: Vec<LongRecord> = records
            .iter()
            .filter(|r| r.nomenclature == nomenclature)
            .cloned()
            .collect();
        info!(nomenclature = %nomenclature, count = result.len(), "按物料过滤");
        result
    }
}
