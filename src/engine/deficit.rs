// ==========================================
// 库存差异分析 - 差异计算引擎
// ==========================================
// 输入: 长表记录（任意子集, 如按仓库过滤后的记录）
// 输出: DeficitAnalysis（差异表 + 汇总 + 元数据）
// ==========================================
// 流程:
// 1. 按 type_donnee 拆分 U / C
// 2. 以 (magasin, nomenclature) 全外连接, 缺失侧补 0
// 3. deficit = quantite_stock - quantite_exploitation
// 4. 按 (magasin, nomenclature) 升序输出
// ==========================================

use crate::domain::deficit::{
    AnalysisMetadata, DeficitAnalysis, DeficitRecord, DeficitSummary, ItemDeficitSummary,
    StoreDeficitSummary,
};
use crate::domain::inventory::LongRecord;
use crate::domain::types::{DataKind, DuplicatePolicy};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::numeric::{mean, median, round_to};
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use tracing::{info, warn};
use uuid::Uuid;

/// 比例平滑常数: total_exploitation / (total_stock + 1)
pub const RATIO_SMOOTHING: f64 = 1.0;

/// 连接键 (magasin, nomenclature)
type JoinKey = (String, String);

/// 连接槽位 (exploitation, stock)
#[derive(Debug, Default, Clone, Copy)]
struct JoinSlot {
    exploitation: Option<f64>,
    stock: Option<f64>,
}

// ==========================================
// DeficitEngine - 差异计算引擎
// ==========================================
// 红线: 纯计算, 不持有缓存, 不修改输入
#[derive(Debug, Clone, Copy, Default)]
pub struct DeficitEngine {
    duplicate_policy: DuplicatePolicy,
}

impl DeficitEngine {
    /// 创建差异计算引擎
    ///
    /// # 参数
    /// - duplicate_policy: 重复 (magasin, nomenclature, kind) 的处理方式
    pub fn new(duplicate_policy: DuplicatePolicy) -> Self {
        Self { duplicate_policy }
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算差异
    ///
    /// # 返回
    /// - Ok(DeficitAnalysis): 差异表 + 汇总
    /// - Err(EngineError::Analysis): 输入为空
    /// - Err(EngineError::DuplicateEntry): 重复键且策略为 Reject
    pub fn compute_deficits(&self, records: &[LongRecord]) -> EngineResult<DeficitAnalysis> {
        if records.is_empty() {
            return Err(EngineError::Analysis(
                "空输入无法进行差异分析".to_string(),
            ));
        }

        // 1. 拆分 U / C
        let exploitation_entries = records.iter().filter(|r| r.is_exploitation()).count();
        let stock_entries = records.iter().filter(|r| r.is_stock()).count();

        if exploitation_entries == 0 && stock_entries == 0 {
            warn!("未找到运营或库存数据");
            return Ok(Self::build_analysis(Vec::new(), exploitation_entries, stock_entries, 0));
        }

        // 2. 全外连接（BTreeMap 保证 (magasin, nomenclature) 升序）
        let (joined, duplicates_merged) = self.outer_join(records)?;

        // 3. 缺失侧补 0, 计算 deficit
        let deficits: Vec<DeficitRecord> = joined
            .into_iter()
            .map(|((magasin, nomenclature), slot)| {
                DeficitRecord::new(
                    magasin,
                    nomenclature,
                    slot.exploitation.unwrap_or(0.0),
                    slot.stock.unwrap_or(0.0),
                )
            })
            .collect();

        let analysis = Self::build_analysis(
            deficits,
            exploitation_entries,
            stock_entries,
            duplicates_merged,
        );

        info!(
            rows = analysis.records.len(),
            total_deficits = analysis.summary.total_deficits,
            duplicates_merged,
            "差异分析完成"
        );
        Ok(analysis)
    }

    /// 全外连接, 返回 (连接结果, 合并的重复记录数)
    fn outer_join(
        &self,
        records: &[LongRecord],
    ) -> EngineResult<(BTreeMap<JoinKey, JoinSlot>, usize)> {
        let mut joined: BTreeMap<JoinKey, JoinSlot> = BTreeMap::new();
        let mut duplicates_merged = 0;

        for record in records {
            let slot = joined
                .entry((record.magasin.clone(), record.nomenclature.clone()))
                .or_default();
            let side = match record.type_donnee {
                DataKind::Exploitation => &mut slot.exploitation,
                DataKind::Stock => &mut slot.stock,
            };

            match (*side, self.duplicate_policy) {
                (None, _) => *side = Some(record.quantite),
                (Some(existing), DuplicatePolicy::Sum) => {
                    *side = Some(existing + record.quantite);
                    duplicates_merged += 1;
                }
                (Some(_), DuplicatePolicy::Reject) => {
                    return Err(EngineError::DuplicateEntry {
                        magasin: record.magasin.clone(),
                        nomenclature: record.nomenclature.clone(),
                        kind: record.type_donnee,
                    });
                }
            }
        }

        if duplicates_merged > 0 {
            warn!(duplicates_merged, "重复记录已求和合并");
        }

        Ok((joined, duplicates_merged))
    }

    fn build_analysis(
        records: Vec<DeficitRecord>,
        exploitation_entries: usize,
        stock_entries: usize,
        duplicates_merged: usize,
    ) -> DeficitAnalysis {
        let summary = Self::summarize(&records);
        DeficitAnalysis {
            records,
            summary,
            metadata: AnalysisMetadata {
                analysis_id: Uuid::new_v4().to_string(),
                exploitation_entries,
                stock_entries,
                duplicates_merged,
                generated_at: Utc::now(),
            },
        }
    }

    /// 汇总统计
    pub fn summarize(records: &[DeficitRecord]) -> DeficitSummary {
        if records.is_empty() {
            return DeficitSummary::default();
        }

        let deficits: Vec<f64> = records.iter().map(|r| r.deficit).collect();
        let surplus: Vec<f64> = deficits.iter().copied().filter(|d| *d > 0.0).collect();
        let shortfall: Vec<f64> = deficits.iter().copied().filter(|d| *d < 0.0).collect();

        let magasins_concernes = records
            .iter()
            .filter(|r| r.has_deficit())
            .map(|r| r.magasin.as_str())
            .collect::<HashSet<_>>()
            .len();

        DeficitSummary {
            total_rows: records.len(),
            total_deficits: surplus.len() + shortfall.len(),
            deficit_total: deficits.iter().sum(),
            deficit_mean: mean(&deficits),
            deficit_median: median(&deficits),
            magasins_concernes,
            surplus_count: surplus.len(),
            surplus_total: surplus.iter().sum(),
            shortfall_count: shortfall.len(),
            shortfall_total: shortfall.iter().sum::<f64>().abs(),
        }
    }

    // ==========================================
    // 派生查询
    // ==========================================

    /// 最大的 n 条差异
    ///
    /// # 参数
    /// - by_absolute_value: true 按 |deficit| 排序, false 按 deficit 排序
    ///
    /// # 排序
    /// - 主键降序, 并列时按 (magasin, nomenclature) 升序
    pub fn top_deficits(
        &self,
        analysis: &DeficitAnalysis,
        n: usize,
        by_absolute_value: bool,
    ) -> Vec<DeficitRecord> {
        let rank = |r: &DeficitRecord| {
            if by_absolute_value {
                r.deficit.abs()
            } else {
                r.deficit
            }
        };

        let mut ranked = analysis.records.clone();
        ranked.sort_by(|a, b| {
            rank(b)
                .total_cmp(&rank(a))
                .then_with(|| a.magasin.cmp(&b.magasin))
                .then_with(|| a.nomenclature.cmp(&b.nomenclature))
        });
        ranked.truncate(n);
        ranked
    }

    /// 按仓库汇总, 按 deficit_total 降序（并列按仓库名升序）
    pub fn per_store_summary(&self, analysis: &DeficitAnalysis) -> Vec<StoreDeficitSummary> {
        let mut groups: BTreeMap<&str, Vec<&DeficitRecord>> = BTreeMap::new();
        for record in &analysis.records {
            groups.entry(record.magasin.as_str()).or_default().push(record);
        }

        let mut summaries: Vec<StoreDeficitSummary> = groups
            .into_iter()
            .map(|(magasin, rows)| {
                let deficits: Vec<f64> = rows.iter().map(|r| r.deficit).collect();
                let total_exploitation =
                    round_to(rows.iter().map(|r| r.quantite_exploitation).sum(), 2);
                let total_stock = round_to(rows.iter().map(|r| r.quantite_stock).sum(), 2);

                StoreDeficitSummary {
                    magasin: magasin.to_string(),
                    nb_items: rows.len(),
                    deficit_total: round_to(deficits.iter().sum(), 2),
                    deficit_moyen: round_to(mean(&deficits), 2),
                    total_exploitation,
                    total_stock,
                    ratio_exp_stock: round_to(
                        total_exploitation / (total_stock + RATIO_SMOOTHING),
                        3,
                    ),
                }
            })
            .collect();

        // 稳定排序, 并列时保留仓库名升序
        summaries.sort_by(|a, b| b.deficit_total.total_cmp(&a.deficit_total));
        summaries
    }

    /// 按物料汇总, 按 |deficit_total| 降序（并列按物料升序）
    pub fn per_item_summary(&self, analysis: &DeficitAnalysis) -> Vec<ItemDeficitSummary> {
        let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in &analysis.records {
            groups
                .entry(record.nomenclature.as_str())
                .or_default()
                .push(record.deficit);
        }

        let mut summaries: Vec<ItemDeficitSummary> = groups
            .into_iter()
            .map(|(nomenclature, deficits)| {
                let shortfall: Vec<f64> = deficits.iter().copied().filter(|d| *d < 0.0).collect();
                let surplus: Vec<f64> = deficits.iter().copied().filter(|d| *d > 0.0).collect();

                ItemDeficitSummary {
                    nomenclature: nomenclature.to_string(),
                    nb_magasins: deficits.len(),
                    deficit_total: round_to(deficits.iter().sum(), 2),
                    deficit_moyen: round_to(mean(&deficits), 2),
                    deficit_min: deficits.iter().copied().fold(f64::INFINITY, f64::min),
                    deficit_max: deficits.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    nb_manques: shortfall.len(),
                    nb_surplus: surplus.len(),
                    manques_total: round_to(shortfall.iter().sum::<f64>().abs(), 2),
                    surplus_total: round_to(surplus.iter().sum(), 2),
                }
            })
            .collect();

        summaries.sort_by(|a, b| b.deficit_total.abs().total_cmp(&a.deficit_total.abs()));
        summaries
    }
}
