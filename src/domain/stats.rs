// ==========================================
// 库存差异分析 - 统计领域模型
// ==========================================
// 输入: 长表记录
// 输出: 全局统计 / 排行 / U-C 对比 / 分布
// ==========================================

use crate::domain::types::ExploitationBand;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 全局库存统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryStats {
    pub nombre_nomenclatures: usize,
    pub nombre_magasins: usize,
    pub nombre_total_entrees: usize,
    pub quantite_totale: f64,
    pub quantite_moyenne: f64,
    pub quantite_mediane: f64,
    pub quantite_max: f64,
    pub quantite_min: f64,
}

/// 排行榜条目（按仓库或按物料）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedQuantity {
    pub key: String,
    pub quantite: f64,
}

/// 排行榜结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopRanking {
    pub entries: Vec<RankedQuantity>,
    pub total_quantity: f64,      // 上榜数量之和
    pub percentage_of_total: f64, // 上榜数量占全表比例（%）
}

// ==========================================
// U/C 对比
// ==========================================

/// 单仓库 U/C 对比行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindComparisonRow {
    pub magasin: String,
    pub total_u: f64,
    pub total_c: f64,
    pub ratio_u_c: f64,      // U / (C + 1)
    pub difference: f64,     // U - C
    pub difference_abs: f64,
    pub band: ExploitationBand,
}

/// U/C 对比结果（按 |difference| 降序）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KindComparison {
    pub rows: Vec<KindComparisonRow>,
    pub total_exploitation: f64,
    pub total_stock: f64,
    pub ratio_global: f64,
    pub magasins_surexploitation: usize,
    pub magasins_sous_exploitation: usize,
    pub magasins_equilibres: usize,
}

// ==========================================
// 仓库明细
// ==========================================

/// 单一数据类型的分项统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KindBreakdown {
    pub count: usize,
    pub total_quantity: f64,
    pub nomenclatures: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDetails {
    pub magasin: String,
    pub total_nomenclatures: usize,
    pub total_entries: usize,
    pub exploitation: KindBreakdown,
    pub stock: KindBreakdown,
    pub top_nomenclatures: Vec<RankedQuantity>, // 前 5
}

// ==========================================
// 数量分布
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub count: usize,
    pub percentage: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionReport {
    /// p1 / p5 / ... / p99
    pub percentiles: BTreeMap<String, f64>,
    pub outliers: OutlierReport,
    pub std_dev: f64,
    pub variance: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

/// 已加载数据概览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataOverview {
    pub raw_rows: usize,
    pub raw_columns: usize,
    pub transformed_rows: usize,
    pub nomenclatures_count: usize,
    pub magasins_count: usize,
    pub total_quantity: f64,
    pub exploitation_entries: usize,
    pub stock_entries: usize,
}
