// ==========================================
// 库存差异分析 - 差异领域模型
// ==========================================
// 符号约定: deficit = quantite_stock - quantite_exploitation
// 正值 = 库存富余, 负值 = 库存短缺
// ==========================================

use crate::domain::types::DeficitKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// DeficitRecord - 差异记录
// ==========================================
// 红线: 每个 (magasin, nomenclature) 在结果中恰好出现一次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeficitRecord {
    pub magasin: String,
    pub nomenclature: String,
    pub quantite_exploitation: f64, // >= 0, 缺失侧补 0
    pub quantite_stock: f64,        // >= 0, 缺失侧补 0
    pub deficit: f64,               // stock - exploitation
}

impl DeficitRecord {
    /// 根据两侧数量构造差异记录
    pub fn new(
        magasin: impl Into<String>,
        nomenclature: impl Into<String>,
        quantite_exploitation: f64,
        quantite_stock: f64,
    ) -> Self {
        Self {
            magasin: magasin.into(),
            nomenclature: nomenclature.into(),
            quantite_exploitation,
            quantite_stock,
            deficit: quantite_stock - quantite_exploitation,
        }
    }

    pub fn has_deficit(&self) -> bool {
        self.deficit != 0.0
    }

    pub fn is_surplus(&self) -> bool {
        self.deficit > 0.0
    }

    pub fn is_shortfall(&self) -> bool {
        self.deficit < 0.0
    }

    pub fn deficit_kind(&self) -> DeficitKind {
        if self.is_surplus() {
            DeficitKind::Surplus
        } else if self.is_shortfall() {
            DeficitKind::Shortfall
        } else {
            DeficitKind::Balanced
        }
    }
}

// ==========================================
// DeficitSummary - 差异汇总统计
// ==========================================
// 口径: 全表（含 deficit = 0 的行），除非字段说明另有约定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeficitSummary {
    pub total_rows: usize,         // 差异表行数
    pub total_deficits: usize,     // deficit != 0 的行数
    pub deficit_total: f64,        // 全表 deficit 之和
    pub deficit_mean: f64,         // 全表均值（空表为 0）
    pub deficit_median: f64,       // 全表中位数（空表为 0）
    pub magasins_concernes: usize, // deficit != 0 的去重仓库数
    pub surplus_count: usize,      // deficit > 0 行数
    pub surplus_total: f64,        // deficit > 0 之和
    pub shortfall_count: usize,    // deficit < 0 行数
    pub shortfall_total: f64,      // deficit < 0 之和的绝对值
}

// ==========================================
// AnalysisMetadata - 分析元数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub analysis_id: String,         // 分析ID (UUID v4)
    pub exploitation_entries: usize, // 输入中 U 记录数
    pub stock_entries: usize,        // 输入中 C 记录数
    pub duplicates_merged: usize,    // 求和合并的重复记录数
    pub generated_at: DateTime<Utc>,
}

// ==========================================
// DeficitAnalysis - 差异分析结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeficitAnalysis {
    pub records: Vec<DeficitRecord>, // 按 (magasin, nomenclature) 升序
    pub summary: DeficitSummary,
    pub metadata: AnalysisMetadata,
}

impl DeficitAnalysis {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 只保留 deficit != 0 的记录
    pub fn non_zero(&self) -> impl Iterator<Item = &DeficitRecord> {
        self.records.iter().filter(|r| r.has_deficit())
    }
}

// ==========================================
// StoreDeficitSummary - 按仓库汇总
// ==========================================
// ratio_exp_stock = total_exploitation / (total_stock + 1)
// +1 为平滑常数, 避免库存为 0 时除零
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDeficitSummary {
    pub magasin: String,
    pub nb_items: usize,
    pub deficit_total: f64,
    pub deficit_moyen: f64,
    pub total_exploitation: f64,
    pub total_stock: f64,
    pub ratio_exp_stock: f64,
}

// ==========================================
// ItemDeficitSummary - 按物料汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDeficitSummary {
    pub nomenclature: String,
    pub nb_magasins: usize,
    pub deficit_total: f64,
    pub deficit_moyen: f64,
    pub deficit_min: f64,
    pub deficit_max: f64,
    pub nb_manques: usize,     // 短缺行数
    pub nb_surplus: usize,     // 富余行数
    pub manques_total: f64,    // 短缺绝对值之和
    pub surplus_total: f64,    // 富余之和
}
