// ==========================================
// 库存差异分析 - 统计引擎
// ==========================================
// 输入: 长表记录
// 输出: 全局统计 / 仓库与物料排行 / U-C 对比 / 仓库明细 / 数量分布
// ==========================================

use crate::domain::inventory::LongRecord;
use crate::domain::stats::{
    DistributionReport, InventoryStats, KindBreakdown, KindComparison, KindComparisonRow,
    OutlierReport, RankedQuantity, StoreDetails, TopRanking,
};
use crate::domain::types::{DataKind, ExploitationBand};
use crate::engine::deficit::RATIO_SMOOTHING;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::numeric::{kurtosis, mean, median, percentile, sample_variance, skewness, sorted};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::info;

/// 分布报告的分位点（%）
const PERCENTILES: [u32; 9] = [1, 5, 10, 25, 50, 75, 90, 95, 99];

/// 仓库明细中的前 N 物料
const STORE_TOP_ITEMS: usize = 5;

/// IQR 异常值系数
const IQR_FACTOR: f64 = 1.5;

// ==========================================
// StatsEngine - 统计引擎
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct StatsEngine {
    over_exploitation_ratio: f64,
    under_exploitation_ratio: f64,
}

impl Default for StatsEngine {
    fn default() -> Self {
        Self::new(1.1, 0.9)
    }
}

impl StatsEngine {
    /// 创建统计引擎
    ///
    /// # 参数
    /// - over_exploitation_ratio: ratio_u_c 高于此值视为超额运营
    /// - under_exploitation_ratio: ratio_u_c 低于此值视为运营不足
    pub fn new(over_exploitation_ratio: f64, under_exploitation_ratio: f64) -> Self {
        Self {
            over_exploitation_ratio,
            under_exploitation_ratio,
        }
    }

    /// 全局统计
    pub fn global_stats(&self, records: &[LongRecord]) -> EngineResult<InventoryStats> {
        if records.is_empty() {
            return Err(EngineError::Analysis(
                "空输入无法计算统计".to_string(),
            ));
        }

        let quantities: Vec<f64> = records.iter().map(|r| r.quantite).collect();
        let stats = InventoryStats {
            nombre_nomenclatures: distinct(records.iter().map(|r| r.nomenclature.as_str())),
            nombre_magasins: distinct(records.iter().map(|r| r.magasin.as_str())),
            nombre_total_entrees: records.len(),
            quantite_totale: quantities.iter().sum(),
            quantite_moyenne: mean(&quantities),
            quantite_mediane: median(&quantities),
            quantite_max: quantities.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            quantite_min: quantities.iter().copied().fold(f64::INFINITY, f64::min),
        };

        info!(
            nomenclatures = stats.nombre_nomenclatures,
            magasins = stats.nombre_magasins,
            "全局统计计算完成"
        );
        Ok(stats)
    }

    /// 按物料数量排行
    pub fn top_items(&self, records: &[LongRecord], n: usize) -> TopRanking {
        Self::top_by(records, n, |r| r.nomenclature.as_str())
    }

    /// 按仓库数量排行
    pub fn top_stores(&self, records: &[LongRecord], n: usize) -> TopRanking {
        Self::top_by(records, n, |r| r.magasin.as_str())
    }

    fn top_by<'a, F>(records: &'a [LongRecord], n: usize, key: F) -> TopRanking
    where
        F: Fn(&'a LongRecord) -> &'a str,
    {
        if records.is_empty() {
            return TopRanking::default();
        }

        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for record in records {
            *totals.entry(key(record)).or_default() += record.quantite;
        }

        let mut entries: Vec<RankedQuantity> = totals
            .into_iter()
            .map(|(k, quantite)| RankedQuantity {
                key: k.to_string(),
                quantite,
            })
            .collect();
        entries.sort_by(|a, b| b.quantite.total_cmp(&a.quantite));
        entries.truncate(n);

        let grand_total: f64 = records.iter().map(|r| r.quantite).sum();
        let total_quantity: f64 = entries.iter().map(|e| e.quantite).sum();

        TopRanking {
            entries,
            total_quantity,
            percentage_of_total: total_quantity / grand_total * 100.0,
        }
    }

    /// 按仓库对比运营量与库存量, 按 |U - C| 降序
    pub fn compare_kinds(&self, records: &[LongRecord]) -> KindComparison {
        if records.is_empty() {
            return KindComparison::default();
        }

        let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        for record in records {
            let entry = totals.entry(record.magasin.as_str()).or_default();
            match record.type_donnee {
                DataKind::Exploitation => entry.0 += record.quantite,
                DataKind::Stock => entry.1 += record.quantite,
            }
        }

        let mut rows: Vec<KindComparisonRow> = totals
            .into_iter()
            .map(|(magasin, (total_u, total_c))| {
                let ratio_u_c = total_u / (total_c + RATIO_SMOOTHING);
                let difference = total_u - total_c;
                KindComparisonRow {
                    magasin: magasin.to_string(),
                    total_u,
                    total_c,
                    ratio_u_c,
                    difference,
                    difference_abs: difference.abs(),
                    band: self.band(ratio_u_c),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.difference_abs.total_cmp(&a.difference_abs));

        let total_exploitation: f64 = rows.iter().map(|r| r.total_u).sum();
        let total_stock: f64 = rows.iter().map(|r| r.total_c).sum();
        let count_band = |band: ExploitationBand| rows.iter().filter(|r| r.band == band).count();

        KindComparison {
            total_exploitation,
            total_stock,
            ratio_global: total_exploitation / (total_stock + RATIO_SMOOTHING),
            magasins_surexploitation: count_band(ExploitationBand::OverExploited),
            magasins_sous_exploitation: count_band(ExploitationBand::UnderExploited),
            magasins_equilibres: count_band(ExploitationBand::Balanced),
            rows,
        }
    }

    fn band(&self, ratio: f64) -> ExploitationBand {
        if ratio > self.over_exploitation_ratio {
            ExploitationBand::OverExploited
        } else if ratio < self.under_exploitation_ratio {
            ExploitationBand::UnderExploited
        } else {
            ExploitationBand::Balanced
        }
    }

    /// 单仓库明细
    ///
    /// # 返回
    /// - None: 仓库不存在于输入中
    pub fn store_details(&self, records: &[LongRecord], magasin: &str) -> Option<StoreDetails> {
        let store_records: Vec<&LongRecord> =
            records.iter().filter(|r| r.magasin == magasin).collect();
        if store_records.is_empty() {
            return None;
        }

        let breakdown = |kind: DataKind| {
            let rows: Vec<&&LongRecord> =
                store_records.iter().filter(|r| r.type_donnee == kind).collect();
            KindBreakdown {
                count: rows.len(),
                total_quantity: rows.iter().map(|r| r.quantite).sum(),
                nomenclatures: distinct(rows.iter().map(|r| r.nomenclature.as_str())),
            }
        };

        let mut per_item: HashMap<&str, f64> = HashMap::new();
        for record in &store_records {
            *per_item.entry(record.nomenclature.as_str()).or_default() += record.quantite;
        }
        let mut top_nomenclatures: Vec<RankedQuantity> = per_item
            .into_iter()
            .map(|(key, quantite)| RankedQuantity {
                key: key.to_string(),
                quantite,
            })
            .collect();
        top_nomenclatures.sort_by(|a, b| {
            b.quantite
                .total_cmp(&a.quantite)
                .then_with(|| a.key.cmp(&b.key))
        });
        top_nomenclatures.truncate(STORE_TOP_ITEMS);

        Some(StoreDetails {
            magasin: magasin.to_string(),
            total_nomenclatures: distinct(store_records.iter().map(|r| r.nomenclature.as_str())),
            total_entries: store_records.len(),
            exploitation: breakdown(DataKind::Exploitation),
            stock: breakdown(DataKind::Stock),
            top_nomenclatures,
        })
    }

    /// 数量分布（分位数 / IQR 异常值 / 离散度 / 形态）
    ///
    /// # 返回
    /// - None: 输入为空
    pub fn distribution(&self, records: &[LongRecord]) -> Option<DistributionReport> {
        if records.is_empty() {
            return None;
        }

        let quantities: Vec<f64> = records.iter().map(|r| r.quantite).collect();
        let ordered = sorted(&quantities);

        let percentiles = PERCENTILES
            .iter()
            .map(|p| (format!("p{}", p), percentile(&ordered, *p as f64 / 100.0)))
            .collect();

        let q1 = percentile(&ordered, 0.25);
        let q3 = percentile(&ordered, 0.75);
        let iqr = q3 - q1;
        let lower_bound = q1 - IQR_FACTOR * iqr;
        let upper_bound = q3 + IQR_FACTOR * iqr;
        let outlier_count = quantities
            .iter()
            .filter(|q| **q < lower_bound || **q > upper_bound)
            .count();

        let variance = sample_variance(&quantities);

        Some(DistributionReport {
            percentiles,
            outliers: OutlierReport {
                count: outlier_count,
                percentage: outlier_count as f64 / quantities.len() as f64 * 100.0,
                lower_bound,
                upper_bound,
            },
            std_dev: variance.sqrt(),
            variance,
            skewness: skewness(&quantities),
            kurtosis: kurtosis(&quantities),
        })
    }

    /// 去重后排序的仓库列表
    pub fn available_stores(&self, records: &[LongRecord]) -> Vec<String> {
        sorted_distinct(records.iter().map(|r| r.magasin.as_str()))
    }

    /// 去重后排序的物料列表
    pub fn available_items(&self, records: &[LongRecord]) -> Vec<String> {
        sorted_distinct(records.iter().map(|r| r.nomenclature.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.collect::<HashSet<_>>().len()
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut v: Vec<String> = values
        .collect::<HashSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    v.sort();
    v
}
