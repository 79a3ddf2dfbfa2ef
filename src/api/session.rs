// ==========================================
// 库存差异分析 - 分析会话
// ==========================================
// 职责: 持有已加载数据, 串联 导入 → 重塑 → 分析 → 导出
// 缓存: 差异分析与全局统计按输入内容缓存（可通过配置关闭）
// 红线: 未加载数据时所有数据相关操作返回 ApiError::NoData
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::AnalysisConfig;
use crate::domain::deficit::{
    DeficitAnalysis, DeficitRecord, ItemDeficitSummary, StoreDeficitSummary,
};
use crate::domain::inventory::{LongRecord, WideTable};
use crate::domain::stats::{
    DataOverview, DistributionReport, InventoryStats, KindComparison, StoreDetails, TopRanking,
};
use crate::engine::{AnalysisCache, DeficitEngine, ReshapeReport, Reshaper, StatsEngine};
use crate::exporter::{default_export_path, ExportDataset, ExportFormat, TableExporter};
use crate::importer::InventoryImporter;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// 内存表的来源标识
const IN_MEMORY_SOURCE: &str = "<memory>";

/// 已加载的数据
struct LoadedData {
    source: String,
    raw: WideTable,
    records: Vec<LongRecord>,
    report: ReshapeReport,
}

// ==========================================
// InventorySession - 分析会话
// ==========================================
pub struct InventorySession {
    config: AnalysisConfig,
    importer: InventoryImporter,
    reshaper: Reshaper,
    deficit_engine: DeficitEngine,
    stats_engine: StatsEngine,
    data: Option<LoadedData>,
    deficit_cache: AnalysisCache<DeficitAnalysis>,
    stats_cache: AnalysisCache<InventoryStats>,
}

impl Default for InventorySession {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl InventorySession {
    /// 创建会话（使用默认导入器）
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_importer(config, InventoryImporter::default())
    }

    /// 创建会话（自定义导入器）
    pub fn with_importer(config: AnalysisConfig, importer: InventoryImporter) -> Self {
        let deficit_engine = DeficitEngine::new(config.duplicate_policy);
        let stats_engine = StatsEngine::new(
            config.over_exploitation_ratio,
            config.under_exploitation_ratio,
        );

        Self {
            config,
            importer,
            reshaper: Reshaper::new(),
            deficit_engine,
            stats_engine,
            data: None,
            deficit_cache: AnalysisCache::new("deficits"),
            stats_cache: AnalysisCache::new("global_stats"),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    // ==========================================
    // 数据加载
    // ==========================================

    /// 导入库存文件并重塑
    ///
    /// # 返回
    /// - Ok(DataOverview): 加载后的数据概览
    /// - Err(ApiError::Import): 读取失败或输入结构错误
    /// - Err(ApiError::Engine): 重塑失败
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> ApiResult<DataOverview> {
        let path = path.as_ref();
        let table = self.importer.import(path)?;
        self.install(table, path.display().to_string())
    }

    /// 加载内存中的宽表（执行与文件导入相同的结构校验）
    pub fn load_table(&mut self, table: WideTable) -> ApiResult<DataOverview> {
        self.importer.validate(&table, IN_MEMORY_SOURCE)?;
        self.install(table, IN_MEMORY_SOURCE.to_string())
    }

    fn install(&mut self, raw: WideTable, source: String) -> ApiResult<DataOverview> {
        let (records, report) = self.reshaper.reshape_with_report(&raw)?;

        // 重塑成功后再替换, 失败时保留原数据
        self.clear_cache();
        self.data = Some(LoadedData {
            source,
            raw,
            records,
            report,
        });

        let overview = self.overview()?;
        info!(
            raw_rows = overview.raw_rows,
            transformed_rows = overview.transformed_rows,
            "数据加载完成"
        );
        Ok(overview)
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// 数据来源（文件路径或 "<memory>"）
    pub fn source(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.source.as_str())
    }

    fn loaded(&self) -> ApiResult<&LoadedData> {
        self.data.as_ref().ok_or(ApiError::NoData)
    }

    /// 原始宽表
    pub fn raw_table(&self) -> ApiResult<&WideTable> {
        Ok(&self.loaded()?.raw)
    }

    /// 重塑后的长表
    pub fn records(&self) -> ApiResult<&[LongRecord]> {
        Ok(&self.loaded()?.records)
    }

    /// 重塑清洗计数
    pub fn reshape_report(&self) -> ApiResult<ReshapeReport> {
        Ok(self.loaded()?.report)
    }

    // ==========================================
    // 概览与统计
    // ==========================================

    pub fn overview(&self) -> ApiResult<DataOverview> {
        let data = self.loaded()?;
        let records = &data.records;

        let nomenclatures: HashSet<&str> = records.iter().map(|r| r.nomenclature.as_str()).collect();
        let magasins: HashSet<&str> = records.iter().map(|r| r.magasin.as_str()).collect();

        Ok(DataOverview {
            raw_rows: data.raw.row_count(),
            raw_columns: data.raw.column_count(),
            transformed_rows: records.len(),
            nomenclatures_count: nomenclatures.len(),
            magasins_count: magasins.len(),
            total_quantity: records.iter().map(|r| r.quantite).sum(),
            exploitation_entries: records.iter().filter(|r| r.is_exploitation()).count(),
            stock_entries: records.iter().filter(|r| r.is_stock()).count(),
        })
    }

    pub fn global_stats(&self) -> ApiResult<Arc<InventoryStats>> {
        let records = self.records()?;
        let compute = || self.stats_engine.global_stats(records);

        let stats = if self.config.use_cache {
            self.stats_cache.get_or_try_insert_with(records, compute)?
        } else {
            Arc::new(compute()?)
        };
        Ok(stats)
    }

    pub fn top_stores(&self, n: usize) -> ApiResult<TopRanking> {
        Ok(self.stats_engine.top_stores(self.records()?, n))
    }

    pub fn top_items(&self, n: usize) -> ApiResult<TopRanking> {
        Ok(self.stats_engine.top_items(self.records()?, n))
    }

    pub fn compare_kinds(&self) -> ApiResult<KindComparison> {
        Ok(self.stats_engine.compare_kinds(self.records()?))
    }

    /// 仓库明细（未知仓库返回 None）
    pub fn store_details(&self, magasin: &str) -> ApiResult<Option<StoreDetails>> {
        Ok(self.stats_engine.store_details(self.records()?, magasin))
    }

    pub fn distribution(&self) -> ApiResult<Option<DistributionReport>> {
        Ok(self.stats_engine.distribution(self.records()?))
    }

    // ==========================================
    // 差异分析
    // ==========================================

    /// 差异分析（按长表内容与重复键策略缓存）
    #[instrument(skip(self))]
    pub fn analyze_deficits(&self) -> ApiResult<Arc<DeficitAnalysis>> {
        let records = self.records()?;
        let compute = || self.deficit_engine.compute_deficits(records);

        let analysis = if self.config.use_cache {
            let key = (self.deficit_engine.duplicate_policy(), records);
            self.deficit_cache.get_or_try_insert_with(&key, compute)?
        } else {
            Arc::new(compute()?)
        };
        Ok(analysis)
    }

    pub fn top_deficits(&self, n: usize, by_absolute_value: bool) -> ApiResult<Vec<DeficitRecord>> {
        let analysis = self.analyze_deficits()?;
        Ok(self
            .deficit_engine
            .top_deficits(&analysis, n, by_absolute_value))
    }

    pub fn store_summary(&self) -> ApiResult<Vec<StoreDeficitSummary>> {
        let analysis = self.analyze_deficits()?;
        Ok(self.deficit_engine.per_store_summary(&analysis))
    }

    pub fn item_summary(&self) -> ApiResult<Vec<ItemDeficitSummary>> {
        let analysis = self.analyze_deficits()?;
        Ok(self.deficit_engine.per_item_summary(&analysis))
    }

    // ==========================================
    // 过滤与枚举
    // ==========================================

    pub fn filter_by_store(&self, magasin: &str) -> ApiResult<Vec<LongRecord>> {
        Ok(self.reshaper.filter_by_store(self.records()?, magasin))
    }

    pub fn filter_by_item(&self, nomenclature: &str) -> ApiResult<Vec<LongRecord>> {
        Ok(self.reshaper.filter_by_item(self.records()?, nomenclature))
    }

    /// 仓库列表（去重、升序）
    pub fn available_stores(&self) -> ApiResult<Vec<String>> {
        Ok(self.stats_engine.available_stores(self.records()?))
    }

    /// 物料列表（去重、升序）
    pub fn available_items(&self) -> ApiResult<Vec<String>> {
        Ok(self.stats_engine.available_items(self.records()?))
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 导出数据集
    ///
    /// # 参数
    /// - path: 目标文件（None 时写入配置的 export_dir, 文件名带时间戳）
    ///
    /// # 返回
    /// - Ok(PathBuf): 实际写入的文件路径
    #[instrument(skip(self, path))]
    pub fn export(
        &self,
        dataset: ExportDataset,
        format: ExportFormat,
        path: Option<&Path>,
    ) -> ApiResult<PathBuf> {
        let target = match path {
            Some(p) => p.to_path_buf(),
            None => default_export_path(&self.config.export_dir, dataset, format),
        };

        let written = match dataset {
            ExportDataset::Raw => {
                TableExporter::export_wide_table(self.raw_table()?, format, &target)?
            }
            ExportDataset::Long => TableExporter::export_records(self.records()?, format, &target)?,
            ExportDataset::Deficits => {
                let analysis = self.analyze_deficits()?;
                TableExporter::export_records(&analysis.records, format, &target)?
            }
            ExportDataset::StoreSummary => {
                TableExporter::export_records(&self.store_summary()?, format, &target)?
            }
            ExportDataset::ItemSummary => {
                TableExporter::export_records(&self.item_summary()?, format, &target)?
            }
        };
        Ok(written)
    }

    // ==========================================
    // 缓存
    // ==========================================

    /// 已缓存的结果数
    pub fn cached_entries(&self) -> usize {
        self.deficit_cache.len() + self.stats_cache.len()
    }

    pub fn clear_cache(&self) {
        self.deficit_cache.clear();
        self.stats_cache.clear();
        info!("分析缓存已清空");
    }
}
