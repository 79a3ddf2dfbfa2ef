// ==========================================
// 库存差异分析 - 命令行入口
// ==========================================
// 用法:
//   material-deficit <input.csv|xlsx> [output_dir]
//
// 输出: 汇总、最大差异、按仓库汇总; 差异明细与仓库汇总写入 CSV
// ==========================================

use anyhow::Context;
use material_deficit::api::{ApiError, ApiResult, InventorySession};
use material_deficit::config::ConfigManager;
use material_deficit::domain::{DeficitRecord, DeficitSummary, StoreDeficitSummary};
use material_deficit::exporter::{default_export_path, ExportDataset, ExportFormat};
use material_deficit::logging;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        eprintln!("用法: material-deficit <input.csv|xlsx> [output_dir]");
        return ExitCode::from(2);
    };
    let output_dir = args.next().map(PathBuf::from);

    match run(Path::new(&input), output_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[{}] {}", e.category(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(input: &Path, output_dir: Option<PathBuf>) -> ApiResult<()> {
    let config = ConfigManager::load_or_default(None)?.into_config();
    logging::init(&config.log_level);

    tracing::info!(
        "{} v{} - 输入: {}",
        material_deficit::APP_NAME,
        material_deficit::VERSION,
        input.display()
    );

    let output_dir = output_dir.unwrap_or_else(|| config.export_dir.clone());
    let top_n = config.top_n;

    let mut session = InventorySession::new(config);
    let overview = session.load_file(input)?;
    println!(
        "已加载 {} 行 × {} 列 → {} 条记录（{} 个仓库, {} 个物料）",
        overview.raw_rows,
        overview.raw_columns,
        overview.transformed_rows,
        overview.magasins_count,
        overview.nomenclatures_count
    );

    let analysis = session.analyze_deficits()?;
    print_summary(&analysis.summary);
    print_top(&session.top_deficits(top_n, true)?);
    let stores = session.store_summary()?;
    print_stores(&stores);

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("无法创建输出目录: {}", output_dir.display()))
        .map_err(ApiError::from)?;

    for dataset in [ExportDataset::Deficits, ExportDataset::StoreSummary] {
        let path = default_export_path(&output_dir, dataset, ExportFormat::Csv);
        let written = session.export(dataset, ExportFormat::Csv, Some(&path))?;
        println!("已导出: {}", written.display());
    }

    Ok(())
}

fn print_summary(summary: &DeficitSummary) {
    println!();
    println!("===== 差异汇总 =====");
    println!("记录数:         {}", summary.total_rows);
    println!("存在差异:       {}", summary.total_deficits);
    println!("涉及仓库:       {}", summary.magasins_concernes);
    println!("差异合计:       {:.2}", summary.deficit_total);
    println!("差异均值:       {:.2}", summary.deficit_mean);
    println!("差异中位数:     {:.2}", summary.deficit_median);
    println!(
        "富余:           {} 条, 合计 {:.2}",
        summary.surplus_count, summary.surplus_total
    );
    println!(
        "短缺:           {} 条, 合计 {:.2}",
        summary.shortfall_count, summary.shortfall_total
    );
}

fn print_top(records: &[DeficitRecord]) {
    println!();
    println!("===== 最大差异（按绝对值）=====");
    println!(
        "{:<16} {:<20} {:>12} {:>12} {:>12}",
        "magasin", "nomenclature", "exploitation", "stock", "deficit"
    );
    for r in records {
        println!(
            "{:<16} {:<20} {:>12.2} {:>12.2} {:>12.2}",
            r.magasin, r.nomenclature, r.quantite_exploitation, r.quantite_stock, r.deficit
        );
    }
}

fn print_stores(stores: &[StoreDeficitSummary]) {
    println!();
    println!("===== 按仓库汇总 =====");
    println!(
        "{:<16} {:>8} {:>12} {:>12} {:>8}",
        "magasin", "items", "deficit", "moyen", "ratio"
    );
    for s in stores {
        println!(
            "{:<16} {:>8} {:>12.2} {:>12.2} {:>8.3}",
            s.magasin, s.nb_items, s.deficit_total, s.deficit_moyen, s.ratio_exp_stock
        );
    }
}
