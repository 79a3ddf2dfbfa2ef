// ==========================================
// InventorySession 端到端测试
// ==========================================
// 测试目标: 导入 → 分析 → 统计 → 导出 全流程
// ==========================================

mod test_helpers;

use material_deficit::api::{ApiError, InventorySession};
use material_deficit::config::AnalysisConfig;
use material_deficit::domain::{DeficitRecord, ExploitationBand, StoreDeficitSummary};
use material_deficit::exporter::{ExportDataset, ExportFormat};
use material_deficit::importer::ImportError;
use material_deficit::logging;
use std::fs;
use tempfile::TempDir;
use test_helpers::{approx_eq, write_csv, MIXED_CSV, REFERENCE_CSV};

fn loaded_session(csv: &str) -> (InventorySession, tempfile::NamedTempFile) {
    let file = write_csv(csv);
    let mut session = InventorySession::default();
    session.load_file(file.path()).unwrap();
    (session, file)
}

#[test]
fn test_load_and_analyze_reference() {
    logging::init_test();

    let (session, _file) = loaded_session(REFERENCE_CSV);
    let overview = session.overview().unwrap();
    assert_eq!(overview.raw_rows, 3);
    assert_eq!(overview.transformed_rows, 6);
    assert_eq!(overview.total_quantity, 60.0);

    let analysis = session.analyze_deficits().unwrap();
    assert_eq!(analysis.summary.total_deficits, 3);
    assert_eq!(analysis.summary.deficit_total, 0.0);

    let stores = session.store_summary().unwrap();
    assert_eq!(stores.len(), 1);
    // 30 / (30 + 1)
    assert_eq!(stores[0].ratio_exp_stock, 0.968);
}

#[test]
fn test_load_file_errors_are_distinct() {
    let mut session = InventorySession::default();

    let file = write_csv("NNO,PARIS\nITEM001,7\n");
    let err = session.load_file(file.path()).unwrap_err();
    assert!(matches!(err, ApiError::Import(ImportError::NoStoreColumns(_))));
    assert_eq!(err.category(), "input_shape");

    let err = session.load_file("/nonexistent/stock.csv").unwrap_err();
    assert_eq!(err.category(), "import");
    assert!(!session.has_data());
}

#[test]
fn test_failed_reload_keeps_previous_data() {
    let (mut session, _file) = loaded_session(REFERENCE_CSV);

    let bad = write_csv("NNO,PARIS\nITEM001,7\n");
    assert!(session.load_file(bad.path()).is_err());

    assert!(session.has_data());
    assert_eq!(session.overview().unwrap().transformed_rows, 6);
}

#[test]
fn test_statistics() {
    let (session, _file) = loaded_session(MIXED_CSV);

    let stats = session.global_stats().unwrap();
    assert_eq!(stats.nombre_total_entrees, 7);
    assert_eq!(stats.nombre_magasins, 2);
    assert_eq!(stats.quantite_max, 10.0);
    assert_eq!(stats.quantite_min, 1.0);

    let stores = session.top_stores(1).unwrap();
    assert_eq!(stores.entries[0].key, "NORTH-WH");
    assert_eq!(stores.entries[0].quantite, 28.0);

    // NORTH-WH: U=16, C=12 → 16/13 > 1.1
    let comparison = session.compare_kinds().unwrap();
    let north = comparison
        .rows
        .iter()
        .find(|r| r.magasin == "NORTH-WH")
        .unwrap();
    assert_eq!(north.band, ExploitationBand::OverExploited);
    // SOUTH: U=2.5, C=4 → 2.5/5 < 0.9
    let south = comparison.rows.iter().find(|r| r.magasin == "SOUTH").unwrap();
    assert_eq!(south.band, ExploitationBand::UnderExploited);

    let details = session.store_details("SOUTH").unwrap().unwrap();
    assert_eq!(details.total_entries, 3);
    assert_eq!(details.stock.count, 2);

    let dist = session.distribution().unwrap().unwrap();
    assert_eq!(dist.percentiles.len(), 9);
    assert!(approx_eq(dist.variance, dist.std_dev * dist.std_dev));
}

#[test]
fn test_export_csv_and_json() {
    let (session, _file) = loaded_session(REFERENCE_CSV);
    let dir = TempDir::new().unwrap();

    // CSV 差异明细可回读
    let path = dir.path().join("out").join("deficits.csv");
    let written = session
        .export(ExportDataset::Deficits, ExportFormat::Csv, Some(&path))
        .unwrap();
    assert_eq!(written, path);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        vec![
            "magasin",
            "nomenclature",
            "quantite_exploitation",
            "quantite_stock",
            "deficit"
        ]
    );
    let rows: Vec<DeficitRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(rows, session.analyze_deficits().unwrap().records);

    // JSON 仓库汇总
    let path = dir.path().join("stores.json");
    session
        .export(ExportDataset::StoreSummary, ExportFormat::Json, Some(&path))
        .unwrap();
    let stores: Vec<StoreDeficitSummary> =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(stores, session.store_summary().unwrap());

    // 原始宽表保持表头, 可重新导入
    let path = dir.path().join("raw.csv");
    session
        .export(ExportDataset::Raw, ExportFormat::Csv, Some(&path))
        .unwrap();
    let mut reloaded = InventorySession::default();
    let overview = reloaded.load_file(&path).unwrap();
    assert_eq!(overview.transformed_rows, 6);
}

#[test]
fn test_export_default_path_uses_config_dir() {
    let dir = TempDir::new().unwrap();
    let config = AnalysisConfig {
        export_dir: dir.path().join("exports"),
        ..AnalysisConfig::default()
    };

    let file = write_csv(REFERENCE_CSV);
    let mut session = InventorySession::new(config);
    session.load_file(file.path()).unwrap();

    let written = session
        .export(ExportDataset::ItemSummary, ExportFormat::Json, None)
        .unwrap();

    assert!(written.starts_with(dir.path().join("exports")));
    assert!(written.exists());
    let name = written.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("deficits_par_nomenclature_"));
    assert!(name.ends_with(".json"));
}
