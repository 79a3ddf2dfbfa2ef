// ==========================================
// DeficitEngine 集成测试
// ==========================================
// 测试目标: 全外连接完整性、符号约定、汇总一致性、派生查询
// ==========================================

mod test_helpers;

use material_deficit::domain::{DataKind, DuplicatePolicy, LongRecord};
use material_deficit::engine::{DeficitEngine, EngineError, Reshaper};
use material_deficit::importer::InventoryImporter;
use std::collections::HashSet;
use test_helpers::{approx_eq, wide_table, write_csv, MIXED_CSV, REFERENCE_CSV};

fn long_records(csv: &str) -> Vec<LongRecord> {
    let file = write_csv(csv);
    let table = InventoryImporter::default().import(file.path()).unwrap();
    Reshaper::new().reshape(&table).unwrap()
}

#[test]
fn test_reference_example() {
    let records = long_records(REFERENCE_CSV);
    let analysis = DeficitEngine::default().compute_deficits(&records).unwrap();

    let deficits: Vec<(&str, f64)> = analysis
        .records
        .iter()
        .map(|r| (r.nomenclature.as_str(), r.deficit))
        .collect();
    assert_eq!(
        deficits,
        vec![("ITEM001", -2.0), ("ITEM002", 5.0), ("ITEM003", -3.0)]
    );

    let s = &analysis.summary;
    assert_eq!(s.shortfall_count, 2);
    assert_eq!(s.shortfall_total, 5.0);
    assert_eq!(s.surplus_count, 1);
    assert_eq!(s.surplus_total, 5.0);
    assert_eq!(s.deficit_total, 0.0);
    assert_eq!(s.magasins_concernes, 1);
}

#[test]
fn test_outer_join_completeness() {
    let records = long_records(MIXED_CSV);
    let analysis = DeficitEngine::default().compute_deficits(&records).unwrap();

    let expected: HashSet<(String, String)> = records
        .iter()
        .map(|r| (r.magasin.clone(), r.nomenclature.clone()))
        .collect();

    assert_eq!(analysis.records.len(), expected.len());
    for (magasin, nomenclature) in &expected {
        let count = analysis
            .records
            .iter()
            .filter(|r| &r.magasin == magasin && &r.nomenclature == nomenclature)
            .count();
        assert_eq!(count, 1, "({}, {}) 应恰好出现一次", magasin, nomenclature);
    }

    // (magasin, nomenclature) 升序
    let keys: Vec<(&str, &str)> = analysis
        .records
        .iter()
        .map(|r| (r.magasin.as_str(), r.nomenclature.as_str()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_sign_convention() {
    let records = long_records(MIXED_CSV);
    let analysis = DeficitEngine::default().compute_deficits(&records).unwrap();

    for r in &analysis.records {
        assert_eq!(r.deficit, r.quantite_stock - r.quantite_exploitation);
    }

    // NORTH-WH / ITEM002: 仅库存 4 → +4
    let r = analysis
        .records
        .iter()
        .find(|r| r.magasin == "NORTH-WH" && r.nomenclature == "ITEM002")
        .unwrap();
    assert_eq!(r.quantite_exploitation, 0.0);
    assert_eq!(r.deficit, 4.0);
}

#[test]
fn test_summary_consistency() {
    let records = long_records(MIXED_CSV);
    let analysis = DeficitEngine::default().compute_deficits(&records).unwrap();
    let s = &analysis.summary;

    assert!(s.surplus_count + s.shortfall_count <= s.total_rows);
    assert_eq!(s.total_deficits, s.surplus_count + s.shortfall_count);
    assert!(approx_eq(
        s.deficit_total,
        analysis.records.iter().map(|r| r.deficit).sum::<f64>()
    ));
}

#[test]
fn test_zero_deficit_rows_counted_in_totals_only() {
    let table = wide_table(
        &["NNO", "A-U", "A-C"],
        &[&["ITEM001", "4", "4"], &["ITEM002", "1", "3"]],
    );
    let records = Reshaper::new().reshape(&table).unwrap();
    let analysis = DeficitEngine::default().compute_deficits(&records).unwrap();
    let s = &analysis.summary;

    assert_eq!(s.total_rows, 2);
    assert_eq!(s.total_deficits, 1);
    // 均值与中位数包含 0 差异行
    assert_eq!(s.deficit_mean, 1.0);
    assert_eq!(s.deficit_median, 1.0);
    assert_eq!(analysis.non_zero().count(), 1);
}

#[test]
fn test_empty_input_is_analysis_error() {
    let result = DeficitEngine::default().compute_deficits(&[]);
    assert!(matches!(result, Err(EngineError::Analysis(_))));
}

#[test]
fn test_exploitation_only_input() {
    let table = wide_table(
        &["NNO", "A-U", "B-U"],
        &[&["ITEM001", "3", "1"], &["ITEM002", "", "2"]],
    );
    let records = Reshaper::new().reshape(&table).unwrap();
    let analysis = DeficitEngine::default().compute_deficits(&records).unwrap();

    assert_eq!(analysis.records.len(), 3);
    assert!(analysis.records.iter().all(|r| r.quantite_stock == 0.0));
    assert!(analysis.records.iter().all(|r| r.deficit < 0.0));
    assert_eq!(analysis.summary.shortfall_count, 3);
    assert_eq!(analysis.metadata.stock_entries, 0);
}

#[test]
fn test_duplicate_columns_summed_or_rejected() {
    let table = wide_table(&["NNO", "A-U", "A-U", "A-C"], &[&["ITEM001", "2", "3", "10"]]);
    let records = Reshaper::new().reshape(&table).unwrap();

    let analysis = DeficitEngine::new(DuplicatePolicy::Sum)
        .compute_deficits(&records)
        .unwrap();
    assert_eq!(analysis.records.len(), 1);
    assert_eq!(analysis.records[0].quantite_exploitation, 5.0);
    assert_eq!(analysis.records[0].deficit, 5.0);
    assert_eq!(analysis.metadata.duplicates_merged, 1);

    let err = DeficitEngine::new(DuplicatePolicy::Reject)
        .compute_deficits(&records)
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::DuplicateEntry {
            magasin: "A".to_string(),
            nomenclature: "ITEM001".to_string(),
            kind: DataKind::Exploitation,
        }
    );
}

#[test]
fn test_top_deficits_and_store_summary() {
    let table = wide_table(
        &["NNO", "A-U", "A-C", "B-U", "B-C"],
        &[
            &["ITEM001", "10", "2", "1", "4"],
            &["ITEM002", "", "6", "5", "5"],
        ],
    );
    let records = Reshaper::new().reshape(&table).unwrap();
    let engine = DeficitEngine::default();
    let analysis = engine.compute_deficits(&records).unwrap();

    // A/ITEM001 = -8, A/ITEM002 = +6, B/ITEM001 = +3, B/ITEM002 = 0
    let top = engine.top_deficits(&analysis, 2, false);
    assert_eq!(top[0].deficit, 6.0);
    assert_eq!(top[1].deficit, 3.0);

    let top_abs = engine.top_deficits(&analysis, 1, true);
    assert_eq!(top_abs[0].deficit, -8.0);

    let stores = engine.per_store_summary(&analysis);
    assert_eq!(stores.len(), 2);
    assert_eq!(stores[0].magasin, "B");
    assert_eq!(stores[0].deficit_total, 3.0);
    assert_eq!(stores[0].total_exploitation, 6.0);
    assert_eq!(stores[0].total_stock, 9.0);
    // 6 / (9 + 1)
    assert_eq!(stores[0].ratio_exp_stock, 0.6);
    assert_eq!(stores[1].magasin, "A");
    assert_eq!(stores[1].deficit_total, -2.0);
    assert_eq!(stores[1].deficit_moyen, -1.0);

    let items = engine.per_item_summary(&analysis);
    assert_eq!(items[0].nomenclature, "ITEM002");
    assert_eq!(items[0].deficit_total, 6.0);
    assert_eq!(items[1].nomenclature, "ITEM001");
    assert_eq!(items[1].nb_manques, 1);
    assert_eq!(items[1].nb_surplus, 1);
}

#[test]
fn test_store_summary_tie_on_rounded_zero() {
    // A: 1 - 1.004 = -0.004, 两位小数后与 B 同为 0
    let table = wide_table(
        &["NNO", "A-U", "A-C", "B-U", "B-C"],
        &[&["ITEM001", "1.004", "1", "1", "1"]],
    );
    let records = Reshaper::new().reshape(&table).unwrap();
    let engine = DeficitEngine::default();
    let analysis = engine.compute_deficits(&records).unwrap();

    let stores = engine.per_store_summary(&analysis);
    let order: Vec<(&str, f64)> = stores
        .iter()
        .map(|s| (s.magasin.as_str(), s.deficit_total))
        .collect();
    assert_eq!(order, vec![("A", 0.0), ("B", 0.0)]);
    assert!(stores[0].deficit_total.is_sign_positive());
    assert!(stores[0].deficit_moyen.is_sign_positive());

    let items = engine.per_item_summary(&analysis);
    assert!(items[0].deficit_total.is_sign_positive());
}
