// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供临时 CSV 文件、内存宽表等测试数据
// ==========================================

#![allow(dead_code)]

use material_deficit::domain::{CellValue, WideTable};
use std::io::Write;
use tempfile::NamedTempFile;

/// 参考样例: 单仓库 A, 三个物料
///
/// 期望差异: ITEM001 = -2, ITEM002 = +5, ITEM003 = -3
pub const REFERENCE_CSV: &str = "\
NNO,A-U,A-C
ITEM001,10,8
ITEM002,5,10
ITEM003,15,12
";

/// 多仓库样例（含空值、非数值、非正数、无后缀列、带连字符仓库名）
pub const MIXED_CSV: &str = "\
NNO,NORTH-WH-U,NORTH-WH-C,SOUTH-U,SOUTH-C,PARIS,SOUTH-X
ITEM001,10,8,,3,7,99
ITEM002,abc,4,0,-2,7,99
ITEM003,6,,2.5,1,7,99
";

/// 写入带 .csv 后缀的临时文件
///
/// # 返回
/// - NamedTempFile: 临时文件（需要保持存活）
pub fn write_csv(content: &str) -> NamedTempFile {
    write_bytes(content.as_bytes(), ".csv")
}

/// 写入任意字节与后缀的临时文件
pub fn write_bytes(content: &[u8], suffix: &str) -> NamedTempFile {
    let mut temp_file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("创建临时文件失败");
    temp_file.write_all(content).expect("写入临时文件失败");
    temp_file.flush().expect("刷新临时文件失败");
    temp_file
}

/// 构造内存宽表（单元格按文本解析, 空串为空值）
pub fn wide_table(columns: &[&str], rows: &[&[&str]]) -> WideTable {
    WideTable::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|v| CellValue::from_text(v)).collect())
            .collect(),
    )
}

/// 近似相等
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
