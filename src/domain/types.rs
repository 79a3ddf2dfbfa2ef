// ==========================================
// 库存差异分析 - 领域类型定义
// ==========================================
// 列名规则: <magasin>-<U|C>
// U = 运营量 (exploitation), C = 库存量 (stock)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 数据类型 (Data Kind)
// ==========================================
// 序列化格式: 单字母代码 "U" / "C" (与源文件列后缀一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DataKind {
    #[serde(rename = "U")]
    Exploitation, // 运营量
    #[serde(rename = "C")]
    Stock, // 库存量
}

impl DataKind {
    /// 列后缀代码
    pub fn code(&self) -> char {
        match self {
            DataKind::Exploitation => 'U',
            DataKind::Stock => 'C',
        }
    }

    /// 从后缀代码解析（区分大小写）
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'U' => Some(DataKind::Exploitation),
            'C' => Some(DataKind::Stock),
            _ => None,
        }
    }

    /// 从列名解析 (magasin, kind)
    ///
    /// # 规则
    /// - 列名必须以字面量 "-U" 或 "-C" 结尾（区分大小写）
    /// - 后缀前至少保留一个字符作为仓库名
    /// - 仓库名中的其他连字符原样保留: "NORTH-WH-U" → ("NORTH-WH", U)
    ///
    /// # 返回
    /// - None: 列名不符合后缀规则
    pub fn from_column_name(column_name: &str) -> Option<(&str, Self)> {
        let mut chars = column_name.chars();
        let code = chars.next_back()?;
        if chars.next_back()? != '-' {
            return None;
        }
        let kind = Self::from_code(code)?;
        let store = &column_name[..column_name.len() - 2];
        if store.is_empty() {
            return None;
        }
        Some((store, kind))
    }

    /// 列名是否符合 "-U"/"-C" 后缀规则
    pub fn is_store_column(column_name: &str) -> bool {
        Self::from_column_name(column_name).is_some()
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// 差异方向 (Deficit Kind)
// ==========================================
// 符号约定: deficit = 库存量 - 运营量
// 正值 = 库存富余, 负值 = 库存短缺
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeficitKind {
    Surplus,   // 富余
    Shortfall, // 短缺
    Balanced,  // 持平
}

impl fmt::Display for DeficitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeficitKind::Surplus => write!(f, "SURPLUS"),
            DeficitKind::Shortfall => write!(f, "SHORTFALL"),
            DeficitKind::Balanced => write!(f, "BALANCED"),
        }
    }
}

// ==========================================
// 重复键策略 (Duplicate Policy)
// ==========================================
// 同一 (magasin, nomenclature, kind) 出现多次时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    #[default]
    Sum, // 合并前求和
    Reject, // 视为输入结构错误
}

impl DuplicatePolicy {
    /// 从字符串解析策略（不区分大小写）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sum" => Some(DuplicatePolicy::Sum),
            "reject" => Some(DuplicatePolicy::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Sum => write!(f, "sum"),
            DuplicatePolicy::Reject => write!(f, "reject"),
        }
    }
}

// ==========================================
// 运营/库存比例区间 (Exploitation Band)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExploitationBand {
    OverExploited,  // 超额运营 (ratio > 上限)
    UnderExploited, // 运营不足 (ratio < 下限)
    Balanced,       // 均衡
}
