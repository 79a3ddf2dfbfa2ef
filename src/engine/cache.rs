// ==========================================
// 库存差异分析 - 分析结果缓存
// ==========================================
// 职责: 按输入内容寻址的显式缓存, 由调用方持有
// 键: 输入的 JSON 序列化字节的 xxh3 64 位摘要
// 红线: 只发布计算完成的结果, 读者不会看到半写入条目
// ==========================================

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

/// 计算输入内容的缓存键
///
/// # 返回
/// - None: 输入无法序列化（此时调用方应直接计算, 不缓存）
pub fn content_key<T: Serialize + ?Sized>(input: &T) -> Option<u64> {
    match serde_json::to_vec(input) {
        Ok(bytes) => Some(xxh3_64(&bytes)),
        Err(e) => {
            warn!(error = %e, "缓存键计算失败, 跳过缓存");
            None
        }
    }
}

// ==========================================
// AnalysisCache - 内容寻址缓存
// ==========================================
pub struct AnalysisCache<V> {
    name: &'static str,
    entries: RwLock<HashMap<u64, Arc<V>>>,
}

impl<V> AnalysisCache<V> {
    /// 创建空缓存
    ///
    /// # 参数
    /// - name: 缓存名称（仅用于日志）
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// 读取缓存; 未命中时计算并写入
    ///
    /// # 说明
    /// - compute 失败时不写入缓存, 错误原样返回
    /// - 并发计算同一键时, 先写入者胜出, 后到者返回已存在的结果
    pub fn get_or_try_insert_with<T, E, F>(&self, input: &T, compute: F) -> Result<Arc<V>, E>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> Result<V, E>,
    {
        let key = content_key(input);

        if let Some(key) = key {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(hit) = entries.get(&key) {
                debug!(cache = self.name, key, "缓存命中");
                return Ok(Arc::clone(hit));
            }
        }

        let value = Arc::new(compute()?);

        match key {
            Some(key) => {
                let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
                let stored = entries.entry(key).or_insert(value);
                debug!(cache = self.name, key, "缓存写入");
                Ok(Arc::clone(stored))
            }
            None => Ok(value),
        }
    }

    /// 是否已缓存该输入
    pub fn contains<T: Serialize + ?Sized>(&self, input: &T) -> bool {
        match content_key(input) {
            Some(key) => self
                .entries
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .contains_key(&key),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 清空缓存
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        debug!(cache = self.name, "缓存已清空");
    }
}
