//! 每日取餐号
//!
//! 格式 `YYYYMMDD-NNN`：日期键 + 当日从 1 开始的三位序号 (超过 999 自然变成四位)。
//! 计数器保存在 redb counters 表中，每个日期一个 key，只增不减。

use chrono::NaiveDate;

use crate::storage::{RecordStore, StorageResult};
use crate::utils::time::date_key;

const COUNTER_PREFIX: &str = "token_count:";

/// Issues sequential pickup tokens per calendar day
#[derive(Debug, Clone)]
pub struct DailyTokenGenerator {
    store: RecordStore,
}

impl DailyTokenGenerator {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Next token for `date`; the first token of a day ends in `-001`
    pub fn next_token(&self, date: NaiveDate) -> StorageResult<String> {
        let key = date_key(date);
        let seq = self.store.increment(&format!("{COUNTER_PREFIX}{key}"))?;
        Ok(format!("{key}-{seq:03}"))
    }

    /// Tokens issued so far on `date`
    pub fn issued(&self, date: NaiveDate) -> StorageResult<u64> {
        self.store
            .counter(&format!("{COUNTER_PREFIX}{}", date_key(date)))
    }
}
