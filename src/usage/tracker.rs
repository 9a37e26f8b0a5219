use super::types::{UsageRecord, month_key};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the local usage record lives.
pub trait UsageStore: Send {
    fn load(&self) -> Result<Option<UsageRecord>>;
    fn save(&mut self, record: &UsageRecord) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryUsageStore {
    record: Option<UsageRecord>,
}

impl MemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: UsageRecord) -> Self {
        Self {
            record: Some(record),
        }
    }
}

impl UsageStore for MemoryUsageStore {
    fn load(&self) -> Result<Option<UsageRecord>> {
        Ok(self.record.clone())
    }

    fn save(&mut self, record: &UsageRecord) -> Result<()> {
        self.record = Some(record.clone());
        Ok(())
    }
}

/// `usage.json` in the data directory.
#[derive(Debug)]
pub struct JsonFileUsageStore {
    path: PathBuf,
}

impl JsonFileUsageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UsageStore for JsonFileUsageStore {
    fn load(&self) -> Result<Option<UsageRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let record = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(Some(record))
    }

    fn save(&mut self, record: &UsageRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create usage directory")?;
        }
        let json = serde_json::to_string(record).context("Failed to serialize usage record")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

/// Local monthly call counter.
pub struct UsageCounter {
    store: Box<dyn UsageStore>,
}

impl UsageCounter {
    pub fn new(store: Box<dyn UsageStore>) -> Self {
        Self { store }
    }

    /// The stored record, rolled over to an empty one when it belongs to
    /// another month or cannot be read.
    pub fn current_at(&self, now: DateTime<Utc>) -> UsageRecord {
        let month = month_key(now);
        match self.store.load() {
            Ok(Some(record)) if record.month == month => record,
            Ok(_) => UsageRecord::empty(month),
            Err(e) => {
                tracing::warn!("Usage record unreadable, starting fresh: {e:#}");
                UsageRecord::empty(month)
            }
        }
    }

    pub fn current(&self) -> UsageRecord {
        self.current_at(Utc::now())
    }

    pub fn increment_at(&mut self, n: u64, now: DateTime<Utc>) -> Result<UsageRecord> {
        let mut record = self.current_at(now);
        record.count = record.count.saturating_add(n);
        self.store.save(&record)?;
        Ok(record)
    }

    pub fn increment(&mut self, n: u64) -> Result<UsageRecord> {
        self.increment_at(n, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn feb_2024() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 3, 10, 0, 0).unwrap()
    }

    #[test]
    fn month_rollover_resets_before_adding() {
        let store = MemoryUsageStore::with_record(UsageRecord {
            month: "2024-01".into(),
            count: 7,
        });
        let mut counter = UsageCounter::new(Box::new(store));

        let record = counter.increment_at(1, feb_2024()).unwrap();

        assert_eq!(
            record,
            UsageRecord {
                month: "2024-02".into(),
                count: 1
            }
        );
        assert_eq!(counter.current_at(feb_2024()), record);
    }

    #[test]
    fn same_month_accumulates() {
        let mut counter = UsageCounter::new(Box::new(MemoryUsageStore::new()));
        counter.increment_at(1, feb_2024()).unwrap();
        let record = counter.increment_at(3, feb_2024()).unwrap();
        assert_eq!(record.count, 4);
    }

    #[test]
    fn corrupt_file_starts_fresh_and_is_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("usage.json");
        fs::write(&path, "not json").unwrap();
        let mut counter = UsageCounter::new(Box::new(JsonFileUsageStore::new(&path)));

        assert_eq!(counter.current_at(feb_2024()).count, 0);
        counter.increment_at(1, feb_2024()).unwrap();

        let reloaded = JsonFileUsageStore::new(&path).load().unwrap();
        assert_eq!(reloaded, Some(UsageRecord {
            month: "2024-02".into(),
            count: 1
        }));
    }
}
