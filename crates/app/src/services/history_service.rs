//! History service — the append-only ledger of device snapshots.

use feederhub_domain::device::{Device, Mac};
use feederhub_domain::error::{FeederError, NotFoundError};
use feederhub_domain::history::HistoryEntry;

use crate::ports::HistoryRepository;

/// Application service over the snapshot ledger.
pub struct HistoryService<H> {
    repo: H,
}

impl<H: HistoryRepository> HistoryService<H> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: H) -> Self {
        Self { repo }
    }

    /// Append a snapshot as-is.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, entry), fields(mac = %entry.mac))]
    pub async fn append(&self, entry: HistoryEntry) -> Result<HistoryEntry, FeederError> {
        self.repo.append(entry).await
    }

    /// Snapshot the current state of `device` and append it.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn record(&self, device: &Device) -> Result<HistoryEntry, FeederError> {
        self.append(HistoryEntry::snapshot(device)).await
    }

    /// Every snapshot recorded for `mac`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`FeederError::NotFound`] when nothing was ever recorded for
    /// `mac`, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn history_for_mac(&self, mac: &Mac) -> Result<Vec<HistoryEntry>, FeederError> {
        let entries = self.repo.find_by_mac(mac).await?;
        if entries.is_empty() {
            return Err(NotFoundError::History(mac.clone()).into());
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryHistoryRepo;
    use chrono::Duration;
    use feederhub_domain::time::now;

    fn device(mac: &str) -> Device {
        Device::builder().mac(mac).build().unwrap()
    }

    #[tokio::test]
    async fn should_return_entries_newest_first() {
        let svc = HistoryService::new(InMemoryHistoryRepo::default());
        let device = device("AA:BB:CC");
        let base = now();

        let middle = svc
            .append(HistoryEntry::snapshot_at(&device, base))
            .await
            .unwrap();
        let oldest = svc
            .append(HistoryEntry::snapshot_at(&device, base - Duration::hours(1)))
            .await
            .unwrap();
        let newest = svc
            .append(HistoryEntry::snapshot_at(&device, base + Duration::hours(1)))
            .await
            .unwrap();

        let entries = svc.history_for_mac(&device.mac).await.unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);
    }

    #[tokio::test]
    async fn should_return_n_entries_in_reverse_insertion_order() {
        let svc = HistoryService::new(InMemoryHistoryRepo::default());
        let device = device("AA:BB:CC");
        let base = now();

        let mut inserted = Vec::new();
        for minutes in 0..5 {
            let entry = HistoryEntry::snapshot_at(&device, base + Duration::minutes(minutes));
            inserted.push(svc.append(entry).await.unwrap().id);
        }

        let entries = svc.history_for_mac(&device.mac).await.unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        inserted.reverse();
        assert_eq!(ids, inserted);
    }

    #[tokio::test]
    async fn should_break_timestamp_ties_by_later_insertion_first() {
        let svc = HistoryService::new(InMemoryHistoryRepo::default());
        let device = device("AA:BB:CC");
        let at = now();

        let first = svc
            .append(HistoryEntry::snapshot_at(&device, at))
            .await
            .unwrap();
        let second = svc
            .append(HistoryEntry::snapshot_at(&device, at))
            .await
            .unwrap();

        let entries = svc.history_for_mac(&device.mac).await.unwrap();
        assert_eq!(entries[0].id, second.id);
        assert_eq!(entries[1].id, first.id);
    }

    #[tokio::test]
    async fn should_only_return_entries_for_requested_mac() {
        let svc = HistoryService::new(InMemoryHistoryRepo::default());
        let a = device("AA:AA:AA");
        let b = device("BB:BB:BB");
        svc.record(&a).await.unwrap();
        svc.record(&b).await.unwrap();
        svc.record(&b).await.unwrap();

        assert_eq!(svc.history_for_mac(&a.mac).await.unwrap().len(), 1);
        assert_eq!(svc.history_for_mac(&b.mac).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn should_return_not_found_when_no_history() {
        let svc = HistoryService::new(InMemoryHistoryRepo::default());
        let mac = Mac::parse("00:11:22").unwrap();

        let result = svc.history_for_mac(&mac).await;
        assert!(matches!(
            result,
            Err(FeederError::NotFound(NotFoundError::History(_)))
        ));
    }

    #[tokio::test]
    async fn should_propagate_storage_failure_on_append() {
        let svc = HistoryService::new(InMemoryHistoryRepo::failing());
        let result = svc.record(&device("AA:BB:CC")).await;
        assert!(matches!(result, Err(FeederError::Storage(_))));
    }
}
