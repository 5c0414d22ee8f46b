//! Device history — immutable snapshots of a device's state over time.

use serde::{Deserialize, Serialize};

use crate::device::{Device, DeviceState, Mac};
use crate::id::{DeviceId, HistoryEntryId};
use crate::schedule::Schedule;
use crate::time::Timestamp;

/// A point-in-time copy of a device's readings and schedule.
///
/// The owner is deliberately not part of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    #[serde(rename = "id_dispositivo")]
    pub device_id: DeviceId,
    pub mac: Mac,
    #[serde(flatten)]
    pub state: DeviceState,
    #[serde(rename = "horarios")]
    pub schedule: Schedule,
    #[serde(rename = "fecha")]
    pub recorded_at: Timestamp,
}

impl HistoryEntry {
    /// Snapshot `device` as of now.
    #[must_use]
    pub fn snapshot(device: &Device) -> Self {
        Self::snapshot_at(device, crate::time::now())
    }

    /// Snapshot `device` with an explicit time, e.g. when replaying.
    #[must_use]
    pub fn snapshot_at(device: &Device, recorded_at: Timestamp) -> Self {
        Self {
            id: HistoryEntryId::new(),
            device_id: device.id,
            mac: device.mac.clone(),
            state: device.state,
            schedule: device.schedule,
            recorded_at,
        }
    }
}
