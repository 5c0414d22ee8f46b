//! Telemetry gateway — entry point for field reports keyed by MAC.

use std::sync::Arc;

use feederhub_domain::device::{Device, Mac};
use feederhub_domain::error::{FeederError, NotFoundError};
use feederhub_domain::telemetry::Telemetry;

use super::device_service::DeviceService;
use crate::ports::{DeviceRepository, HistoryRepository};

/// Applies device reports to already registered devices.
///
/// A report for an unknown MAC never creates a device.
pub struct TelemetryGateway<R, H> {
    devices: Arc<DeviceService<R, H>>,
}

impl<R: DeviceRepository, H: HistoryRepository> TelemetryGateway<R, H> {
    pub fn new(devices: Arc<DeviceService<R, H>>) -> Self {
        Self { devices }
    }

    /// Merge `telemetry` into the device reporting as `mac`.
    ///
    /// # Errors
    ///
    /// - [`FeederError::Validation`] with "MAC required" if `mac` is blank.
    /// - [`FeederError::NotFound`] ("device not registered") for an unknown MAC.
    #[tracing::instrument(skip(self, telemetry))]
    pub async fn ingest(&self, mac: &str, telemetry: &Telemetry) -> Result<Device, FeederError> {
        let mac = Mac::parse(mac)?;
        match self.devices.apply_telemetry(&mac, telemetry).await {
            Err(FeederError::NotFound(_)) => {
                tracing::debug!(%mac, "telemetry for unregistered device");
                Err(NotFoundError::Unregistered(mac).into())
            }
            other => other,
        }
    }
}
