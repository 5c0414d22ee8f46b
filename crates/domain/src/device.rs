//! Device — a networked feeder identified by its hardware MAC address.
//!
//! Field names on the wire follow the device firmware and mobile app
//! (`estado_agua`, `bomba`, `horarios`, …); the Rust names describe what the
//! field measures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::id::{DeviceId, ProductId, UserId};
use crate::schedule::Schedule;
use crate::telemetry::Telemetry;
use crate::time::Timestamp;

/// A raw value outside an enumerated set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant {0:?}")]
pub struct UnknownVariant(pub String);

/// Fill level of a container or dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "LLENO")]
    Full,
    #[serde(rename = "MEDIO")]
    Medium,
    #[serde(rename = "VACIO")]
    Empty,
}

impl Level {
    /// Accepted wire values, for error messages.
    pub const ALLOWED: &'static str = "LLENO, MEDIO, VACIO";

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "LLENO",
            Self::Medium => "MEDIO",
            Self::Empty => "VACIO",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LLENO" => Ok(Self::Full),
            "MEDIO" => Ok(Self::Medium),
            "VACIO" => Ok(Self::Empty),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Pump or servo actuator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    /// Accepted wire values, for error messages.
    pub const ALLOWED: &'static str = "ON, OFF";

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Switch {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ON" => Ok(Self::On),
            "OFF" => Ok(Self::Off),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Hardware MAC address, the external key of a device.
///
/// Kept verbatim apart from surrounding whitespace; the only structural rule
/// is that it is not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Mac(String);

impl Mac {
    /// # Errors
    ///
    /// Returns [`ValidationError::MacRequired`] when `raw` is blank.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::MacRequired);
        }
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Mac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Mac {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Mac> for String {
    fn from(mac: Mac) -> Self {
        mac.0
    }
}

/// The six sensor/actuator readings shared by a device and its snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    #[serde(rename = "estado_agua")]
    pub water_container: Level,
    #[serde(rename = "estado_comida")]
    pub food_container: Level,
    #[serde(rename = "traste_agua")]
    pub water_dish: Level,
    #[serde(rename = "traste_comida")]
    pub food_dish: Level,
    #[serde(rename = "bomba")]
    pub pump: Switch,
    pub servo: Switch,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            water_container: Level::Full,
            food_container: Level::Full,
            water_dish: Level::Full,
            food_dish: Level::Full,
            pump: Switch::Off,
            servo: Switch::Off,
        }
    }
}

/// A registered feeder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub mac: Mac,
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub state: DeviceState,
    #[serde(rename = "horarios")]
    pub schedule: Schedule,
    #[serde(rename = "id_usuario")]
    pub owner_id: UserId,
    #[serde(rename = "id_producto")]
    pub product_id: ProductId,
    #[serde(rename = "fecha")]
    pub created_at: Timestamp,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Merge a telemetry report; fields absent from the report are untouched.
    pub fn apply_telemetry(&mut self, telemetry: &Telemetry) {
        telemetry.apply_to(&mut self.state);
    }

    /// Bind the device to a new owner, replacing the previous one.
    pub fn reassign(&mut self, owner_id: UserId) {
        self.owner_id = owner_id;
    }
}

/// Step-by-step builder for [`Device`].
///
/// State defaults to full containers with both actuators off; the schedule
/// defaults to both slots at the creation time.
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    mac: Option<String>,
    name: Option<String>,
    state: DeviceState,
    schedule: Option<Schedule>,
    owner_id: Option<UserId>,
    product_id: Option<ProductId>,
    created_at: Option<Timestamp>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = Some(mac.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn state(mut self, state: DeviceState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    #[must_use]
    pub fn owner_id(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    #[must_use]
    pub fn product_id(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Consume the builder and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MacRequired`] if `mac` is missing or blank.
    pub fn build(self) -> Result<Device, ValidationError> {
        let mac = Mac::parse(self.mac.as_deref().unwrap_or_default())?;
        let created_at = self.created_at.unwrap_or_else(crate::time::now);
        Ok(Device {
            id: self.id.unwrap_or_default(),
            mac,
            name: self.name,
            state: self.state,
            schedule: self
                .schedule
                .unwrap_or_else(|| Schedule::new(created_at, created_at)),
            owner_id: self.owner_id.unwrap_or_default(),
            product_id: self.product_id.unwrap_or_default(),
            created_at,
        })
    }
}

/// Unvalidated registration request, exactly as received from a client.
///
/// Every field is optional here so that [`Registration::into_device`] can
/// report all violations at once instead of stopping at the first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(rename = "estado_agua")]
    pub water_container: Option<String>,
    #[serde(rename = "estado_comida")]
    pub food_container: Option<String>,
    #[serde(rename = "traste_agua")]
    pub water_dish: Option<String>,
    #[serde(rename = "traste_comida")]
    pub food_dish: Option<String>,
    #[serde(rename = "bomba")]
    pub pump: Option<String>,
    pub servo: Option<String>,
    #[serde(rename = "id_usuario")]
    pub owner_id: Option<String>,
    pub mac: Option<String>,
    #[serde(rename = "horarios")]
    pub schedule: Option<Value>,
    #[serde(rename = "id_producto")]
    pub product_id: Option<String>,
    #[serde(rename = "nombre")]
    pub name: Option<String>,
}

impl Registration {
    /// Validate every field and build the device to persist.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every violated field.
    pub fn into_device(self, created_at: Timestamp) -> Result<Device, ValidationError> {
        let water_container = enumerated::<Level>("estado_agua", self.water_container);
        let food_container = enumerated::<Level>("estado_comida", self.food_container);
        let water_dish = enumerated::<Level>("traste_agua", self.water_dish);
        let food_dish = enumerated::<Level>("traste_comida", self.food_dish);
        let pump = enumerated::<Switch>("bomba", self.pump);
        let servo = enumerated::<Switch>("servo", self.servo);
        let mac = Mac::parse(self.mac.as_deref().unwrap_or_default())
            .map_err(|_| ValidationError::MissingField { field: "mac" });
        let owner_id =
            UserId::parse_field(self.owner_id.as_deref().unwrap_or_default(), "id_usuario");
        let product_id =
            ProductId::parse_field(self.product_id.as_deref().unwrap_or_default(), "id_producto");
        let schedule = self
            .schedule
            .as_ref()
            .map_or(Err(ValidationError::InvalidSchedule), Schedule::parse);

        ValidationError::check(
            [
                water_container.as_ref().err(),
                food_container.as_ref().err(),
                water_dish.as_ref().err(),
                food_dish.as_ref().err(),
                pump.as_ref().err(),
                servo.as_ref().err(),
                mac.as_ref().err(),
                owner_id.as_ref().err(),
                product_id.as_ref().err(),
                schedule.as_ref().err(),
            ]
            .into_iter()
            .flatten()
            .cloned()
            .collect(),
        )?;

        Ok(Device {
            id: DeviceId::new(),
            mac: mac?,
            name: self.name.filter(|name| !name.trim().is_empty()),
            state: DeviceState {
                water_container: water_container?,
                food_container: food_container?,
                water_dish: water_dish?,
                food_dish: food_dish?,
                pump: pump?,
                servo: servo?,
            },
            schedule: schedule?,
            owner_id: owner_id?,
            product_id: product_id?,
            created_at,
        })
    }
}

/// Enumerated fields parsed from their wire value.
trait Enumerated: FromStr<Err = UnknownVariant> {
    const ALLOWED: &'static str;
}

impl Enumerated for Level {
    const ALLOWED: &'static str = Level::ALLOWED;
}

impl Enumerated for Switch {
    const ALLOWED: &'static str = Switch::ALLOWED;
}

fn enumerated<T: Enumerated>(
    field: &'static str,
    raw: Option<String>,
) -> Result<T, ValidationError> {
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return Err(ValidationError::MissingField { field });
    };
    raw.parse::<T>().map_err(|UnknownVariant(value)| ValidationError::NotAllowed {
        field,
        allowed: T::ALLOWED,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_registration() -> Registration {
        Registration {
            water_container: Some("LLENO".to_string()),
            food_container: Some("LLENO".to_string()),
            water_dish: Some("LLENO".to_string()),
            food_dish: Some("LLENO".to_string()),
            pump: Some("ON".to_string()),
            servo: Some("OFF".to_string()),
            owner_id: Some(UserId::new().to_string()),
            mac: Some("AA:BB:CC".to_string()),
            schedule: Some(json!(["2024-01-01T08:00:00Z", "2024-01-01T18:00:00Z"])),
            product_id: Some(ProductId::new().to_string()),
            name: None,
        }
    }

    #[test]
    fn should_build_device_from_valid_registration() {
        let created_at = crate::time::now();
        let device = valid_registration().into_device(created_at).unwrap();

        assert_eq!(device.mac.as_str(), "AA:BB:CC");
        assert_eq!(device.state.pump, Switch::On);
        assert_eq!(device.state.servo, Switch::Off);
        assert_eq!(device.state.food_dish, Level::Full);
        assert_eq!(device.created_at, created_at);
        assert!(device.name.is_none());
    }

    #[test]
    fn should_report_every_violated_field() {
        let registration = Registration {
            pump: Some("MAYBE".to_string()),
            food_dish: Some("HALF".to_string()),
            mac: None,
            schedule: Some(json!(["2024-01-01T08:00:00Z"])),
            ..valid_registration()
        };

        let err = registration.into_device(crate::time::now()).unwrap_err();
        let violations = err.violations();

        assert_eq!(violations.len(), 4);
        assert!(violations.contains(&&ValidationError::NotAllowed {
            field: "bomba",
            allowed: Switch::ALLOWED,
            value: "MAYBE".to_string(),
        }));
        assert!(violations.contains(&&ValidationError::NotAllowed {
            field: "traste_comida",
            allowed: Level::ALLOWED,
            value: "HALF".to_string(),
        }));
        assert!(violations.contains(&&ValidationError::MissingField { field: "mac" }));
        assert!(violations.contains(&&ValidationError::InvalidSchedule));
    }

    #[test]
    fn should_reject_missing_schedule() {
        let registration = Registration {
            schedule: None,
            ..valid_registration()
        };
        assert_eq!(
            registration.into_device(crate::time::now()),
            Err(ValidationError::InvalidSchedule)
        );
    }

    #[test]
    fn should_reject_blank_enumerated_field_as_missing() {
        let registration = Registration {
            servo: Some("  ".to_string()),
            ..valid_registration()
        };
        assert_eq!(
            registration.into_device(crate::time::now()),
            Err(ValidationError::MissingField { field: "servo" })
        );
    }

    #[test]
    fn should_reject_lowercase_level() {
        let registration = Registration {
            water_container: Some("lleno".to_string()),
            ..valid_registration()
        };
        assert!(matches!(
            registration.into_device(crate::time::now()),
            Err(ValidationError::NotAllowed {
                field: "estado_agua",
                ..
            })
        ));
    }

    #[test]
    fn should_reject_malformed_owner_reference() {
        let registration = Registration {
            owner_id: Some("someone".to_string()),
            ..valid_registration()
        };
        assert_eq!(
            registration.into_device(crate::time::now()),
            Err(ValidationError::InvalidIdentifier {
                field: "id_usuario"
            })
        );
    }

    #[test]
    fn should_keep_display_name_when_provided() {
        let registration = Registration {
            name: Some("Kitchen feeder".to_string()),
            ..valid_registration()
        };
        let device = registration.into_device(crate::time::now()).unwrap();
        assert_eq!(device.name.as_deref(), Some("Kitchen feeder"));
    }

    #[test]
    fn should_deserialize_registration_from_wire_names() {
        let registration: Registration = serde_json::from_value(json!({
            "estado_agua": "LLENO",
            "estado_comida": "MEDIO",
            "traste_agua": "VACIO",
            "traste_comida": "LLENO",
            "bomba": "ON",
            "servo": "OFF",
            "id_usuario": UserId::new().to_string(),
            "mac": "AA:BB:CC",
            "horarios": ["2024-01-01T08:00:00Z", "2024-01-01T18:00:00Z"],
            "id_producto": ProductId::new().to_string()
        }))
        .unwrap();

        let device = registration.into_device(crate::time::now()).unwrap();
        assert_eq!(device.state.food_container, Level::Medium);
        assert_eq!(device.state.water_dish, Level::Empty);
    }

    #[test]
    fn should_serialize_device_with_wire_names() {
        let device = Device::builder().mac("AA:BB:CC").build().unwrap();
        let value = serde_json::to_value(&device).unwrap();

        assert_eq!(value["mac"], "AA:BB:CC");
        assert_eq!(value["estado_agua"], "LLENO");
        assert_eq!(value["bomba"], "OFF");
        assert_eq!(value["horarios"].as_array().map(Vec::len), Some(2));
        assert!(value.get("nombre").is_none());

        let parsed: Device = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, device);
    }

    #[test]
    fn should_reject_blank_mac_in_builder() {
        assert_eq!(
            Device::builder().mac("  ").build(),
            Err(ValidationError::MacRequired)
        );
    }

    #[test]
    fn should_replace_owner_on_reassign() {
        let mut device = Device::builder().mac("AA:BB:CC").build().unwrap();
        let owner = UserId::new();
        device.reassign(owner);
        assert_eq!(device.owner_id, owner);
    }

    #[test]
    fn should_parse_and_display_enumerations() {
        assert_eq!("MEDIO".parse::<Level>(), Ok(Level::Medium));
        assert_eq!("ON".parse::<Switch>(), Ok(Switch::On));
        assert_eq!(Level::Empty.to_string(), "VACIO");
        assert_eq!(
            "on".parse::<Switch>(),
            Err(UnknownVariant("on".to_string()))
        );
    }
}
