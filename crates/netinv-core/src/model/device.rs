// ── Device record and its fixed vocabularies ──

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::device_id::DeviceId;

/// What kind of node a record describes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum DeviceType {
    #[serde(rename = "PC")]
    #[strum(serialize = "PC")]
    Pc,
    Server,
    Router,
    Switch,
    Firewall,
    Printer,
}

impl DeviceType {
    /// Network tier is prompted as required-flavored for these types.
    pub fn expects_location(self) -> bool {
        matches!(self, Self::Router | Self::Switch)
    }

    /// Only these types conventionally host services.
    pub fn hosts_services(self) -> bool {
        matches!(self, Self::Server | Self::Router | Self::Firewall)
    }
}

/// Hierarchical network layer a device sits in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum NetworkTier {
    Core,
    Distribution,
    Access,
}

/// Canonical service tags a device may announce.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum Service {
    #[serde(rename = "DNS")]
    #[strum(serialize = "DNS")]
    Dns,
    #[serde(rename = "DHCP")]
    #[strum(serialize = "DHCP")]
    Dhcp,
    Web,
    Database,
    Mail,
    #[serde(rename = "VPN")]
    #[strum(serialize = "VPN")]
    Vpn,
}

/// One managed inventory record.
///
/// The serde attributes pin the persisted layout: uppercase keys, every
/// field present, and the literal `"N/A"` standing in for an unset IP or
/// location. The surrogate `id` is session-only; deserialization mints a
/// fresh one per record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    #[serde(skip, default)]
    pub id: DeviceId,

    #[serde(rename = "TYPE")]
    pub device_type: DeviceType,

    #[serde(rename = "NAME")]
    pub name: String,

    #[serde(rename = "IP", with = "na_field")]
    pub ip: Option<Ipv4Addr>,

    #[serde(rename = "LOCATION", with = "na_field")]
    pub location: Option<NetworkTier>,

    #[serde(rename = "SERVICES")]
    pub services: Vec<Service>,

    #[serde(rename = "VLANS")]
    pub vlans: Vec<u16>,
}

impl Device {
    /// Display form of the IP, using the unset sentinel.
    pub fn ip_display(&self) -> String {
        self.ip.map_or_else(|| UNSET.to_owned(), |ip| ip.to_string())
    }

    /// Display form of the location, using the unset sentinel.
    pub fn location_display(&self) -> String {
        self.location
            .map_or_else(|| UNSET.to_owned(), |tier| tier.to_string())
    }
}

/// The on-disk and on-screen marker for an absent optional value.
pub const UNSET: &str = "N/A";

// Serde adapter mapping `Option<T>` to either `T`'s display string or
// the literal "N/A". Shared by the IP and location fields.
mod na_field {
    use std::fmt;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: fmt::Display,
        S: Serializer,
    {
        match value {
            Some(inner) => serializer.collect_str(inner),
            None => serializer.serialize_str(super::UNSET),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: fmt::Display,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() || raw == super::UNSET {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Device {
        Device {
            id: DeviceId::new(),
            device_type: DeviceType::Router,
            name: "core-rtr-1".into(),
            ip: Some(Ipv4Addr::new(10, 0, 0, 1)),
            location: Some(NetworkTier::Core),
            services: vec![],
            vlans: vec![10, 20],
        }
    }

    #[test]
    fn serializes_with_fixed_keys_and_sentinels() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["TYPE"], "Router");
        assert_eq!(json["NAME"], "core-rtr-1");
        assert_eq!(json["IP"], "10.0.0.1");
        assert_eq!(json["LOCATION"], "Core");
        assert_eq!(json["SERVICES"], serde_json::json!([]));
        assert_eq!(json["VLANS"], serde_json::json!([10, 20]));
    }

    #[test]
    fn unset_fields_round_trip_through_na() {
        let mut device = sample();
        device.ip = None;
        device.location = None;

        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["IP"], "N/A");
        assert_eq!(json["LOCATION"], "N/A");

        let back: Device = serde_json::from_value(json).unwrap();
        assert_eq!(back.ip, None);
        assert_eq!(back.location, None);
    }

    #[test]
    fn service_tags_use_display_strings() {
        let json = serde_json::to_value([Service::Dns, Service::Web, Service::Vpn]).unwrap();
        assert_eq!(json, serde_json::json!(["DNS", "Web", "VPN"]));
    }

    #[test]
    fn loaded_records_get_fresh_ids() {
        let json = serde_json::to_string(&sample()).unwrap();
        let a: Device = serde_json::from_str(&json).unwrap();
        let b: Device = serde_json::from_str(&json).unwrap();
        assert_ne!(a.id, b.id);
    }
}
