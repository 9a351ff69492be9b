//! Field validators.
//!
//! Pure syntax/range checks, one per field family. Uniqueness rules need
//! the whole collection and therefore live with the record operations
//! ([`crate::ops`]), not here.

use std::net::Ipv4Addr;

use crate::error::ValidationError;
use crate::model::Service;

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 50;
pub const VLAN_MIN: u16 = 1;
pub const VLAN_MAX: u16 = 4094;

/// Check a device name for charset and trimmed length.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let allowed =
        |c: char| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '.' | '_');
    if !name.chars().all(allowed) {
        return Err(ValidationError::InvalidFormat);
    }
    let len = name.trim().chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(ValidationError::InvalidLength { len });
    }
    Ok(())
}

/// Parse an IP entry. Empty input is the deliberate escape hatch for an
/// optional IP and maps to the unset sentinel (`None`).
///
/// Beyond dotted-quad syntax, rejects addresses that can never be an
/// assignable unicast host: 0.x ("this network"), 127.x (loopback),
/// 224-239.x (multicast), 240+.x (reserved), and the limited broadcast
/// address.
pub fn validate_ip(raw: &str) -> Result<Option<Ipv4Addr>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let groups: Vec<&str> = raw.split('.').collect();
    if groups.len() != 4 || groups.iter().any(|g| g.is_empty()) {
        return Err(ValidationError::MalformedIp { input: raw.into() });
    }

    let mut octets = [0u8; 4];
    for (slot, group) in octets.iter_mut().zip(&groups) {
        *slot = group
            .parse::<u8>()
            .map_err(|_| ValidationError::InvalidOctet {
                octet: (*group).to_owned(),
            })?;
    }

    match octets[0] {
        0 => return Err(ValidationError::ZeroNetwork),
        127 => return Err(ValidationError::Loopback),
        224..=239 => return Err(ValidationError::Multicast),
        240..=255 => {
            if octets == [255, 255, 255, 255] {
                return Err(ValidationError::LimitedBroadcast);
            }
            return Err(ValidationError::ReservedRange);
        }
        _ => {}
    }

    Ok(Some(Ipv4Addr::from(octets)))
}

/// Resolve a raw tag against the canonical service vocabulary.
pub fn parse_service(raw: &str) -> Result<Service, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::UnknownService(raw.trim().to_owned()))
}

/// Reject any tag outside the canonical vocabulary.
pub fn validate_services<S: AsRef<str>>(tags: &[S]) -> Result<Vec<Service>, ValidationError> {
    tags.iter().map(|tag| parse_service(tag.as_ref())).collect()
}

/// Outcome of parsing a comma-separated VLAN entry.
///
/// Duplicate tokens are dropped rather than rejected; they come back in
/// `duplicates` so the caller can warn without failing the input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VlanInput {
    /// Accepted VLAN ids, sorted ascending, deduplicated.
    pub vlans: Vec<u16>,
    /// Tokens that appeared more than once in the same entry.
    pub duplicates: Vec<u16>,
}

/// Parse a comma-separated VLAN list. Blank input yields the empty set.
pub fn validate_vlans(raw: &str) -> Result<VlanInput, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(VlanInput::default());
    }

    let mut input = VlanInput::default();
    for token in raw.split(',') {
        let token = token.trim();
        let vlan: u32 = token
            .parse()
            .map_err(|_| ValidationError::VlanNotNumeric {
                token: token.to_owned(),
            })?;
        if !(u32::from(VLAN_MIN)..=u32::from(VLAN_MAX)).contains(&vlan) {
            return Err(ValidationError::VlanOutOfRange { vlan });
        }
        let vlan = u16::try_from(vlan).map_err(|_| ValidationError::VlanOutOfRange { vlan })?;
        if input.vlans.contains(&vlan) {
            if !input.duplicates.contains(&vlan) {
                input.duplicates.push(vlan);
            }
        } else {
            input.vlans.push(vlan);
        }
    }
    input.vlans.sort_unstable();
    Ok(input)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepts_reasonable_names() {
        assert!(validate_name("core-rtr-1").is_ok());
        assert!(validate_name("Branch Office PC_3").is_ok());
        assert!(validate_name("a.b").is_ok());
    }

    #[test]
    fn rejects_bad_name_charset() {
        assert_eq!(
            validate_name("rtr#1"),
            Err(ValidationError::InvalidFormat)
        );
        assert_eq!(
            validate_name("señal"),
            Err(ValidationError::InvalidFormat)
        );
    }

    #[test]
    fn rejects_bad_name_length() {
        assert_eq!(
            validate_name("ab"),
            Err(ValidationError::InvalidLength { len: 2 })
        );
        let long = "x".repeat(51);
        assert_eq!(
            validate_name(&long),
            Err(ValidationError::InvalidLength { len: 51 })
        );
        // Padding does not rescue a too-short name.
        assert_eq!(
            validate_name("  a  "),
            Err(ValidationError::InvalidLength { len: 1 })
        );
    }

    #[test]
    fn empty_ip_means_unset() {
        assert_eq!(validate_ip(""), Ok(None));
        assert_eq!(validate_ip("   "), Ok(None));
    }

    #[test]
    fn accepts_assignable_unicast() {
        assert_eq!(
            validate_ip("192.168.1.10"),
            Ok(Some(Ipv4Addr::new(192, 168, 1, 10)))
        );
        assert_eq!(validate_ip("10.0.0.1"), Ok(Some(Ipv4Addr::new(10, 0, 0, 1))));
        assert_eq!(
            validate_ip("223.255.255.254"),
            Ok(Some(Ipv4Addr::new(223, 255, 255, 254)))
        );
    }

    #[test]
    fn rejects_malformed_quads() {
        assert_eq!(
            validate_ip("10.0.0"),
            Err(ValidationError::MalformedIp { input: "10.0.0".into() })
        );
        assert_eq!(
            validate_ip("10.0.0.0.1"),
            Err(ValidationError::MalformedIp { input: "10.0.0.0.1".into() })
        );
        assert_eq!(
            validate_ip("10..0.1"),
            Err(ValidationError::MalformedIp { input: "10..0.1".into() })
        );
        assert_eq!(
            validate_ip("10.0.0.abc"),
            Err(ValidationError::InvalidOctet { octet: "abc".into() })
        );
        assert_eq!(
            validate_ip("10.0.0.256"),
            Err(ValidationError::InvalidOctet { octet: "256".into() })
        );
    }

    #[test]
    fn rejects_non_assignable_ranges() {
        assert_eq!(validate_ip("0.1.2.3"), Err(ValidationError::ZeroNetwork));
        assert_eq!(validate_ip("127.0.0.1"), Err(ValidationError::Loopback));
        assert_eq!(validate_ip("224.0.0.1"), Err(ValidationError::Multicast));
        assert_eq!(validate_ip("230.1.1.1"), Err(ValidationError::Multicast));
        assert_eq!(validate_ip("239.255.255.255"), Err(ValidationError::Multicast));
        assert_eq!(validate_ip("240.0.0.1"), Err(ValidationError::ReservedRange));
        assert_eq!(
            validate_ip("255.255.255.255"),
            Err(ValidationError::LimitedBroadcast)
        );
    }

    #[test]
    fn parses_known_services() {
        assert_eq!(parse_service("DNS").unwrap(), Service::Dns);
        assert_eq!(parse_service("Web").unwrap(), Service::Web);
        assert_eq!(
            validate_services(&["DHCP", "Mail"]).unwrap(),
            vec![Service::Dhcp, Service::Mail]
        );
    }

    #[test]
    fn rejects_unknown_service() {
        assert_eq!(
            parse_service("FTP"),
            Err(ValidationError::UnknownService("FTP".into()))
        );
    }

    #[test]
    fn blank_vlan_input_is_empty() {
        assert_eq!(validate_vlans("").unwrap(), VlanInput::default());
        assert_eq!(validate_vlans("   ").unwrap(), VlanInput::default());
    }

    #[test]
    fn vlans_come_back_sorted_and_deduplicated() {
        let parsed = validate_vlans("10,20,20,30").unwrap();
        assert_eq!(parsed.vlans, vec![10, 20, 30]);
        assert_eq!(parsed.duplicates, vec![20]);

        let parsed = validate_vlans("30, 10, 20").unwrap();
        assert_eq!(parsed.vlans, vec![10, 20, 30]);
        assert!(parsed.duplicates.is_empty());
    }

    #[test]
    fn vlan_range_bounds() {
        assert_eq!(validate_vlans("1,4094").unwrap().vlans, vec![1, 4094]);
        assert_eq!(
            validate_vlans("0"),
            Err(ValidationError::VlanOutOfRange { vlan: 0 })
        );
        assert_eq!(
            validate_vlans("4095"),
            Err(ValidationError::VlanOutOfRange { vlan: 4095 })
        );
        assert_eq!(
            validate_vlans("10,abc"),
            Err(ValidationError::VlanNotNumeric { token: "abc".into() })
        );
    }
}
