//! Common types used throughout deauther-rs

use std::fmt;
use std::str::FromStr;

/// 48-bit IEEE 802 address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// `ff:ff:ff:ff:ff:ff`, addresses every station
    pub const fn broadcast() -> Self {
        Self([0xff; 6])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn is_broadcast(&self) -> bool {
        self.0 == [0xff; 6]
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, octet) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02x}", octet)?;
        }
        Ok(())
    }
}

/// Accepts `aa:bb:cc:dd:ee:ff` or `aa-bb-cc-dd-ee-ff`, any case
impl FromStr for MacAddr {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || crate::Error::protocol(format!("Invalid MAC address '{}'", s));

        let mut octets = [0u8; 6];
        let mut parts = s.trim().split([':', '-']);
        for octet in octets.iter_mut() {
            let part = parts.next().filter(|p| p.len() == 2).ok_or_else(bad)?;
            *octet = u8::from_str_radix(part, 16).map_err(|_| bad())?;
        }
        if parts.next().is_some() {
            return Err(bad());
        }

        Ok(MacAddr(octets))
    }
}

/// Protocol identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolId(pub u8);

impl ProtocolId {
    pub const DOT11: Self = Self(0);
}

/// 2.4 GHz channel limits
pub mod channels {
    pub const MIN: u8 = 1;
    /// Highest channel allowed by any regulatory domain (Japan, 802.11b only)
    pub const MAX: u8 = 14;

    pub fn is_valid(channel: u8) -> bool {
        (MIN..=MAX).contains(&channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mac_parse_and_display() {
        let mac: MacAddr = "AA:bb:0C:dd:Ee:01".parse().unwrap();
        assert_eq!(mac.octets(), [0xaa, 0xbb, 0x0c, 0xdd, 0xee, 0x01]);
        assert_eq!(mac.to_string(), "aa:bb:0c:dd:ee:01");
    }

    #[test]
    fn test_mac_parse_dash_separated() {
        let mac: MacAddr = "11-22-33-44-55-66".parse().unwrap();
        assert_eq!(mac, MacAddr::new([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]));
    }

    #[test]
    fn test_mac_parse_rejects_garbage() {
        assert!("aa:bb:cc".parse::<MacAddr>().is_err());
        assert!("aa:bb:cc:dd:ee:gg".parse::<MacAddr>().is_err());
        assert!("aaa:bb:cc:dd:ee:ff".parse::<MacAddr>().is_err());
    }

    #[test]
    fn test_channel_bounds() {
        assert!(!channels::is_valid(0));
        assert!(channels::is_valid(1));
        assert!(channels::is_valid(14));
        assert!(!channels::is_valid(15));
    }

    #[test]
    fn test_broadcast() {
        assert!(MacAddr::broadcast().is_broadcast());
        assert!(!MacAddr::default().is_broadcast());
    }
}
