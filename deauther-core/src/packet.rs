//! Captured frames

use std::time::SystemTime;

/// A captured 802.11 frame, optionally prefixed by a radiotap header
#[derive(Debug, Clone)]
pub struct Packet {
    /// When the frame was captured
    pub timestamp: SystemTime,
    /// Interface the frame was received on
    pub interface: String,
    /// Raw capture data
    pub data: Vec<u8>,
}

impl Packet {
    /// Create a new packet
    pub fn new(interface: String, data: Vec<u8>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            interface,
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The 802.11 frame with any radiotap header stripped
    ///
    /// Radiotap headers start with version 0 and carry their own little
    /// endian length at offset 2. Data without a plausible header is
    /// returned unchanged.
    pub fn frame(&self) -> &[u8] {
        if self.data.len() >= 8 && self.data[0] == 0 {
            let rt_len = u16::from_le_bytes([self.data[2], self.data[3]]) as usize;
            if rt_len >= 8 && rt_len <= self.data.len() {
                return &self.data[rt_len..];
            }
        }
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_strips_radiotap() {
        let mut data = vec![0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];
        data.extend_from_slice(&[0xc0, 0x00, 0x3a, 0x01]);
        let packet = Packet::new("wlan0".to_string(), data);
        assert_eq!(packet.frame(), &[0xc0, 0x00, 0x3a, 0x01]);
    }

    #[test]
    fn test_frame_without_radiotap_is_unchanged() {
        let packet = Packet::new("wlan0".to_string(), vec![0xa0, 0x00, 0x00, 0x00]);
        assert_eq!(packet.frame(), &[0xa0, 0x00, 0x00, 0x00]);
        assert_eq!(packet.len(), 4);
    }
}
