//! Frame transmission over monitor-mode interfaces

use crate::{Error, MacAddr, Result};
use parking_lot::Mutex;
use pnet_datalink::{self, Channel, DataLinkSender};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Raw 802.11 frame transmission primitive
///
/// `Ok(())` means the frame was accepted for sending. Implementations own
/// channel coherence: either they tune to `channel` before sending, or the
/// radio is tuned externally.
pub trait Transmitter: Send {
    fn transmit(&mut self, channel: u8, frame: &[u8]) -> Result<()>;
}

impl<T: Transmitter + ?Sized> Transmitter for Box<T> {
    fn transmit(&mut self, channel: u8, frame: &[u8]) -> Result<()> {
        (**self).transmit(channel, frame)
    }
}

/// Radiotap header prepended to injected frames: version 0, length 10,
/// TX flags present, NOACK set.
pub const RADIOTAP_TX_HEADER: [u8; 10] = [
    0x00, 0x00, // version, padding
    0x0a, 0x00, // header length
    0x00, 0x80, 0x00, 0x00, // present bitmap (tx flags)
    0x08, 0x00, // tx flags: no ack
];

/// Network interface in monitor mode
#[derive(Clone)]
pub struct MonitorInterface {
    /// Interface name (e.g., "wlan0mon")
    pub name: String,
    /// Interface index
    pub index: u32,
    /// MAC address
    pub mac_address: MacAddr,
    /// Is interface up?
    pub is_up: bool,
    sender: Option<Arc<Mutex<Box<dyn DataLinkSender>>>>,
    last_channel: Option<u8>,
}

impl fmt::Debug for MonitorInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorInterface")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("mac_address", &self.mac_address)
            .field("is_up", &self.is_up)
            .field("open", &self.sender.is_some())
            .finish()
    }
}

impl MonitorInterface {
    fn from_pnet(iface: &pnet_datalink::NetworkInterface) -> Self {
        let mac_bytes = iface
            .mac
            .map(|mac| [mac.0, mac.1, mac.2, mac.3, mac.4, mac.5])
            .unwrap_or([0; 6]);

        Self {
            name: iface.name.clone(),
            index: iface.index,
            mac_address: MacAddr(mac_bytes),
            is_up: iface.is_up(),
            sender: None,
            last_channel: None,
        }
    }

    /// Get interface by name
    pub fn by_name(name: &str) -> Result<Self> {
        pnet_datalink::interfaces()
            .iter()
            .find(|i| i.name == name)
            .map(Self::from_pnet)
            .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
    }

    /// List all available interfaces
    pub fn list_all() -> Vec<Self> {
        pnet_datalink::interfaces()
            .iter()
            .map(Self::from_pnet)
            .collect()
    }

    /// Open a persistent sender on this interface
    ///
    /// The interface must already be in monitor mode on the right channel.
    pub fn open(mut self) -> Result<Self> {
        let interface = pnet_datalink::interfaces()
            .into_iter()
            .find(|iface| iface.name == self.name)
            .ok_or_else(|| Error::InterfaceNotFound(self.name.clone()))?;

        let (tx, _) = match pnet_datalink::channel(&interface, Default::default()) {
            Ok(Channel::Ethernet(tx, rx)) => (tx, rx),
            Ok(_) => return Err(Error::Interface("Unsupported channel type".to_string())),
            Err(e) => return Err(Error::Interface(format!("Failed to create channel: {}", e))),
        };

        debug!(interface = %self.name, "Opened monitor sender");
        self.sender = Some(Arc::new(Mutex::new(tx)));
        Ok(self)
    }

    pub fn is_open(&self) -> bool {
        self.sender.is_some()
    }
}

impl Transmitter for MonitorInterface {
    fn transmit(&mut self, channel: u8, frame: &[u8]) -> Result<()> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| Error::Interface(format!("Interface {} is not open", self.name)))?;

        if self.last_channel != Some(channel) {
            debug!(interface = %self.name, channel, "Target channel changed");
            self.last_channel = Some(channel);
        }

        let header_len = RADIOTAP_TX_HEADER.len();
        let mut tx = sender.lock();
        tx.build_and_send(1, header_len + frame.len(), &mut |buf| {
            buf[..header_len].copy_from_slice(&RADIOTAP_TX_HEADER);
            buf[header_len..].copy_from_slice(frame);
        })
        .ok_or_else(|| Error::Interface("Failed to send frame".to_string()))?
        .map_err(|e| Error::Interface(format!("Send error: {}", e)))
    }
}

impl fmt::Display for MonitorInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}){}",
            self.name,
            self.mac_address,
            if self.is_up { "" } else { " [down]" }
        )
    }
}
