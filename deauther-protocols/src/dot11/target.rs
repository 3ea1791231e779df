//! Attack targets and the round-robin target list

use deauther_core::{channels, Error, MacAddr, Result};
use std::fmt;
use std::str::FromStr;

/// A transmitter/receiver pair pinned to a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    from: MacAddr,
    to: MacAddr,
    channel: u8,
}

impl Target {
    pub const fn new(from: MacAddr, to: MacAddr, channel: u8) -> Self {
        Self { from, to, channel }
    }

    /// Transmitter address (usually the access point)
    pub fn transmitter(&self) -> &MacAddr {
        &self.from
    }

    /// Receiver address (a client, or broadcast)
    pub fn receiver(&self) -> &MacAddr {
        &self.to
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transmitter {}, receiver {}, channel {}",
            self.from, self.to, self.channel
        )
    }
}

/// Parses `transmitter/receiver/channel`, e.g.
/// `aa:bb:cc:dd:ee:ff/ff:ff:ff:ff:ff:ff/6`
impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        let [from, to, channel] = parts.as_slice() else {
            return Err(Error::invalid_parameter(
                "targets",
                format!("Expected transmitter/receiver/channel, got '{}'", s),
            ));
        };

        let channel: u8 = channel.trim().parse().map_err(|_| {
            Error::invalid_parameter("targets", format!("Invalid channel '{}'", channel))
        })?;
        if !channels::is_valid(channel) {
            return Err(Error::invalid_parameter(
                "targets",
                format!(
                    "Channel {} outside {}-{}",
                    channel,
                    channels::MIN,
                    channels::MAX
                ),
            ));
        }

        Ok(Self::new(from.parse()?, to.parse()?, channel))
    }
}

/// Ordered target list with a resettable cursor
///
/// A pass visits targets in insertion order. Reaching the end does not wrap
/// by itself: the caller checks [`TargetList::has_next`] and calls
/// [`TargetList::reset`] to start the next pass.
#[derive(Debug, Clone, Default)]
pub struct TargetList {
    targets: Vec<Target>,
    cursor: usize,
}

impl TargetList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma separated list of `transmitter/receiver/channel`
    pub fn parse_list(s: &str) -> Result<Self> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(|part| part.parse::<Target>())
            .collect::<Result<Vec<Target>>>()
            .map(Self::from)
    }

    pub fn push(&mut self, target: Target) {
        self.targets.push(target);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Position the cursor before the first target
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// True while the current pass has unvisited targets
    pub fn has_next(&self) -> bool {
        self.cursor < self.targets.len()
    }

    /// Return the next target of the current pass and advance
    pub fn next(&mut self) -> Option<&Target> {
        let target = self.targets.get(self.cursor)?;
        self.cursor += 1;
        Some(target)
    }

    /// Release all targets
    pub fn clear(&mut self) {
        self.targets.clear();
        self.cursor = 0;
    }

    /// Take every target out of `other`, replacing the current contents
    ///
    /// `other` is empty afterwards and the cursor is reset.
    pub fn move_from(&mut self, other: &mut TargetList) {
        self.targets = std::mem::take(&mut other.targets);
        other.cursor = 0;
        self.cursor = 0;
    }

    /// Number of distinct channels across all targets
    pub fn channel_count(&self) -> usize {
        let mut seen = [false; 256];
        for target in &self.targets {
            seen[target.channel as usize] = true;
        }
        seen.iter().filter(|&&s| s).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.targets.iter()
    }
}

impl From<Vec<Target>> for TargetList {
    fn from(targets: Vec<Target>) -> Self {
        Self { targets, cursor: 0 }
    }
}

impl FromIterator<Target> for TargetList {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a TargetList {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}
