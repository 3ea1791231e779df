//! Protocol trait, launch parameters and passive statistics

use crate::{AttackDescriptor, AttackHandle, AttackId, Error, Packet, Transmitter};
use async_trait::async_trait;
use std::collections::HashMap;

/// A family of frames the tool can parse and attack with
#[async_trait]
pub trait Protocol: Send + Sync {
    /// Display name, e.g. "IEEE 802.11 Management"
    fn name(&self) -> &'static str;

    /// Short name used in CLI (e.g., "dot11")
    fn shortname(&self) -> &'static str;

    fn id(&self) -> crate::ProtocolId;

    /// Attacks published for `launch_attack`, indexed by [`AttackId`]
    fn attacks(&self) -> &[AttackDescriptor];

    /// Account for one frame seen on the air
    fn handle_packet(&mut self, packet: &Packet) -> Result<(), Error>;

    /// Spawn attack `attack_id` on the current tokio runtime
    ///
    /// Parameters are validated before anything is spawned. The attack owns
    /// `transmitter` until it finishes.
    async fn launch_attack(
        &self,
        attack_id: AttackId,
        params: AttackParams,
        transmitter: Box<dyn Transmitter>,
    ) -> Result<AttackHandle, Error>;

    fn stats(&self) -> ProtocolStats;

    /// Zero the passive counters
    fn reset_stats(&mut self);
}

/// Key/value launch parameters
///
/// Values set from the command line stay strings; the typed getters parse
/// them on access and return `None` when the value does not convert.
#[derive(Debug, Clone, Default)]
pub struct AttackParams {
    params: HashMap<String, ParamValue>,
}

impl AttackParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, replacing any previous value for `key`
    pub fn set<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Parse `key=value` pairs as given on the command line
    ///
    /// Values stay strings; the typed getters convert on access.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut params = Self::new();
        for pair in pairs {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| Error::invalid_parameter(pair, "Expected KEY=VALUE"))?;
            params = params.set(key.trim(), value.trim());
        }
        Ok(params)
    }

    /// Overlay `other` on top of these parameters; its values win
    pub fn merge(mut self, other: AttackParams) -> Self {
        self.params.extend(other.params);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_string)
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(ParamValue::as_u32)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(ParamValue::as_u64)
    }

    /// Accepts `true/false`, `yes/no`, `on/off` and `1/0` for string values
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ParamValue::as_bool)
    }
}

/// A single launch parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    U64(u64),
    U32(u32),
    Bool(bool),
}

impl ParamValue {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            ParamValue::U32(v) => Some(*v),
            ParamValue::U64(v) => u32::try_from(*v).ok(),
            ParamValue::String(s) => s.parse().ok(),
            ParamValue::Bool(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ParamValue::U64(v) => Some(*v),
            ParamValue::U32(v) => Some(*v as u64),
            ParamValue::String(s) => s.parse().ok(),
            ParamValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            ParamValue::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_owned())
    }
}

macro_rules! param_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for ParamValue {
            fn from(v: $ty) -> Self {
                ParamValue::$variant(v)
            }
        })*
    };
}

param_value_from!(String => String, u32 => U32, u64 => U64, bool => Bool);

/// Passive-mode counters reported by [`Protocol::stats`]
#[derive(Debug, Clone, Default)]
pub struct ProtocolStats {
    /// Frames handed to `handle_packet`
    pub packets_received: u64,
    /// Frames that decoded as this protocol
    pub packets_parsed: u64,
    /// Frames that failed to decode
    pub packets_errors: u64,
    /// Frame bytes, radiotap header excluded
    pub bytes_received: u64,
    /// Named per-protocol counters, e.g. `deauth_seen`
    pub custom: HashMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_keeps_strings() {
        let params = AttackParams::from_pairs(["rate=50", "silent = yes", "timeout=0"]).unwrap();
        assert_eq!(params.get_string("rate"), Some("50"));
        assert_eq!(params.get_u32("rate"), Some(50));
        assert_eq!(params.get_bool("silent"), Some(true));
        assert_eq!(params.get_u64("timeout"), Some(0));
        assert!(!params.contains("deauth"));
    }

    #[test]
    fn test_from_pairs_rejects_missing_equals() {
        let err = AttackParams::from_pairs(["rate"]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_merge_overrides() {
        let params = AttackParams::new()
            .set("rate", 20u32)
            .set("silent", false)
            .merge(AttackParams::from_pairs(["rate=50"]).unwrap());
        assert_eq!(params.get_u32("rate"), Some(50));
        assert_eq!(params.get_bool("silent"), Some(false));
    }

    #[test]
    fn test_typed_values_convert() {
        assert_eq!(ParamValue::U64(7).as_u32(), Some(7));
        assert_eq!(ParamValue::U64(u64::MAX).as_u32(), None);
        assert_eq!(ParamValue::U32(9).as_u64(), Some(9));
        assert_eq!(ParamValue::String("maybe".into()).as_bool(), None);
        assert_eq!(ParamValue::Bool(true).as_u32(), None);
    }
}
