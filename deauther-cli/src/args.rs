//! CLI argument parsing

use clap::{Parser, Subcommand};
use deauther_core::protocol::AttackParams;

#[derive(Parser, Debug)]
#[command(name = "deauther")]
#[command(version, about = "802.11 deauthentication frame transmitter", long_about = None)]
pub struct Cli {
    /// Verbose output (-v, -vv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable color output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available network interfaces
    Interfaces,

    /// List protocols and their attacks
    Protocols,

    /// Launch a deauthentication attack
    Attack {
        /// Monitor-mode interface name
        #[arg(short, long)]
        interface: String,

        /// Target as TRANSMITTER/RECEIVER/CHANNEL (repeatable)
        #[arg(short, long = "target", value_name = "TARGET", required = true)]
        targets: Vec<String>,

        /// Send only deauthentication frames
        #[arg(long, conflicts_with = "disassoc_only")]
        deauth_only: bool,

        /// Send only disassociation frames
        #[arg(long)]
        disassoc_only: bool,

        /// Frames per second
        #[arg(short, long, default_value = "20")]
        rate: u32,

        /// Stop after this many seconds, 0 = never
        #[arg(short = 'T', long, value_name = "SECONDS", default_value = "300")]
        timeout: u32,

        /// Stop after this many frames, 0 = unlimited
        #[arg(short = 'm', long, default_value = "0")]
        max_packets: u64,

        /// Suppress summary and status reports
        #[arg(short, long)]
        silent: bool,

        /// Extra attack parameters (key=value pairs)
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Tracing filter directive for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

impl Commands {
    /// Convert `attack` arguments into launch parameters
    ///
    /// Explicit `--param key=value` pairs are applied last and override the
    /// dedicated flags. Returns `None` for other subcommands.
    pub fn attack_params(&self) -> Option<deauther_core::Result<AttackParams>> {
        let Commands::Attack {
            targets,
            deauth_only,
            disassoc_only,
            rate,
            timeout,
            max_packets,
            silent,
            params,
            ..
        } = self
        else {
            return None;
        };

        let base = AttackParams::new()
            .set("targets", targets.join(","))
            .set("deauth", !disassoc_only)
            .set("disassoc", !deauth_only)
            .set("rate", *rate)
            .set("timeout", *timeout)
            .set("max_packets", *max_packets)
            .set("silent", *silent);

        Some(AttackParams::from_pairs(params.iter().map(String::as_str)).map(|extra| base.merge(extra)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: &str = "aa:bb:cc:dd:ee:ff/ff:ff:ff:ff:ff:ff/6";

    #[test]
    fn test_attack_defaults() {
        let cli = Cli::try_parse_from(["deauther", "attack", "-i", "wlan0mon", "-t", TARGET]).unwrap();
        let params = cli.command.attack_params().unwrap().unwrap();

        assert_eq!(params.get_string("targets"), Some(TARGET));
        assert_eq!(params.get_bool("deauth"), Some(true));
        assert_eq!(params.get_bool("disassoc"), Some(true));
        assert_eq!(params.get_u32("rate"), Some(20));
        assert_eq!(params.get_u32("timeout"), Some(300));
        assert_eq!(params.get_u64("max_packets"), Some(0));
        assert_eq!(params.get_bool("silent"), Some(false));
        assert_eq!(cli.log_level(), "info");
    }

    #[test]
    fn test_attack_flags() {
        let cli = Cli::try_parse_from([
            "deauther",
            "-vv",
            "attack",
            "--interface",
            "wlan0mon",
            "--target",
            TARGET,
            "--target",
            "11:22:33:44:55:66/ff:ff:ff:ff:ff:ff/11",
            "--deauth-only",
            "--rate",
            "100",
            "-s",
        ])
        .unwrap();
        let params = cli.command.attack_params().unwrap().unwrap();

        assert_eq!(
            params.get_string("targets"),
            Some("aa:bb:cc:dd:ee:ff/ff:ff:ff:ff:ff:ff/6,11:22:33:44:55:66/ff:ff:ff:ff:ff:ff/11")
        );
        assert_eq!(params.get_bool("deauth"), Some(true));
        assert_eq!(params.get_bool("disassoc"), Some(false));
        assert_eq!(params.get_u32("rate"), Some(100));
        assert_eq!(params.get_bool("silent"), Some(true));
        assert_eq!(cli.log_level(), "trace");
    }

    #[test]
    fn test_param_overrides_flag() {
        let cli = Cli::try_parse_from([
            "deauther", "attack", "-i", "wlan0mon", "-t", TARGET, "-r", "10", "-p", "rate=50",
        ])
        .unwrap();
        let params = cli.command.attack_params().unwrap().unwrap();
        assert_eq!(params.get_u32("rate"), Some(50));
    }

    #[test]
    fn test_bad_param_is_reported() {
        let cli = Cli::try_parse_from(["deauther", "attack", "-i", "wlan0mon", "-t", TARGET, "-p", "rate"])
            .unwrap();
        assert!(cli.command.attack_params().unwrap().is_err());
    }

    #[test]
    fn test_mode_flags_conflict() {
        assert!(Cli::try_parse_from([
            "deauther",
            "attack",
            "-i",
            "wlan0mon",
            "-t",
            TARGET,
            "--deauth-only",
            "--disassoc-only",
        ])
        .is_err());
    }

    #[test]
    fn test_attack_requires_target() {
        assert!(Cli::try_parse_from(["deauther", "attack", "-i", "wlan0mon"]).is_err());
        assert!(Cli::try_parse_from(["deauther", "protocols"])
            .unwrap()
            .command
            .attack_params()
            .is_none());
    }
}
