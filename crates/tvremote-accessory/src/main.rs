//! `tvremote`: drives the television accessory from the command line.
//!
//! The binary acts as a minimal host.  It loads the accessory configuration,
//! registers a [`TelevisionAccessory`] into an [`InMemoryHost`], and then
//! writes characteristics exactly the way a smart-home host would, so every
//! command goes through the same hooks, key tables, and TCP transport.
//!
//! # Usage
//!
//! ```text
//! tvremote [OPTIONS] <COMMAND>
//!
//! Commands:
//!   power       Read the power state, or write it (ignored by the device)
//!   input       Select an input source by identifier (1 Menu, 2 Apple TV, 3 PlayStation)
//!   key         Press a remote button (up, down, left, right, select, back, info, play-pause, ...)
//!   play-pause  Toggle play/pause
//!   mute        Toggle mute
//!   volume      Step the volume up or down
//!   send        Send raw key codes
//!   repl        Read commands from stdin, one per line
//!
//! Options:
//!   --config <PATH>            Config file [env: TVREMOTE_CONFIG]
//!   --name <NAME>              Accessory display name
//!   --hostname <HOST>          Projector hostname or IP [env: TVREMOTE_HOSTNAME]
//!   --port <PORT>              Projector TCP port [env: TVREMOTE_PORT]
//!   --menu-input-fallthrough   Input 1 also runs the input 2 macro
//! ```
//!
//! Command-line values override the config file.  In `repl` mode the
//! play/pause flag persists across lines, just as it does inside a host.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tvremote_accessory::application::registry::ServiceId;
use tvremote_accessory::application::send_keys::{KeySender, KeyTransport};
use tvremote_accessory::application::television::{PublishedServices, TelevisionAccessory};
use tvremote_accessory::infrastructure::host::{HostError, InMemoryHost};
use tvremote_accessory::infrastructure::network::TcpKeyTransport;
use tvremote_accessory::infrastructure::storage::config::{
    load_config, load_default_config, AppConfig, ConfigFileError,
};
use tvremote_core::{
    AccessoryConfig, Characteristic, CharacteristicValue, KeyCode, KeySequence, PortValue,
    RemoteKey,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Television-style remote control for a network projector.
#[derive(Debug, Parser)]
#[command(name = "tvremote", about = "Send remote-control commands to a projector", version)]
struct Cli {
    /// Path to a TOML (or `.json`) config file.
    ///
    /// Defaults to `config.toml` in the platform config directory; a missing
    /// default file is not an error.
    #[arg(long, env = "TVREMOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Display name of the television accessory.
    #[arg(long)]
    name: Option<String>,

    /// Hostname or IP address of the projector.
    #[arg(long, env = "TVREMOTE_HOSTNAME")]
    hostname: Option<String>,

    /// TCP port of the projector's key-event service.
    ///
    /// Accepted as a plain integer so out-of-range values get the same
    /// validation message as a bad value in the config file.
    #[arg(long, env = "TVREMOTE_PORT", allow_negative_numbers = true)]
    port: Option<i64>,

    /// Selecting input 1 also runs the input 2 macro.
    #[arg(long)]
    menu_input_fallthrough: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Read the power state, or write it (the device ignores power writes).
    Power {
        #[arg(value_enum)]
        state: Option<PowerState>,
    },
    /// Select an input source by identifier.
    Input { id: u32 },
    /// Press a remote button by name or raw host value.
    Key { name: String },
    /// Toggle play/pause.
    PlayPause,
    /// Toggle mute.
    Mute,
    /// Step the volume.
    Volume {
        #[arg(value_enum)]
        direction: VolumeDirection,
    },
    /// Send raw key codes, in order.
    Send {
        #[arg(required = true)]
        codes: Vec<u32>,
    },
    /// Read commands from stdin, one per line.
    Repl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PowerState {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VolumeDirection {
    Up,
    Down,
}

/// One line of `repl` input, parsed with the same subcommands as the CLI.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ReplLine {
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration.
    fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
        let accessory = &mut config.accessory;
        if let Some(name) = &self.name {
            accessory.name = Some(name.clone());
        }
        if let Some(hostname) = &self.hostname {
            accessory.hostname = Some(hostname.clone());
        }
        if let Some(port) = self.port {
            accessory.port = Some(PortValue::Integer(port));
        }
        if self.menu_input_fallthrough {
            accessory.menu_input_fallthrough = true;
        }
        config
    }
}

/// Loads the explicit config file, or the default one when present.
fn load_app_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config file {}", path.display())),
        None => match load_default_config() {
            Err(ConfigFileError::NoPlatformConfigDir) => Ok(AppConfig::default()),
            other => other.context("failed to load default config file"),
        },
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// The registered accessory plus the host that drives it.
struct Session {
    host: Arc<InMemoryHost>,
    services: PublishedServices,
    raw_sender: KeySender,
}

impl Session {
    fn new(config: &AccessoryConfig, transport: Arc<dyn KeyTransport>) -> Self {
        let accessory = Arc::new(TelevisionAccessory::new(config, Arc::clone(&transport)));
        let mut host = InMemoryHost::new();
        let services = accessory.register(&mut host);
        Self {
            host: Arc::new(host),
            services,
            raw_sender: KeySender::new(config.endpoint.clone(), transport),
        }
    }

    /// Executes one command.  `Repl` is handled by [`Session::repl`].
    async fn run(&self, command: Command) -> anyhow::Result<()> {
        let tv = self.services.television;
        let speaker = self.services.speaker;

        match command {
            Command::Power { state: None } => {
                let value = self.host.read(tv, Characteristic::Active).await?;
                println!("power: {}", if value.as_int() == Some(1) { "on" } else { "off" });
                Ok(())
            }
            Command::Power { state: Some(state) } => {
                let value = i64::from(state == PowerState::On);
                self.write(tv, Characteristic::Active, value.into()).await
            }
            Command::Input { id } => self.write(tv, Characteristic::ActiveIdentifier, id.into()).await,
            Command::Key { name } => {
                let raw = RemoteKey::from_name(&name)
                    .map(|key| key as i64)
                    .or_else(|| name.parse().ok())
                    .with_context(|| format!("unknown remote key '{name}'"))?;
                self.write(tv, Characteristic::RemoteKey, raw.into()).await
            }
            Command::PlayPause => {
                let raw = RemoteKey::PlayPause as i64;
                self.write(tv, Characteristic::RemoteKey, raw.into()).await
            }
            Command::Mute => self.write(speaker, Characteristic::Mute, true.into()).await,
            Command::Volume { direction } => {
                let raw: i64 = match direction {
                    VolumeDirection::Up => 0,
                    VolumeDirection::Down => 1,
                };
                self.write(speaker, Characteristic::VolumeSelector, raw.into()).await
            }
            Command::Send { codes } => {
                let keys: KeySequence = codes.into_iter().map(KeyCode).collect();
                self.raw_sender.send(keys).await?;
                Ok(())
            }
            Command::Repl => anyhow::bail!("repl cannot be nested"),
        }
    }

    /// Writes a characteristic through the host's callback adapter and waits
    /// for the completion callback.
    async fn write(
        &self,
        service: ServiceId,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> anyhow::Result<()> {
        let (tx, rx) = oneshot::channel::<Result<(), HostError>>();
        let _ = self.host.write_with_callback(service, characteristic, value, move |result| {
            let _ = tx.send(result);
        });
        rx.await.context("host dropped the write without completing it")??;
        Ok(())
    }

    /// Reads commands from stdin until EOF or `quit`.  A failed command is
    /// reported and the loop continues.
    async fn repl(&self) -> anyhow::Result<()> {
        info!("reading commands from stdin; type 'help' for a list, 'quit' to leave");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "quit" || line == "exit" {
                break;
            }

            match ReplLine::try_parse_from(line.split_whitespace()) {
                Ok(ReplLine { command }) => {
                    if let Err(e) = self.run(command).await {
                        error!("{e:#}");
                    }
                }
                Err(e) => {
                    let _ = e.print();
                }
            }
        }
        Ok(())
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app_config = cli.apply_overrides(load_app_config(cli.config.as_ref())?);

    // RUST_LOG wins; otherwise the level from the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&app_config.log_level)),
        )
        .init();

    let accessory_config = AccessoryConfig::try_from(app_config.accessory)
        .context("invalid accessory configuration")?;
    info!(
        "tvremote starting: '{}' -> {}",
        accessory_config.name, accessory_config.endpoint
    );

    let session = Session::new(&accessory_config, Arc::new(TcpKeyTransport::new()));
    match cli.command {
        Command::Repl => session.repl().await,
        command => session.run(command).await,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
