mod config;
mod listener;
mod logging;

use crate::config::ResolverConfig;
use crate::listener::Listener;
use crate::logging::LogFormat;
use anyhow::Context;
use attr_protocol::{read_request, write_reply, ProtocolError, ResolveReply};
use clap::Parser;
use kumo_address::host_or_socket::HostOrSocketAddress;
use kumo_server_lifecycle::{Activity, LifeCycle, ShutdownSubcription};
use resolver_core::{NormalizingRewrite, ResolverEngine, ResolverSettings, StaticLocalDomains};
use resolver_tables::TableSet;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "resolverd", version = version_info::resolver_version())]
struct Opt {
    /// Path to the resolver's TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Address to listen on: a unix domain socket path, or
    /// `host:port`. Overrides the `listen` key in the config file.
    #[arg(long)]
    listen: Option<String>,

    /// Directory to write diagnostic logs to. When unset, logs go to
    /// stderr.
    #[arg(long)]
    diag_log_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "pretty")]
    diag_format: LogFormat,
}

/// The immutable, shared state every connection resolves requests
/// against.
struct AppState {
    tables: TableSet,
    settings: ResolverSettings,
    local_domains: StaticLocalDomains,
    rewrite: NormalizingRewrite,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();
    let _guard = logging::init(opt.diag_log_dir.clone(), opt.diag_format.into());

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(opt))
}

async fn run(opt: Opt) -> anyhow::Result<()> {
    let config = ResolverConfig::load(&opt.config)
        .with_context(|| format!("loading config from {}", opt.config.display()))?;

    let listen_spec = opt
        .listen
        .clone()
        .or_else(|| config.listen.clone())
        .unwrap_or_else(|| "/var/run/resolverd/resolver.sock".to_string());
    let listen_addr = HostOrSocketAddress::from_str(&listen_spec)
        .with_context(|| format!("parsing listen address {listen_spec:?}"))?;

    let settings = config.settings();
    let mode = if settings.resolve_dequoted {
        resolver_address::ParseMode::Dequoted
    } else {
        resolver_address::ParseMode::Requoted
    };
    let state = Arc::new(AppState {
        tables: config.tables()?,
        local_domains: StaticLocalDomains::new(&settings.local_domains),
        rewrite: NormalizingRewrite {
            swap_bangpath: settings.swap_bangpath,
            percent_hack: settings.percent_hack,
            mode,
        },
        settings,
    });

    let listener = Listener::bind(&listen_addr).await?;
    tracing::info!(listen = %listen_spec, "resolverd listening");

    let life_cycle = LifeCycle::new();
    let mut shutting_down = ShutdownSubcription::get();

    accept_loop(listener, state, &mut shutting_down, life_cycle).await
}

async fn accept_loop(
    listener: Listener,
    state: Arc<AppState>,
    shutting_down: &mut ShutdownSubcription,
    mut life_cycle: LifeCycle,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            _ = shutting_down.shutting_down() => {
                break;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((conn, peer)) => {
                        let state = Arc::clone(&state);
                        tokio::spawn(async move {
                            let Ok(activity) = Activity::get(format!("resolver connection {peer}")) else {
                                return;
                            };
                            if let Err(err) = handle_connection(conn, &state).await {
                                tracing::warn!(peer, %err, "resolver connection ended with an error");
                            }
                            drop(activity);
                        });
                    }
                    Err(err) => {
                        tracing::error!(%err, "accept failed");
                    }
                }
            }
        }
    }

    life_cycle.wait_for_shutdown().await;
    Ok(())
}

async fn handle_connection(
    conn: Box<dyn listener::Connection>,
    state: &AppState,
) -> Result<(), ProtocolError> {
    let (read_half, mut write_half) = tokio::io::split(conn);
    let mut reader = BufReader::new(read_half);

    loop {
        let request = match read_request(&mut reader).await {
            Ok(Some(request)) => request,
            Ok(None) => return Ok(()),
            Err(err) => return Err(err),
        };

        let engine = ResolverEngine::new(
            &state.tables,
            &state.settings,
            &state.local_domains,
            &state.rewrite,
        );
        let resolved = engine.resolve(&request.addr);

        let reply = ResolveReply {
            transport: resolved.channel,
            nexthop: resolved.nexthop,
            recipient: resolved.nextrcpt,
            flags: resolved.flags.bits(),
        };

        if let Err(err) = write_reply(&mut write_half, &reply).await {
            tracing::warn!(%err, "failed to write resolver reply; closing connection");
            return Err(err);
        }
    }
}
