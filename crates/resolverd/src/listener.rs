use anyhow::{bail, Context};
use kumo_address::host_or_socket::HostOrSocketAddress;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, UnixListener};

/// A connection handed back by [`Listener::accept`]: readable,
/// writable, and nothing else. Erases the unix-vs-tcp distinction so
/// the connection handler loop doesn't need to care which it got.
pub trait Connection: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> Connection for T {}

pub enum Listener {
    Unix(UnixListener),
    Tcp(TcpListener),
}

impl Listener {
    pub async fn bind(addr: &HostOrSocketAddress) -> anyhow::Result<Self> {
        match addr {
            HostOrSocketAddress::UnixDomain(path) => {
                let path = path.as_pathname().context(
                    "listen address is an unbound unix domain socket; a path is required",
                )?;
                if path.exists() {
                    std::fs::remove_file(path)
                        .with_context(|| format!("removing stale socket {}", path.display()))?;
                }
                let listener = UnixListener::bind(path)
                    .with_context(|| format!("binding unix socket {}", path.display()))?;
                Ok(Listener::Unix(listener))
            }
            HostOrSocketAddress::V4Socket(sa) => {
                let listener = TcpListener::bind(SocketAddr::V4(**sa)).await?;
                Ok(Listener::Tcp(listener))
            }
            HostOrSocketAddress::V6Socket(sa) => {
                let listener = TcpListener::bind(SocketAddr::V6(**sa)).await?;
                Ok(Listener::Tcp(listener))
            }
            HostOrSocketAddress::V4Host(_) | HostOrSocketAddress::V6Host(_) => {
                bail!("listen address must include a port number, or be a unix domain socket path")
            }
        }
    }

    pub async fn accept(&self) -> std::io::Result<(Box<dyn Connection>, String)> {
        match self {
            Listener::Unix(listener) => {
                let (stream, addr) = listener.accept().await?;
                let label = match addr.as_pathname() {
                    Some(path) => path.display().to_string(),
                    None => "<unix>".to_string(),
                };
                Ok((Box::new(stream), label))
            }
            Listener::Tcp(listener) => {
                let (stream, addr) = listener.accept().await?;
                Ok((Box::new(stream), addr.to_string()))
            }
        }
    }
}
