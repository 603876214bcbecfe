//! TCP listener binding.
//!
//! # Responsibilities
//! - Resolve the configured host/port into a socket address
//! - Bind synchronously so failures surface from `start`
//! - Hand a non-blocking listener to the Tokio runtime

use std::net::{IpAddr, SocketAddr};

use tokio::net::TcpListener;

use crate::config::ListenerConfig;
use crate::error::StubError;

/// Resolve the address a listener config asks for.
pub fn socket_addr(config: &ListenerConfig) -> Result<SocketAddr, StubError> {
    let ip: IpAddr = config
        .host
        .parse()
        .map_err(|_| StubError::InvalidAddress(format!("{}:{}", config.host, config.port)))?;
    Ok(SocketAddr::new(ip, config.port))
}

/// Bind a listener. Port `0` picks an ephemeral port.
///
/// Must run inside a Tokio runtime.
pub fn bind(config: &ListenerConfig) -> Result<TcpListener, StubError> {
    let addr = socket_addr(config)?;
    let bind_err = |source| StubError::Bind {
        addr: addr.to_string(),
        source,
    };

    let std_listener = std::net::TcpListener::bind(addr).map_err(bind_err)?;
    std_listener.set_nonblocking(true).map_err(bind_err)?;
    let listener = TcpListener::from_std(std_listener).map_err(bind_err)?;

    tracing::info!(
        address = %listener.local_addr().map_err(bind_err)?,
        "Listener bound"
    );

    Ok(listener)
}

/// Base URL for a bound address. Unspecified hosts are reported as loopback.
pub fn base_url(addr: SocketAddr) -> String {
    let ip = match addr.ip() {
        IpAddr::V4(v4) if v4.is_unspecified() => IpAddr::from([127, 0, 0, 1]),
        IpAddr::V6(v6) if v6.is_unspecified() => IpAddr::from(std::net::Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    format!("http://{}", SocketAddr::new(ip, addr.port()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host: &str, port: u16) -> ListenerConfig {
        ListenerConfig {
            host: host.to_string(),
            port,
        }
    }

    #[test]
    fn test_socket_addr() {
        assert_eq!(
            socket_addr(&config("127.0.0.1", 8008)).unwrap(),
            "127.0.0.1:8008".parse().unwrap()
        );
        assert_eq!(
            socket_addr(&config("::1", 0)).unwrap(),
            "[::1]:0".parse().unwrap()
        );
        assert!(matches!(
            socket_addr(&config("localhost", 80)),
            Err(StubError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_base_url() {
        assert_eq!(base_url("127.0.0.1:4000".parse().unwrap()), "http://127.0.0.1:4000");
        assert_eq!(base_url("0.0.0.0:4000".parse().unwrap()), "http://127.0.0.1:4000");
        assert_eq!(base_url("[::]:4000".parse().unwrap()), "http://[::1]:4000");
    }

    #[tokio::test]
    async fn test_bind_ephemeral_then_conflict() {
        let first = bind(&config("127.0.0.1", 0)).unwrap();
        let port = first.local_addr().unwrap().port();
        assert_ne!(port, 0);

        let err = bind(&config("127.0.0.1", port)).unwrap_err();
        assert!(matches!(err, StubError::Bind { .. }));
        assert!(err.to_string().contains("could not listen"));
    }
}
