use std::io::Write;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use anyhow::{anyhow, Context};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::cli::USAGE;
use crate::error::{exit, ProbeError};
use crate::output::Reporter;

pub fn parse_address(address: &str) -> Result<Ipv4Addr, ProbeError> {
    address
        .parse::<Ipv4Addr>()
        .map_err(|_| ProbeError::InvalidAddress(address.to_string()))
}

/// One blocking TCP connect to `ip:port`, bounded only by the OS connect timeout.
///
/// The connected socket is dropped straight away; reaching the connected
/// state is all that counts.
pub fn connect(ip: Ipv4Addr, port: i64) -> Result<(), ProbeError> {
    let port = u16::try_from(port)
        .map_err(|_| anyhow!("port {} is outside the valid range 0-65535", port))?;
    let addr = SockAddr::from(SocketAddr::V4(SocketAddrV4::new(ip, port)));

    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
        .context("failed to create TCP socket")?;

    socket.connect(&addr).map_err(|e| match e.raw_os_error() {
        Some(code) => ProbeError::ConnectFailed {
            kind: e.kind(),
            code,
            source: e,
        },
        None => ProbeError::Unexpected(
            anyhow::Error::new(e).context(format!("connect to {}:{} failed", ip, port)),
        ),
    })
}

/// Probes one (address, port) pair, reports the outcome and returns its exit code.
pub fn test_connectivity<W: Write>(reporter: &mut Reporter<W>, address: &str, port: i64) -> i32 {
    let ip = match parse_address(address) {
        Ok(ip) => ip,
        Err(e) => {
            tracing::debug!(address, error = %e, "rejected address");
            reporter.error("***INVALID IP Address***");
            reporter.error(USAGE);
            return e.exit_code();
        }
    };

    reporter.info(format!("Attempting to connect to {}, on port {}", address, port));

    let code = match connect(ip, port) {
        Ok(()) => {
            reporter.success(format!("Connection Sucessfull - {}:{}", address, port));
            exit::SUCCESS
        }
        Err(ProbeError::ConnectFailed { kind, code, .. }) => {
            reporter.failure(format!(
                "Failed to Connect ({:?}, os error {}) - {}:{}",
                kind, code, address, port
            ));
            exit::CONNECT_FAILED
        }
        Err(e) => {
            reporter.error("***ERROR***");
            reporter.error(format!("Error:{}", error_kind(&e)));
            reporter.error(format!("Message:{}", e));
            reporter.error(format!("Stack:{:?}", e));
            e.exit_code()
        }
    };

    tracing::debug!(address, port, code, "probe finished");
    code
}

fn error_kind(err: &ProbeError) -> &'static str {
    match err {
        ProbeError::InvalidAddress(_) => "InvalidAddress",
        ProbeError::ConnectFailed { .. } => "ConnectFailed",
        ProbeError::Unexpected(_) => "Unexpected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use crate::output::Verbosity;

    fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    fn run(address: &str, port: i64) -> (i32, String) {
        let mut reporter = Reporter::new(Verbosity::default(), Vec::new());
        let code = test_connectivity(&mut reporter, address, port);
        (code, String::from_utf8(reporter.into_inner()).unwrap())
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("192.168.1.1").unwrap(), Ipv4Addr::new(192, 168, 1, 1));
        assert!(parse_address("not.an.ip").is_err());
        assert!(parse_address("localhost").is_err());
        assert!(parse_address("::1").is_err());
        assert!(parse_address("256.1.1.1").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn test_connect_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(connect(Ipv4Addr::LOCALHOST, port as i64).is_ok());
    }

    #[test]
    fn test_connect_refused() {
        let err = connect(Ipv4Addr::LOCALHOST, closed_port() as i64).unwrap_err();
        assert!(matches!(err, ProbeError::ConnectFailed { .. }));
        assert_eq!(err.exit_code(), exit::CONNECT_FAILED);
    }

    #[test]
    fn test_port_out_of_range_is_unexpected() {
        let err = connect(Ipv4Addr::LOCALHOST, 70000).unwrap_err();
        assert!(matches!(err, ProbeError::Unexpected(_)));

        let err = connect(Ipv4Addr::LOCALHOST, -1).unwrap_err();
        assert_eq!(err.exit_code(), exit::UNEXPECTED);
    }

    #[test]
    fn test_reports_success() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port() as i64;
        let (code, out) = run("127.0.0.1", port);
        assert_eq!(code, exit::SUCCESS);
        assert!(out.contains(&format!("Attempting to connect to 127.0.0.1, on port {}", port)));
        assert!(out.contains(&format!("Connection Sucessfull - 127.0.0.1:{}", port)));
    }

    #[test]
    fn test_reports_failure() {
        let port = closed_port() as i64;
        let (code, out) = run("127.0.0.1", port);
        assert_eq!(code, exit::CONNECT_FAILED);
        assert!(out.contains("Failed to Connect ("));
        assert!(out.contains(&format!("- 127.0.0.1:{}", port)));
    }

    #[test]
    fn test_reports_invalid_address() {
        let (code, out) = run("not.an.ip", 80);
        assert_eq!(code, exit::INVALID_ADDRESS);
        assert!(out.contains("***INVALID IP Address***"));
        assert!(!out.contains("Attempting to connect"));
    }

    #[test]
    fn test_reports_unexpected_error() {
        let (code, out) = run("127.0.0.1", 65536);
        assert_eq!(code, exit::UNEXPECTED);
        assert!(out.contains("***ERROR***"));
        assert!(out.contains("Error:Unexpected"));
        assert!(out.contains("outside the valid range"));
    }
}
