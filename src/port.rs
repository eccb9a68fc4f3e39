//! Free port selection.
//!
//! Ports are probed from [`DEFAULT_START_PORT`] upwards in steps of
//! [`PORT_STEP`] until a probe reports the port free. The search gives up
//! after [`MAX_PORT_ATTEMPTS`] candidates. The selected port can still be
//! taken before the server binds; that race surfaces as a bind error.

use std::net::{Ipv4Addr, TcpListener};
use std::process::{Command, Stdio};

use crate::error::{PreviewError, Result};

pub const DEFAULT_START_PORT: u16 = 3000;
pub const PORT_STEP: u16 = 2;
pub const MAX_PORT_ATTEMPTS: usize = 100;

/// Answers whether a TCP port is currently in use.
pub trait PortProbe: Send + Sync {
    fn is_in_use(&self, port: u16) -> bool;
}

/// Probes by binding a loopback listener and dropping it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BindProbe;

impl PortProbe for BindProbe {
    fn is_in_use(&self, port: u16) -> bool {
        TcpListener::bind((Ipv4Addr::LOCALHOST, port)).is_err()
    }
}

/// Probes with `lsof -i :<port>`; a successful exit means something holds
/// the port.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandProbe;

impl PortProbe for CommandProbe {
    fn is_in_use(&self, port: u16) -> bool {
        Command::new("lsof")
            .arg("-i")
            .arg(format!(":{port}"))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

/// First free port from `start`, stepping by [`PORT_STEP`].
pub fn find_free_port(probe: &dyn PortProbe, start: u16) -> Result<u16> {
    let mut port = start;
    for attempt in 1..=MAX_PORT_ATTEMPTS {
        if !probe.is_in_use(port) {
            tracing::debug!("Selected port {} after {} probe(s)", port, attempt);
            return Ok(port);
        }
        tracing::debug!("Port {} is in use", port);

        port = match port.checked_add(PORT_STEP) {
            Some(next) => next,
            None => {
                return Err(PreviewError::NoFreePort {
                    start,
                    attempts: attempt,
                })
            },
        };
    }

    Err(PreviewError::NoFreePort {
        start,
        attempts: MAX_PORT_ATTEMPTS,
    })
}
