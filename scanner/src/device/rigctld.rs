// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

//! Client for the hamlib `rigctld` line protocol.
//!
//! Each command is one line; set commands answer `RPRT <code>` and get
//! commands answer with the value on its own line (or `RPRT <code>` on error).

// STD LIB
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

// THIRD PARTY CRATES
use tracing::{debug, info, trace, warn};

// LOCAL CRATE
use shared::{Freq, Mode};

use crate::device::{DeviceError, RigControl};

pub const DEFAULT_RIGCTLD_ADDR: &str = "127.0.0.1:4532";

struct Link {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

/// Talks to a `rigctld` daemon over TCP.
///
/// The link is opened on first use and dropped after any transport failure;
/// the next call reconnects, so a rig that goes away and comes back does not
/// need a restart.
pub struct RigctldClient {
    addr: String,
    timeout: Duration,
    link: Option<Link>,
}

impl RigctldClient {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
            link: None,
        }
    }

    #[cfg(test)]
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Open the link now instead of on first use.
    pub fn connect(&mut self) -> Result<(), DeviceError> {
        self.link()?;
        Ok(())
    }

    /// One-off setup pushed once at startup. Failures are logged and ignored.
    pub fn prepare(&mut self, tuning_step: u64) {
        if let Err(e) = self.connect() {
            warn!(addr = %self.addr, "Rig not reachable yet, will keep trying: {e}");
            return;
        }
        info!("Rig link to {} opened ok", self.addr);
        if let Err(e) = self.set_tuning_step(tuning_step) {
            warn!("rig_set_ts: error = {e}");
        }
    }

    pub fn set_tuning_step(&mut self, hz: u64) -> Result<(), DeviceError> {
        self.command(&format!("N {hz}"))
    }

    fn link(&mut self) -> Result<&mut Link, DeviceError> {
        if self.link.is_none() {
            self.link = Some(self.open()?);
        }
        self.link
            .as_mut()
            .ok_or_else(|| DeviceError::NotPresent(self.addr.clone()))
    }

    fn open(&self) -> Result<Link, DeviceError> {
        let addr = self
            .addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| DeviceError::NotPresent(format!("cannot resolve {}", self.addr)))?;
        debug!("Connecting to rigctld at {addr}");

        let stream = TcpStream::connect_timeout(&addr, self.timeout)?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;
        stream.set_nodelay(true)?;

        Ok(Link {
            reader: BufReader::new(stream.try_clone()?),
            writer: stream,
        })
    }

    /// Send one command line and read one reply line.
    fn transact(&mut self, cmd: &str) -> Result<String, DeviceError> {
        let result = self.try_transact(cmd);
        if let Err(e) = &result {
            if e.breaks_link() {
                debug!("Dropping rig link after error: {e}");
                self.link = None;
            }
        }
        result
    }

    fn try_transact(&mut self, cmd: &str) -> Result<String, DeviceError> {
        let link = self.link()?;
        trace!("rigctld <- {cmd}");
        link.writer.write_all(format!("{cmd}\n").as_bytes())?;
        link.writer.flush()?;

        let mut reply = String::new();
        if link.reader.read_line(&mut reply)? == 0 {
            return Err(DeviceError::NotPresent("rigctld closed the connection".into()));
        }
        let reply = reply.trim().to_string();
        trace!("rigctld -> {reply}");
        Ok(reply)
    }

    fn command(&mut self, cmd: &str) -> Result<(), DeviceError> {
        let reply = self.transact(cmd)?;
        match parse_rprt(&reply) {
            Some(0) => Ok(()),
            Some(code) => Err(DeviceError::Rejected(code)),
            None => Err(DeviceError::BadResponse(reply)),
        }
    }
}

impl RigControl for RigctldClient {
    fn tune(&mut self, freq: Freq) -> Result<(), DeviceError> {
        self.command(&format!("F {}", *freq))
    }

    fn set_mode(&mut self, mode: Mode) -> Result<(), DeviceError> {
        // Passband 0 asks hamlib for the mode's normal width.
        self.command(&format!("M {} 0", mode_token(mode)))
    }

    fn measure_strength(&mut self) -> Result<i32, DeviceError> {
        let reply = self.transact("l STRENGTH")?;
        if let Some(code) = parse_rprt(&reply) {
            return Err(DeviceError::Rejected(code));
        }
        reply
            .parse::<i32>()
            .map_err(|_| DeviceError::BadResponse(reply))
    }
}

fn mode_token(mode: Mode) -> &'static str {
    match mode {
        Mode::NarrowFm => "FM",
        Mode::WideFm => "WFM",
    }
}

fn parse_rprt(reply: &str) -> Option<i32> {
    reply.strip_prefix("RPRT")?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Fake `rigctld` that answers each received line from a script and
    /// reports the lines it saw. Closes the connection when the script ends.
    fn fake_rigctld(script: Vec<&'static str>) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let (seen_tx, seen_rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut writer = stream.try_clone().unwrap();
            let mut reader = BufReader::new(stream);
            for reply in script {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 {
                    return;
                }
                seen_tx.send(line.trim().to_string()).unwrap();
                writer.write_all(format!("{reply}\n").as_bytes()).unwrap();
            }
        });

        (addr, seen_rx)
    }

    fn client(addr: &str) -> RigctldClient {
        RigctldClient::new(addr, Duration::from_secs(2))
    }

    #[test]
    fn test_tune_and_mode_commands() {
        let (addr, seen) = fake_rigctld(vec!["RPRT 0", "RPRT 0", "RPRT 0"]);
        let mut rig = client(&addr);

        rig.tune(Freq::new(103_000_000)).unwrap();
        rig.set_mode(Mode::WideFm).unwrap();
        rig.set_mode(Mode::NarrowFm).unwrap();

        assert_eq!(seen.recv().unwrap(), "F 103000000");
        assert_eq!(seen.recv().unwrap(), "M WFM 0");
        assert_eq!(seen.recv().unwrap(), "M FM 0");
    }

    #[test]
    fn test_measure_strength() {
        let (addr, seen) = fake_rigctld(vec!["-51", "RPRT -11", "garbage"]);
        let mut rig = client(&addr);

        assert_eq!(rig.measure_strength().unwrap(), -51);
        assert!(matches!(rig.measure_strength(), Err(DeviceError::Rejected(-11))));
        assert!(matches!(rig.measure_strength(), Err(DeviceError::BadResponse(_))));
        assert_eq!(seen.recv().unwrap(), "l STRENGTH");
        // A protocol level failure keeps the link.
        assert!(rig.is_connected());
    }

    #[test]
    fn test_rejected_set_command() {
        let (addr, _seen) = fake_rigctld(vec!["RPRT -1"]);
        let mut rig = client(&addr);
        assert!(matches!(
            rig.tune(Freq::new(1)),
            Err(DeviceError::Rejected(-1))
        ));
    }

    #[test]
    fn test_closed_connection_drops_link() {
        let (addr, _seen) = fake_rigctld(vec!["RPRT 0"]);
        let mut rig = client(&addr);

        rig.tune(Freq::new(88_000_000)).unwrap();
        assert!(rig.is_connected());

        let err = rig.tune(Freq::new(88_100_000)).unwrap_err();
        assert!(err.breaks_link(), "unexpected error {err:?}");
        assert!(!rig.is_connected());
    }

    #[test]
    fn test_missing_daemon_is_not_fatal() {
        // Bind then drop to get a port nothing listens on.
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .to_string();
        let mut rig = client(&addr);

        assert!(rig.measure_strength().is_err());
        assert!(!rig.is_connected());
        rig.prepare(6250);
        assert!(!rig.is_connected());
    }

    #[test]
    fn test_prepare_pushes_tuning_step() {
        let (addr, seen) = fake_rigctld(vec!["RPRT 0", "RPRT 0"]);
        let mut rig = client(&addr);

        rig.prepare(6250);
        assert!(rig.is_connected());
        assert_eq!(seen.recv().unwrap(), "N 6250");

        rig.tune(Freq::new(103_000_000)).unwrap();
        assert_eq!(seen.recv().unwrap(), "F 103000000");
    }

    #[test]
    fn test_parse_rprt() {
        assert_eq!(parse_rprt("RPRT 0"), Some(0));
        assert_eq!(parse_rprt("RPRT -8"), Some(-8));
        assert_eq!(parse_rprt("-51"), None);
    }
}
