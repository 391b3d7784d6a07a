//! Request/reply service loop
//!
//! One loop owns the host link and every board peripheral. It waits for a
//! sync marker, reads and validates one request, runs its handler to
//! completion and sends the reply. Nothing else runs on the device.

mod handlers;
pub mod link;
pub mod passthrough;

use busside_hal::{HostLink, MonotonicClock, PinBank, SerialChannel, Watchdog};
use busside_protocol::{Frame, SequenceGate};

use crate::config::DeviceConfig;
use crate::discovery::LineCharacterizer;
use crate::traits::StatusIndicator;
use handlers::Action;
use link::{ReceiveError, SyncScanner};

pub use passthrough::PassthroughRequest;

/// Board peripherals handed to the service
pub struct Peripherals<B, S, C, W, I> {
    /// Candidate pins of the audited bus
    pub bank: B,
    /// Soft serial channel over the bank
    pub serial: S,
    pub clock: C,
    pub watchdog: W,
    pub indicator: I,
}

/// How one request was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Served {
    /// A reply was sent
    Replied,
    /// The handler chose not to reply
    Silent,
    /// The request never reached a handler
    Dropped(ReceiveError),
    /// Sequence number not newer than the last accepted one
    Stale,
    /// A bridge session ran and ended
    PassthroughEnded,
}

pub struct Service<'c, L, B, S, C, W, I> {
    link: L,
    bank: B,
    serial: S,
    clock: C,
    watchdog: W,
    indicator: I,
    config: &'c DeviceConfig,
    gate: SequenceGate,
    characterizer: LineCharacterizer<'c>,
}

impl<'c, L, B, S, C, W, I> Service<'c, L, B, S, C, W, I>
where
    L: HostLink,
    B: PinBank,
    S: SerialChannel<B>,
    C: MonotonicClock,
    W: Watchdog,
    I: StatusIndicator,
{
    pub fn new(link: L, peripherals: Peripherals<B, S, C, W, I>, config: &'c DeviceConfig) -> Self {
        Self {
            link,
            bank: peripherals.bank,
            serial: peripherals.serial,
            clock: peripherals.clock,
            watchdog: peripherals.watchdog,
            indicator: peripherals.indicator,
            config,
            gate: SequenceGate::new(),
            characterizer: LineCharacterizer::new(config),
        }
    }

    /// Serve requests forever
    ///
    /// After a passthrough session the device parks until it is reset.
    pub fn run(&mut self) -> ! {
        info!("service ready, {} candidate pins", self.bank.len());
        loop {
            self.wait_for_sync();
            if self.serve_request() == Served::PassthroughEnded {
                self.park();
            }
        }
    }

    /// Consume host bytes until a sync marker has been seen
    pub fn wait_for_sync(&mut self) {
        let mut scanner = SyncScanner::default();
        loop {
            self.watchdog.feed();
            self.indicator.poll(self.clock.now_us());
            if let Some(byte) = self.link.read_byte() {
                if scanner.push(byte) {
                    return;
                }
            }
        }
    }

    /// Receive, validate and handle the request following a sync marker
    pub fn serve_request(&mut self) -> Served {
        let request = match link::receive_frame(
            &mut self.link,
            &self.clock,
            &mut self.watchdog,
            self.config.link.header_timeout_ms,
        ) {
            Ok(frame) => frame,
            Err(err) => {
                warn!("request dropped: {:?}", err);
                return Served::Dropped(err);
            }
        };

        if !self.gate.accept(request.sequence) {
            debug!(
                "stale sequence {} (last {})",
                request.sequence,
                self.gate.last_accepted()
            );
            return Served::Stale;
        }

        self.watchdog.feed();
        let sequence = request.sequence;
        let action = self.dispatch(&request);
        drop(request);

        match action {
            Action::Reply(reply) => {
                self.send(reply, sequence);
                Served::Replied
            }
            Action::NoReply => Served::Silent,
            Action::Passthrough(reply, session) => {
                self.send(reply, sequence);
                let result = passthrough::bridge(
                    &mut self.link,
                    &mut self.bank,
                    &mut self.serial,
                    &mut self.watchdog,
                    &session,
                    &self.config.passthrough,
                );
                if result.is_err() {
                    warn!("passthrough: host link write failed");
                }
                Served::PassthroughEnded
            }
        }
    }

    fn send(&mut self, reply: Frame, sequence: u32) {
        if link::send_frame(&mut self.link, reply, sequence).is_err() {
            warn!("reply {} not sent", sequence);
        }
    }

    fn park(&mut self) -> ! {
        info!("bridge closed, waiting for reset");
        loop {
            self.watchdog.feed();
        }
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }
}
