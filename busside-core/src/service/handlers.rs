//! Command handlers
//!
//! Each handler turns a request into an [`Action`]. Malformed arguments and
//! commands this build does not implement produce no reply; the host times
//! out.

use busside_hal::{HostLink, MonotonicClock, Parity, PinBank, SerialChannel, Watchdog};
use busside_protocol::{Args, Command, Frame, FrameError, ReplyBuilder, NOT_FOUND};

use super::passthrough::PassthroughRequest;
use super::Service;
use crate::discovery::{discover_tx, ActivityMonitor, LineReport};
use crate::traits::StatusIndicator;

/// Pin argument meaning "no pin"
const NO_PIN: u32 = 255;

/// What the service does after a handler ran
#[derive(Debug)]
pub(crate) enum Action {
    Reply(Frame),
    NoReply,
    /// Send the reply, then bridge
    Passthrough(Frame, PassthroughRequest),
}

fn parity_word(parity: Parity) -> u32 {
    match parity {
        Parity::Even => 0,
        Parity::Odd => 1,
        Parity::None => 2,
    }
}

/// `[data bits, stop bits, parity, baud]`, zeroed when inconclusive
fn push_line(reply: &mut ReplyBuilder, report: &LineReport) -> Result<(), FrameError> {
    match report.outcome {
        Ok(settings) => {
            reply.push(u32::from(settings.shape.data_bits))?;
            reply.push(u32::from(settings.shape.stop_bits.count()))?;
            reply.push(parity_word(settings.shape.parity))?;
            reply.push(settings.baud)
        }
        Err(_) => {
            reply.push(0)?;
            reply.push(0)?;
            reply.push(parity_word(Parity::None))?;
            reply.push(0)
        }
    }
}

impl<L, B, S, C, W, I> Service<'_, L, B, S, C, W, I>
where
    L: HostLink,
    B: PinBank,
    S: SerialChannel<B>,
    C: MonotonicClock,
    W: Watchdog,
    I: StatusIndicator,
{
    pub(crate) fn dispatch(&mut self, request: &Frame) -> Action {
        let Some(command) = Command::from_tag(request.command) else {
            debug!("unknown command {}", request.command);
            return Action::NoReply;
        };
        let args = Args::new(&request.payload);

        let result = match command {
            Command::Echo => self.echo(request),
            Command::LedBlink => self.led_blink(command, args),
            Command::UartLineSettings => self.line_settings(command, args),
            Command::UartLineSettingsAll => self.all_line_settings(command),
            Command::UartDataDiscover => self.data_discover(command),
            Command::UartTxDiscover => self.tx_discover(command, args),
            Command::UartPassthrough => self.passthrough(command, args),
            other => {
                debug!("{:?} not supported", other);
                Ok(Action::NoReply)
            }
        };

        result.unwrap_or_else(|err| {
            warn!("reply for {:?} dropped: {:?}", command, err);
            Action::NoReply
        })
    }

    fn echo(&mut self, request: &Frame) -> Result<Action, FrameError> {
        let mut payload = Frame::alloc_payload(request.payload.len())?;
        payload.copy_from_slice(&request.payload);
        Ok(Action::Reply(Frame::new(request.command, payload)))
    }

    fn led_blink(&mut self, command: Command, args: Args<'_>) -> Result<Action, FrameError> {
        let Some(interval_ms) = args.get(0) else {
            return Ok(Action::NoReply);
        };
        self.indicator.set_interval_ms(interval_ms, self.clock.now_us());

        let mut reply = ReplyBuilder::with_words(1)?;
        reply.push(interval_ms)?;
        Ok(Action::Reply(reply.into_frame(command.tag())))
    }

    fn line_settings(&mut self, command: Command, args: Args<'_>) -> Result<Action, FrameError> {
        let Some(pin) = args.get(0) else {
            return Ok(Action::NoReply);
        };
        let report = self
            .characterizer
            .line_settings(&mut self.bank, pin as usize, &self.clock, &mut self.watchdog);

        let mut reply = ReplyBuilder::with_words(6)?;
        reply.push_status(report.outcome.err().map_or(0, |err| err.code()))?;
        reply.push(report.toggles)?;
        push_line(&mut reply, &report)?;
        Ok(Action::Reply(reply.into_frame(command.tag())))
    }

    fn all_line_settings(&mut self, command: Command) -> Result<Action, FrameError> {
        let reports = self
            .characterizer
            .all_line_settings(&mut self.bank, &self.clock, &mut self.watchdog);

        let mut reply = ReplyBuilder::with_words(reports.len() * 5)?;
        for report in reports.iter() {
            reply.push(report.toggles)?;
            push_line(&mut reply, report)?;
        }
        Ok(Action::Reply(reply.into_frame(command.tag())))
    }

    fn data_discover(&mut self, command: Command) -> Result<Action, FrameError> {
        let activity = &self.config.activity;
        let mut monitor = ActivityMonitor::all(&self.bank);
        monitor.run(
            &mut self.bank,
            &self.clock,
            &mut self.watchdog,
            u64::from(activity.window_ms) * 1000,
            u64::from(activity.feed_interval_ms) * 1000,
        );

        let mut reply = ReplyBuilder::with_words(monitor.iter().count())?;
        for (_, toggles) in monitor.iter() {
            reply.push(toggles)?;
        }
        Ok(Action::Reply(reply.into_frame(command.tag())))
    }

    fn tx_discover(&mut self, command: Command, args: Args<'_>) -> Result<Action, FrameError> {
        let (Some(rx), Some(baud)) = (args.get(0), args.get(1)) else {
            return Ok(Action::NoReply);
        };
        let found = discover_tx(
            &mut self.bank,
            &mut self.serial,
            &self.clock,
            &mut self.watchdog,
            rx as usize,
            baud,
            &self.config.tx_probe,
        );

        let mut reply = ReplyBuilder::with_words(1)?;
        reply.push(found.map_or(NOT_FOUND, |pin| pin as u32))?;
        Ok(Action::Reply(reply.into_frame(command.tag())))
    }

    fn passthrough(&mut self, command: Command, args: Args<'_>) -> Result<Action, FrameError> {
        let (Some(rx), Some(tx), Some(baud)) = (args.get(0), args.get(1), args.get(2)) else {
            return Ok(Action::NoReply);
        };
        if !self.bank.contains(rx as usize) || baud == 0 {
            debug!("passthrough: rx {} baud {} rejected", rx, baud);
            return Ok(Action::NoReply);
        }
        let tx = (tx != NO_PIN && self.bank.contains(tx as usize)).then_some(tx as usize);

        let mut reply = ReplyBuilder::with_words(3)?;
        reply.push(rx)?;
        reply.push(tx.map_or(NO_PIN, |pin| pin as u32))?;
        reply.push(baud)?;
        let session = PassthroughRequest {
            rx: rx as usize,
            tx,
            baud,
        };
        Ok(Action::Passthrough(reply.into_frame(command.tag()), session))
    }
}
