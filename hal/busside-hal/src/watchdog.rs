//! Hardware watchdog abstraction

/// Watchdog that resets the device unless periodically fed
///
/// Every loop that can outlast the watchdog period must call
/// [`Watchdog::feed`] on a path that is not its innermost polling step.
pub trait Watchdog {
    /// Acknowledge the watchdog, restarting its countdown
    fn feed(&mut self);
}

impl<W: Watchdog + ?Sized> Watchdog for &mut W {
    fn feed(&mut self) {
        (**self).feed();
    }
}
