use core::mem;

/// Platform one-shot timer owned by a device.
///
/// When an armed timer expires the event loop must call
/// [`Ads1x15::on_timer`](crate::Ads1x15::on_timer) for the device it belongs to.
pub trait Timer {
    /// Arms the timer to fire once after `ms` milliseconds.
    fn arm(&mut self, ms: u32);
    /// Disarms the timer. Disarming an idle timer is a no-op.
    fn disarm(&mut self);
}

/// Free-running platform clock.
pub trait Clock {
    /// Microseconds since an arbitrary epoch, wrapping on overflow.
    fn now_us(&self) -> u32;
}

/// Result of starting a conversion.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Trigger {
    /// ALERT/RDY signals completion. `timestamp` is when the conversion was
    /// started, in microseconds wrapped to 31 bits.
    Started { timestamp: i32 },
    /// The completion handler runs after `wait_ms`, once the timer fires.
    Scheduled { wait_ms: u32 },
}

/// Conversion state of a single device.
pub(crate) enum Conversion<F> {
    Idle,
    Waiting(F),
}

impl<F> Conversion<F> {
    /// Starts waiting on `handler`. Returns the handler of a conversion that
    /// was still pending; it is cancelled and must not be called.
    pub(crate) fn begin(&mut self, handler: F) -> Option<F> {
        match mem::replace(self, Conversion::Waiting(handler)) {
            Conversion::Waiting(cancelled) => Some(cancelled),
            Conversion::Idle => None,
        }
    }

    /// Returns to idle, handing back the handler to deliver to.
    pub(crate) fn finish(&mut self) -> Option<F> {
        match mem::replace(self, Conversion::Idle) {
            Conversion::Waiting(handler) => Some(handler),
            Conversion::Idle => None,
        }
    }

    pub(crate) fn is_waiting(&self) -> bool {
        matches!(self, Conversion::Waiting(_))
    }
}

/// Start time reported by [`Trigger::Started`].
pub(crate) fn timestamp(now_us: u32) -> i32 {
    (now_us & 0x7FFF_FFFF) as i32
}
