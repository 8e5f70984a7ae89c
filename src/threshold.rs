use crate::registers::{ComparatorMode, ComparatorQueue, Gain, Mux};
use crate::Argument;

/// Raw comparator threshold codes as written to `Lo_thresh` and `Hi_thresh`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Thresholds {
    pub low: i16,
    pub high: i16,
}

impl Thresholds {
    /// No comparator thresholds configured. Written to the device, this pair
    /// turns ALERT/RDY into a conversion-ready output.
    pub const UNSET: Thresholds = Thresholds {
        low: 0x7FFF,
        high: i16::MIN,
    };

    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }
}

/// Comparator bounds in millivolts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ThresholdMillivolts {
    pub low: i16,
    pub high: i16,
    /// Defaults to [`ComparatorMode::Traditional`].
    pub mode: Option<ComparatorMode>,
}

/// Use of the ALERT/RDY pin.
///
/// Without thresholds the pin signals conversion-ready; with thresholds it
/// is a voltage comparator output.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Comparator {
    /// Must not be [`ComparatorQueue::Disabled`].
    pub queue: ComparatorQueue,
    pub thresholds: Option<ThresholdMillivolts>,
}

/// Comparator fields resolved for a device.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Calibration {
    pub queue: ComparatorQueue,
    pub thresholds: Thresholds,
    pub mode: ComparatorMode,
}

impl Calibration {
    /// Comparator off.
    pub const DISABLED: Calibration = Calibration {
        queue: ComparatorQueue::Disabled,
        thresholds: Thresholds::UNSET,
        mode: ComparatorMode::Traditional,
    };
}

/// Validates the comparator request and converts its bounds to raw codes for
/// the given gain and input.
pub(crate) fn calibrate(
    gain: Gain,
    channel: Mux,
    comparator: Option<Comparator>,
) -> Result<Calibration, Argument> {
    let Some(comparator) = comparator else {
        return Ok(Calibration::DISABLED);
    };
    if comparator.queue == ComparatorQueue::Disabled {
        return Err(Argument::ComparatorQueue);
    }

    let Some(bounds) = comparator.thresholds else {
        return Ok(Calibration {
            queue: comparator.queue,
            ..Calibration::DISABLED
        });
    };

    // Ordering is checked on the millivolt inputs, before conversion.
    if bounds.low > bounds.high {
        return Err(Argument::ThresholdOrder);
    }
    let low = gain
        .millivolts_to_code(channel, bounds.low)
        .map_err(|_| Argument::ThresholdLow)?;
    let high = gain
        .millivolts_to_code(channel, bounds.high)
        .map_err(|_| Argument::ThresholdHigh)?;

    Ok(Calibration {
        queue: comparator.queue,
        thresholds: Thresholds { low, high },
        mode: bounds.mode.unwrap_or(ComparatorMode::Traditional),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_comparator() {
        assert_eq!(
            calibrate(Gain::FSR2v048, Mux::Diff01, None),
            Ok(Calibration::DISABLED)
        );
    }

    #[test]
    fn test_conversion_ready() {
        let comparator = Comparator {
            queue: ComparatorQueue::Four,
            thresholds: None,
        };
        let calibration = calibrate(Gain::FSR2v048, Mux::Single0, Some(comparator)).unwrap();
        assert_eq!(calibration.queue, ComparatorQueue::Four);
        assert!(calibration.thresholds.is_unset());
        assert_eq!(calibration.mode, ComparatorMode::Traditional);
    }

    #[test]
    fn test_disabled_queue_rejected() {
        let comparator = Comparator {
            queue: ComparatorQueue::Disabled,
            thresholds: None,
        };
        assert_eq!(
            calibrate(Gain::FSR2v048, Mux::Diff01, Some(comparator)),
            Err(Argument::ComparatorQueue)
        );
    }

    #[test]
    fn test_window_thresholds() {
        let comparator = Comparator {
            queue: ComparatorQueue::One,
            thresholds: Some(ThresholdMillivolts {
                low: -1000,
                high: 1500,
                mode: Some(ComparatorMode::Window),
            }),
        };
        assert_eq!(
            calibrate(Gain::FSR4v096, Mux::Diff13, Some(comparator)),
            Ok(Calibration {
                queue: ComparatorQueue::One,
                thresholds: Thresholds {
                    low: -8000,
                    high: 12000
                },
                mode: ComparatorMode::Window,
            })
        );
    }

    #[test]
    fn test_threshold_order() {
        let comparator = Comparator {
            queue: ComparatorQueue::One,
            thresholds: Some(ThresholdMillivolts {
                low: 1000,
                high: -1000,
                mode: None,
            }),
        };
        assert_eq!(
            calibrate(Gain::FSR6v144, Mux::Diff01, Some(comparator)),
            Err(Argument::ThresholdOrder)
        );
    }

    #[test]
    fn test_threshold_range() {
        let bounds = |low, high| {
            Some(Comparator {
                queue: ComparatorQueue::Two,
                thresholds: Some(ThresholdMillivolts {
                    low,
                    high,
                    mode: None,
                }),
            })
        };

        // Negative bound on a single-ended input.
        assert_eq!(
            calibrate(Gain::FSR2v048, Mux::Single1, bounds(-10, 100)),
            Err(Argument::ThresholdLow)
        );
        // High bound at full scale.
        assert_eq!(
            calibrate(Gain::FSR0v256, Mux::Diff01, bounds(0, 256)),
            Err(Argument::ThresholdHigh)
        );
        assert_eq!(
            calibrate(Gain::FSR0v256, Mux::Diff01, bounds(-300, 0)),
            Err(Argument::ThresholdLow)
        );
    }
}
