use crate::registers::{
    Address, ChipVariant, ComparatorMode, ComparatorQueue, Gain, Mode, SampleRate, DEFAULT_CONFIG,
};
use crate::scheduler::{Conversion, Timer};
use crate::threshold::Thresholds;

/// State of one configured ADC.
pub(crate) struct Device<T, F> {
    pub address: Address,
    pub chip: ChipVariant,
    pub gain: Gain,
    pub sample_rate: SampleRate,
    pub mode: Mode,
    pub queue: ComparatorQueue,
    pub comparator_mode: ComparatorMode,
    pub thresholds: Thresholds,
    /// Last value written to the config register.
    pub config: u16,
    pub conversion: Conversion<F>,
    pub timer: T,
}

impl<T: Timer, F> Device<T, F> {
    /// A device in its power-on state.
    pub fn new(address: Address, chip: ChipVariant, timer: T) -> Self {
        Self {
            address,
            chip,
            gain: Gain::FSR6v144,
            sample_rate: chip.default_sample_rate(),
            mode: Mode::SingleShot,
            queue: ComparatorQueue::Disabled,
            comparator_mode: ComparatorMode::Traditional,
            thresholds: Thresholds::UNSET,
            config: DEFAULT_CONFIG,
            conversion: Conversion::Idle,
            timer,
        }
    }

    /// ALERT/RDY is used as a conversion-ready signal rather than a voltage
    /// comparator.
    pub fn signals_ready(&self) -> bool {
        self.queue != ComparatorQueue::Disabled && self.thresholds.is_unset()
    }
}

/// One slot per valid bus address.
pub(crate) struct Registry<T, F> {
    slots: [Option<Device<T, F>>; 4],
}

impl<T: Timer, F> Registry<T, F> {
    pub fn new() -> Self {
        Self {
            slots: [None, None, None, None],
        }
    }

    /// Stores `device`, replacing whatever was set up at its address. A
    /// replaced device's timer is disarmed and its pending handler dropped.
    pub fn insert(&mut self, device: Device<T, F>) {
        let slot = &mut self.slots[device.address.index()];
        if let Some(mut old) = slot.replace(device) {
            old.timer.disarm();
        }
    }

    pub fn get_mut(&mut self, address: Address) -> Option<&mut Device<T, F>> {
        self.slots[address.index()]
            .as_mut()
            .filter(|device| device.address == address)
    }
}
