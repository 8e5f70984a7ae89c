#![allow(clippy::upper_case_acronyms)]

use crate::Argument;

/// Config register value after a power-on or general-call reset.
pub const DEFAULT_CONFIG: u16 = 0x8583;

/// Represents the register pointers in the ADS1x15.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub(crate) enum Register {
    /// Conversion result (read-only, two's complement)
    Conversion = 0x00,
    /// Configuration register
    Config = 0x01,
    /// Comparator low threshold
    LoThresh = 0x02,
    /// Comparator high threshold
    HiThresh = 0x03,
}

/// Bit masks of the config register fields, MSB to LSB.
pub(crate) mod mask {
    pub const OS: u16 = 0x8000;
    pub const MUX: u16 = 0x7000;
    pub const PGA: u16 = 0x0E00;
    pub const MODE: u16 = 0x0100;
    pub const DR: u16 = 0x00E0;
    pub const COMP_MODE: u16 = 0x0010;
    pub const COMP_QUE: u16 = 0x0003;
}

/// Writing `OS` starts a single conversion; reading it reports "not busy".
const OS_SINGLE: u16 = 0x8000;
/// ALERT/RDY is driven low when active. Not configurable.
const COMP_POL_ACTIVE_LOW: u16 = 0x0000;
/// ALERT/RDY does not latch once asserted. Not configurable.
const COMP_LAT_NON_LATCHING: u16 = 0x0000;

/// Bus address, selected by what the ADDR pin is tied to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Address {
    Gnd = 0x48,
    Vdd = 0x49,
    Sda = 0x4A,
    Scl = 0x4B,
}

pub const ADDR_GND: Address = Address::Gnd;
pub const ADDR_VDD: Address = Address::Vdd;
pub const ADDR_SDA: Address = Address::Sda;
pub const ADDR_SCL: Address = Address::Scl;

impl Address {
    /// Slot of this address in the device table.
    pub(crate) fn index(self) -> usize {
        (self as u8 & 0x03) as usize
    }
}

impl TryFrom<u8> for Address {
    type Error = Argument;

    fn try_from(addr: u8) -> Result<Self, Self::Error> {
        match addr {
            0x48 => Ok(Address::Gnd),
            0x49 => Ok(Address::Vdd),
            0x4A => Ok(Address::Sda),
            0x4B => Ok(Address::Scl),
            _ => Err(Argument::Address),
        }
    }
}

/// The two supported members of the family.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum ChipVariant {
    /// 12-bit, up to 3300 SPS.
    Ads1015 = 15,
    /// 16-bit, up to 860 SPS.
    Ads1115 = 115,
}

impl ChipVariant {
    /// Sample rate selected by the power-on config (`DR = 0b100`).
    pub fn default_sample_rate(self) -> SampleRate {
        match self {
            ChipVariant::Ads1015 => SampleRate::SPS1600,
            ChipVariant::Ads1115 => SampleRate::SPS128,
        }
    }
}

impl TryFrom<u8> for ChipVariant {
    type Error = Argument;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            15 => Ok(ChipVariant::Ads1015),
            115 => Ok(ChipVariant::Ads1115),
            _ => Err(Argument::ChipVariant),
        }
    }
}

/// Input multiplexer selection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u16)]
pub enum Mux {
    /// AINP = AIN0, AINN = AIN1
    Diff01 = 0x0000,
    /// AINP = AIN0, AINN = AIN3
    Diff03 = 0x1000,
    /// AINP = AIN1, AINN = AIN3
    Diff13 = 0x2000,
    /// AINP = AIN2, AINN = AIN3
    Diff23 = 0x3000,
    /// AINP = AIN0, AINN = GND
    Single0 = 0x4000,
    /// AINP = AIN1, AINN = GND
    Single1 = 0x5000,
    /// AINP = AIN2, AINN = GND
    Single2 = 0x6000,
    /// AINP = AIN3, AINN = GND
    Single3 = 0x7000,
}

impl Mux {
    /// Single-ended inputs are measured against GND and cannot go negative.
    pub fn is_single_ended(self) -> bool {
        self as u16 & 0x4000 != 0
    }
}

impl TryFrom<u16> for Mux {
    type Error = Argument;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            0x0000 => Ok(Mux::Diff01),
            0x1000 => Ok(Mux::Diff03),
            0x2000 => Ok(Mux::Diff13),
            0x3000 => Ok(Mux::Diff23),
            0x4000 => Ok(Mux::Single0),
            0x5000 => Ok(Mux::Single1),
            0x6000 => Ok(Mux::Single2),
            0x7000 => Ok(Mux::Single3),
            _ => Err(Argument::Channel),
        }
    }
}

/// Programmable gain amplifier full-scale range.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u16)]
pub enum Gain {
    /// ±6.144 V (gain 2/3)
    FSR6v144 = 0x0000,
    /// ±4.096 V (gain 1)
    FSR4v096 = 0x0200,
    /// ±2.048 V (gain 2)
    FSR2v048 = 0x0400,
    /// ±1.024 V (gain 4)
    FSR1v024 = 0x0600,
    /// ±0.512 V (gain 8)
    FSR0v512 = 0x0800,
    /// ±0.256 V (gain 16)
    FSR0v256 = 0x0A00,
}

impl Gain {
    /// Size of one code step in millivolts.
    pub fn lsb_millivolts(self) -> f64 {
        match self {
            Gain::FSR6v144 => 0.1875,
            Gain::FSR4v096 => 0.125,
            Gain::FSR2v048 => 0.0625,
            Gain::FSR1v024 => 0.031_25,
            Gain::FSR0v512 => 0.015_625,
            Gain::FSR0v256 => 0.007_812_5,
        }
    }

    /// Full-scale range in millivolts.
    pub fn full_scale_millivolts(self) -> i16 {
        match self {
            Gain::FSR6v144 => 6144,
            Gain::FSR4v096 => 4096,
            Gain::FSR2v048 => 2048,
            Gain::FSR1v024 => 1024,
            Gain::FSR0v512 => 512,
            Gain::FSR0v256 => 256,
        }
    }

    /// Converts a raw conversion code to millivolts.
    pub fn code_to_millivolts(self, raw: i16) -> f64 {
        f64::from(raw) * self.lsb_millivolts()
    }

    /// Converts millivolts to a raw code, truncating toward zero.
    ///
    /// Fails for magnitudes at or beyond the full-scale range and for negative
    /// values on a single-ended input.
    pub fn millivolts_to_code(self, channel: Mux, millivolts: i16) -> Result<i16, RangeError> {
        let full_scale = self.full_scale_millivolts();
        if millivolts >= full_scale
            || millivolts <= -full_scale
            || (millivolts < 0 && channel.is_single_ended())
        {
            return Err(RangeError);
        }
        Ok((f64::from(millivolts) / self.lsb_millivolts()) as i16)
    }
}

impl TryFrom<u16> for Gain {
    type Error = Argument;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            0x0000 => Ok(Gain::FSR6v144),
            0x0200 => Ok(Gain::FSR4v096),
            0x0400 => Ok(Gain::FSR2v048),
            0x0600 => Ok(Gain::FSR1v024),
            0x0800 => Ok(Gain::FSR0v512),
            0x0A00 => Ok(Gain::FSR0v256),
            _ => Err(Argument::Gain),
        }
    }
}

/// A millivolt value cannot be represented at the selected gain and input.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct RangeError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u16)]
pub enum Mode {
    Continuous = 0x0000,
    /// Power-down single-shot mode.
    SingleShot = 0x0100,
}

impl TryFrom<u16> for Mode {
    type Error = Argument;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            0x0000 => Ok(Mode::Continuous),
            0x0100 => Ok(Mode::SingleShot),
            _ => Err(Argument::Mode),
        }
    }
}

/// Data rates of both variants. Which ones are valid depends on the
/// [`ChipVariant`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SampleRate {
    SPS8,
    SPS16,
    SPS32,
    SPS64,
    SPS128,
    SPS250,
    SPS475,
    SPS490,
    SPS860,
    SPS920,
    SPS1600,
    SPS2400,
    SPS3300,
}

impl SampleRate {
    pub fn samples_per_second(self) -> u16 {
        match self {
            SampleRate::SPS8 => 8,
            SampleRate::SPS16 => 16,
            SampleRate::SPS32 => 32,
            SampleRate::SPS64 => 64,
            SampleRate::SPS128 => 128,
            SampleRate::SPS250 => 250,
            SampleRate::SPS475 => 475,
            SampleRate::SPS490 => 490,
            SampleRate::SPS860 => 860,
            SampleRate::SPS920 => 920,
            SampleRate::SPS1600 => 1600,
            SampleRate::SPS2400 => 2400,
            SampleRate::SPS3300 => 3300,
        }
    }

    /// Pre-shifted `DR` field for the given chip.
    pub fn register_bits(self, chip: ChipVariant) -> Result<u16, Argument> {
        let bits = match chip {
            ChipVariant::Ads1115 => match self {
                SampleRate::SPS8 => 0x00,
                SampleRate::SPS16 => 0x20,
                SampleRate::SPS32 => 0x40,
                SampleRate::SPS64 => 0x60,
                SampleRate::SPS128 => 0x80,
                SampleRate::SPS250 => 0xA0,
                SampleRate::SPS475 => 0xC0,
                SampleRate::SPS860 => 0xE0,
                _ => return Err(Argument::SampleRate),
            },
            ChipVariant::Ads1015 => match self {
                SampleRate::SPS128 => 0x00,
                SampleRate::SPS250 => 0x20,
                SampleRate::SPS490 => 0x40,
                SampleRate::SPS920 => 0x60,
                SampleRate::SPS1600 => 0x80,
                SampleRate::SPS2400 => 0xA0,
                SampleRate::SPS3300 => 0xC0,
                _ => return Err(Argument::SampleRate),
            },
        };
        Ok(bits)
    }

    /// Time to wait for a single conversion to finish.
    pub fn conversion_time_ms(self) -> u32 {
        match self {
            SampleRate::SPS8 => 150,
            SampleRate::SPS16 => 75,
            SampleRate::SPS32 => 35,
            SampleRate::SPS64 => 20,
            SampleRate::SPS128 => 10,
            SampleRate::SPS250 => 5,
            SampleRate::SPS475 | SampleRate::SPS490 => 3,
            SampleRate::SPS860 | SampleRate::SPS920 => 2,
            SampleRate::SPS1600 | SampleRate::SPS2400 | SampleRate::SPS3300 => 1,
        }
    }
}

impl TryFrom<u16> for SampleRate {
    type Error = Argument;

    fn try_from(samples_per_second: u16) -> Result<Self, Self::Error> {
        match samples_per_second {
            8 => Ok(SampleRate::SPS8),
            16 => Ok(SampleRate::SPS16),
            32 => Ok(SampleRate::SPS32),
            64 => Ok(SampleRate::SPS64),
            128 => Ok(SampleRate::SPS128),
            250 => Ok(SampleRate::SPS250),
            475 => Ok(SampleRate::SPS475),
            490 => Ok(SampleRate::SPS490),
            860 => Ok(SampleRate::SPS860),
            920 => Ok(SampleRate::SPS920),
            1600 => Ok(SampleRate::SPS1600),
            2400 => Ok(SampleRate::SPS2400),
            3300 => Ok(SampleRate::SPS3300),
            _ => Err(Argument::SampleRate),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u16)]
pub enum ComparatorMode {
    /// Traditional comparator with hysteresis.
    Traditional = 0x0000,
    Window = 0x0010,
}

impl TryFrom<u16> for ComparatorMode {
    type Error = Argument;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            0x0000 => Ok(ComparatorMode::Traditional),
            0x0010 => Ok(ComparatorMode::Window),
            _ => Err(Argument::ComparatorMode),
        }
    }
}

/// Number of conversions beyond threshold before ALERT/RDY asserts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u16)]
pub enum ComparatorQueue {
    One = 0x0000,
    Two = 0x0001,
    Four = 0x0002,
    /// Comparator off, ALERT/RDY high-impedance.
    Disabled = 0x0003,
}

impl TryFrom<u16> for ComparatorQueue {
    type Error = Argument;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            0x0000 => Ok(ComparatorQueue::One),
            0x0001 => Ok(ComparatorQueue::Two),
            0x0002 => Ok(ComparatorQueue::Four),
            0x0003 => Ok(ComparatorQueue::Disabled),
            _ => Err(Argument::ComparatorQueue),
        }
    }
}

/// Fields of the config register.
///
/// Comparator polarity is always active-low and the comparator never latches,
/// so neither is represented here.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Config {
    /// On write, start a single conversion. On read, the device is idle.
    pub start: bool,
    pub mux: Mux,
    pub gain: Gain,
    pub mode: Mode,
    /// Pre-shifted `DR` bits; their meaning depends on the chip variant.
    pub data_rate: u16,
    pub comparator_mode: ComparatorMode,
    pub queue: ComparatorQueue,
}

impl Config {
    pub fn bits(&self) -> u16 {
        let os = if self.start { OS_SINGLE } else { 0 };
        os | self.mux as u16
            | self.gain as u16
            | self.mode as u16
            | (self.data_rate & mask::DR)
            | self.comparator_mode as u16
            | COMP_POL_ACTIVE_LOW
            | COMP_LAT_NON_LATCHING
            | self.queue as u16
    }

    pub fn from_bits(bits: u16) -> Self {
        let mux = match bits & mask::MUX {
            0x0000 => Mux::Diff01,
            0x1000 => Mux::Diff03,
            0x2000 => Mux::Diff13,
            0x3000 => Mux::Diff23,
            0x4000 => Mux::Single0,
            0x5000 => Mux::Single1,
            0x6000 => Mux::Single2,
            _ => Mux::Single3,
        };
        let gain = match bits & mask::PGA {
            0x0000 => Gain::FSR6v144,
            0x0200 => Gain::FSR4v096,
            0x0400 => Gain::FSR2v048,
            0x0600 => Gain::FSR1v024,
            0x0800 => Gain::FSR0v512,
            // 0x0A00, 0x0C00 and 0x0E00 all select ±0.256 V.
            _ => Gain::FSR0v256,
        };
        let mode = if bits & mask::MODE != 0 {
            Mode::SingleShot
        } else {
            Mode::Continuous
        };
        let comparator_mode = if bits & mask::COMP_MODE != 0 {
            ComparatorMode::Window
        } else {
            ComparatorMode::Traditional
        };
        let queue = match bits & mask::COMP_QUE {
            0x0000 => ComparatorQueue::One,
            0x0001 => ComparatorQueue::Two,
            0x0002 => ComparatorQueue::Four,
            _ => ComparatorQueue::Disabled,
        };
        Self {
            start: bits & mask::OS != 0,
            mux,
            gain,
            mode,
            data_rate: bits & mask::DR,
            comparator_mode,
            queue,
        }
    }
}
