//! Registers of the LED blinking IP core and the values they accept.

/// Named control registers of the LED blinking core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkRegister {
    Frequency,
    Direction,
}

impl BlinkRegister {
    pub fn name(self) -> &'static str {
        match self {
            BlinkRegister::Frequency => "frequency",
            BlinkRegister::Direction => "direction",
        }
    }
}

/// Blink frequency index, `0..=15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrequencyIndex(u8);

impl FrequencyIndex {
    pub const MAX: u8 = 15;

    pub fn new(index: u8) -> Option<Self> {
        (index <= Self::MAX).then_some(Self(index))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for FrequencyIndex {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(value)
    }
}

impl From<FrequencyIndex> for u32 {
    fn from(index: FrequencyIndex) -> Self {
        u32::from(index.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down = 0,
    Up = 1,
}

impl TryFrom<u32> for Direction {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::Down),
            1 => Ok(Direction::Up),
            other => Err(other),
        }
    }
}

impl From<Direction> for u32 {
    fn from(direction: Direction) -> Self {
        direction as u32
    }
}
