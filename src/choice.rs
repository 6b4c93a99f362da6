//! Single configurable attributes of a pin, and their typed values.

/// One configurable attribute of a pin with `N` options.
///
/// The current option is only changed through [`Choice::set`] (which respects
/// the enabled flags) or [`Choice::reset`]. Enabled flags are managed by the
/// owning [`Pin`](crate::Pin).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<const N: usize> {
    name: &'static str,
    options: [&'static str; N],
    default: usize,
    current: usize,
    enabled: [bool; N],
}

impl<const N: usize> Choice<N> {
    pub(crate) fn new(name: &'static str, options: [&'static str; N], default: u8) -> Self {
        let default = usize::from(default);
        assert!(default < N, "Reset value outside the option list.");
        Self {
            name,
            options,
            default,
            current: default,
            enabled: [true; N],
        }
    }

    /// Select option `index`.
    ///
    /// Out-of-range or disabled options are ignored.
    pub fn set(&mut self, index: usize) {
        if self.is_enabled(index) {
            self.current = index;
        }
    }

    /// Return to the reset option.
    pub fn reset(&mut self) {
        self.current = self.default;
    }

    /// Attribute name, e.g. "Mode".
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Option labels, in register encoding order.
    pub fn options(&self) -> &[&'static str; N] {
        &self.options
    }

    /// Index of the current option, equal to its register encoding.
    pub fn value(&self) -> usize {
        self.current
    }

    /// Index of the reset option.
    pub fn default_value(&self) -> usize {
        self.default
    }

    /// Label of the current option.
    pub fn label(&self) -> &'static str {
        self.options[self.current]
    }

    /// Whether option `index` exists and can currently be selected.
    pub fn is_enabled(&self, index: usize) -> bool {
        self.enabled.get(index).copied().unwrap_or(false)
    }

    /// Per-option enabled flags.
    pub fn enabled(&self) -> &[bool; N] {
        &self.enabled
    }

    pub(crate) fn enable_all(&mut self) {
        self.enabled = [true; N];
    }

    /// Disable every option and pin the current value to the reset option.
    pub(crate) fn lock_to_default(&mut self) {
        self.enabled = [false; N];
        self.current = self.default;
    }

    /// Enable only `index` and select it.
    pub(crate) fn force(&mut self, index: usize) {
        self.enabled = [false; N];
        self.enabled[index] = true;
        self.current = index;
    }
}

/// Type-erased view of a [`Choice`], for walking all of a pin's attributes.
pub trait AnyChoice {
    /// Attribute name.
    fn name(&self) -> &'static str;
    /// Option labels.
    fn options(&self) -> &[&'static str];
    /// Index of the current option.
    fn value(&self) -> usize;
    /// Whether option `index` can currently be selected.
    fn is_enabled(&self, index: usize) -> bool;
}

impl<const N: usize> AnyChoice for Choice<N> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn options(&self) -> &[&'static str] {
        &self.options
    }

    fn value(&self) -> usize {
        self.current
    }

    fn is_enabled(&self, index: usize) -> bool {
        Choice::is_enabled(self, index)
    }
}

/// Which of the four attributes of a GPIO pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceKind {
    /// Pin mode (MODER).
    Mode,
    /// Output speed (OSPEEDR).
    Speed,
    /// Output type (OTYPER).
    Type,
    /// Pull resistor (PUPDR).
    Resistor,
}

impl ChoiceKind {
    /// Every attribute, in flat-index order.
    pub const ALL: [ChoiceKind; 4] = [
        ChoiceKind::Mode,
        ChoiceKind::Speed,
        ChoiceKind::Type,
        ChoiceKind::Resistor,
    ];

    /// Number of options of this attribute.
    pub fn option_count(self) -> usize {
        match self {
            ChoiceKind::Mode => 4,
            ChoiceKind::Speed => 4,
            ChoiceKind::Type => 2,
            ChoiceKind::Resistor => 3,
        }
    }

    /// Flat index of option 0 of this attribute.
    pub fn flat_offset(self) -> usize {
        ChoiceKind::ALL
            .iter()
            .take_while(|&&k| k != self)
            .map(|k| k.option_count())
            .sum()
    }
}

/// GPIO pin mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Digital input (GPI).
    Input,
    /// Digital output (GPO).
    Output,
    /// Alternate function.
    Alternate,
    /// Analog (reset state of most lines).
    Analog,
}

#[doc(hidden)]
impl From<u8> for Mode {
    fn from(value: u8) -> Self {
        assert!(value <= 0b11, "Incorrect use of the from constructor.");
        match value {
            0b00 => Self::Input,
            0b01 => Self::Output,
            0b10 => Self::Alternate,
            0b11 => Self::Analog,
            _ => unreachable!("Precondition assert covers > 3."),
        }
    }
}

#[doc(hidden)]
impl From<Mode> for u8 {
    fn from(value: Mode) -> Self {
        match value {
            Mode::Input => 0b00,
            Mode::Output => 0b01,
            Mode::Alternate => 0b10,
            Mode::Analog => 0b11,
        }
    }
}

/// GPIO output speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    /// Low speed.
    Low,
    /// Medium speed.
    Medium,
    /// High speed.
    High,
    /// Very high speed.
    VeryHigh,
}

#[doc(hidden)]
impl From<u8> for Speed {
    fn from(value: u8) -> Self {
        assert!(value <= 0b11, "Incorrect use of the from constructor.");
        match value {
            0b00 => Self::Low,
            0b01 => Self::Medium,
            0b10 => Self::High,
            0b11 => Self::VeryHigh,
            _ => unreachable!("Precondition assert covers > 3."),
        }
    }
}

#[doc(hidden)]
impl From<Speed> for u8 {
    fn from(value: Speed) -> Self {
        match value {
            Speed::Low => 0b00,
            Speed::Medium => 0b01,
            Speed::High => 0b10,
            Speed::VeryHigh => 0b11,
        }
    }
}

/// GPIO output driver type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// Push-pull.
    PushPull,
    /// Open-drain.
    OpenDrain,
}

#[doc(hidden)]
impl From<u8> for OutputType {
    fn from(value: u8) -> Self {
        assert!(value <= 1, "Incorrect use of the from constructor.");
        if value == 0 {
            Self::PushPull
        } else {
            Self::OpenDrain
        }
    }
}

#[doc(hidden)]
impl From<OutputType> for u8 {
    fn from(value: OutputType) -> Self {
        match value {
            OutputType::PushPull => 0,
            OutputType::OpenDrain => 1,
        }
    }
}

/// GPIO pull resistor.
///
/// The fourth PUPDR encoding (0b11) is reserved and not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    /// No pull resistor.
    None,
    /// Pull-up.
    PullUp,
    /// Pull-down.
    PullDown,
}

#[doc(hidden)]
impl From<u8> for Pull {
    fn from(value: u8) -> Self {
        assert!(value <= 0b10, "Incorrect use of the from constructor.");
        match value {
            0b00 => Self::None,
            0b01 => Self::PullUp,
            0b10 => Self::PullDown,
            _ => unreachable!("Precondition assert covers > 2."),
        }
    }
}

#[doc(hidden)]
impl From<Pull> for u8 {
    fn from(value: Pull) -> Self {
        match value {
            Pull::None => 0b00,
            Pull::PullUp => 0b01,
            Pull::PullDown => 0b10,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn speed() -> Choice<4> {
        Choice::new("Speed", ["Low", "Med", "High", "Very High"], 1)
    }

    #[test]
    fn set_ignores_out_of_range() {
        let mut c = speed();
        c.set(4);
        assert_eq!(c.value(), 1);
        c.set(3);
        assert_eq!(c.value(), 3);
        assert_eq!(c.label(), "Very High");
    }

    #[test]
    fn set_ignores_disabled_options() {
        let mut c = speed();
        c.force(2);
        c.set(0);
        assert_eq!(c.value(), 2);
        assert_eq!(c.enabled(), &[false, false, true, false]);
    }

    #[test]
    fn reset_returns_to_default() {
        let mut c = speed();
        c.set(0);
        c.reset();
        assert_eq!(c.value(), c.default_value());
    }

    #[test]
    fn lock_to_default_disables_everything() {
        let mut c = speed();
        c.set(3);
        c.lock_to_default();
        assert_eq!(c.value(), 1);
        assert!((0..4).all(|i| !c.is_enabled(i)));
        c.enable_all();
        assert!((0..4).all(|i| c.is_enabled(i)));
    }

    #[test]
    fn flat_offsets() {
        assert_eq!(ChoiceKind::Mode.flat_offset(), 0);
        assert_eq!(ChoiceKind::Speed.flat_offset(), 4);
        assert_eq!(ChoiceKind::Type.flat_offset(), 8);
        assert_eq!(ChoiceKind::Resistor.flat_offset(), 10);
    }

    #[test]
    fn value_encodings() {
        for v in 0..4u8 {
            assert_eq!(u8::from(Mode::from(v)), v);
            assert_eq!(u8::from(Speed::from(v)), v);
        }
        for v in 0..3u8 {
            assert_eq!(u8::from(Pull::from(v)), v);
        }
        assert_eq!(OutputType::from(1), OutputType::OpenDrain);
    }
}
