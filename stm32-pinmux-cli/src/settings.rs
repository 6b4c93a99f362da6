use std::str::FromStr;

use stm32_pinmux::{Mode, OutputType, Pin, Pull, Speed};

/// One change to a pin, applied through the pin's mutation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SettingItem {
    Mode(Mode),
    Speed(Speed),
    Type(OutputType),
    Pull(Pull),
    AltFunction(u8),
    Reset,
}

impl FromStr for SettingItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let item = match s.to_ascii_lowercase().as_str() {
            "input" | "in" | "gpi" => Self::Mode(Mode::Input),
            "output" | "out" | "gpo" => Self::Mode(Mode::Output),
            "alternate" | "alt" => Self::Mode(Mode::Alternate),
            "analog" => Self::Mode(Mode::Analog),
            "low" => Self::Speed(Speed::Low),
            "medium" | "med" => Self::Speed(Speed::Medium),
            "high" => Self::Speed(Speed::High),
            "very-high" => Self::Speed(Speed::VeryHigh),
            "push-pull" | "pp" => Self::Type(OutputType::PushPull),
            "open-drain" | "od" => Self::Type(OutputType::OpenDrain),
            "no-pull" | "floating" => Self::Pull(Pull::None),
            "pull-up" | "up" => Self::Pull(Pull::PullUp),
            "pull-down" | "down" => Self::Pull(Pull::PullDown),
            "reset" => Self::Reset,
            other => {
                let number = other
                    .strip_prefix("af")
                    .ok_or_else(|| format!("unknown pin setting '{s}'"))?;
                let n = number
                    .parse()
                    .map_err(|_| format!("invalid alternate function '{s}'"))?;
                Self::AltFunction(n)
            }
        };
        Ok(item)
    }
}

/// Settings for one signal, e.g. `PA5:output,high,pull-up`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PinSetting {
    pub(crate) signal: String,
    pub(crate) items: Vec<SettingItem>,
}

impl FromStr for PinSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (signal, items) = s
            .split_once(':')
            .ok_or_else(|| format!("expected <SIGNAL>:<setting>[,...], got '{s}'"))?;
        let signal = signal.trim();
        if signal.is_empty() {
            return Err(format!("missing signal name in '{s}'"));
        }
        let items = items
            .split(',')
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .map(SettingItem::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        if items.is_empty() {
            return Err(format!("no settings given for {signal}"));
        }
        Ok(Self {
            signal: signal.to_owned(),
            items,
        })
    }
}

impl PinSetting {
    /// Apply the items left to right.
    ///
    /// Settings the pin cannot currently take (e.g. a speed while in input
    /// mode) are ignored by the pin, matching interactive use.
    pub(crate) fn apply(&self, pin: &mut Pin) -> Result<(), stm32_pinmux::Error> {
        for item in &self.items {
            match *item {
                SettingItem::Mode(mode) => pin.set_mode(mode),
                SettingItem::Speed(speed) => pin.set_speed(speed),
                SettingItem::Type(output_type) => pin.set_output_type(output_type),
                SettingItem::Pull(pull) => pin.set_pull(pull),
                SettingItem::AltFunction(n) => pin.set_alt_function(n)?,
                SettingItem::Reset => pin.reset_to_default(),
            }
        }
        Ok(())
    }
}
