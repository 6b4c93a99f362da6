//! Configuration state of a single package pin.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, trace};

use crate::Error;
use crate::choice::{AnyChoice, Choice, ChoiceKind, Mode, OutputType, Pull, Speed};
use crate::registers::{LINES_PER_PORT, Port};

/// Number of alternate functions selectable per line (AF0..=AF15).
pub const ALT_FUNCTION_COUNT: u8 = 16;

/// Handle to a pin shared between the packages that bond it out.
pub type PinRef = Rc<RefCell<Pin>>;

/// Port and line number of a GPIO pin, e.g. PA5 is line 5 of port A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GpioLine {
    /// Port the line belongs to.
    pub port: Port,
    /// Line number within the port, `0..16`.
    pub line: u8,
}

impl GpioLine {
    /// Parse a signal name of the form `<port><digits>`.
    ///
    /// Returns `None` for power, reset, oscillator and other non-GPIO names, and
    /// for names whose suffix is not a plain line number, e.g. `PC14-OSC32_IN`.
    pub fn from_signal_name(name: &str) -> Option<Self> {
        let port = Port::from_name(name.get(..2)?)?;
        let digits = &name[2..];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let line: u8 = digits.parse().ok()?;
        (line < LINES_PER_PORT).then_some(Self { port, line })
    }
}

/// The four configurable attributes of a GPIO pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpioChoices {
    /// Pin mode.
    pub mode: Choice<4>,
    /// Output speed.
    pub speed: Choice<4>,
    /// Output type.
    pub output_type: Choice<2>,
    /// Pull resistor.
    pub resistor: Choice<3>,
}

impl GpioChoices {
    fn from_reset_values(gpio: GpioLine) -> Self {
        let defaults = gpio.port.defaults();
        let n = gpio.line;
        Self {
            mode: Choice::new("Mode", ["GPI", "GPO", "Alternate", "Analog"], defaults.mode(n)),
            speed: Choice::new("Speed", ["Low", "Med", "High", "Very High"], defaults.speed(n)),
            output_type: Choice::new("Type", ["Push-Pull", "Open-Drain"], defaults.output_type(n)),
            resistor: Choice::new("Resistor", ["None", "Pull-Up", "Pull-Down"], defaults.pull(n)),
        }
    }

    /// Type-erased access to one attribute.
    pub fn get(&self, kind: ChoiceKind) -> &dyn AnyChoice {
        match kind {
            ChoiceKind::Mode => &self.mode,
            ChoiceKind::Speed => &self.speed,
            ChoiceKind::Type => &self.output_type,
            ChoiceKind::Resistor => &self.resistor,
        }
    }

    /// All four attributes, in flat-index order.
    pub fn iter(&self) -> impl Iterator<Item = (ChoiceKind, &dyn AnyChoice)> {
        ChoiceKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    fn set(&mut self, kind: ChoiceKind, option: usize) {
        match kind {
            ChoiceKind::Mode => self.mode.set(option),
            ChoiceKind::Speed => self.speed.set(option),
            ChoiceKind::Type => self.output_type.set(option),
            ChoiceKind::Resistor => self.resistor.set(option),
        }
    }

    fn reset(&mut self) {
        self.mode.reset();
        self.speed.reset();
        self.output_type.reset();
        self.resistor.reset();
    }

    /// Resolve a flat index over the concatenated option lists.
    fn resolve(flat_index: usize) -> Option<(ChoiceKind, usize)> {
        let mut n = flat_index;
        for kind in ChoiceKind::ALL {
            if n < kind.option_count() {
                return Some((kind, n));
            }
            n -= kind.option_count();
        }
        None
    }
}

#[derive(Debug, Clone)]
struct Gpio {
    line: GpioLine,
    choices: GpioChoices,
}

/// One physical pin of the package.
///
/// Pins whose signal name is a GPIO line (e.g. `PA5`) carry the four
/// [`GpioChoices`] and an optional alternate function number. Everything else
/// (supplies, `NRST`, `BOOT0`, ...) only carries its metadata and never
/// contributes to the register listing.
///
/// After every mutation the enabled options are recomputed:
///
/// - An assigned alternate function forces the mode to Alternate and disables
///   the other modes.
/// - In Input mode speed and output type are disabled and held at reset.
/// - In Analog mode speed, output type and pull are disabled and held at reset.
#[derive(Debug, Clone)]
pub struct Pin {
    name: String,
    position: String,
    alt_functions: Vec<String>,
    additional_functions: Vec<String>,
    pin_type: Option<String>,
    structure: Option<String>,
    notes: Option<String>,
    is_default: bool,
    alt_function: Option<u8>,
    gpio: Option<Gpio>,
}

/// Split a comma-separated function list, `-` meaning none.
fn split_functions(list: &str) -> Vec<String> {
    if list == "-" {
        Vec::new()
    } else {
        list.split(',').map(str::to_owned).collect()
    }
}

fn optional_field(field: &str) -> Option<String> {
    (field != "-").then(|| field.to_owned())
}

impl Pin {
    /// Create a pin in its reset state.
    ///
    /// `alt_functions` and `additional_functions` are comma-separated lists,
    /// or `-` if the pin has none.
    pub fn new(name: &str, position: &str, alt_functions: &str, additional_functions: &str) -> Self {
        let gpio = GpioLine::from_signal_name(name).map(|line| Gpio {
            line,
            choices: GpioChoices::from_reset_values(line),
        });
        match &gpio {
            Some(g) => debug!("{name} at {position}: GPIO {} line {}", g.line.port, g.line.line),
            None => debug!("{name} at {position}: not configurable"),
        }
        let mut pin = Self {
            name: name.to_owned(),
            position: position.to_owned(),
            alt_functions: split_functions(alt_functions),
            additional_functions: split_functions(additional_functions),
            pin_type: None,
            structure: None,
            notes: None,
            is_default: true,
            alt_function: None,
            gpio,
        };
        pin.reset_to_default();
        pin
    }

    /// Wrap the pin in a shareable handle.
    pub fn into_shared(self) -> PinRef {
        Rc::new(RefCell::new(self))
    }

    pub(crate) fn with_metadata(mut self, pin_type: &str, structure: &str, notes: &str) -> Self {
        self.pin_type = optional_field(pin_type);
        self.structure = optional_field(structure);
        self.notes = optional_field(notes);
        self
    }

    /// Signal name, e.g. `PA5` or `VDD`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position key the pin was created with.
    pub fn position(&self) -> &str {
        &self.position
    }

    /// Names of the alternate functions routed to this pin.
    pub fn alt_functions(&self) -> &[String] {
        &self.alt_functions
    }

    /// Names of the additional (non-AF) functions of this pin.
    pub fn additional_functions(&self) -> &[String] {
        &self.additional_functions
    }

    /// Pin type column of the pin database (`S`, `I/O`, ...).
    pub fn pin_type(&self) -> Option<&str> {
        self.pin_type.as_deref()
    }

    /// I/O structure column of the pin database (`FT`, `TT_a`, ...).
    pub fn structure(&self) -> Option<&str> {
        self.structure.as_deref()
    }

    /// Notes column of the pin database.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// `true` if the pin has not been changed since creation or the last reset.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Assigned alternate function number, if any.
    pub fn alt_function(&self) -> Option<u8> {
        self.alt_function
    }

    /// `true` if the pin is a configurable GPIO line.
    pub fn is_gpio(&self) -> bool {
        self.gpio.is_some()
    }

    /// Port and line of a GPIO pin.
    pub fn gpio_line(&self) -> Option<GpioLine> {
        self.gpio.as_ref().map(|g| g.line)
    }

    /// Configurable attributes of a GPIO pin.
    pub fn choices(&self) -> Option<&GpioChoices> {
        self.gpio.as_ref().map(|g| &g.choices)
    }

    /// Total number of options across all attributes (0 for non-GPIO pins).
    pub fn option_count(&self) -> usize {
        if self.is_gpio() {
            ChoiceKind::ALL.iter().map(|k| k.option_count()).sum()
        } else {
            0
        }
    }

    /// Current mode of a GPIO pin.
    pub fn mode(&self) -> Option<Mode> {
        self.choices().map(|c| Mode::from(c.mode.value() as u8))
    }

    /// Current output speed of a GPIO pin.
    pub fn speed(&self) -> Option<Speed> {
        self.choices().map(|c| Speed::from(c.speed.value() as u8))
    }

    /// Current output type of a GPIO pin.
    pub fn output_type(&self) -> Option<OutputType> {
        self.choices()
            .map(|c| OutputType::from(c.output_type.value() as u8))
    }

    /// Current pull resistor of a GPIO pin.
    pub fn pull(&self) -> Option<Pull> {
        self.choices().map(|c| Pull::from(c.resistor.value() as u8))
    }

    /// Select an option by its index in the concatenation of all option lists
    /// (Mode, Speed, Type, Resistor).
    ///
    /// Indexes past the end, disabled options and non-GPIO pins are ignored.
    pub fn select_choice(&mut self, flat_index: usize) {
        let Some(gpio) = self.gpio.as_mut() else {
            return;
        };
        let Some((kind, option)) = GpioChoices::resolve(flat_index) else {
            trace!("{}: option {flat_index} out of range", self.name);
            return;
        };
        if !gpio.choices.get(kind).is_enabled(option) {
            trace!("{}: {kind:?} option {option} disabled", self.name);
            return;
        }
        trace!("{}: {kind:?} = {option}", self.name);
        gpio.choices.set(kind, option);
        self.is_default = false;
        self.propagate();
    }

    /// Select `option` of one attribute. Same rules as [`Pin::select_choice`].
    pub fn select(&mut self, kind: ChoiceKind, option: usize) {
        if option < kind.option_count() {
            self.select_choice(kind.flat_offset() + option);
        }
    }

    /// Select a pin mode.
    pub fn set_mode(&mut self, mode: Mode) {
        self.select(ChoiceKind::Mode, u8::from(mode).into());
    }

    /// Select an output speed.
    pub fn set_speed(&mut self, speed: Speed) {
        self.select(ChoiceKind::Speed, u8::from(speed).into());
    }

    /// Select an output type.
    pub fn set_output_type(&mut self, output_type: OutputType) {
        self.select(ChoiceKind::Type, u8::from(output_type).into());
    }

    /// Select a pull resistor.
    pub fn set_pull(&mut self, pull: Pull) {
        self.select(ChoiceKind::Resistor, u8::from(pull).into());
    }

    /// Assign alternate function `n`, which forces Alternate mode.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAltFunction`] if `n` is not in `0..16`.
    pub fn set_alt_function(&mut self, n: u8) -> Result<(), Error> {
        if n >= ALT_FUNCTION_COUNT {
            return Err(Error::InvalidAltFunction(n));
        }
        if self.gpio.is_none() {
            return Ok(());
        }
        trace!("{}: AF{n}", self.name);
        self.alt_function = Some(n);
        self.is_default = false;
        self.propagate();
        Ok(())
    }

    /// Remove the alternate function assignment.
    pub fn clear_alt_function(&mut self) {
        if self.gpio.is_none() {
            return;
        }
        trace!("{}: AF cleared", self.name);
        self.alt_function = None;
        self.is_default = false;
        self.propagate();
    }

    /// Clear alternate function `n` if it is assigned, otherwise assign it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAltFunction`] if `n` is not in `0..16`.
    pub fn toggle_alt_function(&mut self, n: u8) -> Result<(), Error> {
        if n >= ALT_FUNCTION_COUNT {
            return Err(Error::InvalidAltFunction(n));
        }
        if self.alt_function == Some(n) {
            self.clear_alt_function();
            Ok(())
        } else {
            self.set_alt_function(n)
        }
    }

    /// Return the pin to its reset configuration.
    pub fn reset_to_default(&mut self) {
        self.is_default = true;
        self.alt_function = None;
        if let Some(gpio) = self.gpio.as_mut() {
            gpio.choices.reset();
            if Mode::from(gpio.choices.mode.value() as u8) == Mode::Alternate {
                self.alt_function = Some(gpio.line.port.defaults().alt_function(gpio.line.line));
            }
        }
        self.propagate();
    }

    /// Recompute the enabled options after a mutation.
    pub(crate) fn propagate(&mut self) {
        let Some(gpio) = self.gpio.as_mut() else {
            return;
        };
        let choices = &mut gpio.choices;

        if self.alt_function.is_some() {
            choices.mode.force(u8::from(Mode::Alternate).into());
        } else {
            choices.mode.enable_all();
        }

        match Mode::from(choices.mode.value() as u8) {
            Mode::Output | Mode::Alternate => {
                choices.speed.enable_all();
                choices.output_type.enable_all();
                choices.resistor.enable_all();
            }
            Mode::Input => {
                choices.speed.lock_to_default();
                choices.output_type.lock_to_default();
                choices.resistor.enable_all();
            }
            Mode::Analog => {
                choices.speed.lock_to_default();
                choices.output_type.lock_to_default();
                choices.resistor.lock_to_default();
            }
        }
    }
}
