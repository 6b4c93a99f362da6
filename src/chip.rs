//! Package variants and the register-write listing derived from their pins.

use std::collections::BTreeMap;
use std::fmt;

use bit_field::BitField;
use log::debug;

use crate::pin::{Pin, PinRef};
use crate::registers::Port;

/// Outline of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageStyle {
    /// Quad flat pack, pins on four sides, numbered.
    QuadFlat,
    /// Ball grid array, balls on a lettered/numbered grid.
    BallGrid,
}

/// Size of a package in pins (quad flat) or balls (ball grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Outline.
    pub style: PackageStyle,
    /// Pins per horizontal side, or grid columns.
    pub width: u8,
    /// Pins per vertical side, or grid rows.
    pub height: u8,
}

/// Package variants of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Package {
    /// 100-pin LQFP.
    Lqfp100,
    /// 176+25-ball UFBGA.
    Ufbga176,
    /// 240+25-ball TFBGA.
    Tfbga240,
}

impl Package {
    /// Every package, in pin database column order.
    pub const ALL: [Package; 3] = [Package::Lqfp100, Package::Ufbga176, Package::Tfbga240];

    /// Package name as printed in the datasheet.
    pub fn name(self) -> &'static str {
        match self {
            Package::Lqfp100 => "LQFP100",
            Package::Ufbga176 => "UFBGA176+25",
            Package::Tfbga240 => "TFBGA240+25",
        }
    }

    /// Outline and size of the package.
    pub fn geometry(self) -> Geometry {
        match self {
            Package::Lqfp100 => Geometry {
                style: PackageStyle::QuadFlat,
                width: 25,
                height: 25,
            },
            Package::Ufbga176 => Geometry {
                style: PackageStyle::BallGrid,
                width: 15,
                height: 15,
            },
            Package::Tfbga240 => Geometry {
                style: PackageStyle::BallGrid,
                width: 17,
                height: 17,
            },
        }
    }

    /// Outline of the package.
    pub fn style(self) -> PackageStyle {
        self.geometry().style
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A register write that keeps the bits set in `mask` and ORs in `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskedWrite {
    /// Bits of the current register value to preserve.
    pub mask: u32,
    /// Bits to set after masking.
    pub value: u32,
}

/// Writes needed to bring one port from reset to the configured state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortWrite {
    /// Port being programmed.
    pub port: Port,
    /// GPIOx_MODER.
    pub moder: MaskedWrite,
    /// GPIOx_OTYPER.
    pub otyper: MaskedWrite,
    /// GPIOx_OSPEEDR.
    pub ospeedr: MaskedWrite,
    /// GPIOx_PUPDR.
    pub pupdr: MaskedWrite,
    /// GPIOx_AFRL, if any of lines 0-7 has an alternate function assigned.
    pub afrl: Option<MaskedWrite>,
    /// GPIOx_AFRH, if any of lines 8-15 has an alternate function assigned.
    pub afrh: Option<MaskedWrite>,
}

impl fmt::Display for PortWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let port = self.port;
        let registers = [
            ("MODER  ", Some(self.moder)),
            ("OTYPER ", Some(self.otyper)),
            ("OSPEEDR", Some(self.ospeedr)),
            ("PUPDR  ", Some(self.pupdr)),
            ("AFRL   ", self.afrl),
            ("AFRH   ", self.afrh),
        ];
        for (name, write) in registers {
            if let Some(MaskedWrite { mask, value }) = write {
                writeln!(
                    f,
                    "{port}.{name} = ({port}.{name} & 0x{mask:08X}) | 0x{value:08X}"
                )?;
            }
        }
        Ok(())
    }
}

/// Register accumulators for one port.
struct PortState {
    moder: u32,
    otyper: u32,
    ospeedr: u32,
    pupdr: u32,
    afr: u64,
    mask1: u32,
    mask2: u32,
    mask4: u64,
}

impl PortState {
    fn new() -> Self {
        Self {
            moder: 0,
            otyper: 0,
            ospeedr: 0,
            pupdr: 0,
            afr: 0,
            mask1: u32::MAX,
            mask2: u32::MAX,
            mask4: u64::MAX,
        }
    }

    /// Fold a changed GPIO pin into the accumulators.
    fn add(&mut self, pin: &Pin) {
        let (Some(line), Some(choices)) = (pin.gpio_line(), pin.choices()) else {
            return;
        };
        let n = usize::from(line.line);

        self.mask1.set_bit(n, false);
        self.mask2.set_bits(2 * n..2 * n + 2, 0);
        self.moder |= (choices.mode.value() as u32) << (2 * n);
        self.otyper |= (choices.output_type.value() as u32) << n;
        self.ospeedr |= (choices.speed.value() as u32) << (2 * n);
        self.pupdr |= (choices.resistor.value() as u32) << (2 * n);
        if let Some(af) = pin.alt_function() {
            self.mask4.set_bits(4 * n..4 * n + 4, 0);
            self.afr |= u64::from(af) << (4 * n);
        }
    }

    fn into_write(self, port: Port) -> Option<PortWrite> {
        if self.mask2 == u32::MAX {
            return None;
        }
        let half = |bits: std::ops::Range<usize>| {
            let mask = self.mask4.get_bits(bits.clone()) as u32;
            (mask != u32::MAX).then(|| MaskedWrite {
                mask,
                value: self.afr.get_bits(bits) as u32,
            })
        };
        Some(PortWrite {
            port,
            moder: MaskedWrite {
                mask: self.mask2,
                value: self.moder,
            },
            otyper: MaskedWrite {
                mask: self.mask1,
                value: self.otyper,
            },
            ospeedr: MaskedWrite {
                mask: self.mask2,
                value: self.ospeedr,
            },
            pupdr: MaskedWrite {
                mask: self.mask2,
                value: self.pupdr,
            },
            afrl: half(0..32),
            afrh: half(32..64),
        })
    }
}

/// One package variant and the pins bonded out at each of its positions.
///
/// Pins are shared: the same [`PinRef`] may appear in several chips, so a change
/// made through one package is seen by all of them.
#[derive(Debug)]
pub struct Chip {
    package: Package,
    pins: BTreeMap<String, PinRef>,
}

impl Chip {
    /// Create a chip from its position-to-pin map.
    pub fn new(package: Package, pins: BTreeMap<String, PinRef>) -> Self {
        Self { package, pins }
    }

    /// Package variant.
    pub fn package(&self) -> Package {
        self.package
    }

    /// Package width, see [`Geometry`].
    pub fn width(&self) -> u8 {
        self.package.geometry().width
    }

    /// Package height, see [`Geometry`].
    pub fn height(&self) -> u8 {
        self.package.geometry().height
    }

    /// Pin at a position key, e.g. `"23"` or `"A1"`.
    pub fn pin(&self, position: &str) -> Option<&PinRef> {
        self.pins.get(position)
    }

    /// Pin carrying the signal `name`, if this package bonds it out.
    pub fn pin_by_name(&self, name: &str) -> Option<&PinRef> {
        self.pins.values().find(|p| p.borrow().name() == name)
    }

    /// All `(position, pin)` pairs, ordered by position key.
    pub fn pins(&self) -> impl Iterator<Item = (&str, &PinRef)> {
        self.pins.iter().map(|(k, p)| (k.as_str(), p))
    }

    /// Number of positions with a pin.
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// `true` if the package has no pins.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Return every pin of this package to its reset configuration.
    pub fn reset_all(&self) {
        for pin in self.pins.values() {
            pin.borrow_mut().reset_to_default();
        }
    }

    /// Register writes for every port with at least one changed GPIO pin, in
    /// port order.
    pub fn register_writes(&self) -> Vec<PortWrite> {
        let mut states: BTreeMap<Port, PortState> = BTreeMap::new();
        for pin in self.pins.values() {
            let pin = pin.borrow();
            if pin.is_default() {
                continue;
            }
            if let Some(line) = pin.gpio_line() {
                states
                    .entry(line.port)
                    .or_insert_with(PortState::new)
                    .add(&pin);
            }
        }

        Port::ALL
            .into_iter()
            .filter_map(|port| {
                let write = states.remove(&port)?.into_write(port)?;
                debug!("{}: {port} needs programming", self.package);
                Some(write)
            })
            .collect()
    }

    /// Render [`Chip::register_writes`] as C-style assignments, one line per
    /// register. Empty if every pin is in its reset state.
    pub fn serialize(&self) -> String {
        self.register_writes()
            .iter()
            .map(PortWrite::to_string)
            .collect()
    }
}
