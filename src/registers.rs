//! GPIO ports and their register reset values.
//!
//! Each port has four 32-bit configuration registers (MODER, OTYPER, OSPEEDR,
//! PUPDR) and a 64-bit alternate function register, split on the device into
//! AFRL (lines 0-7) and AFRH (lines 8-15).
//!
//! ## Datasheet
//!
//! See the GPIO register descriptions in RM0433 for the field layouts and the
//! reset values. Ports A and B differ from the rest because the debug pins
//! (JTAG/SWD) come out of reset in their alternate function.

use std::fmt;

use bit_field::BitField;

/// Number of I/O lines in a port.
pub const LINES_PER_PORT: u8 = 16;

/// A GPIO port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Port {
    /// Port A.
    PA,
    /// Port B.
    PB,
    /// Port C.
    PC,
    /// Port D.
    PD,
    /// Port E.
    PE,
    /// Port F.
    PF,
    /// Port G.
    PG,
    /// Port H.
    PH,
    /// Port I.
    PI,
    /// Port J.
    PJ,
    /// Port K.
    PK,
}

impl Port {
    /// Every port, in register listing order.
    pub const ALL: [Port; 11] = [
        Port::PA,
        Port::PB,
        Port::PC,
        Port::PD,
        Port::PE,
        Port::PF,
        Port::PG,
        Port::PH,
        Port::PI,
        Port::PJ,
        Port::PK,
    ];

    /// Two-letter port name, as used in signal names and register listings.
    pub fn name(self) -> &'static str {
        match self {
            Port::PA => "PA",
            Port::PB => "PB",
            Port::PC => "PC",
            Port::PD => "PD",
            Port::PE => "PE",
            Port::PF => "PF",
            Port::PG => "PG",
            Port::PH => "PH",
            Port::PI => "PI",
            Port::PJ => "PJ",
            Port::PK => "PK",
        }
    }

    /// Look up a port from its two-letter name.
    pub fn from_name(name: &str) -> Option<Port> {
        Port::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Reset values of this port's configuration registers.
    pub fn defaults(self) -> &'static RegisterDefaults {
        &DEFAULTS[self as usize]
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reset values of one port's configuration registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDefaults {
    /// GPIOx_MODER, 2 bits per line.
    pub moder: u32,
    /// GPIOx_OTYPER, 1 bit per line.
    pub otyper: u32,
    /// GPIOx_OSPEEDR, 2 bits per line.
    pub ospeedr: u32,
    /// GPIOx_PUPDR, 2 bits per line.
    pub pupdr: u32,
    /// GPIOx_AFRH:GPIOx_AFRL, 4 bits per line.
    pub afr: u64,
}

impl RegisterDefaults {
    /// Reset mode field of line `n`.
    pub fn mode(&self, n: u8) -> u8 {
        let n = usize::from(n);
        self.moder.get_bits(2 * n..2 * n + 2) as u8
    }

    /// Reset output type bit of line `n`.
    pub fn output_type(&self, n: u8) -> u8 {
        self.otyper.get_bit(usize::from(n)) as u8
    }

    /// Reset output speed field of line `n`.
    pub fn speed(&self, n: u8) -> u8 {
        let n = usize::from(n);
        self.ospeedr.get_bits(2 * n..2 * n + 2) as u8
    }

    /// Reset pull-up/pull-down field of line `n`.
    pub fn pull(&self, n: u8) -> u8 {
        let n = usize::from(n);
        self.pupdr.get_bits(2 * n..2 * n + 2) as u8
    }

    /// Reset alternate function number of line `n`.
    pub fn alt_function(&self, n: u8) -> u8 {
        let n = usize::from(n);
        self.afr.get_bits(4 * n..4 * n + 4) as u8
    }
}

const fn port_defaults(moder: u32, ospeedr: u32, pupdr: u32) -> RegisterDefaults {
    RegisterDefaults {
        moder,
        otyper: 0x0000_0000,
        ospeedr,
        pupdr,
        afr: 0x0000_0000_0000_0000,
    }
}

// PA13/PA14/PA15 (SWDIO, SWCLK, JTDI) and PB3/PB4 (JTDO, NJTRST) reset
// into alternate function mode with their debug pulls applied.
const DEFAULTS: [RegisterDefaults; 11] = [
    port_defaults(0xABFF_FFFF, 0x0C00_0000, 0x6400_0000), // PA
    port_defaults(0xFFFF_FEBF, 0x0000_00C0, 0x0000_0100), // PB
    port_defaults(0xFFFF_FFFF, 0x0000_0000, 0x0000_0000), // PC
    port_defaults(0xFFFF_FFFF, 0x0000_0000, 0x0000_0000), // PD
    port_defaults(0xFFFF_FFFF, 0x0000_0000, 0x0000_0000), // PE
    port_defaults(0xFFFF_FFFF, 0x0000_0000, 0x0000_0000), // PF
    port_defaults(0xFFFF_FFFF, 0x0000_0000, 0x0000_0000), // PG
    port_defaults(0xFFFF_FFFF, 0x0000_0000, 0x0000_0000), // PH
    port_defaults(0xFFFF_FFFF, 0x0000_0000, 0x0000_0000), // PI
    port_defaults(0xFFFF_FFFF, 0x0000_0000, 0x0000_0000), // PJ
    port_defaults(0xFFFF_FFFF, 0x0000_0000, 0x0000_0000), // PK
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn port_names_round_trip() {
        for port in Port::ALL {
            assert_eq!(Port::from_name(port.name()), Some(port));
        }
        assert_eq!(Port::from_name("PZ"), None);
        assert_eq!(Port::from_name("P"), None);
    }

    #[test]
    fn ports_are_listed_in_order() {
        let names: Vec<_> = Port::ALL.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            ["PA", "PB", "PC", "PD", "PE", "PF", "PG", "PH", "PI", "PJ", "PK"]
        );
    }

    #[test]
    fn debug_pins_reset_to_alternate_function() {
        let pa = Port::PA.defaults();
        assert_eq!(pa.mode(13), 2);
        assert_eq!(pa.mode(14), 2);
        assert_eq!(pa.mode(15), 2);
        assert_eq!(pa.pull(13), 1);
        assert_eq!(pa.pull(14), 2);
        assert_eq!(pa.pull(15), 1);
        assert_eq!(pa.speed(13), 3);

        let pb = Port::PB.defaults();
        assert_eq!(pb.mode(3), 2);
        assert_eq!(pb.mode(4), 2);
        assert_eq!(pb.speed(3), 3);
        assert_eq!(pb.pull(4), 1);
    }

    #[test]
    fn ordinary_lines_reset_to_analog() {
        let pc = Port::PC.defaults();
        for n in 0..LINES_PER_PORT {
            assert_eq!(pc.mode(n), 3);
            assert_eq!(pc.speed(n), 0);
            assert_eq!(pc.output_type(n), 0);
            assert_eq!(pc.pull(n), 0);
            assert_eq!(pc.alt_function(n), 0);
        }
        assert_eq!(Port::PA.defaults().mode(0), 3);
    }
}
