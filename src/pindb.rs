//! Loader for the text pin database.
//!
//! Each line describes one signal with nine whitespace-separated fields:
//!
//! ```text
//! lqfp ufbga tfbga name type structure notes alt-functions additional-functions
//! ```
//!
//! A position of `-` means the signal is not bonded out on that package, and
//! `-` in the function columns means the list is empty. Function lists are
//! comma-separated without spaces.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::rc::Rc;

use log::{debug, warn};

use crate::Error;
use crate::chip::{Chip, Package};
use crate::pin::{Pin, PinRef};

/// Number of fields in a pin database row.
pub const ROW_FIELDS: usize = 9;

/// A row that was skipped because it did not have [`ROW_FIELDS`] fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    /// 1-based line number.
    pub line: usize,
    /// Number of fields found.
    pub fields: usize,
}

impl std::fmt::Display for RowDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: {} fields, expected {ROW_FIELDS}",
            self.line, self.fields
        )
    }
}

/// Every package variant, built from one pin database.
#[derive(Debug)]
pub struct PinDatabase {
    pins: HashMap<String, PinRef>,
    chips: Vec<Chip>,
    diagnostics: Vec<RowDiagnostic>,
}

impl PinDatabase {
    /// Load the pin database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened or read. Malformed rows
    /// are not errors, see [`PinDatabase::diagnostics`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!("loading pin database {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a pin database from any buffered reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if reading fails.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut pins: HashMap<String, PinRef> = HashMap::new();
        let mut positions: [BTreeMap<String, PinRef>; 3] = Default::default();
        let mut diagnostics = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            let &[lqfp, ufbga, tfbga, name, pin_type, structure, notes, alt_fns, add_fns] =
                fields.as_slice()
            else {
                let diagnostic = RowDiagnostic {
                    line: index + 1,
                    fields: fields.len(),
                };
                warn!("skipping pin database {diagnostic}");
                diagnostics.push(diagnostic);
                continue;
            };

            let pin = match pins.get(name) {
                Some(existing) => {
                    if existing.borrow().is_gpio() {
                        warn!("line {}: duplicate GPIO signal {name}", index + 1);
                    }
                    Rc::clone(existing)
                }
                None => {
                    let first_position = [lqfp, ufbga, tfbga]
                        .into_iter()
                        .find(|p| *p != "-")
                        .unwrap_or("-");
                    let pin = Pin::new(name, first_position, alt_fns, add_fns)
                        .with_metadata(pin_type, structure, notes)
                        .into_shared();
                    pins.insert(name.to_owned(), Rc::clone(&pin));
                    pin
                }
            };

            for (package, position) in Package::ALL.into_iter().zip([lqfp, ufbga, tfbga]) {
                if position == "-" {
                    continue;
                }
                let previous =
                    positions[package as usize].insert(position.to_owned(), Rc::clone(&pin));
                if let Some(previous) = previous {
                    warn!(
                        "line {}: {package} position {position} reassigned from {} to {name}",
                        index + 1,
                        previous.borrow().name()
                    );
                }
            }
        }

        let chips = Package::ALL
            .into_iter()
            .zip(positions)
            .map(|(package, pins)| {
                debug!("{package}: {} positions", pins.len());
                Chip::new(package, pins)
            })
            .collect();

        Ok(Self {
            pins,
            chips,
            diagnostics,
        })
    }

    /// The chip for one package variant.
    pub fn chip(&self, package: Package) -> &Chip {
        &self.chips[package as usize]
    }

    /// All package variants, in [`Package::ALL`] order.
    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    /// The pin carrying signal `name`.
    pub fn pin(&self, name: &str) -> Option<&PinRef> {
        self.pins.get(name)
    }

    /// Rows skipped while loading.
    pub fn diagnostics(&self) -> &[RowDiagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ROWS: &str = "\
1 E3 D2 PE2 I/O FT - TRACECLK,SPI4_SCK ETH_MII_TXD3
- A1 A1 VSS S - - - -
2 - - PE3 I/O FT - TRACED0 -

bad row
";

    #[test]
    fn positions_per_package() -> Result<(), Error> {
        let db = PinDatabase::from_reader(ROWS.as_bytes())?;
        let lqfp = db.chip(Package::Lqfp100);
        assert_eq!(lqfp.len(), 2);
        assert_eq!(lqfp.pin("1").unwrap().borrow().name(), "PE2");
        assert_eq!(lqfp.pin("2").unwrap().borrow().name(), "PE3");
        assert!(db.chip(Package::Ufbga176).pin("E3").is_some());
        assert!(db.chip(Package::Tfbga240).pin("A1").is_some());
        assert!(db.chip(Package::Ufbga176).pin("2").is_none());
        Ok(())
    }

    #[test]
    fn malformed_rows_are_reported() -> Result<(), Error> {
        let db = PinDatabase::from_reader(ROWS.as_bytes())?;
        assert_eq!(db.diagnostics(), [RowDiagnostic { line: 5, fields: 2 }]);
        Ok(())
    }

    #[test]
    fn metadata_is_kept() -> Result<(), Error> {
        let db = PinDatabase::from_reader(ROWS.as_bytes())?;
        let pe2 = db.pin("PE2").unwrap().borrow();
        assert_eq!(pe2.position(), "1");
        assert_eq!(pe2.pin_type(), Some("I/O"));
        assert_eq!(pe2.structure(), Some("FT"));
        assert_eq!(pe2.notes(), None);
        assert_eq!(pe2.alt_functions(), ["TRACECLK", "SPI4_SCK"]);
        assert_eq!(pe2.additional_functions(), ["ETH_MII_TXD3"]);
        assert_eq!(db.pin("VSS").unwrap().borrow().position(), "A1");
        Ok(())
    }

    #[test]
    fn pins_are_shared_between_packages() -> Result<(), Error> {
        let db = PinDatabase::from_reader(ROWS.as_bytes())?;
        let lqfp = db.chip(Package::Lqfp100).pin("1").unwrap();
        let tfbga = db.chip(Package::Tfbga240).pin("D2").unwrap();
        assert!(Rc::ptr_eq(lqfp, tfbga));
        Ok(())
    }
}
