//! End-to-end checks from pin database rows to the register listing.
use std::rc::Rc;

use stm32_pinmux::{Error, Mode, Package, PinDatabase, Pull, Speed};

const PIN_DB: &str = "\
23 M4 N2 PA5 I/O TT_a - TIM2_CH1,SPI1_SCK,TIM8_CH1N ADC12_INP19
72 A14 B15 PA13 I/O FT (4) JTMS-SWDIO -
- L2 P3 PI6 I/O FT - TIM8_CH2,DCMI_D6 -
92 A4 C5 PB6 I/O FT - I2C1_SCL,USART1_TX -
59 P11 U14 PD12 I/O FT - TIM4_CH1,I2C4_SCL -
19 K2 L1 VDD S - - - -
14 J1 K1 NRST I/O RST - - -
this row is short
";

fn load() -> Result<PinDatabase, Error> {
    PinDatabase::from_reader(PIN_DB.as_bytes())
}

/// A freshly loaded database needs no register writes on any package.
#[test]
fn reset_state_produces_empty_listing() -> Result<(), Error> {
    let db = load()?;
    for chip in db.chips() {
        assert_eq!(chip.serialize(), "");
    }
    assert_eq!(db.diagnostics().len(), 1);
    assert_eq!(db.diagnostics()[0].line, 8);
    Ok(())
}

/// PA5 as an output is a single PA block with the line 5 windows cleared.
#[test]
fn output_pin_on_port_a() -> Result<(), Error> {
    let db = load()?;
    let chip = db.chip(Package::Lqfp100);
    chip.pin("23").unwrap().borrow_mut().set_mode(Mode::Output);

    assert_eq!(
        chip.serialize(),
        "PA.MODER   = (PA.MODER   & 0xFFFFF3FF) | 0x00000400\n\
         PA.OTYPER  = (PA.OTYPER  & 0xFFFFFFDF) | 0x00000000\n\
         PA.OSPEEDR = (PA.OSPEEDR & 0xFFFFF3FF) | 0x00000000\n\
         PA.PUPDR   = (PA.PUPDR   & 0xFFFFF3FF) | 0x00000000\n"
    );
    Ok(())
}

/// A change made through one package shows up in the others.
#[test]
fn packages_share_pins() -> Result<(), Error> {
    let db = load()?;
    let lqfp = db.chip(Package::Lqfp100);
    let ufbga = db.chip(Package::Ufbga176);
    let tfbga = db.chip(Package::Tfbga240);

    ufbga.pin("A4").unwrap().borrow_mut().set_alt_function(7)?;
    assert!(Rc::ptr_eq(lqfp.pin("92").unwrap(), tfbga.pin("C5").unwrap()));
    assert_eq!(lqfp.serialize(), tfbga.serialize());
    assert!(lqfp.serialize().contains("PB.AFRL    = (PB.AFRL    & 0xF0FFFFFF) | 0x07000000\n"));
    Ok(())
}

/// PI6 is not bonded out on the LQFP100, so only the BGA listings include it.
#[test]
fn pin_missing_from_a_package() -> Result<(), Error> {
    let db = load()?;
    let pi6 = db.pin("PI6").unwrap();
    pi6.borrow_mut().set_mode(Mode::Output);
    pi6.borrow_mut().set_speed(Speed::VeryHigh);

    assert_eq!(db.chip(Package::Lqfp100).serialize(), "");
    let listing = db.chip(Package::Tfbga240).serialize();
    assert!(listing.starts_with("PI.MODER   = (PI.MODER   & 0xFFFFCFFF) | 0x00001000\n"));
    assert!(listing.contains("PI.OSPEEDR = (PI.OSPEEDR & 0xFFFFCFFF) | 0x00003000\n"));
    Ok(())
}

/// Ports are listed in order, and AFRH is only written when a high line has
/// an alternate function.
#[test]
fn ports_in_order_with_afrh() -> Result<(), Error> {
    let db = load()?;
    let chip = db.chip(Package::Lqfp100);
    chip.pin("59").unwrap().borrow_mut().set_alt_function(2)?;
    chip.pin("72").unwrap().borrow_mut().set_pull(Pull::None);

    let writes = chip.register_writes();
    let ports: Vec<_> = writes.iter().map(|w| w.port.name()).collect();
    assert_eq!(ports, ["PA", "PD"]);

    let listing = chip.serialize();
    assert!(listing.contains("PA.AFRH    = (PA.AFRH    & 0xFF0FFFFF) | 0x00000000\n"));
    assert!(!listing.contains("PA.AFRL"));
    assert!(listing.contains("PD.AFRH    = (PD.AFRH    & 0xFFF0FFFF) | 0x00020000\n"));
    assert!(!listing.contains("PD.AFRL"));
    Ok(())
}

/// Resetting every pin of a package clears the listing again.
#[test]
fn reset_all_pins() -> Result<(), Error> {
    let db = load()?;
    let chip = db.chip(Package::Ufbga176);
    chip.pin("M4").unwrap().borrow_mut().set_mode(Mode::Input);
    chip.pin("J1").unwrap().borrow_mut().select_choice(1);
    assert!(!chip.serialize().is_empty());

    chip.reset_all();
    assert!(chip.serialize().is_empty());
    Ok(())
}
