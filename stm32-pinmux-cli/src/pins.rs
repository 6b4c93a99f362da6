use stm32_pinmux::{Chip, Pin, Port};

pub(crate) fn list(chip: &Chip) {
    println!(
        "{} ({} x {}), {} pins",
        chip.package(),
        chip.width(),
        chip.height(),
        chip.len()
    );
    for (position, pin) in chip.pins() {
        let pin = pin.borrow();
        println!("{position:>4}  {:<16} {}", pin.name(), describe(&pin));
    }
}

/// Current configuration and available functions of a pin, on one line.
fn describe(pin: &Pin) -> String {
    let functions = pin.alt_functions().join(",");
    let Some(choices) = pin.choices() else {
        return format!("{:<36} {functions}", pin.pin_type().unwrap_or("-"));
    };
    let af = match pin.alt_function() {
        Some(n) => format!("AF{n}"),
        None => "-".to_owned(),
    };
    let config = format!(
        "{}/{}/{}/{} {af}",
        choices.mode.label(),
        choices.speed.label(),
        choices.output_type.label(),
        choices.resistor.label(),
    );
    format!("{config:<36} {functions}")
}

pub(crate) fn defaults() {
    for port in Port::ALL {
        let d = port.defaults();
        println!(
            "{port}  MODER=0x{:08X} OTYPER=0x{:08X} OSPEEDR=0x{:08X} PUPDR=0x{:08X} AFR=0x{:016X}",
            d.moder, d.otyper, d.ospeedr, d.pupdr, d.afr
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn describe_gpio_and_supply() {
        let pin = Pin::new("PA13", "72", "-", "-");
        assert!(describe(&pin).starts_with("Alternate/Very High/Push-Pull/Pull-Up AF0"));

        let pin = Pin::new("PB6", "92", "I2C1_SCL,USART1_TX", "-");
        assert!(describe(&pin).starts_with("Analog/Low/Push-Pull/None -"));
        assert!(describe(&pin).ends_with(" I2C1_SCL,USART1_TX"));

        let pin = Pin::new("VDD", "19", "-", "-");
        assert_eq!(describe(&pin).trim(), "-");
    }
}
