use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use log::info;
use stm32_pinmux::Chip;

use crate::settings::PinSetting;

#[derive(Debug, Parser)]
pub(crate) struct GenerateArgs {
    /// Pin setting, e.g. PA5:output,high,pull-up or PB6:af4,open-drain
    ///
    /// Settings: input, output, alternate, analog (mode); low, medium, high,
    /// very-high (speed); push-pull, open-drain (type); no-pull, pull-up,
    /// pull-down (resistor); afN (alternate function 0-15); reset.
    #[arg(long = "pin", value_name = "SETTING")]
    pub(crate) pins: Vec<PinSetting>,
    /// File with one pin setting per line, applied before --pin
    ///
    /// Blank lines and lines starting with '#' are ignored.
    #[arg(long, value_name = "PATH")]
    pub(crate) pins_file: Option<PathBuf>,
}

pub(crate) fn action(chip: &Chip, args: GenerateArgs) -> anyhow::Result<()> {
    let mut settings = match &args.pins_file {
        Some(path) => read_pins_file(path)?,
        None => Vec::new(),
    };
    settings.extend(args.pins);
    info!("applying {} pin settings to {}", settings.len(), chip.package());

    for setting in &settings {
        let Some(pin) = chip.pin_by_name(&setting.signal) else {
            bail!("{} is not bonded out on {}", setting.signal, chip.package());
        };
        setting
            .apply(&mut pin.borrow_mut())
            .with_context(|| format!("cannot configure {}", setting.signal))?;
    }

    print!("{}", chip.serialize());
    Ok(())
}

fn read_pins_file(path: &Path) -> anyhow::Result<Vec<PinSetting>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read pin settings file {path:?}"))?;
    parse_pins_file(&text).with_context(|| format!("in pin settings file {path:?}"))
}

fn parse_pins_file(text: &str) -> anyhow::Result<Vec<PinSetting>> {
    text.lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| {
            line.parse()
                .map_err(|e: String| anyhow::anyhow!("line {n}: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pins_file_skips_comments() {
        let settings = parse_pins_file("# debug\n\nPA5:output\n  PB6:af4  \n").unwrap();
        let signals: Vec<_> = settings.iter().map(|s| s.signal.as_str()).collect();
        assert_eq!(signals, ["PA5", "PB6"]);
    }

    #[test]
    fn pins_file_reports_line() {
        let err = parse_pins_file("PA5:output\nPA6:bogus\n").unwrap_err();
        assert!(err.to_string().starts_with("line 2:"));
    }
}
