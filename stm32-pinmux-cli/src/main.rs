use anyhow::Context;
use clap::Parser;
use stm32_pinmux::PinDatabase;

use cli::Commands;

mod cli;
mod generate;
mod pins;
mod settings;
mod util;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    util::init_logging(cli.verbose);

    let db = PinDatabase::load(&cli.pin_db)
        .with_context(|| format!("cannot load pin database {:?}", cli.pin_db))?;
    let chip = db.chip(cli.package.into());
    match cli.command {
        Commands::Pins => pins::list(chip),
        Commands::Defaults => pins::defaults(),
        Commands::Generate(args) => generate::action(chip, args)?,
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::cli::Cli;

    use clap::CommandFactory;

    #[test]
    fn check_cli_debug_asserts() {
        Cli::command().debug_assert();
    }
}
