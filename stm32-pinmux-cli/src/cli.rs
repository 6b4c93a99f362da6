use std::path::PathBuf;

use crate::generate::GenerateArgs;

use clap::{Parser, ValueEnum};
use stm32_pinmux::Package;

/// Derive STM32H7 GPIO register writes from a pin configuration
///
/// Pins are loaded from a text pin database with one signal per line and
/// positions for the LQFP100, UFBGA176+25 and TFBGA240+25 packages.
///
/// The generate command applies pin settings on top of the reset state and
/// prints one masked read-modify-write per register of every port that needs
/// programming. Ports left in their reset state are not listed.
#[derive(Debug, Parser)]
#[command(version, about)]
pub(crate) struct Cli {
    /// Path of the pin database
    #[arg(short, long)]
    pub(crate) pin_db: PathBuf,
    /// Package variant
    #[arg(short = 'P', long, value_enum, default_value_t = PackageArg::Lqfp100)]
    pub(crate) package: PackageArg,
    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Parser)]
pub(crate) enum Commands {
    /// List the pins of the package and their reset configuration.
    Pins,
    /// Print the reset values of every port's configuration registers.
    Defaults,
    /// Apply pin settings and print the register writes.
    Generate(GenerateArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum PackageArg {
    /// LQFP100
    Lqfp100,
    /// UFBGA176+25
    Ufbga176,
    /// TFBGA240+25
    Tfbga240,
}

impl From<PackageArg> for Package {
    fn from(value: PackageArg) -> Self {
        match value {
            PackageArg::Lqfp100 => Package::Lqfp100,
            PackageArg::Ufbga176 => Package::Ufbga176,
            PackageArg::Tfbga240 => Package::Tfbga240,
        }
    }
}
