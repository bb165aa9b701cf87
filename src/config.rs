//! Output options shared by every command.
//!
//! notemark keeps no settings between runs. Everything here comes from the
//! command line and is flattened into the CLI's top-level arguments.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::highlight::{Palette, PaletteBase};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    /// Pick light or dark from `COLORFGBG`
    #[default]
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    /// Palette base for this mode, asking the terminal for `Auto`.
    pub fn palette_base(self) -> PaletteBase {
        match self {
            Self::Auto => PaletteBase::detect(),
            Self::Light => PaletteBase::Light,
            Self::Dark => PaletteBase::Dark,
        }
    }
}

#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Palette background (light or dark)
    #[arg(long, value_enum, global = true)]
    pub theme: Option<ThemeMode>,

    /// Load annotation styles from a JSON palette file
    #[arg(long, value_name = "PATH", global = true)]
    pub palette: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Report pipeline timings
    #[arg(long, global = true)]
    pub perf: bool,
}

impl OutputOptions {
    /// The palette these options select. A palette file beats the theme.
    pub fn load_palette(&self) -> Result<Palette> {
        if let Some(path) = &self.palette {
            let palette = Palette::load(path)
                .with_context(|| format!("Failed to load palette {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded palette file");
            return Ok(palette);
        }
        let base = self.theme.unwrap_or_default().palette_base();
        Ok(Palette::for_base(base))
    }
}
