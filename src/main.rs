use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use epd_raster::{
    ColorMethod, DisplayGeometry, DisplayTuning, Palette, ProcessingMode, ProcessingSettings, Rgb,
    ToneMode,
};
use inkframe::services::{ConfigStore, Converter, JsonFileStore};
use inkframe::AppError;

#[derive(Parser)]
#[command(name = "inkframe")]
#[command(about = "Photo preparation for six-color e-paper photo frames")]
struct Cli {
    /// Directory holding the persisted palette and settings
    #[arg(long, default_value = "config", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JPEG/PNG photo into a panel-ready BMP
    Convert {
        /// Source photo (PNG or JPEG)
        input: PathBuf,

        /// Destination BMP path
        output: PathBuf,

        /// Panel width in pixels
        #[arg(long, default_value_t = 800)]
        width: u32,

        /// Panel height in pixels
        #[arg(long, default_value_t = 480)]
        height: u32,

        /// Contrast multiplier override for this run (1.0 = no change)
        #[arg(long)]
        contrast: Option<f32>,

        /// Brightness f-stop override for this run (0 = no change)
        #[arg(long)]
        brightness: Option<f32>,
    },
    /// Show or edit the persisted display palette
    Palette {
        #[command(subcommand)]
        action: PaletteAction,
    },
    /// Show or edit the persisted processing settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Show or edit the persisted display tuning (contrast/brightness)
    Tuning {
        #[command(subcommand)]
        action: TuningAction,
    },
}

#[derive(Subcommand)]
enum PaletteAction {
    /// Print the palette as JSON
    Show,
    /// Set one named entry, e.g. `palette set red 149,36,23`
    Set {
        /// Entry name: black, white, yellow, red, blue or green
        name: String,
        /// Color as `r,g,b` with each channel 0-255
        #[arg(value_parser = parse_rgb)]
        color: Rgb,
    },
    /// Restore the measured default palette
    Reset,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the settings as JSON
    Show,
    /// Update individual fields, leaving the rest untouched
    Set {
        #[arg(long)]
        exposure: Option<f32>,
        #[arg(long)]
        saturation: Option<f32>,
        #[arg(long)]
        contrast: Option<f32>,
        #[arg(long)]
        strength: Option<f32>,
        #[arg(long)]
        shadow_boost: Option<f32>,
        #[arg(long)]
        highlight_compress: Option<f32>,
        #[arg(long)]
        midpoint: Option<f32>,
        /// Tone curve: scurve or contrast
        #[arg(long)]
        tone_mode: Option<ToneMode>,
        /// Color distance method: rgb or lab
        #[arg(long)]
        color_method: Option<ColorMethod>,
        /// Processing mode: enhanced or stock
        #[arg(long)]
        processing_mode: Option<ProcessingMode>,
        /// Render against measured palette values
        #[arg(long)]
        render_measured: Option<bool>,
    },
    /// Restore default settings
    Reset,
}

#[derive(Subcommand)]
enum TuningAction {
    /// Print the tuning as JSON
    Show,
    /// Update contrast and/or brightness f-stop
    Set {
        #[arg(long)]
        contrast: Option<f32>,
        #[arg(long)]
        brightness: Option<f32>,
    },
    /// Restore default tuning
    Reset,
}

fn parse_rgb(s: &str) -> Result<Rgb, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err("expected three comma-separated channels, e.g. 149,36,23".into());
    }
    let channel = |p: &str| {
        p.trim()
            .parse::<u8>()
            .map_err(|_| format!("invalid channel value '{p}' (expected 0-255)"))
    };
    Ok(Rgb::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
    ))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkframe=info,epd_raster=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();
    let store = JsonFileStore::new(&cli.config_dir);

    match cli.command {
        Commands::Convert {
            input,
            output,
            width,
            height,
            contrast,
            brightness,
        } => {
            let converter = Converter::new(store, DisplayGeometry::new(width, height));
            let bytes = converter.convert_file(&input, &output, contrast, brightness)?;
            println!("{} ({bytes} bytes)", output.display());
        }

        Commands::Palette { action } => match action {
            PaletteAction::Show => {
                let palette = store.load_palette()?;
                println!("{}", serde_json::to_string_pretty(&palette)?);
            }
            PaletteAction::Set { name, color } => {
                let mut palette = store.load_palette()?;
                if !palette.set(&name, color) {
                    return Err(AppError::UnknownColor(name).into());
                }
                store.save_palette(&palette)?;
                println!("{}", serde_json::to_string_pretty(&palette)?);
            }
            PaletteAction::Reset => {
                store.save_palette(&Palette::default())?;
                println!("palette reset to defaults");
            }
        },

        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                let settings = store.load_settings()?;
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
            SettingsAction::Set {
                exposure,
                saturation,
                contrast,
                strength,
                shadow_boost,
                highlight_compress,
                midpoint,
                tone_mode,
                color_method,
                processing_mode,
                render_measured,
            } => {
                let mut settings = store.load_settings()?;
                apply(&mut settings.exposure, exposure);
                apply(&mut settings.saturation, saturation);
                apply(&mut settings.contrast, contrast);
                apply(&mut settings.strength, strength);
                apply(&mut settings.shadow_boost, shadow_boost);
                apply(&mut settings.highlight_compress, highlight_compress);
                apply(&mut settings.midpoint, midpoint);
                apply(&mut settings.tone_mode, tone_mode);
                apply(&mut settings.color_method, color_method);
                apply(&mut settings.processing_mode, processing_mode);
                apply(&mut settings.render_measured, render_measured);
                store.save_settings(&settings)?;
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
            SettingsAction::Reset => {
                store.save_settings(&ProcessingSettings::default())?;
                println!("settings reset to defaults");
            }
        },

        Commands::Tuning { action } => match action {
            TuningAction::Show => {
                let tuning = store.load_tuning()?;
                println!("{}", serde_json::to_string_pretty(&tuning)?);
            }
            TuningAction::Set {
                contrast,
                brightness,
            } => {
                let mut tuning = store.load_tuning()?;
                apply(&mut tuning.contrast, contrast);
                apply(&mut tuning.brightness_fstop, brightness);
                store.save_tuning(&tuning)?;
                println!("{}", serde_json::to_string_pretty(&tuning)?);
            }
            TuningAction::Reset => {
                store.save_tuning(&DisplayTuning::default())?;
                println!("tuning reset to defaults");
            }
        },
    }

    Ok(())
}

fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb() {
        assert_eq!(parse_rgb("149,36,23").unwrap(), Rgb::new(149, 36, 23));
        assert_eq!(parse_rgb(" 0, 255, 0 ").unwrap(), Rgb::new(0, 255, 0));
        assert!(parse_rgb("1,2").is_err());
        assert!(parse_rgb("1,2,256").is_err());
        assert!(parse_rgb("red").is_err());
    }

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from([
            "inkframe", "convert", "in.jpg", "out.bmp", "--contrast", "1.1",
        ])
        .unwrap();
        match cli.command {
            Commands::Convert {
                width,
                height,
                contrast,
                brightness,
                ..
            } => {
                assert_eq!(width, 800);
                assert_eq!(height, 480);
                assert_eq!(contrast, Some(1.1));
                assert_eq!(brightness, None);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_cli_parses_palette_set() {
        let cli =
            Cli::try_parse_from(["inkframe", "palette", "set", "red", "149,36,23"]).unwrap();
        match cli.command {
            Commands::Palette {
                action: PaletteAction::Set { name, color },
            } => {
                assert_eq!(name, "red");
                assert_eq!(color, Rgb::new(149, 36, 23));
            }
            _ => panic!("expected palette set"),
        }
    }
}
