use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use cover_wallpaper::{
    AlbumArtResolver, DEFAULT_FILE_NAME, DEVICE_PROFILES, Exporter, FileExporter, FileResolver,
    FrostedSettings, GradientSettings, ModeSettings, ShadowSettings, WallpaperSettings,
};

#[derive(Parser, Debug)]
#[command(name = "cover-wallpaper", version, about)]
struct Cli {
    /// Log pipeline stages to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a wallpaper from a local cover image.
    Render(RenderArgs),
    /// List the built-in device profiles.
    Devices,
    /// Print the effective settings as JSON.
    Settings(SettingsArgs),
    /// Print the JSON schema of the settings document.
    #[cfg(feature = "jsonschema")]
    Schema,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Cover image path or `file://` URL.
    #[arg(long)]
    cover: String,

    /// Output path. PNG or JPEG, by extension.
    #[arg(long, default_value = DEFAULT_FILE_NAME)]
    out: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Args, Debug)]
struct SettingsArgs {
    /// Settings JSON file. Flags below override its values.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Device profile name, e.g. "iPhone 16".
    #[arg(long)]
    device: Option<String>,

    /// Background style.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Cover edge length in pixels.
    #[arg(long)]
    cover_size: Option<u32>,

    /// Corner radius in pixels.
    #[arg(long)]
    corner_radius: Option<u32>,

    /// Distance of the cover from the top, in pixels.
    #[arg(long)]
    position: Option<u32>,

    /// Gradient steps (gradient mode).
    #[arg(long)]
    steps: Option<usize>,

    /// Blur radius (frosted mode).
    #[arg(long)]
    blur: Option<f32>,

    /// Darkening mask opacity, 0 to 1 (frosted mode).
    #[arg(long)]
    mask_opacity: Option<f32>,

    /// Draw a soft shadow under the cover.
    #[arg(long)]
    shadow: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Gradient,
    Frosted,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Devices => {
            cmd_devices();
            Ok(())
        }
        Command::Settings(args) => {
            let settings = resolve_settings(&args)?;
            println!("{}", settings.to_json_pretty()?);
            Ok(())
        }
        #[cfg(feature = "jsonschema")]
        Command::Schema => {
            let schema = schemars::schema_for!(WallpaperSettings);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_settings(path: &Path) -> anyhow::Result<WallpaperSettings> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("read settings '{}'", path.display()))?;
    WallpaperSettings::from_json(&json).with_context(|| format!("parse settings '{}'", path.display()))
}

fn resolve_settings(args: &SettingsArgs) -> anyhow::Result<WallpaperSettings> {
    let mut settings = match &args.settings {
        Some(path) => read_settings(path)?,
        None => WallpaperSettings::default(),
    };

    if let Some(device) = &args.device {
        settings.device = device.clone();
    }
    match args.mode {
        Some(ModeChoice::Gradient) if !matches!(settings.mode, ModeSettings::Gradient(_)) => {
            settings.mode = ModeSettings::gradient();
        }
        Some(ModeChoice::Frosted) if !matches!(settings.mode, ModeSettings::Frosted(_)) => {
            settings.mode = ModeSettings::frosted();
        }
        _ => {}
    }
    if let Some(size) = args.cover_size {
        settings.cover_size = size;
    }
    if let Some(radius) = args.corner_radius {
        settings.corner_radius = radius;
    }
    if let Some(position) = args.position {
        settings.cover_position = position;
    }

    match &mut settings.mode {
        ModeSettings::Gradient(GradientSettings { steps }) => {
            if args.blur.is_some() || args.mask_opacity.is_some() {
                anyhow::bail!("--blur and --mask-opacity only apply to frosted mode");
            }
            if let Some(n) = args.steps {
                *steps = n;
            }
        }
        ModeSettings::Frosted(FrostedSettings {
            blur_radius,
            mask_opacity,
        }) => {
            if args.steps.is_some() {
                anyhow::bail!("--steps only applies to gradient mode");
            }
            if let Some(blur) = args.blur {
                *blur_radius = blur;
            }
            if let Some(opacity) = args.mask_opacity {
                *mask_opacity = opacity;
            }
        }
    }

    if args.shadow && settings.shadow.is_none() {
        settings.shadow = Some(ShadowSettings::default());
    }
    Ok(settings)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let settings = resolve_settings(&args.settings)?;
    let request = settings.to_request().context("resolve settings")?;

    let art = FileResolver::new()
        .resolve(&args.cover)
        .with_context(|| format!("load cover '{}'", args.cover))?;
    let source = art.decode().context("decode cover")?;

    let wallpaper = cover_wallpaper::render_request(&source, &request)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    FileExporter::new(&args.out)?
        .export(&wallpaper)
        .with_context(|| format!("write wallpaper '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{}, {})",
        args.out.display(),
        request.device.width,
        request.device.height,
        request.mode.name()
    );
    Ok(())
}

fn cmd_devices() {
    for profile in DEVICE_PROFILES {
        println!("{:<20} {}x{}", profile.name, profile.width, profile.height);
    }
}
