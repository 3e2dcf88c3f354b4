//! Command line option parsing.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use cubetrace::euclid::point3;
use cubetrace::math::FreePoint;
use cubetrace_desktop::SceneSource;
use cubetrace_desktop::SettingsArgs;
use cubetrace_desktop::logging::LoggingArgs;
use cubetrace_desktop::record::RecordOptions;
use cubetrace_render::{Quality, RenderConfig};

#[derive(Clone, Debug, Parser)]
#[command(
    name = crate::TITLE, author, about, version,
    help_template = "\
{name} {version}
{author}
{about-with-newline}
{usage-heading}
    {usage}

{all-args}{after-help}",
)]
pub(crate) struct CubetraceArgs {
    /// Rendering strategy: one deterministic sample per pixel, or many random ones.
    ///
    /// Selecting a quality also selects its sample, bounce, and shadow settings, which
    /// the more specific options below can then override.
    #[arg(long = "quality", short = 'q', value_name = "QUALITY")]
    pub(crate) quality: Option<QualityArg>,

    /// Image size. Defaults to the size in the settings file, which is initially 400×300.
    #[arg(long = "display-size", value_name = "W×H")]
    pub(crate) display_size: Option<DisplaySizeArg>,

    /// Number of render threads; 0 means one per processor.
    #[arg(long = "threads", value_name = "N")]
    pub(crate) threads: Option<usize>,

    /// Samples per pixel in fancy quality.
    #[arg(long = "samples", value_name = "N")]
    pub(crate) samples: Option<u32>,

    /// Maximum number of surfaces each ray may interact with.
    #[arg(long = "max-bounces", value_name = "N")]
    pub(crate) max_bounces: Option<u32>,

    /// Seed value for world generation and for random sampling.
    ///
    /// May be an integer between 0 and 18446744073709551615 (2⁶⁴ - 1).
    #[arg(long = "seed", default_value_t = 0)]
    pub(crate) seed: u64,

    /// Animation time of the (first) frame, in seconds. Affects the water surface.
    #[arg(
        long = "time",
        value_name = "SECONDS",
        default_value_t = 0.0,
        allow_negative_numbers = true
    )]
    pub(crate) time: f64,

    /// Render this many frames of animation instead of a single image.
    ///
    /// Each frame is written to its own file; see --output.
    #[arg(long = "frames", value_name = "N")]
    pub(crate) frames: Option<usize>,

    /// Frames per second of animation time, when --frames is given.
    #[arg(long = "fps", requires = "frames", default_value_t = 30.0)]
    pub(crate) fps: f64,

    /// Which world to render.
    #[arg(long = "scene", default_value_t = SceneSource::Demo)]
    pub(crate) scene: SceneSource,

    /// PNG image of 16×16 texture tiles to color blocks with, instead of flat colors.
    #[arg(long = "atlas", value_name = "FILE")]
    pub(crate) atlas: Option<PathBuf>,

    /// Position of the camera. Defaults to just above the ground in the middle of the world.
    #[arg(long = "camera", value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub(crate) camera: Option<CameraPositionArg>,

    /// Compass direction the camera faces, in degrees; 0 is +X and 90 is +Z.
    #[arg(
        long = "yaw",
        value_name = "DEGREES",
        default_value_t = 0.0,
        allow_negative_numbers = true
    )]
    pub(crate) yaw: f64,

    /// Angle of the camera above the horizon, in degrees.
    #[arg(
        long = "pitch",
        value_name = "DEGREES",
        default_value_t = -20.0,
        allow_negative_numbers = true
    )]
    pub(crate) pitch: f64,

    /// Vertical field of view, in degrees.
    #[arg(long = "fov", value_name = "DEGREES", default_value_t = 70.0)]
    pub(crate) fov: f64,

    /// Output file name. It is always written in PNG format.
    ///
    /// When rendering multiple --frames, “{n}” in the name is replaced with the frame
    /// number; if it is absent, the number is added before the extension.
    #[arg(
        long = "output",
        short = 'o',
        value_name = "FILE",
        default_value = "ochd_0.png",
        verbatim_doc_comment
    )]
    pub(crate) output: PathBuf,

    #[command(flatten)]
    pub(crate) logging: LoggingArgs,

    #[command(flatten)]
    pub(crate) settings: SettingsArgs,
}

impl CubetraceArgs {
    /// Applies the rendering options to `config`, which was read from the settings file.
    pub(crate) fn apply_to_config(&self, mut config: RenderConfig) -> RenderConfig {
        if let Some(quality) = self.quality {
            let preset = match quality {
                QualityArg::Fast => RenderConfig::fast(),
                QualityArg::Fancy => RenderConfig::fancy(),
            };
            config.quality = quality.into();
            config.samples_per_pixel = preset.samples_per_pixel;
            config.max_bounces = preset.max_bounces;
            config.shadow_samples = preset.shadow_samples;
            config.report_progress = preset.report_progress;
        }
        if let Some(DisplaySizeArg([width, height])) = self.display_size {
            config.width = width;
            config.height = height;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(max_bounces) = self.max_bounces {
            config.max_bounces = max_bounces;
        }
        config.repair()
    }

    /// Construct [`RecordOptions`].
    ///
    /// Returns an error if options were inconsistent with each other.
    pub(crate) fn record_options(&self) -> Result<RecordOptions, anyhow::Error> {
        let still = RecordOptions::still(self.output.clone(), self.time);
        match self.frames {
            None => Ok(still),
            Some(frames) => still
                .animated(frames, self.fps)
                .ok_or_else(|| anyhow::anyhow!("--fps must be a positive number")),
        }
    }
}

/// Command-line names for [`Quality`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub(crate) enum QualityArg {
    /// One deterministic sample per pixel
    Fast,
    /// Many random samples per pixel, with soft shadows
    Fancy,
}

impl From<QualityArg> for Quality {
    fn from(value: QualityArg) -> Self {
        match value {
            QualityArg::Fast => Quality::Fast,
            QualityArg::Fancy => Quality::Fancy,
        }
    }
}

/// Image size, parseable in a variety of formats.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DisplaySizeArg(pub [u32; 2]);

impl FromStr for DisplaySizeArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dims: [u32; 2] = split_numbers(s)?
            .try_into()
            .map_err(|_| String::from("must be two integers"))?;
        if dims.contains(&0) {
            return Err(String::from("must not be zero"));
        }
        Ok(DisplaySizeArg(dims))
    }
}

/// Camera position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CameraPositionArg(pub FreePoint);

impl FromStr for CameraPositionArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x, y, z]: [f64; 3] = split_numbers(s)?
            .try_into()
            .map_err(|_| String::from("must be three numbers"))?;
        Ok(CameraPositionArg(point3(x, y, z)))
    }
}

fn split_numbers<T: FromStr>(s: &str) -> Result<Vec<T>, String> {
    s.split(&['×', 'x', ',', ';', ' '][..])
        .map(|s| {
            s.trim()
                .parse::<T>()
                .map_err(|_| format!("{s:?} not a number"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::{ContextValue, ErrorKind};
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> clap::error::Result<CubetraceArgs> {
        CubetraceArgs::try_parse_from(std::iter::once("cubetrace").chain(args.iter().copied()))
    }

    fn error_context(
        error: &clap::Error,
        wanted_kind: clap::error::ContextKind,
    ) -> Option<&ContextValue> {
        error
            .context()
            .find_map(|(k, v)| if k == wanted_kind { Some(v) } else { None })
    }

    #[test]
    fn defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.output, PathBuf::from("ochd_0.png"));
        assert_eq!(args.scene, SceneSource::Demo);
        assert_eq!(args.apply_to_config(RenderConfig::fast()), RenderConfig::fast());
        assert_eq!(
            args.record_options().unwrap(),
            RecordOptions::still(PathBuf::from("ochd_0.png"), 0.0)
        );
    }

    #[test]
    fn display_size_formats() {
        for text in ["640x480", "640×480", "640,480", "640;480", "640 480"] {
            assert_eq!(
                parse(&["--display-size", text]).unwrap().display_size,
                Some(DisplaySizeArg([640, 480])),
                "{text}"
            );
        }
    }

    #[test]
    fn display_size_invalid() {
        for text in ["640", "0x10", "axb", "1x2x3"] {
            let e = parse(&["--display-size", text]).unwrap_err();
            assert_eq!(e.kind(), ErrorKind::ValueValidation, "{text}");
            assert_eq!(
                error_context(&e, clap::error::ContextKind::InvalidArg),
                Some(&ContextValue::String(String::from("--display-size <W×H>")))
            );
        }
    }

    #[test]
    fn fancy_preset_then_overrides() {
        let config = parse(&["--quality", "fancy", "--samples", "3", "--threads", "2"])
            .unwrap()
            .apply_to_config(RenderConfig::fast());
        let fancy = RenderConfig::fancy();
        assert_eq!(config.quality, Quality::Fancy);
        assert_eq!(config.samples_per_pixel, 3);
        assert_eq!(config.threads, 2);
        assert_eq!(config.max_bounces, fancy.max_bounces);
        assert_eq!(config.shadow_samples, fancy.shadow_samples);
        assert_eq!(config.width, 400);
    }

    #[test]
    fn fast_preset_replaces_fancy_settings() {
        let config = parse(&["-q", "fast"])
            .unwrap()
            .apply_to_config(RenderConfig::fancy());
        assert_eq!(config.quality, Quality::Fast);
        assert_eq!(config.samples_per_pixel, 1);
        assert!(!config.report_progress);
    }

    #[test]
    fn camera_and_negative_angles() {
        let args = parse(&["--camera", "1.5,40,-2", "--yaw", "-90", "--pitch", "-45"]).unwrap();
        assert_eq!(args.camera, Some(CameraPositionArg(point3(1.5, 40.0, -2.0))));
        assert_eq!(args.yaw, -90.0);
        assert_eq!(args.pitch, -45.0);
    }

    #[test]
    fn animation() {
        let args = parse(&["--frames", "4", "--fps", "2", "--time", "1", "-o", "a{n}.png"]).unwrap();
        assert_eq!(
            args.record_options().unwrap(),
            RecordOptions::still(PathBuf::from("a{n}.png"), 1.0)
                .animated(4, 2.0)
                .unwrap()
        );
    }

    #[test]
    fn fps_requires_frames() {
        let e = parse(&["--fps", "10"]).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn zero_fps() {
        let e = parse(&["--frames", "2", "--fps", "0"])
            .unwrap()
            .record_options()
            .unwrap_err();
        assert_eq!(e.to_string(), "--fps must be a positive number");
    }

    #[test]
    fn settings_and_logging_are_flattened() {
        let args = parse(&["--no-config-files", "-S", "batch_size=8", "-v"]).unwrap();
        assert!(args.logging.verbose);
        assert!(args.settings.no_config_files);
        assert_eq!(
            args.settings.set,
            vec![("batch_size".to_owned(), serde_json::json!(8))]
        );
    }
}
