use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;
use directories_next::ProjectDirs;
use serde::{Serialize, de::DeserializeOwned};

use cubetrace_render::RenderConfig;

/// Environment variable which tests set to make sure they never touch the user's files.
const NO_CONFIG_FILES_IN_TESTS: &str = "CUBETRACE_DO_NOT_USE_CONFIG_FILES_IN_TESTS";

// -------------------------------------------------------------------------------------------------

/// Load render settings from a platform-appropriate read/write location, creating the
/// file with default contents if it does not exist.
///
/// This does not respect command-line options. Use [`SettingsArgs`] for that.
pub fn load_config() -> Result<RenderConfig, anyhow::Error> {
    if std::env::var_os(NO_CONFIG_FILES_IN_TESTS).is_some() {
        anyhow::bail!(
            "tests should be hermetic and not touch user config files \
            (environment variable {NO_CONFIG_FILES_IN_TESTS} set, \
            but --no-config-files not passed)"
        );
    }

    let project_dirs = ProjectDirs::from("org", "", "cubetrace")
        .ok_or_else(|| anyhow::anyhow!("could not find configuration directory"))?;
    fs::create_dir_all(project_dirs.config_dir())?;

    Ok(read_or_create_default_json_file(
        "render settings",
        &project_dirs.config_dir().join("render.json"),
        RenderConfig::default,
    ))
}

// -------------------------------------------------------------------------------------------------

/// [`clap::Args`] argument group struct for args that affect what settings are used.
#[derive(Clone, Debug, Default, clap::Args)]
pub struct SettingsArgs {
    /// Ignore all configuration files, using only defaults and command-line options.
    #[arg(long = "no-config-files")]
    pub no_config_files: bool,

    #[expect(clippy::doc_markdown, reason = "will be displayed in --help")]
    /// Override the value of a render setting for this run, instead of taking it from
    /// files or defaults.
    ///
    /// The value is specified as a key-value pair where the key is an unquoted string, the
    /// separator is “=”, and the value is a JSON value (which, if a string, must be quoted);
    /// for example: -Sbatch_size=256 or -Squality='"fancy"'
    #[arg(long = "set", short = 'S', value_parser = parse_configure, value_name = "NAME=JSON")]
    pub set: Vec<(String, serde_json::Value)>,
}

impl SettingsArgs {
    /// Constructs the [`RenderConfig`] a run with these args should start from, before
    /// any other command-line options are applied.
    pub fn build_config(self) -> Result<RenderConfig, anyhow::Error> {
        let Self {
            no_config_files,
            set: to_override,
        } = self;

        let persisted = if no_config_files {
            RenderConfig::default()
        } else {
            load_config().context("Error loading configuration files")?
        };

        apply_overrides(persisted, to_override)
    }
}

fn apply_overrides(
    config: RenderConfig,
    to_override: Vec<(String, serde_json::Value)>,
) -> Result<RenderConfig, anyhow::Error> {
    if to_override.is_empty() {
        return Ok(config);
    }
    let serde_json::Value::Object(mut current) =
        serde_json::to_value(&config).context("could not represent settings as JSON")?
    else {
        anyhow::bail!("render settings should appear as a JSON object");
    };
    for (key, value) in to_override {
        current.insert(key, value);
    }
    serde_json::from_value(serde_json::Value::Object(current))
        .context("--set did not produce valid settings")
}

fn parse_configure(arg: &str) -> Result<(String, serde_json::Value), anyhow::Error> {
    let (key, value) = arg.split_once('=').ok_or_else(|| anyhow::anyhow!("missing '='"))?;
    let value = serde_json::from_str(value)?;
    Ok((key.to_owned(), value))
}

// -------------------------------------------------------------------------------------------------

fn read_or_create_default_json_file<V: DeserializeOwned + Serialize>(
    description: &str,
    path: &Path,
    default: fn() -> V,
) -> V {
    match File::open(path) {
        Ok(file) => match serde_json::from_reader(BufReader::new(file)) {
            Ok(value) => {
                log::debug!(
                    "Loaded {description} from {path}",
                    path = path.to_string_lossy()
                );
                value
            }
            Err(e) => {
                log::warn!(
                    "Syntax error in {description} loaded from {path}; \
                    using default values. Error: {e}",
                    path = path.to_string_lossy(),
                );
                default()
            }
        },
        Err(open_for_read_error) if open_for_read_error.kind() == std::io::ErrorKind::NotFound => {
            log::info!(
                "No {description} file found; creating {path}",
                path = path.to_string_lossy()
            );
            let value = default();
            let written = serde_json::to_string_pretty(&value)
                .map_err(std::io::Error::from)
                .and_then(|json_text| fs::write(path, json_text.as_bytes()));
            match written {
                Ok(()) => log::trace!(
                    "Wrote default {description} to {path}",
                    path = path.to_string_lossy()
                ),
                Err(write_error) => {
                    log::error!(
                        "Error while writing default {description} file {path}: {write_error}",
                        path = path.to_string_lossy(),
                    );
                }
            }
            value
        }
        Err(e) => {
            log::error!(
                "Error while reading {description} file {path}: {e}",
                path = path.to_string_lossy(),
            );
            default()
        }
    }
}
