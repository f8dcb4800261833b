use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::AppError;
use crate::walker::ScanOrder;

pub const DEFAULT_IMAGES_PER_PAGE: i64 = 200;
pub const DEFAULT_WEB_PORT: i64 = 8080;

/// Command-line overrides, applied on top of every other configuration source.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "picture_gallery", about = "Serve a local folder of pictures to the browser")]
pub struct Cli {
    /// Directory holding the layered config files
    #[arg(long, default_value = "config")]
    pub config_dir: String,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory to scan for pictures
    #[arg(long)]
    pub pictures: Option<String>,

    /// Log level filter (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// `GALLERY_*` variables; `GALLERY_ALLOWED_EXTENSIONS` is a comma-separated list.
fn environment() -> Environment {
    Environment::with_prefix("GALLERY")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("allowed_extensions")
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub pictures_directory: String,
    pub static_directory: String,
    pub templates_directory: String,
    pub index_template: String,
    pub allowed_extensions: HashSet<String>,
    pub images_per_page: usize,
    pub order: ScanOrder,
    pub bind_address: String,
    pub web_port: u16,
    pub num_workers: usize,
    pub log_level: String,
}

impl AppConfig {
    pub fn new(cli: &Cli) -> Result<Self, AppError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let dir = cli.config_dir.trim_end_matches('/');

        let s = Config::builder()
            .set_default("pictures_directory", "pictures")?
            .set_default("static_directory", "static")?
            .set_default("templates_directory", "templates")?
            .set_default("index_template", "index.html")?
            .set_default("allowed_extensions", vec!["jpg", "jpeg", "png", "gif", "webp"])?
            .set_default("images_per_page", DEFAULT_IMAGES_PER_PAGE)?
            .set_default("order", "reverse")?
            .set_default("bind_address", "0.0.0.0")?
            .set_default("web_port", DEFAULT_WEB_PORT)?
            .set_default("num_workers", 4_i64)?
            .set_default("log_level", "info")?
            .add_source(File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(File::with_name(&format!("{}/{}", dir, env)).required(false))
            .add_source(File::with_name(&format!("{}/local", dir)).required(false))
            .add_source(environment())
            .set_override_option("web_port", cli.port.map(i64::from))?
            .set_override_option("pictures_directory", cli.pictures.clone())?
            .set_override_option("log_level", cli.log_level.clone())?
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;
        config.allowed_extensions = config
            .allowed_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        Ok(config)
    }

    pub fn template_path(&self) -> PathBuf {
        PathBuf::from(&self.templates_directory).join(&self.index_template)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.web_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn cli_for(dir: &std::path::Path) -> Cli {
        Cli {
            config_dir: dir.to_string_lossy().into_owned(),
            ..Cli::default()
        }
    }

    #[test]
    fn defaults_apply_without_any_config_file() {
        let dir = tempdir().unwrap();
        let config = AppConfig::new(&cli_for(dir.path())).unwrap();

        assert_eq!(config.pictures_directory, "pictures");
        assert_eq!(config.images_per_page, 200);
        assert_eq!(config.web_port, 8080);
        assert_eq!(config.order, ScanOrder::Reverse);
        assert_eq!(config.allowed_extensions.len(), 5);
        assert!(config.allowed_extensions.contains("webp"));
        assert_eq!(config.listen_address(), "0.0.0.0:8080");
    }

    #[test]
    fn local_file_overrides_defaults_and_normalises_extensions() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("local.toml"),
            "images_per_page = 50\norder = \"modified\"\nallowed_extensions = [\".JPG\", \"png\"]\n",
        )
        .unwrap();

        let config = AppConfig::new(&cli_for(dir.path())).unwrap();

        assert_eq!(config.images_per_page, 50);
        assert_eq!(config.order, ScanOrder::Modified);
        assert!(config.allowed_extensions.contains("jpg"));
        assert!(config.allowed_extensions.contains("png"));
        assert_eq!(config.allowed_extensions.len(), 2);
    }

    #[test]
    fn environment_parses_extension_lists_and_numbers() {
        let mut vars = config::Map::new();
        vars.insert("GALLERY_ALLOWED_EXTENSIONS".to_string(), "jpg,png".to_string());
        vars.insert("GALLERY_WEB_PORT".to_string(), "9300".to_string());

        let s = Config::builder()
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap();

        let extensions: HashSet<String> = s.get("allowed_extensions").unwrap();
        assert_eq!(extensions.len(), 2);
        assert!(extensions.contains("jpg"));
        assert!(extensions.contains("png"));
        assert_eq!(s.get::<u16>("web_port").unwrap(), 9300);
    }

    #[test]
    fn every_flag_has_help_text() {
        use clap::CommandFactory;

        let command = Cli::command();
        for arg in command.get_arguments() {
            if arg.get_id() == "help" {
                continue;
            }
            assert!(arg.get_help().is_some(), "--{} has no help", arg.get_id());
        }
        Cli::command().debug_assert();
    }

    #[test]
    fn malformed_value_is_a_config_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("local.toml"), "web_port = \"not a port\"\n").unwrap();

        let result = AppConfig::new(&cli_for(dir.path()));

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn command_line_wins_over_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "web_port = 9000\n").unwrap();

        let cli = Cli {
            port: Some(9100),
            pictures: Some("/srv/photos".to_string()),
            ..cli_for(dir.path())
        };
        let config = AppConfig::new(&cli).unwrap();

        assert_eq!(config.web_port, 9100);
        assert_eq!(config.pictures_directory, "/srv/photos");
        assert_eq!(
            config.template_path(),
            PathBuf::from("templates").join("index.html")
        );
    }
}
