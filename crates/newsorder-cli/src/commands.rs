//! CLI argument definitions using clap

use clap::{Parser, ValueEnum};
use newsorder::{BrowserConfig, DEFAULT_BASE_URL};

use crate::config::{CliConfig, ColorChoice, Verbosity};
use crate::output::OutputFormat;

/// Check that the Hacker News "newest" listing is sorted newest-first
#[derive(Parser, Debug)]
#[command(name = "newsorder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorArg,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: FormatArg,

    /// Site root
    #[arg(long, env = "NEWSORDER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Disable the Chromium sandbox (containers/CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Path to the Chromium binary
    #[arg(long, env = "CHROMIUM_PATH")]
    pub chromium_path: Option<String>,
}

impl Cli {
    /// Resolve parsed arguments into a configuration
    #[must_use]
    pub fn to_config(&self) -> CliConfig {
        let mut browser = BrowserConfig::default().with_headless(!self.headed);
        if self.no_sandbox {
            browser = browser.with_no_sandbox();
        }
        if let Some(path) = &self.chromium_path {
            browser = browser.with_chromium_path(path.clone());
        }

        CliConfig::new()
            .with_verbosity(Verbosity::from_flags(self.quiet, self.verbose))
            .with_color(self.color.clone().into())
            .with_format(self.format.clone().into())
            .with_base_url(self.base_url.clone())
            .with_browser(browser)
    }
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Format argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON on stdout
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let cli = Cli::try_parse_from(["newsorder"]).unwrap();
            assert_eq!(cli.verbose, 0);
            assert!(!cli.quiet);
            assert!(!cli.headed);
            assert!(!cli.no_sandbox);
        }

        #[test]
        fn test_verbose_count() {
            let cli = Cli::try_parse_from(["newsorder", "-vv"]).unwrap();
            assert_eq!(cli.verbose, 2);
        }

        #[test]
        fn test_browser_flags() {
            let cli = Cli::try_parse_from([
                "newsorder",
                "--headed",
                "--no-sandbox",
                "--chromium-path",
                "/opt/chromium",
            ])
            .unwrap();
            let config = cli.to_config();
            assert!(!config.browser.headless);
            assert!(!config.browser.sandbox);
            assert_eq!(config.browser.chromium_path.as_deref(), Some("/opt/chromium"));
        }

        #[test]
        fn test_format_and_color() {
            let cli =
                Cli::try_parse_from(["newsorder", "--format", "json", "--color", "never", "-q"])
                    .unwrap();
            let config = cli.to_config();
            assert_eq!(config.format, OutputFormat::Json);
            assert_eq!(config.color, ColorChoice::Never);
            assert_eq!(config.verbosity, Verbosity::Quiet);
        }

        #[test]
        fn test_base_url_flag() {
            let cli = Cli::try_parse_from(["newsorder", "--base-url", "http://localhost:8080"])
                .unwrap();
            assert_eq!(cli.to_config().base_url, "http://localhost:8080");
        }

        #[test]
        fn test_rejects_unknown_format() {
            assert!(Cli::try_parse_from(["newsorder", "--format", "xml"]).is_err());
        }

        #[test]
        fn test_rejects_positional_arguments() {
            assert!(Cli::try_parse_from(["newsorder", "front"]).is_err());
        }
    }

    mod conversion_tests {
        use super::*;

        #[test]
        fn test_color_arg_conversion() {
            assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
        }

        #[test]
        fn test_format_arg_conversion() {
            assert_eq!(OutputFormat::from(FormatArg::Json), OutputFormat::Json);
        }
    }
}
