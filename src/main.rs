//! formgate CLI
//!
//! Sends one request through the serialized pipeline and prints the result.
//!
//! # Usage
//!
//! ## Page mode (redirects followed, body printed)
//! ```bash
//! formgate --path "page=settings" --field update=1 --user testlandia
//! ```
//!
//! ## Raw mode (redirects not followed, final status and URL printed)
//! ```bash
//! formgate --path "page=login" --field nation=testlandia --raw
//! ```

use clap::Parser;

use formgate::cli::{SendArgs, run_send_mode};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "formgate")]
struct Cli {
    /// Target path on the service, e.g. "page=settings"
    #[arg(short = 'p', long, value_name = "PATH")]
    path: String,

    /// Form field as key=value; may be repeated
    #[arg(short = 'f', long = "field", value_name = "KEY=VALUE")]
    fields: Vec<String>,

    /// Raw mode: do not follow redirects, print final status and URL
    #[arg(long)]
    raw: bool,

    /// Name of the user on whose behalf the request is made
    #[arg(short, long, value_name = "USER")]
    user: Option<String>,

    /// Service host: "primary", "mirror", or a custom base URL
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let args = SendArgs {
        path: cli.path,
        fields: cli.fields,
        raw: cli.raw,
        user: cli.user,
        host: cli.host,
        config: cli.config,
        verbose: cli.verbose,
    };
    run_send_mode(args).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_page_mode_args() {
        let cli = Cli::parse_from(&[
            "formgate",
            "--path",
            "page=settings",
            "--field",
            "update=1",
            "--field",
            "email=a@b.c",
            "--user",
            "testlandia",
        ]);

        assert_eq!(cli.path, "page=settings");
        assert_eq!(cli.fields, vec!["update=1", "email=a@b.c"]);
        assert_eq!(cli.user, Some("testlandia".to_string()));
        assert!(!cli.raw);
        assert_eq!(cli.host, None);
    }

    #[test]
    fn test_host_option() {
        let cli = Cli::parse_from(&["formgate", "-p", "page=x", "--host", "mirror"]);
        assert_eq!(cli.host, Some("mirror".to_string()));

        let cli = Cli::parse_from(&["formgate", "-p", "page=x", "--host", "http://127.0.0.1:9"]);
        assert_eq!(cli.host, Some("http://127.0.0.1:9".to_string()));
    }

    #[test]
    fn test_raw_mode_flag() {
        let cli = Cli::parse_from(&["formgate", "--path", "page=login", "--raw"]);
        assert!(cli.raw);
        assert!(cli.fields.is_empty());
    }

    #[test]
    fn test_path_is_required() {
        let result = Cli::try_parse_from(&["formgate", "--raw"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::parse_from(&["formgate", "-p", "page=x", "-f", "a=1", "-u", "someone"]);
        assert_eq!(cli.path, "page=x");
        assert_eq!(cli.fields, vec!["a=1"]);
        assert_eq!(cli.user, Some("someone".to_string()));
    }

    #[test]
    fn test_config_option() {
        let cli = Cli::parse_from(&["formgate", "-p", "page=x", "--config", "/etc/fg.toml"]);
        assert_eq!(cli.config, Some("/etc/fg.toml".to_string()));
    }
}
