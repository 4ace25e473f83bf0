//! Command-line configuration and tracing setup.

use builder_core::HttpMethod;
use clap::Parser;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Build an HTTP request and a task around it, run the task once, and print
/// the JSON object it returns.
#[derive(Parser, Debug)]
#[command(name = "director", version, long_about = None)]
pub(crate) struct Cli {
    /// Absolute origin the path is appended to.
    #[arg(long, env = "BUILDER_BASE_ADDRESS", default_value = "https://api.github.com")]
    pub base_address: String,

    /// Path appended to the base address.
    #[arg(long, env = "BUILDER_PATH", default_value = "/search/repositories")]
    pub path: String,

    /// GET or POST.
    #[arg(long, env = "BUILDER_METHOD", default_value = "GET", value_parser = parse_method)]
    pub method: HttpMethod,

    /// Request header as KEY:VALUE. Repeatable; the last value for a key wins.
    #[arg(
        short = 'H',
        long = "header",
        value_parser = parse_header,
        default_value = "Content-Type: application/json"
    )]
    pub headers: Vec<(String, String)>,

    /// Query parameter as KEY=VALUE. Repeatable; the last value for a key wins.
    #[arg(
        short = 'p',
        long = "param",
        value_parser = parse_param,
        default_value = "q=Builder Design Pattern"
    )]
    pub params: Vec<(String, String)>,

    /// Print the resolved request instead of sending it.
    #[arg(long)]
    pub dry_run: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

fn parse_method(value: &str) -> Result<HttpMethod, String> {
    value.parse().map_err(|e: builder_core::ConfigurationError| e.to_string())
}

fn parse_header(value: &str) -> Result<(String, String), String> {
    let (key, val) = value
        .split_once(':')
        .ok_or_else(|| format!("expected KEY:VALUE, got {value:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty header name in {value:?}"));
    }
    Ok((key.to_string(), val.trim().to_string()))
}

fn parse_param(value: &str) -> Result<(String, String), String> {
    let (key, val) = value
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {value:?}"))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in {value:?}"));
    }
    Ok((key.to_string(), val.to_string()))
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing on stderr; stdout is reserved for the response object.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match cli.verbose {
        0 => "director=info,builder_core=info",
        1 => "director=debug,builder_core=debug",
        _ => "director=trace,builder_core=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("director").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_describe_the_github_search() {
        let cli = parse(&[]);
        assert_eq!(cli.base_address, "https://api.github.com");
        assert_eq!(cli.path, "/search/repositories");
        assert_eq!(cli.method, HttpMethod::Get);
        assert_eq!(
            cli.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert_eq!(
            cli.params,
            vec![("q".to_string(), "Builder Design Pattern".to_string())]
        );
        assert!(!cli.dry_run);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn explicit_values_replace_defaults() {
        let cli = parse(&[
            "--base-address",
            "http://localhost:3000",
            "--method",
            "post",
            "-H",
            "Accept: application/json",
            "-p",
            "q=rust",
            "-p",
            "sort=stars",
            "--dry-run",
        ]);
        assert_eq!(cli.base_address, "http://localhost:3000");
        assert_eq!(cli.method, HttpMethod::Post);
        assert_eq!(
            cli.headers,
            vec![("Accept".to_string(), "application/json".to_string())]
        );
        assert_eq!(cli.params.len(), 2);
        assert!(cli.dry_run);
    }

    #[test]
    fn header_value_may_contain_colons() {
        assert_eq!(
            parse_header("Referer: http://example.com").unwrap(),
            ("Referer".to_string(), "http://example.com".to_string())
        );
    }

    #[test]
    fn param_value_may_contain_equals() {
        assert_eq!(
            parse_param("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn malformed_pairs_are_rejected() {
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": value").is_err());
        assert!(parse_param("no-equals").is_err());
        assert!(parse_param("=value").is_err());
    }

    #[test]
    fn unsupported_method_is_rejected() {
        let argv = ["director", "--method", "DELETE"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
