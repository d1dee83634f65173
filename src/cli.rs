use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::tracing::LogFormat;
use clap::Parser;
use std::num::NonZeroUsize;

#[derive(Debug, Parser)]
#[command(name = "mkn-mcp")]
#[command(about = "Look up Czech MKN-10 diagnoses for AI assistants", long_about = None)]
pub struct Cli {
    /// ClaML XML file to load on startup
    #[arg(long, env = "MKN_CLAML_PATH")]
    pub claml: Option<String>,

    /// Number of parsed documents kept in memory
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: NonZeroUsize,

    /// Log line format written to stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_defaults() {
        let_assert!(Ok(cli) = Cli::try_parse_from(["mkn-mcp"]));
        check!(cli.cache_capacity == DEFAULT_CACHE_CAPACITY);
        check!(cli.log_format == LogFormat::Compact);
    }

    #[test]
    fn test_explicit_arguments() {
        let_assert!(
            Ok(cli) = Cli::try_parse_from(["mkn-mcp", "--claml", "~/mkn.xml", "--cache-capacity", "2"])
        );
        check!(cli.claml.as_deref() == Some("~/mkn.xml"));
        check!(cli.cache_capacity.get() == 2);
    }

    #[test]
    fn test_json_log_format() {
        let_assert!(Ok(cli) = Cli::try_parse_from(["mkn-mcp", "--log-format", "json"]));
        check!(cli.log_format == LogFormat::Json);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        check!(Cli::try_parse_from(["mkn-mcp", "--cache-capacity", "0"]).is_err());
    }
}
