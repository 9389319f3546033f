use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "MARKU_LOG";

/// Installs a stderr subscriber. `MARKU_LOG` takes precedence over `-v`.
/// Interactive sessions stay silent unless `MARKU_LOG` is set, since log
/// lines would land on top of the terminal UI.
pub fn init(verbose: u8, interactive: bool) {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) if interactive => return,
        Err(_) => EnvFilter::new(default_level(verbose)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(default_level(0), "warn");
        assert_eq!(default_level(1), "debug");
        assert_eq!(default_level(2), "trace");
        assert_eq!(default_level(5), "trace");
    }
}
