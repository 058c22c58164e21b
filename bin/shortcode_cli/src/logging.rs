use log::Dispatch;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::Subscriber,
};

fn create_filter(verbose: Option<u8>) -> anyhow::Result<EnvFilter> {
    let mut extreme_trace = false;

    #[allow(clippy::wildcard_in_or_patterns)]
    let level_filter = match verbose {
        None | Some(0) => LevelFilter::INFO,
        Some(1) => LevelFilter::DEBUG,
        Some(2) => LevelFilter::TRACE,
        Some(3) | _ => {
            extreme_trace = true;
            LevelFilter::TRACE
        }
    };

    let mut filter = EnvFilter::from_default_env().add_directive(level_filter.into());

    // table construction is chatty at trace level
    if !extreme_trace {
        filter = filter.add_directive("shortcode::group=debug".parse()?);
    }

    Ok(filter)
}

/// Builds the global dispatcher. Logs go to stderr, leaving stdout for codes.
pub fn generate(verbose: Option<u8>) -> anyhow::Result<Dispatch> {
    let filter = create_filter(verbose)?;

    Ok(Dispatch::new(
        Subscriber::builder().with_env_filter(filter).with_writer(std::io::stderr).finish(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_levels() {
        for verbose in [None, Some(0), Some(1), Some(2), Some(3), Some(9)] {
            assert!(create_filter(verbose).is_ok());
        }
    }
}
