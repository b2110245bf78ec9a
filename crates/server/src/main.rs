use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::{error, info};

use auditdash_server::{run, ServerConfig};

fn print_usage() {
    eprintln!("usage: auditdash [ROOT] [--port PORT] [--config FILE]");
    eprintln!();
    eprintln!("Serve a built dashboard bundle with hardened response headers.");
    eprintln!("  ROOT           bundle directory (default: dist)");
    eprintln!("  --port PORT    listen port (default: 4173)");
    eprintln!("  --config FILE  JSON config; flags given after it still apply");
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let config = match parse_args(std::env::args().skip(1)) {
        Ok(Some(config)) => config,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("error: {}", message);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    info!("auditdash preview v{}", env!("CARGO_PKG_VERSION"));
    if let Err(err) = run(config).await {
        error!("{}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<ServerConfig>, String> {
    let mut config = ServerConfig::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--port" => {
                let value = args.next().ok_or_else(|| "--port needs a value".to_string())?;
                let port: u16 = value
                    .parse()
                    .map_err(|_| format!("invalid port: {}", value))?;
                config.bind.set_port(port);
            }
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--config needs a value".to_string())?;
                config = ServerConfig::from_file(Path::new(&value)).map_err(|e| e.to_string())?;
            }
            other if !other.starts_with('-') => config.root = PathBuf::from(other),
            other => return Err(format!("unknown flag: {}", other)),
        }
    }
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn parses_root_and_port() {
        let config = parse_args(args(&["build", "--port", "8080"])).unwrap().unwrap();
        assert_eq!(config.root, PathBuf::from("build"));
        assert_eq!(config.bind.port(), 8080);
    }

    #[test]
    fn help_short_circuits() {
        assert!(parse_args(args(&["--help"])).unwrap().is_none());
    }

    #[test]
    fn rejects_unknown_flags_and_bad_ports() {
        assert!(parse_args(args(&["--tls"])).is_err());
        assert!(parse_args(args(&["--port", "not-a-port"])).is_err());
        assert!(parse_args(args(&["--port"])).is_err());
    }
}
