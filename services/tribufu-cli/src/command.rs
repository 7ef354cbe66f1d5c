//! Argument parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tribufu", version, about = "Command-line client for the Tribufu API")]
pub struct Args {
    /// Path to the TOML config (default: ./tribufu.toml)
    #[arg(long, global = true, env = "CONFIG_PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List games
    Games {
        #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// List game servers
    Servers {
        #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Show one game server by numeric id or host:port address
    Server { id_or_address: String },
    /// List server clusters
    Clusters {
        #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Show a user profile
    User { id: String },
    /// Password login; the password comes from <PREFIX>_PASSWORD
    Login { username: String },
    /// Log in as <PREFIX>_SERVER_ID and show its record
    ServerLogin,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("tribufu").chain(args.iter().copied()))
    }

    #[test]
    fn definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn list_defaults_to_first_page() {
        let args = parse(&["games"]).unwrap();
        assert_eq!(args.command, Command::Games { page: 1 });
    }

    #[test]
    fn config_flag_after_subcommand() {
        let args = parse(&["servers", "--config", "/etc/tribufu.toml", "3"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/etc/tribufu.toml")));
        assert_eq!(args.command, Command::Servers { page: 3 });
    }

    #[test]
    fn config_falls_back_to_config_path_env() {
        let command = Args::command();
        let config = command
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .unwrap();
        assert_eq!(config.get_env(), Some(std::ffi::OsStr::new("CONFIG_PATH")));
    }

    #[test]
    fn server_lookup_argument() {
        let args = parse(&["server", "10.0.0.1:7777"]).unwrap();
        assert_eq!(
            args.command,
            Command::Server {
                id_or_address: "10.0.0.1:7777".into()
            }
        );
    }

    #[test]
    fn missing_required_argument() {
        let err = parse(&["user"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn bad_page_rejected() {
        assert_eq!(parse(&["clusters", "two"]).unwrap_err().kind(), ErrorKind::ValueValidation);
        assert_eq!(parse(&["clusters", "0"]).unwrap_err().kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn unknown_command_rejected() {
        let err = parse(&["deploy"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn dangling_config_flag() {
        assert!(parse(&["games", "--config"]).is_err());
    }

    #[test]
    fn no_command() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn server_login_takes_no_argument() {
        assert_eq!(parse(&["server-login"]).unwrap().command, Command::ServerLogin);
        assert_eq!(
            parse(&["server-login", "42"]).unwrap_err().kind(),
            ErrorKind::UnknownArgument
        );
    }
}
