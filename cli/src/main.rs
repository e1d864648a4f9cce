mod commands;
mod formatters;

use clap::{Parser, Subcommand};
use commands::Client;
use procvisor_engine::DEFAULT_RPC_ADDR;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "procvisorctl", version, about = "Control a running procvisord")]
struct Cli {
    /// Daemon control address to connect to
    #[arg(short, long = "server-addr", global = true, default_value = DEFAULT_RPC_ADDR)]
    server_addr: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the daemon is reachable and print its service version
    Ping,
    /// Show process status
    Status {
        /// Also show directory, command and environment
        #[arg(short, long)]
        verbose: bool,
    },
    /// Start processes
    Start {
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },
    /// Stop processes (SIGINT, then wait)
    Stop {
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },
    /// Kill processes (SIGKILL)
    Kill {
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },
    /// Stop then start processes
    Restart {
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let client = Client::new(&cli.server_addr);

    let result = match cli.command {
        Command::Ping => commands::handle_ping(&client),
        Command::Status { verbose } => commands::handle_status(&client, verbose),
        Command::Start { names } => commands::handle_action(&client, "start", &names),
        Command::Stop { names } => commands::handle_action(&client, "stop", &names),
        Command::Kill { names } => commands::handle_action(&client, "kill", &names),
        Command::Restart { names } => commands::handle_action(&client, "restart", &names),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_addr() {
        let cli = Cli::try_parse_from(["procvisorctl", "ping"]).unwrap();
        assert_eq!(cli.server_addr, "127.0.0.1:7766");
        assert!(matches!(cli.command, Command::Ping));
    }

    #[test]
    fn test_server_addr_after_subcommand() {
        let cli = Cli::try_parse_from(["procvisorctl", "status", "-v", "-s", "10.0.0.1:9000"]).unwrap();
        assert_eq!(cli.server_addr, "10.0.0.1:9000");
        assert!(matches!(cli.command, Command::Status { verbose: true }));
    }

    #[test]
    fn test_actions_take_several_names() {
        let cli = Cli::try_parse_from(["procvisorctl", "restart", "web", "worker"]).unwrap();
        match cli.command {
            Command::Restart { names } => assert_eq!(names, vec!["web", "worker"]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_actions_require_a_name() {
        assert!(Cli::try_parse_from(["procvisorctl", "stop"]).is_err());
    }
}
