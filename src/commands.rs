// src/commands.rs

use crate::config::{Config, ConfigError};
use crate::core::models::{ScanOutcome, ScanTarget, WafResults};
use crate::core::reputation::ReputationScanner;
use crate::core::tools::url_expander::UrlExpander;
use crate::core::tools::waf_detector::WafDetector;
use std::path::Path;
use std::str::FromStr;
use strum::{Display, EnumString};
use thiserror::Error;
use tracing::{error, info};

/// Commands accepted on the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum CommandKind {
    #[strum(to_string = "url", serialize = "vt_url")]
    Url,
    #[strum(to_string = "ip", serialize = "vt_ip")]
    Ip,
    #[strum(to_string = "file", serialize = "vt_file")]
    File,
    #[strum(to_string = "xpand", serialize = "expand")]
    Xpand,
    #[strum(to_string = "waf", serialize = "wafw00f")]
    Waf,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Type a command, e.g. `url https://example.com`")]
    Empty,

    #[error("Unknown command '{0}'. Try url, ip, file, xpand or waf.")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(CommandKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub argument: String,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let kind = CommandKind::from_str(name).map_err(|_| CommandError::Unknown(name.to_string()))?;
        let argument = rest.trim();
        if argument.is_empty() {
            return Err(CommandError::MissingArgument(kind));
        }

        Ok(Command { kind, argument: argument.to_string() })
    }
}

/// What a finished command hands back to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Reputation {
        kind: CommandKind,
        subject: String,
        outcome: ScanOutcome,
    },
    Expanded {
        short_url: String,
        result: Result<String, String>,
    },
    Waf(WafResults),
    Failed(String),
}

/// Routes parsed commands to the scanner and the auxiliary tools.
pub struct Dispatcher {
    scanner: ReputationScanner,
    expander: UrlExpander,
    waf: WafDetector,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            scanner: ReputationScanner::new(config)?,
            expander: UrlExpander::new(config.request_timeout)?,
            waf: WafDetector::new(config.wafw00f_bin.clone(), config.waf_timeout_secs),
        })
    }

    pub async fn execute(&self, command: Command) -> CommandResult {
        info!(command = %command.kind, argument = %command.argument, "Executing command.");
        let Command { kind, argument } = command;

        match kind {
            CommandKind::Url => {
                let outcome = self.scanner.scan(ScanTarget::Url(argument.clone())).await;
                CommandResult::Reputation { kind, subject: argument, outcome }
            }
            CommandKind::Ip => {
                let outcome = self.scanner.scan(ScanTarget::IpAddress(argument.clone())).await;
                CommandResult::Reputation { kind, subject: argument, outcome }
            }
            CommandKind::File => match read_blob(&argument).await {
                Ok(target) => {
                    let subject = target.label();
                    let outcome = self.scanner.scan(target).await;
                    CommandResult::Reputation { kind, subject, outcome }
                }
                Err(message) => CommandResult::Failed(message),
            },
            CommandKind::Xpand => {
                let result = self.expander.expand(&argument).await;
                CommandResult::Expanded { short_url: argument, result }
            }
            CommandKind::Waf => CommandResult::Waf(self.waf.detect(&argument).await),
        }
    }
}

async fn read_blob(path: &str) -> Result<ScanTarget, String> {
    let filename = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(ScanTarget::FileBlob { bytes, filename }),
        Err(e) => {
            error!(path, error = %e, "Could not read file for upload.");
            Err(format!("Could not read {}: {}", path, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Ineligibility;
    use wiremock::MockServer;

    #[test]
    fn parses_command_and_argument() {
        let command: Command = "url https://example.com/a b".parse().unwrap();
        assert_eq!(command.kind, CommandKind::Url);
        assert_eq!(command.argument, "https://example.com/a b");
    }

    #[test]
    fn aliases_and_case_are_accepted() {
        assert_eq!("VT_IP 8.8.8.8".parse::<Command>().unwrap().kind, CommandKind::Ip);
        assert_eq!("wafw00f https://x.org".parse::<Command>().unwrap().kind, CommandKind::Waf);
        assert_eq!("Xpand https://bit.ly/x".parse::<Command>().unwrap().kind, CommandKind::Xpand);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!("ping host".parse::<Command>(), Err(CommandError::Unknown("ping".into())));
        assert_eq!("file   ".parse::<Command>(), Err(CommandError::MissingArgument(CommandKind::File)));
    }

    async fn dispatcher_for(server: &MockServer) -> Dispatcher {
        let config = Config::new("test-key")
            .unwrap()
            .with_base_url(&format!("{}/api/v3", server.uri()))
            .unwrap();
        Dispatcher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn missing_file_fails_before_scanning() {
        let server = MockServer::start().await;
        let result = dispatcher_for(&server)
            .await
            .execute(Command { kind: CommandKind::File, argument: "/definitely/not/here.bin".into() })
            .await;
        assert!(matches!(result, CommandResult::Failed(ref m) if m.contains("/definitely/not/here.bin")));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ip_command_reaches_the_scanner() {
        let server = MockServer::start().await;
        let result = dispatcher_for(&server)
            .await
            .execute(Command { kind: CommandKind::Ip, argument: "10.1.1.1".into() })
            .await;
        assert_eq!(
            result,
            CommandResult::Reputation {
                kind: CommandKind::Ip,
                subject: "10.1.1.1".into(),
                outcome: ScanOutcome::Ineligible(Ineligibility::Ip),
            }
        );
    }
}
