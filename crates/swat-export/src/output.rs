use crate::cli::OutputFormat;
use crate::export::EmptyExport;
use colored::Colorize;
use outscan_backend::OutscanError;
use serde::Serialize;

/// Where status lines go. Stdout, unless the CSV itself is going there.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    pub format: OutputFormat,
    pub to_stderr: bool,
}

impl Reporter {
    pub fn new(format: OutputFormat, to_stderr: bool) -> Self {
        Self { format, to_stderr }
    }

    fn emit(&self, line: &str) {
        if self.to_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    /// Progress line, text format only
    pub fn progress(&self, message: &str) {
        if self.format == OutputFormat::Text {
            self.emit(&format!("{}", message.dimmed()));
        }
    }

    pub fn summary(&self, summary: &ExportSummary) {
        match self.format {
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string_pretty(summary) {
                    self.emit(&json);
                }
            }
            OutputFormat::Text => {
                self.emit(&format!(
                    "{} {} users to {}",
                    "Exported".green().bold(),
                    summary.rows,
                    summary.path.cyan()
                ));
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExportSummary {
    pub success: bool,
    pub rows: usize,
    pub path: String,
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

/// Error kind name and process exit code for a failed run
pub fn classify(err: &anyhow::Error) -> (&'static str, u8) {
    if let Some(e) = err.downcast_ref::<OutscanError>() {
        let code = match e.kind() {
            "transport" => 3,
            "application" => 4,
            _ => 5,
        };
        return (e.kind(), code);
    }
    if err.is::<EmptyExport>() {
        return ("empty", 6);
    }
    ("error", 1)
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: classify(err).0.to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err)
                .unwrap_or_else(|_| format!(r#"{{"error": true, "message": "{}"}}"#, err))
        }
        OutputFormat::Text => format!("{}: {:#}", "Error".red().bold(), err),
    };
    eprintln!("{}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_backend_errors() {
        let transport = anyhow::Error::from(OutscanError::Transport {
            status: 401,
            reason: "Unauthorized".to_string(),
            body: "invalid token".to_string(),
        });
        assert_eq!(classify(&transport), ("transport", 3));

        let application = anyhow::Error::from(OutscanError::Application {
            body: r#"{"error": "bad token"}"#.to_string(),
        });
        assert_eq!(classify(&application), ("application", 4));

        let parse = anyhow::Error::from(OutscanError::MissingData);
        assert_eq!(classify(&parse), ("parse", 5));
    }

    #[test]
    fn test_classify_survives_context() {
        let err = anyhow::Error::from(OutscanError::InvalidRecord {
            index: 3,
            message: "missing field `vcemail`".to_string(),
        })
        .context("Fetching users");
        assert_eq!(classify(&err), ("parse", 5));
    }

    #[test]
    fn test_classify_other_errors() {
        assert_eq!(classify(&anyhow::Error::from(EmptyExport)), ("empty", 6));
        assert_eq!(classify(&anyhow::anyhow!("config missing")), ("error", 1));
    }

    #[test]
    fn test_transport_message_format() {
        let err = OutscanError::Transport {
            status: 401,
            reason: "Unauthorized".to_string(),
            body: "invalid token".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 401 - Unauthorized, Message invalid token");
    }
}
