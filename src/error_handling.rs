use colored::*;
use std::fmt;

use crate::logging::log_event;

/// Error classes this tool can actually hit
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorType {
    Connection,
    Configuration,
    Provider,
    Timeout,
    General,
}

/// Error with actionable suggestions, displayed on stderr
#[derive(Debug, Clone)]
pub struct UserFriendlyError {
    pub error_type: ErrorType,
    pub message: String,
    pub suggestions: Vec<String>,
}

impl UserFriendlyError {
    pub fn new(error_type: ErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions.extend(suggestions);
        self
    }

    pub fn display(&self) {
        // Log only the error class, never the message payload verbatim
        log_event("ERROR", &format!("{:?}", self.error_type));

        let title = match self.error_type {
            ErrorType::Connection => "Connection Error",
            ErrorType::Configuration => "Configuration Error",
            ErrorType::Provider => "Provider Error",
            ErrorType::Timeout => "Timeout Error",
            ErrorType::General => "Error",
        };

        eprintln!("{} {}", format!("{}:", title).bold().red(), self.message);

        if !self.suggestions.is_empty() {
            eprintln!();
            eprintln!("{}", "Suggested solutions:".bold().yellow());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", (i + 1).to_string().green(), suggestion);
            }
        }
    }
}

impl fmt::Display for UserFriendlyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UserFriendlyError {}

/// Classify an anyhow error into a user-friendly one with suggestions
pub fn enhance_error(error: &anyhow::Error) -> UserFriendlyError {
    let error_msg = error.to_string();
    let lowered = error_msg.to_lowercase();

    if lowered.contains("api key not found") || lowered.contains("no api key found") {
        return UserFriendlyError::new(ErrorType::Configuration, error_msg).with_suggestions(vec![
            "Export an API key, e.g.: export OPENAI_API_KEY=sk-...".to_string(),
            "Or run a local AmpCode-compatible service on 127.0.0.1:8317".to_string(),
            "Pick a backend explicitly with --provider".to_string(),
        ]);
    }

    if lowered.contains("unknown provider") {
        return UserFriendlyError::new(ErrorType::Configuration, error_msg).with_suggestions(vec![
            "Supported providers: openai, anthropic, minimax, qwen, ampcode".to_string(),
        ]);
    }

    if lowered.contains("timed out") {
        return UserFriendlyError::new(ErrorType::Timeout, error_msg).with_suggestions(vec![
            "Try the request again".to_string(),
            "Switch to a faster provider with --provider".to_string(),
        ]);
    }

    if lowered.contains("connection refused") || lowered.contains("failed to connect") {
        return UserFriendlyError::new(ErrorType::Connection, error_msg).with_suggestions(vec![
            "Check your internet connection".to_string(),
            "If using the local service, make sure it is running".to_string(),
        ]);
    }

    if lowered.contains("returned error") || lowered.contains("response format") {
        return UserFriendlyError::new(ErrorType::Provider, error_msg).with_suggestions(vec![
            "Verify the API key is valid and has quota left".to_string(),
        ]);
    }

    UserFriendlyError::new(ErrorType::General, error_msg)
}
