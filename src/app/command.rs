//! Command parsing for the command line

/// Parsed command from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Log out and clear local state: :logout
    Logout,
    /// Wipe all local progress: :reset
    Reset,
    /// Show progress statistics: :stats
    Stats,
    /// Back to the calendar: :calendar
    Calendar,
    /// Reload attempted days from the backend: :refresh
    Refresh,
    /// Email the progress report or open query: :email
    Email,
    /// Copy the certificate share text: :share
    Share,
    /// Save the certificate to a file: :download
    Download,
    /// Show help: :help or :h
    Help,
    /// Quit the application: :q or :quit
    Quit,
    /// Clear message: (empty command)
    Nop,
}

/// Result of parsing a command
#[derive(Debug)]
pub enum ParseResult {
    Ok(Command),
    UnknownCommand(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> ParseResult {
    let input = input.trim();

    if input.is_empty() {
        return ParseResult::Ok(Command::Nop);
    }

    let cmd = input.split_whitespace().next().unwrap_or("");

    let command = match cmd.to_lowercase().as_str() {
        "logout" | "signout" => Command::Logout,
        "reset" => Command::Reset,
        "stats" | "s" | "progress" => Command::Stats,
        "calendar" | "cal" | "dashboard" => Command::Calendar,
        "refresh" | "r" => Command::Refresh,
        "email" | "mail" => Command::Email,
        "share" => Command::Share,
        "download" | "save" => Command::Download,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" => Command::Quit,
        _ => return ParseResult::UnknownCommand(cmd.to_string()),
    };
    ParseResult::Ok(command)
}

/// One line per command, for the help overlay
pub const HELP: &[(&str, &str)] = &[
    (":stats", "Progress statistics and achievements"),
    (":calendar", "Back to the calendar"),
    (":refresh", "Reload attempted days from the server"),
    (":email", "Email your progress (or the open query)"),
    (":share", "Copy the certificate text to the clipboard"),
    (":download", "Save the certificate as a text file"),
    (":logout", "Log out and clear local data"),
    (":reset", "Wipe all local progress"),
    (":q", "Quit"),
];
