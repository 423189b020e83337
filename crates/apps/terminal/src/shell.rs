//! Headless XTerm session: transcript, history, and the built-in command set.

use chrono::{DateTime, Utc};
use leptos::logging::warn;
use platform_host::{session_started_ms, unix_time_ms_now, FsNode, VirtualFileSystem, HOME_PATH};

/// Maximum number of transcript lines kept before the oldest are dropped.
pub const MAX_TRANSCRIPT_LINES: usize = 200;

const HOSTNAME: &str = "linux95";

const PS_LISTING: [&str; 3] = [
    "  PID TTY          TIME CMD",
    " 1234 pts/0    00:00:01 bash",
    " 5678 pts/0    00:00:00 ps",
];
const USER: &str = "user";

const BANNER: [&str; 3] = [
    "Linux 95 Desktop Environment v1.0",
    "Copyright (C) 1995 Linux 95 Project",
    "Type 'help' for a list of commands.",
];

const FORTUNES: [&str; 5] = [
    "Linux 95: Because sometimes newer isn't better!",
    "In 1995, we thought 8MB of RAM was luxurious.",
    "The future is retro, and retro is the future.",
    "Y2K is still 5 years away - plenty of time to worry!",
    "Remember when installing software meant 20 floppy disks?",
];

#[derive(Debug, Clone, PartialEq, Eq)]
/// One rendered line of terminal output.
pub enum TranscriptLine {
    /// Startup banner text.
    System(String),
    /// Echo of a submitted command with the prompt it was typed at.
    Prompt {
        /// Prompt text shown before the command.
        prompt: String,
        /// Command as typed.
        command: String,
    },
    /// Command output.
    Output(String),
    /// Command error output.
    Error(String),
}

impl TranscriptLine {
    /// Returns the display text of the line.
    pub fn text(&self) -> String {
        match self {
            Self::Prompt { prompt, command } => format!("{prompt} {command}"),
            Self::System(text) | Self::Output(text) | Self::Error(text) => text.clone(),
        }
    }
}

/// Terminal session state driven by the window's input line.
pub struct TerminalSession {
    fs: VirtualFileSystem,
    transcript: Vec<TranscriptLine>,
    history: Vec<String>,
    history_cursor: Option<usize>,
    clock: fn() -> u64,
    started_ms: u64,
}

impl TerminalSession {
    /// Starts a session in the home directory of `fs`; `uptime` counts from the desktop session.
    pub fn new(fs: VirtualFileSystem) -> Self {
        let mut session = Self::with_clock(fs, unix_time_ms_now);
        session.started_ms = session_started_ms();
        session
    }

    /// Starts a session that reads time from `clock` (unix milliseconds).
    pub fn with_clock(mut fs: VirtualFileSystem, clock: fn() -> u64) -> Self {
        if let Err(err) = fs.change_directory(HOME_PATH) {
            warn!("[terminal] starting at the root: {err}");
        }
        Self {
            fs,
            transcript: banner(),
            history: Vec::new(),
            history_cursor: None,
            clock,
            started_ms: clock(),
        }
    }

    /// Returns the prompt, abbreviating the home directory as `~`.
    pub fn prompt(&self) -> String {
        let cwd = self.fs.current_path();
        let shown = match cwd.strip_prefix(HOME_PATH) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("~{rest}"),
            _ => cwd,
        };
        format!("{USER}@{HOSTNAME}:{shown}$")
    }

    /// Returns the working directory.
    pub fn cwd(&self) -> String {
        self.fs.current_path()
    }

    /// Returns the transcript in display order.
    pub fn transcript(&self) -> &[TranscriptLine] {
        &self.transcript
    }

    /// Runs one input line and appends the prompt echo and output to the transcript.
    pub fn submit(&mut self, line: &str) {
        let line = line.trim();
        if !line.is_empty() {
            self.history.push(line.to_string());
        }
        self.history_cursor = None;

        let prompt = self.prompt();
        let output = self.execute(line);
        if output == CommandOutput::Clear {
            self.transcript.clear();
            return;
        }
        self.transcript.push(TranscriptLine::Prompt {
            prompt,
            command: line.to_string(),
        });
        match output {
            CommandOutput::Text(text) => self
                .transcript
                .extend(text.lines().map(|l| TranscriptLine::Output(l.to_string()))),
            CommandOutput::Error(text) => self.transcript.push(TranscriptLine::Error(text)),
            CommandOutput::Empty | CommandOutput::Clear => {}
        }

        if self.transcript.len() > MAX_TRANSCRIPT_LINES {
            let overflow = self.transcript.len() - MAX_TRANSCRIPT_LINES;
            self.transcript.drain(0..overflow);
        }
    }

    /// Steps back through history; returns the line to show in the input.
    pub fn history_previous(&mut self) -> Option<String> {
        if self.history.is_empty() {
            return None;
        }
        let index = match self.history_cursor {
            None => self.history.len() - 1,
            Some(index) => index.saturating_sub(1),
        };
        self.history_cursor = Some(index);
        self.history.get(index).cloned()
    }

    /// Steps forward through history; returns an empty line past the newest entry.
    pub fn history_next(&mut self) -> Option<String> {
        let index = self.history_cursor?;
        if index + 1 < self.history.len() {
            self.history_cursor = Some(index + 1);
            self.history.get(index + 1).cloned()
        } else {
            self.history_cursor = None;
            Some(String::new())
        }
    }

    fn execute(&mut self, line: &str) -> CommandOutput {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return CommandOutput::Empty;
        };
        let args: Vec<&str> = parts.collect();

        match command.to_ascii_lowercase().as_str() {
            "help" => CommandOutput::Text(
                "Available commands: help, ls, pwd, cd, whoami, uname, clear, date, cat, echo, \
                 ps, uptime, fortune"
                    .to_string(),
            ),
            "ls" => self.ls(args.first().copied()),
            "pwd" => CommandOutput::Text(self.fs.current_path()),
            "cd" => self.cd(args.first().copied().unwrap_or(HOME_PATH)),
            "whoami" => CommandOutput::Text(USER.to_string()),
            "uname" => CommandOutput::Text("Linux linux95 2.0.35 #1 i486 Linux 95".to_string()),
            "date" => {
                CommandOutput::Text(self.now().format("%a %b %e %H:%M:%S UTC %Y").to_string())
            }
            "cat" => self.cat(&args),
            "echo" => CommandOutput::Text(args.join(" ")),
            "ps" => CommandOutput::Text(PS_LISTING.join("\n")),
            "uptime" => CommandOutput::Text(self.uptime()),
            "fortune" => {
                let pick = (self.clock)() as usize % FORTUNES.len();
                CommandOutput::Text(FORTUNES[pick].to_string())
            }
            "clear" => CommandOutput::Clear,
            _ => CommandOutput::Error(format!("bash: {command}: command not found")),
        }
    }

    fn ls(&self, path: Option<&str>) -> CommandOutput {
        let listing = match path {
            Some(path) => match self.fs.list_path(path) {
                Ok(nodes) => nodes,
                Err(_) => {
                    return CommandOutput::Error(format!(
                        "ls: cannot access '{path}': No such file or directory"
                    ))
                }
            },
            None => self.fs.list_directory(),
        };
        let names: Vec<String> = listing
            .iter()
            .map(|node| match node {
                FsNode::Directory(dir) => format!("{}/", dir.name),
                FsNode::File(file) => file.name.clone(),
            })
            .collect();
        if names.is_empty() {
            CommandOutput::Empty
        } else {
            CommandOutput::Text(names.join("  "))
        }
    }

    fn cd(&mut self, path: &str) -> CommandOutput {
        match self.fs.change_directory(path) {
            Ok(()) => CommandOutput::Empty,
            Err(err) => CommandOutput::Error(format!("bash: cd: {err}")),
        }
    }

    fn cat(&self, args: &[&str]) -> CommandOutput {
        let Some(path) = args.first() else {
            return CommandOutput::Error("cat: missing file operand".to_string());
        };
        match self.fs.read_file(path) {
            Ok(file) => CommandOutput::Text(file.content.clone()),
            Err(err) => CommandOutput::Error(format!("cat: {err}")),
        }
    }

    fn uptime(&self) -> String {
        let elapsed_min = (self.clock)().saturating_sub(self.started_ms) / 60_000;
        let up = if elapsed_min < 60 {
            format!("{elapsed_min} min")
        } else {
            format!("{}:{:02}", elapsed_min / 60, elapsed_min % 60)
        };
        format!(
            "{} up {up}, 1 user, load average: 0.15, 0.10, 0.05",
            self.now().format("%H:%M:%S")
        )
    }

    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis((self.clock)() as i64).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CommandOutput {
    Text(String),
    Error(String),
    Empty,
    Clear,
}

fn banner() -> Vec<TranscriptLine> {
    BANNER
        .iter()
        .map(|line| TranscriptLine::System(line.to_string()))
        .collect()
}
