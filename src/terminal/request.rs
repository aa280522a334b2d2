/// One submitted line, split for dispatch.
///
/// Matching is case-insensitive, so `main_command` and `args` come from the
/// lowercased line; `raw` keeps the trimmed original for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub raw: String,
    pub main_command: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    /// Parse a line. Returns `None` for empty or whitespace-only input.
    pub fn parse(line: &str) -> Option<Self> {
        let raw = line.trim();
        let lowered = raw.to_lowercase();
        let mut tokens = lowered.split_whitespace().map(str::to_string);
        let main_command = tokens.next()?;

        Some(Self {
            raw: raw.to_string(),
            main_command,
            args: tokens.collect(),
        })
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}
