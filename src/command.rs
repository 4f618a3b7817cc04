//! User command parsing

/// Simple prefix command parser.
///
/// This is useful when you want to extract a command and some arguments from a users message.
///
/// # Example
///
/// ```rust
/// use sendlike::command::Command;
/// let command = Command::new("点赞");
/// assert_eq!(command.parse("点赞"), Some(""));
/// assert_eq!(command.parse("点赞 5"), Some("5"));
/// assert_eq!(command.parse("点赞5"), None);
/// assert_eq!(command.parse("hello 5"), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Command {
    /// The prefix to match against.
    prefix: &'static str,
}

impl Command {
    /// Creates a new prefix command parser that expects the given prefix.
    #[must_use]
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }

    /// Returns the prefix this command matches.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Checks if the supplied input starts with the command prefix, and if so, returns a string
    /// slice that makes up the arguments, if any.
    #[must_use]
    pub fn parse<'a>(&self, input: &'a str) -> Option<&'a str> {
        let suffix = input.strip_prefix(self.prefix)?;

        match suffix.chars().next() {
            // The proceeding character is a space, so we return a slice skipping it
            Some(' ') => Some(&suffix[1..]),
            // There's a proceeding character and it's not a space, so it's either part of a
            // longer word or a different separator.
            Some(_) => None,
            // The input is identical to the command prefix, so return an empty string.
            None => Some(""),
        }
    }
}
