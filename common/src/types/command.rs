use std::fmt;

/// Flag-based command understood by the device firmware, e.g. `-mode trig -odr 15`.
///
/// Fragments are appended in order and separated by a single space.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CommandString(String);

impl CommandString {
    pub fn new() -> Self {
        Self(String::new())
    }

    /// Appends a `-<flag> <value>` fragment.
    pub fn push_flag(&mut self, flag: &str, value: impl fmt::Display) -> &mut Self {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        self.0.push('-');
        self.0.push_str(flag);
        self.0.push(' ');
        self.0.push_str(&value.to_string());
        self
    }

    /// Appends every fragment of `other`.
    pub fn extend(&mut self, other: &CommandString) -> &mut Self {
        if !other.0.is_empty() {
            if !self.0.is_empty() {
                self.0.push(' ');
            }
            self.0.push_str(&other.0);
        }
        self
    }

    /// Returns `(flag, value)` pairs in emission order.
    pub fn tokens(&self) -> Vec<(&str, &str)> {
        let parts: Vec<&str> = self.0.split_whitespace().collect();
        parts
            .chunks(2)
            .filter_map(|pair| match pair {
                [flag, value] => Some((flag.trim_start_matches('-'), *value)),
                _ => None,
            })
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CommandString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CommandString> for String {
    fn from(value: CommandString) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_flag() {
        let mut command = CommandString::new();
        command.push_flag("mode", "stream").push_flag("odr", 15);

        assert_eq!(command.as_str(), "-mode stream -odr 15");
    }

    #[test]
    fn test_extend_with_empty() {
        let mut command = CommandString::new();
        command.push_flag("g", 8);
        command.extend(&CommandString::new());

        assert_eq!(command.as_str(), "-g 8");
    }

    #[test]
    fn test_tokens() {
        let mut command = CommandString::new();
        command.push_flag("t1", 1).push_flag("xF", -300);

        assert_eq!(command.tokens(), vec![("t1", "1"), ("xF", "-300")]);
    }
}
