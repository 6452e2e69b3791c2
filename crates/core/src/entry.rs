use std::fmt::{Display, Formatter};

/// How a parameter is stored, and therefore how it is written and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Plain,
    List,
    Secret,
}

impl EntryKind {
    pub const ALL: [EntryKind; 3] = [EntryKind::Plain, EntryKind::List, EntryKind::Secret];

    /// The type name the parameter store uses on the wire.
    #[must_use]
    pub fn store_type(&self) -> &'static str {
        match self {
            EntryKind::Plain => "String",
            EntryKind::List => "StringList",
            EntryKind::Secret => "SecureString",
        }
    }
}

impl Display for EntryKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.store_type())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Fully qualified name, including the prefix.
    pub name: String,
    pub value: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn new(name: impl Into<String>, value: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind,
        }
    }

    #[must_use]
    pub fn is_secret(&self) -> bool {
        self.kind == EntryKind::Secret
    }

    /// Same entry with a different value, kind untouched.
    #[must_use]
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            value: value.into(),
            kind: self.kind,
        }
    }
}

impl Display for Entry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{} ({})", self.name, self.kind)
    }
}

/// The path segment every entry of a session lives under.
///
/// Always ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prefix(String);

impl Prefix {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.ends_with('/') {
            Self(trimmed.to_string())
        } else {
            Self(format!("{trimmed}/"))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves a name typed by the user.
    ///
    /// Names starting with `/` are taken as fully qualified, anything else is
    /// placed under the prefix.
    #[must_use]
    pub fn qualify(&self, name: &str) -> String {
        if name.starts_with('/') {
            name.to_string()
        } else {
            format!("{}{}", self.0, name)
        }
    }
}

impl Display for Prefix {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}
