// ───── Body ─────────────────────────────────────────────────────────────── //

pub const MIN_LENGTH: usize = 3;
pub const MAX_LENGTH: usize = 30;

/// Usernames that collide with application routes or system terms.
pub const RESERVED_WORDS: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "api",
    "auth",
    "dashboard",
    "settings",
    "profile",
    "help",
    "support",
    "about",
    "contact",
    "terms",
    "privacy",
    "legal",
];

/// Reasons a candidate username is rejected. Variants are listed in the
/// order the rules are evaluated.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username cannot be empty")]
    EmptyUsername,
    #[error("Username must be at least 3 characters")]
    TooShort,
    #[error("Username must be at most 30 characters")]
    TooLong,
    #[error(
        "Username can only contain letters, numbers, underscores, and hyphens"
    )]
    InvalidCharacters,
    #[error("Username cannot have consecutive special characters")]
    ConsecutiveSpecialChars,
    #[error("Username cannot start or end with special characters")]
    EdgeSpecialChars,
    #[error("This username is reserved and cannot be used")]
    ReservedWord,
}

impl UsernameError {
    /// Stable machine-readable name of the rule that failed.
    pub fn kind(&self) -> &'static str {
        match self {
            UsernameError::EmptyUsername => "empty_username",
            UsernameError::TooShort => "too_short",
            UsernameError::TooLong => "too_long",
            UsernameError::InvalidCharacters => "invalid_characters",
            UsernameError::ConsecutiveSpecialChars => {
                "consecutive_special_chars"
            }
            UsernameError::EdgeSpecialChars => "edge_special_chars",
            UsernameError::ReservedWord => "reserved_word",
        }
    }
}

/// This type guarantees us that `Username` is properly formed and already
/// normalized (trimmed and lowercase), so it can be compared for uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Returns an instance of `Username` if the input satisfies
    /// our validation constraints on usernames.
    pub fn parse(raw: &str) -> Result<Username, UsernameError> {
        let trimmed = raw.trim();
        let length = trimmed.chars().count();

        if trimmed.is_empty() {
            return Err(UsernameError::EmptyUsername);
        }
        if length < MIN_LENGTH {
            return Err(UsernameError::TooShort);
        }
        if length > MAX_LENGTH {
            return Err(UsernameError::TooLong);
        }
        if !trimmed.chars().all(is_allowed_char) {
            return Err(UsernameError::InvalidCharacters);
        }
        if has_consecutive_specials(trimmed) {
            return Err(UsernameError::ConsecutiveSpecialChars);
        }
        if trimmed.starts_with(is_special) || trimmed.ends_with(is_special) {
            return Err(UsernameError::EdgeSpecialChars);
        }

        let normalized = trimmed.to_lowercase();
        if RESERVED_WORDS.contains(&normalized.as_str()) {
            return Err(UsernameError::ReservedWord);
        }
        Ok(Username(normalized))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for Username {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// Verdict of [`validate`]. Exactly one of `error` and `normalized` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameValidation {
    pub is_valid: bool,
    pub error: Option<UsernameError>,
    pub normalized: Option<Username>,
}

/// Strict check used when a username is submitted. Rules are evaluated in a
/// fixed order and only the first failing one is reported.
pub fn validate(raw: &str) -> UsernameValidation {
    match Username::parse(raw) {
        Ok(username) => UsernameValidation {
            is_valid: true,
            error: None,
            normalized: Some(username),
        },
        Err(e) => UsernameValidation {
            is_valid: false,
            error: Some(e),
            normalized: None,
        },
    }
}

/// Best-effort correction for live typing feedback. Never fails and does not
/// consult the reserved list, so the result still has to go through
/// [`validate`] before it is accepted.
pub fn sanitize(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let mut collapsed = String::with_capacity(lowered.len());
    let mut run = 0usize;
    for c in lowered.chars() {
        let c = if is_allowed_lowercase_char(c) { c } else { '-' };
        if is_special(c) {
            run += 1;
            if run == 1 {
                collapsed.push(c);
            } else if run == 2 {
                // A run of two or more specials becomes a single hyphen.
                collapsed.pop();
                collapsed.push('-');
            }
        } else {
            run = 0;
            collapsed.push(c);
        }
    }

    let truncated: String = collapsed
        .trim_matches(is_special)
        .chars()
        .take(MAX_LENGTH)
        .collect();

    // Truncation can leave a special character at the end.
    truncated.trim_end_matches(is_special).to_string()
}

// ───── Helpers ──────────────────────────────────────────────────────────── //

fn is_special(c: char) -> bool {
    c == '-' || c == '_'
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_special(c)
}

fn is_allowed_lowercase_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || is_special(c)
}

fn has_consecutive_specials(s: &str) -> bool {
    s.chars()
        .zip(s.chars().skip(1))
        .any(|(a, b)| is_special(a) && is_special(b))
}

// ───── Unit tests ───────────────────────────────────────────────────────── //
