//! Validated entry names with case-insensitive identity.

use crate::{Error, Result};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Maximum length for entry names (in bytes).
///
/// Well above any name a real container uses; bounds what a malicious
/// directory can make us allocate.
const MAX_NAME_LENGTH: usize = 32768;

/// A validated entry name inside a WAD container.
///
/// Names are path-like, forward-slash separated, and unique within an
/// archive under ASCII case-insensitive comparison: `Sprites/A.png` and
/// `sprites/a.png` are the same entry. Backslash separators are normalized
/// to forward slashes on construction; the original character case is
/// preserved for display and storage.
///
/// Validation rejects:
/// - empty names and NUL bytes
/// - absolute paths (leading `/`)
/// - empty segments (`a//b`) and trailing slashes
/// - `.` and `..` segments (entries are extracted to real paths)
/// - names longer than 32 KiB
///
/// # Examples
///
/// ```
/// use wadex::EntryName;
///
/// let name = EntryName::new("Sprites/player.png").unwrap();
/// assert_eq!(name.as_str(), "Sprites/player.png");
/// assert_eq!(name, EntryName::new("sprites/PLAYER.PNG").unwrap());
///
/// assert!(EntryName::new("../escape").is_err());
/// assert!(EntryName::new("/absolute").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct EntryName(String);

impl EntryName {
    /// Creates a new `EntryName`, normalizing separators and validating.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEntryName`] when the name breaks any of the
    /// rules listed on the type.
    pub fn new(s: &str) -> Result<Self> {
        let normalized = s.replace('\\', "/");
        Self::validate(&normalized)?;
        Ok(Self(normalized))
    }

    fn validate(s: &str) -> Result<()> {
        if s.is_empty() {
            return Err(Error::InvalidEntryName("empty name".into()));
        }
        if s.contains('\0') {
            return Err(Error::InvalidEntryName("contains NUL byte".into()));
        }
        if s.len() > MAX_NAME_LENGTH {
            return Err(Error::InvalidEntryName(format!(
                "name exceeds maximum length of {} bytes",
                MAX_NAME_LENGTH
            )));
        }
        if s.starts_with('/') {
            return Err(Error::InvalidEntryName("absolute path not allowed".into()));
        }
        if s.ends_with('/') {
            return Err(Error::InvalidEntryName("trailing slash not allowed".into()));
        }
        for segment in s.split('/') {
            if segment.is_empty() {
                return Err(Error::InvalidEntryName(
                    "empty segment (consecutive slashes)".into(),
                ));
            }
            if segment == "." || segment == ".." {
                return Err(Error::InvalidEntryName(format!(
                    "'{}' segment not allowed",
                    segment
                )));
            }
        }
        Ok(())
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last path component.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the extension of the last component, without the dot.
    ///
    /// `None` when the last component has no dot, or only a leading one.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(pos) => Some(&name[pos + 1..]),
        }
    }

    /// Returns a new name with the extension replaced.
    ///
    /// A component without an extension gets one appended. Used to pair a
    /// frame-description entry with its atlas image (`a.meta` → `a.png`).
    pub fn with_extension(&self, ext: &str) -> Result<Self> {
        let stem_len = match self.extension() {
            // subtract the dot as well
            Some(e) => self.0.len() - e.len() - 1,
            None => self.0.len(),
        };
        EntryName::new(&format!("{}.{}", &self.0[..stem_len], ext))
    }

    /// Returns `true` if this name equals `other` case-insensitively.
    ///
    /// `other` is compared as-is apart from separator normalization; use
    /// this for lookups with caller-supplied strings.
    pub fn matches(&self, other: &str) -> bool {
        let normalized = other.replace('\\', "/");
        self.0.eq_ignore_ascii_case(&normalized)
    }
}

impl PartialEq for EntryName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for EntryName {}

impl Hash for EntryName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for EntryName {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        EntryName::new(s)
    }
}
