//! Error behaviors
//!
//! Each [`ErrorCategory`] maps to a set of [`ErrorBehavior`] flags telling
//! error reporting code what to do. The table is derived from the override
//! store whenever the core component is bound:
//!
//! 1. Start from no behavior
//! 2. Add `LogConsole` / `WriteToFile` when the matching global switch is on
//! 3. Apply the tokens under `ErrorBehavior.<Category>` left to right:
//!    `Token` sets a flag, `-Token` clears it
//! 4. `Fatal` always gets `LogConsoleDetailed`
//!
//! In performance-test mode every category is exactly `LogConsole`.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Serialize, Serializer};

use crate::coerce::split_list;
use crate::component::ComponentManifest;
use crate::field::{FieldSpec, Setting};
use crate::resolved::ResolvedValues;
use crate::store::OverrideStore;
use crate::value::{RawValue, Scalar};
use crate::{Error, Result};

/// Name of the component holding the engine's own settings.
pub const CORE_COMPONENT: &str = "layerbind";

/// Prefix of the per-category override keys.
pub const BEHAVIOR_KEY_PREFIX: &str = "ErrorBehavior";

const OWNER: &str = "layerbind.errors";

pub static ALWAYS_LOG_TO_CONSOLE: Setting<bool> = Setting::new(
    FieldSpec::new(OWNER, "Configuration_AlwaysLogToConsole").performance("false"),
    false,
);

pub static ALWAYS_LOG_DETAILED_TO_CONSOLE: Setting<bool> = Setting::new(
    FieldSpec::new(OWNER, "Configuration_AlwaysLogDetailedToConsole").performance("false"),
    false,
);

pub static ALWAYS_WRITE_TO_FILE: Setting<bool> = Setting::new(
    FieldSpec::new(OWNER, "Configuration_AlwaysWriteToFile").performance("false"),
    false,
);

/// The component bound before any other.
pub fn core_component() -> ComponentManifest {
    ComponentManifest::new(CORE_COMPONENT)
        .field(&ALWAYS_LOG_TO_CONSOLE)
        .field(&ALWAYS_LOG_DETAILED_TO_CONSOLE)
        .field(&ALWAYS_WRITE_TO_FILE)
}

/// Broad classes of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ErrorCategory {
    Fatal,
    Unhandled,
    Network,
    Io,
    Timeout,
    Cancellation,
    Warning,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 7] = [
        Self::Fatal,
        Self::Unhandled,
        Self::Network,
        Self::Io,
        Self::Timeout,
        Self::Cancellation,
        Self::Warning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fatal => "Fatal",
            Self::Unhandled => "Unhandled",
            Self::Network => "Network",
            Self::Io => "Io",
            Self::Timeout => "Timeout",
            Self::Cancellation => "Cancellation",
            Self::Warning => "Warning",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Override key holding this category's tokens.
    pub fn override_key(&self) -> String {
        format!("{BEHAVIOR_KEY_PREFIX}.{}", self.as_str())
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of behavior flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ErrorBehavior(u8);

impl ErrorBehavior {
    pub const NONE: Self = Self(0);
    pub const LOG_CONSOLE: Self = Self(1);
    pub const LOG_CONSOLE_DETAILED: Self = Self(1 << 1);
    pub const WRITE_TO_FILE: Self = Self(1 << 2);

    const NAMED: [(&'static str, ErrorBehavior); 3] = [
        ("LogConsole", Self::LOG_CONSOLE),
        ("LogConsoleDetailed", Self::LOG_CONSOLE_DETAILED),
        ("WriteToFile", Self::WRITE_TO_FILE),
    ];

    /// Look up a flag by name. `None` names the empty set.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "None" {
            return Some(Self::NONE);
        }
        Self::NAMED
            .iter()
            .find(|(flag, _)| *flag == name)
            .map(|(_, behavior)| *behavior)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        Self::NAMED
            .iter()
            .filter(|(_, behavior)| self.contains(*behavior))
            .map(|(name, _)| *name)
    }
}

impl BitOr for ErrorBehavior {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ErrorBehavior {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ErrorBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        f.write_str(&self.names().collect::<Vec<_>>().join(" | "))
    }
}

impl fmt::Debug for ErrorBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorBehavior({self})")
    }
}

impl Serialize for ErrorBehavior {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// Behavior flags per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorBehaviorMap {
    behaviors: BTreeMap<ErrorCategory, ErrorBehavior>,
}

impl ErrorBehaviorMap {
    /// Flags for `category`; empty when the table was never computed.
    pub fn get(&self, category: ErrorCategory) -> ErrorBehavior {
        self.behaviors.get(&category).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorCategory, ErrorBehavior)> + '_ {
        self.behaviors.iter().map(|(c, b)| (*c, *b))
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}

/// Global switches feeding every category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorSwitches {
    pub log_to_console: bool,
    pub write_to_file: bool,
}

impl ErrorSwitches {
    /// Read the switches from freshly bound core values.
    pub fn from_values(values: &ResolvedValues) -> Self {
        Self {
            log_to_console: ALWAYS_LOG_TO_CONSOLE.get_from(values),
            write_to_file: ALWAYS_WRITE_TO_FILE.get_from(values),
        }
    }

    fn base(&self) -> ErrorBehavior {
        let mut behavior = ErrorBehavior::NONE;
        if self.log_to_console {
            behavior |= ErrorBehavior::LOG_CONSOLE;
        }
        if self.write_to_file {
            behavior |= ErrorBehavior::WRITE_TO_FILE;
        }
        behavior
    }
}

/// Compute the behavior table.
pub fn resolve_error_behaviors(
    store: &OverrideStore,
    switches: ErrorSwitches,
    performance: bool,
) -> Result<ErrorBehaviorMap> {
    let mut behaviors = BTreeMap::new();

    for category in ErrorCategory::ALL {
        if performance {
            behaviors.insert(category, ErrorBehavior::LOG_CONSOLE);
            continue;
        }

        let mut behavior = switches.base();
        if let Some(raw) = store.get(&category.override_key()) {
            for token in tokens(category, raw)? {
                apply_token(category, &mut behavior, &token)?;
            }
        }
        if category == ErrorCategory::Fatal {
            behavior |= ErrorBehavior::LOG_CONSOLE_DETAILED;
        }
        behaviors.insert(category, behavior);
    }

    Ok(ErrorBehaviorMap { behaviors })
}

fn tokens(category: ErrorCategory, raw: &RawValue) -> Result<Vec<String>> {
    let tokens: Vec<String> = match raw {
        RawValue::Null => Vec::new(),
        RawValue::Scalar(Scalar::Str(text)) => split_list(text).into_iter().map(str::to_string).collect(),
        RawValue::List(items) => items.iter().map(ToString::to_string).collect(),
        other => {
            return Err(Error::Conversion {
                key: category.override_key(),
                expected: "list of error behaviors".to_string(),
                found: other.describe(),
            });
        }
    };
    Ok(tokens
        .into_iter()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .collect())
}

fn apply_token(category: ErrorCategory, behavior: &mut ErrorBehavior, token: &str) -> Result<()> {
    let (negate, name) = match token.strip_prefix('-') {
        Some(name) => (true, name),
        None => (false, token),
    };
    let flag = ErrorBehavior::from_name(name).ok_or_else(|| Error::UnknownBehavior {
        category: category.to_string(),
        token: token.to_string(),
    })?;
    if negate {
        behavior.remove(flag);
    } else {
        behavior.insert(flag);
    }
    Ok(())
}
