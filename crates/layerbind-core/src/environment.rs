//! Process environment lookups

use std::sync::OnceLock;

/// Variables consulted for the machine name, in order.
pub const MACHINE_NAME_VARIABLES: [&str; 2] = ["COMPUTERNAME", "HOSTNAME"];

/// Name of this machine, looked up once per process.
pub fn machine_name() -> Option<&'static str> {
    static NAME: OnceLock<Option<String>> = OnceLock::new();
    NAME.get_or_init(|| machine_name_from(|var| std::env::var(var).ok()))
        .as_deref()
}

/// Machine name using `lookup` for environment variables. Empty values are
/// skipped.
pub fn machine_name_from(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    MACHINE_NAME_VARIABLES
        .iter()
        .filter_map(|var| lookup(var))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn computer_name_is_preferred() {
        let lookup = env(&[("COMPUTERNAME", "WIN-BOX"), ("HOSTNAME", "linux-box")]);
        assert_eq!(machine_name_from(lookup).as_deref(), Some("WIN-BOX"));
    }

    #[test]
    fn falls_back_to_hostname() {
        let lookup = env(&[("COMPUTERNAME", ""), ("HOSTNAME", "linux-box")]);
        assert_eq!(machine_name_from(lookup).as_deref(), Some("linux-box"));
        assert_eq!(machine_name_from(env(&[])), None);
    }
}
