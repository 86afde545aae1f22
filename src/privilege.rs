// src/privilege.rs

//! Privilege handling: the serial terminal and OpenOCD need raw USB access.

/// Whether this process already runs with an effective uid of root.
#[cfg(unix)]
pub fn is_elevated() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(not(unix))]
pub fn is_elevated() -> bool {
    false
}

/// Argument prefix for an elevated command.
///
/// Empty when already elevated, so running the whole tool under `sudo` does
/// not stack a second `sudo` in front of every child.
pub fn elevation_prefix(elevate_with: &str, already_elevated: bool) -> Vec<String> {
    if already_elevated || elevate_with.trim().is_empty() {
        Vec::new()
    } else {
        vec![elevate_with.trim().to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_dropped_for_root() {
        assert!(elevation_prefix("sudo", true).is_empty());
        assert_eq!(elevation_prefix("sudo", false), vec!["sudo".to_string()]);
        assert_eq!(elevation_prefix(" doas ", false), vec!["doas".to_string()]);
    }
}
