#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;

/// User's home folder, from `$HOME`.
pub fn home_folder() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}

/// Shell to launch for the subshell command. `$BURROW_SHELL` wins over
/// `$SHELL`; `/bin/sh` is the last resort.
pub fn shell() -> String {
    env::var("BURROW_SHELL")
        .or_else(|_| env::var("SHELL"))
        .unwrap_or_else(|_| String::from("/bin/sh"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_is_never_empty() {
        assert!(!shell().is_empty());
    }
}
