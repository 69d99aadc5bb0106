//! Interpreter executable discovery.
//!
//! Resolution order is a contract: PATH scopes first (process, then user,
//! then machine), then a short list of OS-specific well-known directories
//! searched recursively to a bounded depth. The first match wins and the
//! resolved path is never re-resolved mid-run, even if the filesystem
//! changes underneath.
//!
//! On Unix only the process scope exists. On Windows the scopes are
//! distinct: the process environment, the user `Environment` registry key,
//! and the machine `Session Manager\Environment` registry key, consulted in
//! that order so a user-scope entry beats a machine-scope one even where the
//! OS-merged process variable orders them the other way. The scope list stays
//! injectable so the ordering contract is testable on any platform.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LocateError;

#[cfg(windows)]
const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
const PATH_LIST_SEPARATOR: char = ':';

/// Directories below a fallback root are searched this many levels deep.
const MAX_FALLBACK_DEPTH: usize = 2;

/// Ordered search configuration for one interpreter filename.
#[derive(Debug, Clone)]
pub struct InterpreterLocator {
    filename: String,
    /// Raw PATH strings in precedence order (process, user, machine).
    path_scopes: Vec<String>,
    /// Well-known directory roots in precedence order.
    fallback_roots: Vec<PathBuf>,
}

impl InterpreterLocator {
    /// Locator using the real environment scopes and OS fallback roots.
    pub fn from_environment(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            path_scopes: environment_path_scopes(),
            fallback_roots: default_fallback_roots(),
        }
    }

    /// Locator with explicit scopes and roots, for tests and embedders.
    pub fn with_search_order(
        filename: &str,
        path_scopes: Vec<String>,
        fallback_roots: Vec<PathBuf>,
    ) -> Self {
        Self {
            filename: filename.to_string(),
            path_scopes,
            fallback_roots,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Resolve the interpreter path. First match wins; PATH entries always
    /// beat fallback directories.
    pub fn locate(&self) -> Result<PathBuf, LocateError> {
        if let Some(path) = self.search_path_scopes() {
            return Ok(path);
        }
        if let Some(path) = self.search_fallback_roots() {
            return Ok(path);
        }
        Err(LocateError::InterpreterNotFound {
            filename: self.filename.clone(),
        })
    }

    fn search_path_scopes(&self) -> Option<PathBuf> {
        for scope in &self.path_scopes {
            for dir in split_path_scope(scope) {
                let candidate = dir.join(&self.filename);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        None
    }

    fn search_fallback_roots(&self) -> Option<PathBuf> {
        self.fallback_roots
            .iter()
            .find_map(|root| find_in_dir(root, &self.filename, 0))
    }
}

/// Split one PATH scope string into ordered directories, trimming entries and
/// dropping empties.
fn split_path_scope(scope: &str) -> Vec<PathBuf> {
    scope
        .split(PATH_LIST_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Depth-first case-insensitive filename search, bounded at
/// [`MAX_FALLBACK_DEPTH`] directory levels below the root.
fn find_in_dir(dir: &Path, filename: &str, depth: usize) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() {
            if entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.eq_ignore_ascii_case(filename))
            {
                return Some(path);
            }
        } else if path.is_dir() {
            subdirs.push(path);
        }
    }
    if depth < MAX_FALLBACK_DEPTH {
        for subdir in subdirs {
            if let Some(found) = find_in_dir(&subdir, filename, depth + 1) {
                return Some(found);
            }
        }
    }
    None
}

/// PATH scope strings in precedence order: process, then user, then machine.
///
/// The user and machine scopes live in the registry; the process variable the
/// OS hands out is already a merge of both, with machine entries first, so it
/// cannot stand in for the per-scope precedence on its own.
#[cfg(windows)]
fn environment_path_scopes() -> Vec<String> {
    use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};

    let mut scopes: Vec<String> = std::env::var("PATH").ok().into_iter().collect();
    if let Some(user) = registry_path_value(HKEY_CURRENT_USER, "Environment") {
        scopes.push(user);
    }
    if let Some(machine) = registry_path_value(
        HKEY_LOCAL_MACHINE,
        r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment",
    ) {
        scopes.push(machine);
    }
    scopes
}

#[cfg(windows)]
fn registry_path_value(root: winreg::HKEY, subkey: &str) -> Option<String> {
    winreg::RegKey::predef(root)
        .open_subkey(subkey)
        .ok()?
        .get_value("Path")
        .ok()
}

/// Only the process scope exists outside Windows.
#[cfg(not(windows))]
fn environment_path_scopes() -> Vec<String> {
    std::env::var("PATH").ok().into_iter().collect()
}

/// OS-specific well-known interpreter directories, in precedence order.
#[cfg(windows)]
fn default_fallback_roots() -> Vec<PathBuf> {
    vec![
        PathBuf::from(r"C:\Program Files\PowerShell"),
        PathBuf::from(r"C:\Program Files (x86)\PowerShell"),
        PathBuf::from(r"C:\Windows\System32\WindowsPowerShell"),
    ]
}

#[cfg(not(windows))]
fn default_fallback_roots() -> Vec<PathBuf> {
    let mut roots = vec![
        PathBuf::from("/usr/local/bin"),
        PathBuf::from("/usr/bin"),
        PathBuf::from("/opt/microsoft/powershell"),
        PathBuf::from("/snap/bin"),
    ];
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".dotnet/tools"));
    }
    roots
}
