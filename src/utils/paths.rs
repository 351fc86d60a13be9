// Path and module name conversion utilities
//
// Workspace files are identified by their relative Unix-style path. Modules are
// identified by a module path: the workspace path with a leading `/`, no extension
// and no trailing `/index`, or the package name for files under `node_modules`.

use crate::language::MODULE_FILE_SUFFIXES;
use anyhow::{Context, Result};
use std::path::{Path, MAIN_SEPARATOR};

/// Convert an absolute path to a relative Unix-style path (with `/` separators)
///
/// This function strips the workspace root prefix and converts all path separators
/// to Unix-style forward slashes (`/`), regardless of the platform.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use tshero_core::utils::paths::to_relative_unix_style;
///
/// let relative = to_relative_unix_style(
///     Path::new("/home/dev/project/src/main.ts"),
///     Path::new("/home/dev/project"),
/// )
/// .unwrap();
/// assert_eq!(relative, "src/main.ts");
/// ```
pub fn to_relative_unix_style(absolute: &Path, workspace_root: &Path) -> Result<String> {
    // Canonicalize both paths to handle symlinks (e.g., /var -> /private/var on macOS)
    // If canonicalization fails (path doesn't exist), fall back to original paths
    let (path_to_use, root_to_use) = match (absolute.canonicalize(), workspace_root.canonicalize())
    {
        (Ok(canonical_abs), Ok(canonical_root)) => (canonical_abs, canonical_root),
        _ => (absolute.to_path_buf(), workspace_root.to_path_buf()),
    };

    // Canonicalized Windows paths get a \\?\ prefix, non-canonical ones don't
    #[cfg(windows)]
    fn strip_unc_prefix(path: &Path) -> std::path::PathBuf {
        let path_str = path.to_string_lossy();
        if let Some(stripped) = path_str.strip_prefix(r"\\?\") {
            std::path::PathBuf::from(stripped)
        } else {
            path.to_path_buf()
        }
    }

    #[cfg(not(windows))]
    fn strip_unc_prefix(path: &Path) -> std::path::PathBuf {
        path.to_path_buf()
    }

    let normalized_path = strip_unc_prefix(&path_to_use);
    let normalized_root = strip_unc_prefix(&root_to_use);

    let relative = normalized_path
        .strip_prefix(&normalized_root)
        .with_context(|| {
            format!(
                "File path '{}' is not within workspace root '{}'",
                normalized_path.display(),
                normalized_root.display()
            )
        })?;

    let path_str = relative.to_str().context("Path contains invalid UTF-8")?;

    // On Unix, MAIN_SEPARATOR is already '/', so this is a no-op
    let unix_style = if MAIN_SEPARATOR == '\\' {
        path_str.replace('\\', "/")
    } else {
        path_str.to_string()
    };

    Ok(unix_style)
}

/// Workspace path of a file: relative Unix-style path with a leading `/`
pub fn workspace_path(file: &Path, workspace_root: &Path) -> Result<String> {
    let relative = to_relative_unix_style(file, workspace_root)?;
    Ok(format!("/{}", relative))
}

/// Module path of a workspace file
pub fn module_path(file: &Path, workspace_root: &Path) -> Result<String> {
    let relative = to_relative_unix_style(file, workspace_root)?;
    Ok(module_path_from_relative(&relative))
}

/// Module path for a relative Unix-style file path
///
/// `src/app/index.ts` becomes `/src/app`, `node_modules/@types/lodash/index.d.ts`
/// becomes `lodash` and `node_modules/@types/babel__core/index.d.ts` becomes
/// `@babel/core`.
pub fn module_path_from_relative(relative: &str) -> String {
    let relative = relative.trim_start_matches('/');
    if let Some(position) = relative.rfind("node_modules/") {
        let package_path = &relative[position + "node_modules/".len()..];
        let package_path = match package_path.strip_prefix("@types/") {
            Some(typed) => unmangle_types_package(typed),
            None => package_path.to_string(),
        };
        let stripped = strip_module_suffix(&package_path);
        return match stripped.strip_suffix("/index") {
            Some(package) => package.to_string(),
            None => stripped.to_string(),
        };
    }

    strip_index(&format!("/{}", strip_module_suffix(relative)))
}

/// `@types/babel__core` describes `@babel/core`
fn unmangle_types_package(path: &str) -> String {
    let (package, rest) = match path.split_once('/') {
        Some((package, rest)) => (package, Some(rest)),
        None => (path, None),
    };
    let package = match package.split_once("__") {
        Some((scope, name)) => format!("@{}/{}", scope, name),
        None => package.to_string(),
    };
    match rest {
        Some(rest) => format!("{}/{}", package, rest),
        None => package,
    }
}

/// Remove the first matching source file suffix
pub fn strip_module_suffix(path: &str) -> &str {
    MODULE_FILE_SUFFIXES
        .iter()
        .find_map(|suffix| path.strip_suffix(suffix))
        .unwrap_or(path)
}

fn strip_index(path: &str) -> String {
    if path == "/index" {
        return "/".to_string();
    }
    path.strip_suffix("/index").unwrap_or(path).to_string()
}

/// Collapse `.` and `..` segments of a `/`-rooted path
fn collapse(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Whether a module specifier is relative to the importing file
pub fn is_relative_library(library: &str) -> bool {
    library == "." || library == ".." || library.starts_with("./") || library.starts_with("../")
}

/// Resolve a module specifier written in the file at `importing_path` (a workspace path)
/// to the module path it refers to. Bare package names are returned unchanged.
pub fn resolve_library_name(library: &str, importing_path: &str) -> String {
    if !is_relative_library(library) {
        return library.to_string();
    }
    let directory = match importing_path.rfind('/') {
        Some(position) => &importing_path[..position],
        None => "",
    };
    let joined = collapse(&format!("{}/{}", directory, library));
    strip_index(strip_module_suffix(&joined))
}

/// Resolve a module specifier written in `current_file` to a module path
///
/// ```
/// use std::path::Path;
/// use tshero_core::utils::paths::normalize_library_name;
///
/// let normalized = normalize_library_name(
///     "./anotherFile",
///     Path::new("/root/src/myFile.ts"),
///     Path::new("/root"),
/// );
/// assert_eq!(normalized, "/src/anotherFile");
/// ```
pub fn normalize_library_name(library: &str, current_file: &Path, workspace_root: &Path) -> String {
    if !is_relative_library(library) {
        return library.to_string();
    }
    let importing_path = workspace_path(current_file, workspace_root).unwrap_or_else(|e| {
        tracing::warn!("{} - resolving '{}' against the raw path", e, library);
        current_file.to_string_lossy().replace('\\', "/")
    });
    resolve_library_name(library, &importing_path)
}

/// The module specifier to write in `importing_path` (a workspace path) to import
/// `module_path`. Package names stay bare.
pub fn relative_library_name(importing_path: &str, module_path: &str) -> String {
    if !module_path.starts_with('/') {
        return module_path.to_string();
    }

    let from: Vec<&str> = importing_path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let from_dir = &from[..from.len().saturating_sub(1)];
    let to: Vec<&str> = module_path.split('/').filter(|s| !s.is_empty()).collect();

    let common = from_dir
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let ups = from_dir.len() - common;
    let rest = to[common..].join("/");

    match (ups, rest.is_empty()) {
        (0, true) => ".".to_string(),
        (0, false) => format!("./{}", rest),
        (n, true) => vec![".."; n].join("/"),
        (n, false) => format!("{}/{}", "../".repeat(n).trim_end_matches('/'), rest),
    }
}
