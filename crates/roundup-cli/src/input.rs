use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// Where a request body came from, for error messages.
enum Source {
    File(PathBuf),
    Stdin,
}

impl Source {
    fn label(&self) -> String {
        match self {
            Source::File(path) => format!("'{}'", path.display()),
            Source::Stdin => "stdin".to_string(),
        }
    }
}

/// Load a request from `--input <file>` or, failing that, piped stdin.
pub fn read_request<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    let (source, body) = match path {
        Some(path) => {
            let resolved = resolve_path(path)?;
            tracing::debug!(path = %resolved.display(), "reading {what} request from file");
            let body = fs::read_to_string(&resolved)
                .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;
            (Source::File(resolved), body)
        }
        None => match read_piped_stdin()? {
            Some(body) => {
                tracing::debug!(bytes = body.len(), "reading {what} request from stdin");
                (Source::Stdin, body)
            }
            None => return Err(format!("--input <file.json> or stdin required for {what}").into()),
        },
    };

    parse_body(&source, &body)
}

fn parse_body<T: DeserializeOwned>(source: &Source, body: &str) -> Result<T, Box<dyn std::error::Error>> {
    serde_json::from_str(body.trim())
        .map_err(|e| format!("Failed to parse {}: {}", source.label(), e).into())
}

/// Resolve against the working directory; the target must be a regular file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let resolved = std::env::current_dir()?.join(path);

    if !resolved.exists() {
        return Err(format!("File not found: {}", resolved.display()).into());
    }
    if !resolved.is_file() {
        return Err(format!("Not a file: {}", resolved.display()).into());
    }

    Ok(resolved)
}

/// Piped stdin contents, or None for an interactive TTY or an empty pipe.
fn read_piped_stdin() -> io::Result<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    Ok(if buffer.trim().is_empty() { None } else { Some(buffer) })
}
