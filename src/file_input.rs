use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Largest file that can be attached to a message
pub const MAX_ATTACHMENT_BYTES: u64 = 1_000_000;

/// Append the contents of `path` to `message` inside a fenced code block
/// tagged with the file's extension.
///
/// Problems reading the file never abort the request; they are appended as an
/// `(Error: ...)` note so the model and the user both see what went wrong.
pub fn attach_file(message: &str, path: &Path) -> String {
    match read_attachment(path) {
        Ok(content) => format!("{}\n```{}\n{}\n```", message, fence_language(path), content),
        Err(note) => format!("{}\n({})", message, note),
    }
}

fn read_attachment(path: &Path) -> Result<String, String> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => format!("Error: File not found: {}", path.display()),
        ErrorKind::PermissionDenied => {
            format!("Error: Permission denied accessing {}", path.display())
        }
        _ => format!("Error reading file: {}", e),
    })?;

    let mut bytes = Vec::new();
    file.take(MAX_ATTACHMENT_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| format!("Error reading file: {}", e))?;

    if bytes.len() as u64 > MAX_ATTACHMENT_BYTES {
        return Err("Error: File too large (max 1MB)".to_string());
    }

    String::from_utf8(bytes).map_err(|_| "Error: File appears to be binary".to_string())
}

fn fence_language(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_else(|| "text".to_string())
}
