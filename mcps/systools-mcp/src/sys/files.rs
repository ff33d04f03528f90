//! File listing, reading and writing

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::types::{CommandResult, FileEntry, SysError, SysResult};

/// List a directory's entries, optionally recursively.
///
/// Hidden entries (dot-prefixed) are skipped unless requested. A missing or
/// non-directory path is an error; unreadable subdirectories during
/// recursion are skipped rather than failing the listing.
pub async fn list_files(
    directory: &str,
    include_hidden: bool,
    recursive: bool,
) -> SysResult<Vec<FileEntry>> {
    let root = PathBuf::from(directory);
    let metadata = fs::metadata(&root).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            SysError::NotFound(format!("Directory '{}' not found", directory))
        }
        std::io::ErrorKind::PermissionDenied => {
            SysError::AccessDenied(format!("Permission denied accessing '{}'", directory))
        }
        _ => SysError::Io(e),
    })?;
    if !metadata.is_dir() {
        return Err(SysError::InvalidInput(format!(
            "'{}' is not a directory",
            directory
        )));
    }

    let mut files = Vec::new();
    let mut stack = vec![(root, true)];
    while let Some((dir, is_root)) = stack.pop() {
        let mut read_dir = match fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if is_root => return Err(SysError::Io(e)),
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };

        while let Some(entry) = read_dir.next_entry().await.map_err(SysError::Io)? {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if !include_hidden && name.starts_with('.') {
                continue;
            }
            // entries that vanish mid-listing are dropped, not fatal
            if let Ok(file_entry) = file_entry_for(&path, &name).await {
                if recursive && file_entry.is_dir {
                    stack.push((path, false));
                }
                files.push(file_entry);
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Read a file as UTF-8 text.
pub async fn read_file(filepath: &str) -> SysResult<String> {
    fs::read_to_string(filepath).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            SysError::NotFound(format!("File '{}' not found", filepath))
        }
        std::io::ErrorKind::PermissionDenied => {
            SysError::AccessDenied(format!("Permission denied reading file '{}'", filepath))
        }
        std::io::ErrorKind::InvalidData => {
            SysError::InvalidInput(format!("File '{}' is not valid UTF-8", filepath))
        }
        _ => SysError::Io(e),
    })
}

/// Write or append content to a file, reporting the outcome as a
/// [`CommandResult`].
pub async fn write_file(filepath: &str, content: &str, append: bool) -> CommandResult {
    let start = Instant::now();
    let command = format!("write {}{}", if append { "--append " } else { "" }, filepath);

    let io_result = async {
        if append {
            let mut file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(filepath)
                .await?;
            file.write_all(content.as_bytes()).await?;
            file.flush().await?;
        } else {
            fs::write(filepath, content).await?;
        }
        Ok::<_, std::io::Error>(())
    }
    .await;

    match io_result {
        Ok(()) => CommandResult::succeeded(
            command,
            format!(
                "Content {} '{}' successfully",
                if append { "appended to" } else { "written to" },
                filepath
            ),
            start.elapsed().as_secs_f64(),
        ),
        Err(e) => CommandResult::failed(
            command,
            format!("Error writing to file '{}': {}", filepath, e),
            start.elapsed().as_secs_f64(),
        ),
    }
}

async fn file_entry_for(path: &Path, name: &str) -> Result<FileEntry, std::io::Error> {
    let symlink_metadata = fs::symlink_metadata(path).await?;
    let is_symlink = symlink_metadata.file_type().is_symlink();
    // broken symlinks fall back to the link's own metadata
    let metadata = fs::metadata(path).await.unwrap_or(symlink_metadata);

    Ok(FileEntry {
        path: path.display().to_string(),
        name: name.to_string(),
        size_bytes: metadata.len(),
        is_file: metadata.is_file(),
        is_dir: metadata.is_dir(),
        is_symlink,
        permissions: permission_string(&metadata),
        created: metadata.created().ok().map(DateTime::<Utc>::from),
        modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        accessed: metadata.accessed().ok().map(DateTime::<Utc>::from),
    })
}

#[cfg(unix)]
fn permission_string(metadata: &std::fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    format!("{:03o}", metadata.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn permission_string(metadata: &std::fs::Metadata) -> String {
    if metadata.permissions().readonly() {
        "444".to_string()
    } else {
        "666".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let path_str = path.to_str().unwrap();

        let result = write_file(path_str, "first line\n", false).await;
        assert!(result.success, "stderr: {}", result.stderr);
        assert_eq!(result.return_code, 0);
        assert!(result.stdout.contains("written to"));

        let content = read_file(path_str).await.unwrap();
        assert_eq!(content, "first line\n");
    }

    #[tokio::test]
    async fn test_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let path_str = path.to_str().unwrap();

        write_file(path_str, "a", false).await;
        let result = write_file(path_str, "b", true).await;
        assert!(result.success);
        assert!(result.stdout.contains("appended to"));

        assert_eq!(read_file(path_str).await.unwrap(), "ab");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let result = read_file("/no/such/file/xyz.txt").await;
        assert!(matches!(result, Err(SysError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_read_non_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.dat");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x01]).unwrap();

        let result = read_file(path.to_str().unwrap()).await;
        assert!(matches!(result, Err(SysError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_list_missing_directory() {
        let result = list_files("/no/such/dir/xyz", false, false).await;
        assert!(matches!(result, Err(SysError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_file_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, "x").unwrap();

        let result = list_files(path.to_str().unwrap(), false, false).await;
        assert!(matches!(result, Err(SysError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_hidden_files_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("visible.txt"), "x").unwrap();
        std::fs::write(dir.path().join(".hidden"), "x").unwrap();

        let visible = list_files(dir.path().to_str().unwrap(), false, false)
            .await
            .unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "visible.txt");

        let all = list_files(dir.path().to_str().unwrap(), true, false)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_recursive_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("nested.txt"), "x").unwrap();
        std::fs::write(dir.path().join("top.txt"), "x").unwrap();

        let flat = list_files(dir.path().to_str().unwrap(), false, false)
            .await
            .unwrap();
        assert_eq!(flat.len(), 2);

        let deep = list_files(dir.path().to_str().unwrap(), false, true)
            .await
            .unwrap();
        assert_eq!(deep.len(), 3);
        assert!(deep.iter().any(|f| f.name == "nested.txt"));
    }
}
