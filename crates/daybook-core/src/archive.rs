//! Per-day chat persistence as sectioned text blobs.
//!
//! One blob per calendar day: a `# <title>` line, then one `## <role>`
//! section per message with the raw body below it. Parsing is the exact
//! inverse of serialization so a chat round-trips unchanged.

use crate::types::{Chat, Message, Role};
use log::{debug, info};
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors returned by the chat archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Blob contents did not match the sectioned format.
    #[error("malformed chat blob: {0}")]
    Malformed(String),
}

/// Persistent store abstraction for chats.
pub trait ChatArchive: Send + Sync {
    /// Serialize a chat, overwriting the blob for its day key.
    fn save(&self, chat: &Chat) -> Result<(), ArchiveError>;
    /// Load every chat, sorted by day key descending.
    fn load_all(&self) -> Result<Vec<Chat>, ArchiveError>;
    /// Delete the blob for a day key; returns whether one existed.
    fn delete(&self, day: &str) -> Result<bool, ArchiveError>;
}

/// File-backed archive with one blob per day under a root directory.
#[derive(Debug)]
pub struct FileChatArchive {
    root: PathBuf,
    /// Serialize writes across turns.
    write_lock: Mutex<()>,
}

impl FileChatArchive {
    /// Create an archive rooted at the given directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        info!("initialized chat archive (root={})", root.display());
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Path to a day's blob.
    fn day_path(&self, day: &str) -> PathBuf {
        self.root.join(format!("{day}.md"))
    }
}

impl ChatArchive for FileChatArchive {
    fn save(&self, chat: &Chat) -> Result<(), ArchiveError> {
        let _guard = self.write_lock.lock();
        let path = self.day_path(&chat.day);
        let temp_path = self.root.join(format!("{}.md.tmp", chat.day));
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            file.write_all(serialize_chat(chat).as_bytes())?;
        }
        if path.exists() {
            fs::remove_file(&path)?;
        }
        fs::rename(temp_path, path)?;
        debug!(
            "saved chat blob (day={}, messages={})",
            chat.day,
            chat.messages.len()
        );
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<Chat>, ArchiveError> {
        let mut chats = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
                continue;
            }
            let Some(day) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let contents = fs::read_to_string(&path)?;
            chats.push(parse_chat(day, &contents)?);
        }
        chats.sort_by(|a, b| b.day.cmp(&a.day));
        info!("loaded chat archive (chats={})", chats.len());
        Ok(chats)
    }

    fn delete(&self, day: &str) -> Result<bool, ArchiveError> {
        let _guard = self.write_lock.lock();
        let path = self.day_path(day);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        debug!("deleted chat blob (day={day})");
        Ok(true)
    }
}

/// Render a chat as its sectioned blob.
fn serialize_chat(chat: &Chat) -> String {
    let mut out = format!("# {}\n", chat.title);
    for message in &chat.messages {
        out.push('\n');
        out.push_str("## ");
        out.push_str(message.role.as_str());
        out.push('\n');
        out.push_str(&message.rendered());
        out.push('\n');
    }
    out
}

/// Parse a blob back into a chat. The model field is filled in by the
/// engine; the blob does not carry it.
fn parse_chat(day: &str, contents: &str) -> Result<Chat, ArchiveError> {
    let mut lines = contents.lines();
    let title = lines
        .next()
        .and_then(|line| line.strip_prefix("# "))
        .ok_or_else(|| ArchiveError::Malformed(format!("missing title line (day={day})")))?;

    let mut messages = Vec::new();
    let mut current: Option<(Role, Vec<&str>)> = None;
    for line in lines {
        if let Some(role_name) = line.strip_prefix("## ") {
            if let Some(section) = current.take() {
                messages.push(finish_section(section));
            }
            let role = Role::parse(role_name).ok_or_else(|| {
                ArchiveError::Malformed(format!("unknown role {role_name:?} (day={day})"))
            })?;
            current = Some((role, Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((role, body)) = current {
        // The final section keeps all its lines; the trailing newline was
        // already consumed by the line iterator.
        messages.push(Message::from_rendered(role, &body.join("\n")));
    }

    Ok(Chat {
        day: day.to_string(),
        title: title.to_string(),
        model: String::new(),
        messages,
    })
}

/// Close a non-final section, dropping the separator blank line the
/// serializer placed before the next header.
fn finish_section((role, mut body): (Role, Vec<&str>)) -> Message {
    if body.last() == Some(&"") {
        body.pop();
    }
    Message::from_rendered(role, &body.join("\n"))
}
