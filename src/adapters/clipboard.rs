use crate::domain::ports::Clipboard;
use crate::utils::error::{CartError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// 行程內剪貼簿，只保留最後一次寫入的內容
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.text.lock().ok().and_then(|text| text.clone())
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let mut slot = self.text.lock().map_err(|_| CartError::ClipboardError {
            message: "clipboard lock poisoned".to_string(),
        })?;
        *slot = Some(text.to_string());
        Ok(())
    }
}

/// 把文字寫進外部指令的 stdin，例如 `wl-copy`、`pbcopy`、`xclip -selection clipboard`
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| CartError::MissingConfigError {
                field: "clipboard.command".to_string(),
            })?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn failure(&self, message: String) -> CartError {
        CartError::ClipboardError {
            message: format!("{}: {}", self.program, message),
        }
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.failure(format!("failed to start: {}", e)))?;

        // 寫入失敗時仍要等子行程結束，stdin 在區塊結束時關閉
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()).await,
            None => Ok(()),
        };

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.failure(format!("failed to wait: {}", e)))?;

        if !output.status.success() {
            return Err(self.failure(format!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        written.map_err(|e| self.failure(format!("failed to write: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_clipboard_keeps_last_text() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.contents(), None);

        clipboard.write_text("a.com").await.unwrap();
        clipboard.write_text("a.com, b.xyz").await.unwrap();

        assert_eq!(clipboard.contents().as_deref(), Some("a.com, b.xyz"));
    }

    #[tokio::test]
    async fn test_memory_clipboard_clones_share_contents() {
        let clipboard = MemoryClipboard::new();
        let handle = clipboard.clone();

        clipboard.write_text("a.com").await.unwrap();

        assert_eq!(handle.contents().as_deref(), Some("a.com"));
    }

    #[test]
    fn test_command_clipboard_requires_program() {
        assert!(matches!(
            CommandClipboard::new(&[]),
            Err(CartError::MissingConfigError { .. })
        ));
    }

    fn sh(script: String) -> CommandClipboard {
        CommandClipboard::new(&["sh".to_string(), "-c".to_string(), script]).unwrap()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_clipboard_pipes_text() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clip.txt");

        let clipboard = sh(format!("cat > '{}'", target.display()));
        clipboard.write_text("a.com, b.xyz").await.unwrap();

        assert_eq!(std::fs::read_to_string(target).unwrap(), "a.com, b.xyz");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_clipboard_reports_failure() {
        let clipboard = sh("exit 3".to_string());

        assert!(matches!(
            clipboard.write_text("a.com").await,
            Err(CartError::ClipboardError { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_clipboard_child_closing_stdin_early() {
        // 子行程不讀 stdin 就結束，大量寫入會遇到 broken pipe
        let clipboard = sh("exec 0<&-; exit 4".to_string());
        let text = "a.com, ".repeat(200_000);

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            clipboard.write_text(&text),
        )
        .await
        .expect("clipboard write should not hang");

        assert!(matches!(result, Err(CartError::ClipboardError { .. })));
    }
}
