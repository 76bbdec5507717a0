//! Audit log - Append-only record of each turn's oracle exchange
//!
//! One JSONL file per game under a configured directory. Purely
//! observational: records are never read back, and a write failure is
//! logged and swallowed so auditing can never stall the turn loop.

use serde::Serialize;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// One audited turn
#[derive(Debug, Serialize)]
pub struct AuditRecord<'a> {
    pub turn: usize,
    pub seat: &'a str,
    /// Rendered prompt; absent on forced moves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<&'a str>,
    /// Oracle reply verbatim; absent when the call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_reply: Option<&'a str>,
    pub chosen_index: usize,
    pub chosen: String,
    pub at_ms: i64,
}

/// Per-game JSONL audit writer
#[derive(Debug)]
pub struct AuditLog {
    dir: PathBuf,
    game_index: u32,
    records: usize,
}

impl AuditLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            game_index: 1,
            records: 0,
        }
    }

    /// File the current game's records land in
    pub fn current_file(&self) -> PathBuf {
        self.dir.join(format!("game-{}.jsonl", self.game_index))
    }

    /// Rotate to the next game's file. A game that recorded nothing
    /// keeps its index, so empty files never accumulate.
    pub fn next_game(&mut self) {
        if self.records > 0 {
            self.game_index += 1;
            self.records = 0;
        }
    }

    /// Append one record to the current game's file
    pub async fn append(&mut self, record: &AuditRecord<'_>) {
        match self.try_append(record).await {
            Ok(()) => self.records += 1,
            Err(e) => warn!(
                "Failed to append audit record to {}: {}",
                self.current_file().display(),
                e
            ),
        }
    }

    async fn try_append(&self, record: &AuditRecord<'_>) -> Result<(), std::io::Error> {
        fs::create_dir_all(&self.dir).await?;

        let line = serde_json::to_string(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.current_file())
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(turn: usize) -> AuditRecord<'static> {
        AuditRecord {
            turn,
            seat: "landlord",
            prompt: Some("prompt"),
            raw_reply: Some(r#"{"cards": "过牌"}"#),
            chosen_index: 0,
            chosen: "过牌".to_string(),
            at_ms: 1_700_000_000_000,
        }
    }

    #[tokio::test]
    async fn test_append_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut audit = AuditLog::new(dir.path());

        audit.append(&record(0)).await;
        audit.append(&record(1)).await;

        let content = fs::read_to_string(audit.current_file()).await.unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed["turn"], 1);
        assert_eq!(parsed["seat"], "landlord");
        assert_eq!(parsed["chosen"], "过牌");
    }

    #[tokio::test]
    async fn test_forced_record_omits_prompt_and_reply() {
        let dir = tempfile::tempdir().unwrap();
        let mut audit = AuditLog::new(dir.path());

        audit
            .append(&AuditRecord {
                turn: 3,
                seat: "landlord_up",
                prompt: None,
                raw_reply: None,
                chosen_index: 0,
                chosen: "3".to_string(),
                at_ms: 0,
            })
            .await;

        let content = fs::read_to_string(audit.current_file()).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert!(parsed.get("prompt").is_none());
        assert!(parsed.get("raw_reply").is_none());
        assert_eq!(parsed["chosen_index"], 0);
    }

    #[tokio::test]
    async fn test_next_game_rotates_only_after_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut audit = AuditLog::new(dir.path());
        let first = audit.current_file();

        // Nothing written yet: the index stays put.
        audit.next_game();
        assert_eq!(audit.current_file(), first);

        audit.append(&record(0)).await;
        audit.next_game();
        let second = audit.current_file();
        assert_ne!(second, first);
        assert!(second.to_string_lossy().ends_with("game-2.jsonl"));

        audit.append(&record(0)).await;
        assert!(fs::try_exists(&first).await.unwrap());
        assert!(fs::try_exists(&second).await.unwrap());
    }
}
