//! Line-delimited JSON turn journal.

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use crate::events::JournalRecord;

/// Append one JSON line per record to `path` until the sender side closes.
pub async fn run_journal(
    path: String,
    mut rx: mpsc::UnboundedReceiver<JournalRecord>,
) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await?;
    log::info!("journal open at {path}");

    let mut buf: Vec<u8> = Vec::with_capacity(1024);
    while let Some(record) = rx.recv().await {
        buf.clear();
        if let Err(e) = encode_line(&record, &mut buf) {
            log::error!("journal record dropped: {e}");
            continue;
        }
        file.write_all(&buf).await?;
        file.flush().await?;
    }
    Ok(())
}

/// Serialize a record followed by a newline
pub fn encode_line(record: &JournalRecord, buf: &mut Vec<u8>) -> serde_json::Result<()> {
    serde_json::to_writer(&mut *buf, record)?;
    buf.push(b'\n');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GameEndRecord;

    fn end_record(episode: u32) -> JournalRecord {
        JournalRecord::GameEnd(GameEndRecord {
            episode,
            turn: 3,
            outcome: "won".to_string(),
            max_tile: 2048,
        })
    }

    #[test]
    fn test_encode_line_is_single_line() {
        let mut buf = Vec::new();
        encode_line(&end_record(0), &mut buf).unwrap();
        assert_eq!(buf.last(), Some(&b'\n'));
        assert_eq!(buf.iter().filter(|&&b| b == b'\n').count(), 1);
    }

    #[tokio::test]
    async fn test_journal_appends_lines() {
        let path = std::env::temp_dir().join(format!(
            "tui2048-journal-test-{}.jsonl",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(end_record(0)).unwrap();
        tx.send(end_record(1)).unwrap();
        drop(tx);
        run_journal(path.to_string_lossy().into_owned(), rx)
            .await
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<JournalRecord> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines, vec![end_record(0), end_record(1)]);
        let _ = std::fs::remove_file(&path);
    }
}
