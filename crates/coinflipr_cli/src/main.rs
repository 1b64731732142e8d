//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `coinflipr_core` linkage.
//! - Exercise one full flip-and-list cycle against an in-memory store.

use coinflipr_core::db::open_db_in_memory;
use coinflipr_core::{FlipService, HistoryService, SqliteHistoryRepository};

fn main() {
    println!("coinflipr_core ping={}", coinflipr_core::ping());
    println!("coinflipr_core version={}", coinflipr_core::core_version());

    if let Err(err) = smoke_flip() {
        eprintln!("smoke flip failed: {err}");
        std::process::exit(1);
    }
}

fn smoke_flip() -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    let repo = SqliteHistoryRepository::try_new(&conn)?;
    let mut engine = FlipService::new(HistoryService::new(repo));

    if let Some(committed) = engine.flip(&mut rand::thread_rng()) {
        let record = committed?;
        println!("flip result={} at_ms={}", record.result, record.flipped_at_ms);
    }

    let history = engine.history().list()?;
    println!("history len={}", history.len());
    Ok(())
}
