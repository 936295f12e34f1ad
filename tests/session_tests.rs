//! Session and line driver tests (mostly on a paused tokio clock)

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_test::assert_ok;

use color_match::core::{GameSnapshot, Phase};
use color_match::session::{
    handle_line, spawn_observation_stream, Session, SessionConfig, SessionHandle,
};
use color_match::types::{SelectOutcome, RESOLVE_DELAY_MS, TILE_COUNT};

fn spawn(seed: u32) -> SessionHandle {
    Session::spawn(SessionConfig {
        seed,
        ..SessionConfig::default()
    })
}

fn equal_pair(snap: &GameSnapshot) -> (usize, usize) {
    let b = (1..TILE_COUNT)
        .find(|&i| snap.tiles[i].color == snap.tiles[0].color)
        .unwrap();
    (0, b)
}

fn unequal_pair(snap: &GameSnapshot) -> (usize, usize) {
    let b = (1..TILE_COUNT)
        .find(|&i| snap.tiles[i].color != snap.tiles[0].color)
        .unwrap();
    (0, b)
}

async fn past_delay() {
    tokio::time::sleep(Duration::from_millis(RESOLVE_DELAY_MS as u64 + 1)).await;
}

fn temp_log_path(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "color-match-{}-{}.jsonl",
        tag,
        std::process::id()
    ))
}

fn read_log(path: &std::path::Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn events<'a>(records: &'a [serde_json::Value], event: &str) -> Vec<&'a serde_json::Value> {
    records.iter().filter(|r| r["event"] == event).collect()
}

async fn send(session: &SessionHandle, line: &str) -> serde_json::Value {
    let reply = handle_line(session, line).await.unwrap();
    serde_json::from_str(&reply.line.expect("expected a reply line")).unwrap()
}

#[tokio::test(start_paused = true)]
async fn end_to_end_match() {
    let session = spawn(12345);
    let (a, b) = equal_pair(&session.snapshot());

    assert_eq!(session.select(a).await.unwrap(), SelectOutcome::Revealed);
    assert_eq!(
        session.select(b).await.unwrap(),
        SelectOutcome::Matched { finished: false }
    );
    past_delay().await;

    let snap = session.snapshot();
    assert!(snap.tiles[a].matched);
    assert!(snap.tiles[b].matched);
    assert!(snap.selection.is_empty());
    assert_eq!(snap.matches, 1);
}

#[tokio::test(start_paused = true)]
async fn end_to_end_mismatch() {
    let session = spawn(12345);
    let (a, b) = unequal_pair(&session.snapshot());

    session.select(a).await.unwrap();
    session.select(b).await.unwrap();

    tokio::time::sleep(Duration::from_millis(RESOLVE_DELAY_MS as u64 / 2)).await;
    assert!(session.snapshot().tiles[a].revealed);

    past_delay().await;
    let snap = session.snapshot();
    for i in [a, b] {
        assert!(!snap.tiles[i].revealed);
        assert!(!snap.tiles[i].matched);
    }
    assert!(snap.selection.is_empty());

    // Selectable again afterwards.
    assert_eq!(session.select(a).await.unwrap(), SelectOutcome::Revealed);
}

#[tokio::test(start_paused = true)]
async fn solve_whole_board() {
    let session = spawn(77);
    loop {
        let snap = session.snapshot();
        if snap.phase == Phase::Won {
            break;
        }
        let first = (0..TILE_COUNT).find(|&i| !snap.tiles[i].matched).unwrap();
        let second = (0..TILE_COUNT)
            .find(|&i| i != first && snap.tiles[i].color == snap.tiles[first].color)
            .unwrap();
        session.select(first).await.unwrap();
        session.select(second).await.unwrap();
        past_delay().await;
    }
    let snap = session.snapshot();
    assert_eq!(snap.matches, 8);
    assert!(snap.tiles.iter().all(|t| t.matched));
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_every_transition() {
    let session = spawn(3);
    let mut rx = session.subscribe();
    rx.borrow_and_update();
    let (a, b) = unequal_pair(&session.snapshot());

    session.select(a).await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().selection.as_slice(), &[a as u8]);

    session.select(b).await.unwrap();
    assert_eq!(rx.borrow_and_update().phase, Phase::Resolving);

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().phase, Phase::Playing);

    // Ignored selections publish nothing.
    session.select(a).await.unwrap();
    rx.borrow_and_update();
    session.select(a).await.unwrap();
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test(start_paused = true)]
async fn driver_select_and_restart() {
    let session = spawn(12345);
    let (a, b) = unequal_pair(&session.snapshot());

    let v = send(&session, &format!(r#"{{"type":"select","seq":1,"index":{a}}}"#)).await;
    assert_eq!(v["type"], "ack");
    assert_eq!(v["seq"], 1);
    assert_eq!(v["outcome"], "revealed");

    let v = send(&session, &format!(r#"{{"type":"select","seq":2,"index":{b}}}"#)).await;
    assert_eq!(v["outcome"], "mismatched");

    let v = send(&session, r#"{"type":"select","seq":3,"index":5}"#).await;
    assert_eq!(v["outcome"], "ignored");
    assert_eq!(v["reason"], "selection_full");

    let v = send(&session, r#"{"type":"restart","seq":4}"#).await;
    assert_eq!(v["outcome"], "restarted");
    assert_eq!(session.snapshot().generation, 2);
}

#[tokio::test(start_paused = true)]
async fn driver_errors() {
    let session = spawn(1);

    let v = send(&session, r#"{"type":"select","seq":7,"index":16}"#).await;
    assert_eq!(v["type"], "error");
    assert_eq!(v["code"], "out_of_range");
    assert_eq!(v["seq"], 7);

    let v = send(&session, "{not json").await;
    assert_eq!(v["code"], "invalid_json");

    let v = send(&session, r#"{"type":"shuffle","seq":8}"#).await;
    assert_eq!(v["code"], "unknown_command");
    assert_eq!(v["seq"], 8);

    assert_ok!(session.shutdown().await);
    let v = send(&session, r#"{"type":"restart","seq":9}"#).await;
    assert_eq!(v["code"], "session_closed");
}

#[tokio::test(start_paused = true)]
async fn driver_quit_and_blank_lines() {
    let session = spawn(1);

    let reply = handle_line(&session, "   ").await.unwrap();
    assert!(reply.line.is_none());
    assert!(!reply.quit);

    let reply = handle_line(&session, r#"{"type":"quit"}"#).await.unwrap();
    assert!(reply.line.is_none());
    assert!(reply.quit);
}

#[tokio::test(start_paused = true)]
async fn observation_stream_emits_initial_and_changes() {
    let session = spawn(1);
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let stream = spawn_observation_stream(&session, tx);

    let first: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
    assert_eq!(first["type"], "observation");
    assert_eq!(first["seq"], 1);
    assert_eq!(first["phase"], "playing");

    session.select(4).await.unwrap();
    let second: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
    assert_eq!(second["seq"], 2);
    assert_eq!(second["selection"], serde_json::json!([4]));
    assert_eq!(second["tiles"][4]["revealed"], true);

    assert_ok!(session.shutdown().await);
    assert_ok!(stream.await);
}

#[tokio::test(start_paused = true)]
async fn observation_stream_ends_on_latest_state() {
    let session = spawn(12345);
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let stream = spawn_observation_stream(&session, tx);
    let (a, b) = unequal_pair(&session.snapshot());

    // Burst of changes without giving the stream a chance to run in between.
    session.select(a).await.unwrap();
    session.select(b).await.unwrap();
    session.restart().await.unwrap();
    session.select(a).await.unwrap();

    assert_ok!(session.shutdown().await);
    assert_ok!(stream.await);

    let mut last = None;
    while let Ok(line) = rx.try_recv() {
        last = Some(serde_json::from_str::<serde_json::Value>(&line).unwrap());
    }
    let last = last.expect("at least one observation");
    let snap = session.snapshot();
    assert_eq!(last["generation"], 2);
    assert_eq!(last["generation"], snap.generation);
    assert_eq!(last["selection"], serde_json::json!([a]));
}

// Real clock: the log writer goes through the blocking file pool.
#[tokio::test]
async fn event_log_records_protocol_traffic() {
    let path = temp_log_path("traffic");
    let _ = std::fs::remove_file(&path);

    let session = Session::spawn(SessionConfig {
        seed: 12345,
        resolve_delay_ms: 200,
        log_path: Some(path.to_string_lossy().into_owned()),
    });
    let (a, b) = unequal_pair(&session.snapshot());
    let c = (0..TILE_COUNT).find(|&i| i != a && i != b).unwrap();

    send(&session, r#"{"type":"select","seq":1,"index":99}"#).await;
    send(&session, "garbage").await;
    send(&session, r#"{"type":"flip","seq":2}"#).await;
    send(&session, &format!(r#"{{"type":"select","seq":3,"index":{a}}}"#)).await;
    send(&session, &format!(r#"{{"type":"select","seq":4,"index":{b}}}"#)).await;
    send(&session, &format!(r#"{{"type":"select","seq":5,"index":{c}}}"#)).await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    let reply = handle_line(&session, r#"{"type":"quit","seq":6}"#).await.unwrap();
    assert!(reply.quit);
    assert_ok!(session.shutdown().await);

    let records = read_log(&path);
    assert_eq!(records[0]["event"], "started");
    assert_eq!(records[0]["seed"], 12345);

    let inbound = events(&records, "inbound");
    assert_eq!(inbound.len(), 7);
    assert_eq!(inbound[1]["line"], "garbage");

    let codes: Vec<&str> = events(&records, "error")
        .into_iter()
        .map(|r| r["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, ["out_of_range", "invalid_json", "unknown_command"]);

    let outcomes: Vec<&str> = events(&records, "ack")
        .into_iter()
        .map(|r| r["outcome"].as_str().unwrap())
        .collect();
    assert_eq!(outcomes, ["revealed", "mismatched", "ignored"]);

    let selects = events(&records, "select");
    assert_eq!(selects.len(), 3);
    assert!(selects[0].get("reason").is_none());
    assert_eq!(selects[2]["outcome"], "ignored");
    assert_eq!(selects[2]["reason"], "selection_full");

    let conceals = events(&records, "conceal");
    assert_eq!(conceals.len(), 1);
    assert_eq!(conceals[0]["applied"], true);

    let quits = events(&records, "quit");
    assert_eq!(quits.len(), 1);
    assert_eq!(quits[0]["seq"], 6);

    // Initial board, two reveals and the conceal.
    assert_eq!(events(&records, "observation").len(), 4);

    let _ = std::fs::remove_file(&path);
}
