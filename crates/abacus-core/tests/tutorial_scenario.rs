//! End-to-end tutorial runs: runtime messages in, runtime commands out.

use abacus_core::{
    AbacusConfig, MessageRouter, RuntimeBridge, RuntimeSink, SpeechEngine, TutorialHandle,
    TutorialService, Utterance,
};
use abacus_proto::{EventBus, Stage, listener};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Runtime(Mutex<Vec<String>>);

impl Runtime {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl RuntimeSink for Runtime {
    fn send_message(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

/// Speaks every utterance in 300ms of (paused) time.
#[derive(Default)]
struct QuickSpeech(Mutex<Vec<String>>);

#[async_trait]
impl SpeechEngine for QuickSpeech {
    async fn speak(&self, utterance: Utterance) {
        self.0.lock().unwrap().push(utterance.text);
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    fn cancel_all(&self) {}
}

struct Page {
    router: MessageRouter,
    tutorial: TutorialHandle,
    runtime: Arc<Runtime>,
    speech: Arc<QuickSpeech>,
}

fn page() -> Page {
    let runtime = Arc::new(Runtime::default());
    let speech = Arc::new(QuickSpeech::default());

    let mut config = AbacusConfig::default();
    config.tutorial.seed = Some(7);

    let (tutorial, _task) = TutorialService::new(config)
        .with_bridge(RuntimeBridge::attached(runtime.clone()))
        .with_speech(speech.clone())
        .spawn();

    let router =
        MessageRouter::new(Arc::new(EventBus::new())).with_tutorial(Arc::new(tutorial.clone()));

    Page {
        router,
        tutorial,
        runtime,
        speech,
    }
}

impl Page {
    fn route_all(&self, raw: &str, times: usize) {
        for _ in 0..times {
            self.router.route(raw);
        }
    }

    async fn reach_columns(&self) {
        self.tutorial.start();
        self.tutorial.wait_for(|s| s.step == 1).await.unwrap();
        self.route_all("ButtonUp", 3);
        self.tutorial.wait_for(|s| s.step == 2).await.unwrap();
        self.route_all("DownClicked", 3);
        self.tutorial.wait_for(|s| s.step == 3).await.unwrap();
        self.router.route("Validated");
        self.tutorial
            .wait_for(|s| s.current_goal == Some(1234))
            .await
            .unwrap();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stage 1 and 2
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_discovery_then_first_column_goal() {
    let page = page();
    page.reach_columns().await;

    let sent = page.runtime.take();
    let expected_prefix = [
        "TutorialStart:1",
        "TutorialStage:1",
        "LockThousand:1",
        "LockHundred:1",
        "LockTen:1",
        "LockUnit:0",
        "SetValue0000",
        "TutorialStep:1:1",
        "TutorialStep:1:2",
        "TutorialStep:1:3",
        "TutorialStage:2",
    ];
    assert_eq!(&sent[..expected_prefix.len()], &expected_prefix);
    assert_eq!(&sent[sent.len() - 2..], &["ChangeList1234", "SetValue0000"]);

    // Let the goal narration reach the engine.
    tokio::time::sleep(Duration::from_millis(10)).await;
    let spoken = page.speech.0.lock().unwrap();
    assert!(spoken[0].starts_with("Bienvenue"));
    assert!(spoken.last().unwrap().contains("1 2 3 4"));
}

#[tokio::test(start_paused = true)]
async fn test_correct_answers_walk_through_column_goals() {
    let page = page();
    page.reach_columns().await;
    page.runtime.take();

    page.router.route("Correct");
    let status = page
        .tutorial
        .wait_for(|s| s.current_goal == Some(5678))
        .await
        .unwrap();
    assert_eq!(status.goals_completed, 1);

    page.router.route("GoalCompleted");
    page.tutorial
        .wait_for(|s| s.current_goal == Some(9012))
        .await
        .unwrap();

    page.router.route("Validated");
    page.tutorial
        .wait_for(|s| s.stage == Stage::Practice)
        .await
        .unwrap();
    // Practice intro, then the first random goal.
    tokio::time::sleep(Duration::from_secs(5)).await;
    let goal = page.tutorial.status().current_goal.unwrap();
    assert!((1..=9999).contains(&goal));

    let sent = page.runtime.take();
    assert!(sent.contains(&"TutorialStage:3".to_string()));
    assert_eq!(sent.last().map(String::as_str), Some("SetValue0000"));
    assert_eq!(sent[sent.len() - 2], format!("ChangeList{goal}"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Bus and quit
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_bus_sees_messages_whether_or_not_tutorial_runs() {
    let page = page();
    let raw_seen = Arc::new(AtomicUsize::new(0));
    let ups_seen = Arc::new(AtomicUsize::new(0));

    let counter = raw_seen.clone();
    page.router.bus().on(
        "message",
        listener(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
    );
    let counter = ups_seen.clone();
    page.router.bus().on(
        "upClick",
        listener(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
    );

    page.route_all("UpClicked", 2);
    page.router.route("ValueChanged:0042");

    assert_eq!(raw_seen.load(Ordering::SeqCst), 3);
    assert_eq!(ups_seen.load(Ordering::SeqCst), 2);
    assert_eq!(page.tutorial.status().step, 0);
}

#[tokio::test(start_paused = true)]
async fn test_quit_mid_columns_restores_runtime() {
    let page = page();
    page.reach_columns().await;
    page.runtime.take();

    page.tutorial.quit();
    assert!(!page.tutorial.is_active());
    let status = page.tutorial.wait_for(|s| !s.active).await.unwrap();
    assert_eq!(status.stage, Stage::Inactive);

    let sent = page.runtime.take();
    assert!(sent.contains(&"LockThousand:0".to_string()));
    assert!(sent.contains(&"LockUnit:0".to_string()));
    assert_eq!(sent.last().map(String::as_str), Some("TutorialQuit"));

    // Inputs after quit are not forwarded.
    page.router.route("Correct");
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(page.runtime.take().is_empty());
}
