//! Batch and single drafting against the board.

use std::sync::Arc;

use leadhunter::model::{ContactStatus, ProspectId};
use leadhunter::orchestrator::{
    BatchProgress, DraftOrchestrator, OrchestratorError, ProspectBoard, Worklist,
};

use crate::support::{draft_for, prospects, ScriptedGateway};

fn setup(names: &[&str]) -> (Arc<ScriptedGateway>, ProspectBoard, DraftOrchestrator) {
    let gateway = ScriptedGateway::new();
    let board = ProspectBoard::new();
    board.replace(prospects(names));
    let drafts = DraftOrchestrator::new(gateway.clone(), board.clone());
    (gateway, board, drafts)
}

#[test]
fn worklist_skips_drafted_and_keeps_order() {
    let mut list = prospects(&["A", "B", "C"]);
    let b = list[1].clone();
    list[1].attach_draft(draft_for(&b));

    let mut worklist = Worklist::from_prospects(&list);
    assert_eq!(worklist.len(), 2);
    assert_eq!(worklist.advance().as_ref(), Some(list[0].id()));
    assert_eq!(worklist.remaining(), 1);
    assert_eq!(worklist.advance().as_ref(), Some(list[2].id()));
    assert_eq!(worklist.advance(), None);
    assert_eq!(worklist.position(), 2);
}

#[tokio::test]
async fn failure_is_isolated_to_its_record() {
    let (gateway, board, drafts) = setup(&["First", "Second", "Third"]);
    gateway.fail_drafts_for("Second");

    let report = drafts.draft_all().await.expect("batch runs");

    let snapshot = board.snapshot();
    assert_eq!(snapshot[0].contact_status(), ContactStatus::Drafted);
    assert_eq!(snapshot[1].contact_status(), ContactStatus::New);
    assert!(!snapshot[1].has_draft());
    assert_eq!(snapshot[2].contact_status(), ContactStatus::Drafted);
    assert!(snapshot.iter().all(|p| p.status_is_consistent()));

    assert_eq!(
        report.drafted,
        vec![snapshot[0].id().clone(), snapshot[2].id().clone()]
    );
    assert_eq!(report.failures.len(), 1);
    assert_eq!(&report.failures[0].prospect_id, snapshot[1].id());
    assert_eq!(report.processed(), 3);
    assert_eq!(gateway.draft_calls(), 3);
}

#[tokio::test]
async fn rerun_retries_only_what_is_missing() {
    let (gateway, board, drafts) = setup(&["First", "Second", "Third"]);
    gateway.fail_drafts_for("Second");
    drafts.draft_all().await.expect("first run");

    let second = board.snapshot()[1].id().clone();
    let gateway_ok = ScriptedGateway::new();
    let retry = DraftOrchestrator::new(gateway_ok.clone(), board.clone());
    let report = retry.draft_all().await.expect("second run");

    assert_eq!(report.drafted, vec![second]);
    assert_eq!(gateway_ok.draft_calls(), 1);
    assert!(board.snapshot().iter().all(|p| p.has_draft()));
}

#[tokio::test]
async fn batch_over_fully_drafted_board_is_a_no_op() {
    let (gateway, board, drafts) = setup(&["A", "B"]);
    drafts.draft_all().await.expect("first run");
    let calls = gateway.draft_calls();
    let before = board.snapshot();

    let report = drafts.draft_all().await.expect("second run");

    assert_eq!(gateway.draft_calls(), calls);
    assert_eq!(report.processed(), 0);
    assert!(Arc::ptr_eq(&before, &board.snapshot()));
}

#[tokio::test]
async fn each_draft_is_published_before_the_next_call() {
    let (gateway, board, drafts) = setup(&["A", "B", "C"]);
    gateway.observe_run(board.clone(), drafts.subscribe_progress());

    drafts.draft_all().await.expect("batch runs");

    assert_eq!(gateway.seen_at_draft(), vec![(0, 0), (1, 1), (2, 2)]);
}

#[tokio::test]
async fn progress_is_published_per_step() {
    let (gateway, _board, drafts) = setup(&["A", "B", "C"]);
    gateway.fail_drafts_for("B");
    let hold = gateway.hold();
    let mut rx = drafts.subscribe_progress();
    let drafts = Arc::new(drafts);

    let run = tokio::spawn({
        let drafts = Arc::clone(&drafts);
        async move { drafts.draft_all().await }
    });

    let mut seen = Vec::new();
    for _ in 0..3 {
        hold.entered.notified().await;
        rx.changed().await.expect("orchestrator alive");
        seen.push(*rx.borrow_and_update());
        hold.release.notify_one();
    }
    run.await.expect("task joins").expect("batch runs");
    rx.changed().await.expect("orchestrator alive");
    seen.push(*rx.borrow_and_update());

    let steps: Vec<(usize, usize, usize)> = seen
        .iter()
        .map(|p| (p.processed, p.drafted, p.failed))
        .collect();
    assert_eq!(steps, vec![(0, 0, 0), (1, 1, 0), (2, 1, 1), (3, 2, 1)]);
    assert!(seen.iter().all(|p| p.total == 3));
}

#[tokio::test]
async fn concurrent_batch_is_rejected() {
    let (gateway, _board, drafts) = setup(&["A"]);
    let drafts = Arc::new(drafts);
    let hold = gateway.hold();

    let running = {
        let drafts = Arc::clone(&drafts);
        tokio::spawn(async move { drafts.draft_all().await })
    };
    hold.entered.notified().await;

    assert!(drafts.is_batch_running());
    let rejected = drafts.draft_all().await;
    assert!(matches!(rejected, Err(OrchestratorError::BatchInFlight)));

    hold.release.notify_one();
    let report = running.await.expect("task").expect("batch runs");
    assert_eq!(report.drafted.len(), 1);
    assert!(!drafts.is_batch_running());
}

#[tokio::test]
async fn records_removed_mid_run_are_skipped() {
    let (gateway, board, drafts) = setup(&["A", "B", "C"]);
    gateway.clear_board_on_draft(board.clone());

    let report = drafts.draft_all().await.expect("batch runs");

    assert!(board.is_empty());
    assert!(report.drafted.is_empty());
    assert_eq!(report.skipped.len(), 3);
    assert_eq!(gateway.draft_calls(), 1);
}

#[tokio::test]
async fn draft_one_attaches_and_escalates() {
    let (gateway, board, drafts) = setup(&["Good", "Bad"]);
    gateway.fail_drafts_for("Bad");
    let snapshot = board.snapshot();

    let draft = drafts
        .draft_one(snapshot[0].id())
        .await
        .expect("draft succeeds");
    assert_eq!(draft, draft_for(&snapshot[0]));
    assert_eq!(
        board.get(snapshot[0].id()).map(|p| p.contact_status()),
        Some(ContactStatus::Drafted)
    );

    let failed = drafts.draft_one(snapshot[1].id()).await;
    assert!(matches!(failed, Err(OrchestratorError::Draft(_))));
    assert_eq!(board.get(snapshot[1].id()), Some(snapshot[1].clone()));

    let missing = drafts.draft_one(&ProspectId::generate()).await;
    assert!(matches!(missing, Err(OrchestratorError::UnknownProspect(_))));
}
