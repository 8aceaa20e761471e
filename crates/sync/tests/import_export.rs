#![forbid(unsafe_code)]

use de_core::{Mode, Step};
use de_storage::{RecordStore, SqliteStore};
use de_sync::{
    ClipboardPort, CollectingNotifier, EditorSession, ImportOutcome, MemoryClipboard, Rejection,
    Repair,
};
use tempfile::TempDir;

type Session = EditorSession<SqliteStore, CollectingNotifier, MemoryClipboard>;

fn open_session() -> (TempDir, Session) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = SqliteStore::open(dir.path().join("database.db")).expect("open store");
    let session = EditorSession::open(store, CollectingNotifier::new(), MemoryClipboard::default())
        .expect("open session");
    (dir, session)
}

fn seeded_session(modes: &[Mode], steps: &[Step]) -> (TempDir, Session) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = SqliteStore::open(dir.path().join("database.db")).expect("open store");
    for mode in modes {
        store.insert(mode).expect("seed mode");
    }
    for step in steps {
        store.insert(step).expect("seed step");
    }
    let session = EditorSession::open(store, CollectingNotifier::new(), MemoryClipboard::default())
        .expect("open session");
    (dir, session)
}

fn completed(outcome: ImportOutcome) -> de_sync::ImportReport {
    match outcome {
        ImportOutcome::Completed(report) => report,
        ImportOutcome::Blocked(rejection) => panic!("import blocked: {rejection}"),
    }
}

#[test]
fn pasted_modes_get_fresh_ids() {
    let (_dir, mut session) = open_session();

    let report = session
        .import_modes("5\tA\t10\t2\n6\tB\t20\t3", Some(0))
        .expect("import");

    assert_eq!(report.appended, vec![1, 2]);
    assert!(report.overwritten.is_empty());
    let expected = vec![Mode::new(1, "A", 10, 2), Mode::new(2, "B", 20, 3)];
    assert_eq!(session.modes().records(), expected.as_slice());
    assert_eq!(session.store().load_all::<Mode>().expect("load"), expected);
}

#[test]
fn overwrites_keep_ids_and_spill_into_appends() {
    let (_dir, mut session) = seeded_session(
        &[
            Mode::new(1, "A", 1, 1),
            Mode::new(2, "B", 2, 2),
            Mode::new(3, "C", 3, 3),
        ],
        &[],
    );

    let report = session
        .import_modes("9\tX\t7\t7\r\n9\tY\t8\t8\r\n9\tZ\t9\t9\r\n", Some(1))
        .expect("import");

    assert_eq!(report.overwritten, vec![2, 3]);
    assert_eq!(report.appended, vec![4]);
    let names: Vec<_> = session
        .store()
        .load_all::<Mode>()
        .expect("load")
        .into_iter()
        .map(|mode| (mode.id, mode.name))
        .collect();
    assert_eq!(
        names,
        vec![
            (1, "A".to_string()),
            (2, "X".to_string()),
            (3, "Y".to_string()),
            (4, "Z".to_string()),
        ]
    );
}

#[test]
fn unparsable_rows_are_skipped_without_moving_the_position() {
    let (_dir, mut session) =
        seeded_session(&[Mode::new(1, "A", 1, 1), Mode::new(2, "B", 2, 2)], &[]);

    let text = "1\tonly-two\n0\tX\tnot-a-number\t1\n0\tY\t5\t6\n";
    let report = session.import_modes(text, Some(0)).expect("import");

    assert_eq!(report.skipped, 2);
    assert_eq!(report.overwritten, vec![1]);
    assert!(session.notifier().is_empty());
    assert_eq!(session.modes().records()[0], Mode::new(1, "Y", 5, 6));
    assert_eq!(session.modes().records()[1], Mode::new(2, "B", 2, 2));
}

#[test]
fn mode_rows_without_a_numeric_identifier_are_skipped() {
    let (_dir, mut session) = seeded_session(&[Mode::new(1, "A", 1, 1)], &[]);

    let text = "abc\tX\t10\t2\nID\tY\t3\t4\n7\tZ\t5\t6\n";
    let report = session.import_modes(text, Some(0)).expect("import");

    assert_eq!(report.skipped, 2);
    assert_eq!(report.overwritten, vec![1]);
    assert!(report.appended.is_empty());
    assert!(session.notifier().is_empty());
    assert_eq!(
        session.store().load_all::<Mode>().expect("load"),
        vec![Mode::new(1, "Z", 5, 6)]
    );
}

#[test]
fn no_selection_appends_at_the_end() {
    let (_dir, mut session) = seeded_session(&[Mode::new(4, "A", 1, 1)], &[]);

    let report = session.import_modes("0\tB\t2\t2\n", None).expect("import");

    assert_eq!(report.appended, vec![5]);
    assert_eq!(session.modes().len(), 2);
}

#[test]
fn identical_overwrites_are_still_applied() {
    let (_dir, mut session) = seeded_session(&[Mode::new(1, "A", 1, 1)], &[]);
    let report = session.import_modes("1\tA\t1\t1\n", Some(0)).expect("import");
    assert_eq!(report.overwritten, vec![1]);
    assert_eq!(report.applied(), 1);
}

#[test]
fn unknown_mode_ids_are_repaired_to_the_first_mode() {
    let (_dir, mut session) =
        seeded_session(&[Mode::new(1, "A", 1, 1), Mode::new(2, "B", 2, 2)], &[]);

    let outcome = session
        .import_steps("0\t42\t5\tX\t3\tT\t9\n", Some(0))
        .expect("import");
    let report = completed(outcome);

    assert_eq!(
        report.repairs,
        vec![Repair {
            requested: 42,
            substituted: 1
        }]
    );
    assert_eq!(
        session.notifier().messages(),
        vec![
            "There are no records with the Id 42 in the Mode table. ModeId value will be replaced by the ID of the first record from the Mode table."
                .to_string()
        ]
    );
    let stored = session.store().load_all::<Step>().expect("load");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].mode_id, 1);
    assert_eq!(stored[0].timer, 5);
    assert_eq!(stored[0].destination, "X");
    assert_eq!(stored[0].step_type, "T");
    assert_eq!(stored[0].volume, 9);
}

#[test]
fn overwritten_steps_take_the_pasted_mode() {
    let (_dir, mut session) = seeded_session(
        &[Mode::new(1, "A", 1, 1), Mode::new(2, "B", 2, 2)],
        &[Step::blank(10, 1)],
    );

    let report = completed(
        session
            .import_steps("10\t2\t1\tD\t1\tT\t1\n", Some(0))
            .expect("import"),
    );

    assert_eq!(report.overwritten, vec![10]);
    assert!(report.repairs.is_empty());
    let step = session.steps().find(10).expect("step");
    assert_eq!(step.mode_id, 2);
    assert_eq!(step.previous_mode_id(), 1);
}

#[test]
fn step_import_is_blocked_without_modes() {
    let (_dir, mut session) = open_session();

    let outcome = session
        .import_steps("0\t1\t5\tX\t3\tT\t9\n", None)
        .expect("import");

    assert_eq!(outcome, ImportOutcome::Blocked(Rejection::NoModesForImport));
    assert_eq!(session.notifier().len(), 1);
    assert!(session.steps().is_empty());
    assert!(session.store().load_all::<Step>().expect("load").is_empty());
}

#[test]
fn export_follows_selection_order_and_strips_quotes() {
    let (_dir, session) = seeded_session(
        &[Mode::new(1, "\"Rinse\"", 10, 2), Mode::new(2, "Prime", 20, 3)],
        &[],
    );

    assert_eq!(
        session.export_modes(&[2, 1]).as_deref(),
        Some("2\tPrime\t20\t3\n1\tRinse\t10\t2\n")
    );
    assert_eq!(session.export_modes(&[]), None);
    assert_eq!(session.export_modes(&[99]), None);
}

#[test]
fn export_then_import_at_the_top_is_a_no_op() {
    let modes = [Mode::new(1, "A", 10, 2), Mode::new(2, "B", 20, 3)];
    let steps = [
        Step::new(3, 1, 5, "Waste", 100, "Dispense", 40),
        Step::new(4, 2, 0, "", 0, "", 0),
    ];
    let (_dir, mut session) = seeded_session(&modes, &steps);

    let exported_modes = session.export_modes(&[1, 2]).expect("export modes");
    let exported_steps = session.export_steps(&[3, 4]).expect("export steps");

    let report = session.import_modes(&exported_modes, Some(0)).expect("import");
    assert_eq!(report.overwritten, vec![1, 2]);
    let report = completed(session.import_steps(&exported_steps, Some(0)).expect("import"));
    assert_eq!(report.overwritten, vec![3, 4]);

    assert_eq!(session.store().load_all::<Mode>().expect("load"), modes.to_vec());
    assert_eq!(session.store().load_all::<Step>().expect("load"), steps.to_vec());
    assert_eq!(session.steps().records(), steps.as_slice());
    assert!(session.notifier().is_empty());
}

#[test]
fn copy_and_paste_go_through_the_clipboard() {
    let (_dir, mut session) = seeded_session(&[Mode::new(1, "A", 10, 2)], &[]);

    assert!(!session.copy_modes(&[]));
    assert_eq!(session.clipboard().get_text(), None);

    assert!(session.copy_modes(&[1]));
    assert_eq!(session.clipboard().get_text().as_deref(), Some("1\tA\t10\t2\n"));

    let report = session.paste_modes(None).expect("paste").expect("clipboard text");
    assert_eq!(report.appended, vec![2]);
    assert_eq!(session.modes().records()[1], Mode::new(2, "A", 10, 2));
}

#[test]
fn paste_with_an_empty_clipboard_does_nothing() {
    let (_dir, mut session) = seeded_session(&[Mode::new(1, "A", 10, 2)], &[]);

    assert_eq!(session.paste_modes(Some(0)).expect("paste"), None);
    assert_eq!(session.paste_steps(Some(0)).expect("paste"), None);
    assert!(session.notifier().is_empty());
    assert_eq!(session.modes().len(), 1);
}

#[test]
fn step_paste_without_modes_is_blocked_even_with_an_empty_clipboard() {
    let (_dir, mut session) = open_session();

    let outcome = session.paste_steps(None).expect("paste");

    assert_eq!(
        outcome,
        Some(ImportOutcome::Blocked(Rejection::NoModesForImport))
    );
    assert_eq!(session.notifier().len(), 1);
}
