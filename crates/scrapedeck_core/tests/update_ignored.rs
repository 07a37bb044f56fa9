use scrapedeck_core::{update, AppState, JobId, Msg};

#[test]
fn completions_for_unrequested_work_leave_state_untouched() {
    let state = AppState::new();
    let (next, effects) = update(
        state.clone(),
        Msg::ResultsFailed {
            job_id: JobId::new("j1"),
            message: "boom".into(),
        },
    );
    assert_eq!(state, next);
    assert!(effects.is_empty());

    let (next, effects) = update(
        next,
        Msg::DownloadFailed {
            job_id: JobId::new("j1"),
            message: "boom".into(),
        },
    );
    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn unsolicited_engine_messages_are_ignored_when_idle() {
    let state = AppState::new();
    let (next, effects) = update(
        state.clone(),
        Msg::StartCompleted {
            job_id: Some("j9".into()),
        },
    );
    assert_eq!(state, next);
    assert!(effects.is_empty());

    let (next, effects) = update(next, Msg::CancelClicked);
    assert_eq!(state, next);
    assert!(effects.is_empty());
}
