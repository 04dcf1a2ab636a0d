//! Card lifecycle behaviour across sequences of status reports

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crossbeam_channel::unbounded;
use nexum_uicc_core::{
    AppFamily, AppState, AppType, ApplicationStatus, CardAbsent, CardState, CardStatus, PinState,
    SwapEvent, SwapMonitor, SwapReceiver, UiccCard, UiccConfig, swap_mailbox,
};

fn app(app_type: AppType) -> ApplicationStatus {
    ApplicationStatus::new(app_type, AppState::Ready)
}

fn card_with_mailbox(status: &CardStatus) -> (UiccCard, SwapReceiver) {
    let (tx, rx) = swap_mailbox();
    let card = UiccCard::builder()
        .with_config(UiccConfig::new().with_max_apps(4))
        .with_swap_sender(tx)
        .build(status);
    (card, rx)
}

fn counting_registrant() -> (Arc<AtomicUsize>, impl FnMut(CardAbsent) + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = Arc::clone(&count);
    (count, move |_: CardAbsent| {
        handle.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn occupancy_tracks_every_report() {
    let (mut card, _rx) = card_with_mailbox(&CardStatus::absent());
    let reports = [
        vec![app(AppType::Usim)],
        vec![app(AppType::Usim), app(AppType::Csim), app(AppType::Isim)],
        vec![],
        vec![
            app(AppType::Sim),
            app(AppType::Ruim),
            app(AppType::Usim),
            app(AppType::Csim),
            app(AppType::Isim),
            app(AppType::Usim),
        ],
        vec![app(AppType::Sim), app(AppType::Ruim)],
    ];

    for applications in reports {
        let expected = applications.len().min(4);
        card.update(&CardStatus::present(applications)).unwrap();
        assert_eq!(card.application_count(), expected);
    }
}

#[test]
fn register_while_absent_notifies_immediately() {
    let (mut card, _rx) = card_with_mailbox(&CardStatus::absent());
    let (count, handler) = counting_registrant();

    card.register_for_absent(handler);

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn register_while_present_waits_for_transition() {
    let (mut card, _rx) = card_with_mailbox(&CardStatus::present(vec![app(AppType::Usim)]));
    let (count, handler) = counting_registrant();

    card.register_for_absent(handler);

    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn removal_notifies_each_registrant_once() {
    let (mut card, rx) = card_with_mailbox(&CardStatus::present(vec![app(AppType::Usim)]));
    let (first, handler_first) = counting_registrant();
    let (second, handler_second) = counting_registrant();
    card.register_for_absent(handler_first);
    card.register_for_absent(handler_second);

    card.update(&CardStatus::absent()).unwrap();
    // Staying absent is not another edge
    card.update(&CardStatus::absent()).unwrap();

    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
    assert_eq!(rx.try_recv(), Some(SwapEvent::Removed));
    assert_eq!(rx.try_recv(), None);
}

fn status_in(card_state: CardState) -> CardStatus {
    let mut status = CardStatus::present(vec![app(AppType::Usim)]);
    status.card_state = card_state;
    status
}

#[test]
fn error_to_absent_is_a_removal() {
    let (mut card, rx) = card_with_mailbox(&status_in(CardState::Error));
    let (count, handler) = counting_registrant();
    card.register_for_absent(handler);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    card.update(&CardStatus::absent()).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(rx.try_recv(), Some(SwapEvent::Removed));
}

#[test]
fn restricted_to_absent_is_a_removal() {
    let (mut card, rx) = card_with_mailbox(&status_in(CardState::Restricted));
    let (count, handler) = counting_registrant();
    card.register_for_absent(handler);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    card.update(&CardStatus::absent()).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(rx.try_recv(), Some(SwapEvent::Removed));
    assert_eq!(rx.try_recv(), None);
}

#[test]
fn insertion_posts_added_without_fan_out() {
    let (mut card, rx) = card_with_mailbox(&CardStatus::absent());
    let (count, handler) = counting_registrant();
    card.register_for_absent(handler);
    assert_eq!(count.load(Ordering::SeqCst), 1);

    card.update(&CardStatus::present(vec![app(AppType::Usim)]))
        .unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(rx.try_recv(), Some(SwapEvent::Added));
    assert_eq!(rx.try_recv(), None);
}

#[test]
fn creation_is_not_an_edge() {
    let (_card, rx) = card_with_mailbox(&CardStatus::present(vec![app(AppType::Usim)]));
    assert_eq!(rx.try_recv(), None);

    let (_card, rx) = card_with_mailbox(&CardStatus::absent());
    assert_eq!(rx.try_recv(), None);
}

#[test]
fn unregistered_handler_is_not_notified() {
    let (mut card, _rx) = card_with_mailbox(&CardStatus::present(vec![app(AppType::Usim)]));
    let (count, handler) = counting_registrant();
    let id = card.register_for_absent(handler);
    card.unregister_for_absent(id);

    card.update(&CardStatus::absent()).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn update_after_dispose_changes_nothing() {
    let status = CardStatus::present(vec![app(AppType::Usim), app(AppType::Csim)])
        .with_universal_pin(PinState::EnabledVerified);
    let (mut card, rx) = card_with_mailbox(&status);
    card.dispose();

    assert!(card.update(&CardStatus::absent()).is_err());

    assert_eq!(card.card_state(), CardState::Present);
    assert_eq!(card.universal_pin_state(), PinState::EnabledVerified);
    assert_eq!(card.application_count(), 0);
    assert_eq!(rx.try_recv(), None);
}

#[test]
fn family_lookup_preserves_identity() {
    let (mut card, _rx) = card_with_mailbox(&CardStatus::present(vec![
        ApplicationStatus::new(AppType::Usim, AppState::Pin),
        app(AppType::Csim),
    ]));
    let before = Arc::clone(card.application(AppFamily::ThreeGpp).unwrap());

    card.update(&CardStatus::present(vec![
        ApplicationStatus::new(AppType::Usim, AppState::Ready),
        app(AppType::Csim),
    ]))
    .unwrap();

    let after = card.application(AppFamily::ThreeGpp).unwrap();
    assert!(Arc::ptr_eq(&before, after));
    assert_eq!(before.state(), AppState::Ready);
}

#[test]
fn held_handle_goes_neutral_when_slot_empties() {
    let (mut card, _rx) = card_with_mailbox(&CardStatus::present(vec![
        app(AppType::Usim),
        app(AppType::Isim),
    ]));
    let isim = Arc::clone(card.application(AppFamily::Ims).unwrap());

    card.update(&CardStatus::present(vec![app(AppType::Usim)]))
        .unwrap();

    assert!(isim.is_disposed());
    assert_eq!(isim.app_type(), AppType::Unknown);
    assert!(!card.is_application_present(AppType::Isim));
    assert!(card.is_application_present(AppType::Usim));
}

#[test]
fn present_absent_present_scenario() {
    // Snapshot A
    let (mut card, rx) = card_with_mailbox(&CardStatus::present(vec![app(AppType::Usim)]));
    let usim = card.application(AppFamily::ThreeGpp).unwrap();
    assert_eq!(usim.index(), 0);

    let (count, handler) = counting_registrant();
    card.register_for_absent(handler);

    // Snapshot B
    card.update(&CardStatus::absent()).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(card.application(AppFamily::ThreeGpp).is_none());
    assert_eq!(rx.try_recv(), Some(SwapEvent::Removed));

    // Snapshot C
    card.update(&CardStatus::present(vec![app(AppType::Usim)]))
        .unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(rx.try_recv(), Some(SwapEvent::Added));
    assert!(card.application(AppFamily::ThreeGpp).is_some());
}

#[test]
fn rapid_swaps_coalesce_to_latest_edge() {
    let (mut card, rx) = card_with_mailbox(&CardStatus::present(vec![app(AppType::Usim)]));

    card.update(&CardStatus::absent()).unwrap();
    card.update(&CardStatus::present(vec![app(AppType::Usim)]))
        .unwrap();

    assert_eq!(rx.try_recv(), Some(SwapEvent::Added));
    assert_eq!(rx.try_recv(), None);
}

#[test]
fn swap_monitor_prompts_on_removal() {
    let (tx, rx) = swap_mailbox();
    let (prompt_tx, prompt_rx) = unbounded();
    let mut monitor = SwapMonitor::spawn(
        rx,
        move |event: SwapEvent| {
            let _ = prompt_tx.send(event.is_added());
        },
        Duration::from_millis(5),
    );

    let mut card = UiccCard::builder()
        .with_swap_sender(tx)
        .build(&CardStatus::present(vec![app(AppType::Usim)]));
    card.update(&CardStatus::absent()).unwrap();

    assert_eq!(prompt_rx.recv_timeout(Duration::from_secs(2)), Ok(false));

    card.dispose();
    monitor.stop();
}

#[test]
fn channel_registrant_receives_slot() {
    let (tx, rx) = unbounded();
    let mut card = UiccCard::builder()
        .with_config(UiccConfig::new().with_slot_id(1))
        .build(&CardStatus::present(vec![app(AppType::Sim)]));
    card.register_for_absent(tx);

    card.update(&CardStatus::absent()).unwrap();

    assert_eq!(rx.try_recv(), Ok(CardAbsent { slot: 1 }));
}
