use super::*;

#[test]
fn event_names() {
    assert_eq!(SessionEvent::LoginSuccess.name(), "login-success");
    assert_eq!(SessionEvent::LogoutSuccess.name(), "logout-success");
    assert_eq!(SessionEvent::Unauthorized { reason: String::new() }.name(), "unauthorized");
    assert_eq!(SessionEvent::Error { message: String::new() }.name(), "error");
}

#[test]
fn publish_without_subscribers_is_silent() {
    let bus = EventBus::new();
    bus.publish(SessionEvent::LoginSuccess);
}

#[test]
fn every_subscriber_receives_event() {
    let bus = EventBus::new();
    let mut a = bus.subscribe();
    let mut b = bus.subscribe();

    bus.publish(SessionEvent::Unauthorized { reason: "expired".into() });

    let expected = SessionEvent::Unauthorized { reason: "expired".into() };
    assert_eq!(a.try_recv().unwrap(), expected);
    assert_eq!(b.try_recv().unwrap(), expected);
}

#[test]
fn late_subscriber_misses_earlier_events() {
    let bus = EventBus::new();
    bus.publish(SessionEvent::LoginSuccess);

    let mut late = bus.subscribe();
    assert!(late.try_recv().is_err());
}

#[test]
fn clones_share_channel() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    bus.clone().publish(SessionEvent::LogoutSuccess);
    assert_eq!(rx.try_recv().unwrap(), SessionEvent::LogoutSuccess);
}

#[test]
fn lagging_subscriber_reports_lag() {
    let bus = EventBus::with_capacity(1);
    let mut rx = bus.subscribe();
    bus.publish(SessionEvent::LoginSuccess);
    bus.publish(SessionEvent::LogoutSuccess);

    assert!(matches!(rx.try_recv(), Err(broadcast::error::TryRecvError::Lagged(1))));
    assert_eq!(rx.try_recv().unwrap(), SessionEvent::LogoutSuccess);
}
