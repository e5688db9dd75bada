//! End-to-end flows through the store, the persistence port and the views.

use std::{cell::RefCell, rc::Rc};

use mealbridge::{
    core::constants::DONATIONS_KEY,
    prelude::*,
    store::session::AuthError,
};

fn ngo_login() -> Command {
    Command::Authenticate {
        method: AuthMethod::Phone {
            phone: "9876543210".into(),
            password: "password".into(),
        },
        role: UserRole::Ngo,
        mode: AuthMode::Login,
    }
}

fn pulao() -> NewDonation {
    NewDonation::new(
        "Vegetable Pulao",
        FoodCategory::CookedMeals,
        "25 servings",
        "12 Church Street",
        GeoPoint::new(12.9752, 77.6045),
    )
}

#[test]
fn claim_from_map_reaches_the_store() {
    let mut store = AppStore::open(MemoryPersistence::new(), StoreOptions::default()).unwrap();
    store.dispatch(Command::SetLocation(None)).unwrap();
    store.dispatch(ngo_login()).unwrap();

    let config = MarketplaceConfig::default();
    let mut dashboard = DonationListView::new(&config, store.state());
    dashboard.set_mode(ViewMode::Map);

    let requested = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&requested);
    dashboard
        .map_mut()
        .on(MapEventKind::ClaimRequested, move |event| {
            if let MapEvent::ClaimRequested { donation_id } = event {
                sink.borrow_mut().push(donation_id.clone());
            }
        });

    let visible = dashboard.visible(store.state());
    let clusters = dashboard.map().clusters(visible.iter().copied());
    let target = clusters.iter().find(|c| c.id == "2").unwrap();
    dashboard.map_mut().click(target);

    let profile = store.state().profile.clone();
    let draft = dashboard.claim_from_map(store.state(), profile.as_ref()).unwrap();
    assert_eq!(draft.name, "Mobile User");
    assert_eq!(draft.contact, "9876543210");

    let command = dashboard.confirm_claim().unwrap();
    store.dispatch(command).unwrap();
    dashboard.map_mut().process_events();
    assert_eq!(*requested.borrow(), vec!["2".to_string()]);

    let claimed = store.state().donation("2").unwrap();
    assert_eq!(claimed.status, DonationStatus::Reserved);
    assert_eq!(dashboard.tab(), DashboardTab::Claims);

    let (active, past) = dashboard.my_claims(store.state());
    assert_eq!(active.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(), vec!["2"]);
    assert!(past.is_empty());

    // Reserved listings leave the browse list
    assert!(dashboard.visible(store.state()).iter().all(|d| d.id != "2"));
}

#[test]
fn second_claim_is_rejected() {
    let mut store = AppStore::open(MemoryPersistence::new(), StoreOptions::default()).unwrap();
    let claim = |name: &str| Command::ClaimDonation {
        id: "1".into(),
        claimer: ClaimerInfo::new(name, "100"),
    };

    store.dispatch(claim("First NGO")).unwrap();
    let err = store.dispatch(claim("Second NGO")).unwrap_err();
    assert!(matches!(err, MarketError::NotAvailable(ref id) if id == "1"));
    assert_eq!(
        store.state().donation("1").unwrap().claimed_by.as_ref().unwrap().name,
        "First NGO"
    );
}

#[test]
fn handles_share_donations() {
    let storage = MemoryPersistence::new();
    let mut tab_a = AppStore::open(storage.connect(), StoreOptions::default()).unwrap();
    let mut tab_b = AppStore::open(storage.connect(), StoreOptions::default()).unwrap();
    // Drain the seed writes made while opening
    tab_a.sync_external().unwrap();
    tab_b.sync_external().unwrap();

    tab_a.dispatch(Command::AddDonation(pulao())).unwrap();
    assert_eq!(tab_b.state().donations.len(), 3);

    assert_eq!(tab_b.sync_external().unwrap(), 1);
    assert_eq!(tab_b.state().donations.len(), 4);
    assert_eq!(tab_b.state().donations[0].food_title, "Vegetable Pulao");

    // Nothing new for the writer itself
    assert_eq!(tab_a.sync_external().unwrap(), 0);
}

#[test]
fn session_keys_do_not_sync() {
    let storage = MemoryPersistence::new();
    let mut tab_a = AppStore::open(storage.connect(), StoreOptions::default()).unwrap();
    let mut tab_b = AppStore::open(storage.connect(), StoreOptions::default()).unwrap();
    tab_b.sync_external().unwrap();

    tab_a.dispatch(ngo_login()).unwrap();
    assert_eq!(tab_b.sync_external().unwrap(), 0);
    assert!(tab_b.state().profile.is_none());
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let id = {
        let mut store =
            AppStore::open(FilePersistence::open(dir.path()).unwrap(), StoreOptions::default())
                .unwrap();
        store
            .dispatch(Command::Authenticate {
                method: AuthMethod::Email {
                    email: "kitchen@example.com".into(),
                    password: "secret".into(),
                    phone: Some("8888888888".into()),
                },
                role: UserRole::Donor,
                mode: AuthMode::Register,
            })
            .unwrap();
        store.dispatch(Command::AddDonation(pulao())).unwrap();
        store.state().donations[0].id.clone()
    };

    let mut store =
        AppStore::open(FilePersistence::open(dir.path()).unwrap(), StoreOptions::default())
            .unwrap();
    let state = store.state();
    assert_eq!(state.role, Some(UserRole::Donor));
    assert_eq!(state.profile.as_ref().unwrap().contact, "8888888888");
    assert_eq!(state.donations.len(), 4);
    assert_eq!(state.donations[0].id, id);
    assert_eq!(state.donations[0].donor_name, "kitchen");

    // Registered accounts are persisted too
    store.dispatch(Command::Logout).unwrap();
    let again = store.dispatch(Command::Authenticate {
        method: AuthMethod::Email {
            email: "kitchen@example.com".into(),
            password: "secret".into(),
            phone: None,
        },
        role: UserRole::Donor,
        mode: AuthMode::Register,
    });
    assert!(matches!(again, Err(MarketError::Auth(AuthError::EmailTaken))));
}

#[test]
fn snapshot_uses_browser_field_names() {
    let storage = MemoryPersistence::new();
    let mut store = AppStore::open(storage.connect(), StoreOptions::default()).unwrap();
    store.dispatch(Command::SetLocation(None)).unwrap();

    let raw = storage.load(DONATIONS_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json[0].get("distance").is_some());
    assert_eq!(json[2]["claimedBy"]["name"], "Hope Foundation");
    assert_eq!(json[2]["status"], "reserved");
}

#[test]
fn config_file_drives_the_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mealbridge.json");
    std::fs::write(
        &path,
        r#"{ "map": { "clustering_enabled": false, "max_zoom": 4 }, "store": { "near_radius_km": 1.0 } }"#,
    )
    .unwrap();

    let config = MarketplaceConfig::from_file(&path).unwrap();
    assert_eq!(config.map.max_zoom, 4);

    let mut store = AppStore::open(MemoryPersistence::new(), config.store.clone()).unwrap();
    store.dispatch(Command::SetLocation(None)).unwrap();

    let mut dashboard = DonationListView::new(&config, store.state());
    dashboard.set_mode(ViewMode::Map);
    match dashboard.render(store.state()) {
        FindOutput::Map(pins) => assert_eq!(pins.len(), 2),
        FindOutput::List(_) => panic!("expected map output"),
    }

    for _ in 0..6 {
        dashboard.map_mut().zoom_in();
    }
    assert_eq!(dashboard.map().viewport().zoom(), 4);

    // Listing 2 is ~0.9 km from the fallback center
    dashboard.set_filter(DonationFilter::Nearby);
    let near: Vec<_> = dashboard
        .visible(store.state())
        .iter()
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(near, vec!["1", "2"]);
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = MarketplaceConfig::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, MarketError::Io(_)));
}
