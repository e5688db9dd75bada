use std::{cell::RefCell, env, rc::Rc};

use anyhow::Context;
use mealbridge::{
    input::events::MapEventKind,
    store::{AuthMethod, AuthMode, FilePersistence, MemoryPersistence, UserRole},
    ui::{FindOutput, ViewMode},
    AppStore, Command, DonationListView, FoodCategory, GeoPoint, MapEvent, MarketplaceConfig,
    NewDonation, PersistencePort,
};

/// Usage: `mealbridge-app [data-dir] [config.json]`
///
/// Without a data directory the walkthrough runs on in-memory storage.
fn main() -> anyhow::Result<()> {
    mealbridge::init_logging();

    let mut args = env::args().skip(1);
    let data_dir = args.next();
    let config = match args.next() {
        Some(path) => MarketplaceConfig::from_file(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => MarketplaceConfig::default(),
    };

    match data_dir {
        Some(dir) => {
            let storage = FilePersistence::open(&dir)
                .with_context(|| format!("opening data directory {dir}"))?;
            run(storage, &config)
        }
        None => run(MemoryPersistence::new(), &config),
    }
}

fn run<P: PersistencePort>(storage: P, config: &MarketplaceConfig) -> anyhow::Result<()> {
    let mut store = AppStore::open(storage, config.store.clone())?;
    store.dispatch(Command::SetLocation(None))?;

    // Donor posts a listing
    store.dispatch(Command::Authenticate {
        method: AuthMethod::Email {
            email: "user@example.com".into(),
            password: "password".into(),
            phone: None,
        },
        role: UserRole::Donor,
        mode: AuthMode::Login,
    })?;
    store.dispatch(Command::AddDonation(
        NewDonation::new(
            "Vegetable Pulao",
            FoodCategory::CookedMeals,
            "25 servings",
            "12 Church Street, Bangalore",
            GeoPoint::new(12.9752, 77.6045),
        )
        .with_best_before_hours(3),
    ))?;
    store.dispatch(Command::Logout)?;

    // NGO browses the map and claims a pin
    store.dispatch(Command::Authenticate {
        method: AuthMethod::Google,
        role: UserRole::Ngo,
        mode: AuthMode::Login,
    })?;

    let mut dashboard = DonationListView::new(config, store.state());
    dashboard.set_mode(ViewMode::Map);

    let requested = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&requested);
    dashboard.map_mut().on(MapEventKind::ClaimRequested, move |event| {
        if let MapEvent::ClaimRequested { donation_id } = event {
            sink.borrow_mut().push(donation_id.clone());
        }
    });

    if let FindOutput::Map(pins) = dashboard.render(store.state()) {
        println!("{}", dashboard.map().zoom_label());
        for pin in &pins {
            println!(
                "pin {:<38} top {:>6.1}% left {:>6.1}% {}",
                pin.cluster_id,
                pin.position.top,
                pin.position.left,
                pin.label().unwrap_or_default()
            );
        }
    }

    let visible = dashboard.visible(store.state());
    let clusters = dashboard.map().clusters(visible.iter().copied());
    let Some(single) = clusters.iter().find(|c| c.is_single()) else {
        println!("nothing to claim");
        return Ok(());
    };
    dashboard.map_mut().click(single);

    let profile = store.state().profile.clone();
    if dashboard.claim_from_map(store.state(), profile.as_ref()).is_some() {
        dashboard.set_claim_contact("+91 90000 00000");
        let command = dashboard.confirm_claim()?;
        store.dispatch(command)?;
    }
    dashboard.map_mut().process_events();
    log::debug!("claim events: {:?}", requested.borrow());

    let (active, past) = dashboard.my_claims(store.state());
    println!("active claims: {}, past claims: {}", active.len(), past.len());
    for donation in active {
        println!(
            "  {} from {} at {}",
            donation.food_title, donation.donor_name, donation.pickup_address
        );
    }

    Ok(())
}
