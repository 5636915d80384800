//! Wizard flows end to end: reducer, guard, persistence and quote

use quote_engine::persistence::{
    KvStore, ManualClock, MemoryStore, PersistedRecord, PersistenceController,
    PersistenceOptions, RedbStore,
};
use quote_engine::pricing::evaluate;
use quote_engine::{Config, open_session};
use quote_engine::wizard::{WizardAction, WizardSession, is_accessible, reduce};
use shared::models::{
    BoatInfo, CatalogItem, ControlType, ControlsOption, InstallConfig, Promotion, PromotionKind,
    PromotionRule, PurchasePath, RuleMatch, TradeInCondition, TradeInInfo, WizardState,
};
use std::sync::Arc;

const START: i64 = 1_760_000_000_000;
const HOUR: i64 = 60 * 60 * 1_000;

fn motor() -> CatalogItem {
    CatalogItem {
        id: 42,
        model: "115 ELPT CT".to_string(),
        base_price: 10_000.0,
        sale_price: None,
        category: "outboard".to_string(),
        horsepower: 115.0,
        motor_type: "FourStroke".to_string(),
        in_stock: true,
    }
}

fn select_motor() -> WizardAction {
    let promotions = vec![Promotion {
        id: 1,
        name: "Spring Sale".to_string(),
        kind: PromotionKind::Discount { stackable: false },
        discount_percentage: 10.0,
        discount_fixed_amount: 0.0,
        is_active: true,
        start_date: None,
        end_date: None,
        priority: 0,
        highlight: false,
    }];
    let rules = vec![PromotionRule {
        id: 1,
        promotion_id: 1,
        matcher: RuleMatch::All,
        discount_percentage: 0.0,
        discount_fixed_amount: 0.0,
    }];
    let item = motor();
    let pricing = evaluate(&item, &promotions, &rules, START);
    WizardAction::SetMotor { item, pricing }
}

fn boat() -> BoatInfo {
    BoatInfo {
        boat_type: "aluminum fishing".to_string(),
        make: Some("Lund".to_string()),
        model: None,
        length_feet: 18.0,
        transom_inches: Some(20.0),
    }
}

fn install() -> InstallConfig {
    InstallConfig {
        controls: ControlsOption::New,
        include_propeller: true,
        remove_old_motor: true,
        installation_cost: 1_500.0,
    }
}

fn pending_trade_in() -> TradeInInfo {
    TradeInInfo {
        has_trade_in: true,
        brand: Some("Yamaha".to_string()),
        year: Some(2012),
        horsepower: Some(90.0),
        condition: Some(TradeInCondition::Good),
        estimated_value: None,
    }
}

#[test]
fn installed_path_needs_boat_info_for_step_four() {
    let mut state = WizardState::new(START);
    for action in [
        select_motor(),
        WizardAction::SetPurchasePath(Some(PurchasePath::Installed)),
    ] {
        state = reduce(&state, action, START);
    }
    assert!(state.boat_info.is_none());
    assert!(!is_accessible(&state, 4));

    let state = reduce(&state, WizardAction::SetBoatInfo(Some(boat())), START + 1);
    assert!(is_accessible(&state, 4));
}

#[test]
fn record_older_than_a_day_is_discarded() {
    let store = Arc::new(MemoryStore::new());
    let options = PersistenceOptions::default();

    // Recent activity, but written 25 hours ago
    let now = START + 25 * HOUR;
    let record = PersistedRecord {
        state: WizardState::new(START),
        timestamp: START,
        last_activity: now - 1_000,
    };
    store
        .set(&options.storage_key, &serde_json::to_string(&record).unwrap())
        .unwrap();

    let mut controller =
        PersistenceController::new(Arc::clone(&store), ManualClock::new(now), options);
    assert_eq!(controller.load_on_init(), None);
    assert!(store.is_empty());
}

#[test]
fn fresh_record_restores_into_session() {
    let store = Arc::new(MemoryStore::new());
    let clock = ManualClock::new(START);

    let mut session = WizardSession::new(PersistenceController::new(
        Arc::clone(&store),
        clock.clone(),
        PersistenceOptions::default(),
    ));
    session.dispatch(select_motor());
    session.advance();
    drop(session.close());

    clock.advance(10 * 60 * 1_000);
    let restored = WizardSession::restore(PersistenceController::new(
        Arc::clone(&store),
        clock.clone(),
        PersistenceOptions::default(),
    ));
    assert_eq!(restored.state().current_step, 2);
    assert!(restored.state().completed_steps.contains(&1));
    assert_eq!(
        restored.state().motor.as_ref().map(|m| m.specs.control),
        Some(ControlType::Remote)
    );
}

#[test]
fn full_installed_walkthrough_on_redb() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("wizard.redb");
    let clock = ManualClock::new(START);
    let options = PersistenceOptions::default();

    let store = RedbStore::open(&db_path).unwrap();
    let mut session = WizardSession::new(PersistenceController::new(
        store,
        clock.clone(),
        options.clone(),
    ));

    // Motor
    session.dispatch(select_motor());
    assert!(session.advance());

    // Purchase path
    session.dispatch(WizardAction::SetPurchasePath(Some(PurchasePath::Installed)));
    assert!(session.advance());
    assert_eq!(session.state().current_step, 3);

    // Boat info gates the install step
    assert!(!session.navigate(4));
    session.dispatch(WizardAction::SetBoatInfo(Some(boat())));
    assert!(session.advance());

    // Install config
    session.dispatch(WizardAction::SetInstallConfig(Some(install())));
    assert!(session.advance());
    assert_eq!(session.state().current_step, 5);

    // Trade-in changes are written without waiting for the debounce
    session.dispatch(WizardAction::SetTradeInInfo(Some(pending_trade_in())));
    assert!(
        session
            .persistence()
            .store()
            .get(&options.storage_key)
            .unwrap()
            .is_some()
    );

    // Quote and scheduling stay closed until the trade-in has a value
    assert!(!session.advance());
    assert_eq!(session.state().current_step, 5);
    assert!(!session.navigate(7));

    let valued = TradeInInfo {
        estimated_value: Some(2_000.0),
        ..pending_trade_in()
    };
    session.dispatch(WizardAction::SetTradeInInfo(Some(valued)));
    assert!(session.navigate(6));
    assert!(session.advance());
    assert_eq!(session.state().current_step, 7);

    let quote = session.quote().unwrap();
    assert_eq!(quote.motor_price, 9_000.0);
    assert_eq!(quote.promotion_savings, 1_000.0);
    assert_eq!(quote.installation_price, 1_500.0);
    assert_eq!(quote.fuel_tank_price, 0.0);
    assert_eq!(quote.trade_in_credit, 2_000.0);
    assert_eq!(quote.subtotal, 8_500.0);
    assert_eq!(quote.amount_financed, 8_500.0);
    assert!(quote.monthly_payment > 8_500.0 / 60.0);
    assert!(quote.total_of_payments > quote.amount_financed);

    // Reopen the database and pick up where we left off
    drop(session.close());
    clock.advance(5 * 60 * 1_000);
    let store = RedbStore::open(&db_path).unwrap();
    let restored = WizardSession::restore(PersistenceController::new(store, clock, options));
    assert_eq!(restored.state().current_step, 7);
    assert_eq!(
        restored
            .state()
            .trade_in_info
            .as_ref()
            .and_then(|t| t.estimated_value),
        Some(2_000.0)
    );
    assert!(restored.is_accessible(7));
}

#[test]
fn session_opened_from_config_persists_under_work_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        work_dir: dir.path().join("data").to_string_lossy().into_owned(),
        log_level: "info".to_string(),
        catalog_path: None,
        storage_key: "kiosk_wizard".to_string(),
        debounce_ms: 250,
        max_age_ms: 24 * HOUR,
        inactivity_ms: HOUR,
    };

    let mut session = open_session(&config).unwrap();
    assert_eq!(session.state().current_step, 1);
    session.dispatch(WizardAction::SetPurchasePath(Some(PurchasePath::Loose)));
    drop(session.close());
    assert!(config.database_path().exists());

    let reopened = open_session(&config).unwrap();
    assert_eq!(reopened.state().purchase_path, Some(PurchasePath::Loose));
    assert_eq!(
        reopened.persistence().options().storage_key,
        "kiosk_wizard"
    );
}
