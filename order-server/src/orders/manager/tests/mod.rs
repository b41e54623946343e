use super::*;
use crate::db::ORDERS_TABLE;
use crate::db::repository::{CategoryRepository, MenuItemRepository, SpecialDishRepository};
use shared::models::{
    CatalogRef, CategoryCreate, DiningTableCreate, MenuItemCreate, SpecialDishCreate, TableKind,
};
use shared::order::{OrderEventType, PaymentMethod, Priority};

struct Fixture {
    manager: OrdersManager,
    tables: DiningTableRepository,
    table_id: i64,
    ajiaco: CatalogRef,
    limonada: CatalogRef,
    special: CatalogRef,
}

fn create_test_manager() -> OrdersManager {
    let storage = OrderStorage::new(DbService::open_in_memory().unwrap());
    OrdersManager::with_storage(storage)
}

fn fixture_with_policy(release_table_on_close: bool) -> Fixture {
    let db = DbService::open_in_memory().unwrap();
    let category = CategoryRepository::new(db.clone())
        .create(CategoryCreate {
            name: "Platos fuertes".into(),
            description: None,
        })
        .unwrap();
    let menu = MenuItemRepository::new(db.clone());
    let ajiaco = menu
        .create(MenuItemCreate {
            name: "Ajiaco".into(),
            description: None,
            price: Decimal::from(8500),
            category_id: category.id,
            is_available: None,
        })
        .unwrap();
    let limonada = menu
        .create(MenuItemCreate {
            name: "Limonada".into(),
            description: None,
            price: Decimal::from(4000),
            category_id: category.id,
            is_available: None,
        })
        .unwrap();
    let special = SpecialDishRepository::new(db.clone())
        .create(SpecialDishCreate {
            name: "Bandeja del dia".into(),
            description: None,
            price: Decimal::new(125050, 1),
            category_id: category.id,
            is_available: None,
            valid_from: None,
            valid_until: None,
        })
        .unwrap();

    let tables = DiningTableRepository::new(db.clone());
    let table = tables
        .create(DiningTableCreate {
            number: "4".into(),
            name: None,
            capacity: 4,
            location: None,
            kind: TableKind::Table,
            description: None,
        })
        .unwrap();

    Fixture {
        manager: OrdersManager::new(db, release_table_on_close),
        tables,
        table_id: table.id,
        ajiaco: CatalogRef::menu(ajiaco.id),
        limonada: CatalogRef::menu(limonada.id),
        special: CatalogRef::special(special.id),
    }
}

fn fixture() -> Fixture {
    fixture_with_policy(true)
}

fn line(catalog_ref: CatalogRef, quantity: i32) -> OrderItemInput {
    OrderItemInput {
        catalog_ref,
        quantity,
        special_instructions: None,
    }
}

fn drain(rx: &mut broadcast::Receiver<OrderEvent>) -> Vec<OrderEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn count(events: &[OrderEvent], event_type: OrderEventType) -> usize {
    events
        .iter()
        .filter(|e| e.event_type() == event_type)
        .count()
}

fn table_status(f: &Fixture) -> TableStatus {
    f.tables.find_by_id(f.table_id).unwrap().unwrap().status
}

// ========== create_order ==========

#[test]
fn create_order_snapshots_prices_and_occupies_table() {
    let f = fixture();
    let mut rx = f.manager.subscribe();

    let order = f
        .manager
        .create_order(
            f.table_id,
            &[line(f.ajiaco, 2), line(f.limonada, 1)],
            Some("sin cilantro".into()),
        )
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total, Decimal::from(21000));
    assert_eq!(order.table_number, "4");
    assert_eq!(order.items[0].id, 1);
    assert_eq!(order.items[1].id, 2);
    assert_eq!(order.items[0].name, "Ajiaco");
    assert_eq!(
        order.items[0].category_name.as_deref(),
        Some("Platos fuertes")
    );
    assert!(order.items.iter().all(|i| i.status == ItemStatus::Pending));
    assert_eq!(table_status(&f), TableStatus::Occupied);

    let history = f.tables.history(f.table_id).unwrap();
    assert_eq!(history[0].current, TableStatus::Occupied);
    assert_eq!(history[0].changed_by.as_deref(), Some("system"));

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type(), OrderEventType::OrderCreated);
    assert_eq!(events[0].order_id, Some(order.id));
}

#[test]
fn create_order_accepts_empty_item_list() {
    let f = fixture();
    let order = f.manager.create_order(f.table_id, &[], None).unwrap();
    assert!(order.items.is_empty());
    assert_eq!(order.total, Decimal::ZERO);
    assert_eq!(order.status, OrderStatus::Pending);
}

#[test]
fn create_order_with_special_uses_its_namespace() {
    let f = fixture();
    let order = f
        .manager
        .create_order(f.table_id, &[line(f.special, 2)], None)
        .unwrap();
    assert_eq!(order.items[0].name, "Bandeja del dia");
    assert_eq!(order.total, Decimal::new(250100, 1));
}

#[test]
fn create_order_failures_leave_nothing_behind() {
    let f = fixture();

    let err = f
        .manager
        .create_order(f.table_id, &[line(f.ajiaco, 1), line(CatalogRef::menu(999), 1)], None)
        .unwrap_err();
    assert!(matches!(err, ManagerError::CatalogItemNotFound(r) if r == CatalogRef::menu(999)));

    let err = f
        .manager
        .create_order(f.table_id, &[line(f.ajiaco, 0)], None)
        .unwrap_err();
    assert!(matches!(err, ManagerError::InvalidQuantity { quantity: 0, .. }));

    let err = f.manager.create_order(424242, &[], None).unwrap_err();
    assert!(matches!(err, ManagerError::TableNotFound(424242)));

    assert!(f.manager.storage().all_orders().unwrap().is_empty());
    assert_eq!(table_status(&f), TableStatus::Available);
}

#[test]
fn create_order_refused_on_out_of_service_table() {
    let f = fixture();
    f.tables
        .set_status(f.table_id, TableStatus::OutOfService, None, None)
        .unwrap();
    let err = f.manager.create_order(f.table_id, &[], None).unwrap_err();
    assert!(matches!(err, ManagerError::TableUnavailable(_)));
}

// ========== add_items ==========

#[test]
fn add_items_increments_total_and_regresses_ready() {
    let f = fixture();
    let order = f
        .manager
        .create_order(f.table_id, &[line(f.ajiaco, 1)], None)
        .unwrap();
    f.manager
        .update_item_status(order.id, 1, "ready")
        .unwrap();
    assert_eq!(
        f.manager.get_order(order.id).unwrap().status,
        OrderStatus::Ready
    );

    let mut rx = f.manager.subscribe();
    let updated = f
        .manager
        .add_items(order.id, &[line(f.limonada, 2)])
        .unwrap();

    assert_eq!(updated.total, Decimal::from(8500 + 8000));
    assert_eq!(updated.items.len(), 2);
    assert_eq!(updated.items[1].id, 2);
    assert_eq!(updated.status, OrderStatus::Pending);

    let events = drain(&mut rx);
    assert_eq!(count(&events, OrderEventType::ItemsAdded), 1);
    assert_eq!(count(&events, OrderEventType::OrderStatusChanged), 1);
}

#[test]
fn add_items_validates_input() {
    let f = fixture();
    let order = f.manager.create_order(f.table_id, &[], None).unwrap();

    assert!(matches!(
        f.manager.add_items(order.id, &[]),
        Err(ManagerError::EmptyItems)
    ));
    assert!(matches!(
        f.manager.add_items(order.id, &[line(CatalogRef::special(77), 1)]),
        Err(ManagerError::CatalogItemNotFound(_))
    ));
    assert!(matches!(
        f.manager.add_items(123, &[line(f.ajiaco, 1)]),
        Err(ManagerError::OrderNotFound(123))
    ));
    assert_eq!(f.manager.get_order(order.id).unwrap().total, Decimal::ZERO);
}

#[test]
fn total_never_decreases_while_open() {
    let f = fixture();
    let order = f
        .manager
        .create_order(f.table_id, &[line(f.limonada, 1)], None)
        .unwrap();
    let mut last = order.total;
    for quantity in [1, 3, 2] {
        let updated = f
            .manager
            .add_items(order.id, &[line(f.ajiaco, quantity)])
            .unwrap();
        assert!(updated.total >= last);
        last = updated.total;
        f.manager
            .update_item_status(order.id, 1, "preparing")
            .unwrap();
        assert_eq!(f.manager.get_order(order.id).unwrap().total, last);
    }
}

// ========== update_item_status ==========

#[test]
fn kitchen_scenario_completes_exactly_once() {
    let f = fixture();
    let order = f
        .manager
        .create_order(f.table_id, &[line(f.ajiaco, 2), line(f.limonada, 1)], None)
        .unwrap();
    assert_eq!(order.total, Decimal::from(21000));
    let mut rx = f.manager.subscribe();

    let r = f.manager.update_item_status(order.id, 1, "preparing").unwrap();
    assert_eq!(r.order.status, OrderStatus::Preparing);
    assert!(!r.order_completed);

    let r = f.manager.update_item_status(order.id, 1, "ready").unwrap();
    assert_eq!(r.order.status, OrderStatus::Pending);
    assert!(!r.order_completed);

    let r = f.manager.update_item_status(order.id, 2, "ready").unwrap();
    assert_eq!(r.order.status, OrderStatus::Ready);
    assert!(r.order_completed);

    // already ready: no second completion
    let r = f.manager.update_item_status(order.id, 2, "delivered").unwrap();
    assert_eq!(r.order.status, OrderStatus::Ready);
    assert!(!r.order_completed);

    let events = drain(&mut rx);
    assert_eq!(count(&events, OrderEventType::OrderCompleted), 1);
    assert_eq!(count(&events, OrderEventType::ItemStatusChanged), 4);
    assert_eq!(r.order.total, Decimal::from(21000));
}

#[test]
fn update_item_status_errors() {
    let f = fixture();
    let order = f
        .manager
        .create_order(f.table_id, &[line(f.ajiaco, 1)], None)
        .unwrap();

    assert!(matches!(
        f.manager.update_item_status(order.id, 1, "cooking"),
        Err(ManagerError::InvalidStatus(s)) if s == "cooking"
    ));
    assert!(matches!(
        f.manager.update_item_status(order.id, 9, "ready"),
        Err(ManagerError::ItemNotFound { item_id: 9, .. })
    ));
    assert!(matches!(
        f.manager.update_item_status(555, 1, "ready"),
        Err(ManagerError::OrderNotFound(555))
    ));
}

#[test]
fn confirmed_order_is_not_downgraded_by_items() {
    let f = fixture();
    let order = f
        .manager
        .create_order(f.table_id, &[line(f.ajiaco, 1), line(f.limonada, 1)], None)
        .unwrap();
    f.manager.update_order_status(order.id, "confirmed").unwrap();

    let r = f.manager.update_item_status(order.id, 1, "ready").unwrap();
    assert_eq!(r.order.status, OrderStatus::Confirmed);
    let r = f.manager.update_item_status(order.id, 2, "preparing").unwrap();
    assert_eq!(r.order.status, OrderStatus::Preparing);
}

#[test]
fn stored_null_item_status_reads_as_pending() {
    let f = fixture();
    let order = f
        .manager
        .create_order(f.table_id, &[line(f.ajiaco, 1), line(f.limonada, 1)], None)
        .unwrap();

    // Rewrite the snapshot with a missing and an unknown item status
    let mut raw = serde_json::to_value(&order).unwrap();
    raw["items"][0]["status"] = serde_json::Value::Null;
    raw["items"][1]["status"] = serde_json::Value::String("burnt".into());
    let txn = f.manager.storage().begin_write().unwrap();
    {
        let mut orders = txn.open_table(ORDERS_TABLE).unwrap();
        let bytes = serde_json::to_vec(&raw).unwrap();
        orders.insert(order.id, bytes.as_slice()).unwrap();
    }
    txn.commit().unwrap();

    let loaded = f.manager.get_order(order.id).unwrap();
    assert!(loaded.items.iter().all(|i| i.status == ItemStatus::Pending));

    let r = f.manager.update_item_status(order.id, 1, "ready").unwrap();
    assert_eq!(r.order.status, OrderStatus::Pending);
}

// ========== update_order_status ==========

#[test]
fn delivered_forces_items_and_frees_table() {
    let f = fixture();
    let order = f
        .manager
        .create_order(f.table_id, &[line(f.ajiaco, 1), line(f.limonada, 1)], None)
        .unwrap();

    let delivered = f.manager.update_order_status(order.id, "delivered").unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(
        delivered
            .items
            .iter()
            .all(|i| i.status == ItemStatus::Delivered)
    );
    assert_eq!(table_status(&f), TableStatus::Available);
}

#[test]
fn ready_override_forces_items_and_signals_completion() {
    let f = fixture();
    let order = f
        .manager
        .create_order(f.table_id, &[line(f.ajiaco, 1)], None)
        .unwrap();
    let mut rx = f.manager.subscribe();

    let ready = f.manager.update_order_status(order.id, "ready").unwrap();
    assert!(ready.items.iter().all(|i| i.status == ItemStatus::Ready));
    let events = drain(&mut rx);
    assert_eq!(count(&events, OrderEventType::OrderCompleted), 1);

    // same status again is a no-op
    f.manager.update_order_status(order.id, "ready").unwrap();
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn table_stays_occupied_while_other_orders_are_open() {
    let f = fixture();
    let first = f.manager.create_order(f.table_id, &[], None).unwrap();
    let second = f.manager.create_order(f.table_id, &[], None).unwrap();

    f.manager.update_order_status(first.id, "cancelled").unwrap();
    assert_eq!(table_status(&f), TableStatus::Occupied);

    f.manager.update_order_status(second.id, "delivered").unwrap();
    assert_eq!(table_status(&f), TableStatus::Available);
}

#[test]
fn terminal_orders_are_immutable() {
    let f = fixture();
    let order = f
        .manager
        .create_order(f.table_id, &[line(f.ajiaco, 1)], None)
        .unwrap();
    let cancelled = f.manager.update_order_status(order.id, "cancelled").unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    assert!(matches!(
        f.manager.update_item_status(order.id, 1, "ready"),
        Err(ManagerError::InvalidState { status: OrderStatus::Cancelled, .. })
    ));
    assert!(matches!(
        f.manager.add_items(order.id, &[line(f.limonada, 1)]),
        Err(ManagerError::InvalidState { .. })
    ));
    assert!(matches!(
        f.manager.update_order_status(order.id, "pending"),
        Err(ManagerError::InvalidState { .. })
    ));
    assert_eq!(f.manager.get_order(order.id).unwrap(), cancelled);
}

#[test]
fn unknown_order_status_is_rejected_before_lookup() {
    let manager = create_test_manager();
    assert!(matches!(
        manager.update_order_status(1, "finished"),
        Err(ManagerError::InvalidStatus(_))
    ));
    assert!(matches!(
        manager.update_order_status(1, "ready"),
        Err(ManagerError::OrderNotFound(1))
    ));
}

// ========== close_table ==========

#[test]
fn close_table_settles_every_open_order() {
    let f = fixture();
    let first = f
        .manager
        .create_order(f.table_id, &[line(f.ajiaco, 2), line(f.limonada, 1)], None)
        .unwrap();
    let second = f
        .manager
        .create_order(f.table_id, &[line(f.limonada, 1)], None)
        .unwrap();
    f.manager.update_item_status(first.id, 1, "preparing").unwrap();
    let mut rx = f.manager.subscribe();

    let closure = f
        .manager
        .close_table(
            f.table_id,
            &CloseTableRequest {
                payment_method: PaymentMethod::Card,
                tip: Some(Decimal::from(2500)),
                discount: Some(Decimal::from(500)),
            },
        )
        .unwrap();

    assert_eq!(closure.orders_closed, 2);
    assert_eq!(closure.base_total, Decimal::from(25000));
    assert_eq!(closure.final_total, Decimal::from(27000));
    assert_eq!(closure.payment_method, PaymentMethod::Card);
    assert!(closure.table_released);

    for id in [first.id, second.id] {
        let order = f.manager.get_order(id).unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.payment_method, Some(PaymentMethod::Card));
        assert!(order.items.iter().all(|i| i.status == ItemStatus::Delivered));
    }
    assert_eq!(table_status(&f), TableStatus::Available);
    assert!(f.manager.kitchen_queue(now_millis()).unwrap().is_empty());

    let events = drain(&mut rx);
    let closed: Vec<_> = events
        .iter()
        .filter(|e| e.event_type() == OrderEventType::TableClosed)
        .collect();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].order_id, None);

    assert!(matches!(
        f.manager.close_table(f.table_id, &CloseTableRequest::default()),
        Err(ManagerError::NoOpenOrders(_))
    ));
}

#[test]
fn close_table_defaults_to_cash_without_adjustments() {
    let f = fixture();
    f.manager
        .create_order(f.table_id, &[line(f.ajiaco, 1)], None)
        .unwrap();
    let closure = f
        .manager
        .close_table(f.table_id, &CloseTableRequest::default())
        .unwrap();
    assert_eq!(closure.payment_method, PaymentMethod::Cash);
    assert_eq!(closure.final_total, Decimal::from(8500));
    assert_eq!(closure.tip, Decimal::ZERO);
}

#[test]
fn close_table_respects_release_policy() {
    let f = fixture_with_policy(false);
    f.manager
        .create_order(f.table_id, &[line(f.ajiaco, 1)], None)
        .unwrap();
    let closure = f
        .manager
        .close_table(f.table_id, &CloseTableRequest::default())
        .unwrap();
    assert!(!closure.table_released);
    assert_eq!(table_status(&f), TableStatus::Occupied);
}

#[test]
fn close_table_rejects_bad_amounts_atomically() {
    let f = fixture();
    let order = f
        .manager
        .create_order(f.table_id, &[line(f.limonada, 1)], None)
        .unwrap();
    let err = f
        .manager
        .close_table(
            f.table_id,
            &CloseTableRequest {
                discount: Some(Decimal::from(5000)),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ManagerError::InvalidAmount(_)));
    assert_eq!(
        f.manager.get_order(order.id).unwrap().status,
        OrderStatus::Pending
    );
    assert_eq!(table_status(&f), TableStatus::Occupied);

    assert!(matches!(
        f.manager.close_table(9999, &CloseTableRequest::default()),
        Err(ManagerError::TableNotFound(9999))
    ));
}

#[test]
fn close_table_rejects_oversized_tip_without_panicking() {
    let f = fixture();
    let order = f
        .manager
        .create_order(f.table_id, &[line(f.ajiaco, 1)], None)
        .unwrap();
    let err = f
        .manager
        .close_table(
            f.table_id,
            &CloseTableRequest {
                tip: Some(Decimal::MAX),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ManagerError::InvalidAmount(AmountError::TooLarge { field: "tip", .. })
    ));
    assert_eq!(
        f.manager.get_order(order.id).unwrap().status,
        OrderStatus::Pending
    );
    assert_eq!(table_status(&f), TableStatus::Occupied);
}

#[test]
fn oversized_catalog_price_is_rejected_atomically() {
    let f = fixture();
    let db = f.manager.storage().db().clone();
    let category = CategoryRepository::new(db.clone())
        .create(CategoryCreate {
            name: "Importados".into(),
            description: None,
        })
        .unwrap();
    // Written straight through the repository, bypassing the HTTP price check
    let caviar = MenuItemRepository::new(db)
        .create(MenuItemCreate {
            name: "Caviar".into(),
            description: None,
            price: Decimal::from_i128_with_scale(10_i128.pow(28), 0),
            category_id: category.id,
            is_available: None,
        })
        .unwrap();

    let err = f
        .manager
        .create_order(f.table_id, &[line(CatalogRef::menu(caviar.id), 10)], None)
        .unwrap_err();
    assert!(matches!(
        err,
        ManagerError::InvalidAmount(AmountError::TooLarge { field: "price", .. })
    ));
    assert!(f.manager.list_orders(&OrderFilter::default()).unwrap().is_empty());
    assert_eq!(table_status(&f), TableStatus::Available);

    let order = f
        .manager
        .create_order(f.table_id, &[line(f.ajiaco, 1)], None)
        .unwrap();
    let err = f
        .manager
        .add_items(order.id, &[line(CatalogRef::menu(caviar.id), 10)])
        .unwrap_err();
    assert!(matches!(err, ManagerError::InvalidAmount(_)));
    assert_eq!(f.manager.get_order(order.id).unwrap().total, Decimal::from(8500));
}

// ========== queries ==========

#[test]
fn kitchen_queue_is_fifo_with_priority() {
    let f = fixture();
    let first = f.manager.create_order(f.table_id, &[], None).unwrap();
    let second = f.manager.create_order(f.table_id, &[], None).unwrap();
    let third = f.manager.create_order(f.table_id, &[], None).unwrap();
    f.manager.update_order_status(third.id, "cancelled").unwrap();

    let now = second.created_at + 16 * 60_000;
    let queue = f.manager.kitchen_queue(now).unwrap();
    let ids: Vec<i64> = queue.iter().map(|k| k.order.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert_eq!(queue[1].wait_minutes, 16);
    assert_eq!(queue[1].priority, Priority::Medium);

    let later = f.manager.kitchen_queue(first.created_at + 31 * 60_000).unwrap();
    assert_eq!(later[0].priority, Priority::High);
}

#[test]
fn list_orders_filters_and_pages_newest_first() {
    let f = fixture();
    let a = f.manager.create_order(f.table_id, &[], None).unwrap();
    let b = f.manager.create_order(f.table_id, &[], None).unwrap();
    let c = f.manager.create_order(f.table_id, &[], None).unwrap();
    f.manager.update_order_status(b.id, "cancelled").unwrap();

    let all = f.manager.list_orders(&OrderFilter::default()).unwrap();
    let ids: Vec<i64> = all.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![c.id, b.id, a.id]);

    let cancelled = f
        .manager
        .list_orders(&OrderFilter {
            status: Some(OrderStatus::Cancelled),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].id, b.id);

    let page = f
        .manager
        .list_orders(&OrderFilter {
            limit: Some(1),
            offset: Some(1),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, b.id);

    let other_table = f
        .manager
        .list_orders(&OrderFilter {
            table_id: Some(f.table_id + 1),
            ..Default::default()
        })
        .unwrap();
    assert!(other_table.is_empty());

    let open = f.manager.orders_for_table(f.table_id).unwrap();
    let ids: Vec<i64> = open.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![c.id, a.id]);
}
