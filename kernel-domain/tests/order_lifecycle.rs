use anyhow::Result as AnyResult;
use async_trait::async_trait;
use kernel_domain::aggregate::{AggregateItemStatus, AggregateItems};
use kernel_domain::domain_event::{BusinessContext, DomainEvent, EventType};
use kernel_domain::domain_service::DomainService;
use kernel_domain::entity::{
    Capabilities, Entity, EntityMode, EntityModel, Rule, RuleContext, RuleScope, RuleSet,
    ValidEntity, ValidEntityOf,
};
use kernel_domain::error::DomainError;
use kernel_domain::notification::{NotificationContext, NotificationKind, NotificationMessage};
use kernel_domain::value_object::{AggregateItemValue, AggregateValueObject, Id, ValueObject};
use kernel_domain::{enum_value_object, value_object};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[enum_value_object(unknown = NotificationKind::new("InvalidChannelNotification"))]
pub enum Channel {
    Unknown = 0,
    Store = 1,
    Web = 2,
}

#[value_object(scalar)]
pub struct Sku(String);

#[value_object]
pub struct OrderLine {
    sku: String,
    quantity: u32,
    active: bool,
}

impl OrderLine {
    fn new(sku: &str, quantity: u32) -> Self {
        Self {
            sku: sku.into(),
            quantity,
            active: true,
        }
    }
}

impl ValueObject for OrderLine {}

impl AggregateItemValue for OrderLine {
    fn is_active(&self) -> bool {
        self.active
    }
}

trait StockService: DomainService {
    fn in_stock(&self, sku: &str) -> bool;
}

type Stock = dyn StockService;

struct Warehouse {
    skus: HashSet<String>,
}

impl DomainService for Warehouse {}

impl StockService for Warehouse {
    fn in_stock(&self, sku: &str) -> bool {
        self.skus.contains(sku)
    }
}

#[async_trait]
impl AggregateValueObject<Stock> for OrderLine {
    async fn validate(
        &self,
        service: Option<&Stock>,
        mode: EntityMode,
        field_name: Option<&str>,
        ctx: &mut NotificationContext,
    ) -> bool {
        if mode == EntityMode::Delete {
            return true;
        }
        let available = service.is_some_and(|s| s.in_stock(&self.sku));
        if !available {
            ctx.add_notification(NotificationMessage::for_field(
                NotificationKind::new("OutOfStockNotification"),
                field_name.unwrap_or("lines"),
                Some(self.sku.clone()),
            ));
        }
        available
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Order {
    customer: String,
    channel: Channel,
}

#[derive(Debug, Serialize)]
struct NewOrder {
    customer: String,
    channel: Channel,
}

struct ChannelRule;

#[async_trait]
impl Rule<Order> for ChannelRule {
    async fn apply(&self, ctx: &mut RuleContext<'_, Order>) {
        let channel = ctx.model().channel;
        ctx.validate("channel", channel);
    }
}

impl EntityModel for Order {
    const NAME: &'static str = "Order";
    type Service = Stock;
    type Insertable = NewOrder;
    type Updatable = Order;

    fn capabilities() -> Capabilities {
        Capabilities::builder()
            .insertable(true)
            .updatable(true)
            .deletable(true)
            .service_required(true)
            .build()
    }

    fn rules() -> RuleSet<Self> {
        RuleSet::<Self>::new()
            .rule(RuleScope::InsertOrUpdate, "channel", ChannelRule)
            .on_insert_or_update("lines", |ctx| {
                ctx.validate_aggregate_items::<OrderLine>("lines");
            })
            .on_insert("placed", |ctx| {
                let customer = ctx.model().customer.clone();
                ctx.register_event(DomainEvent::log(Order::NAME, format!("placed by {customer}")));
            })
            .on_delete("cancelled", |ctx| {
                ctx.register_event(DomainEvent::audit(Order::NAME, "cancelled"));
            })
    }

    fn insertable(&self) -> NewOrder {
        NewOrder {
            customer: self.customer.clone(),
            channel: self.channel,
        }
    }

    fn updatable(&self) -> Order {
        self.clone()
    }
}

fn warehouse(skus: &[&str]) -> Warehouse {
    Warehouse {
        skus: skus.iter().map(|s| s.to_string()).collect(),
    }
}

fn order(channel: Channel) -> Order {
    Order {
        customer: "ana".into(),
        channel,
    }
}

fn kinds(err: &DomainError) -> Vec<String> {
    err.notification_contexts()
        .unwrap_or_default()
        .iter()
        .flat_map(|c| c.notifications())
        .map(|n| n.notification().key().to_string())
        .collect()
}

#[tokio::test]
async fn place_order_yields_insertable_with_one_log_event() -> AnyResult<()> {
    let stock = warehouse(&["A-1"]);
    let mut entity = Entity::new(order(Channel::Web));
    assert!(entity.add_aggregate_item(OrderLine::new("A-1", 2)));

    let snapshot = entity.get_insertable(Some(&stock)).await?;
    assert!(snapshot.id().is_none());
    assert_eq!(snapshot.fields().channel, Channel::Web);
    assert_eq!(snapshot.events().len(), 1);
    assert_eq!(snapshot.events()[0].event_type(), EventType::Log);
    assert_eq!(snapshot.events()[0].message(), "placed by ana");

    let lines = entity.aggregate_items::<OrderLine>();
    assert_eq!(lines.added_items().len(), 1);
    Ok(())
}

// 测试一次失败汇报全部问题
#[tokio::test]
async fn invalid_order_reports_every_violation() {
    let stock = warehouse(&[]);
    let mut entity = Entity::reconstruct(Id::generate(), order(Channel::Unknown));
    entity.add_aggregate_item(OrderLine::new("Z-9", 1));

    let err = entity
        .get_insertable(Some(&stock))
        .await
        .unwrap_err();
    assert_eq!(
        kinds(&err),
        vec![
            "UnableToInsertWithIDNotification",
            "InvalidChannelNotification",
            "OutOfStockNotification",
        ]
    );
}

#[tokio::test]
async fn insert_not_allowed_wins_over_passing_rules() {
    let stock = warehouse(&["A-1"]);
    let mut entity =
        Entity::new(order(Channel::Store)).with_capabilities(Capabilities::writable());
    assert!(entity.get_insertable(Some(&stock)).await.is_ok());

    let mut locked = Entity::new(order(Channel::Store)).with_capabilities(
        Capabilities::builder()
            .updatable(true)
            .service_required(true)
            .build(),
    );
    let err = locked
        .get_insertable(Some(&stock))
        .await
        .unwrap_err();
    assert!(kinds(&err).contains(&"InsertNotAllowedNotification".to_string()));
}

#[tokio::test]
async fn update_with_malformed_id_points_at_id_field() {
    let stock = warehouse(&[]);
    let mut entity = Entity::reconstruct("not-a-uuid", order(Channel::Web));

    let err = entity
        .get_updatable(Some(&stock))
        .await
        .unwrap_err();
    let contexts = err.notification_contexts().unwrap();
    let invalid = contexts
        .iter()
        .flat_map(|c| c.notifications())
        .find(|n| n.notification() == &NotificationKind::INVALID_ID_UUID)
        .unwrap();
    assert_eq!(invalid.field_name(), Some("id"));
    assert_eq!(invalid.field_value(), Some("not-a-uuid"));
}

#[tokio::test]
async fn missing_service_is_reported_alone() {
    let mut entity = Entity::new(order(Channel::Unknown));
    let err = entity.get_insertable(None).await.unwrap_err();
    assert_eq!(kinds(&err), vec!["ServiceIsRequiredNotification"]);
}

#[tokio::test]
async fn soft_removed_line_is_kept_in_ledger() {
    let mut entity = Entity::reconstruct(Id::generate(), order(Channel::Web));
    entity.construct_aggregate_items([OrderLine::new("A-1", 1), OrderLine::new("B-2", 5)]);

    assert!(entity.remove_aggregate_item(OrderLine::new("A-1", 1)));
    assert!(entity.change_aggregate_item(OrderLine::new("B-2", 5), |line| OrderLine {
        quantity: 6,
        ..line.clone()
    }));
    assert!(entity.add_aggregate_item(OrderLine::new("C-3", 1)));

    let lines = entity.aggregate_items::<OrderLine>();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines.current_items().len(), 2);
    assert_eq!(lines.removed_items()[0].sku, "A-1");
    assert_eq!(lines.changed_items()[0].quantity, 6);
    assert_eq!(lines[0].original_status(), AggregateItemStatus::Constructor);
    assert_eq!(lines[0].current_status(), AggregateItemStatus::Removed);

    let stock = warehouse(&["B-2", "C-3"]);
    let snapshot = entity.get_updatable(Some(&stock)).await.unwrap();
    assert!(snapshot.events().is_empty());
}

#[tokio::test]
async fn duplicate_and_inactive_lines_are_rejected() {
    let mut entity = Entity::new(order(Channel::Web));
    assert!(entity.add_aggregate_item(OrderLine::new("A-1", 1)));
    assert!(!entity.add_aggregate_item(OrderLine::new("A-1", 1)));
    assert!(!entity.add_aggregate_item(OrderLine {
        active: false,
        ..OrderLine::new("B-2", 1)
    }));
    assert!(!entity.remove_aggregate_item::<OrderLine>(None));
    assert_eq!(entity.aggregate_items::<OrderLine>().len(), 1);

    let pending = entity.pending_notifications();
    assert!(pending.contains(&NotificationKind::ENTITY_ALREADY_ADDED));
    assert!(pending.contains(&NotificationKind::ENTITY_IS_NOT_ACTIVE));
    assert!(pending.contains(&NotificationKind::ENTITY_DOES_NOT_EXIST));
}

#[tokio::test]
async fn delete_snapshot_converts_into_valid_entity() -> AnyResult<()> {
    let stock = warehouse(&[]);
    let id = Id::generate();
    let mut entity = Entity::reconstruct(id.clone(), order(Channel::Store));

    let deletable = entity.get_deletable(Some(&stock)).await?;
    assert_eq!(deletable.deleted_fields()["channel"], "STORE");

    let valid: ValidEntityOf<Order> = deletable.into();
    assert_eq!(valid.action(), "Delete");
    assert_eq!(valid.id(), Some(&id));
    assert_eq!(valid.events()[0].event_type(), EventType::Audit);
    assert!(matches!(valid, ValidEntity::Deletable(_)));
    Ok(())
}

#[tokio::test]
async fn is_valid_twice_reports_the_same_kinds() {
    let stock = warehouse(&[]);
    let mut entity = Entity::new(order(Channel::Unknown));
    entity.add_field_name_to_change("channel", "Canal");

    let mut first = NotificationContext::new("preflight");
    let mut second = NotificationContext::new("preflight");
    assert!(
        entity
            .is_valid(EntityMode::Insert, Some(&stock), &mut first)
            .await
    );
    assert!(
        entity
            .is_valid(EntityMode::Insert, Some(&stock), &mut second)
            .await
    );

    assert_eq!(first.len(), second.len());
    assert_eq!(first.notifications()[0].field_name(), Some("Canal"));
    assert_eq!(entity.mode(), EntityMode::Display);
}

#[test]
fn sku_scalar_and_business_context() {
    let sku = Sku::new("A-1");
    assert_eq!(sku.to_string(), "A-1");

    let biz = BusinessContext::builder()
        .correlation_id("c-1")
        .actor_type("user")
        .actor_id("42")
        .build();
    assert_eq!(biz.correlation_id(), Some("c-1"));
    assert_eq!(biz.actor().as_deref(), Some("user:42"));
}
