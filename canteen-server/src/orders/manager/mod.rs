//! OrdersManager - 订单生命周期核心
//!
//! 负责:
//! - 结账: 购物车快照 + 预订时段 + 当日取餐号 -> 订单
//! - 状态推进: ordered -> preparing -> ready -> served / cancelled
//! - 每次创建与状态变更都给下单用户写通知，并广播 [`OrderEvent`]
//! - 查询: 按 id、按用户 (active / completed)、后台列表与计数
//!
//! # 结账顺序
//!
//! ```text
//! cart 非空? -> book(slot) -> next_token(today) -> persist
//!                   │                │               │
//!                   └─ 失败直接返回   └─ 失败释放时段  └─ 失败释放时段
//! persist 成功 -> 清空购物车 -> 通知 -> 广播
//! ```
//!
//! 取餐号计数器只增不减，持久化失败时序号会出现空档。

use chrono::NaiveDateTime;
use shared::client::OrderListQuery;
use shared::models::NotificationKind;
use shared::order::{Order, OrderCounts, OrderEvent, OrderEventType, OrderStatus, OrderView, UserOrders};
use shared::util::{new_id, now_millis};
use tokio::sync::broadcast;

use super::error::{OrderError, OrderResult};
use crate::cart::Cart;
use crate::money;
use crate::notifications::NotificationService;
use crate::slots::TimeSlotAllocator;
use crate::storage::RecordStore;
use crate::tokens::DailyTokenGenerator;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

const KEY_PREFIX: &str = "order:";

fn order_key(id: &str) -> String {
    format!("{KEY_PREFIX}{id}")
}

/// Notification body for a status change
fn status_message(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Ordered => "Your order has been placed",
        OrderStatus::Preparing => "Your order is being prepared",
        OrderStatus::Ready => "Your order is ready for pickup",
        OrderStatus::Served => "Your order has been served",
        OrderStatus::Cancelled => "Your order has been cancelled",
    }
}

pub struct OrdersManager {
    store: RecordStore,
    tokens: DailyTokenGenerator,
    slots: TimeSlotAllocator,
    notifications: NotificationService,
    event_tx: broadcast::Sender<OrderEvent>,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("store", &self.store)
            .field("slots", &self.slots)
            .field("event_tx", &"<broadcast::Sender>")
            .finish()
    }
}

impl OrdersManager {
    pub fn new(
        store: RecordStore,
        slots: TimeSlotAllocator,
        notifications: NotificationService,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            tokens: DailyTokenGenerator::new(store.clone()),
            store,
            slots,
            notifications,
            event_tx,
        }
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    pub fn slots(&self) -> &TimeSlotAllocator {
        &self.slots
    }

    pub fn tokens(&self) -> &DailyTokenGenerator {
        &self.tokens
    }

    // ========== Checkout ==========

    /// Turn the cart into an order
    ///
    /// `now` is the business-timezone wall clock; it decides which slots are
    /// still offered and which day's token sequence is used. On success the
    /// cart is cleared. On failure the cart and the slot ledger are untouched.
    pub fn create_order(
        &self,
        user_id: &str,
        cart: &mut Cart,
        scheduled_time: &str,
        special_instructions: Option<String>,
        now: NaiveDateTime,
    ) -> OrderResult<Order> {
        if cart.is_empty() {
            return Err(OrderError::CartEmpty);
        }

        self.slots.book(now, scheduled_time)?;

        let order = match self.persist_new_order(user_id, cart, scheduled_time, special_instructions, now) {
            Ok(order) => order,
            Err(e) => {
                self.slots.release(now.date(), scheduled_time);
                tracing::error!(user_id, scheduled_time, error = %e, "Checkout failed, slot released");
                return Err(e);
            }
        };

        cart.clear();

        tracing::info!(
            order_id = %order.id,
            token = %order.token,
            user_id,
            scheduled_time,
            total_amount = order.total_amount,
            "Order placed"
        );

        self.notify(
            &order.user_id,
            "Order Placed Successfully",
            format!(
                "Your order #{} has been placed and will be ready by {}",
                order.token, order.scheduled_time
            ),
            NotificationKind::Success,
        );
        self.broadcast(&order, OrderEventType::OrderPlaced, None);

        Ok(order)
    }

    fn persist_new_order(
        &self,
        user_id: &str,
        cart: &Cart,
        scheduled_time: &str,
        special_instructions: Option<String>,
        now: NaiveDateTime,
    ) -> OrderResult<Order> {
        let token = self.tokens.next_token(now.date())?;
        let timestamp = now_millis();
        let order = Order {
            id: new_id(),
            user_id: user_id.to_string(),
            items: cart.items().to_vec(),
            total_amount: cart.total(),
            status: OrderStatus::Ordered,
            scheduled_time: scheduled_time.to_string(),
            token,
            special_instructions: special_instructions
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            estimated_preparation_time: cart.max_preparation_time(),
            created_at: timestamp,
            updated_at: timestamp,
        };
        self.store.put(&order_key(&order.id), &order)?;
        Ok(order)
    }

    // ========== Status ==========

    /// Move an order to `new_status`
    ///
    /// Allowed: the next step of `ordered -> preparing -> ready -> served`, or
    /// `cancelled` from any non-terminal status. Anything else is rejected and
    /// nothing is written.
    pub fn advance_status(&self, order_id: &str, new_status: OrderStatus) -> OrderResult<Order> {
        let mut previous = OrderStatus::Ordered;
        let order = self
            .store
            .update::<Order, OrderError, _>(&order_key(order_id), |order| {
                match order.status {
                    OrderStatus::Served => {
                        return Err(OrderError::OrderAlreadyServed(order.id.clone()));
                    }
                    OrderStatus::Cancelled => {
                        return Err(OrderError::OrderAlreadyCancelled(order.id.clone()));
                    }
                    current if !current.can_transition_to(new_status) => {
                        return Err(OrderError::InvalidTransition {
                            from: current,
                            to: new_status,
                        });
                    }
                    _ => {}
                }
                previous = order.status;
                order.status = new_status;
                order.updated_at = now_millis();
                Ok(())
            })?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        tracing::info!(
            order_id,
            token = %order.token,
            from = %previous,
            to = %new_status,
            "Order status changed"
        );

        let kind = if new_status == OrderStatus::Cancelled {
            NotificationKind::Error
        } else {
            NotificationKind::Info
        };
        self.notify(
            &order.user_id,
            format!("Order {}", new_status.label()),
            format!("{} - Token: {}", status_message(new_status), order.token),
            kind,
        );
        self.broadcast(&order, OrderEventType::StatusChanged, Some(previous));

        Ok(order)
    }

    pub fn cancel(&self, order_id: &str) -> OrderResult<Order> {
        self.advance_status(order_id, OrderStatus::Cancelled)
    }

    /// Advance every order currently in `from` to its successor
    ///
    /// Returns how many orders moved. Terminal statuses have no successor, so
    /// nothing moves for them.
    pub fn bulk_advance(&self, from: OrderStatus) -> OrderResult<usize> {
        let Some(to) = from.next() else {
            return Ok(0);
        };

        let mut advanced = 0;
        for order in self.all_orders()?.into_iter().filter(|o| o.status == from) {
            match self.advance_status(&order.id, to) {
                Ok(_) => advanced += 1,
                // Another request moved it first
                Err(OrderError::InvalidTransition { .. })
                | Err(OrderError::OrderAlreadyServed(_))
                | Err(OrderError::OrderAlreadyCancelled(_)) => {}
                Err(e) => return Err(e),
            }
        }

        tracing::info!(from = %from, to = %to, advanced, "Bulk status advance");
        Ok(advanced)
    }

    // ========== Queries ==========

    pub fn get(&self, order_id: &str) -> OrderResult<Order> {
        self.store
            .get(&order_key(order_id))?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    /// Every order ever placed, newest first
    pub fn all_orders(&self) -> OrderResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.store.scan(KEY_PREFIX)?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// One user's orders split into active and completed, newest first
    pub fn list_for_user(&self, user_id: &str) -> OrderResult<UserOrders> {
        let mut result = UserOrders::default();
        for order in self.all_orders()?.into_iter().filter(|o| o.user_id == user_id) {
            if order.status.is_active() {
                result.active.push(Self::view(order));
            } else {
                result.completed.push(Self::view(order));
            }
        }
        Ok(result)
    }

    /// Manager listing: optional status filter and case-insensitive token/id search
    pub fn list(&self, query: &OrderListQuery) -> OrderResult<Vec<OrderView>> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Ok(self
            .all_orders()?
            .into_iter()
            .filter(|o| query.status.is_none_or(|s| o.status == s))
            .filter(|o| {
                search.as_deref().is_none_or(|term| {
                    o.token.to_lowercase().contains(term) || o.id.to_lowercase().contains(term)
                })
            })
            .map(Self::view)
            .collect())
    }

    pub fn counts(&self) -> OrderResult<OrderCounts> {
        let mut counts = OrderCounts::default();
        for order in self.store.scan::<Order>(KEY_PREFIX)? {
            counts.bump(order.status);
        }
        Ok(counts)
    }

    /// Attach the tax breakdown computed from the stored pre-tax amount
    pub fn view(order: Order) -> OrderView {
        OrderView {
            tax: money::tax_of(order.total_amount),
            total_with_tax: money::with_tax(order.total_amount),
            order,
        }
    }

    // ========== Side effects ==========

    fn notify(&self, user_id: &str, title: impl Into<String>, message: String, kind: NotificationKind) {
        if let Err(e) = self.notifications.push(user_id, title, message, kind) {
            tracing::warn!(user_id, error = %e, "Failed to push order notification");
        }
    }

    fn broadcast(&self, order: &Order, event_type: OrderEventType, previous_status: Option<OrderStatus>) {
        let event = OrderEvent {
            event_type,
            order_id: order.id.clone(),
            user_id: order.user_id.clone(),
            token: order.token.clone(),
            previous_status,
            status: order.status,
            timestamp: order.updated_at,
        };
        if self.event_tx.send(event).is_err() {
            tracing::debug!("Event broadcast skipped: no active receivers");
        }
    }
}
