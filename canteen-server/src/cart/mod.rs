//! 购物车
//!
//! [`Cart`] 是纯内存的 item → quantity 映射；[`CartService`] 为每个登录用户
//! 维护一个购物车 (DashMap，进程内，不持久化)，并在加购时校验菜品状态。

use dashmap::DashMap;
use shared::error::{AppError, ErrorCode};
use shared::models::{CartItem, CartView, MenuItem};
use std::sync::Arc;

use crate::menu::MenuCatalog;
use crate::money;
use crate::utils::AppResult;

/// A user's cart; every line has quantity >= 1
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge into an existing line (quantities add up) or append a new one
    pub fn add(&mut self, item: MenuItem, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|line| line.item.id == item.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
            }
            None => self.items.push(CartItem { item, quantity }),
        }
    }

    /// Overwrite a line's quantity; `quantity <= 0` removes it.
    /// Returns false when the item is not in the cart.
    pub fn set_quantity(&mut self, item_id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(item_id);
        }
        match self.items.iter_mut().find(|line| line.item.id == item_id) {
            Some(line) => {
                line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                true
            }
            None => false,
        }
    }

    /// Returns false when the item is not in the cart
    pub fn remove(&mut self, item_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.item.id != item_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Pre-tax sum of price x quantity
    pub fn total(&self) -> f64 {
        money::items_total(&self.items)
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.items.iter().any(|line| line.item.id == item_id)
    }

    /// Total number of units
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Longest preparation time among the lines (minutes)
    pub fn max_preparation_time(&self) -> u32 {
        self.items
            .iter()
            .map(|line| line.item.preparation_time)
            .max()
            .unwrap_or(0)
    }

    pub fn view(&self) -> CartView {
        let subtotal = self.total();
        CartView {
            items: self.items.clone(),
            item_count: self.item_count(),
            subtotal,
            tax: money::tax_of(subtotal),
            total: money::with_tax(subtotal),
        }
    }
}

/// Per-user carts held in memory
#[derive(Debug, Clone)]
pub struct CartService {
    carts: Arc<DashMap<String, Cart>>,
    menu: MenuCatalog,
}

impl CartService {
    pub fn new(menu: MenuCatalog) -> Self {
        Self {
            carts: Arc::new(DashMap::new()),
            menu,
        }
    }

    pub fn view(&self, user_id: &str) -> CartView {
        self.carts
            .get(user_id)
            .map(|cart| cart.view())
            .unwrap_or_else(|| Cart::new().view())
    }

    /// Add an orderable catalog item
    pub fn add(&self, user_id: &str, item_id: &str, quantity: u32) -> AppResult<CartView> {
        let item = self.menu.get(item_id)?;
        if !item.is_available {
            return Err(AppError::new(ErrorCode::MenuItemUnavailable).with_detail("id", item_id));
        }
        let mut cart = self.carts.entry(user_id.to_string()).or_default();
        cart.add(item, quantity.max(1));
        Ok(cart.view())
    }

    pub fn set_quantity(&self, user_id: &str, item_id: &str, quantity: i64) -> AppResult<CartView> {
        let mut cart = self.carts.entry(user_id.to_string()).or_default();
        if !cart.set_quantity(item_id, quantity) {
            return Err(cart_item_not_found(item_id));
        }
        Ok(cart.view())
    }

    pub fn remove(&self, user_id: &str, item_id: &str) -> AppResult<CartView> {
        let mut cart = self.carts.entry(user_id.to_string()).or_default();
        if !cart.remove(item_id) {
            return Err(cart_item_not_found(item_id));
        }
        Ok(cart.view())
    }

    pub fn clear(&self, user_id: &str) {
        if let Some(mut cart) = self.carts.get_mut(user_id) {
            cart.clear();
        }
    }

    /// Run `f` with exclusive access to the user's cart (checkout)
    pub fn with_cart<R>(&self, user_id: &str, f: impl FnOnce(&mut Cart) -> R) -> R {
        let mut cart = self.carts.entry(user_id.to_string()).or_default();
        f(cart.value_mut())
    }
}

fn cart_item_not_found(item_id: &str) -> AppError {
    AppError::new(ErrorCode::CartItemNotFound).with_detail("id", item_id)
}
