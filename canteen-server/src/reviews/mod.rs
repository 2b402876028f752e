//! 评价与评分聚合
//!
//! 每条评价写入后重新计算该菜品全部评分的平均值 (保留一位小数) 与数量，
//! 并写回菜单目录。同一用户对同一菜品的重复评价不做拦截，
//! 客户端通过 `has_reviewed` 自行隐藏入口。

use parking_lot::Mutex;
use shared::error::{AppError, ErrorCode};
use shared::models::Review;
use shared::util::{new_id, now_millis};
use std::sync::Arc;

use crate::menu::MenuCatalog;
use crate::storage::RecordStore;
use crate::utils::AppResult;
use crate::utils::validation::MAX_COMMENT_LEN;

const KEY_PREFIX: &str = "review:";

fn item_prefix(menu_item_id: &str) -> String {
    format!("{KEY_PREFIX}{menu_item_id}:")
}

/// Mean of the ratings rounded to one decimal place, 0 when empty
pub fn average_rating(ratings: &[u8]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: u32 = ratings.iter().map(|&r| u32::from(r)).sum();
    let mean = f64::from(sum) / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

#[derive(Debug, Clone)]
pub struct ReviewService {
    store: RecordStore,
    menu: MenuCatalog,
    /// Held across put -> scan -> apply_rating so aggregates never go stale
    write_lock: Arc<Mutex<()>>,
}

impl ReviewService {
    pub fn new(store: RecordStore, menu: MenuCatalog) -> Self {
        Self {
            store,
            menu,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Store a review and refresh the item's rating aggregate
    pub fn add_review(
        &self,
        user_id: &str,
        user_name: &str,
        menu_item_id: &str,
        rating: u8,
        comment: &str,
    ) -> AppResult<Review> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::new(ErrorCode::InvalidRating).with_detail("rating", rating));
        }
        let comment_chars = comment.chars().count();
        if comment_chars > MAX_COMMENT_LEN {
            return Err(AppError::validation(format!(
                "comment is too long ({comment_chars} chars, max {MAX_COMMENT_LEN})"
            )));
        }
        // Unknown items are rejected before anything is written
        self.menu.get(menu_item_id)?;

        let review = Review {
            id: new_id(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            menu_item_id: menu_item_id.to_string(),
            rating,
            comment: comment.trim().to_string(),
            created_at: now_millis(),
        };

        let guard = self.write_lock.lock();
        self.store.put(
            &format!("{}{}", item_prefix(menu_item_id), review.id),
            &review,
        )?;

        let ratings: Vec<u8> = self
            .store
            .scan::<Review>(&item_prefix(menu_item_id))?
            .iter()
            .map(|r| r.rating)
            .collect();
        let average = average_rating(&ratings);
        let count = ratings.len() as u32;
        self.menu.apply_rating(menu_item_id, average, count)?;
        drop(guard);

        tracing::info!(
            menu_item_id,
            user_id,
            rating,
            average_rating = average,
            review_count = count,
            "Review added"
        );
        Ok(review)
    }

    /// Reviews of one item, newest first
    pub fn list_for_item(&self, menu_item_id: &str) -> AppResult<Vec<Review>> {
        let mut reviews: Vec<Review> = self.store.scan(&item_prefix(menu_item_id))?;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    pub fn has_reviewed(&self, user_id: &str, menu_item_id: &str) -> AppResult<bool> {
        Ok(self
            .store
            .scan::<Review>(&item_prefix(menu_item_id))?
            .iter()
            .any(|r| r.user_id == user_id))
    }

    /// Every review across the menu
    pub fn all(&self) -> AppResult<Vec<Review>> {
        Ok(self.store.scan(KEY_PREFIX)?)
    }
}
