//! Macro-generated test suite for `OrderStore` contract validation.
//!
//! # Generated Tests
//!
//! ## Create & Get
//! - `test_create_and_get` — create then retrieve, verify every field
//! - `test_menu_with_delimiters_round_trips` — commas and backslashes in items
//! - `test_get_nonexistent` — unknown id is NotFound
//!
//! ## Daily priority
//! - `test_sequential_priorities` — N same-day creations get 1..N
//! - `test_previous_day_does_not_count` — a new day restarts at 1
//! - `test_concurrent_creates_have_unique_priorities` — parallel creates
//! - `test_day_follows_named_zone_in_winter` / `test_day_follows_named_zone_in_summer`
//!   — the local day moves with DST
//! - `test_unassigned_policy_keeps_zero` — every new order gets 0
//!
//! ## Lists
//! - `test_list_active_only_pending_in_order`
//! - `test_list_active_empty` / `test_list_all_empty` — NoOrders
//! - `test_list_all_orders_by_priority_then_creation`
//!
//! ## Update
//! - `test_update_status_keeps_priority`
//! - `test_update_overwrites_priority`
//! - `test_update_nonexistent`

/// Generate a full `OrderStore` conformance test suite.
///
/// `$factory` must evaluate to an `OrderStore + 'static` built around the
/// `PriorityRule` bound to `$rule` and the `Arc<dyn Clock>` bound to `$clock`.
/// It is re-evaluated for each test.
#[macro_export]
macro_rules! order_store_tests {
    ($rule:ident, $clock:ident => $factory:expr) => {
        mod order_store_contract_tests {
            use super::*;
            use chrono::Duration;
            use order_service::core::clock::{Clock, FixedClock};
            use order_service::core::error::{ListScope, OrderError};
            use order_service::core::order::{OrderSource, OrderStatus, OrderType};
            use order_service::core::store::OrderStore;
            use std::collections::HashSet;
            use std::sync::Arc;
            use uuid::Uuid;

            /// Build a UTC-day store whose clock is pinned at `start`
            async fn store_at(start: chrono::DateTime<chrono::Utc>) -> (impl OrderStore + 'static, Arc<FixedClock>) {
                store_with(utc_rule(), start).await
            }

            async fn store_with(
                rule: order_service::core::priority::PriorityRule,
                start: chrono::DateTime<chrono::Utc>,
            ) -> (impl OrderStore + 'static, Arc<FixedClock>) {
                let fixed = Arc::new(FixedClock::new(start));
                let $clock: Arc<dyn Clock> = fixed.clone();
                let $rule = rule;
                (($factory), fixed)
            }

            // ==================================================================
            // Create & Get
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let (store, _) = store_at(noon()).await;

                let created = store.create(pending("Soup")).await.unwrap();
                assert!(!created.id.is_nil());
                assert_eq!(created.created_at, noon());
                assert_eq!(created.created_at, created.updated_at);
                assert_eq!(created.menu, vec!["Soup".to_string()]);
                assert_eq!(created.status, OrderStatus::Pending);
                assert_eq!(created.source, OrderSource::InPerson);
                assert_eq!(created.order_type, OrderType::Normal);
                assert_eq!(created.priority, 1);

                let fetched = store.get_by_id(&created.id).await.unwrap();
                assert_eq!(fetched, created);
            }

            #[tokio::test]
            async fn test_menu_with_delimiters_round_trips() {
                let (store, _) = store_at(noon()).await;
                let order = tricky_menu_order();
                let menu = order.menu.clone();

                let created = store.create(order).await.unwrap();
                let fetched = store.get_by_id(&created.id).await.unwrap();
                assert_eq!(fetched.menu, menu);
                assert_eq!(fetched.order_type, OrderType::Vip);
                assert_eq!(fetched.source, OrderSource::Delivery);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let (store, _) = store_at(noon()).await;
                let err = store.get_by_id(&Uuid::new_v4()).await.unwrap_err();
                assert!(matches!(err, OrderError::NotFound { .. }));
            }

            // ==================================================================
            // Daily priority
            // ==================================================================

            #[tokio::test]
            async fn test_sequential_priorities() {
                let (store, clock) = store_at(noon()).await;

                for expected in 1..=5u32 {
                    let created = store.create(pending("Soup")).await.unwrap();
                    assert_eq!(created.priority, expected);
                    clock.advance(Duration::seconds(1));
                }
            }

            #[tokio::test]
            async fn test_previous_day_does_not_count() {
                let late = noon() + Duration::hours(11) + Duration::minutes(30);
                let (store, clock) = store_at(late).await;

                assert_eq!(store.create(pending("Soup")).await.unwrap().priority, 1);
                assert_eq!(store.create(pending("Tea")).await.unwrap().priority, 2);

                clock.advance(Duration::hours(1));
                let next_day = store.create(pending("Bread")).await.unwrap();
                assert_eq!(next_day.priority, 1);
            }

            #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
            async fn test_concurrent_creates_have_unique_priorities() {
                let (store, _) = store_at(noon()).await;
                let store = Arc::new(store);

                let mut handles = Vec::new();
                for i in 0..20 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store.create(pending(&format!("Plato # {}", i))).await
                    }));
                }

                let mut priorities = HashSet::new();
                for handle in handles {
                    let created = handle.await.unwrap().unwrap();
                    assert!(priorities.insert(created.priority), "duplicate priority {}", created.priority);
                }
                assert_eq!(priorities, (1..=20u32).collect::<HashSet<_>>());
            }

            #[tokio::test]
            async fn test_day_follows_named_zone_in_winter() {
                use chrono::TimeZone;

                // 22:00 EST on Jan 9 is 03:00Z on Jan 10
                let evening = chrono::Utc.with_ymd_and_hms(2027, 1, 10, 3, 0, 0).unwrap();
                let (store, clock) = store_with(new_york_rule(), evening).await;

                assert_eq!(store.create(pending("Soup")).await.unwrap().priority, 1);

                // 23:30 EST, same local day
                clock.advance(Duration::minutes(90));
                assert_eq!(store.create(pending("Tea")).await.unwrap().priority, 2);

                // 00:30 EST on Jan 10
                clock.advance(Duration::hours(1));
                assert_eq!(store.create(pending("Bread")).await.unwrap().priority, 1);
            }

            #[tokio::test]
            async fn test_day_follows_named_zone_in_summer() {
                use chrono::TimeZone;

                // 23:30 EDT on Jul 9 is 03:30Z on Jul 10
                let evening = chrono::Utc.with_ymd_and_hms(2027, 7, 10, 3, 30, 0).unwrap();
                let (store, clock) = store_with(new_york_rule(), evening).await;

                assert_eq!(store.create(pending("Soup")).await.unwrap().priority, 1);

                // 00:30 EDT on Jul 10
                clock.advance(Duration::hours(1));
                assert_eq!(store.create(pending("Tea")).await.unwrap().priority, 1);
            }

            #[tokio::test]
            async fn test_unassigned_policy_keeps_zero() {
                let (store, clock) = store_with(unassigned_rule(), noon()).await;

                for item in ["Soup", "Tea", "Bread"] {
                    let created = store.create(pending(item)).await.unwrap();
                    assert_eq!(created.priority, 0);
                    assert_eq!(store.get_by_id(&created.id).await.unwrap().priority, 0);
                    clock.advance(Duration::seconds(1));
                }

                let all = store.list_all().await.unwrap();
                assert_eq!(all.len(), 3);
                assert!(all.windows(2).all(|w| w[0].created_at < w[1].created_at));
            }

            // ==================================================================
            // Lists
            // ==================================================================

            #[tokio::test]
            async fn test_list_active_only_pending_in_order() {
                let (store, clock) = store_at(noon()).await;

                let a = store.create(pending("A")).await.unwrap();
                clock.advance(Duration::seconds(1));
                store
                    .create(order_with("B", OrderStatus::InPreparation))
                    .await
                    .unwrap();
                clock.advance(Duration::seconds(1));
                let c = store.create(pending("C")).await.unwrap();

                store
                    .update(&c.id, OrderStatus::Pending, Some(0))
                    .await
                    .unwrap();

                let active = store.list_active().await.unwrap();
                let ids: Vec<Uuid> = active.iter().map(|o| o.id).collect();
                assert_eq!(ids, vec![c.id, a.id]);
                assert!(active.iter().all(|o| o.status == OrderStatus::Pending));
            }

            #[tokio::test]
            async fn test_list_active_empty() {
                let (store, _) = store_at(noon()).await;
                store
                    .create(order_with("A", OrderStatus::Delivered))
                    .await
                    .unwrap();

                let err = store.list_active().await.unwrap_err();
                assert!(matches!(err, OrderError::NoOrders { scope: ListScope::Active }));
            }

            #[tokio::test]
            async fn test_list_all_empty() {
                let (store, _) = store_at(noon()).await;
                let err = store.list_all().await.unwrap_err();
                assert!(matches!(err, OrderError::NoOrders { scope: ListScope::All }));
            }

            #[tokio::test]
            async fn test_list_all_orders_by_priority_then_creation() {
                let (store, clock) = store_at(noon()).await;

                let first = store.create(order_with("A", OrderStatus::Finished)).await.unwrap();
                clock.advance(Duration::seconds(1));
                let second = store.create(pending("B")).await.unwrap();
                clock.advance(Duration::seconds(1));
                let third = store.create(order_with("C", OrderStatus::Canceled)).await.unwrap();

                // second and third tie on priority 7; creation time breaks the tie
                store.update(&third.id, OrderStatus::Canceled, Some(7)).await.unwrap();
                store.update(&second.id, OrderStatus::Pending, Some(7)).await.unwrap();

                let all = store.list_all().await.unwrap();
                let ids: Vec<Uuid> = all.iter().map(|o| o.id).collect();
                assert_eq!(ids, vec![first.id, second.id, third.id]);
            }

            // ==================================================================
            // Update
            // ==================================================================

            #[tokio::test]
            async fn test_update_status_keeps_priority() {
                let (store, clock) = store_at(noon()).await;
                store.create(pending("A")).await.unwrap();
                let created = store.create(pending("B")).await.unwrap();

                clock.advance(Duration::minutes(10));
                let updated = store
                    .update(&created.id, OrderStatus::InPreparation, None)
                    .await
                    .unwrap();

                assert_eq!(updated.status, OrderStatus::InPreparation);
                assert_eq!(updated.priority, 2);
                assert_eq!(updated.created_at, created.created_at);
                assert_eq!(updated.updated_at, noon() + Duration::minutes(10));
                assert_eq!(updated.menu, created.menu);
                assert_eq!(updated.source, created.source);

                let fetched = store.get_by_id(&created.id).await.unwrap();
                assert_eq!(fetched, updated);
            }

            #[tokio::test]
            async fn test_update_overwrites_priority() {
                let (store, _) = store_at(noon()).await;
                let created = store.create(pending("A")).await.unwrap();

                let updated = store
                    .update(&created.id, OrderStatus::Finished, Some(42))
                    .await
                    .unwrap();
                assert_eq!(updated.priority, 42);
                assert_eq!(updated.status, OrderStatus::Finished);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let (store, _) = store_at(noon()).await;
                let err = store
                    .update(&Uuid::new_v4(), OrderStatus::Finished, None)
                    .await
                    .unwrap_err();
                assert!(matches!(err, OrderError::NotFound { .. }));
            }
        }
    };
}
