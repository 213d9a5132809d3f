//! List Page Plumbing
//!
//! Glue between a page's `ListView` signal and the backend: reloads and
//! mutations share one code path for every entity.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crm_listview::{load_all, ApiClient, ApiResult, HttpBackend, ListView, Resource, Role};

use crate::context::AppContext;

/// Load `T` for `role` into `state`; a newer reload supersedes this one.
pub fn spawn_reload<T>(ctx: AppContext, state: RwSignal<ListView<T>>, role: Role)
where
    T: Resource + Send + Sync + 'static,
{
    let Some(ticket) = state.try_update(|view| view.begin_load()) else {
        return;
    };
    let page_size = ctx.config().fetch_page_size;
    spawn_local(async move {
        let api = ctx.api();
        let result = load_all::<T, _>(&api, &T::collection_path(role), page_size).await;
        if let Err(e) = &result {
            ctx.report(e);
        }
        state.try_update(|view| view.finish_load(ticket, result));
    });
}

/// Load a lookup collection (e.g. employees for an assignee picker).
/// Failures only log: the page still works without the lookup.
pub fn spawn_lookup<T>(ctx: AppContext, target: RwSignal<Vec<T>>, path: String)
where
    T: Resource + Send + Sync + 'static,
{
    let page_size = ctx.config().fetch_page_size;
    spawn_local(async move {
        let api = ctx.api();
        match load_all::<T, _>(&api, &path, page_size).await {
            Ok(records) => {
                target.try_set(records);
            }
            Err(e) => {
                log::warn!("lookup {} failed: {}", path, e);
                ctx.report(&e);
            }
        }
    });
}

/// Run a mutation that returns the reloaded collection.
///
/// Success closes the modal, clears the error slot and runs `on_success`;
/// failure lands in the error slot.
pub fn spawn_mutation<T, F, Fut>(
    ctx: AppContext,
    state: RwSignal<ListView<T>>,
    op: F,
    on_success: impl FnOnce() + 'static,
) where
    T: Resource + Send + Sync + 'static,
    F: FnOnce(ApiClient<HttpBackend>) -> Fut + 'static,
    Fut: Future<Output = ApiResult<Vec<T>>> + 'static,
{
    state.update(|view| view.clear_error());
    spawn_local(async move {
        match op(ctx.api()).await {
            Ok(records) => {
                state.try_update(|view| view.mutation_succeeded(records));
                on_success();
            }
            Err(e) => {
                ctx.report(&e);
                state.try_update(|view| view.fail(&e));
            }
        }
    });
}

/// Blank form input means "not set"; anything else is kept as typed
pub fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// `<select>` value to an optional id
pub fn optional_id(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}
