//! Clients Page
//!
//! Admins and managers maintain clients (managers also reassign them);
//! employees see their own clients and update the status.

use leptos::prelude::*;

use crm_listview::entity::CLIENT_STATUSES;
use crm_listview::{
    AssignmentPatch, Client, ClientDraft, ConfirmedDelete, Employee, ListView, ModalState,
    MutationCoordinator, Resource, Role, StatusPatch,
};

use crate::components::{
    enum_options, humanize, CategoryFilter, DeleteConfirmButton, ErrorBanner, ModalFrame, Pager,
    SearchBar, SelectField, TextField,
};
use crate::context::use_app_context;
use crate::list_page::{optional, optional_id, spawn_lookup, spawn_mutation, spawn_reload};

#[component]
pub fn ClientsPage(role: Role) -> impl IntoView {
    let ctx = use_app_context();
    let fetch_size = ctx.config().fetch_page_size;
    let state = RwSignal::new(ListView::<Client>::new(ctx.config().view_page_size));
    let employees = RwSignal::new(Vec::<Employee>::new());
    let draft = RwSignal::new(ClientDraft::default());
    let can_edit = role != Role::Employee;
    let can_assign = role == Role::Manager;

    Effect::new(move |_| {
        spawn_reload(ctx, state, role);
        if can_assign {
            spawn_lookup(ctx, employees, Employee::collection_path(role));
        }
    });

    let page = Memo::new(move |_| state.with(|v| v.page(0)));
    let modal = Memo::new(move |_| state.with(|v| *v.modal()));
    let error = Signal::derive(move || state.with(|v| v.error().map(str::to_string)));
    let category = Signal::derive(move || state.with(|v| v.category().to_string()));
    let assignees = Signal::derive(move || {
        employees.with(|list| {
            list.iter()
                .map(|e| (e.id.to_string(), e.name.clone()))
                .collect::<Vec<_>>()
        })
    });

    let open_add = move |_| {
        draft.set(ClientDraft::default());
        state.update(|v| v.open_add());
    };

    let open_edit = move |id: i64| {
        let found = state.with_untracked(|v| v.records().iter().find(|c| c.id == id).cloned());
        if let Some(client) = found {
            draft.set(ClientDraft::from(&client));
            state.update(|v| v.open_edit(id));
        }
    };

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let payload = draft.get_untracked();
        let reset = move || draft.set(ClientDraft::default());
        match modal.get_untracked() {
            ModalState::Adding => spawn_mutation(
                ctx,
                state,
                move |api| async move {
                    MutationCoordinator::new(&api, role, fetch_size)
                        .create::<Client, _>(&payload)
                        .await
                },
                reset,
            ),
            ModalState::Editing(id) => spawn_mutation(
                ctx,
                state,
                move |api| async move {
                    MutationCoordinator::new(&api, role, fetch_size)
                        .update::<Client, _>(id, &payload)
                        .await
                },
                reset,
            ),
            _ => {}
        }
    };

    let change_status = move |id: i64, value: String| {
        let patch = match StatusPatch::checked(&value, CLIENT_STATUSES) {
            Ok(patch) => patch,
            Err(e) => {
                state.update(|v| v.fail(&e));
                return;
            }
        };
        spawn_mutation(
            ctx,
            state,
            move |api| async move {
                MutationCoordinator::new(&api, role, fetch_size)
                    .change_status::<Client>(id, &patch)
                    .await
            },
            || {},
        );
    };

    let reassign = move |id: i64, value: String| {
        let Some(assigned_to_id) = optional_id(&value) else {
            return;
        };
        let patch = AssignmentPatch { assigned_to_id };
        spawn_mutation(
            ctx,
            state,
            move |api| async move {
                MutationCoordinator::new(&api, role, fetch_size)
                    .reassign::<Client>(id, &patch)
                    .await
            },
            || {},
        );
    };

    let on_delete = Callback::new(move |confirmed: ConfirmedDelete| {
        spawn_mutation(
            ctx,
            state,
            move |api| async move {
                MutationCoordinator::new(&api, role, fetch_size)
                    .delete::<Client>(confirmed)
                    .await
            },
            || {},
        );
    });

    let close = Callback::new(move |_: ()| state.update(|v| v.close_modal()));

    view! {
        <section class="list-page clients-page">
            <div class="list-toolbar">
                <SearchBar
                    placeholder="Search by name, email, phone, company, status or assignee..."
                    on_committed_change=move |term: String| state.update(|v| v.set_search(&term))
                />
                <CategoryFilter
                    options=CLIENT_STATUSES
                    all_label="All statuses"
                    selected=category
                    on_change=move |value: String| state.update(|v| v.set_category(&value))
                />
                <Show when=move || can_edit>
                    <button class="add-btn" on:click=open_add>"+ Add client"</button>
                </Show>
            </div>

            <Show when=move || !modal.get().is_open()>
                <ErrorBanner message=error on_dismiss=move |_| state.update(|v| v.clear_error()) />
            </Show>

            <Show when=move || state.with(|v| v.is_loading())>
                <p class="loading">"Loading clients..."</p>
            </Show>

            <table class="list-table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Company"</th>
                        <th>"Email"</th>
                        <th>"Status"</th>
                        <th>"Assigned to"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let rows = page.get().items;
                        if rows.is_empty() {
                            return view! { <tr><td colspan="6" class="empty-row">"No clients found"</td></tr> }.into_any();
                        }
                        rows.into_iter().map(|client| {
                            let id = client.id;
                            let status = client.status.clone().unwrap_or_default();
                            let assignee_id = client.assigned_to.as_ref().map(|u| u.id.to_string()).unwrap_or_default();
                            let assignee_name = client.assigned_to.as_ref().map(|u| u.name.clone()).unwrap_or_default();
                            let unassigned = assignee_id.is_empty();
                            view! {
                                <tr>
                                    <td>
                                        <button class="link-btn" on:click=move |_| state.update(|v| v.open_view(id))>
                                            {client.name.clone()}
                                        </button>
                                    </td>
                                    <td>{client.company.clone().unwrap_or_default()}</td>
                                    <td>{client.email.clone().unwrap_or_default()}</td>
                                    <td>
                                        {if can_edit {
                                            humanize(&status).into_any()
                                        } else {
                                            view! {
                                                <select class="inline-select" on:change=move |ev| change_status(id, event_target_value(&ev))>
                                                    {CLIENT_STATUSES.iter().map(|s| {
                                                        let selected = *s == status;
                                                        view! { <option value=*s selected=selected>{humanize(s)}</option> }
                                                    }).collect_view()}
                                                </select>
                                            }.into_any()
                                        }}
                                    </td>
                                    <td>
                                        {if can_assign {
                                            view! {
                                                <select class="inline-select" on:change=move |ev| reassign(id, event_target_value(&ev))>
                                                    <option value="" selected=unassigned>"Unassigned"</option>
                                                    {move || assignees.get().into_iter().map(|(value, text)| {
                                                        let is_selected = value == assignee_id;
                                                        view! { <option value=value selected=is_selected>{text}</option> }
                                                    }).collect_view()}
                                                </select>
                                            }.into_any()
                                        } else {
                                            assignee_name.into_any()
                                        }}
                                    </td>
                                    <td class="row-actions">
                                        <Show when=move || can_edit>
                                            <button class="edit-btn" on:click=move |_| open_edit(id)>"Edit"</button>
                                            <DeleteConfirmButton id=id on_confirm=on_delete />
                                        </Show>
                                    </td>
                                </tr>
                            }
                        }).collect_view().into_any()
                    }}
                </tbody>
            </table>

            <Pager
                label=Signal::derive(move || page.get().label())
                has_prev=Signal::derive(move || page.get().has_prev())
                has_next=Signal::derive(move || page.get().has_next())
                on_prev=move |_| state.update(|v| v.prev_page(0))
                on_next=move |_| state.update(|v| v.next_page(0))
            />

            {move || match modal.get() {
                ModalState::Closed => None,
                ModalState::Viewing(_) => {
                    let client = state.with_untracked(|v| v.selected().cloned())?;
                    Some(view! {
                        <ModalFrame title=client.name.clone() on_close=close>
                            <dl class="detail-list">
                                <dt>"Email"</dt><dd>{client.email.clone().unwrap_or_default()}</dd>
                                <dt>"Phone"</dt><dd>{client.phone.clone().unwrap_or_default()}</dd>
                                <dt>"Company"</dt><dd>{client.company.clone().unwrap_or_default()}</dd>
                                <dt>"Status"</dt><dd>{client.status.as_deref().map(humanize).unwrap_or_default()}</dd>
                                <dt>"Assigned to"</dt><dd>{client.assigned_to.as_ref().map(|u| u.name.clone()).unwrap_or_default()}</dd>
                            </dl>
                        </ModalFrame>
                    }.into_any())
                }
                current => {
                    let title = if current == ModalState::Adding { "Add client" } else { "Edit client" };
                    Some(view! {
                        <ModalFrame title=title on_close=close>
                            <form class="record-form" on:submit=save>
                                <ErrorBanner message=error on_dismiss=move |_| state.update(|v| v.clear_error()) />
                                <TextField
                                    label="Name"
                                    value=Signal::derive(move || draft.with(|d| d.name.clone()))
                                    on_input=move |v: String| draft.update(|d| d.name = v)
                                />
                                <TextField
                                    label="Email"
                                    input_type="email"
                                    value=Signal::derive(move || draft.with(|d| d.email.clone()))
                                    on_input=move |v: String| draft.update(|d| d.email = v)
                                />
                                <TextField
                                    label="Phone"
                                    input_type="tel"
                                    value=Signal::derive(move || draft.with(|d| d.phone.clone().unwrap_or_default()))
                                    on_input=move |v: String| draft.update(|d| d.phone = optional(v))
                                />
                                <TextField
                                    label="Company"
                                    value=Signal::derive(move || draft.with(|d| d.company.clone().unwrap_or_default()))
                                    on_input=move |v: String| draft.update(|d| d.company = optional(v))
                                />
                                <SelectField
                                    label="Status"
                                    options=Signal::derive(|| enum_options(CLIENT_STATUSES))
                                    selected=Signal::derive(move || draft.with(|d| d.status.clone()))
                                    on_change=move |v: String| draft.update(|d| d.status = v)
                                />
                                <Show when=move || can_assign>
                                    <SelectField
                                        label="Assign to"
                                        options=assignees
                                        selected=Signal::derive(move || draft.with(|d| d.assigned_to_id.map(|id| id.to_string()).unwrap_or_default()))
                                        on_change=move |v: String| draft.update(|d| d.assigned_to_id = optional_id(&v))
                                        empty_label="Unassigned"
                                    />
                                </Show>
                                <div class="form-actions">
                                    <button type="button" on:click=move |_| close.run(())>"Cancel"</button>
                                    <button type="submit">"Save"</button>
                                </div>
                            </form>
                        </ModalFrame>
                    }.into_any())
                }
            }}
        </section>
    }
}
