//! Leads Page
//!
//! Admins and managers work one paginated list with full CRUD; managers also
//! reassign leads and review conversion requests. Employees see their own
//! leads split into two independently paginated sub-lists: leads still being
//! worked, and leads already sent for manager review.

use leptos::prelude::*;

use crm_listview::entity::{CONVERSION_PENDING, LEAD_STATUSES};
use crm_listview::{
    AssignmentPatch, ConfirmedDelete, ConversionRequest, ConversionReview, Employee, Lead,
    LeadDraft, ListView, ModalState, MutationCoordinator, Resource, Role, StatusPatch,
};

use crate::components::{
    enum_options, humanize, CategoryFilter, DeleteConfirmButton, ErrorBanner, ModalFrame, Pager,
    SearchBar, SelectField, TextAreaField, TextField,
};
use crate::context::{use_app_context, AppContext};
use crate::list_page::{optional, optional_id, spawn_lookup, spawn_mutation, spawn_reload};

const SEARCH_HINT: &str = "Search by name, email, phone, company, status or assignee...";

#[component]
pub fn LeadsPage(role: Role) -> impl IntoView {
    match role {
        Role::Employee => view! { <MyLeads /> }.into_any(),
        _ => view! { <ManagedLeads role=role /> }.into_any(),
    }
}

fn employee_options(employees: &[Employee]) -> Vec<(String, String)> {
    employees
        .iter()
        .map(|e| (e.id.to_string(), e.name.clone()))
        .collect()
}

fn lead_details(lead: &Lead) -> impl IntoView {
    view! {
        <dl class="detail-list">
            <dt>"Email"</dt><dd>{lead.email.clone().unwrap_or_default()}</dd>
            <dt>"Phone"</dt><dd>{lead.phone.clone().unwrap_or_default()}</dd>
            <dt>"Company"</dt><dd>{lead.company.clone().unwrap_or_default()}</dd>
            <dt>"Status"</dt><dd>{lead.status.as_deref().map(humanize).unwrap_or_default()}</dd>
            <dt>"Assigned to"</dt><dd>{lead.assignee_name().unwrap_or("Unassigned").to_string()}</dd>
            <dt>"Conversion"</dt><dd>{lead.conversion_status.as_deref().map(humanize).unwrap_or_default()}</dd>
            <dt>"Message"</dt><dd>{lead.conversion_message.clone().unwrap_or_default()}</dd>
        </dl>
    }
}

fn run_review(ctx: AppContext, state: RwSignal<ListView<Lead>>, role: Role, id: i64, approved: bool) {
    let fetch_size = ctx.config().fetch_page_size;
    let review = ConversionReview {
        approved,
        remark: None,
    };
    spawn_mutation(
        ctx,
        state,
        move |api| async move {
            MutationCoordinator::new(&api, role, fetch_size)
                .review_conversion(id, &review)
                .await
        },
        || {},
    );
}

// ========================
// Admin / manager
// ========================

#[component]
fn ManagedLeads(role: Role) -> impl IntoView {
    let ctx = use_app_context();
    let fetch_size = ctx.config().fetch_page_size;
    let state = RwSignal::new(ListView::<Lead>::new(ctx.config().view_page_size));
    let employees = RwSignal::new(Vec::<Employee>::new());
    let draft = RwSignal::new(LeadDraft::default());
    let can_manage = role == Role::Manager;

    Effect::new(move |_| {
        spawn_reload(ctx, state, role);
        if can_manage {
            spawn_lookup(ctx, employees, Employee::collection_path(role));
        }
    });

    let page = Memo::new(move |_| state.with(|v| v.page(0)));
    let modal = Memo::new(move |_| state.with(|v| *v.modal()));
    let error = Signal::derive(move || state.with(|v| v.error().map(str::to_string)));
    let category = Signal::derive(move || state.with(|v| v.category().to_string()));
    let assignees = Signal::derive(move || employees.with(|list| employee_options(list)));

    let open_add = move |_| {
        draft.set(LeadDraft::default());
        state.update(|v| v.open_add());
    };

    let open_edit = move |id: i64| {
        let found = state.with_untracked(|v| v.records().iter().find(|l| l.id == id).cloned());
        if let Some(lead) = found {
            draft.set(LeadDraft::from(&lead));
            state.update(|v| v.open_edit(id));
        }
    };

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let payload = draft.get_untracked();
        let reset = move || draft.set(LeadDraft::default());
        match modal.get_untracked() {
            ModalState::Adding => spawn_mutation(
                ctx,
                state,
                move |api| async move {
                    MutationCoordinator::new(&api, role, fetch_size)
                        .create::<Lead, _>(&payload)
                        .await
                },
                reset,
            ),
            ModalState::Editing(id) => spawn_mutation(
                ctx,
                state,
                move |api| async move {
                    MutationCoordinator::new(&api, role, fetch_size)
                        .update::<Lead, _>(id, &payload)
                        .await
                },
                reset,
            ),
            _ => {}
        }
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
                    .reassign::<Lead>(id, &patch)
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
                    .delete::<Lead>(confirmed)
                    .await
            },
            || {},
        );
    });

    let close = Callback::new(move |_: ()| state.update(|v| v.close_modal()));

    view! {
        <section class="list-page leads-page">
            <div class="list-toolbar">
                <SearchBar
                    placeholder=SEARCH_HINT
                    on_committed_change=move |term: String| state.update(|v| v.set_search(&term))
                />
                <CategoryFilter
                    options=LEAD_STATUSES
                    all_label="All statuses"
                    selected=category
                    on_change=move |value: String| state.update(|v| v.set_category(&value))
                />
                <button class="add-btn" on:click=open_add>"+ Add lead"</button>
            </div>

            <Show when=move || !modal.get().is_open()>
                <ErrorBanner message=error on_dismiss=move |_| state.update(|v| v.clear_error()) />
            </Show>

            <Show when=move || state.with(|v| v.is_loading())>
                <p class="loading">"Loading leads..."</p>
            </Show>

            <table class="list-table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Company"</th>
                        <th>"Status"</th>
                        <th>"Assigned to"</th>
                        <th>"Conversion"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let rows = page.get().items;
                        if rows.is_empty() {
                            return view! { <tr><td colspan="6" class="empty-row">"No leads found"</td></tr> }.into_any();
                        }
                        rows.into_iter().map(|lead| {
                            let id = lead.id;
                            let pending = lead.conversion_status.as_deref() == Some(CONVERSION_PENDING);
                            let current_assignee = lead.assigned_to.as_ref().map(|u| u.id.to_string()).unwrap_or_default();
                            let unassigned = current_assignee.is_empty();
                            view! {
                                <tr>
                                    <td>
                                        <button class="link-btn" on:click=move |_| state.update(|v| v.open_view(id))>
                                            {lead.name.clone()}
                                        </button>
                                    </td>
                                    <td>{lead.company.clone().unwrap_or_default()}</td>
                                    <td>{lead.status.as_deref().map(humanize).unwrap_or_default()}</td>
                                    <td>
                                        {if can_manage {
                                            view! {
                                                <select class="inline-select" on:change=move |ev| reassign(id, event_target_value(&ev))>
                                                    <option value="" selected=unassigned>"Unassigned"</option>
                                                    {move || assignees.get().into_iter().map(|(value, text)| {
                                                        let is_selected = value == current_assignee;
                                                        view! { <option value=value selected=is_selected>{text}</option> }
                                                    }).collect_view()}
                                                </select>
                                            }.into_any()
                                        } else {
                                            lead.assignee_name().unwrap_or("Unassigned").to_string().into_any()
                                        }}
                                    </td>
                                    <td>
                                        {lead.conversion_status.as_deref().map(humanize).unwrap_or_default()}
                                        <Show when=move || can_manage && pending>
                                            <button class="approve-btn" on:click=move |_| run_review(ctx, state, role, id, true)>"Approve"</button>
                                            <button class="reject-btn" on:click=move |_| run_review(ctx, state, role, id, false)>"Reject"</button>
                                        </Show>
                                    </td>
                                    <td class="row-actions">
                                        <button class="edit-btn" on:click=move |_| open_edit(id)>"Edit"</button>
                                        <DeleteConfirmButton id=id on_confirm=on_delete />
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
                    let lead = state.with_untracked(|v| v.selected().cloned())?;
                    Some(view! {
                        <ModalFrame title=lead.name.clone() on_close=close>
                            {lead_details(&lead)}
                        </ModalFrame>
                    }.into_any())
                }
                current => {
                    let title = if current == ModalState::Adding { "Add lead" } else { "Edit lead" };
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
                                    options=Signal::derive(|| enum_options(LEAD_STATUSES))
                                    selected=Signal::derive(move || draft.with(|d| d.status.clone()))
                                    on_change=move |v: String| draft.update(|d| d.status = v)
                                />
                                <Show when=move || can_manage>
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

// ========================
// Employee
// ========================

const WORKING: usize = 0;
const IN_REVIEW: usize = 1;

#[component]
fn MyLeads() -> impl IntoView {
    let ctx = use_app_context();
    let role = Role::Employee;
    let fetch_size = ctx.config().fetch_page_size;
    let state = RwSignal::new(ListView::<Lead>::split(
        ctx.config().view_page_size,
        Lead::is_manager_reviewed,
    ));
    let message = RwSignal::new(String::new());

    Effect::new(move |_| spawn_reload(ctx, state, role));

    let modal = Memo::new(move |_| state.with(|v| *v.modal()));
    let error = Signal::derive(move || state.with(|v| v.error().map(str::to_string)));
    let category = Signal::derive(move || state.with(|v| v.category().to_string()));

    let change_status = move |id: i64, value: String| {
        let patch = match StatusPatch::checked(&value, LEAD_STATUSES) {
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
                    .change_status::<Lead>(id, &patch)
                    .await
            },
            || {},
        );
    };

    let open_request = move |id: i64| {
        message.set(String::new());
        state.update(|v| v.open_edit(id));
    };

    let submit_request = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(id) = modal.get_untracked().editing() else {
            return;
        };
        let request = ConversionRequest {
            conversion_message: message.get_untracked(),
        };
        spawn_mutation(
            ctx,
            state,
            move |api| async move {
                MutationCoordinator::new(&api, role, fetch_size)
                    .request_conversion(id, &request)
                    .await
            },
            move || message.set(String::new()),
        );
    };

    let close = Callback::new(move |_: ()| state.update(|v| v.close_modal()));

    let lane_table = move |lane: usize, title: &'static str, empty: &'static str| {
        let page = Memo::new(move |_| state.with(|v| v.page(lane)));
        view! {
            <div class="sub-list">
                <h3>{title} " (" {move || page.get().total_items} ")"</h3>
                <table class="list-table">
                    <thead>
                        <tr>
                            <th>"Name"</th>
                            <th>"Company"</th>
                            <th>"Status"</th>
                            <th>"Conversion"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let rows = page.get().items;
                            if rows.is_empty() {
                                return view! { <tr><td colspan="5" class="empty-row">{empty}</td></tr> }.into_any();
                            }
                            rows.into_iter().map(|lead| {
                                let id = lead.id;
                                let current = lead.status.clone().unwrap_or_default();
                                view! {
                                    <tr>
                                        <td>
                                            <button class="link-btn" on:click=move |_| state.update(|v| v.open_view(id))>
                                                {lead.name.clone()}
                                            </button>
                                        </td>
                                        <td>{lead.company.clone().unwrap_or_default()}</td>
                                        <td>
                                            <select class="inline-select" on:change=move |ev| change_status(id, event_target_value(&ev))>
                                                {LEAD_STATUSES.iter().map(|s| {
                                                    let selected = *s == current;
                                                    view! { <option value=*s selected=selected>{humanize(s)}</option> }
                                                }).collect_view()}
                                            </select>
                                        </td>
                                        <td>{lead.conversion_status.as_deref().map(humanize).unwrap_or_default()}</td>
                                        <td class="row-actions">
                                            <Show when=move || lane == WORKING>
                                                <button class="convert-btn" on:click=move |_| open_request(id)>"Request conversion"</button>
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
                    on_prev=move |_| state.update(|v| v.prev_page(lane))
                    on_next=move |_| state.update(|v| v.next_page(lane))
                />
            </div>
        }
    };

    view! {
        <section class="list-page my-leads-page">
            <div class="list-toolbar">
                <SearchBar
                    placeholder=SEARCH_HINT
                    on_committed_change=move |term: String| state.update(|v| v.set_search(&term))
                />
                <CategoryFilter
                    options=LEAD_STATUSES
                    all_label="All statuses"
                    selected=category
                    on_change=move |value: String| state.update(|v| v.set_category(&value))
                />
            </div>

            <Show when=move || !modal.get().is_open()>
                <ErrorBanner message=error on_dismiss=move |_| state.update(|v| v.clear_error()) />
            </Show>

            <Show when=move || state.with(|v| v.is_loading())>
                <p class="loading">"Loading leads..."</p>
            </Show>

            {lane_table(WORKING, "My leads", "No leads assigned to you")}
            {lane_table(IN_REVIEW, "Sent for review", "No leads awaiting manager review")}

            {move || match modal.get() {
                ModalState::Closed | ModalState::Adding => None,
                ModalState::Viewing(_) => {
                    let lead = state.with_untracked(|v| v.selected().cloned())?;
                    Some(view! {
                        <ModalFrame title=lead.name.clone() on_close=close>
                            {lead_details(&lead)}
                        </ModalFrame>
                    }.into_any())
                }
                ModalState::Editing(_) => {
                    let lead = state.with_untracked(|v| v.selected().cloned())?;
                    Some(view! {
                        <ModalFrame title=format!("Request conversion: {}", lead.name) on_close=close>
                            <form class="record-form" on:submit=submit_request>
                                <ErrorBanner message=error on_dismiss=move |_| state.update(|v| v.clear_error()) />
                                <TextAreaField
                                    label="Message to your manager"
                                    value=Signal::derive(move || message.get())
                                    on_input=move |v: String| message.set(v)
                                />
                                <div class="form-actions">
                                    <button type="button" on:click=move |_| close.run(())>"Cancel"</button>
                                    <button type="submit">"Send request"</button>
                                </div>
                            </form>
                        </ModalFrame>
                    }.into_any())
                }
            }}
        </section>
    }
}
