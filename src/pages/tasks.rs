//! Tasks Page
//!
//! Managers create, edit, assign and delete tasks. Employees only see the
//! tasks assigned to them and move them through their statuses.

use chrono::NaiveDate;
use leptos::prelude::*;

use crm_listview::entity::{TASK_PRIORITIES, TASK_STATUSES};
use crm_listview::{
    lookup, ConfirmedDelete, Employee, Lead, ListView, ModalState, MutationCoordinator, Resource,
    Role, StatusPatch, Task, TaskDraft,
};

use crate::components::{
    enum_options, humanize, CategoryFilter, DeleteConfirmButton, ErrorBanner, ModalFrame, Pager,
    SearchBar, SelectField, TextAreaField, TextField,
};
use crate::context::use_app_context;
use crate::list_page::{optional, optional_id, spawn_lookup, spawn_mutation, spawn_reload};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `<input type="date">` value; anything unparseable clears the date
fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Lead name from the loaded lead list, falling back to the embedded reference
fn lead_name(task: &Task, leads: &[Lead]) -> String {
    task.lead
        .as_ref()
        .map(|lead_ref| {
            lookup(leads, &lead_ref.id)
                .map(|lead| lead.name.clone())
                .unwrap_or_else(|| lead_ref.name.clone())
        })
        .unwrap_or_default()
}

#[component]
pub fn TasksPage(role: Role) -> impl IntoView {
    let ctx = use_app_context();
    let fetch_size = ctx.config().fetch_page_size;
    let state = RwSignal::new(ListView::<Task>::new(ctx.config().view_page_size));
    let leads = RwSignal::new(Vec::<Lead>::new());
    let employees = RwSignal::new(Vec::<Employee>::new());
    let draft = RwSignal::new(TaskDraft::default());
    let can_manage = role == Role::Manager;

    Effect::new(move |_| {
        spawn_reload(ctx, state, role);
        if can_manage {
            spawn_lookup(ctx, leads, Lead::collection_path(role));
            spawn_lookup(ctx, employees, Employee::collection_path(role));
        }
    });

    let page = Memo::new(move |_| state.with(|v| v.page(0)));
    let modal = Memo::new(move |_| state.with(|v| *v.modal()));
    let error = Signal::derive(move || state.with(|v| v.error().map(str::to_string)));
    let category = Signal::derive(move || state.with(|v| v.category().to_string()));
    let lead_options = Signal::derive(move || {
        leads.with(|list| {
            list.iter()
                .map(|l| (l.id.to_string(), l.name.clone()))
                .collect::<Vec<_>>()
        })
    });
    let employee_options = Signal::derive(move || {
        employees.with(|list| {
            list.iter()
                .map(|e| (e.id.to_string(), e.name.clone()))
                .collect::<Vec<_>>()
        })
    });

    let open_add = move |_| {
        draft.set(TaskDraft::default());
        state.update(|v| v.open_add());
    };

    let open_edit = move |id: i64| {
        let found = state.with_untracked(|v| v.records().iter().find(|t| t.id == id).cloned());
        if let Some(task) = found {
            draft.set(TaskDraft::from(&task));
            state.update(|v| v.open_edit(id));
        }
    };

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let payload = draft.get_untracked();
        let reset = move || draft.set(TaskDraft::default());
        match modal.get_untracked() {
            ModalState::Adding => spawn_mutation(
                ctx,
                state,
                move |api| async move {
                    MutationCoordinator::new(&api, role, fetch_size)
                        .create::<Task, _>(&payload)
                        .await
                },
                reset,
            ),
            ModalState::Editing(id) => spawn_mutation(
                ctx,
                state,
                move |api| async move {
                    MutationCoordinator::new(&api, role, fetch_size)
                        .update::<Task, _>(id, &payload)
                        .await
                },
                reset,
            ),
            _ => {}
        }
    };

    let change_status = move |id: i64, value: String| {
        let patch = match StatusPatch::checked(&value, TASK_STATUSES) {
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
                    .change_status::<Task>(id, &patch)
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
                    .delete::<Task>(confirmed)
                    .await
            },
            || {},
        );
    });

    let close = Callback::new(move |_: ()| state.update(|v| v.close_modal()));

    view! {
        <section class="list-page tasks-page">
            <div class="list-toolbar">
                <SearchBar
                    placeholder="Search by title, status, priority, lead or assignee..."
                    on_committed_change=move |term: String| state.update(|v| v.set_search(&term))
                />
                <CategoryFilter
                    options=TASK_STATUSES
                    all_label="All statuses"
                    selected=category
                    on_change=move |value: String| state.update(|v| v.set_category(&value))
                />
                <Show when=move || can_manage>
                    <button class="add-btn" on:click=open_add>"+ Add task"</button>
                </Show>
            </div>

            <Show when=move || !modal.get().is_open()>
                <ErrorBanner message=error on_dismiss=move |_| state.update(|v| v.clear_error()) />
            </Show>

            <Show when=move || state.with(|v| v.is_loading())>
                <p class="loading">"Loading tasks..."</p>
            </Show>

            <table class="list-table">
                <thead>
                    <tr>
                        <th>"Title"</th>
                        <th>"Lead"</th>
                        <th>"Priority"</th>
                        <th>"Due"</th>
                        <th>"Status"</th>
                        <th>{if can_manage { "Assigned to" } else { "Assigned by" }}</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let rows = page.get().items;
                        if rows.is_empty() {
                            return view! { <tr><td colspan="7" class="empty-row">"No tasks found"</td></tr> }.into_any();
                        }
                        rows.into_iter().map(|task| {
                            let id = task.id;
                            let lead = leads.with(|list| lead_name(&task, list));
                            let current = task.status.clone().unwrap_or_default();
                            let person = if can_manage { &task.assigned_to } else { &task.assigned_by };
                            let person = person.as_ref().map(|u| u.name.clone()).unwrap_or_default();
                            view! {
                                <tr>
                                    <td>
                                        <button class="link-btn" on:click=move |_| state.update(|v| v.open_view(id))>
                                            {task.title.clone()}
                                        </button>
                                    </td>
                                    <td>{lead}</td>
                                    <td>{task.priority.as_deref().map(humanize).unwrap_or_default()}</td>
                                    <td>{task.due_date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()}</td>
                                    <td>
                                        <select class="inline-select" on:change=move |ev| change_status(id, event_target_value(&ev))>
                                            {TASK_STATUSES.iter().map(|s| {
                                                let selected = *s == current;
                                                view! { <option value=*s selected=selected>{humanize(s)}</option> }
                                            }).collect_view()}
                                        </select>
                                    </td>
                                    <td>{person}</td>
                                    <td class="row-actions">
                                        <Show when=move || can_manage>
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
                    let task = state.with_untracked(|v| v.selected().cloned())?;
                    let lead = leads.with_untracked(|list| lead_name(&task, list));
                    Some(view! {
                        <ModalFrame title=task.title.clone() on_close=close>
                            <dl class="detail-list">
                                <dt>"Description"</dt><dd>{task.description.clone().unwrap_or_default()}</dd>
                                <dt>"Lead"</dt><dd>{lead}</dd>
                                <dt>"Status"</dt><dd>{task.status.as_deref().map(humanize).unwrap_or_default()}</dd>
                                <dt>"Priority"</dt><dd>{task.priority.as_deref().map(humanize).unwrap_or_default()}</dd>
                                <dt>"Due"</dt><dd>{task.due_date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()}</dd>
                                <dt>"Assigned to"</dt><dd>{task.assigned_to.as_ref().map(|u| u.name.clone()).unwrap_or_default()}</dd>
                                <dt>"Assigned by"</dt><dd>{task.assigned_by.as_ref().map(|u| u.name.clone()).unwrap_or_default()}</dd>
                            </dl>
                        </ModalFrame>
                    }.into_any())
                }
                current => {
                    let title = if current == ModalState::Adding { "Add task" } else { "Edit task" };
                    Some(view! {
                        <ModalFrame title=title on_close=close>
                            <form class="record-form" on:submit=save>
                                <ErrorBanner message=error on_dismiss=move |_| state.update(|v| v.clear_error()) />
                                <TextField
                                    label="Title"
                                    value=Signal::derive(move || draft.with(|d| d.title.clone()))
                                    on_input=move |v: String| draft.update(|d| d.title = v)
                                />
                                <TextAreaField
                                    label="Description"
                                    value=Signal::derive(move || draft.with(|d| d.description.clone().unwrap_or_default()))
                                    on_input=move |v: String| draft.update(|d| d.description = optional(v))
                                />
                                <SelectField
                                    label="Status"
                                    options=Signal::derive(|| enum_options(TASK_STATUSES))
                                    selected=Signal::derive(move || draft.with(|d| d.status.clone()))
                                    on_change=move |v: String| draft.update(|d| d.status = v)
                                />
                                <SelectField
                                    label="Priority"
                                    options=Signal::derive(|| enum_options(TASK_PRIORITIES))
                                    selected=Signal::derive(move || draft.with(|d| d.priority.clone()))
                                    on_change=move |v: String| draft.update(|d| d.priority = v)
                                />
                                <TextField
                                    label="Due date"
                                    input_type="date"
                                    value=Signal::derive(move || draft.with(|d| d.due_date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()))
                                    on_input=move |v: String| draft.update(|d| d.due_date = parse_date(&v))
                                />
                                <SelectField
                                    label="Lead"
                                    options=lead_options
                                    selected=Signal::derive(move || draft.with(|d| d.lead_id.map(|id| id.to_string()).unwrap_or_default()))
                                    on_change=move |v: String| draft.update(|d| d.lead_id = optional_id(&v))
                                    empty_label="No lead"
                                />
                                <SelectField
                                    label="Assign to"
                                    options=employee_options
                                    selected=Signal::derive(move || draft.with(|d| d.assigned_to_id.map(|id| id.to_string()).unwrap_or_default()))
                                    on_change=move |v: String| draft.update(|d| d.assigned_to_id = optional_id(&v))
                                    empty_label="Select an employee"
                                />
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
