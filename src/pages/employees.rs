//! Employees Page
//!
//! Admin directory of employees: department filter, search, add/edit/delete.

use leptos::prelude::*;

use crm_listview::entity::DEPARTMENTS;
use crm_listview::{
    ConfirmedDelete, Employee, EmployeeDraft, ListView, ModalState, MutationCoordinator, Role,
};

use crate::components::{
    enum_options, humanize, CategoryFilter, DeleteConfirmButton, ErrorBanner, ModalFrame, Pager,
    SearchBar, SelectField, TextField,
};
use crate::context::use_app_context;
use crate::list_page::{optional, spawn_mutation, spawn_reload};

const ROLES: &[&str] = &["ADMIN", "MANAGER", "EMPLOYEE"];

#[component]
pub fn EmployeesPage(role: Role) -> impl IntoView {
    let ctx = use_app_context();
    let fetch_size = ctx.config().fetch_page_size;
    let state = RwSignal::new(ListView::<Employee>::new(ctx.config().view_page_size));
    let draft = RwSignal::new(EmployeeDraft::default());

    // Load on mount
    Effect::new(move |_| spawn_reload(ctx, state, role));

    let page = Memo::new(move |_| state.with(|v| v.page(0)));
    let modal = Memo::new(move |_| state.with(|v| *v.modal()));
    let error = Signal::derive(move || state.with(|v| v.error().map(str::to_string)));
    let category = Signal::derive(move || state.with(|v| v.category().to_string()));

    let open_add = move |_| {
        draft.set(EmployeeDraft {
            role: Some(Role::Employee),
            ..EmployeeDraft::default()
        });
        state.update(|v| v.open_add());
    };

    let open_edit = move |id: i64| {
        let found = state.with_untracked(|v| v.records().iter().find(|e| e.id == id).cloned());
        if let Some(employee) = found {
            draft.set(EmployeeDraft::from(&employee));
            state.update(|v| v.open_edit(id));
        }
    };

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let payload = draft.get_untracked();
        let reset = move || draft.set(EmployeeDraft::default());
        match modal.get_untracked() {
            ModalState::Adding => spawn_mutation(
                ctx,
                state,
                move |api| async move {
                    MutationCoordinator::new(&api, role, fetch_size)
                        .create::<Employee, _>(&payload)
                        .await
                },
                reset,
            ),
            ModalState::Editing(id) => spawn_mutation(
                ctx,
                state,
                move |api| async move {
                    MutationCoordinator::new(&api, role, fetch_size)
                        .update::<Employee, _>(id, &payload)
                        .await
                },
                reset,
            ),
            _ => {}
        }
    };

    let on_delete = Callback::new(move |confirmed: ConfirmedDelete| {
        spawn_mutation(
            ctx,
            state,
            move |api| async move {
                MutationCoordinator::new(&api, role, fetch_size)
                    .delete::<Employee>(confirmed)
                    .await
            },
            || {},
        );
    });

    let close = Callback::new(move |_: ()| state.update(|v| v.close_modal()));

    view! {
        <section class="list-page employees-page">
            <div class="list-toolbar">
                <SearchBar
                    placeholder="Search by name, email, phone, department or role..."
                    on_committed_change=move |term: String| state.update(|v| v.set_search(&term))
                />
                <CategoryFilter
                    options=DEPARTMENTS
                    all_label="All departments"
                    selected=category
                    on_change=move |value: String| state.update(|v| v.set_category(&value))
                />
                <button class="add-btn" on:click=open_add>"+ Add employee"</button>
            </div>

            <Show when=move || !modal.get().is_open()>
                <ErrorBanner message=error on_dismiss=move |_| state.update(|v| v.clear_error()) />
            </Show>

            <Show when=move || state.with(|v| v.is_loading())>
                <p class="loading">"Loading employees..."</p>
            </Show>

            <table class="list-table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Email"</th>
                        <th>"Phone"</th>
                        <th>"Department"</th>
                        <th>"Role"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let rows = page.get().items;
                        if rows.is_empty() {
                            view! { <tr><td colspan="6" class="empty-row">"No employees found"</td></tr> }.into_any()
                        } else {
                            rows.into_iter().map(|employee| {
                                let id = employee.id;
                                view! {
                                    <tr>
                                        <td>
                                            <button class="link-btn" on:click=move |_| state.update(|v| v.open_view(id))>
                                                {employee.name.clone()}
                                            </button>
                                        </td>
                                        <td>{employee.email.clone()}</td>
                                        <td>{employee.phone.clone().unwrap_or_default()}</td>
                                        <td>{employee.department.as_deref().map(humanize).unwrap_or_default()}</td>
                                        <td>{employee.role.map(|r| humanize(r.as_str())).unwrap_or_default()}</td>
                                        <td class="row-actions">
                                            <button class="edit-btn" on:click=move |_| open_edit(id)>"Edit"</button>
                                            <DeleteConfirmButton id=id on_confirm=on_delete />
                                        </td>
                                    </tr>
                                }
                            }).collect_view().into_any()
                        }
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
                    let employee = state.with_untracked(|v| v.selected().cloned())?;
                    Some(view! {
                        <ModalFrame title=employee.name.clone() on_close=close>
                            <dl class="detail-list">
                                <dt>"Email"</dt><dd>{employee.email.clone()}</dd>
                                <dt>"Phone"</dt><dd>{employee.phone.clone().unwrap_or_default()}</dd>
                                <dt>"Department"</dt><dd>{employee.department.clone().unwrap_or_default()}</dd>
                                <dt>"Role"</dt><dd>{employee.role.map(|r| r.to_string()).unwrap_or_default()}</dd>
                                <dt>"Joined"</dt>
                                <dd>{employee.created_at.map(|t| t.format("%Y-%m-%d").to_string()).unwrap_or_default()}</dd>
                            </dl>
                        </ModalFrame>
                    }.into_any())
                }
                current => {
                    let adding = current == ModalState::Adding;
                    let title = if adding { "Add employee" } else { "Edit employee" };
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
                                <SelectField
                                    label="Department"
                                    options=Signal::derive(|| enum_options(DEPARTMENTS))
                                    selected=Signal::derive(move || draft.with(|d| d.department.clone().unwrap_or_default()))
                                    on_change=move |v: String| draft.update(|d| d.department = optional(v))
                                    empty_label="No department"
                                />
                                <SelectField
                                    label="Role"
                                    options=Signal::derive(|| enum_options(ROLES))
                                    selected=Signal::derive(move || draft.with(|d| d.role.map(|r| r.as_str().to_string()).unwrap_or_default()))
                                    on_change=move |v: String| draft.update(|d| d.role = Role::parse(&v))
                                />
                                <Show when=move || adding>
                                    <TextField
                                        label="Initial password"
                                        input_type="password"
                                        value=Signal::derive(move || draft.with(|d| d.password.clone().unwrap_or_default()))
                                        on_input=move |v: String| draft.update(|d| d.password = optional(v))
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
