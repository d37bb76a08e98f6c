use std::fmt::Write as _;

use client_core::{ListItem, ListState, Settings};
use shared::{
    domain::ResourceKind,
    protocol::{CategoryRef, Question},
};

const UNKNOWN_CATEGORY: &str = "?";

pub fn render_state(
    state: &ListState<Question>,
    resource: ResourceKind,
    show_answers: bool,
) -> String {
    let mut out = String::new();
    let mut title = resource.collection().to_string();
    if let Some(first) = title.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    let _ = write!(out, "{title} ({})", state.total_count);
    match (&state.active_category, &state.search_term) {
        (_, Some(term)) => {
            let _ = write!(out, " matching \"{term}\"");
        }
        (Some(CategoryRef::Id(id)), None) => {
            let label = state.category_label(*id).unwrap_or(UNKNOWN_CATEGORY);
            let _ = write!(out, " in {label}");
        }
        (Some(CategoryRef::Label(label)), None) => {
            let _ = write!(out, " in {label}");
        }
        (None, None) => {}
    }
    out.push('\n');

    for item in &state.items {
        // Stale items can point at categories the last fetch no longer lists.
        let category = item
            .category()
            .and_then(|id| state.category_label(id).ok())
            .unwrap_or(UNKNOWN_CATEGORY);
        let _ = writeln!(
            out,
            "  #{} [{category}] difficulty {}: {}",
            item.id(),
            item.difficulty,
            item.question
        );
        if show_answers {
            let _ = writeln!(out, "      answer: {}", item.answer);
        }
    }

    let pages: Vec<String> = state
        .pagination_labels()
        .map(|label| {
            if label.active {
                format!("[{}]", label.number)
            } else {
                label.number.to_string()
            }
        })
        .collect();
    if !pages.is_empty() {
        let _ = writeln!(out, "Pages: {}", pages.join(" "));
    }
    out
}

pub fn render_categories<T>(state: &ListState<T>) -> String {
    let mut out = String::new();
    for category in &state.categories {
        let _ = writeln!(out, "  {:>3}  {}", category.id.0, category.label);
    }
    out
}

pub fn render_settings(settings: &Settings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "api_server_url = {}", settings.base_url());
    match &settings.auth {
        Some(auth) => {
            let _ = writeln!(out, "auth_tenant    = {}", auth.tenant_url());
            let _ = writeln!(out, "auth_audience  = {}", auth.audience);
            let _ = writeln!(out, "auth_client_id = {}", auth.client_id);
            if let Some(callback) = &auth.callback_url {
                let _ = writeln!(out, "auth_callback  = {callback}");
            }
        }
        None => {
            let _ = writeln!(out, "auth           = (not configured)");
        }
    }
    out
}
