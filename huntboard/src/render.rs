use std::fmt::Write;

use huntboard_nav::{
    Browser, BrowserConfig, ChatRole, ChatStatus, Item, LoadStatus, Pane,
    PaneContent, Strategy, View, find_item, find_sub_view, find_view,
    metadata_summary,
};

use crate::host::ParentSelection;

/// Text rendering of the browser's current pane plan.
pub(crate) fn render(browser: &Browser, parent: &ParentSelection) -> String {
    let mut out = String::new();
    let plan = browser.plan();
    let strategy = match plan.strategy {
        Strategy::SideBySide => "side by side",
        Strategy::Paged => "paged",
    };

    let _ = writeln!(
        out,
        "== {} | {strategy} | parent jobs={} threads={}",
        browser.context(),
        parent.jobs.as_deref().unwrap_or("-"),
        parent.threads.as_deref().unwrap_or("-"),
    );

    for pane in &plan.panes {
        render_pane(&mut out, browser, pane);
    }

    out
}

fn render_pane(out: &mut String, browser: &Browser, pane: &Pane) {
    let config = browser.config();
    let items = browser.machine().items();
    let width = match pane.width_percent {
        Some(percent) => format!("{percent:.0}%"),
        None => String::from("page"),
    };

    match &pane.content {
        PaneContent::List { selected_item_id } => {
            let _ = writeln!(
                out,
                "-- {} [{width}] {} {}",
                config.labels.list_title,
                items.len(),
                config.labels.list_count
            );
            match browser.load_status() {
                LoadStatus::Loading => {
                    let _ = writeln!(out, "   loading...");
                },
                LoadStatus::Failed(message) => {
                    let _ = writeln!(out, "   ! {message}");
                },
                LoadStatus::Idle | LoadStatus::Loaded => {},
            }
            for item in items {
                let selected =
                    selected_item_id.as_deref() == Some(item.id.as_str());
                let marker = if selected { '>' } else { ' ' };
                let _ = writeln!(
                    out,
                    " {marker} {}  {}{}",
                    item.id,
                    item.title,
                    summary(item, config)
                );
            }
        },
        PaneContent::EmptyPrompt => {
            let _ = writeln!(
                out,
                "-- {} [{width}]\n   {}",
                config.labels.no_item_selected, config.labels.select_prompt
            );
        },
        PaneContent::ItemDetail {
            item_id,
            selected_view_id,
        } => {
            let Some(item) = find_item(items, item_id) else {
                return;
            };
            let _ = writeln!(out, "-- {} [{width}]", item.title);
            if !item.description.is_empty() {
                let _ = writeln!(out, "   {}", item.description);
            }
            let _ = writeln!(out, "   {}:", config.labels.more_info);
            render_view_list(out, &item.views, selected_view_id.as_deref());
        },
        PaneContent::ViewDetail {
            item_id,
            view_id,
            selected_sub_view_id,
            chat_thread_id,
        } => {
            let Some(view) = find_item(items, item_id)
                .and_then(|item| find_view(item, view_id))
            else {
                return;
            };
            let _ = writeln!(
                out,
                "-- {} [{width}] ({})",
                view.title, config.labels.back_to_detail
            );
            if chat_thread_id.is_some() {
                render_chat(out, browser);
            } else {
                render_content(out, view);
            }
            if !view.sub_views.is_empty() {
                let _ = writeln!(out, "   {}:", config.labels.more_details);
                render_view_list(
                    out,
                    &view.sub_views,
                    selected_sub_view_id.as_deref(),
                );
            }
        },
        PaneContent::SubViewDetail {
            view_id,
            sub_view_id,
        } => {
            let Some(sub_view) = browser
                .machine()
                .selected_item()
                .and_then(|item| find_view(item, view_id))
                .and_then(|view| find_sub_view(view, sub_view_id))
            else {
                return;
            };
            let _ = writeln!(out, "-- {} [{width}]", sub_view.title);
            render_content(out, sub_view);
        },
    }
}

fn summary(item: &Item, config: &BrowserConfig) -> String {
    match metadata_summary(item, &config.metadata_fields) {
        Some(summary) if !summary.headline.is_empty() => {
            format!("  | {} {}", summary.headline, summary.details)
                .trim_end()
                .to_string()
        },
        _ => String::new(),
    }
}

fn render_view_list(out: &mut String, views: &[View], selected: Option<&str>) {
    for view in views {
        let marker = if selected == Some(view.id.as_str()) { '>' } else { ' ' };
        let _ = writeln!(out, " {marker} {}  {}", view.id, view.title);
    }
}

fn render_content(out: &mut String, view: &View) {
    for line in view.content.lines() {
        let _ = writeln!(out, "   {line}");
    }
}

fn render_chat(out: &mut String, browser: &Browser) {
    let chat = browser.chat();
    for message in chat.messages() {
        let sender = match message.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "them",
            ChatRole::System => "system",
        };
        let _ = writeln!(out, "   {sender}: {}", message.content);
    }
    if let Some(draft) = chat.draft() {
        let _ = writeln!(out, "   them: {draft}...");
    }
    match chat.status() {
        ChatStatus::Loading => {
            let _ = writeln!(out, "   loading history...");
        },
        ChatStatus::Failed(message) => {
            let _ = writeln!(out, "   ! {message}");
        },
        ChatStatus::Idle | ChatStatus::Ready | ChatStatus::Streaming => {},
    }
}
