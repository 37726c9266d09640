//! Demo: a simulated calendar sidebar with the engine installed.

use dom::{Attr, Dom, NodeId};
use gcal_declutter::geometry::{read_height, read_offset};
use gcal_declutter::logging::{default_log_level, init_logging};
use gcal_declutter::{Config, DeclutterScript, SyncState};
use page::Page;

const URL: &str = "https://calendar.google.com/calendar/u/0/r/week";
const ROW_HEIGHT: f64 = 40.0;

fn main() {
    if let Err(err) = init_logging(default_log_level()) {
        eprintln!("logging disabled: {err}");
    }

    println!("gcal_declutter v{}\n", env!("CARGO_PKG_VERSION"));

    // 1. Host renders the sidebar
    println!("── Initial render ──");
    let mut dom = Dom::new();
    let doc = dom.document();
    let sidebar = dom.create_element("nav", Vec::new());
    dom.append_child(doc, sidebar);
    render_section(&mut dom, sidebar, &["Alex Doe", "Birthdays", "Family", "Tasks"]);

    let script = match DeclutterScript::new(Config::default()) {
        Ok(script) => script,
        Err(err) => {
            eprintln!("invalid config: {err}");
            std::process::exit(1);
        }
    };
    let mut page = Page::new(URL, dom);
    if !page.install(script) {
        eprintln!("script does not apply to {URL}");
        std::process::exit(1);
    }
    page.run_until_idle();
    print_list(&page);

    // 2. Host re-renders the section from scratch
    println!("\n── Host re-render ──");
    page.post_host_task(move |dom| {
        for old in dom.element_children(sidebar) {
            dom.destroy(old);
        }
        render_section(dom, sidebar, &["Alex Doe", "Tasks", "Birthdays", "Work", "Family"]);
    });
    let outcome = page.run_until_idle();
    println!("   {} tasks, settled: {}", outcome.tasks_run, outcome.settled);
    print_list(&page);

    let stats = page.scripts()[0].coordinator().stats();
    println!("\n── Stats ──");
    println!("   binds/unbinds:      {}/{}", stats.binds, stats.unbinds);
    println!("   filter passes:      {}", stats.filter_passes);
    println!("   repack passes:      {}", stats.repack_passes);
    println!("   rows removed:       {}", stats.rows_removed);
    println!("   records suppressed: {}", stats.records_suppressed);
}

/// `[role=list][aria-label="My calendars"]` with one positioned row per label.
fn render_section(dom: &mut Dom, parent: NodeId, labels: &[&str]) {
    let height = format!("height: {}px", ROW_HEIGHT * labels.len() as f64);
    let list = dom.create_element(
        "div",
        vec![
            Attr::new("role", "list"),
            Attr::new("aria-label", "My calendars"),
            Attr::new("style", &height),
        ],
    );
    for (i, label) in labels.iter().enumerate() {
        let style = format!("transform: translateY({}px)", i as f64 * ROW_HEIGHT);
        let row = dom.create_element("div", vec![Attr::new("role", "listitem"), Attr::new("style", &style)]);
        let span = dom.create_element("span", vec![Attr::new("data-text", label)]);
        let text = dom.create_text(label);
        dom.append_child(span, text);
        dom.append_child(row, span);
        dom.append_child(list, row);
    }
    dom.append_child(parent, list);
}

fn print_list(page: &Page<DeclutterScript>) {
    let SyncState::Bound(list) = page.scripts()[0].coordinator().state() else {
        println!("   (no list bound)");
        return;
    };
    let dom = page.dom();
    for row in dom.element_children(list) {
        let offset = read_offset(dom, row).map_or("-".to_string(), |y| format!("{y}px"));
        println!("   {:>6}  {}", offset, dom.text_content(row).trim());
    }
    match read_height(dom, list) {
        Some(h) => println!("   height {h}px"),
        None => println!("   height -"),
    }
}
