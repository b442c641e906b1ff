use cursive_table_view::{TableView, TableViewItem};
use memsim::{repl::Command, report::format_usage, Table};
use resource_table::{Residency, ResourceEntry, TableKind};

use cursive::{
    view::{Nameable, Resizable},
    views::{Button, Dialog, DummyView, EditView, LinearLayout, TextView},
    Cursive,
};

const ENTRIES: u32 = 8;
const PATTERN: u8 = 0xAA;

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
enum Column {
    Id,
    State,
    Size,
    Memory,
    Swap,
}

#[derive(Debug, Clone)]
struct EntryRow {
    id: u32,
    state: &'static str,
    size: usize,
    memory: String,
    swap: String,
}

impl From<&ResourceEntry> for EntryRow {
    fn from(entry: &ResourceEntry) -> Self {
        let state = match entry.residency() {
            Residency::Empty => "empty",
            Residency::Resident => "resident",
            Residency::Swapped => "swapped",
            Residency::ResidentWithSwapCopy => "resident+swap",
        };
        EntryRow {
            id: entry.id(),
            state,
            size: entry.size(),
            memory: entry.primary().map_or("-".to_string(), |a| a.to_string()),
            swap: entry.secondary().map_or("-".to_string(), |a| a.to_string()),
        }
    }
}

impl TableViewItem<Column> for EntryRow {
    fn to_column(&self, column: Column) -> String {
        match column {
            Column::Id => self.id.to_string(),
            Column::State => self.state.to_string(),
            Column::Size => self.size.to_string(),
            Column::Memory => self.memory.clone(),
            Column::Swap => self.swap.clone(),
        }
    }

    fn cmp(&self, other: &Self, column: Column) -> std::cmp::Ordering
    where
        Self: Sized,
    {
        match column {
            Column::Size => self.size.cmp(&other.size),
            Column::State => self.state.cmp(other.state),
            _ => self.id.cmp(&other.id),
        }
    }
}

type EntriesView = TableView<EntryRow, Column>;

fn make_table() -> EntriesView {
    TableView::<EntryRow, Column>::new()
        .column(Column::Id, "Id", |c| c.width(4))
        .column(Column::State, "State", |c| c.width(14))
        .column(Column::Size, "Size", |c| c.width(8))
        .column(Column::Memory, "Memory", |c| c)
        .column(Column::Swap, "Swap", |c| c)
}

fn refresh(s: &mut Cursive) {
    let (rows, usage): (Vec<EntryRow>, String) = s
        .with_user_data(|table: &mut Table| {
            (table.iter().map(EntryRow::from).collect(), format_usage(table))
        })
        .unwrap_or_default();
    s.call_on_name("usage", |view: &mut TextView| view.set_content(usage));
    s.call_on_name("entries", |view: &mut EntriesView| {
        let selected = view.item();
        view.set_items(rows);
        if let Some(index) = selected {
            view.set_selected_item(index);
        }
    });
}

fn set_status(s: &mut Cursive, text: String) {
    s.call_on_name("status", |view: &mut TextView| view.set_content(text));
}

fn selected_id(s: &mut Cursive) -> Option<u32> {
    s.call_on_name("entries", |view: &mut EntriesView| {
        view.item()
            .and_then(|index| view.borrow_item(index))
            .map(|row| row.id)
    })
    .flatten()
}

fn execute(s: &mut Cursive, command: Command) {
    let result = s.with_user_data(|table: &mut Table| command.execute(table));
    let text = match result {
        Some(Ok(text)) => text,
        Some(Err(err)) => format!("Error: {}", err),
        None => return,
    };
    set_status(s, text);
    refresh(s);
}

fn on_selected(s: &mut Cursive, make: fn(u32) -> Command) {
    match selected_id(s) {
        Some(id) => execute(s, make(id)),
        None => set_status(s, "Select an entry first".to_string()),
    }
}

fn on_load(s: &mut Cursive) {
    let Some(id) = selected_id(s) else {
        set_status(s, "Select an entry first".to_string());
        return;
    };
    s.add_layer(
        Dialog::new()
            .title(format!("Load process {}", id))
            .content(
                EditView::new()
                    .content("1024")
                    .with_name("size")
                    .fixed_width(12),
            )
            .button("Ok", move |s| {
                let size = s
                    .call_on_name("size", |view: &mut EditView| view.get_content())
                    .and_then(|content| content.parse::<usize>().ok());
                s.pop_layer();
                match size {
                    Some(size) => execute(s, Command::Load { id, size }),
                    None => set_status(s, "Size must be a number".to_string()),
                }
            })
            .dismiss_button("Cancel"),
    );
}

fn main() {
    let mut siv = cursive::default();
    siv.add_global_callback('q', |s| s.quit());
    siv.set_user_data(Table::init(TableKind::Swapping, ENTRIES));

    let buttons = LinearLayout::vertical()
        .child(Button::new("Load", on_load))
        .child(Button::new("Release", |s| on_selected(s, Command::Release)))
        .child(Button::new("Fill", |s| {
            on_selected(s, |id| Command::Fill { id, byte: PATTERN })
        }))
        .child(Button::new("Swap out", |s| on_selected(s, Command::SwapOut)))
        .child(Button::new("Swap in", |s| on_selected(s, Command::SwapIn)))
        .child(Button::new("Discard", |s| on_selected(s, Command::Discard)))
        .child(DummyView)
        .child(Button::new("Quit", |s| s.quit()));

    let layout = LinearLayout::vertical()
        .child(
            LinearLayout::horizontal()
                .child(make_table().with_name("entries").min_size((72, 12)))
                .child(buttons),
        )
        .child(TextView::new("").with_name("usage"))
        .child(TextView::new("q to quit").with_name("status"));

    siv.add_layer(Dialog::around(layout).title("Swapping table"));
    refresh(&mut siv);
    siv.run();
}
