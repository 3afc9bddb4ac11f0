//! The to-do manager as a Larch application: messages come from the menu or
//! from a subcommand, the model owns the list, and the view is the text shown
//! back to the user.
use std::path::PathBuf;

use colored::*;

use crate::larch::LarchMinimal;
use crate::search::Pattern;
use crate::todo::{TodoItem, TodoList};

pub struct TodoApp;

pub struct Flags {
    pub path: PathBuf,
    /// Save after every successful mutation.
    pub autosave: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Create(String),
    Finish(String),
    Edit { title: String, new_title: String },
    Delete(String),
    Save,
    Show,
    Search(Pattern),
    Exit,
    Unknown(String),
}

/// Outcome of a message, waiting to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Added(String),
    Completed(String),
    Edited { from: String, to: String },
    Deleted(String),
    NotFound(String),
    EmptyTitle,
    Saved(PathBuf),
    SaveFailed(String),
    Listing,
    Matches(Vec<usize>),
    InvalidPattern(String),
    InvalidChoice(String),
    Bye { unsaved: bool },
}
impl Notice {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Notice::NotFound(_)
                | Notice::EmptyTitle
                | Notice::SaveFailed(_)
                | Notice::InvalidPattern(_)
                | Notice::InvalidChoice(_)
        )
    }
}

#[derive(Debug)]
pub struct Model {
    pub list: TodoList,
    pub path: PathBuf,
    pub autosave: bool,
    pub running: bool,
    /// Changes not yet written to `path`.
    pub dirty: bool,
    /// `path` holds something that could not be loaded; autosave must not
    /// replace it.
    pub keep_existing: bool,
    notices: Vec<Notice>,
}
impl Model {
    pub fn new(list: TodoList, flags: Flags) -> Model {
        Model {
            list,
            path: flags.path,
            autosave: flags.autosave,
            running: true,
            dirty: false,
            keep_existing: false,
            notices: vec![],
        }
    }
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
    /// Whether any pending notice reports a failed operation.
    pub fn has_failures(&self) -> bool {
        self.notices.iter().any(Notice::is_failure)
    }
    pub fn clear_notices(&mut self) {
        self.notices.clear();
    }
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
    fn changed(&mut self) -> Option<Msg> {
        self.dirty = true;
        if self.autosave {
            Some(Msg::Save)
        } else {
            None
        }
    }
}

impl LarchMinimal for TodoApp {
    type Flags = Flags;
    type Model = Model;
    type Msg = Msg;
    type View = String;

    /// Loads the backing file. A missing or unreadable file is not fatal,
    /// the session starts from an empty list.
    fn init(flags: Self::Flags) -> Self::Model {
        let (list, keep_existing) = match TodoList::load(&flags.path) {
            Ok(list) => {
                log::info!("loaded {} item(s) from {}", list.len(), flags.path.display());
                (list, false)
            }
            Err(e) if e.is_missing_file() => {
                log::info!("{} does not exist yet, starting empty", flags.path.display());
                (TodoList::new(), false)
            }
            Err(e) => {
                log::warn!("Failed to load to-do list: {}", e);
                (TodoList::new(), true)
            }
        };
        let mut model = Model::new(list, flags);
        model.keep_existing = keep_existing;
        model
    }

    fn update(
        msg: Self::Msg,
        mut model: Self::Model,
    ) -> Result<(Self::Model, Option<Self::Msg>), anyhow::Error> {
        log::debug!("update: {:?}", msg);
        let follow_up = match msg {
            Msg::Create(title) => {
                if title.trim().is_empty() {
                    model.notify(Notice::EmptyTitle);
                    None
                } else {
                    model.list.add(TodoItem::new(&title));
                    model.notify(Notice::Added(title));
                    model.changed()
                }
            }
            Msg::Finish(title) => match model.list.complete(&title) {
                Ok(()) => {
                    model.notify(Notice::Completed(title));
                    model.changed()
                }
                Err(_) => {
                    model.notify(Notice::NotFound(title));
                    None
                }
            },
            Msg::Edit { title, new_title } => {
                if model.list.find_index(&title).is_none() {
                    model.notify(Notice::NotFound(title));
                    None
                } else if new_title.trim().is_empty() {
                    model.notify(Notice::EmptyTitle);
                    None
                } else {
                    model.list.rename(&title, &new_title)?;
                    model.notify(Notice::Edited {
                        from: title,
                        to: new_title,
                    });
                    model.changed()
                }
            }
            Msg::Delete(title) => match model.list.remove(&title) {
                Ok(_) => {
                    model.notify(Notice::Deleted(title));
                    model.changed()
                }
                Err(_) => {
                    model.notify(Notice::NotFound(title));
                    None
                }
            },
            Msg::Save if model.autosave && model.keep_existing => {
                let reason = format!(
                    "{} could not be loaded, not overwriting it",
                    model.path.display()
                );
                log::error!("Failed to save to-do list: {}", reason);
                model.notify(Notice::SaveFailed(reason));
                None
            }
            Msg::Save => {
                match model.list.save(&model.path) {
                    Ok(()) => {
                        model.dirty = false;
                        let path = model.path.clone();
                        model.notify(Notice::Saved(path));
                    }
                    Err(e) => {
                        log::error!("Failed to save to-do list: {}", e);
                        model.notify(Notice::SaveFailed(e.to_string()));
                    }
                }
                None
            }
            Msg::Show => {
                model.notify(Notice::Listing);
                None
            }
            Msg::Search(pattern) => {
                match pattern.compile() {
                    Ok(matcher) => {
                        let hits = model
                            .list
                            .search(&matcher)
                            .into_iter()
                            .map(|(index, _)| index)
                            .collect();
                        model.notify(Notice::Matches(hits));
                    }
                    Err(e) => model.notify(Notice::InvalidPattern(e.to_string())),
                }
                None
            }
            Msg::Exit => {
                model.running = false;
                let unsaved = model.dirty;
                model.notify(Notice::Bye { unsaved });
                None
            }
            Msg::Unknown(input) => {
                model.notify(Notice::InvalidChoice(input));
                None
            }
        };
        Ok((model, follow_up))
    }

    fn view(model: &Self::Model) -> Self::View {
        let mut out = String::new();
        for notice in model.notices() {
            out.push_str(&render_notice(notice, &model.list));
        }
        out
    }
}

fn render_notice(notice: &Notice, list: &TodoList) -> String {
    let ok = "✓".green();
    let fail = "✗".red();
    match notice {
        Notice::Added(title) => format!("{} New item {} added to the list.\n", ok, title.cyan()),
        Notice::Completed(title) => format!("{} Item {} has been completed.\n", ok, title.cyan()),
        Notice::Edited { from, to } => format!(
            "{} Item {} has been edited ==> New Title: {}\n",
            ok,
            from.cyan(),
            to.cyan()
        ),
        Notice::Deleted(title) => format!("{} Item {} has been deleted.\n", ok, title.cyan()),
        Notice::NotFound(title) => format!("{} Item {} was not found.\n", fail, title.cyan()),
        Notice::EmptyTitle => format!("{} A title cannot be empty.\n", fail),
        Notice::Saved(path) => format!("To-Do list saved to {}.\n", path.display()),
        Notice::SaveFailed(reason) => format!("{} Could not save: {}\n", fail, reason),
        Notice::Listing => render_list(list),
        Notice::Matches(hits) => {
            if hits.is_empty() {
                return "No items match.\n".to_string();
            }
            hits.iter()
                .filter_map(|&index| list.items().get(index).map(|item| (index, item)))
                .map(|(index, item)| render_item(index, item))
                .collect()
        }
        Notice::InvalidPattern(reason) => format!("{} {}\n", fail, reason),
        Notice::InvalidChoice(input) => format!("Invalid choice: {:?}\n", input),
        Notice::Bye { unsaved } => {
            if *unsaved {
                format!("{}\nBye Bye\n", "Unsaved changes were discarded.".yellow())
            } else {
                "Bye Bye\n".to_string()
            }
        }
    }
}

fn render_item(index: usize, item: &TodoItem) -> String {
    let status = if item.completed {
        item.status().green()
    } else {
        item.status().red()
    };
    format!(
        "{}. Title: {} - Status: {}\n",
        (index + 1).to_string().bright_yellow(),
        item.title.cyan(),
        status
    )
}

pub fn render_list(list: &TodoList) -> String {
    if list.is_empty() {
        return "Your to-do list is empty.\n".to_string();
    }
    let mut out: String = list
        .iter()
        .enumerate()
        .map(|(index, item)| render_item(index, item))
        .collect();
    out.push_str(&format!(
        "{} of {} completed\n",
        list.completed_count(),
        list.len()
    ));
    out
}
