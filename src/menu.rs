//! Interactive numbered menu on top of [`TodoApp`].
use std::io::{BufRead, Write};

use colored::*;

use crate::app::{Model, Msg, TodoApp};
use crate::larch::LarchMinimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Create,
    Finish,
    Edit,
    Delete,
    Save,
    Show,
    Exit,
}
impl Choice {
    pub fn parse(input: &str) -> Option<Choice> {
        use Choice::*;
        match input.trim() {
            "1" => Some(Create),
            "2" => Some(Finish),
            "3" => Some(Edit),
            "4" => Some(Delete),
            "5" => Some(Save),
            "6" => Some(Show),
            "7" => Some(Exit),
            _ => None,
        }
    }
}

fn render_menu() -> String {
    format!(
        "\n{}\n\
         1. Create new ToDo\n\
         2. Finish A ToDo\n\
         3. Edit A ToDo\n\
         4. Delete A ToDo\n\
         5. Save\n\
         6. Show My ToDo List\n\
         7. Exit\n",
        "ToDo App".bold()
    )
}

/// Prints `label` and reads one trimmed line. `None` at end of input. Bytes
/// that are not UTF-8 become U+FFFD instead of ending the session.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> std::io::Result<Option<String>> {
    write!(out, "{}", label)?;
    out.flush()?;
    let mut line = Vec::new();
    if input.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
}

/// Reads the arguments a choice needs and builds its message. `None` at end
/// of input.
fn read_msg<R: BufRead, W: Write>(
    choice: Choice,
    model: &Model,
    input: &mut R,
    out: &mut W,
) -> std::io::Result<Option<Msg>> {
    let msg = match choice {
        Choice::Create => prompt(input, out, "Enter a title: ")?.map(Msg::Create),
        Choice::Finish => {
            prompt(input, out, "Enter the title you want completed: ")?.map(Msg::Finish)
        }
        Choice::Edit => match prompt(input, out, "Enter the title you want to edit: ")? {
            None => None,
            // a miss is reported before the new title is looked at
            Some(title) if model.list.find_index(&title).is_none() => Some(Msg::Edit {
                title,
                new_title: String::new(),
            }),
            Some(title) => prompt(input, out, "Enter the new title: ")?
                .map(|new_title| Msg::Edit { title, new_title }),
        },
        Choice::Delete => {
            prompt(input, out, "Enter the title you want deleted: ")?.map(Msg::Delete)
        }
        Choice::Save => Some(Msg::Save),
        Choice::Show => Some(Msg::Show),
        Choice::Exit => Some(Msg::Exit),
    };
    Ok(msg)
}

/// Runs the menu until the exit choice or end of input, and hands the final
/// model back.
pub fn run<R: BufRead, W: Write>(
    model: Model,
    input: &mut R,
    out: &mut W,
) -> Result<Model, anyhow::Error> {
    let mut model = model;
    while model.running {
        write!(out, "{}", render_menu())?;
        let msg = match prompt(input, out, "Enter your choice: ")? {
            None => Msg::Exit,
            Some(line) => match Choice::parse(&line) {
                Some(choice) => read_msg(choice, &model, input, out)?.unwrap_or(Msg::Exit),
                None => Msg::Unknown(line),
            },
        };
        model = TodoApp::dispatch(msg, model)?;
        write!(out, "{}", TodoApp::view(&model))?;
        model.clear_notices();
    }
    out.flush()?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Flags;
    use crate::todo::{TodoItem, TodoList};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn session(dir: &TempDir, script: &str) -> (Model, String) {
        let model = TodoApp::init(Flags {
            path: dir.path().join("todo.json"),
            autosave: false,
        });
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let model = run(model, &mut input, &mut out).unwrap();
        (model, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parse_accepts_only_menu_numbers() {
        assert_eq!(Choice::parse("1"), Some(Choice::Create));
        assert_eq!(Choice::parse(" 7 "), Some(Choice::Exit));
        assert_eq!(Choice::parse("8"), None);
        assert_eq!(Choice::parse("exit"), None);
        assert_eq!(Choice::parse(""), None);
    }

    #[test]
    fn scripted_session_persists_on_save() {
        let dir = TempDir::new().unwrap();
        let script = "1\nBuy milk\n1\nWalk dog\n2\nBuy milk\n4\nWalk dog\n5\n7\n";
        let (model, out) = session(&dir, script);
        assert!(!model.running);
        assert!(!model.dirty);
        assert!(out.contains("has been completed"));
        assert!(out.contains("has been deleted"));
        assert!(out.contains("Bye Bye"));

        let saved = TodoList::load(&dir.path().join("todo.json")).unwrap();
        let mut expected = TodoList::new();
        expected.add(TodoItem {
            title: "Buy milk".to_string(),
            completed: true,
        });
        assert_eq!(saved, expected);
    }

    fn session_bytes(dir: &TempDir, script: &[u8]) -> Model {
        let model = TodoApp::init(Flags {
            path: dir.path().join("todo.json"),
            autosave: false,
        });
        let mut input = Cursor::new(script.to_vec());
        let mut out = Vec::new();
        run(model, &mut input, &mut out).unwrap()
    }

    #[test]
    fn invalid_utf8_line_does_not_end_the_session() {
        let dir = TempDir::new().unwrap();
        let model = session_bytes(&dir, b"1\nBuy milk\n1\n\xffbad\n6\n5\n7\n");
        assert!(!model.running);
        assert!(!model.dirty);
        let saved = TodoList::load(&dir.path().join("todo.json")).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved.items()[0].title, "Buy milk");
        assert_eq!(saved.items()[1].title, "\u{FFFD}bad");
    }

    #[test]
    fn invalid_utf8_choice_is_an_invalid_choice() {
        let dir = TempDir::new().unwrap();
        let model = session_bytes(&dir, b"\xff\n1\nWalk dog\n7\n");
        assert_eq!(model.list.len(), 1);
        assert!(!model.running);
    }

    #[test]
    fn end_of_input_exits() {
        let dir = TempDir::new().unwrap();
        let (model, out) = session(&dir, "1\nBuy milk\n");
        assert!(!model.running);
        assert_eq!(model.list.len(), 1);
        assert!(out.contains("Unsaved changes were discarded"));
        assert!(!dir.path().join("todo.json").exists());
    }

    #[test]
    fn end_of_input_inside_a_prompt_exits() {
        let dir = TempDir::new().unwrap();
        let (model, _) = session(&dir, "1\n");
        assert!(!model.running);
        assert!(model.list.is_empty());
    }

    #[test]
    fn invalid_choice_keeps_looping() {
        let dir = TempDir::new().unwrap();
        let (model, out) = session(&dir, "9\nhello\n7\n");
        assert!(out.contains("Invalid choice"));
        assert_eq!(out.matches("Enter your choice: ").count(), 3);
        assert!(!model.running);
    }

    #[test]
    fn edit_miss_skips_new_title_prompt() {
        let dir = TempDir::new().unwrap();
        let (model, out) = session(&dir, "3\nghost\n7\n");
        assert!(out.contains("was not found"));
        assert!(!out.contains("Enter the new title"));
        assert!(model.list.is_empty());
    }

    #[test]
    fn edit_hit_renames() {
        let dir = TempDir::new().unwrap();
        let (model, out) = session(&dir, "1\nWalk dog\n3\nWalk dog\nWalk cat\n6\n7\n");
        assert!(out.contains("Enter the new title: "));
        assert_eq!(model.list.items()[0].title, "Walk cat");
        assert!(out.contains("Walk cat"));
    }

    #[test]
    fn existing_file_is_loaded_and_listed() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("todo.json"),
            r#"[{"title": "Learn Go", "completed": false}, {"title": "Buy milk", "completed": true}]"#,
        )
        .unwrap();
        let (model, out) = session(&dir, "6\n7\n");
        assert_eq!(model.list.len(), 2);
        assert!(out.contains("Learn Go"));
        assert!(out.contains("1 of 2 completed"));
        assert!(out.trim_end().ends_with("Bye Bye"));
    }
}
