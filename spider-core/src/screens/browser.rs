//! src/screens/browser.rs
//! ============================================================================
//! # Browser: the root screen
//!
//! Lists the current directory and maps keys to built-in behaviors or user
//! command templates through [`Bindings`]. Arrow keys and `Enter` are fixed
//! aliases for the movement and open behaviors. Prompts (names, confirmations,
//! fast travel) are edited inline on the bottom row.
//!
//! The listing is refreshed lazily: anything that may change the directory
//! contents or the working directory invalidates it, and the next `update` or
//! `draw` rescans.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Cell, HighlightSpacing, Paragraph, Row, Table, TableState, Wrap},
};
use spider_screen::{EventResult, Input, ProcessMode, ProcessRequest, Screen, ScreenContext};
use tracing::{debug, instrument, warn};

use crate::{
    config::bindings::{BindingAction, Bindings, BuiltinAction},
    error::AppResult,
    fs::{
        bookmarks::Bookmarks,
        listing::{self, Entry, EntryKind},
        operations,
    },
    screens::{
        bookmark_list::BookmarkList,
        git_status::GitStatus,
        prompt::{Prompt, PromptEvent},
    },
    view::theme,
};

/// What an open prompt is collecting input for.
#[derive(Debug)]
enum Pending {
    CreateFile,
    CreateDirectory,
    Rename(PathBuf),
    Overwrite { from: PathBuf, to: PathBuf },
    Delete { targets: Vec<PathBuf>, marked: bool },
    Extension,
    Find,
}

pub struct Browser {
    bindings: Bindings,
    entries: Vec<Entry>,
    cursor: usize,
    marks: BTreeSet<PathBuf>,
    bookmarks: Bookmarks,
    prompt: Option<(Pending, Prompt)>,
    listed: Option<PathBuf>,
    stale: bool,
    notice: Option<String>,
    table_state: TableState,
}

impl Browser {
    pub const NAME: &'static str = "browser";

    pub fn new(bindings: Bindings) -> Self {
        Self {
            bindings,
            entries: Vec::new(),
            cursor: 0,
            marks: BTreeSet::new(),
            bookmarks: Bookmarks::in_memory(),
            prompt: None,
            listed: None,
            stale: true,
            notice: None,
            table_state: TableState::default(),
        }
    }

    #[must_use]
    pub fn with_bookmarks(mut self, bookmarks: Bookmarks) -> Self {
        self.bookmarks = bookmarks;
        self
    }

    pub fn bookmarks(&self) -> &Bookmarks {
        &self.bookmarks
    }

    pub fn selected(&self) -> Option<&Entry> {
        self.entries.get(self.cursor)
    }

    pub fn marks(&self) -> impl Iterator<Item = &Path> {
        self.marks.iter().map(PathBuf::as_path)
    }

    fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Rescan when invalidated or when the working directory moved under us;
    /// a move also resets the cursor.
    fn refresh(&mut self, cwd: &Path) {
        let moved = self.listed.as_deref() != Some(cwd);
        if !moved && !self.stale {
            return;
        }
        if moved {
            self.cursor = 0;
        }

        match listing::scan_dir(cwd) {
            Ok(entries) => {
                self.entries = entries;
                self.notice = None;
            }
            Err(e) => {
                warn!("{e}");
                self.entries.clear();
                self.notice = Some(e.to_string());
            }
        }
        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
        self.listed = Some(cwd.to_path_buf());
        self.stale = false;
    }

    fn change_dir(&mut self, dir: PathBuf, ctx: &mut ScreenContext) {
        debug!(dir = %dir.display(), "Changing directory");
        ctx.set_cwd(dir);
        self.cursor = 0;
        self.invalidate();
    }

    fn open_prompt(&mut self, pending: Pending, prompt: Prompt) {
        self.prompt = Some((pending, prompt));
    }

    fn report(ctx: &mut ScreenContext, result: AppResult<impl Sized>) {
        if let Err(e) = result {
            warn!("{e}");
            ctx.report(e.status_message());
        }
    }

    fn resolve_key(&self, input: &Input) -> Option<BindingAction> {
        let alias = match input.key_code()? {
            KeyCode::Left => Some(BuiltinAction::Parent),
            KeyCode::Right | KeyCode::Enter => Some(BuiltinAction::Enter),
            KeyCode::Down => Some(BuiltinAction::Down),
            KeyCode::Up => Some(BuiltinAction::Up),
            _ => None,
        };
        if let Some(action) = alias {
            return Some(BindingAction::Builtin(action));
        }

        let key = input.as_char()?;
        self.bindings.get(key).map(|binding| binding.action.clone())
    }

    fn handle_prompt(&mut self, pending: Pending, mut prompt: Prompt, input: &Input, ctx: &mut ScreenContext) {
        match prompt.handle(input) {
            PromptEvent::Idle => self.open_prompt(pending, prompt),
            PromptEvent::Edited => {
                if matches!(pending, Pending::Find) && self.find(prompt.buffer(), ctx) {
                    return;
                }
                self.open_prompt(pending, prompt);
            }
            PromptEvent::Submitted(text) => self.submit(pending, text, ctx),
            PromptEvent::Confirmed(true) => self.confirm(pending, ctx),
            PromptEvent::Confirmed(false) | PromptEvent::Cancelled => {
                debug!(?pending, "Prompt dismissed");
            }
        }
    }

    /// Jump to the first entry starting with `prefix`. Returns `true` when
    /// the match was unique and has been entered.
    fn find(&mut self, prefix: &str, ctx: &mut ScreenContext) -> bool {
        if prefix.is_empty() {
            return false;
        }

        let mut matches = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.name.starts_with(prefix))
            .map(|(index, _)| index);

        let Some(first) = matches.next() else {
            return false;
        };
        self.cursor = first;

        if matches.next().is_none() {
            self.enter(ctx);
            return true;
        }
        false
    }

    fn submit(&mut self, pending: Pending, text: String, ctx: &mut ScreenContext) {
        let name = text.trim();
        if name.is_empty() {
            return;
        }
        let target = ctx.cwd().join(name);

        match pending {
            Pending::CreateFile => {
                Self::report(ctx, operations::create_file(&target));
                self.invalidate();
            }
            Pending::CreateDirectory => {
                Self::report(ctx, operations::create_dir(&target));
                self.invalidate();
            }
            Pending::Rename(from) => {
                if target.exists() && !name.starts_with("..") && name != "." {
                    let message = format!("Warning: {name} already exists. Overwrite?(Y/N):");
                    self.open_prompt(Pending::Overwrite { from, to: target }, Prompt::confirm(message));
                    return;
                }
                Self::report(ctx, operations::rename(&from, &target));
                self.invalidate();
            }
            Pending::Extension => ctx.open_extension(name),
            Pending::Find | Pending::Overwrite { .. } | Pending::Delete { .. } => {}
        }
    }

    fn confirm(&mut self, pending: Pending, ctx: &mut ScreenContext) {
        match pending {
            Pending::Delete { targets, marked } => {
                for target in &targets {
                    Self::report(ctx, operations::delete(target));
                }
                if marked {
                    self.marks.clear();
                }
                self.cursor = 0;
                self.invalidate();
            }
            Pending::Overwrite { from, to } => {
                Self::report(ctx, operations::rename(&from, &to));
                self.invalidate();
            }
            _ => {}
        }
    }

    #[instrument(level = "debug", skip(self, ctx))]
    fn perform(&mut self, action: BuiltinAction, ctx: &mut ScreenContext) {
        let len = self.entries.len();

        match action {
            BuiltinAction::Parent => {
                if let Some(parent) = ctx.cwd().parent().map(Path::to_path_buf) {
                    self.change_dir(parent, ctx);
                }
            }
            BuiltinAction::Enter => self.enter(ctx),
            BuiltinAction::Down if len > 0 => self.cursor = (self.cursor + 1) % len,
            BuiltinAction::Up if len > 0 => self.cursor = self.cursor.checked_sub(1).unwrap_or(len - 1),
            BuiltinAction::Down | BuiltinAction::Up => {}
            BuiltinAction::Shell => {
                let request = ProcessRequest::new(&ctx.settings().shell, ProcessMode::Foreground);
                ctx.run(request);
                self.invalidate();
            }
            BuiltinAction::Terminal => {
                let request = ProcessRequest::new(&ctx.settings().terminal, ProcessMode::Detached);
                ctx.run(request);
            }
            BuiltinAction::CreateFile => self.open_prompt(Pending::CreateFile, Prompt::line("Name of file:")),
            BuiltinAction::CreateDirectory => {
                self.open_prompt(Pending::CreateDirectory, Prompt::line("Name of directory:"));
            }
            BuiltinAction::Delete => self.prompt_delete(),
            BuiltinAction::Rename => {
                if let Some(entry) = self.selected() {
                    let from = entry.path.clone();
                    self.open_prompt(Pending::Rename(from), Prompt::line("New name:"));
                }
            }
            BuiltinAction::ToggleMark => {
                if let Some(path) = self.selected().map(|entry| entry.path.clone()) {
                    if !self.marks.remove(&path) {
                        self.marks.insert(path);
                    }
                    if self.cursor + 1 < len {
                        self.cursor += 1;
                    }
                }
            }
            BuiltinAction::ClearMarks => self.marks.clear(),
            BuiltinAction::PasteMarks => self.transfer_marks(ctx, operations::copy_into),
            BuiltinAction::MoveMarks => self.transfer_marks(ctx, operations::move_into),
            BuiltinAction::GitStatus => ctx.push(Box::new(GitStatus::new())),
            BuiltinAction::OpenExtension => self.open_prompt(Pending::Extension, Prompt::line("Extension:")),
            BuiltinAction::Find => self.open_prompt(Pending::Find, Prompt::line("Go:")),
            BuiltinAction::ToggleBookmark => {
                let cwd = ctx.cwd().to_path_buf();
                Self::report(ctx, self.bookmarks.toggle(&cwd));
            }
            BuiltinAction::Bookmarks => {
                let dirs = self.bookmarks.iter().map(Path::to_path_buf).collect();
                ctx.push(Box::new(BookmarkList::new(dirs)));
            }
            BuiltinAction::Close => ctx.pop(),
        }
    }

    fn prompt_delete(&mut self) {
        if !self.marks.is_empty() {
            let targets: Vec<PathBuf> = self.marks.iter().cloned().collect();
            let message = format!("Delete {} objects?(Y/N):", targets.len());
            self.open_prompt(Pending::Delete { targets, marked: true }, Prompt::confirm(message));
            return;
        }

        if let Some(entry) = self.selected() {
            let message = format!("Delete {}?(Y/N):", entry.name);
            let targets = vec![entry.path.clone()];
            self.open_prompt(Pending::Delete { targets, marked: false }, Prompt::confirm(message));
        }
    }

    fn transfer_marks(&mut self, ctx: &mut ScreenContext, operation: fn(&Path, &Path) -> AppResult<PathBuf>) {
        let cwd = ctx.cwd().to_path_buf();
        for mark in std::mem::take(&mut self.marks) {
            Self::report(ctx, operation(&mark, &cwd));
        }
        self.invalidate();
    }

    fn enter(&mut self, ctx: &mut ScreenContext) {
        let Some(entry) = self.selected().cloned() else {
            return;
        };

        if entry.is_dir {
            self.change_dir(entry.path, ctx);
        } else {
            let request = Self::open_request(&entry, ctx);
            ctx.run(request);
            self.invalidate();
        }
    }

    /// Text goes to the editor, executables run with a pause, anything else
    /// goes to the opener.
    fn open_request(entry: &Entry, ctx: &ScreenContext) -> ProcessRequest {
        let settings = ctx.settings();
        let path = entry.path.to_string_lossy().into_owned();

        match listing::looks_like_text(&entry.path) {
            Ok(true) => ProcessRequest::new(&settings.editor, ProcessMode::Foreground).arg(path),
            _ if entry.is_executable() => ProcessRequest::new(path, ProcessMode::ForegroundPause),
            _ => ProcessRequest::new(&settings.opener, ProcessMode::Foreground).arg(path),
        }
    }

    fn row(&self, entry: &Entry) -> Row<'static> {
        let marked = self.marks.contains(&entry.path);
        let style = if marked {
            theme::marked_style()
        } else {
            match entry.kind {
                EntryKind::Directory => theme::directory_style(),
                EntryKind::Symlink => theme::symlink_style(),
                EntryKind::File if entry.is_executable() => theme::executable_style(),
                EntryKind::File => theme::base_style(),
            }
        };
        let icon = match entry.kind {
            EntryKind::Directory => theme::FOLDER_ICON,
            EntryKind::Symlink => theme::SYMLINK_ICON,
            EntryKind::File => theme::FILE_ICON,
        };
        let mark = if marked { "+ " } else { "" };

        Row::new(vec![
            Cell::from(format!("{:03o}", entry.mode)),
            Cell::from(entry.size_label()),
            Cell::from(format!("{mark}{icon} {}", entry.name)),
        ])
        .style(style)
    }
}

impl Screen for Browser {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn update(&mut self, input: &Input, ctx: &mut ScreenContext) -> EventResult {
        let cwd = ctx.cwd().to_path_buf();
        self.refresh(&cwd);

        if let Some((pending, prompt)) = self.prompt.take() {
            self.handle_prompt(pending, prompt, input, ctx);
            return EventResult::Consumed;
        }

        let Some(action) = self.resolve_key(input) else {
            return EventResult::Ignored;
        };

        match action {
            BindingAction::Builtin(builtin) => self.perform(builtin, ctx),
            BindingAction::Command(template) => {
                debug!(template = template.as_str(), "Running bound command");
                let request = template.to_request(&cwd, ctx.settings());
                ctx.run(request);
                self.invalidate();
            }
        }
        EventResult::Consumed
    }

    fn draw(&mut self, frame: &mut Frame<'_>, ctx: &ScreenContext) {
        self.refresh(ctx.cwd());

        let [header, body] = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(frame.area());
        let marker = if self.bookmarks.contains(ctx.cwd()) { " [b]" } else { "" };
        frame.render_widget(
            Paragraph::new(format!("{}{marker}", ctx.cwd().display())).style(theme::title_style()),
            header,
        );

        if let Some(notice) = &self.notice {
            frame.render_widget(
                Paragraph::new(notice.as_str())
                    .style(theme::error_style())
                    .wrap(Wrap { trim: false }),
                body,
            );
        } else {
            let rows: Vec<Row<'static>> = self.entries.iter().map(|entry| self.row(entry)).collect();
            let widths = [Constraint::Length(4), Constraint::Length(10), Constraint::Fill(1)];

            let table = Table::new(rows, widths)
                .header(Row::new(vec!["Mode", "Size", "Name"]).style(theme::header_style()))
                .style(theme::base_style())
                .row_highlight_style(theme::highlight_style())
                .highlight_symbol("▶ ")
                .highlight_spacing(HighlightSpacing::Always);

            self.table_state
                .select((!self.entries.is_empty()).then_some(self.cursor));
            frame.render_stateful_widget(table, body, &mut self.table_state);
        }

        if let Some((_, prompt)) = &self.prompt {
            prompt.render(frame);
        }
    }

    fn on_activate(&mut self) {
        debug!("Browser activated");
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};
    use spider_screen::{Action, Settings};
    use std::fs;
    use tempfile::TempDir;

    fn setup(bindings: Bindings) -> (TempDir, Browser, ScreenContext) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::write(dir.path().join("beta.txt"), "beta contents\n").unwrap();
        fs::write(dir.path().join("gamma.bin"), [0u8, 1, 2, 3]).unwrap();

        let settings = Settings {
            editor: "ed".to_string(),
            terminal: "term".to_string(),
            opener: "open".to_string(),
            shell: "sh".to_string(),
            home: dir.path().to_path_buf(),
        };
        let ctx = ScreenContext::new(settings, dir.path().to_path_buf());
        (dir, Browser::new(bindings), ctx)
    }

    fn press(browser: &mut Browser, ctx: &mut ScreenContext, keys: &str) {
        for c in keys.chars() {
            browser.update(&Input::char(c), ctx);
        }
    }

    fn enter(browser: &mut Browser, ctx: &mut ScreenContext) {
        browser.update(&Input::code(KeyCode::Enter), ctx);
    }

    fn only_run(ctx: &mut ScreenContext) -> ProcessRequest {
        let mut actions = ctx.take_actions();
        assert_eq!(actions.len(), 1, "expected exactly one action: {actions:?}");
        match actions.remove(0) {
            Action::Run(request) => request,
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_cursor_wraps_both_ways() {
        let (_dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "k");
        assert_eq!(browser.selected().map(|e| e.name.as_str()), Some("gamma.bin"));

        press(&mut browser, &mut ctx, "j");
        assert_eq!(browser.selected().map(|e| e.name.as_str()), Some("alpha"));

        browser.update(&Input::code(KeyCode::Down), &mut ctx);
        assert_eq!(browser.selected().map(|e| e.name.as_str()), Some("beta.txt"));
    }

    #[test]
    fn test_enter_directory_and_return_to_parent() {
        let (dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "l");
        assert_eq!(ctx.cwd(), dir.path().join("alpha"));

        browser.update(&Input::code(KeyCode::Left), &mut ctx);
        assert_eq!(ctx.cwd(), dir.path());
        assert!(!ctx.has_pending_actions());
    }

    #[test]
    fn test_text_file_opens_in_editor() {
        let (dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "j");
        enter(&mut browser, &mut ctx);

        let request = only_run(&mut ctx);
        assert_eq!(request.program, "ed");
        assert_eq!(request.args, vec![dir.path().join("beta.txt").to_string_lossy().into_owned()]);
        assert_eq!(request.mode, ProcessMode::Foreground);
    }

    #[test]
    fn test_binary_file_goes_to_opener() {
        let (_dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "kl");
        assert_eq!(only_run(&mut ctx).program, "open");
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_runs_with_pause() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, mut browser, mut ctx) = setup(Bindings::with_defaults());
        let tool = dir.path().join("gamma.bin");
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        press(&mut browser, &mut ctx, "kl");

        let request = only_run(&mut ctx);
        assert_eq!(request.program, tool.to_string_lossy());
        assert_eq!(request.mode, ProcessMode::ForegroundPause);
    }

    #[test]
    fn test_create_file_through_prompt() {
        let (dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "cnotes.md");
        assert!(!dir.path().join("notes.md").exists());
        enter(&mut browser, &mut ctx);

        assert!(dir.path().join("notes.md").is_file());
        press(&mut browser, &mut ctx, "k");
        assert_eq!(browser.selected().map(|e| e.name.as_str()), Some("notes.md"));
    }

    #[test]
    fn test_prompt_escape_creates_nothing() {
        let (dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "Cdocs");
        browser.update(&Input::code(KeyCode::Esc), &mut ctx);

        assert!(!dir.path().join("docs").exists());
        press(&mut browser, &mut ctx, "j");
        assert_eq!(browser.selected().map(|e| e.name.as_str()), Some("beta.txt"));
    }

    #[test]
    fn test_failed_operation_is_reported() {
        let (_dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "Calpha");
        enter(&mut browser, &mut ctx);

        assert!(ctx.status().is_some_and(|s| s.starts_with("Operation failed: mkdir:")));
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let (dir, mut browser, mut ctx) = setup(Bindings::with_defaults());
        let beta = dir.path().join("beta.txt");

        press(&mut browser, &mut ctx, "jDn");
        assert!(beta.exists());

        press(&mut browser, &mut ctx, "Dy");
        assert!(!beta.exists());
        assert!(dir.path().join("gamma.bin").exists());
    }

    #[test]
    fn test_delete_marked_entries() {
        let (dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "j  ");
        assert_eq!(browser.marks().count(), 2);

        press(&mut browser, &mut ctx, "DY");
        assert!(!dir.path().join("beta.txt").exists());
        assert!(!dir.path().join("gamma.bin").exists());
        assert!(dir.path().join("alpha").exists());
        assert_eq!(browser.marks().count(), 0);
    }

    #[test]
    fn test_paste_copies_marks_into_current_directory() {
        let (dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "j ");
        press(&mut browser, &mut ctx, "kkl");
        assert_eq!(ctx.cwd(), dir.path().join("alpha"));

        press(&mut browser, &mut ctx, "p");
        assert!(dir.path().join("alpha/beta.txt").is_file());
        assert!(dir.path().join("beta.txt").is_file());
        assert_eq!(browser.marks().count(), 0);
    }

    #[test]
    fn test_move_marks_into_current_directory() {
        let (dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "k ");
        press(&mut browser, &mut ctx, "jl");
        assert_eq!(ctx.cwd(), dir.path().join("alpha"));

        press(&mut browser, &mut ctx, "v");
        assert!(dir.path().join("alpha/gamma.bin").is_file());
        assert!(!dir.path().join("gamma.bin").exists());
    }

    #[test]
    fn test_rename_over_existing_asks_first() {
        let (dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "jRgamma.bin");
        enter(&mut browser, &mut ctx);
        assert!(dir.path().join("beta.txt").exists());

        press(&mut browser, &mut ctx, "y");
        assert!(!dir.path().join("beta.txt").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("gamma.bin")).unwrap(),
            "beta contents\n"
        );
    }

    #[test]
    fn test_command_binding_expands_placeholder() {
        let mut bindings = Bindings::with_defaults();
        bindings.bind_command('x', "make -C %F");
        let (dir, mut browser, mut ctx) = setup(bindings);

        press(&mut browser, &mut ctx, "x");

        let request = only_run(&mut ctx);
        assert_eq!(request.program, "sh");
        assert_eq!(
            request.args,
            vec!["-c".to_string(), format!("make -C {}", dir.path().display())]
        );
    }

    #[test]
    fn test_shell_and_terminal_requests() {
        let (_dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "s");
        let shell = only_run(&mut ctx);
        assert_eq!((shell.program.as_str(), shell.mode), ("sh", ProcessMode::Foreground));

        press(&mut browser, &mut ctx, "S");
        let terminal = only_run(&mut ctx);
        assert_eq!((terminal.program.as_str(), terminal.mode), ("term", ProcessMode::Detached));
    }

    #[test]
    fn test_close_pops_and_ctrl_c_is_ignored() {
        let (_dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        assert_eq!(browser.update(&Input::ctrl('c'), &mut ctx), EventResult::Ignored);
        assert_eq!(browser.update(&Input::char('q'), &mut ctx), EventResult::Consumed);
        assert!(matches!(ctx.take_actions().as_slice(), [Action::Pop]));
    }

    #[test]
    fn test_git_status_and_extension_requests() {
        let (_dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "G");
        assert!(matches!(ctx.take_actions().as_slice(), [Action::Push(screen)] if screen.name() == "git-status"));

        press(&mut browser, &mut ctx, "Ehello");
        enter(&mut browser, &mut ctx);
        assert!(matches!(ctx.take_actions().as_slice(), [Action::OpenExtension(name)] if name == "hello"));
    }

    #[test]
    fn test_fast_travel_enters_unique_match() {
        let (dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "fa");
        assert_eq!(ctx.cwd(), dir.path().join("alpha"));

        // The prompt closed with the jump, so keys are bindings again.
        press(&mut browser, &mut ctx, "h");
        assert_eq!(ctx.cwd(), dir.path());
    }

    #[test]
    fn test_bookmark_toggle_and_jump() {
        let (dir, mut browser, mut ctx) = setup(Bindings::with_defaults());

        press(&mut browser, &mut ctx, "b");
        press(&mut browser, &mut ctx, "lb");
        assert_eq!(browser.bookmarks().len(), 2);

        press(&mut browser, &mut ctx, "b");
        assert!(!browser.bookmarks().contains(&dir.path().join("alpha")));
        press(&mut browser, &mut ctx, "b");

        press(&mut browser, &mut ctx, "hj");
        press(&mut browser, &mut ctx, "g");
        let mut actions = ctx.take_actions();
        let Some(Action::Push(mut picker)) = actions.pop() else {
            panic!("expected the bookmark picker");
        };
        assert_eq!(picker.name(), "bookmarks");

        picker.update(&Input::char('b'), &mut ctx);
        assert_eq!(ctx.cwd(), dir.path().join("alpha"));
        assert!(matches!(ctx.take_actions().as_slice(), [Action::Pop]));

        browser.on_activate();
        browser.update(&Input::Tick, &mut ctx);
        assert_eq!(browser.selected().map(|e| e.name.as_str()), None);
    }

    #[test]
    fn test_bookmarks_are_saved_to_file() {
        let store = tempfile::tempdir().unwrap();
        let file = store.path().join("bookmarks");
        let (dir, browser, mut ctx) = setup(Bindings::with_defaults());
        let mut browser = browser.with_bookmarks(Bookmarks::load(&file).unwrap());

        press(&mut browser, &mut ctx, "b");

        let reloaded = Bookmarks::load(&file).unwrap();
        assert!(reloaded.contains(dir.path()));
        assert!(ctx.status().is_none());
    }

    #[test]
    fn test_unreadable_directory_shows_notice() {
        let (_dir, mut browser, mut ctx) = setup(Bindings::with_defaults());
        ctx.set_cwd("/nonexistent/spider/dir");

        press(&mut browser, &mut ctx, "j");
        assert!(browser.selected().is_none());
        assert!(browser.notice.as_deref().is_some_and(|n| n.contains("Cannot read directory")));
    }

    #[test]
    fn test_draw_lists_entries() {
        let (_dir, mut browser, ctx) = setup(Bindings::with_defaults());
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();

        terminal.draw(|frame| browser.draw(frame, &ctx)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("alpha"));
        assert!(text.contains("beta.txt"));
        assert!(text.contains("▶"));
    }
}
