use super::*;
use picker_core::debounce::{DebounceInput, spawn_debounced};
use picker_core::query::{SearchKey, sanitize};
use picker_core::search::{SearchCompletion, SearchProvider};
use std::io::{BufRead, Write};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::LocalSet;

pub(super) async fn handle_pick(
    config: &PickerConfig,
    args: PickArgs,
    log_buffer: logging::LogBuffer,
) -> anyhow::Result<()> {
    let known = known_repositories(config, args.repos.as_deref())?;
    let provider = Rc::new(build_provider(config)?);
    let window = args
        .debounce_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.debounce_window());
    let selection = SharedSelection::new();
    let mut session = PickSession::new(
        RepoPicker::new(known, selection.clone()),
        selection,
        provider,
        install_link(config),
        log_buffer,
        std::io::stdout(),
    );
    let lines = spawn_stdin_reader();
    LocalSet::new().run_until(session.run(window, lines)).await
}

/// Blocking stdin reads live on their own thread so the runtime never waits
/// on them at shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[derive(Debug, Eq, PartialEq)]
pub(super) enum PickCommand<'a> {
    Input(&'a str),
    Select(&'a str),
    Clear,
    Log,
    Quit,
    Unknown(&'a str),
}

impl<'a> PickCommand<'a> {
    /// Lines starting with `:` are commands; anything else is typed input.
    pub(super) fn parse(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(command) = line.strip_prefix(':') else {
            return PickCommand::Input(line);
        };
        let command = command.trim();
        let mut parts = command.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or("");
        let rest = parts.next().map(str::trim).filter(|rest| !rest.is_empty());
        match (name, rest) {
            ("select" | "s", Some(key)) => PickCommand::Select(key),
            ("clear" | "c", None) => PickCommand::Clear,
            ("log", None) => PickCommand::Log,
            ("quit" | "q", None) => PickCommand::Quit,
            _ => PickCommand::Unknown(command),
        }
    }
}

pub(super) struct PickSession<P, W> {
    picker: RepoPicker<SharedSelection>,
    selection: SharedSelection,
    provider: Rc<P>,
    install: Option<String>,
    log_buffer: logging::LogBuffer,
    typed: String,
    last_pushed: Option<SearchKey>,
    out: W,
}

impl<P, W> PickSession<P, W>
where
    P: SearchProvider + 'static,
    W: Write,
{
    pub(super) fn new(
        picker: RepoPicker<SharedSelection>,
        selection: SharedSelection,
        provider: Rc<P>,
        install: Option<String>,
        log_buffer: logging::LogBuffer,
        out: W,
    ) -> Self {
        Self {
            picker,
            selection,
            provider,
            install,
            log_buffer,
            typed: String::new(),
            last_pushed: None,
            out,
        }
    }

    #[cfg(test)]
    pub(super) fn output(&self) -> &W {
        &self.out
    }

    /// Drives the picker until `:quit` or end of input. Must run inside a
    /// `LocalSet`; searches are spawned as local tasks. The debounce timer is
    /// cancelled and late search responses ignored however the loop ends.
    pub(super) async fn run(
        &mut self,
        window: Duration,
        mut lines: mpsc::UnboundedReceiver<std::io::Result<String>>,
    ) -> anyhow::Result<()> {
        let (input, mut settled, debounce) = spawn_debounced::<SearchKey>(window);
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<SearchCompletion>();

        let result = async {
            self.render()?;
            loop {
                tokio::select! {
                    line = lines.recv() => {
                        let Some(line) = line else { break };
                        let line = match line {
                            Ok(line) => line,
                            Err(err) if err.kind() == std::io::ErrorKind::InvalidData => {
                                warn!(error = %err, "skipping input line that is not valid UTF-8");
                                writeln!(self.out, "Skipped a line that is not valid UTF-8")?;
                                continue;
                            }
                            Err(err) => return Err(anyhow::Error::new(err).context("read input line")),
                        };
                        if !self.handle_line(&line, &input)? {
                            break;
                        }
                    }
                    Some(key) = settled.recv() => match self.picker.begin_search(key.as_str()) {
                        Some(ticket) => {
                            let provider = Rc::clone(&self.provider);
                            let done_tx = done_tx.clone();
                            tokio::task::spawn_local(async move {
                                let _ = done_tx.send(fetch(provider.as_ref(), ticket).await);
                            });
                        }
                        None => self.render()?,
                    },
                    Some(done) = done_rx.recv() => {
                        if self.picker.complete_search(done) {
                            if self.picker.session().latest_key().is_none() {
                                // Failed search; let the same key settle again.
                                self.last_pushed = None;
                            }
                            self.render()?;
                        }
                    }
                }
            }
            anyhow::Ok(())
        }
        .await;

        debounce.cancel();
        self.picker.teardown();
        info!("picker closed");
        result
    }

    fn handle_line(
        &mut self,
        line: &str,
        input: &DebounceInput<SearchKey>,
    ) -> anyhow::Result<bool> {
        match PickCommand::parse(line) {
            PickCommand::Input(text) => {
                self.typed = text.to_string();
                // Edits that keep the same key do not restart the quiet window.
                let key = sanitize(&self.typed);
                if self.last_pushed.as_ref() != Some(&key) {
                    self.last_pushed = Some(key.clone());
                    input.push(key);
                }
                self.render()?;
            }
            PickCommand::Select(key) => {
                if self.picker.select(key) {
                    let name = self.selection.current().unwrap_or_default();
                    writeln!(self.out, "Selected {name}")?;
                } else {
                    writeln!(self.out, "No listed repository with key {key}")?;
                }
            }
            PickCommand::Clear => {
                self.picker.clear();
                writeln!(self.out, "Selection cleared")?;
            }
            PickCommand::Log => {
                for entry in self.log_buffer.entries() {
                    writeln!(self.out, "{}", entry.format_compact())?;
                }
            }
            PickCommand::Quit => return Ok(false),
            PickCommand::Unknown(command) => {
                writeln!(
                    self.out,
                    "Unknown command :{command} (try :select <id>, :clear, :log, :quit)"
                )?;
            }
        }
        Ok(true)
    }

    fn render(&mut self) -> anyhow::Result<()> {
        let lines = render_entries(&self.picker.visible(&self.typed), self.install.as_deref());
        writeln!(self.out, "--- {:?}", self.typed)?;
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
