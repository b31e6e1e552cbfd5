use rtpm_config::{DisplayMode, RtpmConfig};
use rtpm_core::{
    CanonicalSample, ConnectionStatus, DashState, DashWidget, HistorySnapshot, Result, RtpmError,
};
use std::io::{self, IsTerminal, Stdout, Write};
use std::sync::Arc;

const CLEAR: &str = "\x1b[2J\x1b[H";

/// Writes one frame per tick outcome.
///
/// In text mode the frame is the rendered widget set (the terminal is
/// cleared first when stdout is a TTY). In JSON mode each tick is one line:
/// the canonical sample, or `null` when there was none.
pub struct Console<W: Write = Stdout> {
    mode:    DisplayMode,
    widgets: Vec<Box<dyn DashWidget>>,
    state:   DashState,
    clear:   bool,
    out:     W,
}

impl Console<Stdout> {
    pub fn stdout(config: &RtpmConfig) -> Self {
        let out = io::stdout();
        let clear = out.is_terminal();
        let mut console = Self::with_writer(config, out);
        console.clear = clear;
        console
    }
}

impl<W: Write> Console<W> {
    pub fn with_writer(config: &RtpmConfig, out: W) -> Self {
        Self {
            mode:    config.display.mode,
            widgets: rtpm_widgets::dashboard(config),
            state:   DashState::default(),
            clear:   false,
            out,
        }
    }

    /// Rebuild the widgets for a new configuration. Connection state and
    /// history are kept.
    pub fn reconfigure(&mut self, config: &RtpmConfig) {
        self.mode = config.display.mode;
        self.widgets = rtpm_widgets::dashboard(config);
    }

    pub fn state(&self) -> &DashState {
        &self.state
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn tick(&mut self, sample: Option<Arc<CanonicalSample>>, history: HistorySnapshot) -> Result<()> {
        self.state.apply(sample, history);

        match self.mode {
            DisplayMode::Json => {
                let line = match self.state.sample.as_deref() {
                    Some(sample) => serde_json::to_string(sample)
                        .map_err(|e| RtpmError::Decode(format!("cannot encode sample: {e}")))?,
                    None => "null".to_string(),
                };
                writeln!(self.out, "{line}")?;
            }
            DisplayMode::Text => self.frame()?,
        }
        self.out.flush()?;
        Ok(())
    }

    /// Show the final status once the hub has stopped.
    pub fn stopped(&mut self) -> Result<()> {
        self.state.status = ConnectionStatus::Stopped;
        if self.mode == DisplayMode::Text {
            self.frame()?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn frame(&mut self) -> Result<()> {
        let body = rtpm_widgets::render(&mut self.widgets, &self.state);
        if self.clear {
            write!(self.out, "{CLEAR}")?;
        }
        writeln!(self.out, "{body}\n")?;
        Ok(())
    }
}
