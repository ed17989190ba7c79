use crate::events::ProgressEvent;
use crate::exit_codes::exit;

/// Renders progress events for a terminal and remembers the outcome.
pub struct Reporter {
    json_mode: bool,
    terminal: Option<ProgressEvent>,
    #[cfg(feature = "cli")]
    bar: Option<indicatif::ProgressBar>,
}

impl Reporter {
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            terminal: None,
            #[cfg(feature = "cli")]
            bar: None,
        }
    }

    pub fn record(&mut self, event: &ProgressEvent) {
        if event.is_terminal() {
            self.terminal = Some(event.clone());
        }
        if self.json_mode {
            if let Ok(line) = serde_json::to_string(event) {
                println!("{}", line);
            }
            return;
        }
        match event {
            ProgressEvent::Progress { percent, message } => self.progress(*percent, message),
            ProgressEvent::Info { message } => {
                self.finish_bar();
                println!("{}", message);
            }
            ProgressEvent::Warning { message } => {
                self.finish_bar();
                eprintln!("warning: {}", message);
            }
            ProgressEvent::Error { message } => {
                self.finish_bar();
                eprintln!("error: {}", message);
            }
            ProgressEvent::Done => self.finish_bar(),
        }
    }

    #[cfg(feature = "cli")]
    fn progress(&mut self, percent: f64, message: &str) {
        let bar = self.bar.get_or_insert_with(|| {
            let bar = indicatif::ProgressBar::new(100);
            if let Ok(style) =
                indicatif::ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos:>3}% {msg}")
            {
                bar.set_style(style.progress_chars("##-"));
            }
            bar
        });
        bar.set_position(percent.round() as u64);
        bar.set_message(message.to_string());
    }

    #[cfg(not(feature = "cli"))]
    fn progress(&mut self, percent: f64, message: &str) {
        eprintln!("[{:>3.0}%] {}", percent, message);
    }

    #[cfg(feature = "cli")]
    fn finish_bar(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    #[cfg(not(feature = "cli"))]
    fn finish_bar(&mut self) {}

    /// Exit code for the last terminal event seen.
    pub fn exit_code(&self) -> i32 {
        match self.terminal {
            Some(ProgressEvent::Warning { .. }) => exit::PARTIAL_FAILURE,
            Some(ProgressEvent::Error { .. }) => exit::VALIDATION_FAILURE,
            _ => exit::SUCCESS,
        }
    }
}
