use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use qfold::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

struct BarState {
    pb: ProgressBar,
    phase: String,
    item: Option<String>,
}

impl BarState {
    fn label(&self) -> String {
        match &self.item {
            Some(item) => format!("[{}] {}", item, self.phase),
            None => self.phase.clone(),
        }
    }
}

#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(0))
    }

    /// Reports to a bar that never draws.
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::with_draw_target(
            Some(0),
            ProgressDrawTarget::hidden(),
        ))
    }

    fn with_bar(pb: ProgressBar) -> Self {
        let pb = pb
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.disable_steady_tick();
        pb.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(BarState {
                pb,
                phase: String::new(),
                item: None,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut guard) = state.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    guard.phase = name.to_string();
                    let label = guard.label();
                    let pb = &guard.pb;
                    pb.reset();
                    pb.set_length(0);
                    pb.set_style(Self::spinner_style());
                    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb.set_message(label);
                }
                Progress::PhaseFinish => {
                    let label = guard.label();
                    guard.pb.disable_steady_tick();
                    guard.pb.finish_with_message(format!("✓ {}", label));
                }
                Progress::TaskStart { total_steps } => {
                    let pb = &guard.pb;
                    pb.disable_steady_tick();
                    pb.reset();
                    pb.set_length(total_steps);
                    pb.set_position(0);
                    pb.set_style(Self::bar_style());
                }
                Progress::TaskIncrement => {
                    guard.pb.inc(1);
                }
                Progress::TaskFinish => {
                    let pb = &guard.pb;
                    if pb.position() < pb.length().unwrap_or(0) {
                        pb.set_position(pb.length().unwrap_or(0));
                    }
                    pb.finish();
                }
                Progress::StatusUpdate { text } => {
                    let message = format!("{} ({})", guard.label(), text);
                    guard.pb.set_message(message);
                }
                Progress::ItemStart { id, index, total } => {
                    guard.item = Some(id.clone());
                    guard
                        .pb
                        .println(format!("Folding {} ({}/{})", id, index + 1, total));
                }
                Progress::Message(msg) => {
                    if !guard.pb.is_finished() {
                        guard.pb.println(format!("  {}", msg));
                    } else {
                        guard.pb.set_message(msg);
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Failed to create spinner style template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<30} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("Failed to create bar style template")
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
